use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use integration_tests::{bearer, sign_webhook, user_created_event, TestApp, PNG_BYTES};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, auth: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn as_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn health_and_metrics() {
    let app = TestApp::new().await;
    let router = app.router();

    let (status, body) = send(&router, get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({ "status": "ok" }));

    let (status, body) = send(&router, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("rusty_press_http_requests_total"));
    assert!(text.contains("route=\"/healthz\""));
}

#[tokio::test]
async fn public_listing_hides_drafts() {
    let app = TestApp::new().await;
    let category = app.category("Politics").await;
    app.published_post("Vote count begins", &category).await;
    app.post_as(
        &app.admin,
        integration_tests::new_post("Embargoed", category.id, domains::PostStatus::Draft),
    )
    .await;
    let router = app.router();

    let (status, body) = send(&router, get("/api/posts?category=politics")).await;
    assert_eq!(status, StatusCode::OK);
    let posts = as_json(&body);
    let posts = posts.as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["title"], "Vote count begins");
    assert_eq!(posts[0]["category"]["slug"], "politics");

    let (status, body) = send(&router, get("/api/posts/slug/embargoed")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(as_json(&body), json!({ "error": "Post not found" }));
}

#[tokio::test]
async fn admin_routes_check_identity_and_role() {
    let app = TestApp::new().await;
    let router = app.router();
    let body = json!({ "name": "Business" });

    let (status, _) = send(
        &router,
        json_request(Method::POST, "/api/admin/categories", None, &body),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let reader = bearer("user_reader");
    let (status, response) = send(
        &router,
        json_request(Method::POST, "/api/admin/categories", Some(reader.as_str()), &body),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        as_json(&response),
        json!({ "error": "Only admins and editors can create categories" })
    );

    let admin = bearer("user_admin");
    let (status, response) = send(
        &router,
        json_request(Method::POST, "/api/admin/categories", Some(admin.as_str()), &body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(as_json(&response)["slug"], "business");

    // a forged token reads as anonymous
    let (status, _) = send(
        &router,
        json_request(
            Method::POST,
            "/api/admin/categories",
            Some("Bearer not-a-jwt"),
            &json!({ "name": "Forged" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_post_then_block_category_delete() {
    let app = TestApp::new().await;
    let category = app.category("Technology").await;
    let router = app.router();
    let editor = bearer("user_editor");

    let (status, body) = send(
        &router,
        json_request(
            Method::POST,
            "/api/admin/posts",
            Some(editor.as_str()),
            &json!({
                "title": "Fibre reaches Kismayo",
                "description": "Connectivity improves",
                "content": "<p>Details</p>",
                "category_id": category.id,
                "status": "published"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let post = as_json(&body);
    assert_eq!(post["slug"], "fibre-reaches-kismayo");
    assert!(post["published_at"].is_string());

    let view = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/posts/{}/views", post["id"].as_str().unwrap()))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, view).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&router, get("/api/posts/slug/fibre-reaches-kismayo")).await;
    assert_eq!(as_json(&body)["view_count"], 1);

    let delete = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/admin/categories/{}", category.id))
        .header(header::AUTHORIZATION, bearer("user_admin"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, delete).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        as_json(&body),
        json!({ "error": "Cannot delete category with existing posts" })
    );
}

#[tokio::test]
async fn webhook_requires_svix_headers_and_signature() {
    let app = TestApp::new().await;
    let router = app.router();
    let body = user_created_event("user_2web", "web@example.com");

    let bare = Request::builder()
        .method(Method::POST)
        .uri("/clerk-webhook")
        .body(Body::from(body.clone()))
        .unwrap();
    let (status, text) = send(&router, bare).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, b"Error occurred -- no svix headers");

    let signed = sign_webhook(&body);
    let forged = Request::builder()
        .method(Method::POST)
        .uri("/clerk-webhook")
        .header("svix-id", &signed.id)
        .header("svix-timestamp", &signed.timestamp)
        .header("svix-signature", "v1,AAAA")
        .body(Body::from(body.clone()))
        .unwrap();
    let (status, text) = send(&router, forged).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, b"Error occurred");

    let genuine = Request::builder()
        .method(Method::POST)
        .uri("/clerk-webhook")
        .header("svix-id", &signed.id)
        .header("svix-timestamp", &signed.timestamp)
        .header("svix-signature", &signed.signature)
        .body(Body::from(body))
        .unwrap();
    let (status, text) = send(&router, genuine).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, b"Webhook processed successfully");

    let synced = app.services.users.by_external_id("user_2web").await.unwrap();
    assert!(synced.is_some());
}

#[tokio::test]
async fn two_step_upload_and_serving() {
    let app = TestApp::new().await;
    let router = app.router();

    let ticket = Request::builder()
        .method(Method::POST)
        .uri("/api/admin/uploads")
        .header(header::AUTHORIZATION, bearer("user_editor"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, ticket).await;
    assert_eq!(status, StatusCode::OK);
    let ticket = as_json(&body);
    let token = ticket["token"].as_str().unwrap().to_string();
    assert_eq!(
        ticket["upload_url"],
        format!("http://press.test/api/uploads/{token}")
    );

    let upload = |bytes: &'static [u8]| {
        Request::builder()
            .method(Method::POST)
            .uri(format!("/api/uploads/{token}"))
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from(bytes))
            .unwrap()
    };

    let (status, _) = send(&router, upload(b"definitely not an image")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&router, upload(PNG_BYTES)).await;
    assert_eq!(status, StatusCode::CREATED);
    let storage_id = as_json(&body)["storage_id"].as_str().unwrap().to_string();
    assert!(storage_id.ends_with(".png"));

    // tickets are single use
    let (status, _) = send(&router, upload(PNG_BYTES)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = router
        .clone()
        .oneshot(get(&format!("/media/{storage_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], PNG_BYTES);
}
