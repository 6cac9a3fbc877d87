use domains::{AppError, Role};
use integration_tests::{user_created_event, TestApp};
use services::WebhookOutcome;

#[tokio::test]
async fn created_event_mirrors_the_user_once() {
    let app = TestApp::new().await;
    let body = user_created_event("user_2new", "amina@example.com");
    let headers = app.signed_webhook(&body);

    app.services.webhook.verify(&headers, &body).unwrap();
    let first = match app.services.webhook.ingest(&body).await.unwrap() {
        WebhookOutcome::Created(user) => user,
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(first.external_id, "user_2new");
    assert_eq!(first.email, "amina@example.com");
    assert_eq!(first.first_name.as_deref(), Some("Amina"));
    assert_eq!(first.role, Role::User);

    // redelivery returns the stored record untouched
    let again = match app.services.webhook.ingest(&body).await.unwrap() {
        WebhookOutcome::Created(user) => user,
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(again, first);

    let everyone = app.services.users.list(Some(&app.admin_id())).await.unwrap();
    assert_eq!(everyone.len(), 4);
}

#[tokio::test]
async fn updated_event_keeps_role() {
    let app = TestApp::new().await;
    let body = serde_json::to_vec(&serde_json::json!({
        "type": "user.updated",
        "data": {
            "id": "user_editor",
            "email_addresses": [{ "email_address": "new-desk@press.test" }],
            "first_name": "Faisal",
            "last_name": "",
            "image_url": null
        }
    }))
    .unwrap();

    let outcome = app.services.webhook.ingest(&body).await.unwrap();
    let WebhookOutcome::Updated(user) = outcome else {
        panic!("expected an update");
    };
    assert_eq!(user.id, app.editor.id);
    assert_eq!(user.email, "new-desk@press.test");
    assert_eq!(user.first_name.as_deref(), Some("Faisal"));
    assert_eq!(user.last_name, None);
    assert_eq!(user.role, Role::Editor);
}

#[tokio::test]
async fn update_for_unknown_user_is_not_found() {
    let app = TestApp::new().await;
    let body = br#"{"type":"user.updated","data":{"id":"user_missing"}}"#;
    let err = app.services.webhook.ingest(body).await.unwrap_err();
    assert_eq!(err, AppError::not_found("User"));
}

#[tokio::test]
async fn deleted_event_removes_the_user() {
    let app = TestApp::new().await;
    let body = br#"{"type":"user.deleted","data":{"id":"user_reader","deleted":true}}"#;

    assert_eq!(
        app.services.webhook.ingest(body).await.unwrap(),
        WebhookOutcome::Deleted
    );
    assert!(app
        .services
        .users
        .by_external_id("user_reader")
        .await
        .unwrap()
        .is_none());

    // deleting twice is harmless
    assert_eq!(
        app.services.webhook.ingest(body).await.unwrap(),
        WebhookOutcome::Deleted
    );
}

#[tokio::test]
async fn other_event_types_are_ignored() {
    let app = TestApp::new().await;
    let body = br#"{"type":"session.created","data":{"id":"sess_1"}}"#;
    assert_eq!(
        app.services.webhook.ingest(body).await.unwrap(),
        WebhookOutcome::Ignored("session.created".into())
    );
}

#[tokio::test]
async fn tampered_body_fails_verification() {
    let app = TestApp::new().await;
    let body = user_created_event("user_2new", "amina@example.com");
    let headers = app.signed_webhook(&body);

    let tampered = user_created_event("user_2evil", "amina@example.com");
    let err = app.services.webhook.verify(&headers, &tampered).unwrap_err();
    assert_eq!(err, AppError::validation("Invalid webhook signature"));
    assert!(app
        .services
        .users
        .by_external_id("user_2evil")
        .await
        .unwrap()
        .is_none());
}
