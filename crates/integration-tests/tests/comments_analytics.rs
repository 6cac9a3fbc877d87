use domains::{AppError, NewComment, PostStatus, PostUpdate, SettingsUpdate};
use integration_tests::{new_post, TestApp};

fn comment(content: &str) -> NewComment {
    NewComment {
        author_name: "Hodan".into(),
        author_email: "hodan@example.com".into(),
        content: content.into(),
        parent_id: None,
    }
}

fn site_settings(allow_comments: bool, require_moderation: bool) -> SettingsUpdate {
    SettingsUpdate {
        site_name: "Rusty-Press".into(),
        site_description: "Independent news".into(),
        contact_email: "desk@press.test".into(),
        timezone: "UTC".into(),
        default_category: None,
        default_post_status: PostStatus::Draft,
        allow_comments,
        require_moderation,
    }
}

#[tokio::test]
async fn moderation_holds_reader_comments_until_approved() {
    let app = TestApp::new().await;
    app.services
        .settings
        .update(Some(&app.admin_id()), site_settings(true, true))
        .await
        .unwrap();
    let category = app.category("Politics").await;
    let post = app.published_post("Parliament sits", &category).await;

    let pending = app
        .services
        .comments
        .add(Some(&app.reader_id()), post.id, comment("First!"))
        .await
        .unwrap();
    assert!(!pending.is_approved);
    assert_eq!(pending.author_id, Some(app.reader.id));

    let staff = app
        .services
        .comments
        .add(Some(&app.editor_id()), post.id, comment("Correction appended"))
        .await
        .unwrap();
    assert!(staff.is_approved);

    let public = app.services.comments.approved_for_post(post.id).await.unwrap();
    assert_eq!(public.len(), 1);

    let err = app
        .services
        .comments
        .approve(Some(&app.reader_id()), pending.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Only admins and editors can moderate comments");

    let all = app
        .services
        .comments
        .all_for_post(Some(&app.editor_id()), post.id)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    app.services
        .comments
        .approve(Some(&app.editor_id()), pending.id)
        .await
        .unwrap();
    let public = app.services.comments.approved_for_post(post.id).await.unwrap();
    assert_eq!(public.len(), 2);
}

#[tokio::test]
async fn comments_respect_site_settings_and_post_state() {
    let app = TestApp::new().await;
    let category = app.category("Culture").await;
    let post = app.published_post("Festival returns", &category).await;
    let draft = app
        .post_as(&app.admin, new_post("Not yet", category.id, PostStatus::Draft))
        .await;

    // no settings document yet: comments allowed, no moderation
    let open = app
        .services
        .comments
        .add(None, post.id, comment("Can't wait"))
        .await
        .unwrap();
    assert!(open.is_approved);
    assert_eq!(open.author_id, None);

    let err = app
        .services
        .comments
        .add(None, draft.id, comment("Early"))
        .await
        .unwrap_err();
    assert_eq!(err, AppError::not_found("Post"));

    let err = app
        .services
        .comments
        .add(
            None,
            post.id,
            NewComment {
                author_email: "not-an-email".into(),
                ..comment("Hello")
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "A valid email is required");

    let err = app
        .services
        .comments
        .add(None, post.id, comment("   "))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Comment cannot be empty");

    app.services
        .settings
        .update(Some(&app.admin_id()), site_settings(false, false))
        .await
        .unwrap();
    let err = app
        .services
        .comments
        .add(None, post.id, comment("Too late"))
        .await
        .unwrap_err();
    assert_eq!(err, AppError::forbidden("Comments are disabled"));
}

#[tokio::test]
async fn replies_stay_on_their_post_and_go_with_the_thread() {
    let app = TestApp::new().await;
    let category = app.category("Sports").await;
    let post = app.published_post("Derby day", &category).await;
    let other = app.published_post("Transfer news", &category).await;

    let root = app
        .services
        .comments
        .add(None, post.id, comment("What a match"))
        .await
        .unwrap();
    let reply = app
        .services
        .comments
        .add(
            None,
            post.id,
            NewComment {
                parent_id: Some(root.id),
                ..comment("Agreed")
            },
        )
        .await
        .unwrap();
    app.services
        .comments
        .add(
            None,
            post.id,
            NewComment {
                parent_id: Some(reply.id),
                ..comment("Same here")
            },
        )
        .await
        .unwrap();
    let standalone = app
        .services
        .comments
        .add(None, post.id, comment("Referee was poor"))
        .await
        .unwrap();

    let err = app
        .services
        .comments
        .add(
            None,
            other.id,
            NewComment {
                parent_id: Some(root.id),
                ..comment("Wrong thread")
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    app.services
        .comments
        .delete(Some(&app.admin_id()), root.id)
        .await
        .unwrap();
    let left = app.services.comments.approved_for_post(post.id).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, standalone.id);
}

#[tokio::test]
async fn dashboard_counts_posts_and_views() {
    let app = TestApp::new().await;
    let category = app.category("Business").await;
    app.category("Health").await;

    let popular = app.published_post("Port traffic doubles", &category).await;
    let quiet = app
        .post_as(&app.editor, new_post("Telecom merger", category.id, PostStatus::Published))
        .await;
    app.post_as(&app.editor, new_post("Draft budget", category.id, PostStatus::Draft))
        .await;
    let archived = app.published_post("Old news", &category).await;
    app.services
        .posts
        .update(
            Some(&app.admin_id()),
            archived.id,
            PostUpdate {
                title: archived.title.clone(),
                slug: archived.slug.clone(),
                description: archived.description.clone(),
                content: archived.content.clone(),
                category_id: archived.category_id,
                region_id: None,
                image_id: None,
                status: PostStatus::Archived,
                featured: false,
            },
        )
        .await
        .unwrap();

    for _ in 0..5 {
        app.services.posts.increment_view_count(popular.id).await.unwrap();
    }
    app.services.posts.increment_view_count(quiet.id).await.unwrap();
    app.services.posts.increment_view_count(quiet.id).await.unwrap();

    let stats = app.services.analytics.dashboard(Some(&app.admin_id())).await.unwrap();
    assert_eq!(stats.total_posts, 4);
    assert_eq!(stats.published_posts, 2);
    assert_eq!(stats.draft_posts, 1);
    assert_eq!(stats.archived_posts, 1);
    assert_eq!(stats.total_views, 7);
    // (5 + 2) / 2 rounded
    assert_eq!(stats.average_views, 4);
    assert_eq!(stats.posts_today, 2);
    assert_eq!(stats.active_categories, 2);
    assert_eq!(stats.top_posts[0].id, popular.id);
    assert_eq!(stats.top_posts.len(), 2);

    let editor_stats = app
        .services
        .analytics
        .dashboard(Some(&app.editor_id()))
        .await
        .unwrap();
    assert_eq!(editor_stats.total_posts, 2);
    assert_eq!(editor_stats.total_views, 2);
    assert_eq!(editor_stats.top_posts[0].id, quiet.id);

    let err = app
        .services
        .analytics
        .dashboard(Some(&app.reader_id()))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Only admins and editors can view analytics");
}
