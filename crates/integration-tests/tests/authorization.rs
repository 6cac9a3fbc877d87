use std::sync::Arc;

use chrono::Utc;
use domains::{
    AppError, Identity, MockCategoryRepository, MockCommentRepository, MockMediaStorage,
    MockPostRepository, MockRegionRepository, MockSettingsRepository, MockUserRepository,
    NewCategory, NewRegion, PostListFilter, PostStatus, PostUpdate, Role, User,
};
use integration_tests::{new_post, TestApp};
use services::{Repositories, Services, UploadPolicy};
use uuid::Uuid;

fn stored_user(external_id: &str, role: Role) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        external_id: external_id.into(),
        email: format!("{external_id}@press.test"),
        first_name: None,
        last_name: None,
        image_url: None,
        role,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Services over mocks that panic on any call nobody expected.
fn services_with(users: MockUserRepository, posts: MockPostRepository) -> Services {
    let repos = Repositories {
        users: Arc::new(users),
        categories: Arc::new(MockCategoryRepository::new()),
        regions: Arc::new(MockRegionRepository::new()),
        posts: Arc::new(posts),
        comments: Arc::new(MockCommentRepository::new()),
        settings: Arc::new(MockSettingsRepository::new()),
        media: Arc::new(MockMediaStorage::new()),
    };
    Services::new(repos, UploadPolicy::default(), None)
}

#[tokio::test]
async fn reader_cannot_create_posts_and_nothing_is_written() {
    let reader = stored_user("user_reader", Role::User);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_external_id()
        .times(1)
        .returning(move |_| Ok(Some(reader.clone())));
    let mut posts = MockPostRepository::new();
    posts.expect_insert().times(0);

    let services = services_with(users, posts);
    let err = services
        .posts
        .create(
            Some(&Identity::new("user_reader")),
            new_post("Sneaky", Uuid::now_v7(), PostStatus::Published),
        )
        .await
        .unwrap_err();
    assert_eq!(err, AppError::forbidden("Only admins and editors can create posts"));
}

#[tokio::test]
async fn anonymous_mutations_are_unauthenticated() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_external_id().times(0);
    let services = services_with(users, MockPostRepository::new());

    let err = services
        .categories
        .create(
            None,
            NewCategory {
                name: "Politics".into(),
                ..NewCategory::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, AppError::Unauthenticated);

    let err = services.analytics.dashboard(None).await.unwrap_err();
    assert_eq!(err, AppError::Unauthenticated);
}

#[tokio::test]
async fn unknown_identity_is_forbidden() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_external_id().returning(|_| Ok(None));
    let services = services_with(users, MockPostRepository::new());

    let err = services
        .users
        .list(Some(&Identity::new("user_ghost")))
        .await
        .unwrap_err();
    assert_eq!(err, AppError::forbidden("Only admins can view all users"));
}

#[tokio::test]
async fn role_gates_on_taxonomy() {
    let app = TestApp::new().await;

    let err = app
        .services
        .categories
        .create(
            Some(&app.reader_id()),
            NewCategory {
                name: "Opinion".into(),
                ..NewCategory::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Only admins and editors can create categories");
    assert!(app.services.categories.by_slug("opinion").await.unwrap().is_none());

    // editors may create categories but not delete them
    let created = app
        .services
        .categories
        .create(
            Some(&app.editor_id()),
            NewCategory {
                name: "Opinion".into(),
                ..NewCategory::default()
            },
        )
        .await
        .unwrap();
    let err = app
        .services
        .categories
        .delete(Some(&app.editor_id()), created.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Only admins can delete categories");

    let err = app
        .services
        .regions
        .create(
            Some(&app.editor_id()),
            NewRegion {
                name: "Galmudug".into(),
                country: "Somalia".into(),
                ..NewRegion::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Only admins can create regions");
}

#[tokio::test]
async fn editors_only_touch_their_own_posts() {
    let app = TestApp::new().await;
    let category = app.category("Politics").await;
    let admins = app.published_post("Cabinet reshuffle", &category).await;
    let editors = app
        .post_as(&app.editor, new_post("Council vote", category.id, PostStatus::Draft))
        .await;

    let change = PostUpdate {
        title: "Rewritten".into(),
        slug: admins.slug.clone(),
        description: admins.description.clone(),
        content: admins.content.clone(),
        category_id: admins.category_id,
        region_id: None,
        image_id: None,
        status: admins.status,
        featured: false,
    };
    let err = app
        .services
        .posts
        .update(Some(&app.editor_id()), admins.id, change.clone())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "You can only edit your own posts");

    let err = app
        .services
        .posts
        .delete(Some(&app.editor_id()), admins.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "You can only delete your own posts");

    // the denied calls left the post untouched
    let untouched = app
        .services
        .posts
        .by_id(Some(&app.admin_id()), admins.id)
        .await
        .unwrap()
        .expect("post still exists");
    assert_eq!(untouched.post.title, "Cabinet reshuffle");
    assert_eq!(untouched.post.updated_at, admins.updated_at);

    // admins may edit anything
    let updated = app
        .services
        .posts
        .update(Some(&app.admin_id()), admins.id, change)
        .await
        .unwrap();
    assert_eq!(updated.title, "Rewritten");
    assert_eq!(updated.author_id, app.admin.id);

    app.services
        .posts
        .delete(Some(&app.editor_id()), editors.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn staff_listing_is_scoped_for_editors() {
    let app = TestApp::new().await;
    let category = app.category("Sports").await;
    app.published_post("Admin story", &category).await;
    app.post_as(&app.editor, new_post("Editor draft", category.id, PostStatus::Draft))
        .await;
    app.post_as(&app.editor, new_post("Editor story", category.id, PostStatus::Published))
        .await;

    let mine = app
        .services
        .posts
        .all(Some(&app.editor_id()), PostListFilter::default())
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|p| p.post.author_id == app.editor.id));

    // the author filter cannot widen an editor's view
    let widened = app
        .services
        .posts
        .all(
            Some(&app.editor_id()),
            PostListFilter {
                author_id: Some(app.admin.id),
                ..PostListFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(widened.len(), 2);

    let drafts = app
        .services
        .posts
        .all(
            Some(&app.admin_id()),
            PostListFilter {
                status: Some(PostStatus::Draft),
                ..PostListFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(drafts.len(), 1);

    let err = app
        .services
        .posts
        .all(Some(&app.reader_id()), PostListFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn only_admins_change_roles() {
    let app = TestApp::new().await;

    let err = app
        .services
        .users
        .update_role(Some(&app.editor_id()), app.reader.id, Role::Admin)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Only admins can update user roles");

    let promoted = app
        .services
        .users
        .update_role(Some(&app.admin_id()), app.reader.id, Role::Editor)
        .await
        .unwrap();
    assert_eq!(promoted.role, Role::Editor);

    // the new role takes effect on the next call, token unchanged
    let category = app.category("Health").await;
    app.services
        .posts
        .create(
            Some(&app.reader_id()),
            new_post("Promoted author", category.id, PostStatus::Draft),
        )
        .await
        .unwrap();
}
