use domains::{AppError, CategoryUpdate, NewCategory, PostStatus, SettingsUpdate};
use integration_tests::{new_post, TestApp};

#[tokio::test]
async fn category_with_posts_cannot_be_deleted() {
    let app = TestApp::new().await;
    let politics = app.category("Politics").await;
    assert_eq!(politics.slug, "politics");

    let post = app.published_post("Election night", &politics).await;

    let err = app
        .services
        .categories
        .delete(Some(&app.admin_id()), politics.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot delete category with existing posts");
    assert!(app.services.categories.by_slug("politics").await.unwrap().is_some());

    app.services
        .posts
        .delete(Some(&app.admin_id()), post.id)
        .await
        .unwrap();
    app.services
        .categories
        .delete(Some(&app.admin_id()), politics.id)
        .await
        .unwrap();
    assert!(app.services.categories.by_slug("politics").await.unwrap().is_none());
}

#[tokio::test]
async fn slugs_are_unique() {
    let app = TestApp::new().await;
    app.category("Sports").await;

    let err = app
        .services
        .categories
        .create(
            Some(&app.editor_id()),
            NewCategory {
                name: "Sports & Games".into(),
                slug: "sports".into(),
                ..NewCategory::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn inactive_categories_drop_out_of_public_listing() {
    let app = TestApp::new().await;
    let tech = app.category("Technology").await;
    app.category("Health").await;

    app.services
        .categories
        .update(
            Some(&app.admin_id()),
            tech.id,
            CategoryUpdate {
                name: tech.name.clone(),
                slug: tech.slug.clone(),
                description: None,
                color: Some("#7c3aed".into()),
                is_active: false,
            },
        )
        .await
        .unwrap();

    let public: Vec<String> = app
        .services
        .categories
        .active()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.slug)
        .collect();
    assert_eq!(public, vec!["health".to_string()]);

    let all = app.services.categories.all(Some(&app.editor_id())).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn deleting_default_category_clears_setting() {
    let app = TestApp::new().await;
    let world = app.category("World").await;

    app.services
        .settings
        .update(
            Some(&app.admin_id()),
            SettingsUpdate {
                site_name: "Rusty-Press".into(),
                site_description: "News".into(),
                contact_email: "desk@press.test".into(),
                timezone: "Africa/Mogadishu".into(),
                default_category: Some(world.id),
                default_post_status: PostStatus::Draft,
                allow_comments: true,
                require_moderation: false,
            },
        )
        .await
        .unwrap();

    app.services
        .categories
        .delete(Some(&app.admin_id()), world.id)
        .await
        .unwrap();

    let settings = app.services.settings.get().await.unwrap().unwrap();
    assert_eq!(settings.default_category, None);
}

#[tokio::test]
async fn region_with_posts_cannot_be_deleted() {
    let app = TestApp::new().await;
    let category = app.category("Local").await;
    let banadir = app.region("Banadir").await;

    let mut input = new_post("Port expansion", category.id, PostStatus::Draft);
    input.region_id = Some(banadir.id);
    app.post_as(&app.admin, input).await;

    let err = app
        .services
        .regions
        .delete(Some(&app.admin_id()), banadir.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot delete region with existing posts");
}
