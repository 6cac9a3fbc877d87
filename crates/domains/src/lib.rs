//! rusty-press/crates/domains/src/lib.rs
//!
//! Domain models, the error type and the port traits of Rusty-Press.
//! Nothing in this crate performs I/O; adapters implement the ports.

pub mod errors;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_post_serializes_with_snake_case_status() {
        let now = Utc::now();
        let post = Post {
            id: Uuid::now_v7(),
            title: "Budget passes".into(),
            slug: "budget-passes".into(),
            description: "Parliament votes".into(),
            content: "<p>Full story</p>".into(),
            image_id: None,
            image_url: None,
            category_id: Uuid::now_v7(),
            region_id: None,
            author_id: Uuid::now_v7(),
            status: PostStatus::Published,
            featured: true,
            view_count: 0,
            published_at: Some(now),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["status"], "published");
        assert_eq!(json["featured"], true);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Editor".parse::<Role>().unwrap(), Role::Editor);
        assert!("owner".parse::<Role>().is_err());
    }
}
