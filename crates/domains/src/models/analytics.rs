use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Figures for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_posts: usize,
    pub published_posts: usize,
    pub draft_posts: usize,
    pub archived_posts: usize,
    pub total_views: u64,
    /// Rounded mean views per published post
    pub average_views: u64,
    /// Published posts whose publication (or creation) date is today, UTC
    pub posts_today: usize,
    pub active_categories: usize,
    pub top_posts: Vec<TopPost>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub view_count: u64,
}
