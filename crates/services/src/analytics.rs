use std::sync::Arc;

use chrono::Utc;
use domains::{
    CategoryRepository, DashboardStats, Identity, PostListFilter, PostRepository, PostStatus,
    Result, Role, TopPost,
};

use crate::authz::Gate;
use crate::posts::scoped_posts;

const TOP_POSTS: usize = 5;

#[derive(Clone)]
pub struct AnalyticsService {
    gate: Gate,
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl AnalyticsService {
    pub fn new(
        gate: Gate,
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            gate,
            posts,
            categories,
        }
    }

    /// Dashboard figures over the posts the caller can administer.
    pub async fn dashboard(&self, identity: Option<&Identity>) -> Result<DashboardStats> {
        let user = self
            .gate
            .require(identity, Role::STAFF, "Only admins and editors can view analytics")
            .await?;
        let posts = scoped_posts(self.posts.list().await?, &user, PostListFilter::default());
        let today = Utc::now().date_naive();

        let mut stats = DashboardStats {
            total_posts: posts.len(),
            active_categories: self.categories.list_active().await?.len(),
            ..DashboardStats::default()
        };
        for post in &posts {
            stats.total_views += post.view_count;
            match post.status {
                PostStatus::Draft => stats.draft_posts += 1,
                PostStatus::Archived => stats.archived_posts += 1,
                PostStatus::Published => {
                    stats.published_posts += 1;
                    let day = post.published_at.unwrap_or(post.created_at).date_naive();
                    if day == today {
                        stats.posts_today += 1;
                    }
                }
            }
        }

        let published_views: u64 = posts
            .iter()
            .filter(|p| p.is_published())
            .map(|p| p.view_count)
            .sum();
        if stats.published_posts > 0 {
            let n = stats.published_posts as u64;
            stats.average_views = (published_views + n / 2) / n;
        }

        let mut top: Vec<_> = posts.iter().filter(|p| p.is_published()).collect();
        top.sort_by(|a, b| b.view_count.cmp(&a.view_count));
        stats.top_posts = top
            .into_iter()
            .take(TOP_POSTS)
            .map(|p| TopPost {
                id: p.id,
                title: p.title.clone(),
                slug: p.slug.clone(),
                view_count: p.view_count,
            })
            .collect();

        Ok(stats)
    }
}
