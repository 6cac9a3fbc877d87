//! # Post queries and mutations
//!
//! Listing is a single pass over the candidate set: fetch from the relevant
//! index, filter in memory, sort, truncate, then join category, region and
//! author with one lookup each per post.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    AppError, CategoryRepository, CommentRepository, EnrichedPost, Identity, MediaStorage,
    NewPost, Post, PostListFilter, PostRepository, PostStatus, PostUpdate, PublishedPostsFilter,
    RegionRepository, Result, Role, StorageId, UserRepository,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::authz::{can_view, ensure_owns, Gate};
use crate::{slug, Repositories};

/// How many posts `related` returns when the caller gives no limit.
pub const DEFAULT_RELATED_LIMIT: usize = 3;

#[derive(Clone)]
pub struct PostService {
    gate: Gate,
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    regions: Arc<dyn RegionRepository>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
    media: Arc<dyn MediaStorage>,
}

impl PostService {
    pub fn new(gate: Gate, repos: &Repositories) -> Self {
        Self {
            gate,
            posts: repos.posts.clone(),
            categories: repos.categories.clone(),
            regions: repos.regions.clone(),
            users: repos.users.clone(),
            comments: repos.comments.clone(),
            media: repos.media.clone(),
        }
    }

    #[instrument(skip(self, identity, input), fields(title = %input.title))]
    pub async fn create(&self, identity: Option<&Identity>, input: NewPost) -> Result<Post> {
        let user = self
            .gate
            .require(identity, Role::STAFF, "Only admins and editors can create posts")
            .await?;

        validate_text(&input.title, &input.description)?;
        let slug = slug::resolve(&input.slug, &input.title)?;
        if self.posts.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::conflict(format!("A post with slug '{slug}' already exists")));
        }
        self.ensure_references(input.category_id, input.region_id).await?;
        let image_url = self.resolve_image(input.image_id.as_ref()).await?;

        let now = Utc::now();
        let post = Post {
            id: Uuid::now_v7(),
            title: input.title,
            slug,
            description: input.description,
            content: input.content,
            image_id: input.image_id,
            image_url,
            category_id: input.category_id,
            region_id: input.region_id,
            author_id: user.id,
            status: input.status,
            featured: input.featured,
            view_count: 0,
            published_at: (input.status == PostStatus::Published).then_some(now),
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(post.clone()).await?;
        info!(post_id = %post.id, author_id = %user.id, status = %post.status, "post created");
        Ok(post)
    }

    #[instrument(skip(self, identity, input))]
    pub async fn update(
        &self,
        identity: Option<&Identity>,
        id: Uuid,
        input: PostUpdate,
    ) -> Result<Post> {
        let user = self
            .gate
            .require(identity, Role::STAFF, "Only admins and editors can update posts")
            .await?;
        let existing = self.posts.get(id).await?.ok_or_else(|| AppError::not_found("Post"))?;
        ensure_owns(&user, &existing, "You can only edit your own posts")?;

        validate_text(&input.title, &input.description)?;
        slug::validate(&input.slug)?;
        if let Some(other) = self.posts.find_by_slug(&input.slug).await? {
            if other.id != id {
                return Err(AppError::conflict(format!(
                    "A post with slug '{}' already exists",
                    input.slug
                )));
            }
        }
        self.ensure_references(input.category_id, input.region_id).await?;

        let image_changed = input.image_id != existing.image_id;
        let image_url = if image_changed {
            self.resolve_image(input.image_id.as_ref()).await?
        } else {
            existing.image_url.clone()
        };

        let now = Utc::now();
        let published_at = match existing.published_at {
            Some(at) => Some(at),
            None if input.status == PostStatus::Published => Some(now),
            None => None,
        };

        let updated = Post {
            id,
            title: input.title,
            slug: input.slug,
            description: input.description,
            content: input.content,
            image_id: input.image_id,
            image_url,
            category_id: input.category_id,
            region_id: input.region_id,
            author_id: existing.author_id,
            status: input.status,
            featured: input.featured,
            view_count: existing.view_count,
            published_at,
            created_at: existing.created_at,
            updated_at: now,
        };
        self.posts.update(updated.clone()).await?;

        if image_changed {
            if let Some(old) = existing.image_id.as_ref() {
                self.media.delete(old).await?;
            }
        }
        info!(post_id = %id, status = %updated.status, "post updated");
        Ok(updated)
    }

    /// Deletes the post, its stored image and its comments.
    #[instrument(skip(self, identity))]
    pub async fn delete(&self, identity: Option<&Identity>, id: Uuid) -> Result<()> {
        let user = self
            .gate
            .require(identity, Role::STAFF, "Only admins and editors can delete posts")
            .await?;
        let existing = self.posts.get(id).await?.ok_or_else(|| AppError::not_found("Post"))?;
        ensure_owns(&user, &existing, "You can only delete your own posts")?;

        if let Some(image) = existing.image_id.as_ref() {
            self.media.delete(image).await?;
        }
        self.comments.delete_by_post(id).await?;
        self.posts.delete(id).await?;
        info!(post_id = %id, deleted_by = %user.id, "post deleted");
        Ok(())
    }

    /// Public listing of published posts.
    pub async fn published(&self, filter: PublishedPostsFilter) -> Result<Vec<EnrichedPost>> {
        let mut posts = self.posts.list_by_status(PostStatus::Published).await?;

        // an unknown slug leaves its filter unapplied
        if let Some(slug) = filter.category_slug.as_deref() {
            if let Some(category) = self.categories.find_by_slug(slug).await? {
                posts.retain(|p| p.category_id == category.id);
            }
        }
        if let Some(slug) = filter.region_slug.as_deref() {
            if let Some(region) = self.regions.find_by_slug(slug).await? {
                posts.retain(|p| p.region_id == Some(region.id));
            }
        }
        if let Some(featured) = filter.featured {
            posts.retain(|p| p.featured == featured);
        }

        sort_by_recency(&mut posts);
        if let Some(limit) = filter.limit {
            posts.truncate(limit);
        }
        self.enrich(posts).await
    }

    /// Every post, for the admin tables. Editors only ever see their own.
    pub async fn all(
        &self,
        identity: Option<&Identity>,
        filter: PostListFilter,
    ) -> Result<Vec<EnrichedPost>> {
        let user = self
            .gate
            .require(identity, Role::STAFF, "Only admins and editors can view all posts")
            .await?;
        let posts = scoped_posts(self.posts.list().await?, &user, filter);
        self.enrich(posts).await
    }

    pub async fn by_slug(
        &self,
        identity: Option<&Identity>,
        slug: &str,
    ) -> Result<Option<EnrichedPost>> {
        let post = self.posts.find_by_slug(slug).await?;
        self.visible(identity, post).await
    }

    pub async fn by_id(
        &self,
        identity: Option<&Identity>,
        id: Uuid,
    ) -> Result<Option<EnrichedPost>> {
        let post = self.posts.get(id).await?;
        self.visible(identity, post).await
    }

    /// Case-insensitive substring search over published posts. Title hits
    /// rank first, then the most recently published. A blank term matches
    /// every published post.
    pub async fn search(&self, term: &str) -> Result<Vec<EnrichedPost>> {
        let needle = term.trim().to_lowercase();
        let mut hits: Vec<(bool, Post)> = self
            .posts
            .list_by_status(PostStatus::Published)
            .await?
            .into_iter()
            .filter(|p| p.matches_lowercase(&needle))
            .map(|p| (p.title_matches_lowercase(&needle), p))
            .collect();

        hits.sort_by(|(a_title, a), (b_title, b)| {
            b_title
                .cmp(a_title)
                .then_with(|| b.published_at.cmp(&a.published_at))
        });
        self.enrich(hits.into_iter().map(|(_, p)| p).collect()).await
    }

    /// Other published posts in the same category as the post at `slug`.
    pub async fn related(&self, slug: &str, limit: Option<usize>) -> Result<Vec<EnrichedPost>> {
        let current = match self.posts.find_by_slug(slug).await? {
            Some(post) if post.is_published() => post,
            _ => return Ok(Vec::new()),
        };

        let mut posts: Vec<Post> = self
            .posts
            .list_by_status(PostStatus::Published)
            .await?
            .into_iter()
            .filter(|p| p.category_id == current.category_id && p.id != current.id)
            .collect();
        sort_by_recency(&mut posts);
        posts.truncate(limit.unwrap_or(DEFAULT_RELATED_LIMIT));
        self.enrich(posts).await
    }

    /// Unknown ids are ignored.
    pub async fn increment_view_count(&self, id: Uuid) -> Result<()> {
        if !self.posts.increment_views(id).await? {
            warn!(post_id = %id, "view count increment for unknown post");
        }
        Ok(())
    }

    async fn visible(
        &self,
        identity: Option<&Identity>,
        post: Option<Post>,
    ) -> Result<Option<EnrichedPost>> {
        let Some(post) = post else {
            return Ok(None);
        };
        if !post.is_published() {
            let viewer = self.gate.caller(identity).await?;
            if !can_view(&post, viewer.as_ref()) {
                return Ok(None);
            }
        }
        Ok(self.enrich(vec![post]).await?.pop())
    }

    async fn ensure_references(&self, category_id: Uuid, region_id: Option<Uuid>) -> Result<()> {
        if self.categories.get(category_id).await?.is_none() {
            return Err(AppError::not_found("Category"));
        }
        if let Some(region_id) = region_id {
            if self.regions.get(region_id).await?.is_none() {
                return Err(AppError::not_found("Region"));
            }
        }
        Ok(())
    }

    async fn resolve_image(&self, image_id: Option<&StorageId>) -> Result<Option<String>> {
        match image_id {
            Some(id) => match self.media.url(id).await? {
                Some(url) => Ok(Some(url)),
                None => Err(AppError::not_found("Image")),
            },
            None => Ok(None),
        }
    }

    async fn enrich(&self, posts: Vec<Post>) -> Result<Vec<EnrichedPost>> {
        let mut enriched = Vec::with_capacity(posts.len());
        for post in posts {
            let category = self.categories.get(post.category_id).await?;
            let region = match post.region_id {
                Some(region_id) => self.regions.get(region_id).await?,
                None => None,
            };
            let author = self.users.get(post.author_id).await?.map(|u| u.author_summary());
            enriched.push(EnrichedPost {
                post,
                category,
                region,
                author,
            });
        }
        Ok(enriched)
    }
}

/// Newest publication first; posts never published sort last.
fn sort_by_recency(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Applies the staff listing rules: status filter, editor scoping, newest first.
pub(crate) fn scoped_posts(
    mut posts: Vec<Post>,
    user: &domains::User,
    filter: PostListFilter,
) -> Vec<Post> {
    if let Some(status) = filter.status {
        posts.retain(|p| p.status == status);
    }
    if user.role == Role::Editor {
        posts.retain(|p| p.author_id == user.id);
    } else if let Some(author_id) = filter.author_id {
        posts.retain(|p| p.author_id == author_id);
    }
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}

fn validate_text(title: &str, description: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    if description.trim().is_empty() {
        return Err(AppError::validation("Description is required"));
    }
    Ok(())
}
