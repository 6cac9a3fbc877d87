//! Reader comments and their moderation.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use domains::{
    AppError, Comment, CommentRepository, Identity, NewComment, PostRepository, Result, Role,
    Settings, SettingsRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::authz::Gate;

const MODERATION_DENIED: &str = "Only admins and editors can moderate comments";

#[derive(Clone)]
pub struct CommentService {
    gate: Gate,
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl CommentService {
    pub fn new(
        gate: Gate,
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            gate,
            comments,
            posts,
            settings,
        }
    }

    /// Anyone may comment on a published post while comments are enabled.
    /// Staff comments and comments on unmoderated sites are approved at once.
    pub async fn add(
        &self,
        identity: Option<&Identity>,
        post_id: Uuid,
        input: NewComment,
    ) -> Result<Comment> {
        match self.posts.get(post_id).await? {
            Some(post) if post.is_published() => {}
            _ => return Err(AppError::not_found("Post")),
        }

        let settings = self.settings.get().await?;
        if !Settings::comments_allowed(settings.as_ref()) {
            return Err(AppError::forbidden("Comments are disabled"));
        }

        let author_name = input.author_name.trim().to_string();
        let author_email = input.author_email.trim().to_string();
        let content = input.content.trim().to_string();
        if author_name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        if !author_email.contains('@') {
            return Err(AppError::validation("A valid email is required"));
        }
        if content.is_empty() {
            return Err(AppError::validation("Comment cannot be empty"));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = self
                .comments
                .get(parent_id)
                .await?
                .ok_or_else(|| AppError::not_found("Parent comment"))?;
            if parent.post_id != post_id {
                return Err(AppError::validation(
                    "Parent comment belongs to a different post",
                ));
            }
        }

        let author = self.gate.caller(identity).await?;
        let is_staff = author.as_ref().is_some_and(|u| u.role.is_staff());
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::now_v7(),
            post_id,
            author_id: author.map(|u| u.id),
            author_name,
            author_email,
            content,
            is_approved: is_staff || !Settings::moderation_required(settings.as_ref()),
            parent_id: input.parent_id,
            created_at: now,
            updated_at: now,
        };
        self.comments.insert(comment.clone()).await?;
        info!(
            comment_id = %comment.id,
            post_id = %post_id,
            approved = comment.is_approved,
            "comment added"
        );
        Ok(comment)
    }

    pub async fn approved_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let mut comments = self.comments.list_by_post(post_id).await?;
        comments.retain(|c| c.is_approved);
        Ok(comments)
    }

    pub async fn all_for_post(
        &self,
        identity: Option<&Identity>,
        post_id: Uuid,
    ) -> Result<Vec<Comment>> {
        self.gate.require(identity, Role::STAFF, MODERATION_DENIED).await?;
        self.comments.list_by_post(post_id).await
    }

    pub async fn approve(&self, identity: Option<&Identity>, id: Uuid) -> Result<Comment> {
        self.gate.require(identity, Role::STAFF, MODERATION_DENIED).await?;
        let comment = self
            .comments
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment"))?;
        let approved = Comment {
            is_approved: true,
            updated_at: Utc::now(),
            ..comment
        };
        self.comments.update(approved.clone()).await?;
        info!(comment_id = %id, "comment approved");
        Ok(approved)
    }

    /// Deletes the comment together with every reply beneath it.
    pub async fn delete(&self, identity: Option<&Identity>, id: Uuid) -> Result<()> {
        self.gate.require(identity, Role::STAFF, MODERATION_DENIED).await?;
        let comment = self
            .comments
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment"))?;

        let thread = self.comments.list_by_post(comment.post_id).await?;
        let mut doomed: HashSet<Uuid> = HashSet::from([id]);
        loop {
            let before = doomed.len();
            for c in &thread {
                if c.parent_id.is_some_and(|p| doomed.contains(&p)) {
                    doomed.insert(c.id);
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        for comment_id in &doomed {
            self.comments.delete(*comment_id).await?;
        }
        info!(comment_id = %id, removed = doomed.len(), "comment thread deleted");
        Ok(())
    }
}
