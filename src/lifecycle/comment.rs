//! Comment thread engine.
//!
//! # Purpose
//! Rated menu-item comments scoped to a meal event, with one level of reply
//! nesting per query. Comments are never cutoff-gated; discussion stays open
//! after requests freeze.
//!
//! # Key invariants
//! - A reply and its parent always share the same event.
//! - Edits and deletions are author-only. Admins have no override here.
use crate::authz::ActorContext;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::model::{CommentPatch, MenuItemComment, NewComment};
use crate::store::{EngineStore, StoreError};
use chrono::Utc;
use std::sync::Arc;

pub struct CommentThreads {
    store: Arc<dyn EngineStore>,
    config: EngineConfig,
}

impl CommentThreads {
    pub fn new(store: Arc<dyn EngineStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub async fn create_comment(
        &self,
        new: NewComment,
        actor: &ActorContext,
    ) -> EngineResult<MenuItemComment> {
        self.store.get_event(new.meal_event_id).await?;
        if !self.store.menu_item_exists(new.menu_item_id).await? {
            return Err(EngineError::NotFound(format!(
                "menu item {} not found",
                new.menu_item_id
            )));
        }
        if new.comment.trim().is_empty() {
            return Err(EngineError::Validation("comment text is required".into()));
        }
        validate_rating(new.rating)?;

        if let Some(parent_id) = new.parent_id {
            match self.store.get_comment(parent_id).await {
                Ok(parent) if parent.meal_event_id != new.meal_event_id => {
                    return Err(EngineError::Validation(
                        "parent comment does not belong to this meal event".into(),
                    ));
                }
                Ok(_) => {}
                Err(StoreError::NotFound(_)) => {
                    return Err(EngineError::Validation("parent comment not found".into()));
                }
                Err(err) => return Err(err.into()),
            }
        }

        let now = Utc::now();
        let comment = MenuItemComment {
            id: 0,
            user_id: actor.user_id,
            meal_event_id: new.meal_event_id,
            menu_item_id: new.menu_item_id,
            comment: new.comment,
            rating: new.rating,
            parent_id: new.parent_id,
            is_active: true,
            created_by: actor.user_id,
            updated_by: actor.user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        Ok(self.store.create_comment(comment).await?)
    }

    pub async fn update_comment(
        &self,
        id: u64,
        patch: CommentPatch,
        actor: &ActorContext,
    ) -> EngineResult<MenuItemComment> {
        let mut comment = self.store.get_comment(id).await?;
        require_author(&comment, actor)?;

        if let Some(text) = patch.comment {
            if text.trim().is_empty() {
                return Err(EngineError::Validation("comment text is required".into()));
            }
            comment.comment = text;
        }
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
            comment.rating = rating;
        }
        comment.updated_by = actor.user_id;
        comment.updated_at = Utc::now();
        Ok(self.store.update_comment(comment).await?)
    }

    /// Soft delete, so replies under this comment stay resolvable.
    pub async fn delete_comment(&self, id: u64, actor: &ActorContext) -> EngineResult<()> {
        let comment = self.store.get_comment(id).await?;
        require_author(&comment, actor)?;
        Ok(self.store.soft_delete_comment(id).await?)
    }

    /// Top-level comments for an event, oldest first.
    pub async fn list_comments(&self, event_id: u64) -> EngineResult<Vec<MenuItemComment>> {
        if !self.store.event_exists(event_id).await? {
            return Err(EngineError::NotFound(format!(
                "meal event {event_id} not found"
            )));
        }
        let mut comments = self.store.comments_for_event(event_id).await?;
        comments.retain(|comment| comment.parent_id.is_none());
        comments.sort_by_key(|comment| comment.created_at);
        Ok(comments)
    }

    /// Direct replies to one comment, oldest first. Deeper levels come from
    /// calling this again on each reply. The parent itself may already be
    /// soft-deleted; its replies still list.
    pub async fn list_replies(&self, comment_id: u64) -> EngineResult<Vec<MenuItemComment>> {
        let mut replies = self.store.replies_to(comment_id).await?;
        replies.sort_by_key(|comment| comment.created_at);
        Ok(replies)
    }

    /// Everything one user has written, newest first.
    pub async fn user_comments(&self, user_id: u64) -> EngineResult<Vec<MenuItemComment>> {
        let mut comments = self.store.comments_by_user(user_id).await?;
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    /// Newest comments across all events. `limit` falls back to the
    /// configured default when absent.
    pub async fn recent_comments(
        &self,
        limit: Option<usize>,
    ) -> EngineResult<Vec<MenuItemComment>> {
        let limit = limit.unwrap_or(self.config.recent_comments_limit);
        Ok(self.store.recent_comments(limit).await?)
    }
}

fn require_author(comment: &MenuItemComment, actor: &ActorContext) -> EngineResult<()> {
    if comment.user_id == actor.user_id {
        return Ok(());
    }
    Err(EngineError::Forbidden(
        "comment belongs to another user".into(),
    ))
}

fn validate_rating(rating: u8) -> EngineResult<()> {
    if (1..=5).contains(&rating) {
        return Ok(());
    }
    Err(EngineError::Validation(
        "rating must be between 1 and 5".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::validate_rating;

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(6).is_err());
    }
}
