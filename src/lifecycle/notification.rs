//! Notification dispatch and inbox handling.
//!
//! A record is written for every recipient regardless of their
//! `notification_enabled` flag; that flag gates outbound transports, which
//! live outside this crate. Inbox state (read, delivered) belongs to the
//! recipient alone, and deletion here is a hard delete.
use crate::authz::ActorContext;
use crate::error::{EngineError, EngineResult};
use crate::model::{MealEvent, Notification, NotificationKind};
use crate::store::EngineStore;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

pub struct NotificationDispatcher {
    store: Arc<dyn EngineStore>,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<dyn EngineStore>) -> Self {
        Self { store }
    }

    /// Writes one notification record for `user_id`.
    pub async fn notify(
        &self,
        user_id: u64,
        kind: NotificationKind,
        message: String,
        payload: serde_json::Value,
    ) -> EngineResult<Notification> {
        if message.trim().is_empty() {
            return Err(EngineError::Validation(
                "notification message is required".into(),
            ));
        }
        self.store.get_user(user_id).await?;

        let notification = Notification {
            id: 0,
            user_id,
            kind,
            message,
            payload,
            read: false,
            read_at: None,
            delivered: false,
            delivered_at: None,
            created_at: Utc::now(),
        };
        let created = self.store.create_notification(notification).await?;
        tracing::info!(
            notification_id = created.id,
            user_id,
            kind = kind.as_str(),
            "notification dispatched"
        );
        Ok(created)
    }

    /// Request approved for `request_id` on `event`.
    pub async fn send_confirmation(
        &self,
        user_id: u64,
        event: &MealEvent,
        request_id: u64,
    ) -> EngineResult<Notification> {
        self.notify(
            user_id,
            NotificationKind::Confirmation,
            format!("Your meal request for {} has been approved", event.name),
            json!({
                "meal_event_id": event.id,
                "meal_request_id": request_id,
                "event_date": event.event_date.to_rfc3339(),
            }),
        )
        .await
    }

    /// Cutoff is approaching and the recipient has not submitted yet.
    pub async fn send_reminder(
        &self,
        user_id: u64,
        event: &MealEvent,
    ) -> EngineResult<Notification> {
        self.notify(
            user_id,
            NotificationKind::Reminder,
            format!("The request deadline for {} is approaching", event.name),
            json!({
                "meal_event_id": event.id,
                "cutoff_time": event.cutoff_time.to_rfc3339(),
            }),
        )
        .await
    }

    /// Free-form update about an event, e.g. a venue or menu change.
    pub async fn send_event_info(
        &self,
        user_id: u64,
        event: &MealEvent,
        info: &str,
    ) -> EngineResult<Notification> {
        self.notify(
            user_id,
            NotificationKind::EventInfo,
            format!("{}: {info}", event.name),
            json!({ "meal_event_id": event.id }),
        )
        .await
    }

    /// Broadcast-style message from an administrator.
    pub async fn send_admin_message(
        &self,
        user_id: u64,
        message: String,
        importance: &str,
    ) -> EngineResult<Notification> {
        self.notify(
            user_id,
            NotificationKind::AdminMessage,
            message,
            json!({ "importance": importance }),
        )
        .await
    }

    /// Full inbox for one user, newest first.
    pub async fn notifications_for(&self, user_id: u64) -> EngineResult<Vec<Notification>> {
        let mut notifications = self.store.notifications_for_user(user_id).await?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    /// Unread subset of the inbox, newest first.
    pub async fn unread(&self, user_id: u64) -> EngineResult<Vec<Notification>> {
        let mut notifications = self.notifications_for(user_id).await?;
        notifications.retain(|notification| !notification.read);
        Ok(notifications)
    }

    /// Inbox entries of a single kind, newest first.
    pub async fn by_kind(
        &self,
        user_id: u64,
        kind: NotificationKind,
    ) -> EngineResult<Vec<Notification>> {
        let mut notifications = self.notifications_for(user_id).await?;
        notifications.retain(|notification| notification.kind == kind);
        Ok(notifications)
    }

    /// Marks a notification read. Idempotent; the first read timestamp
    /// sticks.
    pub async fn mark_read(&self, id: u64, actor: &ActorContext) -> EngineResult<Notification> {
        let mut notification = self.store.get_notification(id).await?;
        require_recipient(&notification, actor)?;
        if notification.read {
            return Ok(notification);
        }
        notification.read = true;
        notification.read_at = Some(Utc::now());
        Ok(self.store.update_notification(notification).await?)
    }

    /// Transport acknowledgment. Idempotent; the first delivery timestamp
    /// sticks.
    pub async fn mark_delivered(&self, id: u64) -> EngineResult<Notification> {
        let mut notification = self.store.get_notification(id).await?;
        if notification.delivered {
            return Ok(notification);
        }
        notification.delivered = true;
        notification.delivered_at = Some(Utc::now());
        Ok(self.store.update_notification(notification).await?)
    }

    /// Hard delete. The recipient removes an entry from their own inbox;
    /// there is no trash to restore from.
    pub async fn delete_notification(&self, id: u64, actor: &ActorContext) -> EngineResult<()> {
        let notification = self.store.get_notification(id).await?;
        require_recipient(&notification, actor)?;
        Ok(self.store.delete_notification(id).await?)
    }

    pub async fn unread_count(&self, user_id: u64) -> EngineResult<u64> {
        Ok(self.store.unread_count(user_id).await?)
    }

    pub async fn undelivered_count(&self, user_id: u64) -> EngineResult<u64> {
        Ok(self.store.undelivered_count(user_id).await?)
    }
}

fn require_recipient(notification: &Notification, actor: &ActorContext) -> EngineResult<()> {
    if notification.user_id == actor.user_id {
        return Ok(());
    }
    Err(EngineError::Forbidden(
        "notification belongs to another user".into(),
    ))
}
