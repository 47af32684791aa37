use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Reminder,
    Confirmation,
    AdminMessage,
    EventInfo,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Reminder => "reminder",
            NotificationKind::Confirmation => "confirmation",
            NotificationKind::AdminMessage => "admin_message",
            NotificationKind::EventInfo => "event_info",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "reminder" => Ok(NotificationKind::Reminder),
            "confirmation" => Ok(NotificationKind::Confirmation),
            "admin_message" => Ok(NotificationKind::AdminMessage),
            "event_info" => Ok(NotificationKind::EventInfo),
            _ => Err(()),
        }
    }
}

/// A notification record addressed to one recipient.
///
/// Created only by the dispatcher. The `read`/`delivered` flags and their
/// timestamps are mutated only by the recipient; deletion is a hard delete,
/// records carry no soft-delete marker.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub id: u64,
    pub user_id: u64,
    pub kind: NotificationKind,
    pub message: String,
    /// Kind-specific structured payload; opaque to the engine.
    pub payload: serde_json::Value,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
