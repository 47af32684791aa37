use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rated comment on a menu item, scoped to one meal event.
///
/// `parent_id` links replies into a tree; a reply always belongs to the same
/// event as its parent. Deletion is soft so reply chains stay resolvable.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MenuItemComment {
    pub id: u64,
    pub user_id: u64,
    pub meal_event_id: u64,
    pub menu_item_id: u64,
    pub comment: String,
    /// Star rating, 1 through 5.
    pub rating: u8,
    pub parent_id: Option<u64>,
    pub is_active: bool,
    pub created_by: u64,
    pub updated_by: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewComment {
    pub meal_event_id: u64,
    pub menu_item_id: u64,
    pub comment: String,
    pub rating: u8,
    pub parent_id: Option<u64>,
}

/// Partial comment update; absent fields are left untouched.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CommentPatch {
    pub comment: Option<String>,
    pub rating: Option<u8>,
}
