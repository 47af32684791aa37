//! Meal request model definitions.
//!
//! # Purpose
//! Defines the per-user reservation against a meal event, its item lines,
//! and the submission/patch payloads used by the request lifecycle.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approval workflow state of a meal request.
///
/// Every request starts as `Pending`. Transitions are admin-initiated and
/// intentionally unconstrained in shape; the expected flow is
/// pending to approved or rejected, approved to completed or cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "completed" => Ok(RequestStatus::Completed),
            "cancelled" => Ok(RequestStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// One user's reservation against one meal event.
///
/// At most one non-withdrawn request may exist per `(user_id, meal_event_id)`
/// pair. Withdrawal is a soft delete; a withdrawn request frees the slot.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MealRequest {
    pub id: u64,
    pub user_id: u64,
    pub meal_event_id: u64,
    pub menu_set_id: Option<u64>,
    pub event_address_id: Option<u64>,
    pub status: RequestStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Item lines, in insertion order. Owned by the request; withdrawn
    /// requests keep their items for historical queries.
    pub items: Vec<MealRequestItem>,
    pub is_active: bool,
    pub created_by: u64,
    pub updated_by: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MealRequestItem {
    pub id: u64,
    pub menu_item_id: u64,
    pub quantity: u32,
    pub is_selected: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewMealRequest {
    pub meal_event_id: u64,
    pub menu_set_id: Option<u64>,
    pub event_address_id: Option<u64>,
    pub items: Vec<NewRequestItem>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewRequestItem {
    pub menu_item_id: u64,
    pub quantity: u32,
    pub is_selected: bool,
    pub notes: Option<String>,
}

/// Partial request update; absent fields are left untouched.
///
/// Only the menu set and address selections are patchable. Status changes go
/// through the dedicated admin transition, and items through the item
/// operations, so neither appears here.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MealRequestPatch {
    pub menu_set_id: Option<u64>,
    pub event_address_id: Option<u64>,
}
