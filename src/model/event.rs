//! Meal event model definitions and patch payloads.
//!
//! # Purpose
//! Defines the scheduled event record, its menu-set and address attachments,
//! and the partial-update payloads used by the event lifecycle.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled group meal with a reservation cutoff.
///
/// `cutoff_time` is the single authority for request mutability: once the
/// clock passes it, requests against this event are frozen for everyone.
/// It never exceeds `event_date`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MealEvent {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub event_duration_minutes: u32,
    pub cutoff_time: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_by: u64,
    pub updated_by: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewMealEvent {
    pub name: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    /// Zero means "use the configured default duration".
    pub event_duration_minutes: u32,
    pub cutoff_time: DateTime<Utc>,
}

/// Partial event update; absent fields are left untouched.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MealEventPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_duration_minutes: Option<u32>,
    pub cutoff_time: Option<DateTime<Utc>>,
}

/// A menu set offered at a specific event, with an optional display label
/// and note for that occasion.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EventMenuSet {
    pub id: u64,
    pub meal_event_id: u64,
    pub menu_set_id: u64,
    pub label: Option<String>,
    pub note: Option<String>,
    pub is_active: bool,
    pub created_by: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewEventMenuSet {
    pub menu_set_id: u64,
    pub label: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EventMenuSetPatch {
    pub label: Option<String>,
    pub note: Option<String>,
}
