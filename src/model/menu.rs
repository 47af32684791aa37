//! Catalog models: menu items, menu sets, and event addresses.
//!
//! These are admin-maintained reference data. Requests and comments validate
//! their item and address references against this catalog.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MenuItem {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Unit price in the smallest currency denomination.
    pub price_cents: u32,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub is_active: bool,
    pub created_by: u64,
    pub updated_by: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewMenuItem {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_cents: u32,
    pub image_url: Option<String>,
    pub is_available: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_cents: Option<u32>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

/// A named grouping of menu items that can be offered at events.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MenuSet {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    /// Member items, in insertion order. Membership is managed through the
    /// catalog lifecycle, which validates both ends exist.
    pub menu_item_ids: Vec<u64>,
    pub is_active: bool,
    pub created_by: u64,
    pub updated_by: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewMenuSet {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MenuSetPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A venue where a meal event can take place.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EventAddress {
    pub id: u64,
    pub address: String,
    pub is_active: bool,
    pub created_by: u64,
    pub updated_by: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewEventAddress {
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EventAddressPatch {
    pub address: Option<String>,
}
