use crate::model::{
    EventAddress, EventMenuSet, MealEvent, MealRequest, MealRequestItem, MenuItem, MenuItemComment,
    MenuSet, Notification, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage contract for the meal lifecycle entities.
///
/// Create calls assign ids and return the stored value. Finders skip
/// soft-deleted rows; soft-deleted rows stay in place so historical
/// references keep resolving. The duplicate-request rule is enforced here,
/// serialized with the insert, in addition to the lifecycle's own scan.
#[async_trait]
pub trait MealStore: Send + Sync {
    async fn create_event(&self, event: MealEvent) -> StoreResult<MealEvent>;
    async fn get_event(&self, id: u64) -> StoreResult<MealEvent>;
    async fn list_events(&self) -> StoreResult<Vec<MealEvent>>;
    async fn update_event(&self, event: MealEvent) -> StoreResult<MealEvent>;
    async fn soft_delete_event(&self, id: u64) -> StoreResult<()>;
    async fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<MealEvent>>;
    async fn upcoming_events(&self, now: DateTime<Utc>) -> StoreResult<Vec<MealEvent>>;
    async fn event_exists(&self, id: u64) -> StoreResult<bool>;

    async fn attach_menu_set(&self, link: EventMenuSet) -> StoreResult<EventMenuSet>;
    async fn get_menu_set_attachment(&self, id: u64) -> StoreResult<EventMenuSet>;
    async fn update_menu_set_attachment(&self, link: EventMenuSet) -> StoreResult<EventMenuSet>;
    async fn detach_menu_set(&self, id: u64) -> StoreResult<()>;
    async fn menu_sets_for_event(&self, event_id: u64) -> StoreResult<Vec<EventMenuSet>>;

    async fn attach_address(&self, event_id: u64, address_id: u64) -> StoreResult<()>;
    async fn detach_address(&self, event_id: u64, address_id: u64) -> StoreResult<()>;
    async fn addresses_for_event(&self, event_id: u64) -> StoreResult<Vec<u64>>;

    async fn create_request(&self, request: MealRequest) -> StoreResult<MealRequest>;
    async fn get_request(&self, id: u64) -> StoreResult<MealRequest>;
    async fn list_requests(&self) -> StoreResult<Vec<MealRequest>>;
    async fn requests_for_event(&self, event_id: u64) -> StoreResult<Vec<MealRequest>>;
    async fn requests_for_user(&self, user_id: u64) -> StoreResult<Vec<MealRequest>>;
    async fn update_request(&self, request: MealRequest) -> StoreResult<MealRequest>;
    async fn soft_delete_request(&self, id: u64) -> StoreResult<()>;
    async fn add_request_item(
        &self,
        request_id: u64,
        item: MealRequestItem,
    ) -> StoreResult<MealRequest>;
    async fn remove_request_item(&self, request_id: u64, item_id: u64)
    -> StoreResult<MealRequest>;

    async fn create_comment(&self, comment: MenuItemComment) -> StoreResult<MenuItemComment>;
    async fn get_comment(&self, id: u64) -> StoreResult<MenuItemComment>;
    async fn update_comment(&self, comment: MenuItemComment) -> StoreResult<MenuItemComment>;
    async fn soft_delete_comment(&self, id: u64) -> StoreResult<()>;
    async fn comments_for_event(&self, event_id: u64) -> StoreResult<Vec<MenuItemComment>>;
    async fn replies_to(&self, parent_id: u64) -> StoreResult<Vec<MenuItemComment>>;
    async fn comments_by_user(&self, user_id: u64) -> StoreResult<Vec<MenuItemComment>>;
    async fn recent_comments(&self, limit: usize) -> StoreResult<Vec<MenuItemComment>>;

    async fn create_notification(&self, notification: Notification) -> StoreResult<Notification>;
    async fn get_notification(&self, id: u64) -> StoreResult<Notification>;
    async fn update_notification(&self, notification: Notification) -> StoreResult<Notification>;
    async fn delete_notification(&self, id: u64) -> StoreResult<()>;
    async fn notifications_for_user(&self, user_id: u64) -> StoreResult<Vec<Notification>>;
    async fn unread_count(&self, user_id: u64) -> StoreResult<u64>;
    async fn undelivered_count(&self, user_id: u64) -> StoreResult<u64>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

/// Storage contract for the user directory and the menu/address catalog.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn create_user(&self, user: User) -> StoreResult<User>;
    async fn get_user(&self, id: u64) -> StoreResult<User>;
    async fn update_user(&self, user: User) -> StoreResult<User>;
    async fn soft_delete_user(&self, id: u64) -> StoreResult<()>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn create_menu_item(&self, item: MenuItem) -> StoreResult<MenuItem>;
    async fn get_menu_item(&self, id: u64) -> StoreResult<MenuItem>;
    async fn update_menu_item(&self, item: MenuItem) -> StoreResult<MenuItem>;
    async fn soft_delete_menu_item(&self, id: u64) -> StoreResult<()>;
    async fn list_menu_items(&self) -> StoreResult<Vec<MenuItem>>;
    async fn menu_item_exists(&self, id: u64) -> StoreResult<bool>;

    async fn create_menu_set(&self, set: MenuSet) -> StoreResult<MenuSet>;
    async fn get_menu_set(&self, id: u64) -> StoreResult<MenuSet>;
    async fn update_menu_set(&self, set: MenuSet) -> StoreResult<MenuSet>;
    async fn soft_delete_menu_set(&self, id: u64) -> StoreResult<()>;
    async fn list_menu_sets(&self) -> StoreResult<Vec<MenuSet>>;
    async fn menu_set_exists(&self, id: u64) -> StoreResult<bool>;

    async fn create_event_address(&self, address: EventAddress) -> StoreResult<EventAddress>;
    async fn get_event_address(&self, id: u64) -> StoreResult<EventAddress>;
    async fn update_event_address(&self, address: EventAddress) -> StoreResult<EventAddress>;
    async fn soft_delete_event_address(&self, id: u64) -> StoreResult<()>;
    async fn list_event_addresses(&self) -> StoreResult<Vec<EventAddress>>;
    async fn event_address_exists(&self, id: u64) -> StoreResult<bool>;
}

/// Combined store surface the lifecycle layer is wired against.
pub trait EngineStore: MealStore + DirectoryStore {}

impl<T: MealStore + DirectoryStore> EngineStore for T {}
