//! In-memory implementation of the meal store.
//!
//! # Purpose
//! This store implements the `MealStore` and `DirectoryStore` traits entirely
//! in memory using `HashMap`s guarded by `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no external dependencies)
//! - embedding deployments where durability is not required
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: write locks serialize mutations, so
//!   check-then-insert sequences (the duplicate-request rule, the unique-email
//!   rule) hold under concurrent calls within one process.
//! - **No multi-node coordination**: multiple instances have independent state.
//!
//! # Soft deletes
//! Rows are never removed on soft delete; `deleted_at` is set and finders skip
//! the row. Requests referencing a soft-deleted event therefore keep resolving
//! in historical listings. Notifications are the exception: recipients hard
//! delete them.
//!
//! # Performance characteristics
//! - Reads are cheap and concurrent (many readers).
//! - Writes are serialized per map (write lock per structure).
//! - Filtered queries scan values; acceptable for the small in-memory
//!   workloads this backend targets.
//!
//! # Metrics
//! This store updates a small set of gauges/counters so observability behavior
//! stays consistent with durable backends.
use super::{DirectoryStore, MealStore, StoreError, StoreResult};
use crate::model::{
    EventAddress, EventMenuSet, MealEvent, MealRequest, MealRequestItem, MenuItem, MenuItemComment,
    MenuSet, Notification, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// In-memory meal store.
///
/// ## Data structures
/// Authoritative state lives in `HashMap`s keyed by row id. Ids are assigned
/// from a process-wide counter at create time, so an id never repeats across
/// the life of the store, not even across entity types.
///
/// All maps are wrapped in `Arc<RwLock<...>>` so:
/// - the store can be shared across async callers
/// - reads can proceed concurrently
/// - writes are serialized to preserve invariants
pub struct InMemoryStore {
    /// Next row id source. Also covers request item ids.
    next_id: AtomicU64,
    /// Directory of registered users keyed by id.
    users: Arc<RwLock<HashMap<u64, User>>>,
    /// Meal events keyed by id.
    events: Arc<RwLock<HashMap<u64, MealEvent>>>,
    /// Menu-set attachments on events, keyed by attachment id.
    event_menu_sets: Arc<RwLock<HashMap<u64, EventMenuSet>>>,
    /// Address ids attached per event.
    event_addresses: Arc<RwLock<HashMap<u64, Vec<u64>>>>,
    /// Meal requests keyed by id; item lines live inside the request row.
    requests: Arc<RwLock<HashMap<u64, MealRequest>>>,
    /// Menu item comments keyed by id.
    comments: Arc<RwLock<HashMap<u64, MenuItemComment>>>,
    /// Notification records keyed by id.
    notifications: Arc<RwLock<HashMap<u64, Notification>>>,
    /// Menu item catalog keyed by id.
    menu_items: Arc<RwLock<HashMap<u64, MenuItem>>>,
    /// Menu set catalog keyed by id.
    menu_sets: Arc<RwLock<HashMap<u64, MenuSet>>>,
    /// Event address catalog keyed by id.
    addresses: Arc<RwLock<HashMap<u64, EventAddress>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            users: Arc::new(RwLock::new(HashMap::new())),
            events: Arc::new(RwLock::new(HashMap::new())),
            event_menu_sets: Arc::new(RwLock::new(HashMap::new())),
            event_addresses: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(HashMap::new())),
            comments: Arc::new(RwLock::new(HashMap::new())),
            notifications: Arc::new(RwLock::new(HashMap::new())),
            menu_items: Arc::new(RwLock::new(HashMap::new())),
            menu_sets: Arc::new(RwLock::new(HashMap::new())),
            addresses: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MealStore for InMemoryStore {
    async fn create_event(&self, mut event: MealEvent) -> StoreResult<MealEvent> {
        let mut events = self.events.write().await;
        event.id = self.next_id();
        events.insert(event.id, event.clone());
        metrics::gauge!("mealsync_events_total")
            .set(events.values().filter(|e| e.deleted_at.is_none()).count() as f64);
        Ok(event)
    }

    async fn get_event(&self, id: u64) -> StoreResult<MealEvent> {
        self.events
            .read()
            .await
            .get(&id)
            .filter(|event| event.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| StoreError::NotFound("meal event".into()))
    }

    async fn list_events(&self) -> StoreResult<Vec<MealEvent>> {
        Ok(self
            .events
            .read()
            .await
            .values()
            .filter(|event| event.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn update_event(&self, event: MealEvent) -> StoreResult<MealEvent> {
        let mut events = self.events.write().await;
        if !events.contains_key(&event.id) {
            return Err(StoreError::NotFound("meal event".into()));
        }
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn soft_delete_event(&self, id: u64) -> StoreResult<()> {
        // Rows stay in the map so existing requests keep a resolvable parent;
        // finders stop returning the event from here on.
        let mut events = self.events.write().await;
        let event = events
            .get_mut(&id)
            .filter(|event| event.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("meal event".into()))?;
        event.is_active = false;
        event.deleted_at = Some(Utc::now());
        metrics::gauge!("mealsync_events_total")
            .set(events.values().filter(|e| e.deleted_at.is_none()).count() as f64);
        Ok(())
    }

    async fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<MealEvent>> {
        let mut items: Vec<MealEvent> = self
            .events
            .read()
            .await
            .values()
            .filter(|event| {
                event.deleted_at.is_none()
                    && event.event_date >= start
                    && event.event_date <= end
            })
            .cloned()
            .collect();
        items.sort_by_key(|event| event.event_date);
        Ok(items)
    }

    async fn upcoming_events(&self, now: DateTime<Utc>) -> StoreResult<Vec<MealEvent>> {
        let mut items: Vec<MealEvent> = self
            .events
            .read()
            .await
            .values()
            .filter(|event| {
                event.deleted_at.is_none() && event.is_active && event.event_date >= now
            })
            .cloned()
            .collect();
        items.sort_by_key(|event| event.event_date);
        Ok(items)
    }

    async fn event_exists(&self, id: u64) -> StoreResult<bool> {
        Ok(self
            .events
            .read()
            .await
            .get(&id)
            .is_some_and(|event| event.deleted_at.is_none()))
    }

    async fn attach_menu_set(&self, mut link: EventMenuSet) -> StoreResult<EventMenuSet> {
        // Attachments are scoped to an event and a catalog set; creation fails
        // if either end is missing.
        if !self.event_exists(link.meal_event_id).await? {
            return Err(StoreError::NotFound("meal event".into()));
        }
        if !self.menu_set_exists(link.menu_set_id).await? {
            return Err(StoreError::NotFound("menu set".into()));
        }
        let mut links = self.event_menu_sets.write().await;
        let duplicate = links.values().any(|existing| {
            existing.meal_event_id == link.meal_event_id
                && existing.menu_set_id == link.menu_set_id
                && existing.deleted_at.is_none()
        });
        if duplicate {
            return Err(StoreError::Conflict(
                "menu set already attached to event".into(),
            ));
        }
        link.id = self.next_id();
        links.insert(link.id, link.clone());
        Ok(link)
    }

    async fn get_menu_set_attachment(&self, id: u64) -> StoreResult<EventMenuSet> {
        self.event_menu_sets
            .read()
            .await
            .get(&id)
            .filter(|link| link.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| StoreError::NotFound("menu set attachment".into()))
    }

    async fn update_menu_set_attachment(&self, link: EventMenuSet) -> StoreResult<EventMenuSet> {
        let mut links = self.event_menu_sets.write().await;
        if !links.contains_key(&link.id) {
            return Err(StoreError::NotFound("menu set attachment".into()));
        }
        links.insert(link.id, link.clone());
        Ok(link)
    }

    async fn detach_menu_set(&self, id: u64) -> StoreResult<()> {
        let mut links = self.event_menu_sets.write().await;
        let link = links
            .get_mut(&id)
            .filter(|link| link.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("menu set attachment".into()))?;
        link.is_active = false;
        link.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn menu_sets_for_event(&self, event_id: u64) -> StoreResult<Vec<EventMenuSet>> {
        Ok(self
            .event_menu_sets
            .read()
            .await
            .values()
            .filter(|link| link.meal_event_id == event_id && link.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn attach_address(&self, event_id: u64, address_id: u64) -> StoreResult<()> {
        if !self.event_exists(event_id).await? {
            return Err(StoreError::NotFound("meal event".into()));
        }
        if !self.event_address_exists(address_id).await? {
            return Err(StoreError::NotFound("event address".into()));
        }
        let mut attached = self.event_addresses.write().await;
        let entry = attached.entry(event_id).or_default();
        if entry.contains(&address_id) {
            return Err(StoreError::Conflict(
                "address already attached to event".into(),
            ));
        }
        entry.push(address_id);
        Ok(())
    }

    async fn detach_address(&self, event_id: u64, address_id: u64) -> StoreResult<()> {
        let mut attached = self.event_addresses.write().await;
        let entry = attached
            .get_mut(&event_id)
            .ok_or_else(|| StoreError::NotFound("address attachment".into()))?;
        let position = entry
            .iter()
            .position(|id| *id == address_id)
            .ok_or_else(|| StoreError::NotFound("address attachment".into()))?;
        entry.remove(position);
        Ok(())
    }

    async fn addresses_for_event(&self, event_id: u64) -> StoreResult<Vec<u64>> {
        Ok(self
            .event_addresses
            .read()
            .await
            .get(&event_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_request(&self, mut request: MealRequest) -> StoreResult<MealRequest> {
        // Requests are scoped to an event; creation fails if the event row is
        // missing or already soft-deleted.
        if !self.event_exists(request.meal_event_id).await? {
            return Err(StoreError::NotFound("meal event".into()));
        }
        // The one-request-per-user-per-event rule is re-checked here, under
        // the write lock, so two concurrent submissions cannot both land.
        let mut requests = self.requests.write().await;
        let duplicate = requests.values().any(|existing| {
            existing.meal_event_id == request.meal_event_id
                && existing.user_id == request.user_id
                && existing.deleted_at.is_none()
        });
        if duplicate {
            return Err(StoreError::Conflict(
                "request exists for user and event".into(),
            ));
        }
        request.id = self.next_id();
        for item in &mut request.items {
            item.id = self.next_id();
        }
        requests.insert(request.id, request.clone());
        metrics::counter!("mealsync_request_changes_total", "op" => "created").increment(1);
        metrics::gauge!("mealsync_requests_total")
            .set(requests.values().filter(|r| r.deleted_at.is_none()).count() as f64);
        Ok(request)
    }

    async fn get_request(&self, id: u64) -> StoreResult<MealRequest> {
        self.requests
            .read()
            .await
            .get(&id)
            .filter(|request| request.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| StoreError::NotFound("meal request".into()))
    }

    async fn list_requests(&self) -> StoreResult<Vec<MealRequest>> {
        Ok(self
            .requests
            .read()
            .await
            .values()
            .filter(|request| request.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn requests_for_event(&self, event_id: u64) -> StoreResult<Vec<MealRequest>> {
        Ok(self
            .requests
            .read()
            .await
            .values()
            .filter(|request| request.meal_event_id == event_id && request.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn requests_for_user(&self, user_id: u64) -> StoreResult<Vec<MealRequest>> {
        Ok(self
            .requests
            .read()
            .await
            .values()
            .filter(|request| request.user_id == user_id && request.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn update_request(&self, request: MealRequest) -> StoreResult<MealRequest> {
        let mut requests = self.requests.write().await;
        if !requests.contains_key(&request.id) {
            return Err(StoreError::NotFound("meal request".into()));
        }
        requests.insert(request.id, request.clone());
        metrics::counter!("mealsync_request_changes_total", "op" => "updated").increment(1);
        Ok(request)
    }

    async fn soft_delete_request(&self, id: u64) -> StoreResult<()> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&id)
            .filter(|request| request.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("meal request".into()))?;
        request.is_active = false;
        request.deleted_at = Some(Utc::now());
        metrics::counter!("mealsync_request_changes_total", "op" => "withdrawn").increment(1);
        metrics::gauge!("mealsync_requests_total")
            .set(requests.values().filter(|r| r.deleted_at.is_none()).count() as f64);
        Ok(())
    }

    async fn add_request_item(
        &self,
        request_id: u64,
        mut item: MealRequestItem,
    ) -> StoreResult<MealRequest> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&request_id)
            .filter(|request| request.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("meal request".into()))?;
        item.id = self.next_id();
        request.items.push(item);
        let updated = request.clone();
        metrics::counter!("mealsync_request_changes_total", "op" => "updated").increment(1);
        Ok(updated)
    }

    async fn remove_request_item(
        &self,
        request_id: u64,
        item_id: u64,
    ) -> StoreResult<MealRequest> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&request_id)
            .filter(|request| request.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("meal request".into()))?;
        let before = request.items.len();
        request.items.retain(|item| item.id != item_id);
        if request.items.len() == before {
            return Err(StoreError::NotFound("request item".into()));
        }
        let updated = request.clone();
        metrics::counter!("mealsync_request_changes_total", "op" => "updated").increment(1);
        Ok(updated)
    }

    async fn create_comment(&self, mut comment: MenuItemComment) -> StoreResult<MenuItemComment> {
        // Comments are scoped to an event; creation fails if the event is gone.
        if !self.event_exists(comment.meal_event_id).await? {
            return Err(StoreError::NotFound("meal event".into()));
        }
        let mut comments = self.comments.write().await;
        comment.id = self.next_id();
        comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, id: u64) -> StoreResult<MenuItemComment> {
        self.comments
            .read()
            .await
            .get(&id)
            .filter(|comment| comment.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| StoreError::NotFound("comment".into()))
    }

    async fn update_comment(&self, comment: MenuItemComment) -> StoreResult<MenuItemComment> {
        let mut comments = self.comments.write().await;
        if !comments.contains_key(&comment.id) {
            return Err(StoreError::NotFound("comment".into()));
        }
        comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn soft_delete_comment(&self, id: u64) -> StoreResult<()> {
        let mut comments = self.comments.write().await;
        let comment = comments
            .get_mut(&id)
            .filter(|comment| comment.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("comment".into()))?;
        comment.is_active = false;
        comment.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn comments_for_event(&self, event_id: u64) -> StoreResult<Vec<MenuItemComment>> {
        Ok(self
            .comments
            .read()
            .await
            .values()
            .filter(|comment| comment.meal_event_id == event_id && comment.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn replies_to(&self, parent_id: u64) -> StoreResult<Vec<MenuItemComment>> {
        // No parent liveness check: replies stay listable after their parent
        // is soft-deleted.
        Ok(self
            .comments
            .read()
            .await
            .values()
            .filter(|comment| comment.parent_id == Some(parent_id) && comment.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn comments_by_user(&self, user_id: u64) -> StoreResult<Vec<MenuItemComment>> {
        Ok(self
            .comments
            .read()
            .await
            .values()
            .filter(|comment| comment.user_id == user_id && comment.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn recent_comments(&self, limit: usize) -> StoreResult<Vec<MenuItemComment>> {
        let mut items: Vec<MenuItemComment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|comment| comment.deleted_at.is_none())
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit);
        Ok(items)
    }

    async fn create_notification(
        &self,
        mut notification: Notification,
    ) -> StoreResult<Notification> {
        let mut notifications = self.notifications.write().await;
        notification.id = self.next_id();
        notifications.insert(notification.id, notification.clone());
        metrics::counter!("mealsync_notifications_total", "kind" => notification.kind.as_str())
            .increment(1);
        Ok(notification)
    }

    async fn get_notification(&self, id: u64) -> StoreResult<Notification> {
        self.notifications
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("notification".into()))
    }

    async fn update_notification(&self, notification: Notification) -> StoreResult<Notification> {
        let mut notifications = self.notifications.write().await;
        if !notifications.contains_key(&notification.id) {
            return Err(StoreError::NotFound("notification".into()));
        }
        notifications.insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn delete_notification(&self, id: u64) -> StoreResult<()> {
        let mut notifications = self.notifications.write().await;
        if notifications.remove(&id).is_none() {
            return Err(StoreError::NotFound("notification".into()));
        }
        Ok(())
    }

    async fn notifications_for_user(&self, user_id: u64) -> StoreResult<Vec<Notification>> {
        let mut items: Vec<Notification> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|notification| notification.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn unread_count(&self, user_id: u64) -> StoreResult<u64> {
        Ok(self
            .notifications
            .read()
            .await
            .values()
            .filter(|notification| notification.user_id == user_id && !notification.read)
            .count() as u64)
    }

    async fn undelivered_count(&self, user_id: u64) -> StoreResult<u64> {
        Ok(self
            .notifications
            .read()
            .await
            .values()
            .filter(|notification| notification.user_id == user_id && !notification.delivered)
            .count() as u64)
    }

    async fn health_check(&self) -> StoreResult<()> {
        // In-memory backend is always "healthy" if the process is running.
        // Durable backends should probe connectivity instead.
        Ok(())
    }

    /// Whether this backend provides persistence across restarts.
    fn is_durable(&self) -> bool {
        false
    }

    /// Human-readable backend identifier used in logs and diagnostics.
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl DirectoryStore for InMemoryStore {
    async fn create_user(&self, mut user: User) -> StoreResult<User> {
        // Email uniqueness is checked under the write lock so two concurrent
        // registrations with the same address cannot both land.
        let mut users = self.users.write().await;
        let taken = users
            .values()
            .any(|existing| existing.email == user.email && existing.deleted_at.is_none());
        if taken {
            return Err(StoreError::Conflict(format!(
                "a user with email {} already exists",
                user.email
            )));
        }
        user.id = self.next_id();
        users.insert(user.id, user.clone());
        metrics::gauge!("mealsync_users_total")
            .set(users.values().filter(|u| u.deleted_at.is_none()).count() as f64);
        Ok(user)
    }

    async fn get_user(&self, id: u64) -> StoreResult<User> {
        self.users
            .read()
            .await
            .get(&id)
            .filter(|user| user.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| StoreError::NotFound("user".into()))
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(StoreError::NotFound("user".into()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn soft_delete_user(&self, id: u64) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .filter(|user| user.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        user.is_active = false;
        user.deleted_at = Some(Utc::now());
        metrics::gauge!("mealsync_users_total")
            .set(users.values().filter(|u| u.deleted_at.is_none()).count() as f64);
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|user| user.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn create_menu_item(&self, mut item: MenuItem) -> StoreResult<MenuItem> {
        let mut items = self.menu_items.write().await;
        item.id = self.next_id();
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_menu_item(&self, id: u64) -> StoreResult<MenuItem> {
        self.menu_items
            .read()
            .await
            .get(&id)
            .filter(|item| item.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| StoreError::NotFound("menu item".into()))
    }

    async fn update_menu_item(&self, item: MenuItem) -> StoreResult<MenuItem> {
        let mut items = self.menu_items.write().await;
        if !items.contains_key(&item.id) {
            return Err(StoreError::NotFound("menu item".into()));
        }
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn soft_delete_menu_item(&self, id: u64) -> StoreResult<()> {
        let mut items = self.menu_items.write().await;
        let item = items
            .get_mut(&id)
            .filter(|item| item.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("menu item".into()))?;
        item.is_active = false;
        item.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn list_menu_items(&self) -> StoreResult<Vec<MenuItem>> {
        Ok(self
            .menu_items
            .read()
            .await
            .values()
            .filter(|item| item.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn menu_item_exists(&self, id: u64) -> StoreResult<bool> {
        Ok(self
            .menu_items
            .read()
            .await
            .get(&id)
            .is_some_and(|item| item.deleted_at.is_none()))
    }

    async fn create_menu_set(&self, mut set: MenuSet) -> StoreResult<MenuSet> {
        let mut sets = self.menu_sets.write().await;
        set.id = self.next_id();
        sets.insert(set.id, set.clone());
        Ok(set)
    }

    async fn get_menu_set(&self, id: u64) -> StoreResult<MenuSet> {
        self.menu_sets
            .read()
            .await
            .get(&id)
            .filter(|set| set.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| StoreError::NotFound("menu set".into()))
    }

    async fn update_menu_set(&self, set: MenuSet) -> StoreResult<MenuSet> {
        let mut sets = self.menu_sets.write().await;
        if !sets.contains_key(&set.id) {
            return Err(StoreError::NotFound("menu set".into()));
        }
        sets.insert(set.id, set.clone());
        Ok(set)
    }

    async fn soft_delete_menu_set(&self, id: u64) -> StoreResult<()> {
        let mut sets = self.menu_sets.write().await;
        let set = sets
            .get_mut(&id)
            .filter(|set| set.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("menu set".into()))?;
        set.is_active = false;
        set.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn list_menu_sets(&self) -> StoreResult<Vec<MenuSet>> {
        Ok(self
            .menu_sets
            .read()
            .await
            .values()
            .filter(|set| set.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn menu_set_exists(&self, id: u64) -> StoreResult<bool> {
        Ok(self
            .menu_sets
            .read()
            .await
            .get(&id)
            .is_some_and(|set| set.deleted_at.is_none()))
    }

    async fn create_event_address(&self, mut address: EventAddress) -> StoreResult<EventAddress> {
        let mut addresses = self.addresses.write().await;
        address.id = self.next_id();
        addresses.insert(address.id, address.clone());
        Ok(address)
    }

    async fn get_event_address(&self, id: u64) -> StoreResult<EventAddress> {
        self.addresses
            .read()
            .await
            .get(&id)
            .filter(|address| address.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| StoreError::NotFound("event address".into()))
    }

    async fn update_event_address(&self, address: EventAddress) -> StoreResult<EventAddress> {
        let mut addresses = self.addresses.write().await;
        if !addresses.contains_key(&address.id) {
            return Err(StoreError::NotFound("event address".into()));
        }
        addresses.insert(address.id, address.clone());
        Ok(address)
    }

    async fn soft_delete_event_address(&self, id: u64) -> StoreResult<()> {
        let mut addresses = self.addresses.write().await;
        let address = addresses
            .get_mut(&id)
            .filter(|address| address.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound("event address".into()))?;
        address.is_active = false;
        address.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn list_event_addresses(&self) -> StoreResult<Vec<EventAddress>> {
        Ok(self
            .addresses
            .read()
            .await
            .values()
            .filter(|address| address.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn event_address_exists(&self, id: u64) -> StoreResult<bool> {
        Ok(self
            .addresses
            .read()
            .await
            .get(&id)
            .is_some_and(|address| address.deleted_at.is_none()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RequestStatus, Role};
    use chrono::Duration;

    fn event_named(name: &str) -> MealEvent {
        let now = Utc::now();
        MealEvent {
            id: 0,
            name: name.to_string(),
            description: None,
            event_date: now + Duration::days(2),
            event_duration_minutes: 60,
            cutoff_time: now + Duration::days(1),
            confirmed_at: None,
            is_active: true,
            created_by: 1,
            updated_by: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn request_for(user_id: u64, meal_event_id: u64) -> MealRequest {
        let now = Utc::now();
        MealRequest {
            id: 0,
            user_id,
            meal_event_id,
            menu_set_id: None,
            event_address_id: None,
            status: RequestStatus::Pending,
            confirmed_at: None,
            items: vec![MealRequestItem {
                id: 0,
                menu_item_id: 1,
                quantity: 1,
                is_selected: true,
                notes: None,
            }],
            is_active: true,
            created_by: user_id,
            updated_by: user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn user_with_email(email: &str) -> User {
        let now = Utc::now();
        User {
            id: 0,
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role: Role::Employee,
            department: None,
            employee_id: None,
            notification_enabled: true,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_and_unique() {
        let store = InMemoryStore::new();
        let first = store.create_event(event_named("Lunch")).await.expect("event");
        let second = store
            .create_event(event_named("Dinner"))
            .await
            .expect("event");
        assert!(first.id > 0);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn duplicate_request_conflicts_until_withdrawn() {
        let store = InMemoryStore::new();
        let event = store.create_event(event_named("Lunch")).await.expect("event");

        let created = store
            .create_request(request_for(7, event.id))
            .await
            .expect("request");
        assert!(created.items[0].id > 0);

        let err = store
            .create_request(request_for(7, event.id))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, StoreError::Conflict(_)));

        // A different user is not a duplicate.
        store
            .create_request(request_for(8, event.id))
            .await
            .expect("other user");

        // Withdrawing frees the slot for the same user.
        store
            .soft_delete_request(created.id)
            .await
            .expect("withdraw");
        store
            .create_request(request_for(7, event.id))
            .await
            .expect("resubmit");
    }

    #[tokio::test]
    async fn request_requires_live_event() {
        let store = InMemoryStore::new();
        let err = store
            .create_request(request_for(7, 999))
            .await
            .expect_err("missing event");
        assert!(matches!(err, StoreError::NotFound(_)));

        let event = store.create_event(event_named("Lunch")).await.expect("event");
        store.soft_delete_event(event.id).await.expect("delete");
        let err = store
            .create_request(request_for(7, event.id))
            .await
            .expect_err("deleted event");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn soft_deleted_event_vanishes_from_finders_but_requests_remain() {
        let store = InMemoryStore::new();
        let event = store.create_event(event_named("Lunch")).await.expect("event");
        let request = store
            .create_request(request_for(7, event.id))
            .await
            .expect("request");

        store.soft_delete_event(event.id).await.expect("delete");

        let err = store.get_event(event.id).await.expect_err("gone");
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.list_events().await.expect("list").is_empty());

        let remaining = store
            .requests_for_event(event.id)
            .await
            .expect("requests");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, request.id);
    }

    #[tokio::test]
    async fn item_add_and_remove_round_trip() {
        let store = InMemoryStore::new();
        let event = store.create_event(event_named("Lunch")).await.expect("event");
        let request = store
            .create_request(request_for(7, event.id))
            .await
            .expect("request");

        let updated = store
            .add_request_item(
                request.id,
                MealRequestItem {
                    id: 0,
                    menu_item_id: 2,
                    quantity: 3,
                    is_selected: false,
                    notes: Some("extra sauce".to_string()),
                },
            )
            .await
            .expect("add item");
        assert_eq!(updated.items.len(), 2);

        let item_id = updated.items[1].id;
        let updated = store
            .remove_request_item(request.id, item_id)
            .await
            .expect("remove item");
        assert_eq!(updated.items.len(), 1);

        let err = store
            .remove_request_item(request.id, item_id)
            .await
            .expect_err("already removed");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn user_email_conflict() {
        let store = InMemoryStore::new();
        store
            .create_user(user_with_email("kim@example.com"))
            .await
            .expect("user");

        let err = store
            .create_user(user_with_email("kim@example.com"))
            .await
            .expect_err("duplicate email");
        assert!(matches!(err, StoreError::Conflict(_)));

        store
            .create_user(user_with_email("lee@example.com"))
            .await
            .expect("other email");
    }

    #[tokio::test]
    async fn address_attachment_set_semantics() {
        let store = InMemoryStore::new();
        let event = store.create_event(event_named("Lunch")).await.expect("event");
        let now = Utc::now();
        let address = store
            .create_event_address(EventAddress {
                id: 0,
                address: "4th floor canteen".to_string(),
                is_active: true,
                created_by: 1,
                updated_by: 1,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            })
            .await
            .expect("address");

        store
            .attach_address(event.id, address.id)
            .await
            .expect("attach");
        let err = store
            .attach_address(event.id, address.id)
            .await
            .expect_err("duplicate attach");
        assert!(matches!(err, StoreError::Conflict(_)));

        assert_eq!(
            store.addresses_for_event(event.id).await.expect("list"),
            vec![address.id]
        );

        store
            .detach_address(event.id, address.id)
            .await
            .expect("detach");
        let err = store
            .detach_address(event.id, address.id)
            .await
            .expect_err("already detached");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn backend_health_and_identity() {
        let store = InMemoryStore::new();
        store.health_check().await.expect("health");
        assert!(!store.is_durable());
        assert_eq!(store.backend_name(), "memory");
    }
}
