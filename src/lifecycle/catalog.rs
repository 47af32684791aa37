//! Menu and venue catalog maintenance.
//!
//! All writes are admin-gated; reads are open to any caller. Deletes are
//! soft, so requests and comments that point at retired entries keep
//! resolving while existence checks stop new references.
use crate::authz::{self, ActorContext};
use crate::error::{EngineError, EngineResult};
use crate::model::{
    EventAddress, EventAddressPatch, MenuItem, MenuItemPatch, MenuSet, MenuSetPatch, NewEventAddress,
    NewMenuItem, NewMenuSet,
};
use crate::store::EngineStore;
use chrono::Utc;
use std::sync::Arc;

pub struct MenuCatalog {
    store: Arc<dyn EngineStore>,
}

impl MenuCatalog {
    pub fn new(store: Arc<dyn EngineStore>) -> Self {
        Self { store }
    }

    pub async fn create_menu_item(
        &self,
        new: NewMenuItem,
        actor: &ActorContext,
    ) -> EngineResult<MenuItem> {
        authz::require_admin(actor, "creating menu items")?;
        if new.name.trim().is_empty() {
            return Err(EngineError::Validation("menu item name is required".into()));
        }
        let now = Utc::now();
        let item = MenuItem {
            id: 0,
            name: new.name,
            description: new.description,
            category: new.category,
            price_cents: new.price_cents,
            image_url: new.image_url,
            is_available: new.is_available,
            is_active: true,
            created_by: actor.user_id,
            updated_by: actor.user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        Ok(self.store.create_menu_item(item).await?)
    }

    pub async fn get_menu_item(&self, id: u64) -> EngineResult<MenuItem> {
        Ok(self.store.get_menu_item(id).await?)
    }

    pub async fn list_menu_items(&self) -> EngineResult<Vec<MenuItem>> {
        let mut items = self.store.list_menu_items().await?;
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    pub async fn update_menu_item(
        &self,
        id: u64,
        patch: MenuItemPatch,
        actor: &ActorContext,
    ) -> EngineResult<MenuItem> {
        authz::require_admin(actor, "updating menu items")?;
        let mut item = self.store.get_menu_item(id).await?;
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(EngineError::Validation("menu item name is required".into()));
            }
            item.name = name;
        }
        if let Some(description) = patch.description {
            item.description = Some(description);
        }
        if let Some(category) = patch.category {
            item.category = Some(category);
        }
        if let Some(price_cents) = patch.price_cents {
            item.price_cents = price_cents;
        }
        if let Some(image_url) = patch.image_url {
            item.image_url = Some(image_url);
        }
        if let Some(is_available) = patch.is_available {
            item.is_available = is_available;
        }
        item.updated_by = actor.user_id;
        item.updated_at = Utc::now();
        Ok(self.store.update_menu_item(item).await?)
    }

    /// Retires a menu item. Sets that contain it keep the membership entry
    /// for history, but `menu_item_exists` stops new references.
    pub async fn delete_menu_item(&self, id: u64, actor: &ActorContext) -> EngineResult<()> {
        authz::require_admin(actor, "deleting menu items")?;
        Ok(self.store.soft_delete_menu_item(id).await?)
    }

    pub async fn create_menu_set(
        &self,
        new: NewMenuSet,
        actor: &ActorContext,
    ) -> EngineResult<MenuSet> {
        authz::require_admin(actor, "creating menu sets")?;
        if new.name.trim().is_empty() {
            return Err(EngineError::Validation("menu set name is required".into()));
        }
        let now = Utc::now();
        let set = MenuSet {
            id: 0,
            name: new.name,
            description: new.description,
            menu_item_ids: Vec::new(),
            is_active: true,
            created_by: actor.user_id,
            updated_by: actor.user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        Ok(self.store.create_menu_set(set).await?)
    }

    pub async fn get_menu_set(&self, id: u64) -> EngineResult<MenuSet> {
        Ok(self.store.get_menu_set(id).await?)
    }

    pub async fn list_menu_sets(&self) -> EngineResult<Vec<MenuSet>> {
        let mut sets = self.store.list_menu_sets().await?;
        sets.sort_by_key(|set| set.id);
        Ok(sets)
    }

    pub async fn update_menu_set(
        &self,
        id: u64,
        patch: MenuSetPatch,
        actor: &ActorContext,
    ) -> EngineResult<MenuSet> {
        authz::require_admin(actor, "updating menu sets")?;
        let mut set = self.store.get_menu_set(id).await?;
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(EngineError::Validation("menu set name is required".into()));
            }
            set.name = name;
        }
        if let Some(description) = patch.description {
            set.description = Some(description);
        }
        set.updated_by = actor.user_id;
        set.updated_at = Utc::now();
        Ok(self.store.update_menu_set(set).await?)
    }

    pub async fn delete_menu_set(&self, id: u64, actor: &ActorContext) -> EngineResult<()> {
        authz::require_admin(actor, "deleting menu sets")?;
        Ok(self.store.soft_delete_menu_set(id).await?)
    }

    /// Adds one item to a set. Both ends must exist, and membership behaves
    /// as a set.
    pub async fn add_set_item(
        &self,
        set_id: u64,
        item_id: u64,
        actor: &ActorContext,
    ) -> EngineResult<MenuSet> {
        authz::require_admin(actor, "editing menu set membership")?;
        let mut set = self.store.get_menu_set(set_id).await?;
        if !self.store.menu_item_exists(item_id).await? {
            return Err(EngineError::NotFound(format!(
                "menu item {item_id} not found"
            )));
        }
        if set.menu_item_ids.contains(&item_id) {
            return Err(EngineError::Conflict("menu item already in set".into()));
        }
        set.menu_item_ids.push(item_id);
        set.updated_by = actor.user_id;
        set.updated_at = Utc::now();
        Ok(self.store.update_menu_set(set).await?)
    }

    pub async fn remove_set_item(
        &self,
        set_id: u64,
        item_id: u64,
        actor: &ActorContext,
    ) -> EngineResult<MenuSet> {
        authz::require_admin(actor, "editing menu set membership")?;
        let mut set = self.store.get_menu_set(set_id).await?;
        let position = set
            .menu_item_ids
            .iter()
            .position(|member| *member == item_id)
            .ok_or_else(|| {
                EngineError::NotFound(format!("menu item {item_id} is not in set {set_id}"))
            })?;
        set.menu_item_ids.remove(position);
        set.updated_by = actor.user_id;
        set.updated_at = Utc::now();
        Ok(self.store.update_menu_set(set).await?)
    }

    pub async fn create_address(
        &self,
        new: NewEventAddress,
        actor: &ActorContext,
    ) -> EngineResult<EventAddress> {
        authz::require_admin(actor, "creating event addresses")?;
        if new.address.trim().is_empty() {
            return Err(EngineError::Validation("address is required".into()));
        }
        let now = Utc::now();
        let address = EventAddress {
            id: 0,
            address: new.address,
            is_active: true,
            created_by: actor.user_id,
            updated_by: actor.user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        Ok(self.store.create_event_address(address).await?)
    }

    pub async fn get_address(&self, id: u64) -> EngineResult<EventAddress> {
        Ok(self.store.get_event_address(id).await?)
    }

    pub async fn list_addresses(&self) -> EngineResult<Vec<EventAddress>> {
        let mut addresses = self.store.list_event_addresses().await?;
        addresses.sort_by_key(|address| address.id);
        Ok(addresses)
    }

    pub async fn update_address(
        &self,
        id: u64,
        patch: EventAddressPatch,
        actor: &ActorContext,
    ) -> EngineResult<EventAddress> {
        authz::require_admin(actor, "updating event addresses")?;
        let mut address = self.store.get_event_address(id).await?;
        if let Some(text) = patch.address {
            if text.trim().is_empty() {
                return Err(EngineError::Validation("address is required".into()));
            }
            address.address = text;
        }
        address.updated_by = actor.user_id;
        address.updated_at = Utc::now();
        Ok(self.store.update_event_address(address).await?)
    }

    pub async fn delete_address(&self, id: u64, actor: &ActorContext) -> EngineResult<()> {
        authz::require_admin(actor, "deleting event addresses")?;
        Ok(self.store.soft_delete_event_address(id).await?)
    }
}
