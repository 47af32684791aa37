//! Meal request lifecycle.
//!
//! # Purpose
//! Submission, amendment, withdrawal, and the admin approval workflow for
//! meal requests. Owner mutations stop at the event cutoff; admin status
//! transitions never do.
//!
//! # Key invariants
//! - At most one non-withdrawn request per user per event. The scan here and
//!   the store's serialized check both enforce it; either failure surfaces as
//!   the same validation error.
//! - Status is only ever written through [`MealRequestLifecycle::update_request_status`].
use crate::authz::{ActorContext, require_owner_or_admin};
use crate::cutoff;
use crate::error::{EngineError, EngineResult};
use crate::model::{
    MealRequest, MealRequestItem, MealRequestPatch, NewMealRequest, NewRequestItem, RequestStatus,
    Role,
};
use crate::store::{EngineStore, StoreError};
use chrono::Utc;
use std::sync::Arc;

const DUPLICATE_REQUEST: &str = "user already has a request for this meal event";

pub struct MealRequestLifecycle {
    store: Arc<dyn EngineStore>,
}

impl MealRequestLifecycle {
    pub fn new(store: Arc<dyn EngineStore>) -> Self {
        Self { store }
    }

    /// Submit a request against an event on behalf of the acting user.
    ///
    /// The event must exist, be active, and be before its cutoff, and the
    /// actor must not already hold a live request for it. The stored request
    /// always starts as `pending` and is owned by the actor, whatever the
    /// payload claims.
    pub async fn create_request(
        &self,
        new: NewMealRequest,
        actor: &ActorContext,
    ) -> EngineResult<MealRequest> {
        let event = self.store.get_event(new.meal_event_id).await?;
        cutoff::require_mutable(&event, Utc::now())?;

        let existing = self.store.requests_for_event(event.id).await?;
        if existing.iter().any(|request| request.user_id == actor.user_id) {
            return Err(EngineError::Validation(DUPLICATE_REQUEST.into()));
        }

        for item in &new.items {
            self.validate_item(item).await?;
        }

        let now = Utc::now();
        let request = MealRequest {
            id: 0,
            user_id: actor.user_id,
            meal_event_id: event.id,
            menu_set_id: new.menu_set_id,
            event_address_id: new.event_address_id,
            status: RequestStatus::Pending,
            confirmed_at: None,
            items: new
                .items
                .into_iter()
                .map(|item| MealRequestItem {
                    id: 0,
                    menu_item_id: item.menu_item_id,
                    quantity: item.quantity,
                    is_selected: item.is_selected,
                    notes: item.notes,
                })
                .collect(),
            is_active: true,
            created_by: actor.user_id,
            updated_by: actor.user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        match self.store.create_request(request).await {
            Ok(created) => {
                tracing::info!(
                    request_id = created.id,
                    event_id = created.meal_event_id,
                    user_id = created.user_id,
                    "meal request submitted"
                );
                Ok(created)
            }
            // A concurrent submission that slipped past the scan above lands
            // on the store's serialized check; report it the same way.
            Err(StoreError::Conflict(_)) => Err(EngineError::Validation(DUPLICATE_REQUEST.into())),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get_request(&self, id: u64, actor: &ActorContext) -> EngineResult<MealRequest> {
        let request = self.store.get_request(id).await?;
        require_owner_or_admin(actor, request.user_id, "meal request")?;
        Ok(request)
    }

    /// Admins see every live request; other actors see their own.
    pub async fn list_requests(&self, actor: &ActorContext) -> EngineResult<Vec<MealRequest>> {
        let mut requests = if actor.is_admin() {
            self.store.list_requests().await?
        } else {
            self.store.requests_for_user(actor.user_id).await?
        };
        requests.sort_by_key(|request| request.id);
        Ok(requests)
    }

    /// Live requests against one event, for the event's creator or an admin.
    pub async fn requests_for_event(
        &self,
        event_id: u64,
        actor: &ActorContext,
    ) -> EngineResult<Vec<MealRequest>> {
        let event = self.store.get_event(event_id).await?;
        require_owner_or_admin(actor, event.created_by, "meal event")?;
        let mut requests = self.store.requests_for_event(event_id).await?;
        requests.sort_by_key(|request| request.id);
        Ok(requests)
    }

    /// Amend the menu-set or address selection while the event is mutable.
    /// Status and items are off limits here.
    pub async fn update_request(
        &self,
        id: u64,
        patch: MealRequestPatch,
        actor: &ActorContext,
    ) -> EngineResult<MealRequest> {
        let mut request = self.store.get_request(id).await?;
        require_owner_or_admin(actor, request.user_id, "meal request")?;
        let event = self.store.get_event(request.meal_event_id).await?;
        cutoff::require_mutable(&event, Utc::now())?;

        if let Some(menu_set_id) = patch.menu_set_id {
            request.menu_set_id = Some(menu_set_id);
        }
        if let Some(event_address_id) = patch.event_address_id {
            request.event_address_id = Some(event_address_id);
        }
        request.updated_by = actor.user_id;
        request.updated_at = Utc::now();
        Ok(self.store.update_request(request).await?)
    }

    /// Withdraw a request. Soft delete: the row survives for history and the
    /// user may submit a fresh request afterwards.
    pub async fn delete_request(&self, id: u64, actor: &ActorContext) -> EngineResult<()> {
        let request = self.store.get_request(id).await?;
        require_owner_or_admin(actor, request.user_id, "meal request")?;
        let event = self.store.get_event(request.meal_event_id).await?;
        cutoff::require_mutable(&event, Utc::now())?;
        self.store.soft_delete_request(id).await?;
        tracing::info!(request_id = id, "meal request withdrawn");
        Ok(())
    }

    pub async fn add_item(
        &self,
        request_id: u64,
        item: NewRequestItem,
        actor: &ActorContext,
    ) -> EngineResult<MealRequest> {
        let request = self.store.get_request(request_id).await?;
        require_owner_or_admin(actor, request.user_id, "meal request")?;
        let event = self.store.get_event(request.meal_event_id).await?;
        cutoff::require_mutable(&event, Utc::now())?;
        self.validate_item(&item).await?;
        Ok(self
            .store
            .add_request_item(
                request_id,
                MealRequestItem {
                    id: 0,
                    menu_item_id: item.menu_item_id,
                    quantity: item.quantity,
                    is_selected: item.is_selected,
                    notes: item.notes,
                },
            )
            .await?)
    }

    pub async fn remove_item(
        &self,
        request_id: u64,
        item_id: u64,
        actor: &ActorContext,
    ) -> EngineResult<MealRequest> {
        let request = self.store.get_request(request_id).await?;
        require_owner_or_admin(actor, request.user_id, "meal request")?;
        let event = self.store.get_event(request.meal_event_id).await?;
        cutoff::require_mutable(&event, Utc::now())?;
        Ok(self.store.remove_request_item(request_id, item_id).await?)
    }

    pub async fn list_items(
        &self,
        request_id: u64,
        actor: &ActorContext,
    ) -> EngineResult<Vec<MealRequestItem>> {
        let request = self.store.get_request(request_id).await?;
        require_owner_or_admin(actor, request.user_id, "meal request")?;
        Ok(request.items)
    }

    /// Admin-only status transition. Deliberately permissive about the shape
    /// of the transition and never cutoff-gated: approvals routinely happen
    /// after the cutoff closes submissions.
    ///
    /// The admin check reads the role from the directory rather than trusting
    /// the actor context, so a stale or forged role claim cannot approve
    /// requests.
    pub async fn update_request_status(
        &self,
        id: u64,
        status: RequestStatus,
        actor: &ActorContext,
    ) -> EngineResult<MealRequest> {
        let acting = self.store.get_user(actor.user_id).await?;
        if acting.role != Role::Admin {
            return Err(EngineError::Forbidden(
                "updating request status requires admin role".into(),
            ));
        }

        let mut request = self.store.get_request(id).await?;
        let previous = request.status;
        request.status = status;
        if status == RequestStatus::Approved && request.confirmed_at.is_none() {
            request.confirmed_at = Some(Utc::now());
        }
        request.updated_by = actor.user_id;
        request.updated_at = Utc::now();
        let updated = self.store.update_request(request).await?;

        tracing::info!(
            request_id = id,
            from = %previous,
            to = %status,
            "request status updated"
        );
        metrics::counter!("mealsync_status_transitions_total", "to" => status.as_str())
            .increment(1);
        Ok(updated)
    }

    async fn validate_item(&self, item: &NewRequestItem) -> EngineResult<()> {
        if item.quantity == 0 {
            return Err(EngineError::Validation(
                "item quantity must be at least 1".into(),
            ));
        }
        if !self.store.menu_item_exists(item.menu_item_id).await? {
            return Err(EngineError::Validation(format!(
                "menu item {} does not exist",
                item.menu_item_id
            )));
        }
        Ok(())
    }
}
