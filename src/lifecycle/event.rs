//! Meal event lifecycle.
//!
//! # Purpose
//! Creation, partial update, soft deletion, and discovery of meal events,
//! plus management of the menu sets and addresses offered at each event.
//! Event edits are never cutoff-gated; the cutoff freezes requests, not the
//! event itself.
use crate::authz::{ActorContext, require_owner_or_admin};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::model::{
    EventMenuSet, EventMenuSetPatch, MealEvent, MealEventPatch, NewEventMenuSet, NewMealEvent,
};
use crate::store::EngineStore;
use chrono::{DateTime, Days, Duration, NaiveTime, Utc};
use std::sync::Arc;

pub struct MealEventLifecycle {
    store: Arc<dyn EngineStore>,
    config: EngineConfig,
}

impl MealEventLifecycle {
    pub fn new(store: Arc<dyn EngineStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub async fn create_event(
        &self,
        new: NewMealEvent,
        actor: &ActorContext,
    ) -> EngineResult<MealEvent> {
        if new.name.trim().is_empty() {
            return Err(EngineError::Validation("event name is required".into()));
        }
        if new.cutoff_time > new.event_date {
            return Err(EngineError::Validation(
                "cutoff time cannot be after the event date".into(),
            ));
        }
        let duration = if new.event_duration_minutes == 0 {
            self.config.default_event_duration_minutes
        } else {
            new.event_duration_minutes
        };
        let now = Utc::now();
        let event = MealEvent {
            id: 0,
            name: new.name,
            description: new.description,
            event_date: new.event_date,
            event_duration_minutes: duration,
            cutoff_time: new.cutoff_time,
            confirmed_at: None,
            is_active: true,
            created_by: actor.user_id,
            updated_by: actor.user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let created = self.store.create_event(event).await?;
        tracing::info!(event_id = created.id, name = %created.name, "meal event created");
        Ok(created)
    }

    pub async fn get_event(&self, id: u64, actor: &ActorContext) -> EngineResult<MealEvent> {
        let event = self.store.get_event(id).await?;
        require_owner_or_admin(actor, event.created_by, "meal event")?;
        Ok(event)
    }

    pub async fn update_event(
        &self,
        id: u64,
        patch: MealEventPatch,
        actor: &ActorContext,
    ) -> EngineResult<MealEvent> {
        let mut event = self.store.get_event(id).await?;
        require_owner_or_admin(actor, event.created_by, "meal event")?;

        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(EngineError::Validation("event name is required".into()));
            }
            event.name = name;
        }
        if let Some(description) = patch.description {
            event.description = Some(description);
        }
        if let Some(event_date) = patch.event_date {
            event.event_date = event_date;
        }
        if let Some(duration) = patch.event_duration_minutes {
            event.event_duration_minutes = duration;
        }
        if let Some(cutoff_time) = patch.cutoff_time {
            event.cutoff_time = cutoff_time;
        }
        // The invariant must hold over the merged row, whichever side moved.
        if event.cutoff_time > event.event_date {
            return Err(EngineError::Validation(
                "cutoff time cannot be after the event date".into(),
            ));
        }
        event.updated_by = actor.user_id;
        event.updated_at = Utc::now();
        Ok(self.store.update_event(event).await?)
    }

    pub async fn delete_event(&self, id: u64, actor: &ActorContext) -> EngineResult<()> {
        let event = self.store.get_event(id).await?;
        require_owner_or_admin(actor, event.created_by, "meal event")?;
        self.store.soft_delete_event(id).await?;
        tracing::info!(event_id = id, "meal event deleted");
        Ok(())
    }

    /// Mark the event as confirmed to go ahead. Idempotent: the first
    /// confirmation timestamp sticks.
    pub async fn confirm_event(&self, id: u64, actor: &ActorContext) -> EngineResult<MealEvent> {
        let mut event = self.store.get_event(id).await?;
        require_owner_or_admin(actor, event.created_by, "meal event")?;
        if event.confirmed_at.is_none() {
            event.confirmed_at = Some(Utc::now());
            event.updated_by = actor.user_id;
            event.updated_at = Utc::now();
            event = self.store.update_event(event).await?;
        }
        Ok(event)
    }

    /// Admins see every event; other actors see only the events they created.
    /// Event browsing for participants goes through [`Self::events_in_range`]
    /// and [`Self::upcoming_events`] instead.
    pub async fn list_events(&self, actor: &ActorContext) -> EngineResult<Vec<MealEvent>> {
        let mut events = self.store.list_events().await?;
        if !actor.is_admin() {
            events.retain(|event| event.created_by == actor.user_id);
        }
        events.sort_by_key(|event| event.event_date);
        Ok(events)
    }

    /// Events whose date falls inside the inclusive range. The end bound is
    /// widened to the last second of its day, so passing two midnights covers
    /// whole days.
    pub async fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> EngineResult<Vec<MealEvent>> {
        let end = end_of_day(end);
        if start > end {
            return Err(EngineError::Validation(
                "start date is after end date".into(),
            ));
        }
        Ok(self.store.events_in_range(start, end).await?)
    }

    /// Active events that have not happened yet, soonest first.
    pub async fn upcoming_events(&self) -> EngineResult<Vec<MealEvent>> {
        Ok(self.store.upcoming_events(Utc::now()).await?)
    }

    pub async fn attach_menu_set(
        &self,
        event_id: u64,
        new: NewEventMenuSet,
        actor: &ActorContext,
    ) -> EngineResult<EventMenuSet> {
        let event = self.store.get_event(event_id).await?;
        require_owner_or_admin(actor, event.created_by, "meal event")?;
        if !self.store.menu_set_exists(new.menu_set_id).await? {
            return Err(EngineError::NotFound(format!(
                "menu set {} not found",
                new.menu_set_id
            )));
        }
        let now = Utc::now();
        let link = EventMenuSet {
            id: 0,
            meal_event_id: event_id,
            menu_set_id: new.menu_set_id,
            label: new.label,
            note: new.note,
            is_active: true,
            created_by: actor.user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        Ok(self.store.attach_menu_set(link).await?)
    }

    pub async fn update_menu_set_attachment(
        &self,
        attachment_id: u64,
        patch: EventMenuSetPatch,
        actor: &ActorContext,
    ) -> EngineResult<EventMenuSet> {
        let mut link = self.store.get_menu_set_attachment(attachment_id).await?;
        let event = self.store.get_event(link.meal_event_id).await?;
        require_owner_or_admin(actor, event.created_by, "meal event")?;
        if let Some(label) = patch.label {
            link.label = Some(label);
        }
        if let Some(note) = patch.note {
            link.note = Some(note);
        }
        link.updated_at = Utc::now();
        Ok(self.store.update_menu_set_attachment(link).await?)
    }

    pub async fn detach_menu_set(
        &self,
        attachment_id: u64,
        actor: &ActorContext,
    ) -> EngineResult<()> {
        let link = self.store.get_menu_set_attachment(attachment_id).await?;
        let event = self.store.get_event(link.meal_event_id).await?;
        require_owner_or_admin(actor, event.created_by, "meal event")?;
        Ok(self.store.detach_menu_set(attachment_id).await?)
    }

    pub async fn list_menu_sets(&self, event_id: u64) -> EngineResult<Vec<EventMenuSet>> {
        if !self.store.event_exists(event_id).await? {
            return Err(EngineError::NotFound(format!(
                "meal event {event_id} not found"
            )));
        }
        let mut links = self.store.menu_sets_for_event(event_id).await?;
        links.sort_by_key(|link| link.id);
        Ok(links)
    }

    pub async fn attach_address(
        &self,
        event_id: u64,
        address_id: u64,
        actor: &ActorContext,
    ) -> EngineResult<()> {
        let event = self.store.get_event(event_id).await?;
        require_owner_or_admin(actor, event.created_by, "meal event")?;
        Ok(self.store.attach_address(event_id, address_id).await?)
    }

    pub async fn detach_address(
        &self,
        event_id: u64,
        address_id: u64,
        actor: &ActorContext,
    ) -> EngineResult<()> {
        let event = self.store.get_event(event_id).await?;
        require_owner_or_admin(actor, event.created_by, "meal event")?;
        Ok(self.store.detach_address(event_id, address_id).await?)
    }

    pub async fn list_addresses(&self, event_id: u64) -> EngineResult<Vec<u64>> {
        if !self.store.event_exists(event_id).await? {
            return Err(EngineError::NotFound(format!(
                "meal event {event_id} not found"
            )));
        }
        Ok(self.store.addresses_for_event(event_id).await?)
    }
}

/// Last second of the day `ts` falls on. Saturates to `ts` itself on calendar
/// overflow rather than panicking.
fn end_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive()
        .checked_add_days(Days::new(1))
        .map(|next| next.and_time(NaiveTime::MIN).and_utc() - Duration::seconds(1))
        .unwrap_or(ts)
}
