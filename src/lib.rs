//! Meal event and meal request lifecycle engine.
//!
//! # Purpose
//! Centralizes the rules of the catered-meal workflow: admins publish meal
//! events with a signup cutoff, employees submit one request per event,
//! comment on menu items, and receive notifications. Every mutation runs
//! through a lifecycle engine that enforces validation, ownership, and the
//! cutoff clock before anything reaches storage.
//!
//! # How it fits
//! This crate is the domain core. The embedding service resolves the caller
//! to an [`ActorContext`] (authentication lives there, not here), picks a
//! [`store::EngineStore`] backend, and exposes whatever transport it likes
//! on top of the lifecycle engines.
//!
//! # Key invariants
//! - A request is mutable only while its event is active and the cutoff time
//!   has not been reached.
//! - A user holds at most one live request per meal event.
//! - Comment edits and deletions are author-only; admins have no override.
//!
//! # Important configuration
//! - `MEALSYNC_DEFAULT_EVENT_DURATION_MIN` fills in event durations given as
//!   zero.
//! - `MEALSYNC_RECENT_COMMENTS_LIMIT` caps the recent-comments listing.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use chrono::{Duration, Utc};
//! use mealsync::config::EngineConfig;
//! use mealsync::lifecycle::{MealEventLifecycle, MealRequestLifecycle};
//! use mealsync::model::{NewMealEvent, NewMealRequest, Role};
//! use mealsync::store::memory::InMemoryStore;
//! use mealsync::ActorContext;
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = Arc::new(InMemoryStore::new());
//! let events = MealEventLifecycle::new(store.clone(), EngineConfig::default());
//! let requests = MealRequestLifecycle::new(store);
//!
//! let admin = ActorContext::new(1, Role::Admin);
//! let employee = ActorContext::new(2, Role::Employee);
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .enable_all()
//!     .build()?;
//! runtime.block_on(async {
//!     let event = events
//!         .create_event(
//!             NewMealEvent {
//!                 name: "Friday lunch".into(),
//!                 description: None,
//!                 event_date: Utc::now() + Duration::days(3),
//!                 event_duration_minutes: 0,
//!                 cutoff_time: Utc::now() + Duration::days(2),
//!             },
//!             &admin,
//!         )
//!         .await?;
//!     let request = requests
//!         .create_request(
//!             NewMealRequest {
//!                 meal_event_id: event.id,
//!                 menu_set_id: None,
//!                 event_address_id: None,
//!                 items: Vec::new(),
//!             },
//!             &employee,
//!         )
//!         .await?;
//!     assert_eq!(request.user_id, 2);
//!     anyhow::Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! # Common pitfalls
//! - The cutoff gate applies to requests, not to events: admins may edit an
//!   event after its cutoff has passed.
//! - Withdrawal is a soft delete that frees the one-request-per-event slot;
//!   the withdrawn row no longer resolves through the store's finders.

pub mod authz;
pub mod config;
pub mod cutoff;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod store;

pub use authz::ActorContext;
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
