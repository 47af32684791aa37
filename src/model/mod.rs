//! Meal coordination data model.
//!
//! # Purpose
//! Re-exports the event/request/comment/notification records, the catalog and
//! directory entities, and the new/patch payloads used by the store and the
//! lifecycle layers.
mod comment;
mod event;
mod menu;
mod notification;
mod request;
mod user;

pub use comment::{CommentPatch, MenuItemComment, NewComment};
pub use event::{
    EventMenuSet, EventMenuSetPatch, MealEvent, MealEventPatch, NewEventMenuSet, NewMealEvent,
};
pub use menu::{
    EventAddress, EventAddressPatch, MenuItem, MenuItemPatch, MenuSet, MenuSetPatch,
    NewEventAddress, NewMenuItem, NewMenuSet,
};
pub use notification::{Notification, NotificationKind};
pub use request::{
    MealRequest, MealRequestItem, MealRequestPatch, NewMealRequest, NewRequestItem, RequestStatus,
};
pub use user::{NewUser, Role, User, UserPatch};
