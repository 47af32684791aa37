//! Lifecycle engines, one per aggregate. Each holds an `Arc<dyn EngineStore>`
//! and enforces validation, authorization, and cutoff rules before touching
//! storage.
pub mod catalog;
pub mod comment;
pub mod event;
pub mod notification;
pub mod request;
pub mod user;

pub use catalog::MenuCatalog;
pub use comment::CommentThreads;
pub use event::MealEventLifecycle;
pub use notification::NotificationDispatcher;
pub use request::MealRequestLifecycle;
pub use user::UserDirectory;
