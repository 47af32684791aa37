#![allow(dead_code)]

use mealsync::ActorContext;
use mealsync::config::EngineConfig;
use mealsync::lifecycle::{
    CommentThreads, MealEventLifecycle, MealRequestLifecycle, MenuCatalog, NotificationDispatcher,
    UserDirectory,
};
use mealsync::model::{NewUser, Role, User};
use mealsync::store::memory::InMemoryStore;
use std::sync::Arc;

pub struct Harness {
    pub events: MealEventLifecycle,
    pub requests: MealRequestLifecycle,
    pub comments: CommentThreads,
    pub notifications: NotificationDispatcher,
    pub catalog: MenuCatalog,
    pub directory: UserDirectory,
}

pub fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let config = EngineConfig::default();
    Harness {
        events: MealEventLifecycle::new(store.clone(), config.clone()),
        requests: MealRequestLifecycle::new(store.clone()),
        comments: CommentThreads::new(store.clone(), config),
        notifications: NotificationDispatcher::new(store.clone()),
        catalog: MenuCatalog::new(store.clone()),
        directory: UserDirectory::new(store),
    }
}

/// Registers a user and returns the stored row plus an actor carrying the
/// store-assigned id.
pub async fn register(harness: &Harness, email: &str, role: Role) -> (User, ActorContext) {
    let user = harness
        .directory
        .register_user(NewUser {
            email: email.to_string(),
            first_name: "Alex".to_string(),
            last_name: "Larsen".to_string(),
            role,
            department: None,
            employee_id: None,
            notification_enabled: true,
        })
        .await
        .expect("register user");
    let actor = ActorContext::new(user.id, user.role);
    (user, actor)
}
