//! User directory operations.
use crate::authz::{self, ActorContext};
use crate::error::{EngineError, EngineResult};
use crate::model::{NewUser, User, UserPatch};
use crate::store::EngineStore;
use chrono::Utc;
use std::sync::Arc;

pub struct UserDirectory {
    store: Arc<dyn EngineStore>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn EngineStore>) -> Self {
        Self { store }
    }

    /// Registers a user. Takes no actor; registration happens before the
    /// caller has an identity. Email uniqueness is enforced by the store.
    pub async fn register_user(&self, new: NewUser) -> EngineResult<User> {
        if new.email.trim().is_empty() {
            return Err(EngineError::Validation("email is required".into()));
        }
        if new.first_name.trim().is_empty() {
            return Err(EngineError::Validation("first name is required".into()));
        }
        let now = Utc::now();
        let user = User {
            id: 0,
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            role: new.role,
            department: new.department,
            employee_id: new.employee_id,
            notification_enabled: new.notification_enabled,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let created = self.store.create_user(user).await?;
        tracing::info!(user_id = created.id, role = %created.role, "user registered");
        Ok(created)
    }

    /// A user may read their own entry; admins may read anyone's.
    pub async fn get_user(&self, id: u64, actor: &ActorContext) -> EngineResult<User> {
        authz::require_owner_or_admin(actor, id, "user profile")?;
        Ok(self.store.get_user(id).await?)
    }

    /// Applies a profile patch. Owner or admin; a `role` change additionally
    /// requires the actor to be an admin.
    pub async fn update_profile(
        &self,
        id: u64,
        patch: UserPatch,
        actor: &ActorContext,
    ) -> EngineResult<User> {
        authz::require_owner_or_admin(actor, id, "user profile")?;
        let mut user = self.store.get_user(id).await?;

        if let Some(role) = patch.role {
            authz::require_admin(actor, "changing a user's role")?;
            user.role = role;
        }
        if let Some(first_name) = patch.first_name {
            if first_name.trim().is_empty() {
                return Err(EngineError::Validation("first name is required".into()));
            }
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(department) = patch.department {
            user.department = Some(department);
        }
        if let Some(employee_id) = patch.employee_id {
            user.employee_id = Some(employee_id);
        }
        if let Some(notification_enabled) = patch.notification_enabled {
            user.notification_enabled = notification_enabled;
        }
        user.updated_at = Utc::now();
        Ok(self.store.update_user(user).await?)
    }

    /// Soft-deletes a user. Their historical requests and comments stay
    /// resolvable; the directory stops listing them.
    pub async fn deactivate_user(&self, id: u64, actor: &ActorContext) -> EngineResult<()> {
        authz::require_admin(actor, "deactivating users")?;
        self.store.get_user(id).await?;
        self.store.soft_delete_user(id).await?;
        tracing::info!(user_id = id, acted_by = actor.user_id, "user deactivated");
        Ok(())
    }

    pub async fn list_users(&self, actor: &ActorContext) -> EngineResult<Vec<User>> {
        authz::require_admin(actor, "listing users")?;
        let mut users = self.store.list_users().await?;
        users.sort_by_key(|user| user.id);
        Ok(users)
    }
}
