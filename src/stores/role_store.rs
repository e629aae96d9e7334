use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::errors::AuthError;
use crate::types::db::role::{self, Entity as Role};
use crate::types::internal::permission::Permission;

/// RoleStore manages the fixed set of roles and their permission masks
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    /// Name of the role assigned to ordinary registrations
    pub const DEFAULT_ROLE: &'static str = "User";

    /// Name of the role assigned to the configured admin email
    pub const ADMINISTRATOR_ROLE: &'static str = "Administrator";

    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The built-in role definitions
    pub fn builtin_definitions() -> Vec<(&'static str, Permission)> {
        vec![
            (Self::DEFAULT_ROLE, Permission::user()),
            ("Moderator", Permission::moderator()),
            (Self::ADMINISTRATOR_ROLE, Permission::administrator()),
        ]
    }

    /// Seed the built-in roles; run once at startup
    pub async fn seed_roles(&self) -> Result<(), AuthError> {
        self.seed(&Self::builtin_definitions(), Self::DEFAULT_ROLE)
            .await
    }

    /// Find-or-create each named role, rebuild its permission mask from the
    /// definition, and mark exactly `default_role_name` as default.
    ///
    /// Idempotent and self-healing: re-running restores the defined masks
    /// and default flag regardless of manual edits in between.
    ///
    /// # Arguments
    /// * `definitions` - Role names with the permissions they grant
    /// * `default_role_name` - Must name one of the definitions
    pub async fn seed(
        &self,
        definitions: &[(&str, Permission)],
        default_role_name: &str,
    ) -> Result<(), AuthError> {
        // A default role outside the definitions is a configuration error,
        // fatal before any row is touched.
        if !definitions
            .iter()
            .any(|(name, _)| *name == default_role_name)
        {
            return Err(AuthError::internal_error(format!(
                "Default role '{}' is not among the role definitions",
                default_role_name
            )));
        }

        for (name, granted) in definitions {
            let is_default = *name == default_role_name;

            // Reset the mask to zero, then add each granted permission
            let mut mask = role::Model {
                id: 0,
                name: name.to_string(),
                is_default,
                permissions: 0,
            };
            mask.reset_permissions();
            for flag in granted.iter() {
                mask.add_permission(flag);
            }

            let existing = Role::find()
                .filter(role::Column::Name.eq(*name))
                .one(&self.db)
                .await
                .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;

            match existing {
                Some(found) => {
                    let mut active: role::ActiveModel = found.into();
                    active.permissions = Set(mask.permissions);
                    active.is_default = Set(is_default);
                    active
                        .update(&self.db)
                        .await
                        .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;
                }
                None => {
                    let active = role::ActiveModel {
                        id: sea_orm::ActiveValue::NotSet,
                        name: Set(name.to_string()),
                        is_default: Set(is_default),
                        permissions: Set(mask.permissions),
                    };
                    active
                        .insert(&self.db)
                        .await
                        .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;
                }
            }

            tracing::debug!(role = *name, mask = mask.permissions, is_default, "seeded role");
        }

        Ok(())
    }

    /// Find a role by its unique name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<role::Model>, AuthError> {
        Role::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))
    }

    /// Find the role marked as default for new users
    pub async fn find_default(&self) -> Result<Option<role::Model>, AuthError> {
        Role::find()
            .filter(role::Column::IsDefault.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))
    }

    /// Persist a role's permission mask after in-memory add/remove calls
    pub async fn save_permissions(&self, updated: role::Model) -> Result<role::Model, AuthError> {
        let permissions = updated.permissions;
        let mut active: role::ActiveModel = updated.into();
        active.permissions = Set(permissions);
        active
            .update(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))
    }
}
