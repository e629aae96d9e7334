use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::errors::AuthError;
use crate::services::crypto;
use crate::stores::role_store::RoleStore;
use crate::types::db::role;
use crate::types::db::user::{self, Entity as User};

/// UserStore manages user accounts and their lifecycle
pub struct UserStore {
    db: DatabaseConnection,
    admin_email: Option<String>,
}

impl UserStore {
    /// Create a new UserStore
    ///
    /// # Arguments
    /// * `db` - The database connection
    /// * `admin_email` - Registrations with this email get the Administrator role
    pub fn new(db: DatabaseConnection, admin_email: Option<String>) -> Self {
        Self { db, admin_email }
    }

    /// Register a new, unconfirmed user
    ///
    /// The role is resolved at creation time: the configured admin email is
    /// assigned the Administrator role, everyone else the default role. The
    /// password is hashed before the row is written; the plaintext is never
    /// stored.
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The created user
    /// * `Err(AuthError)` - DuplicateEmail / DuplicateUsername, or
    ///   InternalError when no default role is seeded
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<user::Model, AuthError> {
        let roles = RoleStore::new(self.db.clone());

        let is_admin = self
            .admin_email
            .as_deref()
            .is_some_and(|admin| admin.eq_ignore_ascii_case(email));

        let role = if is_admin {
            roles.find_by_name(RoleStore::ADMINISTRATOR_ROLE).await?
        } else {
            roles.find_default().await?
        }
        // Startup seeding guarantees both roles exist; their absence means
        // the deployment is misconfigured, not that the request is bad.
        .ok_or_else(|| {
            AuthError::internal_error("No default role configured; role seeding has not run".to_string())
        })?;

        if self.find_by_email(email).await?.is_some() {
            return Err(AuthError::duplicate_email());
        }
        if self.find_by_username(username).await?.is_some() {
            return Err(AuthError::duplicate_username());
        }

        let password_hash = crypto::hash_password(password)?;
        let now = Utc::now().timestamp();

        let new_user = user::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            email: Set(email.to_string()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            role_id: Set(role.id),
            confirmed: Set(false),
            member_since: Set(now),
            last_seen: Set(now),
        };

        // The pre-checks above race with concurrent registrations; the
        // unique constraints are the authority and exactly one insert wins.
        new_user
            .insert(&self.db)
            .await
            .map_err(|e| Self::map_unique_violation(e, AuthError::duplicate_email()))
    }

    /// Verify login credentials and return the user on success
    ///
    /// Unknown email and wrong password collapse into the same
    /// InvalidCredentials error.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<user::Model, AuthError> {
        let found = self
            .find_by_email(email)
            .await
            .map_err(|_| AuthError::invalid_credentials())?
            .ok_or_else(AuthError::invalid_credentials)?;

        crypto::verify_password(password, &found.password_hash)?;

        Ok(found)
    }

    /// Find a user by id
    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<user::Model>, AuthError> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))
    }

    /// Find a user by unique email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AuthError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))
    }

    /// Find a user by unique username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, AuthError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))
    }

    /// Load a user together with its role
    pub async fn find_with_role(
        &self,
        user_id: i32,
    ) -> Result<Option<(user::Model, role::Model)>, AuthError> {
        let result = User::find_by_id(user_id)
            .find_also_related(role::Entity)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;

        match result {
            Some((found, Some(found_role))) => Ok(Some((found, found_role))),
            // role_id is non-null with a FK, so a missing role is corruption
            Some((found, None)) => Err(AuthError::internal_error(format!(
                "User {} has no resolvable role",
                found.id
            ))),
            None => Ok(None),
        }
    }

    /// Mark a user's email as confirmed
    ///
    /// Confirming an already-confirmed user is a successful no-op, so a
    /// replayed confirmation link never fails.
    pub async fn confirm(&self, user_id: i32) -> Result<user::Model, AuthError> {
        let found = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(AuthError::invalid_token)?;

        if found.confirmed {
            return Ok(found);
        }

        let mut active: user::ActiveModel = found.into();
        active.confirmed = Set(true);
        active
            .update(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))
    }

    /// Overwrite a user's password hash with a hash of `new_password`
    pub async fn set_password(&self, user_id: i32, new_password: &str) -> Result<(), AuthError> {
        let found = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(AuthError::invalid_token)?;

        let password_hash = crypto::hash_password(new_password)?;

        let mut active: user::ActiveModel = found.into();
        active.password_hash = Set(password_hash);
        active
            .update(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;

        Ok(())
    }

    /// Change a user's email address
    pub async fn change_email(
        &self,
        user_id: i32,
        new_email: &str,
    ) -> Result<user::Model, AuthError> {
        let found = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(AuthError::invalid_token)?;

        if self.find_by_email(new_email).await?.is_some() {
            return Err(AuthError::duplicate_email());
        }

        let mut active: user::ActiveModel = found.into();
        active.email = Set(new_email.to_string());
        active
            .update(&self.db)
            .await
            .map_err(|e| Self::map_unique_violation(e, AuthError::duplicate_email()))
    }

    /// Refresh the user's last-seen timestamp
    ///
    /// Called on every authenticated request. Concurrent pings race
    /// harmlessly; last write wins.
    pub async fn ping(&self, user_id: i32) -> Result<(), AuthError> {
        let Some(found) = self.find_by_id(user_id).await? else {
            return Ok(());
        };

        let mut active: user::ActiveModel = found.into();
        active.last_seen = Set(Utc::now().timestamp());
        active
            .update(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;

        Ok(())
    }

    fn map_unique_violation(e: sea_orm::DbErr, duplicate: AuthError) -> AuthError {
        let message = e.to_string();
        if message.contains("UNIQUE") {
            if message.contains("username") {
                AuthError::duplicate_username()
            } else {
                duplicate
            }
        } else {
            AuthError::internal_error(format!("Database error: {}", message))
        }
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("db", &"<connection>")
            .field("admin_email", &self.admin_email)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_test_db() -> (DatabaseConnection, UserStore) {
        setup_with_admin(None).await
    }

    async fn setup_with_admin(admin_email: Option<&str>) -> (DatabaseConnection, UserStore) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        RoleStore::new(db.clone())
            .seed_roles()
            .await
            .expect("Failed to seed roles");

        let user_store = UserStore::new(db.clone(), admin_email.map(|s| s.to_string()));
        (db, user_store)
    }

    #[tokio::test]
    async fn test_register_creates_unconfirmed_user_with_default_role() {
        let (db, store) = setup_test_db().await;

        let created = store
            .register("susan@example.com", "susan", "cat")
            .await
            .expect("Registration failed");

        assert!(!created.confirmed);
        assert_ne!(created.password_hash, "cat");
        assert!(created.password_hash.starts_with("$argon2"));

        let default_role = RoleStore::new(db.clone())
            .find_default()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.role_id, default_role.id);
    }

    #[tokio::test]
    async fn test_register_admin_email_gets_administrator_role() {
        let (db, store) = setup_with_admin(Some("admin@example.com")).await;

        let created = store
            .register("admin@example.com", "admin", "cat")
            .await
            .expect("Registration failed");

        let admin_role = RoleStore::new(db.clone())
            .find_by_name("Administrator")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.role_id, admin_role.id);
    }

    #[tokio::test]
    async fn test_register_admin_email_match_is_case_insensitive() {
        let (db, store) = setup_with_admin(Some("Admin@Example.com")).await;

        let created = store
            .register("admin@example.com", "admin", "cat")
            .await
            .expect("Registration failed");

        let admin_role = RoleStore::new(db.clone())
            .find_by_name("Administrator")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.role_id, admin_role.id);
    }

    #[tokio::test]
    async fn test_register_fails_without_seeded_roles() {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let store = UserStore::new(db, None);
        let result = store.register("susan@example.com", "susan", "cat").await;

        assert!(matches!(result, Err(AuthError::InternalError(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let (_db, store) = setup_test_db().await;

        store
            .register("susan@example.com", "susan", "cat")
            .await
            .expect("First registration failed");

        let result = store.register("susan@example.com", "susan2", "dog").await;
        assert!(matches!(result, Err(AuthError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let (_db, store) = setup_test_db().await;

        store
            .register("susan@example.com", "susan", "cat")
            .await
            .expect("First registration failed");

        let result = store.register("other@example.com", "susan", "dog").await;
        assert!(matches!(result, Err(AuthError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_verify_credentials_succeeds_with_correct_password() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .register("susan@example.com", "susan", "cat")
            .await
            .expect("Registration failed");

        let verified = store
            .verify_credentials("susan@example.com", "cat")
            .await
            .expect("Verification failed");
        assert_eq!(verified.id, created.id);
    }

    #[tokio::test]
    async fn test_verify_credentials_fails_with_wrong_password() {
        let (_db, store) = setup_test_db().await;

        store
            .register("susan@example.com", "susan", "cat")
            .await
            .expect("Registration failed");

        let result = store.verify_credentials("susan@example.com", "dog").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_verify_credentials_fails_for_unknown_email() {
        let (_db, store) = setup_test_db().await;

        let result = store.verify_credentials("nobody@example.com", "cat").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_confirm_flips_flag_once() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .register("susan@example.com", "susan", "cat")
            .await
            .expect("Registration failed");
        assert!(!created.confirmed);

        let confirmed = store.confirm(created.id).await.expect("Confirm failed");
        assert!(confirmed.confirmed);
    }

    #[tokio::test]
    async fn test_confirm_is_idempotent() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .register("susan@example.com", "susan", "cat")
            .await
            .expect("Registration failed");

        store.confirm(created.id).await.expect("First confirm failed");

        // Replaying confirmation is a successful no-op
        let again = store.confirm(created.id).await.expect("Second confirm failed");
        assert!(again.confirmed);
    }

    #[tokio::test]
    async fn test_set_password_replaces_hash() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .register("susan@example.com", "susan", "cat")
            .await
            .expect("Registration failed");

        store
            .set_password(created.id, "horse")
            .await
            .expect("Password change failed");

        assert!(store
            .verify_credentials("susan@example.com", "cat")
            .await
            .is_err());
        assert!(store
            .verify_credentials("susan@example.com", "horse")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_change_email_updates_address() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .register("susan@example.com", "susan", "cat")
            .await
            .expect("Registration failed");

        let updated = store
            .change_email(created.id, "susan@newdomain.com")
            .await
            .expect("Email change failed");
        assert_eq!(updated.email, "susan@newdomain.com");

        assert!(store
            .find_by_email("susan@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_change_email_rejects_taken_address() {
        let (_db, store) = setup_test_db().await;

        store
            .register("susan@example.com", "susan", "cat")
            .await
            .expect("Registration failed");
        let david = store
            .register("david@example.com", "david", "dog")
            .await
            .expect("Registration failed");

        let result = store.change_email(david.id, "susan@example.com").await;
        assert!(matches!(result, Err(AuthError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_ping_refreshes_last_seen() {
        let (db, store) = setup_test_db().await;

        let created = store
            .register("susan@example.com", "susan", "cat")
            .await
            .expect("Registration failed");

        // Back-date last_seen, then ping
        let mut active: user::ActiveModel = created.clone().into();
        active.last_seen = Set(created.last_seen - 600);
        active.update(&db).await.expect("Back-date failed");

        store.ping(created.id).await.expect("Ping failed");

        let reloaded = store.find_by_id(created.id).await.unwrap().unwrap();
        assert!(reloaded.last_seen >= created.last_seen);
    }

    #[tokio::test]
    async fn test_find_with_role_returns_pair() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .register("susan@example.com", "susan", "cat")
            .await
            .expect("Registration failed");

        let (found, found_role) = store
            .find_with_role(created.id)
            .await
            .expect("Lookup failed")
            .expect("User missing");

        assert_eq!(found.id, created.id);
        assert_eq!(found_role.name, "User");
        assert_eq!(found_role.permissions, 7);
    }
}
