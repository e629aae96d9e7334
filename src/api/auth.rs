use poem_openapi::{auth::Bearer, param::Path, payload::Json, OpenApi, SecurityScheme, Tags};
use std::sync::Arc;

use crate::api::helpers;
use crate::errors::AuthError;
use crate::services::{crypto, Mailer, TokenService};
use crate::stores::UserStore;
use crate::types::db::user;
use crate::types::dto::auth::{
    ChangeEmailRequest, ChangePasswordRequest, LoginRequest, MessageResponse,
    PasswordResetRequest, PasswordResetSubmit, RegisterRequest, RegisterResponse, TokenResponse,
    UserResponse,
};
use crate::types::internal::{CurrentUser, Permission};

/// Account and authentication API endpoints
pub struct AuthApi {
    users: Arc<UserStore>,
    tokens: Arc<TokenService>,
    mailer: Arc<dyn Mailer>,
}

impl AuthApi {
    /// Create a new AuthApi over the given store, token service and mailer
    pub fn new(users: Arc<UserStore>, tokens: Arc<TokenService>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            users,
            tokens,
            mailer,
        }
    }

    /// Resolve the bearer token to a user and refresh their last-seen
    /// timestamp. Every authenticated endpoint goes through here.
    async fn current_user(&self, auth: &BearerAuth) -> Result<user::Model, AuthError> {
        let claims = self.tokens.validate_access_token(&auth.0.token)?;
        let user_id: i32 = claims.sub.parse().map_err(|_| AuthError::invalid_token())?;

        let found = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(AuthError::invalid_token)?;

        self.users.ping(found.id).await?;

        Ok(found)
    }

    /// Like `current_user`, but with the role loaded for permission checks
    async fn current_user_with_role(&self, auth: &BearerAuth) -> Result<CurrentUser, AuthError> {
        let claims = self.tokens.validate_access_token(&auth.0.token)?;
        let user_id: i32 = claims.sub.parse().map_err(|_| AuthError::invalid_token())?;

        let (found, role) = self
            .users
            .find_with_role(user_id)
            .await?
            .ok_or_else(AuthError::invalid_token)?;

        self.users.ping(found.id).await?;

        Ok(CurrentUser::Authenticated { user: found, role })
    }

    fn send_confirmation_email(&self, recipient: &user::Model) -> Result<(), AuthError> {
        let token = self.tokens.generate_confirmation_token(recipient.id)?;
        self.mailer.send(
            &recipient.email,
            "Confirm Your Account",
            &format!(
                "Dear {},\n\nWelcome to Inkpost! To confirm your account please visit:\n/auth/confirm/{}",
                recipient.username, token
            ),
        );
        Ok(())
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// API tags for account endpoints
#[derive(Tags)]
enum AuthTags {
    /// Account and authentication endpoints
    Accounts,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a new account and send a confirmation email
    #[oai(path = "/register", method = "post", tag = "AuthTags::Accounts")]
    async fn register(
        &self,
        body: Json<RegisterRequest>,
    ) -> Result<Json<RegisterResponse>, AuthError> {
        helpers::validate_email(&body.email)?;
        helpers::validate_username(&body.username)?;
        helpers::validate_password(&body.password)?;

        let created = self
            .users
            .register(&body.email, &body.username, &body.password)
            .await?;

        self.send_confirmation_email(&created)?;

        tracing::info!(user_id = created.id, "registered new user");

        Ok(Json(RegisterResponse {
            user_id: created.id,
            message: "A confirmation email has been sent to you by email".to_string(),
        }))
    }

    /// Login with email and password to receive an access token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Accounts")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let found = self
            .users
            .verify_credentials(&body.email, &body.password)
            .await?;

        let access_token = self.tokens.generate_access_token(found.id)?;

        Ok(Json(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.access_ttl_secs(),
        }))
    }

    /// Confirm the logged-in user's account via an emailed token
    ///
    /// Replaying a confirmation link after the account is already confirmed
    /// is a successful no-op.
    #[oai(path = "/confirm/:token", method = "get", tag = "AuthTags::Accounts")]
    async fn confirm(
        &self,
        auth: BearerAuth,
        token: Path<String>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let found = self.current_user(&auth).await?;

        if found.confirmed {
            return Ok(Json(MessageResponse {
                message: "Account already confirmed".to_string(),
            }));
        }

        let token_user_id = self.tokens.verify_confirmation_token(&token.0)?;
        if token_user_id != found.id {
            // A valid token for some other account is still invalid here
            return Err(AuthError::invalid_token());
        }

        self.users.confirm(found.id).await?;

        Ok(Json(MessageResponse {
            message: "You have confirmed your account. Thanks!".to_string(),
        }))
    }

    /// Re-send the confirmation email for the logged-in user
    #[oai(path = "/confirm/resend", method = "post", tag = "AuthTags::Accounts")]
    async fn resend_confirmation(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let found = self.current_user(&auth).await?;

        if found.confirmed {
            return Ok(Json(MessageResponse {
                message: "Account already confirmed".to_string(),
            }));
        }

        self.send_confirmation_email(&found)?;

        Ok(Json(MessageResponse {
            message: "A new confirmation email has been sent to you by email".to_string(),
        }))
    }

    /// Change the logged-in user's password
    #[oai(path = "/password/change", method = "post", tag = "AuthTags::Accounts")]
    async fn change_password(
        &self,
        auth: BearerAuth,
        body: Json<ChangePasswordRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let found = self.current_user(&auth).await?;

        crypto::verify_password(&body.old_password, &found.password_hash)?;
        helpers::validate_password(&body.new_password)?;

        self.users.set_password(found.id, &body.new_password).await?;

        Ok(Json(MessageResponse {
            message: "Your password has been updated".to_string(),
        }))
    }

    /// Request a password-reset email
    ///
    /// Responds identically whether or not the address is registered, so
    /// the endpoint cannot be used to probe for accounts.
    #[oai(path = "/password/reset", method = "post", tag = "AuthTags::Accounts")]
    async fn password_reset_request(
        &self,
        body: Json<PasswordResetRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        if let Some(found) = self.users.find_by_email(&body.email).await? {
            let token = self.tokens.generate_reset_token(found.id)?;
            self.mailer.send(
                &found.email,
                "Reset Your Password",
                &format!(
                    "Dear {},\n\nTo reset your password please visit:\n/auth/password/reset/{}",
                    found.username, token
                ),
            );
        }

        Ok(Json(MessageResponse {
            message: "An email with instructions to reset your password has been sent to you"
                .to_string(),
        }))
    }

    /// Set a new password using an emailed reset token
    #[oai(
        path = "/password/reset/:token",
        method = "post",
        tag = "AuthTags::Accounts"
    )]
    async fn password_reset(
        &self,
        token: Path<String>,
        body: Json<PasswordResetSubmit>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        helpers::validate_password(&body.new_password)?;

        let token_user_id = self.tokens.verify_reset_token(&token.0)?;

        // A token for a since-deleted user gets the same generic failure
        self.users
            .find_by_id(token_user_id)
            .await?
            .ok_or_else(AuthError::invalid_token)?;

        self.users
            .set_password(token_user_id, &body.new_password)
            .await?;

        Ok(Json(MessageResponse {
            message: "Your password has been updated".to_string(),
        }))
    }

    /// Start an email change; a confirmation link is sent to the new address
    #[oai(path = "/email/change", method = "post", tag = "AuthTags::Accounts")]
    async fn change_email_request(
        &self,
        auth: BearerAuth,
        body: Json<ChangeEmailRequest>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let found = self.current_user(&auth).await?;

        crypto::verify_password(&body.password, &found.password_hash)?;
        helpers::validate_email(&body.new_email)?;

        if self.users.find_by_email(&body.new_email).await?.is_some() {
            return Err(AuthError::duplicate_email());
        }

        let token = self
            .tokens
            .generate_email_change_token(found.id, &body.new_email)?;
        self.mailer.send(
            &body.new_email,
            "Confirm Your Email Address",
            &format!(
                "Dear {},\n\nTo confirm your new email address please visit:\n/auth/email/change/{}",
                found.username, token
            ),
        );

        Ok(Json(MessageResponse {
            message:
                "An email with instructions to confirm your new email address has been sent to you"
                    .to_string(),
        }))
    }

    /// Apply a pending email change using an emailed token
    #[oai(
        path = "/email/change/:token",
        method = "get",
        tag = "AuthTags::Accounts"
    )]
    async fn change_email(
        &self,
        auth: BearerAuth,
        token: Path<String>,
    ) -> Result<Json<MessageResponse>, AuthError> {
        let found = self.current_user(&auth).await?;

        let (token_user_id, new_email) = self.tokens.verify_email_change_token(&token.0)?;
        if token_user_id != found.id {
            return Err(AuthError::invalid_token());
        }

        self.users.change_email(found.id, &new_email).await?;

        Ok(Json(MessageResponse {
            message: "Your email address has been updated".to_string(),
        }))
    }

    /// Return the logged-in user's account, role and permissions
    #[oai(path = "/me", method = "get", tag = "AuthTags::Accounts")]
    async fn me(&self, auth: BearerAuth) -> Result<Json<UserResponse>, AuthError> {
        let current = self.current_user_with_role(&auth).await?;

        match current {
            CurrentUser::Authenticated { user: found, role } => Ok(Json(UserResponse {
                id: found.id,
                email: found.email,
                username: found.username,
                role: role.name,
                permissions: role.permissions,
                confirmed: found.confirmed,
                member_since: found.member_since,
                last_seen: found.last_seen,
            })),
            CurrentUser::Anonymous => Err(AuthError::invalid_token()),
        }
    }

    /// Look up any user's account; requires a confirmed administrator
    #[oai(path = "/users/:id", method = "get", tag = "AuthTags::Accounts")]
    async fn get_user(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<UserResponse>, AuthError> {
        let current = self.current_user_with_role(&auth).await?;

        if let Some(requester) = current.user() {
            helpers::require_confirmed(requester)?;
        }
        helpers::authorize(&current, Permission::ADMIN)?;

        let (found, role) = self
            .users
            .find_with_role(id.0)
            .await?
            .ok_or_else(|| AuthError::validation("No such user"))?;

        Ok(Json(UserResponse {
            id: found.id,
            email: found.email,
            username: found.username,
            role: role.name,
            permissions: role.permissions,
            confirmed: found.confirmed,
            member_since: found.member_since,
            last_seen: found.last_seen,
        }))
    }
}
