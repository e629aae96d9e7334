use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for user registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email address, used for login and confirmation mail
    pub email: String,

    /// Public username
    pub username: String,

    /// Plaintext password, hashed before storage
    pub password: String,
}

/// Response model for registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Id of the newly created (unconfirmed) user
    pub user_id: i32,

    /// Human-readable status message
    pub message: String,
}

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address used at registration
    pub email: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing the login access token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

/// Generic message response for state-changing operations
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable status message
    pub message: String,
}

/// Request model for changing the password of a logged-in user
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password for verification
    pub old_password: String,

    /// New password to set
    pub new_password: String,
}

/// Request model for asking for a password-reset email
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    /// Email address the reset link should be sent to
    pub email: String,
}

/// Request model for completing a password reset via token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PasswordResetSubmit {
    /// New password to set
    pub new_password: String,
}

/// Request model for starting an email change
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ChangeEmailRequest {
    /// Current password for verification
    pub password: String,

    /// New email address; a confirmation link is sent there
    pub new_email: String,
}

/// Response model for the current-user endpoint
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User id
    pub id: i32,

    /// Email address
    pub email: String,

    /// Public username
    pub username: String,

    /// Name of the assigned role
    pub role: String,

    /// Permission bitmask of the assigned role
    pub permissions: i32,

    /// Whether the account email has been confirmed
    pub confirmed: bool,

    /// Registration time (Unix timestamp)
    pub member_since: i64,

    /// Last authenticated request (Unix timestamp)
    pub last_seen: i64,
}
