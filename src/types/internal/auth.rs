use serde::{Deserialize, Serialize};

/// Claims carried by a login access token
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user id)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Claims carried by an email-link token (confirmation, password reset,
/// email change). Exactly one of the purpose fields is set; `verify`
/// rejects tokens whose purpose does not match the operation.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EmailTokenClaims {
    /// User id to confirm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm: Option<i32>,

    /// User id whose password may be reset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset: Option<i32>,

    /// User id with a pending email change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_email: Option<i32>,

    /// Pending new email address, present only with `change_email`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_email: Option<String>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}
