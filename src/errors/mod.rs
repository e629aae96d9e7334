// Errors layer - Error type definitions
pub mod auth;

pub use auth::AuthError;
