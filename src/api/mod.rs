// API layer - HTTP endpoints
pub mod auth;
pub mod health;
pub mod helpers;

pub use auth::AuthApi;
pub use health::HealthApi;
