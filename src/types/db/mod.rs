// Database entities - SeaORM models
pub mod role;
pub mod user;
