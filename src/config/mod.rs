mod database;
mod logging;
mod secret_manager;
mod settings;

pub use database::{init_database, migrate};
pub use logging::init_logging;
pub use secret_manager::{SecretError, SecretManager};
pub use settings::AppSettings;
