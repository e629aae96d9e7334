mod api;
mod config;
mod errors;
mod services;
mod stores;
mod types;

use std::sync::Arc;

use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use api::{AuthApi, HealthApi};
use config::{init_database, init_logging, migrate, AppSettings, SecretManager};
use services::{LogMailer, TokenService};
use stores::{RoleStore, UserStore};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let settings = AppSettings::from_env();

    // The signing secret is mandatory; refuse to start without it
    let secrets = match SecretManager::init() {
        Ok(secrets) => secrets,
        Err(e) => {
            tracing::error!("Failed to load secrets: {}", e);
            std::process::exit(1);
        }
    };

    let db = match init_database(&settings.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database: {:?}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(database_url = %settings.database_url, "connected to database");

    if let Err(e) = migrate(&db).await {
        tracing::error!("Failed to run migrations: {:?}", e);
        std::process::exit(1);
    }
    tracing::info!("database migrations completed");

    // Roles must exist before any registration can resolve one
    let role_store = RoleStore::new(db.clone());
    if let Err(e) = role_store.seed_roles().await {
        tracing::error!("Failed to seed roles: {:?}", e);
        std::process::exit(1);
    }
    tracing::info!("roles seeded");

    let user_store = Arc::new(UserStore::new(db.clone(), settings.admin_email.clone()));
    let token_service = Arc::new(TokenService::new(
        secrets.secret_key().to_string(),
        settings.token_ttl_secs,
    ));
    let mailer = Arc::new(LogMailer::new(
        settings.mail_sender.clone(),
        settings.mail_subject_prefix.clone(),
    ));

    let auth_api = AuthApi::new(user_store, token_service, mailer);

    let api_service = OpenApiService::new((HealthApi, auth_api), "Inkpost API", "1.0.0")
        .server("http://localhost:3000/api");

    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!(bind_addr = %settings.bind_addr, "starting server");

    Server::new(TcpListener::bind(&settings.bind_addr))
        .run(app)
        .await
}
