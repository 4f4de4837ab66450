use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use accounts::{
    accounts::AccountManager, repositories::UserRepository, routes, state::AppState,
};
use common::{
    database::{self, DatabaseConfig},
    jwt::{JwtConfig, TokenService},
    server::ServerConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting accounts service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let token_service = TokenService::new(&JwtConfig::from_env()?);
    let accounts = AccountManager::new(Arc::new(UserRepository::new(pool)));

    if let (Ok(email), Ok(password)) = (
        std::env::var("ACCOUNTS_SUPERUSER_EMAIL"),
        std::env::var("ACCOUNTS_SUPERUSER_PASSWORD"),
    ) {
        accounts.bootstrap_superuser(&email, &password).await?;
    }

    let app_state = AppState {
        accounts,
        token_service,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::load("ACCOUNTS", 3000)?;
    let listener = tokio::net::TcpListener::bind(server_config.bind_address()).await?;
    info!("Accounts service listening on {}", server_config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
