use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use catalog::{
    repositories::{ProductRepository, UserRepository},
    routes,
    state::AppState,
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

    info!("Starting catalog service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let app_state = AppState {
        products: Arc::new(ProductRepository::new(pool.clone())),
        users: Arc::new(UserRepository::new(pool)),
        token_service: TokenService::new(&JwtConfig::from_env()?),
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::load("CATALOG", 3001)?;
    let listener = tokio::net::TcpListener::bind(server_config.bind_address()).await?;
    info!("Catalog service listening on {}", server_config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
