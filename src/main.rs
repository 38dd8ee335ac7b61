/// authgate — main entry point
use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use authgate::{
    config::Config,
    rate_limit::RateLimiter,
    routes,
    security::JwtKeys,
    services::SessionService,
    store::{AuthStore, PgStore},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("authgate=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        "Starting authgate on {}:{}",
        config.server_host,
        config.server_port
    );

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database connection pool initialized");

    let store: Arc<dyn AuthStore> = Arc::new(PgStore::new(pool));
    let keys = JwtKeys::from_config(&config);
    let sessions = Arc::new(SessionService::new(
        store.clone(),
        keys,
        config.bcrypt_cost,
        config.refresh_token_cap,
    ));
    let rate_limiter = Arc::new(RateLimiter::new(&config));

    spawn_sweeper(
        store,
        rate_limiter.clone(),
        chrono::Duration::seconds(config.refresh_token_ttl_secs),
    );

    let state = AppState {
        sessions,
        rate_limiter,
    };

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("REST API listening on {}", addr);

    axum::serve(
        listener,
        routes::router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Periodic compaction: expired refresh records are already invisible to the
/// read paths, this just reclaims the rows. Also prunes idle rate-limit
/// windows.
fn spawn_sweeper(
    store: Arc<dyn AuthStore>,
    rate_limiter: Arc<RateLimiter>,
    refresh_ttl: chrono::Duration,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match store.purge_expired_tokens(refresh_ttl).await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "removed expired refresh tokens"),
                Err(e) => tracing::warn!(error = %e, "refresh token sweep failed"),
            }
            rate_limiter.prune();
        }
    });
}
