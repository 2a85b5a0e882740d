//! Event registration backend - Entry point.

use anyhow::Context;
use event_registration::{
    api::{create_app, AppState, RateLimitState},
    auth::{AdminSessions, StaticCredentials},
    config::Config,
};
use registration_store::{RecordStore, Store};
use secrecy::SecretString;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Signing secret used when none is configured. Development only.
const DEV_SECRET_KEY: &str = "dev-only-insecure-secret";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting event registration backend");

    // Initialize storage
    let store = Store::open(config.store.persist, config.store.path.clone())
        .await
        .context("Failed to open record store")?;
    info!("Record store ready with {} records", store.count().await?);
    let store: Arc<dyn RecordStore> = Arc::new(store);

    // Admin sessions
    let secret = match config.auth.secret_key.clone() {
        Some(secret) => secret,
        None => {
            warn!("AUTH__SECRET_KEY not set, signing admin tokens with a development secret");
            SecretString::new(DEV_SECRET_KEY.into())
        }
    };
    let credentials = StaticCredentials::new(config.auth.username.clone(), &config.auth.password);
    let sessions = AdminSessions::new(Arc::new(credentials), &secret, config.auth.token_ttl);

    // Create application state
    let state = AppState::new(store, sessions, config.export.dir.clone());

    let rate_limit = RateLimitState::new(config.rate_limit.registrations_per_minute);

    if let Some(dir) = &config.server.static_dir {
        info!("Serving static files from {:?}", dir);
    }
    let app = create_app(state, rate_limit, config.server.static_dir.as_deref());

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server is running on http://{}", addr);

    // Run server
    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
