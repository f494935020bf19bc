//! Tour gateway
//!
//! Request-defense and attribution layer between the public tour site
//! and its hosted data store:
//! - Fixed-window rate limiting on the redirect and booking endpoints
//! - Signature-based threat detection with free-text sanitization
//! - Affiliate attribution: `_aff` identity, UTM merge, click records

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use api::{router, AppState};
use attribution::UtmDefaults;
use guard::RateTiers;
use store_client::{CachedCatalog, Notifier, NotifyConfig, RestStore, StoreConfig};
use telemetry::{health, init_tracing_from_env, metrics};

/// How often a metrics snapshot is written to the log.
const METRICS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default)]
    rate: RateTiers,

    #[serde(default)]
    utm: UtmDefaults,

    #[serde(default)]
    store: StoreConfig,

    #[serde(default)]
    notify: NotifyConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            rate: RateTiers::default(),
            utm: UtmDefaults::default(),
            store: StoreConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider BEFORE any TLS operations
    // rustls 0.23+ requires explicit crypto provider selection
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting tour gateway v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    config
        .rate
        .validate()
        .context("Invalid rate tier configuration")?;
    config.utm.validate().context("Invalid UTM defaults")?;
    config
        .store
        .validate()
        .context("Invalid store configuration")?;

    info!(
        store = %config.store.trimmed_base(),
        booking_limit = config.rate.booking.limit,
        redirect_limit = config.rate.redirect.limit,
        "Loaded gateway config"
    );

    // Data store client; the catalog side goes through a read cache
    let store = RestStore::new(config.store.clone());
    let catalog = Arc::new(CachedCatalog::new(
        Arc::new(store.clone()),
        Duration::from_secs(config.store.cache_ttl_secs),
        config.store.cache_capacity,
    ));

    // Check health and update status
    check_health(&store).await;

    let notifier = Arc::new(Notifier::from_config(&config.notify));

    // Create application state
    let state = AppState::new(
        catalog,
        Arc::new(store),
        notifier,
        config.rate.clone(),
        config.utm.clone(),
    );

    // Start counter purge background task
    let _purge_handle = state.start_counter_purge();
    info!("Started counter purge task (every 5 minutes)");

    // Periodic metrics snapshot in the log
    let _metrics_handle = start_metrics_log();

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown; connect info feeds the
    // client-IP fallback for unproxied requests
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("GATEWAY")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested config from environment
    // The config crate's nested parsing doesn't work reliably with underscored field names
    if let Ok(base_url) = std::env::var("GATEWAY_STORE_BASE_URL") {
        config.store.base_url = base_url;
    }
    if let Ok(api_key) = std::env::var("GATEWAY_STORE_API_KEY") {
        config.store.api_key = Some(api_key);
    }
    if let Ok(webhook_url) = std::env::var("GATEWAY_NOTIFY_WEBHOOK_URL") {
        config.notify.webhook_url = Some(webhook_url);
    }

    Ok(config)
}

/// Check component health on startup.
async fn check_health(store: &RestStore) {
    let store_healthy = store_client::health::check_connection(store).await;
    if store_healthy {
        health().store.set_healthy();
        info!("Data store connection: healthy");
    } else {
        health().store.set_unhealthy("Connection failed");
        error!("Data store connection: unhealthy");
    }

    // The log channel always works; webhook trouble degrades this at
    // runtime instead.
    health().notifier.set_healthy();
}

/// Periodically log a metrics snapshot.
fn start_metrics_log() -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(METRICS_LOG_INTERVAL);
        // Skip the immediate first tick; an all-zero snapshot is noise
        interval.tick().await;
        loop {
            interval.tick().await;
            match serde_json::to_string(&metrics().snapshot()) {
                Ok(snapshot) => info!(snapshot = %snapshot, "Metrics snapshot"),
                Err(e) => error!("Failed to serialize metrics snapshot: {}", e),
            }
        }
    })
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
