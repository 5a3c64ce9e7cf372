use std::sync::Arc;

use anyhow::{Context, Result};
use msgstore_config::{Config, StoreBackend};
use msgstore_db::{InMemoryMessageStore, MessageStore, MongoMessageStore};
use msgstore_shared::clients::{
    HttpPolicyClient, HttpSessionResolver, HttpUserDirectory, UserDirectory, build_http_client,
};
use msgstore_shared::routes::create_router;
use msgstore_shared::{ServiceContext, shutdown_signal};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Arc::new(Config::from_env().context("Failed to load configuration")?);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== Message Service Starting ===");
    info!("Port: {}", config.port);
    if config.logging.uses_default_salt() {
        tracing::warn!("LOG_HASH_SALT not set, using the built-in default salt");
    }

    // Initialize storage
    let store: Arc<dyn MessageStore> = match config.db.backend {
        StoreBackend::MongoDb => {
            info!("Connecting to MongoDB...");
            let store = MongoMessageStore::connect(&config.db)
                .await
                .context("Failed to connect to MongoDB")?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("STORE_BACKEND=memory: messages are kept in process and lost on exit");
            Arc::new(InMemoryMessageStore::new())
        }
    };

    // Collaborator clients
    let http = build_http_client(&config.services).context("Failed to create HTTP client")?;
    let sessions = Arc::new(HttpSessionResolver::new(
        http.clone(),
        config.services.session_url.clone(),
    ));
    let policy = Arc::new(HttpPolicyClient::new(
        http.clone(),
        config.services.policy_url.clone(),
    ));
    let directory = match &config.services.directory_url {
        Some(url) => {
            info!("User directory enabled");
            Some(Arc::new(HttpUserDirectory::new(http, url.clone())) as Arc<dyn UserDirectory>)
        }
        None => {
            info!("User directory not configured, thread names will not be resolved");
            None
        }
    };

    // Create service context and router
    let context = Arc::new(ServiceContext::new(
        config.clone(),
        store,
        sessions,
        policy,
        directory,
    ));
    let app = create_router(context);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Message service listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to start server")?;

    info!("Message service stopped");
    Ok(())
}
