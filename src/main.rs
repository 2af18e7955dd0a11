use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use roamance_api::app::{router, AppState, Assistant};
use roamance_api::config;
use roamance_api::database::{DatabaseManager, InMemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET and GEMINI_API_KEY can live there
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config().clone();
    tracing::info!("Starting Roamance API in {:?} mode", config.environment);

    config.validate()?;

    let store: Arc<dyn Store> = match config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database).await?;
            let store = PgStore::new(pool);
            store.ensure_schema().await?;
            tracing::info!("Using Postgres store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store");
            Arc::new(InMemoryStore::new())
        }
    };

    let assistant = Assistant::from_settings(&config.gemini)?;
    let port = config.api.port;
    let mut state = AppState::new(store, config);
    match assistant {
        Some(assistant) => {
            tracing::info!("Travel assistant enabled with model {}", assistant.chat.model_name());
            state = state.with_assistant(assistant);
        }
        None => tracing::info!("GEMINI_API_KEY not set; assistant endpoints will return 503"),
    }

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Roamance API listening on http://{}", bind_addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
