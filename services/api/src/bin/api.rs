//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, InMemoryStore, OpenAiSuggestionAdapter, RuleBasedSuggestionAdapter},
    config::Config,
    error::ApiError,
    web::{self, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use findia_core::ports::{AccountRepository, DebtRepository, SuggestionService};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Pick the Storage Backend ---
    let (debts, accounts): (Arc<dyn DebtRepository>, Arc<dyn AccountRepository>) =
        match &config.database_url {
            Some(database_url) => {
                info!("Connecting to database...");
                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(database_url)
                    .await?;
                let db_adapter = Arc::new(DbAdapter::new(db_pool));
                info!("Running database migrations...");
                db_adapter.run_migrations().await?;
                info!("Database migrations complete.");
                let debts: Arc<dyn DebtRepository> = db_adapter.clone();
                let accounts: Arc<dyn AccountRepository> = db_adapter;
                (debts, accounts)
            }
            None => {
                warn!("DATABASE_URL is not set; data will be kept in memory only.");
                let store = Arc::new(InMemoryStore::new());
                let debts: Arc<dyn DebtRepository> = store.clone();
                let accounts: Arc<dyn AccountRepository> = store;
                (debts, accounts)
            }
        };

    // --- 3. Pick the Suggestion Engine ---
    let suggestions: Arc<dyn SuggestionService> = match &config.openai_api_key {
        Some(api_key) => {
            info!("Using {} for suggestions.", config.suggestion_model);
            let openai_client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
            Arc::new(OpenAiSuggestionAdapter::new(
                openai_client,
                config.suggestion_model.clone(),
            ))
        }
        None => {
            info!("OPENAI_API_KEY is not set; using rule-based suggestions.");
            Arc::new(RuleBasedSuggestionAdapter::new())
        }
    };

    // --- 4. Build the Shared AppState and Router ---
    let app_state = Arc::new(AppState {
        debts,
        accounts,
        suggestions,
        config: config.clone(),
    });
    let app = web::router(app_state)?;

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
