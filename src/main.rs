use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use chrono_tz::Tz;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use mailplan::cache::ScheduleCache;
use mailplan::config::AppConfig;
use mailplan::errors::AppError;
use mailplan::handlers;
use mailplan::services::ai::groq::GroqProvider;
use mailplan::services::ai::ollama::OllamaProvider;
use mailplan::services::ai::LlmProvider;
use mailplan::services::calendar::google::GoogleCalendarProvider;
use mailplan::services::mail::gmail::GmailProvider;
use mailplan::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let timezone: Tz = config
        .timezone
        .parse()
        .map_err(|_| AppError::Config(format!("unknown timezone: {}", config.timezone)))?;

    let llm_timeout = Duration::from_secs(config.llm_timeout_secs);
    let llm: Box<dyn LlmProvider> = match config.llm_provider.as_str() {
        "groq" => {
            anyhow::ensure!(
                !config.groq_api_key.is_empty(),
                "GROQ_API_KEY must be set when LLM_PROVIDER=groq"
            );
            tracing::info!("using Groq LLM provider (model: {})", config.groq_model);
            Box::new(GroqProvider::new(
                config.groq_api_key.clone(),
                config.groq_model.clone(),
                llm_timeout,
            ))
        }
        _ => {
            tracing::info!(
                "using Ollama LLM provider (url: {}, model: {})",
                config.ollama_url,
                config.ollama_model
            );
            Box::new(OllamaProvider::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
                llm_timeout,
            ))
        }
    };

    if config.google_access_token.is_empty() {
        tracing::warn!("GOOGLE_ACCESS_TOKEN not set, Gmail and Calendar calls will fail");
    }
    let mail = GmailProvider::new(config.google_access_token.clone());
    let calendar = GoogleCalendarProvider::new(
        config.google_access_token.clone(),
        config.calendar_id.clone(),
    );

    let state = Arc::new(AppState {
        timezone,
        llm,
        mail: Box::new(mail),
        calendar: Box::new(calendar),
        cache: ScheduleCache::new(),
        config,
    });

    let app = Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/emails", get(handlers::emails::get_emails))
        .route("/api/fetch-emails", get(handlers::emails::fetch_emails))
        .route(
            "/api/scheduling-emails",
            get(handlers::emails::scheduling_emails),
        )
        .route("/api/check-emails", post(handlers::emails::check_emails))
        .route(
            "/api/schedule-event",
            post(handlers::scheduling::schedule_event),
        )
        .route(
            "/api/process-email",
            post(handlers::scheduling::process_email),
        )
        .route(
            "/api/debug-scheduling",
            get(handlers::scheduling::debug_scheduling),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let addr = format!("0.0.0.0:{}", state.config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
