use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use moju::application::services::session::SimulationSession;
use moju::config::{NewsMode, SimulationConfig};
use moju::domain::collaborators::news_source::NewsSource;
use moju::domain::errors::{Severity, TradeError};
use moju::domain::services::confirmation::TradeIntent;
use moju::infrastructure::http_news_source::{HttpNewsConfig, HttpNewsSource};
use moju::infrastructure::scripted_news_source::ScriptedNewsSource;
use moju::persistence::repository::SessionRepository;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared server state: one simulation session behind one lock, so every
/// user action runs to completion before the next is accepted.
struct AppState {
    session: Mutex<SimulationSession>,
    repository: Option<SessionRepository>,
    account: String,
}

impl AppState {
    /// Fire-and-forget save of the current session. A failure is surfaced
    /// as a warning message and never reverts the in-memory state.
    async fn persist(&self, session: &mut SimulationSession) {
        let Some(repository) = &self.repository else {
            return;
        };
        if let Err(e) = repository.save(&self.account, &session.snapshot()).await {
            warn!("Session save failed: {}", e);
            session.push_message(
                Severity::Warning,
                "Your progress could not be saved just now.",
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moju=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SimulationConfig::from_env();
    info!("MOJU classroom trading simulator starting...");

    let news_source: Arc<dyn NewsSource> = match config.news.mode {
        NewsMode::Scripted => {
            info!("News source: scripted (offline)");
            Arc::new(ScriptedNewsSource)
        }
        NewsMode::Http => {
            info!("News source: {} via {}", config.news.model, config.news.api_base);
            Arc::new(HttpNewsSource::new(
                HttpNewsConfig {
                    api_base: config.news.api_base.clone(),
                    model: config.news.model.clone(),
                    api_key: config.news.api_key.clone(),
                },
                // Sector names offered for annotation tagging.
                moju::domain::entities::catalog::default_sector_names(),
            ))
        }
    };

    // Persistence is best-effort: a broken database never blocks play.
    let repository = match moju::persistence::init_database(&config.database.url).await {
        Ok(pool) => Some(SessionRepository::new(pool)),
        Err(e) => {
            error!("Persistence disabled, database unavailable: {}", e);
            None
        }
    };

    let session = match &repository {
        Some(repo) => match repo.load(&config.account).await {
            Ok(Some(snapshot)) => {
                info!("Resuming saved session for account '{}'", config.account);
                SimulationSession::restore(snapshot, news_source.clone())
            }
            Ok(None) => SimulationSession::new(news_source.clone()),
            Err(e) => {
                warn!("Could not load saved session, starting fresh: {}", e);
                SimulationSession::new(news_source.clone())
            }
        },
        None => SimulationSession::new(news_source.clone()),
    };

    let state = Arc::new(AppState {
        session: Mutex::new(session),
        repository,
        account: config.account.clone(),
    });

    let app = Router::new()
        .route("/", get(|| async { "MOJU classroom trading simulator is running!" }))
        .route("/health", get(health_check))
        .route("/market", get(get_market))
        .route("/market/:name", get(get_instrument))
        .route("/portfolio", get(get_portfolio))
        .route("/news", get(get_news))
        .route("/news/previous", get(get_previous_news))
        .route("/news/generate", post(generate_news))
        .route("/day/advance", post(advance_day))
        .route("/messages", get(get_messages))
        .route("/trades", post(request_trade))
        .route("/trades/:token/confirm", post(confirm_trade))
        .route("/trades/:token/cancel", post(cancel_trade))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(16 * 1024))
        .with_state(state);

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let server = axum::serve(listener, app);

    let shutdown_signal = async {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal"),
                Err(e) => error!("Failed to install Ctrl+C handler: {}", e),
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                    info!("Received SIGTERM signal");
                }
                Err(e) => error!("Failed to install SIGTERM handler: {}", e),
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    };

    info!("Server started successfully. Press Ctrl+C to stop.");
    server.with_graceful_shutdown(shutdown_signal).await?;

    info!("Server shutting down gracefully...");
    Ok(())
}

fn trade_error_response(e: &TradeError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "severity": e.severity(), "text": e.to_string() })),
    )
        .into_response()
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let session = state.session.lock().await;
    Json(json!({
        "status": "running",
        "day": session.day(),
        "persistence": state.repository.is_some(),
    }))
}

/// Current prices and company profiles, in sector order.
async fn get_market(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let session = state.session.lock().await;
    let instruments: Vec<serde_json::Value> = session
        .catalog()
        .instruments()
        .map(|inst| {
            json!({
                "name": inst.name,
                "sector": inst.sector,
                "price": inst.current_price(),
                "daily_change_pct": inst.daily_change_pct(),
                "profile": inst.profile,
            })
        })
        .collect();
    Json(json!({ "day": session.day(), "instruments": instruments }))
}

/// One instrument with its full price history.
async fn get_instrument(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let session = state.session.lock().await;
    match session.catalog().instrument(&name) {
        Some(inst) => Json(json!({
            "name": inst.name,
            "sector": inst.sector,
            "price": inst.current_price(),
            "daily_change_pct": inst.daily_change_pct(),
            "profile": inst.profile,
            "price_history": inst.price_history(),
        }))
        .into_response(),
        None => trade_error_response(&TradeError::UnknownInstrument(name)),
    }
}

/// Portfolio valuation and per-holding breakdown.
async fn get_portfolio(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let session = state.session.lock().await;
    Json(serde_json::to_value(session.valuation()).unwrap_or_default())
}

/// Today's news batch, if generated.
async fn get_news(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let session = state.session.lock().await;
    match session.daily_news() {
        Some(batch) => Json(json!({ "day": batch.day, "articles": batch.articles })),
        None => Json(json!({ "day": session.day(), "articles": [] })),
    }
}

/// Yesterday's batch with annotations and the sector impacts they caused.
async fn get_previous_news(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let session = state.session.lock().await;
    match session.previous_news() {
        Some(batch) => Json(json!({
            "day": batch.day,
            "articles": batch.articles,
            "annotations": session.annotations(),
            "sector_impacts": session.sector_impacts(),
        })),
        None => Json(json!({ "articles": [] })),
    }
}

/// Message feed for the presentation layer.
async fn get_messages(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let session = state.session.lock().await;
    Json(json!({ "messages": session.messages() }))
}

async fn generate_news(State(state): State<Arc<AppState>>) -> Response {
    let mut session = state.session.lock().await;
    match session.generate_news().await {
        Ok(batch) => {
            let body = json!({ "day": batch.day, "articles": batch.articles });
            state.persist(&mut session).await;
            Json(body).into_response()
        }
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "severity": Severity::Error, "text": e.to_string() })),
        )
            .into_response(),
    }
}

async fn advance_day(State(state): State<Arc<AppState>>) -> Response {
    let mut session = state.session.lock().await;
    match session.advance_day().await {
        Ok(report) => {
            state.persist(&mut session).await;
            Json(serde_json::to_value(report).unwrap_or_default()).into_response()
        }
        Err(e) => (
            StatusCode::CONFLICT,
            Json(json!({ "severity": e.severity(), "text": e.to_string() })),
        )
            .into_response(),
    }
}

/// Phase one of a trade: park the intent, hand back a confirmation token.
async fn request_trade(
    State(state): State<Arc<AppState>>,
    Json(intent): Json<TradeIntent>,
) -> Json<serde_json::Value> {
    let mut session = state.session.lock().await;
    let token = session.request_trade(intent);
    Json(json!({ "token": token }))
}

/// Phase two: execute the parked intent.
async fn confirm_trade(
    State(state): State<Arc<AppState>>,
    Path(token): Path<u64>,
) -> Response {
    let mut session = state.session.lock().await;
    match session.confirm_trade(token) {
        Ok(receipt) => {
            state.persist(&mut session).await;
            Json(serde_json::to_value(receipt).unwrap_or_default()).into_response()
        }
        Err(e) => trade_error_response(&e),
    }
}

async fn cancel_trade(State(state): State<Arc<AppState>>, Path(token): Path<u64>) -> Response {
    let mut session = state.session.lock().await;
    match session.cancel_trade(token) {
        Ok(()) => Json(json!({ "cancelled": true })).into_response(),
        Err(e) => trade_error_response(&e),
    }
}
