use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use dotenv::dotenv;
use once_cell::sync::Lazy;
use serde_json::json;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

mod api_client;
mod domain;
mod locale;
#[cfg(test)]
mod tests;
mod usecases;

use crate::api_client::ReqwestNewsProvider;
use crate::domain::models::{Holding, PortfolioAnalysis};
use crate::locale::format_eur;
use crate::usecases::analyze_portfolio::analyze;
use crate::usecases::news_service::NewsService;
use crate::usecases::parse_holdings::parse_holdings;

// The application owns the current-portfolio slot; loads replace it
// wholesale, analysis always runs on a value taken from it.
#[derive(Clone)]
struct AppState {
    portfolio: Arc<RwLock<Vec<Holding>>>,
    news: Arc<NewsService>,
}

static SAMPLE_PORTFOLIO: Lazy<Vec<Holding>> = Lazy::new(|| {
    vec![
        Holding::new("AAPL", 10.0, 145.2),
        Holding::new("MSFT", 6.0, 312.45),
        Holding::new("SAP", 12.0, 116.8),
        Holding::new("NVDA", 4.0, 780.5),
    ]
});

// Display rendering sits here, outside the analysis core: raw numbers get
// de-DE currency strings alongside them.
fn render_analysis(analysis: &PortfolioAnalysis) -> serde_json::Value {
    let top_holding = analysis.summary.top_holding.as_ref().map(|top| {
        json!({
            "symbol": top.symbol,
            "value": top.value,
            "value_display": format_eur(top.value),
        })
    });
    json!({
        "summary": {
            "total_value": analysis.summary.total_value,
            "total_value_display": format_eur(analysis.summary.total_value),
            "position_count": analysis.summary.position_count,
            "top_holding": top_holding,
            "average_cost": analysis.summary.average_cost,
            "average_cost_display": format_eur(analysis.summary.average_cost),
        },
        "positions": analysis.positions,
        "forecast": {
            "expected": analysis.forecast.expected,
            "expected_display": format_eur(analysis.forecast.expected),
            "high": analysis.forecast.high,
            "high_display": format_eur(analysis.forecast.high),
            "low": analysis.forecast.low,
            "low_display": format_eur(analysis.forecast.low),
        },
        "narrative": {
            "sentences": analysis.narrative.sentences,
            "text": analysis.narrative.text(),
        },
    })
}

async fn api_portfolio(State(state): State<AppState>) -> Json<serde_json::Value> {
    let holdings = state.portfolio.read().await.clone();
    Json(render_analysis(&analyze(&holdings)))
}

#[tracing::instrument(skip(state, body))]
async fn api_load_portfolio(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let holdings = parse_holdings(&body);
    if holdings.is_empty() {
        warn!("Upload contained no usable rows, keeping current portfolio");
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "CSV konnte nicht gelesen werden. Bitte Format prüfen."})),
        ));
    }
    info!(positions = holdings.len(), "Portfolio replaced");
    let analysis = analyze(&holdings);
    *state.portfolio.write().await = holdings;
    Ok(Json(render_analysis(&analysis)))
}

async fn api_load_sample(State(state): State<AppState>) -> Json<serde_json::Value> {
    let holdings = SAMPLE_PORTFOLIO.clone();
    info!(positions = holdings.len(), "Sample portfolio loaded");
    let analysis = analyze(&holdings);
    *state.portfolio.write().await = holdings;
    Json(render_analysis(&analysis))
}

async fn api_news(State(state): State<AppState>) -> Json<serde_json::Value> {
    let symbols: Vec<String> = state
        .portfolio
        .read()
        .await
        .iter()
        .map(|h| h.symbol.clone())
        .collect();
    let articles = state.news.portfolio_news(&symbols).await;
    Json(json!({"articles": articles}))
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/portfolio", get(api_portfolio).post(api_load_portfolio))
        .route("/api/portfolio/sample", post(api_load_sample))
        .route("/api/news", get(api_news))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let state = AppState {
        portfolio: Arc::new(RwLock::new(Vec::new())),
        news: Arc::new(NewsService::new(
            Arc::new(ReqwestNewsProvider::new()),
            std::env::var("NEWS_API_KEY").ok(),
        )),
    };

    serve(router(state), 3001).await;
}

// How many consecutive ports to try when the preferred one is taken
const MAX_BIND_ATTEMPTS: u16 = 10;

async fn serve(app: Router, port: u16) {
    for try_port in port..port + MAX_BIND_ATTEMPTS {
        let addr = SocketAddr::from(([127, 0, 0, 1], try_port));
        match tokio::net::TcpListener::bind(&addr).await {
            Ok(listener) => {
                info!(%addr, "Listening");
                if let Err(e) = axum::serve(listener, app).await {
                    error!(error = %e, "Server failed while serving");
                }
                return;
            }
            Err(e) => {
                warn!(port = try_port, error = %e, "Port unavailable, trying next");
            }
        }
    }
    error!(
        "No free port in range {}..{}",
        port,
        port + MAX_BIND_ATTEMPTS
    );
}
