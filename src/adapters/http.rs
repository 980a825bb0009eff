use crate::core::batch::BatchScraper;
use crate::core::resolver::ensure_full_url;
use crate::domain::model::ScrapeRequest;
use crate::domain::ports::BrowserLauncher;
use crate::utils::error::{Result, ScrapeError};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// `urls` 缺少、null 或空陣列都視為沒有網址
#[derive(Debug, Deserialize)]
pub struct ScrapePayload {
    #[serde(default)]
    pub urls: Option<Vec<String>>,
}

pub fn router<L>(scraper: Arc<BatchScraper<L>>) -> Router
where
    L: BrowserLauncher + 'static,
{
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/scrape", post(scrape::<L>))
        .layer(TraceLayer::new_for_http())
        .with_state(scraper)
}

/// POST /scrape
async fn scrape<L>(
    State(scraper): State<Arc<BatchScraper<L>>>,
    payload: std::result::Result<Json<ScrapePayload>, JsonRejection>,
) -> Response
where
    L: BrowserLauncher + 'static,
{
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            tracing::warn!("Rejected /scrape body: {}", rejection.body_text());
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON body: {}", rejection.body_text()),
            );
        }
    };

    let urls = match payload.urls {
        Some(urls) if !urls.is_empty() => urls,
        _ => return error_response(StatusCode::BAD_REQUEST, "No URLs provided".to_string()),
    };

    // 這個端點只有網址，商品名稱就用正規化後的網址
    let requests = urls
        .iter()
        .map(|url| {
            let url = ensure_full_url(url);
            ScrapeRequest::new(url.clone(), url)
        })
        .collect();

    match scraper.run(requests).await {
        Ok(report) => (StatusCode::OK, Json(report.results)).into_response(),
        Err(e) => {
            tracing::error!("❌ Batch failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr = listener
        .local_addr()
        .map_err(|e| ScrapeError::ServerError {
            message: e.to_string(),
        })?;
    tracing::info!("🌍 Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ScrapeError::ServerError {
            message: e.to_string(),
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}
