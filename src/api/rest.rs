// =============================================================================
// REST API Endpoints: Axum 0.7
// =============================================================================
//
//   GET /api/v1/health                  liveness + request counter
//   GET /api/companies                  ticker dropdown contents
//   GET /api/emotions                   emotion reference data
//   GET /api/options                    valid ranges and chart types
//   GET /api/stock-data/:company        synthetic dataset + overlays
//
// Stock-data query parameters: `range`, `chart`, `sma`, `seed`, `volume`
// (bool), `emotions` (bool), `emotion_kinds` (comma-separated kinds). Invalid
// input yields 400 with `{ "success": false, "error": ... }`.
//
// CORS allows the configured origins for GET/OPTIONS only.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::app_state::AppState;
use crate::time_range::TimeRange;
use crate::types::{ChartType, EmotionInfo, EmotionKind};
use crate::view_model::{compute_view_model, ViewModel, ViewSelection};

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": message.into() })),
    )
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS, request tracing and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.read().allowed_origins);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/companies", get(companies))
        .route("/api/emotions", get(emotions))
        .route("/api/options", get(options))
        .route("/api/stock-data/:company", get(stock_data))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if allowed_origins.iter().any(|o| o == "*") {
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    requests_served: u64,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        requests_served: state.requests_served(),
        uptime_secs: state.uptime_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Reference data
// =============================================================================

async fn companies(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config.read().companies.clone())
}

async fn emotions() -> impl IntoResponse {
    let info: Vec<EmotionInfo> = EmotionKind::ALL.into_iter().map(EmotionInfo::from).collect();
    Json(info)
}

#[derive(Serialize)]
struct OptionsResponse {
    ranges: Vec<TimeRange>,
    chart_types: Vec<ChartType>,
    default_range: TimeRange,
}

async fn options(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(OptionsResponse {
        ranges: TimeRange::ALL.to_vec(),
        chart_types: ChartType::ALL.to_vec(),
        default_range: state.config.read().default_range,
    })
}

// =============================================================================
// Stock data
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct StockDataQuery {
    #[serde(default)]
    range: Option<String>,
    #[serde(default)]
    chart: Option<String>,
    #[serde(default)]
    sma: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    volume: Option<bool>,
    #[serde(default)]
    emotions: Option<bool>,
    #[serde(default)]
    emotion_kinds: Option<String>,
}

#[derive(Serialize)]
struct StockDataResponse {
    success: bool,
    #[serde(flatten)]
    view: ViewModel,
}

async fn stock_data(
    State(state): State<Arc<AppState>>,
    Path(company): Path<String>,
    query: Result<Query<StockDataQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        warn!(error = %rejection, "malformed stock data query");
        bad_request(rejection.body_text())
    })?;
    let config = state.config_snapshot();
    let company = company.trim().to_uppercase();

    if !config.has_company(&company) {
        warn!(company = %company, "stock data requested for unknown company");
        return Err(bad_request("Invalid company symbol"));
    }

    let mut selection = ViewSelection::new(company, &config);

    if let Some(range) = query.range.as_deref() {
        let time_range: TimeRange = range.parse().map_err(|e: anyhow::Error| {
            warn!(range = %range, "invalid time range");
            bad_request(e.to_string())
        })?;
        selection = selection.with_time_range(time_range);
    }
    if let Some(chart) = query.chart.as_deref() {
        let chart_type: ChartType = chart
            .parse()
            .map_err(|e: anyhow::Error| bad_request(e.to_string()))?;
        selection = selection.with_chart_type(chart_type);
    }
    if let Some(sma) = query.sma {
        if sma == 0 {
            return Err(bad_request("SMA period must be at least 1"));
        }
        selection.sma_period = sma;
    }
    if let Some(show) = query.volume {
        selection.show_volume = show;
    }
    if let Some(show) = query.emotions {
        selection.show_emotions = show;
    }
    if let Some(list) = query.emotion_kinds.as_deref() {
        selection.selected_emotions = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<EmotionKind>)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| bad_request(e.to_string()))?;
    }

    let mut rng = state.rng_for(query.seed);
    let today = chrono::Local::now().date_naive();
    let view = compute_view_model(&selection, &config, today, &mut rng);

    let served = state.record_request();
    debug!(served, "stock data request served");
    info!(
        company = %view.company,
        range = %view.time_range,
        bars = view.prices.len(),
        "stock data generated"
    );

    Ok(Json(StockDataResponse {
        success: true,
        view,
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Resource not found" })),
    )
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::runtime_config::DashboardConfig;

    fn app() -> Router {
        router(Arc::new(AppState::new(DashboardConfig::default())))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_json(app(), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["requests_served"], 0);
    }

    #[tokio::test]
    async fn companies_lists_configured_symbols() {
        let (status, body) = get_json(app(), "/api/companies").await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 39);
        assert_eq!(list[0], "NVDA");
    }

    #[tokio::test]
    async fn emotions_reference_data() {
        let (status, body) = get_json(app(), "/api/emotions").await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 9);
        assert_eq!(list[0]["kind"], "anger");
        assert_eq!(list[0]["color"], "#ff4d4d");
    }

    #[tokio::test]
    async fn options_list_ranges_and_charts() {
        let (_, body) = get_json(app(), "/api/options").await;
        assert_eq!(body["ranges"].as_array().unwrap().len(), 11);
        assert_eq!(body["chart_types"][0], "candlestick");
        assert_eq!(body["default_range"], "1M");
    }

    #[tokio::test]
    async fn stock_data_defaults_to_one_month() {
        let (status, body) = get_json(app(), "/api/stock-data/AAPL?seed=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["company"], "AAPL");
        assert_eq!(body["time_range"], "1M");
        assert_eq!(body["prices"].as_array().unwrap().len(), 30);
        assert_eq!(body["volume"].as_array().unwrap().len(), 30);
        assert_eq!(body["emotions"].as_object().unwrap().len(), 9);
        assert_eq!(body["trace"]["shape"], "ohlc");
    }

    #[tokio::test]
    async fn stock_data_same_seed_is_reproducible() {
        let state = Arc::new(AppState::new(DashboardConfig::default()));
        let (_, a) = get_json(router(state.clone()), "/api/stock-data/TSLA?range=3M&seed=9").await;
        let (_, b) = get_json(router(state.clone()), "/api/stock-data/TSLA?range=3M&seed=9").await;
        assert_eq!(a["prices"], b["prices"]);
        assert_eq!(a["indicators"]["rsi"], b["indicators"]["rsi"]);
        assert_eq!(state.requests_served(), 2);
    }

    #[tokio::test]
    async fn stock_data_honours_query_options() {
        let uri = "/api/stock-data/msft?range=1y&chart=line&sma=5&volume=false&emotion_kinds=anger,optimism&seed=3";
        let (status, body) = get_json(app(), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["company"], "MSFT");
        assert_eq!(body["chart_type"], "line");
        assert_eq!(body["trace"]["shape"], "series");
        assert_eq!(body["indicators"]["sma_period"], 5);
        assert!(body.get("volume").is_none());
        assert_eq!(body["emotions"].as_object().unwrap().len(), 2);
        assert_eq!(body["statistics"]["trading_days"], 365);
    }

    #[tokio::test]
    async fn stock_data_accepts_documented_toggles() {
        let uri = "/api/stock-data/AAPL?range=1M&chart=candlestick&sma=20&seed=1&volume=true&emotions=true";
        let (status, body) = get_json(app(), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["volume"].as_array().unwrap().len(), 30);
        assert_eq!(body["emotions"].as_object().unwrap().len(), 9);
        assert_eq!(body["indicators"]["rsi_series"].as_array().unwrap().len(), 30);
        assert_eq!(body["indicators"]["macd_series"]["line"].as_array().unwrap().len(), 30);
        assert_eq!(body["price_mood_distribution"].as_object().unwrap().len(), 9);

        let uri = "/api/stock-data/AAPL?seed=1&emotions=false";
        let (status, body) = get_json(app(), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("emotions").is_none());
    }

    #[tokio::test]
    async fn unknown_company_is_bad_request() {
        let (status, body) = get_json(app(), "/api/stock-data/NOPE").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid company symbol");
    }

    #[tokio::test]
    async fn invalid_range_is_bad_request() {
        let (status, body) = get_json(app(), "/api/stock-data/AAPL?range=MAX").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid time range"));
    }

    #[tokio::test]
    async fn invalid_chart_and_emotion_are_bad_requests() {
        let (status, _) = get_json(app(), "/api/stock-data/AAPL?chart=pie").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get_json(app(), "/api/stock-data/AAPL?emotion_kinds=joy").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, body) = get_json(app(), "/api/stock-data/AAPL?emotions=anger").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        let (status, _) = get_json(app(), "/api/stock-data/AAPL?sma=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, body) = get_json(app(), "/api/nothing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Resource not found");
    }

    #[test]
    fn cors_layer_accepts_wildcard_and_lists() {
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&["http://localhost:3000".to_string(), "bad\norigin".to_string()]);
    }
}
