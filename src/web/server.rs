use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::cli::ServeArgs;
use crate::core::token::title_case;
use crate::matching::engine::{AnnotationEngine, AnnotationResult, PIPELINE};
use crate::utils::validation::{validate_text, ValidationError, MAX_TEXT_LENGTH};

/// Request body size limit: the largest accepted text plus JSON overhead
pub const MAX_BODY_SIZE: usize = MAX_TEXT_LENGTH + 64 * 1024;

/// Security configuration constants to prevent `DoS` attacks
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_CONCURRENT_REQUESTS: usize = 100;

/// Shared application state
pub struct AppState {
    pub engine: AnnotationEngine,
}

/// Body of `POST /api/annotate`
#[derive(Debug, Deserialize)]
pub struct AnnotateRequest {
    pub text: String,
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    // Log detailed error server-side for debugging (not exposed to client)
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None, // Never expose internal details to prevent information disclosure
    }
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the engine cannot be built, the tokio runtime cannot be
/// created, or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    // Build the engine before the runtime so catalog errors stop startup
    let engine = args.engine.build_engine()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args, engine).await })
}

/// Routes without middleware, for embedding or testing
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/chrono/{text}", get(chrono_handler))
        .route("/api/annotate", post(annotate_handler))
        .route("/api/catalog", get(catalog_handler))
        .with_state(state)
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn create_router(engine: AnnotationEngine) -> anyhow::Result<Router> {
    let state = Arc::new(AppState { engine });

    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?;

    // Build router with security layers
    let app = api_router(state).layer(
        ServiceBuilder::new()
            // Security headers for browser protection
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static("strict-origin-when-cross-origin"),
            ))
            // IP-based rate limiting to prevent abuse
            .layer(GovernorLayer {
                config: Arc::new(governor_conf),
            })
            // Request timeout to prevent slow client attacks
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                REQUEST_TIMEOUT,
            ))
            // Limit concurrent requests to prevent DOS
            .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
            .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
    );

    Ok(app)
}

async fn run_server(args: ServeArgs, engine: AnnotationEngine) -> anyhow::Result<()> {
    let app = create_router(engine)?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting geochron web server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Main page handler
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

fn validation_error_response(error: &ValidationError) -> Response {
    let (status, error_type, message) = match error {
        ValidationError::TextTooLong(_) => (
            StatusCode::PAYLOAD_TOO_LARGE,
            "text_too_large",
            "Text exceeds the maximum accepted length",
        ),
        ValidationError::NullByte => (
            StatusCode::BAD_REQUEST,
            "invalid_text",
            "Text contains invalid characters",
        ),
    };

    (
        status,
        Json(create_safe_error_response(
            error_type,
            message,
            Some(&error.to_string()),
        )),
    )
        .into_response()
}

/// Title-case the text in the path and tag it, answering with the
/// `pipe`/`details` shape
async fn chrono_handler(
    State(state): State<Arc<AppState>>,
    Path(text): Path<String>,
) -> Response {
    if let Err(e) = validate_text(&text) {
        return validation_error_response(&e);
    }

    let result = state.engine.annotate(&title_case(&text));
    let details: Vec<serde_json::Value> = result
        .entities
        .iter()
        .map(|e| {
            serde_json::json!({
                "text": e.interval,
                "start_date": e.start_date,
                "start_uncert": e.start_uncertainty,
                "end_date": e.end_date,
                "end_uncert": e.end_uncertainty,
                "rank": e.rank,
                "part_of": e.part_of,
                "source": e.source,
            })
        })
        .collect();

    Json(serde_json::json!({
        "pipe": PIPELINE,
        "details": details,
    }))
    .into_response()
}

/// API endpoint for annotating text
async fn annotate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnnotateRequest>,
) -> Response {
    let start_time = Instant::now();

    if let Err(e) = validate_text(&request.text) {
        return validation_error_response(&e);
    }

    let AnnotationResult {
        text,
        entities,
        diagnostics,
    } = state.engine.annotate(&request.text);

    #[allow(clippy::cast_possible_truncation)] // Processing time won't exceed u64
    let processing_time = start_time.elapsed().as_millis() as u64;

    // Entity offsets refer to `text`, which differs from the request when
    // the engine title-cases input
    Json(serde_json::json!({
        "text": text,
        "entities": entities,
        "diagnostics": diagnostics,
        "processing_info": {
            "processing_time_ms": processing_time,
            "case_sensitive": state.engine.index().is_case_sensitive(),
        }
    }))
    .into_response()
}

/// Return list of intervals in catalog
async fn catalog_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let intervals = state.engine.catalog().intervals();

    Json(serde_json::json!({
        "count": intervals.len(),
        "intervals": intervals,
    }))
}
