//! HTTP routes.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use rushroyale_domain::{
    decode_export_code, encode_export_code, find_unsafe_field, Catalog, PlayerBuild,
    RegistrationRequest, StrengthCalculator, StrengthResult,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::app::App;
use crate::infrastructure::correlation::{CorrelationId, CORRELATION_HEADER};
use crate::use_cases::RegisterError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/catalog", get(get_catalog))
        .route("/api/strength", post(calculate_strength))
        .route("/api/export-code/decode", post(decode_code))
        .route("/api/export-code/encode", post(encode_code))
        .route("/api/register", post(register))
}

async fn health() -> &'static str {
    "OK"
}

async fn get_catalog(State(app): State<Arc<App>>) -> Json<Catalog> {
    Json(app.catalog.as_ref().clone())
}

async fn calculate_strength(
    State(app): State<Arc<App>>,
    Json(build): Json<PlayerBuild>,
) -> Result<Json<StrengthResult>, ApiError> {
    StrengthCalculator::new(&app.catalog)
        .calculate(&build)
        .map(Json)
        .ok_or_else(|| {
            ApiError::Unprocessable(
                "Strength cannot be calculated - enter crit, legendarity and perks".to_string(),
            )
        })
}

// =============================================================================
// Export Codes
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct ExportCodeBody {
    code: String,
    /// Set when a free-text field will not import back unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

async fn decode_code(
    State(app): State<Arc<App>>,
    Json(body): Json<ExportCodeBody>,
) -> Result<Json<PlayerBuild>, ApiError> {
    decode_export_code(&body.code, &app.catalog)
        .map(Json)
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

async fn encode_code(Json(build): Json<PlayerBuild>) -> Json<ExportCodeBody> {
    let warning = find_unsafe_field(&build).map(|field| field.to_string());
    Json(ExportCodeBody {
        code: encode_export_code(&build),
        warning,
    })
}

// =============================================================================
// Registration
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct RegisterResponse {
    success: bool,
    message: String,
    use_export_code: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    channel_id: Option<String>,
}

async fn register(
    State(app): State<Arc<App>>,
    headers: HeaderMap,
    Json(request): Json<RegistrationRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let correlation_id = CorrelationId::from_header(
        headers
            .get(CORRELATION_HEADER)
            .and_then(|v| v.to_str().ok()),
    );

    let receipt = app
        .use_cases
        .register
        .execute(request, correlation_id)
        .await?;

    Ok(Json(RegisterResponse {
        success: receipt.accepted,
        message: receipt.message,
        use_export_code: receipt.use_export_code,
        channel_id: receipt.channel_id,
    }))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unprocessable(String),
    /// Discord could not be reached; the player should fall back to the export code.
    BadGateway(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    use_export_code: bool,
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, use_export_code) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, false),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, false),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg, true),
        };
        (
            status,
            Json(ErrorBody {
                success: false,
                message,
                use_export_code,
            }),
        )
            .into_response()
    }
}

impl From<RegisterError> for ApiError {
    fn from(e: RegisterError) -> Self {
        match e {
            RegisterError::Invalid(e) => ApiError::BadRequest(e.to_string()),
            RegisterError::Delivery(_) => ApiError::BadGateway(
                "Registration failed. Please try again or use the export code.".to_string(),
            ),
        }
    }
}
