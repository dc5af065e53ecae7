//! Liveness endpoint for the HTTP adapter.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no store checks)

use axum::http::StatusCode;

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately without touching the store.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}
