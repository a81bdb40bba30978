// handlers/protected/auth/csrf.rs - GET /api/auth/csrf handler
use axum::extract::{Extension, State};
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
    pub expires_in: i64,
}

/// GET /api/auth/csrf - Issue an anti-forgery token bound to the caller.
///
/// Send it back as the `csrf_token` form field or the `X-CSRF-Token` header.
pub async fn csrf_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<CsrfTokenResponse> {
    let csrf_token = state.csrf.issue(&user.user)?;

    Ok(ApiResponse::success(CsrfTokenResponse {
        csrf_token,
        expires_in: state.csrf.expiry_secs(),
    }))
}
