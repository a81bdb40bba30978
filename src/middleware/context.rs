use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Response,
};
use std::sync::Arc;

use crate::auth::CsrfGuard;
use crate::error::ApiError;
use crate::services::BookingService;
use crate::state::AppState;

use super::auth::AuthUser;

pub const CSRF_HEADER: &str = "x-csrf-token";

/// Per-request collaborators: who is calling, the anti-forgery check, and the
/// deletion service. Handlers take this instead of reaching for globals.
pub struct RequestContext {
    pub user: AuthUser,
    pub bookings: BookingService,
    csrf: Arc<CsrfGuard>,
    csrf_header: Option<String>,
}

impl RequestContext {
    /// Verify the anti-forgery token, preferring the form field over the header
    pub fn check_token(&self, form_token: Option<&str>) -> Result<(), ApiError> {
        let token = form_token.or(self.csrf_header.as_deref());
        self.csrf.verify(token, &self.user.user)?;
        Ok(())
    }

    pub fn require_book_admin(&self) -> Result<(), ApiError> {
        if !self.user.is_book_admin() {
            return Err(ApiError::forbidden(format!(
                "User '{}' is not a booking admin",
                self.user.user
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by jwt_auth_middleware; absent means the route was mounted unguarded
        let user = parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| {
                ApiError::unauthorized("Authentication required").into_silent_response()
            })?;

        let csrf_header = parts
            .headers
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Self {
            user,
            bookings: state.bookings.clone(),
            csrf: state.csrf.clone(),
            csrf_header,
        })
    }
}
