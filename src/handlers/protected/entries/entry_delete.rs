// handlers/protected/entries/entry_delete.rs - DELETE /api/entries/:id handler
use axum::{
    extract::{rejection::PathRejection, Path},
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::services::DeletionMode;

use super::utils::parse_numeric_id;

/// DELETE /api/entries/:id - Delete one entry through the per-record path.
///
/// Same guards and silent failures as the bulk endpoint; the anti-forgery
/// token travels in the `X-CSRF-Token` header. Responds `1` or `0`.
pub async fn entry_delete(
    ctx: RequestContext,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    match delete_one(&ctx, id).await {
        Ok(count) => count.to_string().into_response(),
        Err(e) => e.into_silent_response(),
    }
}

async fn delete_one(
    ctx: &RequestContext,
    id: Result<Path<String>, PathRejection>,
) -> Result<u64, ApiError> {
    ctx.check_token(None)?;
    ctx.require_book_admin()?;

    let Path(raw) = id.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let id = parse_numeric_id(&raw)
        .ok_or_else(|| ApiError::validation_error(format!("Invalid entry id: {}", raw)))?;

    let outcome = ctx.bookings.delete_entries(&[id], DeletionMode::Single).await?;

    tracing::info!(
        user = %ctx.user.user,
        entry = %id,
        deleted = outcome.entries_deleted,
        repeats_deleted = outcome.repeats_deleted,
        "deleted entry"
    );

    Ok(outcome.entries_deleted)
}
