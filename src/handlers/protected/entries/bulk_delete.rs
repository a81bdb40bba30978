// handlers/protected/entries/bulk_delete.rs - POST /api/entries/bulk_delete handler
use axum::{
    extract::{rejection::FormRejection, Form},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::services::DeletionMode;

use super::utils::parse_entry_ids;

#[derive(Debug, Deserialize)]
pub struct BulkDeleteForm {
    /// JSON-encoded array of entry ids. Sent as one field so large batches
    /// don't hit per-request form variable limits.
    #[serde(default = "empty_id_list")]
    pub ids: String,
    pub csrf_token: Option<String>,
}

fn empty_id_list() -> String {
    "[]".to_string()
}

/// POST /api/entries/bulk_delete - Delete a batch of entries by id.
///
/// Responds with the number of entries deleted as a plain-text body. Every
/// failure (token, capability, malformed ids, storage) answers with an empty
/// body and deletes nothing.
///
/// Entries are removed with one membership statement and orphaned repeat
/// series with one sweep, bypassing per-record hooks: no notifications are
/// sent, and room or policy rules are not consulted. Callers with very large
/// batches split them across requests.
pub async fn bulk_delete(
    ctx: RequestContext,
    form: Result<Form<BulkDeleteForm>, FormRejection>,
) -> Response {
    match delete_batch(&ctx, form).await {
        Ok(count) => count.to_string().into_response(),
        Err(e) => e.into_silent_response(),
    }
}

async fn delete_batch(
    ctx: &RequestContext,
    form: Result<Form<BulkDeleteForm>, FormRejection>,
) -> Result<u64, ApiError> {
    let form = form.map(|Form(f)| f);
    let form_token = form.as_ref().ok().and_then(|f| f.csrf_token.as_deref());

    ctx.check_token(form_token)?;
    ctx.require_book_admin()?;

    let form = form.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let ids = parse_entry_ids(&form.ids)?;

    let outcome = ctx.bookings.delete_entries(&ids, DeletionMode::Bulk).await?;

    tracing::info!(
        user = %ctx.user.user,
        requested = ids.len(),
        deleted = outcome.entries_deleted,
        repeats_deleted = outcome.repeats_deleted,
        "bulk deleted entries"
    );

    Ok(outcome.entries_deleted)
}

#[cfg(test)]
mod tests {
    use crate::auth::AccessLevel;
    use crate::testing::{form_body, FailingStore, TestApp};
    use crate::types::{EntryId, RepeatId};
    use axum::http::StatusCode;
    use std::sync::Arc;

    const URI: &str = "/api/entries/bulk_delete";

    fn entry(id: i64) -> EntryId {
        EntryId::new(id).unwrap()
    }

    async fn app_with_entries(ids: &[i64]) -> TestApp {
        let app = TestApp::new();
        for &id in ids {
            app.store.insert_entry(entry(id), None).await;
        }
        app
    }

    #[tokio::test]
    async fn deletes_requested_entries_and_reports_count() {
        let app = app_with_entries(&[1, 2, 3]).await;
        let (token, csrf) = app.admin_session("admin");

        let (status, body) = app
            .post_form(URI, Some(&token), &form_body("[1,2]", Some(&csrf)))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "2");
        assert_eq!(app.store.entry_ids().await, vec![entry(3)]);
    }

    #[tokio::test]
    async fn removes_series_orphaned_by_the_batch() {
        let app = TestApp::new();
        app.store.insert_repeat(RepeatId(40)).await;
        app.store.insert_repeat(RepeatId(41)).await;
        app.store.insert_entry(entry(5), Some(RepeatId(40))).await;
        app.store.insert_entry(entry(6), Some(RepeatId(41))).await;
        let (token, csrf) = app.admin_session("admin");

        let (status, body) = app.post_form(URI, Some(&token), &form_body("[5]", Some(&csrf))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "1");
        assert_eq!(app.store.repeat_ids().await, vec![RepeatId(41)]);
    }

    #[tokio::test]
    async fn empty_batch_returns_zero() {
        let app = app_with_entries(&[1]).await;
        let (token, csrf) = app.admin_session("admin");

        let (status, body) = app.post_form(URI, Some(&token), &form_body("[]", Some(&csrf))).await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "0"));

        // Field omitted entirely defaults to an empty list
        let (status, body) = app
            .post_form(URI, Some(&token), &format!("csrf_token={}", csrf))
            .await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "0"));
        assert_eq!(app.store.entry_ids().await, vec![entry(1)]);
    }

    #[tokio::test]
    async fn resubmitting_is_idempotent() {
        let app = app_with_entries(&[1, 2, 3]).await;
        let (token, csrf) = app.admin_session("admin");
        let body = form_body("[1,2]", Some(&csrf));

        assert_eq!(app.post_form(URI, Some(&token), &body).await.1, "2");
        assert_eq!(app.post_form(URI, Some(&token), &body).await.1, "0");
        assert_eq!(app.store.entry_ids().await, vec![entry(3)]);
    }

    #[tokio::test]
    async fn malformed_batch_deletes_nothing() {
        let app = app_with_entries(&[1, 2, 3]).await;
        let (token, csrf) = app.admin_session("admin");

        let batches = ["[1,-2]", "[1,2.5]", "[\"abc\"]", "[1,null]", "not json", "{\"1\":1}", "3"];
        for ids in batches {
            let (status, body) = app
                .post_form(URI, Some(&token), &form_body(ids, Some(&csrf)))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "ids={}", ids);
            assert!(body.is_empty(), "ids={} produced {:?}", ids, body);
        }
        assert_eq!(app.store.entry_ids().await, vec![entry(1), entry(2), entry(3)]);
    }

    #[tokio::test]
    async fn non_admin_gets_nothing_even_with_valid_ids() {
        let app = app_with_entries(&[1, 2]).await;
        let token = app.token("bob", AccessLevel::User);
        let csrf = app.csrf("bob");

        let (status, body) = app.post_form(URI, Some(&token), &form_body("[1]", Some(&csrf))).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.is_empty());
        assert_eq!(app.store.entry_ids().await.len(), 2);
    }

    #[tokio::test]
    async fn non_admin_with_bad_ids_is_still_forbidden() {
        let app = app_with_entries(&[1]).await;
        let token = app.token("bob", AccessLevel::User);
        let csrf = app.csrf("bob");

        let (status, body) = app
            .post_form(URI, Some(&token), &form_body("[-1]", Some(&csrf)))
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn missing_or_foreign_csrf_token_is_rejected() {
        let app = app_with_entries(&[1]).await;
        let token = app.token("admin", AccessLevel::BookingAdmin);
        let someone_elses = app.csrf("other");

        for body in [form_body("[1]", None), form_body("[1]", Some(&someone_elses))] {
            let (status, text) = app.post_form(URI, Some(&token), &body).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert!(text.is_empty());
        }
        assert_eq!(app.store.entry_ids().await, vec![entry(1)]);
    }

    #[tokio::test]
    async fn out_of_range_csrf_timestamp_is_forbidden() {
        let app = app_with_entries(&[1]).await;
        let token = app.token("bob", AccessLevel::User);

        for forged in [format!("{}.00", i64::MIN), format!("{}.00", i64::MAX)] {
            let (status, body) = app
                .post_form(URI, Some(&token), &form_body("[1]", Some(&forged)))
                .await;
            assert_eq!(status, StatusCode::FORBIDDEN, "token={}", forged);
            assert!(body.is_empty());
        }
        assert_eq!(app.store.entry_ids().await, vec![entry(1)]);
    }

    #[tokio::test]
    async fn csrf_token_may_come_from_header() {
        let app = app_with_entries(&[1]).await;
        let (token, csrf) = app.admin_session("admin");

        let (status, body) = app
            .post_form_with_csrf_header(URI, &token, &csrf, &form_body("[1]", None))
            .await;

        assert_eq!((status, body.as_str()), (StatusCode::OK, "1"));
    }

    #[tokio::test]
    async fn unauthenticated_request_is_silent() {
        let app = app_with_entries(&[1]).await;
        let csrf = app.csrf("admin");

        let (status, body) = app.post_form(URI, None, &form_body("[1]", Some(&csrf))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.is_empty());

        let (status, body) = app
            .post_form(URI, Some("garbage"), &form_body("[1]", Some(&csrf)))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.is_empty());
        assert_eq!(app.store.entry_ids().await, vec![entry(1)]);
    }

    #[tokio::test]
    async fn store_failure_is_silent() {
        let app = TestApp::with_store(Arc::new(FailingStore::failing_entries()));
        let (token, csrf) = app.admin_session("admin");

        let (status, body) = app.post_form(URI, Some(&token), &form_body("[1]", Some(&csrf))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn cleanup_failure_still_reports_deleted_entries() {
        let app = TestApp::with_store(Arc::new(FailingStore::failing_cleanup(3)));
        let (token, csrf) = app.admin_session("admin");

        let (status, body) = app
            .post_form(URI, Some(&token), &form_body("[1,2,3]", Some(&csrf)))
            .await;

        assert_eq!((status, body.as_str()), (StatusCode::OK, "3"));
    }
}
