use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt;

use crate::auth::AccessLevel;
use crate::config::AppConfig;
use crate::database::{BookingStore, DatabaseError, MemoryBookingStore};
use crate::middleware::CSRF_HEADER;
use crate::state::AppState;
use crate::types::{DeletedEntry, EntryId, RepeatId};

/// Router over an in-memory store, plus helpers to mint sessions and send requests
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryBookingStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryBookingStore::new());
        let state = AppState::new(AppConfig::development(), store.clone());
        Self {
            router: crate::app(state.clone()),
            state,
            store,
        }
    }

    /// Route requests to `backend`; `self.store` stays empty and unused
    pub fn with_store(backend: Arc<dyn BookingStore>) -> Self {
        let state = AppState::new(AppConfig::development(), backend);
        Self {
            router: crate::app(state.clone()),
            state,
            store: Arc::new(MemoryBookingStore::new()),
        }
    }

    pub fn token(&self, user: &str, level: AccessLevel) -> String {
        self.state.jwt.issue(user, level).unwrap()
    }

    pub fn csrf(&self, user: &str) -> String {
        self.state.csrf.issue(user).unwrap()
    }

    /// Bearer token and anti-forgery token for a booking admin
    pub fn admin_session(&self, user: &str) -> (String, String) {
        (self.token(user, AccessLevel::BookingAdmin), self.csrf(user))
    }

    pub async fn post_form(
        &self,
        uri: &str,
        bearer: Option<&str>,
        body: &str,
    ) -> (StatusCode, String) {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send_text(request.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn post_form_with_csrf_header(
        &self,
        uri: &str,
        bearer: &str,
        csrf: &str,
        body: &str,
    ) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
            .header(CSRF_HEADER, csrf)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send_text(request).await
    }

    pub async fn delete(
        &self,
        uri: &str,
        bearer: &str,
        csrf: Option<&str>,
    ) -> (StatusCode, String) {
        let mut request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer));
        if let Some(csrf) = csrf {
            request = request.header(CSRF_HEADER, csrf);
        }
        self.send_text(request.body(Body::empty()).unwrap()).await
    }

    pub async fn get_json(&self, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(token) = bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let (status, text) = self.send_text(request.body(Body::empty()).unwrap()).await;
        let value = serde_json::from_str(&text).unwrap_or(Value::Null);
        (status, value)
    }

    async fn send_text(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }
}

/// URL-encoded bulk delete body
pub fn form_body(ids: &str, csrf: Option<&str>) -> String {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    form.append_pair("ids", ids);
    if let Some(csrf) = csrf {
        form.append_pair("csrf_token", csrf);
    }
    form.finish()
}

/// Store whose statements fail on demand
pub struct FailingStore {
    /// `None` makes entry deletion (and ping) fail
    entries_deleted: Option<u64>,
    cleanup_calls: AtomicUsize,
}

impl FailingStore {
    pub fn failing_entries() -> Self {
        Self {
            entries_deleted: None,
            cleanup_calls: AtomicUsize::new(0),
        }
    }

    /// Entry deletion reports `deleted` rows, then the orphan sweep fails
    pub fn failing_cleanup(deleted: u64) -> Self {
        Self {
            entries_deleted: Some(deleted),
            cleanup_calls: AtomicUsize::new(0),
        }
    }

    pub fn cleanup_calls(&self) -> usize {
        self.cleanup_calls.load(Ordering::SeqCst)
    }

    fn unavailable() -> DatabaseError {
        DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl BookingStore for FailingStore {
    async fn delete_entries(&self, _ids: &[EntryId]) -> Result<u64, DatabaseError> {
        self.entries_deleted.ok_or_else(Self::unavailable)
    }

    async fn delete_orphaned_repeats(&self) -> Result<u64, DatabaseError> {
        self.cleanup_calls.fetch_add(1, Ordering::SeqCst);
        Err(DatabaseError::QueryError("repeat sweep failed".to_string()))
    }

    async fn delete_entry(&self, id: EntryId) -> Result<Option<DeletedEntry>, DatabaseError> {
        self.entries_deleted.ok_or_else(Self::unavailable)?;
        Ok(Some(DeletedEntry {
            id,
            repeat_id: Some(RepeatId(1)),
        }))
    }

    async fn delete_repeat_if_orphaned(&self, _id: RepeatId) -> Result<bool, DatabaseError> {
        self.cleanup_calls.fetch_add(1, Ordering::SeqCst);
        Err(DatabaseError::QueryError("repeat cleanup failed".to_string()))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.entries_deleted.map(|_| ()).ok_or_else(Self::unavailable)
    }
}
