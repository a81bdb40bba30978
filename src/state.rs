use std::sync::Arc;

use crate::auth::{CsrfGuard, JwtCodec};
use crate::config::AppConfig;
use crate::database::{BookingStore, DatabaseError, DatabaseManager, PgBookingStore, TableNames};
use crate::services::BookingService;

/// Everything a request handler needs, handed to the router once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtCodec>,
    pub csrf: Arc<CsrfGuard>,
    pub bookings: BookingService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn BookingStore>) -> Self {
        let jwt = JwtCodec::new(
            config.security.jwt_secret.clone(),
            config.security.jwt_expiry_hours,
        );
        let csrf = CsrfGuard::new(
            config.security.csrf_secret.clone(),
            config.security.csrf_expiry_minutes,
        );

        Self {
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            csrf: Arc::new(csrf),
            bookings: BookingService::new(store),
        }
    }

    /// Wire up the Postgres-backed store described by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self, DatabaseError> {
        let tables = TableNames::with_prefix(&config.database.table_prefix)?;
        let pool = DatabaseManager::connect_lazy(&config.database)?;
        let store = PgBookingStore::new(pool, tables);

        Ok(Self::new(config.clone(), Arc::new(store)))
    }
}
