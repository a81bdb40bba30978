// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route prefix: /api/*
// Every route here sits behind jwt_auth_middleware, which injects AuthUser.
// Deletion handlers additionally check the anti-forgery token and
// booking-admin capability through RequestContext.

pub mod auth; // Session helpers (anti-forgery tokens)
pub mod entries; // Booking entry deletion

pub use auth::*;
pub use entries::*;
