// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (JWT auth, /api/*)
pub mod public;
pub mod protected;
