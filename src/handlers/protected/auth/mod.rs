pub mod csrf;

// Re-export handler functions for use in routing
pub use csrf::csrf_get;
