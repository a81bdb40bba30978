pub mod bulk_delete;
pub mod entry_delete;
pub mod utils;

// Re-export handler functions for use in routing
pub use bulk_delete::bulk_delete;
pub use entry_delete::entry_delete;
