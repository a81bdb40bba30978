pub mod manager;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod tables;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryBookingStore;
pub use postgres::PgBookingStore;
pub use store::BookingStore;
pub use tables::TableNames;
