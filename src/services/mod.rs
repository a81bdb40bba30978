pub mod booking;

pub use booking::{BookingService, DeleteError, DeleteOutcome, DeletionMode};
