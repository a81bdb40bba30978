//! Form field model for client-rendered forms.
//!
//! Fields pair a label with a control element; elements serialize to JSON so
//! a front end can render them. No HTML is produced here.

pub mod element;
pub mod field;
pub mod field_select;

pub use element::{Attribute, Element, ElementSelect, Selected};
pub use field::Field;
pub use field_select::FieldSelect;
