//! Data models for the Web Help Desk REST API.
//!
//! Field names follow the server's camelCase JSON. Every field is optional
//! on read and unknown fields are ignored.

mod asset;
mod attachment;
mod common;
mod location;
mod note;
mod reference;
mod ticket;

pub use asset::*;
pub use attachment::*;
pub use common::{CustomField, EntityRef, ListQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use location::*;
pub use note::*;
pub use reference::*;
pub use ticket::*;
