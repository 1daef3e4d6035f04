//! Board data model: items, list identifiers, and slots.

pub mod item;
pub mod list;

pub use item::{Item, ItemId, Parity};
pub use list::{ListId, Location};
