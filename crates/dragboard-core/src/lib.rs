//! dragboard-core library.
//!
//! Four ordered lists of items, a drop policy, and the state machine that
//! turns a stream of drag gestures into validated list mutations.
//!
//! # Conventions
//!
//! - **Errors**: Domain operations return [`error::BoardError`]; file and
//!   config loading use `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`). Commits
//!   log at `info`, aborts and ignored events at `debug`.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod policy;
pub mod registry;
pub mod script;
pub mod selection;
pub mod session;

pub use config::BoardConfig;
pub use error::{BoardError, ErrorCode};
pub use model::{Item, ItemId, ListId, Location};
pub use policy::{GroupValidation, Rejection, ValidationPolicy};
pub use registry::ListRegistry;
pub use selection::SelectionSet;
pub use session::{Board, GestureEvent, Signal};
