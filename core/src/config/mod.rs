//! Layered, versioned configuration store
//!
//! - [`Node`] / [`Value`] - the keyed value tree
//! - [`OverlayConfig`] - writable override over read-only [`Layer`]s
//! - [`Identifier`] - part identifiers with `auto`/`none`/`default` decoded
//! - [`migration`] - format version upgrades applied on load
//! - [`file`] - loading and atomically saving JSON files

mod defaults;
mod error;
pub mod file;
mod identifier;
mod key;
pub mod migration;
mod overlay;
mod value;

pub use defaults::builtin_defaults;
pub use error::ConfigError;
pub use identifier::Identifier;
pub use key::ConfigKey;
pub use migration::FORMAT_VERSION;
pub use overlay::{Layer, NodeView, OverlayConfig};
pub use value::{Node, Value};
