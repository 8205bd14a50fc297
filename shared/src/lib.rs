//! Shared hardware vocabulary for joyport.
//!
//! - [`connector`] - connector and capability kinds, compatibility check
//! - [`catalog`] - selectable computers, drives, controllers and adapters

pub mod catalog;
pub mod connector;

pub use catalog::{Catalog, MachinePart};
pub use connector::{Capabilities, CapabilityKind, ConnectorKind, is_compatible};
