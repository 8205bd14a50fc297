//! joyport core - input mapping and layered configuration for an emulated C64
//!
//! This crate turns a machine configuration into the ports it exposes and
//! keeps host input devices assigned to those ports as both change.
//!
//! # Architecture
//!
//! - [`config`] - Layered, versioned JSON configuration
//! - [`machine`] - Port set derived from the configured parts
//! - [`input`] - Devices, the pairing engine and event routing
//! - [`emulator`] - Boundary to the emulation core
//! - [`MachineSession`] - Ties the above together for one running machine

pub mod config;
pub mod emulator;
pub mod input;
#[cfg(test)]
mod integration;
pub mod machine;
pub mod session;
#[cfg(test)]
pub mod test_utils;

// Re-export the main entry points
pub use config::{ConfigError, Identifier, OverlayConfig};
pub use emulator::{Emulator, EventQueue};
pub use input::{DeviceEvent, HotplugEvent, HotplugQueue, InputMapping, InputRouter};
pub use machine::{Port, PortId, PortKey, PortRegistry};
pub use session::MachineSession;

// Re-export shared types for convenience
pub use joyport_shared::{Capabilities, CapabilityKind, Catalog, ConnectorKind};
