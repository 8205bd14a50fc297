//! Emulator boundary and deferred command queue

mod boundary;
pub mod queue;

pub use boundary::{Emulator, Key, MouseEvent, ResourceValue};
pub use queue::{EmulatorCommand, EventQueue};

/// Resource selecting the device on control port 1.
pub const RESOURCE_JOYPORT1_DEVICE: &str = "JoyPort1Device";
/// Resource selecting the device on control port 2.
pub const RESOURCE_JOYPORT2_DEVICE: &str = "JoyPort2Device";
/// Resource enabling a user port joystick adapter.
pub const RESOURCE_USERPORT_JOY: &str = "UserportJoy";
/// Resource selecting the user port adapter type.
pub const RESOURCE_USERPORT_JOY_TYPE: &str = "UserportJoyType";
