//! Host input devices and their assignment to machine ports

mod device;
#[cfg(feature = "gamepad")]
mod gamepad;
mod hotplug;
mod joystick;
pub mod mapping;
mod router;

pub use device::{
    Device, DeviceDescriptor, DeviceHandle, DeviceId, DeviceIdAllocator, DeviceSource,
    PRIORITY_GAMEPAD, PRIORITY_KEYBOARD, PRIORITY_MOUSE, PRIORITY_TOUCH,
};
#[cfg(feature = "gamepad")]
pub use gamepad::GamepadMonitor;
pub use hotplug::{HotplugEvent, HotplugQueue, HotplugSender};
pub use joystick::{AXIS_THRESHOLD, JoystickButtons};
pub use mapping::{AssignmentChange, InputMapping, Pairing};
pub use router::{DeviceEvent, InputRouter, RouteTarget};
