//! Physical input devices

use std::hash::{Hash, Hasher};

use joyport_shared::{Capabilities, CapabilityKind};

use crate::machine::{Calibration, Port};

/// Opaque device identity, assigned once per connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(u64);

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

/// Hands out [`DeviceId`]s. A reconnected device gets a fresh id.
#[derive(Debug, Default)]
pub struct DeviceIdAllocator {
    next: u64,
}

impl DeviceIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> DeviceId {
        let id = DeviceId(self.next);
        self.next += 1;
        id
    }
}

/// Platform handle a hot-plug notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(pub u64);

/// What kind of host input a device is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceSource {
    Gamepad,
    Mouse,
    TouchControls,
    KeyboardJoystick,
}

pub const PRIORITY_GAMEPAD: i32 = 100;
pub const PRIORITY_MOUSE: i32 = 80;
pub const PRIORITY_KEYBOARD: i32 = 50;
pub const PRIORITY_TOUCH: i32 = 10;

/// Description of a connected device as reported by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDescriptor {
    pub handle: DeviceHandle,
    pub name: String,
    pub source: DeviceSource,
    pub capabilities: Capabilities,
    pub priority: i32,
}

impl DeviceDescriptor {
    pub fn gamepad(handle: DeviceHandle, name: impl Into<String>) -> Self {
        Self {
            handle,
            name: name.into(),
            source: DeviceSource::Gamepad,
            capabilities: Capabilities::JOYSTICK | Capabilities::PADDLE | Capabilities::MOUSE,
            priority: PRIORITY_GAMEPAD,
        }
    }

    pub fn mouse(handle: DeviceHandle) -> Self {
        Self {
            handle,
            name: "Mouse".to_string(),
            source: DeviceSource::Mouse,
            capabilities: Capabilities::MOUSE | Capabilities::PADDLE,
            priority: PRIORITY_MOUSE,
        }
    }

    pub fn keyboard_joystick(handle: DeviceHandle) -> Self {
        Self {
            handle,
            name: "Keyboard".to_string(),
            source: DeviceSource::KeyboardJoystick,
            capabilities: Capabilities::JOYSTICK,
            priority: PRIORITY_KEYBOARD,
        }
    }

    pub fn touch_controls(handle: DeviceHandle) -> Self {
        Self {
            handle,
            name: "Touch Controls".to_string(),
            source: DeviceSource::TouchControls,
            capabilities: Capabilities::JOYSTICK
                | Capabilities::LIGHT_PEN
                | Capabilities::LIGHT_GUN,
            priority: PRIORITY_TOUCH,
        }
    }
}

/// A connected input device. Equality and hashing only consider [`Device::id`].
#[derive(Debug, Clone)]
pub struct Device {
    pub id: DeviceId,
    pub handle: DeviceHandle,
    pub name: String,
    pub priority: i32,
    pub source: DeviceSource,
    pub capabilities: Capabilities,
    current_capability: CapabilityKind,
    player_index: Option<usize>,
    calibration: Calibration,
}

impl Device {
    pub fn new(id: DeviceId, descriptor: DeviceDescriptor) -> Self {
        Self {
            id,
            handle: descriptor.handle,
            name: descriptor.name,
            priority: descriptor.priority,
            source: descriptor.source,
            capabilities: descriptor.capabilities,
            current_capability: CapabilityKind::None,
            player_index: None,
            calibration: Calibration::default(),
        }
    }

    pub fn supports(&self, kind: CapabilityKind) -> bool {
        self.capabilities.supports(kind)
    }

    /// Capability the device is currently emulating, `None` while unpaired.
    pub fn current_capability(&self) -> CapabilityKind {
        self.current_capability
    }

    pub fn player_index(&self) -> Option<usize> {
        self.player_index
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    pub(crate) fn attach(&mut self, port: &Port) {
        self.current_capability = port.capability;
        self.player_index = port.player_index;
        self.calibration = port.calibration;
    }

    pub(crate) fn detach(&mut self) {
        self.current_capability = CapabilityKind::None;
        self.player_index = None;
    }
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Device {}

impl Hash for Device {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_never_repeats() {
        let mut ids = DeviceIdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_ne!(a, b);
    }

    #[test]
    fn new_device_is_detached() {
        let mut ids = DeviceIdAllocator::new();
        let device = Device::new(
            ids.allocate(),
            DeviceDescriptor::gamepad(DeviceHandle(3), "Pad"),
        );
        assert_eq!(device.current_capability(), CapabilityKind::None);
        assert_eq!(device.player_index(), None);
        assert!(device.supports(CapabilityKind::Paddle));
        assert!(!device.supports(CapabilityKind::LightPen));
    }
}
