//! Logical ports exposed by the emulated machine

use std::fmt;
use std::hash::{Hash, Hasher};

use joyport_shared::catalog::Controller;
use joyport_shared::{CapabilityKind, ConnectorKind};
use smallvec::SmallVec;

use crate::config::ConfigKey;

/// Slot a port occupies on the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PortKey {
    ControlPort1,
    ControlPort2,
    UserPortJoystick1,
    UserPortJoystick2,
    UserPort,
    ExpansionPort,
    CassettePort,
    /// Serial bus drive with the given unit number (8-11).
    DiskDrive(u8),
}

impl PortKey {
    pub const INPUT_PORTS: [PortKey; 4] = [
        PortKey::ControlPort1,
        PortKey::ControlPort2,
        PortKey::UserPortJoystick1,
        PortKey::UserPortJoystick2,
    ];

    pub fn name(&self) -> String {
        match self {
            PortKey::ControlPort1 => "controlPort1".to_string(),
            PortKey::ControlPort2 => "controlPort2".to_string(),
            PortKey::UserPortJoystick1 => "userPortJoystick1".to_string(),
            PortKey::UserPortJoystick2 => "userPortJoystick2".to_string(),
            PortKey::UserPort => "userPort".to_string(),
            PortKey::ExpansionPort => "expansionPort".to_string(),
            PortKey::CassettePort => "cassettePort".to_string(),
            PortKey::DiskDrive(unit) => format!("diskDrive{}", unit),
        }
    }

    pub fn from_name(name: &str) -> Option<PortKey> {
        match name {
            "controlPort1" => Some(PortKey::ControlPort1),
            "controlPort2" => Some(PortKey::ControlPort2),
            "userPortJoystick1" => Some(PortKey::UserPortJoystick1),
            "userPortJoystick2" => Some(PortKey::UserPortJoystick2),
            "userPort" => Some(PortKey::UserPort),
            "expansionPort" => Some(PortKey::ExpansionPort),
            "cassettePort" => Some(PortKey::CassettePort),
            other => other
                .strip_prefix("diskDrive")
                .and_then(|unit| unit.parse::<u8>().ok())
                .filter(|unit| (8..=11).contains(unit))
                .map(PortKey::DiskDrive),
        }
    }

    /// Where the part plugged into this port is configured.
    pub fn config_path(&self) -> SmallVec<[ConfigKey; 2]> {
        let path: &[ConfigKey] = match self {
            PortKey::ControlPort1 => &[ConfigKey::JoystickPort1],
            PortKey::ControlPort2 => &[ConfigKey::JoystickPort2],
            PortKey::UserPortJoystick1 => &[ConfigKey::UserPort, ConfigKey::UserPortJoystick1],
            PortKey::UserPortJoystick2 => &[ConfigKey::UserPort, ConfigKey::UserPortJoystick2],
            PortKey::UserPort => &[ConfigKey::UserPort],
            PortKey::ExpansionPort => &[ConfigKey::ExpansionPort],
            PortKey::CassettePort => &[ConfigKey::CassetteDrive],
            PortKey::DiskDrive(8) => &[ConfigKey::DiskDrive8],
            PortKey::DiskDrive(9) => &[ConfigKey::DiskDrive9],
            PortKey::DiskDrive(10) => &[ConfigKey::DiskDrive10],
            PortKey::DiskDrive(_) => &[ConfigKey::DiskDrive11],
        };
        SmallVec::from_slice(path)
    }

    /// Emulator port number for input ports (1-4).
    pub fn port_number(&self) -> Option<u8> {
        match self {
            PortKey::ControlPort1 => Some(1),
            PortKey::ControlPort2 => Some(2),
            PortKey::UserPortJoystick1 => Some(3),
            PortKey::UserPortJoystick2 => Some(4),
            _ => None,
        }
    }
}

/// Identity of a port: its slot plus an optional sub-port (paddle 1/2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId {
    pub key: PortKey,
    pub sub_port: Option<u8>,
}

impl PortId {
    pub fn new(key: PortKey) -> Self {
        Self {
            key,
            sub_port: None,
        }
    }

    pub fn sub(key: PortKey, sub_port: u8) -> Self {
        Self {
            key,
            sub_port: Some(sub_port),
        }
    }

    /// Inverse of the `Display` form (`controlPort1`, `controlPort1.2`).
    pub fn parse(s: &str) -> Option<PortId> {
        match s.split_once('.') {
            Some((key, sub)) => Some(PortId::sub(PortKey::from_name(key)?, sub.parse().ok()?)),
            None => Some(PortId::new(PortKey::from_name(s)?)),
        }
    }
}

impl From<PortKey> for PortId {
    fn from(key: PortKey) -> Self {
        PortId::new(key)
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_port {
            Some(sub) => write!(f, "{}.{}", self.key.name(), sub),
            None => f.write_str(&self.key.name()),
        }
    }
}

/// Device settings taken from the controller plugged into a port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub sensitivity: f32,
    pub buttons: u8,
    pub koala_pad: bool,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            buttons: 1,
            koala_pad: false,
        }
    }
}

impl From<&Controller> for Calibration {
    fn from(controller: &Controller) -> Self {
        Self {
            sensitivity: controller.sensitivity,
            buttons: controller.buttons,
            koala_pad: controller.koala_pad,
        }
    }
}

/// A logical port. Equality and hashing only consider [`Port::id`].
#[derive(Debug, Clone)]
pub struct Port {
    pub id: PortId,
    pub name: String,
    pub accepted: SmallVec<[ConnectorKind; 2]>,
    /// What the plugged-in controller needs from a device. `None` for
    /// non-input ports and empty input ports.
    pub capability: CapabilityKind,
    pub priority: i32,
    pub hot_swappable: bool,
    /// Stable listing order, `base + sub_port / 100`.
    pub ordering: f64,
    /// Assigned by the registry; 0 is the highest-priority input port.
    pub player_index: Option<usize>,
    /// Identifier of the plugged-in part.
    pub part: Option<String>,
    pub calibration: Calibration,
    /// Emulator device code of the plugged-in part.
    pub device_code: i32,
}

impl Port {
    pub fn new(id: PortId, name: impl Into<String>, accepted: &[ConnectorKind], base: f64) -> Self {
        let ordering = base + f64::from(id.sub_port.unwrap_or(0)) / 100.0;
        Self {
            id,
            name: name.into(),
            accepted: SmallVec::from_slice(accepted),
            capability: CapabilityKind::None,
            priority: 0,
            hot_swappable: false,
            ordering,
            player_index: None,
            part: None,
            calibration: Calibration::default(),
            device_code: 0,
        }
    }

    /// Whether a device can drive this port.
    pub fn is_input(&self) -> bool {
        self.capability != CapabilityKind::None
    }

    /// Full attribute comparison, unlike `==` which only compares identity.
    pub fn same_attributes(&self, other: &Port) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.accepted == other.accepted
            && self.capability == other.capability
            && self.priority == other.priority
            && self.hot_swappable == other.hot_swappable
            && self.ordering == other.ordering
            && self.player_index == other.player_index
            && self.part == other.part
            && self.calibration == other.calibration
            && self.device_code == other.device_code
    }
}

impl PartialEq for Port {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Port {}

impl Hash for Port {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_id_display_roundtrip() {
        for id in [
            PortId::new(PortKey::ControlPort2),
            PortId::sub(PortKey::ControlPort1, 2),
            PortId::new(PortKey::DiskDrive(9)),
        ] {
            assert_eq!(PortId::parse(&id.to_string()), Some(id));
        }
        assert_eq!(PortId::parse("diskDrive12"), None);
        assert_eq!(PortId::parse("controlPort1.x"), None);
    }

    #[test]
    fn ordering_includes_sub_port() {
        let port = Port::new(
            PortId::sub(PortKey::ControlPort2, 2),
            "Paddle 2",
            &[ConnectorKind::ControlPort],
            2.0,
        );
        assert!((port.ordering - 2.02).abs() < 1e-9);
    }

    #[test]
    fn equality_is_identity() {
        let a = Port::new(PortKey::ControlPort1.into(), "A", &[], 1.0);
        let mut b = a.clone();
        b.name = "B".to_string();
        b.capability = CapabilityKind::Joystick;
        assert_eq!(a, b);
        assert!(!a.same_attributes(&b));
    }
}
