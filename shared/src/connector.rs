//! Connector and capability vocabulary.
//!
//! Every part and every port declares exactly one [`ConnectorKind`]. Input
//! devices and ports additionally speak in terms of [`CapabilityKind`]: the
//! kind of signal a controller produces once it is plugged in.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Physical/electrical interface a part requires or a port accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectorKind {
    /// Fits anywhere (the "nothing plugged in" part).
    None,
    /// 9-pin control port (joysticks, paddles, mice, light pens).
    ControlPort,
    /// Parallel user port (multi-joystick adapters).
    UserPort,
    /// Cartridge/expansion port.
    ExpansionPort,
    /// Serial bus for disk drives.
    SerialBus,
    /// Datasette connector.
    CassettePort,
}

/// Kind of input a controller produces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum CapabilityKind {
    #[default]
    None,
    Joystick,
    Paddle,
    Mouse,
    LightPen,
    LightGun,
}

bitflags! {
    /// Set of [`CapabilityKind`]s a physical device can emulate.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        const JOYSTICK = 1 << 0;
        const PADDLE = 1 << 1;
        const MOUSE = 1 << 2;
        const LIGHT_PEN = 1 << 3;
        const LIGHT_GUN = 1 << 4;
    }
}

impl Capabilities {
    /// Whether `kind` is in this set. `CapabilityKind::None` is never supported.
    pub fn supports(self, kind: CapabilityKind) -> bool {
        match Capabilities::from_kind(kind) {
            Some(flag) => self.contains(flag),
            None => false,
        }
    }

    /// The flag for a single capability kind (`None` has no flag).
    pub fn from_kind(kind: CapabilityKind) -> Option<Capabilities> {
        match kind {
            CapabilityKind::None => None,
            CapabilityKind::Joystick => Some(Capabilities::JOYSTICK),
            CapabilityKind::Paddle => Some(Capabilities::PADDLE),
            CapabilityKind::Mouse => Some(Capabilities::MOUSE),
            CapabilityKind::LightPen => Some(Capabilities::LIGHT_PEN),
            CapabilityKind::LightGun => Some(Capabilities::LIGHT_GUN),
        }
    }
}

impl From<CapabilityKind> for Capabilities {
    fn from(kind: CapabilityKind) -> Self {
        Capabilities::from_kind(kind).unwrap_or_default()
    }
}

/// Whether a part with connector `part` can be plugged into a port accepting `accepted`.
///
/// Parts with [`ConnectorKind::None`] fit every port.
pub fn is_compatible(part: ConnectorKind, accepted: &[ConnectorKind]) -> bool {
    part == ConnectorKind::None || accepted.contains(&part)
}
