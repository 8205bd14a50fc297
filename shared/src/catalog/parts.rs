//! Part descriptions.

use serde::{Deserialize, Serialize};

use crate::connector::{CapabilityKind, ConnectorKind};

/// Priority used when nothing better is known.
pub const PRIORITY_DEFAULT: i32 = 0;
/// Priority of the parts picked by automatic selection.
pub const PRIORITY_HIGH: i32 = 100;

/// Attributes shared by every selectable part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartInfo {
    /// Stable identifier stored in configuration files.
    pub identifier: String,
    /// Display name.
    pub name: String,
    pub connector: ConnectorKind,
    /// Higher wins automatic selection.
    pub priority: i32,
}

impl PartInfo {
    pub fn new(identifier: &str, name: &str, connector: ConnectorKind, priority: i32) -> Self {
        Self {
            identifier: identifier.to_string(),
            name: name.to_string(),
            connector,
            priority,
        }
    }
}

/// Implemented by every catalog entry.
pub trait MachinePart {
    fn info(&self) -> &PartInfo;

    fn identifier(&self) -> &str {
        &self.info().identifier
    }

    fn name(&self) -> &str {
        &self.info().name
    }

    fn connector(&self) -> ConnectorKind {
        self.info().connector
    }

    fn priority(&self) -> i32 {
        self.info().priority
    }
}

/// A computer model and the ports it exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Computer {
    #[serde(flatten)]
    pub info: PartInfo,
    /// Number of 9-pin control ports (0-2).
    pub control_ports: u8,
    pub user_port: bool,
    pub expansion_port: bool,
    pub cassette_port: bool,
    /// Identifier of a disk drive built into the case. Occupies drive 8.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builtin_drive: Option<String>,
}

/// Serial bus disk drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskDrive {
    #[serde(flatten)]
    pub info: PartInfo,
    /// Emulator drive type code.
    pub device_code: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CassetteDrive {
    #[serde(flatten)]
    pub info: PartInfo,
}

/// Something plugged into a control port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    #[serde(flatten)]
    pub info: PartInfo,
    pub capability: CapabilityKind,
    /// Scale applied to relative motion (mice) or analog range (paddles).
    pub sensitivity: f32,
    pub buttons: u8,
    /// Touch tablets report pen positions but want a different emulator path.
    #[serde(default)]
    pub koala_pad: bool,
    /// Emulator control port device code.
    pub device_code: i32,
}

/// One sub-mode of a user port joystick adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterMode {
    pub identifier: String,
    pub name: String,
    /// Joystick ports the adapter provides in this mode (1-2).
    pub joystick_ports: u8,
    /// Emulator adapter type code.
    pub device_code: i32,
}

/// Module plugged into the user port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPortModule {
    #[serde(flatten)]
    pub info: PartInfo,
    /// Empty for modules that provide no joystick ports.
    pub modes: Vec<AdapterMode>,
}

impl UserPortModule {
    /// Adapter with a single mode.
    pub fn joystick_adapter(info: PartInfo, joystick_ports: u8, device_code: i32) -> Self {
        let mode = AdapterMode {
            identifier: info.identifier.clone(),
            name: info.name.clone(),
            joystick_ports,
            device_code,
        };
        Self {
            info,
            modes: vec![mode],
        }
    }

    /// The mode named `identifier`, falling back to the first mode.
    pub fn mode(&self, identifier: Option<&str>) -> Option<&AdapterMode> {
        identifier
            .and_then(|id| self.modes.iter().find(|mode| mode.identifier == id))
            .or_else(|| self.modes.first())
    }

    pub fn has_modes(&self) -> bool {
        self.modes.len() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cartridge {
    #[serde(flatten)]
    pub info: PartInfo,
}

macro_rules! impl_machine_part {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MachinePart for $ty {
                fn info(&self) -> &PartInfo {
                    &self.info
                }
            }
        )*
    };
}

impl_machine_part!(
    Computer,
    DiskDrive,
    CassetteDrive,
    Controller,
    UserPortModule,
    Cartridge,
);
