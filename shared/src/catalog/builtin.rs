//! Built-in hardware definitions.

use super::parts::{
    AdapterMode, CassetteDrive, Cartridge, Computer, Controller, DiskDrive, PRIORITY_DEFAULT,
    PRIORITY_HIGH, PartInfo, UserPortModule,
};
use crate::connector::{CapabilityKind, ConnectorKind};

fn computer(
    info: PartInfo,
    control_ports: u8,
    user_port: bool,
    cassette_port: bool,
    builtin_drive: Option<&str>,
) -> Computer {
    Computer {
        info,
        control_ports,
        user_port,
        expansion_port: true,
        cassette_port,
        builtin_drive: builtin_drive.map(str::to_string),
    }
}

pub(super) fn computers() -> Vec<Computer> {
    let info = |identifier: &str, name: &str, priority: i32| {
        PartInfo::new(identifier, name, ConnectorKind::None, priority)
    };
    vec![
        computer(info("C64", "Commodore 64", PRIORITY_HIGH), 2, true, true, None),
        computer(info("C64C", "Commodore 64C", PRIORITY_DEFAULT), 2, true, true, None),
        computer(
            info("SX-64", "Commodore SX-64", PRIORITY_DEFAULT),
            2,
            true,
            false,
            Some("1541"),
        ),
        computer(
            info("C64GS", "Commodore 64 Games System", PRIORITY_DEFAULT),
            2,
            false,
            false,
            None,
        ),
        computer(info("VIC-20", "Commodore VIC-20", PRIORITY_DEFAULT), 1, true, true, None),
    ]
}

pub(super) fn disk_drives() -> Vec<DiskDrive> {
    let drive = |identifier: &str, name: &str, priority: i32, device_code: i32| DiskDrive {
        info: PartInfo::new(identifier, name, ConnectorKind::SerialBus, priority),
        device_code,
    };
    vec![
        drive("1541", "Commodore 1541", PRIORITY_HIGH, 1541),
        drive("1541-II", "Commodore 1541-II", 90, 1542),
        drive("1571", "Commodore 1571", 80, 1571),
        drive("1581", "Commodore 1581", 70, 1581),
    ]
}

pub(super) fn cassette_drives() -> Vec<CassetteDrive> {
    vec![CassetteDrive {
        info: PartInfo::new(
            "1530",
            "Commodore 1530 Datasette",
            ConnectorKind::CassettePort,
            PRIORITY_HIGH,
        ),
    }]
}

pub(super) fn controllers() -> Vec<Controller> {
    let controller = |identifier: &str,
                      name: &str,
                      priority: i32,
                      capability: CapabilityKind,
                      buttons: u8,
                      device_code: i32| Controller {
        info: PartInfo::new(identifier, name, ConnectorKind::ControlPort, priority),
        capability,
        sensitivity: 1.0,
        buttons,
        koala_pad: false,
        device_code,
    };

    vec![
        controller(
            "Competition Pro",
            "Competition Pro",
            PRIORITY_HIGH,
            CapabilityKind::Joystick,
            1,
            1,
        ),
        controller("Atari CX-40", "Atari CX-40", 90, CapabilityKind::Joystick, 1, 1),
        controller("Paddles", "Paddles", 50, CapabilityKind::Paddle, 1, 2),
        Controller {
            sensitivity: 0.5,
            ..controller("1351", "Commodore 1351 Mouse", 60, CapabilityKind::Mouse, 2, 3)
        },
        Controller {
            sensitivity: 0.5,
            ..controller("Amiga Mouse", "Amiga Mouse", 40, CapabilityKind::Mouse, 2, 5)
        },
        Controller {
            koala_pad: true,
            ..controller("KoalaPad", "KoalaPad", 30, CapabilityKind::LightPen, 2, 10)
        },
        controller(
            "Inkwell",
            "Inkwell Light Pen",
            20,
            CapabilityKind::LightPen,
            1,
            11,
        ),
        controller(
            "Magnum Light Phaser",
            "Magnum Light Phaser",
            20,
            CapabilityKind::LightGun,
            1,
            14,
        ),
    ]
}

pub(super) fn user_port_modules() -> Vec<UserPortModule> {
    let info = |identifier: &str, name: &str, priority: i32| {
        PartInfo::new(identifier, name, ConnectorKind::UserPort, priority)
    };
    let mode = |identifier: &str, name: &str, joystick_ports: u8, device_code: i32| AdapterMode {
        identifier: identifier.to_string(),
        name: name.to_string(),
        joystick_ports,
        device_code,
    };

    vec![
        UserPortModule::joystick_adapter(
            info("Protovision", "Protovision 4 Player Adapter", PRIORITY_HIGH),
            2,
            0,
        ),
        UserPortModule::joystick_adapter(
            info("Digital Excess", "Digital Excess 4 Player Adapter", 80),
            2,
            4,
        ),
        UserPortModule::joystick_adapter(info("Kingsoft", "Kingsoft 4 Player Adapter", 70), 2, 5),
        UserPortModule::joystick_adapter(info("Starbyte", "Starbyte 4 Player Adapter", 70), 2, 6),
        UserPortModule::joystick_adapter(info("Hummer", "Hummer Adapter", 50), 1, 2),
        UserPortModule {
            info: info("Singular Crew", "Singular Crew Adapter", 60),
            modes: vec![
                mode("cga", "Two Joysticks (CGA)", 2, 0),
                mode("oem", "Single Joystick (OEM)", 1, 3),
            ],
        },
    ]
}

pub(super) fn cartridges() -> Vec<Cartridge> {
    let cartridge = |identifier: &str, name: &str| Cartridge {
        info: PartInfo::new(identifier, name, ConnectorKind::ExpansionPort, PRIORITY_DEFAULT),
    };
    vec![
        cartridge("Action Replay", "Action Replay VI"),
        cartridge("Final Cartridge III", "The Final Cartridge III"),
        cartridge("EasyFlash", "EasyFlash"),
    ]
}
