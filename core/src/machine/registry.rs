//! Derives the port set from the configured machine

use joyport_shared::catalog::{
    AdapterMode, Cartridge, Category, Computer, Controller, DiskDrive, MachinePart,
    UserPortModule,
};
use joyport_shared::{Catalog, CapabilityKind, ConnectorKind, is_compatible};

use super::port::{Calibration, Port, PortId, PortKey};
use crate::config::{ConfigKey, Identifier, NodeView, OverlayConfig};

/// Listing base for each slot; sub-ports add `sub / 100`.
fn ordering_base(key: PortKey) -> f64 {
    match key {
        PortKey::ControlPort1 => 1.0,
        PortKey::ControlPort2 => 2.0,
        PortKey::UserPortJoystick1 => 3.0,
        PortKey::UserPortJoystick2 => 4.0,
        PortKey::UserPort => 10.0,
        PortKey::ExpansionPort => 11.0,
        PortKey::CassettePort => 12.0,
        PortKey::DiskDrive(unit) => 20.0 + f64::from(unit),
    }
}

/// Priority of each input slot. Port 2 is where most software expects the
/// primary joystick.
fn input_priority(key: PortKey) -> i32 {
    match key {
        PortKey::ControlPort2 => 100,
        PortKey::ControlPort1 => 90,
        PortKey::UserPortJoystick1 => 50,
        PortKey::UserPortJoystick2 => 40,
        _ => 0,
    }
}

/// What a configuration slot asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection<'a> {
    Part(&'a str),
    Automatic,
    Nothing,
}

/// Read the selection at `path`.
///
/// An explicit identifier anywhere in the stack wins over `auto`. When no
/// layer says anything, mandatory slots select automatically.
fn selection<'a>(config: &'a OverlayConfig, path: &[ConfigKey], mandatory: bool) -> Selection<'a> {
    let Some(view) = descend(config.view(), path) else {
        return if mandatory {
            Selection::Automatic
        } else {
            Selection::Nothing
        };
    };
    if let Some(id) = view.resolve_identifier(ConfigKey::Identifier) {
        return Selection::Part(id);
    }
    match view.identifier(ConfigKey::Identifier) {
        Identifier::None => Selection::Nothing,
        Identifier::Auto => Selection::Automatic,
        Identifier::Default | Identifier::Explicit(_) if mandatory => Selection::Automatic,
        Identifier::Default | Identifier::Explicit(_) => Selection::Nothing,
    }
}

fn descend<'a>(view: NodeView<'a>, path: &[ConfigKey]) -> Option<NodeView<'a>> {
    path.iter().try_fold(view, |view, key| view.node(*key))
}

fn pick<'c, T: MachinePart>(
    category: &'c Category<T>,
    selection: Selection<'_>,
    accepted: &'c [ConnectorKind],
    slot: &str,
) -> Option<&'c T> {
    match selection {
        Selection::Nothing => None,
        Selection::Automatic => category.best(accepted),
        Selection::Part(id) => match category.get(id) {
            Some(part) if is_compatible(part.connector(), accepted) => Some(part),
            Some(_) => {
                tracing::warn!("{} does not fit {}, leaving it empty", id, slot);
                None
            }
            None => {
                tracing::warn!("Unknown part {} configured for {}", id, slot);
                None
            }
        },
    }
}

/// Parts selected by a configuration.
#[derive(Debug, Clone)]
pub struct Machine<'c> {
    pub computer: Option<&'c Computer>,
    /// Indexed by unit number - 8. Unit 8 is `None` when a drive is built in.
    pub disk_drives: [Option<&'c DiskDrive>; 4],
    pub builtin_drive: Option<&'c DiskDrive>,
    pub cassette_drive: bool,
    pub user_port: Option<&'c UserPortModule>,
    pub adapter_mode: Option<&'c AdapterMode>,
    pub expansion: Option<&'c Cartridge>,
    /// Controllers on each input slot present on this machine.
    pub controllers: Vec<(PortKey, Option<&'c Controller>)>,
}

/// Translates configurations into ports using a catalog.
#[derive(Debug, Clone, Copy)]
pub struct PortRegistry<'c> {
    catalog: &'c Catalog,
}

impl<'c> PortRegistry<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Resolve every slot of `config` against the catalog.
    pub fn machine(&self, config: &OverlayConfig) -> Machine<'c> {
        let catalog = self.catalog;
        let computer = match selection(config, &[ConfigKey::Computer], true) {
            Selection::Part(id) => catalog.computers.get(id).or_else(|| {
                tracing::warn!("Unknown computer {}, using the default", id);
                catalog.default_computer()
            }),
            _ => catalog.default_computer(),
        };

        let mut machine = Machine {
            computer,
            disk_drives: [None; 4],
            builtin_drive: None,
            cassette_drive: false,
            user_port: None,
            adapter_mode: None,
            expansion: None,
            controllers: Vec::new(),
        };
        let Some(computer) = computer else {
            return machine;
        };

        machine.builtin_drive = computer
            .builtin_drive
            .as_deref()
            .and_then(|id| catalog.disk_drives.get(id));
        for (unit, key) in (8u8..).zip(ConfigKey::DISK_DRIVES) {
            if unit == 8 && machine.builtin_drive.is_some() {
                continue;
            }
            let slot = PortKey::DiskDrive(unit).name();
            machine.disk_drives[usize::from(unit - 8)] = pick(
                &catalog.disk_drives,
                selection(config, &[key], false),
                &[ConnectorKind::SerialBus],
                &slot,
            );
        }

        if computer.cassette_port {
            machine.cassette_drive = pick(
                &catalog.cassette_drives,
                selection(config, &[ConfigKey::CassetteDrive], false),
                &[ConnectorKind::CassettePort],
                "cassettePort",
            )
            .is_some();
        }

        if computer.user_port {
            machine.user_port = pick(
                &catalog.user_port_modules,
                selection(config, &[ConfigKey::UserPort], false),
                &[ConnectorKind::UserPort],
                "userPort",
            );
            machine.adapter_mode = machine.user_port.and_then(|module| {
                let mode = descend(config.view(), &[ConfigKey::UserPort])
                    .and_then(|view| view.string(ConfigKey::SingularAdapterMode));
                module.mode(mode)
            });
        }

        if computer.expansion_port {
            machine.expansion = pick(
                &catalog.cartridges,
                selection(config, &[ConfigKey::ExpansionPort], false),
                &[ConnectorKind::ExpansionPort],
                "expansionPort",
            );
        }

        let adapter_ports = machine.adapter_mode.map_or(0, |mode| mode.joystick_ports);
        let input_slots = [
            (PortKey::ControlPort1, computer.control_ports >= 1),
            (PortKey::ControlPort2, computer.control_ports >= 2),
            (PortKey::UserPortJoystick1, adapter_ports >= 1),
            (PortKey::UserPortJoystick2, adapter_ports >= 2),
        ];
        for (key, present) in input_slots {
            if !present {
                continue;
            }
            let controller = pick(
                &catalog.controllers,
                selection(config, &key.config_path(), false),
                &[ConnectorKind::ControlPort],
                &key.name(),
            );
            machine.controllers.push((key, controller));
        }

        machine
    }

    /// Every port of the configured machine.
    pub fn ports(&self, config: &OverlayConfig) -> Vec<Port> {
        ports_of(&self.machine(config))
    }

    /// Ports a device can drive, with player indexes assigned.
    pub fn input_ports(&self, config: &OverlayConfig) -> Vec<Port> {
        input_ports_of(&self.machine(config))
    }
}

/// Every port of `machine`, in listing order.
pub fn ports_of(machine: &Machine<'_>) -> Vec<Port> {
    let Some(computer) = machine.computer else {
        return Vec::new();
    };
    let mut ports = Vec::new();

    for &(key, controller) in &machine.controllers {
        ports.extend(controller_ports(key, controller));
    }

    if computer.user_port {
        ports.push(slot_port(
            PortKey::UserPort,
            "User Port",
            ConnectorKind::UserPort,
            machine.user_port.map(|m| m.identifier()),
        ));
    }
    if computer.expansion_port {
        ports.push(slot_port(
            PortKey::ExpansionPort,
            "Expansion Port",
            ConnectorKind::ExpansionPort,
            machine.expansion.map(|c| c.identifier()),
        ));
    }
    if computer.cassette_port {
        ports.push(slot_port(
            PortKey::CassettePort,
            "Cassette Port",
            ConnectorKind::CassettePort,
            None,
        ));
    }
    for (unit, drive) in (8u8..).zip(machine.disk_drives) {
        if unit == 8 && machine.builtin_drive.is_some() {
            continue;
        }
        ports.push(slot_port(
            PortKey::DiskDrive(unit),
            &format!("Drive {}", unit),
            ConnectorKind::SerialBus,
            drive.map(|d| d.identifier()),
        ));
    }

    ports.sort_by(|a, b| a.ordering.total_cmp(&b.ordering));
    ports
}

/// Input ports of `machine` with player indexes assigned by priority.
pub fn input_ports_of(machine: &Machine<'_>) -> Vec<Port> {
    let mut ports: Vec<Port> = ports_of(machine)
        .into_iter()
        .filter(Port::is_input)
        .collect();
    ports.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.ordering.total_cmp(&b.ordering))
    });
    for (player, port) in ports.iter_mut().enumerate() {
        port.player_index = Some(player);
    }
    ports.sort_by(|a, b| a.ordering.total_cmp(&b.ordering));
    ports
}

fn slot_port(key: PortKey, name: &str, connector: ConnectorKind, part: Option<&str>) -> Port {
    let mut port = Port::new(key.into(), name, &[connector], ordering_base(key));
    port.part = part.map(str::to_string);
    port
}

fn controller_ports(key: PortKey, controller: Option<&Controller>) -> Vec<Port> {
    let base_name = match key {
        PortKey::ControlPort1 => "Control Port 1",
        PortKey::ControlPort2 => "Control Port 2",
        PortKey::UserPortJoystick1 => "User Port Joystick 1",
        _ => "User Port Joystick 2",
    };
    let accepted = [ConnectorKind::ControlPort];
    let base = ordering_base(key);

    let configure = |mut port: Port, priority: i32| {
        port.hot_swappable = true;
        if let Some(controller) = controller {
            port.capability = controller.capability;
            port.priority = priority;
            port.part = Some(controller.identifier().to_string());
            port.calibration = Calibration::from(controller);
            port.device_code = controller.device_code;
        }
        port
    };

    match controller {
        Some(c) if c.capability == CapabilityKind::Paddle => (1u8..=2)
            .map(|sub| {
                let port = Port::new(
                    PortId::sub(key, sub),
                    format!("{} Paddle {}", base_name, sub),
                    &accepted,
                    base,
                );
                configure(port, input_priority(key) - i32::from(sub - 1))
            })
            .collect(),
        _ => vec![configure(
            Port::new(key.into(), base_name, &accepted, base),
            input_priority(key),
        )],
    }
}
