//! Machine session: configuration, ports, devices and the emulator in one place
//!
//! The session owns everything the input layer needs and keeps it in step:
//! a configuration change recomputes the port set, a hot-plug event updates
//! the device set, and the resulting assignment changes reach both the router
//! and the emulator resources.

use std::path::Path;
use std::sync::Arc;

use hashbrown::HashMap;
use joyport_shared::Catalog;

use crate::config::{ConfigError, ConfigKey, Identifier, OverlayConfig};
use crate::emulator::{
    Emulator, EmulatorCommand, EventQueue, RESOURCE_JOYPORT1_DEVICE, RESOURCE_JOYPORT2_DEVICE,
    RESOURCE_USERPORT_JOY, RESOURCE_USERPORT_JOY_TYPE, ResourceValue, queue,
};
use crate::input::{
    Device, DeviceEvent, DeviceHandle, DeviceId, DeviceIdAllocator, HotplugEvent, HotplugQueue,
    InputMapping, InputRouter,
};
use crate::machine::{Machine, PortId, PortKey, PortRegistry, input_ports_of};

pub struct MachineSession {
    catalog: Arc<Catalog>,
    config: OverlayConfig,
    mapping: InputMapping,
    router: InputRouter,
    emulator: Box<dyn Emulator>,
    ids: DeviceIdAllocator,
    handles: HashMap<DeviceHandle, DeviceId>,
    commands: Arc<EventQueue<EmulatorCommand>>,
    /// Last value pushed for each resource.
    resources: HashMap<&'static str, ResourceValue>,
}

impl MachineSession {
    /// Create a session and bring ports and emulator resources in line with `config`.
    pub fn new(catalog: Arc<Catalog>, config: OverlayConfig, emulator: Box<dyn Emulator>) -> Self {
        let mut session = Self {
            catalog,
            config,
            mapping: InputMapping::new(),
            router: InputRouter::new(),
            emulator,
            ids: DeviceIdAllocator::new(),
            handles: HashMap::new(),
            commands: Arc::new(EventQueue::new()),
            resources: HashMap::new(),
        };
        session.configuration_changed();
        session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Mutable configuration. Call [`MachineSession::configuration_changed`]
    /// after editing.
    pub fn config_mut(&mut self) -> &mut OverlayConfig {
        &mut self.config
    }

    pub fn mapping(&self) -> &InputMapping {
        &self.mapping
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    /// Queue for emulator commands produced off the session's thread.
    pub fn commands(&self) -> Arc<EventQueue<EmulatorCommand>> {
        Arc::clone(&self.commands)
    }

    pub fn device_for_handle(&self, handle: DeviceHandle) -> Option<DeviceId> {
        self.handles.get(&handle).copied()
    }

    /// Select `identifier` for the part at `path` and apply it.
    pub fn set_part(&mut self, path: &[ConfigKey], identifier: &Identifier) {
        self.config.set_identifier(path, identifier);
        self.configuration_changed();
    }

    /// Recompute the port set from the configuration.
    pub fn configuration_changed(&mut self) {
        let catalog = Arc::clone(&self.catalog);
        let machine = PortRegistry::new(&catalog).machine(&self.config);

        let ports = input_ports_of(&machine);
        tracing::debug!("Machine has {} input ports", ports.len());
        self.mapping.update_ports(ports);
        self.restore_manual_pairings();
        self.sync_router();
        self.push_resources(&machine);
    }

    // ---------------------------------------------------------------
    // Devices
    // ---------------------------------------------------------------

    pub fn handle_hotplug(&mut self, event: HotplugEvent) {
        match event {
            HotplugEvent::Connected(descriptor) => {
                if self.handles.contains_key(&descriptor.handle) {
                    tracing::debug!("Ignoring repeated connect of {:?}", descriptor.handle);
                    return;
                }
                let id = self.ids.allocate();
                self.handles.insert(descriptor.handle, id);
                self.mapping.add_device(Device::new(id, descriptor));
                self.restore_manual_pairings();
            }
            HotplugEvent::Disconnected(handle) => {
                let Some(id) = self.handles.remove(&handle) else {
                    tracing::debug!("Ignoring disconnect of unknown {:?}", handle);
                    return;
                };
                self.mapping.remove_device(id);
            }
        }
        self.sync_router();
    }

    /// Handle every queued hot-plug event. Returns how many there were.
    pub fn process_hotplug(&mut self, queue: &mut HotplugQueue) -> usize {
        let events = queue.drain();
        let count = events.len();
        for event in events {
            self.handle_hotplug(event);
        }
        count
    }

    // ---------------------------------------------------------------
    // Pairing
    // ---------------------------------------------------------------

    /// Pair `device` with `port` on the user's behalf and remember the choice.
    pub fn pair_manual(&mut self, port: PortId, device: DeviceId) -> bool {
        if !self.mapping.pair(port, device, true) {
            return false;
        }
        if let Some(name) = self.mapping.device(device).map(|d| d.name.clone()) {
            self.remember(port, Some(&name));
        }
        self.sync_router();
        true
    }

    /// Drop the pairing on `port` and forget any remembered choice for it.
    pub fn unpair(&mut self, port: PortId) -> bool {
        let cancelled = self.mapping.cancel(port).is_some();
        self.remember(port, None);
        self.sync_router();
        cancelled
    }

    // ---------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------

    /// Forward a device event to the emulator.
    pub fn route(&mut self, device: DeviceId, event: &DeviceEvent) -> bool {
        if !self.router.route(device, event, self.emulator.as_mut()) {
            return false;
        }
        self.mapping.touch(device);
        true
    }

    pub fn route_handle(&mut self, handle: DeviceHandle, event: &DeviceEvent) -> bool {
        match self.device_for_handle(handle) {
            Some(device) => self.route(device, event),
            None => false,
        }
    }

    /// Apply queued emulator commands that are due this frame.
    pub fn pump_commands(&mut self) -> usize {
        queue::pump(&self.commands, self.emulator.as_mut())
    }

    /// Write the override layer (title or global settings) to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.config.save(path)
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn sync_router(&mut self) {
        let changes = self.mapping.drain_changes();
        if !changes.is_empty() {
            self.router
                .apply(&self.mapping, &changes, self.emulator.as_mut());
        }
    }

    /// Record the device name remembered for `port`, or forget it.
    fn remember(&mut self, port: PortId, name: Option<&str>) {
        let key = port.to_string();
        let inherited = self
            .config
            .fallbacks()
            .iter()
            .any(|layer| {
                layer
                    .root()
                    .child(ConfigKey::InputMapping)
                    .and_then(|node| node.get_raw(&key))
                    .is_some()
            });
        let Some(node) = self.config.node_mut(ConfigKey::InputMapping, true) else {
            return;
        };

        match name {
            Some(name) => {
                // A device drives one port; drop older entries for the same name.
                let stale: Vec<String> = node
                    .iter()
                    .filter(|(k, value)| *k != key && value.as_str() == Some(name))
                    .map(|(k, _)| k.to_string())
                    .collect();
                for k in stale {
                    node.remove_raw(&k);
                }
                node.set_raw(&key, name);
            }
            None if inherited => node.set_raw(&key, &Identifier::None),
            None => {
                node.remove_raw(&key);
            }
        }
    }

    /// Re-create remembered manual pairings for devices that are present.
    fn restore_manual_pairings(&mut self) {
        let Some(view) = self.config.view().node(ConfigKey::InputMapping) else {
            return;
        };
        let wanted: Vec<(PortId, String)> = view
            .keys()
            .into_iter()
            .filter_map(|key| {
                let port = PortId::parse(key)?;
                let name = view.string_raw(key)?;
                matches!(Identifier::parse(name), Identifier::Explicit(_))
                    .then(|| (port, name.to_string()))
            })
            .collect();

        for (port, name) in wanted {
            if self.mapping.port(port).is_none()
                || self
                    .mapping
                    .pairing_for_port(port)
                    .is_some_and(|pairing| pairing.is_manual)
            {
                continue;
            }
            let candidate = self
                .mapping
                .devices()
                .filter(|device| device.name == name)
                .find(|device| {
                    !self
                        .mapping
                        .pairing_for_device(device.id)
                        .is_some_and(|pairing| pairing.is_manual)
                })
                .map(|device| device.id);
            if let Some(device) = candidate {
                tracing::info!("Restoring manual pairing of {} with {}", name, port);
                self.mapping.pair(port, device, true);
            }
        }
    }

    fn push_resources(&mut self, machine: &Machine<'_>) {
        let device_code = |key: PortKey| {
            machine
                .controllers
                .iter()
                .find(|(slot, _)| *slot == key)
                .and_then(|(_, controller)| *controller)
                .map_or(0, |controller| controller.device_code)
        };
        let resources = [
            (
                RESOURCE_JOYPORT1_DEVICE,
                ResourceValue::Int(device_code(PortKey::ControlPort1)),
            ),
            (
                RESOURCE_JOYPORT2_DEVICE,
                ResourceValue::Int(device_code(PortKey::ControlPort2)),
            ),
            (
                RESOURCE_USERPORT_JOY,
                ResourceValue::Int(i32::from(machine.adapter_mode.is_some())),
            ),
            (
                RESOURCE_USERPORT_JOY_TYPE,
                ResourceValue::Int(machine.adapter_mode.map_or(0, |mode| mode.device_code)),
            ),
        ];

        for (name, value) in resources {
            if self.resources.get(name) == Some(&value) {
                continue;
            }
            tracing::debug!("Setting {} = {}", name, value);
            self.emulator.set_resource(name, value.clone());
            self.resources.insert(name, value);
        }
    }
}
