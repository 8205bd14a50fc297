//! Device-to-port pairing
//!
//! [`InputMapping`] keeps every known port and device in exactly one of two
//! states, mapped or unmapped, and the mapped ones form a matching: at most
//! one pairing per port and per device.
//!
//! Automatic mapping is greedy by port priority. Manual pairings are never
//! touched by it.
//!
//! The mapping is not synchronized. It belongs to one owner (the session on
//! the UI thread); hot-plug notifications are marshaled there first.


use std::cell::OnceCell;
use std::time::Instant;

use hashbrown::{HashMap, HashSet};

use super::device::{Device, DeviceId};
use crate::machine::{Port, PortId};

/// An active association between one port and one device.
#[derive(Debug, Clone, PartialEq)]
pub struct Pairing {
    pub port: PortId,
    pub device: DeviceId,
    /// Set by the user; automatic mapping leaves it alone.
    pub is_manual: bool,
    pub last_activity: Instant,
}

/// Which device now drives a port (`None` = nothing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentChange {
    pub port: PortId,
    pub device: Option<DeviceId>,
}

#[derive(Debug, Default)]
pub struct InputMapping {
    ports: HashMap<PortId, Port>,
    devices: HashMap<DeviceId, Device>,

    unmapped_ports: HashSet<PortId>,
    unmapped_devices: HashSet<DeviceId>,
    mapped_ports: HashMap<PortId, Pairing>,
    mapped_devices: HashMap<DeviceId, PortId>,

    /// Devices by priority desc, name asc. Rebuilt on demand.
    device_order: OnceCell<Vec<DeviceId>>,
    /// Ports by ordering number asc. Rebuilt on demand.
    port_order: OnceCell<Vec<PortId>>,

    changes: Vec<AssignmentChange>,
}

impl InputMapping {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------

    /// All devices, highest priority first, then by name.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.device_order
            .get_or_init(|| {
                let mut order: Vec<&Device> = self.devices.values().collect();
                order.sort_by(|a, b| {
                    b.priority
                        .cmp(&a.priority)
                        .then_with(|| a.name.cmp(&b.name))
                        .then_with(|| a.id.cmp(&b.id))
                });
                order.into_iter().map(|device| device.id).collect()
            })
            .iter()
            .filter_map(|id| self.devices.get(id))
    }

    /// All ports in listing order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.port_order
            .get_or_init(|| {
                let mut order: Vec<&Port> = self.ports.values().collect();
                order.sort_by(|a, b| {
                    a.ordering
                        .total_cmp(&b.ordering)
                        .then_with(|| a.id.cmp(&b.id))
                });
                order.into_iter().map(|port| port.id).collect()
            })
            .iter()
            .filter_map(|id| self.ports.get(id))
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(&id)
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    pub fn pairing_for_port(&self, port: PortId) -> Option<&Pairing> {
        self.mapped_ports.get(&port)
    }

    pub fn pairing_for_device(&self, device: DeviceId) -> Option<&Pairing> {
        self.mapped_devices
            .get(&device)
            .and_then(|port| self.mapped_ports.get(port))
    }

    pub fn pairings(&self) -> impl Iterator<Item = &Pairing> {
        self.mapped_ports.values()
    }

    pub fn is_port_mapped(&self, port: PortId) -> bool {
        self.mapped_ports.contains_key(&port)
    }

    pub fn is_device_mapped(&self, device: DeviceId) -> bool {
        self.mapped_devices.contains_key(&device)
    }

    pub fn unmapped_ports(&self) -> impl Iterator<Item = PortId> + '_ {
        self.unmapped_ports.iter().copied()
    }

    pub fn unmapped_devices(&self) -> impl Iterator<Item = DeviceId> + '_ {
        self.unmapped_devices.iter().copied()
    }

    /// Whether `device` could drive `port`.
    pub fn is_compatible(&self, port: PortId, device: DeviceId) -> bool {
        match (self.ports.get(&port), self.devices.get(&device)) {
            (Some(port), Some(device)) => port.is_input() && device.supports(port.capability),
            _ => false,
        }
    }

    /// Assignment changes since the last call, one entry per port, in the
    /// order ports were first touched.
    pub fn drain_changes(&mut self) -> Vec<AssignmentChange> {
        let mut latest: HashMap<PortId, usize> = HashMap::new();
        let mut coalesced: Vec<AssignmentChange> = Vec::new();
        for change in self.changes.drain(..) {
            match latest.get(&change.port) {
                Some(&i) => coalesced[i] = change,
                None => {
                    latest.insert(change.port, coalesced.len());
                    coalesced.push(change);
                }
            }
        }
        coalesced
    }

    // ---------------------------------------------------------------
    // Devices
    // ---------------------------------------------------------------

    /// Add a newly connected device and re-run automatic mapping.
    ///
    /// Returns `false` if a device with the same id is already known.
    pub fn add_device(&mut self, device: Device) -> bool {
        if self.devices.contains_key(&device.id) {
            tracing::debug!("Ignoring duplicate {}", device.id);
            return false;
        }
        tracing::info!("Input device {} ({}) added", device.name, device.id);
        self.unmapped_devices.insert(device.id);
        self.devices.insert(device.id, device);
        self.device_order = OnceCell::new();
        self.automap(true);
        true
    }

    /// Remove a device, freeing its port, and re-run automatic mapping.
    pub fn remove_device(&mut self, id: DeviceId) -> Option<Device> {
        if !self.devices.contains_key(&id) {
            tracing::debug!("Ignoring removal of unknown {}", id);
            return None;
        }
        if let Some(&port) = self.mapped_devices.get(&id) {
            self.cancel(port);
        }
        self.unmapped_devices.remove(&id);
        let device = self.devices.remove(&id);
        self.device_order = OnceCell::new();
        if let Some(device) = &device {
            tracing::info!("Input device {} ({}) removed", device.name, device.id);
        }
        self.automap(true);
        device
    }

    // ---------------------------------------------------------------
    // Ports
    // ---------------------------------------------------------------

    /// Add ports not known yet and re-run automatic mapping.
    ///
    /// Ports whose identity is already known are skipped; use
    /// [`InputMapping::replace`] to change a known port.
    pub fn add_ports(&mut self, ports: impl IntoIterator<Item = Port>) -> bool {
        let mut added = false;
        for port in ports {
            added |= self.insert_port(port);
        }
        if added {
            self.automap(true);
        }
        added
    }

    /// Remove ports, cancelling their pairings, and re-run automatic mapping.
    pub fn remove_ports(&mut self, ids: impl IntoIterator<Item = PortId>) -> bool {
        let mut removed = false;
        for id in ids {
            removed |= self.delete_port(id).is_some();
        }
        if removed {
            self.automap(true);
        }
        removed
    }

    /// Swap `old` for `new` (typically the same slot with different attributes).
    ///
    /// A manual pairing whose device can still drive `new` moves over
    /// unchanged. Anything else is cancelled and `new` is left to automatic
    /// mapping.
    pub fn replace(&mut self, old: PortId, new: Port) -> bool {
        if !self.replace_port(old, new) {
            return false;
        }
        self.automap(true);
        true
    }

    /// Reconcile the known ports with a freshly computed port set.
    ///
    /// Vanished ports are removed, new ports added, and ports whose attributes
    /// changed are replaced. A new port in the same slot as a vanished one
    /// (for example paddle sub-ports turning into a joystick port) replaces
    /// it, so manual pairings can follow. Automatic mapping runs once at the end.
    pub fn update_ports(&mut self, ports: Vec<Port>) -> bool {
        let incoming: HashSet<PortId> = ports.iter().map(|port| port.id).collect();
        let mut vanished: Vec<PortId> = self
            .ports
            .keys()
            .copied()
            .filter(|id| !incoming.contains(id))
            .collect();
        vanished.sort();

        let mut changed = false;
        for port in ports {
            let unchanged = self
                .ports
                .get(&port.id)
                .map(|existing| existing.same_attributes(&port));
            match unchanged {
                Some(true) => {}
                Some(false) => changed |= self.replace_port(port.id, port),
                None => {
                    let slot = port.id.key;
                    match take_first(&mut vanished, |id| id.key == slot) {
                        Some(old) => changed |= self.replace_port(old, port),
                        None => changed |= self.insert_port(port),
                    }
                }
            }
        }
        for id in vanished {
            changed |= self.delete_port(id).is_some();
        }

        if changed {
            self.automap(true);
        }
        changed
    }

    // ---------------------------------------------------------------
    // Pairing
    // ---------------------------------------------------------------

    /// Pair `device` with `port`.
    ///
    /// Does nothing (returns `false`) if either is unknown or the device
    /// cannot provide the capability the port needs. Automatic requests also
    /// require both sides to be free. A manual request first cancels whatever
    /// either side is paired with, then lets automatic mapping fill any port
    /// it freed.
    pub fn pair(&mut self, port: PortId, device: DeviceId, is_manual: bool) -> bool {
        if !self.is_compatible(port, device) {
            tracing::debug!("Ignoring incompatible pairing {} - {}", port, device);
            return false;
        }

        if is_manual {
            if let Some(pairing) = self.mapped_ports.get_mut(&port)
                && pairing.device == device
            {
                pairing.is_manual = true;
                return true;
            }
            if self.mapped_ports.contains_key(&port) {
                self.cancel(port);
            }
            if let Some(&previous) = self.mapped_devices.get(&device) {
                self.cancel(previous);
            }
        } else if !self.unmapped_ports.contains(&port) || !self.unmapped_devices.contains(&device) {
            tracing::debug!("Ignoring automatic pairing of busy {} - {}", port, device);
            return false;
        }

        self.link(port, device, is_manual, Instant::now());

        if is_manual {
            self.automap(false);
        }
        true
    }

    /// Undo the pairing on `port`, leaving both sides unmapped.
    pub fn cancel(&mut self, port: PortId) -> Option<Pairing> {
        let pairing = self.mapped_ports.remove(&port)?;
        self.mapped_devices.remove(&pairing.device);
        self.unmapped_ports.insert(port);
        self.unmapped_devices.insert(pairing.device);
        if let Some(device) = self.devices.get_mut(&pairing.device) {
            device.detach();
        }
        tracing::info!("Unpaired {} from {}", pairing.device, port);
        self.changes.push(AssignmentChange { port, device: None });
        Some(pairing)
    }

    /// Greedy automatic mapping.
    ///
    /// With `cancel_automatic`, every automatic pairing is dropped first.
    /// Then unmapped input ports are visited by priority (ordering number
    /// breaks ties) and each takes the first free device, in [`devices`]
    /// order, that supports its capability. Lower-priority ports can end up
    /// empty even when a perfect matching exists.
    ///
    /// [`devices`]: InputMapping::devices
    pub fn automap(&mut self, cancel_automatic: bool) {
        if cancel_automatic {
            let automatic: Vec<PortId> = self
                .mapped_ports
                .values()
                .filter(|pairing| !pairing.is_manual)
                .map(|pairing| pairing.port)
                .collect();
            for port in automatic {
                self.cancel(port);
            }
        }

        let mut ports: Vec<&Port> = self
            .unmapped_ports
            .iter()
            .filter_map(|id| self.ports.get(id))
            .filter(|port| port.is_input())
            .collect();
        ports.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.ordering.total_cmp(&b.ordering))
                .then_with(|| a.id.cmp(&b.id))
        });
        let ports: Vec<PortId> = ports.into_iter().map(|port| port.id).collect();
        let candidates: Vec<DeviceId> = self
            .devices()
            .filter(|device| self.unmapped_devices.contains(&device.id))
            .map(|device| device.id)
            .collect();

        let mut taken: HashSet<DeviceId> = HashSet::new();
        let mut assignments = Vec::new();
        for port in ports {
            let capability = self.ports[&port].capability;
            let found = candidates.iter().copied().find(|id| {
                !taken.contains(id) && self.devices[id].supports(capability)
            });
            if let Some(device) = found {
                taken.insert(device);
                assignments.push((port, device));
            }
        }

        let now = Instant::now();
        for (port, device) in assignments {
            self.link(port, device, false, now);
        }
    }

    /// Record activity on the pairing `device` belongs to.
    pub fn touch(&mut self, device: DeviceId) {
        if let Some(port) = self.mapped_devices.get(&device)
            && let Some(pairing) = self.mapped_ports.get_mut(port)
        {
            pairing.last_activity = Instant::now();
        }
    }

    // ---------------------------------------------------------------
    // Internals (no automatic mapping)
    // ---------------------------------------------------------------

    fn link(&mut self, port: PortId, device: DeviceId, is_manual: bool, now: Instant) {
        let (Some(port_ref), Some(device_ref)) =
            (self.ports.get(&port), self.devices.get_mut(&device))
        else {
            return;
        };
        device_ref.attach(port_ref);
        tracing::info!(
            "Paired {} ({}) with {}{}",
            device_ref.name,
            device,
            port_ref.name,
            if is_manual { " (manual)" } else { "" }
        );

        self.unmapped_ports.remove(&port);
        self.unmapped_devices.remove(&device);
        self.mapped_devices.insert(device, port);
        self.mapped_ports.insert(
            port,
            Pairing {
                port,
                device,
                is_manual,
                last_activity: now,
            },
        );
        self.changes.push(AssignmentChange {
            port,
            device: Some(device),
        });
    }

    fn insert_port(&mut self, port: Port) -> bool {
        if self.ports.contains_key(&port.id) {
            return false;
        }
        self.unmapped_ports.insert(port.id);
        self.ports.insert(port.id, port);
        self.port_order = OnceCell::new();
        true
    }

    fn delete_port(&mut self, id: PortId) -> Option<Port> {
        if self.mapped_ports.contains_key(&id) {
            self.cancel(id);
        }
        self.unmapped_ports.remove(&id);
        let port = self.ports.remove(&id)?;
        self.port_order = OnceCell::new();
        Some(port)
    }

    fn replace_port(&mut self, old: PortId, new: Port) -> bool {
        if !self.ports.contains_key(&old) {
            tracing::debug!("Ignoring replacement of unknown {}", old);
            return false;
        }
        if old != new.id && self.ports.contains_key(&new.id) {
            tracing::debug!("Ignoring replacement of {} by existing {}", old, new.id);
            return false;
        }

        let migrate = self.mapped_ports.get(&old).is_some_and(|pairing| {
            pairing.is_manual
                && new.is_input()
                && self
                    .devices
                    .get(&pairing.device)
                    .is_some_and(|device| device.supports(new.capability))
        });

        if !migrate {
            self.delete_port(old);
            self.insert_port(new);
            return true;
        }

        let Some(mut pairing) = self.mapped_ports.remove(&old) else {
            return false;
        };
        self.ports.remove(&old);
        self.port_order = OnceCell::new();
        if old != new.id {
            self.changes.push(AssignmentChange {
                port: old,
                device: None,
            });
        }

        let new_id = new.id;
        if let Some(device) = self.devices.get_mut(&pairing.device) {
            device.attach(&new);
        }
        pairing.port = new_id;
        self.mapped_devices.insert(pairing.device, new_id);
        self.changes.push(AssignmentChange {
            port: new_id,
            device: Some(pairing.device),
        });
        tracing::info!("Moved manual pairing of {} from {} to {}", pairing.device, old, new_id);
        self.mapped_ports.insert(new_id, pairing);
        self.ports.insert(new_id, new);
        true
    }
}

/// Remove and return the first element matching `predicate`.
fn take_first<T>(items: &mut Vec<T>, predicate: impl Fn(&T) -> bool) -> Option<T> {
    let index = items.iter().position(predicate)?;
    Some(items.remove(index))
}
