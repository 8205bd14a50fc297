//! Forwarding of device events to the emulator
//!
//! The router holds a snapshot of where every paired device goes. It is
//! updated from [`AssignmentChange`]s and never touches the mapping itself,
//! so events can be routed at input rate without re-running any matching.

use hashbrown::HashMap;
use joyport_shared::CapabilityKind;

use super::device::DeviceId;
use super::joystick::JoystickButtons;
use super::mapping::{AssignmentChange, InputMapping};
use crate::emulator::{Emulator, MouseEvent};
use crate::machine::{Calibration, PortId};

/// Pixels per frame a fully deflected stick moves an emulated mouse.
const STICK_MOUSE_SPEED: f32 = 8.0;
/// Host mouse travel (pixels) across the full paddle range.
const PADDLE_TRAVEL: f32 = 256.0;
/// Light pen tip size, normalized to the screen.
const PEN_SIZE: (f32, f32) = (0.01, 0.01);

/// Raw input from a host device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    /// Digital state: directions and fire buttons currently held.
    Joystick(JoystickButtons),
    /// Analog stick, both axes in `-1.0..=1.0`, positive y up.
    Axis { x: f32, y: f32 },
    MouseMoved { dx: f32, dy: f32 },
    MouseButton { button: u8, pressed: bool },
    /// Pointer position normalized to the screen.
    Pen {
        x: f32,
        y: f32,
        button1: bool,
        button2: bool,
    },
    PenLifted,
}

/// Where a routed device's events go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteTarget {
    pub port: PortId,
    /// Emulator port number (1-4).
    pub index: u8,
    pub capability: CapabilityKind,
    pub calibration: Calibration,
}

#[derive(Debug, Default, Clone, Copy)]
struct Held {
    buttons: JoystickButtons,
    axis: JoystickButtons,
    paddle: f32,
}

#[derive(Debug, Default)]
pub struct InputRouter {
    routes: HashMap<DeviceId, RouteTarget>,
    held: HashMap<DeviceId, Held>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self, device: DeviceId) -> Option<&RouteTarget> {
        self.routes.get(&device)
    }

    /// Apply assignment changes. Joystick lines held by a device that loses
    /// its port are released.
    pub fn apply(
        &mut self,
        mapping: &InputMapping,
        changes: &[AssignmentChange],
        emulator: &mut dyn Emulator,
    ) {
        for change in changes {
            let previous: Vec<DeviceId> = self
                .routes
                .iter()
                .filter(|(_, target)| target.port == change.port)
                .map(|(device, _)| *device)
                .collect();
            for device in previous {
                self.unroute(device, emulator);
            }
            if let Some(device) = change.device {
                if let Some(old) = self.routes.get(&device).map(|target| target.port)
                    && old != change.port
                {
                    self.unroute(device, emulator);
                }
                if let Some(target) = target_for(mapping, change.port) {
                    tracing::debug!("Routing {} to port {}", device, target.index);
                    self.routes.insert(device, target);
                }
            }
        }
    }

    /// Rebuild every route from the current pairings.
    pub fn rebuild(&mut self, mapping: &InputMapping) {
        self.routes.clear();
        self.held.clear();
        for pairing in mapping.pairings() {
            if let Some(target) = target_for(mapping, pairing.port) {
                self.routes.insert(pairing.device, target);
            }
        }
    }

    /// Forward `event` from `device`. Returns `false` if the device is not
    /// routed or the event does not fit the port's capability.
    pub fn route(
        &mut self,
        device: DeviceId,
        event: &DeviceEvent,
        emulator: &mut dyn Emulator,
    ) -> bool {
        let Some(target) = self.routes.get(&device).copied() else {
            return false;
        };
        let held = self.held.entry(device).or_default();

        match (target.capability, *event) {
            (CapabilityKind::Joystick, DeviceEvent::Joystick(buttons)) => {
                held.buttons = buttons;
                emulator.joystick(target.index, (held.buttons | held.axis).bits());
            }
            (CapabilityKind::Joystick, DeviceEvent::Axis { x, y }) => {
                held.axis = JoystickButtons::from_axes(x, y);
                emulator.joystick(target.index, (held.buttons | held.axis).bits());
            }

            (CapabilityKind::Paddle, DeviceEvent::Axis { x, .. }) => {
                held.paddle = ((x + 1.0) / 2.0).clamp(0.0, 1.0);
                emulator.set_analog_position(target.index, paddle_number(&target), held.paddle);
            }
            (CapabilityKind::Paddle, DeviceEvent::MouseMoved { dx, .. }) => {
                let step = dx * target.calibration.sensitivity / PADDLE_TRAVEL;
                held.paddle = (held.paddle + step).clamp(0.0, 1.0);
                emulator.set_analog_position(target.index, paddle_number(&target), held.paddle);
            }
            (CapabilityKind::Paddle, DeviceEvent::Joystick(buttons)) => {
                held.buttons = buttons;
                emulator.joystick(target.index, paddle_fire(&target, buttons).bits());
            }
            (CapabilityKind::Paddle, DeviceEvent::MouseButton { pressed, .. }) => {
                let buttons = if pressed {
                    JoystickButtons::FIRE
                } else {
                    JoystickButtons::empty()
                };
                held.buttons = buttons;
                emulator.joystick(target.index, paddle_fire(&target, buttons).bits());
            }

            (CapabilityKind::Mouse, DeviceEvent::MouseMoved { dx, dy }) => {
                let scale = target.calibration.sensitivity;
                emulator.mouse(MouseEvent::Moved {
                    dx: dx * scale,
                    dy: dy * scale,
                });
            }
            (CapabilityKind::Mouse, DeviceEvent::Axis { x, y }) => {
                let scale = target.calibration.sensitivity * STICK_MOUSE_SPEED;
                emulator.mouse(MouseEvent::Moved {
                    dx: x * scale,
                    dy: -y * scale,
                });
            }
            (CapabilityKind::Mouse, DeviceEvent::MouseButton { button, pressed }) => {
                if button >= target.calibration.buttons {
                    return false;
                }
                emulator.mouse(if pressed {
                    MouseEvent::Pressed(button)
                } else {
                    MouseEvent::Released(button)
                });
            }

            (
                CapabilityKind::LightPen | CapabilityKind::LightGun,
                DeviceEvent::Pen {
                    x,
                    y,
                    button1,
                    button2,
                },
            ) => {
                emulator.light_pen(
                    Some((x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))),
                    PEN_SIZE,
                    button1,
                    button2,
                    target.calibration.koala_pad,
                );
            }
            (CapabilityKind::LightPen | CapabilityKind::LightGun, DeviceEvent::PenLifted) => {
                emulator.light_pen(None, PEN_SIZE, false, false, target.calibration.koala_pad);
            }

            _ => return false,
        }
        true
    }

    fn unroute(&mut self, device: DeviceId, emulator: &mut dyn Emulator) {
        let Some(target) = self.routes.remove(&device) else {
            return;
        };
        let held = self.held.remove(&device).unwrap_or_default();
        let engaged = match target.capability {
            CapabilityKind::Joystick => !(held.buttons | held.axis).is_empty(),
            CapabilityKind::Paddle => !held.buttons.is_empty(),
            _ => false,
        };
        if engaged {
            emulator.joystick(target.index, 0);
        }
    }
}

fn target_for(mapping: &InputMapping, port: PortId) -> Option<RouteTarget> {
    let port = mapping.port(port)?;
    Some(RouteTarget {
        port: port.id,
        index: port.id.key.port_number()?,
        capability: port.capability,
        calibration: port.calibration,
    })
}

fn paddle_number(target: &RouteTarget) -> u8 {
    target.port.sub_port.unwrap_or(1)
}

/// Paddle fire buttons are wired to the joystick left/right lines.
fn paddle_fire(target: &RouteTarget, buttons: JoystickButtons) -> JoystickButtons {
    if !buttons.any_fire() {
        JoystickButtons::empty()
    } else if paddle_number(target) == 2 {
        JoystickButtons::RIGHT
    } else {
        JoystickButtons::LEFT
    }
}
