//! Gamepad discovery and state via gilrs

use gilrs::{Axis, Button, EventType, Gilrs};

use super::device::{DeviceDescriptor, DeviceHandle};
use super::hotplug::HotplugSender;
use super::joystick::JoystickButtons;
use super::router::DeviceEvent;

pub struct GamepadMonitor {
    /// None if initialization failed
    gilrs: Option<Gilrs>,
}

impl GamepadMonitor {
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(g) => Some(g),
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize gamepad support: {}. Gamepads will not be available.",
                    e
                );
                None
            }
        };
        Self { gilrs }
    }

    /// Announce gamepads that were connected before the monitor started.
    pub fn announce_connected(&self, hotplug: &HotplugSender) {
        let Some(gilrs) = &self.gilrs else {
            return;
        };
        for (id, gamepad) in gilrs.gamepads() {
            hotplug.connect(DeviceDescriptor::gamepad(handle(id), gamepad.name()));
        }
    }

    /// Drain pending gilrs events. Connects and disconnects go to `hotplug`;
    /// input changes are returned as device events.
    pub fn poll(&mut self, hotplug: &HotplugSender) -> Vec<(DeviceHandle, DeviceEvent)> {
        let mut events = Vec::new();
        let Some(gilrs) = &mut self.gilrs else {
            return events;
        };

        while let Some(event) = gilrs.next_event() {
            let id = event.id;
            match event.event {
                EventType::Connected => {
                    let name = gilrs.gamepad(id).name().to_string();
                    tracing::info!("Gamepad {} connected", id);
                    hotplug.connect(DeviceDescriptor::gamepad(handle(id), name));
                }
                EventType::Disconnected => {
                    tracing::info!("Gamepad {} disconnected", id);
                    hotplug.disconnect(handle(id));
                }
                EventType::ButtonPressed(..)
                | EventType::ButtonReleased(..)
                | EventType::ButtonChanged(..) => {
                    let buttons = read_buttons(&gilrs.gamepad(id));
                    events.push((handle(id), DeviceEvent::Joystick(buttons)));
                }
                EventType::AxisChanged(..) => {
                    let gamepad = gilrs.gamepad(id);
                    let x = gamepad.value(Axis::LeftStickX);
                    let y = gamepad.value(Axis::LeftStickY);
                    events.push((handle(id), DeviceEvent::Axis { x, y }));
                }
                _ => {}
            }
        }
        events
    }
}

impl Default for GamepadMonitor {
    fn default() -> Self {
        Self::new()
    }
}

fn handle(id: gilrs::GamepadId) -> DeviceHandle {
    DeviceHandle(usize::from(id) as u64)
}

fn read_buttons(gamepad: &gilrs::Gamepad) -> JoystickButtons {
    let btn = |button: Button| -> bool { gamepad.is_pressed(button) };

    let mut state = JoystickButtons::empty();
    state.set(JoystickButtons::UP, btn(Button::DPadUp));
    state.set(JoystickButtons::DOWN, btn(Button::DPadDown));
    state.set(JoystickButtons::LEFT, btn(Button::DPadLeft));
    state.set(JoystickButtons::RIGHT, btn(Button::DPadRight));
    state.set(JoystickButtons::FIRE, btn(Button::South));
    state.set(JoystickButtons::FIRE2, btn(Button::East));
    state.set(JoystickButtons::FIRE3, btn(Button::West));
    state
}
