//! Shared test utilities for integration and unit tests

use std::sync::{Arc, Mutex};

use crate::emulator::{Emulator, EmulatorCommand, Key, MouseEvent, ResourceValue};

// ============================================================================
// Recording Emulator
// ============================================================================

/// Emulator that records every call as an [`EmulatorCommand`].
#[derive(Debug, Default)]
pub struct RecordingEmulator {
    pub calls: Vec<EmulatorCommand>,
}

impl RecordingEmulator {
    /// Last value set for resource `name`.
    pub fn resource(&self, name: &str) -> Option<&ResourceValue> {
        self.calls.iter().rev().find_map(|call| match call {
            EmulatorCommand::SetResource { name: n, value } if n == name => Some(value),
            _ => None,
        })
    }

    pub fn joystick_calls(&self) -> Vec<(u8, u8)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                EmulatorCommand::Joystick { index, buttons } => Some((*index, *buttons)),
                _ => None,
            })
            .collect()
    }
}

impl Emulator for RecordingEmulator {
    fn freeze(&mut self, frozen: bool) {
        self.calls.push(EmulatorCommand::Freeze(frozen));
    }

    fn reset(&mut self, hard: bool) {
        self.calls.push(EmulatorCommand::Reset { hard });
    }

    fn quit(&mut self) {
        self.calls.push(EmulatorCommand::Quit);
    }

    fn press(&mut self, key: Key, _delay: u32) {
        self.calls.push(EmulatorCommand::Press(key));
    }

    fn release(&mut self, key: Key, _delay: u32) {
        self.calls.push(EmulatorCommand::Release(key));
    }

    fn joystick(&mut self, index: u8, buttons: u8) {
        self.calls.push(EmulatorCommand::Joystick { index, buttons });
    }

    fn set_analog_position(&mut self, index: u8, sub_port: u8, value: f32) {
        self.calls.push(EmulatorCommand::AnalogPosition {
            index,
            sub_port,
            value,
        });
    }

    fn mouse(&mut self, event: MouseEvent) {
        self.calls.push(EmulatorCommand::Mouse(event));
    }

    fn light_pen(
        &mut self,
        position: Option<(f32, f32)>,
        size: (f32, f32),
        button1: bool,
        button2: bool,
        is_koala_pad: bool,
    ) {
        self.calls.push(EmulatorCommand::LightPen {
            position,
            size,
            button1,
            button2,
            is_koala_pad,
        });
    }

    fn set_resource(&mut self, name: &str, value: ResourceValue) {
        self.calls.push(EmulatorCommand::SetResource {
            name: name.to_string(),
            value,
        });
    }
}

/// Recording emulator whose log stays readable after it was boxed away.
#[derive(Debug, Default, Clone)]
pub struct SharedEmulator {
    pub inner: Arc<Mutex<RecordingEmulator>>,
}

impl SharedEmulator {
    pub fn calls(&self) -> Vec<EmulatorCommand> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn resource(&self, name: &str) -> Option<ResourceValue> {
        self.inner.lock().unwrap().resource(name).cloned()
    }

    pub fn joystick_calls(&self) -> Vec<(u8, u8)> {
        self.inner.lock().unwrap().joystick_calls()
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().calls.clear();
    }
}

impl Emulator for SharedEmulator {
    fn freeze(&mut self, frozen: bool) {
        self.inner.lock().unwrap().freeze(frozen);
    }

    fn reset(&mut self, hard: bool) {
        self.inner.lock().unwrap().reset(hard);
    }

    fn quit(&mut self) {
        self.inner.lock().unwrap().quit();
    }

    fn press(&mut self, key: Key, delay: u32) {
        self.inner.lock().unwrap().press(key, delay);
    }

    fn release(&mut self, key: Key, delay: u32) {
        self.inner.lock().unwrap().release(key, delay);
    }

    fn joystick(&mut self, index: u8, buttons: u8) {
        self.inner.lock().unwrap().joystick(index, buttons);
    }

    fn set_analog_position(&mut self, index: u8, sub_port: u8, value: f32) {
        self.inner
            .lock()
            .unwrap()
            .set_analog_position(index, sub_port, value);
    }

    fn mouse(&mut self, event: MouseEvent) {
        self.inner.lock().unwrap().mouse(event);
    }

    fn light_pen(
        &mut self,
        position: Option<(f32, f32)>,
        size: (f32, f32),
        button1: bool,
        button2: bool,
        is_koala_pad: bool,
    ) {
        self.inner
            .lock()
            .unwrap()
            .light_pen(position, size, button1, button2, is_koala_pad);
    }

    fn set_resource(&mut self, name: &str, value: ResourceValue) {
        self.inner.lock().unwrap().set_resource(name, value);
    }
}
