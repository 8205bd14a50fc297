//! Calls the input layer makes into the emulation core

use std::fmt;

/// Keyboard matrix position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub row: u8,
    pub column: u8,
}

impl Key {
    pub const fn new(row: u8, column: u8) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseEvent {
    /// Relative motion in host pixels, already scaled.
    Moved { dx: f32, dy: f32 },
    SetX(f32),
    SetY(f32),
    Pressed(u8),
    Released(u8),
}

/// Value of an emulator resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceValue {
    Int(i32),
    String(String),
}

impl From<i32> for ResourceValue {
    fn from(value: i32) -> Self {
        ResourceValue::Int(value)
    }
}

impl From<&str> for ResourceValue {
    fn from(value: &str) -> Self {
        ResourceValue::String(value.to_string())
    }
}

impl fmt::Display for ResourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceValue::Int(value) => write!(f, "{}", value),
            ResourceValue::String(value) => f.write_str(value),
        }
    }
}

/// The emulation core as seen from the input layer.
///
/// Joystick indices are emulator port numbers: 1 and 2 for the control
/// ports, 3 and 4 for user port adapters. Delays are in frames.
pub trait Emulator {
    fn freeze(&mut self, frozen: bool);

    fn reset(&mut self, hard: bool);

    fn quit(&mut self);

    fn press(&mut self, key: Key, delay: u32);

    fn release(&mut self, key: Key, delay: u32);

    /// Replace the joystick line state of port `index`.
    fn joystick(&mut self, index: u8, buttons: u8);

    /// Analog value in `0.0..=1.0` for a paddle on port `index`.
    fn set_analog_position(&mut self, index: u8, sub_port: u8, value: f32);

    fn mouse(&mut self, event: MouseEvent);

    /// `position` is normalized to the screen, `None` when the pen is lifted.
    fn light_pen(
        &mut self,
        position: Option<(f32, f32)>,
        size: (f32, f32),
        button1: bool,
        button2: bool,
        is_koala_pad: bool,
    );

    fn set_resource(&mut self, name: &str, value: ResourceValue);
}
