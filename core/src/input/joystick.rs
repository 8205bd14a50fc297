//! Digital joystick state

use bitflags::bitflags;

bitflags! {
    /// Joystick lines, bit-compatible with the control port register (active high).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct JoystickButtons: u8 {
        const UP = 0x01;
        const DOWN = 0x02;
        const LEFT = 0x04;
        const RIGHT = 0x08;
        const FIRE = 0x10;
        const FIRE2 = 0x20;
        const FIRE3 = 0x40;
    }
}

/// Threshold for an analog stick to register as a direction.
pub const AXIS_THRESHOLD: f32 = 0.5;

impl JoystickButtons {
    /// Directions for an analog stick position. Positive y is up.
    pub fn from_axes(x: f32, y: f32) -> Self {
        let mut state = JoystickButtons::empty();
        if x > AXIS_THRESHOLD {
            state |= JoystickButtons::RIGHT;
        } else if x < -AXIS_THRESHOLD {
            state |= JoystickButtons::LEFT;
        }
        if y > AXIS_THRESHOLD {
            state |= JoystickButtons::UP;
        } else if y < -AXIS_THRESHOLD {
            state |= JoystickButtons::DOWN;
        }
        state
    }

    pub fn directions(self) -> Self {
        self & (JoystickButtons::UP
            | JoystickButtons::DOWN
            | JoystickButtons::LEFT
            | JoystickButtons::RIGHT)
    }

    pub fn any_fire(self) -> bool {
        self.intersects(JoystickButtons::FIRE | JoystickButtons::FIRE2 | JoystickButtons::FIRE3)
    }
}
