//! Deferred emulator commands
//!
//! Commands can be queued from any thread and are handed to the emulator
//! once per frame by whoever owns it. An entry with a countdown waits that
//! many drains before it is returned.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use super::boundary::{Emulator, Key, MouseEvent, ResourceValue};

struct Entry<T> {
    countdown: u32,
    item: T,
}

/// Thread-safe FIFO with per-entry countdown.
pub struct EventQueue<T> {
    entries: Mutex<VecDeque<Entry<T>>>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
        }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Entry<T>>> {
        self.entries.lock().unwrap_or_else(|e| {
            tracing::warn!("Event queue mutex poisoned; continuing");
            e.into_inner()
        })
    }

    pub fn push(&self, item: T) {
        self.push_delayed(item, 0);
    }

    /// Queue `item` to come out of the `countdown + 1`th drain from now.
    pub fn push_delayed(&self, item: T, countdown: u32) {
        self.lock().push_back(Entry { countdown, item });
    }

    /// Take every entry whose countdown reached zero, in FIFO order, and
    /// count the rest down by one.
    pub fn drain(&self) -> Vec<T> {
        let mut entries = self.lock();
        let mut ready = Vec::new();
        let mut waiting = VecDeque::with_capacity(entries.len());
        for mut entry in entries.drain(..) {
            if entry.countdown == 0 {
                ready.push(entry.item);
            } else {
                entry.countdown -= 1;
                waiting.push_back(entry);
            }
        }
        *entries = waiting;
        ready
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// A recorded [`Emulator`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum EmulatorCommand {
    Freeze(bool),
    Reset { hard: bool },
    Quit,
    Press(Key),
    Release(Key),
    Joystick { index: u8, buttons: u8 },
    AnalogPosition { index: u8, sub_port: u8, value: f32 },
    Mouse(MouseEvent),
    LightPen {
        position: Option<(f32, f32)>,
        size: (f32, f32),
        button1: bool,
        button2: bool,
        is_koala_pad: bool,
    },
    SetResource { name: String, value: ResourceValue },
}

impl EmulatorCommand {
    pub fn apply(self, emulator: &mut dyn Emulator) {
        match self {
            EmulatorCommand::Freeze(frozen) => emulator.freeze(frozen),
            EmulatorCommand::Reset { hard } => emulator.reset(hard),
            EmulatorCommand::Quit => emulator.quit(),
            EmulatorCommand::Press(key) => emulator.press(key, 0),
            EmulatorCommand::Release(key) => emulator.release(key, 0),
            EmulatorCommand::Joystick { index, buttons } => emulator.joystick(index, buttons),
            EmulatorCommand::AnalogPosition {
                index,
                sub_port,
                value,
            } => emulator.set_analog_position(index, sub_port, value),
            EmulatorCommand::Mouse(event) => emulator.mouse(event),
            EmulatorCommand::LightPen {
                position,
                size,
                button1,
                button2,
                is_koala_pad,
            } => emulator.light_pen(position, size, button1, button2, is_koala_pad),
            EmulatorCommand::SetResource { name, value } => emulator.set_resource(&name, value),
        }
    }
}

/// Apply every ready command to `emulator`. Returns how many were applied.
pub fn pump(queue: &EventQueue<EmulatorCommand>, emulator: &mut dyn Emulator) -> usize {
    let ready = queue.drain();
    let count = ready.len();
    for command in ready {
        command.apply(emulator);
    }
    count
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_utils::RecordingEmulator;

    #[test]
    fn ready_entries_come_out_in_order() {
        let queue = EventQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.drain(), [1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn delayed_entries_wait_for_their_countdown() {
        let queue = EventQueue::new();
        queue.push_delayed("late", 2);
        queue.push("now");
        queue.push_delayed("soon", 1);

        assert_eq!(queue.drain(), ["now"]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(), ["soon"]);
        assert_eq!(queue.drain(), ["late"]);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn fifo_among_entries_that_become_ready_together() {
        let queue = EventQueue::new();
        queue.push_delayed('a', 1);
        queue.push_delayed('b', 0);
        queue.drain();
        queue.push('c');
        assert_eq!(queue.drain(), ['a', 'c']);
    }

    #[test]
    fn clear_drops_everything() {
        let queue = EventQueue::new();
        queue.push_delayed(1, 5);
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn producers_on_other_threads() {
        let queue = Arc::new(EventQueue::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || queue.push(i))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let mut items = queue.drain();
        items.sort();
        assert_eq!(items, [0, 1, 2, 3]);
    }

    #[test]
    fn pump_applies_commands() {
        let queue = EventQueue::new();
        queue.push(EmulatorCommand::Joystick {
            index: 2,
            buttons: 0x10,
        });
        queue.push_delayed(EmulatorCommand::Release(Key::new(1, 7)), 1);
        queue.push(EmulatorCommand::Press(Key::new(1, 7)));

        let mut emulator = RecordingEmulator::default();
        assert_eq!(pump(&queue, &mut emulator), 2);
        assert_eq!(
            emulator.calls,
            [
                EmulatorCommand::Joystick {
                    index: 2,
                    buttons: 0x10
                },
                EmulatorCommand::Press(Key::new(1, 7)),
            ]
        );
        assert_eq!(pump(&queue, &mut emulator), 1);
        assert_eq!(
            emulator.calls.last(),
            Some(&EmulatorCommand::Release(Key::new(1, 7)))
        );
    }
}
