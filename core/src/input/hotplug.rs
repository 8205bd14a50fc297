//! Hot-plug intake
//!
//! Platform threads report connects and disconnects through a cloned
//! [`HotplugSender`]; the owner of the mapping drains the queue on its own
//! thread.

use tokio::sync::mpsc;

use super::device::{DeviceDescriptor, DeviceHandle};

#[derive(Debug, Clone, PartialEq)]
pub enum HotplugEvent {
    Connected(DeviceDescriptor),
    Disconnected(DeviceHandle),
}

/// Sending half, `Send + Clone`.
#[derive(Debug, Clone)]
pub struct HotplugSender {
    tx: mpsc::UnboundedSender<HotplugEvent>,
}

impl HotplugSender {
    /// Returns `false` once the queue has been dropped.
    pub fn send(&self, event: HotplugEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn connect(&self, descriptor: DeviceDescriptor) -> bool {
        self.send(HotplugEvent::Connected(descriptor))
    }

    pub fn disconnect(&self, handle: DeviceHandle) -> bool {
        self.send(HotplugEvent::Disconnected(handle))
    }
}

/// Receiving half, owned by the session.
#[derive(Debug)]
pub struct HotplugQueue {
    tx: mpsc::UnboundedSender<HotplugEvent>,
    rx: mpsc::UnboundedReceiver<HotplugEvent>,
}

impl Default for HotplugQueue {
    fn default() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl HotplugQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(&self) -> HotplugSender {
        HotplugSender {
            tx: self.tx.clone(),
        }
    }

    /// Everything queued so far, in arrival order. Never blocks.
    pub fn drain(&mut self) -> Vec<HotplugEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_order() {
        let mut queue = HotplugQueue::new();
        let sender = queue.sender();
        assert!(sender.connect(DeviceDescriptor::mouse(DeviceHandle(1))));
        assert!(sender.disconnect(DeviceHandle(1)));

        let events = queue.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], HotplugEvent::Connected(_)));
        assert_eq!(events[1], HotplugEvent::Disconnected(DeviceHandle(1)));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn senders_work_from_other_threads() {
        let mut queue = HotplugQueue::new();
        let sender = queue.sender();
        std::thread::spawn(move || {
            sender.connect(DeviceDescriptor::gamepad(DeviceHandle(7), "Pad"));
        })
        .join()
        .unwrap();

        assert_eq!(queue.drain().len(), 1);
    }

    #[test]
    fn send_fails_after_queue_is_dropped() {
        let queue = HotplugQueue::new();
        let sender = queue.sender();
        drop(queue);
        assert!(!sender.disconnect(DeviceHandle(2)));
    }
}
