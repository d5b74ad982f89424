use crate::types::Frame;
use std::collections::BTreeMap;

/// Identifier returned by `Device::add_callback`.
///
/// Ids increase monotonically and are never handed out twice, so a stale
/// id kept by a caller can never remove someone else's subscription.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallbackId(pub u64);

pub(crate) type FrameCallback = Box<dyn FnMut(Frame) + Send>;

/// Ordered set of frame subscribers, owned by the device.
///
/// Only ever touched from the consumer thread, so it carries no lock.
pub(crate) struct CallbackRegistry {
    next_id: u64,
    callbacks: BTreeMap<CallbackId, FrameCallback>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            // 0 is reserved as the FFI error value.
            next_id: 1,
            callbacks: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, callback: FrameCallback) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.callbacks.insert(id, callback);
        id
    }

    /// Returns whether a subscription was actually removed.
    pub fn remove(&mut self, id: CallbackId) -> bool {
        self.callbacks.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Invoke every subscriber in registration order.
    pub fn dispatch(&mut self, frame: &Frame) {
        for callback in self.callbacks.values_mut() {
            callback(frame.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> FrameCallback {
        let log = log.clone();
        Box::new(move |_| log.lock().unwrap().push(name))
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut registry = CallbackRegistry::new();
        let a = registry.add(Box::new(|_| {}));
        let b = registry.add(Box::new(|_| {}));
        assert!(registry.remove(b));
        let c = registry.add(Box::new(|_| {}));

        assert_eq!(a, CallbackId(1));
        assert!(b > a);
        assert!(c > b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut registry = CallbackRegistry::new();
        let a = registry.add(Box::new(|_| {}));
        assert!(!registry.remove(CallbackId(42)));
        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_dispatch_in_registration_order_with_duplicates() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = CallbackRegistry::new();
        registry.add(recording(&log, "a"));
        registry.add(recording(&log, "b"));
        registry.add(recording(&log, "a"));

        registry.dispatch(&Frame::default());
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "a"]);
    }
}
