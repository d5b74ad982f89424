use crate::callback::{CallbackId, CallbackRegistry};
use crate::driver::Driver;
use crate::listener::{self, Listener, Shared, Status};
use crate::types::Frame;
use std::sync::Arc;

/// Consumer side of the frame handoff.
///
/// Owns the driver connection, the shared frame slot and the subscriber
/// list.
/// Call [`Device::update`] once per iteration of the host loop; new frames
/// are delivered to subscribers from inside that call, on that thread.
pub struct Device {
    driver: Box<dyn Driver>,
    shared: Shared,
    callbacks: CallbackRegistry,
    /// Last frame handed to subscribers.
    frame: Frame,
}

impl Device {
    /// Create a device and attach its listener to `driver`.
    ///
    /// Driver failures are not returned here. They are logged, and the
    /// device simply reports `is_initialized() == false` and
    /// `is_connected() == false`.
    pub fn create<D: Driver + 'static>(driver: D) -> Device {
        let shared: Shared = Arc::default();
        let listener = Arc::new(Listener::new(shared.clone()));

        let mut driver: Box<dyn Driver> = Box::new(driver);
        match driver.attach(listener) {
            Ok(()) => log::info!("Listener attached to driver"),
            Err(e) => log::warn!("Failed to attach listener to driver: {}", e),
        }

        Device {
            driver,
            shared,
            callbacks: CallbackRegistry::new(),
            frame: Frame::default(),
        }
    }

    /// Deliver the newest frame, if any, to every subscriber.
    ///
    /// A no-op when nothing arrived since the previous call.
    pub fn update(&mut self) {
        let frame = {
            let mut state = listener::lock(&self.shared);
            if !state.has_new_frame {
                return;
            }
            state.has_new_frame = false;
            std::mem::take(&mut state.frame)
        };

        log::trace!(
            "Dispatching frame {} to {} callback(s)",
            frame.id(),
            self.callbacks.len()
        );
        self.frame = frame;
        self.callbacks.dispatch(&self.frame);
    }

    /// True while the driver reports a connected sensor.
    pub fn is_connected(&self) -> bool {
        self.status().contains(Status::CONNECTED)
    }

    /// True once the driver finished initializing.
    pub fn is_initialized(&self) -> bool {
        self.status().contains(Status::INITIALIZED)
    }

    /// Connection flags as one snapshot.
    pub fn status(&self) -> Status {
        listener::lock(&self.shared).status
    }

    /// Number of frames the driver produced that were replaced before
    /// `update` picked them up.
    pub fn dropped_frames(&self) -> u64 {
        listener::lock(&self.shared).dropped_frames
    }

    /// Last frame delivered by `update`. Empty before the first delivery.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Subscribe to new frames.
    ///
    /// Subscribers run in registration order on the thread calling
    /// `update`. Registering the same closure twice makes it fire twice.
    pub fn add_callback<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(Frame) + Send + 'static,
    {
        let id = self.callbacks.add(Box::new(callback));
        log::debug!("Added frame callback {:?}", id);
        id
    }

    /// Unsubscribe. Unknown or already removed ids are ignored.
    pub fn remove_callback(&mut self, id: CallbackId) {
        if self.callbacks.remove(id) {
            log::debug!("Removed frame callback {:?}", id);
        } else {
            log::debug!("Frame callback {:?} not registered, nothing to remove", id);
        }
    }

    /// Number of active subscriptions.
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.driver.detach();
        log::info!("Device closed, listener detached from driver");
    }
}
