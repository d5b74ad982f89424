use crate::driver::DriverEvents;
use crate::raw::{self, RawFrame};
use crate::types::Frame;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

bitflags::bitflags! {
    /// Driver connection state as last reported by the driver thread.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(C)]
    pub struct Status: u32 {
        const INITIALIZED = 1 << 0;
        const CONNECTED   = 1 << 1;
    }
}

/// State handed from the driver thread to the consumer thread.
///
/// Everything in here is guarded by a single mutex owned by the device.
#[derive(Debug, Default)]
pub(crate) struct SharedState {
    pub frame: Frame,
    pub has_new_frame: bool,
    pub status: Status,
    /// Frames overwritten before a poll consumed them.
    pub dropped_frames: u64,
}

pub(crate) type Shared = Arc<Mutex<SharedState>>;

/// Lock the shared state, recovering from poisoning.
///
/// Critical sections only swap values and flip flags.
pub(crate) fn lock(shared: &Shared) -> MutexGuard<'_, SharedState> {
    shared.lock().unwrap_or_else(|poisoned| {
        log::warn!("Shared frame state lock was poisoned, recovering");
        PoisonError::into_inner(poisoned)
    })
}

/// Producer side of the frame handoff.
///
/// Runs on the driver's thread: converts raw samples into frames and
/// publishes the newest one into the shared slot.
pub struct Listener {
    shared: Shared,
}

impl Listener {
    pub(crate) fn new(shared: Shared) -> Self {
        Self { shared }
    }

    fn set_status(&self, flag: Status, on: bool) {
        lock(&self.shared).status.set(flag, on);
    }
}

impl DriverEvents for Listener {
    fn on_init(&self) {
        log::info!("Driver initialized");
        self.set_status(Status::INITIALIZED, true);
    }

    fn on_connect(&self) {
        log::info!("Sensor connected");
        self.set_status(Status::CONNECTED, true);
    }

    fn on_disconnect(&self) {
        log::info!("Sensor disconnected");
        self.set_status(Status::CONNECTED, false);
    }

    fn on_frame(&self, raw: &RawFrame) {
        // Decode outside the lock; only the swap happens under it.
        let frame = raw::decode_frame(raw);

        let mut state = lock(&self.shared);
        if state.has_new_frame {
            state.dropped_frames += 1;
            log::trace!(
                "Frame {} replaced before it was polled (dropped total {})",
                state.frame.id(),
                state.dropped_frames
            );
        }
        state.frame = frame;
        state.has_new_frame = true;
    }
}
