//! Seams between the frame handoff and a sensor driver.
//!
//! A driver owns whatever thread the vendor SDK reports on and calls
//! the four `DriverEvents` notifications. The device attaches its
//! listener on creation and detaches it before it is dropped.

use crate::raw::RawFrame;
use crate::{LeapError, Result};
use std::sync::{Arc, RwLock};

/// Notifications a driver raises, usually from its own thread.
pub trait DriverEvents: Send + Sync {
    /// The driver finished initializing.
    fn on_init(&self);
    /// A sensor was connected.
    fn on_connect(&self);
    /// The sensor was unplugged or the driver lost it.
    fn on_disconnect(&self);
    /// A new sample is available.
    fn on_frame(&self, frame: &RawFrame);
}

/// A sensor driver the device can attach its listener to.
pub trait Driver: Send {
    /// Start delivering events to `events`.
    fn attach(&mut self, events: Arc<dyn DriverEvents>) -> Result<()>;

    /// Stop delivering events.
    ///
    /// Once this returns the driver must not call into the previously
    /// attached listener again.
    fn detach(&mut self);
}

/// A driver event as a value, for drivers that queue them.
#[derive(Debug, Clone)]
pub enum DriverEvent {
    Init,
    Connect,
    Disconnect,
    Frame(RawFrame),
}

impl DriverEvent {
    /// Deliver this event to a listener.
    pub fn dispatch(&self, events: &dyn DriverEvents) {
        match self {
            DriverEvent::Init => events.on_init(),
            DriverEvent::Connect => events.on_connect(),
            DriverEvent::Disconnect => events.on_disconnect(),
            DriverEvent::Frame(frame) => events.on_frame(frame),
        }
    }
}

/// Attached listener. Dispatch holds the read guard for the whole call,
/// so taking the write guard waits out any event still in flight.
type Slot = Arc<RwLock<Option<Arc<dyn DriverEvents>>>>;

/// Driver whose events are raised by the caller, on the caller's thread.
///
/// Use this to wire a vendor SDK callback into the device: hand the
/// `ManualFeed` to the vendor callback and forward each notification.
pub struct ManualDriver {
    slot: Slot,
}

/// Producer handle of a `ManualDriver`.
#[derive(Clone)]
pub struct ManualFeed {
    slot: Slot,
}

impl ManualDriver {
    pub fn new() -> (ManualDriver, ManualFeed) {
        let slot: Slot = Arc::new(RwLock::new(None));
        (
            ManualDriver { slot: slot.clone() },
            ManualFeed { slot },
        )
    }
}

impl Driver for ManualDriver {
    fn attach(&mut self, events: Arc<dyn DriverEvents>) -> Result<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| LeapError::Driver("manual driver slot poisoned".into()))?;
        if slot.is_some() {
            return Err(LeapError::AlreadyAttached);
        }
        *slot = Some(events);
        Ok(())
    }

    fn detach(&mut self) {
        let mut slot = self
            .slot
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        slot.take();
    }
}

impl ManualFeed {
    /// Forward one event. Returns false if no listener is attached.
    pub fn send(&self, event: &DriverEvent) -> bool {
        let slot = self
            .slot
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match slot.as_ref() {
            Some(events) => {
                event.dispatch(events.as_ref());
                true
            }
            None => {
                log::trace!("Manual feed has no listener attached, ignoring {:?}", event);
                false
            }
        }
    }

    pub fn init(&self) -> bool {
        self.send(&DriverEvent::Init)
    }

    pub fn connect(&self) -> bool {
        self.send(&DriverEvent::Connect)
    }

    pub fn disconnect(&self) -> bool {
        self.send(&DriverEvent::Disconnect)
    }

    pub fn frame(&self, frame: RawFrame) -> bool {
        self.send(&DriverEvent::Frame(frame))
    }

    /// True while a listener is attached.
    pub fn is_attached(&self) -> bool {
        self.slot.read().map(|s| s.is_some()).unwrap_or(false)
    }
}
