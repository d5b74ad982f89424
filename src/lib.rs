//! # leapsdk - frame handoff for hand tracking sensors
//!
//! Bridges a sensor driver that reports on its own thread to a host loop
//! running on another. Provides:
//! - Immutable `Frame` / `Hand` / `Finger` snapshots
//! - A single-slot, last-write-wins handoff between the two threads
//! - Ordered, revocable frame callbacks fired from `Device::update`
//! - Manual, channel-fed and synthetic drivers
//! - C FFI for integration with C/C++ hosts
//!
//! ## Quick Start
//! ```no_run
//! use leapsdk::{Device, SyntheticConfig, SyntheticDriver};
//!
//! let mut device = Device::create(SyntheticDriver::new(SyntheticConfig::default()));
//! let id = device.add_callback(|frame| {
//!     for (hand_id, hand) in frame.hands() {
//!         println!("hand {} at {:?}", hand_id, hand.position());
//!     }
//! });
//!
//! loop {
//!     device.update();
//!     if !device.is_connected() {
//!         break;
//!     }
//!     # break;
//! }
//! device.remove_callback(id);
//! ```

pub mod error;
pub mod types;
pub mod raw;
pub mod driver;
pub mod listener;
pub mod callback;
pub mod device;
pub mod channel;
pub mod synthetic;
pub mod ffi;
mod config;

pub use error::LeapError;
pub use types::*;
pub use raw::{RawFinger, RawFrame, RawHand};
pub use driver::{Driver, DriverEvent, DriverEvents, ManualDriver, ManualFeed};
pub use listener::{Listener, Status};
pub use callback::CallbackId;
pub use device::Device;
pub use channel::{ChannelDriver, EventSender};
pub use synthetic::{SyntheticConfig, SyntheticDriver};

/// Result type alias for leapsdk operations.
pub type Result<T> = std::result::Result<T, LeapError>;
