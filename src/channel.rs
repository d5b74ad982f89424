use crate::driver::{Driver, DriverEvent, DriverEvents};
use crate::{LeapError, Result};
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default queue depth for `ChannelDriver::new`.
pub const DEFAULT_CAPACITY: usize = 256;

/// Driver fed through a bounded channel.
///
/// Producers push `DriverEvent`s from any thread without ever touching
/// the listener; a dedicated forwarding thread drains the channel and
/// raises the events. Useful when the producer must never block on the
/// frame lock (async runtimes, realtime callbacks).
pub struct ChannelDriver {
    receiver: Receiver<DriverEvent>,
    stop_flag: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

/// Producer handle of a `ChannelDriver`.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<DriverEvent>,
}

impl ChannelDriver {
    pub fn new(capacity: usize) -> (ChannelDriver, EventSender) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity.max(1));
        (
            ChannelDriver {
                receiver,
                stop_flag: Arc::new(AtomicBool::new(false)),
                thread: None,
            },
            EventSender { sender },
        )
    }

    /// True while the forwarding thread is running.
    pub fn is_active(&self) -> bool {
        self.thread.is_some() && !self.stop_flag.load(Ordering::Relaxed)
    }

    fn shutdown(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Driver for ChannelDriver {
    fn attach(&mut self, events: Arc<dyn DriverEvents>) -> Result<()> {
        if self.thread.is_some() {
            return Err(LeapError::AlreadyAttached);
        }
        self.stop_flag.store(false, Ordering::Relaxed);

        let receiver = self.receiver.clone();
        let stop_clone = self.stop_flag.clone();
        let thread = std::thread::Builder::new()
            .name("leapsdk-events".into())
            .spawn(move || {
                forward_loop(receiver, events, stop_clone);
            })
            .map_err(LeapError::Spawn)?;

        self.thread = Some(thread);
        Ok(())
    }

    fn detach(&mut self) {
        self.shutdown();
    }
}

impl Drop for ChannelDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl EventSender {
    /// Queue an event without blocking.
    pub fn send(&self, event: DriverEvent) -> Result<()> {
        self.sender.try_send(event).map_err(|e| match e {
            crossbeam_channel::TrySendError::Full(_) => LeapError::ChannelFull,
            crossbeam_channel::TrySendError::Disconnected(_) => LeapError::ChannelDisconnected,
        })
    }

    /// Number of events waiting to be forwarded.
    pub fn pending(&self) -> usize {
        self.sender.len()
    }
}

/// Drains the channel on the forwarding thread.
///
/// Wakes up every 100ms to check the stop flag.
fn forward_loop(
    receiver: Receiver<DriverEvent>,
    events: Arc<dyn DriverEvents>,
    stop_flag: Arc<AtomicBool>,
) {
    log::info!("Event forwarder started");

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            log::info!("Event forwarder stopping (stop flag set)");
            break;
        }

        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => event.dispatch(events.as_ref()),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                log::info!("All event senders dropped, stopping forwarder");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Device;
    use crate::driver::tests::Recorder;
    use crate::raw::RawFrame;
    use std::time::Instant;

    fn wait_for(mut cond: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cond() {
            assert!(Instant::now() < deadline, "condition not met in time");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_events_are_forwarded_in_order() {
        let (mut driver, sender) = ChannelDriver::new(DEFAULT_CAPACITY);
        let recorder = Arc::new(Recorder::default());

        sender.send(DriverEvent::Init).unwrap();
        sender.send(DriverEvent::Connect).unwrap();
        sender
            .send(DriverEvent::Frame(RawFrame {
                id: 3,
                ..Default::default()
            }))
            .unwrap();

        driver.attach(recorder.clone()).unwrap();
        assert!(driver.is_active());
        wait_for(|| recorder.log.lock().unwrap().len() == 3);

        driver.detach();
        assert!(!driver.is_active());
        assert_eq!(
            *recorder.log.lock().unwrap(),
            vec!["init", "connect", "frame 3"]
        );
    }

    #[test]
    fn test_full_channel_reports_error() {
        let (_driver, sender) = ChannelDriver::new(1);
        sender.send(DriverEvent::Connect).unwrap();
        assert!(matches!(
            sender.send(DriverEvent::Disconnect),
            Err(LeapError::ChannelFull)
        ));
        assert_eq!(sender.pending(), 1);
    }

    #[test]
    fn test_send_after_driver_dropped_is_disconnected() {
        let (driver, sender) = ChannelDriver::new(4);
        drop(driver);
        assert!(matches!(
            sender.send(DriverEvent::Init),
            Err(LeapError::ChannelDisconnected)
        ));
    }

    #[test]
    fn test_second_attach_is_rejected() {
        let (mut driver, _sender) = ChannelDriver::new(4);
        driver.attach(Arc::new(Recorder::default())).unwrap();
        assert!(matches!(
            driver.attach(Arc::new(Recorder::default())),
            Err(LeapError::AlreadyAttached)
        ));
    }

    #[test]
    fn test_device_over_channel_driver() {
        let (driver, sender) = ChannelDriver::new(DEFAULT_CAPACITY);
        let mut device = Device::create(driver);
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        device.add_callback(move |frame| sink.lock().unwrap().push(frame.id()));

        sender.send(DriverEvent::Connect).unwrap();
        sender
            .send(DriverEvent::Frame(RawFrame {
                id: 7,
                ..Default::default()
            }))
            .unwrap();

        wait_for(|| {
            device.update();
            !seen.lock().unwrap().is_empty()
        });
        assert!(device.is_connected());
        assert_eq!(*seen.lock().unwrap(), vec![7]);
    }
}
