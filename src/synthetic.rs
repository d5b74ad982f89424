use crate::config;
use crate::driver::{Driver, DriverEvents};
use crate::raw::{RawFinger, RawFrame, RawHand};
use crate::types::Vec3;
use crate::{LeapError, Result};
use std::f32::consts::{PI, TAU};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Settings for the synthetic sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    /// Frames per second.
    pub rate_hz: u32,
    pub hands: u8,
    pub fingers_per_hand: u8,
    /// Report the last finger of each hand as a held tool.
    pub tool: bool,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            rate_hz: 120,
            hands: 1,
            fingers_per_hand: 5,
            tool: false,
        }
    }
}

impl SyntheticConfig {
    /// Defaults overridden by `LEAPSDK_SYNTH_RATE_HZ`, `LEAPSDK_SYNTH_HANDS`,
    /// `LEAPSDK_SYNTH_FINGERS` and `LEAPSDK_SYNTH_TOOL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rate_hz: config::read_env_u32("LEAPSDK_SYNTH_RATE_HZ", defaults.rate_hz).max(1),
            hands: config::read_env_u8("LEAPSDK_SYNTH_HANDS", defaults.hands),
            fingers_per_hand: config::read_env_u8("LEAPSDK_SYNTH_FINGERS", defaults.fingers_per_hand),
            tool: config::read_env_bool("LEAPSDK_SYNTH_TOOL", defaults.tool),
        }
    }

    fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate_hz.max(1) as f64)
    }
}

/// Driver that fakes a sensor on its own thread.
///
/// Reports init and connect, then emits hands orbiting above the sensor
/// at the configured rate until detached, and reports disconnect on the
/// way out. Handy for demos and for exercising a host loop without
/// hardware.
pub struct SyntheticDriver {
    config: SyntheticConfig,
    stop_flag: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SyntheticDriver {
    pub fn new(config: SyntheticConfig) -> Self {
        Self {
            config,
            stop_flag: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    pub fn from_env() -> Self {
        Self::new(SyntheticConfig::from_env())
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    /// Check if the generator thread is running.
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

impl Driver for SyntheticDriver {
    fn attach(&mut self, events: Arc<dyn DriverEvents>) -> Result<()> {
        if self.thread.is_some() {
            return Err(LeapError::AlreadyAttached);
        }
        self.stop_flag.store(false, Ordering::Relaxed);

        let config = self.config.clone();
        let stop_clone = self.stop_flag.clone();
        let thread = std::thread::Builder::new()
            .name("leapsdk-synthetic".into())
            .spawn(move || {
                generator_loop(config, events, stop_clone);
            })
            .map_err(LeapError::Spawn)?;

        self.thread = Some(thread);
        Ok(())
    }

    fn detach(&mut self) {
        self.shutdown();
    }
}

impl Drop for SyntheticDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn generator_loop(config: SyntheticConfig, events: Arc<dyn DriverEvents>, stop_flag: Arc<AtomicBool>) {
    let period = config.period();
    log::info!(
        "Synthetic sensor started ({} Hz, {} hand(s), {} finger(s) each)",
        config.rate_hz,
        config.hands,
        config.fingers_per_hand
    );

    events.on_init();
    events.on_connect();

    let epoch = Instant::now();
    let mut next_tick = epoch;
    let mut seq: i64 = 0;

    while !stop_flag.load(Ordering::Relaxed) {
        seq += 1;
        events.on_frame(&synthetic_frame(&config, seq, epoch.elapsed()));

        next_tick += period;
        let now = Instant::now();
        if next_tick > now {
            std::thread::sleep(next_tick - now);
        } else {
            // Fell behind; resync instead of bursting.
            next_tick = now;
        }
    }

    events.on_disconnect();
    log::info!("Synthetic sensor stopped after {} frame(s)", seq);
}

/// Orbit speed of the synthetic hands, in revolutions per second.
const ORBIT_HZ: f32 = 0.25;
const ORBIT_RADIUS_MM: f32 = 150.0;
const PALM_HEIGHT_MM: f32 = 200.0;
const FINGER_SPREAD_RAD: f32 = 0.3;

/// Build frame `seq` captured `elapsed` after the sensor started.
///
/// Hand `i` is at `i * PI` around the orbit. Finger ids are
/// `hand_id * 10 + index`.
pub fn synthetic_frame(config: &SyntheticConfig, seq: i64, elapsed: Duration) -> RawFrame {
    let t = elapsed.as_secs_f32();
    let omega = TAU * ORBIT_HZ;

    let hands = (0..config.hands)
        .map(|hand_index| {
            let angle = omega * t + hand_index as f32 * PI;
            let (sin, cos) = angle.sin_cos();

            let position = Vec3::new(
                ORBIT_RADIUS_MM * cos,
                PALM_HEIGHT_MM + 30.0 * (2.0 * angle).sin(),
                ORBIT_RADIUS_MM * sin,
            );
            let velocity = Vec3::new(
                -ORBIT_RADIUS_MM * omega * sin,
                60.0 * omega * (2.0 * angle).cos(),
                ORBIT_RADIUS_MM * omega * cos,
            );

            let hand_id = hand_index as i32;
            let count = config.fingers_per_hand;
            let fingers = (0..count)
                .map(|finger_index| {
                    let offset =
                        (finger_index as f32 - (count as f32 - 1.0) / 2.0) * FINGER_SPREAD_RAD;
                    let direction = Vec3::new(offset.sin(), 0.0, -offset.cos());
                    let length = 45.0 + 5.0 * finger_index as f32;
                    let reach = 60.0 + length * 0.5;
                    RawFinger {
                        id: hand_id * 10 + finger_index as i32,
                        position: Vec3::new(
                            position.x + direction.x * reach,
                            position.y,
                            position.z + direction.z * reach,
                        ),
                        direction,
                        velocity,
                        length,
                        width: 16.0,
                        is_tool: config.tool && finger_index + 1 == count,
                    }
                })
                .collect();

            RawHand {
                id: hand_id,
                position,
                direction: Vec3::new(0.0, 0.0, -1.0),
                velocity,
                normal: Vec3::new(0.0, -1.0, 0.0),
                ball_position: Vec3::new(position.x, position.y - 40.0, position.z - 30.0),
                ball_radius: 50.0,
                fingers,
            }
        })
        .collect();

    RawFrame {
        id: seq,
        timestamp: elapsed.as_micros() as i64,
        hands,
    }
}
