//! Stream synthetic hand frames through a Device to stdout.
//!
//! Usage: cargo run --example stream
//! Tune with LEAPSDK_SYNTH_RATE_HZ / LEAPSDK_SYNTH_HANDS / LEAPSDK_SYNTH_FINGERS.
//! Runs for 10 seconds.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn main() {
    env_logger::init();

    let driver = leapsdk::SyntheticDriver::from_env();
    println!("Config: {:?}", driver.config());
    let mut device = leapsdk::Device::create(driver);

    let count = Arc::new(AtomicU64::new(0));
    let counter = count.clone();
    device.add_callback(move |frame| {
        let n = counter.fetch_add(1, Ordering::Relaxed) + 1;

        // Print every ~60th frame to avoid flooding the terminal
        if n % 60 == 1 {
            for (id, hand) in frame.hands() {
                let p = hand.position();
                println!(
                    "frame={:<8} ts={:<12} hand={} palm=[{:+8.2}, {:+8.2}, {:+8.2}] fingers={}",
                    frame.id(),
                    frame.timestamp(),
                    id,
                    p.x,
                    p.y,
                    p.z,
                    hand.fingers().len(),
                );
            }
        }
    });

    println!("Streaming frames for 10s...");

    let start = Instant::now();
    let mut last_report = Instant::now();

    // Host loop at ~60 Hz, slower than the sensor, so some frames drop.
    while start.elapsed() < Duration::from_secs(10) {
        device.update();

        let now = Instant::now();
        if now.duration_since(last_report) >= Duration::from_secs(3) {
            let elapsed = start.elapsed().as_secs_f64();
            let delivered = count.load(Ordering::Relaxed);
            println!(
                "--- {} delivered, {} dropped in {:.1}s ({:.1} Hz) connected={} ---",
                delivered,
                device.dropped_frames(),
                elapsed,
                delivered as f64 / elapsed,
                device.is_connected(),
            );
            last_report = now;
        }

        std::thread::sleep(Duration::from_millis(16));
    }

    let elapsed = start.elapsed().as_secs_f64();
    let delivered = count.load(Ordering::Relaxed);
    println!(
        "\nTotal: {} frames delivered, {} dropped in {:.1}s ({:.1} Hz)",
        delivered,
        device.dropped_frames(),
        elapsed,
        delivered as f64 / elapsed
    );
}
