//! Fixed-rate tick source.

use flickercast_core::FRAME_RATE_HZ;
use std::time::Duration;
use tokio::time::{self, Interval, MissedTickBehavior};

/// Time between frames at the nominal rate.
pub fn frame_period() -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(FRAME_RATE_HZ))
}

/// Interval firing once per frame.
///
/// Late ticks are skipped rather than replayed in a burst: a stalled loop
/// loses samples but never renders frames faster than the nominal rate.
/// Must be called inside a tokio runtime.
pub fn frame_interval() -> Interval {
    let mut interval = time::interval(frame_period());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_period() {
        assert_eq!(frame_period(), Duration::from_nanos(16_666_666));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_cadence() {
        let mut interval = frame_interval();
        let start = time::Instant::now();
        for _ in 0..61 {
            interval.tick().await;
        }
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(999));
        assert!(elapsed <= Duration::from_millis(1001));
    }
}
