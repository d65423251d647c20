//! Clock backed by the embassy time driver

use embassy_time::Instant;
use lcdbridge_hal::Clock;

/// Microsecond clock from the embassy time driver
///
/// Truncated to 32 bits, so it wraps about every 71 minutes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> u32 {
        Instant::now().as_micros() as u32
    }
}
