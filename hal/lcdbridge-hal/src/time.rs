//! Time source abstraction

/// Free-running microsecond counter
///
/// The counter is allowed to wrap; callers compare instants with
/// [`Clock::elapsed_us`], never with `<`.
pub trait Clock {
    /// Current time in microseconds
    fn now_us(&self) -> u32;

    /// Microseconds since `since`, correct across one wrap of the counter
    fn elapsed_us(&self, since: u32) -> u32 {
        self.now_us().wrapping_sub(since)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_us(&self) -> u32 {
        (**self).now_us()
    }
}
