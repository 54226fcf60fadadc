use std::time::Duration;

/// Monotonic host time in milliseconds.
///
/// The core never reads a wall clock; hosts pass `Time` in so that timing
/// behavior can be replayed exactly in tests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub u64);

impl Time {
    pub const ZERO: Time = Time(0);

    pub const fn from_millis(ms: u64) -> Self {
        Time(ms)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, d: Duration) -> Self {
        let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        Time(self.0.saturating_add(ms))
    }

    /// Elapsed time since `earlier`; zero if `earlier` is in the future.
    pub fn since(self, earlier: Time) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

#[cfg(test)]
mod tests {
    use super::Time;
    use std::time::Duration;

    #[test]
    fn saturating_add_clamps() {
        let t = Time(u64::MAX - 1);
        assert_eq!(t.saturating_add(Duration::from_millis(10)), Time(u64::MAX));
    }

    #[test]
    fn since_is_never_negative() {
        assert_eq!(Time(5).since(Time(10)), Duration::ZERO);
        assert_eq!(Time(150).since(Time(100)), Duration::from_millis(50));
    }
}
