/// Millisecond timestamps.
///
/// Everything time-driven (settle timeouts, latency histograms) is expressed
/// against caller-supplied timestamps rather than a wall clock, so state
/// machines stay deterministic and can be replayed in tests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// Converts a browser `performance.now()` style reading.
    ///
    /// Negative and non-finite inputs clamp to zero.
    pub fn from_f64(ms: f64) -> Self {
        if ms.is_finite() && ms > 0.0 {
            Millis(ms as u64)
        } else {
            Millis::ZERO
        }
    }

    pub fn after(self, delay_ms: u64) -> Self {
        Millis(self.0.saturating_add(delay_ms))
    }

    /// Elapsed time since `earlier`, zero if `earlier` is in the future.
    pub fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Millis;

    #[test]
    fn from_f64_clamps_garbage() {
        assert_eq!(Millis::from_f64(-3.0), Millis::ZERO);
        assert_eq!(Millis::from_f64(f64::NAN), Millis::ZERO);
        assert_eq!(Millis::from_f64(12.9), Millis(12));
    }

    #[test]
    fn since_saturates() {
        assert_eq!(Millis(10).since(Millis(4)), 6);
        assert_eq!(Millis(4).since(Millis(10)), 0);
        assert_eq!(Millis(u64::MAX).after(5), Millis(u64::MAX));
    }
}
