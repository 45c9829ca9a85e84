/// Closed milepost interval.
///
/// Route segments may be written in either orientation (`10-20` or `20-10`);
/// the span always stores the ordered bounds so membership checks do not
/// depend on travel direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MilepostSpan {
    pub min: f64,
    pub max: f64,
}

impl MilepostSpan {
    pub fn from_unordered(a: f64, b: f64) -> Self {
        if a <= b {
            MilepostSpan { min: a, max: b }
        } else {
            MilepostSpan { min: b, max: a }
        }
    }

    /// The whole route.
    pub fn unbounded() -> Self {
        MilepostSpan {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    pub fn contains(&self, mp: f64) -> bool {
        mp >= self.min && mp <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::MilepostSpan;

    #[test]
    fn bounds_are_order_independent() {
        let a = MilepostSpan::from_unordered(5.0, 1.0);
        let b = MilepostSpan::from_unordered(1.0, 5.0);
        assert_eq!(a, b);
        assert!(a.contains(1.0));
        assert!(a.contains(5.0));
        assert!(!a.contains(5.01));
    }

    #[test]
    fn nan_is_never_inside() {
        assert!(!MilepostSpan::unbounded().contains(f64::NAN));
    }
}
