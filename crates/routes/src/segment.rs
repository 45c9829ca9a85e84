use catalog::Camera;
use foundation::MilepostSpan;

use crate::normalize::normalize_route;

/// One route-name + milepost-range row of a custom route.
///
/// The orientation of the bounds is meaningful: `mp_min <= mp_max` means the
/// segment is driven in ascending milepost order, otherwise descending.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Normalized route name (see [`normalize_route`]).
    pub route: String,
    pub mp_min: f64,
    pub mp_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentError {
    EmptyRoute,
    InvalidMilepost(String),
}

impl std::fmt::Display for SegmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentError::EmptyRoute => write!(f, "route name has no route number"),
            SegmentError::InvalidMilepost(raw) => write!(f, "milepost {raw:?} is not a number"),
        }
    }
}

impl std::error::Error for SegmentError {}

impl Segment {
    /// Normalizes `route` and validates the bounds. Infinite bounds are
    /// allowed (open-ended segments), NaN is not.
    pub fn new(route: &str, mp_min: f64, mp_max: f64) -> Result<Self, SegmentError> {
        let route = normalize_route(route);
        if route.is_empty() {
            return Err(SegmentError::EmptyRoute);
        }
        for mp in [mp_min, mp_max] {
            if mp.is_nan() {
                return Err(SegmentError::InvalidMilepost(mp.to_string()));
            }
        }
        Ok(Self {
            route,
            mp_min,
            mp_max,
        })
    }

    /// Like [`Segment::new`] with textual bounds, as typed into the builder
    /// form or carried in the query string.
    pub fn parse(route: &str, mp_min: &str, mp_max: &str) -> Result<Self, SegmentError> {
        Self::new(route, parse_milepost(mp_min)?, parse_milepost(mp_max)?)
    }

    pub fn is_ascending(&self) -> bool {
        self.mp_min <= self.mp_max
    }

    pub fn span(&self) -> MilepostSpan {
        MilepostSpan::from_unordered(self.mp_min, self.mp_max)
    }

    /// The milepost at which `camera` lies on this segment, if it does.
    ///
    /// Roadway option 1 is checked first, so a camera listed under this
    /// route twice is placed by its first milepost.
    pub fn matching_milepost(&self, camera: &Camera) -> Option<f64> {
        let span = self.span();
        camera.roadways().find_map(|(route, mp)| {
            let mp = mp?;
            (normalize_route(route) == self.route && span.contains(mp)).then_some(mp)
        })
    }

    /// Short human label, e.g. `84P: 10-20`.
    pub fn label(&self) -> String {
        format!("{}: {}-{}", self.route, self.mp_min, self.mp_max)
    }
}

pub fn parse_milepost(raw: &str) -> Result<f64, SegmentError> {
    match raw.trim().parse::<f64>() {
        Ok(mp) if !mp.is_nan() => Ok(mp),
        _ => Err(SegmentError::InvalidMilepost(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{Segment, SegmentError};
    use crate::test_support::{on_route, with_second};

    #[test]
    fn new_normalizes_and_validates() {
        let seg = Segment::new("I-84", 10.0, 20.0).unwrap();
        assert_eq!(seg.route, "84P");
        assert!(seg.is_ascending());
        assert_eq!(Segment::new("", 1.0, 2.0).unwrap_err(), SegmentError::EmptyRoute);
        assert!(matches!(
            Segment::new("84", f64::NAN, 2.0),
            Err(SegmentError::InvalidMilepost(_))
        ));
        assert!(Segment::new("84", 0.0, f64::INFINITY).is_ok());
    }

    #[test]
    fn label_is_plain_ascii() {
        assert_eq!(Segment::new("I-84", 10.0, 20.0).unwrap().label(), "84P: 10-20");
        assert_eq!(Segment::new("15", 5.5, 1.0).unwrap().label(), "15P: 5.5-1");
        assert!(Segment::new("15", 0.0, 1.0).unwrap().label().is_ascii());
    }

    #[test]
    fn parse_rejects_non_numeric_bounds() {
        assert!(Segment::parse("15", " 5 ", "1").is_ok());
        assert_eq!(
            Segment::parse("15", "five", "1").unwrap_err(),
            SegmentError::InvalidMilepost("five".to_string())
        );
        assert!(Segment::parse("15", "", "1").is_err());
    }

    #[test]
    fn membership_is_orientation_independent() {
        let up = Segment::new("15", 0.0, 100.0).unwrap();
        let down = Segment::new("15", 100.0, 0.0).unwrap();
        let cam = on_route(1, "0015P", 42.0);
        assert_eq!(up.matching_milepost(&cam), Some(42.0));
        assert_eq!(down.matching_milepost(&cam), Some(42.0));
        assert!(!down.is_ascending());
    }

    #[test]
    fn second_roadway_option_matches() {
        let seg = Segment::new("270", 0.0, 1.0).unwrap();
        let cam = with_second(on_route(1, "0015P", 301.0), "0270P", 0.4);
        assert_eq!(seg.matching_milepost(&cam), Some(0.4));
    }

    #[test]
    fn first_roadway_option_wins_when_both_match() {
        let seg = Segment::new("15", 0.0, 500.0).unwrap();
        let cam = with_second(on_route(1, "0015P", 301.0), "0015N", 12.0);
        assert_eq!(seg.matching_milepost(&cam), Some(301.0));
    }

    #[test]
    fn missing_milepost_never_matches() {
        let seg = Segment::new("15", f64::NEG_INFINITY, f64::INFINITY).unwrap();
        let mut cam = on_route(1, "0015P", 0.0);
        cam.milepost_option1 = None;
        assert_eq!(seg.matching_milepost(&cam), None);
    }
}
