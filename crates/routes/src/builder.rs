use catalog::Camera;

use crate::query::serialize_multi_route;
use crate::resolve::resolve_enabled;
use crate::segment::{Segment, SegmentError};

/// One editable row of the custom route form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentDraft {
    pub route: String,
    pub mp_min: String,
    pub mp_max: String,
}

impl SegmentDraft {
    pub fn new(route: impl Into<String>, mp_min: impl Into<String>, mp_max: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            mp_min: mp_min.into(),
            mp_max: mp_max.into(),
        }
    }

    pub fn validate(&self) -> Result<Segment, SegmentError> {
        Segment::parse(&self.route, &self.mp_min, &self.mp_max)
    }
}

impl From<&Segment> for SegmentDraft {
    fn from(seg: &Segment) -> Self {
        Self::new(seg.route.clone(), seg.mp_min.to_string(), seg.mp_max.to_string())
    }
}

/// Result of applying the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedRoute {
    pub segments: Vec<Segment>,
    /// Value for the `multiRoute` query parameter.
    pub multi_route: String,
    /// One filter badge label per segment.
    pub badges: Vec<String>,
}

/// Form state of the custom route builder.
///
/// The form always shows at least one row; an emptied form gets a fresh
/// blank row. Nothing here touches the URL: the caller persists
/// [`AppliedRoute::multi_route`] on Apply/Copy only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBuilder {
    rows: Vec<SegmentDraft>,
}

impl Default for RouteBuilder {
    fn default() -> Self {
        Self {
            rows: vec![SegmentDraft::default()],
        }
    }
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the form, e.g. from a `multiRoute` parameter.
    pub fn from_segments(segments: &[Segment]) -> Self {
        let mut builder = Self {
            rows: segments.iter().map(SegmentDraft::from).collect(),
        };
        builder.ensure_row();
        builder
    }

    pub fn rows(&self) -> &[SegmentDraft] {
        &self.rows
    }

    pub fn add_row(&mut self) -> usize {
        self.rows.push(SegmentDraft::default());
        self.rows.len() - 1
    }

    /// Replaces row `index`. Returns `false` for an out-of-range index.
    pub fn update_row(&mut self, index: usize, draft: SegmentDraft) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                *row = draft;
                true
            }
            None => false,
        }
    }

    pub fn remove_row(&mut self, index: usize) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        self.ensure_row();
        true
    }

    pub fn reset(&mut self) {
        self.rows.clear();
        self.ensure_row();
    }

    /// Per-row validation, in row order.
    pub fn validation(&self) -> Vec<Result<Segment, SegmentError>> {
        self.rows.iter().map(SegmentDraft::validate).collect()
    }

    /// The rows that currently validate, in order. Drives the live preview.
    pub fn valid_segments(&self) -> Vec<Segment> {
        self.validation().into_iter().filter_map(Result::ok).collect()
    }

    /// Apply is allowed only when every row is valid.
    pub fn can_apply(&self) -> bool {
        self.validation().iter().all(Result::is_ok)
    }

    /// Cameras the current form would show (enabled cameras only).
    pub fn preview<'a>(&self, cameras: &'a [Camera]) -> Vec<&'a Camera> {
        resolve_enabled(&self.valid_segments(), cameras)
    }

    /// `None` while any row is invalid.
    pub fn apply(&self) -> Option<AppliedRoute> {
        if !self.can_apply() {
            return None;
        }
        let segments = self.valid_segments();
        Some(AppliedRoute {
            multi_route: serialize_multi_route(&segments),
            badges: segments.iter().map(Segment::label).collect(),
            segments,
        })
    }

    fn ensure_row(&mut self) {
        if self.rows.is_empty() {
            self.rows.push(SegmentDraft::default());
        }
    }
}
