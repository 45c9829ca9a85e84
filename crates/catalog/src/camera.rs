use foundation::{CameraId, LatLon};
use serde::{Serialize, Serializer};

/// Travel direction along a camera chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward the "pos" neighbor (next camera).
    Forward,
    /// Toward the "neg" neighbor (previous camera).
    Backward,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// `+1` for forward, `-1` for backward.
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub enum CameraStatus {
    #[default]
    Enabled,
    Disabled,
}

impl CameraStatus {
    /// Anything other than a case-insensitive `"disabled"` counts as enabled.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("disabled") {
            CameraStatus::Disabled
        } else {
            CameraStatus::Enabled
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraView {
    pub url: String,
    pub status: CameraStatus,
}

/// Precomputed adjacency along the camera's primary roadway.
///
/// Either side may reference its neighbor by id, by image URL, or both. Ids
/// are tried first when resolving.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NeighborRefs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "opt_id")]
    pub pos_id: Option<CameraId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "opt_id")]
    pub neg_id: Option<CameraId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neg_url: Option<String>,
}

impl NeighborRefs {
    pub fn id(&self, dir: Direction) -> Option<CameraId> {
        match dir {
            Direction::Forward => self.pos_id,
            Direction::Backward => self.neg_id,
        }
    }

    pub fn url(&self, dir: Direction) -> Option<&str> {
        match dir {
            Direction::Forward => self.pos_url.as_deref(),
            Direction::Backward => self.neg_url.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pos_id.is_none()
            && self.neg_id.is_none()
            && self.pos_url.is_none()
            && self.neg_url.is_none()
    }
}

/// One physical camera installation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    #[serde(serialize_with = "id")]
    pub id: CameraId,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub roadway_option1: Option<String>,
    pub roadway_option2: Option<String>,
    pub milepost_option1: Option<f64>,
    pub milepost_option2: Option<f64>,
    /// Never empty once validated by the loaders. Only the first view is shown
    /// in the carousel.
    pub views: Vec<CameraView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbors: Option<NeighborRefs>,
}

impl Camera {
    pub fn view_url(&self) -> Option<&str> {
        self.views.first().map(|v| v.url.as_str())
    }

    /// Status of the primary view.
    pub fn status(&self) -> CameraStatus {
        self.views.first().map(|v| v.status).unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        self.status() == CameraStatus::Enabled
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    /// The `(roadway, milepost)` pairs, option 1 first.
    pub fn roadways(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        let first = self
            .roadway_option1
            .as_deref()
            .map(|r| (r, self.milepost_option1));
        let second = self
            .roadway_option2
            .as_deref()
            .map(|r| (r, self.milepost_option2));
        first.into_iter().chain(second)
    }
}

fn id<S: Serializer>(id: &CameraId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(id.get())
}

fn opt_id<S: Serializer>(id: &Option<CameraId>, s: S) -> Result<S::Ok, S::Error> {
    match id {
        Some(id) => s.serialize_u64(id.get()),
        None => s.serialize_none(),
    }
}
