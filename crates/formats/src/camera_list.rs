use catalog::{Camera, CameraStatus, CameraView, NeighborRefs};
use foundation::CameraId;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

/// Cameras accepted from a data file, plus the records that were rejected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CameraList {
    pub cameras: Vec<Camera>,
    pub skipped: Vec<CameraListError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CameraListError {
    Json(String),
    /// Neither `{ "CamerasList": [...] }` nor a GeoJSON `FeatureCollection`.
    UnrecognizedShape,
    InvalidCamera { index: usize, reason: String },
}

impl std::fmt::Display for CameraListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraListError::Json(msg) => write!(f, "JSON parse error: {msg}"),
            CameraListError::UnrecognizedShape => {
                write!(f, "expected a CamerasList object or a GeoJSON FeatureCollection")
            }
            CameraListError::InvalidCamera { index, reason } => {
                write!(f, "invalid camera at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for CameraListError {}

/// Parses either supported camera file shape.
///
/// A malformed document is an error; a malformed camera inside a valid
/// document is skipped and reported in [`CameraList::skipped`].
pub fn parse_camera_list(payload: &str) -> Result<CameraList, CameraListError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| CameraListError::Json(e.to_string()))?;
    camera_list_from_value(value)
}

pub fn camera_list_from_value(value: Value) -> Result<CameraList, CameraListError> {
    let obj = value.as_object().ok_or(CameraListError::UnrecognizedShape)?;

    if let Some(list) = obj.get("CamerasList") {
        let items = list.as_array().ok_or(CameraListError::UnrecognizedShape)?;
        return Ok(collect(items.iter().enumerate().map(|(index, item)| {
            raw_from_value(item.clone(), index).and_then(|raw| raw.into_camera(index, None))
        })));
    }

    if obj.get("type").and_then(|v| v.as_str()) == Some("FeatureCollection") {
        let features = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(CameraListError::UnrecognizedShape)?;
        return Ok(collect(
            features
                .iter()
                .enumerate()
                .map(|(index, feat)| camera_from_feature(feat, index)),
        ));
    }

    Err(CameraListError::UnrecognizedShape)
}

fn collect(results: impl Iterator<Item = Result<Camera, CameraListError>>) -> CameraList {
    let mut out = CameraList::default();
    for result in results {
        match result {
            Ok(cam) => out.cameras.push(cam),
            Err(err) => {
                warn!(%err, "skipping camera record");
                out.skipped.push(err);
            }
        }
    }
    out
}

fn camera_from_feature(feat: &Value, index: usize) -> Result<Camera, CameraListError> {
    let invalid = |reason: &str| CameraListError::InvalidCamera {
        index,
        reason: reason.to_string(),
    };

    let feat_obj = feat.as_object().ok_or_else(|| invalid("feature must be an object"))?;
    if feat_obj.get("type").and_then(|v| v.as_str()) != Some("Feature") {
        return Err(invalid("feature type must be \"Feature\""));
    }

    let mut properties: Map<String, Value> = feat_obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    // Feature-level id is only a fallback for a missing `Id` property.
    if !properties.contains_key("Id") && !properties.contains_key("id") {
        if let Some(id) = feat_obj.get("id") {
            properties.insert("Id".to_string(), id.clone());
        }
    }

    let point = feat_obj.get("geometry").and_then(point_lon_lat);
    let raw = raw_from_value(Value::Object(properties), index)?;
    raw.into_camera(index, point)
}

/// `[lon, lat]` of a GeoJSON Point geometry.
fn point_lon_lat(geometry: &Value) -> Option<(f64, f64)> {
    let obj = geometry.as_object()?;
    if obj.get("type")?.as_str()? != "Point" {
        return None;
    }
    let coords = obj.get("coordinates")?.as_array()?;
    Some((coords.first()?.as_f64()?, coords.get(1)?.as_f64()?))
}

fn raw_from_value(value: Value, index: usize) -> Result<RawCamera, CameraListError> {
    serde_json::from_value(value).map_err(|e| CameraListError::InvalidCamera {
        index,
        reason: e.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct RawCamera {
    #[serde(alias = "id", default, deserialize_with = "lenient_u64")]
    #[serde(rename = "Id")]
    id: Option<u64>,
    #[serde(rename = "Location", alias = "location", default)]
    location: Option<String>,
    #[serde(rename = "Latitude", alias = "latitude", default, deserialize_with = "lenient_f64")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude", alias = "longitude", default, deserialize_with = "lenient_f64")]
    longitude: Option<f64>,
    #[serde(rename = "RoadwayOption1", alias = "roadwayOption1", default, deserialize_with = "lenient_string")]
    roadway_option1: Option<String>,
    #[serde(rename = "RoadwayOption2", alias = "roadwayOption2", default, deserialize_with = "lenient_string")]
    roadway_option2: Option<String>,
    #[serde(rename = "MilepostOption1", alias = "milepostOption1", default, deserialize_with = "lenient_f64")]
    milepost_option1: Option<f64>,
    #[serde(rename = "MilepostOption2", alias = "milepostOption2", default, deserialize_with = "lenient_f64")]
    milepost_option2: Option<f64>,
    #[serde(rename = "Views", alias = "views", default)]
    views: Vec<RawView>,
    /// Flat single-view form used by some GeoJSON exports.
    #[serde(rename = "ImageUrl", alias = "imageUrl", alias = "viewUrl", default)]
    image_url: Option<String>,
    #[serde(rename = "Status", alias = "status", default)]
    status: Option<String>,
    #[serde(alias = "Neighbors", default)]
    neighbors: Option<RawNeighbors>,
}

#[derive(Debug, Deserialize)]
struct RawView {
    #[serde(rename = "Url", alias = "url", default)]
    url: Option<String>,
    #[serde(rename = "Status", alias = "status", default)]
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawNeighbors {
    #[serde(default)]
    route: Option<String>,
    #[serde(alias = "posId", default, deserialize_with = "lenient_u64")]
    pos_id: Option<u64>,
    #[serde(alias = "posUrl", alias = "pos", default)]
    pos_url: Option<String>,
    #[serde(alias = "negId", default, deserialize_with = "lenient_u64")]
    neg_id: Option<u64>,
    #[serde(alias = "negUrl", alias = "neg", default)]
    neg_url: Option<String>,
}

impl RawCamera {
    fn into_camera(
        self,
        index: usize,
        point: Option<(f64, f64)>,
    ) -> Result<Camera, CameraListError> {
        let invalid = |reason: &str| CameraListError::InvalidCamera {
            index,
            reason: reason.to_string(),
        };

        let id = self.id.ok_or_else(|| invalid("missing Id"))?;
        let latitude = self
            .latitude
            .or(point.map(|(_, lat)| lat))
            .ok_or_else(|| invalid("missing Latitude"))?;
        let longitude = self
            .longitude
            .or(point.map(|(lon, _)| lon))
            .ok_or_else(|| invalid("missing Longitude"))?;

        let mut views: Vec<CameraView> = self
            .views
            .into_iter()
            .filter_map(|v| {
                let url = v.url.filter(|u| !u.trim().is_empty())?;
                let status = v.status.as_deref().map(CameraStatus::parse).unwrap_or_default();
                Some(CameraView { url, status })
            })
            .collect();
        if views.is_empty() {
            if let Some(url) = self.image_url.filter(|u| !u.trim().is_empty()) {
                let status = self.status.as_deref().map(CameraStatus::parse).unwrap_or_default();
                views.push(CameraView { url, status });
            }
        }
        if views.is_empty() {
            return Err(invalid("camera has no view URL"));
        }

        let neighbors = self
            .neighbors
            .map(|n| NeighborRefs {
                route: n.route.filter(|r| !r.is_empty()),
                pos_id: n.pos_id.map(CameraId),
                pos_url: n.pos_url.filter(|u| !u.is_empty()),
                neg_id: n.neg_id.map(CameraId),
                neg_url: n.neg_url.filter(|u| !u.is_empty()),
            })
            .filter(|n| !n.is_empty());

        Ok(Camera {
            id: CameraId(id),
            location: self.location.unwrap_or_default(),
            latitude,
            longitude,
            roadway_option1: self.roadway_option1,
            roadway_option2: self.roadway_option2,
            milepost_option1: self.milepost_option1,
            milepost_option2: self.milepost_option2,
            views,
            neighbors,
        })
    }
}

// Exports are inconsistent about numbers vs numeric strings, so every
// numeric field accepts both and treats anything else as absent.

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(value_f64))
}

fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn value_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::{CameraListError, parse_camera_list};
    use catalog::{CameraStatus, Direction};
    use foundation::CameraId;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_cameras_list_fixture() {
        let payload = include_str!("../fixtures/cameras.json");
        let list = parse_camera_list(payload).expect("parse camera list");
        assert_eq!(list.cameras.len(), 6);
        assert_eq!(list.skipped.len(), 1);

        let first = &list.cameras[0];
        assert_eq!(first.id, CameraId(101));
        assert_eq!(first.roadway_option1.as_deref(), Some("0015P"));
        assert_eq!(first.milepost_option1, Some(300.2));
        assert!(first.neighbors.is_none());

        let disabled = list.cameras.iter().find(|c| c.id == CameraId(106)).unwrap();
        assert_eq!(disabled.status(), CameraStatus::Disabled);

        // Milepost given as a string.
        let stringy = list.cameras.iter().find(|c| c.id == CameraId(104)).unwrap();
        assert_eq!(stringy.milepost_option1, Some(12.5));
    }

    #[test]
    fn parses_geojson_fixture_with_neighbors() {
        let payload = include_str!("../fixtures/cameras.geojson");
        let list = parse_camera_list(payload).expect("parse geojson");
        assert!(list.skipped.is_empty());
        assert_eq!(list.cameras.len(), 4);

        let b = list.cameras.iter().find(|c| c.id == CameraId(2)).unwrap();
        // Coordinates come from the Point geometry.
        assert_eq!(b.longitude, -111.95);
        assert_eq!(b.latitude, 41.1);
        let refs = b.neighbors.as_ref().expect("neighbors");
        assert_eq!(refs.id(Direction::Forward), Some(CameraId(3)));
        assert_eq!(refs.url(Direction::Backward), Some("https://example.test/cctv/a.jpg"));
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert_eq!(
            parse_camera_list(r#"{"type":"Topology"}"#).unwrap_err(),
            CameraListError::UnrecognizedShape
        );
        assert!(matches!(
            parse_camera_list("not json").unwrap_err(),
            CameraListError::Json(_)
        ));
    }

    #[test]
    fn camera_without_views_is_skipped() {
        let payload = r#"{"CamerasList":[
            {"Id": 1, "Latitude": 40.0, "Longitude": -111.0, "Views": []},
            {"Id": 2, "Latitude": 40.0, "Longitude": -111.0, "Views": [{"Url": "u2"}]}
        ]}"#;
        let list = parse_camera_list(payload).unwrap();
        assert_eq!(list.cameras.len(), 1);
        assert_eq!(
            list.skipped,
            vec![CameraListError::InvalidCamera {
                index: 0,
                reason: "camera has no view URL".to_string(),
            }]
        );
    }
}
