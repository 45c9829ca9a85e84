//! Reports behind the `camroute` binary. Each one takes parsed data and
//! returns a serializable value; `main.rs` handles files and printing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use catalog::{Camera, CameraCatalog, CatalogError, Direction, filter};
use formats::{CameraList, CameraListError, RouteDef, RouteDefsError};
use foundation::{CameraId, LatLon, haversine_m};
use routes::{normalize_route, parse_multi_route_report, resolve, resolve_enabled, serialize_multi_route};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug)]
pub enum ToolError {
    Io { path: PathBuf, source: std::io::Error },
    Cameras(CameraListError),
    Routes(RouteDefsError),
    Catalog(CatalogError),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::Io { path, source } => write!(f, "read {}: {source}", path.display()),
            ToolError::Cameras(e) => write!(f, "{e}"),
            ToolError::Routes(e) => write!(f, "{e}"),
            ToolError::Catalog(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::Io { source, .. } => Some(source),
            ToolError::Cameras(e) => Some(e),
            ToolError::Routes(e) => Some(e),
            ToolError::Catalog(e) => Some(e),
        }
    }
}

impl From<CameraListError> for ToolError {
    fn from(e: CameraListError) -> Self {
        ToolError::Cameras(e)
    }
}

impl From<RouteDefsError> for ToolError {
    fn from(e: RouteDefsError) -> Self {
        ToolError::Routes(e)
    }
}

impl From<CatalogError> for ToolError {
    fn from(e: CatalogError) -> Self {
        ToolError::Catalog(e)
    }
}

fn read(path: &Path) -> Result<String, ToolError> {
    fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a camera list or GeoJSON file, logging skipped records.
pub fn load_cameras(path: &Path) -> Result<CameraList, ToolError> {
    let list = formats::parse_camera_list(&read(path)?)?;
    for skipped in &list.skipped {
        warn!(path = %path.display(), "{skipped}");
    }
    info!(
        path = %path.display(),
        cameras = list.cameras.len(),
        skipped = list.skipped.len(),
        "loaded cameras"
    );
    Ok(list)
}

pub fn load_route_defs(path: &Path) -> Result<Vec<RouteDef>, ToolError> {
    Ok(formats::parse_route_defs(&read(path)?)?)
}

/// One camera in a printed list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraRow {
    pub id: u64,
    pub location: String,
    pub roadway: Option<String>,
    pub milepost: Option<f64>,
    pub image_url: Option<String>,
}

impl From<&Camera> for CameraRow {
    fn from(cam: &Camera) -> Self {
        Self {
            id: cam.id.get(),
            location: cam.location.clone(),
            roadway: cam.roadway_option1.clone(),
            milepost: cam.milepost_option1,
            image_url: cam.view_url().map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReport {
    /// Canonical form of the parsed segments.
    pub multi_route: String,
    pub segments: Vec<String>,
    pub skipped_chunks: Vec<String>,
    pub cameras: Vec<CameraRow>,
}

pub fn resolve_report(cameras: &[Camera], multi_route: &str, include_disabled: bool) -> ResolveReport {
    let (segments, errors) = parse_multi_route_report(multi_route);
    let resolved = if include_disabled {
        resolve(&segments, cameras)
    } else {
        resolve_enabled(&segments, cameras)
    };
    ResolveReport {
        multi_route: serialize_multi_route(&segments),
        segments: segments.iter().map(|s| s.label()).collect(),
        skipped_chunks: errors.iter().map(ToString::to_string).collect(),
        cameras: resolved.into_iter().map(CameraRow::from).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborReport {
    pub center: CameraRow,
    pub forward: Vec<CameraRow>,
    pub backward: Vec<CameraRow>,
}

pub fn neighbor_report(
    catalog: &CameraCatalog,
    id: CameraId,
    depth: usize,
) -> Result<NeighborReport, ToolError> {
    let center = catalog.get(id).ok_or(CatalogError::NotFound(id))?;
    let chain = |dir| -> Result<Vec<CameraRow>, ToolError> {
        Ok(catalog
            .neighbor_chain(id, dir, depth)?
            .into_iter()
            .map(CameraRow::from)
            .collect())
    };
    Ok(NeighborReport {
        center: center.into(),
        forward: chain(Direction::Forward)?,
        backward: chain(Direction::Backward)?,
    })
}

/// How often a raw roadway value appears across the camera list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCount {
    pub raw: String,
    pub normalized: String,
    pub count: usize,
}

/// Roadway values from both roadway options, most frequent first.
pub fn route_stats(cameras: &[Camera]) -> Vec<RouteCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for cam in cameras {
        for (route, _) in cam.roadways() {
            *counts.entry(route).or_default() += 1;
        }
    }
    let mut rows: Vec<RouteCount> = counts
        .into_iter()
        .map(|(raw, count)| RouteCount {
            raw: raw.to_string(),
            normalized: normalize_route(raw),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.raw.cmp(&b.raw)));
    rows
}

pub fn validate_report(catalog: &CameraCatalog) -> Vec<String> {
    catalog
        .validate_neighbors()
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestRow {
    #[serde(flatten)]
    pub camera: CameraRow,
    pub distance_m: f64,
}

pub fn nearest_report(cameras: &[Camera], origin: LatLon, limit: usize) -> Vec<NearestRow> {
    filter::nearest(cameras, origin, limit)
        .into_iter()
        .map(|cam| NearestRow {
            camera: cam.into(),
            distance_m: haversine_m(origin, cam.position()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CuratedRow {
    pub label: String,
    pub multi_route: String,
    pub camera_ids: Vec<u64>,
}

pub fn curated_report(defs: &[RouteDef], cameras: &[Camera]) -> Vec<CuratedRow> {
    routes::curated_routes(defs)
        .into_iter()
        .map(|(label, segments)| CuratedRow {
            multi_route: serialize_multi_route(&segments),
            camera_ids: resolve_enabled(&segments, cameras)
                .iter()
                .map(|c| c.id.get())
                .collect(),
            label,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{curated_report, nearest_report, neighbor_report, resolve_report, route_stats};
    use catalog::CameraCatalog;
    use formats::{parse_camera_list, parse_route_defs};
    use foundation::{CameraId, LatLon};
    use pretty_assertions::assert_eq;

    const CAMERAS: &str = include_str!("../../formats/fixtures/cameras.json");
    const GEOJSON: &str = include_str!("../../formats/fixtures/cameras.geojson");
    const ROUTES: &str = include_str!("../../formats/fixtures/routes.json");

    fn ids<T>(rows: &[T], id: impl Fn(&T) -> u64) -> Vec<u64> {
        rows.iter().map(id).collect()
    }

    #[test]
    fn resolve_report_orders_and_reports_skips() {
        let list = parse_camera_list(CAMERAS).unwrap();
        let report = resolve_report(&list.cameras, "0015:300-320,84:120-80,junk", false);
        assert_eq!(report.multi_route, "15P:300-320,84P:120-80");
        assert_eq!(ids(&report.cameras, |c| c.id), vec![101, 102, 105, 103]);
        assert_eq!(report.skipped_chunks.len(), 1);

        let all = resolve_report(&list.cameras, "15P:300-320", true);
        assert_eq!(ids(&all.cameras, |c| c.id), vec![101, 102, 106]);
    }

    #[test]
    fn route_stats_counts_both_roadway_options() {
        let list = parse_camera_list(CAMERAS).unwrap();
        let stats = route_stats(&list.cameras);
        let summary: Vec<(&str, &str, usize)> = stats
            .iter()
            .map(|r| (r.raw.as_str(), r.normalized.as_str(), r.count))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("0015P", "15P", 3),
                ("0084N", "84P", 1),
                ("0084P", "84P", 1),
                ("0209P", "209P", 1),
                ("0270P", "270P", 1),
            ]
        );
    }

    #[test]
    fn neighbor_report_walks_metadata_chain() {
        let list = parse_camera_list(GEOJSON).unwrap();
        let catalog = CameraCatalog::new(list.cameras);
        let report = neighbor_report(&catalog, CameraId(2), 5).unwrap();
        assert_eq!(ids(&report.forward, |c| c.id), vec![3, 4]);
        assert_eq!(ids(&report.backward, |c| c.id), vec![1]);
        assert!(neighbor_report(&catalog, CameraId(99), 1).is_err());
    }

    #[test]
    fn nearest_report_includes_distance() {
        let list = parse_camera_list(CAMERAS).unwrap();
        let rows = nearest_report(&list.cameras, LatLon::new(40.7625, -111.9041), 2);
        assert_eq!(ids(&rows, |r| r.camera.id), vec![101, 102]);
        assert!(rows[0].distance_m < 1.0);
        assert!(rows[1].distance_m > rows[0].distance_m);
    }

    #[test]
    fn curated_report_expands_fixture_routes() {
        let list = parse_camera_list(CAMERAS).unwrap();
        let defs = parse_route_defs(ROUTES).unwrap();
        let rows = curated_report(&defs, &list.cameras);
        let summary: Vec<(&str, Vec<u64>)> = rows
            .iter()
            .map(|r| (r.label.as_str(), r.camera_ids.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("I-84 (Weber Canyon)", vec![103, 105]),
                ("I-15 (Downtown SLC)", vec![101, 102]),
                ("Downtown to Echo", vec![101, 102, 105, 103]),
            ]
        );
        assert_eq!(rows[1].multi_route, "15P:-inf-inf");
    }
}
