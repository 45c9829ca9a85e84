use std::collections::HashMap;

use foundation::CameraId;
use tracing::warn;

pub mod camera;
pub mod filter;
pub mod url;

pub use camera::*;
pub use url::normalize_url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound(CameraId),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound(id) => write!(f, "camera {id} not in catalog"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Neighbor resolution capability consumed by the carousel.
pub trait NeighborLookup {
    fn camera(&self, id: CameraId) -> Option<&Camera>;

    /// The next camera from `id` in `dir`, or `None` at a chain boundary.
    fn neighbor(&self, id: CameraId, dir: Direction) -> Option<CameraId>;
}

/// A problem found in authored neighbor metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NeighborIssue {
    /// The reference does not match any camera in the list.
    Unresolved {
        camera: CameraId,
        dir: Direction,
        reference: String,
    },
    /// The reference points back at the camera itself.
    SelfReference { camera: CameraId, dir: Direction },
    /// `camera`'s `dir` neighbor does not point back in the reverse direction.
    Asymmetric {
        camera: CameraId,
        dir: Direction,
        other: CameraId,
    },
}

impl std::fmt::Display for NeighborIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NeighborIssue::Unresolved {
                camera,
                dir,
                reference,
            } => write!(f, "camera {camera}: {dir:?} neighbor {reference:?} not found"),
            NeighborIssue::SelfReference { camera, dir } => {
                write!(f, "camera {camera}: {dir:?} neighbor points at itself")
            }
            NeighborIssue::Asymmetric { camera, dir, other } => write!(
                f,
                "camera {camera}: {dir:?} neighbor {other} does not link back"
            ),
        }
    }
}

/// The full camera list, in publication order, with lookup indexes.
///
/// List order matters: it is the fallback adjacency when a camera has no
/// usable neighbor metadata.
#[derive(Debug, Default, Clone)]
pub struct CameraCatalog {
    cameras: Vec<Camera>,
    by_id: HashMap<CameraId, usize>,
    by_url: HashMap<String, usize>,
}

impl CameraCatalog {
    /// Builds the indexes. Later duplicates of an id are dropped.
    pub fn new(cameras: Vec<Camera>) -> Self {
        let mut kept = Vec::with_capacity(cameras.len());
        let mut by_id = HashMap::with_capacity(cameras.len());
        let mut by_url = HashMap::new();

        for cam in cameras {
            if by_id.contains_key(&cam.id) {
                warn!(id = %cam.id, "duplicate camera id, keeping first occurrence");
                continue;
            }
            let idx = kept.len();
            by_id.insert(cam.id, idx);
            for view in &cam.views {
                let key = normalize_url(&view.url);
                if !key.is_empty() {
                    by_url.entry(key).or_insert(idx);
                }
            }
            kept.push(cam);
        }

        Self {
            cameras: kept,
            by_id,
            by_url,
        }
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn get(&self, id: CameraId) -> Option<&Camera> {
        self.by_id.get(&id).map(|&i| &self.cameras[i])
    }

    pub fn index_of(&self, id: CameraId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// Finds the camera owning an image URL (any view), tolerant of scheme,
    /// case and trailing-slash differences.
    pub fn find_by_url(&self, url: &str) -> Option<&Camera> {
        self.by_url
            .get(&normalize_url(url))
            .map(|&i| &self.cameras[i])
    }

    /// Resolves `camera`'s neighbor in `dir`.
    ///
    /// Authored metadata wins when it resolves to another camera in this
    /// catalog; otherwise the neighbor is the adjacent entry in list order.
    /// Returns `None` at a list boundary or for a camera not in the catalog.
    pub fn get_neighbor(&self, camera: &Camera, dir: Direction) -> Option<&Camera> {
        if let Some(found) = self.metadata_neighbor(camera, dir) {
            return Some(found);
        }

        let idx = self.index_of(camera.id)?;
        let next = match dir {
            Direction::Forward => idx.checked_add(1)?,
            Direction::Backward => idx.checked_sub(1)?,
        };
        self.cameras.get(next)
    }

    fn metadata_neighbor(&self, camera: &Camera, dir: Direction) -> Option<&Camera> {
        let refs = camera.neighbors.as_ref()?;
        let by_id = refs.id(dir).and_then(|id| self.get(id));
        let by_url = || refs.url(dir).and_then(|u| self.find_by_url(u));
        by_id.or_else(by_url).filter(|n| n.id != camera.id)
    }

    /// Up to `len` cameras following `id` in `dir`, stopping at a boundary.
    ///
    /// Cycles in authored metadata are cut at the first repeat.
    pub fn neighbor_chain(
        &self,
        id: CameraId,
        dir: Direction,
        len: usize,
    ) -> Result<Vec<&Camera>, CatalogError> {
        let mut current = self.get(id).ok_or(CatalogError::NotFound(id))?;
        let mut out: Vec<&Camera> = Vec::with_capacity(len);
        while out.len() < len {
            let Some(next) = self.get_neighbor(current, dir) else {
                break;
            };
            if next.id == id || out.iter().any(|c| c.id == next.id) {
                break;
            }
            out.push(next);
            current = next;
        }
        Ok(out)
    }

    /// Checks authored neighbor metadata against this list.
    pub fn validate_neighbors(&self) -> Vec<NeighborIssue> {
        let mut issues = Vec::new();
        for cam in &self.cameras {
            let Some(refs) = cam.neighbors.as_ref() else {
                continue;
            };
            for dir in [Direction::Forward, Direction::Backward] {
                let reference = match (refs.id(dir), refs.url(dir)) {
                    (Some(id), _) => id.to_string(),
                    (None, Some(url)) => url.to_string(),
                    (None, None) => continue,
                };
                let resolved = refs
                    .id(dir)
                    .and_then(|id| self.get(id))
                    .or_else(|| refs.url(dir).and_then(|u| self.find_by_url(u)));
                let Some(other) = resolved else {
                    issues.push(NeighborIssue::Unresolved {
                        camera: cam.id,
                        dir,
                        reference,
                    });
                    continue;
                };
                if other.id == cam.id {
                    issues.push(NeighborIssue::SelfReference {
                        camera: cam.id,
                        dir,
                    });
                    continue;
                }
                let back = self.metadata_neighbor(other, dir.reverse());
                if back.is_some_and(|b| b.id != cam.id) {
                    issues.push(NeighborIssue::Asymmetric {
                        camera: cam.id,
                        dir,
                        other: other.id,
                    });
                }
            }
        }
        issues
    }
}

impl NeighborLookup for CameraCatalog {
    fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.get(id)
    }

    fn neighbor(&self, id: CameraId, dir: Direction) -> Option<CameraId> {
        let cam = self.get(id)?;
        self.get_neighbor(cam, dir).map(|c| c.id)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{Camera, CameraStatus, CameraView, NeighborRefs};
    use foundation::CameraId;

    pub fn cam(id: u64) -> Camera {
        Camera {
            id: CameraId(id),
            location: format!("Camera {id}"),
            latitude: 40.0,
            longitude: -111.9,
            roadway_option1: None,
            roadway_option2: None,
            milepost_option1: None,
            milepost_option2: None,
            views: vec![CameraView {
                url: format!("https://example.test/cctv/{id}.jpg"),
                status: CameraStatus::Enabled,
            }],
            neighbors: None,
        }
    }

    pub fn disabled(mut c: Camera) -> Camera {
        for v in &mut c.views {
            v.status = CameraStatus::Disabled;
        }
        c
    }

    pub fn linked(mut c: Camera, pos: Option<u64>, neg: Option<u64>) -> Camera {
        c.neighbors = Some(NeighborRefs {
            pos_id: pos.map(CameraId),
            neg_id: neg.map(CameraId),
            ..NeighborRefs::default()
        });
        c
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{cam, linked};
    use super::{CameraCatalog, CatalogError, Direction, NeighborIssue, NeighborLookup, NeighborRefs};
    use foundation::CameraId;
    use pretty_assertions::assert_eq;

    fn ids(cams: &[&crate::Camera]) -> Vec<u64> {
        cams.iter().map(|c| c.id.get()).collect()
    }

    #[test]
    fn metadata_chain_ignores_list_order() {
        // List order D, B, A, C; metadata chain A <-> B <-> C <-> D.
        let catalog = CameraCatalog::new(vec![
            linked(cam(4), None, Some(3)),
            linked(cam(2), Some(3), Some(1)),
            linked(cam(1), Some(2), None),
            linked(cam(3), Some(4), Some(2)),
        ]);
        assert_eq!(catalog.neighbor(CameraId(2), Direction::Forward), Some(CameraId(3)));
        assert_eq!(catalog.neighbor(CameraId(3), Direction::Forward), Some(CameraId(4)));
        assert_eq!(catalog.neighbor(CameraId(3), Direction::Backward), Some(CameraId(2)));
    }

    #[test]
    fn falls_back_to_list_adjacency() {
        let catalog = CameraCatalog::new(vec![cam(10), cam(20), cam(30)]);
        assert_eq!(catalog.neighbor(CameraId(20), Direction::Forward), Some(CameraId(30)));
        assert_eq!(catalog.neighbor(CameraId(20), Direction::Backward), Some(CameraId(10)));
        assert_eq!(catalog.neighbor(CameraId(30), Direction::Forward), None);
        assert_eq!(catalog.neighbor(CameraId(10), Direction::Backward), None);
    }

    #[test]
    fn unresolvable_metadata_falls_back() {
        let catalog = CameraCatalog::new(vec![
            cam(1),
            linked(cam(2), Some(999), None),
            cam(3),
        ]);
        assert_eq!(catalog.neighbor(CameraId(2), Direction::Forward), Some(CameraId(3)));
    }

    #[test]
    fn url_references_resolve_loosely() {
        let mut a = cam(1);
        a.neighbors = Some(NeighborRefs {
            pos_url: Some("HTTP://Example.test/cctv/3.jpg/".to_string()),
            ..NeighborRefs::default()
        });
        let catalog = CameraCatalog::new(vec![a, cam(2), cam(3)]);
        assert_eq!(catalog.neighbor(CameraId(1), Direction::Forward), Some(CameraId(3)));
    }

    #[test]
    fn lookup_is_repeatable() {
        let catalog = CameraCatalog::new(vec![cam(1), cam(2)]);
        let first = catalog.neighbor(CameraId(1), Direction::Forward);
        let second = catalog.neighbor(CameraId(1), Direction::Forward);
        assert_eq!(first, second);
    }

    #[test]
    fn duplicates_keep_first() {
        let mut dup = cam(1);
        dup.location = "second".to_string();
        let catalog = CameraCatalog::new(vec![cam(1), dup, cam(2)]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(CameraId(1)).map(|c| c.location.as_str()), Some("Camera 1"));
    }

    #[test]
    fn chain_stops_at_boundary_and_cycles() {
        let catalog = CameraCatalog::new(vec![
            linked(cam(1), Some(2), Some(3)),
            linked(cam(2), Some(3), Some(1)),
            linked(cam(3), Some(1), Some(2)),
        ]);
        let chain = catalog.neighbor_chain(CameraId(1), Direction::Forward, 10).unwrap();
        assert_eq!(ids(&chain), vec![2, 3]);

        let plain = CameraCatalog::new(vec![cam(1), cam(2), cam(3)]);
        let chain = plain.neighbor_chain(CameraId(2), Direction::Forward, 5).unwrap();
        assert_eq!(ids(&chain), vec![3]);

        assert_eq!(
            plain.neighbor_chain(CameraId(77), Direction::Forward, 1).unwrap_err(),
            CatalogError::NotFound(CameraId(77))
        );
    }

    #[test]
    fn validation_reports_unresolved_and_asymmetric() {
        let catalog = CameraCatalog::new(vec![
            linked(cam(1), Some(2), None),
            linked(cam(2), Some(3), Some(3)),
            linked(cam(3), Some(42), Some(2)),
        ]);
        let issues = catalog.validate_neighbors();
        assert!(issues.contains(&NeighborIssue::Asymmetric {
            camera: CameraId(1),
            dir: Direction::Forward,
            other: CameraId(2),
        }));
        assert!(issues.contains(&NeighborIssue::Unresolved {
            camera: CameraId(3),
            dir: Direction::Forward,
            reference: "42".to_string(),
        }));
    }

    #[test]
    fn cameras_serialize_in_camel_case() {
        let value = serde_json::to_value(cam(5)).unwrap();
        assert_eq!(value["id"], 5);
        assert_eq!(value["location"], "Camera 5");
        assert!(value.get("roadwayOption1").is_some());
        assert!(value.get("neighbors").is_none());
    }
}
