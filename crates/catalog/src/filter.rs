use foundation::{LatLon, haversine_m};

use crate::camera::{Camera, CameraStatus};

/// How many cameras the "nearest cameras" mode shows.
pub const DEFAULT_NEAREST_LIMIT: usize = 50;

/// Cameras whose primary view is not disabled, in list order.
///
/// This is the input set for route resolution.
pub fn enabled(cameras: &[Camera]) -> Vec<Camera> {
    cameras.iter().filter(|c| c.is_enabled()).cloned().collect()
}

/// Cameras whose primary view is disabled ("Inactive Cameras").
pub fn inactive(cameras: &[Camera]) -> Vec<&Camera> {
    cameras
        .iter()
        .filter(|c| c.status() == CameraStatus::Disabled)
        .collect()
}

/// The `limit` cameras closest to `origin`, nearest first.
///
/// Ties keep list order. Cameras with non-finite coordinates sort last.
pub fn nearest(cameras: &[Camera], origin: LatLon, limit: usize) -> Vec<&Camera> {
    let mut ranked: Vec<(f64, &Camera)> = cameras
        .iter()
        .map(|c| {
            let d = haversine_m(origin, c.position());
            (if d.is_finite() { d } else { f64::INFINITY }, c)
        })
        .collect();
    ranked.sort_by(|(da, _), (db, _)| da.total_cmp(db));
    ranked.into_iter().take(limit).map(|(_, c)| c).collect()
}
