/// Mean Earth radius (meters), good enough for ranking cameras by distance.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Latitude/longitude in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLon {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl LatLon {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }
}

/// Great-circle (haversine) distance in meters.
pub fn haversine_m(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.lat_deg.to_radians();
    let lat2 = b.lat_deg.to_radians();
    let dlat = (b.lat_deg - a.lat_deg).to_radians();
    let dlon = (b.lon_deg - a.lon_deg).to_radians();

    let h = (dlat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon * 0.5).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::{LatLon, haversine_m};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn zero_distance_to_self() {
        let slc = LatLon::new(40.7608, -111.8910);
        assert_close(haversine_m(slc, slc), 0.0, 1e-9);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = LatLon::new(40.0, -111.0);
        let b = LatLon::new(41.0, -111.0);
        // ~111.2 km per degree on a sphere of mean radius.
        assert_close(haversine_m(a, b), 111_195.0, 50.0);
    }
}
