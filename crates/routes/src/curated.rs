use formats::RouteDef;
use tracing::debug;

use crate::segment::Segment;

/// Segments for a curated route definition.
///
/// A missing bound leaves that end of the route open, so a definition with
/// only a `name` covers the whole route in ascending order. Sub-routes that
/// fail validation are dropped.
pub fn segments_for(def: &RouteDef) -> Vec<Segment> {
    if def.is_multi_segment() {
        return def
            .routes
            .iter()
            .filter_map(|sub| open_segment(&sub.name, sub.mp_min, sub.mp_max))
            .collect();
    }
    def.name
        .as_deref()
        .and_then(|name| open_segment(name, def.mp_min, def.mp_max))
        .into_iter()
        .collect()
}

fn open_segment(name: &str, mp_min: Option<f64>, mp_max: Option<f64>) -> Option<Segment> {
    let min = mp_min.unwrap_or(f64::NEG_INFINITY);
    let max = mp_max.unwrap_or(f64::INFINITY);
    match Segment::new(name, min, max) {
        Ok(seg) => Some(seg),
        Err(err) => {
            debug!(route = name, %err, "ignoring curated route segment");
            None
        }
    }
}

/// Curated route labels with their segments, skipping definitions that
/// produce none.
pub fn curated_routes(defs: &[RouteDef]) -> Vec<(String, Vec<Segment>)> {
    defs.iter()
        .filter_map(|def| {
            let segments = segments_for(def);
            if segments.is_empty() {
                return None;
            }
            let label = def.label().map(str::to_string).unwrap_or_else(|| {
                segments
                    .iter()
                    .map(|s| s.route.as_str())
                    .collect::<Vec<_>>()
                    .join(" + ")
            });
            Some((label, segments))
        })
        .collect()
}
