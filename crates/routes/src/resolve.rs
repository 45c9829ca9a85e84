use std::collections::HashSet;

use catalog::Camera;
use foundation::CameraId;
use tracing::debug;

use crate::segment::Segment;

/// Turns an ordered list of segments into the cameras met while driving them.
///
/// Each segment contributes its matching cameras ordered by milepost in the
/// segment's direction of travel; segments are concatenated in list order and
/// a camera already contributed by an earlier segment is not repeated. An
/// empty segment list resolves to no cameras.
///
/// `cameras` is expected to be pre-filtered (disabled cameras removed).
pub fn resolve<'a>(segments: &[Segment], cameras: &'a [Camera]) -> Vec<&'a Camera> {
    let refs: Vec<&Camera> = cameras.iter().collect();
    resolve_refs(segments, &refs)
}

/// [`resolve`] over the enabled subset of `cameras`.
pub fn resolve_enabled<'a>(segments: &[Segment], cameras: &'a [Camera]) -> Vec<&'a Camera> {
    let refs: Vec<&Camera> = cameras.iter().filter(|c| c.is_enabled()).collect();
    resolve_refs(segments, &refs)
}

pub fn resolve_refs<'a>(segments: &[Segment], cameras: &[&'a Camera]) -> Vec<&'a Camera> {
    let mut seen: HashSet<CameraId> = HashSet::new();
    let mut out = Vec::new();

    for seg in segments {
        let mut hits: Vec<(f64, &'a Camera)> = cameras
            .iter()
            .filter_map(|&cam| seg.matching_milepost(cam).map(|mp| (mp, cam)))
            .collect();

        // Stable sorts keep list order among equal mileposts.
        if seg.is_ascending() {
            hits.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        } else {
            hits.sort_by(|(a, _), (b, _)| b.total_cmp(a));
        }

        let before = out.len();
        for (_, cam) in hits {
            if seen.insert(cam.id) {
                out.push(cam);
            }
        }
        debug!(
            route = %seg.route,
            mp_min = seg.mp_min,
            mp_max = seg.mp_max,
            added = out.len() - before,
            "resolved segment"
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{resolve, resolve_enabled};
    use crate::segment::Segment;
    use crate::test_support::{ids, on_route, with_second};
    use catalog::filter;
    use pretty_assertions::assert_eq;

    #[test]
    fn orders_by_milepost_in_travel_direction() {
        let cams = vec![
            on_route(1, "0015P", 10.0),
            on_route(2, "0015P", 90.0),
            on_route(3, "0015P", 50.0),
        ];
        let up = [Segment::new("15", 0.0, 100.0).unwrap()];
        let down = [Segment::new("15", 100.0, 0.0).unwrap()];
        assert_eq!(ids(&resolve(&up, &cams)), vec![1, 3, 2]);
        assert_eq!(ids(&resolve(&down, &cams)), vec![2, 3, 1]);
    }

    #[test]
    fn concatenates_segments_and_deduplicates() {
        let cams = vec![
            on_route(1, "0015P", 300.0),
            // Interchange camera on both routes.
            with_second(on_route(2, "0015P", 301.0), "0080P", 120.0),
            on_route(3, "0080P", 125.0),
            on_route(4, "0080P", 115.0),
        ];
        let segments = [
            Segment::new("15", 299.0, 302.0).unwrap(),
            Segment::new("80", 110.0, 130.0).unwrap(),
        ];
        let got = ids(&resolve(&segments, &cams));
        assert_eq!(got, vec![1, 2, 4, 3]);
    }

    #[test]
    fn overlapping_segments_never_repeat_a_camera() {
        let cams = vec![
            on_route(1, "0015P", 1.0),
            on_route(2, "0015P", 2.0),
            on_route(3, "0015P", 3.0),
        ];
        let segments = [
            Segment::new("15", 0.0, 2.5).unwrap(),
            Segment::new("15", 3.5, 1.5).unwrap(),
        ];
        assert_eq!(ids(&resolve(&segments, &cams)), vec![1, 2, 3]);
    }

    #[test]
    fn empty_segment_list_matches_nothing() {
        let cams = vec![on_route(1, "0015P", 1.0)];
        assert!(resolve(&[], &cams).is_empty());
    }

    #[test]
    fn out_of_range_and_other_routes_are_excluded() {
        let cams = vec![
            on_route(1, "0015P", 5.0),
            on_route(2, "0089P", 5.0),
            on_route(3, "0015P", 50.0),
        ];
        let segments = [Segment::new("15", 0.0, 10.0).unwrap()];
        assert_eq!(ids(&resolve(&segments, &cams)), vec![1]);
    }

    #[test]
    fn resolves_fixture_drive() {
        let list = formats::parse_camera_list(include_str!("../../formats/fixtures/cameras.json"))
            .expect("fixture");
        let segments = [
            Segment::new("15", 300.0, 320.0).unwrap(),
            Segment::new("84", 120.0, 80.0).unwrap(),
        ];
        // 106 is disabled and must not appear.
        let got = ids(&resolve_enabled(&segments, &list.cameras));
        assert_eq!(got, vec![101, 102, 105, 103]);

        let enabled = filter::enabled(&list.cameras);
        assert_eq!(ids(&resolve(&segments, &enabled)), got);
    }
}
