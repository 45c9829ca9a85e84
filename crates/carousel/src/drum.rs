//! Geometry of the six-slot drum.
//!
//! Slot `i` sits at `i * STEP_DEG` around the drum axis. Rotating the drum by
//! `-front * STEP_DEG` brings slot `front` to face the viewer, so a forward
//! step decreases the drum angle by one step.

use catalog::Direction;

pub const SLOT_COUNT: usize = 6;
pub const STEP_DEG: f64 = 360.0 / SLOT_COUNT as f64;

/// Physical slot at `offset` steps from `front` (negative offsets are
/// backward).
pub fn slot_at(front: usize, offset: i64) -> usize {
    (front as i64 + offset).rem_euclid(SLOT_COUNT as i64) as usize
}

/// Front slot after one step in `dir`.
pub fn step(front: usize, dir: Direction) -> usize {
    slot_at(front, dir.sign())
}

/// The slot diametrically opposite the front: hidden from view, and the one
/// that becomes a second-link slot after the next step in either direction.
pub fn opposite(front: usize) -> usize {
    slot_at(front, (SLOT_COUNT / 2) as i64)
}

/// Drum angle at rest with `front` facing the viewer, in `(-360, 0]`.
pub fn resting_angle(front: usize) -> f64 {
    -((front % SLOT_COUNT) as f64) * STEP_DEG
}

/// Placement angle of slot `index` on the drum.
pub fn slot_angle(index: usize) -> f64 {
    (index % SLOT_COUNT) as f64 * STEP_DEG
}

/// Whole steps a drag from `rest` to `angle` amounts to; positive is forward.
pub fn drag_steps(rest: f64, angle: f64) -> i64 {
    let steps = ((rest - angle) / STEP_DEG).round();
    if steps.is_finite() { steps as i64 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::{drag_steps, opposite, resting_angle, slot_at, step};
    use catalog::Direction;

    #[test]
    fn slot_arithmetic_wraps() {
        assert_eq!(slot_at(0, -1), 5);
        assert_eq!(slot_at(5, 2), 1);
        assert_eq!(step(5, Direction::Forward), 0);
        assert_eq!(step(0, Direction::Backward), 5);
        assert_eq!(opposite(1), 4);
    }

    #[test]
    fn resting_angles_stay_bounded() {
        assert_eq!(resting_angle(0), 0.0);
        assert_eq!(resting_angle(1), -60.0);
        assert_eq!(resting_angle(5), -300.0);
        assert_eq!(resting_angle(6), 0.0);
    }

    #[test]
    fn drag_rounds_to_nearest_step() {
        assert_eq!(drag_steps(0.0, -29.0), 0);
        assert_eq!(drag_steps(0.0, -31.0), 1);
        assert_eq!(drag_steps(-60.0, 10.0), -1);
        assert_eq!(drag_steps(0.0, -150.0), 3);
        assert_eq!(drag_steps(0.0, f64::NAN), 0);
    }
}
