/// Stable camera identifier, as published in the camera list (`Id`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CameraId(pub u64);

impl CameraId {
    pub fn new(n: u64) -> Self {
        CameraId(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CameraId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one rotation of the carousel drum.
///
/// Fallback timers carry the id of the rotation that armed them, so a late
/// timer can be matched (or ignored) against the rotation in flight.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RotationId(pub u64);

impl RotationId {
    pub fn next(self) -> Self {
        RotationId(self.0.wrapping_add(1))
    }
}
