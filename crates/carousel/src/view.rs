use catalog::NeighborLookup;
use serde::Serialize;

use crate::drum;

/// Render model for one drum slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub index: usize,
    /// Placement angle on the drum.
    pub angle_deg: f64,
    pub camera_id: Option<u64>,
    pub image_url: Option<String>,
    pub alt: String,
}

/// Everything the page needs to draw the carousel in its current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselView {
    pub open: bool,
    pub rotating: bool,
    pub front: usize,
    pub angle_deg: f64,
    /// Whether the change to `angle_deg` should be animated.
    pub animate: bool,
    pub radius_px: f64,
    pub center: Option<u64>,
    pub slots: Vec<SlotView>,
}

pub(crate) fn slot_view(
    lookup: &impl NeighborLookup,
    index: usize,
    camera: Option<foundation::CameraId>,
) -> SlotView {
    let cam = camera.and_then(|id| lookup.camera(id));
    SlotView {
        index,
        angle_deg: drum::slot_angle(index),
        camera_id: camera.map(|id| id.get()),
        image_url: cam.and_then(|c| c.view_url()).map(str::to_owned),
        alt: cam.map(|c| c.location.clone()).unwrap_or_default(),
    }
}
