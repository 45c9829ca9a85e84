use catalog::{Direction, NeighborLookup};
use foundation::CameraId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadwayLabel {
    pub route: String,
    pub milepost: Option<f64>,
}

/// Text shown beside the drum for the centered camera.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoPanel {
    pub camera_id: u64,
    pub location: String,
    pub image_url: Option<String>,
    pub roadways: Vec<RoadwayLabel>,
    /// Location of the forward neighbor, if the chain continues.
    pub next_label: Option<String>,
    pub previous_label: Option<String>,
}

pub fn info_panel(lookup: &impl NeighborLookup, center: CameraId) -> Option<InfoPanel> {
    let cam = lookup.camera(center)?;
    let label = |dir| {
        lookup
            .neighbor(center, dir)
            .and_then(|id| lookup.camera(id))
            .map(|c| c.location.clone())
    };
    Some(InfoPanel {
        camera_id: cam.id.get(),
        location: cam.location.clone(),
        image_url: cam.view_url().map(str::to_owned),
        roadways: cam
            .roadways()
            .map(|(route, milepost)| RoadwayLabel {
                route: route.to_owned(),
                milepost,
            })
            .collect(),
        next_label: label(Direction::Forward),
        previous_label: label(Direction::Backward),
    })
}
