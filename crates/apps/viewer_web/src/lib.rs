use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use serde::Serialize;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use catalog::{Camera, CameraCatalog, filter};
use carousel::AdjacencyCarousel;
use formats::RouteDef;
use foundation::{CameraId, LatLon};
use routes::{
    MULTI_ROUTE_PARAM, RouteBuilder, Segment, SegmentDraft, curated_routes, parse_multi_route,
    resolve_enabled, serialize_multi_route,
};

mod drum;

#[derive(Debug, Default)]
pub struct ViewerState {
    pub catalog: CameraCatalog,
    pub route_defs: Vec<RouteDef>,
    /// The active custom route.
    pub segments: Vec<Segment>,
    pub builder: RouteBuilder,
    pub carousel: AdjacencyCarousel,
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState::default());
}

fn with_state<R>(f: impl FnOnce(&mut ViewerState) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_err)
}

/// Camera ids arrive as JS numbers.
fn parse_camera_id(id: f64) -> Option<CameraId> {
    (id.is_finite() && id >= 0.0 && id.fract() == 0.0).then(|| CameraId(id as u64))
}

fn camera_id(id: f64) -> Result<CameraId, JsValue> {
    parse_camera_id(id).ok_or_else(|| js_err(format!("invalid camera id {id}")))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Fetches a camera list (or GeoJSON) and makes it the active catalog.
/// Resolves to the number of cameras accepted.
#[wasm_bindgen]
pub async fn load_cameras(url: String) -> Result<u32, JsValue> {
    let text = fetch_text(&url).await?;
    let list = formats::parse_camera_list(&text).map_err(js_err)?;
    for skipped in &list.skipped {
        warn(&format!("{url}: {skipped}"));
    }
    let count = list.cameras.len();
    with_state(|s| s.catalog = CameraCatalog::new(list.cameras));
    log(&format!("loaded {count} cameras from {url}"));
    Ok(count as u32)
}

#[wasm_bindgen]
pub fn load_route_defs(url: String) {
    spawn_local(async move {
        let defs = match fetch_text(&url).await {
            Ok(text) => formats::parse_route_defs(&text).map_err(js_err),
            Err(err) => Err(err),
        };
        match defs {
            Ok(defs) => {
                log(&format!("loaded {} curated routes from {url}", defs.len()));
                with_state(|s| s.route_defs = defs);
            }
            Err(err) => warn(&format!("Failed to load routes: {:?}", err)),
        }
    });
}

#[wasm_bindgen]
pub fn camera_count() -> u32 {
    with_state(|s| s.catalog.len() as u32)
}

/// The decoded `multiRoute` parameter of the page URL, or an empty string.
#[wasm_bindgen]
pub fn multi_route_from_location() -> Result<String, JsValue> {
    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
    let search = window.location().search()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search)?;
    Ok(params.get(MULTI_ROUTE_PARAM).unwrap_or_default())
}

/// Activates a custom route from a `multiRoute` value and returns its
/// cameras as JSON. The builder form is pre-populated from it.
#[wasm_bindgen]
pub fn set_multi_route(param: &str) -> Result<String, JsValue> {
    with_state(|s| {
        s.segments = parse_multi_route(param);
        s.builder = RouteBuilder::from_segments(&s.segments);
        to_json(&resolve_enabled(&s.segments, s.catalog.cameras()))
    })
}

#[wasm_bindgen]
pub fn route_cameras() -> Result<String, JsValue> {
    with_state(|s| to_json(&resolve_enabled(&s.segments, s.catalog.cameras())))
}

#[wasm_bindgen]
pub fn current_multi_route() -> String {
    with_state(|s| serialize_multi_route(&s.segments))
}

/// Filter badge labels for the active route.
#[wasm_bindgen]
pub fn route_badges() -> Result<String, JsValue> {
    with_state(|s| to_json(&s.segments.iter().map(Segment::label).collect::<Vec<_>>()))
}

#[wasm_bindgen]
pub fn clear_route() {
    with_state(|s| {
        s.segments.clear();
        s.builder.reset();
    });
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuilderRow<'a> {
    route: &'a str,
    mp_min: &'a str,
    mp_max: &'a str,
    error: Option<String>,
}

/// What the route builder form renders: rows with their validation state,
/// whether Apply is enabled, and the live preview.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuilderModel<'a> {
    rows: Vec<BuilderRow<'a>>,
    can_apply: bool,
    preview_ids: Vec<u64>,
}

fn builder_model<'a>(builder: &'a RouteBuilder, cameras: &[Camera]) -> BuilderModel<'a> {
    BuilderModel {
        rows: builder
            .rows()
            .iter()
            .zip(builder.validation())
            .map(|(row, valid)| BuilderRow {
                route: &row.route,
                mp_min: &row.mp_min,
                mp_max: &row.mp_max,
                error: valid.err().map(|e| e.to_string()),
            })
            .collect(),
        can_apply: builder.can_apply(),
        preview_ids: builder.preview(cameras).iter().map(|c| c.id.get()).collect(),
    }
}

#[wasm_bindgen]
pub fn builder_state() -> Result<String, JsValue> {
    with_state(|s| to_json(&builder_model(&s.builder, s.catalog.cameras())))
}

#[wasm_bindgen]
pub fn builder_add_row() -> u32 {
    with_state(|s| s.builder.add_row() as u32)
}

#[wasm_bindgen]
pub fn builder_update_row(index: u32, route: String, mp_min: String, mp_max: String) -> bool {
    with_state(|s| {
        s.builder
            .update_row(index as usize, SegmentDraft::new(route, mp_min, mp_max))
    })
}

#[wasm_bindgen]
pub fn builder_remove_row(index: u32) -> bool {
    with_state(|s| s.builder.remove_row(index as usize))
}

#[wasm_bindgen]
pub fn builder_reset() {
    with_state(|s| s.builder.reset());
}

/// Applies the form. Returns the `multiRoute` value for the page to put in
/// the URL, or `None` while any row is invalid.
#[wasm_bindgen]
pub fn builder_apply() -> Option<String> {
    with_state(|s| {
        let applied = s.builder.apply()?;
        log(&format!("custom route applied: {}", applied.badges.join(", ")));
        s.segments = applied.segments;
        Some(applied.multi_route)
    })
}

#[wasm_bindgen]
pub fn curated_labels() -> Result<String, JsValue> {
    with_state(|s| {
        let labels: Vec<String> = curated_routes(&s.route_defs)
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        to_json(&labels)
    })
}

/// Activates curated route `index` (in [`curated_labels`] order) and returns
/// its `multiRoute` value.
#[wasm_bindgen]
pub fn select_curated(index: u32) -> Option<String> {
    with_state(|s| {
        let (_, segments) = curated_routes(&s.route_defs)
            .into_iter()
            .nth(index as usize)?;
        s.builder = RouteBuilder::from_segments(&segments);
        s.segments = segments;
        Some(serialize_multi_route(&s.segments))
    })
}

#[wasm_bindgen]
pub fn inactive_cameras() -> Result<String, JsValue> {
    with_state(|s| to_json(&filter::inactive(s.catalog.cameras())))
}

#[wasm_bindgen]
pub fn nearest_cameras(lat: f64, lon: f64, limit: Option<u32>) -> Result<String, JsValue> {
    let limit = limit.map_or(filter::DEFAULT_NEAREST_LIMIT, |l| l as usize);
    with_state(|s| {
        to_json(&filter::nearest(
            s.catalog.cameras(),
            LatLon::new(lat, lon),
            limit,
        ))
    })
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let resp = Request::get(url).send().await.map_err(js_err)?;
    if !resp.ok() {
        return Err(js_err(format!("{url}: HTTP {}", resp.status())));
    }
    resp.text().await.map_err(js_err)
}
