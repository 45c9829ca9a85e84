//! Bindings for the mobile adjacency carousel.
//!
//! The page owns the DOM and the clock: it passes `performance.now()` as
//! `now_ms`, applies the returned view model to the drum element, forwards
//! `transitionend`, and calls [`carousel_tick`] at the deadline reported by
//! [`carousel_next_deadline`].

use catalog::Direction;
use carousel::{AdjacencyCarousel, CarouselConfig, Settled};
use foundation::Millis;
use runtime::SettleVia;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{camera_id, js_err, log, to_json, warn, with_state};

fn now(now_ms: f64) -> Millis {
    Millis::from_f64(now_ms)
}

fn report_settled(settled: Option<Settled>) -> bool {
    if let Some(done) = settled {
        log(&format!(
            "carousel settled on camera {} ({:?}, {} ms)",
            done.center, done.completed.via, done.completed.elapsed_ms
        ));
    }
    settled.is_some()
}

/// Replaces the carousel with one using `config_json` (camelCase
/// `CarouselConfig` fields; missing fields keep their defaults). Closes any
/// open session.
#[wasm_bindgen]
pub fn carousel_configure(config_json: &str) -> Result<(), JsValue> {
    let config: CarouselConfig = serde_json::from_str(config_json).map_err(js_err)?;
    with_state(|s| s.carousel = AdjacencyCarousel::new(config));
    Ok(())
}

/// Opens centered on camera `id` and returns the view model.
#[wasm_bindgen]
pub fn carousel_open(id: f64, now_ms: f64) -> Result<String, JsValue> {
    let id = camera_id(id)?;
    with_state(|s| {
        s.carousel
            .open(&s.catalog, id, now(now_ms))
            .map_err(js_err)?;
        to_json(&s.carousel.view(&s.catalog))
    })
}

/// Closes the carousel, releasing its timers. Returns how many were pending.
#[wasm_bindgen]
pub fn carousel_close(now_ms: f64) -> u32 {
    with_state(|s| s.carousel.close(now(now_ms)) as u32)
}

/// Button or key press. Returns `false` if the input was ignored.
#[wasm_bindgen]
pub fn carousel_rotate(forward: bool, now_ms: f64) -> bool {
    let dir = if forward {
        Direction::Forward
    } else {
        Direction::Backward
    };
    with_state(|s| s.carousel.rotate(&s.catalog, dir, now(now_ms)).is_ok())
}

#[wasm_bindgen]
pub fn carousel_wheel(delta_y: f64, now_ms: f64) -> bool {
    with_state(|s| {
        matches!(
            s.carousel.wheel(&s.catalog, delta_y, now(now_ms)),
            Ok(Some(_))
        )
    })
}

#[wasm_bindgen]
pub fn carousel_drag_start(y: f64, now_ms: f64) -> bool {
    with_state(|s| s.carousel.drag_start(&s.catalog, y, now(now_ms)).is_ok())
}

/// Returns the drum angle to apply without animation. Slot contents may
/// change; re-read [`carousel_view`].
#[wasm_bindgen]
pub fn carousel_drag_move(y: f64) -> Option<f64> {
    with_state(|s| s.carousel.drag_move(&s.catalog, y))
}

/// Returns `true` if the release started a rotation.
#[wasm_bindgen]
pub fn carousel_drag_end(now_ms: f64) -> bool {
    with_state(|s| s.carousel.drag_end(&s.catalog, now(now_ms)).is_some())
}

#[wasm_bindgen]
pub fn carousel_drag_cancel() {
    with_state(|s| s.carousel.drag_cancel(&s.catalog));
}

/// Forwarded `transitionend`. Returns `true` if it settled a rotation.
#[wasm_bindgen]
pub fn carousel_transition_end(now_ms: f64) -> bool {
    report_settled(with_state(|s| {
        s.carousel.transition_end(&s.catalog, now(now_ms))
    }))
}

/// Fallback timer callback. Returns `true` if it settled a rotation.
#[wasm_bindgen]
pub fn carousel_tick(now_ms: f64) -> bool {
    let settled = with_state(|s| s.carousel.tick(&s.catalog, now(now_ms)));
    if settled.is_some_and(|done| done.completed.via == SettleVia::Timeout) {
        warn("carousel transition did not report completion; settled by timeout");
    }
    report_settled(settled)
}

#[wasm_bindgen]
pub fn carousel_next_deadline() -> Option<f64> {
    with_state(|s| s.carousel.next_deadline().map(|m| m.0 as f64))
}

#[wasm_bindgen]
pub fn carousel_view() -> Result<String, JsValue> {
    with_state(|s| to_json(&s.carousel.view(&s.catalog)))
}

#[wasm_bindgen]
pub fn carousel_info() -> Result<String, JsValue> {
    with_state(|s| to_json(&s.carousel.info(&s.catalog)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventJson {
    at_ms: u64,
    kind: &'static str,
    message: String,
}

/// Viewer events since the last call, oldest first.
#[wasm_bindgen]
pub fn carousel_drain_events() -> Result<String, JsValue> {
    let events: Vec<EventJson> = with_state(|s| s.carousel.drain_events())
        .into_iter()
        .map(|e| EventJson {
            at_ms: e.at.0,
            kind: e.kind,
            message: e.message,
        })
        .collect();
    to_json(&events)
}
