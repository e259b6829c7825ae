//! Browser bridge for weave-engine.
//!
//! One [`WeaveRunner`] lives in a `thread_local!`. JavaScript calls
//! `weave_init` once, feeds frame deltas to `weave_tick`, and reads the
//! tube, centerline, canvas and event buffers straight out of WASM memory
//! through the pointer/count accessors.

pub mod runner;

pub use runner::WeaveRunner;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use weave_engine::{Rgba, WeavingLayer};

thread_local! {
    static RUNNER: RefCell<Option<WeaveRunner>> = RefCell::new(None);
}

/// Run `f` against the runner, or return `None` before `weave_init`.
fn with_runner<R>(f: impl FnOnce(&mut WeaveRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("weave runner not initialized; call weave_init() first");
                None
            }
        }
    })
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Install logging and create the session from a `WeavingConfig` JSON string
/// (`"{}"` for defaults).
#[wasm_bindgen]
pub fn weave_init(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("weave: logger already installed"));
    }

    let runner = WeaveRunner::from_json(config_json).map_err(to_js)?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("weave: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn weave_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

/// Register a layer from JSON. Returns its index.
#[wasm_bindgen]
pub fn weave_add_layer(json: &str) -> Result<u32, JsValue> {
    let layer = WeavingLayer::from_json(json).map_err(to_js)?;
    with_runner(|r| r.add_layer(layer)).ok_or_else(|| to_js("weave runner not initialized"))
}

/// Register a layer from raw RGBA8 image bytes (bottom row first).
#[wasm_bindgen]
pub fn weave_add_layer_rgba(
    name: &str,
    thread_r: f32,
    thread_g: f32,
    thread_b: f32,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<u32, JsValue> {
    let color = Rgba::rgb(thread_r, thread_g, thread_b);
    let layer = WeavingLayer::from_rgba8(name, color, width, height, pixels).map_err(to_js)?;
    with_runner(|r| r.add_layer(layer)).ok_or_else(|| to_js("weave runner not initialized"))
}

#[wasm_bindgen]
pub fn weave_request_layer(index: u32) -> bool {
    with_runner(|r| r.request_weave(index)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn weave_request_reset() -> bool {
    with_runner(|r| r.request_reset()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn weave_set_config(json: &str) -> Result<(), JsValue> {
    with_runner(|r| r.on_config_changed(json))
        .ok_or_else(|| to_js("weave runner not initialized"))?
        .map_err(to_js)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_tube_vertices_ptr() -> *const f32 {
    with_runner(|r| r.tube_vertices_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_tube_vertex_count() -> u32 {
    with_runner(|r| r.tube_vertex_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_tube_vertex_floats() -> u32 {
    with_runner(|r| r.tube_vertex_floats()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_tube_indices_ptr() -> *const u32 {
    with_runner(|r| r.tube_indices_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_tube_index_count() -> u32 {
    with_runner(|r| r.tube_index_count()).unwrap_or(0)
}

/// Copy of the centerline as x, y, z triples.
#[wasm_bindgen]
pub fn get_centerline() -> js_sys::Float32Array {
    with_runner(|r| js_sys::Float32Array::from(r.centerline()))
        .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}

#[wasm_bindgen]
pub fn get_canvas_colors_ptr() -> *const f32 {
    with_runner(|r| r.canvas_colors_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_grid_size() -> u32 {
    with_runner(|r| r.grid_size()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_block_size() -> f32 {
    with_runner(|r| r.block_size()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    with_runner(|r| r.events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_events_len() -> u32 {
    with_runner(|r| r.events_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_is_weaving() -> bool {
    with_runner(|r| r.is_weaving()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn get_thread_state() -> u32 {
    with_runner(|r| r.thread_state()).unwrap_or(0)
}

/// Thread color as [r, g, b, a].
#[wasm_bindgen]
pub fn get_thread_color() -> Vec<f32> {
    with_runner(|r| r.thread_color().to_array().to_vec()).unwrap_or_default()
}

// ---- Stroke accessors (vectors feature) ----

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_stroke_vertices_ptr() -> *const f32 {
    with_runner(|r| r.stroke_vertices_ptr()).unwrap_or(std::ptr::null())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_stroke_vertex_count() -> u32 {
    with_runner(|r| r.stroke_vertex_count()).unwrap_or(0)
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_stroke_vertex_floats() -> u32 {
    with_runner(|r| r.stroke_vertex_floats()).unwrap_or(0)
}
