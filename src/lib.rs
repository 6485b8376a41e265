//! portal-scene
//!
//! A small 3D scene with baked lighting: a glTF model textured with a single
//! baked map, an animated portal surface, a cloud of fireflies and an orbit
//! camera. It runs natively and in the browser (WebGL2). While the assets
//! load, an opaque overlay covers the canvas and a loading bar reports
//! progress; once everything is in, the bar and the overlay fade away.
//!
//! High-level modules
//! - `camera`: camera, projection, damped orbit controller and uniforms
//! - `config`: scene constants (asset paths, palette, camera, fireflies)
//! - `context`: window, surface, device and the resize path
//! - `data_structures`: colours, instances, meshes, particles, scene graph
//! - `debug_panel`: colour tweaks for the clear colour and the portal
//! - `flow`: the event loop tying loading, input and rendering together
//! - `loading_bar`, `transition`: load progress and the fade-out sequence
//! - `materials`: name-based material assignment for the loaded model
//! - `pipelines`: render pipelines and their shaders
//! - `resources`: asset fetching, texture and glTF loading
//! - `render`, `scene`: per-frame draw list and scene state
//! - `stats`, `viewport`: frame rate log and pixel-ratio capped sizing
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod debug_panel;
pub mod flow;
pub mod loading_bar;
pub mod materials;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod stats;
pub mod transition;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    flow::run(config::SceneConfig::default()).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
