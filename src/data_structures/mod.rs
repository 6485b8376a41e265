//! Scene data: colours, transforms, meshes, particles, uniforms, textures and
//! the scene graph.
//!
//! - `color` is the linear colour type and hex parsing
//! - `instance` holds node transforms and their GPU layout
//! - `model` contains vertex layouts, GPU meshes and generated geometry
//! - `particles` generates the firefly field
//! - `scene_graph` mirrors the glTF node tree
//! - `texture` wraps GPU textures and render targets
//! - `uniforms` names the shader uniforms and their GPU layouts

pub mod color;
pub mod instance;
pub mod model;
pub mod particles;
pub mod scene_graph;
pub mod texture;
pub mod uniforms;
