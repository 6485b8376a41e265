#![allow(dead_code)]

use portal_scene::{
    data_structures::{instance::Instance, scene_graph::SceneNode},
    loading_bar::LoadingBar,
};

/// Loading bar that remembers every call instead of touching a page.
#[derive(Debug, Default)]
pub struct RecordingBar {
    pub scales: Vec<f32>,
    pub opacities: Vec<f32>,
    pub hide_calls: u32,
}

impl LoadingBar for RecordingBar {
    fn set_scale_x(&mut self, scale: f32) {
        self.scales.push(scale);
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacities.push(opacity);
    }

    fn hide(&mut self) {
        self.hide_calls += 1;
    }
}

pub fn assert_close(actual: f32, expected: f32, eps: f32) {
    assert!(
        (actual - expected).abs() <= eps,
        "expected {} to be within {} of {}",
        actual,
        eps,
        expected
    );
}

/// The node names the portal model ships with, plus one the rules don't know.
pub fn portal_like_tree() -> SceneNode {
    let mut root = SceneNode::group("Scene");
    let mut props = SceneNode::group("Props")
        .with_local_transform(Instance::from(cgmath::Vector3::new(0.0, 1.0, 0.0)));
    props.add_child(SceneNode::mesh("Cube012", vec![1]));
    props.add_child(SceneNode::mesh("Cube015", vec![2]));
    root.add_child(SceneNode::mesh("Plane003", vec![0]));
    root.add_child(props);
    root.add_child(SceneNode::mesh("Circle", vec![3]));
    root.add_child(SceneNode::mesh("Bench", vec![4]));
    root
}

/// A single triangle without indices or UVs, referenced by two nodes.
pub const TRIANGLE_GLTF: &str = r#"{
    "asset": { "version": "2.0" },
    "scene": 0,
    "scenes": [ { "nodes": [0] } ],
    "nodes": [
        { "name": "Root", "translation": [1.0, 0.0, 0.0], "children": [1, 2] },
        { "name": "Circle", "mesh": 0 },
        { "mesh": 0 }
    ],
    "meshes": [
        { "name": "PortalMesh", "primitives": [ { "attributes": { "POSITION": 0 } } ] }
    ],
    "buffers": [ { "byteLength": 36, "uri": "triangle.bin" } ],
    "bufferViews": [ { "buffer": 0, "byteOffset": 0, "byteLength": 36 } ],
    "accessors": [
        {
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0]
        }
    ]
}"#;

pub fn triangle_buffer() -> Vec<u8> {
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    bytemuck::cast_slice(&positions).to_vec()
}
