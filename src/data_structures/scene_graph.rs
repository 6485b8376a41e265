//! Scene graph of the loaded model.
//!
//! The glTF node tree is mirrored as owned [`SceneNode`]s. Geometry lives in a
//! flat list of [`GpuMesh`](crate::data_structures::model::GpuMesh)es that
//! mesh nodes refer to by index, which keeps the tree free of GPU handles:
//! traversal, material assignment and transform propagation are plain data
//! operations.

use cgmath::{Matrix4, SquareMatrix};
use log::warn;

use crate::{data_structures::instance::Instance, materials::MaterialBinding};

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Transform-only node.
    Group,
    /// Node drawing the listed primitives (indices into the mesh list).
    Mesh(Vec<usize>),
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub material: MaterialBinding,
    local: Instance,
    /// `parent_world * local`.
    world: Matrix4<f32>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            material: MaterialBinding::Original,
            local: Instance::default(),
            world: Matrix4::identity(),
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, primitives: Vec<usize>) -> Self {
        Self::new(name, NodeKind::Mesh(primitives))
    }

    pub fn with_local_transform(mut self, instance: Instance) -> Self {
        self.local = instance;
        self
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_))
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn get_children(&self) -> &Vec<SceneNode> {
        &self.children
    }

    pub fn get_children_mut(&mut self) -> &mut Vec<SceneNode> {
        &mut self.children
    }

    pub fn get_local_transform(&self) -> &Instance {
        &self.local
    }

    pub fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    pub fn get_world_transform(&self) -> &Matrix4<f32> {
        &self.world
    }

    /// Depth-first, parent before children.
    pub fn traverse<'a>(&'a self, visit: &mut dyn FnMut(&'a SceneNode)) {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    pub fn traverse_mut(&mut self, visit: &mut dyn FnMut(&mut SceneNode)) {
        visit(self);
        for child in self.children.iter_mut() {
            child.traverse_mut(visit);
        }
    }

    /// First node (depth-first) with the given name.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    pub fn count(&self) -> usize {
        let mut n = 0;
        self.traverse(&mut |_| n += 1);
        n
    }

    /// Recompute world transforms of this subtree from `parent`.
    pub fn update_world_transforms(&mut self, parent: &Matrix4<f32>) {
        self.world = parent * self.local.to_matrix();
        let world = self.world;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    pub fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Matrix4::identity());
    }

    /// Every mesh node with its world transform and material binding, in
    /// traversal order.
    pub fn collect_meshes(&self) -> Vec<MeshRef<'_>> {
        let mut meshes = Vec::new();
        self.traverse(&mut |node| match &node.kind {
            NodeKind::Mesh(primitives) if primitives.is_empty() => {
                warn!("Mesh node {:?} has no primitives and will not be drawn.", node.name);
            }
            NodeKind::Mesh(primitives) => meshes.push(MeshRef {
                name: &node.name,
                primitives,
                material: node.material,
                world: &node.world,
            }),
            NodeKind::Group => (),
        });
        meshes
    }
}

/// A drawable node as seen by the renderer.
#[derive(Debug)]
pub struct MeshRef<'a> {
    pub name: &'a str,
    pub primitives: &'a [usize],
    pub material: MaterialBinding,
    pub world: &'a Matrix4<f32>,
}
