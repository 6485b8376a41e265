//! Material roles and the name-based assignment pass.
//!
//! The model ships with placeholder materials. A fixed table maps mesh names
//! to one of three shared materials; one traversal rebinds every matching
//! mesh node.

use crate::data_structures::{
    color::Color, scene_graph::SceneNode, uniforms::PortalUniforms,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialRole {
    /// Unlit, sampling the baked lighting texture.
    Baked,
    /// Flat emissive colour for the lamp meshes.
    PointLight,
    /// Animated portal shader.
    Portal,
}

/// Which material a mesh node is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialBinding {
    /// The node keeps the materials its primitives were exported with.
    Original,
    Shared(MaterialRole),
}

/// Declarative mesh-name to material-role table.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialRules {
    rules: Vec<(MaterialRole, Vec<String>)>,
}

impl Default for MaterialRules {
    fn default() -> Self {
        Self::new()
            .with(MaterialRole::Baked, &["Plane003"])
            .with(MaterialRole::PointLight, &["Cube012", "Cube015"])
            .with(MaterialRole::Portal, &["Circle"])
    }
}

impl MaterialRules {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with(mut self, role: MaterialRole, names: &[&str]) -> Self {
        self.rules
            .push((role, names.iter().map(|n| n.to_string()).collect()));
        self
    }

    /// Role for a node name. When a name is listed for several roles the
    /// rule added last wins.
    pub fn role_for(&self, name: &str) -> Option<MaterialRole> {
        self.rules
            .iter()
            .rev()
            .find(|(_, names)| names.iter().any(|n| n == name))
            .map(|(role, _)| *role)
    }
}

/// Rebind every mesh node whose name is listed in `rules` to the shared
/// material of its role. Other nodes are left untouched, so running the pass
/// again changes nothing. Returns how many nodes were bound.
pub fn assign_materials(root: &mut SceneNode, rules: &MaterialRules) -> usize {
    let mut bound = 0;
    root.traverse_mut(&mut |node| {
        if !node.is_mesh() {
            return;
        }
        if let Some(role) = rules.role_for(&node.name) {
            node.material = MaterialBinding::Shared(role);
            bound += 1;
        }
    });
    log::info!("Assigned shared materials to {} mesh nodes", bound);
    bound
}

/// Shader material: a uniform set plus the render state the pipeline is built with.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderMaterial<U> {
    pub uniforms: U,
    pub transparent: bool,
    pub double_sided: bool,
}

/// The three materials shared by every node bound to a role.
#[derive(Clone, Debug, PartialEq)]
pub struct SharedMaterials {
    /// Path of the baked lighting texture the baked material samples.
    pub baked_map: String,
    pub point_light: Color,
    pub portal: ShaderMaterial<PortalUniforms>,
}

impl SharedMaterials {
    pub fn new(baked_map: &str, point_light: Color, portal_start: Color, portal_end: Color) -> Self {
        Self {
            baked_map: baked_map.to_string(),
            point_light,
            portal: ShaderMaterial {
                uniforms: PortalUniforms::new(portal_start, portal_end),
                transparent: true,
                double_sided: true,
            },
        }
    }
}
