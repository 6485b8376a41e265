//! glTF binary model loading.
//!
//! Parsing is split from the upload: [`parse_document`] turns a glTF document
//! and its buffers into plain mesh data and a [`SceneNode`] tree,
//! [`ModelData::upload`] then creates the GPU buffers.

use anyhow::{Context, bail};

use crate::{
    config::AssetPaths,
    data_structures::{
        instance::Instance,
        model::{GpuMesh, ModelVertex},
        scene_graph::SceneNode,
    },
    resources::load_binary,
};

const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// CPU-side geometry of one glTF primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub material: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct ModelData {
    pub root: SceneNode,
    pub meshes: Vec<MeshData>,
    /// Base colour factor per glTF material index.
    pub base_colors: Vec<[f32; 4]>,
}

/// A model whose primitives live on the GPU. Mesh nodes in `root` index into
/// `meshes`.
#[derive(Debug)]
pub struct LoadedModel {
    pub root: SceneNode,
    pub meshes: Vec<GpuMesh>,
    pub base_colors: Vec<[f32; 4]>,
}

impl LoadedModel {
    /// Base colour of a primitive's own material, white when it has none.
    pub fn base_color(&self, mesh: &GpuMesh) -> [f32; 4] {
        mesh.material
            .and_then(|index| self.base_colors.get(index).copied())
            .unwrap_or([1.0; 4])
    }
}

impl ModelData {
    pub fn upload(self, device: &wgpu::Device) -> LoadedModel {
        let meshes = self
            .meshes
            .iter()
            .map(|mesh| GpuMesh::new(device, &mesh.name, &mesh.vertices, &mesh.indices, mesh.material))
            .collect();
        LoadedModel {
            root: self.root,
            meshes,
            base_colors: self.base_colors,
        }
    }
}

pub async fn load_model(
    device: &wgpu::Device,
    paths: &AssetPaths,
    file_name: &str,
) -> anyhow::Result<LoadedModel> {
    let bytes = load_binary(paths, file_name).await?;
    ensure_decodable(&bytes, file_name, &paths.decoder_path)?;
    let gltf = gltf::Gltf::from_slice(&bytes)
        .with_context(|| format!("Cannot parse {}", file_name))?;

    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .context("The model references a binary chunk it does not contain")?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                if uri.starts_with("data:") {
                    bail!("Embedded data URIs are not supported ({})", file_name);
                }
                let path = match file_name.rsplit_once('/') {
                    Some((dir, _)) => format!("{}/{}", dir, uri),
                    None => uri.to_string(),
                };
                buffer_data.push(load_binary(paths, &path).await?);
            }
        }
    }

    let data = parse_document(&gltf.document, &buffer_data)?;
    log::info!(
        "Loaded {} with {} nodes and {} primitives",
        file_name,
        data.root.count(),
        data.meshes.len()
    );
    Ok(data.upload(device))
}

fn requires_draco(document: &gltf::Document) -> bool {
    document.extensions_required().any(|ext| ext == DRACO_EXTENSION)
}

/// Refuse models whose geometry needs a Draco decoder before they reach the
/// validating parser. There is no decoder in this build, whatever
/// `decoder_path` points at.
pub fn ensure_decodable(bytes: &[u8], file_name: &str, decoder_path: &str) -> anyhow::Result<()> {
    let unchecked = gltf::Gltf::from_slice_without_validation(bytes)
        .with_context(|| format!("Cannot read {}", file_name))?;
    if requires_draco(&unchecked.document) {
        bail!(
            "{} requires {}, but no Draco decoder is available (configured decoder path {:?}); \
             export the model without Draco compression",
            file_name,
            DRACO_EXTENSION,
            decoder_path
        );
    }
    Ok(())
}

/// Build mesh data and the node tree of the default scene.
pub fn parse_document(document: &gltf::Document, buffers: &[Vec<u8>]) -> anyhow::Result<ModelData> {
    if requires_draco(document) {
        bail!("Draco-compressed geometry ({}) is not supported", DRACO_EXTENSION);
    }

    let base_colors = document
        .materials()
        .map(|material| material.pbr_metallic_roughness().base_color_factor())
        .collect();

    // primitives of glTF mesh i are meshes[primitive_ranges[i]]
    let mut meshes = Vec::new();
    let mut primitive_ranges = Vec::new();
    for mesh in document.meshes() {
        let start = meshes.len();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping primitive {} of mesh {:?}: only triangle lists are drawn",
                    primitive.index(),
                    mesh.name()
                );
                continue;
            }
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| b.as_slice()));
            let Some(positions) = reader.read_positions() else {
                log::warn!("Skipping primitive {} of mesh {:?}: no positions", primitive.index(), mesh.name());
                continue;
            };
            let mut vertices: Vec<ModelVertex> = positions
                .map(|position| ModelVertex {
                    position,
                    tex_coords: Default::default(),
                })
                .collect();
            if let Some(tex_coords) = reader.read_tex_coords(0).map(|v| v.into_f32()) {
                vertices
                    .iter_mut()
                    .zip(tex_coords)
                    .for_each(|(vertex, uv)| vertex.tex_coords = uv);
            }
            let indices = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };
            meshes.push(MeshData {
                name: mesh.name().unwrap_or_default().to_string(),
                vertices,
                indices,
                material: primitive.material().index(),
            });
        }
        primitive_ranges.push(start..meshes.len());
    }

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("The model contains no scene")?;
    let mut root = SceneNode::group("Scene");
    for node in scene.nodes() {
        root.add_child(to_scene_node(&node, &primitive_ranges));
    }
    root.update_world_transform_all();

    Ok(ModelData {
        root,
        meshes,
        base_colors,
    })
}

fn to_scene_node(node: &gltf::Node, primitive_ranges: &[std::ops::Range<usize>]) -> SceneNode {
    let name = node
        .name()
        .or_else(|| node.mesh().and_then(|mesh| mesh.name()))
        .unwrap_or_default();
    let mut scene_node = match node.mesh() {
        Some(mesh) => {
            let primitives = primitive_ranges
                .get(mesh.index())
                .cloned()
                .unwrap_or_default()
                .collect();
            SceneNode::mesh(name, primitives)
        }
        None => SceneNode::group(name),
    };

    let (translation, rotation, scale) = node.transform().decomposed();
    scene_node.set_local_transform(Instance {
        position: translation.into(),
        rotation: cgmath::Quaternion::new(rotation[3], rotation[0], rotation[1], rotation[2]),
        scale: scale.into(),
    });

    for child in node.children() {
        scene_node.add_child(to_scene_node(&child, primitive_ranges));
    }
    scene_node
}
