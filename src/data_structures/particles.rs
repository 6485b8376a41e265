//! Firefly particle field.
//!
//! Positions and per-particle phases are generated once at start-up and never
//! change; the shader animates them from the shared time uniform.

use std::ops::Range;

use rand::Rng;

use crate::data_structures::model::Vertex;

pub const FIREFLY_COUNT: usize = 50;

/// The slab particles are scattered in.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleBounds {
    pub x: Range<f32>,
    pub y: Range<f32>,
    pub z: Range<f32>,
}

impl Default for ParticleBounds {
    fn default() -> Self {
        Self {
            x: -5.0..5.0,
            y: 0.0..5.0,
            z: -5.0..5.0,
        }
    }
}

impl ParticleBounds {
    pub fn contains(&self, p: [f32; 3]) -> bool {
        within(&self.x, p[0]) && within(&self.y, p[1]) && within(&self.z, p[2])
    }
}

// Closed on both ends so an exact upper bound from float rounding still counts.
fn within(range: &Range<f32>, v: f32) -> bool {
    v >= range.start && v <= range.end
}

/// Two parallel arrays: one position triple and one phase scalar per particle.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleField {
    pub positions: Vec<[f32; 3]>,
    pub phases: Vec<f32>,
}

impl ParticleField {
    pub fn generate<R: Rng>(count: usize, bounds: &ParticleBounds, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut phases = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push([
                sample(rng, &bounds.x),
                sample(rng, &bounds.y),
                sample(rng, &bounds.z),
            ]);
            phases.push(rng.gen_range(0.0..1.0));
        }
        Self { positions, phases }
    }

    pub fn random(count: usize, bounds: &ParticleBounds) -> Self {
        Self::generate(count, bounds, &mut rand::thread_rng())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn to_raw(&self) -> Vec<ParticleRaw> {
        self.positions
            .iter()
            .zip(self.phases.iter())
            .map(|(&position, &phase)| ParticleRaw { position, phase })
            .collect()
    }
}

fn sample<R: Rng>(rng: &mut R, range: &Range<f32>) -> f32 {
    if range.is_empty() {
        return range.start;
    }
    rng.gen_range(range.clone())
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleRaw {
    pub position: [f32; 3],
    pub phase: f32,
}

impl Vertex for ParticleRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ParticleRaw>() as wgpu::BufferAddress,
            // each particle is a camera-facing quad expanded from the vertex index
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}
