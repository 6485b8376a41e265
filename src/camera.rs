//! Perspective camera and the damped orbit controller.
//!
//! The controller keeps the camera on a sphere around a fixed target. Drag
//! input accumulates a spherical delta; every frame a fraction of that delta
//! (the damping factor) is applied and the rest decays, so the camera keeps
//! gliding after the pointer is released.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const EPS: f32 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P, target: P) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(aspect: f32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Camera matrices as the shaders see them. The fireflies need view and
/// projection separately to build camera-facing quads.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        Self {
            view: identity,
            proj: identity,
            view_proj: identity,
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        let view = camera.calc_matrix();
        let proj = projection.calc_matrix();
        self.view = view.into();
        self.proj = proj.into();
        self.view_proj = (proj * view).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Radius and angles of a point around the orbit target. `phi` is measured
/// from +y, `theta` around y starting at +z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vector3<f32>) -> Self {
        let radius = offset.magnitude();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(&self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

#[derive(Debug)]
pub struct OrbitController {
    damping_factor: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    enable_zoom: bool,
    min_distance: f32,
    max_distance: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    element_height: f32,
    dragging: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
}

impl OrbitController {
    pub fn new(damping_factor: f32, rotate_speed: f32, enable_zoom: bool) -> Self {
        Self {
            damping_factor: damping_factor.clamp(0.0, 1.0),
            rotate_speed,
            zoom_speed: 1.0,
            enable_zoom,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            element_height: 1.0,
            dragging: false,
            last_cursor: None,
        }
    }

    /// Height of the drawable in the same unit as cursor positions. A drag
    /// across the full height turns the camera by one full revolution.
    pub fn set_element_height(&mut self, height: f32) {
        self.element_height = height.max(1.0);
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
                if !self.dragging {
                    self.last_cursor = None;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.dragging {
                    if let Some(last) = self.last_cursor {
                        self.handle_drag((position.x - last.x) as f32, (position.y - last.y) as f32);
                    }
                    self.last_cursor = Some(*position);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.dragging = false;
                self.last_cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.handle_scroll(amount);
            }
            _ => (),
        }
    }

    /// Pointer movement in pixels while the rotate button is held.
    pub fn handle_drag(&mut self, dx: f32, dy: f32) {
        let full_turn = 2.0 * PI * self.rotate_speed / self.element_height;
        self.delta_theta -= dx * full_turn;
        self.delta_phi -= dy * full_turn;
    }

    /// Positive amounts (wheel away from the user) move the camera closer.
    pub fn handle_scroll(&mut self, amount: f32) {
        if !self.enable_zoom || amount == 0.0 {
            return;
        }
        let step = 0.95f32.powf(self.zoom_speed);
        if amount > 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Apply the damped part of the pending rotation and zoom to `camera`.
    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.position - camera.target;
        let mut spherical = Spherical::from_offset(offset);

        if self.damping_factor > 0.0 {
            spherical.theta += self.delta_theta * self.damping_factor;
            spherical.phi += self.delta_phi * self.damping_factor;
        } else {
            spherical.theta += self.delta_theta;
            spherical.phi += self.delta_phi;
        }
        spherical.phi = spherical.phi.clamp(EPS, PI - EPS);
        spherical.radius =
            (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.position = camera.target + spherical.to_offset();

        if self.damping_factor > 0.0 {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;
    }

    /// Rotation still waiting to be applied, as (theta, phi).
    pub fn pending_rotation(&self) -> (f32, f32) {
        (self.delta_theta, self.delta_phi)
    }
}

/// Camera state plus its GPU buffer and bind group.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    /// Step the controller and upload the new matrices.
    pub fn update(&mut self, projection: &Projection, queue: &wgpu::Queue) {
        self.controller.update(&mut self.camera);
        self.uniform.update_view_proj(&self.camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
