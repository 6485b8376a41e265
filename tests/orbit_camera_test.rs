use std::f32::consts::PI;

use cgmath::{InnerSpace, Point3, Vector3};
use common::test_utils::assert_close;
use portal_scene::{
    camera::{Camera, OrbitController, Spherical},
    viewport::{Viewport, clamp_pixel_ratio},
};
use winit::dpi::PhysicalSize;

mod common;

fn portal_camera() -> Camera {
    Camera::new(Point3::new(8.0, 8.0, -8.0), Point3::new(0.0, 0.0, 0.0))
}

fn distance(camera: &Camera) -> f32 {
    (camera.position - camera.target).magnitude()
}

#[test]
fn should_convert_offsets_to_spherical_and_back() {
    let offset = Vector3::new(8.0, 8.0, -8.0);
    let back = Spherical::from_offset(offset).to_offset();
    assert_close(back.x, offset.x, 1e-4);
    assert_close(back.y, offset.y, 1e-4);
    assert_close(back.z, offset.z, 1e-4);
}

#[test]
fn should_apply_only_the_damped_share_per_frame() {
    let mut camera = portal_camera();
    let mut controller = OrbitController::new(0.05, 1.0, true);
    controller.set_element_height(800.0);

    controller.handle_drag(100.0, 0.0);
    let (theta, phi) = controller.pending_rotation();
    assert_close(theta, -PI / 4.0, 1e-6);
    assert_eq!(phi, 0.0);

    controller.update(&mut camera);
    let (theta, _) = controller.pending_rotation();
    assert_close(theta, -PI / 4.0 * 0.95, 1e-6);
}

#[test]
fn should_glide_to_rest_after_a_drag() {
    let mut camera = portal_camera();
    let radius = distance(&camera);
    let mut controller = OrbitController::new(0.05, 1.0, true);
    controller.set_element_height(800.0);

    // a quarter of the height turns the camera by a quarter turn in total
    controller.handle_drag(200.0, 0.0);
    for _ in 0..400 {
        controller.update(&mut camera);
    }

    let (theta, phi) = controller.pending_rotation();
    assert!(theta.abs() < 1e-6);
    assert!(phi.abs() < 1e-6);
    assert_close(distance(&camera), radius, 1e-3);
    // a quarter turn about y carries (8, 8, -8) to (8, 8, 8)
    assert_close(camera.position.x, 8.0, 1e-2);
    assert_close(camera.position.y, 8.0, 1e-2);
    assert_close(camera.position.z, 8.0, 1e-2);
}

#[test]
fn should_never_flip_over_the_poles() {
    let mut camera = portal_camera();
    let mut controller = OrbitController::new(0.05, 1.0, true);
    controller.set_element_height(100.0);

    controller.handle_drag(0.0, -10_000.0);
    for _ in 0..200 {
        controller.update(&mut camera);
        // crossing the pole would swap the signs of x and z
        assert!(camera.position.x > 0.0 && camera.position.z < 0.0);
        assert!(camera.position.y < 0.0);
    }
}

#[test]
fn should_zoom_by_a_fixed_step_per_wheel_notch() {
    let mut camera = portal_camera();
    let radius = distance(&camera);
    let mut controller = OrbitController::new(0.05, 1.0, true);

    controller.handle_scroll(1.0);
    controller.update(&mut camera);
    assert_close(distance(&camera), radius * 0.95, 1e-3);

    controller.handle_scroll(-1.0);
    controller.update(&mut camera);
    assert_close(distance(&camera), radius, 1e-3);
}

#[test]
fn should_ignore_the_wheel_when_zoom_is_disabled() {
    let mut camera = portal_camera();
    let radius = distance(&camera);
    let mut controller = OrbitController::new(0.05, 1.0, false);

    controller.handle_scroll(3.0);
    controller.update(&mut camera);
    assert_close(distance(&camera), radius, 1e-4);
}

#[test]
fn should_cap_the_pixel_ratio() {
    assert_eq!(clamp_pixel_ratio(3.0, 2.0), 2.0);
    assert_eq!(clamp_pixel_ratio(1.5, 2.0), 1.5);

    let viewport = Viewport::new(1920.0, 1080.0, 3.0, 2.0);
    assert_eq!(viewport.pixel_ratio, 2.0);
    assert_eq!(viewport.surface_size(), PhysicalSize::new(3840, 2160));
    assert_close(viewport.aspect(), 16.0 / 9.0, 1e-6);
}

#[test]
fn should_derive_viewport_from_the_window() {
    let viewport = Viewport::from_physical(PhysicalSize::new(1600, 1200), 2.0, 2.0);
    assert_eq!(viewport.width, 800.0);
    assert_eq!(viewport.height, 600.0);
    assert_eq!(viewport.surface_size(), PhysicalSize::new(1600, 1200));

    // above the cap the surface shrinks below the window's physical size
    let dense = Viewport::from_physical(PhysicalSize::new(3000, 1500), 3.0, 2.0);
    assert_eq!(dense.surface_size(), PhysicalSize::new(2000, 1000));
}

#[test]
fn should_survive_a_minimised_window() {
    let viewport = Viewport::new(800.0, 0.0, 1.0, 2.0);
    assert!(viewport.is_empty());
    assert_eq!(viewport.aspect(), 1.0);
    assert_eq!(viewport.surface_size(), PhysicalSize::new(800, 1));
}

#[test]
fn should_fit_the_surface_into_the_texture_limit() {
    // 1280x800 at a pixel ratio of 2 against a WebGL2 limit of 2048
    let viewport = Viewport::new(1280.0, 800.0, 2.0, 2.0);
    assert_eq!(viewport.surface_size(), PhysicalSize::new(2560, 1600));
    assert_eq!(viewport.surface_size_within(2048), PhysicalSize::new(2048, 1280));
    assert_close(viewport.aspect(), 1.6, 1e-6);

    // small enough surfaces pass through untouched
    assert_eq!(viewport.surface_size_within(8192), PhysicalSize::new(2560, 1600));

    let tall = Viewport::new(400.0, 3000.0, 1.0, 2.0);
    let size = tall.surface_size_within(2048);
    assert_eq!(size.height, 2048);
    assert!(size.width <= 2048 && size.width >= 1);
}
