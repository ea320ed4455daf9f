//! Perspective camera, orbit controller and the camera uniform.
//!
//! The camera orbits a target at a given distance, yaw and pitch. Dragging
//! with the left button turns it around the target, dragging with the right
//! button slides the target across the view plane and the wheel zooms.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use crate::config::CameraConfig;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Keeps the eye off the poles, where the view matrix degenerates.
const SAFE_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.001;
const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: Vector3<f32>,
}

impl Camera {
    /// An orbit camera whose eye starts exactly at `eye`.
    pub fn looking_at(eye: [f32; 3], target: [f32; 3]) -> Self {
        let target = Vector3::from(target);
        let offset = Vector3::from(eye) - target;
        let distance = offset.magnitude().max(MIN_DISTANCE);
        Self {
            distance,
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            yaw: offset.x.atan2(offset.z),
            target,
        }
    }

    pub fn eye(&self) -> Point3<f32> {
        let offset = Vector3::new(
            self.distance * self.yaw.sin() * self.pitch.cos(),
            self.distance * self.pitch.sin(),
            self.distance * self.yaw.cos() * self.pitch.cos(),
        );
        Point3::from_vec(self.target + offset)
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye(), Point3::from_vec(self.target), Vector3::unit_y())
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw += delta;
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-SAFE_PITCH, SAFE_PITCH);
    }

    pub fn add_distance(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Moves the target, and the eye with it, along the view's right and up axes.
    pub fn pan(&mut self, right: f32, up: f32) {
        let forward = (self.target - self.eye().to_vec()).normalize();
        let side = forward.cross(Vector3::unit_y()).normalize();
        let up_axis = side.cross(forward);
        self.target += side * right + up_axis * up;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn from_config(width: u32, height: u32, config: &CameraConfig) -> Self {
        Self::new(
            width,
            height,
            cgmath::Deg(config.fovy_degrees),
            config.znear,
            config.zfar,
        )
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.eye().to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Orbit,
    Pan,
}

/// Accumulates drag and wheel input between frames.
#[derive(Debug)]
pub struct OrbitController {
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    drag: Option<Drag>,
    last_cursor: Option<PhysicalPosition<f64>>,
    rotate: (f32, f32),
    pan: (f32, f32),
    zoom: f32,
}

impl OrbitController {
    /// `pan_speed` is scaled by the camera distance, so a drag moves the
    /// scene by roughly the same share of the view at any zoom.
    pub fn new(rotate_speed: f32, pan_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            pan_speed,
            zoom_speed,
            drag: None,
            last_cursor: None,
            rotate: (0.0, 0.0),
            pan: (0.0, 0.0),
            zoom: 0.0,
        }
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let drag = match button {
                    MouseButton::Left => Drag::Orbit,
                    MouseButton::Right => Drag::Pan,
                    _ => return,
                };
                match state {
                    ElementState::Pressed => self.drag = Some(drag),
                    ElementState::Released if self.drag == Some(drag) => self.drag = None,
                    ElementState::Released => (),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(last) = self.last_cursor {
                    let (dx, dy) = ((position.x - last.x) as f32, (position.y - last.y) as f32);
                    match self.drag {
                        Some(Drag::Orbit) => {
                            self.rotate.0 -= dx;
                            self.rotate.1 += dy;
                        }
                        // the scene follows the pointer, so the target moves against it
                        Some(Drag::Pan) => {
                            self.pan.0 -= dx;
                            self.pan.1 += dy;
                        }
                        None => (),
                    }
                }
                self.last_cursor = Some(*position);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.zoom -= match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 20.0,
                };
            }
            _ => (),
        }
    }

    /// Applies and clears the input gathered since the last call.
    pub fn update_camera(&mut self, camera: &mut Camera) {
        camera.add_yaw(self.rotate.0 * self.rotate_speed);
        camera.add_pitch(self.rotate.1 * self.rotate_speed);
        let pan_scale = self.pan_speed * camera.distance;
        camera.pan(self.pan.0 * pan_scale, self.pan.1 * pan_scale);
        camera.add_distance(self.zoom * self.zoom_speed);
        self.rotate = (0.0, 0.0);
        self.pan = (0.0, 0.0);
        self.zoom = 0.0;
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_reproduces_the_start_eye() {
        let camera = Camera::looking_at([-7.0, 8.0, 20.0], [0.0, 0.0, 0.0]);
        let eye = camera.eye();
        assert!((eye.x + 7.0).abs() < 1e-4);
        assert!((eye.y - 8.0).abs() < 1e-4);
        assert!((eye.z - 20.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_stops_short_of_the_poles() {
        let mut camera = Camera::looking_at([0.0, 0.0, 10.0], [0.0, 0.0, 0.0]);
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.add_distance(-100.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut projection = Projection::new(800, 600, cgmath::Deg(45.0), 0.1, 1000.0);
        projection.resize(1024, 768);
        assert!((projection.aspect() - 1024.0 / 768.0).abs() < 1e-6);
        projection.resize(1024, 0);
        assert!((projection.aspect() - 1.3333334).abs() < 1e-6);
    }

    #[test]
    fn controller_consumes_input_once() {
        let mut controller = OrbitController::new(0.01, 0.01, 1.0);
        let mut camera = Camera::looking_at([0.0, 0.0, 10.0], [0.0, 0.0, 0.0]);
        controller.zoom = 2.0;
        controller.rotate = (10.0, 0.0);
        controller.update_camera(&mut camera);
        assert!((camera.distance - 12.0).abs() < 1e-5);
        assert!((camera.yaw - 0.1).abs() < 1e-6);
        controller.update_camera(&mut camera);
        assert!((camera.distance - 12.0).abs() < 1e-5);
    }

    #[test]
    fn pan_slides_target_and_eye_together() {
        let mut camera = Camera::looking_at([0.0, 0.0, 10.0], [0.0, 0.0, 0.0]);
        camera.pan(2.0, 3.0);
        assert!((camera.target - Vector3::new(2.0, 3.0, 0.0)).magnitude() < 1e-5);
        let eye = camera.eye();
        assert!((eye.to_vec() - Vector3::new(2.0, 3.0, 10.0)).magnitude() < 1e-4);
        assert!((camera.distance - 10.0).abs() < 1e-6);
    }

    #[test]
    fn pan_scales_with_distance() {
        let mut controller = OrbitController::new(0.01, 0.01, 1.0);
        let mut camera = Camera::looking_at([0.0, 0.0, 10.0], [0.0, 0.0, 0.0]);
        controller.pan = (10.0, -5.0);
        controller.update_camera(&mut camera);
        assert!((camera.target - Vector3::new(1.0, -0.5, 0.0)).magnitude() < 1e-5);
        assert!(camera.yaw.abs() < 1e-6 && camera.pitch.abs() < 1e-6);
        controller.update_camera(&mut camera);
        assert!((camera.target - Vector3::new(1.0, -0.5, 0.0)).magnitude() < 1e-5);
    }
}
