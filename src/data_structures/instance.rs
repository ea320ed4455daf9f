//! Rigid transforms and their GPU representation.
//!
//! Parts and groups carry a translation and a rotation, never a scale. The world
//! transform of a part is the product of its ancestors' local transforms and
//! its own, packed into an [`InstanceRaw`] for instanced drawing.

use std::ops::Mul;

use cgmath::{Deg, InnerSpace, One, Quaternion, Rotation3, Vector3};

use crate::data_structures::model;

/// Translation plus rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Instance {
    /// The identity transform.
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
        }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::new()
        }
    }

    /// Replaces the rotation with Euler angles applied in X, Y, Z order
    /// (intrinsic), i.e. the matrix `Rx * Ry * Rz`.
    pub fn with_euler(mut self, x: Deg<f32>, y: Deg<f32>, z: Deg<f32>) -> Self {
        self.rotation =
            Quaternion::from_angle_x(x) * Quaternion::from_angle_y(y) * Quaternion::from_angle_z(z);
        self
    }

    /// Replaces the rotation with a turn about the vertical axis.
    pub fn with_yaw(self, yaw: Deg<f32>) -> Self {
        self.with_euler(Deg(0.0), yaw, Deg(0.0))
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position) * cgmath::Matrix4::from(self.rotation)
    }

    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.to_matrix().into(),
            // rigid transforms keep normals orthogonal, so the rotation is the normal matrix
            normal: cgmath::Matrix3::from(self.rotation).into(),
        }
    }
}

impl<'a, 'b> Mul<&'b Instance> for &'a Instance {
    type Output = Instance;

    fn mul(self, rhs: &'b Instance) -> Self::Output {
        Instance {
            position: self.position + self.rotation * rhs.position,
            // renormalise so long chains do not drift
            rotation: (self.rotation * rhs.rotation).normalize(),
        }
    }
}

impl Mul<Instance> for Instance {
    type Output = Self;

    fn mul(self, rhs: Instance) -> Self::Output {
        &self * &rhs
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * The raw instance is the actual data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
}

impl InstanceRaw {
    /// World space translation, the last column of the model matrix.
    pub fn translation(&self) -> [f32; 3] {
        let [x, y, z, _] = self.model[3];
        [x, y, z]
    }
}

/**
 * Vertex slots 5..=8 hold the model matrix (a mat4 is four vec4s), slots 9..=11
 * the normal matrix.
 */
impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // advance once per instance instead of once per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn composition_rotates_the_child_offset() {
        let parent = Instance::at(0.0, 0.0, 4.0).with_yaw(Deg(180.0));
        let child = Instance::at(0.0, 0.0, 2.0);
        let world = parent * child;
        assert!(close(world.position, Vector3::new(0.0, 0.0, 2.0)));
    }

    #[test]
    fn euler_order_matches_x_then_y_then_z() {
        // Rz first moves +x to +y, Ry leaves +y alone, Rx(90) then takes +y to +z
        let turn = Instance::new().with_euler(Deg(90.0), Deg(0.0), Deg(90.0));
        let moved = turn.rotation * Vector3::unit_x();
        assert!(close(moved, Vector3::unit_z()));
    }

    #[test]
    fn raw_translation_is_the_world_position() {
        let raw = Instance::at(1.0, 2.0, 3.0).with_yaw(Deg(45.0)).to_raw();
        assert_eq!(raw.translation(), [1.0, 2.0, 3.0]);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 25 * 4);
    }
}
