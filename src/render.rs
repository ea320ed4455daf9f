//! Draw batches handed from the flow to the renderer.
//!
//! Every frame the flow returns its [`Instanced`] draws and the frame loop
//! issues them all with the basic pipeline.

use crate::data_structures::model::{Material, Mesh};

/// One instanced draw: a mesh, the material it is shaded with and the
/// instance buffer holding `amount` world transforms.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub mesh: &'a Mesh,
    pub material: &'a Material,
    pub amount: usize,
}
