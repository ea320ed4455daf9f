//! Render pipelines and the uniforms they bind.

pub mod basic;
pub mod light;

#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub material_layout: wgpu::BindGroupLayout,
}
