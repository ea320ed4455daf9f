use wgpu::util::DeviceExt;

use crate::config::LightingConfig;

/// Hemisphere fill plus one directional key light, bound as fixed scene
/// dressing. The basic material is unlit and does not read it.
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub key_position: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    pub key_colour: [f32; 3],
    _padding2: u32,
    pub sky: [f32; 3],
    _padding3: u32,
    pub ground: [f32; 3],
    _padding4: u32,
}

impl From<&LightingConfig> for LightUniform {
    fn from(config: &LightingConfig) -> Self {
        Self {
            key_position: config.key_position,
            _padding: 0,
            key_colour: config.key_colour,
            _padding2: 0,
            sky: config.sky,
            _padding3: 0,
            ground: config.ground,
            _padding4: 0,
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}

impl LightResources {
    pub fn new(device: &wgpu::Device, lighting: &LightingConfig) -> Self {
        let uniform = LightUniform::from(lighting);
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableauConfig;

    #[test]
    fn uniform_is_four_aligned_rows() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 64);
        let config = TableauConfig::default();
        let uniform = LightUniform::from(&config.lighting);
        assert_eq!(uniform.key_position, [10.0, 10.0, 10.0]);
        assert!(uniform.key_colour.iter().all(|c| (c - 1.0).abs() < 1e-6));
        assert_eq!(uniform.sky, config.lighting.sky);
    }
}
