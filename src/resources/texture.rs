use crate::{
    data_structures::{model::Material, texture::Texture},
    palette::{Finish, FinishName},
    resources::load_binary,
};

/// Drawn in place of a finish texture that could not be loaded, so the tint
/// alone shades the part.
pub const PLACEHOLDER_TEXEL: [u8; 4] = [255, 255, 255, 255];

pub async fn load_texture(
    asset_root: &str,
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(asset_root, file_name).await?;
    Texture::from_bytes(device, queue, &data, file_name)
}

/// Loads the finish's texture, falling back to a white texel when the asset
/// is missing or does not decode.
pub async fn load_finish_texture(
    asset_root: &str,
    finish: &Finish,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> Texture {
    match load_texture(asset_root, finish.texture(), device, queue).await {
        Ok(texture) => texture,
        Err(e) => {
            log::warn!(
                "texture {} unavailable ({e}); using the flat placeholder",
                finish.texture()
            );
            Texture::create_solid(device, queue, PLACEHOLDER_TEXEL, finish.texture())
        }
    }
}

pub async fn load_material(
    asset_root: &str,
    name: FinishName,
    finish: &Finish,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> Material {
    let diffuse = load_finish_texture(asset_root, finish, device, queue).await;
    Material::new(device, &format!("{name:?}"), diffuse, finish.tint(), layout)
}
