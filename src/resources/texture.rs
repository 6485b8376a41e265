use crate::{config::AssetPaths, data_structures::texture::Texture, resources::load_binary};

/// Fetch an image asset and upload it as an sRGB texture. The file extension
/// picks the decoder; unknown extensions fall back to content sniffing.
pub async fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    paths: &AssetPaths,
    file_name: &str,
) -> anyhow::Result<Texture> {
    let data = load_binary(paths, file_name).await?;
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext);
    Texture::from_bytes(device, queue, &data, file_name, extension)
}
