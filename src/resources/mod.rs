//! Asset loading.
//!
//! Assets are fetched from `<assets_root>/<path>` natively and relative to
//! the page origin on the web. [`load_assets`] loads the model and the baked
//! texture side by side and reports aggregate progress as each finishes.

use anyhow::{Context, bail};
use futures::{FutureExt, StreamExt, future::Either, stream::FuturesUnordered};

use crate::{
    config::AssetPaths,
    data_structures::texture::Texture,
    resources::{gltf::LoadedModel, progress::{LoadingManager, Progress}},
};

pub mod gltf;
pub mod progress;
pub mod texture;

/// Number of assets [`load_assets`] registers before it starts.
pub const ASSET_COUNT: usize = 2;

/// Everything the scene needs from disk or the network.
#[derive(Debug)]
pub struct LoadedAssets {
    pub model: LoadedModel,
    pub baked: Texture,
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("No browser window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("Cannot read the page origin: {:?}", e))?;
    let base = reqwest::Url::parse(&format!("{}/", origin))?;
    Ok(base.join(file_name.trim_start_matches('/'))?)
}

#[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
pub async fn load_binary(paths: &AssetPaths, file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url.clone())
            .await
            .with_context(|| format!("Request for {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Server refused {}", url))?
            .bytes()
            .await?
            .to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new(&paths.assets_root).join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("Cannot read {}", path.display()))?
    };
    #[cfg(target_arch = "wasm32")]
    let _ = paths;

    Ok(data)
}

enum Loaded {
    Model(LoadedModel),
    Baked(Texture),
}

/// Load the model and the baked texture concurrently. Both are registered up
/// front, so `on_progress` sees 1/2 and then 2/2 in completion order; a
/// failure stops before the ratio reaches 1.
pub async fn load_assets(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    paths: &AssetPaths,
    mut on_progress: impl FnMut(Progress),
) -> anyhow::Result<LoadedAssets> {
    let mut manager = LoadingManager::new(ASSET_COUNT);
    log::info!(
        "Loading model {} and baked texture {}",
        paths.model,
        paths.baked_texture
    );

    let model = gltf::load_model(device, paths, &paths.model).map(|result| {
        result
            .with_context(|| format!("Loading model {}", paths.model))
            .map(Loaded::Model)
    });
    let baked = texture::load_texture(device, queue, paths, &paths.baked_texture).map(|result| {
        result
            .with_context(|| format!("Loading texture {}", paths.baked_texture))
            .map(Loaded::Baked)
    });
    let mut pending: FuturesUnordered<_> = [Either::Left(model), Either::Right(baked)]
        .into_iter()
        .collect();

    let (mut model, mut baked) = (None, None);
    while let Some(loaded) = pending.next().await {
        match loaded? {
            Loaded::Model(loaded) => model = Some(loaded),
            Loaded::Baked(loaded) => baked = Some(loaded),
        }
        on_progress(manager.item_loaded());
    }

    match (model, baked) {
        (Some(model), Some(baked)) => Ok(LoadedAssets { model, baked }),
        _ => bail!("Loading ended before every asset arrived"),
    }
}
