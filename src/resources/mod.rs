//! Asset loading: raw bytes from disk natively, over HTTP on the web.

pub mod texture;

#[cfg(target_arch = "wasm32")]
fn format_url(asset_root: &str, file_name: &str) -> anyhow::Result<reqwest::Url> {
    use crate::error::TableauError;

    let window = web_sys::window().ok_or_else(|| TableauError::missing("browser window"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| TableauError::missing("page origin"))?;
    let base = reqwest::Url::parse(&format!("{origin}/{asset_root}/"))?;
    Ok(base.join(file_name)?)
}

pub async fn load_binary(asset_root: &str, file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(asset_root, file_name)?;
        let response = reqwest::get(url).await?.error_for_status()?;
        response.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new(asset_root).join(file_name);
        tokio::fs::read(path).await?
    };

    Ok(data)
}
