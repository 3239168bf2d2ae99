use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use crate::utils::http::get_http_client;

pub fn default_download_name(image_id: &str) -> String {
    format!("ai-image-{image_id}.jpg")
}

async fn fetch_to_file(url: &str, target: &Path) -> Result<()> {
    let response = get_http_client().get(url).send().await?;
    if !response.status().is_success() {
        return Err(anyhow!("download failed with status {}", response.status()));
    }
    let bytes = response.bytes().await?;
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(target, &bytes).await?;
    Ok(())
}

/// Saves the image behind `url` as `download_dir/filename`.
///
/// Failures are logged and swallowed; `None` means nothing was written.
pub async fn download_image(url: &str, download_dir: &Path, filename: &str) -> Option<PathBuf> {
    // Keep the file inside the download directory whatever the caller passes.
    let name = Path::new(filename)
        .file_name()
        .map(|value| value.to_os_string())
        .unwrap_or_else(|| "ai-image.jpg".into());
    let target = download_dir.join(name);

    match fetch_to_file(url, &target).await {
        Ok(()) => {
            info!("Downloaded {} to {}", url, target.display());
            Some(target)
        }
        Err(err) => {
            warn!("Failed to download image from {}: {}", url, err);
            None
        }
    }
}
