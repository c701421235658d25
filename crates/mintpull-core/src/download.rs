use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::PullError;

/// Maps a `Content-Type` value to the extension used for the saved asset.
///
/// Parameters such as `; charset=binary` are ignored and unknown types fall back to `.png`.
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();

    if media_type.eq_ignore_ascii_case("image/gif") {
        ".gif"
    } else if media_type.eq_ignore_ascii_case("image/jpeg") {
        ".jpeg"
    } else {
        ".png"
    }
}

/// Saves a record's image into the collection's `images/` directory.
#[derive(Debug, Clone)]
pub struct AssetDownloader {
    client: Client,
    images_dir: PathBuf,
}

impl AssetDownloader {
    pub fn new(client: Client, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            images_dir: images_dir.into(),
        }
    }

    pub fn asset_path(&self, file_name: &str) -> PathBuf {
        self.images_dir.join(file_name)
    }

    /// Downloads `url` to `<mint><ext>` and returns that file name.
    pub async fn download(&self, url: &str, mint: &str) -> Result<String, PullError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PullError::AssetStatus(status));
        }

        let extension = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(extension_for_content_type)
            .unwrap_or(".png");

        let file_name = format!("{mint}{extension}");
        let path = self.asset_path(&file_name);
        let written = match stream_to_file(response, &path).await {
            Ok(written) => written,
            Err(err) => {
                if let Err(remove_err) = fs::remove_file(&path).await {
                    if remove_err.kind() != ErrorKind::NotFound {
                        warn!(
                            mint,
                            path = %path.display(),
                            error = %remove_err,
                            "Failed to remove partial asset"
                        );
                    }
                }
                return Err(err);
            }
        };

        debug!(mint, file = %path.display(), bytes = written, "Saved asset");
        Ok(file_name)
    }
}

async fn stream_to_file(mut response: Response, path: &Path) -> Result<u64, PullError> {
    let mut file = File::create(path)
        .await
        .map_err(|err| PullError::write(path, err))?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk)
            .await
            .map_err(|err| PullError::write(path, err))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|err| PullError::write(path, err))?;
    Ok(written)
}
