use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::config::{OutputLayout, RunConfig};
use crate::download::AssetDownloader;
use crate::error::PullError;
use crate::model::{ChangeEntry, ChangeList, OffChainMetadata, TokenMetadata};
use crate::persist::write_metadata;

/// Terminal state of one record.
#[derive(Debug)]
pub enum RecordOutcome {
    Persisted {
        mint: String,
        metadata_path: PathBuf,
        asset: Option<String>,
    },
    Skipped {
        mint: String,
        reason: String,
    },
    Failed {
        mint: String,
        error: PullError,
    },
}

impl RecordOutcome {
    pub fn mint(&self) -> &str {
        match self {
            RecordOutcome::Persisted { mint, .. }
            | RecordOutcome::Skipped { mint, .. }
            | RecordOutcome::Failed { mint, .. } => mint,
        }
    }
}

/// Drives a single record from the metadata response to disk.
#[derive(Debug, Clone)]
pub struct RecordProcessor {
    metadata_dir: PathBuf,
    downloader: Option<AssetDownloader>,
    image_url_prefix: String,
    rewrite_uris: bool,
    track_changes: bool,
}

impl RecordProcessor {
    pub fn new(
        config: &RunConfig,
        layout: &OutputLayout,
        downloader: Option<AssetDownloader>,
    ) -> Self {
        Self {
            metadata_dir: layout.metadata_dir.clone(),
            rewrite_uris: config.rewrite_uris() && downloader.is_some(),
            downloader,
            image_url_prefix: config.image_url_prefix.clone(),
            track_changes: config.change,
        }
    }

    /// Processes `record`, appending to `changes` only when the record is persisted with an asset.
    ///
    /// Errors never escape: they come back as [`RecordOutcome::Failed`].
    pub async fn process(&self, record: TokenMetadata, changes: &mut ChangeList) -> RecordOutcome {
        let TokenMetadata {
            account: mint,
            off_chain_metadata,
            ..
        } = record;

        if mint.trim().is_empty() {
            return RecordOutcome::Skipped {
                mint,
                reason: "record has no account".to_string(),
            };
        }

        match self.persist(&mint, off_chain_metadata).await {
            Ok((metadata_path, asset)) => {
                if self.track_changes {
                    if let Some(file_name) = &asset {
                        changes.push(ChangeEntry {
                            mint_account: mint.clone(),
                            new_uri: self.new_uri(file_name),
                        });
                    }
                }
                RecordOutcome::Persisted {
                    mint,
                    metadata_path,
                    asset,
                }
            }
            Err(error) => RecordOutcome::Failed { mint, error },
        }
    }

    async fn persist(
        &self,
        mint: &str,
        off_chain: OffChainMetadata,
    ) -> Result<(PathBuf, Option<String>), PullError> {
        if let Some(error) = off_chain.upstream_error() {
            return Err(PullError::UpstreamRecord(error.to_string()));
        }

        let mut document = off_chain.metadata;
        let asset = match &self.downloader {
            Some(downloader) => {
                let url = document
                    .image
                    .as_deref()
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .ok_or(PullError::MissingImage)?;
                Some(downloader.download(url, mint).await?)
            }
            None => None,
        };

        if self.rewrite_uris {
            if let Some(file_name) = &asset {
                document.rewrite_image_uri(&self.new_uri(file_name));
            }
        }

        match write_metadata(&self.metadata_dir, mint, &document) {
            Ok(path) => Ok((path, asset)),
            Err(err) => {
                // metadata and asset are committed together
                if let (Some(downloader), Some(file_name)) = (&self.downloader, &asset) {
                    let asset_path = downloader.asset_path(file_name);
                    if let Err(remove_err) = fs::remove_file(&asset_path) {
                        warn!(
                            mint,
                            path = %asset_path.display(),
                            error = %remove_err,
                            "Failed to remove orphaned asset"
                        );
                    }
                }
                Err(err)
            }
        }
    }

    fn new_uri(&self, file_name: &str) -> String {
        format!("{}{}", self.image_url_prefix, file_name)
    }
}
