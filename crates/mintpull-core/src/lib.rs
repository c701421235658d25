//! Bulk pull of token metadata and images from the Helius token-metadata API.

pub mod batch;
pub mod config;
pub mod download;
pub mod error;
pub mod error_log;
pub mod fetch;
pub mod logging;
pub mod mints;
pub mod model;
pub mod persist;
pub mod pipeline;
pub mod processor;

use reqwest::Client;
use tracing::info;

pub use batch::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE, batches};
pub use config::{OutputLayout, RunConfig, Tunables};
pub use error::PullError;
pub use logging::{LoggingDestination, LoggingError, init_logging};
pub use model::{ChangeEntry, ChangeList, TokenMetadata};
pub use pipeline::RunSummary;

use download::AssetDownloader;
use error_log::ErrorLog;
use fetch::MetadataClient;
use mints::load_mint_list;
use persist::write_change_manifest;
use pipeline::RunContext;
use processor::RecordProcessor;

const USER_AGENT: &str = concat!("mintpull/", env!("CARGO_PKG_VERSION"));

/// Runs a full pull: every batch in input order, then the change manifest.
///
/// Returns early on setup or batch-level failures. Per-mint failures end up in
/// `errors.txt` and in the summary counters.
pub async fn run(config: RunConfig, tunables: Tunables) -> Result<RunSummary, PullError> {
    let mints = load_mint_list(&config.mint_list)?;
    let layout = config.layout();
    layout.prepare(config.download_images())?;
    let error_log = ErrorLog::create(&layout.errors_path)?;

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(tunables.timeout)
        .build()?;
    let metadata_client = MetadataClient::new(client.clone(), &tunables)?;
    let downloader = config
        .download_images()
        .then(|| AssetDownloader::new(client, &layout.images_dir));
    let processor = RecordProcessor::new(&config, &layout, downloader);
    let mut context = RunContext::new(metadata_client, processor, error_log);

    info!(
        mints = mints.len(),
        batch_size = config.batch_size,
        collection = %config.collection_name,
        root = %layout.root.display(),
        "Starting metadata pull"
    );

    for (index, batch) in batches(&mints, config.batch_size).enumerate() {
        info!(batch = index + 1, size = batch.len(), "Fetching batch");
        context.process_batch(batch).await?;
    }

    let (summary, changes) = context.finish();
    if config.change {
        write_change_manifest(&layout.change_list_path, &changes)?;
        info!(
            path = %layout.change_list_path.display(),
            entries = changes.len(),
            "Change list written"
        );
    }

    Ok(summary)
}
