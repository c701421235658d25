use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};
use mintpull_core::config::{DEFAULT_COLLECTION_NAME, DEFAULT_OUTPUT_DIR};
use mintpull_core::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE, RunConfig};

/// Pull token metadata and images for a list of mints.
#[derive(Parser, Debug, Clone)]
#[command(name = "mintpull", version, about, long_about = None)]
pub struct Cli {
    /// JSON file containing an array of mint addresses.
    #[arg(long = "mintList", value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub mint_list: PathBuf,

    /// Collection name; output goes to `<outputDir>/<collectionName>/`.
    #[arg(long = "collectionName", value_name = "NAME", default_value = DEFAULT_COLLECTION_NAME)]
    pub collection_name: String,

    /// Rewrite image URLs with the prefix and write changeList.json.
    #[arg(
        long = "change",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub change: bool,

    /// Prefix for rewritten image URLs.
    #[arg(long = "imageURLprefix", value_name = "PREFIX", default_value = "")]
    pub image_url_prefix: String,

    /// Skip downloading images.
    #[arg(
        long = "skipImages",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub skip_images: bool,

    /// Mints per metadata request.
    #[arg(
        long = "batchSize",
        value_name = "COUNT",
        default_value_t = DEFAULT_BATCH_SIZE as u16,
        value_parser = clap::value_parser!(u16).range(1..=MAX_BATCH_SIZE as i64)
    )]
    pub batch_size: u16,

    /// Root directory for collection output.
    #[arg(
        long = "outputDir",
        value_name = "DIR",
        default_value = DEFAULT_OUTPUT_DIR,
        value_hint = ValueHint::DirPath
    )]
    pub output_dir: PathBuf,
}

impl Cli {
    pub fn into_run_config(self) -> RunConfig {
        RunConfig {
            mint_list: self.mint_list,
            collection_name: self.collection_name,
            output_dir: self.output_dir,
            change: self.change,
            image_url_prefix: self.image_url_prefix,
            skip_images: self.skip_images,
            batch_size: usize::from(self.batch_size),
        }
    }
}
