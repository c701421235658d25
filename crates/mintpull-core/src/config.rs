use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::error::PullError;

pub const DEFAULT_API_URL: &str = "https://api.helius.xyz/v0/token-metadata";
pub const DEFAULT_COLLECTION_NAME: &str = "collection";
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

const METADATA_DIR: &str = "metadata";
const IMAGES_DIR: &str = "images";
const ERRORS_FILE: &str = "errors.txt";
const CHANGE_LIST_FILE: &str = "changeList.json";

/// Options for a single pull run, usually built from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mint_list: PathBuf,
    pub collection_name: String,
    pub output_dir: PathBuf,
    /// Track rewritten image URLs and write `changeList.json`.
    pub change: bool,
    pub image_url_prefix: String,
    pub skip_images: bool,
    pub batch_size: usize,
}

impl RunConfig {
    pub fn new(mint_list: impl Into<PathBuf>) -> Self {
        Self {
            mint_list: mint_list.into(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            change: false,
            image_url_prefix: String::new(),
            skip_images: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn download_images(&self) -> bool {
        !self.skip_images
    }

    /// Image URLs are rewritten only when there is an asset to point at and a prefix to use.
    pub fn rewrite_uris(&self) -> bool {
        self.change && self.download_images() && !self.image_url_prefix.is_empty()
    }

    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(self.output_dir.join(&self.collection_name))
    }
}

/// Connection settings for the metadata service, read from the environment.
#[derive(Debug, Clone)]
pub struct Tunables {
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub disable_cache: bool,
}

impl Tunables {
    pub fn from_env() -> Result<Self, PullError> {
        let api_key = env::var("HELIUS_API_KEY")
            .map_err(|_| PullError::config("HELIUS_API_KEY must be set"))?;
        let api_url = env::var("HELIUS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = parse_env("HELIUS_TIMEOUT_SECS", 60u64, |s| s.parse::<u64>())?;
        let disable_cache = parse_env("HELIUS_DISABLE_CACHE", false, |s| s.parse::<bool>())?;

        Ok(Self {
            api_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
            disable_cache,
        })
    }
}

fn parse_env<T, F, E>(var: &str, default: T, mut parser: F) -> Result<T, PullError>
where
    F: FnMut(&str) -> Result<T, E>,
    E: std::fmt::Display,
{
    match env::var(var) {
        Ok(value) => parser(value.trim())
            .map_err(|err| PullError::Config(format!("invalid value for {}: {}", var, err))),
        Err(_) => Ok(default),
    }
}

/// On-disk layout of one collection's output.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub metadata_dir: PathBuf,
    pub images_dir: PathBuf,
    pub errors_path: PathBuf,
    pub change_list_path: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            metadata_dir: root.join(METADATA_DIR),
            images_dir: root.join(IMAGES_DIR),
            errors_path: root.join(ERRORS_FILE),
            change_list_path: root.join(CHANGE_LIST_FILE),
            root,
        }
    }

    /// Creates the metadata directory and, when assets are downloaded, the images directory.
    pub fn prepare(&self, with_images: bool) -> Result<(), PullError> {
        create_directory(&self.metadata_dir)?;
        if with_images {
            create_directory(&self.images_dir)?;
        }
        Ok(())
    }
}

fn create_directory(path: &Path) -> Result<(), PullError> {
    fs::create_dir_all(path).map_err(|source| PullError::Directory {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_at_collection() {
        let mut config = RunConfig::new("mints.json");
        config.output_dir = PathBuf::from("out");
        config.collection_name = "apes".to_string();

        let layout = config.layout();
        assert_eq!(layout.root, Path::new("out/apes"));
        assert_eq!(layout.metadata_dir, Path::new("out/apes/metadata"));
        assert_eq!(layout.images_dir, Path::new("out/apes/images"));
        assert_eq!(layout.errors_path, Path::new("out/apes/errors.txt"));
        assert_eq!(layout.change_list_path, Path::new("out/apes/changeList.json"));
    }

    #[test]
    fn rewrite_requires_change_prefix_and_images() {
        let mut config = RunConfig::new("mints.json");
        assert!(!config.rewrite_uris());

        config.change = true;
        assert!(!config.rewrite_uris(), "empty prefix disables rewriting");

        config.image_url_prefix = "http://cdn/".to_string();
        assert!(config.rewrite_uris());

        config.skip_images = true;
        assert!(!config.rewrite_uris());
    }

    #[test]
    fn prepare_skips_images_directory_when_disabled() {
        let temp = tempfile::tempdir().expect("tempdir");
        let layout = OutputLayout::new(temp.path().join("collection"));

        layout.prepare(false).expect("prepare");
        assert!(layout.metadata_dir.is_dir());
        assert!(!layout.images_dir.exists());

        layout.prepare(true).expect("prepare again");
        assert!(layout.images_dir.is_dir());
    }

    #[test]
    fn prepare_reports_directory_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").expect("write blocker");

        let layout = OutputLayout::new(blocker.join("collection"));
        let err = layout.prepare(true).expect_err("file in the way");
        assert!(matches!(err, PullError::Directory { .. }));
    }
}
