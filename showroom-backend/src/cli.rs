//! Cli things
//!

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use showroom_shared::SCREENSHOT_NAMESPACE;
use uuid::Uuid;

use crate::asset::{PipelineConfig, ThumbnailConfig};

pub fn db_path_default() -> String {
    shellexpand::tilde("~/.cache/website-showroom.sqlite3").to_string()
}

pub fn media_root_default() -> String {
    shellexpand::tilde("~/.cache/website-showroom/media").to_string()
}

#[derive(Parser, Debug)]
#[command(name = "showroom", version, about = "Manage the website showroom content")]
pub struct CliOpts {
    #[clap(long, help = "Path to the database file", env = "SHOWROOM_DB_PATH")]
    pub db_path: Option<PathBuf>,

    #[clap(
        long,
        help = "Directory screenshots are stored under",
        env = "SHOWROOM_MEDIA_ROOT"
    )]
    pub media_root: Option<PathBuf>,

    #[clap(
        long,
        default_value_t = 300,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Maximum screenshot width in pixels",
        env = "SHOWROOM_THUMBNAIL_WIDTH"
    )]
    pub thumbnail_width: u32,

    #[clap(
        long,
        default_value_t = 200,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Maximum screenshot height in pixels",
        env = "SHOWROOM_THUMBNAIL_HEIGHT"
    )]
    pub thumbnail_height: u32,

    #[clap(
        long,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Give up on thumbnail processing after this many seconds",
        env = "SHOWROOM_PROCESSING_TIMEOUT"
    )]
    pub processing_timeout_secs: Option<u64>,

    #[clap(long, help = "Enable debug logging")]
    pub debug: bool,

    #[clap(subcommand)]
    pub command: Command,
}

impl CliOpts {
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| db_path_default().into())
    }

    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| media_root_default().into())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            namespace: SCREENSHOT_NAMESPACE.to_string(),
            thumbnail: ThumbnailConfig {
                max_width: self.thumbnail_width,
                max_height: self.thumbnail_height,
                ..Default::default()
            },
            processing_timeout: self.processing_timeout_secs.map(Duration::from_secs),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or upgrade the database schema
    Migrate,
    /// Add a category
    AddCategory {
        #[clap(long)]
        name: String,
        #[clap(long, help = "URL slug, anything except 'contact'")]
        url_name: String,
        #[clap(long, default_value_t = 0)]
        order: i32,
        #[clap(long, help = "Format: #ffffff")]
        color: String,
        #[clap(long, help = "Format: #ffffff")]
        active_color: String,
    },
    /// Add an edition from a JSON file with the edition's fields
    AddEdition {
        #[clap(help = "JSON file describing the edition")]
        file: PathBuf,
    },
    /// Add a website with its screenshot
    AddWebsite {
        #[clap(long)]
        title: String,
        #[clap(long, help = "url_name of the category")]
        category: String,
        #[clap(long)]
        url: String,
        #[clap(long, help = "Image file to use as the screenshot")]
        screenshot: PathBuf,
        #[clap(long, help = "2-letter country code")]
        country: Option<String>,
        #[clap(long, default_value_t = 0)]
        order: i32,
        #[clap(long, default_value = "")]
        desc: String,
    },
    /// Upload a new screenshot for a website
    ReplaceScreenshot {
        id: Uuid,
        #[clap(help = "Image file to use as the screenshot")]
        screenshot: PathBuf,
    },
    /// Delete a website and its screenshot
    DeleteWebsite { id: Uuid },
    /// Delete a category, its websites and their screenshots
    DeleteCategory {
        #[clap(help = "url_name of the category")]
        url_name: String,
    },
    /// Print editions, categories and websites as JSON
    List,
    /// Run thumbnail processing on a stored screenshot
    Thumbnail {
        #[clap(help = "Storage path, e.g. screenshots/s_<id>.png")]
        path: String,
    },
}
