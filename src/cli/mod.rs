pub mod asset;
pub mod book;
pub mod metadata;
pub mod output;
pub mod spine;
pub mod toc;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "epub-inspect",
    version,
    about = "Inspect EPUB files: metadata, cover, spine and table of contents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Resource,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (also enables debug logging)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Resource {
    /// Whole-book operations: info
    Book {
        #[command(subcommand)]
        command: book::BookCommand,
    },
    /// Descriptive metadata: show
    Metadata {
        #[command(subcommand)]
        command: metadata::MetadataCommand,
    },
    /// Table of contents: show
    Toc {
        #[command(subcommand)]
        command: toc::TocCommand,
    },
    /// Reading order: list
    Spine {
        #[command(subcommand)]
        command: spine::SpineCommand,
    },
    /// Archive entries: cover, extract, type
    Asset {
        #[command(subcommand)]
        command: asset::AssetCommand,
    },
}
