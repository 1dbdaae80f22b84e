use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum TocCommand {
    /// Show the table of contents links in order
    Show {
        /// Path to the EPUB file
        file: PathBuf,
    },
}
