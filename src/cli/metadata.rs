use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum MetadataCommand {
    /// Show descriptive metadata (title, creators, ISBN, ...)
    Show {
        /// Path to the EPUB file
        file: PathBuf,
    },
}
