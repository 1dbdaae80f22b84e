use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum SpineCommand {
    /// List spine items in reading order
    List {
        /// Path to the EPUB file
        file: PathBuf,
    },
}
