use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum BookCommand {
    /// Show the publication structure of an EPUB file
    Info {
        /// Path to the EPUB file
        file: PathBuf,
    },
}
