use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum AssetCommand {
    /// Locate the cover image, optionally writing it out
    Cover {
        /// Path to the EPUB file
        file: PathBuf,
        /// Write the cover image to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Stream a single archive entry to a file or stdout
    Extract {
        /// Path to the EPUB file
        file: PathBuf,
        /// Entry path within the EPUB
        entry: String,
        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the content type guessed from a file name
    Type {
        /// File or entry name
        name: String,
    },
}
