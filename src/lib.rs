//! Read-only EPUB introspection.
//!
//! Opens an EPUB archive, locates its package document and derives the
//! publication structure, bibliographic metadata, cover image and table of
//! contents from it. Every operation opens its own handle onto the archive;
//! nothing is cached between calls.

pub mod epub;
pub mod error;

pub use epub::cover::{find_cover_image_zip_path, find_first_page_image_zip_path};
pub use epub::media_type::guess_content_type;
pub use epub::metadata::extract_core_metadata;
pub use epub::navigation::extract_toc_links;
pub use epub::path::{build_zip_path, resolve_zip_path};
pub use epub::reader::{open_publication, try_open_publication};
pub use epub::zip_utils::{EntryStream, open_entry_stream, read_entry_bytes};
pub use epub::{CoreMetadata, PublicationInfo, TocLink};
pub use error::{EpubError, Result};
