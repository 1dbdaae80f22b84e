use crate::epub::{PublicationInfo, container, opf, zip_utils};
use crate::error::{EpubError, Result};
use std::path::Path;

/// Open an EPUB and derive its publication structure.
///
/// Wrong extension, a missing or unreadable container, a missing package
/// document and a malformed package document all come back as `None`: the
/// file has no readable publication structure.
pub fn open_publication(path: &Path) -> Option<PublicationInfo> {
    match try_open_publication(path) {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no readable publication");
            None
        }
    }
}

/// Like [`open_publication`], reporting which stage failed.
pub fn try_open_publication(path: &Path) -> Result<PublicationInfo> {
    let mut archive = zip_utils::open_epub(path)?;
    let archive_path = path.canonicalize()?;

    let opf_path = container::locate_package_document(&mut archive)?;
    let opf_xml = match zip_utils::read_entry_string(&mut archive, &opf_path) {
        Ok(xml) => xml,
        Err(EpubError::ResourceNotFound { .. }) => {
            return Err(EpubError::MissingPackageDocument(opf_path));
        }
        Err(e) => {
            return Err(EpubError::MalformedPackageDocument {
                path: opf_path,
                reason: e.to_string(),
            });
        }
    };

    opf::parse_package_document(&opf_xml, &archive_path, &opf_path)
}
