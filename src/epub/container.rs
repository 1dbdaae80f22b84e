use crate::epub::xml_utils::{attr_no_namespace, local_name};
use crate::epub::zip_utils::{self, EpubArchive};
use crate::error::{EpubError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Package document path from the archive's container entry, or `None` when
/// the entry is missing, unparsable or names no package document.
pub fn find_package_document(archive: &mut EpubArchive) -> Option<String> {
    locate_package_document(archive).ok()
}

/// Like [`find_package_document`], reporting why the lookup failed.
pub fn locate_package_document(archive: &mut EpubArchive) -> Result<String> {
    let xml = zip_utils::read_entry_string(archive, CONTAINER_PATH)
        .map_err(|e| EpubError::CorruptContainer(format!("{CONTAINER_PATH}: {e}")))?;
    parse_container(&xml)
}

/// Parse container.xml and return the `full-path` of the first
/// `container/rootfiles/rootfile`. Elements are matched by local name since
/// container namespaces differ between EPUB versions.
pub fn parse_container(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if local_name(e) == "rootfile" && stack == ["container", "rootfiles"] =>
            {
                return match attr_no_namespace(e, "full-path") {
                    Some(path) if !path.trim().is_empty() => Ok(path.trim().to_string()),
                    _ => Err(EpubError::CorruptContainer(
                        "rootfile has no full-path".into(),
                    )),
                };
            }
            Ok(Event::Start(ref e)) => stack.push(local_name(e)),
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(EpubError::CorruptContainer(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Err(EpubError::CorruptContainer(
        "no rootfile found in container.xml".into(),
    ))
}
