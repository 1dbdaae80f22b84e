use crate::epub::xml_utils::local_name;
use crate::epub::{CoreMetadata, PublicationInfo, zip_utils};
use crate::error::Result;
use quick_xml::Reader;
use quick_xml::events::Event;

/// Descriptive metadata of an opened publication.
///
/// Reads the package document again rather than reusing
/// [`PublicationInfo`]; any failure to read or parse it yields `None`.
pub fn extract_core_metadata(info: &PublicationInfo) -> Option<CoreMetadata> {
    let read = || -> Result<CoreMetadata> {
        let mut archive = zip_utils::open_epub(&info.archive_path)?;
        let xml = zip_utils::read_entry_string(&mut archive, &info.package_document_path)?;
        parse_core_metadata(&xml)
    };

    read()
        .inspect_err(|e| tracing::debug!(error = %e, "metadata extraction failed"))
        .ok()
}

/// Collect Dublin Core fields from the `metadata` element of a package
/// document. Single-valued fields keep their first occurrence; creators and
/// subjects keep document order.
pub fn parse_core_metadata(xml: &str) -> Result<CoreMetadata> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut metadata = CoreMetadata::default();

    let mut metadata_depth: Option<usize> = None;
    let mut depth: usize = 0;
    // (element local name, accumulated text, depth of the element)
    let mut current: Option<(String, String, usize)> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                let local = local_name(e);
                match metadata_depth {
                    None if local == "metadata" => metadata_depth = Some(depth),
                    Some(md) if depth == md + 1 && current.is_none() => {
                        current = Some((local, String::new(), depth));
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) => {
                if let Some((_, text, _)) = current.as_mut() {
                    text.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Event::CData(ref e) => {
                if let Some((_, text, _)) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => {
                if current.as_ref().is_some_and(|(_, _, d)| *d == depth) {
                    if let Some((field, text, _)) = current.take() {
                        record_field(&mut metadata, &field, text.trim());
                    }
                }
                if metadata_depth == Some(depth) {
                    break;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    metadata.isbn = metadata.identifier.as_deref().and_then(isbn_from_identifier);
    Ok(metadata)
}

fn record_field(metadata: &mut CoreMetadata, field: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let first = |slot: &mut Option<String>| {
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    };
    match field {
        "title" => first(&mut metadata.title),
        "language" => first(&mut metadata.language),
        "publisher" => first(&mut metadata.publisher),
        "description" => first(&mut metadata.description),
        "date" => first(&mut metadata.date),
        "identifier" => first(&mut metadata.identifier),
        "creator" => metadata.creators.push(value.to_string()),
        "subject" => metadata.subjects.push(value.to_string()),
        _ => {}
    }
}

/// Best-effort ISBN from a `dc:identifier` value.
///
/// A `urn:isbn:` or `isbn:` prefix is stripped as-is; any other identifier
/// is reduced to its digits and `x`. The result counts only when it is
/// exactly 10 or 13 characters long.
pub fn isbn_from_identifier(identifier: &str) -> Option<String> {
    let lower = identifier.trim().to_lowercase();
    let candidate = if let Some(rest) = lower.strip_prefix("urn:isbn:") {
        rest.to_string()
    } else if let Some(rest) = lower.strip_prefix("isbn:") {
        rest.to_string()
    } else {
        lower
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == 'x')
            .collect()
    };

    matches!(candidate.chars().count(), 10 | 13).then_some(candidate)
}
