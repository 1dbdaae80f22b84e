use crate::epub::PublicationInfo;
use crate::epub::path::{build_zip_path, parent_dir};
use crate::epub::xml_utils::{attr_no_namespace, local_name};
use crate::error::{EpubError, Result};
use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::path::Path;

/// Parse a package document into a [`PublicationInfo`].
///
/// Elements are matched by local name so EPUB 2 and EPUB 3 namespaces are
/// treated alike. Manifest items without an `id` or `href` and spine
/// itemrefs that name no manifest item are skipped; only a document that is
/// not well-formed XML fails the parse.
pub fn parse_package_document(
    xml: &str,
    archive_path: &Path,
    package_document_path: &str,
) -> Result<PublicationInfo> {
    let malformed = |reason: String| EpubError::MalformedPackageDocument {
        path: package_document_path.to_string(),
        reason,
    };

    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();

    let mut title: Option<String> = None;
    let mut language: Option<String> = None;
    // (field, accumulated text, depth of the field element)
    let mut capture: Option<(String, String, usize)> = None;

    let mut manifest_id_to_href = IndexMap::new();
    let mut manifest_href_to_media_type = IndexMap::new();
    let mut manifest_id_to_properties = IndexMap::new();
    let mut spine_idrefs: Vec<String> = Vec::new();
    let mut legacy_toc_id: Option<String> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| malformed(e.to_string()))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let local = local_name(e);
                let parent = stack.last().map(String::as_str);
                let in_package_spine = stack.len() >= 2 && stack[stack.len() - 2] == "package";

                match (parent, local.as_str()) {
                    (Some("metadata"), field @ ("title" | "language")) if capture.is_none() => {
                        let unset = match field {
                            "title" => title.is_none(),
                            _ => language.is_none(),
                        };
                        if unset && matches!(event, Event::Start(_)) {
                            capture = Some((field.to_string(), String::new(), stack.len() + 1));
                        }
                    }
                    (Some("manifest"), "item") => {
                        let id = attr_no_namespace(e, "id").filter(|v| !v.is_empty());
                        let href = attr_no_namespace(e, "href").filter(|v| !v.is_empty());
                        if let (Some(id), Some(href)) = (id, href) {
                            if let Some(media_type) = attr_no_namespace(e, "media-type") {
                                manifest_href_to_media_type.insert(href.clone(), media_type);
                            }
                            if let Some(properties) = attr_no_namespace(e, "properties") {
                                manifest_id_to_properties.insert(id.clone(), properties);
                            }
                            manifest_id_to_href.insert(id, href);
                        }
                    }
                    (Some("package"), "spine") => {
                        legacy_toc_id = attr_no_namespace(e, "toc")
                            .map(|toc| toc.trim().to_string())
                            .filter(|toc| !toc.is_empty());
                    }
                    (Some("spine"), "itemref") if in_package_spine => {
                        if let Some(idref) = attr_no_namespace(e, "idref") {
                            spine_idrefs.push(idref);
                        }
                    }
                    _ => {}
                }

                if let Event::Start(_) = event {
                    stack.push(local);
                }
            }
            Event::Text(ref e) => {
                if let Some((_, text, _)) = capture.as_mut() {
                    text.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Event::CData(ref e) => {
                if let Some((_, text, _)) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => {
                if let Some((field, text, depth)) = capture.take() {
                    if depth == stack.len() {
                        let value = Some(text.trim().to_string()).filter(|v| !v.is_empty());
                        match field.as_str() {
                            "title" => title = value,
                            _ => language = value,
                        }
                    } else {
                        capture = Some((field, text, depth));
                    }
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!("unclosed <{open}> at end of document")));
    }

    let package_document_dir = parent_dir(package_document_path).to_string();
    let mut spine_hrefs = Vec::with_capacity(spine_idrefs.len());
    for idref in &spine_idrefs {
        match manifest_id_to_href.get(idref) {
            Some(href) => spine_hrefs.push(build_zip_path(&package_document_dir, href)),
            None => tracing::warn!(idref = %idref, "skipping spine itemref not in manifest"),
        }
    }

    Ok(PublicationInfo {
        archive_path: archive_path.to_path_buf(),
        package_document_path: package_document_path.to_string(),
        package_document_dir,
        title,
        language,
        spine_hrefs,
        manifest_id_to_href,
        manifest_href_to_media_type,
        manifest_id_to_properties,
        legacy_toc_id,
    })
}
