//! Cover image lookup.
//!
//! Real-world EPUBs declare their cover in several incompatible ways, so the
//! lookup is an ordered list of strategies; the first one that yields a path
//! wins. None of them failing is an ordinary outcome meaning "no cover".

use crate::epub::path::{parent_dir, resolve_zip_path};
use crate::epub::xml_utils::{attr_no_namespace, local_name};
use crate::epub::{PublicationInfo, zip_utils};
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use std::sync::LazyLock;

/// Number of leading HTML spine documents scanned for an `<img>`.
pub const FIRST_PAGE_SCAN_LIMIT: usize = 5;

type CoverStrategy = fn(&PublicationInfo) -> Option<String>;

const COVER_STRATEGIES: [(&str, CoverStrategy); 4] = [
    ("manifest cover-image property", cover_image_property),
    ("meta cover pointer", meta_cover_pointer),
    ("first raster manifest item", first_raster_item),
    ("first page image", find_first_page_image_zip_path),
];

// Double-quoted src only.
static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img\b[^>]*?\ssrc\s*=\s*"([^"]*)""#).unwrap());

/// Archive-internal path of the cover image, if one can be found.
pub fn find_cover_image_zip_path(info: &PublicationInfo) -> Option<String> {
    COVER_STRATEGIES.iter().find_map(|(name, strategy)| {
        let found = strategy(info)?;
        tracing::debug!(strategy = name, path = %found, "cover found");
        Some(found)
    })
}

/// EPUB 3: a manifest item whose properties include `cover-image`.
fn cover_image_property(info: &PublicationInfo) -> Option<String> {
    let id = info.id_with_property("cover-image")?;
    info.zip_path_for_id(id)
}

/// EPUB 2: `<meta name="cover" content="manifest-id"/>` in the metadata.
fn meta_cover_pointer(info: &PublicationInfo) -> Option<String> {
    let mut archive = zip_utils::open_epub(&info.archive_path).ok()?;
    let xml = zip_utils::read_entry_string(&mut archive, &info.package_document_path).ok()?;
    let id = meta_cover_id(&xml)?;
    info.zip_path_for_id(&id)
}

/// First manifest item typed exactly `image/jpeg` or `image/png`.
fn first_raster_item(info: &PublicationInfo) -> Option<String> {
    info.manifest_href_to_media_type
        .iter()
        .find(|(_, media_type)| {
            media_type.eq_ignore_ascii_case("image/jpeg")
                || media_type.eq_ignore_ascii_case("image/png")
        })
        .map(|(href, _)| info.zip_path_for_href(href))
}

/// The `content` of the first `meta name="cover"` inside `metadata`.
pub fn meta_cover_id(opf_xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(opf_xml);
    let mut buf = Vec::new();
    let mut in_metadata = false;

    loop {
        match reader.read_event_into(&mut buf).ok()? {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let local = local_name(e);
                if local == "metadata" {
                    in_metadata = true;
                } else if in_metadata
                    && local == "meta"
                    && attr_no_namespace(e, "name").as_deref() == Some("cover")
                {
                    let content = attr_no_namespace(e, "content")?;
                    let content = content.trim();
                    return (!content.is_empty()).then(|| content.to_string());
                }
            }
            Event::End(ref e) => {
                if e.local_name().as_ref() == b"metadata" {
                    return None;
                }
            }
            Event::Eof => return None,
            _ => {}
        }
        buf.clear();
    }
}

/// An image standing in for the first page.
///
/// A spine item that is itself an image wins outright. Otherwise the first
/// [`FIRST_PAGE_SCAN_LIMIT`] spine entries that are HTML are searched for an
/// `<img src="...">`, resolved against the directory of the document that
/// contains it. This is a text pattern match, not an HTML parse: single-quoted
/// or entity-encoded `src` values are not seen.
pub fn find_first_page_image_zip_path(info: &PublicationInfo) -> Option<String> {
    if let Some(href) = info.spine_hrefs.iter().find(|href| {
        info.media_type_of(href)
            .is_some_and(|mt| mt.to_ascii_lowercase().starts_with("image/"))
    }) {
        return Some(href.clone());
    }

    let mut archive = zip_utils::open_epub(&info.archive_path).ok()?;
    let html_documents = info.spine_hrefs.iter().filter(|href| {
        info.media_type_of(href)
            .is_some_and(|mt| mt.to_ascii_lowercase().contains("html"))
    });
    for href in html_documents.take(FIRST_PAGE_SCAN_LIMIT) {
        let Ok(html) = zip_utils::read_entry_string(&mut archive, href) else {
            tracing::debug!(path = %href, "spine document unreadable");
            continue;
        };
        if let Some(src) = first_img_src(&html) {
            return Some(resolve_zip_path(parent_dir(href), src));
        }
    }

    None
}

fn first_img_src(html: &str) -> Option<&str> {
    IMG_SRC
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|src| !src.trim().is_empty())
}
