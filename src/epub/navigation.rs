use crate::epub::path::{parent_dir, resolve_zip_path};
use crate::epub::xml_utils::{attr_no_namespace, local_name};
use crate::epub::zip_utils::{self, EpubArchive};
use crate::epub::{PublicationInfo, TocLink, has_token};
use crate::error::Result;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashSet;

pub const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";

/// A raw link as written in a navigation document.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNavLink {
    pub href: String,
    pub label: Option<String>,
}

/// Ordered, deduplicated table-of-contents targets.
///
/// The EPUB 3 navigation document is preferred; the EPUB 2 NCX is read only
/// when the navigation document yields no links. Targets are resolved
/// against the directory of the document they were found in. A publication
/// with neither yields an empty list.
pub fn extract_toc_links(info: &PublicationInfo) -> Vec<TocLink> {
    let mut archive = match zip_utils::open_epub(&info.archive_path) {
        Ok(archive) => archive,
        Err(e) => {
            tracing::warn!(error = %e, "cannot open archive for navigation");
            return Vec::new();
        }
    };

    let links = nav_document_links(info, &mut archive);
    if !links.is_empty() {
        return links;
    }
    ncx_links(info, &mut archive)
}

fn nav_document_links(info: &PublicationInfo, archive: &mut EpubArchive) -> Vec<TocLink> {
    let Some(nav_path) = info
        .id_with_property("nav")
        .and_then(|id| info.zip_path_for_id(id))
    else {
        return Vec::new();
    };

    match read_and_parse(archive, &nav_path, parse_nav_xhtml) {
        Ok(raw) => resolve_links(&nav_path, raw),
        Err(e) => {
            tracing::warn!(path = %nav_path, error = %e, "unreadable navigation document");
            Vec::new()
        }
    }
}

fn ncx_links(info: &PublicationInfo, archive: &mut EpubArchive) -> Vec<TocLink> {
    let Some(ncx_path) = locate_ncx(info) else {
        return Vec::new();
    };

    match read_and_parse(archive, &ncx_path, parse_ncx) {
        Ok(raw) => resolve_links(&ncx_path, raw),
        Err(e) => {
            tracing::warn!(path = %ncx_path, error = %e, "unreadable NCX");
            Vec::new()
        }
    }
}

/// The NCX named by the spine's `toc` attribute, else the first manifest
/// item with the NCX media type.
fn locate_ncx(info: &PublicationInfo) -> Option<String> {
    info.legacy_toc_id
        .as_deref()
        .and_then(|id| info.zip_path_for_id(id))
        .or_else(|| {
            info.manifest_href_to_media_type
                .iter()
                .find(|(_, media_type)| media_type.eq_ignore_ascii_case(NCX_MEDIA_TYPE))
                .map(|(href, _)| info.zip_path_for_href(href))
        })
}

fn read_and_parse(
    archive: &mut EpubArchive,
    zip_path: &str,
    parse: fn(&str) -> Result<Vec<RawNavLink>>,
) -> Result<Vec<RawNavLink>> {
    let xml = zip_utils::read_entry_string(archive, zip_path)?;
    parse(&xml)
}

fn resolve_links(document_path: &str, raw: Vec<RawNavLink>) -> Vec<TocLink> {
    let base_dir = parent_dir(document_path);
    let mut seen = HashSet::new();
    let mut links = Vec::with_capacity(raw.len());

    for link in raw {
        let target = resolve_zip_path(base_dir, &link.href);
        if seen.insert(target.clone()) {
            links.push(TocLink::from_target(&target, link.label));
        }
    }

    links
}

/// Links of the first `nav` whose `epub:type` includes `toc` or whose `role`
/// is `doc-toc`, in document order.
pub fn parse_nav_xhtml(html: &str) -> Result<Vec<RawNavLink>> {
    let mut reader = Reader::from_str(html);
    let mut buf = Vec::new();
    let mut links = Vec::new();

    let mut depth: usize = 0;
    let mut toc_depth: Option<usize> = None;
    // (href, label text, depth of the <a>)
    let mut anchor: Option<(String, String, usize)> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                let local = local_name(e);
                if toc_depth.is_none() && local == "nav" && is_toc_nav(e) {
                    toc_depth = Some(depth);
                } else if toc_depth.is_some() && local == "a" && anchor.is_none() {
                    if let Some(href) = attr_no_namespace(e, "href").filter(|h| !h.is_empty()) {
                        anchor = Some((href, String::new(), depth));
                    }
                }
            }
            Event::Empty(ref e) => {
                if toc_depth.is_some() && local_name(e) == "a" {
                    if let Some(href) = attr_no_namespace(e, "href").filter(|h| !h.is_empty()) {
                        links.push(RawNavLink { href, label: None });
                    }
                }
            }
            Event::Text(ref e) => {
                if let Some((_, label, _)) = anchor.as_mut() {
                    label.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Event::End(_) => {
                if anchor.as_ref().is_some_and(|(_, _, d)| *d == depth) {
                    if let Some((href, label, _)) = anchor.take() {
                        links.push(RawNavLink {
                            href,
                            label: normalize_label(&label),
                        });
                    }
                }
                if toc_depth == Some(depth) {
                    return Ok(links);
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(links)
}

fn is_toc_nav(e: &quick_xml::events::BytesStart<'_>) -> bool {
    attr_no_namespace(e, "type").is_some_and(|t| has_token(&t, "toc"))
        || attr_no_namespace(e, "role").is_some_and(|r| r.trim() == "doc-toc")
}

/// `content/@src` of every navPoint under `navMap`, nested ones included, in
/// document order.
pub fn parse_ncx(xml: &str) -> Result<Vec<RawNavLink>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut links = Vec::new();

    let mut in_nav_map = false;
    let mut in_label_text = false;
    let mut label = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match local_name(e).as_str() {
                "navMap" => in_nav_map = true,
                "navPoint" if in_nav_map => label.clear(),
                "text" if in_nav_map => in_label_text = true,
                "content" if in_nav_map => push_ncx_content(e, &label, &mut links),
                _ => {}
            },
            Event::Empty(ref e) => {
                if in_nav_map && local_name(e) == "content" {
                    push_ncx_content(e, &label, &mut links);
                }
            }
            Event::Text(ref e) => {
                if in_label_text {
                    label.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"navMap" => in_nav_map = false,
                b"text" => in_label_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(links)
}

fn push_ncx_content(
    e: &quick_xml::events::BytesStart<'_>,
    label: &str,
    links: &mut Vec<RawNavLink>,
) {
    if let Some(src) = attr_no_namespace(e, "src").filter(|s| !s.is_empty()) {
        links.push(RawNavLink {
            href: src,
            label: normalize_label(label),
        });
    }
}

fn normalize_label(label: &str) -> Option<String> {
    let collapsed = label.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}
