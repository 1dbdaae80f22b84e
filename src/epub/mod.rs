pub mod container;
pub mod cover;
pub mod media_type;
pub mod metadata;
pub mod navigation;
pub mod opf;
pub mod path;
pub mod reader;
pub mod xml_utils;
pub mod zip_utils;

use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

/// Publication structure derived from one open call.
///
/// Manifest maps keep document order, so "first" lookups over them are
/// deterministic. Manifest hrefs are stored as written in the package
/// document (relative to `package_document_dir`); spine hrefs are already
/// resolved to archive-internal paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicationInfo {
    pub archive_path: PathBuf,
    pub package_document_path: String,
    pub package_document_dir: String,
    pub title: Option<String>,
    pub language: Option<String>,
    pub spine_hrefs: Vec<String>,
    pub manifest_id_to_href: IndexMap<String, String>,
    pub manifest_href_to_media_type: IndexMap<String, String>,
    pub manifest_id_to_properties: IndexMap<String, String>,
    pub legacy_toc_id: Option<String>,
}

impl PublicationInfo {
    /// Resolve a manifest href to its archive-internal path.
    pub fn zip_path_for_href(&self, href: &str) -> String {
        path::build_zip_path(&self.package_document_dir, href)
    }

    /// Archive-internal path of the manifest item `id`.
    pub fn zip_path_for_id(&self, id: &str) -> Option<String> {
        self.manifest_id_to_href
            .get(id)
            .map(|href| self.zip_path_for_href(href))
    }

    /// Manifest media type of an archive-internal path.
    pub fn media_type_of(&self, zip_path: &str) -> Option<&str> {
        self.manifest_href_to_media_type
            .iter()
            .find(|(href, _)| self.zip_path_for_href(href) == zip_path)
            .map(|(_, media_type)| media_type.as_str())
    }

    /// First manifest id whose `properties` carry `token`.
    pub fn id_with_property(&self, token: &str) -> Option<&str> {
        self.manifest_id_to_properties
            .iter()
            .find(|(_, properties)| has_token(properties, token))
            .map(|(id, _)| id.as_str())
    }
}

/// Descriptive metadata pulled from the package document.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CoreMetadata {
    pub title: Option<String>,
    pub language: Option<String>,
    pub creators: Vec<String>,
    pub publisher: Option<String>,
    pub identifier: Option<String>,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub subjects: Vec<String>,
}

/// A resolved table-of-contents target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocLink {
    pub path: String,
    pub fragment: Option<String>,
    pub label: Option<String>,
}

impl TocLink {
    /// Split a resolved `path#fragment` target.
    pub fn from_target(target: &str, label: Option<String>) -> Self {
        let (path, fragment) = match target.split_once('#') {
            Some((path, fragment)) => (path.to_string(), Some(fragment.to_string())),
            None => (target.to_string(), None),
        };
        TocLink {
            path,
            fragment,
            label,
        }
    }

    /// The link target with its fragment reattached.
    pub fn target(&self) -> String {
        match &self.fragment {
            Some(fragment) => format!("{}#{fragment}", self.path),
            None => self.path.clone(),
        }
    }
}

/// Whitespace-separated token membership, as used by `properties` and
/// `epub:type` attributes.
pub(crate) fn has_token(value: &str, token: &str) -> bool {
    value.split_whitespace().any(|t| t == token)
}
