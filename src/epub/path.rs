//! Archive-internal path algebra. Pure string functions, no I/O.

/// Directory part of an archive-internal path (everything before the last
/// `/`), or `""` when the path sits at the archive root.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Join a manifest href onto the package document directory.
///
/// Separators are normalized to `/` and leading slashes are stripped from the
/// result. `.` and `..` segments are left as written.
pub fn build_zip_path(dir: &str, href: &str) -> String {
    let href = href.replace('\\', "/");
    if dir.is_empty() || dir == "/" {
        return href.trim_start_matches('/').to_string();
    }

    let joined = format!("{}/{href}", dir.trim_end_matches('/'));
    joined.trim_start_matches('/').to_string()
}

/// Resolve a link found inside a resource against that resource's directory.
///
/// `.` and `..` segments are collapsed (`..` never climbs above the archive
/// root), an href starting with `/` is taken from the archive root, and a
/// `#fragment` survives resolution untouched.
pub fn resolve_zip_path(base_dir: &str, href: &str) -> String {
    let (href, fragment) = match href.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment).filter(|f| !f.is_empty())),
        None => (href, None),
    };
    let href = href.replace('\\', "/");
    let base_dir = base_dir.replace('\\', "/");

    let mut segments: Vec<&str> = Vec::new();
    let base_parts = if href.starts_with('/') {
        ""
    } else {
        base_dir.as_str()
    };
    for part in base_parts.split('/').chain(href.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(part),
        }
    }

    let mut resolved = segments.join("/");
    if let Some(fragment) = fragment {
        resolved.push('#');
        resolved.push_str(fragment);
    }
    resolved
}
