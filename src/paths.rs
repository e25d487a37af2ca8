use crate::config::SOURCE_EXTENSION;

/// Joins `candidate` onto `base` the way a browser resolves a relative link,
/// then strips the source extension and any trailing slash.
///
/// A base ending in `/` is a directory; otherwise its last segment is a file
/// and the join happens against its parent. `.` and `..` segments are
/// collapsed; `..` never climbs above the root. Empty segments are dropped,
/// so rooting a candidate is up to the caller (see `PageRegistry::relative_key`).
///
/// Examples:
/// - `("Site/", "Usage/ECharts.md")` -> `"Site/Usage/ECharts"`
/// - `("Site/Notes/Source", "../Ideas")` -> `"Site/Ideas"`
/// - `("Site/Notes/Source", "Sibling")` -> `"Site/Notes/Sibling"`
pub fn normalize(base: &str, candidate: &str) -> String {
    let dir = match base.rfind('/') {
        Some(pos) => &base[..pos],
        None => "",
    };
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();

    for part in candidate.split('/') {
        match part {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            _ => segments.push(part),
        }
    }

    let joined = segments.join("/");
    strip_extension(&joined).to_string()
}

pub fn strip_extension(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    path.strip_suffix(SOURCE_EXTENSION).unwrap_or(path)
}

/// Number of separators in a path key; shallower keys win fuzzy matches.
pub fn depth(path_key: &str) -> usize {
    path_key.bytes().filter(|&b| b == b'/').count()
}

/// True when `path_key` ends with `target` on a segment boundary.
pub fn ends_with_segments(path_key: &str, target: &str) -> bool {
    let target = target.trim_matches('/');
    if target.is_empty() {
        return false;
    }
    match path_key.strip_suffix(target) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('/'),
        None => false,
    }
}
