//! Loads a docs directory into the ordered page list a build consumes.

use crate::config::{SiteConfig, INDEX_STEM, PROGRESS_INTERVAL, SOURCE_EXTENSION};
use crate::models::PageSource;
use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[ \t]+(.+?)[ \t#]*$").unwrap());

static FENCE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}(```|~~~)").unwrap());

const README_STEM: &str = "README";

#[derive(Deserialize, Default)]
struct FrontMatter {
    title: Option<String>,
}

/// Reads every markdown page under `config.docs_dir`. Any unreadable file
/// fails the whole load.
pub fn load_vault(config: &SiteConfig) -> Result<Vec<PageSource>> {
    let root = &config.docs_dir;
    if !root.is_dir() {
        bail!("Docs directory not found: {}", root.display());
    }

    let mut paths = Vec::new();
    collect_markdown_paths(root, &mut paths)?;

    let prefix = config.url_prefix();
    let pb = ProgressBar::new_spinner();
    let mut pages = Vec::with_capacity(paths.len());

    for (i, path) in paths.iter().enumerate() {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read page: {}", path.display()))?;
        let src_path = relative_src_path(root, path);
        pages.push(page_from_source(&src_path, text, &prefix));

        if i % PROGRESS_INTERVAL == 0 {
            pb.tick();
        }
    }

    pb.finish_and_clear();
    info!(pages = pages.len(), docs_dir = %root.display(), "Vault loaded");
    Ok(pages)
}

/// Builds a page from its docs-relative path and text.
pub fn page_from_source(src_path: &str, text: String, url_prefix: &str) -> PageSource {
    let stem = file_stem(src_path);
    let is_index = is_index_stem(stem);
    let title = page_title(&text).unwrap_or_else(|| fallback_title(stem, is_index));

    PageSource {
        src_path: src_path.to_string(),
        title,
        url: page_url(src_path, url_prefix),
        is_index,
        text,
    }
}

/// Recursively collects `*.md` paths. Within a directory: index page first,
/// then other pages by name, then subdirectories by name. Hidden entries and
/// symlinked directories are skipped; a `README.md` next to an `index.md` is dropped.
pub fn collect_markdown_paths(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))? {
        let entry = entry.with_context(|| format!("Failed to read entry in: {}", dir.display()))?;
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if hidden {
            continue;
        }

        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat: {}", path.display()))?;
        if file_type.is_dir() {
            dirs.push(path);
        } else if file_type.is_symlink() && path.is_dir() {
            debug!(path = %path.display(), "Skipping symlinked directory");
        } else if path.extension().and_then(|s| s.to_str()) == Some(&SOURCE_EXTENSION[1..]) {
            files.push(path);
        }
    }

    let has_index = files.iter().any(|path| stem_of(path) == INDEX_STEM);
    if has_index {
        files.retain(|path| {
            let shadowed = stem_of(path) == README_STEM;
            if shadowed {
                debug!(path = %path.display(), "README shadowed by index page");
            }
            !shadowed
        });
    }

    files.sort_by_cached_key(|path| (!is_index_stem(stem_of(path)), path.clone()));
    dirs.sort();

    out.extend(files);
    for sub in dirs {
        collect_markdown_paths(&sub, out)?;
    }
    Ok(())
}

fn relative_src_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn stem_of(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default()
}

fn file_stem(src_path: &str) -> &str {
    let name = src_path.rsplit('/').next().unwrap_or(src_path);
    name.strip_suffix(SOURCE_EXTENSION).unwrap_or(name)
}

fn is_index_stem(stem: &str) -> bool {
    stem == INDEX_STEM || stem == README_STEM
}

/// Front matter `title` wins over the first level-one heading.
fn page_title(text: &str) -> Option<String> {
    let (front_matter, body) = split_front_matter(text);
    if let Some(title) = front_matter.and_then(|fm| fm.title) {
        let title = title.trim();
        if !title.is_empty() {
            return Some(title.to_string());
        }
    }

    first_heading(body)
}

/// First level-one heading outside fenced code blocks.
fn first_heading(body: &str) -> Option<String> {
    let mut fence: Option<&str> = None;
    for line in body.lines() {
        if let Some(caps) = FENCE_REGEX.captures(line) {
            let marker = caps.get(1).map_or("", |m| m.as_str());
            match fence {
                None => fence = Some(marker),
                Some(open) if open == marker => fence = None,
                Some(_) => {}
            }
            continue;
        }
        if fence.is_some() {
            continue;
        }
        let title = HEADING_REGEX
            .captures(line)
            .map(|c| c[1].trim().to_string())
            .filter(|t| !t.is_empty());
        if title.is_some() {
            return title;
        }
    }
    None
}

fn split_front_matter(text: &str) -> (Option<FrontMatter>, &str) {
    let trimmed = text.trim_start_matches('\u{feff}');
    let Some(rest) = trimmed.strip_prefix("---\n").or_else(|| trimmed.strip_prefix("---\r\n")) else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let end = line.trim_end();
        if end == "---" || end == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (serde_yaml::from_str(yaml).ok(), body);
        }
        offset += line.len();
    }
    (None, text)
}

fn fallback_title(stem: &str, is_index: bool) -> String {
    if is_index {
        return "Home".to_string();
    }
    let spaced = stem.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

/// Directory-style URL: `a/b.md` -> `<prefix>a/b/`, `a/index.md` -> `<prefix>a/`.
fn page_url(src_path: &str, prefix: &str) -> String {
    let without_ext = src_path.strip_suffix(SOURCE_EXTENSION).unwrap_or(src_path);
    let mut segments: Vec<&str> = without_ext.split('/').filter(|s| !s.is_empty()).collect();
    if segments.last().is_some_and(|last| is_index_stem(last)) {
        segments.pop();
    }

    let mut url = prefix.to_string();
    for segment in segments {
        url.push_str(&urlencoding::encode(segment));
        url.push('/');
    }
    url
}
