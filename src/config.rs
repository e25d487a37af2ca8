use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Graph output location, relative to the generated site directory
pub const GRAPH_OUTPUT_PATH: &str = "assets/javascripts/graph.json";

/// Source-file extension stripped from path keys and link targets
pub const SOURCE_EXTENSION: &str = ".md";

/// Stem of a directory's home page
pub const INDEX_STEM: &str = "index";

/// Progress update interval (tick every N pages)
pub const PROGRESS_INTERVAL: usize = 100;

pub const DEFAULT_SITE_NAME: &str = "Site";
pub const DEFAULT_DOCS_DIR: &str = "docs";
pub const DEFAULT_SITE_DIR: &str = "site";

/// Everything a graph build needs to know about the surrounding site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site_name: String,
    pub site_url: Option<String>,
    pub docs_dir: PathBuf,
    pub site_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_string(),
            site_url: None,
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
            site_dir: PathBuf::from(DEFAULT_SITE_DIR),
        }
    }
}

/// Subset of an `mkdocs.yml` we care about; everything else is ignored.
#[derive(Deserialize)]
struct SiteConfigFile {
    site_name: Option<String>,
    site_url: Option<String>,
    docs_dir: Option<String>,
    site_dir: Option<String>,
}

impl SiteConfig {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            ..Self::default()
        }
    }

    /// Loads a YAML site config. Relative `docs_dir`/`site_dir` are resolved
    /// against the directory holding the file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_yaml_str(&raw, base)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str, base: &Path) -> Result<Self> {
        let file: SiteConfigFile = serde_yaml::from_str(raw)?;
        let resolve = |dir: Option<String>, default: &str| {
            let dir = PathBuf::from(dir.unwrap_or_else(|| default.to_string()));
            if dir.is_absolute() {
                dir
            } else {
                base.join(dir)
            }
        };

        Ok(Self {
            site_name: file
                .site_name
                .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            site_url: file.site_url,
            docs_dir: resolve(file.docs_dir, DEFAULT_DOCS_DIR),
            site_dir: resolve(file.site_dir, DEFAULT_SITE_DIR),
        })
    }

    /// Base every path key is joined onto: the site name plus a trailing slash.
    pub fn site_path(&self) -> String {
        format!("{}/", self.site_name)
    }

    /// Path component of `site_url`, always starting and ending with `/`.
    pub fn url_prefix(&self) -> String {
        let path = self
            .site_url
            .as_deref()
            .map(strip_origin)
            .unwrap_or("/");
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        }
    }

    pub fn graph_output_path(&self) -> PathBuf {
        self.site_dir.join(GRAPH_OUTPUT_PATH)
    }
}

/// `https://host:port/a/b/` -> `/a/b/`; anything without a scheme is taken as a path.
fn strip_origin(url: &str) -> &str {
    match url.find("://") {
        Some(pos) => {
            let rest = &url[pos + 3..];
            rest.find('/').map(|slash| &rest[slash..]).unwrap_or("/")
        }
        None => url,
    }
}
