use crate::models::{Page, PageId, PageSource};
use crate::paths;
use anyhow::{bail, Result};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Canonical set of pages for one build, addressable by path key and by id.
///
/// Ids are handed out densely in registration order, so a page's id is also
/// its position in [`PageRegistry::pages`].
pub struct PageRegistry {
    site_path: String,
    pages: Vec<Page>,
    key_to_id: FxHashMap<String, PageId>,
}

impl PageRegistry {
    pub fn new(site_path: impl Into<String>) -> Self {
        Self {
            site_path: site_path.into(),
            pages: Vec::new(),
            key_to_id: FxHashMap::default(),
        }
    }

    pub fn site_path(&self) -> &str {
        &self.site_path
    }

    /// Path key of `candidate` joined onto the site root.
    pub fn root_key(&self, candidate: &str) -> String {
        paths::normalize(&self.site_path, candidate)
    }

    /// Path key of `candidate` joined onto `base`, or onto the whole site path
    /// when `candidate` starts with `/`.
    pub fn relative_key(&self, base: &str, candidate: &str) -> String {
        if candidate.starts_with('/') {
            self.root_key(candidate)
        } else {
            paths::normalize(base, candidate)
        }
    }

    /// Fails if the page's path key is already taken; the registry is left untouched.
    pub fn register(&mut self, source: &PageSource) -> Result<PageId> {
        let path_key = self.root_key(&source.src_path);

        if let Some(&existing) = self.key_to_id.get(&path_key) {
            bail!(
                "Duplicate page identity '{}': {} collides with {}",
                path_key,
                source.src_path,
                self.pages[existing as usize].src_path
            );
        }

        let id = PageId::try_from(self.pages.len())?;
        debug!(id, key = %path_key, "Registered page");

        self.key_to_id.insert(path_key.clone(), id);
        self.pages.push(Page {
            id,
            path_key,
            src_path: source.src_path.clone(),
            title: source.title.clone(),
            url: source.url.clone(),
            is_index: source.is_index,
            connection_count: 0,
        });
        Ok(id)
    }

    pub fn exists(&self, path_key: &str) -> bool {
        self.key_to_id.contains_key(path_key)
    }

    pub fn lookup(&self, path_key: &str) -> Option<&Page> {
        self.key_to_id
            .get(path_key)
            .map(|&id| &self.pages[id as usize])
    }

    pub fn get(&self, id: PageId) -> Option<&Page> {
        self.pages.get(id as usize)
    }

    pub(crate) fn get_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.get_mut(id as usize)
    }

    /// Pages whose key ends with `candidate` on a segment boundary, in
    /// registration order.
    pub fn find_by_suffix(&self, candidate: &str) -> Vec<&Page> {
        self.pages
            .iter()
            .filter(|page| paths::ends_with_segments(&page.path_key, candidate))
            .collect()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
