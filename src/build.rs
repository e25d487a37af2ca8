use crate::config::SiteConfig;
use crate::extract::extract_references;
use crate::graph::{GraphAccumulator, GraphDocument};
use crate::models::{PageId, PageSource};
use crate::registry::PageRegistry;
use crate::resolve::{ReferenceResolver, Resolution, ResolutionWarning};
use crate::stats::BuildStats;
use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Owned state of a single graph build. Constructed fresh per run, consumed
/// by [`GraphBuild::run`]; nothing outlives it except the returned output.
pub struct GraphBuild {
    registry: PageRegistry,
    accumulator: GraphAccumulator,
    stats: BuildStats,
    warnings: Vec<ResolutionWarning>,
}

/// Result of a build: the document plus everything worth reporting.
pub struct GraphOutput {
    pub document: GraphDocument,
    pub warnings: Vec<ResolutionWarning>,
    pub stats: BuildStats,
}

/// One reference after resolution, before it reaches the accumulator.
struct ResolvedReference {
    source: PageId,
    target: Option<PageId>,
    warning: Option<ResolutionWarning>,
}

impl GraphBuild {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            registry: PageRegistry::new(config.site_path()),
            accumulator: GraphAccumulator::new(),
            stats: BuildStats::new(),
            warnings: Vec::new(),
        }
    }

    /// Registers every page, resolves references of all pages in parallel
    /// against the frozen registry, then accumulates edges in page order.
    pub fn run(mut self, pages: &[PageSource]) -> Result<GraphOutput> {
        let mut ids = Vec::with_capacity(pages.len());
        for page in pages {
            let id = self
                .registry
                .register(page)
                .context("Failed to register pages")?;
            ids.push(id);
            self.stats.inc_pages();
        }
        info!(pages = self.registry.len(), "Registry populated");

        let per_page: Vec<Vec<ResolvedReference>> = {
            let registry = &self.registry;
            let resolver = ReferenceResolver::new(registry);
            let stats = &self.stats;

            pages
                .par_iter()
                .zip(ids.par_iter())
                .map(|(page, &id)| resolve_page(registry, &resolver, stats, id, &page.text))
                .collect()
        };

        for resolved in per_page.into_iter().flatten() {
            if let Some(warning) = resolved.warning {
                match &warning {
                    ResolutionWarning::Ambiguous { .. } => self.stats.inc_ambiguous(),
                    ResolutionWarning::Unresolved { .. } => self.stats.inc_unresolved(),
                }
                warn!(
                    page = warning.source(),
                    link = warning.target(),
                    "[Graph] {}",
                    warning
                );
                self.warnings.push(warning);
            }

            if let Some(target) = resolved.target {
                self.accumulator
                    .record(&mut self.registry, resolved.source, target)?;
                self.stats.inc_edges();
            }
        }

        info!(
            nodes = self.registry.len(),
            edges = self.accumulator.len(),
            warnings = self.warnings.len(),
            "Graph built"
        );

        let document = GraphDocument::from_parts(&self.registry, self.accumulator.edges());
        Ok(GraphOutput {
            document,
            warnings: self.warnings,
            stats: self.stats,
        })
    }
}

/// Convenience wrapper for a one-shot build.
pub fn build_graph(config: &SiteConfig, pages: &[PageSource]) -> Result<GraphOutput> {
    GraphBuild::new(config).run(pages)
}

fn resolve_page(
    registry: &PageRegistry,
    resolver: &ReferenceResolver<'_>,
    stats: &BuildStats,
    id: PageId,
    text: &str,
) -> Vec<ResolvedReference> {
    let Some(source) = registry.get(id) else {
        return Vec::new();
    };

    let resolved: Vec<ResolvedReference> = extract_references(text)
        .map(|reference| {
            let resolution = resolver.resolve(source, &reference);
            let target = resolution.target();
            let warning = match resolution {
                Resolution::Found { .. } => None,
                Resolution::Ambiguous { candidates, .. } => Some(ResolutionWarning::Ambiguous {
                    source: source.src_path.clone(),
                    target: reference.raw_target.to_string(),
                    candidates: candidates
                        .iter()
                        .filter_map(|&c| registry.get(c))
                        .map(|p| p.path_key.clone())
                        .collect(),
                }),
                Resolution::Unresolved => Some(ResolutionWarning::Unresolved {
                    source: source.src_path.clone(),
                    target: reference.raw_target.to_string(),
                }),
            };
            ResolvedReference {
                source: id,
                target,
                warning,
            }
        })
        .collect();

    debug!(page = %source.src_path, references = resolved.len(), "Page scanned");
    stats.add_references(resolved.len() as u64);
    resolved
}
