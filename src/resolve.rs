//! Turns a reference target into one page of the registry.
//!
//! Resolution is an ordered list of strategies, each a pure function over the
//! registry; the first one that produces a match wins:
//!
//! 1. `self-index` -- a wikilink to `index` from an index page is a self-link
//! 2. `exact-global` -- the target joined onto the site root is a page
//! 3. `exact-relative` -- the target joined onto the referring page is a page
//! 4. `index-global` / `index-relative` -- same, for `<target>/index`
//! 5. `best-partial` -- the shallowest page whose key ends with the target

use crate::config::INDEX_STEM;
use crate::models::{Page, PageId, RawReference, ReferenceKind};
use crate::paths;
use crate::registry::PageRegistry;
use std::fmt;
use tracing::trace;

/// What a strategy sees of a reference.
pub struct Lookup<'a> {
    pub source: &'a Page,
    pub kind: ReferenceKind,
    pub target: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found {
        target: PageId,
        strategy: &'static str,
    },
    /// Several equally shallow candidates; `target` is one of `candidates`.
    Ambiguous {
        target: PageId,
        candidates: Vec<PageId>,
    },
    Unresolved,
}

impl Resolution {
    pub fn target(&self) -> Option<PageId> {
        match self {
            Resolution::Found { target, .. } | Resolution::Ambiguous { target, .. } => {
                Some(*target)
            }
            Resolution::Unresolved => None,
        }
    }
}

pub type StrategyFn = fn(&PageRegistry, &Lookup<'_>) -> Option<Resolution>;

#[derive(Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub run: StrategyFn,
}

pub const DEFAULT_STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "self-index",
        run: self_index,
    },
    Strategy {
        name: "exact-global",
        run: exact_global,
    },
    Strategy {
        name: "exact-relative",
        run: exact_relative,
    },
    Strategy {
        name: "index-global",
        run: index_global,
    },
    Strategy {
        name: "index-relative",
        run: index_relative,
    },
    Strategy {
        name: "best-partial",
        run: best_partial,
    },
];

pub struct ReferenceResolver<'r> {
    registry: &'r PageRegistry,
    strategies: Vec<Strategy>,
}

impl<'r> ReferenceResolver<'r> {
    pub fn new(registry: &'r PageRegistry) -> Self {
        Self::with_strategies(registry, DEFAULT_STRATEGIES.to_vec())
    }

    pub fn with_strategies(registry: &'r PageRegistry, strategies: Vec<Strategy>) -> Self {
        Self {
            registry,
            strategies,
        }
    }

    pub fn resolve(&self, source: &Page, reference: &RawReference<'_>) -> Resolution {
        let lookup = Lookup {
            source,
            kind: reference.kind,
            target: &reference.target,
        };

        for strategy in &self.strategies {
            if let Some(resolution) = (strategy.run)(self.registry, &lookup) {
                trace!(
                    page = %source.path_key,
                    link = %reference.target,
                    strategy = strategy.name,
                    "Reference resolved"
                );
                return resolution;
            }
        }
        Resolution::Unresolved
    }
}

fn found(page: &Page, strategy: &'static str) -> Resolution {
    Resolution::Found {
        target: page.id,
        strategy,
    }
}

pub fn self_index(_registry: &PageRegistry, lookup: &Lookup<'_>) -> Option<Resolution> {
    let is_self = lookup.kind == ReferenceKind::Wikilink
        && lookup.target == INDEX_STEM
        && lookup.source.is_index;
    is_self.then(|| found(lookup.source, "self-index"))
}

pub fn exact_global(registry: &PageRegistry, lookup: &Lookup<'_>) -> Option<Resolution> {
    registry
        .lookup(&registry.root_key(lookup.target))
        .map(|page| found(page, "exact-global"))
}

pub fn exact_relative(registry: &PageRegistry, lookup: &Lookup<'_>) -> Option<Resolution> {
    registry
        .lookup(&registry.relative_key(&lookup.source.path_key, lookup.target))
        .map(|page| found(page, "exact-relative"))
}

pub fn index_global(registry: &PageRegistry, lookup: &Lookup<'_>) -> Option<Resolution> {
    let candidate = index_candidate(lookup.target);
    registry
        .lookup(&registry.root_key(&candidate))
        .map(|page| found(page, "index-global"))
}

pub fn index_relative(registry: &PageRegistry, lookup: &Lookup<'_>) -> Option<Resolution> {
    let candidate = index_candidate(lookup.target);
    registry
        .lookup(&registry.relative_key(&lookup.source.path_key, &candidate))
        .map(|page| found(page, "index-relative"))
}

fn index_candidate(target: &str) -> String {
    format!("{}/{}", paths::strip_extension(target), INDEX_STEM)
}

/// Collects every suffix match with its depth, then decides once: the
/// shallowest wins, and a tie at that depth is reported as ambiguous.
pub fn best_partial(registry: &PageRegistry, lookup: &Lookup<'_>) -> Option<Resolution> {
    let target = paths::strip_extension(lookup.target);
    let candidates: Vec<(usize, PageId)> = registry
        .find_by_suffix(target)
        .into_iter()
        .map(|page| (paths::depth(&page.path_key), page.id))
        .collect();

    let min_depth = candidates.iter().map(|&(depth, _)| depth).min()?;
    let tied: Vec<PageId> = candidates
        .into_iter()
        .filter(|&(depth, _)| depth == min_depth)
        .map(|(_, id)| id)
        .collect();

    match tied.as_slice() {
        [only] => Some(Resolution::Found {
            target: *only,
            strategy: "best-partial",
        }),
        _ => Some(Resolution::Ambiguous {
            target: tied[0],
            candidates: tied,
        }),
    }
}

/// Recoverable problems met while resolving; each carries the referring page
/// and the target as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionWarning {
    Ambiguous {
        source: String,
        target: String,
        candidates: Vec<String>,
    },
    Unresolved {
        source: String,
        target: String,
    },
}

impl ResolutionWarning {
    pub fn source(&self) -> &str {
        match self {
            ResolutionWarning::Ambiguous { source, .. }
            | ResolutionWarning::Unresolved { source, .. } => source,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            ResolutionWarning::Ambiguous { target, .. }
            | ResolutionWarning::Unresolved { target, .. } => target,
        }
    }
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionWarning::Ambiguous {
                source,
                target,
                candidates,
            } => write!(
                f,
                "{}: ambiguous link '{}' (candidates: {})",
                source,
                target,
                candidates.join(", ")
            ),
            ResolutionWarning::Unresolved { source, target } => {
                write!(f, "{}: no target page found for link '{}'", source, target)
            }
        }
    }
}
