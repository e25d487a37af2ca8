//! Vaultgraph: link graph extraction for a vault of interlinked markdown pages
//!
//! Given an ordered set of pages (location, title, url, raw text) this crate
//! builds the node/link dataset behind an interactive page graph:
//!
//! 1. **Registration** -- Every page gets a normalized path key and a dense id
//!    in a per-build [`registry::PageRegistry`]
//! 2. **Extraction** -- Each page's text is scanned for `[[wikilinks]]` and
//!    `[inline](links)`; image embeds and external URLs are skipped
//! 3. **Resolution** -- Each target is matched to exactly one page by an ordered
//!    list of strategies (self-index, exact global, exact relative, directory
//!    index, shallowest suffix match); ties and misses become warnings
//! 4. **Accumulation** -- Resolved references become edges, and both endpoints'
//!    connection counts grow by one
//! 5. **Serialization** -- Nodes and links are written as `graph.json`
//!
//! # Architecture
//!
//! - **Owned build context** -- [`build::GraphBuild`] owns registry, edges and
//!   counters for exactly one run; nothing is shared between runs
//! - **Parallel resolution** -- Pages are scanned with rayon against the frozen
//!   registry; edges are accumulated afterwards in page order so output is
//!   deterministic
//! - **Pure strategies** -- Resolution phases are plain functions over the
//!   registry and can be reordered or extended in isolation
//!
//! # Key Modules
//!
//! - [`registry`] -- Path-key to page mapping and suffix search
//! - [`extract`] -- Reference scanning for both link syntaxes
//! - [`resolve`] -- Resolution strategies and warnings
//! - [`graph`] -- Edge accumulation, graph document and JSON writer
//! - [`build`] -- The per-run pipeline
//! - [`vault`] -- Loads a docs directory into pages
//! - [`paths`] -- Path-key normalization
//! - [`config`] -- Site configuration and constants
//!
//! # Example Usage
//!
//! ```bash
//! # Build using an mkdocs.yml for site name, url and directories
//! vaultgraph build -f mkdocs.yml
//!
//! # Report broken or ambiguous links only
//! vaultgraph check --docs-dir docs --site-name "My Notes"
//! ```

pub mod build;
pub mod config;
pub mod extract;
pub mod graph;
pub mod models;
pub mod paths;
pub mod registry;
pub mod resolve;
pub mod stats;
pub mod vault;
