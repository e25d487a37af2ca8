use crate::models::{Edge, PageId};
use crate::registry::PageRegistry;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Append-only edge list for one build.
#[derive(Default)]
pub struct GraphAccumulator {
    edges: Vec<Edge>,
}

impl GraphAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one resolved reference and bumps both endpoints' connection
    /// counts (a self-link bumps its page twice). Both ids must be registered.
    pub fn record(
        &mut self,
        registry: &mut PageRegistry,
        source: PageId,
        target: PageId,
    ) -> Result<()> {
        if registry.get(source).is_none() || registry.get(target).is_none() {
            bail!(
                "Edge {} -> {} references a page outside the registry ({} pages)",
                source,
                target,
                registry.len()
            );
        }

        for id in [source, target] {
            if let Some(page) = registry.get_mut(id) {
                page.connection_count += 1;
            }
        }
        self.edges.push(Edge { source, target });
        Ok(())
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "symbolSize")]
    pub symbol_size: u32,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

/// The node/link document consumed by the graph front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphDocument {
    /// Nodes in registration order, links in resolution order. Page ids are
    /// dense from zero, so they double as node indices.
    pub fn from_parts(registry: &PageRegistry, edges: &[Edge]) -> Self {
        let nodes = registry
            .pages()
            .iter()
            .map(|page| GraphNode {
                id: page.id.to_string(),
                name: page.title.clone(),
                symbol_size: page.connection_count,
                value: page.url.clone(),
            })
            .collect();

        let links = edges
            .iter()
            .map(|edge| GraphLink {
                source: edge.source.to_string(),
                target: edge.target.to_string(),
            })
            .collect();

        Self { nodes, links }
    }

    pub fn node_by_name(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

/// Writes the document as two-space indented JSON, creating parent directories.
pub fn write_graph_json(doc: &GraphDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create graph file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, doc).context("Failed to serialize graph")?;
    writer.flush()?;
    Ok(())
}
