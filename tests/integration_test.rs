//! End-to-end tests for the vaultgraph pipeline.
//!
//! Each test scaffolds a docs directory on disk, loads it with `load_vault`,
//! runs a full build and checks the resulting graph document (and, where
//! relevant, the `graph.json` written into the site directory).
//!
//! # Sample Data
//!
//! `demo_vault()` mirrors the interactive graph demo site:
//! - `index.md` ("Welcome") links to six pages, one of them by a bare name
//!   (`[[Setup]]`) that only a suffix match can find
//! - `Concept.md` links to `Usage/ECharts`, making it the only leaf with two
//!   connections
//!
//! Links are compared by node name rather than id so the assertions read like
//! the topology they describe.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vaultgraph::build::{build_graph, GraphOutput};
use vaultgraph::config::SiteConfig;
use vaultgraph::graph::{write_graph_json, GraphDocument};
use vaultgraph::resolve::ResolutionWarning;
use vaultgraph::vault::load_vault;

/// Helper: write `files` (relative path, content) under a fresh docs dir.
fn create_vault(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let docs = dir.path().join("docs");
    for (path, content) in files {
        let full = docs.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
    dir
}

fn site_config(root: &Path, site_name: &str) -> SiteConfig {
    let mut config = SiteConfig::new(site_name);
    config.site_url = Some("https://example.com/".to_string());
    config.docs_dir = root.join("docs");
    config.site_dir = root.join("site");
    config
}

fn run(root: &Path, site_name: &str) -> GraphOutput {
    let config = site_config(root, site_name);
    let pages = load_vault(&config).unwrap();
    build_graph(&config, &pages).unwrap()
}

fn demo_vault() -> TempDir {
    create_vault(&[
        (
            "index.md",
            "\n# Welcome\n- [[Concept]]\n- [[Docker]]\n- [[Installation]]\n- [[References]]\n- [[Usage/ECharts]]\n- [[Setup]]\n",
        ),
        ("Concept.md", "# Concept\nSee [[Usage/ECharts]]"),
        ("Docker.md", "# Docker"),
        ("Installation.md", "# Installation"),
        ("References.md", "# References"),
        ("Usage/ECharts.md", "# ECharts"),
        ("Usage/Setup.md", "# Setup"),
    ])
}

/// Links as (source name, target name) pairs.
fn named_links(doc: &GraphDocument) -> Vec<(String, String)> {
    let name_of = |id: &str| {
        doc.nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.name.clone())
            .unwrap()
    };
    doc.links
        .iter()
        .map(|l| (name_of(&l.source), name_of(&l.target)))
        .collect()
}

fn assert_no_phantoms(doc: &GraphDocument) {
    let ids: HashSet<&str> = doc.nodes.iter().map(|n| n.id.as_str()).collect();
    for link in &doc.links {
        assert!(ids.contains(link.source.as_str()), "phantom source {}", link.source);
        assert!(ids.contains(link.target.as_str()), "phantom target {}", link.target);
    }
}

fn assert_symmetry(doc: &GraphDocument) {
    for node in &doc.nodes {
        let touching = doc
            .links
            .iter()
            .map(|l| (l.source == node.id) as u32 + (l.target == node.id) as u32)
            .sum::<u32>();
        assert_eq!(node.symbol_size, touching, "symbolSize of {}", node.name);
    }
}

// ---------------------------------------------------------------------------
// Demo topology
// ---------------------------------------------------------------------------

#[test]
fn demo_vault_reproduces_reference_topology() {
    let dir = demo_vault();
    let output = run(dir.path(), "Interactive Graph Demo");
    let doc = &output.document;

    let expected_nodes = [
        ("Welcome", 6, "/"),
        ("Concept", 2, "/Concept/"),
        ("Docker", 1, "/Docker/"),
        ("Installation", 1, "/Installation/"),
        ("References", 1, "/References/"),
        ("ECharts", 2, "/Usage/ECharts/"),
        ("Setup", 1, "/Usage/Setup/"),
    ];
    assert_eq!(doc.nodes.len(), expected_nodes.len());
    for (i, (name, size, url)) in expected_nodes.iter().enumerate() {
        let node = &doc.nodes[i];
        assert_eq!(node.id, i.to_string());
        assert_eq!(node.name, *name);
        assert_eq!(node.symbol_size, *size, "symbolSize of {}", name);
        assert_eq!(node.value, *url);
    }

    let expected_links: Vec<(String, String)> = [
        ("Welcome", "Concept"),
        ("Welcome", "Docker"),
        ("Welcome", "Installation"),
        ("Welcome", "References"),
        ("Welcome", "ECharts"),
        ("Welcome", "Setup"),
        ("Concept", "ECharts"),
    ]
    .iter()
    .map(|(s, t)| (s.to_string(), t.to_string()))
    .collect();
    assert_eq!(named_links(doc), expected_links);

    assert!(output.warnings.is_empty());
    assert_no_phantoms(doc);
    assert_symmetry(doc);
}

#[test]
fn demo_vault_writes_graph_json() {
    let dir = demo_vault();
    let config = site_config(dir.path(), "Interactive Graph Demo");
    let pages = load_vault(&config).unwrap();
    let output = build_graph(&config, &pages).unwrap();

    let path = config.graph_output_path();
    write_graph_json(&output.document, &path).unwrap();

    assert!(dir.path().join("site/assets/javascripts/graph.json").exists());
    let raw = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(object["nodes"].as_array().unwrap().len(), 7);
    assert_eq!(object["links"].as_array().unwrap().len(), 7);
    assert_eq!(object["nodes"][0]["symbolSize"], 6);
    assert_eq!(object["links"][0]["source"], "0");
}

// ---------------------------------------------------------------------------
// Scale
// ---------------------------------------------------------------------------

#[test]
fn hundred_page_cycle() {
    let files: Vec<(String, String)> = (0..100)
        .map(|i| {
            let target = (i + 1) % 100;
            (
                format!("page_{}.md", i),
                format!("# Page {}\n\nLink to [[page_{}]]", i, target),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str)> = files
        .iter()
        .map(|(p, c)| (p.as_str(), c.as_str()))
        .collect();
    let dir = create_vault(&borrowed);

    let output = run(dir.path(), "PerfTest");
    let doc = &output.document;

    assert_eq!(doc.nodes.len(), 100);
    assert_eq!(doc.links.len(), 100);
    assert!(doc.nodes.iter().all(|n| n.symbol_size == 2));
    assert!(output.warnings.is_empty());
    assert_no_phantoms(doc);
    assert_symmetry(doc);
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

#[test]
fn unresolved_reference_leaves_graph_untouched() {
    let dir = create_vault(&[
        ("index.md", "# Home\n[[Nowhere]]\n[Other](Other.md)"),
        ("Other.md", "# Other"),
    ]);
    let output = run(dir.path(), "Site");
    let doc = &output.document;

    assert_eq!(doc.nodes.len(), 2);
    assert_eq!(doc.links.len(), 1);
    assert_eq!(doc.node_by_name("Home").unwrap().symbol_size, 1);
    assert_eq!(
        output.warnings,
        vec![ResolutionWarning::Unresolved {
            source: "index.md".to_string(),
            target: "Nowhere".to_string(),
        }]
    );
}

#[test]
fn shallower_match_preferred_and_ties_warn() {
    let dir = create_vault(&[
        ("index.md", "# Home\n[[Guide]]\n[[Note]]"),
        ("docs/Guide.md", "# Shallow Guide"),
        ("docs/deep/Guide.md", "# Deep Guide"),
        ("a/Note.md", "# Note A"),
        ("b/Note.md", "# Note B"),
    ]);
    let output = run(dir.path(), "Site");
    let links = named_links(&output.document);

    assert_eq!(links[0], ("Home".to_string(), "Shallow Guide".to_string()));
    assert!(links[1].1 == "Note A" || links[1].1 == "Note B");

    let ambiguous: Vec<_> = output
        .warnings
        .iter()
        .filter(|w| matches!(w, ResolutionWarning::Ambiguous { .. }))
        .collect();
    assert_eq!(ambiguous.len(), 1);
    assert_eq!(ambiguous[0].target(), "Note");
    assert_eq!(ambiguous[0].source(), "index.md");
}

// ---------------------------------------------------------------------------
// Link syntax
// ---------------------------------------------------------------------------

#[test]
fn inline_links_resolve_relative_to_page() {
    let dir = create_vault(&[
        ("index.md", "# Home"),
        (
            "Usage/index.md",
            "# Usage\n[setup](Setup.md \"Setup guide\")\n[home](../index.md)\n[ext](https://example.org/Setup)",
        ),
        ("Usage/Setup.md", "# Setup\n![diagram](diagram.png)\n[[index]]"),
    ]);
    let output = run(dir.path(), "Site");
    let links = named_links(&output.document);

    assert_eq!(
        links,
        vec![
            ("Usage".to_string(), "Setup".to_string()),
            ("Usage".to_string(), "Home".to_string()),
            ("Setup".to_string(), "Home".to_string()),
        ]
    );
    assert!(output.warnings.is_empty());
}

#[test]
fn index_wikilink_from_index_page_is_self_link() {
    let dir = create_vault(&[
        ("index.md", "# Home\n[[index]]"),
        ("Section/index.md", "# Section\n[[index]]"),
        ("Other/index.md", "# Other"),
    ]);
    let output = run(dir.path(), "Site");
    let links = named_links(&output.document);

    assert_eq!(
        links,
        vec![
            ("Home".to_string(), "Home".to_string()),
            ("Section".to_string(), "Section".to_string()),
        ]
    );
    assert_eq!(output.document.node_by_name("Section").unwrap().symbol_size, 2);
    assert_symmetry(&output.document);
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn missing_docs_dir_fails() {
    let dir = TempDir::new().unwrap();
    let config = site_config(dir.path(), "Site");
    assert!(load_vault(&config).is_err());
}

#[test]
fn config_file_drives_build() {
    let dir = demo_vault();
    let config_path = dir.path().join("mkdocs.yml");
    fs::write(
        &config_path,
        "site_name: Interactive Graph Demo\nsite_url: https://example.com/wiki/\nplugins:\n  - search\n",
    )
    .unwrap();

    let config = SiteConfig::from_yaml_file(&config_path).unwrap();
    assert_eq!(config.docs_dir, dir.path().join("docs"));

    let pages = load_vault(&config).unwrap();
    let output = build_graph(&config, &pages).unwrap();
    assert_eq!(output.document.nodes[1].value, "/wiki/Concept/");
    assert_eq!(output.document.links.len(), 7);
}
