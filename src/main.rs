use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use vaultgraph::build::{build_graph, GraphOutput};
use vaultgraph::config::SiteConfig;
use vaultgraph::graph::write_graph_json;
use vaultgraph::vault::load_vault;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "vaultgraph")]
#[command(about = "Build an interactive link graph from a vault of markdown pages")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph and write graph.json into the site directory
    Build(BuildArgs),
    /// Resolve all links and report ambiguous or broken ones without writing output
    Check(SiteArgs),
}

#[derive(Args)]
struct SiteArgs {
    /// Site config file (mkdocs.yml style); flags below override its values
    #[arg(short = 'f', long)]
    config_file: Option<PathBuf>,

    /// Directory holding the markdown pages
    #[arg(short, long)]
    docs_dir: Option<PathBuf>,

    /// Site name, used as the root of every page path
    #[arg(long)]
    site_name: Option<String>,

    /// Public site URL; its path prefixes every node URL
    #[arg(long)]
    site_url: Option<String>,
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Generated site directory (graph goes to assets/javascripts/graph.json)
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Write the graph to this file instead of the site directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dry run - don't write output files
    #[arg(long)]
    dry_run: bool,

    /// Fail if any link is ambiguous or unresolved
    #[arg(long)]
    strict: bool,
}

impl SiteArgs {
    fn resolve(&self) -> Result<SiteConfig> {
        let mut config = match &self.config_file {
            Some(path) => SiteConfig::from_yaml_file(path)?,
            None => SiteConfig::default(),
        };
        if let Some(name) = &self.site_name {
            config.site_name = name.clone();
        }
        if let Some(url) = &self.site_url {
            config.site_url = Some(url.clone());
        }
        if let Some(dir) = &self.docs_dir {
            config.docs_dir = dir.clone();
        }
        Ok(config)
    }
}

fn run_graph(config: &SiteConfig) -> Result<GraphOutput> {
    let pages = load_vault(config)
        .with_context(|| format!("Failed to load vault: {}", config.docs_dir.display()))?;
    build_graph(config, &pages)
}

fn print_summary(output: &GraphOutput, elapsed_secs: f64) {
    let stats = &output.stats;
    println!();
    println!("=== Summary ===");
    println!("Build time:         {:.2}s", elapsed_secs);
    println!("Pages:              {}", stats.pages());
    println!("References found:   {}", stats.references());
    println!("Edges:              {}", stats.edges());
    println!("Ambiguous links:    {}", stats.ambiguous());
    println!("Unresolved links:   {}", stats.unresolved());
}

fn run_build(args: BuildArgs) -> Result<()> {
    let mut config = args.site.resolve()?;
    if let Some(dir) = args.site_dir {
        config.site_dir = dir;
    }

    let start = Instant::now();
    let output = run_graph(&config)?;

    if !args.dry_run {
        let path = args.output.unwrap_or_else(|| config.graph_output_path());
        write_graph_json(&output.document, &path)?;
        info!(path = %path.display(), "Graph written");
    }

    print_summary(&output, start.elapsed().as_secs_f64());

    if args.strict && !output.warnings.is_empty() {
        bail!(
            "Aborted with {} link warning(s) in strict mode",
            output.warnings.len()
        );
    }
    Ok(())
}

fn run_check(args: SiteArgs) -> Result<()> {
    let config = args.resolve()?;
    let output = run_graph(&config)?;

    for warning in &output.warnings {
        println!("{}", warning);
    }
    if !output.warnings.is_empty() {
        bail!("{} link warning(s) found", output.warnings.len());
    }
    println!(
        "All {} references resolved across {} pages",
        output.stats.references(),
        output.stats.pages()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Build(args) => run_build(args),
        Commands::Check(args) => run_check(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
