//! Command-line interface

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing::debug;
use wayfind_graph::{inspect, Graph, MapDocument};
use wayfind_route::{PathEngine, Role, NO_ROUTE_MESSAGE};
use wayfind_serve::ServeConfig;

#[derive(Parser)]
#[command(name = "wayfind")]
#[command(about = "Indoor wayfinding for multi-floor buildings", version, long_about = None)]
pub struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, env = "WAYFIND_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server with OpenAPI docs
    Serve {
        /// Map document (JSON with nodes, edges and floorLabels)
        #[arg(short, long, env = "WAYFIND_MAP")]
        map: Option<PathBuf>,

        /// Address to bind
        #[arg(long, env = "WAYFIND_BIND", default_value = "0.0.0.0")]
        bind: IpAddr,

        /// Port to listen on
        #[arg(short, long, env = "WAYFIND_PORT", default_value_t = 8080)]
        port: u16,
    },

    /// Find a route between two rooms and print the steps
    Route {
        #[arg(short, long, env = "WAYFIND_MAP")]
        map: PathBuf,

        /// Start room id
        #[arg(long)]
        from: String,

        /// Destination room id
        #[arg(long)]
        to: String,

        /// student, pwd-student, employee or admin
        #[arg(long, default_value = "student")]
        role: Role,
    },

    /// Validate a map document and report problems
    Check {
        #[arg(short, long, env = "WAYFIND_MAP")]
        map: PathBuf,
    },
}

impl Commands {
    pub async fn run(self) -> Result<()> {
        match self {
            Commands::Serve { map, bind, port } => {
                let config = ServeConfig {
                    map_path: map,
                    bind,
                    port,
                };
                wayfind_serve::serve(config).await
            }
            Commands::Route {
                map,
                from,
                to,
                role,
            } => run_route(&map, &from, &to, role),
            Commands::Check { map } => run_check(&map),
        }
    }
}

fn load_graph(path: &Path) -> Result<Graph> {
    let doc = MapDocument::from_path(path)
        .with_context(|| format!("Failed to read map document {}", path.display()))?;
    let graph = Graph::from_document(doc)
        .with_context(|| format!("Invalid map document {}", path.display()))?;
    debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Loaded map document"
    );
    Ok(graph)
}

fn run_route(map: &Path, from: &str, to: &str, role: Role) -> Result<()> {
    let graph = load_graph(map)?;
    let plan = match PathEngine::new(&graph).plan(from, to, role) {
        Ok(Some(plan)) => plan,
        Ok(None) => {
            println!("{NO_ROUTE_MESSAGE}");
            return Ok(());
        }
        Err(e) => return Err(e).context("Route query rejected"),
    };

    println!("Route for {} (cost {}):", role.label(), plan.cost);
    for segment in &plan.segments {
        println!("  {}: {}", graph.floor_label(segment.floor), segment.node_ids.join(" -> "));
    }
    println!();
    for (i, step) in plan.instructions.iter().enumerate() {
        println!("{:>3}. {}", i + 1, step.text());
    }
    Ok(())
}

fn run_check(map: &Path) -> Result<()> {
    let graph = load_graph(map)?;
    let report = inspect(&graph);

    println!("Nodes:  {}", report.node_count);
    println!("Edges:  {}", report.edge_count);
    let floors: Vec<String> = report
        .floors
        .iter()
        .map(|f| format!("{} ({})", f, graph.floor_label(*f)))
        .collect();
    println!("Floors: {}", floors.join(", "));
    println!("Rooms:  {}", graph.rooms().len());

    for edge in &report.dangling_edges {
        println!("dangling edge: {} - {}", edge.source, edge.target);
    }
    for edge in &report.invalid_links {
        println!("invalid cross-floor link: {} - {}", edge.source, edge.target);
    }
    for id in &report.isolated_nodes {
        println!("isolated node: {id}");
    }

    if !report.is_clean() {
        bail!(
            "{} dangling edge(s), {} invalid link(s)",
            report.dangling_edges.len(),
            report.invalid_links.len()
        );
    }
    println!("OK");
    Ok(())
}
