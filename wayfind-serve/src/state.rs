//! Shared server state
//!
//! The graph sits behind a read-write lock: route queries share the read
//! side, editor calls and reloads take the write side. Locks are never held
//! across an await point.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::path::{Path, PathBuf};
use wayfind_common::Result;
use wayfind_graph::{inspect, Graph, MapDocument, Report};

pub struct AppState {
    graph: RwLock<Graph>,
    map_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(graph: Graph, map_path: Option<PathBuf>) -> Self {
        Self {
            graph: RwLock::new(graph),
            map_path,
        }
    }

    /// Read the map document at `path` and remember it for reloads
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let graph = Graph::from_document(MapDocument::from_path(&path)?)?;
        log_report(&inspect(&graph));
        Ok(Self::new(graph, Some(path)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Graph> {
        self.graph.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Graph> {
        self.graph.write()
    }

    pub fn map_path(&self) -> Option<&Path> {
        self.map_path.as_deref()
    }

    /// Swap in a new document. On error the current graph stays in place.
    pub fn replace(&self, doc: MapDocument) -> Result<Report> {
        let mut graph = self.graph.write();
        graph.load_document(doc)?;
        let report = inspect(&graph);
        drop(graph);

        log_report(&report);
        Ok(report)
    }

    /// Re-read the configured map file; `None` when there is none
    pub fn reload(&self) -> Option<Result<Report>> {
        let path = self.map_path.as_ref()?;
        Some(MapDocument::from_path(path).and_then(|doc| self.replace(doc)))
    }
}

fn log_report(report: &Report) {
    tracing::info!(
        nodes = report.node_count,
        edges = report.edge_count,
        floors = report.floors.len(),
        "map loaded"
    );
    if !report.is_clean() {
        tracing::warn!(
            dangling = report.dangling_edges.len(),
            invalid_links = report.invalid_links.len(),
            "map has edges the router will ignore"
        );
    }
}
