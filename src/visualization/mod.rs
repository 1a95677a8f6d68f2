//! Graph visualization output.
//!
//! Renders a [`PropertyGraph`] into a uniquely named HTML file and keeps the
//! output directory bounded.

mod html;
mod retention;

pub use html::render;
pub use retention::prune;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::VisualizationConfig;
use crate::error::{VisualizationError, VisualizationResult};
use crate::graph::PropertyGraph;

/// Prefix shared by every generated file; retention only touches these.
pub const FILE_PREFIX: &str = "graph_";

/// Extension of generated files.
pub const FILE_EXTENSION: &str = "html";

/// A rendered visualization written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visualization {
    /// Random token embedded in the file name.
    pub id: String,
    /// Bare file name, e.g. `graph_1a2b3c4d.html`.
    pub file_name: String,
    /// Full path of the written file.
    pub path: PathBuf,
}

/// Writes rendered graphs under a directory.
#[derive(Debug, Clone)]
pub struct VisualizationEmitter {
    dir: PathBuf,
    max_files: usize,
    height_px: u32,
}

impl VisualizationEmitter {
    /// Create an emitter from configuration
    pub fn new(config: &VisualizationConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            max_files: config.max_files,
            height_px: config.height_px,
        }
    }

    /// Render `graph` and write it to a fresh file, then apply retention.
    pub async fn emit(&self, graph: &PropertyGraph) -> VisualizationResult<Visualization> {
        if graph.is_empty() {
            return Err(VisualizationError::EmptyGraph);
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let id = Uuid::new_v4().simple().to_string()[..8].to_string();
        let file_name = format!("{}{}.{}", FILE_PREFIX, id, FILE_EXTENSION);
        let path = self.dir.join(&file_name);

        let title = format!(
            "Logistics graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        let document = render(graph, &title, self.height_px)?;

        tokio::fs::write(&path, document)
            .await
            .map_err(|source| VisualizationError::Write {
                path: path.display().to_string(),
                source,
            })?;

        info!(
            path = %path.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph visualization written"
        );

        prune(&self.dir, self.max_files).await?;

        Ok(Visualization {
            id,
            file_name,
            path,
        })
    }
}

impl Visualization {
    /// Text handed back to the model after a successful render
    pub fn message(&self) -> String {
        format!("Graph visualization generated at: {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphElement;
    use serde_json::json;
    use std::path::Path;
    use tempfile::tempdir;

    fn emitter(dir: &Path, max_files: usize) -> VisualizationEmitter {
        VisualizationEmitter::new(&VisualizationConfig {
            dir: dir.to_path_buf(),
            max_files,
            height_px: 600,
        })
    }

    fn one_node_graph() -> PropertyGraph {
        let mut graph = PropertyGraph::new();
        graph.add_element(
            GraphElement::from_value(&json!({"identifier": "W1", "labels": ["Warehouses"]})).unwrap(),
        );
        graph
    }

    #[tokio::test]
    async fn test_emit_creates_directory_and_file() {
        let root = tempdir().unwrap();
        let dir = root.path().join("nested").join("visualizations");

        let viz = emitter(&dir, 10).emit(&one_node_graph()).await.unwrap();

        assert!(viz.path.exists());
        assert!(viz.file_name.starts_with("graph_"));
        assert!(viz.file_name.ends_with(".html"));
        assert_eq!(viz.id.len(), 8);
        assert_eq!(viz.path, dir.join(&viz.file_name));
        assert!(viz.message().starts_with("Graph visualization generated at: "));
    }

    #[tokio::test]
    async fn test_each_emit_writes_a_new_file() {
        let dir = tempdir().unwrap();
        let emitter = emitter(dir.path(), 0);

        let a = emitter.emit(&one_node_graph()).await.unwrap();
        let b = emitter.emit(&one_node_graph()).await.unwrap();

        assert_ne!(a.file_name, b.file_name);
        assert!(a.path.exists() && b.path.exists());
    }

    #[tokio::test]
    async fn test_empty_graph_is_rejected() {
        let dir = tempdir().unwrap();
        let result = emitter(dir.path(), 10).emit(&PropertyGraph::new()).await;
        assert!(matches!(result, Err(VisualizationError::EmptyGraph)));
    }
}
