use serde_json::Value;
use tracing::debug;

use super::{GraphElement, PropertyGraph};
use crate::database::Row;

/// How many raw rows to keep for the empty-result diagnostic.
const SAMPLE_ROWS: usize = 2;

/// Result of reconstructing a graph from query rows.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphOutcome {
    /// At least one node or edge was recognized.
    Graph(PropertyGraph),
    /// No graph element could be parsed out of the rows.
    Empty {
        /// Number of rows the query returned.
        row_count: usize,
        /// First few raw rows, for debugging `TO_JSON` projections.
        sample: Vec<Row>,
    },
}

impl GraphOutcome {
    /// Informational text for the empty case, `None` when a graph was built.
    pub fn empty_message(&self) -> Option<String> {
        match self {
            GraphOutcome::Graph(_) => None,
            GraphOutcome::Empty { row_count, sample } => Some(format!(
                "Query returned {} rows but no graph elements could be parsed. Raw Results: {}",
                row_count,
                Value::Array(sample.iter().cloned().map(Value::Object).collect())
            )),
        }
    }
}

/// Rebuild a directed multigraph from graph-query rows.
///
/// Every value of every row is inspected; scalar columns are skipped and
/// structured ones are decoded with [`GraphElement::from_value`].
pub fn interpret(rows: &[Row]) -> GraphOutcome {
    let mut graph = PropertyGraph::new();
    let mut skipped = 0usize;

    for value in rows.iter().flat_map(|row| row.values()) {
        if !value.is_object() {
            skipped += 1;
            continue;
        }

        match GraphElement::from_value(value) {
            Some(element) => graph.add_element(element),
            None => skipped += 1,
        }
    }

    debug!(
        rows = rows.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        skipped,
        "Interpreted graph query result"
    );

    if graph.is_empty() {
        return GraphOutcome::Empty {
            row_count: rows.len(),
            sample: rows.iter().take(SAMPLE_ROWS).cloned().collect(),
        };
    }

    GraphOutcome::Graph(graph)
}
