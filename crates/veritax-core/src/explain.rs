//! Explainability: dependency graphs and human-readable line stories.

use crate::trace::{Source, Trace, TracedValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// The dependency graph reachable from one node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceGraph {
    pub root: String,
    /// Every reachable node, keyed by id.
    pub nodes: BTreeMap<String, TracedValue>,
    /// Edges as (reader, read) pairs.
    pub edges: Vec<(String, String)>,
}

/// Collects the transitive closure of `node_id` over the `inputs` lists.
pub fn build_trace(trace: &Trace, node_id: &str) -> Option<TraceGraph> {
    let root = trace.get(node_id)?;
    let mut nodes = BTreeMap::new();
    let mut edges = Vec::new();
    let mut queue = VecDeque::from([root.node_id.clone()]);

    while let Some(id) = queue.pop_front() {
        if nodes.contains_key(&id) {
            continue;
        }
        let Some(value) = trace.get(&id) else {
            continue;
        };
        if let Source::Computed { inputs, .. } = &value.source {
            for input in inputs {
                edges.push((id.clone(), input.clone()));
                queue.push_back(input.clone());
            }
        }
        nodes.insert(id, value.clone());
    }

    Some(TraceGraph {
        root: node_id.to_string(),
        nodes,
        edges,
    })
}

fn describe(value: &TracedValue) -> String {
    match &value.source {
        Source::Input { reference } => {
            format!("{} = {} ({})", value.node_id, value.amount, reference)
        }
        Source::Literal { reason } => {
            format!("{} = {} ({})", value.node_id, value.amount, reason)
        }
        Source::Computed { op, .. } => {
            format!("{} = {} ({})", value.node_id, value.amount, op)
        }
    }
}

/// Walks the graph from `node_id` and yields a sentence per computed
/// node, root first, each leaf resolving to an input reference or a
/// documented literal.
pub fn explain_line(trace: &Trace, node_id: &str) -> String {
    let Some(graph) = build_trace(trace, node_id) else {
        return format!("no value was recorded for {node_id}");
    };

    let mut sentences = Vec::new();
    let mut visited = std::collections::BTreeSet::new();
    let mut queue = VecDeque::from([node_id.to_string()]);

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id.clone()) {
            continue;
        }
        let Some(value) = graph.nodes.get(&id) else {
            continue;
        };
        match &value.source {
            Source::Computed { op, inputs } => {
                let parts: Vec<String> = inputs
                    .iter()
                    .map(|input_id| match graph.nodes.get(input_id) {
                        Some(input) => format!("{} ({})", input.node_id, input.amount),
                        None => format!("{input_id} (not recorded)"),
                    })
                    .collect();
                let joined = if parts.is_empty() {
                    "no inputs".to_string()
                } else {
                    parts.join(", ")
                };
                sentences.push(format!("{} = {} via {op} of {joined}", id, value.amount));
                for input in inputs {
                    queue.push_back(input.clone());
                }
            }
            _ => sentences.push(describe(value)),
        }
    }

    sentences.join(". ")
}
