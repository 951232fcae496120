//! report/graph.rs — static description of the transition graph.
//!
//! The core hands renderers a plain weighted digraph: one node per gaze
//! category, one edge per non-zero frequency. DOT output is the bundled
//! adapter; anything that can consume the node/edge lists can replace it.

use crate::core::transitions::{CategoryFilter, FrequencyMatrix, CATEGORIES};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphEdge {
    pub from: u8,
    pub to: u8,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransitionGraph {
    pub nodes: Vec<u8>,
    pub edges: Vec<GraphEdge>,
}

impl TransitionGraph {
    pub fn from_frequencies(freq: &FrequencyMatrix, filter: CategoryFilter) -> Self {
        let nodes: Vec<u8> = (0..CATEGORIES as u8).filter(|c| filter.includes(*c)).collect();
        let edges = freq
            .non_zero()
            .filter(|(from, to, _)| filter.includes(*from) && filter.includes(*to))
            .map(|(from, to, weight)| GraphEdge { from, to, weight })
            .collect();
        Self { nodes, edges }
    }

    /// Deterministic DOT serialization: nodes and edges in category order.
    pub fn to_dot(&self, name: &str) -> String {
        let mut dot = String::new();
        dot.push_str(&format!("digraph {name} {{\n"));
        for node in &self.nodes {
            dot.push_str(&format!("    \"{node}\";\n"));
        }
        for edge in &self.edges {
            dot.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{:.2}\"];\n",
                edge.from, edge.to, edge.weight
            ));
        }
        dot.push_str("}\n");
        dot
    }
}
