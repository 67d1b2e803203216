use super::errors::{MotifError, MotifResult};
use serde::Deserialize;
use std::collections::HashMap;

/// Read-only view of a graph handed to an input transformer.
///
/// Node enumeration order is significant: transformers assign contiguous
/// ids in exactly this order.
pub trait Graph {
    fn is_directed(&self) -> bool;
    fn nodes(&self) -> Box<dyn Iterator<Item = &str> + '_>;
    fn edges(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>;

    fn node_count(&self) -> usize {
        self.nodes().count()
    }

    fn edge_count(&self) -> usize {
        self.edges().count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeListGraph {
    directed: bool,
    nodes: Vec<String>,
    node_slots: HashMap<String, usize>,
    edges: Vec<(usize, usize)>,
}

#[derive(Debug, Deserialize)]
struct GraphDocument {
    #[serde(default = "default_directed")]
    directed: bool,
    #[serde(default)]
    nodes: Vec<String>,
    edges: Vec<(String, String)>,
}

fn default_directed() -> bool {
    true
}

impl EdgeListGraph {
    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Self::default()
        }
    }

    pub fn undirected() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, label: impl Into<String>) -> usize {
        let label = label.into();
        if let Some(slot) = self.node_slots.get(&label) {
            return *slot;
        }
        let slot = self.nodes.len();
        self.node_slots.insert(label.clone(), slot);
        self.nodes.push(label);
        slot
    }

    pub fn add_edge(&mut self, source: impl Into<String>, target: impl Into<String>) {
        let source = self.add_node(source);
        let target = self.add_node(target);
        self.edges.push((source, target));
    }

    pub fn with_edges<'a>(
        mut self,
        edges: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        for (source, target) in edges {
            self.add_edge(source, target);
        }
        self
    }

    /// Parses a plain edge list: one `source target` pair per line, separated
    /// by whitespace or a comma. Blank lines and `#` comments are skipped and
    /// any columns after the second are ignored.
    pub fn parse_edge_list(text: &str, directed: bool) -> MotifResult<Self> {
        let mut graph = Self {
            directed,
            ..Self::default()
        };
        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line
                .split(|character: char| character == ',' || character.is_whitespace())
                .filter(|field| !field.is_empty());
            match (fields.next(), fields.next()) {
                (Some(source), Some(target)) => graph.add_edge(source, target),
                _ => {
                    return Err(MotifError::io_system(
                        "IO.GRAPH_EDGE_LIST",
                        format!(
                            "edge list line {} must hold a source and a target node: '{}'",
                            index + 1,
                            raw_line
                        ),
                    ));
                }
            }
        }
        Ok(graph)
    }

    /// Parses `{"directed": bool, "nodes": [...], "edges": [[a, b], ...]}`.
    /// Listed nodes come first in enumeration order, so isolated nodes survive.
    pub fn parse_json(text: &str) -> MotifResult<Self> {
        let document: GraphDocument = serde_json::from_str(text).map_err(|source| {
            MotifError::io_system(
                "IO.GRAPH_JSON",
                format!("failed to parse graph document: {}", source),
            )
        })?;
        let mut graph = Self {
            directed: document.directed,
            ..Self::default()
        };
        for node in document.nodes {
            graph.add_node(node);
        }
        for (source, target) in document.edges {
            graph.add_edge(source, target);
        }
        Ok(graph)
    }
}

impl Graph for EdgeListGraph {
    fn is_directed(&self) -> bool {
        self.directed
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.nodes.iter().map(String::as_str))
    }

    fn edges(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(
            self.edges
                .iter()
                .map(|(source, target)| (self.nodes[*source].as_str(), self.nodes[*target].as_str())),
        )
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{EdgeListGraph, Graph};

    #[test]
    fn nodes_keep_first_seen_order() {
        let graph = EdgeListGraph::directed().with_edges([("b", "a"), ("a", "c"), ("c", "b")]);
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.is_directed());
    }

    #[test]
    fn edge_list_accepts_commas_comments_and_weights() {
        let graph = EdgeListGraph::parse_edge_list(
            "# a small graph\n1 2\n2,3\n\n3\t1\t1 # weight column\n",
            false,
        )
        .expect("edge list should parse");
        assert_eq!(graph.node_count(), 3);
        assert_eq!(
            graph.edges().collect::<Vec<_>>(),
            vec![("1", "2"), ("2", "3"), ("3", "1")]
        );
        assert!(!graph.is_directed());
    }

    #[test]
    fn edge_list_rejects_single_node_lines() {
        let error = EdgeListGraph::parse_edge_list("1 2\n3\n", true)
            .expect_err("dangling node should fail");
        assert_eq!(error.placeholder(), "IO.GRAPH_EDGE_LIST");
        assert!(error.message().contains("line 2"));
    }

    #[test]
    fn json_document_keeps_isolated_nodes() {
        let graph = EdgeListGraph::parse_json(
            r#"{"directed": false, "nodes": ["x", "y", "z"], "edges": [["y", "x"]]}"#,
        )
        .expect("graph document should parse");
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["x", "y", "z"]);
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![("y", "x")]);
    }
}
