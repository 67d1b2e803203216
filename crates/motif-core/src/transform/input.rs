use crate::domain::{Graph, MotifError, MotifResult};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Renders a graph into the line-oriented text a counting program reads.
pub trait InputTransformer: Send + Sync {
    fn render(&self, graph: &dyn Graph) -> MotifResult<RenderedGraph>;

    /// Reads rendered text back into remapped `(source, target)` id pairs.
    fn read_edges(&self, text: &str) -> MotifResult<Vec<(usize, usize)>>;

    fn to_file(&self, graph: &dyn Graph, path: &Path) -> MotifResult<RenderedGraph> {
        let rendered = self.render(graph)?;
        fs::write(path, rendered.to_text()).map_err(|source| {
            MotifError::io_system(
                "IO.INPUT_WRITE",
                format!("failed to write graph input '{}': {}", path.display(), source),
            )
        })?;
        Ok(rendered)
    }
}

/// Contiguous ids assigned to node labels, starting at 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIndex {
    labels: Vec<String>,
    ids: HashMap<String, usize>,
}

impl NodeIndex {
    pub fn from_graph(graph: &dyn Graph) -> Self {
        let mut index = Self::default();
        for label in graph.nodes() {
            if !index.ids.contains_key(label) {
                index.labels.push(label.to_string());
                index.ids.insert(label.to_string(), index.labels.len());
            }
        }
        index
    }

    pub fn id_of(&self, label: &str) -> Option<usize> {
        self.ids.get(label).copied()
    }

    pub fn label_of(&self, id: usize) -> Option<&str> {
        id.checked_sub(1)
            .and_then(|slot| self.labels.get(slot))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGraph {
    lines: Vec<String>,
    node_index: NodeIndex,
}

impl RenderedGraph {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn node_index(&self) -> &NodeIndex {
        &self.node_index
    }

    pub fn to_text(&self) -> String {
        self.lines.iter().map(|line| format!("{}\n", line)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLine {
    None,
    NodeCount,
    /// Node count plus one, for readers that size arrays from a 0-based id range.
    NodeCountPlusOne,
}

/// Edge list writer parameterised by the per-program line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeListTransformer {
    separator: &'static str,
    weight: Option<&'static str>,
    header: HeaderLine,
}

impl EdgeListTransformer {
    pub const fn new(separator: &'static str) -> Self {
        Self {
            separator,
            weight: None,
            header: HeaderLine::None,
        }
    }

    pub const fn with_weight(mut self, weight: &'static str) -> Self {
        self.weight = Some(weight);
        self
    }

    pub const fn with_header(mut self, header: HeaderLine) -> Self {
        self.header = header;
        self
    }
}

impl InputTransformer for EdgeListTransformer {
    fn render(&self, graph: &dyn Graph) -> MotifResult<RenderedGraph> {
        let node_index = NodeIndex::from_graph(graph);
        let mut lines = Vec::with_capacity(graph.edge_count() + 1);
        match self.header {
            HeaderLine::None => {}
            HeaderLine::NodeCount => lines.push(node_index.len().to_string()),
            HeaderLine::NodeCountPlusOne => lines.push((node_index.len() + 1).to_string()),
        }

        for (source, target) in graph.edges() {
            let lookup = |label: &str| {
                node_index.id_of(label).ok_or_else(|| {
                    MotifError::io_system(
                        "IO.GRAPH_DANGLING_EDGE",
                        format!("edge endpoint '{}' is not an enumerated node", label),
                    )
                })
            };
            let mut line = format!("{}{}{}", lookup(source)?, self.separator, lookup(target)?);
            if let Some(weight) = self.weight {
                line.push_str(self.separator);
                line.push_str(weight);
            }
            lines.push(line);
        }

        Ok(RenderedGraph { lines, node_index })
    }

    fn read_edges(&self, text: &str) -> MotifResult<Vec<(usize, usize)>> {
        let skip_header = usize::from(self.header != HeaderLine::None);
        let separator = self.separator.trim();
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .skip(skip_header)
            .enumerate()
            .map(|(index, line)| {
                let mut fields = if separator.is_empty() {
                    line.split_whitespace().collect::<Vec<_>>()
                } else {
                    line.split(separator).map(str::trim).collect::<Vec<_>>()
                }
                .into_iter()
                .map(str::parse::<usize>);
                match (fields.next(), fields.next()) {
                    (Some(Ok(source)), Some(Ok(target))) => Ok((source, target)),
                    _ => Err(MotifError::io_system(
                        "IO.INPUT_FORMAT",
                        format!("edge line {} is not an id pair: '{}'", index + 1, line),
                    )),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{EdgeListTransformer, HeaderLine, InputTransformer};
    use crate::domain::EdgeListGraph;

    fn sample_graph() -> EdgeListGraph {
        EdgeListGraph::directed().with_edges([
            ("alpha", "beta"),
            ("beta", "gamma"),
            ("gamma", "alpha"),
            ("gamma", "delta"),
        ])
    }

    #[test]
    fn nodes_are_remapped_from_one_in_enumeration_order() {
        let rendered = EdgeListTransformer::new("\t")
            .render(&sample_graph())
            .expect("graph should render");
        assert_eq!(rendered.lines(), ["1\t2", "2\t3", "3\t1", "3\t4"]);
        assert_eq!(rendered.node_index().id_of("delta"), Some(4));
        assert_eq!(rendered.node_index().label_of(1), Some("alpha"));
        assert_eq!(rendered.node_index().label_of(0), None);
    }

    #[test]
    fn header_and_weight_columns_follow_format() {
        let graph = sample_graph();
        let with_header = EdgeListTransformer::new("\t")
            .with_header(HeaderLine::NodeCountPlusOne)
            .render(&graph)
            .expect("graph should render");
        assert_eq!(with_header.lines()[0], "5");

        let weighted = EdgeListTransformer::new("\t")
            .with_weight("1")
            .render(&graph)
            .expect("graph should render");
        assert_eq!(weighted.to_text(), "1\t2\t1\n2\t3\t1\n3\t1\t1\n3\t4\t1\n");
    }

    #[test]
    fn round_trip_preserves_edge_count_and_id_range() {
        let graph = sample_graph();
        for transformer in [
            EdgeListTransformer::new("\t").with_weight("1"),
            EdgeListTransformer::new("\t").with_header(HeaderLine::NodeCount),
            EdgeListTransformer::new(", "),
        ] {
            let rendered = transformer.render(&graph).expect("graph should render");
            let edges = transformer
                .read_edges(&rendered.to_text())
                .expect("rendered text should read back");
            assert_eq!(edges.len(), 4);
            assert!(
                edges
                    .iter()
                    .all(|(source, target)| (1..=4).contains(source) && (1..=4).contains(target))
            );
        }
    }

    #[test]
    fn to_file_writes_rendered_text() {
        let temp = tempfile::TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("graph.txt");
        EdgeListTransformer::new(", ")
            .to_file(&sample_graph(), &path)
            .expect("graph should be written");
        let written = std::fs::read_to_string(&path).expect("graph file should exist");
        assert_eq!(written, "1, 2\n2, 3\n3, 1\n3, 4\n");
    }
}
