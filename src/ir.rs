use crate::ast::Schema;
use std::collections::HashMap;

/// Index-addressed graph handed to the layout engine.
#[derive(Debug, Clone, Default)]
pub struct GraphIR {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub id: String,
    pub from: usize,
    pub to: usize,
    pub label: String,
}

impl Edge {
    pub fn is_self_ref(&self) -> bool {
        self.from == self.to
    }
}

/// Stable edge id: derived from the relation's position only.
pub fn edge_id(index: usize) -> String {
    format!("e-{index}")
}

impl GraphIR {
    pub fn from_schema(schema: &Schema) -> Self {
        let nodes: Vec<Node> = schema
            .entities
            .iter()
            .map(|e| Node {
                id: e.name.clone(),
                label: e.name.clone(),
                fields: e.fields.iter().map(|f| f.raw.clone()).collect(),
            })
            .collect();

        let node_index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let edges: Vec<Edge> = schema
            .relations
            .iter()
            .filter_map(|r| {
                let from = *node_index.get(r.from.as_str())?;
                let to = *node_index.get(r.to.as_str())?;
                Some((from, to, r))
            })
            .enumerate()
            .map(|(i, (from, to, r))| Edge {
                id: edge_id(i),
                from,
                to,
                label: r.label.clone(),
            })
            .collect();

        GraphIR { nodes, edges }
    }

    pub fn node_id(&self, index: usize) -> &str {
        &self.nodes[index].id
    }
}
