//! Converts an entity graph into positioned nodes and routed edges.

mod analysis;
mod engine;
mod ordering;
mod placement;
mod routing;
mod types;

use crate::ast::Schema;
use crate::ir::GraphIR;

pub use engine::{LayoutEngine, MIN_SPACING, clamp_spacing};
pub use placement::GRID_COLUMNS;
pub use types::{
    Layout, LayoutEdge, LayoutMode, LayoutNode, NodeData, Point, RankDirection, Side,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("unknown layout mode `{0}`, expected one of: grid, flowchart, hierarchical, traditional")]
    UnknownMode(String),
    #[error("unknown rank direction `{0}`, expected tb or lr")]
    UnknownDirection(String),
}

/// Lay out a parsed schema. The mode string is resolved first, so an unknown
/// mode fails before any node is placed.
pub fn layout(schema: &Schema, mode: &str, spacing: i64) -> Result<Layout, LayoutError> {
    let mode: LayoutMode = mode.parse()?;
    let ir = GraphIR::from_schema(schema);
    Ok(LayoutEngine::default().layout(&ir, mode, spacing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_unknown_mode_fails_closed() {
        let schema = parse("model User { id Int }");
        assert_eq!(
            layout(&schema, "radial", 100),
            Err(LayoutError::UnknownMode("radial".into()))
        );
    }

    #[test]
    fn test_layout_edges() {
        let schema = parse("model User { id Int }\nmodel Order { buyer User }");
        let result = layout(&schema, "traditional", 100).unwrap();
        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.edges[0].id, "e-0");
    }
}
