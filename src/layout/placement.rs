//! Node placement for both layout modes.

use crate::ir::GraphIR;

use super::ordering::LayerGraph;
use super::types::{LayoutNode, NodeData, Point, RankDirection};

/// Nodes per row in grid mode.
pub const GRID_COLUMNS: usize = 5;

/// Gap between a virtual vertex and its neighbors within a layer.
const EDGE_SEPARATION: f64 = 20.0;

fn layout_node(ir: &GraphIR, idx: usize, position: Point, size: (f64, f64)) -> LayoutNode {
    let node = &ir.nodes[idx];
    LayoutNode {
        id: node.id.clone(),
        position,
        width: size.0,
        height: size.1,
        rank: None,
        data: NodeData {
            label: node.label.clone(),
            fields: node.fields.clone(),
        },
    }
}

/// Row-major grid: node `i` goes to column `i % 5`, row `i / 5`, one
/// `spacing` step apart in both directions.
pub fn place_grid(ir: &GraphIR, node_size: (f64, f64), spacing: f64) -> Vec<LayoutNode> {
    (0..ir.nodes.len())
        .map(|i| {
            let x = (i % GRID_COLUMNS) as f64 * spacing;
            let y = (i / GRID_COLUMNS) as f64 * spacing;
            layout_node(ir, i, Point::new(x, y), node_size)
        })
        .collect()
}

/// Result of layered placement.
pub struct LayeredPlacement {
    pub nodes: Vec<LayoutNode>,
    /// Center point of every vertex, real and virtual, indexed like
    /// `LayerGraph::rank`.
    pub anchors: Vec<Point>,
}

/// Assign coordinates to an ordered layer graph.
///
/// Layers advance along the rank axis by the node extent plus `spacing`.
/// Within a layer, real nodes are `node_separation` apart and virtual
/// vertices take no room beyond a small edge gap. Each layer is centred
/// against the widest one, and every real node box is centred on its anchor.
pub fn place_layered(
    ir: &GraphIR,
    graph: &LayerGraph,
    node_size: (f64, f64),
    spacing: f64,
    node_separation: f64,
    direction: RankDirection,
) -> LayeredPlacement {
    let (w, h) = node_size;
    let (rank_extent, order_extent) = match direction {
        RankDirection::TopBottom => (h, w),
        RankDirection::LeftRight => (w, h),
    };
    let rank_step = rank_extent + spacing;

    // Position along each layer, before centring.
    let mut order_coord = vec![0.0; graph.rank.len()];
    let mut layer_span = vec![0.0; graph.layers.len()];

    for (r, layer) in graph.layers.iter().enumerate() {
        let mut cursor = 0.0;
        let mut prev_real: Option<bool> = None;
        for &v in layer {
            let real = !graph.is_virtual(v);
            if let Some(prev) = prev_real {
                cursor += if prev && real {
                    node_separation
                } else {
                    EDGE_SEPARATION
                };
            }
            let extent = if real { order_extent } else { 0.0 };
            order_coord[v] = cursor + extent / 2.0;
            cursor += extent;
            prev_real = Some(real);
        }
        layer_span[r] = cursor;
    }

    let max_span = layer_span.iter().copied().fold(0.0_f64, f64::max);

    let mut anchors = vec![Point::new(0.0, 0.0); graph.rank.len()];
    for (r, layer) in graph.layers.iter().enumerate() {
        let shift = (max_span - layer_span[r]) / 2.0;
        let rank_coord = r as f64 * rank_step + rank_extent / 2.0;
        for &v in layer {
            let along = order_coord[v] + shift;
            anchors[v] = match direction {
                RankDirection::TopBottom => Point::new(along, rank_coord),
                RankDirection::LeftRight => Point::new(rank_coord, along),
            };
        }
    }

    let nodes = (0..graph.real_count)
        .map(|i| {
            let c = anchors[i];
            let mut node = layout_node(ir, i, Point::new(c.x - w / 2.0, c.y - h / 2.0), node_size);
            node.rank = Some(graph.rank[i]);
            node
        })
        .collect();

    LayeredPlacement { nodes, anchors }
}
