//! Layout engine core implementation.

use crate::ir::GraphIR;
use crate::measure::TextMetrics;
use tracing::debug;

use super::analysis::assign_ranks;
use super::ordering::{LayerGraph, minimize_crossings};
use super::placement::{place_grid, place_layered};
use super::routing::{plan_grid, plan_layered, route_edges};
use super::types::{Layout, LayoutEdge, LayoutMode, LayoutNode, RankDirection};

/// Smallest spacing used; anything lower is clamped up to it.
pub const MIN_SPACING: i64 = 1;

/// Clamp a caller-supplied spacing to a usable positive distance.
pub fn clamp_spacing(spacing: i64) -> f64 {
    spacing.max(MIN_SPACING) as f64
}

/// Layout engine configuration and computation.
pub struct LayoutEngine {
    pub(crate) metrics: TextMetrics,
    pub(crate) node_separation: f64,
    pub(crate) anchor_spacing: f64,
    pub(crate) direction: RankDirection,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
            node_separation: 50.0,
            anchor_spacing: 24.0,
            direction: RankDirection::TopBottom,
        }
    }
}

impl LayoutEngine {
    pub fn with_direction(mut self, direction: RankDirection) -> Self {
        self.direction = direction;
        self
    }

    /// One box size for every node: the largest content box over all
    /// entities, never below the metric minimums.
    pub fn node_size(&self, ir: &GraphIR) -> (f64, f64) {
        ir.nodes
            .iter()
            .map(|n| self.metrics.node_size(&n.label, &n.fields))
            .fold(
                (self.metrics.min_node_width, self.metrics.min_node_height),
                |(w, h), (nw, nh)| (w.max(nw), h.max(nh)),
            )
    }

    /// Compute layout for the given graph.
    pub fn layout(&self, ir: &GraphIR, mode: LayoutMode, spacing: i64) -> Layout {
        let spacing = clamp_spacing(spacing);
        let node_size = self.node_size(ir);

        let (nodes, edges) = match mode {
            LayoutMode::Grid => {
                let nodes = place_grid(ir, node_size, spacing);
                let plans = plan_grid(ir, &nodes);
                let edges = route_edges(ir, &nodes, plans, self.anchor_spacing);
                (nodes, edges)
            }
            LayoutMode::Hierarchical => {
                // Phase 1: acyclic orientation and ranks
                let ranking = assign_ranks(ir);

                // Phase 2: proper layering and crossing reduction
                let mut graph = LayerGraph::build(ir, &ranking);
                let crossings = minimize_crossings(&mut graph);

                // Phase 3: coordinates
                let placement = place_layered(
                    ir,
                    &graph,
                    node_size,
                    spacing,
                    self.node_separation,
                    self.direction,
                );

                // Phase 4: edge routing
                let plans = plan_layered(
                    ir,
                    &ranking,
                    &graph,
                    &placement.anchors,
                    self.direction,
                );
                let edges = route_edges(ir, &placement.nodes, plans, self.anchor_spacing);

                debug!(
                    layers = ranking.layer_count,
                    reversed = ranking.reversed.iter().filter(|&&r| r).count(),
                    crossings,
                    "layered layout"
                );
                (placement.nodes, edges)
            }
        };

        let (width, height) = bounds(&nodes, &edges);
        debug!(%mode, spacing, nodes = nodes.len(), edges = edges.len(), "layout computed");

        Layout {
            nodes,
            edges,
            width,
            height,
        }
    }
}

/// Far corner of everything drawn, measured from the origin.
fn bounds(nodes: &[LayoutNode], edges: &[LayoutEdge]) -> (f64, f64) {
    let node_corners = nodes
        .iter()
        .map(|n| (n.position.x + n.width, n.position.y + n.height));
    let edge_points = edges
        .iter()
        .flat_map(|e| e.waypoints.iter().map(|p| (p.x, p.y)));

    node_corners
        .chain(edge_points)
        .fold((0.0_f64, 0.0_f64), |(w, h), (x, y)| (w.max(x), h.max(y)))
}
