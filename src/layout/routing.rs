//! Edge routing and waypoint generation.

use crate::ir::GraphIR;
use std::collections::HashMap;

use super::analysis::Ranking;
use super::ordering::LayerGraph;
use super::types::{EdgePlan, LayoutEdge, LayoutNode, Point, RankDirection, Side};

/// Distance a self-referencing loop sticks out of its node.
const LOOP_OFFSET: f64 = 25.0;

/// Calculate lane offset for centered lane distribution.
#[inline]
pub fn calculate_lane_offset(lane: usize, total: usize, lane_spacing: f64) -> f64 {
    if total <= 1 {
        0.0
    } else {
        (lane as f64 - (total - 1) as f64 / 2.0) * lane_spacing
    }
}

/// Pick faces from the relative position of two boxes in grid mode: the
/// dominant axis between the centers decides.
pub fn grid_sides(from: &LayoutNode, to: &LayoutNode) -> (Side, Side) {
    let a = from.center();
    let b = to.center();
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 {
            (Side::Right, Side::Left)
        } else {
            (Side::Left, Side::Right)
        }
    } else if dy > 0.0 {
        (Side::Bottom, Side::Top)
    } else {
        (Side::Top, Side::Bottom)
    }
}

/// Plans for grid mode: faces by geometry, no intermediate points.
pub fn plan_grid(ir: &GraphIR, nodes: &[LayoutNode]) -> Vec<EdgePlan> {
    ir.edges
        .iter()
        .map(|edge| {
            if edge.is_self_ref() {
                return EdgePlan {
                    source_side: Side::Right,
                    target_side: Side::Right,
                    via: Vec::new(),
                };
            }
            let (source_side, target_side) = grid_sides(&nodes[edge.from], &nodes[edge.to]);
            EdgePlan {
                source_side,
                target_side,
                via: Vec::new(),
            }
        })
        .collect()
}

/// Plans for layered mode: edges leave through the face toward the other
/// node's layer and pass through their virtual vertices.
pub fn plan_layered(
    ir: &GraphIR,
    ranking: &Ranking,
    graph: &LayerGraph,
    anchors: &[Point],
    direction: RankDirection,
) -> Vec<EdgePlan> {
    ir.edges
        .iter()
        .enumerate()
        .map(|(idx, edge)| {
            if edge.is_self_ref() {
                let side = direction.loop_side();
                return EdgePlan {
                    source_side: side,
                    target_side: side,
                    via: Vec::new(),
                };
            }

            let mut via: Vec<Point> = graph.chains[idx].iter().map(|&v| anchors[v]).collect();
            let downward = !ranking.reversed[idx];
            if !downward {
                via.reverse();
            }

            let (source_side, target_side) = if downward {
                (direction.trailing_side(), direction.leading_side())
            } else {
                (direction.leading_side(), direction.trailing_side())
            };

            EdgePlan {
                source_side,
                target_side,
                via,
            }
        })
        .collect()
}

/// Coordinate along a face used to order the anchors sharing it.
fn along(side: Side, p: Point) -> f64 {
    if side.is_horizontal() { p.x } else { p.y }
}

/// Spread edge endpoints that share a face so they do not overlap.
///
/// Returns, per edge, the (source, target) offsets along their faces.
/// Endpoints are ordered by where the edge heads next, so neighbors on a face
/// do not cross right after leaving it.
fn distribute_anchors(
    ir: &GraphIR,
    nodes: &[LayoutNode],
    plans: &[EdgePlan],
    anchor_spacing: f64,
) -> Vec<(f64, f64)> {
    // (node, side) -> [(edge index, is source end, sort key)]
    let mut faces: HashMap<(usize, Side), Vec<(usize, bool, f64)>> = HashMap::new();

    for (idx, (edge, plan)) in ir.edges.iter().zip(plans).enumerate() {
        if edge.is_self_ref() {
            continue;
        }
        let toward_target = plan
            .via
            .first()
            .copied()
            .unwrap_or_else(|| nodes[edge.to].center());
        let toward_source = plan
            .via
            .last()
            .copied()
            .unwrap_or_else(|| nodes[edge.from].center());

        faces
            .entry((edge.from, plan.source_side))
            .or_default()
            .push((idx, true, along(plan.source_side, toward_target)));
        faces
            .entry((edge.to, plan.target_side))
            .or_default()
            .push((idx, false, along(plan.target_side, toward_source)));
    }

    let mut offsets = vec![(0.0, 0.0); ir.edges.len()];
    for ((node, side), mut ends) in faces {
        ends.sort_by(|a, b| a.2.total_cmp(&b.2).then(a.0.cmp(&b.0)).then(b.1.cmp(&a.1)));

        let total = ends.len();
        let room = nodes[node].side_length(side) / (total + 1) as f64;
        let spacing = anchor_spacing.min(room);

        for (lane, (idx, is_source, _)) in ends.into_iter().enumerate() {
            let offset = calculate_lane_offset(lane, total, spacing);
            if is_source {
                offsets[idx].0 = offset;
            } else {
                offsets[idx].1 = offset;
            }
        }
    }

    offsets
}

/// Generate waypoints for a self-referential edge.
pub fn route_self_ref(node: &LayoutNode, side: Side) -> Vec<Point> {
    let x = node.position.x;
    let y = node.position.y;
    match side {
        Side::Right | Side::Left => {
            let edge_x = if side == Side::Right { x + node.width } else { x };
            let out_x = if side == Side::Right {
                edge_x + LOOP_OFFSET
            } else {
                edge_x - LOOP_OFFSET
            };
            let y_top = y + node.height * 0.3;
            let y_bottom = y + node.height * 0.7;
            vec![
                Point::new(edge_x, y_top),
                Point::new(out_x, y_top),
                Point::new(out_x, y_bottom),
                Point::new(edge_x, y_bottom),
            ]
        }
        Side::Bottom | Side::Top => {
            let edge_y = if side == Side::Bottom { y + node.height } else { y };
            let out_y = if side == Side::Bottom {
                edge_y + LOOP_OFFSET
            } else {
                edge_y - LOOP_OFFSET
            };
            let x_left = x + node.width * 0.3;
            let x_right = x + node.width * 0.7;
            vec![
                Point::new(x_left, edge_y),
                Point::new(x_left, out_y),
                Point::new(x_right, out_y),
                Point::new(x_right, edge_y),
            ]
        }
    }
}

/// Orthogonal path between two anchors with a single bend pair in the middle.
pub fn route_orthogonal(start: Point, start_side: Side, end: Point) -> Vec<Point> {
    if start.x == end.x || start.y == end.y {
        return vec![start, end];
    }
    if start_side.is_horizontal() {
        let mid_y = (start.y + end.y) / 2.0;
        vec![start, Point::new(start.x, mid_y), Point::new(end.x, mid_y), end]
    } else {
        let mid_x = (start.x + end.x) / 2.0;
        vec![start, Point::new(mid_x, start.y), Point::new(mid_x, end.y), end]
    }
}

/// Build the final edge list: anchors distributed per face, then waypoints.
pub fn route_edges(
    ir: &GraphIR,
    nodes: &[LayoutNode],
    plans: Vec<EdgePlan>,
    anchor_spacing: f64,
) -> Vec<LayoutEdge> {
    let offsets = distribute_anchors(ir, nodes, &plans, anchor_spacing);

    ir.edges
        .iter()
        .zip(plans)
        .zip(offsets)
        .map(|((edge, plan), (source_offset, target_offset))| {
            let from = &nodes[edge.from];
            let to = &nodes[edge.to];
            let self_ref = edge.is_self_ref();

            let waypoints = if self_ref {
                route_self_ref(from, plan.source_side)
            } else {
                let start = from.anchor(plan.source_side, source_offset);
                let end = to.anchor(plan.target_side, target_offset);
                if plan.via.is_empty() {
                    route_orthogonal(start, plan.source_side, end)
                } else {
                    let mut points = Vec::with_capacity(plan.via.len() + 2);
                    points.push(start);
                    points.extend(plan.via);
                    points.push(end);
                    points
                }
            };

            LayoutEdge {
                id: edge.id.clone(),
                source: from.id.clone(),
                target: to.id.clone(),
                label: edge.label.clone(),
                source_side: plan.source_side,
                target_side: plan.target_side,
                waypoints,
                self_ref,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::NodeData;

    fn node(id: &str, x: f64, y: f64) -> LayoutNode {
        LayoutNode {
            id: id.into(),
            position: Point::new(x, y),
            width: 200.0,
            height: 60.0,
            rank: None,
            data: NodeData {
                label: id.into(),
                fields: vec![],
            },
        }
    }

    #[test]
    fn test_lane_offsets_are_centred() {
        assert_eq!(calculate_lane_offset(0, 1, 20.0), 0.0);
        assert_eq!(calculate_lane_offset(0, 3, 20.0), -20.0);
        assert_eq!(calculate_lane_offset(2, 3, 20.0), 20.0);
    }

    #[test]
    fn test_grid_sides() {
        let a = node("A", 0.0, 0.0);
        let right = node("B", 300.0, 0.0);
        let below = node("C", 0.0, 300.0);
        assert_eq!(grid_sides(&a, &right), (Side::Right, Side::Left));
        assert_eq!(grid_sides(&right, &a), (Side::Left, Side::Right));
        assert_eq!(grid_sides(&a, &below), (Side::Bottom, Side::Top));
        assert_eq!(grid_sides(&below, &a), (Side::Top, Side::Bottom));
    }

    #[test]
    fn test_self_ref_loop_right() {
        let n = node("A", 0.0, 0.0);
        let points = route_self_ref(&n, Side::Right);
        assert_eq!(
            points,
            vec![
                Point::new(200.0, 18.0),
                Point::new(225.0, 18.0),
                Point::new(225.0, 42.0),
                Point::new(200.0, 42.0),
            ]
        );
    }

    #[test]
    fn test_self_ref_loop_bottom() {
        let n = node("A", 0.0, 0.0);
        let points = route_self_ref(&n, Side::Bottom);
        assert_eq!(points[0], Point::new(60.0, 60.0));
        assert_eq!(points[1], Point::new(60.0, 85.0));
        assert_eq!(points[3], Point::new(140.0, 60.0));
    }

    #[test]
    fn test_orthogonal_route() {
        let straight = route_orthogonal(Point::new(0.0, 0.0), Side::Bottom, Point::new(0.0, 100.0));
        assert_eq!(straight.len(), 2);

        let bent = route_orthogonal(Point::new(0.0, 0.0), Side::Bottom, Point::new(50.0, 100.0));
        assert_eq!(
            bent,
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 50.0),
                Point::new(50.0, 50.0),
                Point::new(50.0, 100.0),
            ]
        );

        let sideways = route_orthogonal(Point::new(0.0, 0.0), Side::Right, Point::new(100.0, 40.0));
        assert_eq!(sideways[1], Point::new(50.0, 0.0));
    }
}
