//! Ordering within layers: long edges are split with virtual vertices, then
//! barycenter sweeps reduce crossings between adjacent layers.

use crate::ir::GraphIR;
use tracing::trace;

use super::analysis::Ranking;

const MAX_SWEEPS: usize = 24;

/// Proper layered graph: every edge connects two adjacent layers.
///
/// Vertices `0..real_count` are the IR nodes; the rest are virtual vertices
/// standing in for long edges where they cross a layer.
#[derive(Debug, Clone)]
pub struct LayerGraph {
    pub real_count: usize,
    pub layers: Vec<Vec<usize>>,
    pub rank: Vec<usize>,
    /// Successors in the next layer.
    pub down: Vec<Vec<usize>>,
    /// Predecessors in the previous layer.
    pub up: Vec<Vec<usize>>,
    /// Per IR edge: virtual vertices in ranking direction (empty for edges
    /// spanning one layer and for self loops).
    pub chains: Vec<Vec<usize>>,
}

impl LayerGraph {
    pub fn build(ir: &GraphIR, ranking: &Ranking) -> Self {
        let real_count = ir.nodes.len();
        let mut rank = ranking.ranks.clone();
        let mut down: Vec<Vec<usize>> = vec![Vec::new(); real_count];
        let mut up: Vec<Vec<usize>> = vec![Vec::new(); real_count];
        let mut chains: Vec<Vec<usize>> = vec![Vec::new(); ir.edges.len()];

        for (idx, edge) in ir.edges.iter().enumerate() {
            if edge.is_self_ref() {
                continue;
            }
            let (u, v) = ranking.oriented(ir, idx);
            let mut prev = u;
            for r in rank[u] + 1..rank[v] {
                let virt = rank.len();
                rank.push(r);
                down.push(Vec::new());
                up.push(Vec::new());
                down[prev].push(virt);
                up[virt].push(prev);
                chains[idx].push(virt);
                prev = virt;
            }
            down[prev].push(v);
            up[v].push(prev);
        }

        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); ranking.layer_count];
        for (vertex, &r) in rank.iter().enumerate() {
            layers[r].push(vertex);
        }

        Self {
            real_count,
            layers,
            rank,
            down,
            up,
            chains,
        }
    }

    pub fn is_virtual(&self, vertex: usize) -> bool {
        vertex >= self.real_count
    }

    /// Position of every vertex within its layer.
    pub fn positions(&self) -> Vec<usize> {
        let mut pos = vec![0usize; self.rank.len()];
        for layer in &self.layers {
            for (i, &v) in layer.iter().enumerate() {
                pos[v] = i;
            }
        }
        pos
    }
}

/// Mean position of `neighbors`, or `None` when there are none.
fn barycenter(neighbors: &[usize], pos: &[usize]) -> Option<f64> {
    if neighbors.is_empty() {
        return None;
    }
    let sum: usize = neighbors.iter().map(|&nb| pos[nb]).sum();
    Some(sum as f64 / neighbors.len() as f64)
}

/// Reorder layer `r` by the barycenters of each vertex's neighbors in the
/// fixed adjacent layer. Vertices without neighbors keep their slot value.
fn sweep_layer(graph: &mut LayerGraph, r: usize, use_up: bool) {
    let pos = graph.positions();
    let mut scored: Vec<(usize, f64)> = graph.layers[r]
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let neighbors = if use_up { &graph.up[v] } else { &graph.down[v] };
            (v, barycenter(neighbors, &pos).unwrap_or(i as f64))
        })
        .collect();

    // Stable: ties keep the current relative order.
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    graph.layers[r] = scored.into_iter().map(|(v, _)| v).collect();
}

/// Count crossings between layer `r` and `r + 1`.
fn count_crossings(graph: &LayerGraph, pos: &[usize], r: usize) -> usize {
    let mut segments: Vec<(usize, usize)> = Vec::new();
    for &u in &graph.layers[r] {
        for &v in &graph.down[u] {
            segments.push((pos[u], pos[v]));
        }
    }

    let mut crossings = 0;
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            let (a1, b1) = segments[i];
            let (a2, b2) = segments[j];
            if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                crossings += 1;
            }
        }
    }
    crossings
}

pub fn total_crossings(graph: &LayerGraph) -> usize {
    let pos = graph.positions();
    (0..graph.layers.len().saturating_sub(1))
        .map(|r| count_crossings(graph, &pos, r))
        .sum()
}

/// Alternate downward and upward sweeps, keeping the best ordering seen.
/// Stops at the first sweep that does not improve. Returns the crossing count
/// of the kept ordering.
pub fn minimize_crossings(graph: &mut LayerGraph) -> usize {
    let mut best = total_crossings(graph);
    if graph.layers.len() <= 1 || best == 0 {
        return best;
    }
    let mut best_layers = graph.layers.clone();

    for iteration in 0..MAX_SWEEPS {
        for r in 1..graph.layers.len() {
            sweep_layer(graph, r, true);
        }
        for r in (0..graph.layers.len() - 1).rev() {
            sweep_layer(graph, r, false);
        }

        let crossings = total_crossings(graph);
        trace!(iteration, crossings, "barycenter sweep");

        if crossings < best {
            best = crossings;
            best_layers = graph.layers.clone();
            if best == 0 {
                break;
            }
        } else {
            break;
        }
    }

    graph.layers = best_layers;
    best
}
