//! Cycle breaking and rank assignment for hierarchical layout.

use crate::ir::GraphIR;

/// Rank of every node plus, per IR edge, whether it was turned around to make
/// the graph acyclic.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub ranks: Vec<usize>,
    pub reversed: Vec<bool>,
    pub layer_count: usize,
}

impl Ranking {
    /// Edge endpoints in ranking direction (low rank first).
    pub fn oriented(&self, ir: &GraphIR, edge_idx: usize) -> (usize, usize) {
        let edge = &ir.edges[edge_idx];
        if self.reversed[edge_idx] {
            (edge.to, edge.from)
        } else {
            (edge.from, edge.to)
        }
    }
}

/// Outgoing edge indices per node, in IR edge order. Self loops are left out.
fn out_edges(ir: &GraphIR) -> Vec<Vec<usize>> {
    let mut out = vec![Vec::new(); ir.nodes.len()];
    for (idx, edge) in ir.edges.iter().enumerate() {
        if !edge.is_self_ref() {
            out[edge.from].push(idx);
        }
    }
    out
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    New,
    OnStack,
    Done,
}

/// Depth-first search in discovery order; every edge that points back into
/// the current DFS stack is marked reversed.
pub fn find_back_edges(ir: &GraphIR) -> Vec<bool> {
    let out = out_edges(ir);
    let mut reversed = vec![false; ir.edges.len()];
    let mut state = vec![Visit::New; ir.nodes.len()];

    for root in 0..ir.nodes.len() {
        if state[root] != Visit::New {
            continue;
        }
        // (node, next outgoing edge position)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        state[root] = Visit::OnStack;

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            if let Some(&edge_idx) = out[node].get(frame.1) {
                frame.1 += 1;
                let target = ir.edges[edge_idx].to;
                match state[target] {
                    Visit::New => {
                        state[target] = Visit::OnStack;
                        stack.push((target, 0));
                    }
                    Visit::OnStack => reversed[edge_idx] = true,
                    Visit::Done => {}
                }
            } else {
                state[node] = Visit::Done;
                stack.pop();
            }
        }
    }

    reversed
}

/// Longest-path layering on the acyclic orientation: sources get rank 0,
/// every other node 1 + the highest rank among its predecessors. Nodes with
/// no edges besides self loops go to a layer of their own after the rest.
pub fn assign_ranks(ir: &GraphIR) -> Ranking {
    let n = ir.nodes.len();
    let reversed = find_back_edges(ir);

    let mut succ: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    let mut connected = vec![false; n];

    for (idx, edge) in ir.edges.iter().enumerate() {
        if edge.is_self_ref() {
            continue;
        }
        let (u, v) = if reversed[idx] {
            (edge.to, edge.from)
        } else {
            (edge.from, edge.to)
        };
        succ[u].push(v);
        in_degree[v] += 1;
        connected[u] = true;
        connected[v] = true;
    }

    // Kahn's algorithm, seeded in discovery order.
    let mut ranks = vec![0usize; n];
    let mut queue: Vec<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
    let mut head = 0;
    while head < queue.len() {
        let u = queue[head];
        head += 1;
        for &v in &succ[u] {
            ranks[v] = ranks[v].max(ranks[u] + 1);
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push(v);
            }
        }
    }

    let connected_layers = (0..n)
        .filter(|&v| connected[v])
        .map(|v| ranks[v] + 1)
        .max()
        .unwrap_or(0);

    for v in (0..n).filter(|&v| !connected[v]) {
        ranks[v] = connected_layers;
    }

    let layer_count = if connected.iter().all(|&c| c) {
        connected_layers
    } else {
        connected_layers + 1
    };

    Ranking {
        ranks,
        reversed,
        layer_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::GraphIR;
    use crate::parser::{ParseOptions, Parser};

    fn ir(input: &str) -> GraphIR {
        let options = ParseOptions {
            forward_references: true,
            ..Default::default()
        };
        GraphIR::from_schema(&Parser::new(input).with_options(options).parse())
    }

    #[test]
    fn test_chain_ranks() {
        let ir = ir(r#"
            model Comment { post Post }
            model Post { author User }
            model User { id Int }
        "#);
        let ranking = assign_ranks(&ir);
        assert_eq!(ranking.ranks, vec![0, 1, 2]);
        assert_eq!(ranking.layer_count, 3);
        assert!(ranking.reversed.iter().all(|&r| !r));
    }

    #[test]
    fn test_longest_path_wins() {
        let ir = ir(r#"
            model A {
                b B
                c C
            }
            model B { c C }
            model C { id Int }
        "#);
        let ranking = assign_ranks(&ir);
        assert_eq!(ranking.ranks, vec![0, 1, 2]);
    }

    #[test]
    fn test_cycle_is_broken() {
        let ir = ir(r#"
            model A { b B }
            model B { c C }
            model C { a A }
        "#);
        let ranking = assign_ranks(&ir);
        assert_eq!(ranking.reversed, vec![false, false, true]);
        assert_eq!(ranking.ranks, vec![0, 1, 2]);
        for idx in 0..ir.edges.len() {
            let (u, v) = ranking.oriented(&ir, idx);
            assert!(ranking.ranks[u] < ranking.ranks[v]);
        }
    }

    #[test]
    fn test_isolated_nodes_get_own_layer() {
        let ir = ir(r#"
            model Log { id Int }
            model Post { author User }
            model User { id Int }
            model Setting { id Int }
        "#);
        let ranking = assign_ranks(&ir);
        assert_eq!(ranking.ranks, vec![2, 0, 1, 2]);
        assert_eq!(ranking.layer_count, 3);
    }

    #[test]
    fn test_self_loop_only_counts_as_isolated() {
        let ir = ir("model Node { next Node }");
        let ranking = assign_ranks(&ir);
        assert_eq!(ranking.ranks, vec![0]);
        assert_eq!(ranking.layer_count, 1);
        assert_eq!(ranking.reversed, vec![false]);
    }

    #[test]
    fn test_empty_graph() {
        let ranking = assign_ranks(&GraphIR::default());
        assert!(ranking.ranks.is_empty());
        assert_eq!(ranking.layer_count, 0);
    }
}
