//! Shape algorithms
//!
//! Provides the named combinatorial shapes used to bulk-construct
//! networks:
//! - Line, ring, star, complete: the classic small shapes
//! - Grid and ladder: lattice shapes
//! - Balanced binary tree
//! - Watts-Strogatz small-world and random graphs
//! - Custom: build from an edge list
//!
//! A shape is pure combinatorics over integer indices. It drives a
//! [`ShapeBuilder`]; what the builder does with the calls (spawn real
//! creations, count them, record them) is not the shape's business.

use std::collections::HashSet;

use rand::Rng;

/// Sink for a shape's node and edge calls
pub trait ShapeBuilder {
    /// Declare a node for an integer index
    fn add_node(&mut self, index: u64);

    /// Declare an edge between two integer indices
    ///
    /// Endpoints not previously declared are created implicitly.
    fn add_edge(&mut self, from: u64, to: u64);
}

/// A named combinatorial network shape
#[derive(Debug, Clone)]
pub enum Topology {
    /// `n` peers in a path: 0 - 1 - ... - (n-1)
    Line { n: u64 },
    /// `n` peers in a cycle
    Ring { n: u64 },
    /// Peer 0 as hub, connected to all others
    Star { n: u64 },
    /// Every pair of the `n` peers connected
    Complete { n: u64 },
    /// `rows x cols` lattice with horizontal and vertical edges
    Grid { rows: u64, cols: u64 },
    /// Two rails of `rungs` peers each, joined rung by rung
    Ladder { rungs: u64 },
    /// Balanced binary tree with `depth` levels below the root
    BalancedTree { depth: u32 },
    /// Watts-Strogatz small-world: ring lattice with `k/2` neighbors per
    /// side, each lattice edge rewired with probability `beta`
    WattsStrogatz { n: u64, k: u64, beta: f64 },
    /// Each pair connected with probability `p`; isolated peers are
    /// patched up with one random edge afterwards
    Random { n: u64, p: f64 },
    /// Explicit edge list; peers are implied by the endpoints
    Custom { edges: Vec<(u64, u64)> },
}

impl Topology {
    /// Drive this shape against a builder
    pub fn drive(&self, builder: &mut dyn ShapeBuilder) {
        match self {
            Topology::Line { n } => {
                declare_nodes(builder, *n);
                for i in 1..*n {
                    builder.add_edge(i - 1, i);
                }
            }
            Topology::Ring { n } => {
                declare_nodes(builder, *n);
                for i in 1..*n {
                    builder.add_edge(i - 1, i);
                }
                // A two-peer ring is a single edge
                if *n > 2 {
                    builder.add_edge(*n - 1, 0);
                }
            }
            Topology::Star { n } => {
                declare_nodes(builder, *n);
                for i in 1..*n {
                    builder.add_edge(0, i);
                }
            }
            Topology::Complete { n } => {
                declare_nodes(builder, *n);
                for i in 0..*n {
                    for j in (i + 1)..*n {
                        builder.add_edge(i, j);
                    }
                }
            }
            Topology::Grid { rows, cols } => {
                declare_nodes(builder, rows * cols);
                for row in 0..*rows {
                    for col in 0..*cols {
                        let index = row * cols + col;
                        if col + 1 < *cols {
                            builder.add_edge(index, index + 1);
                        }
                        if row + 1 < *rows {
                            builder.add_edge(index, index + cols);
                        }
                    }
                }
            }
            Topology::Ladder { rungs } => {
                let n = *rungs;
                declare_nodes(builder, 2 * n);
                for i in 1..n {
                    builder.add_edge(i - 1, i);
                    builder.add_edge(n + i - 1, n + i);
                }
                for i in 0..n {
                    builder.add_edge(i, n + i);
                }
            }
            Topology::BalancedTree { depth } => {
                let n = (1u64 << (depth + 1)) - 1;
                declare_nodes(builder, n);
                for i in 0..n {
                    for child in [2 * i + 1, 2 * i + 2] {
                        if child < n {
                            builder.add_edge(i, child);
                        }
                    }
                }
            }
            Topology::WattsStrogatz { n, k, beta } => {
                declare_nodes(builder, *n);
                let n = *n;
                if n < 2 {
                    return;
                }
                let per_side = (*k / 2).min((n - 1) / 2);
                let mut rng = rand::rng();
                let mut edges: HashSet<(u64, u64)> = HashSet::new();
                for i in 0..n {
                    for offset in 1..=per_side {
                        let lattice = (i + offset) % n;
                        let mut target = lattice;
                        if rng.random::<f64>() < *beta {
                            // Rewire to a uniform non-self, non-duplicate
                            // target; fall back to the lattice edge if the
                            // graph is too dense to find one quickly
                            for _ in 0..32 {
                                let candidate = rng.random_range(0..n);
                                if candidate != i && !edges.contains(&ordered(i, candidate)) {
                                    target = candidate;
                                    break;
                                }
                            }
                        }
                        if edges.insert(ordered(i, target)) {
                            builder.add_edge(i, target);
                        }
                    }
                }
            }
            Topology::Random { n, p } => {
                declare_nodes(builder, *n);
                let n = *n;
                let mut rng = rand::rng();
                let mut degree = vec![0u64; n as usize];
                for i in 0..n {
                    for j in (i + 1)..n {
                        if rng.random::<f64>() < *p {
                            degree[i as usize] += 1;
                            degree[j as usize] += 1;
                            builder.add_edge(i, j);
                        }
                    }
                }
                // Ensure connectivity: add edges to any isolated nodes
                if n > 1 {
                    for i in 0..n {
                        if degree[i as usize] == 0 {
                            let other = loop {
                                let candidate = rng.random_range(0..n);
                                if candidate != i {
                                    break candidate;
                                }
                            };
                            degree[i as usize] += 1;
                            degree[other as usize] += 1;
                            builder.add_edge(i, other);
                        }
                    }
                }
            }
            Topology::Custom { edges } => {
                for (from, to) in edges {
                    builder.add_edge(*from, *to);
                }
            }
        }
    }
}

fn declare_nodes(builder: &mut dyn ShapeBuilder, n: u64) {
    for i in 0..n {
        builder.add_node(i);
    }
}

fn ordered(a: u64, b: u64) -> (u64, u64) {
    if a < b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the calls a shape makes, nothing more.
    #[derive(Default)]
    struct RecordingBuilder {
        nodes: Vec<u64>,
        edges: Vec<(u64, u64)>,
    }

    impl ShapeBuilder for RecordingBuilder {
        fn add_node(&mut self, index: u64) {
            self.nodes.push(index);
        }

        fn add_edge(&mut self, from: u64, to: u64) {
            self.edges.push((from, to));
        }
    }

    fn record(topology: Topology) -> RecordingBuilder {
        let mut builder = RecordingBuilder::default();
        topology.drive(&mut builder);
        builder
    }

    #[test]
    fn test_line_counts() {
        let built = record(Topology::Line { n: 5 });
        assert_eq!(built.nodes.len(), 5);
        assert_eq!(built.edges.len(), 4);
    }

    #[test]
    fn test_ring_counts() {
        let built = record(Topology::Ring { n: 4 });
        assert_eq!(built.nodes.len(), 4);
        assert_eq!(built.edges.len(), 4); // 0-1, 1-2, 2-3, 3-0

        // Two peers make a single edge, not a doubled one
        let pair = record(Topology::Ring { n: 2 });
        assert_eq!(pair.edges, vec![(0, 1)]);
    }

    #[test]
    fn test_star_counts() {
        let built = record(Topology::Star { n: 6 });
        assert_eq!(built.nodes.len(), 6);
        assert_eq!(built.edges.len(), 5);
        assert!(built.edges.iter().all(|(from, _)| *from == 0));
    }

    #[test]
    fn test_complete_counts() {
        let built = record(Topology::Complete { n: 4 });
        assert_eq!(built.nodes.len(), 4);
        assert_eq!(built.edges.len(), 6); // C(4,2)
    }

    #[test]
    fn test_grid_counts() {
        let built = record(Topology::Grid { rows: 3, cols: 4 });
        assert_eq!(built.nodes.len(), 12);
        assert_eq!(built.edges.len(), 3 * 3 + 2 * 4); // m*(n-1) + (m-1)*n
    }

    #[test]
    fn test_ladder_counts() {
        let built = record(Topology::Ladder { rungs: 4 });
        assert_eq!(built.nodes.len(), 8);
        assert_eq!(built.edges.len(), 10); // 3n - 2
    }

    #[test]
    fn test_balanced_tree_counts() {
        let built = record(Topology::BalancedTree { depth: 2 });
        assert_eq!(built.nodes.len(), 7); // 2^(d+1) - 1
        assert_eq!(built.edges.len(), 6); // 2^(d+1) - 2

        let deeper = record(Topology::BalancedTree { depth: 4 });
        assert_eq!(deeper.nodes.len(), 31);
        assert_eq!(deeper.edges.len(), 30);
    }

    #[test]
    fn test_watts_strogatz_without_rewiring_is_the_lattice() {
        let built = record(Topology::WattsStrogatz {
            n: 10,
            k: 4,
            beta: 0.0,
        });
        assert_eq!(built.nodes.len(), 10);
        assert_eq!(built.edges.len(), 20); // n * k / 2
    }

    #[test]
    fn test_watts_strogatz_rewiring_never_self_loops_or_duplicates() {
        let built = record(Topology::WattsStrogatz {
            n: 12,
            k: 4,
            beta: 1.0,
        });
        let mut seen = HashSet::new();
        for (from, to) in &built.edges {
            assert_ne!(from, to);
            assert!(seen.insert(ordered(*from, *to)));
        }
    }

    #[test]
    fn test_random_extremes() {
        let empty_p = record(Topology::Random { n: 6, p: 0.0 });
        assert_eq!(empty_p.nodes.len(), 6);
        // Isolated peers each got patched with one edge
        assert!(!empty_p.edges.is_empty());

        let full_p = record(Topology::Random { n: 6, p: 1.0 });
        assert_eq!(full_p.edges.len(), 15); // C(6,2), nothing isolated
    }

    #[test]
    fn test_custom_emits_edges_verbatim() {
        let built = record(Topology::Custom {
            edges: vec![(0, 1), (1, 2), (7, 0)],
        });
        assert!(built.nodes.is_empty());
        assert_eq!(built.edges, vec![(0, 1), (1, 2), (7, 0)]);
    }
}
