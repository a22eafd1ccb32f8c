//! Undirected weighted graph over dense integer node ids.
//!
//! Nodes are `0..node_count`. Every edge is stored in both endpoints'
//! adjacency lists. Bad edges (out-of-range ids, self-loops, negative or
//! non-finite weights) are rejected before anything is written, so a failed `add_edge`
//! leaves the graph exactly as it was.

use crate::error::{RankingError, Result};
use std::cmp::Ordering;

/// One adjacency entry: the node on the other end and the edge weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub node: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    adjacency: Vec<Vec<Neighbor>>,
    edge_count: usize,
}

impl WeightedGraph {
    /// Create a graph with `node_count` isolated nodes
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn check_node(&self, node: usize) -> Result<()> {
        if node >= self.adjacency.len() {
            return Err(RankingError::NodeOutOfRange {
                node,
                node_count: self.adjacency.len(),
            });
        }
        Ok(())
    }

    /// Add the undirected edge `u -- v`
    pub fn add_edge(&mut self, u: usize, v: usize, weight: f64) -> Result<()> {
        self.check_node(u)?;
        self.check_node(v)?;
        if u == v {
            return Err(RankingError::SelfLoop { node: u });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(RankingError::InvalidWeight { weight });
        }

        self.adjacency[u].push(Neighbor { node: v, weight });
        self.adjacency[v].push(Neighbor { node: u, weight });
        self.edge_count += 1;
        Ok(())
    }

    /// Adjacency list of `node`, in insertion order
    pub fn neighbors(&self, node: usize) -> Result<&[Neighbor]> {
        self.check_node(node)?;
        Ok(&self.adjacency[node])
    }

    /// The `k` neighbors of `source` with the lightest edges.
    ///
    /// Sorted by ascending weight, ties by ascending node id. Returns fewer
    /// than `k` ids when the node has fewer neighbors.
    pub fn k_nearest(&self, source: usize, k: usize) -> Result<Vec<usize>> {
        let mut neighbors = self.neighbors(source)?.to_vec();
        neighbors.sort_by(compare_neighbors);
        Ok(neighbors.into_iter().take(k).map(|n| n.node).collect())
    }
}

fn compare_neighbors(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.weight.total_cmp(&b.weight).then(a.node.cmp(&b.node))
}

/// Build a star around the largest value.
///
/// The hub is the index of the maximum (lowest index on ties); every other
/// index is linked to it with weight `|value - hub value|`. Returns `None`
/// for an empty slice.
///
/// Values must be finite. `total_cmp` ranks NaN above every number, so a NaN
/// becomes the hub and its first edge fails with `InvalidWeight`.
pub fn build_max_star(values: &[f64]) -> Result<Option<(WeightedGraph, usize)>> {
    let Some(hub) = (0..values.len()).reduce(|best, i| {
        if values[i].total_cmp(&values[best]) == Ordering::Greater {
            i
        } else {
            best
        }
    }) else {
        return Ok(None);
    };

    let mut graph = WeightedGraph::new(values.len());
    for (i, value) in values.iter().enumerate() {
        if i != hub {
            graph.add_edge(hub, i, (value - values[hub]).abs())?;
        }
    }
    Ok(Some((graph, hub)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_symmetric() {
        let mut graph = WeightedGraph::new(3);
        graph.add_edge(0, 2, 1.5).unwrap();

        assert_eq!(graph.neighbors(0).unwrap(), &[Neighbor { node: 2, weight: 1.5 }]);
        assert_eq!(graph.neighbors(2).unwrap(), &[Neighbor { node: 0, weight: 1.5 }]);
        assert!(graph.neighbors(1).unwrap().is_empty());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_out_of_range_rejected_without_mutation() {
        let mut graph = WeightedGraph::new(2);
        let err = graph.add_edge(0, 5, 1.0).unwrap_err();
        assert_eq!(err, RankingError::NodeOutOfRange { node: 5, node_count: 2 });

        // The valid endpoint must not have picked up a half edge
        assert!(graph.neighbors(0).unwrap().is_empty());
        assert_eq!(graph.edge_count(), 0);

        assert!(matches!(graph.k_nearest(7, 1), Err(RankingError::NodeOutOfRange { .. })));
    }

    #[test]
    fn test_self_loop_and_bad_weight_rejected() {
        let mut graph = WeightedGraph::new(2);
        assert_eq!(graph.add_edge(1, 1, 0.0), Err(RankingError::SelfLoop { node: 1 }));
        assert!(matches!(graph.add_edge(0, 1, -1.0), Err(RankingError::InvalidWeight { .. })));
        assert!(matches!(graph.add_edge(0, 1, f64::NAN), Err(RankingError::InvalidWeight { .. })));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_k_nearest_orders_by_weight_then_id() {
        let mut graph = WeightedGraph::new(5);
        graph.add_edge(0, 4, 2.0).unwrap();
        graph.add_edge(0, 3, 1.0).unwrap();
        graph.add_edge(0, 1, 2.0).unwrap();
        graph.add_edge(0, 2, 5.0).unwrap();

        assert_eq!(graph.k_nearest(0, 3).unwrap(), vec![3, 1, 4]);
        assert_eq!(graph.k_nearest(0, 10).unwrap(), vec![3, 1, 4, 2]);
        assert!(graph.k_nearest(0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_star_from_watch_times() {
        let (graph, hub) = build_max_star(&[5.0, 50.0, 12.0, 48.0]).unwrap().unwrap();
        assert_eq!(hub, 1);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.k_nearest(1, 2).unwrap(), vec![3, 2]);

        // Leaves only touch the hub
        assert_eq!(graph.neighbors(0).unwrap().len(), 1);
    }

    #[test]
    fn test_star_hub_tie_takes_lowest_index() {
        let (_, hub) = build_max_star(&[3.0, 9.0, 9.0]).unwrap().unwrap();
        assert_eq!(hub, 1);
    }

    #[test]
    fn test_star_with_nan_hub_fails() {
        assert!(matches!(
            build_max_star(&[1.0, f64::NAN]),
            Err(RankingError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_star_edge_cases() {
        assert!(build_max_star(&[]).unwrap().is_none());

        let (graph, hub) = build_max_star(&[4.0]).unwrap().unwrap();
        assert_eq!(hub, 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.k_nearest(0, 3).unwrap().is_empty());
    }
}
