//! Genre co-occurrence graph.
//!
//! Vertices are genre names, edges are unweighted and undirected. The graph
//! itself does not deduplicate; the builder in the engine decides which
//! links to add.

use serde::Serialize;
use std::collections::BTreeMap;

/// One undirected genre link, in the order it was discovered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreGraph {
    adjacency: BTreeMap<String, Vec<String>>,
    edges: Vec<GenreEdge>,
}

impl GenreGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex if it is not already present
    pub fn add_genre(&mut self, genre: &str) {
        if !self.adjacency.contains_key(genre) {
            self.adjacency.insert(genre.to_string(), Vec::new());
        }
    }

    /// Link two genres, adding either vertex if missing
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.add_genre(from);
        self.add_genre(to);
        if let Some(list) = self.adjacency.get_mut(from) {
            list.push(to.to_string());
        }
        if let Some(list) = self.adjacency.get_mut(to) {
            list.push(from.to_string());
        }
        self.edges.push(GenreEdge {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    /// All genres, alphabetically
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    pub fn genre_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Linked genres, in the order the links were added
    pub fn neighbors(&self, genre: &str) -> &[String] {
        self.adjacency
            .get(genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn edges(&self) -> &[GenreEdge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        self.neighbors(a).iter().any(|n| n == b)
    }
}
