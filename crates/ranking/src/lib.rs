//! # Ranking Crate
//!
//! Top-K and similarity queries over viewing-habit records.
//!
//! ## Components
//!
//! ### BoundedMinSelector
//! Array-backed binary heap that keeps the K best entries of a stream with a
//! deterministic `(key, tiebreak)` order. Drained weakest-first, reversed for
//! a best-first report.
//!
//! ### Similarity
//! Fixed-weight score of two users (age, genre, country, tier, watch time).
//!
//! ### WeightedGraph
//! Undirected weighted adjacency lists over dense node ids with
//! k-nearest-neighbor lookup; used as a star around the top watcher.
//!
//! ### RankingEngine
//! Runs the queries: most active users, most similar pairs, genre
//! co-occurrence graph, genre per age group, average watch time per country,
//! users per subscription tier.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::load_users;
//! use ranking::{ActiveStrategy, RankingEngine};
//!
//! let users = load_users(Path::new("data/netflix_users.csv"))?.users;
//! let engine = RankingEngine::new();
//!
//! let top = engine.most_active(&users, 10, ActiveStrategy::BoundedHeap)?;
//! let pairs = engine.most_similar_pairs(&users, 10)?;
//! let genres = engine.genre_co_occurrence_graph(&users);
//! ```

// Public modules
pub mod error;
pub mod selector;
pub mod similarity;
pub mod graph;
pub mod genre_graph;
pub mod engine;

// Re-export commonly used types
pub use engine::{ActiveStrategy, EngineConfig, RankingEngine};
pub use error::{RankingError, Result};
pub use genre_graph::{GenreEdge, GenreGraph};
pub use graph::{Neighbor, WeightedGraph};
pub use selector::{BoundedMinSelector, Retain, SelectorEntry};
pub use similarity::SimilarityPair;
