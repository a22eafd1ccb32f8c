//! Ranking Engine - answers the ranking and similarity queries
//!
//! Every query takes the full user slice and returns an owned, ordered
//! result. The engine keeps only configuration between calls, so one engine
//! can serve any number of callers (it is `Send + Sync`).
//!
//! ## Queries
//! - `most_active`: top-k users by watch time, via a bounded heap or a star graph
//! - `most_similar_pairs`: top-k user pairs by similarity score, O(n² log k)
//! - `genre_co_occurrence_graph`: genres linked by sufficiently similar users
//! - `genre_for_age_group`: most common genre in an inclusive age range
//! - `average_watch_time_by_country`: mean watch time per country
//! - `users_by_subscription`: users on a given tier
//!
//! ## Tie-breaks
//! - active users: equal watch times rank by ascending user id
//! - similar pairs: equal scores rank by input position (`(i, j)` lexicographic)
//! - age-group genre: equal counts go to the genre met first in the input

use crate::error::{RankingError, Result};
use crate::genre_graph::GenreGraph;
use crate::graph::build_max_star;
use crate::selector::{BoundedMinSelector, Retain};
use crate::similarity::{self, SimilarityPair};
use data_loader::{SubscriptionTier, UserRecord};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument};

/// Similarity a user pair must exceed to link their genres
pub const DEFAULT_GENRE_LINK_THRESHOLD: f64 = 70.0;

/// User count at which the pair scan switches to rayon
pub const DEFAULT_PARALLEL_MIN_USERS: usize = 256;

/// How `most_active` finds the top users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveStrategy {
    /// Bounded selector keyed by watch time, O(n log k)
    #[default]
    BoundedHeap,
    /// Star graph around the top watcher, nearest neighbors by watch-time gap, O(n log n)
    Graph,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub genre_link_threshold: f64,
    pub parallel_pairs: bool,
    pub parallel_min_users: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            genre_link_threshold: DEFAULT_GENRE_LINK_THRESHOLD,
            parallel_pairs: true,
            parallel_min_users: DEFAULT_PARALLEL_MIN_USERS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    config: EngineConfig,
}

impl RankingEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Configure the genre link threshold (default: 70.0)
    pub fn with_genre_link_threshold(mut self, threshold: f64) -> Self {
        self.config.genre_link_threshold = threshold;
        self
    }

    /// Enable or disable the parallel pair scan (default: enabled)
    pub fn with_parallel_pairs(mut self, enabled: bool) -> Self {
        self.config.parallel_pairs = enabled;
        self
    }

    /// Configure the user count from which the pair scan runs in parallel (default: 256)
    pub fn with_parallel_min_users(mut self, min: usize) -> Self {
        self.config.parallel_min_users = min;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Top `k` users by watch time, highest first.
    ///
    /// Both strategies return the same users in the same order; they differ
    /// only in how they get there. Watch times are expected to be finite, as
    /// the loader guarantees: a NaN watch time makes the graph strategy fail
    /// with `InvalidWeight` when it builds the star.
    #[instrument(skip(self, users), fields(users = users.len()))]
    pub fn most_active(
        &self,
        users: &[UserRecord],
        k: usize,
        strategy: ActiveStrategy,
    ) -> Result<Vec<UserRecord>> {
        check_k(k)?;
        let ranked = match strategy {
            ActiveStrategy::BoundedHeap => most_active_by_heap(users, k),
            ActiveStrategy::Graph => most_active_by_graph(users, k)?,
        };
        debug!("Ranked {} most active users", ranked.len());
        Ok(ranked)
    }

    /// Top `k` most similar user pairs, highest score first.
    ///
    /// Every unordered pair is scored exactly once; nothing is sampled.
    /// User ids are expected to be unique, as the loader enforces; two records
    /// that do share an id are still never paired with each other.
    #[instrument(skip(self, users), fields(users = users.len()))]
    pub fn most_similar_pairs(&self, users: &[UserRecord], k: usize) -> Result<Vec<SimilarityPair>> {
        check_k(k)?;

        let parallel = self.config.parallel_pairs && users.len() >= self.config.parallel_min_users;
        let selector = if parallel {
            debug!("Scanning pairs in parallel");
            similar_pairs_parallel(users, k)
        } else {
            similar_pairs_serial(users, k)
        };

        let pairs = selector.into_ranked_vec();
        debug!("Kept {} similar pairs", pairs.len());
        Ok(pairs)
    }

    /// Link genres of user pairs whose similarity exceeds the threshold.
    ///
    /// Every distinct genre becomes a vertex. A pair of users with different
    /// genres and a score above the threshold links those two genres; each
    /// genre pair is linked at most once.
    #[instrument(skip(self, users), fields(users = users.len()))]
    pub fn genre_co_occurrence_graph(&self, users: &[UserRecord]) -> GenreGraph {
        let mut graph = GenreGraph::new();
        for user in users {
            graph.add_genre(&user.preferred_genre);
        }

        let mut linked: HashSet<(&str, &str)> = HashSet::new();
        for (i, a) in users.iter().enumerate() {
            for b in &users[i + 1..] {
                let (ga, gb) = (a.preferred_genre.as_str(), b.preferred_genre.as_str());
                if ga == gb {
                    continue;
                }
                let key = if ga < gb { (ga, gb) } else { (gb, ga) };
                if linked.contains(&key) {
                    continue;
                }
                if similarity::score(a, b) > self.config.genre_link_threshold {
                    linked.insert(key);
                    graph.add_edge(ga, gb);
                }
            }
        }

        debug!(
            "Genre graph: {} genres, {} links",
            graph.genre_count(),
            graph.edge_count()
        );
        graph
    }

    /// Most common genre among users aged `min_age..=max_age`.
    ///
    /// Returns `None` when nobody falls in the range.
    pub fn genre_for_age_group(&self, users: &[UserRecord], min_age: u32, max_age: u32) -> Option<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();

        for user in users.iter().filter(|u| (min_age..=max_age).contains(&u.age)) {
            let count = counts.entry(user.preferred_genre.as_str()).or_insert_with(|| {
                first_seen.push(user.preferred_genre.as_str());
                0
            });
            *count += 1;
        }

        // Strictly greater, so the earliest genre keeps a tie
        let mut best: Option<(&str, usize)> = None;
        for genre in first_seen {
            let count = counts[genre];
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((genre, count));
            }
        }
        best.map(|(genre, _)| genre.to_string())
    }

    /// Mean watch time per country. Only countries with users appear.
    pub fn average_watch_time_by_country(&self, users: &[UserRecord]) -> BTreeMap<String, f64> {
        let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for user in users {
            let entry = totals.entry(user.country.as_str()).or_insert((0.0, 0));
            entry.0 += user.watch_time_hours;
            entry.1 += 1;
        }

        totals
            .into_iter()
            .map(|(country, (sum, count))| (country.to_string(), sum / count as f64))
            .collect()
    }

    /// Users on `tier`, in input order
    pub fn users_by_subscription(&self, users: &[UserRecord], tier: SubscriptionTier) -> Vec<UserRecord> {
        users
            .iter()
            .filter(|u| u.subscription_tier == tier)
            .cloned()
            .collect()
    }
}

fn check_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(RankingError::InvalidK { k });
    }
    Ok(())
}

fn most_active_by_heap(users: &[UserRecord], k: usize) -> Vec<UserRecord> {
    let mut selector = BoundedMinSelector::new(k, Retain::Largest);
    for user in users {
        // Negated id: among equal watch times the higher id loses
        selector.insert_with_tiebreak(user, user.watch_time_hours, -i64::from(user.id));
    }
    selector.into_ranked_vec().into_iter().cloned().collect()
}

fn most_active_by_graph(users: &[UserRecord], k: usize) -> Result<Vec<UserRecord>> {
    // Node ids follow the heap's ranking (watch time descending, then user
    // id), so a weight tie in `k_nearest` resolves the same way the heap does
    let mut ranked_nodes: Vec<&UserRecord> = users.iter().collect();
    ranked_nodes.sort_by(|a, b| {
        watch_key(b)
            .total_cmp(&watch_key(a))
            .then(a.id.cmp(&b.id))
    });

    let watch_times: Vec<f64> = ranked_nodes.iter().map(|u| watch_key(u)).collect();
    let Some((graph, hub)) = build_max_star(&watch_times)? else {
        return Ok(Vec::new());
    };

    let mut ranked = Vec::with_capacity(k.min(ranked_nodes.len()));
    ranked.push(ranked_nodes[hub].clone());
    for node in graph.k_nearest(hub, k - 1)? {
        ranked.push(ranked_nodes[node].clone());
    }
    Ok(ranked)
}

/// Watch time with -0.0 folded into 0.0
fn watch_key(user: &UserRecord) -> f64 {
    user.watch_time_hours + 0.0
}

/// Ordinal of pair `(i, j)` in serial scan order, negated so earlier pairs win ties
fn pair_tiebreak(i: usize, j: usize, n: usize) -> i64 {
    -((i * n + j) as i64)
}

fn similar_pairs_serial(users: &[UserRecord], k: usize) -> BoundedMinSelector<SimilarityPair> {
    let n = users.len();
    let mut selector = BoundedMinSelector::new(k, Retain::Largest);
    for i in 0..n {
        for j in i + 1..n {
            if users[i].id == users[j].id {
                continue;
            }
            let pair = SimilarityPair::between(&users[i], &users[j]);
            selector.insert_with_tiebreak(pair, pair.score, pair_tiebreak(i, j, n));
        }
    }
    selector
}

fn similar_pairs_parallel(users: &[UserRecord], k: usize) -> BoundedMinSelector<SimilarityPair> {
    let n = users.len();
    // Each worker keeps its own top-k; the partial selectors are then fed
    // through one final selector rather than concatenated
    (0..n)
        .into_par_iter()
        .fold(
            || BoundedMinSelector::new(k, Retain::Largest),
            |mut local, i| {
                for j in i + 1..n {
                    if users[i].id == users[j].id {
                        continue;
                    }
                    let pair = SimilarityPair::between(&users[i], &users[j]);
                    local.insert_with_tiebreak(pair, pair.score, pair_tiebreak(i, j, n));
                }
                local
            },
        )
        .reduce(
            || BoundedMinSelector::new(k, Retain::Largest),
            |mut acc, local| {
                acc.merge(local);
                acc
            },
        )
}
