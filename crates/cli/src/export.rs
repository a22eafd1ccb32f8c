//! JSON export of query results.
//!
//! Each result is flattened into plain records and written as a pretty
//! printed document. Field names follow the dashboard's expected keys
//! (`userID`, `watchTime`, ...), so the documents can be dropped straight
//! into its `data/` folder.

use anyhow::{Context, Result};
use data_loader::{SubscriptionTier, UserId, UserRecord};
use ranking::{ActiveStrategy, GenreEdge, GenreGraph, RankingEngine, SimilarityPair};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Inclusive age ranges used for the genre-by-age document
pub const AGE_BUCKETS: [(u32, u32); 7] = [
    (13, 17),
    (18, 24),
    (25, 34),
    (35, 44),
    (45, 54),
    (55, 64),
    (65, 120),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportUser {
    #[serde(rename = "userID")]
    pub user_id: UserId,
    pub name: String,
    pub age: u32,
    pub country: String,
    pub subscription: SubscriptionTier,
    #[serde(rename = "watchTime")]
    pub watch_time: f64,
    pub genre: String,
    #[serde(rename = "lastLogin")]
    pub last_login: String,
}

impl From<&UserRecord> for ExportUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            age: user.age,
            country: user.country.clone(),
            subscription: user.subscription_tier,
            watch_time: user.watch_time_hours,
            genre: user.preferred_genre.clone(),
            last_login: user.last_login_date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportPair {
    #[serde(rename = "user1ID")]
    pub user1_id: UserId,
    #[serde(rename = "user2ID")]
    pub user2_id: UserId,
    pub similarity: f64,
}

impl From<&SimilarityPair> for ExportPair {
    fn from(pair: &SimilarityPair) -> Self {
        Self {
            user1_id: pair.user_a,
            user2_id: pair.user_b,
            similarity: pair.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GenreEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroupGenre {
    #[serde(rename = "ageRange")]
    pub age_range: String,
    pub genre: String,
}

pub fn users_document(users: &[UserRecord]) -> Vec<ExportUser> {
    users.iter().map(ExportUser::from).collect()
}

pub fn pairs_document(pairs: &[SimilarityPair]) -> Vec<ExportPair> {
    pairs.iter().map(ExportPair::from).collect()
}

pub fn graph_document(graph: &GenreGraph) -> GraphDocument {
    GraphDocument {
        nodes: graph
            .genres()
            .map(|genre| GraphNode {
                id: genre.to_string(),
                label: genre.to_string(),
            })
            .collect(),
        edges: graph.edges().to_vec(),
    }
}

/// Most common genre per age bucket; empty buckets are left out
pub fn age_group_document(engine: &RankingEngine, users: &[UserRecord]) -> Vec<AgeGroupGenre> {
    AGE_BUCKETS
        .iter()
        .filter_map(|&(min, max)| {
            engine
                .genre_for_age_group(users, min, max)
                .map(|genre| AgeGroupGenre {
                    age_range: format!("{}-{}", min, max),
                    genre,
                })
        })
        .collect()
}

/// Write any serializable value as pretty JSON
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn emit<T: Serialize + ?Sized>(
    out_dir: &Path,
    name: &str,
    value: &T,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let path = out_dir.join(name);
    write_json(&path, value)?;
    info!("Wrote {}", path.display());
    written.push(path);
    Ok(())
}

/// Run every query and write one document per result into `out_dir`.
///
/// Returns the paths written, in a fixed order.
pub fn export_all(
    engine: &RankingEngine,
    users: &[UserRecord],
    out_dir: &Path,
    k: usize,
    strategy: ActiveStrategy,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
    let mut written = Vec::new();

    let active = engine.most_active(users, k, strategy)?;
    emit(out_dir, "topActive_users.json", &users_document(&active), &mut written)?;

    let pairs = engine.most_similar_pairs(users, k)?;
    emit(out_dir, "similar_users.json", &pairs_document(&pairs), &mut written)?;

    let graph = engine.genre_co_occurrence_graph(users);
    emit(out_dir, "genre_graph.json", &graph_document(&graph), &mut written)?;

    let age_groups = age_group_document(engine, users);
    emit(out_dir, "genreForAgeGroup.json", &age_groups, &mut written)?;

    let averages: BTreeMap<String, f64> = engine.average_watch_time_by_country(users);
    emit(out_dir, "avgWatchTimeByCountry.json", &averages, &mut written)?;

    for tier in SubscriptionTier::ALL {
        let members = engine.users_by_subscription(users, tier);
        let name = format!("{}_users.json", tier);
        emit(out_dir, &name, &users_document(&members), &mut written)?;
    }

    Ok(written)
}
