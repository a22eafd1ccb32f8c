//! Pairwise similarity between two users.
//!
//! The score adds up five terms with fixed weights:
//!
//! | term | contribution |
//! |---|---|
//! | age closeness | `100 / (|age_a - age_b| + 1)` |
//! | same genre | `+50` |
//! | same country | `+30` |
//! | same subscription tier | `+20` |
//! | watch-time closeness | `100 / (|watch_a - watch_b| + 1)` |
//!
//! Identical profiles score [`MAX_SCORE`]; every term shrinks as the
//! attributes drift apart, so the range is `(0, 300]`.

use data_loader::{UserId, UserRecord};
use serde::Serialize;

pub const AGE_WEIGHT: f64 = 100.0;
pub const GENRE_MATCH_BONUS: f64 = 50.0;
pub const COUNTRY_MATCH_BONUS: f64 = 30.0;
pub const TIER_MATCH_BONUS: f64 = 20.0;
pub const WATCH_TIME_WEIGHT: f64 = 100.0;

/// Score of a user compared with itself
pub const MAX_SCORE: f64 =
    AGE_WEIGHT + GENRE_MATCH_BONUS + COUNTRY_MATCH_BONUS + TIER_MATCH_BONUS + WATCH_TIME_WEIGHT;

/// Similarity of two users. Symmetric and free of side effects.
pub fn score(a: &UserRecord, b: &UserRecord) -> f64 {
    let mut total = AGE_WEIGHT / (a.age.abs_diff(b.age) as f64 + 1.0);

    if a.preferred_genre == b.preferred_genre {
        total += GENRE_MATCH_BONUS;
    }
    if a.country == b.country {
        total += COUNTRY_MATCH_BONUS;
    }
    if a.subscription_tier == b.subscription_tier {
        total += TIER_MATCH_BONUS;
    }

    total + WATCH_TIME_WEIGHT / ((a.watch_time_hours - b.watch_time_hours).abs() + 1.0)
}

/// Two distinct users and how similar they are
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityPair {
    pub user_a: UserId,
    pub user_b: UserId,
    pub score: f64,
}

impl SimilarityPair {
    /// Score `a` against `b`
    pub fn between(a: &UserRecord, b: &UserRecord) -> Self {
        Self {
            user_a: a.id,
            user_b: b.id,
            score: score(a, b),
        }
    }

    /// The pair as `(smaller id, larger id)`, for comparing unordered pairs
    pub fn unordered_key(&self) -> (UserId, UserId) {
        (self.user_a.min(self.user_b), self.user_a.max(self.user_b))
    }
}
