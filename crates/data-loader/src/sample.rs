//! Sample and synthetic dataset generation.
//!
//! `generate_sample_users` is fully deterministic and cheap, handy for demos
//! and tests that need predictable values. `generate_random_users` produces
//! a larger, messier dataset from a seed for load and benchmark runs.

use crate::types::{SubscriptionTier, UserId, UserRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SAMPLE_GENRES: [&str; 6] = ["Comedy", "Drama", "Action", "Horror", "Romance", "Documentary"];
pub const SAMPLE_COUNTRIES: [&str; 6] = ["USA", "Canada", "UK", "France", "Germany", "Japan"];

const RANDOM_GENRES: [&str; 8] = [
    "Action", "Comedy", "Documentary", "Drama", "Fantasy", "Horror", "Romance", "Sci-Fi",
];
const RANDOM_COUNTRIES: [&str; 10] = [
    "Australia", "Brazil", "Canada", "France", "Germany", "India", "Japan", "Mexico", "UK", "USA",
];
const FIRST_NAMES: [&str; 10] = [
    "Emma", "James", "Jane", "John", "Michael", "Sarah", "David", "Olivia", "Lucas", "Maria",
];
const LAST_NAMES: [&str; 10] = [
    "Martinez", "Miller", "Davis", "Smith", "Williams", "Jones", "Brown", "Garcia", "Wilson", "Lee",
];

/// Build `count` users with ids `1..=count`.
///
/// User `i` gets age `18 + i % 40`, watch time `10 + 2.5 * i`, and country,
/// tier and genre picked round-robin by `i`.
pub fn generate_sample_users(count: usize) -> Vec<UserRecord> {
    (1..=count)
        .map(|i| UserRecord {
            id: i as UserId,
            name: format!("User{}", i),
            age: 18 + (i % 40) as u32,
            country: SAMPLE_COUNTRIES[i % SAMPLE_COUNTRIES.len()].to_string(),
            subscription_tier: SubscriptionTier::ALL[i % SubscriptionTier::ALL.len()],
            watch_time_hours: 10.0 + i as f64 * 2.5,
            preferred_genre: SAMPLE_GENRES[i % SAMPLE_GENRES.len()].to_string(),
            last_login_date: format!("2023-04-{:02}", (i - 1) % 28 + 1),
        })
        .collect()
}

/// Build `count` users from a seeded RNG. The same seed always yields the same users.
pub fn generate_random_users(count: usize, seed: u64) -> Vec<UserRecord> {
    let mut rng = StdRng::seed_from_u64(seed);

    (1..=count)
        .map(|i| {
            let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
            // Two decimals, like the exported viewing reports
            let watch_time = (rng.random_range(0.5..1000.0_f64) * 100.0).round() / 100.0;

            UserRecord {
                id: i as UserId,
                name: format!("{} {}", first, last),
                age: rng.random_range(13..=80),
                country: RANDOM_COUNTRIES[rng.random_range(0..RANDOM_COUNTRIES.len())].to_string(),
                subscription_tier: SubscriptionTier::ALL[rng.random_range(0..SubscriptionTier::ALL.len())],
                watch_time_hours: watch_time,
                preferred_genre: RANDOM_GENRES[rng.random_range(0..RANDOM_GENRES.len())].to_string(),
                last_login_date: format!(
                    "{}-{:02}-{:02}",
                    rng.random_range(2024..=2025),
                    rng.random_range(1..=12),
                    rng.random_range(1..=28)
                ),
            }
        })
        .collect()
}
