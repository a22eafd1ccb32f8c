//! Core domain types for viewing-habit records.
//!
//! A `UserRecord` is created once by the loader (or a generator) and never
//! mutated afterwards; everything downstream borrows it.

use crate::error::DataLoadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user, as it appears in the source data
pub type UserId = u32;

// =============================================================================
// Subscription Tier
// =============================================================================

/// Streaming plan a user is subscribed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubscriptionTier {
    Basic,
    Standard,
    Premium,
}

impl SubscriptionTier {
    /// All tiers, cheapest first
    pub const ALL: [SubscriptionTier; 3] = [
        SubscriptionTier::Basic,
        SubscriptionTier::Standard,
        SubscriptionTier::Premium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Basic => "Basic",
            SubscriptionTier::Standard => "Standard",
            SubscriptionTier::Premium => "Premium",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionTier {
    type Err = DataLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(SubscriptionTier::Basic),
            "standard" => Ok(SubscriptionTier::Standard),
            "premium" => Ok(SubscriptionTier::Premium),
            _ => Err(DataLoadError::InvalidValue {
                field: "subscription".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// User Record
// =============================================================================

/// One user's viewing-habit profile.
///
/// Fields are public for reading; records are passed around as `&UserRecord`
/// or `&[UserRecord]` and cloned only when a result needs to own one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub age: u32,
    pub country: String,
    pub subscription_tier: SubscriptionTier,
    /// Hours watched in the last month
    pub watch_time_hours: f64,
    pub preferred_genre: String,
    /// Date of last login, kept verbatim (`YYYY-MM-DD` in practice)
    pub last_login_date: String,
}

impl UserRecord {
    /// Number of columns in the CSV representation
    pub const FIELD_COUNT: usize = 8;
}
