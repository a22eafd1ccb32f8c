//! # Data Loader Crate
//!
//! This crate turns viewing-habit CSV exports into `UserRecord` values.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (`UserRecord`, `SubscriptionTier`)
//! - **parser**: Lenient CSV loader and matching writer
//! - **sample**: Deterministic and seeded-random dataset generators
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::load_users;
//! use std::path::Path;
//!
//! let load = load_users(Path::new("data/netflix_users.csv"))?;
//! for err in &load.rejected {
//!     eprintln!("skipped: {}", err);
//! }
//! println!("Loaded {} users", load.users.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod sample;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use parser::{load_users, parse_users, write_users_csv, UserLoad, CSV_HEADER};
pub use sample::{generate_random_users, generate_sample_users};
pub use types::{SubscriptionTier, UserId, UserRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parsing() {
        assert_eq!("Premium".parse::<SubscriptionTier>().unwrap(), SubscriptionTier::Premium);
        assert_eq!(" standard ".parse::<SubscriptionTier>().unwrap(), SubscriptionTier::Standard);
        assert!("Gold".parse::<SubscriptionTier>().is_err());
    }

    #[test]
    fn test_tier_display_matches_csv() {
        for tier in SubscriptionTier::ALL {
            assert_eq!(tier.to_string().parse::<SubscriptionTier>().unwrap(), tier);
        }
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("flixhabit-users-{}.csv", std::process::id()));
        let users = generate_sample_users(5);
        let file = std::fs::File::create(&path).unwrap();
        write_users_csv(file, &users).unwrap();

        let load = load_users(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(load.rejected.is_empty());
        assert_eq!(load.users, users);
    }
}
