//! CSV reader and writer for user records.
//!
//! Column order is fixed:
//! `id,name,age,country,subscription,watchTimeHours,genre,lastLogin`
//!
//! The loader is lenient: a bad row is skipped and reported in
//! [`UserLoad::rejected`] with its line number, the rest of the file still
//! loads. Nothing is ever coerced to a zero or empty default.
//!
//! Rows are rejected when:
//! - a numeric field does not parse, or the watch time is negative or not finite
//! - the subscription is not `Basic`, `Standard` or `Premium` (any case); other
//!   plan names such as `Free` are reported rather than carried as free text
//! - the user id already appeared on an earlier row (the first row wins)

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Header row written by [`write_users_csv`] and expected from exported datasets
pub const CSV_HEADER: &str =
    "User_ID,Name,Age,Country,Subscription_Type,Watch_Time_Hours,Favorite_Genre,Last_Login";

/// Outcome of a lenient load: the rows that parsed plus one error per rejected row
#[derive(Debug, Default)]
pub struct UserLoad {
    pub users: Vec<UserRecord>,
    pub rejected: Vec<DataLoadError>,
}

impl UserLoad {
    /// Turn the load into an all-or-nothing result, failing on the first rejected row
    pub fn into_strict(self) -> Result<Vec<UserRecord>> {
        match self.rejected.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.users),
        }
    }
}

/// Load users from a CSV file on disk
pub fn load_users(path: &Path) -> Result<UserLoad> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content = String::from_utf8_lossy(&bytes);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(parse_users(&content, &file_name))
}

/// Parse CSV content already held in memory.
///
/// The first non-empty line is treated as a header when its first field is
/// not a number. `file` is only used to label errors.
pub fn parse_users(content: &str, file: &str) -> UserLoad {
    let mut load = UserLoad::default();
    let mut seen_first = false;
    let mut seen_ids: HashSet<UserId> = HashSet::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        if !seen_first {
            seen_first = true;
            if is_header(line_trimmed) {
                debug!("Skipping header row in {}", file);
                continue;
            }
        }

        match parse_user_line(line_trimmed, file, line_no) {
            Ok(user) if !seen_ids.insert(user.id) => {
                let err = DataLoadError::ParseError {
                    file: file.to_string(),
                    line: line_no,
                    reason: format!("Duplicate userId {}", user.id),
                };
                warn!("Rejected row: {}", err);
                load.rejected.push(err);
            }
            Ok(user) => load.users.push(user),
            Err(err) => {
                warn!("Rejected row: {}", err);
                load.rejected.push(err);
            }
        }
    }

    debug!(
        "Parsed {} users from {} ({} rejected)",
        load.users.len(),
        file,
        load.rejected.len()
    );
    load
}

fn is_header(line: &str) -> bool {
    let first = line.split(',').next().unwrap_or("").trim();
    first.parse::<UserId>().is_err()
}

/// Parse a single CSV row into a `UserRecord`
pub fn parse_user_line(line: &str, file: &str, line_no: usize) -> Result<UserRecord> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() != UserRecord::FIELD_COUNT {
        return Err(DataLoadError::FieldCountMismatch {
            expected: UserRecord::FIELD_COUNT,
            found: parts.len(),
            line: line_no,
        });
    }

    let parse_error = |reason: String| DataLoadError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason,
    };

    let id: UserId = parts[0]
        .parse()
        .map_err(|e| parse_error(format!("Invalid userId '{}': {}", parts[0], e)))?;

    let age: u32 = parts[2]
        .parse()
        .map_err(|e| parse_error(format!("Invalid age '{}': {}", parts[2], e)))?;

    let subscription_tier: SubscriptionTier = parts[4]
        .parse()
        .map_err(|_| parse_error(format!("Invalid subscription '{}'", parts[4])))?;

    let watch_time_hours: f64 = parts[5]
        .parse()
        .map_err(|e| parse_error(format!("Invalid watch time '{}': {}", parts[5], e)))?;
    if !watch_time_hours.is_finite() || watch_time_hours < 0.0 {
        return Err(parse_error(format!(
            "Watch time must be a non-negative number, got '{}'",
            parts[5]
        )));
    }

    Ok(UserRecord {
        id,
        name: parts[1].to_string(),
        age,
        country: parts[3].to_string(),
        subscription_tier,
        watch_time_hours,
        preferred_genre: parts[6].to_string(),
        last_login_date: parts[7].to_string(),
    })
}

/// Write users as CSV (header included) in the same column order the loader reads
pub fn write_users_csv<W: Write>(mut writer: W, users: &[UserRecord]) -> Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for user in users {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            user.id,
            user.name,
            user.age,
            user.country,
            user.subscription_tier,
            user.watch_time_hours,
            user.preferred_genre,
            user.last_login_date
        )?;
    }
    writer.flush()?;
    Ok(())
}
