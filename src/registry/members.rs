//! Member list CSV files: one `Username` column, any other columns ignored.

use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

pub const USERNAME_COLUMN: &str = "Username";

/// Read the `Username` column of a CSV file.
///
/// Values are trimmed, empty cells dropped, and duplicates removed keeping the
/// first occurrence. Unreadable or malformed files and a missing column yield an
/// empty list.
pub fn read_usernames(path: &Path) -> Vec<String> {
    let mut reader = match csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to open member list");
            return Vec::new();
        }
    };

    let column = match reader.headers() {
        Ok(headers) => headers.iter().position(|h| h == USERNAME_COLUMN),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read member list header");
            return Vec::new();
        }
    };
    let Some(column) = column else {
        warn!(
            path = %path.display(),
            column = USERNAME_COLUMN,
            "Member list has no username column"
        );
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut members = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Malformed member list, ignoring it");
                return Vec::new();
            }
        };
        let Some(username) = record.get(column).map(str::trim) else {
            continue;
        };
        if username.is_empty() {
            continue;
        }
        if seen.insert(username.to_string()) {
            members.push(username.to_string());
        }
    }

    debug!(path = %path.display(), count = members.len(), "Loaded member list");
    members
}
