//! Grouping of export rows into one workout per calendar date.

use crate::types::{GroupedWorkout, PerformanceRow};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Parse an export date (`MM/DD/YYYY` or `MM/DD/YY`)
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let date = date.trim();

    // chrono's %Y happily reads "24" as year 24, so pick the format by year width
    let format = match date.rsplit('/').next().map(str::len) {
        Some(4) => "%m/%d/%Y",
        Some(2) => "%m/%d/%y",
        _ => return Err(Error::Other(format!("invalid date format: {}", date))),
    };

    NaiveDate::parse_from_str(date, format)
        .map_err(|e| Error::Other(format!("invalid date format: {} ({})", date, e)))
}

/// Group rows by workout date, oldest first
///
/// Rows keep their export order inside each group. Rows whose date does not
/// parse are dropped.
pub fn group_by_date(rows: &[PerformanceRow]) -> Vec<GroupedWorkout> {
    let mut groups: BTreeMap<NaiveDate, Vec<PerformanceRow>> = BTreeMap::new();
    let mut dropped = 0;

    for row in rows {
        match parse_date(&row.date) {
            Ok(date) => groups.entry(date).or_default().push(row.clone()),
            Err(e) => {
                tracing::warn!("Dropping {} from grouping: {}", row.component_name, e);
                dropped += 1;
            }
        }
    }

    tracing::debug!(
        "Grouped {} rows into {} workouts ({} dropped)",
        rows.len() - dropped,
        groups.len(),
        dropped
    );

    groups
        .into_iter()
        .map(|(date, performances)| GroupedWorkout { date, performances })
        .collect()
}
