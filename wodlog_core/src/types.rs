//! Core domain types for wodlog.
//!
//! This module defines the fundamental types used throughout the system:
//! - Raw export rows and their tags (component type, result type)
//! - Normalized performance results
//! - Catalog entities (movements, WODs) and logged sessions
//! - Import preview and result summaries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Export Tags
// ============================================================================

/// Component type column of an export row
///
/// Anything other than `Metcon` is logged against a movement.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    Weightlifting,
    Gymnastics,
    Metcon,
    Other(String),
}

impl ComponentType {
    /// Label as it appears in the export
    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::Weightlifting => "Weightlifting",
            ComponentType::Gymnastics => "Gymnastics",
            ComponentType::Metcon => "Metcon",
            ComponentType::Other(s) => s,
        }
    }

    /// True when rows of this type attach to a WOD rather than a movement
    pub fn is_wod(&self) -> bool {
        matches!(self, ComponentType::Metcon)
    }
}

impl From<&str> for ComponentType {
    fn from(s: &str) -> Self {
        match s {
            "Weightlifting" => ComponentType::Weightlifting,
            "Gymnastics" => ComponentType::Gymnastics,
            "Metcon" => ComponentType::Metcon,
            other => ComponentType::Other(other.to_string()),
        }
    }
}

impl From<String> for ComponentType {
    fn from(s: String) -> Self {
        ComponentType::from(s.as_str())
    }
}

impl From<ComponentType> for String {
    fn from(t: ComponentType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Performance result type column of an export row
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ResultType {
    Weight,
    Time,
    AmrapRoundsAndReps,
    AmrapReps,
    AmrapRounds,
    MaxReps,
    Calories,
    Distance,
    EachRound,
    Other(String),
}

impl ResultType {
    /// Label as it appears in the export
    pub fn as_str(&self) -> &str {
        match self {
            ResultType::Weight => "Weight",
            ResultType::Time => "Time",
            ResultType::AmrapRoundsAndReps => "AMRAP - Rounds and Reps",
            ResultType::AmrapReps => "AMRAP - Reps",
            ResultType::AmrapRounds => "AMRAP - Rounds",
            ResultType::MaxReps => "Max reps",
            ResultType::Calories => "Calories",
            ResultType::Distance => "Distance",
            ResultType::EachRound => "Each Round",
            ResultType::Other(s) => s,
        }
    }
}

impl From<&str> for ResultType {
    fn from(s: &str) -> Self {
        match s {
            "Weight" => ResultType::Weight,
            "Time" => ResultType::Time,
            "AMRAP - Rounds and Reps" => ResultType::AmrapRoundsAndReps,
            "AMRAP - Reps" => ResultType::AmrapReps,
            "AMRAP - Rounds" => ResultType::AmrapRounds,
            "Max reps" => ResultType::MaxReps,
            "Calories" => ResultType::Calories,
            "Distance" => ResultType::Distance,
            "Each Round" => ResultType::EachRound,
            other => ResultType::Other(other.to_string()),
        }
    }
}

impl From<String> for ResultType {
    fn from(s: String) -> Self {
        ResultType::from(s.as_str())
    }
}

impl From<ResultType> for String {
    fn from(t: ResultType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Export Rows
// ============================================================================

/// One data line of a performance export
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PerformanceRow {
    pub customer_name: String,
    pub location_name: String,
    /// Raw `MM/DD/YYYY` (or `MM/DD/YY`) date string
    pub date: String,
    pub program_name: String,
    pub class_name: String,
    pub component_type: ComponentType,
    pub component_id: String,
    pub component_name: String,
    pub component_description: String,
    pub result_type: ResultType,
    pub rep_scheme: String,
    pub formatted_result: String,
    pub from_weightlifting_total: bool,
    pub from_variable_set: bool,
    pub is_rx: bool,
    pub is_rx_plus: bool,
    pub is_personal_record: bool,
    pub personal_record_description: String,
    pub comment: String,
}

/// A row-level problem found while reading an export
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowError {
    /// 1-based data line number; 0 is the header
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub message: String,
}

impl RowError {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            field: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.message)
    }
}

/// Normalized measures extracted from one free-text result
///
/// Every numeric field is optional: each result grammar fills only what it
/// recognizes.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ParsedPerformanceResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    pub notes: String,
    pub is_pr: bool,
}

impl ParsedPerformanceResult {
    /// True when no numeric measure was recognized
    pub fn has_no_measures(&self) -> bool {
        self.sets.is_none()
            && self.reps.is_none()
            && self.weight.is_none()
            && self.time_seconds.is_none()
            && self.rounds.is_none()
            && self.calories.is_none()
            && self.distance.is_none()
    }
}

/// Rows sharing one calendar date, in original export order
#[derive(Clone, Debug, PartialEq)]
pub struct GroupedWorkout {
    pub date: NaiveDate,
    pub performances: Vec<PerformanceRow>,
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Kind of movement stored in the catalog
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Weightlifting,
    Gymnastics,
    Cardio,
    Bodyweight,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Weightlifting => "weightlifting",
            MovementType::Gymnastics => "gymnastics",
            MovementType::Cardio => "cardio",
            MovementType::Bodyweight => "bodyweight",
        }
    }
}

/// Scoring convention of a WOD
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ScoreType {
    #[serde(rename = "Time (HH:MM:SS)")]
    Time,
    #[serde(rename = "Rounds+Reps")]
    RoundsReps,
    #[serde(rename = "Max Weight")]
    MaxWeight,
}

impl ScoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreType::Time => "Time (HH:MM:SS)",
            ScoreType::RoundsReps => "Rounds+Reps",
            ScoreType::MaxWeight => "Max Weight",
        }
    }
}

impl fmt::Display for ScoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical exercise (e.g., "Back Squat")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    pub id: i64,
    pub name: String,
    pub movement_type: MovementType,
    pub description: String,
    pub is_standard: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a movement
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovement {
    pub name: String,
    pub movement_type: MovementType,
    pub description: String,
    pub is_standard: bool,
    pub created_by: Option<i64>,
}

/// A named benchmark workout (e.g., "Fran")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Wod {
    pub id: i64,
    pub name: String,
    pub source: String,
    pub wod_type: String,
    pub regime: String,
    pub score_type: ScoreType,
    pub description: String,
    pub is_standard: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a WOD
#[derive(Clone, Debug, PartialEq)]
pub struct NewWod {
    pub name: String,
    pub source: String,
    pub wod_type: String,
    pub regime: String,
    pub score_type: ScoreType,
    pub description: String,
    pub is_standard: bool,
    pub created_by: Option<i64>,
}

// ============================================================================
// Session Types
// ============================================================================

/// Session-level workout classification
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    Metcon,
    Strength,
    Gymnastics,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Metcon => "metcon",
            WorkoutType::Strength => "strength",
            WorkoutType::Gymnastics => "gymnastics",
        }
    }
}

/// One user's logged workout on a given date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub workout_date: NaiveDate,
    pub workout_name: String,
    pub workout_type: WorkoutType,
    /// Batch that created this session, when it came from an import
    pub import_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a session
#[derive(Clone, Debug, PartialEq)]
pub struct NewSession {
    pub user_id: i64,
    pub workout_date: NaiveDate,
    pub workout_name: String,
    pub workout_type: WorkoutType,
    pub import_id: Option<Uuid>,
}

/// Outcome of one movement within a session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MovementPerformance {
    pub session_id: i64,
    pub movement_id: i64,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub time_seconds: Option<u32>,
    pub distance: Option<f64>,
    pub notes: String,
    pub is_pr: bool,
    pub order_index: usize,
}

/// Outcome of one WOD within a session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WodPerformance {
    pub session_id: i64,
    pub wod_id: i64,
    pub score_type: ScoreType,
    pub score_value: Option<String>,
    pub time_seconds: Option<u32>,
    pub rounds: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub notes: String,
    pub is_pr: bool,
    pub order_index: usize,
}

// ============================================================================
// Import Summaries
// ============================================================================

/// Per-date line of an import preview
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSummary {
    pub date: NaiveDate,
    pub movement_count: usize,
    pub wod_count: usize,
    pub has_prs: bool,
    /// Distinct component types seen on this date, sorted
    pub component_types: Vec<ComponentType>,
}

/// Read-only analysis of an export, produced before anything is written
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ImportPreview {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub unique_workout_dates: usize,
    pub movements_to_create: usize,
    pub wods_to_create: usize,
    pub sessions_to_create: usize,
    pub performances_to_create: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RowError>,
    pub workout_summary: Vec<WorkoutSummary>,
    pub new_movements: Vec<String>,
    pub new_wods: Vec<String>,
}

/// Tally of what a confirm run wrote
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ImportResult {
    pub import_id: Option<Uuid>,
    pub sessions_created: usize,
    pub movements_created: usize,
    pub wods_created: usize,
    pub performances_created: usize,
    pub prs_flagged: usize,
}
