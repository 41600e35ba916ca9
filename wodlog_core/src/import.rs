//! Two-phase import of a Wodify performance export.
//!
//! [`Importer::preview`] parses, groups and reconciles without writing.
//! [`Importer::confirm`] parses the input again from scratch and writes one
//! session per workout date plus one performance per row. Nothing is cached
//! between the two calls.

use crate::config::Config;
use crate::grouping::group_by_date;
use crate::reconcile::{analyze_new_entities, Catalog, DEFAULT_SEARCH_LIMIT};
use crate::result_parser::{
    determine_movement_type, determine_wod_score_type, format_score_value, parse_result,
};
use crate::rows::parse_rows;
use crate::store::SessionStore;
use crate::types::{
    ComponentType, GroupedWorkout, ImportPreview, ImportResult, MovementPerformance, NewMovement,
    NewSession, NewWod, PerformanceRow, WodPerformance, WorkoutSummary, WorkoutType,
};
use crate::{Error, Result};
use std::io::Read;
use uuid::Uuid;

const IMPORT_SOURCE: &str = "Wodify Import";
const IMPORT_WOD_TYPE: &str = "Self-created";
const IMPORT_WOD_REGIME: &str = "AMRAP";

/// Runs previews and confirms against a catalog
#[derive(Clone, Debug)]
pub struct Importer {
    search_limit: usize,
}

impl Default for Importer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_LIMIT)
    }
}

impl Importer {
    pub fn new(search_limit: usize) -> Self {
        Self { search_limit }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.import.search_limit)
    }

    pub fn search_limit(&self) -> usize {
        self.search_limit
    }

    /// Analyze an export without writing anything
    ///
    /// Data problems show up in `errors`; only input I/O and catalog failures
    /// are returned as `Err`.
    pub fn preview<C, R>(&self, catalog: &C, input: R, user_id: i64) -> Result<ImportPreview>
    where
        C: Catalog + ?Sized,
        R: Read,
    {
        let parsed = parse_rows(input)?;
        let grouped = group_by_date(&parsed.rows);

        let grouped_rows: Vec<PerformanceRow> = grouped
            .iter()
            .flat_map(|g| g.performances.iter().cloned())
            .collect();
        let new = analyze_new_entities(catalog, &grouped_rows, self.search_limit)?;

        let preview = ImportPreview {
            total_rows: parsed.rows.len() + parsed.errors.len(),
            valid_rows: parsed.rows.len(),
            invalid_rows: parsed.errors.len(),
            unique_workout_dates: grouped.len(),
            movements_to_create: new.movements.len(),
            wods_to_create: new.wods.len(),
            sessions_to_create: grouped.len(),
            performances_to_create: grouped_rows.len(),
            errors: parsed.errors,
            workout_summary: summarize_workouts(&grouped),
            new_movements: new.movements,
            new_wods: new.wods,
        };

        tracing::info!(
            "Preview for user {}: {} valid rows, {} invalid, {} workouts, {} new movements, {} new WODs",
            user_id,
            preview.valid_rows,
            preview.invalid_rows,
            preview.unique_workout_dates,
            preview.movements_to_create,
            preview.wods_to_create
        );

        Ok(preview)
    }

    /// Import an export into the store
    ///
    /// Workouts are written oldest first. If any write for a workout fails,
    /// that workout's session is discarded and [`Error::ImportAborted`] is
    /// returned with the tally of what stayed committed.
    pub fn confirm<S, R>(&self, store: &mut S, input: R, user_id: i64) -> Result<ImportResult>
    where
        S: Catalog + SessionStore + ?Sized,
        R: Read,
    {
        let parsed = parse_rows(input)?;
        if !parsed.errors.is_empty() {
            tracing::warn!("Skipping {} invalid rows", parsed.errors.len());
        }
        let grouped = group_by_date(&parsed.rows);

        let import_id = Uuid::new_v4();
        let mut result = ImportResult {
            import_id: Some(import_id),
            ..ImportResult::default()
        };

        tracing::info!(
            "Starting import {} for user {}: {} workouts",
            import_id,
            user_id,
            grouped.len()
        );

        for workout in &grouped {
            let mut tally = SessionTally::default();
            let mut session_id = None;

            let outcome = self.import_workout(
                store,
                workout,
                user_id,
                import_id,
                &mut tally,
                &mut session_id,
            );

            // Catalog entries are shared state and stay even if the session goes
            result.movements_created += tally.movements_created;
            result.wods_created += tally.wods_created;

            if let Err(source) = outcome {
                let mut rolled_back = true;
                if let Some(id) = session_id {
                    tracing::warn!(
                        "Rolling back session {} for {} after failure: {}",
                        id,
                        workout.date,
                        source
                    );
                    if let Err(e) = store.discard_session(id) {
                        tracing::error!(
                            "Failed to discard session {} for {}, it may still be stored: {}",
                            id,
                            workout.date,
                            e
                        );
                        rolled_back = false;
                    }
                }
                return Err(Error::ImportAborted {
                    date: workout.date,
                    applied: result,
                    rolled_back,
                    source: Box::new(source),
                });
            }

            result.sessions_created += 1;
            result.performances_created += tally.performances_created;
            result.prs_flagged += tally.prs_flagged;
        }

        tracing::info!(
            "Import {} complete: {} sessions, {} performances, {} new movements, {} new WODs, {} PRs",
            import_id,
            result.sessions_created,
            result.performances_created,
            result.movements_created,
            result.wods_created,
            result.prs_flagged
        );

        Ok(result)
    }

    fn import_workout<S>(
        &self,
        store: &mut S,
        workout: &GroupedWorkout,
        user_id: i64,
        import_id: Uuid,
        tally: &mut SessionTally,
        session_id: &mut Option<i64>,
    ) -> Result<()>
    where
        S: Catalog + SessionStore + ?Sized,
    {
        let session = store.create_session(NewSession {
            user_id,
            workout_date: workout.date,
            workout_name: format!("Workout {}", workout.date.format("%Y-%m-%d")),
            workout_type: derive_workout_type(&workout.performances),
            import_id: Some(import_id),
        })?;
        *session_id = Some(session.id);

        tracing::debug!(
            "Created session {} ({}) for {}",
            session.id,
            session.workout_type.as_str(),
            workout.date
        );

        for (order_index, row) in workout.performances.iter().enumerate() {
            if row.component_type.is_wod() {
                self.import_wod_row(store, row, session.id, order_index, user_id, tally)?;
            } else {
                self.import_movement_row(store, row, session.id, order_index, user_id, tally)?;
            }
            tally.performances_created += 1;
            if row.is_personal_record {
                tally.prs_flagged += 1;
            }
        }

        Ok(())
    }

    fn import_wod_row<S>(
        &self,
        store: &mut S,
        row: &PerformanceRow,
        session_id: i64,
        order_index: usize,
        user_id: i64,
        tally: &mut SessionTally,
    ) -> Result<()>
    where
        S: Catalog + SessionStore + ?Sized,
    {
        let score_type = determine_wod_score_type(&row.result_type);
        let (wod, created) = store.find_or_create_wod(
            NewWod {
                name: row.component_name.clone(),
                source: IMPORT_SOURCE.into(),
                wod_type: IMPORT_WOD_TYPE.into(),
                regime: IMPORT_WOD_REGIME.into(),
                score_type,
                description: row.component_description.clone(),
                is_standard: false,
                created_by: Some(user_id),
            },
            self.search_limit,
        )?;
        if created {
            tracing::info!("Created WOD {}", wod.name);
            tally.wods_created += 1;
        }

        let parsed = parse_result(&row.result_type, &row.formatted_result, &row.comment);
        store.create_wod_performance(WodPerformance {
            session_id,
            wod_id: wod.id,
            score_type,
            score_value: format_score_value(&parsed, score_type),
            time_seconds: parsed.time_seconds,
            rounds: parsed.rounds,
            reps: parsed.reps,
            weight: parsed.weight,
            notes: parsed.notes,
            is_pr: row.is_personal_record,
            order_index,
        })
    }

    fn import_movement_row<S>(
        &self,
        store: &mut S,
        row: &PerformanceRow,
        session_id: i64,
        order_index: usize,
        user_id: i64,
        tally: &mut SessionTally,
    ) -> Result<()>
    where
        S: Catalog + SessionStore + ?Sized,
    {
        let (movement, created) = store.find_or_create_movement(
            NewMovement {
                name: row.component_name.clone(),
                movement_type: determine_movement_type(&row.component_type),
                description: row.component_description.clone(),
                is_standard: false,
                created_by: Some(user_id),
            },
            self.search_limit,
        )?;
        if created {
            tracing::info!("Created movement {}", movement.name);
            tally.movements_created += 1;
        }

        let parsed = parse_result(&row.result_type, &row.formatted_result, &row.comment);
        store.create_movement_performance(MovementPerformance {
            session_id,
            movement_id: movement.id,
            sets: parsed.sets,
            reps: parsed.reps,
            weight: parsed.weight,
            time_seconds: parsed.time_seconds,
            distance: parsed.distance,
            notes: parsed.notes,
            is_pr: row.is_personal_record,
            order_index,
        })
    }
}

#[derive(Debug, Default)]
struct SessionTally {
    movements_created: usize,
    wods_created: usize,
    performances_created: usize,
    prs_flagged: usize,
}

/// Label a session by its most common bucket
///
/// Metcon rows count as metcon, Weightlifting rows as strength and every
/// other component type as gymnastics. Ties go to metcon, then strength.
pub fn derive_workout_type(rows: &[PerformanceRow]) -> WorkoutType {
    let (mut metcon, mut strength, mut gymnastics) = (0usize, 0usize, 0usize);
    for row in rows {
        match row.component_type {
            ComponentType::Metcon => metcon += 1,
            ComponentType::Weightlifting => strength += 1,
            _ => gymnastics += 1,
        }
    }

    if metcon > 0 && metcon >= strength && metcon >= gymnastics {
        WorkoutType::Metcon
    } else if strength > 0 && strength >= gymnastics {
        WorkoutType::Strength
    } else {
        WorkoutType::Gymnastics
    }
}

/// Per-date summary of grouped workouts
pub fn summarize_workouts(grouped: &[GroupedWorkout]) -> Vec<WorkoutSummary> {
    grouped
        .iter()
        .map(|workout| {
            let wod_count = workout
                .performances
                .iter()
                .filter(|p| p.component_type.is_wod())
                .count();

            let mut component_types: Vec<ComponentType> = Vec::new();
            for row in &workout.performances {
                if !component_types.contains(&row.component_type) {
                    component_types.push(row.component_type.clone());
                }
            }
            component_types.sort_by(|a, b| a.as_str().cmp(b.as_str()));

            WorkoutSummary {
                date: workout.date,
                movement_count: workout.performances.len() - wod_count,
                wod_count,
                has_prs: workout.performances.iter().any(|p| p.is_personal_record),
                component_types,
            }
        })
        .collect()
}

/// Preview an import with the default search bound
pub fn preview_import<C, R>(catalog: &C, input: R, user_id: i64) -> Result<ImportPreview>
where
    C: Catalog + ?Sized,
    R: Read,
{
    Importer::default().preview(catalog, input, user_id)
}

/// Confirm an import with the default search bound
pub fn confirm_import<S, R>(store: &mut S, input: R, user_id: i64) -> Result<ImportResult>
where
    S: Catalog + SessionStore + ?Sized,
    R: Read,
{
    Importer::default().confirm(store, input, user_id)
}
