//! Reconciliation of export names against the movement/WOD catalog.
//!
//! Preview and confirm both resolve names through [`find_movement`] and
//! [`find_wod`], so a name the preview reports as new is exactly a name the
//! confirm step will create.

use crate::types::{Movement, NewMovement, NewWod, PerformanceRow, Wod};
use crate::Result;
use std::collections::BTreeMap;

/// Default bound on catalog name searches
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Catalog of movements and WODs
///
/// Searches are fuzzy (substring); callers decide what counts as a match.
pub trait Catalog {
    fn search_movements(&self, query: &str, limit: usize) -> Result<Vec<Movement>>;
    fn create_movement(&mut self, movement: NewMovement) -> Result<Movement>;
    fn search_wods(&self, query: &str, limit: usize) -> Result<Vec<Wod>>;
    fn create_wod(&mut self, wod: NewWod) -> Result<Wod>;

    /// Return the movement named like `movement.name`, creating it if absent.
    ///
    /// The boolean is true when the movement was created. The default is a
    /// search followed by a create, which races with concurrent writers;
    /// stores shared between processes should override it with an atomic
    /// version or be locked for the whole import.
    fn find_or_create_movement(
        &mut self,
        movement: NewMovement,
        limit: usize,
    ) -> Result<(Movement, bool)> {
        if let Some(existing) = find_movement(&*self, &movement.name, limit)? {
            return Ok((existing, false));
        }
        let created = self.create_movement(movement)?;
        Ok((created, true))
    }

    /// Return the WOD named like `wod.name`, creating it if absent.
    ///
    /// Same atomicity caveat as [`Catalog::find_or_create_movement`].
    fn find_or_create_wod(&mut self, wod: NewWod, limit: usize) -> Result<(Wod, bool)> {
        if let Some(existing) = find_wod(&*self, &wod.name, limit)? {
            return Ok((existing, false));
        }
        let created = self.create_wod(wod)?;
        Ok((created, true))
    }
}

/// Find a movement whose name equals `name`, ignoring case
pub fn find_movement<C: Catalog + ?Sized>(
    catalog: &C,
    name: &str,
    limit: usize,
) -> Result<Option<Movement>> {
    Ok(catalog
        .search_movements(name, limit)?
        .into_iter()
        .find(|m| names_match(&m.name, name)))
}

/// Find a WOD whose name equals `name`, ignoring case
pub fn find_wod<C: Catalog + ?Sized>(catalog: &C, name: &str, limit: usize) -> Result<Option<Wod>> {
    Ok(catalog
        .search_wods(name, limit)?
        .into_iter()
        .find(|w| names_match(&w.name, name)))
}

fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Names an import would add to the catalog
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewEntities {
    /// Sorted, deduplicated
    pub movements: Vec<String>,
    /// Sorted, deduplicated
    pub wods: Vec<String>,
}

/// Work out which movement and WOD names are not yet in the catalog
///
/// `Metcon` rows are WOD candidates, everything else is a movement candidate.
/// Names differing only in case are one candidate, reported with the first
/// spelling seen.
pub fn analyze_new_entities<C: Catalog + ?Sized>(
    catalog: &C,
    rows: &[PerformanceRow],
    limit: usize,
) -> Result<NewEntities> {
    let mut movement_names: BTreeMap<String, &str> = BTreeMap::new();
    let mut wod_names: BTreeMap<String, &str> = BTreeMap::new();

    for row in rows {
        let names = if row.component_type.is_wod() {
            &mut wod_names
        } else {
            &mut movement_names
        };
        names
            .entry(row.component_name.to_lowercase())
            .or_insert(row.component_name.as_str());
    }

    let mut new = NewEntities::default();

    for name in movement_names.into_values() {
        if find_movement(catalog, name, limit)?.is_none() {
            new.movements.push(name.to_string());
        }
    }

    for name in wod_names.into_values() {
        if find_wod(catalog, name, limit)?.is_none() {
            new.wods.push(name.to_string());
        }
    }

    new.movements.sort();
    new.wods.sort();

    tracing::debug!(
        "Reconciled catalog: {} new movements, {} new WODs",
        new.movements.len(),
        new.wods.len()
    );

    Ok(new)
}
