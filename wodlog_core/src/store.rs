//! Catalog and session storage.
//!
//! [`Library`] keeps movements, WODs, sessions and performances in memory
//! and persists them as one JSON document. Saves are atomic (temp file,
//! fsync, rename). Imports are serialized across processes with
//! [`LibraryLock`].

use crate::reconcile::Catalog;
use crate::types::{
    Movement, MovementPerformance, NewMovement, NewSession, NewWod, Session, Wod, WodPerformance,
};
use crate::{Error, Result};
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Storage for logged sessions and their performances
pub trait SessionStore {
    fn create_session(&mut self, session: NewSession) -> Result<Session>;
    fn create_movement_performance(&mut self, record: MovementPerformance) -> Result<()>;
    fn create_wod_performance(&mut self, record: WodPerformance) -> Result<()>;

    /// Remove a session and every performance attached to it.
    ///
    /// Used to undo a session whose import failed part way.
    fn discard_session(&mut self, session_id: i64) -> Result<()>;
}

fn default_next_id() -> i64 {
    1
}

/// In-memory catalog and session store, persisted as JSON
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub movements: Vec<Movement>,
    #[serde(default)]
    pub wods: Vec<Wod>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub movement_performances: Vec<MovementPerformance>,
    #[serde(default)]
    pub wod_performances: Vec<WodPerformance>,
    #[serde(default = "default_next_id")]
    next_id: i64,
}

impl Default for Library {
    fn default() -> Self {
        Self::with_standard_catalog()
    }
}

impl Library {
    /// A library with nothing in it
    pub fn empty() -> Self {
        Self {
            movements: Vec::new(),
            wods: Vec::new(),
            sessions: Vec::new(),
            movement_performances: Vec::new(),
            wod_performances: Vec::new(),
            next_id: default_next_id(),
        }
    }

    /// A library seeded with the standard movements and benchmark WODs
    pub fn with_standard_catalog() -> Self {
        let mut library = Self::empty();
        let standard = crate::catalog::get_standard_catalog();

        for movement in &standard.movements {
            library.insert_movement(movement.clone());
        }
        for wod in &standard.wods {
            library.insert_wod(wod.clone());
        }

        library
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert_movement(&mut self, movement: NewMovement) -> Movement {
        let movement = Movement {
            id: self.allocate_id(),
            name: movement.name,
            movement_type: movement.movement_type,
            description: movement.description,
            is_standard: movement.is_standard,
            created_by: movement.created_by,
            created_at: Utc::now(),
        };
        self.movements.push(movement.clone());
        movement
    }

    fn insert_wod(&mut self, wod: NewWod) -> Wod {
        let wod = Wod {
            id: self.allocate_id(),
            name: wod.name,
            source: wod.source,
            wod_type: wod.wod_type,
            regime: wod.regime,
            score_type: wod.score_type,
            description: wod.description,
            is_standard: wod.is_standard,
            created_by: wod.created_by,
            created_at: Utc::now(),
        };
        self.wods.push(wod.clone());
        wod
    }

    fn has_session(&self, session_id: i64) -> bool {
        self.sessions.iter().any(|s| s.id == session_id)
    }

    /// Load a library from a file with shared locking
    ///
    /// Returns a freshly seeded library if the file doesn't exist. A file
    /// that exists but cannot be parsed is an error, never silently replaced.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No library found at {:?}, starting from the standard catalog", path);
            return Ok(Self::with_standard_catalog());
        }

        let file = File::open(path)?;
        FileExt::lock_shared(&file)?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        FileExt::unlock(&file)?;
        read?;

        let library: Library = serde_json::from_str(&contents)?;
        tracing::debug!(
            "Loaded library from {:?}: {} movements, {} WODs, {} sessions",
            path,
            library.movements.len(),
            library.wods.len(),
            library.sessions.len()
        );
        Ok(library)
    }

    /// Save the library atomically
    ///
    /// Writes a temp file in the same directory, syncs it, then renames it
    /// over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Storage(format!("library path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        FileExt::lock_exclusive(temp.as_file())?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        FileExt::unlock(temp.as_file())?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved library to {:?}", path);
        Ok(())
    }

    /// Sessions for one user, oldest first
    pub fn sessions_for_user(&self, user_id: i64) -> Vec<&Session> {
        let mut sessions: Vec<&Session> =
            self.sessions.iter().filter(|s| s.user_id == user_id).collect();
        sessions.sort_by_key(|s| (s.workout_date, s.id));
        sessions
    }
}

/// Case-insensitive substring search
///
/// Exact name matches come first, then standard entries, then by name, so an
/// exact match survives truncation to `limit`.
fn search_by_name<'a, T, F>(items: &'a [T], query: &str, limit: usize, key: F) -> Vec<&'a T>
where
    F: Fn(&T) -> (&str, bool),
{
    let needle = query.trim().to_lowercase();
    let mut hits: Vec<&T> = items
        .iter()
        .filter(|item| key(item).0.to_lowercase().contains(&needle))
        .collect();

    hits.sort_by(|a, b| {
        let (a_name, a_std) = key(a);
        let (b_name, b_std) = key(b);
        let a_exact = a_name.to_lowercase() == needle;
        let b_exact = b_name.to_lowercase() == needle;
        b_exact
            .cmp(&a_exact)
            .then_with(|| b_std.cmp(&a_std))
            .then_with(|| a_name.cmp(b_name))
    });
    hits.truncate(limit);
    hits
}

impl Catalog for Library {
    fn search_movements(&self, query: &str, limit: usize) -> Result<Vec<Movement>> {
        Ok(
            search_by_name(&self.movements, query, limit, |m| (&m.name, m.is_standard))
                .into_iter()
                .cloned()
                .collect(),
        )
    }

    fn create_movement(&mut self, movement: NewMovement) -> Result<Movement> {
        if self
            .movements
            .iter()
            .any(|m| m.name.to_lowercase() == movement.name.to_lowercase())
        {
            return Err(Error::Storage(format!(
                "movement {:?} already exists",
                movement.name
            )));
        }
        let movement = self.insert_movement(movement);
        tracing::debug!("Created movement {} ({})", movement.name, movement.id);
        Ok(movement)
    }

    fn search_wods(&self, query: &str, limit: usize) -> Result<Vec<Wod>> {
        Ok(
            search_by_name(&self.wods, query, limit, |w| (&w.name, w.is_standard))
                .into_iter()
                .cloned()
                .collect(),
        )
    }

    fn create_wod(&mut self, wod: NewWod) -> Result<Wod> {
        if self
            .wods
            .iter()
            .any(|w| w.name.to_lowercase() == wod.name.to_lowercase())
        {
            return Err(Error::Storage(format!("WOD {:?} already exists", wod.name)));
        }
        let wod = self.insert_wod(wod);
        tracing::debug!("Created WOD {} ({})", wod.name, wod.id);
        Ok(wod)
    }

    // Whole-catalog scans; the search limit only bounds fuzzy lookups
    fn find_or_create_movement(
        &mut self,
        movement: NewMovement,
        _limit: usize,
    ) -> Result<(Movement, bool)> {
        let wanted = movement.name.to_lowercase();
        if let Some(existing) = self.movements.iter().find(|m| m.name.to_lowercase() == wanted) {
            return Ok((existing.clone(), false));
        }
        let created = self.insert_movement(movement);
        tracing::debug!("Created movement {} ({})", created.name, created.id);
        Ok((created, true))
    }

    fn find_or_create_wod(&mut self, wod: NewWod, _limit: usize) -> Result<(Wod, bool)> {
        let wanted = wod.name.to_lowercase();
        if let Some(existing) = self.wods.iter().find(|w| w.name.to_lowercase() == wanted) {
            return Ok((existing.clone(), false));
        }
        let created = self.insert_wod(wod);
        tracing::debug!("Created WOD {} ({})", created.name, created.id);
        Ok((created, true))
    }
}

impl SessionStore for Library {
    fn create_session(&mut self, session: NewSession) -> Result<Session> {
        let session = Session {
            id: self.allocate_id(),
            user_id: session.user_id,
            workout_date: session.workout_date,
            workout_name: session.workout_name,
            workout_type: session.workout_type,
            import_id: session.import_id,
            created_at: Utc::now(),
        };
        self.sessions.push(session.clone());
        Ok(session)
    }

    fn create_movement_performance(&mut self, record: MovementPerformance) -> Result<()> {
        if !self.has_session(record.session_id) {
            return Err(Error::Storage(format!(
                "session {} does not exist",
                record.session_id
            )));
        }
        if !self.movements.iter().any(|m| m.id == record.movement_id) {
            return Err(Error::Storage(format!(
                "movement {} does not exist",
                record.movement_id
            )));
        }
        self.movement_performances.push(record);
        Ok(())
    }

    fn create_wod_performance(&mut self, record: WodPerformance) -> Result<()> {
        if !self.has_session(record.session_id) {
            return Err(Error::Storage(format!(
                "session {} does not exist",
                record.session_id
            )));
        }
        if !self.wods.iter().any(|w| w.id == record.wod_id) {
            return Err(Error::Storage(format!("WOD {} does not exist", record.wod_id)));
        }
        self.wod_performances.push(record);
        Ok(())
    }

    fn discard_session(&mut self, session_id: i64) -> Result<()> {
        self.sessions.retain(|s| s.id != session_id);
        self.movement_performances
            .retain(|p| p.session_id != session_id);
        self.wod_performances.retain(|p| p.session_id != session_id);
        tracing::debug!("Discarded session {}", session_id);
        Ok(())
    }
}

/// Exclusive lock serializing imports into one library
///
/// Held for the lifetime of the value; released on drop.
pub struct LibraryLock {
    file: File,
    path: PathBuf,
}

impl LibraryLock {
    /// Block until the lock at `path` is acquired
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;
        FileExt::lock_exclusive(&file)?;

        tracing::debug!("Acquired library lock {:?}", path);
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for LibraryLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("Failed to release library lock {:?}: {}", self.path, e);
        }
    }
}
