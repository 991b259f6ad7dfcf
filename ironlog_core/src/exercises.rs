//! File-backed exercise catalog.
//!
//! The catalog is stored as a JSON array of exercises, seeded from the
//! default catalog on first use.

use crate::catalog::get_default_catalog;
use crate::observe::Observable;
use crate::state::{load_json, save_json, with_exclusive_lock};
use crate::{Error, Exercise, Result};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

/// Exercise catalog persisted at a path
pub struct ExerciseStore {
    path: PathBuf,
    feed: Observable<Vec<Exercise>>,
}

impl ExerciseStore {
    /// Open the store, seeding it with the default catalog if the file does
    /// not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let exercises = match load_json::<Vec<Exercise>>(&path)? {
            Some(exercises) => exercises,
            None => {
                let seeded = get_default_catalog().exercises.clone();
                save_json(&path, &seeded)?;
                tracing::info!("Seeded exercise catalog with {} exercises", seeded.len());
                seeded
            }
        };

        Ok(Self {
            path,
            feed: Observable::new(exercises),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All exercises in catalog order
    pub fn all(&self) -> Vec<Exercise> {
        self.feed.get()
    }

    pub fn get(&self, id: &str) -> Option<Exercise> {
        self.feed.get().into_iter().find(|e| e.id == id)
    }

    /// Subscribe to the catalog; the full list is pushed after every change
    pub fn subscribe(&self) -> Receiver<Vec<Exercise>> {
        self.feed.subscribe()
    }

    /// Create or replace an exercise by id
    ///
    /// # Errors
    /// [`Error::Validation`] when the id or name is blank.
    pub fn save(&mut self, exercise: Exercise) -> Result<()> {
        if exercise.id.trim().is_empty() {
            return Err(Error::Validation("exercise id must not be blank".into()));
        }
        if exercise.name.trim().is_empty() {
            return Err(Error::Validation(format!(
                "exercise '{}' must have a name",
                exercise.id
            )));
        }

        let exercises = with_exclusive_lock(&self.path, || {
            let mut exercises = self.current()?;
            match exercises.iter_mut().find(|e| e.id == exercise.id) {
                Some(existing) => *existing = exercise,
                None => exercises.push(exercise),
            }
            self.write(&exercises)?;
            Ok(exercises)
        })?;

        self.feed.publish(exercises);
        Ok(())
    }

    /// Delete an exercise by id; returns whether one was removed
    ///
    /// Sessions already logged keep their own copy of the exercise.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let removed = with_exclusive_lock(&self.path, || {
            let mut exercises = self.current()?;
            let before = exercises.len();
            exercises.retain(|e| e.id != id);
            if exercises.len() == before {
                return Ok(None);
            }
            self.write(&exercises)?;
            Ok(Some(exercises))
        })?;

        match removed {
            Some(exercises) => {
                self.feed.publish(exercises);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Catalog as currently on disk, so edits from other handles survive
    fn current(&self) -> Result<Vec<Exercise>> {
        Ok(load_json::<Vec<Exercise>>(&self.path)?.unwrap_or_else(|| self.feed.get()))
    }

    fn write(&self, exercises: &[Exercise]) -> Result<()> {
        save_json(&self.path, exercises)?;
        tracing::debug!("Saved {} exercises to {:?}", exercises.len(), self.path);
        Ok(())
    }
}
