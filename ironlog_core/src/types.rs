//! Core domain types for the Ironlog system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their classification (category, measurement, body parts)
//! - Workout sets, session exercises and workout sessions
//! - Workout templates used to pre-populate sessions

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Exercise Types
// ============================================================================

/// Equipment category of an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Barbell,
    Dumbbell,
    Machine,
    Bodyweight,
    Cable,
    Kettlebell,
    Band,
    Other,
}

/// How a set of this exercise is measured
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    RepsOnly,
    RepsAndWeight,
}

/// Body part tag; an exercise may carry any number of these
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Core,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    FullBody,
}

/// An exercise definition (e.g., "Barbell Bench Press")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: ExerciseCategory,
    pub measurement: MeasurementType,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub body_parts: Vec<BodyPart>,
}

// ============================================================================
// Session Types
// ============================================================================

/// A single set within a session exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSet {
    pub id: Uuid,
    /// Canonical weight in kilograms
    pub weight_kg: f64,
    pub reps: u32,
    pub completed: bool,
    #[serde(default)]
    pub rpe: Option<f32>,
    #[serde(default)]
    pub rir: Option<u8>,
    #[serde(default)]
    pub is_pr: bool,
}

impl WorkoutSet {
    /// A placeholder set: zero weight, zero reps, not yet performed
    pub fn pending() -> Self {
        Self {
            id: Uuid::new_v4(),
            weight_kg: 0.0,
            reps: 0,
            completed: false,
            rpe: None,
            rir: None,
            is_pr: false,
        }
    }

    /// A set the user has performed
    pub fn completed(weight_kg: f64, reps: u32) -> Self {
        Self {
            weight_kg,
            reps,
            completed: true,
            ..Self::pending()
        }
    }
}

/// An exercise performed within a session, with its ordered sets
///
/// The exercise is a snapshot taken when it was added to the session, so
/// later catalog edits do not change history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionExercise {
    pub id: Uuid,
    pub exercise: Exercise,
    pub sets: Vec<WorkoutSet>,
}

impl SessionExercise {
    pub fn new(exercise: Exercise) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise,
            sets: Vec::new(),
        }
    }
}

/// A workout session, either active (duration 0) or finalized
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub template_id: Option<String>,
    pub name: String,
    pub started_at: DateTime<Utc>,
    /// Elapsed seconds; 0 while the session is active
    pub duration_seconds: i64,
    pub exercises: Vec<SessionExercise>,
}

/// A set flagged as a personal record in a finalized session
#[derive(Clone, Debug, PartialEq)]
pub struct PersonalRecord {
    pub exercise_id: String,
    pub exercise_name: String,
    pub weight_kg: f64,
    pub reps: u32,
}

impl WorkoutSession {
    /// Start an empty session
    pub fn start_empty(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_id: None,
            name: name.into(),
            started_at: now,
            duration_seconds: 0,
            exercises: Vec::new(),
        }
    }

    /// Start a session from a template
    ///
    /// Each template exercise is copied into the session with `target_sets`
    /// pending sets.
    pub fn start_from_template(template: &WorkoutTemplate, now: DateTime<Utc>) -> Self {
        let exercises = template
            .exercises
            .iter()
            .map(|entry| SessionExercise {
                id: Uuid::new_v4(),
                exercise: entry.exercise.clone(),
                sets: (0..entry.target_sets).map(|_| WorkoutSet::pending()).collect(),
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            template_id: Some(template.id.clone()),
            name: template.name.clone(),
            started_at: now,
            duration_seconds: 0,
            exercises,
        }
    }

    /// Add an exercise snapshot to the end of the session
    pub fn add_exercise(&mut self, exercise: Exercise) -> Uuid {
        let entry = SessionExercise::new(exercise);
        let id = entry.id;
        self.exercises.push(entry);
        id
    }

    /// Find the first session exercise for a catalog exercise id
    pub fn exercise_mut(&mut self, exercise_id: &str) -> Option<&mut SessionExercise> {
        self.exercises
            .iter_mut()
            .find(|e| e.exercise.id == exercise_id)
    }

    /// Record a set against an exercise already in the session
    ///
    /// A completed set fills the first pending set of that exercise when one
    /// exists (keeping its id); otherwise the set is appended.
    pub fn log_set(&mut self, exercise_id: &str, set: WorkoutSet) -> Result<Uuid> {
        let entry = self
            .exercise_mut(exercise_id)
            .ok_or_else(|| Error::NotFound(format!("exercise '{}' is not in this session", exercise_id)))?;

        if set.completed {
            if let Some(slot) = entry.sets.iter_mut().find(|s| !s.completed) {
                let id = slot.id;
                *slot = WorkoutSet { id, ..set };
                return Ok(id);
            }
        }

        let id = set.id;
        entry.sets.push(set);
        Ok(id)
    }

    /// Total number of sets marked completed
    pub fn completed_set_count(&self) -> usize {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| s.completed)
            .count()
    }

    /// Sets flagged as personal records, in session order
    pub fn personal_records(&self) -> Vec<PersonalRecord> {
        self.exercises
            .iter()
            .flat_map(|e| {
                e.sets.iter().filter(|s| s.is_pr).map(move |s| PersonalRecord {
                    exercise_id: e.exercise.id.clone(),
                    exercise_name: e.exercise.name.clone(),
                    weight_kg: s.weight_kg,
                    reps: s.reps,
                })
            })
            .collect()
    }
}

// ============================================================================
// Template Types
// ============================================================================

/// One exercise slot in a template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TemplateExercise {
    pub exercise: Exercise,
    pub target_sets: u32,
}

/// A reusable exercise plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutTemplate {
    pub id: String,
    pub name: String,
    pub exercises: Vec<TemplateExercise>,
}

// ============================================================================
// Parsing / display
// ============================================================================

impl FromStr for ExerciseCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "barbell" => Ok(Self::Barbell),
            "dumbbell" => Ok(Self::Dumbbell),
            "machine" => Ok(Self::Machine),
            "bodyweight" => Ok(Self::Bodyweight),
            "cable" => Ok(Self::Cable),
            "kettlebell" => Ok(Self::Kettlebell),
            "band" => Ok(Self::Band),
            "other" => Ok(Self::Other),
            other => Err(Error::Validation(format!("unknown category '{}'", other))),
        }
    }
}

impl FromStr for MeasurementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "reps_only" | "reps" => Ok(Self::RepsOnly),
            "reps_and_weight" | "weight" => Ok(Self::RepsAndWeight),
            other => Err(Error::Validation(format!("unknown measurement type '{}'", other))),
        }
    }
}

impl FromStr for BodyPart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "chest" => Ok(Self::Chest),
            "back" => Ok(Self::Back),
            "shoulders" => Ok(Self::Shoulders),
            "biceps" => Ok(Self::Biceps),
            "triceps" => Ok(Self::Triceps),
            "forearms" => Ok(Self::Forearms),
            "core" => Ok(Self::Core),
            "quads" => Ok(Self::Quads),
            "hamstrings" => Ok(Self::Hamstrings),
            "glutes" => Ok(Self::Glutes),
            "calves" => Ok(Self::Calves),
            "full_body" | "fullbody" => Ok(Self::FullBody),
            other => Err(Error::Validation(format!("unknown body part '{}'", other))),
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Barbell => "barbell",
            Self::Dumbbell => "dumbbell",
            Self::Machine => "machine",
            Self::Bodyweight => "bodyweight",
            Self::Cable => "cable",
            Self::Kettlebell => "kettlebell",
            Self::Band => "band",
            Self::Other => "other",
        };
        f.pad(s)
    }
}
