//! Session finalization and personal record detection.
//!
//! Turns an active session into its final, persisted form:
//! 1. Duration = now - started_at
//! 2. Per exercise: session best over completed sets vs. the previous best;
//!    when the previous best is strictly exceeded, every completed set at
//!    the session best is flagged as a PR
//! 3. Exercises without sets are dropped
//! 4. A session with nothing left is rejected before anything is saved

use crate::wal::WorkoutRepository;
use crate::{Error, Result, WorkoutSession, WorkoutSet};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Source of the previous best set for an exercise
pub trait RecordLookup {
    /// Heaviest completed set ever saved for this exercise, if any
    fn best_set(&self, exercise_id: &str) -> Result<Option<WorkoutSet>>;
}

/// Precomputed records keyed by exercise id (weights in kg)
impl RecordLookup for HashMap<String, f64> {
    fn best_set(&self, exercise_id: &str) -> Result<Option<WorkoutSet>> {
        Ok(self
            .get(exercise_id)
            .map(|&weight| WorkoutSet::completed(weight, 0)))
    }
}

/// How a set's weight is compared against the session best
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PrMatch {
    /// Literal equality on the stored value
    #[default]
    Exact,
    /// Within the given number of kilograms of the session best
    Within(f64),
}

impl PrMatch {
    fn matches(self, weight_kg: f64, session_best: f64) -> bool {
        match self {
            PrMatch::Exact => weight_kg == session_best,
            PrMatch::Within(epsilon) => (session_best - weight_kg).abs() <= epsilon,
        }
    }
}

/// Knobs for [`finalize`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinalizeOptions {
    pub pr_match: PrMatch,
    /// Report 0 instead of a negative duration when the clock went backwards
    pub clamp_negative_duration: bool,
}

impl Default for FinalizeOptions {
    fn default() -> Self {
        Self {
            pr_match: PrMatch::Exact,
            clamp_negative_duration: true,
        }
    }
}

/// Produce the final, PR-annotated version of an active session
///
/// The active session is left untouched. Looks up the previous best once per
/// exercise that has completed sets; lookup failures are returned as-is.
///
/// # Errors
/// [`Error::EmptyWorkout`] when no exercise with at least one set remains.
pub fn finalize<R>(
    active: &WorkoutSession,
    now: DateTime<Utc>,
    records: &R,
    options: &FinalizeOptions,
) -> Result<WorkoutSession>
where
    R: RecordLookup + ?Sized,
{
    let mut session = active.clone();
    session.duration_seconds = elapsed_seconds(active.started_at, now, options);

    for entry in &mut session.exercises {
        let session_best = entry
            .sets
            .iter()
            .filter(|s| s.completed)
            .map(|s| s.weight_kg)
            .fold(None, |best: Option<f64>, w| Some(best.map_or(w, |b| b.max(w))));

        let Some(session_best) = session_best else {
            continue;
        };

        let previous_best = records
            .best_set(&entry.exercise.id)?
            .map(|s| s.weight_kg)
            .unwrap_or(0.0);

        tracing::debug!(
            "{}: session best {} kg, previous best {} kg",
            entry.exercise.id,
            session_best,
            previous_best
        );

        if session_best > previous_best {
            for set in entry
                .sets
                .iter_mut()
                .filter(|s| {
                    s.completed
                        && s.weight_kg > previous_best
                        && options.pr_match.matches(s.weight_kg, session_best)
                })
            {
                set.is_pr = true;
            }
            tracing::info!(
                "New personal record for {}: {} kg (was {} kg)",
                entry.exercise.name,
                session_best,
                previous_best
            );
        }
    }

    session.exercises.retain(|e| !e.sets.is_empty());

    if session.exercises.is_empty() {
        tracing::warn!("Refusing to finalize empty session {}", active.id);
        return Err(Error::EmptyWorkout);
    }

    tracing::info!(
        "Finalized session {} ({} exercises, {} s)",
        session.id,
        session.exercises.len(),
        session.duration_seconds
    );
    Ok(session)
}

/// Finalize an active session and save it with a single write
///
/// Nothing is written when finalization fails.
pub fn finish_workout<R>(
    active: &WorkoutSession,
    now: DateTime<Utc>,
    repo: &mut R,
    options: &FinalizeOptions,
) -> Result<WorkoutSession>
where
    R: WorkoutRepository + ?Sized,
{
    let session = finalize(active, now, &*repo, options)?;
    repo.save_session(&session)?;
    Ok(session)
}

fn elapsed_seconds(started_at: DateTime<Utc>, now: DateTime<Utc>, options: &FinalizeOptions) -> i64 {
    let elapsed = (now - started_at).num_seconds();
    if elapsed < 0 && options.clamp_negative_duration {
        tracing::warn!(
            "Session start {} is after now {}; recording zero duration",
            started_at,
            now
        );
        return 0;
    }
    elapsed
}
