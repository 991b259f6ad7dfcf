//! CSV export of workout history.
//!
//! Writes one row per set so the history can be opened in a spreadsheet.

use crate::{Result, WorkoutSession};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    session_id: String,
    session_name: &'a str,
    started_at: String,
    duration_seconds: i64,
    exercise_id: &'a str,
    exercise_name: &'a str,
    set_number: usize,
    weight_kg: f64,
    reps: u32,
    completed: bool,
    rpe: Option<f32>,
    rir: Option<u8>,
    is_pr: bool,
}

/// Export sessions to a CSV file, one row per set
///
/// The file is replaced, synced to disk, and the number of rows written is
/// returned. Sessions are written in the order given.
pub fn export_sets_csv(sessions: &[WorkoutSession], path: &Path) -> Result<usize> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);

    let mut rows = 0;
    for session in sessions {
        let session_id = session.id.to_string();
        let started_at = session.started_at.to_rfc3339();
        for entry in &session.exercises {
            for (idx, set) in entry.sets.iter().enumerate() {
                writer.serialize(CsvRow {
                    session_id: session_id.clone(),
                    session_name: &session.name,
                    started_at: started_at.clone(),
                    duration_seconds: session.duration_seconds,
                    exercise_id: &entry.exercise.id,
                    exercise_name: &entry.exercise.name,
                    set_number: idx + 1,
                    weight_kg: set.weight_kg,
                    reps: set.reps,
                    completed: set.completed,
                    rpe: set.rpe,
                    rir: set.rir,
                    is_pr: set.is_pr,
                })?;
                rows += 1;
            }
        }
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} sets to {:?}", rows, path);
    Ok(rows)
}
