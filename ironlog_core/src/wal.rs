//! Append-only workout log.
//!
//! Finalized sessions are appended to a JSONL (JSON Lines) file with file
//! locking to ensure safe concurrent access. Saving a session whose id is
//! already in the log supersedes the earlier line.

use crate::finalize::RecordLookup;
use crate::history::{self, HistoryRange};
use crate::observe::Observable;
use crate::{Result, WorkoutSession, WorkoutSet};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

/// Storage for finalized workout sessions
pub trait WorkoutRepository: RecordLookup {
    /// Save a session, replacing any earlier session with the same id
    fn save_session(&mut self, session: &WorkoutSession) -> Result<()>;

    /// Sessions inside `range`, newest first
    fn history(&self, range: &HistoryRange) -> Result<Vec<WorkoutSession>>;
}

/// JSONL-based workout log with file locking
pub struct JsonlWorkoutLog {
    path: PathBuf,
    feed: Observable<Vec<WorkoutSession>>,
}

impl JsonlWorkoutLog {
    /// Open the log at the given path
    ///
    /// The file is created on the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let sessions = read_sessions(&path)?;
        Ok(Self {
            path,
            feed: Observable::new(sessions),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored session, in save order
    pub fn sessions(&self) -> Result<Vec<WorkoutSession>> {
        read_sessions(&self.path)
    }

    /// Subscribe to the stored sessions; a new list is pushed after every save
    pub fn subscribe(&self) -> Receiver<Vec<WorkoutSession>> {
        self.feed.subscribe()
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn append(&self, session: &WorkoutSession) -> Result<()> {
        self.ensure_parent_dir()?;

        // Open file for appending
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        // Write session as JSON line
        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(session)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.sync_all()?;
        file.unlock()?;

        tracing::debug!("Appended session {} to workout log", session.id);
        Ok(())
    }
}

impl RecordLookup for JsonlWorkoutLog {
    fn best_set(&self, exercise_id: &str) -> Result<Option<WorkoutSet>> {
        let sessions = read_sessions(&self.path)?;
        Ok(history::best_completed_set(&sessions, exercise_id))
    }
}

impl WorkoutRepository for JsonlWorkoutLog {
    fn save_session(&mut self, session: &WorkoutSession) -> Result<()> {
        self.append(session)?;

        // The line is on disk; a failed re-read only degrades the feed
        let sessions = match read_sessions(&self.path) {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!("Could not re-read workout log after save: {}", e);
                let mut sessions = self.feed.get();
                match sessions.iter_mut().find(|s| s.id == session.id) {
                    Some(existing) => *existing = session.clone(),
                    None => sessions.push(session.clone()),
                }
                sessions
            }
        };
        self.feed.publish(sessions);
        Ok(())
    }

    fn history(&self, range: &HistoryRange) -> Result<Vec<WorkoutSession>> {
        let sessions = read_sessions(&self.path)?;
        Ok(history::within(sessions, range))
    }
}

/// Read all sessions from a workout log file
///
/// When the same session id appears more than once the last line wins, and
/// the session keeps the position of its first save. Unparseable lines are
/// skipped with a warning.
pub fn read_sessions(path: &Path) -> Result<Vec<WorkoutSession>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut sessions: Vec<WorkoutSession> = Vec::new();
    let mut positions = HashMap::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WorkoutSession>(&line) {
            Ok(session) => match positions.get(&session.id) {
                Some(&idx) => sessions[idx] = session,
                None => {
                    positions.insert(session.id, sessions.len());
                    sessions.push(session);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to parse session at line {}: {}", line_num + 1, e);
                // Continue reading, don't fail completely
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} sessions from workout log", sessions.len());
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Exercise, ExerciseCategory, MeasurementType, SessionExercise};
    use chrono::{Duration, Utc};

    fn create_test_session(exercise_id: &str, weight_kg: f64) -> WorkoutSession {
        let mut session = WorkoutSession::start_empty("Test", Utc::now());
        session.duration_seconds = 1200;
        session.exercises.push(SessionExercise {
            sets: vec![WorkoutSet::completed(weight_kg, 5)],
            ..SessionExercise::new(Exercise {
                id: exercise_id.into(),
                name: exercise_id.into(),
                category: ExerciseCategory::Barbell,
                measurement: MeasurementType::RepsAndWeight,
                instructions: String::new(),
                image: None,
                body_parts: vec![],
            })
        });
        session
    }

    #[test]
    fn test_save_and_read_single_session() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("workouts.jsonl");

        let session = create_test_session("bench", 80.0);

        let mut log = JsonlWorkoutLog::open(&log_path).unwrap();
        log.save_session(&session).unwrap();

        let sessions = read_sessions(&log_path).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0], session);
    }

    #[test]
    fn test_save_is_upsert_by_id() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("workouts.jsonl");
        let mut log = JsonlWorkoutLog::open(&log_path).unwrap();

        let mut session = create_test_session("bench", 80.0);
        let other = create_test_session("squat", 100.0);
        log.save_session(&session).unwrap();
        log.save_session(&other).unwrap();

        session.name = "Renamed".into();
        log.save_session(&session).unwrap();

        let sessions = log.sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, session.id);
        assert_eq!(sessions[0].name, "Renamed");
        assert_eq!(sessions[1].id, other.id);
    }

    #[test]
    fn test_read_missing_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("nonexistent.jsonl");

        let sessions = read_sessions(&log_path).unwrap();
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("workouts.jsonl");
        let mut log = JsonlWorkoutLog::open(&log_path).unwrap();
        log.save_session(&create_test_session("bench", 80.0)).unwrap();

        let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
        writeln!(file, "{{ truncated").unwrap();
        drop(file);
        log.save_session(&create_test_session("bench", 85.0)).unwrap();

        assert_eq!(read_sessions(&log_path).unwrap().len(), 2);
    }

    #[test]
    fn test_best_set_across_sessions() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = JsonlWorkoutLog::open(temp_dir.path().join("workouts.jsonl")).unwrap();

        assert!(log.best_set("bench").unwrap().is_none());

        log.save_session(&create_test_session("bench", 80.0)).unwrap();
        log.save_session(&create_test_session("bench", 92.5)).unwrap();
        log.save_session(&create_test_session("squat", 140.0)).unwrap();

        let best = log.best_set("bench").unwrap().unwrap();
        assert_eq!(best.weight_kg, 92.5);
    }

    #[test]
    fn test_history_range_and_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = JsonlWorkoutLog::open(temp_dir.path().join("workouts.jsonl")).unwrap();

        let mut old = create_test_session("bench", 80.0);
        old.started_at = Utc::now() - Duration::days(10);
        let recent = create_test_session("bench", 82.5);
        log.save_session(&old).unwrap();
        log.save_session(&recent).unwrap();

        let all = log.history(&HistoryRange::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, recent.id);

        let last_week = HistoryRange {
            from: Some(Utc::now() - Duration::days(7)),
            to: None,
        };
        let filtered = log.history(&last_week).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, recent.id);
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_sessions() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("workouts.jsonl");

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let path = log_path.clone();
                std::thread::spawn(move || {
                    let mut log = JsonlWorkoutLog::open(&path).unwrap();
                    for j in 0..5 {
                        log.save_session(&create_test_session("bench", (i * 10 + j) as f64))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let sessions = read_sessions(&log_path).unwrap();
        assert_eq!(sessions.len(), 20);
        assert_eq!(
            JsonlWorkoutLog::open(&log_path)
                .unwrap()
                .best_set("bench")
                .unwrap()
                .map(|s| s.weight_kg),
            Some(34.0)
        );
    }

    #[test]
    fn test_subscribers_see_each_save() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = JsonlWorkoutLog::open(temp_dir.path().join("workouts.jsonl")).unwrap();
        let rx = log.subscribe();

        log.save_session(&create_test_session("bench", 80.0)).unwrap();
        log.save_session(&create_test_session("bench", 85.0)).unwrap();

        let counts: Vec<usize> = rx.try_iter().map(|s| s.len()).collect();
        assert_eq!(counts, vec![0, 1, 2]);
    }

    #[test]
    fn test_save_succeeds_when_log_cannot_be_reread() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("workouts.jsonl");
        let mut log = JsonlWorkoutLog::open(&log_path).unwrap();
        let rx = log.subscribe();

        // Invalid UTF-8 makes every later full read fail
        std::fs::write(&log_path, [0xff, 0xfe, b'\n']).unwrap();
        let session = create_test_session("bench", 80.0);

        log.save_session(&session).unwrap();

        assert!(read_sessions(&log_path).is_err());
        let contents = std::fs::read(&log_path).unwrap();
        assert!(contents.ends_with(b"\n"));
        assert!(contents.len() > 3);

        let published: Vec<Vec<WorkoutSession>> = rx.try_iter().collect();
        assert_eq!(published.len(), 2);
        assert_eq!(published[1], vec![session]);
    }
}
