//! Workout history queries.
//!
//! Range filtering, best-set lookup and per-session summaries over stored
//! sessions.

use crate::{WorkoutSession, WorkoutSet};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Inclusive bounds on a session's start time; `None` means unbounded
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl HistoryRange {
    /// Whole-day bounds: from the start of `from` to the end of `to`
    pub fn from_dates(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            from: from.map(|d| d.and_time(NaiveTime::MIN).and_utc()),
            to: to
                .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
                .map(|dt| dt.and_utc()),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

/// Keep sessions inside `range`, newest first
pub fn within(sessions: Vec<WorkoutSession>, range: &HistoryRange) -> Vec<WorkoutSession> {
    let mut sessions: Vec<_> = sessions
        .into_iter()
        .filter(|s| range.contains(s.started_at))
        .collect();
    sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    sessions
}

/// Heaviest completed set for an exercise across sessions
pub fn best_completed_set(sessions: &[WorkoutSession], exercise_id: &str) -> Option<WorkoutSet> {
    sessions
        .iter()
        .flat_map(|s| s.exercises.iter())
        .filter(|e| e.exercise.id == exercise_id)
        .flat_map(|e| e.sets.iter())
        .filter(|s| s.completed)
        .fold(None, |best: Option<&WorkoutSet>, set| match best {
            Some(b) if b.weight_kg >= set.weight_kg => Some(b),
            _ => Some(set),
        })
        .cloned()
}

/// Headline numbers for one session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub exercises: usize,
    pub completed_sets: usize,
    /// Sum of weight x reps over completed sets
    pub volume_kg: f64,
    pub personal_records: usize,
}

pub fn summarize(session: &WorkoutSession) -> SessionSummary {
    let completed = session
        .exercises
        .iter()
        .flat_map(|e| e.sets.iter())
        .filter(|s| s.completed);

    let (completed_sets, volume_kg) = completed.fold((0, 0.0), |(n, v), s| {
        (n + 1, v + s.weight_kg * f64::from(s.reps))
    });

    SessionSummary {
        exercises: session.exercises.len(),
        completed_sets,
        volume_kg,
        personal_records: session.personal_records().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Exercise, ExerciseCategory, MeasurementType, SessionExercise};
    use chrono::{Duration, TimeZone};

    fn create_test_session(days_ago: i64, sets: Vec<WorkoutSet>) -> WorkoutSession {
        let mut session =
            WorkoutSession::start_empty("Test", Utc::now() - Duration::days(days_ago));
        session.exercises.push(SessionExercise {
            sets,
            ..SessionExercise::new(Exercise {
                id: "bench".into(),
                name: "Bench Press".into(),
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
    fn test_unbounded_range_keeps_everything_newest_first() {
        let old = create_test_session(5, vec![]);
        let new = create_test_session(1, vec![]);

        let result = within(vec![old.clone(), new.clone()], &HistoryRange::default());

        assert_eq!(result[0].id, new.id);
        assert_eq!(result[1].id, old.id);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let mut session = create_test_session(0, vec![]);
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap();
        session.started_at = at;

        let exact = HistoryRange {
            from: Some(at),
            to: Some(at),
        };
        assert_eq!(within(vec![session.clone()], &exact).len(), 1);

        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let whole_day = HistoryRange::from_dates(Some(day), Some(day));
        assert!(whole_day.contains(at));
        assert!(!whole_day.contains(at + Duration::seconds(1)));

        let only_to = HistoryRange::from_dates(None, NaiveDate::from_ymd_opt(2024, 3, 9));
        assert!(within(vec![session], &only_to).is_empty());
    }

    #[test]
    fn test_best_completed_set_ignores_pending() {
        let mut heavy_pending = WorkoutSet::completed(200.0, 1);
        heavy_pending.completed = false;
        let sessions = vec![
            create_test_session(2, vec![WorkoutSet::completed(80.0, 5), heavy_pending]),
            create_test_session(1, vec![WorkoutSet::completed(85.0, 3)]),
        ];

        let best = best_completed_set(&sessions, "bench").unwrap();
        assert_eq!(best.weight_kg, 85.0);
        assert!(best_completed_set(&sessions, "squat").is_none());
    }

    #[test]
    fn test_summarize() {
        let mut pr = WorkoutSet::completed(100.0, 3);
        pr.is_pr = true;
        let session = create_test_session(
            0,
            vec![WorkoutSet::completed(80.0, 5), pr, WorkoutSet::pending()],
        );

        let summary = summarize(&session);

        assert_eq!(summary.exercises, 1);
        assert_eq!(summary.completed_sets, 2);
        assert_eq!(summary.volume_kg, 700.0);
        assert_eq!(summary.personal_records, 1);
    }
}
