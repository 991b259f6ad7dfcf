//! Default catalog of exercises and workout templates.
//!
//! This module provides the built-in exercises and templates the exercise
//! store is seeded with on first use.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// The complete catalog of exercises and workout templates
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: Vec<Exercise>,
    pub templates: Vec<WorkoutTemplate>,
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with built-in exercises and templates
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn exercise(
    id: &str,
    name: &str,
    category: ExerciseCategory,
    measurement: MeasurementType,
    body_parts: &[BodyPart],
    instructions: &str,
) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        category,
        measurement,
        instructions: instructions.into(),
        image: None,
        body_parts: body_parts.to_vec(),
    }
}

fn build_default_catalog_internal() -> Catalog {
    use BodyPart::*;
    use ExerciseCategory::*;
    use MeasurementType::*;

    // ========================================================================
    // Exercises
    // ========================================================================

    let exercises = vec![
        exercise(
            "barbell_bench_press",
            "Bench Press",
            Barbell,
            RepsAndWeight,
            &[Chest, Triceps, Shoulders],
            "Lower the bar to mid-chest, press to lockout.",
        ),
        exercise(
            "barbell_back_squat",
            "Back Squat",
            Barbell,
            RepsAndWeight,
            &[Quads, Glutes, Hamstrings],
            "Bar on upper back, squat below parallel, drive up.",
        ),
        exercise(
            "barbell_deadlift",
            "Deadlift",
            Barbell,
            RepsAndWeight,
            &[Back, Hamstrings, Glutes],
            "Hinge at the hips, keep the bar close, stand tall.",
        ),
        exercise(
            "barbell_overhead_press",
            "Overhead Press",
            Barbell,
            RepsAndWeight,
            &[Shoulders, Triceps],
            "Press from the front rack to overhead lockout.",
        ),
        exercise(
            "barbell_row",
            "Barbell Row",
            Barbell,
            RepsAndWeight,
            &[Back, Biceps],
            "Hinge forward, row the bar to the lower ribs.",
        ),
        exercise(
            "dumbbell_curl",
            "Dumbbell Curl",
            Dumbbell,
            RepsAndWeight,
            &[Biceps, Forearms],
            "Curl with palms up, control the lowering.",
        ),
        exercise(
            "dumbbell_lateral_raise",
            "Lateral Raise",
            Dumbbell,
            RepsAndWeight,
            &[Shoulders],
            "Raise the dumbbells out to shoulder height.",
        ),
        exercise(
            "cable_triceps_pushdown",
            "Triceps Pushdown",
            Cable,
            RepsAndWeight,
            &[Triceps],
            "Elbows pinned, extend fully at the bottom.",
        ),
        exercise(
            "machine_leg_press",
            "Leg Press",
            Machine,
            RepsAndWeight,
            &[Quads, Glutes],
            "Lower the sled under control, press without locking knees.",
        ),
        exercise(
            "pullup",
            "Pull-up",
            Bodyweight,
            RepsOnly,
            &[Back, Biceps],
            "From a dead hang, pull until the chin clears the bar.",
        ),
        exercise(
            "pushup",
            "Push-up",
            Bodyweight,
            RepsOnly,
            &[Chest, Triceps, Core],
            "Body in a straight line, chest to the floor.",
        ),
        exercise(
            "plank",
            "Plank",
            Bodyweight,
            RepsOnly,
            &[Core],
            "Hold a straight line from head to heels.",
        ),
        exercise(
            "kettlebell_swing",
            "Kettlebell Swing",
            Kettlebell,
            RepsAndWeight,
            &[Glutes, Hamstrings, FullBody],
            "Hinge and snap the hips to float the bell to chest height.",
        ),
        exercise(
            "standing_calf_raise",
            "Calf Raise",
            Machine,
            RepsAndWeight,
            &[Calves],
            "Full stretch at the bottom, pause at the top.",
        ),
    ];

    // ========================================================================
    // Templates
    // ========================================================================

    let slot = |id: &str, target_sets: u32| -> TemplateExercise {
        let exercise = exercises
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .unwrap_or_else(|| panic!("default template references unknown exercise '{}'", id));
        TemplateExercise {
            exercise,
            target_sets,
        }
    };

    let templates = vec![
        WorkoutTemplate {
            id: "push_day".into(),
            name: "Push Day".into(),
            exercises: vec![
                slot("barbell_bench_press", 3),
                slot("barbell_overhead_press", 3),
                slot("cable_triceps_pushdown", 3),
            ],
        },
        WorkoutTemplate {
            id: "pull_day".into(),
            name: "Pull Day".into(),
            exercises: vec![
                slot("barbell_deadlift", 1),
                slot("barbell_row", 3),
                slot("pullup", 3),
                slot("dumbbell_curl", 2),
            ],
        },
        WorkoutTemplate {
            id: "leg_day".into(),
            name: "Leg Day".into(),
            exercises: vec![
                slot("barbell_back_squat", 3),
                slot("machine_leg_press", 3),
                slot("standing_calf_raise", 3),
            ],
        },
    ];

    Catalog {
        exercises,
        templates,
    }
}

impl Catalog {
    /// Look up an exercise by id
    pub fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Look up a template by id
    pub fn template(&self, id: &str) -> Option<&WorkoutTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for exercise in &self.exercises {
            if exercise.id.trim().is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if exercise.name.trim().is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            }
            if !seen.insert(exercise.id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", exercise.id));
            }
        }

        let mut seen_templates = HashSet::new();
        for template in &self.templates {
            if template.id.trim().is_empty() {
                errors.push("Template has empty ID".to_string());
            }
            if !seen_templates.insert(template.id.as_str()) {
                errors.push(format!("Duplicate template ID '{}'", template.id));
            }
            if template.exercises.is_empty() {
                errors.push(format!("Template '{}' has no exercises", template.id));
            }

            for entry in &template.exercises {
                if self.exercise(&entry.exercise.id).is_none() {
                    errors.push(format!(
                        "Template '{}' references non-existent exercise '{}'",
                        template.id, entry.exercise.id
                    ));
                }
                if entry.target_sets == 0 {
                    errors.push(format!(
                        "Template '{}': exercise '{}' has zero target sets",
                        template.id, entry.exercise.id
                    ));
                }
            }
        }

        errors
    }
}
