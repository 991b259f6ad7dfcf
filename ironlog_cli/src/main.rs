use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use ironlog_core::filter::{self, FilterSpec, SortOrder};
use ironlog_core::history::{self, HistoryRange};
use ironlog_core::rest_timer::RestState;
use ironlog_core::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ironlog")]
#[command(about = "Workout logger with personal record tracking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a workout, empty or from a template
    Start {
        /// Template id (see `templates`)
        #[arg(long)]
        template: Option<String>,

        /// Workout name (defaults to the template name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Add an exercise to the active workout
    Add {
        exercise_id: String,
    },

    /// Log a set in the active workout
    Set {
        exercise_id: String,

        /// Weight in your preferred unit
        #[arg(long, default_value_t = 0.0)]
        weight: f64,

        #[arg(long)]
        reps: u32,

        /// Rate of perceived exertion
        #[arg(long)]
        rpe: Option<f32>,

        /// Reps in reserve
        #[arg(long)]
        rir: Option<u8>,

        /// Record the set as planned rather than performed
        #[arg(long)]
        pending: bool,
    },

    /// Show the active workout
    Status,

    /// Finish the active workout and save it to history
    Finish,

    /// Throw away the active workout
    Discard,

    /// Browse the exercise catalog
    Exercises {
        /// Case-insensitive name search
        #[arg(long)]
        query: Option<String>,

        /// Only exercises working any of these body parts
        #[arg(long = "body-part")]
        body_parts: Vec<BodyPart>,

        /// Only exercises in these categories
        #[arg(long = "category")]
        categories: Vec<ExerciseCategory>,

        /// Sort Z to A
        #[arg(long)]
        desc: bool,
    },

    /// Manage custom exercises
    Exercise {
        #[command(subcommand)]
        action: ExerciseAction,
    },

    /// List workout templates
    Templates,

    /// Show finished workouts, newest first
    History {
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show the personal record for an exercise
    Record {
        exercise_id: String,
    },

    /// Export history to CSV, one row per set
    Export {
        path: PathBuf,

        #[arg(long)]
        from: Option<NaiveDate>,

        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show or update your profile
    Profile {
        #[arg(long)]
        name: Option<String>,

        /// kg or lb
        #[arg(long)]
        unit: Option<WeightUnit>,

        #[arg(long)]
        rest_seconds: Option<u32>,

        /// Body weight in your preferred unit
        #[arg(long)]
        body_weight: Option<f64>,
    },

    /// Count down a rest interval
    Rest {
        /// Defaults to the profile's rest time
        #[arg(long)]
        seconds: Option<u32>,
    },
}

#[derive(Subcommand)]
enum ExerciseAction {
    /// Create or replace an exercise
    Add {
        #[arg(long)]
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "other")]
        category: ExerciseCategory,

        #[arg(long, default_value = "reps_and_weight")]
        measurement: MeasurementType,

        #[arg(long = "body-part")]
        body_parts: Vec<BodyPart>,

        #[arg(long, default_value = "")]
        instructions: String,
    },

    /// Delete an exercise from the catalog
    Delete {
        id: String,
    },
}

/// Files under the data directory
struct Paths {
    exercises: PathBuf,
    workouts: PathBuf,
    active: PathBuf,
    settings: PathBuf,
}

impl Paths {
    fn new(data_dir: &Path) -> Self {
        Self {
            exercises: data_dir.join("exercises.json"),
            workouts: data_dir.join("workouts.jsonl"),
            active: data_dir.join("active_session.json"),
            settings: data_dir.join("settings.json"),
        }
    }
}

fn main() -> ExitCode {
    // Initialize logging
    ironlog_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    std::fs::create_dir_all(&data_dir)?;
    let paths = Paths::new(&data_dir);

    match cli.command {
        Commands::Start { template, name } => cmd_start(&paths, template, name),
        Commands::Add { exercise_id } => cmd_add(&paths, &exercise_id),
        Commands::Set {
            exercise_id,
            weight,
            reps,
            rpe,
            rir,
            pending,
        } => cmd_set(&paths, &exercise_id, weight, reps, rpe, rir, pending),
        Commands::Status => cmd_status(&paths),
        Commands::Finish => cmd_finish(&paths, &config),
        Commands::Discard => cmd_discard(&paths),
        Commands::Exercises {
            query,
            body_parts,
            categories,
            desc,
        } => {
            let filter = FilterSpec {
                query: query.unwrap_or_default(),
                body_parts: body_parts.into_iter().collect(),
                categories: categories.into_iter().collect(),
                sort: if desc {
                    SortOrder::NameDesc
                } else {
                    SortOrder::NameAsc
                },
            };
            cmd_exercises(&paths, &filter)
        }
        Commands::Exercise { action } => cmd_exercise(&paths, action),
        Commands::Templates => cmd_templates(),
        Commands::History { from, to } => cmd_history(&paths, HistoryRange::from_dates(from, to)),
        Commands::Record { exercise_id } => cmd_record(&paths, &exercise_id),
        Commands::Export { path, from, to } => {
            cmd_export(&paths, &path, HistoryRange::from_dates(from, to))
        }
        Commands::Profile {
            name,
            unit,
            rest_seconds,
            body_weight,
        } => cmd_profile(&paths, name, unit, rest_seconds, body_weight),
        Commands::Rest { seconds } => cmd_rest(&paths, &config, seconds),
    }
}

fn cmd_start(paths: &Paths, template_id: Option<String>, name: Option<String>) -> Result<()> {
    if let Some(existing) = active::load(&paths.active)? {
        return Err(Error::State(format!(
            "workout '{}' is already in progress; finish or discard it first",
            existing.name
        )));
    }

    let now = Utc::now();
    let mut session = match template_id {
        Some(id) => {
            let template = default_catalog()?
                .template(&id)
                .ok_or_else(|| Error::NotFound(format!("template '{}'", id)))?;
            WorkoutSession::start_from_template(template, now)
        }
        None => WorkoutSession::start_empty("Workout", now),
    };
    if let Some(name) = name {
        session.name = name;
    }

    active::save(&paths.active, &session)?;
    println!("✓ Started '{}'", session.name);
    print_session(&session, &UserSettings::load(&paths.settings)?);
    Ok(())
}

fn cmd_add(paths: &Paths, exercise_id: &str) -> Result<()> {
    let store = ExerciseStore::open(&paths.exercises)?;
    let exercise = store
        .get(exercise_id)
        .ok_or_else(|| Error::NotFound(format!("exercise '{}'", exercise_id)))?;
    let name = exercise.name.clone();

    active::update(&paths.active, |session| {
        session.add_exercise(exercise);
        Ok(())
    })?
    .ok_or_else(no_active_workout)?;

    println!("✓ Added {}", name);
    Ok(())
}

fn cmd_set(
    paths: &Paths,
    exercise_id: &str,
    weight: f64,
    reps: u32,
    rpe: Option<f32>,
    rir: Option<u8>,
    pending: bool,
) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(Error::Validation(format!(
            "weight must be a non-negative number, got {}",
            weight
        )));
    }

    let settings = UserSettings::load(&paths.settings)?;
    let weight_kg = settings.weight_unit.to_kg(weight);
    let set = WorkoutSet {
        weight_kg,
        reps,
        completed: !pending,
        rpe,
        rir,
        ..WorkoutSet::pending()
    };

    let mut session = active::load(&paths.active)?.ok_or_else(no_active_workout)?;
    if session.exercise_mut(exercise_id).is_none() {
        let store = ExerciseStore::open(&paths.exercises)?;
        let exercise = store
            .get(exercise_id)
            .ok_or_else(|| Error::NotFound(format!("exercise '{}'", exercise_id)))?;
        session.add_exercise(exercise);
    }
    session.log_set(exercise_id, set)?;
    active::save(&paths.active, &session)?;

    let label = if pending { "Planned" } else { "Logged" };
    println!(
        "✓ {} {}: {} x {}",
        label,
        exercise_id,
        settings.format_weight(weight_kg),
        reps
    );
    Ok(())
}

fn cmd_status(paths: &Paths) -> Result<()> {
    match active::load(&paths.active)? {
        Some(session) => {
            let elapsed = (Utc::now() - session.started_at).num_seconds();
            println!("'{}' in progress ({})", session.name, format_duration(elapsed));
            print_session(&session, &UserSettings::load(&paths.settings)?);
        }
        None => println!("No workout in progress."),
    }
    Ok(())
}

fn cmd_finish(paths: &Paths, config: &Config) -> Result<()> {
    let active_session = active::load(&paths.active)?.ok_or_else(no_active_workout)?;
    let settings = UserSettings::load(&paths.settings)?;

    let mut log = JsonlWorkoutLog::open(&paths.workouts)?;
    let session = finish_workout(
        &active_session,
        Utc::now(),
        &mut log,
        &config.finalize_options(),
    )?;
    active::discard(&paths.active)?;

    let summary = history::summarize(&session);
    println!("✓ Workout saved: {}", session.name);
    println!("  Duration: {}", format_duration(session.duration_seconds));
    println!(
        "  {} exercises, {} sets, {} volume",
        summary.exercises,
        summary.completed_sets,
        settings.format_weight(summary.volume_kg)
    );

    for record in session.personal_records() {
        println!(
            "  ★ New PR: {} {} x {}",
            record.exercise_name,
            settings.format_weight(record.weight_kg),
            record.reps
        );
    }
    Ok(())
}

fn cmd_discard(paths: &Paths) -> Result<()> {
    if active::discard(&paths.active)? {
        println!("✓ Workout discarded");
    } else {
        println!("No workout in progress.");
    }
    Ok(())
}

fn cmd_exercises(paths: &Paths, filter: &FilterSpec) -> Result<()> {
    let store = ExerciseStore::open(&paths.exercises)?;
    let exercises = filter::apply(&store.all(), filter);

    if exercises.is_empty() {
        println!("No exercises match.");
        return Ok(());
    }

    for exercise in exercises {
        println!(
            "  {:<28} {:<12} {}",
            exercise.name, exercise.category, exercise.id
        );
    }
    Ok(())
}

fn cmd_exercise(paths: &Paths, action: ExerciseAction) -> Result<()> {
    let mut store = ExerciseStore::open(&paths.exercises)?;

    match action {
        ExerciseAction::Add {
            id,
            name,
            category,
            measurement,
            body_parts,
            instructions,
        } => {
            store.save(Exercise {
                id: id.clone(),
                name,
                category,
                measurement,
                instructions,
                image: None,
                body_parts,
            })?;
            println!("✓ Saved exercise {}", id);
        }
        ExerciseAction::Delete { id } => {
            if store.delete(&id)? {
                println!("✓ Deleted exercise {}", id);
            } else {
                return Err(Error::NotFound(format!("exercise '{}'", id)));
            }
        }
    }
    Ok(())
}

fn cmd_templates() -> Result<()> {
    for template in &default_catalog()?.templates {
        println!("{} ({})", template.name, template.id);
        for entry in &template.exercises {
            println!("  {} x {}", entry.target_sets, entry.exercise.name);
        }
    }
    Ok(())
}

fn cmd_history(paths: &Paths, range: HistoryRange) -> Result<()> {
    let settings = UserSettings::load(&paths.settings)?;
    let log = JsonlWorkoutLog::open(&paths.workouts)?;
    let sessions = log.history(&range)?;

    if sessions.is_empty() {
        println!("No workouts found.");
        return Ok(());
    }

    for session in &sessions {
        let summary = history::summarize(session);
        println!(
            "{}  {:<20} {:>8}  {} sets  {}{}",
            session.started_at.format("%Y-%m-%d"),
            session.name,
            format_duration(session.duration_seconds),
            summary.completed_sets,
            settings.format_weight(summary.volume_kg),
            if summary.personal_records > 0 {
                format!("  ★ {} PR", summary.personal_records)
            } else {
                String::new()
            }
        );
    }
    Ok(())
}

fn cmd_record(paths: &Paths, exercise_id: &str) -> Result<()> {
    let settings = UserSettings::load(&paths.settings)?;
    let log = JsonlWorkoutLog::open(&paths.workouts)?;

    match log.best_set(exercise_id)? {
        Some(best) => println!(
            "Best {}: {} x {}",
            exercise_id,
            settings.format_weight(best.weight_kg),
            best.reps
        ),
        None => println!("No completed sets for {} yet.", exercise_id),
    }
    Ok(())
}

fn cmd_export(paths: &Paths, out: &Path, range: HistoryRange) -> Result<()> {
    let log = JsonlWorkoutLog::open(&paths.workouts)?;
    let mut sessions = log.history(&range)?;
    // Oldest first reads naturally in a spreadsheet
    sessions.reverse();

    let rows = export::export_sets_csv(&sessions, out)?;
    println!("✓ Exported {} sets to {}", rows, out.display());
    Ok(())
}

fn cmd_profile(
    paths: &Paths,
    name: Option<String>,
    unit: Option<WeightUnit>,
    rest_seconds: Option<u32>,
    body_weight: Option<f64>,
) -> Result<()> {
    let changed = name.is_some() || unit.is_some() || rest_seconds.is_some() || body_weight.is_some();

    let settings = if changed {
        UserSettings::update(&paths.settings, |s| {
            if let Some(name) = name {
                s.display_name = Some(name).filter(|n| !n.trim().is_empty());
            }
            if let Some(unit) = unit {
                s.weight_unit = unit;
            }
            if let Some(seconds) = rest_seconds {
                s.rest_seconds = seconds;
            }
            if let Some(weight) = body_weight {
                s.body_weight_kg = Some(s.weight_unit.to_kg(weight));
            }
            Ok(())
        })?
    } else {
        UserSettings::load(&paths.settings)?
    };

    println!("Name:        {}", settings.display_name.as_deref().unwrap_or("-"));
    println!("Unit:        {}", settings.weight_unit);
    println!("Rest:        {} s", settings.rest_seconds);
    println!(
        "Body weight: {}",
        settings
            .body_weight_kg
            .map(|kg| settings.format_weight(kg))
            .unwrap_or_else(|| "-".into())
    );
    Ok(())
}

fn cmd_rest(paths: &Paths, config: &Config, seconds: Option<u32>) -> Result<()> {
    let seconds = match seconds {
        Some(s) => s,
        None if paths.settings.exists() => UserSettings::load(&paths.settings)?.rest_seconds,
        None => config.rest.default_seconds,
    };

    let timer = RestTimer::start(
        Duration::from_secs(u64::from(seconds)),
        Duration::from_secs(1),
    );

    for progress in timer.subscribe() {
        match progress.state {
            RestState::Running => {
                let left = progress.remaining.as_secs_f64().ceil() as i64;
                println!("  {} left", format_duration(left));
            }
            RestState::Finished | RestState::Cancelled => break,
        }
    }

    timer.wait();
    println!("✓ Rest complete");
    Ok(())
}

/// Built-in catalog, refusing to use it if it is inconsistent
fn default_catalog() -> Result<&'static Catalog> {
    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }
    Ok(catalog)
}

fn no_active_workout() -> Error {
    Error::State("no workout in progress; run `ironlog start` first".into())
}

fn print_session(session: &WorkoutSession, settings: &UserSettings) {
    for entry in &session.exercises {
        println!("  {}", entry.exercise.name);
        for (idx, set) in entry.sets.iter().enumerate() {
            let mark = if set.completed { "✓" } else { "·" };
            println!(
                "    {} {}. {} x {}",
                mark,
                idx + 1,
                settings.format_weight(set.weight_kg),
                set.reps
            );
        }
    }
}

fn format_duration(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{}{}:{:02}:{:02}", sign, h, m, s)
    } else {
        format!("{}{}:{:02}", sign, m, s)
    }
}
