#![forbid(unsafe_code)]

//! Core domain model and business logic for the Ironlog workout tracker.
//!
//! This crate provides:
//! - Domain types (exercises, sets, sessions, templates)
//! - Catalog seeding and exercise management
//! - Exercise filter/sort engine
//! - Session finalization with personal record detection
//! - Persistence (workout log, active session, settings)
//! - Reactive feeds and the rest timer

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod observe;
pub mod filter;
pub mod finalize;
pub mod wal;
pub mod history;
pub mod exercises;
pub mod active;
pub mod settings;
pub mod export;
pub mod rest_timer;
pub mod state;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, Catalog};
pub use config::Config;
pub use observe::Observable;
pub use filter::{ExerciseBrowser, FilterSpec, SortOrder};
pub use finalize::{finalize, finish_workout, FinalizeOptions, PrMatch, RecordLookup};
pub use wal::{JsonlWorkoutLog, WorkoutRepository};
pub use history::HistoryRange;
pub use exercises::ExerciseStore;
pub use settings::{UserSettings, WeightUnit};
pub use rest_timer::{RestProgress, RestState, RestTimer};
