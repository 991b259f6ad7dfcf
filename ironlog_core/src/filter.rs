//! Exercise filter/sort engine.
//!
//! Produces the browsable projection of the exercise catalog:
//! 1. Case-insensitive name substring match
//! 2. Body part match (any tag in the required set)
//! 3. Category membership
//! 4. Stable sort by name, ascending or descending
//!
//! Each stage is a no-op when its criterion is empty.

use crate::observe::Observable;
use crate::{BodyPart, Exercise, ExerciseCategory};
use std::collections::HashSet;
use std::sync::mpsc::Receiver;

/// Name ordering for the projection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
}

/// What the user is currently browsing for
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSpec {
    pub query: String,
    pub body_parts: HashSet<BodyPart>,
    pub categories: HashSet<ExerciseCategory>,
    pub sort: SortOrder,
}

impl FilterSpec {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// Apply a filter to a catalog
///
/// Pure and deterministic. Names are compared case-insensitively; exercises
/// with equal names keep their input order.
pub fn apply(catalog: &[Exercise], filter: &FilterSpec) -> Vec<Exercise> {
    let query = filter.query.trim().to_lowercase();

    let mut keyed: Vec<(String, &Exercise)> = catalog
        .iter()
        .map(|e| (e.name.to_lowercase(), e))
        .filter(|(name, _)| query.is_empty() || name.contains(&query))
        .filter(|(_, e)| {
            filter.body_parts.is_empty()
                || e.body_parts.iter().any(|p| filter.body_parts.contains(p))
        })
        .filter(|(_, e)| filter.categories.is_empty() || filter.categories.contains(&e.category))
        .collect();

    // slice::sort_by is stable, so ties keep catalog order in both directions
    match filter.sort {
        SortOrder::NameAsc => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortOrder::NameDesc => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }

    keyed.into_iter().map(|(_, e)| e.clone()).collect()
}

/// Keeps a filtered projection of the catalog up to date
///
/// Every change to the catalog or the filter re-runs [`apply`] and publishes
/// the result.
pub struct ExerciseBrowser {
    catalog: Vec<Exercise>,
    filter: FilterSpec,
    results: Observable<Vec<Exercise>>,
}

impl ExerciseBrowser {
    pub fn new(catalog: Vec<Exercise>, filter: FilterSpec) -> Self {
        let results = Observable::new(apply(&catalog, &filter));
        Self {
            catalog,
            filter,
            results,
        }
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Current projection
    pub fn results(&self) -> Vec<Exercise> {
        self.results.get()
    }

    /// Subscribe to projection updates
    pub fn subscribe(&self) -> Receiver<Vec<Exercise>> {
        self.results.subscribe()
    }

    pub fn set_catalog(&mut self, catalog: Vec<Exercise>) {
        self.catalog = catalog;
        self.recompute();
    }

    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
        self.recompute();
    }

    /// Edit the filter in place, e.g. to toggle one body part
    pub fn update_filter<F>(&mut self, f: F)
    where
        F: FnOnce(&mut FilterSpec),
    {
        f(&mut self.filter);
        self.recompute();
    }

    /// Apply any catalog emissions waiting on `updates`
    ///
    /// Only the newest pending catalog is used. Returns whether anything
    /// was applied.
    pub fn sync_catalog(&mut self, updates: &Receiver<Vec<Exercise>>) -> bool {
        match updates.try_iter().last() {
            Some(catalog) => {
                self.set_catalog(catalog);
                true
            }
            None => false,
        }
    }

    fn recompute(&self) {
        let projected = apply(&self.catalog, &self.filter);
        tracing::debug!(
            "Filtered catalog: {} of {} exercises",
            projected.len(),
            self.catalog.len()
        );
        self.results.publish(projected);
    }
}
