//! Persistence for the in-progress workout.
//!
//! At most one session is active at a time. It lives in its own file until
//! it is finalized into the workout log or discarded.

use crate::state::{load_json, save_json, with_exclusive_lock};
use crate::{Result, WorkoutSession};
use std::path::Path;

/// Load the active session, if there is one
pub fn load(path: &Path) -> Result<Option<WorkoutSession>> {
    let session = load_json::<WorkoutSession>(path)?;
    if let Some(ref s) = session {
        tracing::debug!("Loaded active session {} from {:?}", s.id, path);
    }
    Ok(session)
}

/// Save the active session, replacing whatever was there
pub fn save(path: &Path, session: &WorkoutSession) -> Result<()> {
    save_json(path, session)?;
    tracing::debug!("Saved active session {} to {:?}", session.id, path);
    Ok(())
}

/// Remove the active session; returns whether one existed
pub fn discard(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)?;
    tracing::info!("Discarded active session at {:?}", path);
    Ok(true)
}

/// Load the active session, modify it, and save it back
///
/// Returns `Ok(None)` without calling `f` when no session is active.
pub fn update<F>(path: &Path, f: F) -> Result<Option<WorkoutSession>>
where
    F: FnOnce(&mut WorkoutSession) -> Result<()>,
{
    with_exclusive_lock(path, || {
        let Some(mut session) = load(path)? else {
            return Ok(None);
        };
        f(&mut session)?;
        save(path, &session)?;
        Ok(Some(session))
    })
}
