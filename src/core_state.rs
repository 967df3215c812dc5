//! Shared application state.
//!
//! `CoreState` owns the one label session behind a `Mutex`. Every caller
//! (CLI today) goes through it, so session operations never interleave.

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use crate::colors::{JsonHistoryStore, OrderColorRegistry};
use crate::config::Settings;
use crate::session::LabelSession;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
}

pub struct CoreState {
    session: Mutex<LabelSession>,
    pub settings: Settings,
}

impl CoreState {
    /// Build state from settings, loading the order history from disk.
    pub fn new(settings: Settings) -> Self {
        let store = JsonHistoryStore::new(settings.history_path());
        let registry = OrderColorRegistry::load(Box::new(store), settings.history_capacity);
        Self::with_session(settings, LabelSession::new(registry))
    }

    pub fn with_session(settings: Settings, session: LabelSession) -> Self {
        Self {
            session: Mutex::new(session),
            settings,
        }
    }

    /// Acquire the session lock.
    pub fn lock_session(&self) -> Result<MutexGuard<'_, LabelSession>, CoreError> {
        self.session.lock().map_err(|_| CoreError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn state_in(dir: &std::path::Path) -> CoreState {
        let settings = Settings {
            history_file: Some(dir.join("order_history.json")),
            export_dir: Some(dir.join("exports")),
            ..Default::default()
        };
        CoreState::new(settings)
    }

    #[test]
    fn new_state_has_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        let session = state.lock_session().unwrap();
        assert!(session.records().is_empty());
        assert_eq!(session.colors().capacity(), 20);
    }

    #[test]
    fn history_loaded_from_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("order_history.json"),
            r#"[{"order_name": "Acme", "color": "FF0000"}]"#,
        )
        .unwrap();
        let state = state_in(dir.path());
        let session = state.lock_session().unwrap();
        assert_eq!(session.colors().get("Acme").map(|c| c.to_string()), Some("FF0000".into()));
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(state_in(dir.path()));
        let cloned = Arc::clone(&state);
        let _ = std::thread::spawn(move || {
            let _guard = cloned.lock_session().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(matches!(state.lock_session(), Err(CoreError::LockPoisoned)));
    }
}
