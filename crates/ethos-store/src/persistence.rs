//! Best-effort persistence on top of a [`SessionStore`]

use crate::error::StoreError;
use crate::snapshot;
use crate::store::SessionStore;
use ethos_scenario::ScenarioCatalog;
use ethos_session::{Rebind, Session};
use std::sync::Arc;

/// Persistence adapter
///
/// Failures never reach the caller: the in-memory session is the source of
/// truth and local saving is best-effort. Loading fails open to an empty
/// session.
#[derive(Debug, Clone)]
pub struct Persistence {
    store: Arc<dyn SessionStore>,
}

impl Persistence {
    /// Wrap a store
    #[inline]
    #[must_use]
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Wrap a shared store
    #[inline]
    #[must_use]
    pub fn from_arc(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Serialize and write the full session.
    ///
    /// Returns whether the write succeeded; failure is logged, not raised.
    pub fn save(&self, session: &Session) -> bool {
        match snapshot::encode(session).and_then(|blob| self.store.put(&blob)) {
            Ok(()) => {
                tracing::debug!("session saved");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save session locally; continuing in memory");
                false
            }
        }
    }

    /// Read the stored session and match it against `catalog`.
    ///
    /// Taking the catalog by reference means progress can only be applied
    /// once scenarios are loaded, and a catalog is never empty. Absent or
    /// unreadable state yields an empty session.
    #[must_use]
    pub fn load(&self, catalog: &ScenarioCatalog) -> Session {
        match self.try_load(catalog) {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::debug!("no stored session");
                Session::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable stored session");
                Session::new()
            }
        }
    }

    /// Like [`load`](Self::load) but reports why nothing was restored.
    ///
    /// # Errors
    /// Read or decode failures from the underlying store.
    pub fn try_load(&self, catalog: &ScenarioCatalog) -> Result<Option<Session>, StoreError> {
        let Some(blob) = self.store.get()? else {
            return Ok(None);
        };
        let mut session = snapshot::decode(&blob)?;
        match session.rebind(catalog) {
            Rebind::NoScenario | Rebind::Exact => {}
            Rebind::Moved { from, to } => {
                tracing::info!(from, to, "stored scenario moved within the catalog");
            }
            Rebind::Detached => {
                tracing::warn!("stored scenario no longer in the catalog; keeping saved copy");
            }
        }
        tracing::info!(
            team = session.team().map(|t| t.as_str()),
            has_scenario = session.has_scenario(),
            "stored session restored"
        );
        Ok(Some(session))
    }

    /// Delete persisted state; failure is logged, not raised.
    pub fn clear(&self) -> bool {
        match self.store.delete() {
            Ok(()) => {
                tracing::debug!("stored session cleared");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to clear stored session");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use ethos_scenario::ScenarioDefinition;

    fn catalog() -> ScenarioCatalog {
        ScenarioCatalog::new(vec![
            ScenarioDefinition::new("Deepfake", "story"),
            ScenarioDefinition::new("Obituaries", "story"),
        ])
        .unwrap()
    }

    #[test]
    fn save_then_load() {
        let store = Arc::new(MemoryStore::new());
        let persistence = Persistence::from_arc(store.clone());

        let mut session = Session::new();
        session.set_team_name("Team").unwrap();
        session
            .select_scenario(1, catalog().get(1).unwrap().clone())
            .unwrap();

        assert!(persistence.save(&session));
        assert!(store.snapshot().is_some());
        assert_eq!(persistence.load(&catalog()), session);
    }

    #[test]
    fn absent_state_loads_empty() {
        let persistence = Persistence::new(MemoryStore::new());
        assert_eq!(persistence.load(&catalog()), Session::Empty);
    }

    #[test]
    fn malformed_state_loads_empty() {
        let persistence = Persistence::new(MemoryStore::with_blob("][ nope"));
        assert_eq!(persistence.load(&catalog()), Session::Empty);
        assert!(persistence.try_load(&catalog()).is_err());
    }

    #[test]
    fn clear_removes_blob() {
        let store = Arc::new(MemoryStore::with_blob("x"));
        let persistence = Persistence::from_arc(store.clone());
        assert!(persistence.clear());
        assert_eq!(store.snapshot(), None);
    }
}
