//! In-memory fit sessions: each API-created fit lives behind a uuid and
//! carries its own resolution cache. One store-wide mutex serializes
//! access; read-mostly traffic never holds it across a resolution because
//! the cache lives inside the session entry.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dogma::ResolutionCache;
use crate::fit::Fit;

pub struct FitSession {
    pub id: String,
    pub fit: Fit,
    pub cache: ResolutionCache,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FitSession {
    fn new(id: String, fit: Fit) -> Self {
        let now = Utc::now();
        Self {
            id,
            fit,
            cache: ResolutionCache::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, FitSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fit under a fresh session id and return the id.
    pub fn create(&self, fit: Fit) -> String {
        let id = Uuid::new_v4().to_string();
        let session = FitSession::new(id.clone(), fit);
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.insert(id.clone(), session);
        id
    }

    /// Run a closure against one session with the store lock held. Returns
    /// None when the id is unknown.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut FitSession) -> R) -> Option<R> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.get_mut(id).map(f)
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Item, ItemId, MemoryCatalog};

    fn hull_catalog() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new();
        catalog.insert_item(Item {
            id: ItemId(1),
            name: "Test Frigate".into(),
            category: Category::Hull,
            attrs: Default::default(),
            effects: Vec::new(),
            slot: None,
            hardpoint: None,
            max_state: crate::fit::ModuleState::Active,
            group: 0,
            charge_groups: Vec::new(),
            skill_reqs: Vec::new(),
            hull_whitelist: Vec::new(),
        });
        catalog
    }

    #[test]
    fn session_ids_are_unique_and_resolvable() {
        let catalog = hull_catalog();
        let store = SessionStore::new();
        let a = store.create(Fit::new(&catalog, "a", ItemId(1)).unwrap());
        let b = store.create(Fit::new(&catalog, "b", ItemId(1)).unwrap());
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        let name = store.with_session(&a, |s| s.fit.name.clone());
        assert_eq!(name.as_deref(), Some("a"));
        assert!(store.with_session("missing", |_| ()).is_none());
    }

    #[test]
    fn remove_drops_the_session() {
        let catalog = hull_catalog();
        let store = SessionStore::new();
        let id = store.create(Fit::new(&catalog, "x", ItemId(1)).unwrap());
        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.is_empty());
    }
}
