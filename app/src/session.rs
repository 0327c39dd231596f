//! Per-chat navigation state and the store that keeps it.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub i64);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub district: Option<String>,
    pub route: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    DistrictList,
    RouteList { district: String },
    RouteDetail { district: String, route: String },
}

impl Session {
    pub fn state(&self) -> NavState {
        match (&self.district, &self.route) {
            (Some(district), Some(route)) => NavState::RouteDetail {
                district: district.clone(),
                route: route.clone(),
            },
            (Some(district), None) => NavState::RouteList {
                district: district.clone(),
            },
            (None, _) => NavState::DistrictList,
        }
    }
}

pub trait SessionStore {
    /// Unknown ids yield a fresh session at the root screen.
    fn get(&self, id: SessionId) -> Session;
    fn put(&self, id: SessionId, session: Session);
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, id: SessionId) -> Session {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    fn put(&self, id: SessionId, session: Session) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, session);
    }
}
