use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::lock;
use crate::game::GameSession;
use crate::ProtocolError;

/// Identifies the connection that registered a session.
pub type ConnectionId = u64;

#[derive(Debug)]
struct Entry {
    owner: ConnectionId,
    session: GameSession,
}

/// Game sessions keyed by player name.
///
/// Each session is owned by the connection that last registered its name.
/// Only the owner may change or remove it; a connection whose name was
/// taken over by another sees no session at all.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Entry>>,
}

impl SessionStore {
    /// Creates an empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the session for `name`.
    pub fn get(&self, name: &str) -> Option<GameSession> {
        lock(&self.sessions)
            .get(name)
            .map(|entry| entry.session.clone())
    }

    /// Stores `session` under its player name on behalf of `owner`,
    /// returning any session it replaced.
    pub fn insert(&self, owner: ConnectionId, session: GameSession) -> Option<GameSession> {
        let name = session.name().to_owned();
        lock(&self.sessions)
            .insert(name, Entry { owner, session })
            .map(|entry| entry.session)
    }

    /// Removes and returns the session for `name` if `owner` still owns it.
    pub fn remove(&self, name: &str, owner: ConnectionId) -> Option<GameSession> {
        let mut sessions = lock(&self.sessions);
        if !sessions.get(name).is_some_and(|entry| entry.owner == owner) {
            return None;
        }
        sessions.remove(name).map(|entry| entry.session)
    }

    /// Runs `f` against the session for `name` while holding the store lock.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::NoSession`] if no such session exists or
    /// `owner` does not own it, or whatever `f` returns.
    pub fn update<T, F>(&self, name: &str, owner: ConnectionId, f: F) -> Result<T, ProtocolError>
    where
        F: FnOnce(&mut GameSession) -> Result<T, ProtocolError>,
    {
        let mut sessions = lock(&self.sessions);
        match sessions.get_mut(name) {
            Some(entry) if entry.owner == owner => f(&mut entry.session),
            _ => Err(ProtocolError::NoSession),
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    /// Whether there are no live sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Best scores by player name.
///
/// Nothing records scores here yet; the `leaderboard` request reports
/// whatever it holds, which is always an empty board.
#[derive(Debug, Default)]
pub struct Leaderboard {
    scores: Mutex<HashMap<String, u64>>,
}

impl Leaderboard {
    /// Returns all scores ordered by player name.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        lock(&self.scores)
            .iter()
            .map(|(name, &score)| (name.clone(), score))
            .collect()
    }
}
