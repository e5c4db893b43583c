use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::{
    emit, ClientEvent, EventSender, Identity, Route, Storage, StorageError, TOKEN_KEY, USER_KEY,
};

/// The credential and identity of a logged in user.
/// These only ever exist together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    /// The opaque bearer credential
    pub token: String,
    pub user: Identity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(SessionData),
}

/// The process-wide authorization context.
///
/// The state is only ever replaced as a whole, never partially updated,
/// and every replacement is mirrored to the persisted storage.
pub struct Session {
    storage: Box<dyn Storage>,
    state: RwLock<SessionState>,
    /// True until the persisted state has been read
    loading: AtomicBool,
    events: EventSender,
}

impl Session {
    pub fn new<S>(storage: S, events: EventSender) -> Self
    where
        S: Storage + 'static,
    {
        Self {
            storage: Box::new(storage),
            state: Default::default(),
            loading: AtomicBool::new(true),
            events,
        }
    }

    /// Creates a session and immediately hydrates it from storage
    pub fn restore<S>(storage: S, events: EventSender) -> Self
    where
        S: Storage + 'static,
    {
        let session = Self::new(storage, events);
        session.hydrate();
        session
    }

    /// Reads the persisted credential and identity, announcing the result.
    /// The session is only authenticated if both are present and valid.
    pub fn hydrate(&self) -> SessionState {
        let token = self.read(TOKEN_KEY);
        let user = self.read(USER_KEY);

        let new_state = match (token, user) {
            (Some(token), Some(user)) => match serde_json::from_str::<Identity>(&user) {
                Ok(user) => SessionState::Authenticated(SessionData { token, user }),
                Err(e) => {
                    warn!("Persisted identity is invalid, discarding session: {}", e);
                    self.clear_storage();
                    SessionState::Unauthenticated
                }
            },
            (None, None) => SessionState::Unauthenticated,
            _ => {
                warn!("Found a partial session in storage, discarding it");
                self.clear_storage();
                SessionState::Unauthenticated
            }
        };

        *self.state.write() = new_state.clone();
        self.loading.store(false, Ordering::Release);

        emit(
            &self.events,
            ClientEvent::SessionChanged {
                authenticated: matches!(new_state, SessionState::Authenticated(_)),
            },
        );

        new_state
    }

    /// Persists the given session and makes it the current one
    pub fn establish(&self, data: SessionData) -> Result<(), StorageError> {
        let user = serde_json::to_string(&data.user)
            .map_err(|e| StorageError::Write(e.to_string()))?;

        if let Err(e) = self
            .storage
            .set(TOKEN_KEY, &data.token)
            .and_then(|_| self.storage.set(USER_KEY, &user))
        {
            self.clear_storage();
            return Err(e);
        }

        info!("Logged in as {}", data.user.username);
        *self.state.write() = SessionState::Authenticated(data);
        emit(
            &self.events,
            ClientEvent::SessionChanged {
                authenticated: true,
            },
        );

        Ok(())
    }

    /// Replaces the identity of the current session, keeping the credential
    pub fn replace_identity(&self, user: Identity) -> Result<(), StorageError> {
        match self.token() {
            Some(token) => self.establish(SessionData { token, user }),
            None => Ok(()),
        }
    }

    /// Clears the session unconditionally
    pub fn logout(&self) {
        self.clear_storage();
        *self.state.write() = SessionState::Unauthenticated;

        emit(
            &self.events,
            ClientEvent::SessionChanged {
                authenticated: false,
            },
        );
    }

    /// Clears the session because the server rejected the given credential,
    /// then sends the user to the login entry point.
    ///
    /// Only the first rejection of the current credential tears the session down.
    /// Returns false if there was nothing to tear down.
    pub fn force_logout(&self, rejected: Option<&str>) -> bool {
        {
            let mut state = self.state.write();

            let current = match &*state {
                SessionState::Authenticated(data) => data.token.as_str(),
                SessionState::Unauthenticated => return false,
            };

            if rejected.is_some_and(|token| token != current) {
                debug!("A previous credential was rejected, keeping the current session");
                return false;
            }

            *state = SessionState::Unauthenticated;
            self.clear_storage();
        }

        warn!("Credential was rejected by the server, logging out");

        emit(
            &self.events,
            ClientEvent::SessionChanged {
                authenticated: false,
            },
        );
        emit(&self.events, ClientEvent::Navigate(Route::Login));

        true
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        match &*self.state.read() {
            SessionState::Authenticated(data) => Some(data.token.clone()),
            SessionState::Unauthenticated => None,
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        match &*self.state.read() {
            SessionState::Authenticated(data) => Some(data.user.clone()),
            SessionState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.read(), SessionState::Authenticated(_))
    }

    /// Returns true until the persisted state has been read
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("Could not read {} from storage: {}", key, e);
                None
            }
        }
    }

    fn clear_storage(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Could not remove {} from storage: {}", key, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{event_channel, MemoryStorage, Storage};

    fn identity() -> Identity {
        Identity {
            id: 1,
            username: "princess".to_string(),
            email: "princess@arena.gg".to_string(),
            role: None,
            clash_tag: None,
            created_at: None,
        }
    }

    fn seeded(token: Option<&str>, user: Option<&str>) -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());

        if let Some(token) = token {
            storage.set(TOKEN_KEY, token).unwrap();
        }

        if let Some(user) = user {
            storage.set(USER_KEY, user).unwrap();
        }

        storage
    }

    #[test]
    fn test_hydrates_when_both_are_present() {
        let user = serde_json::to_string(&identity()).unwrap();
        let storage = seeded(Some("abc"), Some(&user));
        let (sender, _receiver) = event_channel();

        let session = Session::new(storage, sender);
        assert!(session.is_loading());

        let state = session.hydrate();

        assert!(!session.is_loading());
        assert_eq!(
            state,
            SessionState::Authenticated(SessionData {
                token: "abc".to_string(),
                user: identity()
            })
        );
    }

    #[test]
    fn test_partial_session_is_unauthenticated() {
        let user = serde_json::to_string(&identity()).unwrap();
        let (sender, _receiver) = event_channel();

        let only_token = seeded(Some("abc"), None);
        let session = Session::restore(only_token.clone(), sender.clone());
        assert!(!session.is_authenticated());
        assert!(only_token.is_empty());

        let only_user = seeded(None, Some(&user));
        let session = Session::restore(only_user.clone(), sender);
        assert!(!session.is_authenticated());
        assert!(only_user.is_empty());
    }

    #[test]
    fn test_invalid_identity_is_unauthenticated() {
        let storage = seeded(Some("abc"), Some("{not json"));
        let (sender, _receiver) = event_channel();

        let session = Session::restore(storage, sender);

        assert_eq!(session.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_establish_and_logout() {
        let storage = Arc::new(MemoryStorage::new());
        let (sender, receiver) = event_channel();
        let session = Session::restore(storage.clone(), sender);
        receiver.try_iter().for_each(drop);

        session
            .establish(SessionData {
                token: "abc".to_string(),
                user: identity(),
            })
            .unwrap();

        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        assert!(storage.get(USER_KEY).unwrap().is_some());

        session.logout();

        assert!(!session.is_authenticated());
        assert!(storage.is_empty());

        let events: Vec<_> = receiver.try_iter().collect();
        assert_eq!(
            events,
            vec![
                ClientEvent::SessionChanged {
                    authenticated: true
                },
                ClientEvent::SessionChanged {
                    authenticated: false
                }
            ]
        );
    }

    #[test]
    fn test_hydration_is_announced() {
        let user = serde_json::to_string(&identity()).unwrap();
        let (sender, receiver) = event_channel();

        Session::restore(seeded(Some("abc"), Some(&user)), sender.clone());
        Session::restore(seeded(Some("abc"), None), sender);

        let events: Vec<_> = receiver.try_iter().collect();
        assert_eq!(
            events,
            vec![
                ClientEvent::SessionChanged {
                    authenticated: true
                },
                ClientEvent::SessionChanged {
                    authenticated: false
                }
            ]
        );
    }

    #[test]
    fn test_force_logout_navigates_to_login() {
        let user = serde_json::to_string(&identity()).unwrap();
        let storage = seeded(Some("abc"), Some(&user));
        let (sender, receiver) = event_channel();
        let session = Session::restore(storage.clone(), sender);
        receiver.try_iter().for_each(drop);

        assert!(session.force_logout(Some("abc")));

        assert!(storage.is_empty());
        assert!(receiver
            .try_iter()
            .any(|e| e == ClientEvent::Navigate(Route::Login)));
    }

    #[test]
    fn test_force_logout_happens_once() {
        let user = serde_json::to_string(&identity()).unwrap();
        let storage = seeded(Some("abc"), Some(&user));
        let (sender, receiver) = event_channel();
        let session = Session::restore(storage.clone(), sender);
        receiver.try_iter().for_each(drop);

        assert!(session.force_logout(Some("abc")));
        assert!(!session.force_logout(Some("abc")));
        assert!(!session.force_logout(None));

        let events: Vec<_> = receiver.try_iter().collect();
        assert_eq!(
            events,
            vec![
                ClientEvent::SessionChanged {
                    authenticated: false
                },
                ClientEvent::Navigate(Route::Login)
            ]
        );
    }

    #[test]
    fn test_rejected_old_credential_keeps_new_session() {
        let storage = Arc::new(MemoryStorage::new());
        let (sender, receiver) = event_channel();
        let session = Session::restore(storage.clone(), sender);

        session
            .establish(SessionData {
                token: "new".to_string(),
                user: identity(),
            })
            .unwrap();
        receiver.try_iter().for_each(drop);

        assert!(!session.force_logout(Some("old")));

        assert_eq!(session.token().as_deref(), Some("new"));
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("new"));
        assert_eq!(receiver.try_iter().count(), 0);
    }
}
