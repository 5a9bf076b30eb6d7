//! The process-wide record of who is logged in.
//!
//! A single [`Session`] is owned by the [`Client`](crate::Client) and shared
//! through an `Arc`. Every consumer reads the current user through
//! [`Session::current`]; the client clears it on logout and whenever the
//! server answers 401.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use api_types::user::User;

use crate::{Client, ClientError, Result};

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    access_token: Option<String>,
}

#[derive(Debug, Default)]
pub struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The cached user, if any.
    pub fn current(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().user.is_some()
    }

    pub(crate) fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    pub(crate) fn set_access_token(&self, token: Option<String>) {
        self.write().access_token = token;
    }

    pub(crate) fn set_user(&self, user: User) {
        self.write().user = Some(user);
    }

    /// Forgets the user and any bearer token.
    pub fn clear(&self) {
        let mut state = self.write();
        if state.user.is_some() || state.access_token.is_some() {
            tracing::debug!("clearing session");
        }
        *state = SessionState::default();
    }

    /// Asks the server who is logged in and caches the answer.
    ///
    /// A 401 clears the session and yields `Ok(None)`. Other failures are
    /// returned and leave the cached user untouched.
    pub async fn refresh(&self, client: &Client) -> Result<Option<User>> {
        match client.current_user().await {
            Ok(user) => {
                self.set_user(user.clone());
                Ok(Some(user))
            }
            Err(ClientError::Unauthorized) => {
                self.clear();
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
