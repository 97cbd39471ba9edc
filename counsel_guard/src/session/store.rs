use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::credential::{Credential, decode_credential};
use crate::errors::GuardError;
use crate::session::types::Session;

/// In-memory session state for client-side navigation, hydrated from a decoded
/// credential.
///
/// Every change is published to subscribers, so guards re-run when the user signs
/// in or out elsewhere.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<Session>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::anonymous());
        Self { tx }
    }

    /// Current snapshot.
    pub fn session(&self) -> Session {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Decode `token` and replace the stored session with it.
    ///
    /// A token that fails to decode signs the store out and returns the error.
    pub fn hydrate(&self, token: &str) -> Result<Credential, GuardError> {
        self.hydrate_at(token, Utc::now())
    }

    pub(crate) fn hydrate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Credential, GuardError> {
        match decode_credential(token, now) {
            Ok(credential) => {
                tracing::debug!("Session hydrated for role {:?}", credential.role);
                self.set(credential.session());
                Ok(credential)
            }
            Err(e) => {
                tracing::warn!("Failed to hydrate session: {}", e);
                self.sign_out();
                Err(e.into())
            }
        }
    }

    pub fn set(&self, session: Session) {
        self.tx.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        });
    }

    pub fn sign_out(&self) {
        self.set(Session::anonymous());
    }
}
