//! Session storage and the credential provider.

use murmur_core::{Credential, CredentialScheme, Session};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Session-scoped storage for the signed-in user's record.
///
/// The stored value is the raw record; parsing happens in
/// [`CredentialProvider`] so a corrupted entry never breaks the store itself.
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Raw stored record, if any.
    fn read(&self) -> Option<String>;

    /// Replace the stored record.
    fn write(&self, record: String);

    /// Remove the stored record.
    fn clear(&self);
}

/// In-process session store. Nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: RwLock<Option<String>>,
    clears: AtomicUsize,
}

impl MemorySessionStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `session`.
    pub fn with_session(session: &Session) -> Self {
        Self::with_record(session.to_record())
    }

    /// Store holding an arbitrary raw record, which may be malformed.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: RwLock::new(Some(record.into())),
            clears: AtomicUsize::new(0),
        }
    }

    /// How many times the record has been cleared.
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Option<String> {
        self.record
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn write(&self, record: String) {
        *self
            .record
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(record);
    }

    fn clear(&self) {
        *self
            .record
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

/// Session lifecycle notifications for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SessionEvent {
    /// The service rejected the credential; the session has been cleared
    #[display("re-authentication required (HTTP {})", status)]
    ReauthenticationRequired {
        /// Status that signalled the rejection
        status: u16,
    },
}

/// Supplies the current user's credential to outbound requests.
///
/// Stateless apart from the store it reads.
#[derive(Debug, Clone)]
pub struct CredentialProvider {
    store: Arc<dyn SessionStore>,
    scheme: CredentialScheme,
}

impl CredentialProvider {
    /// Provider reading `store` and encoding with `scheme`.
    pub fn new(store: Arc<dyn SessionStore>, scheme: CredentialScheme) -> Self {
        Self { store, scheme }
    }

    /// Current session, or `None` when absent or malformed.
    pub fn current_session(&self) -> Option<Session> {
        self.store.read().as_deref().and_then(Session::parse)
    }

    /// Current credential, or `None` when there is no usable session.
    pub fn current_credential(&self) -> Option<Credential> {
        self.current_session().map(|s| s.credential(self.scheme))
    }

    /// Record a freshly signed-in session.
    pub fn sign_in(&self, session: &Session) {
        info!(user_id = %session.id(), "Session started");
        self.store.write(session.to_record());
    }

    /// Drop the stored session (logout or credential rejection).
    pub fn invalidate(&self) {
        debug!("Clearing stored session");
        self.store.clear();
    }

    /// Scheme in use.
    pub fn scheme(&self) -> CredentialScheme {
        self.scheme
    }
}
