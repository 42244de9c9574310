//! Client session: the root-owned holder of identity state.
//!
//! A [`Session`] wraps the [`IdentityStore`] together with the route table
//! and is handed to whatever drives login and navigation. Presentation code
//! gets an [`AuthView`], which can read identity but cannot change it.

use tracing::{debug, info, warn};

use crate::access::Decision;
use crate::identity::{Identity, Role};
use crate::navigation::{landing_route_for, menu_for, MenuEntry};
use crate::routes::{Resolution, RouteTable};

pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use store::{IdentityStore, DEFAULT_STORAGE_KEY};

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No identity held.
    Unauthenticated,
    /// Signed in with this role.
    Authenticated(Role),
}

/// Read-only view of the session for presentation code.
///
/// Login and logout are absent: they change identity state and live on
/// [`Session`], which the root of the client owns.
#[derive(Debug, Clone, Copy)]
pub struct AuthView<'a> {
    identity: Option<&'a Identity>,
}

impl<'a> AuthView<'a> {
    /// Current identity, if signed in.
    pub fn identity(&self) -> Option<&'a Identity> {
        self.identity
    }

    /// Whether an identity is held.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Sidebar entries for the signed-in role; empty when signed out.
    pub fn menu(&self) -> &'static [MenuEntry] {
        self.identity.map(|i| menu_for(i.role())).unwrap_or(&[])
    }
}

/// Options affecting session behaviour.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// After login, return to the guarded path that sent the visitor to login.
    pub resume_after_login: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            resume_after_login: true,
        }
    }
}

/// The single session of a running client.
#[derive(Debug)]
pub struct Session {
    store: IdentityStore,
    routes: RouteTable,
    options: SessionOptions,
    return_to: Option<String>,
}

impl Session {
    /// Build a session around a rehydrated store and the standard route tree.
    pub fn new(store: IdentityStore) -> Self {
        Self::with_routes(store, RouteTable::standard(), SessionOptions::default())
    }

    /// Build a session with an explicit route table and options.
    pub fn with_routes(store: IdentityStore, routes: RouteTable, options: SessionOptions) -> Self {
        Self {
            store,
            routes,
            options,
            return_to: None,
        }
    }

    /// Read-only accessor for downstream consumers.
    pub fn view(&self) -> AuthView<'_> {
        AuthView {
            identity: self.store.current(),
        }
    }

    /// Current identity, if signed in.
    pub fn identity(&self) -> Option<&Identity> {
        self.store.current()
    }

    /// Whether an identity is held.
    pub fn is_authenticated(&self) -> bool {
        self.store.current().is_some()
    }

    /// Current state-machine state.
    pub fn state(&self) -> SessionState {
        match self.store.current() {
            Some(identity) => SessionState::Authenticated(identity.role()),
            None => SessionState::Unauthenticated,
        }
    }

    /// Route table this session navigates with.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Guarded path remembered from the last redirect to login.
    pub fn pending_return(&self) -> Option<&str> {
        self.return_to.as_deref()
    }

    /// Resolve a navigation attempt, remembering guarded paths that required login.
    pub fn navigate(&mut self, path: &str) -> Resolution {
        let resolution = self.routes.resolve(path, self.store.current());
        if let Resolution::RedirectToLogin { from: Some(from) } = &resolution {
            if self.options.resume_after_login {
                self.return_to = Some(from.clone());
            }
        }
        resolution
    }

    /// Establish `identity` and return where the client should go next.
    ///
    /// That is the remembered path when the new role may enter it, otherwise
    /// the role's landing route. Returns `None` if the identity could not
    /// be persisted and the session stayed signed out.
    pub fn login(&mut self, identity: Identity) -> Option<String> {
        self.store.establish(identity);
        let role = self.store.current()?.role();
        let pending = self.return_to.take();

        let resumed = pending.filter(|path| {
            self.routes.decide(path, self.store.current()) == Decision::Allow
        });
        if let Some(path) = resumed {
            debug!(path = %path, "resuming after login");
            return Some(path);
        }
        Some(landing_route_for(role).to_owned())
    }

    /// Sign out: clear identity, persisted record, and any remembered path.
    ///
    /// The in-memory session always ends signed out. Returns `false` if the
    /// persisted record survived, meaning the next start would rehydrate it.
    #[must_use = "a false result means the next start may still be signed in"]
    pub fn logout(&mut self) -> bool {
        self.return_to = None;
        let cleared = self.store.clear();
        if cleared {
            info!("signed out");
        } else {
            warn!("signed out in memory, but the persisted record could not be cleared");
        }
        cleared
    }
}
