//! Session state snapshot.

use salon_core::ClientProfile;

/// Coarse phase of the session, derived from [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// The session has not been resolved yet.
    Unknown,
    /// A client is logged in.
    Authenticated,
    /// Nobody is logged in.
    Anonymous,
}

/// Snapshot of the session held by a [`super::SessionStore`].
///
/// Authentication is derived from `client`, so "authenticated" and "has a
/// client" can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    client: Option<ClientProfile>,
    loading: bool,
    /// Set once the session has been resolved by a check, login or logout.
    resolved: bool,
}

impl SessionState {
    /// State of a freshly created store: unknown until the first check.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            client: None,
            loading: true,
            resolved: false,
        }
    }

    /// The logged-in client, if any.
    #[must_use]
    pub const fn client(&self) -> Option<&ClientProfile> {
        self.client.as_ref()
    }

    /// Whether a client is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.client.is_some()
    }

    /// Whether an authentication check is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// `Unknown` until the session is first resolved. A later re-check
    /// keeps the current phase while `loading` is raised.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        match (&self.client, self.resolved) {
            (Some(_), _) => SessionPhase::Authenticated,
            (None, false) => SessionPhase::Unknown,
            (None, true) => SessionPhase::Anonymous,
        }
    }

    pub(crate) fn set_client(&mut self, client: Option<ClientProfile>) {
        self.client = client;
        self.resolved = true;
    }

    pub(crate) const fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::unknown()
    }
}
