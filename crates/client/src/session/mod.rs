//! Client session state container.
//!
//! [`SessionStore`] is the single source of truth for "is there an
//! authenticated client, and who are they", plus the operations that can
//! change that.
//!
//! # Contract
//!
//! - Every operation resolves to a result value; API failures are mapped to
//!   a message (the server's, else a per-operation fallback) and never
//!   propagate.
//! - Readers take a [`SessionState`] snapshot or subscribe to a
//!   `watch` channel that sees every committed transition.
//! - Operations that can touch the session are serialized through a FIFO
//!   lock, so overlapping calls take effect in the order they were issued.
//!
//! # Transitions
//!
//! ```text
//! Unknown ──check──▶ Authenticated | Anonymous
//! Unknown | Anonymous ──login──▶ Authenticated
//! Authenticated ──logout / check says no──▶ Anonymous
//! Authenticated ──update_profile / verify_email──▶ Authenticated (refreshed)
//! ```

mod outcome;
mod state;

pub use outcome::{
    OperationResult, RegisterResult, ReservationsResult, TokenValidity, failure_message, messages,
};
pub use state::{SessionPhase, SessionState};

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::{debug, error, info, instrument, warn};

use salon_core::ClientProfile;

use crate::api::{
    AuthCheck, ChangePasswordRequest, LoginRequest, ProfileUpdate, RegisterRequest,
    SalonApi,
};
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};

/// Session state container.
///
/// Cheaply cloneable; clones share the same state and API client. Construct
/// one at startup and hand it to whatever renders the session.
pub struct SessionStore<A> {
    inner: Arc<SessionStoreInner<A>>,
}

struct SessionStoreInner<A> {
    api: A,
    state: watch::Sender<SessionState>,
    /// Held for the whole of every state-touching operation.
    op_lock: Mutex<()>,
}

impl<A> Clone for SessionStore<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: SalonApi> SessionStore<A> {
    /// Create a store in the `Unknown` phase without contacting the API.
    #[must_use]
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(SessionState::unknown());
        Self {
            inner: Arc::new(SessionStoreInner {
                api,
                state,
                op_lock: Mutex::new(()),
            }),
        }
    }

    /// Create a store and run the initial authentication check.
    pub async fn connect(api: A) -> Self {
        let store = Self::new(api);
        store.check_auth_status().await;
        store
    }

    /// The API client the store talks through.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.inner.api
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every committed transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// The logged-in client, if any.
    #[must_use]
    pub fn client(&self) -> Option<ClientProfile> {
        self.inner.state.borrow().client().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.inner.state.borrow().phase()
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Ask the API who is logged in and store the answer.
    ///
    /// A 401 is the normal answer when there is no session and is not
    /// logged as an error. Returns whether a client is now authenticated.
    #[instrument(skip(self))]
    pub async fn check_auth_status(&self) -> bool {
        let _op = self.lock().await;
        self.check_auth_locked().await
    }

    /// Re-run the authentication check.
    pub async fn refresh_auth(&self) -> bool {
        self.check_auth_status().await
    }

    /// Log in. On failure the current session is left as it was.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> OperationResult {
        let _op = self.lock().await;

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.clone(),
        };

        match self.inner.api.login(&request).await {
            Ok(response) => {
                info!(client_id = %response.client.id, "Client logged in");
                add_breadcrumb("session", "login");
                self.commit_client(Some(response.client));
                OperationResult::succeeded(response.message, messages::LOGIN_SUCCEEDED)
            }
            Err(err) => {
                debug!(error = %err, "Login rejected");
                OperationResult::failed(&err, messages::LOGIN_FAILED)
            }
        }
    }

    /// Create an account. Registration does not log the client in.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> RegisterResult {
        match self.inner.api.register(request).await {
            Ok(response) => RegisterResult {
                success: true,
                message: response
                    .message
                    .unwrap_or_else(|| messages::REGISTER_SUCCEEDED.to_string()),
                client_id: response.client_id,
                verification_token: response.verification_token,
            },
            Err(err) => {
                debug!(error = %err, "Registration rejected");
                RegisterResult {
                    success: false,
                    message: failure_message(&err, messages::REGISTER_FAILED),
                    client_id: None,
                    verification_token: None,
                }
            }
        }
    }

    /// Log out. The local session is dropped even if the API call fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let _op = self.lock().await;

        if let Err(err) = self.inner.api.logout().await {
            warn!(error = %err, "Logout request failed, dropping local session anyway");
        }

        add_breadcrumb("session", "logout");
        self.commit_client(None);
    }

    /// Update the profile, then reload it from the API rather than trusting
    /// the submitted fields.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> OperationResult {
        let _op = self.lock().await;

        match self.inner.api.update_profile(update).await {
            Ok(response) => {
                self.check_auth_locked().await;
                OperationResult::succeeded(response.message, messages::PROFILE_UPDATED)
            }
            Err(err) => {
                debug!(error = %err, "Profile update rejected");
                OperationResult::failed(&err, messages::PROFILE_UPDATE_FAILED)
            }
        }
    }

    /// Change the password. The session is not affected.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        current_password: &SecretString,
        new_password: &SecretString,
    ) -> OperationResult {
        let request = ChangePasswordRequest {
            current_password: current_password.clone(),
            new_password: new_password.clone(),
        };

        match self.inner.api.change_password(&request).await {
            Ok(response) => OperationResult::succeeded(response.message, messages::PASSWORD_CHANGED),
            Err(err) => {
                debug!(error = %err, "Password change rejected");
                OperationResult::failed(&err, messages::PASSWORD_CHANGE_FAILED)
            }
        }
    }

    /// Verify the email address, then reload the profile so
    /// `email_verifie` reflects it.
    #[instrument(skip_all)]
    pub async fn verify_email(&self, token: &str) -> OperationResult {
        let _op = self.lock().await;

        match self.inner.api.verify_email(token).await {
            Ok(response) => {
                self.check_auth_locked().await;
                OperationResult::succeeded(response.message, messages::EMAIL_VERIFIED)
            }
            Err(err) => {
                debug!(error = %err, "Email verification rejected");
                OperationResult::failed(&err, messages::EMAIL_VERIFICATION_FAILED)
            }
        }
    }

    // =========================================================================
    // Stateless Passthroughs
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> OperationResult {
        match self.inner.api.forgot_password(email.trim()).await {
            Ok(response) => OperationResult::succeeded(response.message, messages::RESET_EMAIL_SENT),
            Err(err) => OperationResult::failed(&err, messages::RESET_EMAIL_FAILED),
        }
    }

    #[instrument(skip_all)]
    pub async fn reset_password(&self, token: &str, new_password: &SecretString) -> OperationResult {
        match self.inner.api.reset_password(token, new_password).await {
            Ok(response) => OperationResult::succeeded(response.message, messages::PASSWORD_RESET),
            Err(err) => OperationResult::failed(&err, messages::PASSWORD_RESET_FAILED),
        }
    }

    #[instrument(skip_all)]
    pub async fn verify_reset_token(&self, token: &str) -> TokenValidity {
        match self.inner.api.verify_reset_token(token).await {
            Ok(check) => {
                let default = if check.valid {
                    messages::RESET_TOKEN_VALID
                } else {
                    messages::RESET_TOKEN_INVALID
                };
                TokenValidity {
                    valid: check.valid,
                    message: check.message.unwrap_or_else(|| default.to_string()),
                }
            }
            Err(err) => TokenValidity {
                valid: false,
                message: failure_message(&err, messages::RESET_TOKEN_INVALID),
            },
        }
    }

    /// Reservations of the logged-in client. Does not touch the session.
    #[instrument(skip(self))]
    pub async fn my_reservations(&self) -> ReservationsResult {
        match self.inner.api.my_reservations().await {
            Ok(mut reservations) => {
                reservations.sort_by_key(salon_core::Reservation::starts_at);
                ReservationsResult {
                    success: true,
                    message: None,
                    reservations,
                }
            }
            Err(err) => {
                debug!(error = %err, "Reservations fetch failed");
                ReservationsResult {
                    success: false,
                    message: Some(failure_message(&err, messages::RESERVATIONS_FAILED)),
                    reservations: Vec::new(),
                }
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner.op_lock.lock().await
    }

    /// Authentication check; caller holds the operation lock.
    async fn check_auth_locked(&self) -> bool {
        let _loading = LoadingFlag::raise(&self.inner.state);

        let client = match self.inner.api.check_auth().await {
            Ok(AuthCheck {
                authenticated: true,
                client: Some(client),
            }) => Some(client),
            Ok(AuthCheck {
                authenticated: true,
                client: None,
            }) => {
                warn!("API reported an authenticated session without a client");
                None
            }
            Ok(_) => {
                debug!("No active session");
                None
            }
            Err(err) if err.is_unauthorized() => {
                debug!("No active session (401)");
                None
            }
            Err(err) => {
                error!(error = %err, "Authentication check failed");
                None
            }
        };

        let authenticated = client.is_some();
        self.commit_client(client);
        authenticated
    }

    /// Replace the client wholesale and sync the error-tracking user.
    ///
    /// The caller holds the operation lock, so no other check can be in
    /// flight and `loading` is lowered in the same transition.
    fn commit_client(&self, client: Option<ClientProfile>) {
        match &client {
            Some(client) => set_sentry_user(client.id, Some(client.email.as_str())),
            None => clear_sentry_user(),
        }
        self.inner.state.send_modify(|state| {
            state.set_client(client);
            state.set_loading(false);
        });
    }
}

/// Raises `loading` and lowers it again on drop, including when the check
/// is cancelled mid-request.
struct LoadingFlag<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl<'a> LoadingFlag<'a> {
    fn raise(state: &'a watch::Sender<SessionState>) -> Self {
        state.send_if_modified(|s| {
            let changed = !s.is_loading();
            s.set_loading(true);
            changed
        });
        Self { state }
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            let changed = s.is_loading();
            s.set_loading(false);
            changed
        });
    }
}
