//! In-memory API and log capture for unit tests.
#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use secrecy::SecretString;
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use salon_core::{ClientId, ClientProfile, Email, Reservation, SalonService};

use crate::api::{
    ApiError, AuthCheck, ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    ProfileUpdate, RegisterRequest, RegisterResponse, ResetTokenCheck, SalonApi,
};

// =============================================================================
// Fixtures
// =============================================================================

pub fn profile(id: i32) -> ClientProfile {
    ClientProfile {
        id: ClientId::new(id),
        nom: "Martin".to_string(),
        prenom: "Léa".to_string(),
        email: Email::parse(&format!("client{id}@salon.fr")).unwrap(),
        telephone: None,
        adresse: None,
        email_verifie: false,
    }
}

pub fn authenticated(id: i32) -> AuthCheck {
    AuthCheck {
        authenticated: true,
        client: Some(profile(id)),
    }
}

pub fn anonymous() -> AuthCheck {
    AuthCheck {
        authenticated: false,
        client: None,
    }
}

pub fn message(text: &str) -> MessageResponse {
    MessageResponse {
        message: Some(text.to_string()),
    }
}

/// Non-2xx answer from the server.
pub fn status_error(status: u16, message: Option<&str>) -> ApiError {
    ApiError::Status {
        status,
        message: message.map(String::from),
    }
}

/// Failure without a response, so without a server message.
pub fn unreadable_response() -> ApiError {
    ApiError::Parse(serde_json::from_str::<()>("<html>").unwrap_err())
}

// =============================================================================
// MockApi
// =============================================================================

struct Reply<T> {
    delay: Option<Duration>,
    result: Result<T, ApiError>,
}

/// Queue of scripted replies for one API method.
struct Script<T> {
    method: &'static str,
    replies: Mutex<VecDeque<Reply<T>>>,
    calls: AtomicUsize,
}

impl<T> Script<T> {
    const fn new(method: &'static str) -> Self {
        Self {
            method,
            replies: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn push(&self, delay: Option<Duration>, result: Result<T, ApiError>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply { delay, result });
    }

    async fn next(&self) -> Result<T, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted call to {}", self.method));
        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        reply.result
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// `SalonApi` answering from per-method queues. Panics on a call nothing was
/// scripted for.
pub struct MockApi {
    check_auth: Script<AuthCheck>,
    login: Script<LoginResponse>,
    register: Script<RegisterResponse>,
    logout: Script<()>,
    update_profile: Script<MessageResponse>,
    change_password: Script<MessageResponse>,
    verify_email: Script<MessageResponse>,
    forgot_password: Script<MessageResponse>,
    reset_password: Script<MessageResponse>,
    verify_reset_token: Script<ResetTokenCheck>,
    my_reservations: Script<Vec<Reservation>>,
    services: Script<Vec<SalonService>>,
    /// Last login request seen, for asserting what was sent.
    last_login_email: Mutex<Option<String>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            check_auth: Script::new("check_auth"),
            login: Script::new("login"),
            register: Script::new("register"),
            logout: Script::new("logout"),
            update_profile: Script::new("update_profile"),
            change_password: Script::new("change_password"),
            verify_email: Script::new("verify_email"),
            forgot_password: Script::new("forgot_password"),
            reset_password: Script::new("reset_password"),
            verify_reset_token: Script::new("verify_reset_token"),
            my_reservations: Script::new("my_reservations"),
            services: Script::new("services"),
            last_login_email: Mutex::new(None),
        }
    }
}

impl MockApi {
    pub fn on_check_auth(&self, result: Result<AuthCheck, ApiError>) -> &Self {
        self.check_auth.push(None, result);
        self
    }

    pub fn on_check_auth_after(
        &self,
        delay: Duration,
        result: Result<AuthCheck, ApiError>,
    ) -> &Self {
        self.check_auth.push(Some(delay), result);
        self
    }

    pub fn on_login(&self, result: Result<LoginResponse, ApiError>) -> &Self {
        self.login.push(None, result);
        self
    }

    pub fn on_login_after(&self, delay: Duration, result: Result<LoginResponse, ApiError>) -> &Self {
        self.login.push(Some(delay), result);
        self
    }

    pub fn on_register(&self, result: Result<RegisterResponse, ApiError>) -> &Self {
        self.register.push(None, result);
        self
    }

    pub fn on_logout(&self, result: Result<(), ApiError>) -> &Self {
        self.logout.push(None, result);
        self
    }

    pub fn on_update_profile(&self, result: Result<MessageResponse, ApiError>) -> &Self {
        self.update_profile.push(None, result);
        self
    }

    pub fn on_change_password(&self, result: Result<MessageResponse, ApiError>) -> &Self {
        self.change_password.push(None, result);
        self
    }

    pub fn on_verify_email(&self, result: Result<MessageResponse, ApiError>) -> &Self {
        self.verify_email.push(None, result);
        self
    }

    pub fn on_forgot_password(&self, result: Result<MessageResponse, ApiError>) -> &Self {
        self.forgot_password.push(None, result);
        self
    }

    pub fn on_reset_password(&self, result: Result<MessageResponse, ApiError>) -> &Self {
        self.reset_password.push(None, result);
        self
    }

    pub fn on_verify_reset_token(&self, result: Result<ResetTokenCheck, ApiError>) -> &Self {
        self.verify_reset_token.push(None, result);
        self
    }

    pub fn on_my_reservations(&self, result: Result<Vec<Reservation>, ApiError>) -> &Self {
        self.my_reservations.push(None, result);
        self
    }

    pub fn on_services(&self, result: Result<Vec<SalonService>, ApiError>) -> &Self {
        self.services.push(None, result);
        self
    }

    pub fn check_auth_calls(&self) -> usize {
        self.check_auth.calls()
    }

    pub fn services_calls(&self) -> usize {
        self.services.calls()
    }

    pub fn last_login_email(&self) -> Option<String> {
        self.last_login_email.lock().unwrap().clone()
    }
}

impl SalonApi for MockApi {
    async fn check_auth(&self) -> Result<AuthCheck, ApiError> {
        self.check_auth.next().await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        *self.last_login_email.lock().unwrap() = Some(request.email.clone());
        self.login.next().await
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.register.next().await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.logout.next().await
    }

    async fn update_profile(&self, _update: &ProfileUpdate) -> Result<MessageResponse, ApiError> {
        self.update_profile.next().await
    }

    async fn change_password(
        &self,
        _request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.change_password.next().await
    }

    async fn verify_email(&self, _token: &str) -> Result<MessageResponse, ApiError> {
        self.verify_email.next().await
    }

    async fn forgot_password(&self, _email: &str) -> Result<MessageResponse, ApiError> {
        self.forgot_password.next().await
    }

    async fn reset_password(
        &self,
        _token: &str,
        _new_password: &SecretString,
    ) -> Result<MessageResponse, ApiError> {
        self.reset_password.next().await
    }

    async fn verify_reset_token(&self, _token: &str) -> Result<ResetTokenCheck, ApiError> {
        self.verify_reset_token.next().await
    }

    async fn my_reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        self.my_reservations.next().await
    }

    async fn services(&self) -> Result<Vec<SalonService>, ApiError> {
        self.services.next().await
    }
}

// =============================================================================
// Log capture
// =============================================================================

/// Layer counting ERROR-level events.
#[derive(Clone, Default)]
pub struct ErrorEvents(Arc<AtomicUsize>);

impl ErrorEvents {
    /// Install a subscriber with this layer for the current thread.
    ///
    /// `#[tokio::test]` runs on a current-thread runtime, so everything the
    /// test awaits is captured while the guard lives.
    pub fn capture() -> (Self, DefaultGuard) {
        let events = Self::default();
        let subscriber = tracing_subscriber::registry().with(events.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (events, guard)
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}
