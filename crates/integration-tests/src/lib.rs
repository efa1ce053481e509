//! Integration tests for the salon client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p salon-integration-tests
//! ```
//!
//! No external service is needed: [`StubApi`] serves an in-memory salon API
//! on an ephemeral local port. It keeps sessions in a `salon_sid` cookie,
//! answers `auth/check` with 401 when there is no session, and sends
//! `{"message": ...}` bodies with its error statuses, like the real API.
//! Rows are shaped the way the MySQL-backed API sends them: `actif` as
//! `0`/`1` and `date_reservation` as a UTC timestamp.
//!
//! # Test Categories
//!
//! - `session_flow` - Login, profile, reservations, logout over HTTP
//! - `account_flow` - Registration, email verification, password reset
//! - `error_messages` - Server messages and fallbacks
//! - `catalog` - Services listing cache
//!
//! # Seed Data
//!
//! - Client 1: `lea@salon.fr` / [`LEA_PASSWORD`], email not verified,
//!   verification token [`LEA_VERIFICATION_TOKEN`], two reservations
//! - Client 2: `chloe@salon.fr` / [`CHLOE_PASSWORD`], no reservations
//! - Four services, one inactive

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::Deserialize;
use serde_json::json;
use tokio::task::JoinHandle;
use uuid::Uuid;

use salon_client::{ApiConfig, HttpApiClient};
use salon_core::{
    ClientId, ClientProfile, Email, Price, Reservation, ReservationId, ReservationStatus,
    SalonService, ServiceCategory, ServiceId,
};

pub const LEA_EMAIL: &str = "lea@salon.fr";
pub const LEA_PASSWORD: &str = "motdepasse1";
pub const LEA_VERIFICATION_TOKEN: &str = "verif-lea";
pub const CHLOE_EMAIL: &str = "chloe@salon.fr";
pub const CHLOE_PASSWORD: &str = "chloe-secret";

const SESSION_COOKIE: &str = "salon_sid";

// =============================================================================
// StubApi
// =============================================================================

/// In-memory salon API served over HTTP for the duration of a test.
pub struct StubApi {
    addr: SocketAddr,
    db: Db,
    server: JoinHandle<()>,
}

impl StubApi {
    /// Start a stub API with the seed data on `127.0.0.1`.
    pub async fn start() -> Self {
        let db = Db::seeded();
        let app = router(db.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, db, server }
    }

    /// Base URL of the API, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.base_url(), Duration::from_secs(5)).unwrap()
    }

    /// A fresh HTTP client, with its own cookie jar.
    #[must_use]
    pub fn client(&self) -> HttpApiClient {
        HttpApiClient::new(&self.api_config()).unwrap()
    }

    /// Make `route` (e.g. `"auth/login"`) answer `status` with a plain-text
    /// body until [`Self::clear_failures`].
    pub fn fail(&self, route: &'static str, status: u16) {
        self.db
            .lock()
            .failures
            .insert(route, StatusCode::from_u16(status).unwrap());
    }

    pub fn clear_failures(&self) {
        self.db.lock().failures.clear();
    }

    /// Number of `GET services` requests served.
    #[must_use]
    pub fn services_hits(&self) -> usize {
        self.db.lock().services_hits
    }

    /// Number of live sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.db.lock().sessions.len()
    }

    /// The reset token most recently issued for `email`, as if read from the
    /// reset email.
    #[must_use]
    pub fn reset_token_for(&self, email: &str) -> Option<String> {
        let db = self.db.lock();
        let id = db.find_by_email(email)?.profile.id;
        db.reset_tokens
            .iter()
            .find(|(_, client)| **client == id)
            .map(|(token, _)| token.clone())
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Storage
// =============================================================================

struct StoredClient {
    profile: ClientProfile,
    password: String,
}

#[derive(Default)]
struct Tables {
    clients: Vec<StoredClient>,
    sessions: HashMap<String, ClientId>,
    reservations: Vec<(ClientId, Reservation)>,
    services: Vec<SalonService>,
    verification_tokens: HashMap<String, ClientId>,
    reset_tokens: HashMap<String, ClientId>,
    failures: HashMap<&'static str, StatusCode>,
    services_hits: usize,
}

impl Tables {
    fn find_by_email(&self, email: &str) -> Option<&StoredClient> {
        self.clients
            .iter()
            .find(|c| c.profile.email.as_str().eq_ignore_ascii_case(email.trim()))
    }

    fn client_mut(&mut self, id: ClientId) -> Option<&mut StoredClient> {
        self.clients.iter_mut().find(|c| c.profile.id == id)
    }

    fn next_client_id(&self) -> ClientId {
        let max = self
            .clients
            .iter()
            .map(|c| c.profile.id.as_i32())
            .max()
            .unwrap_or(0);
        ClientId::new(max + 1)
    }
}

#[derive(Clone, Default)]
struct Db(Arc<Mutex<Tables>>);

impl Db {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.0.lock().unwrap()
    }

    fn seeded() -> Self {
        let db = Self::default();
        {
            let mut t = db.lock();
            t.clients = vec![
                StoredClient {
                    profile: profile(1, "Martin", "Léa", LEA_EMAIL, false),
                    password: LEA_PASSWORD.to_string(),
                },
                StoredClient {
                    profile: profile(2, "Durand", "Chloé", CHLOE_EMAIL, true),
                    password: CHLOE_PASSWORD.to_string(),
                },
            ];
            t.verification_tokens
                .insert(LEA_VERIFICATION_TOKEN.to_string(), ClientId::new(1));
            t.reservations = vec![
                (
                    ClientId::new(1),
                    reservation(10, (2026, 4, 18), (15, 0), "Vernis semi-permanent", 3500),
                ),
                (
                    ClientId::new(1),
                    reservation(11, (2026, 3, 2), (10, 30), "Épilation sourcils", 1500),
                ),
            ];
            t.services = vec![
                service(1, "Vernis semi-permanent", ServiceCategory::Ongles, 3500, 45, true),
                service(2, "Épilation sourcils", ServiceCategory::Sourcils, 1500, 20, true),
                service(3, "Soin visage éclat", ServiceCategory::Soins, 5500, 60, true),
                service(4, "Pose capsules", ServiceCategory::Ongles, 4500, 90, false),
            ];
        }
        db
    }
}

fn profile(id: i32, nom: &str, prenom: &str, email: &str, verified: bool) -> ClientProfile {
    ClientProfile {
        id: ClientId::new(id),
        nom: nom.to_string(),
        prenom: prenom.to_string(),
        email: Email::parse(email).unwrap(),
        telephone: None,
        adresse: None,
        email_verifie: verified,
    }
}

fn reservation(
    id: i32,
    (y, m, d): (i32, u32, u32),
    (h, min): (u32, u32),
    service: &str,
    cents: i64,
) -> Reservation {
    Reservation {
        id: ReservationId::new(id),
        service_id: None,
        service_nom: Some(service.to_string()),
        date_reservation: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        heure: NaiveTime::from_hms_opt(h, min, 0).unwrap(),
        statut: ReservationStatus::Confirmee,
        notes: None,
        prix: Some(Price::from_cents(cents)),
    }
}

fn service(
    id: i32,
    nom: &str,
    categorie: ServiceCategory,
    cents: i64,
    duree: u32,
    actif: bool,
) -> SalonService {
    SalonService {
        id: ServiceId::new(id),
        nom: nom.to_string(),
        description: None,
        categorie,
        prix: Price::from_cents(cents),
        duree,
        actif,
    }
}

// =============================================================================
// HTTP
// =============================================================================

/// Error response: JSON `{message}` when there is a message, plain text
/// otherwise.
struct Failure(StatusCode, Option<&'static str>);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        match self.1 {
            Some(message) => (self.0, Json(json!({ "message": message }))).into_response(),
            None => (self.0, "Internal Server Error").into_response(),
        }
    }
}

const UNAUTHENTICATED: Failure = Failure(StatusCode::UNAUTHORIZED, Some("Non authentifié"));

type Reply = Result<Response, Failure>;

fn router(db: Db) -> Router {
    let api = Router::new()
        .route("/auth/check", get(check))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/auth/verify-email/{token}", get(verify_email))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/verify-reset-token/{token}", get(verify_reset_token))
        .route("/clients/profile", put(update_profile))
        .route("/clients/password", put(change_password))
        .route("/reservations/mine", get(my_reservations))
        .route("/services", get(services));

    Router::new().nest("/api", api).with_state(db)
}

fn injected_failure(t: &Tables, route: &str) -> Result<(), Failure> {
    match t.failures.get(route) {
        Some(status) => Err(Failure(*status, None)),
        None => Ok(()),
    }
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then(|| value.to_string())
        })
}

fn current_client(t: &Tables, headers: &HeaderMap) -> Result<ClientId, Failure> {
    session_id(headers)
        .and_then(|sid| t.sessions.get(&sid).copied())
        .ok_or(UNAUTHENTICATED)
}

fn message(text: &str) -> Response {
    Json(json!({ "message": text })).into_response()
}

async fn check(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let t = db.lock();
    injected_failure(&t, "auth/check")?;
    let id = current_client(&t, &headers)?;
    let client = t
        .clients
        .iter()
        .find(|c| c.profile.id == id)
        .map(|c| &c.profile);
    Ok(Json(json!({ "authenticated": client.is_some(), "client": client })).into_response())
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    mot_de_passe: String,
}

async fn login(State(db): State<Db>, Json(body): Json<LoginBody>) -> Reply {
    let mut t = db.lock();
    injected_failure(&t, "auth/login")?;

    let client = t
        .find_by_email(&body.email)
        .filter(|c| c.password == body.mot_de_passe)
        .map(|c| c.profile.clone())
        .ok_or(Failure(
            StatusCode::UNAUTHORIZED,
            Some("Email ou mot de passe incorrect"),
        ))?;

    let sid = Uuid::new_v4().to_string();
    t.sessions.insert(sid.clone(), client.id);

    let cookie = format!("{SESSION_COOKIE}={sid}; Path=/; HttpOnly");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "message": "Connexion réussie", "client": client })),
    )
        .into_response())
}

#[derive(Deserialize)]
struct RegisterBody {
    nom: String,
    prenom: String,
    email: String,
    telephone: Option<String>,
    adresse: Option<String>,
    mot_de_passe: String,
}

async fn register(State(db): State<Db>, Json(body): Json<RegisterBody>) -> Reply {
    let mut t = db.lock();
    injected_failure(&t, "auth/register")?;

    if t.find_by_email(&body.email).is_some() {
        return Err(Failure(
            StatusCode::BAD_REQUEST,
            Some("Cet email est déjà utilisé"),
        ));
    }
    let email = Email::parse(&body.email)
        .map_err(|_| Failure(StatusCode::BAD_REQUEST, Some("Email invalide")))?;

    let id = t.next_client_id();
    t.clients.push(StoredClient {
        profile: ClientProfile {
            id,
            nom: body.nom,
            prenom: body.prenom,
            email,
            telephone: body.telephone,
            adresse: body.adresse,
            email_verifie: false,
        },
        password: body.mot_de_passe,
    });

    let token = Uuid::new_v4().simple().to_string();
    t.verification_tokens.insert(token.clone(), id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Inscription réussie. Vérifiez votre email.",
            "clientId": id,
            "verificationToken": token,
        })),
    )
        .into_response())
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let mut t = db.lock();
    injected_failure(&t, "auth/logout")?;

    if let Some(sid) = session_id(&headers) {
        t.sessions.remove(&sid);
    }
    let cookie = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0");
    Ok(([(header::SET_COOKIE, cookie)], message("Déconnexion réussie")).into_response())
}

async fn verify_email(State(db): State<Db>, Path(token): Path<String>) -> Reply {
    let mut t = db.lock();
    injected_failure(&t, "auth/verify-email")?;

    let id = t.verification_tokens.remove(&token).ok_or(Failure(
        StatusCode::BAD_REQUEST,
        Some("Token de vérification invalide"),
    ))?;
    if let Some(client) = t.client_mut(id) {
        client.profile.email_verifie = true;
    }
    Ok(message("Email vérifié avec succès"))
}

#[derive(Deserialize)]
struct ForgotBody {
    email: String,
}

async fn forgot_password(State(db): State<Db>, Json(body): Json<ForgotBody>) -> Reply {
    let mut t = db.lock();
    injected_failure(&t, "auth/forgot-password")?;

    if let Some(id) = t.find_by_email(&body.email).map(|c| c.profile.id) {
        t.reset_tokens.retain(|_, client| *client != id);
        t.reset_tokens.insert(Uuid::new_v4().simple().to_string(), id);
    }
    // Same answer whether or not the account exists
    Ok(message(
        "Si cet email existe, un lien de réinitialisation a été envoyé",
    ))
}

async fn verify_reset_token(State(db): State<Db>, Path(token): Path<String>) -> Reply {
    let t = db.lock();
    injected_failure(&t, "auth/verify-reset-token")?;

    if t.reset_tokens.contains_key(&token) {
        Ok(Json(json!({ "valid": true })).into_response())
    } else {
        Err(Failure(
            StatusCode::BAD_REQUEST,
            Some("Token invalide ou expiré"),
        ))
    }
}

#[derive(Deserialize)]
struct ResetBody {
    token: String,
    new_password: String,
}

async fn reset_password(State(db): State<Db>, Json(body): Json<ResetBody>) -> Reply {
    let mut t = db.lock();
    injected_failure(&t, "auth/reset-password")?;

    let id = t.reset_tokens.remove(&body.token).ok_or(Failure(
        StatusCode::BAD_REQUEST,
        Some("Token invalide ou expiré"),
    ))?;
    if let Some(client) = t.client_mut(id) {
        client.password = body.new_password;
    }
    Ok(message("Mot de passe réinitialisé avec succès"))
}

#[derive(Deserialize)]
struct ProfileBody {
    nom: Option<String>,
    prenom: Option<String>,
    email: Option<String>,
    telephone: Option<String>,
    adresse: Option<String>,
}

async fn update_profile(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<ProfileBody>,
) -> Reply {
    let mut t = db.lock();
    injected_failure(&t, "clients/profile")?;
    let id = current_client(&t, &headers)?;

    let email = body
        .email
        .map(|e| Email::parse(&e))
        .transpose()
        .map_err(|_| Failure(StatusCode::BAD_REQUEST, Some("Email invalide")))?;

    let client = t.client_mut(id).ok_or(UNAUTHENTICATED)?;
    let profile = &mut client.profile;
    if let Some(nom) = body.nom {
        profile.nom = nom;
    }
    if let Some(prenom) = body.prenom {
        profile.prenom = prenom;
    }
    if let Some(email) = email {
        profile.email = email;
    }
    if body.telephone.is_some() {
        profile.telephone = body.telephone;
    }
    if body.adresse.is_some() {
        profile.adresse = body.adresse;
    }
    Ok(message("Profil mis à jour avec succès"))
}

#[derive(Deserialize)]
struct PasswordBody {
    current_password: String,
    new_password: String,
}

async fn change_password(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<PasswordBody>,
) -> Reply {
    let mut t = db.lock();
    injected_failure(&t, "clients/password")?;
    let id = current_client(&t, &headers)?;

    let client = t.client_mut(id).ok_or(UNAUTHENTICATED)?;
    if client.password != body.current_password {
        return Err(Failure(
            StatusCode::BAD_REQUEST,
            Some("Mot de passe actuel incorrect"),
        ));
    }
    client.password = body.new_password;
    Ok(message("Mot de passe modifié avec succès"))
}

async fn my_reservations(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let t = db.lock();
    injected_failure(&t, "reservations/mine")?;
    let id = current_client(&t, &headers)?;

    let mine: Vec<_> = t
        .reservations
        .iter()
        .filter(|(owner, _)| *owner == id)
        .map(|(_, r)| reservation_row(r))
        .collect();
    Ok(Json(mine).into_response())
}

async fn services(State(db): State<Db>) -> Reply {
    let mut t = db.lock();
    injected_failure(&t, "services")?;
    t.services_hits += 1;
    let rows: Vec<_> = t.services.iter().map(service_row).collect();
    Ok(Json(rows).into_response())
}

/// `DATE` column as a UTC+1 database server's local midnight in UTC.
fn reservation_row(reservation: &Reservation) -> serde_json::Value {
    let mut row = json!(reservation);
    let eve = reservation.date_reservation - TimeDelta::days(1);
    row["date_reservation"] = json!(eve.format("%Y-%m-%dT23:00:00.000Z").to_string());
    row
}

/// `actif` as a `TINYINT(1)` column.
fn service_row(service: &SalonService) -> serde_json::Value {
    let mut row = json!(service);
    row["actif"] = json!(i32::from(service.actif));
    row
}
