//! `reqwest` implementation of [`SalonApi`].

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use salon_core::{Reservation, SalonService};

use super::types::{ErrorBody, ForgotPasswordRequest, ResetPasswordRequest};
use super::{
    ApiError, AuthCheck, ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    ProfileUpdate, RegisterRequest, RegisterResponse, ResetTokenCheck, SalonApi,
};
use crate::config::ApiConfig;

/// HTTP client for the salon REST API.
///
/// The server keeps the session in a cookie; the client's cookie store
/// carries it between calls, so one `HttpApiClient` is one browser-like
/// session. Clones share the cookie store.
#[derive(Clone)]
pub struct HttpApiClient {
    inner: Arc<HttpApiClientInner>,
}

struct HttpApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL the routes are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build a request for a route relative to the base URL.
    fn request(&self, method: Method, route: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(route)?;
        Ok(self.inner.client.request(method, url))
    }

    /// Build a request for `route/{token}`, percent-encoding the token.
    fn request_with_token(
        &self,
        method: Method,
        route: &str,
        token: &str,
    ) -> Result<RequestBuilder, ApiError> {
        let mut url = self.inner.base_url.join(route)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(token);
        Ok(self.inner.client.request(method, url))
    }

    /// Send a request and decode the JSON success body.
    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check_status(request.send().await?).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Map a non-success response to `ApiError::Status`.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message);
        debug!(status = status.as_u16(), ?message, "API returned an error status");

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl SalonApi for HttpApiClient {
    #[instrument(skip(self))]
    async fn check_auth(&self) -> Result<AuthCheck, ApiError> {
        Self::send(self.request(Method::GET, "auth/check")?).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        Self::send(self.request(Method::POST, "auth/login")?.json(request)).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        Self::send(self.request(Method::POST, "auth/register")?.json(request)).await
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<(), ApiError> {
        let response = self.request(Method::POST, "auth/logout")?.send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, update))]
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<MessageResponse, ApiError> {
        Self::send(self.request(Method::PUT, "clients/profile")?.json(update)).await
    }

    #[instrument(skip(self, request))]
    async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        Self::send(self.request(Method::PUT, "clients/password")?.json(request)).await
    }

    #[instrument(skip(self, token))]
    async fn verify_email(&self, token: &str) -> Result<MessageResponse, ApiError> {
        Self::send(self.request_with_token(Method::GET, "auth/verify-email/", token)?).await
    }

    #[instrument(skip(self))]
    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let body = ForgotPasswordRequest { email };
        Self::send(self.request(Method::POST, "auth/forgot-password")?.json(&body)).await
    }

    #[instrument(skip(self, token, new_password))]
    async fn reset_password(
        &self,
        token: &str,
        new_password: &SecretString,
    ) -> Result<MessageResponse, ApiError> {
        let body = ResetPasswordRequest {
            token,
            new_password: new_password.clone(),
        };
        Self::send(self.request(Method::POST, "auth/reset-password")?.json(&body)).await
    }

    #[instrument(skip(self, token))]
    async fn verify_reset_token(&self, token: &str) -> Result<ResetTokenCheck, ApiError> {
        Self::send(self.request_with_token(Method::GET, "auth/verify-reset-token/", token)?).await
    }

    #[instrument(skip(self))]
    async fn my_reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        Self::send(self.request(Method::GET, "reservations/mine")?).await
    }

    #[instrument(skip(self))]
    async fn services(&self) -> Result<Vec<SalonService>, ApiError> {
        Self::send(self.request(Method::GET, "services")?).await
    }
}
