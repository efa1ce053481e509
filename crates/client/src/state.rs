//! Services shared by the presentation layer.

use std::sync::Arc;

use crate::api::HttpApiClient;
use crate::catalog::ServiceCatalog;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::session::SessionStore;

/// Everything a view needs, constructed once at startup.
///
/// This struct is cheaply cloneable via `Arc`. The session store and the
/// catalog share one HTTP client, so they share its session cookie.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    session: SessionStore<HttpApiClient>,
    catalog: ServiceCatalog<HttpApiClient>,
}

impl AppState {
    /// Create the application state. The session starts `Unknown`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = HttpApiClient::new(&config.api)?;
        let session = SessionStore::new(api.clone());
        let catalog = ServiceCatalog::new(api, config.catalog_ttl);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                catalog,
            }),
        })
    }

    /// Create the application state and run the initial authentication
    /// check.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built. A failed check
    /// is not an error; the session is then `Anonymous`.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let state = Self::new(config)?;
        state.session().check_auth_status().await;
        Ok(state)
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the session state container.
    #[must_use]
    pub fn session(&self) -> &SessionStore<HttpApiClient> {
        &self.inner.session
    }

    /// Get a reference to the services catalog.
    #[must_use]
    pub fn catalog(&self) -> &ServiceCatalog<HttpApiClient> {
        &self.inner.catalog
    }
}
