//! Services listing, cached.
//!
//! The services page is read far more often than the salon edits its
//! offering, so the active-services list is cached with `moka` and refetched
//! once the TTL expires.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use salon_core::{SalonService, ServiceCategory};

use crate::api::{ApiError, SalonApi};

const ACTIVE_SERVICES_KEY: &str = "services:active";

/// Cached view of the salon's active services.
pub struct ServiceCatalog<A> {
    inner: Arc<ServiceCatalogInner<A>>,
}

impl<A> Clone for ServiceCatalog<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ServiceCatalogInner<A> {
    api: A,
    cache: Cache<&'static str, Arc<Vec<SalonService>>>,
}

impl<A: SalonApi> ServiceCatalog<A> {
    /// Create a catalog whose entries expire after `ttl`.
    #[must_use]
    pub fn new(api: A, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(16).time_to_live(ttl).build();

        Self {
            inner: Arc::new(ServiceCatalogInner { api, cache }),
        }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.inner.api
    }

    /// Active services, in the order the API lists them.
    ///
    /// # Errors
    ///
    /// Returns the API error when the list is not cached and the fetch fails.
    /// Failures are not cached.
    #[instrument(skip(self))]
    pub async fn services(&self) -> Result<Arc<Vec<SalonService>>, ApiError> {
        if let Some(services) = self.inner.cache.get(ACTIVE_SERVICES_KEY).await {
            debug!("Cache hit for services");
            return Ok(services);
        }

        let services: Vec<_> = self
            .inner
            .api
            .services()
            .await?
            .into_iter()
            .filter(|service| service.actif)
            .collect();
        let services = Arc::new(services);

        self.inner
            .cache
            .insert(ACTIVE_SERVICES_KEY, Arc::clone(&services))
            .await;

        Ok(services)
    }

    /// Active services grouped by category, each group sorted by name.
    ///
    /// # Errors
    ///
    /// Same as [`Self::services`].
    pub async fn by_category(
        &self,
    ) -> Result<BTreeMap<ServiceCategory, Vec<SalonService>>, ApiError> {
        let services = self.services().await?;

        let mut grouped: BTreeMap<ServiceCategory, Vec<SalonService>> = BTreeMap::new();
        for service in services.iter() {
            grouped
                .entry(service.categorie)
                .or_default()
                .push(service.clone());
        }
        for group in grouped.values_mut() {
            group.sort_by(|a, b| a.nom.cmp(&b.nom));
        }

        Ok(grouped)
    }

    /// Drop the cached list so the next read refetches.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use salon_core::{Price, ServiceId};

    use super::*;
    use crate::test_support::{MockApi, status_error};

    fn service(id: i32, nom: &str, categorie: ServiceCategory, actif: bool) -> SalonService {
        SalonService {
            id: ServiceId::new(id),
            nom: nom.to_string(),
            description: None,
            categorie,
            prix: Price::from_cents(3000),
            duree: 45,
            actif,
        }
    }

    fn menu() -> Vec<SalonService> {
        vec![
            service(1, "Vernis semi-permanent", ServiceCategory::Ongles, true),
            service(2, "Épilation sourcils", ServiceCategory::Sourcils, true),
            service(3, "Beauté des pieds", ServiceCategory::Ongles, true),
            service(4, "Pose capsules", ServiceCategory::Ongles, false),
            service(5, "Soin visage", ServiceCategory::Soins, true),
        ]
    }

    fn catalog() -> ServiceCatalog<MockApi> {
        ServiceCatalog::new(MockApi::default(), Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_inactive_services_are_hidden() {
        let catalog = catalog();
        catalog.api().on_services(Ok(menu()));

        let services = catalog.services().await.unwrap();
        assert_eq!(services.len(), 4);
        assert!(services.iter().all(|s| s.actif));
    }

    #[tokio::test]
    async fn test_second_read_is_cached() {
        let catalog = catalog();
        catalog.api().on_services(Ok(menu()));

        catalog.services().await.unwrap();
        catalog.services().await.unwrap();
        assert_eq!(catalog.api().services_calls(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_refetches() {
        let catalog = catalog();
        catalog
            .api()
            .on_services(Ok(menu()))
            .on_services(Ok(vec![service(9, "Maquillage mariée", ServiceCategory::Maquillage, true)]));

        catalog.services().await.unwrap();
        catalog.invalidate().await;
        let services = catalog.services().await.unwrap();

        assert_eq!(catalog.api().services_calls(), 2);
        assert_eq!(services.len(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let catalog = catalog();
        catalog
            .api()
            .on_services(Err(status_error(503, None)))
            .on_services(Ok(menu()));

        assert!(catalog.services().await.is_err());
        assert_eq!(catalog.services().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_by_category_groups_and_sorts() {
        let catalog = catalog();
        catalog.api().on_services(Ok(menu()));

        let grouped = catalog.by_category().await.unwrap();
        let categories: Vec<_> = grouped.keys().copied().collect();
        assert_eq!(
            categories,
            vec![
                ServiceCategory::Ongles,
                ServiceCategory::Sourcils,
                ServiceCategory::Soins
            ]
        );

        let ongles: Vec<_> = grouped[&ServiceCategory::Ongles]
            .iter()
            .map(|s| s.nom.as_str())
            .collect();
        assert_eq!(ongles, vec!["Beauté des pieds", "Vernis semi-permanent"]);
    }
}
