//! Services listing cache over HTTP.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use salon_client::ServiceCatalog;
use salon_core::ServiceCategory;
use salon_integration_tests::StubApi;

#[tokio::test]
async fn test_listing_is_cached_until_invalidated() {
    let stub = StubApi::start().await;
    let catalog = ServiceCatalog::new(stub.client(), Duration::from_secs(300));

    let services = catalog.services().await.unwrap();
    assert_eq!(services.len(), 3);
    catalog.by_category().await.unwrap();
    assert_eq!(stub.services_hits(), 1);

    catalog.invalidate().await;
    catalog.services().await.unwrap();
    assert_eq!(stub.services_hits(), 2);
}

#[tokio::test]
async fn test_listing_expires_after_ttl() {
    let stub = StubApi::start().await;
    let catalog = ServiceCatalog::new(stub.client(), Duration::from_millis(50));

    catalog.services().await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    catalog.services().await.unwrap();

    assert_eq!(stub.services_hits(), 2);
}

#[tokio::test]
async fn test_grouped_by_category() {
    let stub = StubApi::start().await;
    let catalog = ServiceCatalog::new(stub.client(), Duration::from_secs(300));

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
    // The inactive service (`"actif": 0`) is not listed
    assert_eq!(grouped.get(&ServiceCategory::Ongles).map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_failed_fetch_is_retried() {
    let stub = StubApi::start().await;
    let catalog = ServiceCatalog::new(stub.client(), Duration::from_secs(300));

    stub.fail("services", 502);
    let err = catalog.services().await.unwrap_err();
    assert_eq!(err.status(), Some(502));

    stub.clear_failures();
    assert_eq!(catalog.services().await.unwrap().len(), 3);
}
