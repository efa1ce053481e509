//! Services listing.

use std::io::Write;

use salon_client::{SalonApi, ServiceCatalog};

use crate::error::CliError;
use crate::views;

/// Show active services grouped by category.
///
/// With `refresh`, the cached listing is dropped first.
pub async fn services<A: SalonApi>(
    catalog: &ServiceCatalog<A>,
    refresh: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if refresh {
        catalog.invalidate().await;
    }

    let grouped = catalog.by_category().await?;
    views::services(out, &grouped)?;
    Ok(())
}
