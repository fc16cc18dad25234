//! Builds the effective [`ModelCatalog`] from configuration

use crate::config::{ConfigValidationError, FileCatalogConfig};
use battle_domain::{ModelCatalog, Provider};
use tracing::{debug, info};

/// Resolve the catalog the server offers.
///
/// Starts from the built-in list (unless disabled), layers the configured
/// extra models on top, then drops providers without credentials when
/// `require_credentials` is set.
pub fn build_catalog(
    config: &FileCatalogConfig,
    available: &[Provider],
) -> Result<ModelCatalog, ConfigValidationError> {
    let mut catalog = if config.include_builtin {
        ModelCatalog::builtin()
    } else {
        ModelCatalog::empty()
    };

    for model in &config.models {
        let (provider, info) = model.parse()?;
        debug!("Catalog: adding {}/{}", provider, info.model_id);
        catalog.insert(provider, info);
    }

    if config.require_credentials {
        catalog.retain_providers(available);
    }

    info!(
        "Model catalog: {} provider(s) [{}]",
        catalog.providers().len(),
        catalog
            .providers()
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(catalog)
}
