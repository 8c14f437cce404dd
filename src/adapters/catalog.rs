use crate::domain::model::{Catalog, Origin, PartRecord};
use crate::domain::ports::{CatalogProvider, CatalogSource, ConfigProvider, Storage};
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::is_remote_location;
use async_trait::async_trait;
use reqwest::Client;

/// 依設定讀取目錄：http(s) 走 reqwest，其餘由 Storage 讀檔
pub struct SourceCatalogProvider<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> SourceCatalogProvider<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    async fn fetch_bytes(&self, origin: Origin, location: &str) -> Result<Vec<u8>> {
        if !is_remote_location(location) {
            tracing::debug!("Reading {} catalog from file: {}", origin, location);
            return self.storage.read_file(location).await;
        }

        tracing::debug!("Requesting {} catalog from: {}", origin, location);
        let mut request = self.client.get(location.trim());
        if let Some(timeout) = self.config.request_timeout_secs() {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }

        let response = request.send().await?;
        tracing::debug!("Catalog response status: {}", response.status());

        if !response.status().is_success() {
            return Err(PricingError::CatalogUnavailable {
                origin: origin.label().to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl<S: Storage, C: ConfigProvider> CatalogProvider for SourceCatalogProvider<S, C> {
    async fn fetch(&self, origin: Origin) -> Result<Catalog> {
        let source = self.config.catalog_source(origin)?;
        let bytes = self.fetch_bytes(origin, &source.location).await?;
        let catalog = parse_catalog(&bytes, origin, &source)?;
        tracing::info!("📦 Loaded {} catalog with {} parts", origin, catalog.len());
        Ok(catalog)
    }
}

/// 將 CSV 內容轉為目錄，只取識別碼與成本兩欄
pub fn parse_catalog(data: &[u8], origin: Origin, source: &CatalogSource) -> Result<Catalog> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| PricingError::MissingColumn {
                column: name.to_string(),
            })
    };
    let id_idx = column_index(&source.identifier_column)?;
    let cost_idx = column_index(&source.cost_column)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let identifier = match record.get(id_idx) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => continue,
        };

        let base_cost = match record.get(cost_idx) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => Some(value),
                _ => {
                    tracing::warn!(
                        "Unparsable cost '{}' for part {} in {} catalog",
                        raw,
                        identifier,
                        origin
                    );
                    None
                }
            },
        };

        rows.push(PartRecord {
            identifier,
            base_cost,
        });
    }

    Ok(Catalog::new(origin, rows))
}
