use crate::core::lookup;
use crate::core::report::{write_reports, OutputFormat};
use crate::core::{Catalog, CatalogProvider, Pipeline, PricingRequest, QuoteResult, Storage};
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::Validate;

/// 一次報價請求：讀取目錄、計算、寫出報表
pub struct QuotePipeline<S: Storage, P: CatalogProvider> {
    storage: S,
    provider: P,
    request: PricingRequest,
    formats: Vec<OutputFormat>,
    output_path: String,
}

impl<S: Storage, P: CatalogProvider> QuotePipeline<S, P> {
    pub fn new(
        storage: S,
        provider: P,
        request: PricingRequest,
        formats: Vec<OutputFormat>,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            provider,
            request,
            formats,
            output_path: output_path.into(),
        }
    }

    pub fn request(&self) -> &PricingRequest {
        &self.request
    }
}

#[async_trait::async_trait]
impl<S: Storage, P: CatalogProvider> Pipeline for QuotePipeline<S, P> {
    async fn extract(&self) -> Result<Catalog> {
        // 空請求不需要讀取目錄
        if self.request.identifiers.is_empty() {
            return Err(PricingError::EmptyRequest);
        }
        self.request.params.validate()?;

        self.provider.fetch(self.request.origin).await
    }

    async fn transform(&self, catalog: Catalog) -> Result<QuoteResult> {
        lookup::quote(&catalog, &self.request.identifiers, &self.request.params)
    }

    async fn load(&self, result: &QuoteResult) -> Result<String> {
        if self.formats.is_empty() {
            tracing::debug!("No output formats configured, skipping reports");
            return Ok(self.output_path.clone());
        }

        let written = write_reports(&self.storage, result, &self.formats).await?;
        tracing::debug!("Wrote {} report files", written.len());
        Ok(self.output_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Origin, PartRecord, PricingParams};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                PricingError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl CatalogProvider for MockProvider {
        async fn fetch(&self, origin: Origin) -> Result<Catalog> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Catalog::new(
                origin,
                vec![
                    PartRecord {
                        identifier: "1001".to_string(),
                        base_cost: Some(100.0),
                    },
                    PartRecord {
                        identifier: "1002".to_string(),
                        base_cost: None,
                    },
                ],
            ))
        }
    }

    fn pipeline(
        identifiers: &[&str],
        params: PricingParams,
        formats: Vec<OutputFormat>,
    ) -> (QuotePipeline<MockStorage, MockProvider>, MockStorage, Arc<AtomicUsize>) {
        let storage = MockStorage::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = MockProvider {
            calls: calls.clone(),
        };
        let request = PricingRequest {
            identifiers: identifiers.iter().map(|s| s.to_string()).collect(),
            origin: Origin::Nmex,
            params,
        };
        (
            QuotePipeline::new(storage.clone(), provider, request, formats, "test_output"),
            storage,
            calls,
        )
    }

    #[tokio::test]
    async fn test_extract_empty_request_skips_fetch() {
        let (pipeline, _, calls) = pipeline(&[], PricingParams::default(), vec![]);

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, PricingError::EmptyRequest));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_params() {
        let params = PricingParams::from_percent(65.0, 100.0);
        let (pipeline, _, calls) = pipeline(&["1001"], params, vec![]);

        assert!(pipeline.extract().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_full_pipeline_writes_reports() {
        let (pipeline, storage, calls) = pipeline(
            &["1001", "1002", "7777"],
            PricingParams::default(),
            vec![OutputFormat::Csv, OutputFormat::Json],
        );

        let catalog = pipeline.extract().await.unwrap();
        let result = pipeline.transform(catalog).await.unwrap();
        let output = pipeline.load(&result).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(output, "test_output");
        assert_eq!(result.priced.len(), 1);
        assert_eq!(result.unresolved.len(), 2);

        let quotes = String::from_utf8(storage.get_file("quotes.csv").await.unwrap()).unwrap();
        assert!(quotes.starts_with("NP,FOB,PVP Maritimo,PVP Aereo\n1001,100.0,2579,"));

        let unresolved =
            String::from_utf8(storage.get_file("unresolved.csv").await.unwrap()).unwrap();
        assert_eq!(unresolved, "NP,FOB\n1002,0.0\n7777,0.0\n");

        assert!(storage.get_file("quote_report.json").await.is_some());
        assert!(storage.get_file("quotes.tsv").await.is_none());
    }
}
