use crate::domain::model::{Catalog, Origin, QuoteResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 一個來源目錄的位置與欄位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    pub location: String,
    pub identifier_column: String,
    pub cost_column: String,
}

pub trait ConfigProvider: Send + Sync {
    fn catalog_source(&self, origin: Origin) -> Result<CatalogSource>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn request_timeout_secs(&self) -> Option<u64>;
}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn fetch(&self, origin: Origin) -> Result<Catalog>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Catalog>;
    async fn transform(&self, catalog: Catalog) -> Result<QuoteResult>;
    async fn load(&self, result: &QuoteResult) -> Result<String>;
}
