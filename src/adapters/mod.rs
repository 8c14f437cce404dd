// Adapters layer: concrete implementations for external systems (catalog sources, storage).

pub mod catalog;
pub mod storage;

pub use catalog::{parse_catalog, SourceCatalogProvider};
pub use storage::LocalStorage;
