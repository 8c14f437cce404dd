pub mod engine;
pub mod lookup;
pub mod pipeline;
pub mod pricing;
pub mod report;
pub mod simulation;

pub use crate::domain::model::{
    Catalog, PriceQuote, PricingParams, PricingRequest, QuoteOutcome, QuoteResult,
    UnresolvedEntry,
};
pub use crate::domain::ports::{CatalogProvider, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
