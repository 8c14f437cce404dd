pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::{LocalStorage, SourceCatalogProvider};
pub use crate::core::{engine::QuoteEngine, pipeline::QuotePipeline};
pub use crate::domain::model::{Origin, PricingParams, PricingRequest, SimulationParams};
pub use crate::utils::error::{PricingError, Result};
