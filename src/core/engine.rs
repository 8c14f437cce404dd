use crate::core::{Pipeline, QuoteOutcome};
use crate::utils::error::Result;

pub struct QuoteEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> QuoteEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<QuoteOutcome> {
        tracing::info!("Starting quote process...");

        // Extract
        let catalog = self.pipeline.extract().await?;
        tracing::info!("Loaded {} catalog ({} parts)", catalog.origin(), catalog.len());

        // Transform
        let result = self.pipeline.transform(catalog).await?;
        tracing::info!(
            "Priced {} parts, {} not found or zero cost",
            result.priced.len(),
            result.unresolved.len()
        );

        // Load
        let output_path = self.pipeline.load(&result).await?;
        tracing::info!("Reports saved to: {}", output_path);

        Ok(QuoteOutcome {
            result,
            output_path,
        })
    }
}
