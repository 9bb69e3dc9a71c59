//! `beatline stats` - store statistics.

use beatline_core::{AppResult, RagConfig};
use beatline_retrieval::{create_provider, Retriever};
use clap::Args;

/// Show load status and counts for the persisted store.
#[derive(Args, Debug)]
pub struct StatsCommand {}

impl StatsCommand {
    pub async fn execute(self, config: &RagConfig) -> AppResult<()> {
        let embedder = create_provider(&config.embedding)?;
        let retriever = Retriever::new(config.clone(), embedder);

        let stats = retriever.stats().await;
        println!("{}", serde_json::to_string_pretty(&stats)?);
        Ok(())
    }
}
