//! `beatline index` - offline store build.

use beatline_core::{AppResult, RagConfig};
use beatline_retrieval::{build_index, create_provider};
use clap::Args;

/// Build the vector store from all configured sources.
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// Content roots to index (overrides configured roots)
    #[arg(short, long)]
    root: Vec<std::path::PathBuf>,

    /// Also fetch this live site URL
    #[arg(long)]
    site_url: Option<String>,
}

impl IndexCommand {
    pub async fn execute(self, config: &RagConfig) -> AppResult<()> {
        let mut config = config.clone();
        if !self.root.is_empty() {
            config.content_roots = self.root;
        }
        if self.site_url.is_some() {
            config.site_url = self.site_url;
        }

        let embedder = create_provider(&config.embedding)?;
        let stats = build_index(&config, embedder).await?;

        println!("{}", serde_json::to_string_pretty(&stats)?);
        Ok(())
    }
}
