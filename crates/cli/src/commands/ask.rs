//! `beatline ask` - answer a question grounded in retrieved content.
//!
//! Stands in for the website's chat route: retrieve context (possibly
//! empty), then hand context plus question to the generation chain.

use beatline_core::{AppResult, RagConfig};
use beatline_llm::{build_prompt, create_generator, TextGenerator};
use beatline_retrieval::{create_provider, Retriever};
use clap::Args;

/// Ask a question against the indexed content.
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    question: String,

    /// Number of context chunks to retrieve
    #[arg(short, long)]
    top_k: Option<usize>,

    /// Print the retrieved context instead of generating an answer
    #[arg(long)]
    context_only: bool,
}

impl AskCommand {
    pub async fn execute(self, config: &RagConfig) -> AppResult<()> {
        let embedder = create_provider(&config.embedding)?;
        let retriever = Retriever::new(config.clone(), embedder);

        let k = self.top_k.unwrap_or(config.top_k);
        let context = retriever.retrieve(&self.question, k).await;

        if context.is_empty() {
            tracing::info!("No context retrieved; answering ungrounded");
        }

        if self.context_only {
            println!("{}", context);
            return Ok(());
        }

        let generator = create_generator(&config.generation);
        let prompt = build_prompt(&self.question, &context);
        let answer = generator.generate(&prompt).await?;

        println!("{}", answer);
        Ok(())
    }
}
