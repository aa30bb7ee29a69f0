pub mod analyze;
pub mod config;
pub mod serve;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tos_analyzer::{ChunkAnalyzer, CompletionSettings, HttpCompletionClient};
use tos_config::Config;
use tos_engine::{Pipeline, PipelineOptions};
use tos_sources::{FetchOptions, SourceHandlerRegistry};

/// Wire the pipeline from config: HTTP completion client, source handlers, limits
pub fn build_pipeline(config: &Config) -> Result<Pipeline> {
    let settings = CompletionSettings {
        endpoint: config.completion.endpoint.clone(),
        model: config.completion.model.clone(),
        api_key: config.api_key()?,
        timeout: Duration::from_secs(config.completion.timeout_secs),
    };
    let client = HttpCompletionClient::new(settings).context("Failed to create completion client")?;
    tracing::debug!(model = client.model(), "completion client ready");

    let sources = SourceHandlerRegistry::new(FetchOptions {
        timeout: Duration::from_secs(config.fetch.timeout_secs),
        user_agent: config.fetch.user_agent.clone(),
    })?;

    let options = PipelineOptions {
        max_chunk_chars: config.pipeline.max_chunk_chars,
        max_concurrency: config.pipeline.max_concurrency,
        soft_limit_chars: config.pipeline.soft_limit_chars,
    };

    Ok(Pipeline::new(
        sources,
        ChunkAnalyzer::new(Arc::new(client)),
        options,
    )?)
}
