use std::path::PathBuf;

use anyhow::{Context, Result};
use tos_config::Config;
use tos_sources::{InputForm, Upload};

pub async fn handle(
    config: &Config,
    text: Option<String>,
    url: Option<String>,
    file: Option<PathBuf>,
    pretty: bool,
) -> Result<()> {
    let file = match file {
        Some(path) => Some(read_upload(path).await?),
        None => None,
    };

    let document = InputForm { text, url, file }.into_document()?;
    let pipeline = super::build_pipeline(config)?;
    let outcome = pipeline.process(&document).await?;

    if outcome.truncated {
        eprintln!("warning: document is very long; parts of it may not be reflected in the report.");
    }

    let output = if pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    println!("{}", output);

    Ok(())
}

async fn read_upload(path: PathBuf) -> Result<Upload> {
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read file {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(Upload { filename, bytes })
}
