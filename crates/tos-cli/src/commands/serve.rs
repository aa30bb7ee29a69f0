use std::sync::Arc;

use anyhow::Result;
use tos_config::Config;
use tos_server::AnalysisServer;

pub async fn handle(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let pipeline = Arc::new(super::build_pipeline(config)?);
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    AnalysisServer::serve(pipeline, &host, port, config.server.max_upload_bytes).await
}
