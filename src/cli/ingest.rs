//! Ingest command

use anyhow::bail;

use super::IngestArgs;
use crate::config::AppConfig;

/// Ingest every path; fails when any file was not ingested
pub async fn run(config: &AppConfig, args: IngestArgs) -> anyhow::Result<()> {
    let state = crate::create_app_state_with_config(config).await?;
    let batch = state.ingestion.ingest_paths(&args.paths).await;

    for result in &batch.succeeded {
        println!(
            "ingested {} ({} chunks, {} dimensions)",
            result.name, result.chunks_created, result.dimensions
        );
    }

    for failure in &batch.failed {
        eprintln!("failed {}: {}", failure.path, failure.message);
    }

    if !batch.all_succeeded() {
        bail!("{} of {} files failed", batch.failed.len(), batch.total());
    }

    Ok(())
}
