//! Retrieve command - prints the grounded prompt as JSON

use super::RetrieveArgs;
use crate::config::AppConfig;

pub async fn run(config: &AppConfig, args: RetrieveArgs) -> anyhow::Result<()> {
    let state = crate::create_app_state_with_config(config).await?;
    let query = args.query.join(" ");

    let grounded = state
        .retrieval
        .retrieve(&args.name, args.source_type, &query)
        .await?;

    println!("{}", serde_json::to_string_pretty(&grounded)?);

    Ok(())
}
