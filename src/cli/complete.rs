//! Complete command - prints the knowledge base names matching a `/` input

use super::CompleteArgs;
use crate::config::AppConfig;

pub async fn run(config: &AppConfig, args: CompleteArgs) -> anyhow::Result<()> {
    let state = crate::create_app_state_with_config(config).await?;

    for name in state.store.complete(&args.input).await? {
        println!("{}", name);
    }

    Ok(())
}
