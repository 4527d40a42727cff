//! List command - prints one knowledge base name per line

use crate::config::AppConfig;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let state = crate::create_app_state_with_config(config).await?;

    for name in state.store.list().await? {
        println!("{}", name);
    }

    Ok(())
}
