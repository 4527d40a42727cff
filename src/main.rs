use clap::Parser;
use docchat_rag::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::bootstrap(cli.config.as_deref())?;

    match cli.command {
        Command::List => cli::list::run(&config).await,
        Command::Complete(args) => cli::complete::run(&config, args).await,
        Command::Ingest(args) => cli::ingest::run(&config, args).await,
        Command::Retrieve(args) => cli::retrieve::run(&config, args).await,
        Command::Serve => cli::serve::run(&config).await,
    }
}
