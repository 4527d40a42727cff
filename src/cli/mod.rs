//! CLI module for docchat-rag
//!
//! Every subcommand loads the layered configuration, initializes logging and then
//! works against the configured documents root:
//! - `list`: print every knowledge base name
//! - `complete`: print the names matching a `/`-prefixed input
//! - `ingest`: create one knowledge base per file
//! - `retrieve`: print the grounded prompt and sources for a query
//! - `serve`: run the HTTP API

pub mod complete;
pub mod ingest;
pub mod list;
pub mod retrieve;
pub mod serve;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::knowledge_base::SourceType;
use crate::infrastructure::logging;

/// docchat-rag - chat with your documents
#[derive(Parser)]
#[command(name = "docchat-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Extra configuration file layered over config/default and config/local
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List knowledge bases
    List,

    /// Complete a knowledge base name typed after `/`
    Complete(CompleteArgs),

    /// Ingest files, one knowledge base per file
    Ingest(IngestArgs),

    /// Build a grounded prompt for a query against one knowledge base
    Retrieve(RetrieveArgs),

    /// Run the HTTP API server
    Serve,
}

#[derive(Args)]
pub struct CompleteArgs {
    /// Chat input, e.g. `/no`
    pub input: String,
}

#[derive(Args)]
pub struct IngestArgs {
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Args)]
pub struct RetrieveArgs {
    /// Knowledge base name, i.e. the ingested file name
    pub name: String,

    /// pdf, docx, pptx or txt
    pub source_type: SourceType,

    #[arg(required = true, trailing_var_arg = true)]
    pub query: Vec<String>,
}

/// Load `.env`, the layered configuration and the tracing subscriber
pub fn bootstrap(config_file: Option<&str>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load_with(config_file)?;
    logging::init_logging(&config.logging)?;

    Ok(config)
}
