mod cli;
mod codegen;
mod error;
mod introspect;
mod schema;
#[cfg(test)]
mod testutil;
mod typemap;

use std::fs;

use anyhow::Result;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    tracing::debug!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&cli.connection_url())
        .await?;

    tracing::debug!("Introspecting schema {}...", cli.schema);
    let catalog = introspect::build_catalog(&pool, &cli.schema).await;
    pool.close().await;
    let catalog = catalog?;

    tracing::debug!("Found {} tables", catalog.tables.len());
    let output = codegen::generate(&catalog);

    if cli.output == "-" {
        print!("{output}");
    } else {
        fs::write(&cli.output, &output)?;
        tracing::info!("Output written to {}", cli.output);
    }

    Ok(())
}
