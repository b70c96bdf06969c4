//! Gateway service command-line entry point.

use anyhow::Result;
use clap::Parser;

use gateway_service::{options::CliOptions, start_service};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let cli_opts = CliOptions::parse();

    // Convert to service options
    let service_opts = cli_opts
        .into_service_options()
        .map_err(|e| anyhow::anyhow!("Failed to parse options: {}", e))?;

    start_service(service_opts).await?;

    Ok(())
}
