//! Serve command: run the MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use dupmark_core::Stopwords;

use crate::server::DupmarkServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    // No subcommand-specific arguments; configuration comes from config files
}

/// Serve MCP requests over stdin/stdout until the client disconnects.
///
/// Logging must stay off stdout here: stdout carries the protocol.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    stopwords: Stopwords,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    info!("starting MCP server on stdio");

    let service = DupmarkServer::new(stopwords, max_input_bytes)
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;

    service
        .waiting()
        .await
        .context("MCP server terminated abnormally")?;

    info!("MCP server stopped");
    Ok(())
}
