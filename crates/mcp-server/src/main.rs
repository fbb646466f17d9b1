//! Ghost Security MCP Server
//!
//! Exposes Ghost Security findings and repositories to AI agents via the
//! MCP protocol.
//!
//! ## Tools
//!
//! - `get_findings` - List security findings (summary, detailed, or count mode)
//! - `count_findings` - Grouped statistics over findings
//! - `get_finding` / `update_finding_status` - Single-finding operations
//! - `get_repositories` / `get_repository` - Repository listings and lookups
//! - `get_repository_endpoints` / `get_repository_findings` - Repository-scoped views
//!
//! ## Configuration
//!
//! - `GHOST_SECURITY_API_KEY` (required; or first positional argument)
//! - `GHOST_SECURITY_BASE_URL` (optional API base override)
//! - `GHOST_SECURITY_REPO_ID` (optional; scopes all listings to one repository)
//! - `GHOST_SECURITY_API_VERSION` (v1 or v2, default v2)

use anyhow::{Context, Result};
use rmcp::transport::stdio;
use rmcp::ServiceExt;

mod shape;
mod tools;

use ghostsec_client::{GhostClient, GhostConfig};
use tools::GhostSecurityService;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure logging to stderr only (stdout is for MCP protocol)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = GhostConfig::from_env(&args).context(
        "Ghost Security API key is required. Set GHOST_SECURITY_API_KEY or pass it as the \
         first argument.",
    )?;
    let repo_id = config.repo_id.clone();
    if let Some(repo_id) = &repo_id {
        log::info!("scoping all listing operations to repository {repo_id}");
    }

    let client = GhostClient::new(&config).context("Failed to build HTTP client")?;

    log::info!("Starting Ghost Security MCP server");

    let service = GhostSecurityService::new(client, repo_id);
    let server = service.serve(stdio()).await?;

    server.waiting().await?;

    log::info!("Ghost Security MCP server stopped");
    Ok(())
}
