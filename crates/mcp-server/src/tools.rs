//! MCP tools exposing Ghost Security findings and repositories.

use crate::shape::shape_response;
use ghostsec_client::{
    CastFilter, EndpointsQuery, FindingsQuery, GhostClient, ReposQuery, ResponseMode, SortField,
    SortOrder,
};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, ErrorCode, Implementation, ServerCapabilities, ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Ghost Security MCP service.
#[derive(Clone)]
pub struct GhostSecurityService {
    client: Arc<GhostClient>,
    /// Configured repository scope; when set, listing tools operate on this
    /// repository and `repo_id` arguments become optional.
    repo_id: Option<String>,
    tool_router: ToolRouter<Self>,
}

impl GhostSecurityService {
    pub fn new(client: GhostClient, repo_id: Option<String>) -> Self {
        Self {
            client: Arc::new(client),
            repo_id,
            tool_router: Self::tool_router(),
        }
    }

    fn resolve_repo_id(&self, requested: Option<String>) -> Result<String, McpError> {
        self.repo_id.clone().or(requested).ok_or_else(|| {
            McpError::new(
                ErrorCode::INVALID_PARAMS,
                "Repository ID is required. Provide repo_id or configure GHOST_SECURITY_REPO_ID.",
                None,
            )
        })
    }

    /// Shape a client outcome into a single JSON text block. Client errors
    /// become tool-execution failures; they never crash the server.
    fn reply(result: ghostsec_client::Result<Value>) -> Result<CallToolResult, McpError> {
        match result {
            Ok(body) => Ok(CallToolResult::success(vec![Content::text(shape_response(
                body,
            ))])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Error: {e}"
            ))])),
        }
    }
}

// ============================================================================
// Tool Input Schemas
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFindingsRequest {
    #[schemars(description = "Pagination cursor")]
    pub cursor: Option<String>,

    #[schemars(description = "Sort field")]
    pub sort: Option<SortField>,

    #[schemars(description = "Sort order")]
    pub order: Option<SortOrder>,

    #[schemars(description = "Page size (1-1000)")]
    pub size: Option<u32>,

    #[schemars(description = "Filter by finding status")]
    pub status: Option<String>,

    #[schemars(
        description = "Response mode: summary (lightweight), detailed (full), or count (statistics only)"
    )]
    pub mode: Option<ResponseMode>,

    #[schemars(description = "Specific fields to include in response (works with summary mode)")]
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CountFindingsRequest {
    #[schemars(description = "Sort field")]
    pub sort: Option<SortField>,

    #[schemars(description = "Sort order")]
    pub order: Option<SortOrder>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFindingRequest {
    #[schemars(description = "Finding ID")]
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateFindingStatusRequest {
    #[schemars(description = "Finding ID")]
    pub id: String,

    #[schemars(description = "New status for the finding")]
    pub status: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRepositoriesRequest {
    #[schemars(description = "Filter by scanning support")]
    pub cast: Option<CastFilter>,

    #[schemars(description = "Pagination cursor")]
    pub cursor: Option<String>,

    #[schemars(description = "Sort field")]
    pub sort: Option<SortField>,

    #[schemars(description = "Sort order")]
    pub order: Option<SortOrder>,

    #[schemars(description = "Page size (1-1000)")]
    pub size: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRepositoryRequest {
    #[schemars(description = "Repository ID")]
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRepositoryEndpointsRequest {
    #[schemars(description = "Repository ID (optional when GHOST_SECURITY_REPO_ID is configured)")]
    pub repo_id: Option<String>,

    #[schemars(description = "Pagination cursor")]
    pub cursor: Option<String>,

    #[schemars(description = "Page size (1-1000)")]
    pub size: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRepositoryFindingsRequest {
    #[schemars(description = "Repository ID (optional when GHOST_SECURITY_REPO_ID is configured)")]
    pub repo_id: Option<String>,

    #[schemars(description = "Pagination cursor")]
    pub cursor: Option<String>,

    #[schemars(description = "Sort field")]
    pub sort: Option<SortField>,

    #[schemars(description = "Sort order")]
    pub order: Option<SortOrder>,

    #[schemars(description = "Page size (1-1000)")]
    pub size: Option<u32>,

    #[schemars(
        description = "Response mode: summary (lightweight), detailed (full), or count (statistics only)"
    )]
    pub mode: Option<ResponseMode>,

    #[schemars(description = "Specific fields to include in response (works with summary mode)")]
    pub fields: Option<Vec<String>>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl GhostSecurityService {
    /// List security findings.
    #[tool(
        description = "Get security findings with optional filtering and pagination. Use mode=count for statistics instead of records."
    )]
    pub async fn get_findings(
        &self,
        Parameters(request): Parameters<GetFindingsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let query = FindingsQuery {
            cursor: request.cursor,
            sort: request.sort,
            order: request.order,
            size: request.size,
            status: request.status,
            mode: request.mode.unwrap_or_default(),
            fields: request.fields,
            ..Default::default()
        };

        let result = match &self.repo_id {
            Some(repo_id) => self.client.get_repository_findings(repo_id, &query).await,
            None => self.client.get_findings(&query).await,
        };
        Self::reply(result)
    }

    /// Count findings with grouped statistics.
    #[tool(description = "Get count and statistics of security findings")]
    pub async fn count_findings(
        &self,
        Parameters(request): Parameters<CountFindingsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let query = FindingsQuery {
            sort: request.sort,
            order: request.order,
            mode: ResponseMode::Count,
            ..Default::default()
        };

        let result = match &self.repo_id {
            Some(repo_id) => self.client.get_repository_findings(repo_id, &query).await,
            None => self.client.count_findings(&query).await,
        };
        Self::reply(result)
    }

    /// Fetch one finding by id.
    #[tool(description = "Get a specific security finding by ID")]
    pub async fn get_finding(
        &self,
        Parameters(request): Parameters<GetFindingRequest>,
    ) -> Result<CallToolResult, McpError> {
        Self::reply(self.client.get_finding(&request.id).await)
    }

    /// Update a finding's status.
    #[tool(description = "Update the status of a security finding")]
    pub async fn update_finding_status(
        &self,
        Parameters(request): Parameters<UpdateFindingStatusRequest>,
    ) -> Result<CallToolResult, McpError> {
        Self::reply(
            self.client
                .update_finding_status(&request.id, &request.status)
                .await,
        )
    }

    /// List repositories, or return the configured repository when scoped.
    #[tool(description = "Get repositories with optional filtering and pagination")]
    pub async fn get_repositories(
        &self,
        Parameters(request): Parameters<GetRepositoriesRequest>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(repo_id) = &self.repo_id {
            let result = self
                .client
                .get_repository(repo_id)
                .await
                .map(|repo| json!({"items": [repo], "has_more": false}));
            return Self::reply(result);
        }

        let query = ReposQuery {
            cursor: request.cursor,
            sort: request.sort,
            order: request.order,
            size: request.size,
            cast: request.cast,
        };
        Self::reply(self.client.get_repositories(&query).await)
    }

    /// Fetch one repository by id.
    #[tool(description = "Get a specific repository by ID")]
    pub async fn get_repository(
        &self,
        Parameters(request): Parameters<GetRepositoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        Self::reply(self.client.get_repository(&request.id).await)
    }

    /// List endpoints discovered for a repository.
    #[tool(description = "Get endpoints for a specific repository")]
    pub async fn get_repository_endpoints(
        &self,
        Parameters(request): Parameters<GetRepositoryEndpointsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let repo_id = self.resolve_repo_id(request.repo_id)?;
        let query = EndpointsQuery {
            cursor: request.cursor,
            size: request.size,
        };
        Self::reply(self.client.get_repository_endpoints(&repo_id, &query).await)
    }

    /// List findings scoped to a repository.
    #[tool(description = "Get security findings for a specific repository")]
    pub async fn get_repository_findings(
        &self,
        Parameters(request): Parameters<GetRepositoryFindingsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let repo_id = self.resolve_repo_id(request.repo_id)?;
        let query = FindingsQuery {
            cursor: request.cursor,
            sort: request.sort,
            order: request.order,
            size: request.size,
            mode: request.mode.unwrap_or_default(),
            fields: request.fields,
            ..Default::default()
        };
        Self::reply(self.client.get_repository_findings(&repo_id, &query).await)
    }
}

#[tool_handler]
impl ServerHandler for GhostSecurityService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Ghost Security exposes security findings and repositories. Use 'get_findings' \
                 to list findings (mode=summary keeps responses small), 'count_findings' for \
                 grouped statistics, and the repository tools to explore repos and their \
                 endpoints. Large listings are truncated; paginate with size/cursor for more."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
