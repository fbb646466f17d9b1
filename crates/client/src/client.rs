//! High-level client operations over the Ghost Security API.
//!
//! Orchestrates the page fetcher, cursor walks, projection, and aggregation
//! behind the operation surface the MCP tools call. Everything here is
//! per-request: no state survives a call beyond the shared transport.

use crate::aggregate::aggregate;
use crate::config::GhostConfig;
use crate::error::Result;
use crate::fetch::{fetch_page, HttpTransport, Transport};
use crate::model::{
    EndpointsQuery, FindingsQuery, Page, ReposQuery, ResponseMode, Validation,
};
use crate::project::project_items;
use crate::schema::ApiVersion;
use crate::walk::{walk_pages, WalkPolicy};
use serde_json::{json, Value};
use std::sync::Arc;

/// Conservative per-request page size for interactive listings. Aggregation
/// walks use the larger sizes in [`WalkPolicy`] instead.
pub const INTERACTIVE_SIZE_CAP: u32 = 5;

pub struct GhostClient {
    transport: Arc<dyn Transport>,
    version: ApiVersion,
}

impl GhostClient {
    pub fn new(config: &GhostConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.base_url, &config.api_key)?;
        Ok(Self {
            transport: Arc::new(transport),
            version: config.api_version,
        })
    }

    /// Build a client over an arbitrary transport. Used by tests; also the
    /// seam for alternative transports.
    pub fn with_transport(transport: Arc<dyn Transport>, version: ApiVersion) -> Self {
        Self { transport, version }
    }

    fn clamp_listing_size(requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(INTERACTIVE_SIZE_CAP)
            .clamp(1, INTERACTIVE_SIZE_CAP)
    }

    /// One interactive listing request with the conservative size cap.
    async fn fetch_listing(
        &self,
        path: &str,
        mut query: Vec<(String, String)>,
        cursor: Option<&String>,
        size: Option<u32>,
    ) -> Result<Page> {
        query.push((
            "size".to_string(),
            Self::clamp_listing_size(size).to_string(),
        ));
        if let Some(cursor) = cursor {
            query.push(("cursor".to_string(), cursor.clone()));
        }
        fetch_page(self.transport.as_ref(), path, &query, Validation::Strict).await
    }

    /// Walk the full filtered result set and aggregate locally.
    async fn count_via_walk(&self, query: &FindingsQuery, policy: &WalkPolicy) -> Result<Value> {
        let outcome = walk_pages(
            self.transport.as_ref(),
            "/findings",
            &query.filter_pairs(),
            query.cursor.clone(),
            policy,
        )
        .await?;

        let mut counts = aggregate(&outcome.items, self.version);
        if outcome.truncated {
            counts.partial = Some(true);
        }
        Ok(serde_json::to_value(counts)?)
    }

    /// List findings in the requested mode.
    ///
    /// `count` mode walks the full result set under the wide ceiling and
    /// aggregates locally; the other modes fetch a single page and project
    /// its items, leaving the rest of the body untouched.
    pub async fn get_findings(&self, query: &FindingsQuery) -> Result<Value> {
        if query.mode == ResponseMode::Count {
            return self.count_via_walk(query, &WalkPolicy::full_listing()).await;
        }

        let page = self
            .fetch_listing(
                "/findings",
                query.filter_pairs(),
                query.cursor.as_ref(),
                query.size,
            )
            .await?;

        let items = project_items(page.items, query.mode, query.fields.as_deref(), self.version);
        let shaped = Page {
            items,
            has_more: page.has_more,
            next_cursor: page.next_cursor,
            extra: page.extra,
        };
        Ok(serde_json::to_value(shaped)?)
    }

    /// Count findings, preferring the dedicated aggregate endpoint.
    ///
    /// The endpoint's response is trusted only when it is an object carrying
    /// `total_count`, and is then returned verbatim. Any other shape, or any
    /// transport failure, silently falls back to a best-effort walk with the
    /// tight ceiling; only errors thrown by the fallback walk itself
    /// propagate.
    pub async fn count_findings(&self, query: &FindingsQuery) -> Result<Value> {
        match self
            .transport
            .get("/findings/count", &query.filter_pairs())
            .await
        {
            Ok(body)
                if body
                    .as_object()
                    .is_some_and(|obj| obj.contains_key("total_count")) =>
            {
                Ok(body)
            }
            Ok(_) => {
                log::warn!(
                    "count endpoint returned an unexpected shape; falling back to a local aggregation walk"
                );
                self.count_via_walk(query, &WalkPolicy::count_fallback()).await
            }
            Err(err) => {
                log::warn!(
                    "count endpoint unavailable ({err}); falling back to a local aggregation walk"
                );
                self.count_via_walk(query, &WalkPolicy::count_fallback()).await
            }
        }
    }

    pub async fn get_finding(&self, id: &str) -> Result<Value> {
        self.transport.get(&format!("/findings/{id}"), &[]).await
    }

    /// Single status-update passthrough. The updated record comes back
    /// unprojected.
    pub async fn update_finding_status(&self, id: &str, user_status: &str) -> Result<Value> {
        self.transport
            .patch(
                &format!("/findings/{id}"),
                json!({ "user_status": user_status }),
            )
            .await
    }

    pub async fn get_repositories(&self, query: &ReposQuery) -> Result<Value> {
        let page = self
            .fetch_listing(
                "/repos",
                query.filter_pairs(),
                query.cursor.as_ref(),
                query.size,
            )
            .await?;
        Ok(serde_json::to_value(page)?)
    }

    pub async fn get_repository(&self, id: &str) -> Result<Value> {
        self.transport.get(&format!("/repos/{id}"), &[]).await
    }

    /// Version-dependent upstream surface; may be unsupported, in which case
    /// the upstream status error is surfaced as-is.
    pub async fn get_repository_endpoints(
        &self,
        repo_id: &str,
        query: &EndpointsQuery,
    ) -> Result<Value> {
        let page = self
            .fetch_listing(
                &format!("/repos/{repo_id}/endpoints"),
                Vec::new(),
                query.cursor.as_ref(),
                query.size,
            )
            .await?;
        Ok(serde_json::to_value(page)?)
    }

    /// Findings scoped to one repository: the same listing flow with the
    /// repository filter applied.
    pub async fn get_repository_findings(
        &self,
        repo_id: &str,
        query: &FindingsQuery,
    ) -> Result<Value> {
        let mut scoped = query.clone();
        scoped.repo_id = Some(repo_id.to_string());
        self.get_findings(&scoped).await
    }
}
