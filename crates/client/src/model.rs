//! Wire-level data model: pages, query parameters, and count statistics.
//!
//! Records themselves stay opaque (`serde_json::Value`) so that `detailed`
//! mode can return them byte-for-byte as the upstream sent them. The
//! canonical attribute view used for grouping and summaries lives in
//! [`crate::schema`].

use crate::error::{ClientError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// How structural validation failures should be handled at a call site.
///
/// Strict paths must be complete and correct, so a bad body is an error.
/// Best-effort paths (count fallback) degrade to an empty page and keep
/// serving statistics from whatever was retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Strict,
    BestEffort,
}

/// One page of a cursor-paginated listing.
///
/// `next_cursor` is opaque: it is echoed back verbatim on the next request
/// and never parsed or constructed locally. Unknown body fields are
/// preserved so listing responses round-trip unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    /// Validate the structural shape of a listing body and parse it.
    ///
    /// The body must be a JSON object carrying an `items` array. Under
    /// [`Validation::BestEffort`] a bad shape is logged and treated as an
    /// empty final page instead of an error.
    pub fn from_value(body: Value, validation: Validation) -> Result<Page> {
        let problem = match body.as_object() {
            None => Some("response body is not a JSON object"),
            Some(obj) if !obj.get("items").is_some_and(Value::is_array) => {
                Some("response is missing an items array")
            }
            Some(_) => None,
        };

        if let Some(problem) = problem {
            return match validation {
                Validation::Strict => Err(ClientError::MalformedResponse(problem.to_string())),
                Validation::BestEffort => {
                    log::warn!("degraded page: {problem}; treating as an empty page");
                    Ok(Page::default())
                }
            };
        }

        Ok(serde_json::from_value(body)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    LastCommittedAt,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::LastCommittedAt => "last_committed_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Response mode for listing operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Lightweight projection of each record.
    #[default]
    Summary,
    /// Records exactly as the upstream sent them.
    Detailed,
    /// Grouped statistics instead of records.
    Count,
}

/// Repository filter by scanning support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CastFilter {
    Supported,
    Unsupported,
    All,
}

impl CastFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supported => "supported",
            Self::Unsupported => "unsupported",
            Self::All => "all",
        }
    }
}

/// Query parameters for findings listings.
///
/// `mode` and `fields` shape the response locally and never reach the wire.
#[derive(Debug, Clone, Default)]
pub struct FindingsQuery {
    pub cursor: Option<String>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub size: Option<u32>,
    pub status: Option<String>,
    pub repo_id: Option<String>,
    pub project_id: Option<String>,
    pub mode: ResponseMode,
    pub fields: Option<Vec<String>>,
}

impl FindingsQuery {
    /// Filter parameters only; `cursor` and `size` are supplied per request
    /// by the call site that controls pagination.
    pub(crate) fn filter_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(sort) = self.sort {
            pairs.push(("sort".to_string(), sort.as_str().to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order".to_string(), order.as_str().to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status".to_string(), status.clone()));
        }
        if let Some(repo_id) = &self.repo_id {
            pairs.push(("repo_id".to_string(), repo_id.clone()));
        }
        if let Some(project_id) = &self.project_id {
            pairs.push(("project_id".to_string(), project_id.clone()));
        }
        pairs
    }
}

/// Query parameters for repository listings.
#[derive(Debug, Clone, Default)]
pub struct ReposQuery {
    pub cursor: Option<String>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub size: Option<u32>,
    pub cast: Option<CastFilter>,
}

impl ReposQuery {
    pub(crate) fn filter_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(sort) = self.sort {
            pairs.push(("sort".to_string(), sort.as_str().to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order".to_string(), order.as_str().to_string()));
        }
        if let Some(cast) = self.cast {
            pairs.push(("cast".to_string(), cast.as_str().to_string()));
        }
        pairs
    }
}

/// Query parameters for repository endpoint listings.
#[derive(Debug, Clone, Default)]
pub struct EndpointsQuery {
    pub cursor: Option<String>,
    pub size: Option<u32>,
}

/// Grouped statistics over a findings set.
///
/// `by_title` groups on the classification label (`class` under the flat
/// schema, `details.title` under the nested one). `partial` is set when a
/// page ceiling truncated the walk that produced these counts, so callers
/// can tell an exact total from a ceiling-truncated one; it is omitted for
/// counts returned whole by the upstream aggregate endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResult {
    pub total_count: u64,
    pub by_severity: BTreeMap<String, u64>,
    pub by_status: BTreeMap<String, u64>,
    pub by_title: BTreeMap<String, u64>,
    pub by_repo: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_parses_a_well_formed_listing_body() {
        let body = json!({
            "items": [{"id": "f-1"}, {"id": "f-2"}],
            "has_more": true,
            "next_cursor": "abc",
            "total": 42,
        });

        let page = Page::from_value(body, Validation::Strict).expect("valid page");
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("abc"));
        assert_eq!(page.extra.get("total"), Some(&json!(42)));
    }

    #[test]
    fn page_defaults_optional_fields() {
        let page = Page::from_value(json!({"items": []}), Validation::Strict).expect("valid page");
        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn strict_validation_rejects_non_object_bodies() {
        let err = Page::from_value(json!([1, 2, 3]), Validation::Strict).unwrap_err();
        assert!(matches!(err, crate::ClientError::MalformedResponse(_)));
    }

    #[test]
    fn strict_validation_rejects_missing_items() {
        let err = Page::from_value(json!({"has_more": false}), Validation::Strict).unwrap_err();
        assert!(matches!(err, crate::ClientError::MalformedResponse(_)));

        let err = Page::from_value(json!({"items": "nope"}), Validation::Strict).unwrap_err();
        assert!(matches!(err, crate::ClientError::MalformedResponse(_)));
    }

    #[test]
    fn best_effort_validation_degrades_to_an_empty_page() {
        let page = Page::from_value(json!("garbage"), Validation::BestEffort).expect("degraded");
        assert!(page.items.is_empty());
        assert!(!page.has_more);

        let page = Page::from_value(json!({"items": 7}), Validation::BestEffort).expect("degraded");
        assert!(page.items.is_empty());
    }

    #[test]
    fn sort_and_order_wire_names() {
        assert_eq!(SortField::CreatedAt.as_str(), "created_at");
        assert_eq!(SortField::LastCommittedAt.as_str(), "last_committed_at");
        assert_eq!(SortOrder::Desc.as_str(), "desc");
        assert_eq!(CastFilter::Supported.as_str(), "supported");
    }

    #[test]
    fn findings_query_skips_mode_and_fields_on_the_wire() {
        let query = FindingsQuery {
            sort: Some(SortField::UpdatedAt),
            order: Some(SortOrder::Asc),
            status: Some("open".to_string()),
            mode: ResponseMode::Count,
            fields: Some(vec!["id".to_string()]),
            ..Default::default()
        };

        let pairs = query.filter_pairs();
        assert_eq!(
            pairs,
            vec![
                ("sort".to_string(), "updated_at".to_string()),
                ("order".to_string(), "asc".to_string()),
                ("status".to_string(), "open".to_string()),
            ]
        );
    }

    #[test]
    fn count_result_serializes_partial_only_when_set() {
        let counts = CountResult {
            total_count: 3,
            ..Default::default()
        };
        let raw = serde_json::to_string(&counts).expect("serialize");
        assert!(!raw.contains("partial"));

        let counts = CountResult {
            total_count: 3,
            partial: Some(true),
            ..Default::default()
        };
        let raw = serde_json::to_string(&counts).expect("serialize");
        assert!(raw.contains("\"partial\":true"));
    }
}
