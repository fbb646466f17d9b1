//! Cursor walks: drive the page fetcher across an entire result set under a
//! bounded page ceiling.

use crate::error::Result;
use crate::fetch::{fetch_page, Transport};
use crate::model::Validation;
use serde_json::Value;

/// Bounded-cost policy for a cursor walk.
///
/// The ceilings are a deliberate precision/latency tradeoff: the synchronous
/// count fallback keeps latency and response cost low, while full-listing
/// aggregation favors completeness with bigger pages and a higher ceiling.
#[derive(Debug, Clone, Copy)]
pub struct WalkPolicy {
    pub max_pages: usize,
    pub page_size: u32,
    pub validation: Validation,
}

impl WalkPolicy {
    /// Tight ceiling for the synchronous count fallback.
    pub fn count_fallback() -> Self {
        Self {
            max_pages: 10,
            page_size: 10,
            validation: Validation::BestEffort,
        }
    }

    /// Wide ceiling for full-listing aggregation.
    pub fn full_listing() -> Self {
        Self {
            max_pages: 50,
            page_size: 100,
            validation: Validation::Strict,
        }
    }
}

/// Result of a cursor walk. `truncated` is set when the page ceiling ended
/// the walk while the upstream still reported more results.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub items: Vec<Value>,
    pub truncated: bool,
}

/// Walk cursor pages sequentially, accumulating items until the upstream is
/// exhausted or the policy's page ceiling is reached.
///
/// Each request depends on the previous page's cursor, so fetches are
/// strictly sequential. Hitting the ceiling is not an error: the partial
/// accumulation is returned and the truncation is logged.
pub async fn walk_pages(
    transport: &dyn Transport,
    path: &str,
    filters: &[(String, String)],
    start_cursor: Option<String>,
    policy: &WalkPolicy,
) -> Result<WalkOutcome> {
    let mut items = Vec::new();
    let mut cursor = start_cursor;
    let mut has_more = true;
    let mut pages = 0usize;

    while has_more && pages < policy.max_pages {
        let mut query = filters.to_vec();
        query.push(("size".to_string(), policy.page_size.to_string()));
        if let Some(value) = &cursor {
            query.push(("cursor".to_string(), value.clone()));
        }

        let page = fetch_page(transport, path, &query, policy.validation).await?;
        items.extend(page.items);
        has_more = page.has_more;
        cursor = page.next_cursor;
        pages += 1;
    }

    let truncated = has_more;
    if truncated {
        log::warn!(
            "walk over {path} stopped at the {}-page ceiling with {} items accumulated; more results remain upstream",
            policy.max_pages,
            items.len()
        );
    }

    Ok(WalkOutcome { items, truncated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::test_support::{page_body, MockTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn records(ids: &[&str]) -> Vec<Value> {
        ids.iter().map(|id| json!({"id": id})).collect()
    }

    #[tokio::test]
    async fn walk_concatenates_all_pages_until_exhaustion() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get("/findings", Ok(page_body(records(&["a", "b"]), true, Some("c1"))));
        transport.push_get("/findings", Ok(page_body(records(&["c"]), true, Some("c2"))));
        transport.push_get("/findings", Ok(page_body(records(&["d"]), false, None)));

        let outcome = walk_pages(
            transport.as_ref(),
            "/findings",
            &[],
            None,
            &WalkPolicy::count_fallback(),
        )
        .await
        .expect("walk");

        assert_eq!(outcome.items.len(), 4);
        assert!(!outcome.truncated);
        assert_eq!(transport.get_calls("/findings").len(), 3);
    }

    #[tokio::test]
    async fn walk_echoes_cursors_verbatim() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get("/findings", Ok(page_body(records(&["a"]), true, Some("opaque-1"))));
        transport.push_get("/findings", Ok(page_body(records(&["b"]), false, None)));

        walk_pages(
            transport.as_ref(),
            "/findings",
            &[],
            None,
            &WalkPolicy::count_fallback(),
        )
        .await
        .expect("walk");

        let calls = transport.get_calls("/findings");
        assert!(!calls[0].iter().any(|(key, _)| key == "cursor"));
        assert!(calls[1].contains(&("cursor".to_string(), "opaque-1".to_string())));
    }

    #[tokio::test]
    async fn walk_stops_at_the_page_ceiling_with_a_partial_result() {
        let transport = Arc::new(MockTransport::new());
        // Upstream never reports exhaustion.
        transport.repeat_get("/findings", page_body(records(&["x"]), true, Some("next")));

        let policy = WalkPolicy::count_fallback();
        let outcome = walk_pages(transport.as_ref(), "/findings", &[], None, &policy)
            .await
            .expect("walk");

        assert_eq!(transport.get_calls("/findings").len(), policy.max_pages);
        assert_eq!(outcome.items.len(), policy.max_pages);
        assert!(outcome.truncated);
    }

    #[tokio::test]
    async fn walk_applies_the_policy_page_size_and_filters() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get("/findings", Ok(page_body(vec![], false, None)));

        let filters = vec![("status".to_string(), "open".to_string())];
        walk_pages(
            transport.as_ref(),
            "/findings",
            &filters,
            Some("start".to_string()),
            &WalkPolicy::full_listing(),
        )
        .await
        .expect("walk");

        let calls = transport.get_calls("/findings");
        assert_eq!(
            calls[0],
            vec![
                ("status".to_string(), "open".to_string()),
                ("size".to_string(), "100".to_string()),
                ("cursor".to_string(), "start".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn best_effort_walk_treats_a_malformed_body_as_the_final_page() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get("/findings", Ok(page_body(records(&["a"]), true, Some("c1"))));
        transport.push_get("/findings", Ok(json!({"weird": "shape"})));

        let outcome = walk_pages(
            transport.as_ref(),
            "/findings",
            &[],
            None,
            &WalkPolicy::count_fallback(),
        )
        .await
        .expect("walk degrades");

        assert_eq!(outcome.items.len(), 1);
        assert!(!outcome.truncated);
        assert_eq!(transport.get_calls("/findings").len(), 2);
    }

    #[tokio::test]
    async fn strict_walk_propagates_a_malformed_body() {
        let transport = Arc::new(MockTransport::new());
        transport.push_get("/findings", Ok(json!({"weird": "shape"})));

        let err = walk_pages(
            transport.as_ref(),
            "/findings",
            &[],
            None,
            &WalkPolicy::full_listing(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }
}
