//! Grouped statistics over a complete record set.

use crate::model::CountResult;
use crate::schema::ApiVersion;
use serde_json::Value;
use std::collections::BTreeMap;

/// Compute the total and the four grouped dimensions in one linear pass.
///
/// Pure function of the input set: deterministic and order-independent.
/// Records missing a grouping label fall into the `"unknown"` bucket, so
/// every dimension's buckets always sum to `total_count`.
pub fn aggregate(items: &[Value], version: ApiVersion) -> CountResult {
    let mut counts = CountResult::default();

    for record in items {
        let facets = version.facets(record);
        counts.total_count += 1;
        bump(&mut counts.by_severity, facets.severity);
        bump(&mut counts.by_status, facets.status);
        bump(&mut counts.by_title, facets.classification);
        bump(&mut counts.by_repo, facets.repo_label);
    }

    counts
}

fn bump(buckets: &mut BTreeMap<String, u64>, label: Option<String>) {
    let label = label.unwrap_or_else(|| "unknown".to_string());
    *buckets.entry(label).or_insert(0) += 1;
}
