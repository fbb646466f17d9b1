//! Versioned schema adapters.
//!
//! Two upstream schema versions coexist: the flat v1 shape keeps `name`,
//! `severity`, `class`, `location`, and `repo_url` at the top level of a
//! finding, while v2 nests detail attributes under `details` and carries a
//! structured `repo` reference. Instead of duplicating the client per
//! version, every record is read through one canonical attribute view
//! ([`RecordFacets`]) with one extractor per version, selected by
//! configuration.

use serde_json::Value;

/// Upstream API schema version, selected via `GHOST_SECURITY_API_VERSION`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiVersion {
    /// Flat finding shape: summary attributes live at the top level.
    V1,
    /// Nested finding shape: summary attributes live under `details`.
    #[default]
    V2,
}

impl ApiVersion {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Some(Self::V1),
            "v2" | "2" => Some(Self::V2),
            _ => None,
        }
    }

    /// Extract the canonical attribute view from a raw record.
    pub fn facets(self, record: &Value) -> RecordFacets {
        match self {
            Self::V1 => facets_flat(record),
            Self::V2 => facets_nested(record),
        }
    }
}

/// Canonical view of the attributes used for grouping and summaries.
///
/// Every field is optional: records are opaque upstream entities and may
/// omit anything. Missing grouping labels are absorbed by an `"unknown"`
/// bucket at aggregation time.
#[derive(Debug, Clone, Default)]
pub struct RecordFacets {
    pub id: Option<String>,
    pub title: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    /// Classification label: `class` in v1, `details.title` in v2.
    pub classification: Option<String>,
    pub created_at: Option<String>,
    pub location: Option<LocationFacet>,
    /// Repository identifier or name used for the by-repo grouping.
    pub repo_label: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LocationFacet {
    pub file_path: Option<String>,
    pub line: Option<u64>,
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn facets_flat(record: &Value) -> RecordFacets {
    RecordFacets {
        id: text(record, "id"),
        title: text(record, "name"),
        severity: text(record, "severity"),
        status: text(record, "status"),
        classification: text(record, "class"),
        created_at: text(record, "created_at"),
        location: record.get("location").filter(|v| v.is_object()).map(|loc| LocationFacet {
            file_path: text(loc, "file_path"),
            line: loc.get("line").and_then(Value::as_u64),
        }),
        repo_label: text(record, "repo_url"),
    }
}

fn facets_nested(record: &Value) -> RecordFacets {
    let details = record.get("details").filter(|v| v.is_object());
    let in_details = |key: &str| details.and_then(|d| text(d, key));

    RecordFacets {
        id: text(record, "id"),
        title: in_details("title"),
        severity: in_details("severity"),
        status: text(record, "status"),
        classification: in_details("title"),
        created_at: text(record, "created_at"),
        location: details
            .and_then(|d| d.get("location"))
            .filter(|v| v.is_object())
            .map(|loc| LocationFacet {
                file_path: text(loc, "file_path"),
                line: loc.get("line_number").and_then(Value::as_u64),
            }),
        repo_label: record
            .get("repo")
            .and_then(|repo| text(repo, "name").or_else(|| text(repo, "id"))),
    }
}
