//! Display-mode projection: full records, lightweight summaries, or a
//! caller-chosen field subset.

use crate::model::ResponseMode;
use crate::schema::ApiVersion;
use serde_json::{Map, Value};

/// Project a listing's items according to the requested display mode.
///
/// `detailed` passes records through unchanged. `count` is handled before
/// projection (the caller routes to the counting machinery), so items reach
/// this function untouched in that mode as well.
pub fn project_items(
    items: Vec<Value>,
    mode: ResponseMode,
    fields: Option<&[String]>,
    version: ApiVersion,
) -> Vec<Value> {
    match mode {
        ResponseMode::Detailed | ResponseMode::Count => items,
        ResponseMode::Summary => items
            .iter()
            .map(|record| summarize(record, fields, version))
            .collect(),
    }
}

/// Build the fixed lightweight summary of a record, optionally re-keyed to
/// an explicit field list.
///
/// A requested field is resolved in order: summary attribute, then top-level
/// record field, then nested `details` field. Fields that resolve nowhere
/// are silently dropped. A record without a location sub-object produces no
/// `location` key at all.
pub fn summarize(record: &Value, fields: Option<&[String]>, version: ApiVersion) -> Value {
    let facets = version.facets(record);

    let mut summary = Map::new();
    insert_text(&mut summary, "id", facets.id);
    insert_text(&mut summary, "title", facets.title);
    insert_text(&mut summary, "severity", facets.severity);
    insert_text(&mut summary, "status", facets.status);
    insert_text(&mut summary, "created_at", facets.created_at);
    if let Some(location) = facets.location {
        let mut nested = Map::new();
        insert_text(&mut nested, "file_path", location.file_path);
        if let Some(line) = location.line {
            nested.insert("line".to_string(), Value::from(line));
        }
        summary.insert("location".to_string(), Value::Object(nested));
    }

    match fields {
        Some(fields) if !fields.is_empty() => {
            let mut filtered = Map::new();
            for field in fields {
                let resolved = summary
                    .get(field)
                    .or_else(|| record.get(field))
                    .or_else(|| record.get("details").and_then(|details| details.get(field)));
                if let Some(value) = resolved {
                    filtered.insert(field.clone(), value.clone());
                }
            }
            Value::Object(filtered)
        }
        _ => Value::Object(summary),
    }
}

fn insert_text(map: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        map.insert(key.to_string(), Value::String(value));
    }
}
