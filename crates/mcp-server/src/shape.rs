//! Response shaping for a token-limited consumer.
//!
//! Listing bodies past the item threshold are truncated with explicit
//! provenance markers so the caller knows data was dropped and how to get
//! the rest. This is a lossy safety valve, not a correctness guarantee:
//! callers needing full data must paginate explicitly.

use serde_json::Value;

/// Listings up to this many items are returned whole.
const MAX_WHOLE_ITEMS: usize = 20;
/// Oversized listings are cut down to this many items.
const TRUNCATED_ITEM_COUNT: usize = 15;

/// Serialize a tool response body, truncating oversized item arrays.
///
/// Count bodies (detected by `total_count`) are always returned whole, and
/// anything that is not page-shaped passes through unchanged.
pub fn shape_response(mut body: Value) -> String {
    if let Some(obj) = body.as_object_mut() {
        if obj.contains_key("total_count") {
            return pretty(&body);
        }

        let item_count = obj.get("items").and_then(Value::as_array).map(Vec::len);
        if let Some(count) = item_count {
            if count > MAX_WHOLE_ITEMS {
                if let Some(items) = obj.get_mut("items").and_then(Value::as_array_mut) {
                    items.truncate(TRUNCATED_ITEM_COUNT);
                }
                obj.insert("_truncated".to_string(), Value::Bool(true));
                obj.insert("_original_count".to_string(), Value::from(count));
                obj.insert(
                    "_message".to_string(),
                    Value::String(format!(
                        "Response truncated to show {TRUNCATED_ITEM_COUNT} of {count} items \
                         to prevent token limit issues. Use pagination parameters (size, cursor) \
                         or 'count' mode for full statistics."
                    )),
                );
            }
        }
    }

    pretty(&body)
}

fn pretty(body: &Value) -> String {
    serde_json::to_string_pretty(body).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn listing(count: usize) -> Value {
        let items: Vec<Value> = (0..count).map(|i| json!({"id": format!("f-{i}")})).collect();
        json!({"items": items, "has_more": false})
    }

    #[test]
    fn small_listings_are_returned_whole() {
        let shaped: Value = serde_json::from_str(&shape_response(listing(20))).unwrap();
        assert_eq!(shaped["items"].as_array().unwrap().len(), 20);
        assert!(shaped.get("_truncated").is_none());
    }

    #[test]
    fn oversized_listings_are_truncated_with_provenance_markers() {
        let shaped: Value = serde_json::from_str(&shape_response(listing(21))).unwrap();
        assert_eq!(shaped["items"].as_array().unwrap().len(), 15);
        assert_eq!(shaped["_truncated"], json!(true));
        assert_eq!(shaped["_original_count"], json!(21));
        let message = shaped["_message"].as_str().unwrap();
        assert!(message.contains("15 of 21"));
        assert!(message.contains("count"));
    }

    #[test]
    fn count_bodies_are_never_truncated() {
        let body = json!({
            "total_count": 500,
            "by_severity": {"high": 500},
        });
        let shaped: Value = serde_json::from_str(&shape_response(body.clone())).unwrap();
        assert_eq!(shaped, body);
    }

    #[test]
    fn non_page_shapes_pass_through_unchanged() {
        let record = json!({"id": "f-1", "status": "open"});
        let shaped: Value = serde_json::from_str(&shape_response(record.clone())).unwrap();
        assert_eq!(shaped, record);

        let scalar = json!("just text");
        let shaped: Value = serde_json::from_str(&shape_response(scalar.clone())).unwrap();
        assert_eq!(shaped, scalar);
    }

    #[test]
    fn output_is_pretty_printed() {
        let raw = shape_response(json!({"items": [], "has_more": false}));
        assert!(raw.contains('\n'));
    }
}
