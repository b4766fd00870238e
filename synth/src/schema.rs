//! Output schema the model must follow.

use serde_json::{Value, json};

/// Name under which the schema is registered with the model API.
pub const SCHEMA_NAME: &str = "knowledge_graph";

/// JSON Schema for `{nodes: [{id, label, parent}], edges: [{source, target}]}`.
///
/// `parent` is listed as required but nullable, as strict structured-output
/// modes demand every property be required. Decoding still accepts a
/// missing `parent`.
pub fn graph_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "nodes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "label": { "type": "string" },
                        "parent": { "type": ["string", "null"] }
                    },
                    "required": ["id", "label", "parent"],
                    "additionalProperties": false
                }
            },
            "edges": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "source": { "type": "string" },
                        "target": { "type": "string" }
                    },
                    "required": ["source", "target"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["nodes", "edges"],
        "additionalProperties": false
    })
}
