//! Defensive decoding of model replies.

use docgraph_core::{CandidateGraph, GraphEdge, GraphNode};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Decode a raw model reply into a candidate graph.
///
/// Accepts the bare JSON object or one wrapped in a markdown code fence.
/// Unknown fields are ignored; a missing or null `parent` is a root.
pub fn decode_candidate(raw: &str) -> Result<CandidateGraph, DecodeError> {
    let body = strip_code_fence(raw.trim());
    let value: Value =
        serde_json::from_str(body).map_err(|e| DecodeError::NotJson(e.to_string()))?;

    let Value::Object(object) = value else {
        return Err(DecodeError::NotAnObject);
    };

    let nodes = array_field(&object, "nodes")?
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<GraphNode>(item.clone()).map_err(|e| {
                DecodeError::MalformedNode {
                    index,
                    reason: e.to_string(),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let edges = array_field(&object, "edges")?
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<GraphEdge>(item.clone()).map_err(|e| {
                DecodeError::MalformedEdge {
                    index,
                    reason: e.to_string(),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CandidateGraph::new(nodes, edges))
}

fn array_field<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Vec<Value>, DecodeError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(DecodeError::MissingField(field)),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(DecodeError::NotAnArray(field)),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an info string such as `json` on the opening line.
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}
