//! Resource envelope helpers.
//!
//! Every Ghost request and response body nests resources under their plural
//! name: `{"posts": [{...}], "meta": {"pagination": {...}}}`.

use serde_json::{Map, Value};

use super::{
    error::{Error, Result},
    types::{ListPage, Pagination, Resource},
};

/// Wraps a single resource object for a write request.
pub fn wrap(plural: &str, resource: Resource) -> Value {
    let mut body = Map::new();
    body.insert(plural.to_string(), Value::Array(vec![Value::Object(resource)]));
    Value::Object(body)
}

/// Returns the first resource under `plural`.
pub fn unwrap_one(plural: &str, mut body: Value) -> Result<Resource> {
    let items = body
        .get_mut(plural)
        .and_then(Value::as_array_mut)
        .ok_or_else(|| Error::Envelope(format!("missing \"{}\" array", plural)))?;

    if items.is_empty() {
        return Err(Error::Envelope(format!("\"{}\" array is empty", plural)));
    }

    match items.swap_remove(0) {
        Value::Object(resource) => Ok(resource),
        other => Err(Error::Envelope(format!(
            "\"{}\" element is not an object: {}",
            plural, other
        ))),
    }
}

/// Splits a list response into its resources and pagination block.
pub fn unwrap_list(plural: &str, mut body: Value) -> Result<ListPage> {
    let items = match body.get_mut(plural).map(Value::take) {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(resource) => Ok(resource),
                other => Err(Error::Envelope(format!(
                    "\"{}\" element is not an object: {}",
                    plural, other
                ))),
            })
            .collect::<Result<Vec<_>>>()?,
        _ => return Err(Error::Envelope(format!("missing \"{}\" array", plural))),
    };

    let pagination = match body.pointer_mut("/meta/pagination").map(Value::take) {
        Some(Value::Null) | None => None,
        Some(raw) => Some(serde_json::from_value::<Pagination>(raw)?),
    };

    Ok(ListPage { items, pagination })
}
