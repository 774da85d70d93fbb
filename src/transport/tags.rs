use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::DecodeError;
use super::wire::{tags_from_wire, tags_value};
use crate::domain::{Tag, TagDelta};

#[derive(Debug, Deserialize)]
struct TagsJson {
    tags: Vec<String>,
}

/// `{"add": [..], "remove": [..]}`; both keys are always present.
pub fn encode_tag_delta(delta: &TagDelta) -> Value {
    let mut fields = Map::new();
    fields.insert("add".to_owned(), tags_value(&delta.add));
    fields.insert("remove".to_owned(), tags_value(&delta.remove));
    Value::Object(fields)
}

/// Body of a full tag replacement, `{"tags": [..]}`.
pub fn encode_tags(tags: &[Tag]) -> Value {
    let mut fields = Map::new();
    fields.insert("tags".to_owned(), tags_value(tags));
    Value::Object(fields)
}

pub fn decode_tags(json: &str) -> Result<Vec<Tag>, DecodeError> {
    let parsed: TagsJson = serde_json::from_str(json)?;
    Ok(tags_from_wire(parsed.tags))
}
