use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::DecodeError;
use super::wire::{msisdns_from_wire, msisdns_value, parse_timestamp, put_patch, tags_value};
use crate::domain::{AutoUpdate, GroupCreate, GroupId, GroupResult, GroupUpdate, Keywords, Msisdn};

/// Key of the item array in group listings.
pub const GROUPS_KEY: &str = "groups";

#[derive(Debug, Deserialize)]
struct GroupJson {
    id: String,
    #[serde(default)]
    name: Option<String>,
    size: usize,
    #[serde(default)]
    child_groups: Vec<String>,
    #[serde(default)]
    auto_update: Option<AutoUpdateJson>,
    created_at: String,
    modified_at: String,
}

#[derive(Debug, Deserialize)]
struct AutoUpdateJson {
    to: String,
    #[serde(default)]
    add: KeywordsJson,
    #[serde(default)]
    remove: KeywordsJson,
}

#[derive(Debug, Default, Deserialize)]
struct KeywordsJson {
    #[serde(default)]
    first_word: Option<String>,
    #[serde(default)]
    second_word: Option<String>,
}

impl From<KeywordsJson> for Keywords {
    fn from(value: KeywordsJson) -> Self {
        Self {
            first_word: value.first_word,
            second_word: value.second_word,
        }
    }
}

pub fn encode_group_create(group: &GroupCreate) -> Value {
    let mut fields = Map::new();

    if let Some(name) = group.name.as_deref() {
        fields.insert("name".to_owned(), Value::from(name));
    }
    if !group.members.is_empty() {
        fields.insert("members".to_owned(), msisdns_value(&group.members));
    }
    if !group.child_groups.is_empty() {
        fields.insert(
            "child_groups".to_owned(),
            group_ids_value(&group.child_groups),
        );
    }
    if let Some(auto_update) = group.auto_update.as_ref() {
        fields.insert("auto_update".to_owned(), auto_update_value(auto_update));
    }
    if !group.tags.is_empty() {
        fields.insert("tags".to_owned(), tags_value(&group.tags));
    }

    Value::Object(fields)
}

pub fn encode_group_update(update: &GroupUpdate) -> Value {
    let mut fields = Map::new();

    put_patch(
        &mut fields,
        "name",
        update.name.as_ref().map(|name| Value::from(name.as_str())),
    );
    if !update.member_insertions.is_empty() {
        fields.insert("add".to_owned(), msisdns_value(&update.member_insertions));
    }
    if !update.member_removals.is_empty() {
        fields.insert("remove".to_owned(), msisdns_value(&update.member_removals));
    }
    if !update.child_group_insertions.is_empty() {
        fields.insert(
            "child_groups_add".to_owned(),
            group_ids_value(&update.child_group_insertions),
        );
    }
    if !update.child_group_removals.is_empty() {
        fields.insert(
            "child_groups_remove".to_owned(),
            group_ids_value(&update.child_group_removals),
        );
    }
    if let Some(group) = update.add_from_group.as_ref() {
        fields.insert("add_from_group".to_owned(), Value::from(group.as_str()));
    }
    if let Some(group) = update.remove_from_group.as_ref() {
        fields.insert("remove_from_group".to_owned(), Value::from(group.as_str()));
    }
    put_patch(
        &mut fields,
        "auto_update",
        update.auto_update.as_ref().map(auto_update_value),
    );

    Value::Object(fields)
}

fn group_ids_value(ids: &[GroupId]) -> Value {
    Value::from(ids.iter().map(GroupId::as_str).collect::<Vec<_>>())
}

fn auto_update_value(auto_update: &AutoUpdate) -> Value {
    let mut fields = Map::new();
    fields.insert(
        "to".to_owned(),
        Value::from(auto_update.recipient.as_str()),
    );
    if !auto_update.add.is_empty() {
        fields.insert("add".to_owned(), keywords_value(&auto_update.add));
    }
    if !auto_update.remove.is_empty() {
        fields.insert("remove".to_owned(), keywords_value(&auto_update.remove));
    }
    Value::Object(fields)
}

fn keywords_value(keywords: &Keywords) -> Value {
    let mut fields = Map::new();
    if let Some(word) = keywords.first_word.as_deref() {
        fields.insert("first_word".to_owned(), Value::from(word));
    }
    if let Some(word) = keywords.second_word.as_deref() {
        fields.insert("second_word".to_owned(), Value::from(word));
    }
    Value::Object(fields)
}

pub fn decode_group(json: &str) -> Result<GroupResult, DecodeError> {
    let value: Value = serde_json::from_str(json)?;
    decode_group_value(value)
}

pub fn decode_group_value(value: Value) -> Result<GroupResult, DecodeError> {
    let parsed: GroupJson = serde_json::from_value(value)?;

    let child_groups = parsed
        .child_groups
        .into_iter()
        .map(GroupId::from_wire)
        .collect();

    let auto_update = parsed.auto_update.map(|auto_update| AutoUpdate {
        recipient: Msisdn::from_wire(auto_update.to),
        add: auto_update.add.into(),
        remove: auto_update.remove.into(),
    });

    Ok(GroupResult {
        id: GroupId::from_wire(parsed.id),
        name: parsed.name,
        size: parsed.size,
        child_groups,
        auto_update,
        created_at: parse_timestamp("created_at", &parsed.created_at)?,
        modified_at: parse_timestamp("modified_at", &parsed.modified_at)?,
    })
}

/// Decode the member listing of a group, a bare JSON array of addresses.
pub fn decode_members(json: &str) -> Result<Vec<Msisdn>, DecodeError> {
    let members: Vec<String> = serde_json::from_str(json)?;
    Ok(msisdns_from_wire(members))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{Patch, Tag};

    fn msisdn(value: &str) -> Msisdn {
        Msisdn::new(value).unwrap()
    }

    #[test]
    fn encode_group_create_with_name_and_members() {
        let group = GroupCreate {
            name: Some("my group".to_owned()),
            members: vec![msisdn("123456789"), msisdn("987654321")],
            ..Default::default()
        };

        assert_eq!(
            encode_group_create(&group),
            json!({ "name": "my group", "members": ["123456789", "987654321"] })
        );
    }

    #[test]
    fn encode_group_create_with_everything() {
        let group = GroupCreate {
            name: None,
            members: Vec::new(),
            child_groups: vec![GroupId::new("child").unwrap()],
            auto_update: Some(AutoUpdate {
                recipient: msisdn("12345"),
                add: Keywords {
                    first_word: Some("hello".to_owned()),
                    second_word: Some("world".to_owned()),
                },
                remove: Keywords::default(),
            }),
            tags: vec![Tag::new("tag").unwrap()],
        };

        assert_eq!(
            encode_group_create(&group),
            json!({
                "child_groups": ["child"],
                "auto_update": {
                    "to": "12345",
                    "add": { "first_word": "hello", "second_word": "world" }
                },
                "tags": ["tag"]
            })
        );
    }

    #[test]
    fn encode_empty_group_update_is_empty_object() {
        assert_eq!(encode_group_update(&GroupUpdate::default()), json!({}));
    }

    #[test]
    fn encode_group_update_tri_state_and_member_changes() {
        let update = GroupUpdate {
            name: Patch::Reset,
            member_insertions: vec![msisdn("111")],
            member_removals: vec![msisdn("222")],
            child_group_insertions: vec![GroupId::new("g1").unwrap()],
            child_group_removals: vec![GroupId::new("g2").unwrap()],
            add_from_group: Some(GroupId::new("g3").unwrap()),
            remove_from_group: Some(GroupId::new("g4").unwrap()),
            auto_update: Patch::Set(AutoUpdate::new(msisdn("12345"))),
        };

        assert_eq!(
            encode_group_update(&update),
            json!({
                "name": null,
                "add": ["111"],
                "remove": ["222"],
                "child_groups_add": ["g1"],
                "child_groups_remove": ["g2"],
                "add_from_group": "g3",
                "remove_from_group": "g4",
                "auto_update": { "to": "12345" }
            })
        );

        let update = GroupUpdate {
            name: Patch::Set("new name".to_owned()),
            auto_update: Patch::Reset,
            ..Default::default()
        };
        assert_eq!(
            encode_group_update(&update),
            json!({ "name": "new name", "auto_update": null })
        );
    }

    #[test]
    fn decode_group_with_auto_update() {
        let json = r#"
        {
            "auto_update": {
                "to": "12345",
                "add": { "first_word": "hello" },
                "remove": { "first_word": "goodbye" }
            },
            "child_groups": [],
            "created_at": "2016-12-08T12:38:19.962Z",
            "id": "4cldmgEdAcBfcHW3",
            "modified_at": "2016-12-08T12:38:19.962Z",
            "name": "rah-test",
            "size": 1
        }
        "#;

        let group = decode_group(json).unwrap();
        assert_eq!(group.id.as_str(), "4cldmgEdAcBfcHW3");
        assert_eq!(group.name.as_deref(), Some("rah-test"));
        assert_eq!(group.size, 1);
        assert!(group.child_groups.is_empty());

        let auto_update = group.auto_update.unwrap();
        assert_eq!(auto_update.recipient.as_str(), "12345");
        assert_eq!(auto_update.add.first_word.as_deref(), Some("hello"));
        assert_eq!(auto_update.remove.first_word.as_deref(), Some("goodbye"));
        assert_eq!(auto_update.remove.second_word, None);
    }

    #[test]
    fn decode_group_with_minimal_fields() {
        let json = r#"
        {
            "child_groups": ["abc"],
            "created_at": "2016-12-08T12:38:19.962Z",
            "id": "4cldmgEdAcBfcHW3",
            "modified_at": "2016-12-10T12:38:19.162Z",
            "size": 1004
        }
        "#;

        let group = decode_group(json).unwrap();
        assert_eq!(group.size, 1004);
        assert_eq!(group.name, None);
        assert_eq!(group.auto_update, None);
        assert_eq!(group.child_groups, vec![GroupId::new("abc").unwrap()]);
    }

    #[test]
    fn decode_group_requires_id() {
        let json = r#"
        {
            "created_at": "2016-12-08T12:38:19.962Z",
            "modified_at": "2016-12-10T12:38:19.162Z",
            "size": 1
        }
        "#;
        assert!(matches!(decode_group(json), Err(DecodeError::Json(_))));
    }

    #[test]
    fn decode_members_reads_bare_array() {
        let members = decode_members(r#"["123456789", "987654321"]"#).unwrap();
        assert_eq!(members, vec![msisdn("123456789"), msisdn("987654321")]);

        let members = decode_members(r#"["123", " 456 ", ""]"#).unwrap();
        let raw: Vec<&str> = members.iter().map(Msisdn::as_str).collect();
        assert_eq!(raw, vec!["123", " 456 ", ""]);
    }
}
