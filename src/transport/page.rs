use serde::Deserialize;
use serde_json::Value;

use super::error::DecodeError;
use crate::domain::Page;

#[derive(Debug, Deserialize)]
struct PageJson {
    page: usize,
    #[serde(rename = "page_size")]
    size: usize,
    #[serde(rename = "count")]
    total_size: usize,
}

/// Decode one page of a listing whose items live under `items_key`.
pub fn decode_page<T>(
    json: &str,
    items_key: &'static str,
    decode_item: impl Fn(Value) -> Result<T, DecodeError>,
) -> Result<Page<T>, DecodeError> {
    let mut value: Value = serde_json::from_str(json)?;

    let items = match value.get_mut(items_key).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => return Err(DecodeError::MissingItems { key: items_key }),
    };
    let meta: PageJson = serde_json::from_value(value)?;

    let content = items
        .into_iter()
        .map(decode_item)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
        page: meta.page,
        size: meta.size,
        total_size: meta.total_size,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::batch::{BATCHES_KEY, decode_batch_value};
    use crate::transport::group::{GROUPS_KEY, decode_group_value};
    use crate::transport::inbound::{INBOUNDS_KEY, decode_inbound_value};

    #[test]
    fn decode_batch_page() {
        let json = r#"
        {
            "batches": [
                {
                    "body": "AAECAw==",
                    "canceled": false,
                    "created_at": "2016-12-14T08:15:29.969Z",
                    "delivery_report": "none",
                    "expire_at": "2016-12-17T08:15:29.969Z",
                    "from": "12345",
                    "id": "5Z8QsIRsk86f-jHB",
                    "modified_at": "2016-12-14T08:15:29.969Z",
                    "tags": ["rah-test"],
                    "to": ["123456789", "987654321"],
                    "type": "mt_binary",
                    "udh": "fffefd"
                },
                {
                    "body": "Hello, world!",
                    "canceled": false,
                    "created_at": "2016-12-09T12:54:28.247Z",
                    "delivery_report": "none",
                    "expire_at": "2016-12-12T12:54:28.247Z",
                    "from": "12345",
                    "id": "4nQCc1T6Dg-R-zHX",
                    "modified_at": "2016-12-09T12:54:28.247Z",
                    "tags": ["rah-test"],
                    "to": ["123456789"],
                    "type": "mt_text"
                }
            ],
            "count": 7,
            "page": 0,
            "page_size": 2
        }
        "#;

        let page = decode_page(json, BATCHES_KEY, decode_batch_value).unwrap();
        assert_eq!(page.page, 0);
        assert_eq!(page.size, 2);
        assert_eq!(page.total_size, 7);
        assert_eq!(page.content.len(), 2);
        assert!(page.content[0].is_binary());
        assert_eq!(page.content[1].id.as_str(), "4nQCc1T6Dg-R-zHX");
    }

    #[test]
    fn decode_empty_group_page() {
        let json = r#"{"count": 8, "page": 2, "groups": [], "page_size": 0}"#;

        let page = decode_page(json, GROUPS_KEY, decode_group_value).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_size, 8);
        assert!(page.is_empty());
        assert!(page.content.is_empty());
    }

    #[test]
    fn decode_inbound_page() {
        let json = r#"
        {
            "count": 9,
            "page": 3,
            "inbounds": [
                {
                    "type": "mo_text",
                    "id": "10000000000",
                    "from": "987654321",
                    "to": "54321",
                    "body": "Hello!",
                    "received_at": "2016-12-03T16:24:23.318Z"
                }
            ],
            "page_size": 1
        }
        "#;

        let page = decode_page(json, INBOUNDS_KEY, decode_inbound_value).unwrap();
        assert_eq!(page.page, 3);
        assert_eq!(page.size, 1);
        assert_eq!(page.content[0].id.as_str(), "10000000000");
    }

    #[test]
    fn decode_page_requires_item_array() {
        let json = r#"{"count": 0, "page": 0, "page_size": 0}"#;
        assert!(matches!(
            decode_page(json, GROUPS_KEY, decode_group_value),
            Err(DecodeError::MissingItems { key: "groups" })
        ));
    }

    #[test]
    fn decode_page_propagates_item_errors() {
        let json = r#"{"count": 1, "page": 0, "page_size": 1, "inbounds": [{"type": "mo_other"}]}"#;
        assert!(matches!(
            decode_page(json, INBOUNDS_KEY, decode_inbound_value),
            Err(DecodeError::UnknownType(_))
        ));
    }
}
