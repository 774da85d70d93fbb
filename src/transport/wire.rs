//! Encodings shared by all wire objects.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::DecodeError;
use crate::domain::{DeliveryReport, Msisdn, Patch, Tag};

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(field: &'static str, value: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD
        .decode(value)
        .map_err(|source| DecodeError::Base64 { field, source })
}

/// Lowercase hex, as XMS expects for user data headers.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, DecodeError> {
    hex::decode(value).map_err(|source| DecodeError::Hex { field, source })
}

/// RFC 3339 with an explicit offset, e.g. `2016-12-01T11:03:13+00:00`.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|source| DecodeError::Timestamp {
            field,
            value: value.to_owned(),
            source,
        })
}

pub fn parse_optional_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, DecodeError> {
    value.map(|value| parse_timestamp(field, value)).transpose()
}

/// Calendar date as used by list filters (`YYYY-MM-DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Emit a tri-state field: omitted, `null`, or the value.
pub fn put_patch(fields: &mut Map<String, Value>, key: &str, patch: Patch<Value>) {
    match patch {
        Patch::Unchanged => {}
        Patch::Reset => {
            fields.insert(key.to_owned(), Value::Null);
        }
        Patch::Set(value) => {
            fields.insert(key.to_owned(), value);
        }
    }
}

pub fn msisdns_value(values: &[Msisdn]) -> Value {
    Value::from(values.iter().map(Msisdn::as_str).collect::<Vec<_>>())
}

pub fn tags_value(tags: &[Tag]) -> Value {
    Value::from(tags.iter().map(Tag::as_str).collect::<Vec<_>>())
}

pub fn msisdns_from_wire(values: Vec<String>) -> Vec<Msisdn> {
    values.into_iter().map(Msisdn::from_wire).collect()
}

pub fn tags_from_wire(values: Vec<String>) -> Vec<Tag> {
    values.into_iter().map(Tag::from_wire).collect()
}

/// Read the `type` discriminator of a wire object.
pub fn discriminator(value: &Value) -> Result<String, DecodeError> {
    value
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(DecodeError::MissingType)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportDeliveryReport {
    None,
    Summary,
    Full,
    PerRecipient,
}

impl TransportDeliveryReport {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Summary => "summary",
            Self::Full => "full",
            Self::PerRecipient => "per_recipient",
        }
    }
}

impl From<TransportDeliveryReport> for DeliveryReport {
    fn from(value: TransportDeliveryReport) -> Self {
        match value {
            TransportDeliveryReport::None => DeliveryReport::None,
            TransportDeliveryReport::Summary => DeliveryReport::Summary,
            TransportDeliveryReport::Full => DeliveryReport::Full,
            TransportDeliveryReport::PerRecipient => DeliveryReport::PerRecipient,
        }
    }
}

impl From<DeliveryReport> for TransportDeliveryReport {
    fn from(value: DeliveryReport) -> Self {
        match value {
            DeliveryReport::None => TransportDeliveryReport::None,
            DeliveryReport::Summary => TransportDeliveryReport::Summary,
            DeliveryReport::Full => TransportDeliveryReport::Full,
            DeliveryReport::PerRecipient => TransportDeliveryReport::PerRecipient,
        }
    }
}

pub fn delivery_report_value(report: DeliveryReport) -> Value {
    Value::from(TransportDeliveryReport::from(report).as_str())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn binary_encodings_match_wire_examples() {
        assert_eq!(encode_base64(&[0x00, 0x01, 0x02, 0x03]), "AAECAw==");
        assert_eq!(encode_hex(&[0xff, 0xfe, 0xfd]), "fffefd");
        assert_eq!(encode_base64(b"hello"), "aGVsbG8=");
    }

    #[test]
    fn binary_encodings_are_lossless() {
        let samples: [&[u8]; 4] = [b"", &[0x00], &[0xff, 0x00, 0x7f, 0x80], &[0u8; 140]];
        for bytes in samples {
            assert_eq!(decode_base64("body", &encode_base64(bytes)).unwrap(), bytes);
            assert_eq!(decode_hex("udh", &encode_hex(bytes)).unwrap(), bytes);
        }
        let all = (0u8..=255).collect::<Vec<_>>();
        assert_eq!(decode_base64("body", &encode_base64(&all)).unwrap(), all);
        assert_eq!(decode_hex("udh", &encode_hex(&all)).unwrap(), all);
    }

    #[test]
    fn malformed_binary_is_an_error() {
        assert!(matches!(
            decode_base64("body", "not base64!"),
            Err(DecodeError::Base64 { field: "body", .. })
        ));
        assert!(matches!(
            decode_hex("udh", "fff"),
            Err(DecodeError::Hex { field: "udh", .. })
        ));
        assert!(matches!(
            decode_hex("udh", "zz"),
            Err(DecodeError::Hex { field: "udh", .. })
        ));
    }

    #[test]
    fn timestamps_use_explicit_offset() {
        let at = Utc.with_ymd_and_hms(2016, 12, 1, 11, 3, 13).unwrap();
        assert_eq!(format_timestamp(&at), "2016-12-01T11:03:13+00:00");

        let parsed = parse_timestamp("created_at", "2016-12-14T08:15:29.969Z").unwrap();
        assert_eq!(parsed.timestamp_millis(), 1_481_703_329_969);

        let shifted = parse_timestamp("created_at", "2016-12-01T12:03:13+01:00").unwrap();
        assert_eq!(shifted, at);
    }

    #[test]
    fn invalid_timestamp_is_an_error() {
        let err = parse_timestamp("created_at", "yesterday").unwrap_err();
        match err {
            DecodeError::Timestamp { field, value, .. } => {
                assert_eq!(field, "created_at");
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(parse_optional_timestamp("send_at", None).unwrap(), None);
    }

    #[test]
    fn dates_are_formatted_without_time() {
        let date = NaiveDate::from_ymd_opt(2016, 12, 1).unwrap();
        assert_eq!(format_date(date), "2016-12-01");
    }

    #[test]
    fn put_patch_distinguishes_all_three_states() {
        let mut fields = Map::new();
        put_patch(&mut fields, "a", Patch::Unchanged);
        put_patch(&mut fields, "b", Patch::Reset);
        put_patch(&mut fields, "c", Patch::Set(Value::from("x")));

        assert!(!fields.contains_key("a"));
        assert_eq!(fields.get("b"), Some(&Value::Null));
        assert_eq!(fields.get("c"), Some(&Value::from("x")));
    }

    #[test]
    fn discriminator_requires_string_type() {
        assert_eq!(
            discriminator(&serde_json::json!({"type": "mt_text"})).unwrap(),
            "mt_text"
        );
        assert!(matches!(
            discriminator(&serde_json::json!({"type": 1})),
            Err(DecodeError::MissingType)
        ));
        assert!(matches!(
            discriminator(&serde_json::json!({})),
            Err(DecodeError::MissingType)
        ));
    }
}
