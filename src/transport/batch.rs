use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::DecodeError;
use super::wire::{
    TransportDeliveryReport, decode_base64, decode_hex, delivery_report_value, discriminator,
    encode_base64, encode_hex, format_timestamp, msisdns_from_wire, msisdns_value,
    parse_optional_timestamp, parse_timestamp, put_patch, tags_from_wire, tags_value,
};
use crate::domain::{
    BatchBody, BatchCreate, BatchId, BatchOptions, BatchResult, BatchUpdate, BatchUpdateOptions,
    Msisdn, Parameters,
};

const MT_TEXT: &str = "mt_text";
const MT_BINARY: &str = "mt_binary";

/// Key of the item array in batch listings.
pub const BATCHES_KEY: &str = "batches";

#[derive(Debug, Deserialize)]
struct BatchCommonJson {
    id: String,
    from: String,
    to: Vec<String>,
    #[serde(default)]
    canceled: bool,
    created_at: String,
    modified_at: String,
    #[serde(default)]
    delivery_report: Option<TransportDeliveryReport>,
    #[serde(default)]
    send_at: Option<String>,
    #[serde(default)]
    expire_at: Option<String>,
    #[serde(default)]
    callback_url: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TextBatchJson {
    #[serde(flatten)]
    common: BatchCommonJson,
    body: String,
    #[serde(default)]
    parameters: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct BinaryBatchJson {
    #[serde(flatten)]
    common: BatchCommonJson,
    body: String,
    udh: String,
}

pub fn encode_batch_create(batch: &BatchCreate) -> Value {
    let mut fields = Map::new();

    match batch {
        BatchCreate::Text(text) => {
            fields.insert("type".to_owned(), Value::from(MT_TEXT));
            fields.insert("body".to_owned(), Value::from(text.body().as_str()));
            if !text.parameters().is_empty() {
                fields.insert("parameters".to_owned(), parameters_value(text.parameters()));
            }
        }
        BatchCreate::Binary(binary) => {
            fields.insert("type".to_owned(), Value::from(MT_BINARY));
            fields.insert("body".to_owned(), Value::from(encode_base64(binary.body())));
            fields.insert("udh".to_owned(), Value::from(encode_hex(binary.udh())));
        }
    }

    fields.insert("from".to_owned(), Value::from(batch.sender().as_str()));
    fields.insert("to".to_owned(), msisdns_value(batch.recipients()));
    push_options(&mut fields, batch.options());

    Value::Object(fields)
}

fn push_options(fields: &mut Map<String, Value>, options: &BatchOptions) {
    if let Some(report) = options.delivery_report {
        fields.insert("delivery_report".to_owned(), delivery_report_value(report));
    }
    if let Some(send_at) = options.send_at.as_ref() {
        fields.insert("send_at".to_owned(), Value::from(format_timestamp(send_at)));
    }
    if let Some(expire_at) = options.expire_at.as_ref() {
        fields.insert("expire_at".to_owned(), Value::from(format_timestamp(expire_at)));
    }
    if let Some(tags) = options.tags.as_ref() {
        fields.insert("tags".to_owned(), tags_value(tags));
    }
    if let Some(callback_url) = options.callback_url.as_ref() {
        fields.insert("callback_url".to_owned(), Value::from(callback_url.as_str()));
    }
}

pub fn encode_batch_update(update: &BatchUpdate) -> Value {
    let mut fields = Map::new();

    let options = match update {
        BatchUpdate::Text(text) => {
            fields.insert("type".to_owned(), Value::from(MT_TEXT));
            if let Some(body) = text.body.as_ref() {
                fields.insert("body".to_owned(), Value::from(body.as_str()));
            }
            put_patch(
                &mut fields,
                "parameters",
                text.parameters.as_ref().map(parameters_value),
            );
            &text.options
        }
        BatchUpdate::Binary(binary) => {
            fields.insert("type".to_owned(), Value::from(MT_BINARY));
            if let Some(body) = binary.body.as_deref() {
                fields.insert("body".to_owned(), Value::from(encode_base64(body)));
            }
            if let Some(udh) = binary.udh.as_deref() {
                fields.insert("udh".to_owned(), Value::from(encode_hex(udh)));
            }
            &binary.options
        }
    };

    push_update_options(&mut fields, options);
    Value::Object(fields)
}

fn push_update_options(fields: &mut Map<String, Value>, options: &BatchUpdateOptions) {
    if let Some(sender) = options.sender.as_ref() {
        fields.insert("from".to_owned(), Value::from(sender.as_str()));
    }
    if !options.recipient_insertions.is_empty() {
        fields.insert(
            "to_add".to_owned(),
            msisdns_value(&options.recipient_insertions),
        );
    }
    if !options.recipient_removals.is_empty() {
        fields.insert(
            "to_remove".to_owned(),
            msisdns_value(&options.recipient_removals),
        );
    }
    put_patch(
        fields,
        "delivery_report",
        options
            .delivery_report
            .as_ref()
            .map(|report| delivery_report_value(*report)),
    );
    put_patch(
        fields,
        "send_at",
        options
            .send_at
            .as_ref()
            .map(|at| Value::from(format_timestamp(at))),
    );
    put_patch(
        fields,
        "expire_at",
        options
            .expire_at
            .as_ref()
            .map(|at| Value::from(format_timestamp(at))),
    );
    put_patch(
        fields,
        "callback_url",
        options
            .callback_url
            .as_ref()
            .map(|url| Value::from(url.as_str())),
    );
}

fn parameters_value(parameters: &Parameters) -> Value {
    parameters
        .as_map()
        .iter()
        .map(|(placeholder, substitutions)| {
            let substitutions = substitutions
                .iter()
                .map(|(recipient, value)| (recipient.clone(), Value::from(value.as_str())))
                .collect::<Map<String, Value>>();
            (placeholder.clone(), Value::Object(substitutions))
        })
        .collect::<Map<String, Value>>()
        .into()
}

pub fn decode_batch(json: &str) -> Result<BatchResult, DecodeError> {
    let value: Value = serde_json::from_str(json)?;
    decode_batch_value(value)
}

/// Decode one batch object, dispatching on its `type`.
pub fn decode_batch_value(value: Value) -> Result<BatchResult, DecodeError> {
    match discriminator(&value)?.as_str() {
        MT_TEXT => {
            let parsed: TextBatchJson = serde_json::from_value(value)?;
            let body = BatchBody::Text {
                body: parsed.body,
                parameters: Parameters::from(parsed.parameters),
            };
            batch_result(parsed.common, body)
        }
        MT_BINARY => {
            let parsed: BinaryBatchJson = serde_json::from_value(value)?;
            let body = BatchBody::Binary {
                body: decode_base64("body", &parsed.body)?,
                udh: decode_hex("udh", &parsed.udh)?,
            };
            batch_result(parsed.common, body)
        }
        other => Err(DecodeError::UnknownType(other.to_owned())),
    }
}

fn batch_result(common: BatchCommonJson, body: BatchBody) -> Result<BatchResult, DecodeError> {
    Ok(BatchResult {
        id: BatchId::from_wire(common.id),
        sender: Msisdn::from_wire(common.from),
        recipients: msisdns_from_wire(common.to),
        canceled: common.canceled,
        created_at: parse_timestamp("created_at", &common.created_at)?,
        modified_at: parse_timestamp("modified_at", &common.modified_at)?,
        delivery_report: common.delivery_report.map(Into::into),
        send_at: parse_optional_timestamp("send_at", common.send_at.as_deref())?,
        expire_at: parse_optional_timestamp("expire_at", common.expire_at.as_deref())?,
        callback_url: common.callback_url,
        tags: tags_from_wire(common.tags),
        body,
    })
}
