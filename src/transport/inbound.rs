use serde::Deserialize;
use serde_json::Value;

use super::error::DecodeError;
use super::wire::{
    decode_base64, decode_hex, discriminator, parse_optional_timestamp, parse_timestamp,
};
use crate::domain::{InboundBody, InboundId, InboundMessage, Msisdn};

const MO_TEXT: &str = "mo_text";
const MO_BINARY: &str = "mo_binary";

/// Key of the item array in inbound listings.
pub const INBOUNDS_KEY: &str = "inbounds";

#[derive(Debug, Deserialize)]
struct InboundCommonJson {
    id: String,
    from: String,
    to: String,
    #[serde(default)]
    operator: Option<String>,
    #[serde(default)]
    sent_at: Option<String>,
    received_at: String,
}

#[derive(Debug, Deserialize)]
struct TextInboundJson {
    #[serde(flatten)]
    common: InboundCommonJson,
    body: String,
}

#[derive(Debug, Deserialize)]
struct BinaryInboundJson {
    #[serde(flatten)]
    common: InboundCommonJson,
    body: String,
    udh: String,
}

pub fn decode_inbound(json: &str) -> Result<InboundMessage, DecodeError> {
    let value: Value = serde_json::from_str(json)?;
    decode_inbound_value(value)
}

pub fn decode_inbound_value(value: Value) -> Result<InboundMessage, DecodeError> {
    match discriminator(&value)?.as_str() {
        MO_TEXT => {
            let parsed: TextInboundJson = serde_json::from_value(value)?;
            inbound_message(parsed.common, InboundBody::Text(parsed.body))
        }
        MO_BINARY => {
            let parsed: BinaryInboundJson = serde_json::from_value(value)?;
            let body = InboundBody::Binary {
                body: decode_base64("body", &parsed.body)?,
                udh: decode_hex("udh", &parsed.udh)?,
            };
            inbound_message(parsed.common, body)
        }
        other => Err(DecodeError::UnknownType(other.to_owned())),
    }
}

fn inbound_message(
    common: InboundCommonJson,
    body: InboundBody,
) -> Result<InboundMessage, DecodeError> {
    Ok(InboundMessage {
        id: InboundId::from_wire(common.id),
        sender: Msisdn::from_wire(common.from),
        recipient: Msisdn::from_wire(common.to),
        operator: common.operator,
        sent_at: parse_optional_timestamp("sent_at", common.sent_at.as_deref())?,
        received_at: parse_timestamp("received_at", &common.received_at)?,
        body,
    })
}
