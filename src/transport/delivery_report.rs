use serde::Deserialize;
use serde_json::Value;

use super::error::DecodeError;
use super::wire::{discriminator, msisdns_from_wire, parse_optional_timestamp, parse_timestamp};
use crate::domain::{
    BatchDeliveryReport, BatchId, DeliveryReportQuery, DeliveryReportStatus, Msisdn,
    RecipientDeliveryReport, ReportKind,
};

const BATCH_REPORT_TYPE: &str = "delivery_report_sms";
const RECIPIENT_REPORT_TYPE: &str = "recipient_delivery_report_sms";

#[derive(Debug, Deserialize)]
struct BatchDeliveryReportJson {
    batch_id: String,
    #[serde(default)]
    total_message_count: u64,
    #[serde(default)]
    statuses: Vec<StatusJson>,
}

#[derive(Debug, Deserialize)]
struct StatusJson {
    code: u32,
    status: String,
    count: u64,
    #[serde(default)]
    recipients: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RecipientDeliveryReportJson {
    batch_id: String,
    recipient: String,
    code: u32,
    status: String,
    #[serde(default)]
    status_message: Option<String>,
    #[serde(default)]
    operator: Option<String>,
    at: String,
    #[serde(default)]
    operator_status_at: Option<String>,
}

/// Query parameters of a batch delivery report request.
pub fn encode_delivery_report_query(query: &DeliveryReportQuery) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();

    let kind = match query.kind {
        ReportKind::Summary => "summary",
        ReportKind::Full => "full",
    };
    params.push(("type".to_owned(), kind.to_owned()));

    if !query.statuses.is_empty() {
        params.push(("status".to_owned(), query.statuses.join(",")));
    }
    if !query.codes.is_empty() {
        let codes = query
            .codes
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        params.push(("code".to_owned(), codes));
    }

    params
}

fn expect_type(value: &Value, expected: &str) -> Result<(), DecodeError> {
    let kind = discriminator(value)?;
    if kind != expected {
        return Err(DecodeError::UnknownType(kind));
    }
    Ok(())
}

pub fn decode_batch_delivery_report(json: &str) -> Result<BatchDeliveryReport, DecodeError> {
    let value: Value = serde_json::from_str(json)?;
    expect_type(&value, BATCH_REPORT_TYPE)?;
    let parsed: BatchDeliveryReportJson = serde_json::from_value(value)?;

    let statuses = parsed
        .statuses
        .into_iter()
        .map(|status| DeliveryReportStatus {
            code: status.code,
            status: status.status,
            count: status.count,
            recipients: msisdns_from_wire(status.recipients),
        })
        .collect();

    Ok(BatchDeliveryReport {
        batch_id: BatchId::from_wire(parsed.batch_id),
        total_message_count: parsed.total_message_count,
        statuses,
    })
}

pub fn decode_recipient_delivery_report(
    json: &str,
) -> Result<RecipientDeliveryReport, DecodeError> {
    let value: Value = serde_json::from_str(json)?;
    expect_type(&value, RECIPIENT_REPORT_TYPE)?;
    let parsed: RecipientDeliveryReportJson = serde_json::from_value(value)?;

    Ok(RecipientDeliveryReport {
        batch_id: BatchId::from_wire(parsed.batch_id),
        recipient: Msisdn::from_wire(parsed.recipient),
        code: parsed.code,
        status: parsed.status,
        status_message: parsed.status_message,
        operator: parsed.operator,
        at: parse_timestamp("at", &parsed.at)?,
        operator_status_at: parse_optional_timestamp(
            "operator_status_at",
            parsed.operator_status_at.as_deref(),
        )?,
    })
}
