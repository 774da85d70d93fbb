use chrono::{DateTime, Utc};

use crate::domain::request::{AutoUpdate, Parameters};
use crate::domain::value::{BatchId, DeliveryReport, GroupId, InboundId, Msisdn, Tag};

/// A batch as reported by XMS.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub id: BatchId,
    pub sender: Msisdn,
    pub recipients: Vec<Msisdn>,
    pub canceled: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub delivery_report: Option<DeliveryReport>,
    pub send_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
    pub callback_url: Option<String>,
    pub tags: Vec<Tag>,
    pub body: BatchBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchBody {
    Text { body: String, parameters: Parameters },
    Binary { body: Vec<u8>, udh: Vec<u8> },
}

impl BatchResult {
    pub fn is_binary(&self) -> bool {
        matches!(self.body, BatchBody::Binary { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResult {
    pub id: GroupId,
    pub name: Option<String>,
    /// Number of members, including members of child groups.
    pub size: usize,
    pub child_groups: Vec<GroupId>,
    pub auto_update: Option<AutoUpdate>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// A message received by one of the account's numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: InboundId,
    pub sender: Msisdn,
    pub recipient: Msisdn,
    pub operator: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub received_at: DateTime<Utc>,
    pub body: InboundBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundBody {
    Text(String),
    Binary { body: Vec<u8>, udh: Vec<u8> },
}

/// Aggregated delivery statuses of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDeliveryReport {
    pub batch_id: BatchId,
    pub total_message_count: u64,
    pub statuses: Vec<DeliveryReportStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReportStatus {
    pub code: u32,
    pub status: String,
    pub count: u64,
    /// Only populated for full reports.
    pub recipients: Vec<Msisdn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientDeliveryReport {
    pub batch_id: BatchId,
    pub recipient: Msisdn,
    pub code: u32,
    pub status: String,
    pub status_message: Option<String>,
    pub operator: Option<String>,
    pub at: DateTime<Utc>,
    pub operator_status_at: Option<DateTime<Utc>>,
}

/// One slice of a paged listing.
///
/// `size` is the number of items on this page and may be zero; `total_size`
/// counts items across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub page: usize,
    pub size: usize,
    pub total_size: usize,
    pub content: Vec<T>,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}
