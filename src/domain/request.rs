use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::validation::ValidationError;
use crate::domain::value::{CallbackUrl, DeliveryReport, GroupId, MessageText, Msisdn, Tag};

/// Change to a single optional field of an update request.
///
/// `Unchanged` leaves the server value alone and is omitted from the request body,
/// `Reset` clears it (sent as `null`), `Set` replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Unchanged,
    Reset,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Unchanged
    }
}

impl<T> Patch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Self::Unchanged => Patch::Unchanged,
            Self::Reset => Patch::Reset,
            Self::Set(value) => Patch::Set(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Unchanged => Patch::Unchanged,
            Self::Reset => Patch::Reset,
            Self::Set(value) => Patch::Set(f(value)),
        }
    }
}

/// Template parameters of a text batch.
///
/// Maps a placeholder name to per-recipient substitutions. The recipient key
/// [`Parameters::DEFAULT_KEY`] supplies the value for recipients without an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameters(BTreeMap<String, BTreeMap<String, String>>);

impl Parameters {
    pub const DEFAULT_KEY: &'static str = "default";

    pub fn new() -> Self {
        Self::default()
    }

    /// Set the substitution of `placeholder` for one recipient.
    pub fn insert(
        &mut self,
        placeholder: impl Into<String>,
        recipient: &Msisdn,
        value: impl Into<String>,
    ) -> &mut Self {
        self.0
            .entry(placeholder.into())
            .or_default()
            .insert(recipient.as_str().to_owned(), value.into());
        self
    }

    /// Set the fallback substitution of `placeholder`.
    pub fn insert_default(
        &mut self,
        placeholder: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.0
            .entry(placeholder.into())
            .or_default()
            .insert(Self::DEFAULT_KEY.to_owned(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, BTreeMap<String, String>> {
        &self.0
    }
}

impl From<BTreeMap<String, BTreeMap<String, String>>> for Parameters {
    fn from(value: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        Self(value)
    }
}

/// Optional settings shared by text and binary batch creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOptions {
    pub delivery_report: Option<DeliveryReport>,
    pub send_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
    pub tags: Option<Vec<Tag>>,
    pub callback_url: Option<CallbackUrl>,
}

/// A batch to create (or to replace an existing batch with).
#[derive(Debug, Clone, PartialEq)]
pub enum BatchCreate {
    Text(TextBatch),
    Binary(BinaryBatch),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBatch {
    sender: Msisdn,
    recipients: Vec<Msisdn>,
    body: MessageText,
    parameters: Parameters,
    options: BatchOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryBatch {
    sender: Msisdn,
    recipients: Vec<Msisdn>,
    body: Vec<u8>,
    udh: Vec<u8>,
    options: BatchOptions,
}

impl BatchCreate {
    /// Text batch without template parameters.
    pub fn text(
        sender: Msisdn,
        recipients: Vec<Msisdn>,
        body: MessageText,
        options: BatchOptions,
    ) -> Result<Self, ValidationError> {
        Self::text_with_parameters(sender, recipients, body, Parameters::default(), options)
    }

    pub fn text_with_parameters(
        sender: Msisdn,
        recipients: Vec<Msisdn>,
        body: MessageText,
        parameters: Parameters,
        options: BatchOptions,
    ) -> Result<Self, ValidationError> {
        ensure_recipients(&recipients)?;
        Ok(Self::Text(TextBatch {
            sender,
            recipients,
            body,
            parameters,
            options,
        }))
    }

    pub fn binary(
        sender: Msisdn,
        recipients: Vec<Msisdn>,
        body: impl Into<Vec<u8>>,
        udh: impl Into<Vec<u8>>,
        options: BatchOptions,
    ) -> Result<Self, ValidationError> {
        ensure_recipients(&recipients)?;
        Ok(Self::Binary(BinaryBatch {
            sender,
            recipients,
            body: body.into(),
            udh: udh.into(),
            options,
        }))
    }

    pub fn sender(&self) -> &Msisdn {
        match self {
            Self::Text(text) => &text.sender,
            Self::Binary(binary) => &binary.sender,
        }
    }

    pub fn recipients(&self) -> &[Msisdn] {
        match self {
            Self::Text(text) => &text.recipients,
            Self::Binary(binary) => &binary.recipients,
        }
    }

    pub fn options(&self) -> &BatchOptions {
        match self {
            Self::Text(text) => &text.options,
            Self::Binary(binary) => &binary.options,
        }
    }
}

fn ensure_recipients(recipients: &[Msisdn]) -> Result<(), ValidationError> {
    if recipients.is_empty() {
        return Err(ValidationError::Empty {
            field: Msisdn::FIELD,
        });
    }
    Ok(())
}

impl TextBatch {
    pub fn body(&self) -> &MessageText {
        &self.body
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

impl BinaryBatch {
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn udh(&self) -> &[u8] {
        &self.udh
    }
}

/// Changes shared by text and binary batch updates.
///
/// Recipient insertions and removals are applied by the server on top of the
/// current recipient list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchUpdateOptions {
    pub sender: Option<Msisdn>,
    pub recipient_insertions: Vec<Msisdn>,
    pub recipient_removals: Vec<Msisdn>,
    pub delivery_report: Patch<DeliveryReport>,
    pub send_at: Patch<DateTime<Utc>>,
    pub expire_at: Patch<DateTime<Utc>>,
    pub callback_url: Patch<CallbackUrl>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchUpdate {
    Text(TextBatchUpdate),
    Binary(BinaryBatchUpdate),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBatchUpdate {
    pub body: Option<MessageText>,
    pub parameters: Patch<Parameters>,
    pub options: BatchUpdateOptions,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryBatchUpdate {
    pub body: Option<Vec<u8>>,
    pub udh: Option<Vec<u8>>,
    pub options: BatchUpdateOptions,
}

impl From<TextBatchUpdate> for BatchUpdate {
    fn from(value: TextBatchUpdate) -> Self {
        Self::Text(value)
    }
}

impl From<BinaryBatchUpdate> for BatchUpdate {
    fn from(value: BinaryBatchUpdate) -> Self {
        Self::Binary(value)
    }
}

/// First/second keyword pair matched against inbound messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords {
    pub first_word: Option<String>,
    pub second_word: Option<String>,
}

impl Keywords {
    pub fn is_empty(&self) -> bool {
        self.first_word.is_none() && self.second_word.is_none()
    }
}

/// Rule letting inbound messages to `recipient` add or remove their sender from a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoUpdate {
    pub recipient: Msisdn,
    pub add: Keywords,
    pub remove: Keywords,
}

impl AutoUpdate {
    pub fn new(recipient: Msisdn) -> Self {
        Self {
            recipient,
            add: Keywords::default(),
            remove: Keywords::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupCreate {
    pub name: Option<String>,
    pub members: Vec<Msisdn>,
    pub child_groups: Vec<GroupId>,
    pub auto_update: Option<AutoUpdate>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupUpdate {
    pub name: Patch<String>,
    pub member_insertions: Vec<Msisdn>,
    pub member_removals: Vec<Msisdn>,
    pub child_group_insertions: Vec<GroupId>,
    pub child_group_removals: Vec<GroupId>,
    /// Copy all members of another group into this one.
    pub add_from_group: Option<GroupId>,
    /// Remove every member that also belongs to another group.
    pub remove_from_group: Option<GroupId>,
    pub auto_update: Patch<AutoUpdate>,
}

/// Add/remove pair describing a tag-set change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDelta {
    pub add: Vec<Tag>,
    pub remove: Vec<Tag>,
}

impl TagDelta {
    pub fn new(add: Vec<Tag>, remove: Vec<Tag>) -> Self {
        Self { add, remove }
    }
}

/// Filter used when listing batches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchFilter {
    pub page_size: Option<u32>,
    pub senders: Vec<Msisdn>,
    pub tags: Vec<Tag>,
    /// Only batches sent on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Only batches sent before this date.
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFilter {
    pub page_size: Option<u32>,
    pub tags: Vec<Tag>,
}

/// Filter used when listing inbound messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundFilter {
    pub page_size: Option<u32>,
    pub recipients: Vec<Msisdn>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKind {
    #[default]
    Summary,
    Full,
}

/// Parameters of a batch delivery report request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReportQuery {
    pub kind: ReportKind,
    /// Restrict to these delivery statuses, e.g. `Delivered`.
    pub statuses: Vec<String>,
    /// Restrict to these delivery status codes.
    pub codes: Vec<u32>,
}
