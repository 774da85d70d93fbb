//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    AutoUpdate, BatchCreate, BatchFilter, BatchOptions, BatchUpdate, BatchUpdateOptions,
    BinaryBatch, BinaryBatchUpdate, DeliveryReportQuery, GroupCreate, GroupFilter, GroupUpdate,
    InboundFilter, Keywords, Parameters, Patch, ReportKind, TagDelta, TextBatch, TextBatchUpdate,
};
pub use response::{
    BatchBody, BatchDeliveryReport, BatchResult, DeliveryReportStatus, GroupResult, InboundBody,
    InboundMessage, Page, RecipientDeliveryReport,
};
pub use validation::ValidationError;
pub use value::{
    ApiToken, BatchId, CallbackUrl, DeliveryReport, GroupId, InboundId, MessageText, Msisdn,
    PhoneNumber, ServicePlanId, Tag,
};
