//! Typed Rust client for the XMS messaging REST API.
//!
//! The crate is split in three layers: a domain layer of strong types, a
//! transport layer turning those types into the exact XMS wire JSON (and back),
//! and a small client layer that assembles URLs and talks HTTP.
//!
//! Update requests distinguish "leave unchanged" from "reset" through
//! [`Patch`]; listings are exposed as [`Pages`], which fetches on demand.
//!
//! ```rust,no_run
//! use xms::{Auth, BatchCreate, BatchOptions, MessageText, Msisdn, XmsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), xms::XmsError> {
//!     let client = XmsClient::new(Auth::new("my-service-plan", "my-token")?);
//!     let batch = BatchCreate::text(
//!         Msisdn::new("12345")?,
//!         vec![Msisdn::new("+46701234567")?],
//!         MessageText::new("hello")?,
//!         BatchOptions::default(),
//!     )?;
//!     let result = client.create_batch(&batch).await?;
//!     println!("created batch {}", result.id.as_str());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod transport;

pub use client::{
    Auth, BoxFuture, HttpMethod, HttpRequest, HttpResponse, HttpTransport, PageFuture, Pages,
    ReqwestTransport, TransportError, XmsClient, XmsClientBuilder, XmsError,
};
pub use domain::{
    AutoUpdate, BatchBody, BatchCreate, BatchDeliveryReport, BatchFilter, BatchId, BatchOptions,
    BatchResult, BatchUpdate, BatchUpdateOptions, BinaryBatchUpdate, CallbackUrl, DeliveryReport,
    DeliveryReportQuery, GroupCreate, GroupFilter, GroupId, GroupResult, GroupUpdate, InboundBody,
    InboundFilter, InboundId, InboundMessage, Keywords, MessageText, Msisdn, Page, Parameters,
    Patch, PhoneNumber, RecipientDeliveryReport, ReportKind, Tag, TagDelta, TextBatchUpdate,
    ValidationError,
};
pub use transport::DecodeError;
