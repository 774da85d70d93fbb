//! Transport layer: the XMS wire format.
//!
//! Encoders turn domain requests into JSON bodies or query parameters;
//! decoders turn response bodies back into domain results.

mod batch;
mod delivery_report;
mod error;
mod filter;
mod group;
mod inbound;
mod page;
mod tags;
mod wire;

pub use batch::{
    BATCHES_KEY, decode_batch, decode_batch_value, encode_batch_create, encode_batch_update,
};
pub use delivery_report::{
    decode_batch_delivery_report, decode_recipient_delivery_report, encode_delivery_report_query,
};
pub use error::{ApiErrorBody, DecodeError, decode_api_error};
pub use filter::{encode_batch_filter, encode_group_filter, encode_inbound_filter};
pub use group::{
    GROUPS_KEY, decode_group, decode_group_value, decode_members, encode_group_create,
    encode_group_update,
};
pub use inbound::{INBOUNDS_KEY, decode_inbound, decode_inbound_value};
pub use page::decode_page;
pub use tags::{decode_tags, encode_tag_delta, encode_tags};
