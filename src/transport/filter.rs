//! Query-string encoding of list filters.
//!
//! Parameters come out in a fixed order: `page_size`, then the list filters,
//! then the date range. The page index itself is added by the caller.

use chrono::NaiveDate;

use super::wire::format_date;
use crate::domain::{BatchFilter, GroupFilter, InboundFilter, Msisdn, Tag};

pub fn encode_batch_filter(filter: &BatchFilter) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    push_page_size(&mut params, filter.page_size);
    push_joined(&mut params, "from", filter.senders.iter().map(Msisdn::as_str));
    push_joined(&mut params, "tags", filter.tags.iter().map(Tag::as_str));
    push_date_range(&mut params, filter.start_date, filter.end_date);
    params
}

pub fn encode_group_filter(filter: &GroupFilter) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    push_page_size(&mut params, filter.page_size);
    push_joined(&mut params, "tags", filter.tags.iter().map(Tag::as_str));
    params
}

pub fn encode_inbound_filter(filter: &InboundFilter) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    push_page_size(&mut params, filter.page_size);
    push_joined(&mut params, "to", filter.recipients.iter().map(Msisdn::as_str));
    push_date_range(&mut params, filter.start_date, filter.end_date);
    params
}

fn push_page_size(params: &mut Vec<(String, String)>, page_size: Option<u32>) {
    if let Some(page_size) = page_size {
        params.push(("page_size".to_owned(), page_size.to_string()));
    }
}

fn push_joined<'a>(
    params: &mut Vec<(String, String)>,
    key: &str,
    values: impl Iterator<Item = &'a str>,
) {
    let joined = values.collect::<Vec<_>>().join(",");
    if !joined.is_empty() {
        params.push((key.to_owned(), joined));
    }
}

fn push_date_range(
    params: &mut Vec<(String, String)>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    if let Some(start) = start {
        params.push(("start_date".to_owned(), format_date(start)));
    }
    if let Some(end) = end {
        params.push(("end_date".to_owned(), format_date(end)));
    }
}
