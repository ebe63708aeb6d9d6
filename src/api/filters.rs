//! URL builders for the OpenProject v3 endpoints.
//!
//! Pure functions: no I/O, so they are tested directly.

use crate::utils::date::format_api_timestamp;
use chrono::{DateTime, Utc};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::json;

pub const API_PATH: &str = "/api/v3";

/// Origin without trailing slash; hrefs returned by the API are absolute paths.
pub fn origin(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

fn encode_filters(filters: &serde_json::Value) -> String {
    utf8_percent_encode(&filters.to_string(), NON_ALPHANUMERIC).to_string()
}

pub fn projects_url(base_url: &str, pattern: &str) -> String {
    let filters = json!([
        { "name_and_identifier": { "operator": "~", "values": [pattern] } }
    ]);
    format!(
        "{}{}/projects?filters={}",
        origin(base_url),
        API_PATH,
        encode_filters(&filters)
    )
}

/// Work packages of a project, any status.
pub fn work_packages_url(base_url: &str, project_id: u64) -> String {
    let filters = json!([{ "status": { "operator": "*", "values": [] } }]);
    format!(
        "{}{}/projects/{}/work_packages?filters={}",
        origin(base_url),
        API_PATH,
        project_id,
        encode_filters(&filters)
    )
}

pub fn time_entry_url(base_url: &str, id: u64) -> String {
    format!("{}{}/time_entries/{}", origin(base_url), API_PATH, id)
}

/// Time entries created inside `[start, end]`.
pub fn time_entries_window_url(base_url: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let filters = json!([{
        "created_at": {
            "operator": "<>d",
            "values": [format_api_timestamp(start), format_api_timestamp(end)]
        }
    }]);
    format!(
        "{}{}/time_entries?filters={}",
        origin(base_url),
        API_PATH,
        encode_filters(&filters)
    )
}

/// Resolve an `href` from a `_links` object against the API origin.
pub fn resolve_href(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", origin(base_url), href)
    } else {
        format!("{}/{}", origin(base_url), href)
    }
}

/// Append the paging parameters; `offset` is the 1-based page number.
pub fn with_page(url: &str, page_size: usize, offset: usize) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}pageSize={page_size}&offset={offset}")
}
