// src/utils/url.rs

//! Host checks and query-string construction.

use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

use crate::error::{AppError, Result};
use crate::models::WireParams;

// scheme, dotted host, optional port, plain path segments; no query or fragment
static HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://\w+(\.\w+)*(:[0-9]+)?/?(/[.\-\w]*)*$")
        .expect("host pattern must compile")
});

/// Whether `host` is an http(s) URL the crawler can post to.
///
/// # Examples
/// ```
/// use timetable_crawler::utils::url::is_valid_host;
///
/// assert!(is_valid_host("http://112.137.129.115/tkb/listbylist.php"));
/// assert!(!is_valid_host("112.137.129.115/tkb/listbylist.php"));
/// ```
pub fn is_valid_host(host: &str) -> bool {
    HOST_RE.is_match(host) && url::Url::parse(host).is_ok()
}

/// Return the host unchanged, or an [`AppError::InvalidHost`].
pub fn check_host(host: &str) -> Result<&str> {
    if is_valid_host(host) {
        Ok(host)
    } else {
        Err(AppError::invalid_host(host))
    }
}

/// `k1=v1&k2=v2`, in parameter order.
///
/// Values are form-encoded so `&`, `#`, `=`, `+` and `%` can not split or cut
/// the query; names go out as written.
pub fn query_string(params: &WireParams) -> String {
    params
        .iter()
        .map(|(k, v)| {
            let value = v.to_string();
            let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
            format!("{k}={encoded}")
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append the query string to `host`; the host is returned as-is when there
/// are no parameters.
pub fn with_query(host: &str, params: &WireParams) -> String {
    if params.is_empty() {
        host.to_string()
    } else {
        format!("{host}?{}", query_string(params))
    }
}
