//! Share links and deep links.
//!
//! A query travels as the whole path segment of a link:
//! `https://cook.aries-happy.com/<percent-encoded query>`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Link that reopens `query` when shared.
pub fn share_url(base: &str, query: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), encode_component(query))
}

/// Extract the query from a deep link.
///
/// Accepts a full URL (query string and fragment are ignored), a bare path
/// such as `/%E5%AE%AB%E4%BF%9D%E9%B8%A1%E4%B8%81`, or plain text. Malformed
/// escapes decode lossily instead of failing.
pub fn query_from_link(link: &str) -> String {
    let path = match link.split_once("://") {
        Some((_, rest)) => {
            let path = rest.find('/').map(|i| &rest[i..]).unwrap_or("");
            path.split(['?', '#']).next().unwrap_or("")
        }
        None => link,
    };

    let segment = path.strip_prefix('/').unwrap_or(path);
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
