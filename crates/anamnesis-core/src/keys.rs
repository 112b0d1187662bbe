//! Storage key conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the canonical
//! layout of insight objects in the Anamnesis bucket.
//!
//! Caller-supplied ids are percent-encoded into a single path segment, so
//! no id can contain `/` and two distinct `(tenant, id)` pairs never share a
//! key.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const INSIGHTS_PREFIX: &str = "insights/";

/// Everything except ASCII alphanumerics, `-` and `_` is escaped, `%` included.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

fn segment(id: &str) -> String {
    utf8_percent_encode(id, SEGMENT).to_string()
}

pub fn tenant_prefix(tenant_id: &str) -> String {
    format!("{INSIGHTS_PREFIX}{}/", segment(tenant_id))
}

/// The authoritative insight for one session. Written at most once.
pub fn session_insight(tenant_id: &str, session_id: &str) -> String {
    format!("{}sessions/{}.json", tenant_prefix(tenant_id), segment(session_id))
}

/// Content-addressed copy of the most recent insight with this answers hash.
pub fn hashed_insight(tenant_id: &str, answers_hash: &str) -> String {
    format!("{}hashes/{}.json", tenant_prefix(tenant_id), segment(answers_hash))
}
