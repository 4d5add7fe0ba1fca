//! Detect email-shaped text inside plain documents

use crate::types::EmailRecord;
use regex::{Captures, Regex};
use std::sync::LazyLock;

// Header value runs to the end of its line; a header without a line
// terminator does not match
static FROM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)From:\s*(.*?)[\r\n]").unwrap());

static TO_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)To:\s*(.*?)[\r\n]").unwrap());

static SUBJECT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Subject:\s*(.*?)[\r\n]").unwrap());

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Date:\s*(.*?)[\r\n]").unwrap());

/// Minimum number of header matches for text to count as an email
const MIN_HEADERS: usize = 2;

/// Recover email fields from text, or `None` if it does not look like one
///
/// The body is everything after the header match that ends last.
#[must_use]
pub fn detect_email(text: &str) -> Option<EmailRecord> {
    let from = FROM_REGEX.captures(text);
    let to = TO_REGEX.captures(text);
    let subject = SUBJECT_REGEX.captures(text);
    let date = DATE_REGEX.captures(text);

    let matched: Vec<&Captures<'_>> = [&from, &to, &subject, &date]
        .into_iter()
        .flatten()
        .collect();
    if matched.len() < MIN_HEADERS {
        return None;
    }

    let headers_end = matched
        .iter()
        .filter_map(|c| c.get(0))
        .map(|m| m.end())
        .max()
        .unwrap_or(0);

    Some(EmailRecord {
        subject: value(subject.as_ref()),
        from: value(from.as_ref()),
        to: value(to.as_ref()),
        date: value(date.as_ref()),
        email_body: text[headers_end..].trim().to_string(),
        ..EmailRecord::default()
    })
}

fn value(captures: Option<&Captures<'_>>) -> String {
    captures
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
