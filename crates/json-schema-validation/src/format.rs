//! `format` checkers
//!
//! Formats assert only when `ValidatorOptions::validate_formats` is set.
//! Names not listed in [`Format`] are never checked.

use crate::resolver::DEFAULT_BASE_URI;
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};
use url::Url;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email regex is valid"));

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^P(?:\d+W|(?:\d+Y)?(?:\d+M)?(?:\d+D)?(?:T(?:\d+H)?(?:\d+M)?(?:\d+S)?)?)$")
        .expect("duration regex is valid")
});

static REFERENCE_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse(DEFAULT_BASE_URI).expect("reference base is a valid URL"));

/// A `format` value this crate can assert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Date,
    DateTime,
    Time,
    Email,
    IdnEmail,
    Hostname,
    IdnHostname,
    Ipv4,
    Ipv6,
    Uri,
    UriReference,
    Iri,
    IriReference,
    UriTemplate,
    JsonPointer,
    RelativeJsonPointer,
    Regex,
    Uuid,
    Duration,
}

impl Format {
    pub fn from_name(name: &str) -> Option<Format> {
        let format = match name {
            "date" => Format::Date,
            "date-time" => Format::DateTime,
            "time" => Format::Time,
            "email" => Format::Email,
            "idn-email" => Format::IdnEmail,
            "hostname" => Format::Hostname,
            "idn-hostname" => Format::IdnHostname,
            "ipv4" => Format::Ipv4,
            "ipv6" => Format::Ipv6,
            "uri" => Format::Uri,
            "uri-reference" => Format::UriReference,
            "iri" => Format::Iri,
            "iri-reference" => Format::IriReference,
            "uri-template" => Format::UriTemplate,
            "json-pointer" => Format::JsonPointer,
            "relative-json-pointer" => Format::RelativeJsonPointer,
            "regex" => Format::Regex,
            "uuid" => Format::Uuid,
            "duration" => Format::Duration,
            _ => return None,
        };
        Some(format)
    }

    pub fn is_valid(self, s: &str) -> bool {
        match self {
            Format::Date => is_date(s),
            Format::DateTime => DateTime::parse_from_rfc3339(s).is_ok(),
            Format::Time => is_time(s),
            Format::Email => s.is_ascii() && is_email(s),
            Format::IdnEmail => is_email(s),
            Format::Hostname => s.is_ascii() && is_hostname(s),
            Format::IdnHostname => is_hostname(s),
            Format::Ipv4 => s.parse::<Ipv4Addr>().is_ok(),
            Format::Ipv6 => s.parse::<Ipv6Addr>().is_ok(),
            Format::Uri => s.is_ascii() && is_uri(s),
            Format::Iri => is_uri(s),
            Format::UriReference => s.is_ascii() && is_uri_reference(s),
            Format::IriReference => is_uri_reference(s),
            Format::UriTemplate => is_uri_template(s),
            Format::JsonPointer => is_json_pointer(s),
            Format::RelativeJsonPointer => is_relative_json_pointer(s),
            Format::Regex => fancy_regex::Regex::new(s).is_ok(),
            Format::Uuid => s.len() == 36 && uuid::Uuid::parse_str(s).is_ok(),
            Format::Duration => is_duration(s),
        }
    }
}

/// `YYYY-MM-DD`, with a real calendar day
fn is_date(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// RFC 3339 `full-time`: a time with a mandatory offset
fn is_time(s: &str) -> bool {
    DateTime::parse_from_rfc3339(&format!("1970-01-01T{}", s)).is_ok()
}

fn is_email(s: &str) -> bool {
    if !EMAIL.is_match(s) {
        return false;
    }
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    if let Some(literal) = domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        return match literal.strip_prefix("IPv6:") {
            Some(v6) => v6.parse::<Ipv6Addr>().is_ok(),
            None => literal.parse::<Ipv4Addr>().is_ok(),
        };
    }
    is_hostname(domain)
}

/// Dot-separated labels of at most 63 characters, without leading or
/// trailing hyphens. Non-ASCII letters are accepted; the ASCII-only
/// `hostname` format filters them out first.
fn is_hostname(s: &str) -> bool {
    let name = s.strip_suffix('.').unwrap_or(s);
    if name.is_empty() || name.chars().count() > 253 {
        return false;
    }
    name.split('.').all(|label| {
        !label.is_empty()
            && label.chars().count() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|ch| ch.is_alphanumeric() || ch == '-')
    })
}

fn is_uri(s: &str) -> bool {
    !s.chars().any(|ch| ch.is_whitespace() || ch == '\\') && Url::parse(s).is_ok()
}

fn is_uri_reference(s: &str) -> bool {
    !s.chars().any(|ch| ch.is_whitespace() || ch == '\\')
        && (Url::parse(s).is_ok() || REFERENCE_BASE.join(s).is_ok())
}

/// RFC 6570 level-4 syntax check: balanced, non-nested, non-empty braces
fn is_uri_template(s: &str) -> bool {
    let mut in_expression = false;
    let mut expression_len = 0;
    for ch in s.chars() {
        match ch {
            '{' if in_expression => return false,
            '{' => {
                in_expression = true;
                expression_len = 0;
            }
            '}' if !in_expression || expression_len == 0 => return false,
            '}' => in_expression = false,
            _ if in_expression => expression_len += 1,
            _ => {}
        }
    }
    !in_expression
}

fn is_json_pointer(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if !s.starts_with('/') {
        return false;
    }
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '~' && !matches!(chars.next(), Some('0' | '1')) {
            return false;
        }
    }
    true
}

/// A non-negative integer without leading zeros, followed by `#` or a
/// JSON Pointer
fn is_relative_json_pointer(s: &str) -> bool {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || (digits > 1 && s.starts_with('0')) {
        return false;
    }
    let rest = &s[digits..];
    rest == "#" || is_json_pointer(rest)
}

/// ISO 8601 duration, e.g. `P1Y2M3DT4H5M6S` or `P2W`
fn is_duration(s: &str) -> bool {
    DURATION.is_match(s) && s != "P" && !s.ends_with('T')
}
