//! Draft 6/7 content assertions: `contentEncoding` and `contentMediaType`

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use json_schema_value::parse_slice;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Base64,
}

impl ContentEncoding {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "base64" => Some(ContentEncoding::Base64),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ContentEncoding::Base64 => "base64",
        }
    }

    /// The decoded bytes, or `None` when `s` is not valid in this encoding
    pub fn decode(self, s: &str) -> Option<Vec<u8>> {
        match self {
            ContentEncoding::Base64 => STANDARD.decode(s).ok(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Json,
}

impl MediaType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "application/json" => Some(MediaType::Json),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MediaType::Json => "application/json",
        }
    }

    pub fn accepts(self, content: &[u8]) -> bool {
        match self {
            MediaType::Json => parse_slice(content).is_ok(),
        }
    }
}

/// Outcome of checking one string against the content keywords
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ContentCheck {
    Valid,
    BadEncoding,
    BadMediaType,
}

pub(crate) fn check(
    s: &str,
    encoding: Option<ContentEncoding>,
    media_type: Option<MediaType>,
) -> ContentCheck {
    let content: Cow<'_, [u8]> = match encoding {
        Some(encoding) => match encoding.decode(s) {
            Some(bytes) => Cow::Owned(bytes),
            None => return ContentCheck::BadEncoding,
        },
        None => Cow::Borrowed(s.as_bytes()),
    };
    match media_type {
        Some(media_type) if !media_type.accepts(&content) => ContentCheck::BadMediaType,
        _ => ContentCheck::Valid,
    }
}
