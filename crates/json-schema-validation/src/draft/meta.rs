//! Embedded meta-schema documents.

use super::Draft;
use json_schema_value::{Value, parse};
use once_cell::sync::Lazy;

/// One embedded meta-schema document.
#[derive(Debug)]
pub struct MetaSchema {
    /// Absolute URI, without a trailing `#`
    pub uri: &'static str,
    pub draft: Draft,
    pub value: Value,
}

const EMBEDDED: &[(&str, Draft, &str)] = &[
    (
        "http://json-schema.org/draft-04/schema",
        Draft::Draft4,
        include_str!("../../metaschemas/draft4.json"),
    ),
    (
        "http://json-schema.org/draft-06/schema",
        Draft::Draft6,
        include_str!("../../metaschemas/draft6.json"),
    ),
    (
        "http://json-schema.org/draft-07/schema",
        Draft::Draft7,
        include_str!("../../metaschemas/draft7.json"),
    ),
    (
        "https://json-schema.org/draft/2019-09/schema",
        Draft::Draft201909,
        include_str!("../../metaschemas/draft2019-09/schema.json"),
    ),
    (
        "https://json-schema.org/draft/2019-09/meta/core",
        Draft::Draft201909,
        include_str!("../../metaschemas/draft2019-09/meta/core.json"),
    ),
    (
        "https://json-schema.org/draft/2019-09/meta/applicator",
        Draft::Draft201909,
        include_str!("../../metaschemas/draft2019-09/meta/applicator.json"),
    ),
    (
        "https://json-schema.org/draft/2019-09/meta/validation",
        Draft::Draft201909,
        include_str!("../../metaschemas/draft2019-09/meta/validation.json"),
    ),
    (
        "https://json-schema.org/draft/2019-09/meta/meta-data",
        Draft::Draft201909,
        include_str!("../../metaschemas/draft2019-09/meta/meta-data.json"),
    ),
    (
        "https://json-schema.org/draft/2019-09/meta/format",
        Draft::Draft201909,
        include_str!("../../metaschemas/draft2019-09/meta/format.json"),
    ),
    (
        "https://json-schema.org/draft/2019-09/meta/content",
        Draft::Draft201909,
        include_str!("../../metaschemas/draft2019-09/meta/content.json"),
    ),
    (
        "https://json-schema.org/draft/2020-12/schema",
        Draft::Draft202012,
        include_str!("../../metaschemas/draft2020-12/schema.json"),
    ),
    (
        "https://json-schema.org/draft/2020-12/meta/core",
        Draft::Draft202012,
        include_str!("../../metaschemas/draft2020-12/meta/core.json"),
    ),
    (
        "https://json-schema.org/draft/2020-12/meta/applicator",
        Draft::Draft202012,
        include_str!("../../metaschemas/draft2020-12/meta/applicator.json"),
    ),
    (
        "https://json-schema.org/draft/2020-12/meta/unevaluated",
        Draft::Draft202012,
        include_str!("../../metaschemas/draft2020-12/meta/unevaluated.json"),
    ),
    (
        "https://json-schema.org/draft/2020-12/meta/validation",
        Draft::Draft202012,
        include_str!("../../metaschemas/draft2020-12/meta/validation.json"),
    ),
    (
        "https://json-schema.org/draft/2020-12/meta/meta-data",
        Draft::Draft202012,
        include_str!("../../metaschemas/draft2020-12/meta/meta-data.json"),
    ),
    (
        "https://json-schema.org/draft/2020-12/meta/format-annotation",
        Draft::Draft202012,
        include_str!("../../metaschemas/draft2020-12/meta/format-annotation.json"),
    ),
    (
        "https://json-schema.org/draft/2020-12/meta/content",
        Draft::Draft202012,
        include_str!("../../metaschemas/draft2020-12/meta/content.json"),
    ),
];

/// All embedded meta-schemas, parsed on first use.
///
/// # Panics
///
/// Panics if an embedded document is not valid JSON, which can only
/// happen if one of the files under `metaschemas/` is edited by hand.
static META_SCHEMAS: Lazy<Vec<MetaSchema>> = Lazy::new(|| {
    EMBEDDED
        .iter()
        .map(|&(uri, draft, text)| MetaSchema {
            uri,
            draft,
            value: parse(text).expect("embedded meta-schema must be valid JSON"),
        })
        .collect()
});

pub fn meta_schemas() -> &'static [MetaSchema] {
    &META_SCHEMAS
}

pub(super) fn top_level(draft: Draft) -> &'static Value {
    let index = match draft {
        Draft::Draft4 => 0,
        Draft::Draft6 => 1,
        Draft::Draft7 => 2,
        Draft::Draft201909 => 3,
        Draft::Draft202012 => 10,
    };
    &META_SCHEMAS[index].value
}
