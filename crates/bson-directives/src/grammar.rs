//! Directive grammar — one compiled pattern per directive kind.
//!
//! Recognized in comment text (case-sensitive):
//!
//! - `@bson_compatible` / `@bson_upsertable` — flags, plain substring match
//! - `@bson_tag: <value>` — value runs to end of line
//! - `@go_inject <block>` — block runs to end of the comment, across lines
//! - `@import "<path>"` — only meaningful inside a `@go_inject` block
//!
//! The flag markers are matched without token boundaries, so
//! `@bson_compatible_v2` or a marker quoted in prose still sets the flag.

use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_BSON_COMPATIBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@bson_compatible").unwrap());

static RE_BSON_UPSERTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@bson_upsertable").unwrap());

static RE_BSON_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@bson_tag: (.*)").unwrap());

// Whitespace after the marker is the ASCII set [ \t\n\f\r]
static RE_GO_INJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)@go_inject[ \t\n\x0C\r](.+)").unwrap());

// No alias form: `@import foo "path"` is not recognized
static RE_GO_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"@import[ \t]+"([^"]+)""#).unwrap());

/// Directive kinds, used for logging and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    BsonCompatible,
    BsonUpsertable,
    BsonTag,
    GoInject,
    Import,
}

impl DirectiveKind {
    /// The literal marker as written in comments.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::BsonCompatible => "@bson_compatible",
            Self::BsonUpsertable => "@bson_upsertable",
            Self::BsonTag => "@bson_tag",
            Self::GoInject => "@go_inject",
            Self::Import => "@import",
        }
    }
}

// -- Matchers -----------------------------------------------------------------

/// Remove exactly one trailing `\n`, if present.
pub(crate) fn trim_one_newline(text: &str) -> &str {
    text.strip_suffix('\n').unwrap_or(text)
}

pub fn has_bson_compatible(text: &str) -> bool {
    RE_BSON_COMPATIBLE.is_match(text)
}

pub fn has_bson_upsertable(text: &str) -> bool {
    RE_BSON_UPSERTABLE.is_match(text)
}

/// Value of the first `@bson_tag:` in `text`, whitespace-trimmed.
pub fn match_bson_tag(text: &str) -> Option<&str> {
    RE_BSON_TAG
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Everything after `@go_inject` and its separator, untouched.
pub fn match_go_inject(text: &str) -> Option<&str> {
    RE_GO_INJECT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Every `@import "<path>"` path in source order, duplicates kept.
pub fn match_imports(block: &str) -> impl Iterator<Item = &str> {
    RE_GO_IMPORT
        .captures_iter(block)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `block` with every `@import "<path>"` occurrence deleted.
pub fn remove_imports(block: &str) -> String {
    RE_GO_IMPORT.replace_all(block, "").into_owned()
}
