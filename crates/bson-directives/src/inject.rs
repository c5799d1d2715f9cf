//! Injection block decomposition: `@import` declarations vs. residual code.

use crate::grammar;
use serde::Serialize;

/// Import paths declared in an injection block, in source order.
///
/// Duplicates are kept. Aliased forms (`@import name "path"`) are not
/// recognized and stay in the residual code.
pub fn extract_imports(block: &str) -> Vec<String> {
    grammar::match_imports(block).map(str::to_string).collect()
}

/// The injection block with every `@import "<path>"` removed. Whitespace and
/// newlines around the removed spans are left as they were.
pub fn strip_imports(block: &str) -> String {
    grammar::remove_imports(block)
}

/// An injection block split into its imports and the code to emit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InjectBlock {
    pub imports: Vec<String>,
    pub code: String,
}

impl InjectBlock {
    pub fn parse(block: &str) -> Self {
        Self {
            imports: extract_imports(block),
            code: strip_imports(block),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.code.is_empty()
    }
}
