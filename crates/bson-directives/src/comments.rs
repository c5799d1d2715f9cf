//! Comment location index — the lookup the directive engine reads from.
//!
//! The engine never owns comment data. Hosts implement [`CommentIndex`]
//! over whatever their compiler hands them; [`SourceIndex`] covers the
//! common case of protoc `SourceCodeInfo` locations.

use crate::path::join_path;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Comment text attached to one structural path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentBundle {
    pub leading: String,
    pub trailing: String,
    pub leading_detached: Vec<String>,
}

impl CommentBundle {
    pub fn leading_comments(&self) -> &str {
        &self.leading
    }

    pub fn trailing_comments(&self) -> &str {
        &self.trailing
    }

    /// Comment blocks separated from the element by a blank line, in
    /// source order.
    pub fn leading_detached_comments(&self) -> &[String] {
        &self.leading_detached
    }

    pub fn is_empty(&self) -> bool {
        self.leading.is_empty()
            && self.trailing.is_empty()
            && self.leading_detached.iter().all(|c| c.is_empty())
    }
}

/// Lookup from structural path to comment bundle.
pub trait CommentIndex {
    fn comments_for(&self, path: &str) -> Option<&CommentBundle>;
}

impl CommentIndex for HashMap<String, CommentBundle> {
    fn comments_for(&self, path: &str) -> Option<&CommentBundle> {
        self.get(path)
    }
}

impl CommentIndex for BTreeMap<String, CommentBundle> {
    fn comments_for(&self, path: &str) -> Option<&CommentBundle> {
        self.get(path)
    }
}

impl<T: CommentIndex + ?Sized> CommentIndex for &T {
    fn comments_for(&self, path: &str) -> Option<&CommentBundle> {
        (**self).comments_for(path)
    }
}

/// One `SourceCodeInfo.Location` in protobuf JSON form (lowerCamel or
/// original proto field names).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub path: Vec<i32>,
    #[serde(default, alias = "leading_comments")]
    pub leading_comments: Option<String>,
    #[serde(default, alias = "trailing_comments")]
    pub trailing_comments: Option<String>,
    #[serde(default, alias = "leading_detached_comments")]
    pub leading_detached_comments: Vec<String>,
}

impl Location {
    fn has_comments(&self) -> bool {
        self.leading_comments.as_deref().is_some_and(|c| !c.is_empty())
            || self.trailing_comments.as_deref().is_some_and(|c| !c.is_empty())
            || self.leading_detached_comments.iter().any(|c| !c.is_empty())
    }
}

/// [`CommentIndex`] over protoc source locations.
///
/// Only locations carrying comment text are indexed. Protoc emits several
/// locations per path (the element span, then its name/number spans under
/// longer paths); when a path repeats, the first commented one is kept.
#[derive(Debug, Clone, Default)]
pub struct SourceIndex {
    by_path: HashMap<String, CommentBundle>,
}

impl SourceIndex {
    pub fn from_locations<'a, I>(locations: I) -> Self
    where
        I: IntoIterator<Item = &'a Location>,
    {
        let mut by_path = HashMap::new();
        for loc in locations {
            if !loc.has_comments() {
                continue;
            }
            by_path
                .entry(join_path(&loc.path))
                .or_insert_with(|| CommentBundle {
                    leading: loc.leading_comments.clone().unwrap_or_default(),
                    trailing: loc.trailing_comments.clone().unwrap_or_default(),
                    leading_detached: loc.leading_detached_comments.clone(),
                });
        }
        Self { by_path }
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

impl CommentIndex for SourceIndex {
    fn comments_for(&self, path: &str) -> Option<&CommentBundle> {
        self.by_path.get(path)
    }
}
