//! Resolution policy — which comment bundle(s) each directive reads and
//! which match wins.
//!
//! | directive          | bundle  | candidates (in order)          |
//! |--------------------|---------|--------------------------------|
//! | `@bson_compatible` | message | leading                        |
//! | `@bson_upsertable` | message | leading                        |
//! | `@bson_tag`        | field   | trailing, leading              |
//! | `@go_inject`       | message | each detached block, leading   |
//!
//! Every miss is a silent `false` / empty string.

use crate::comments::{CommentBundle, CommentIndex};
use crate::grammar::{self, trim_one_newline, DirectiveKind};
use crate::inject::InjectBlock;
use crate::path::field_path;
use serde::Serialize;

/// Directive accessors over a borrowed comment index.
///
/// Holds no state besides the index reference; every call re-reads the
/// index and returns owned values.
pub struct Directives<'a, I: CommentIndex + ?Sized> {
    index: &'a I,
}

impl<'a, I: CommentIndex + ?Sized> Directives<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    fn bundle(&self, path: &str) -> Option<&'a CommentBundle> {
        let bundle = self.index.comments_for(path);
        if bundle.is_none() {
            log::trace!("no comments at {}", path);
        }
        bundle
    }

    /// `@bson_compatible` in the message's leading comment.
    pub fn is_bson_compatible(&self, message_path: &str) -> bool {
        self.leading_flag(
            message_path,
            DirectiveKind::BsonCompatible,
            grammar::has_bson_compatible,
        )
    }

    /// `@bson_upsertable` in the message's leading comment.
    pub fn is_bson_upsertable(&self, message_path: &str) -> bool {
        self.leading_flag(
            message_path,
            DirectiveKind::BsonUpsertable,
            grammar::has_bson_upsertable,
        )
    }

    fn leading_flag(
        &self,
        message_path: &str,
        kind: DirectiveKind,
        matcher: fn(&str) -> bool,
    ) -> bool {
        let Some(bundle) = self.bundle(message_path) else {
            return false;
        };
        let found = matcher(trim_one_newline(bundle.leading_comments()));
        if found {
            log::debug!("{} on {}", kind.marker(), message_path);
        }
        found
    }

    /// `@bson_tag` value for the field at position `field` of the message.
    /// Trailing comment first, then leading. Empty when untagged.
    pub fn bson_tag_for(&self, message_path: &str, field: usize) -> String {
        let path = field_path(message_path, field);
        let Some(bundle) = self.bundle(&path) else {
            return String::new();
        };

        for comment in [bundle.trailing_comments(), bundle.leading_comments()] {
            if let Some(tag) = grammar::match_bson_tag(trim_one_newline(comment)) {
                log::debug!("{} {:?} on {}", DirectiveKind::BsonTag.marker(), tag, path);
                return tag.to_string();
            }
        }

        String::new()
    }

    /// Raw `@go_inject` block for the message. Detached leading blocks are
    /// searched before the attached leading comment. Empty when absent.
    pub fn go_inject_for(&self, message_path: &str) -> String {
        let Some(bundle) = self.bundle(message_path) else {
            return String::new();
        };

        let candidates = bundle
            .leading_detached_comments()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(bundle.leading_comments()));

        for comment in candidates {
            if let Some(block) = grammar::match_go_inject(comment) {
                log::debug!(
                    "{} on {} ({} bytes)",
                    DirectiveKind::GoInject.marker(),
                    message_path,
                    block.len()
                );
                return block.to_string();
            }
        }

        String::new()
    }

    /// Every directive for one message. `fields` are the message's field
    /// names in declaration order; their positions address the field paths.
    pub fn summarize<S: AsRef<str>>(
        &self,
        message_path: &str,
        fields: &[S],
    ) -> MessageDirectives {
        let tags = fields
            .iter()
            .enumerate()
            .filter_map(|(position, name)| {
                let tag = self.bson_tag_for(message_path, position);
                (!tag.is_empty()).then(|| FieldTag {
                    position,
                    name: name.as_ref().to_string(),
                    tag,
                })
            })
            .collect();

        let inject = self.go_inject_for(message_path);

        MessageDirectives {
            compatible: self.is_bson_compatible(message_path),
            upsertable: self.is_bson_upsertable(message_path),
            tags,
            inject: (!inject.is_empty()).then(|| InjectBlock::parse(&inject)),
        }
    }
}

/// A field carrying a non-empty `@bson_tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTag {
    pub position: usize,
    pub name: String,
    pub tag: String,
}

/// All directives found for one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageDirectives {
    pub compatible: bool,
    pub upsertable: bool,
    pub tags: Vec<FieldTag>,
    pub inject: Option<InjectBlock>,
}

impl MessageDirectives {
    pub fn has_any(&self) -> bool {
        self.compatible || self.upsertable || !self.tags.is_empty() || self.inject.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const MSG: &str = "4,0";

    fn bundle(leading: &str, trailing: &str, detached: &[&str]) -> CommentBundle {
        CommentBundle {
            leading: leading.to_string(),
            trailing: trailing.to_string(),
            leading_detached: detached.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn index(entries: &[(&str, CommentBundle)]) -> HashMap<String, CommentBundle> {
        entries
            .iter()
            .map(|(path, b)| (path.to_string(), b.clone()))
            .collect()
    }

    #[test]
    fn missing_bundle_yields_nothing() {
        let idx = index(&[]);
        let d = Directives::new(&idx);
        assert!(!d.is_bson_compatible(MSG));
        assert!(!d.is_bson_upsertable(MSG));
        assert_eq!(d.bson_tag_for(MSG, 0), "");
        assert_eq!(d.go_inject_for(MSG), "");
        assert!(!d.summarize(MSG, &["id"]).has_any());
    }

    #[test]
    fn compatible_only_from_leading() {
        let idx = index(&[
            ("4,0", bundle(" @bson_compatible\n", "", &[])),
            ("4,1", bundle(" @bson_upsertable\n", " @bson_compatible\n", &[])),
            ("4,2", bundle("", "", &[" @bson_compatible\n"])),
        ]);
        let d = Directives::new(&idx);
        assert!(d.is_bson_compatible("4,0"));
        assert!(!d.is_bson_upsertable("4,0"));
        assert!(!d.is_bson_compatible("4,1"));
        assert!(d.is_bson_upsertable("4,1"));
        assert!(!d.is_bson_compatible("4,2"));
    }

    #[test]
    fn flag_inside_prose_still_counts() {
        let leading = " Unlike Foo, this is not @bson_compatible-ish.\n";
        let idx = index(&[(MSG, bundle(leading, "", &[]))]);
        assert!(Directives::new(&idx).is_bson_compatible(MSG));
    }

    #[test]
    fn trailing_tag_beats_leading() {
        let idx = index(&[("4,0,2,1", bundle(" @bson_tag: bar\n", " @bson_tag: foo\n", &[]))]);
        let d = Directives::new(&idx);
        assert_eq!(d.bson_tag_for(MSG, 1), "foo");
        assert_eq!(d.bson_tag_for(MSG, 0), "");
    }

    #[test]
    fn leading_tag_is_fallback_and_trimmed() {
        let idx = index(&[("4,0,2,0", bundle(" @bson_tag:   baz  \n", " just a note\n", &[]))]);
        assert_eq!(Directives::new(&idx).bson_tag_for(MSG, 0), "baz");
    }

    #[test]
    fn tag_on_message_bundle_is_not_a_field_tag() {
        let idx = index(&[(MSG, bundle(" @bson_tag: nope\n", "", &[]))]);
        assert_eq!(Directives::new(&idx).bson_tag_for(MSG, 0), "");
    }

    #[test]
    fn detached_inject_beats_leading() {
        let idx = index(&[(
            MSG,
            bundle(" @go_inject leading()\n", "", &["@go_inject func Foo() {}"]),
        )]);
        assert_eq!(Directives::new(&idx).go_inject_for(MSG), "func Foo() {}");
    }

    #[test]
    fn detached_blocks_checked_in_order() {
        let idx = index(&[(
            MSG,
            bundle(
                " unrelated\n",
                "",
                &[" license header\n", " @go_inject first\n", " @go_inject second\n"],
            ),
        )]);
        assert_eq!(Directives::new(&idx).go_inject_for(MSG), "first\n");
    }

    #[test]
    fn inject_falls_back_to_leading_untrimmed() {
        let idx = index(&[(MSG, bundle(" @go_inject\n  return nil\n", "", &[" nothing\n"]))]);
        assert_eq!(Directives::new(&idx).go_inject_for(MSG), "  return nil\n");
    }

    #[test]
    fn inject_ignores_trailing_comment() {
        let idx = index(&[(MSG, bundle("", " @go_inject x\n", &[]))]);
        assert_eq!(Directives::new(&idx).go_inject_for(MSG), "");
    }

    #[test]
    fn repeated_calls_agree() {
        let idx = index(&[
            (MSG, bundle(" @bson_compatible\n @go_inject @import \"fmt\"\n", "", &[])),
            ("4,0,2,0", bundle("", " @bson_tag: _id\n", &[])),
        ]);
        let d = Directives::new(&idx);
        let first = d.summarize(MSG, &["id"]);
        let second = d.summarize(MSG, &["id"]);
        assert_eq!(first, second);
        assert_eq!(d.go_inject_for(MSG), d.go_inject_for(MSG));
    }

    #[test]
    fn summarize_collects_everything() {
        let idx = index(&[
            (
                MSG,
                bundle(
                    " @bson_compatible @bson_upsertable\n",
                    "",
                    &[" @go_inject\n@import \"fmt\"\nfunc (u *User) String() string { return fmt.Sprint(u.Id) }\n"],
                ),
            ),
            ("4,0,2,0", bundle("", " @bson_tag: _id\n", &[])),
            ("4,0,2,2", bundle(" @bson_tag: email,omitempty\n", "", &[])),
        ]);
        let summary = Directives::new(&idx).summarize(MSG, &["id", "name", "email"]);

        assert!(summary.compatible);
        assert!(summary.upsertable);
        assert_eq!(
            summary.tags,
            vec![
                FieldTag { position: 0, name: "id".into(), tag: "_id".into() },
                FieldTag { position: 2, name: "email".into(), tag: "email,omitempty".into() },
            ]
        );
        let inject = summary.inject.unwrap();
        assert_eq!(inject.imports, vec!["fmt"]);
        assert_eq!(
            inject.code,
            "\nfunc (u *User) String() string { return fmt.Sprint(u.Id) }\n"
        );
    }
}
