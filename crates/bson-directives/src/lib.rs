//! bson-directives — directive extraction from `.proto` comments.
//!
//! A protoc plugin generating BSON-aware Go code reads a handful of
//! directives from the comments attached to messages and fields:
//!
//! ```text
//! // @bson_compatible @bson_upsertable
//! message User {
//!   string id = 1; // @bson_tag: _id
//! }
//! ```
//!
//! - `path`: structural path construction (`4,0,2,1`)
//! - `comments`: the comment location index the engine reads from
//! - `grammar`: one compiled pattern per directive kind
//! - `resolve`: which comments each directive reads, and which match wins
//! - `inject`: splitting a `@go_inject` block into imports and code
//!
//! Extraction never fails; a missing directive is `false` or an empty
//! string.

pub mod comments;
pub mod grammar;
pub mod inject;
pub mod path;
pub mod resolve;

pub use comments::{CommentBundle, CommentIndex, Location, SourceIndex};
pub use inject::{extract_imports, strip_imports, InjectBlock};
pub use path::{field_path, PathError, StructuralPath};
pub use resolve::{Directives, FieldTag, MessageDirectives};
