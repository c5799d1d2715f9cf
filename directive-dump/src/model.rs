//! Descriptor input (protobuf JSON form) and the report model.
//!
//! Only the descriptor fields the directive walk needs are declared;
//! everything else in the JSON is ignored. Both the lowerCamel JSON names
//! and the original proto field names are accepted.

use anyhow::{bail, Context, Result};
use bson_directives::{Location, MessageDirectives};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `google.protobuf.FileDescriptorSet`
#[derive(Debug, Deserialize)]
pub struct FileDescriptorSet {
    pub file: Vec<FileDescriptorProto>,
}

/// `google.protobuf.FileDescriptorProto`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptorProto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub package: String,
    #[serde(default, alias = "message_type")]
    pub message_type: Vec<DescriptorProto>,
    #[serde(default, alias = "source_code_info")]
    pub source_code_info: Option<SourceCodeInfo>,
}

/// `google.protobuf.DescriptorProto`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorProto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub field: Vec<FieldDescriptorProto>,
    #[serde(default, alias = "nested_type")]
    pub nested_type: Vec<DescriptorProto>,
}

/// `google.protobuf.FieldDescriptorProto`
#[derive(Debug, Default, Deserialize)]
pub struct FieldDescriptorProto {
    #[serde(default)]
    pub name: String,
}

/// `google.protobuf.SourceCodeInfo`
#[derive(Debug, Default, Deserialize)]
pub struct SourceCodeInfo {
    #[serde(default)]
    pub location: Vec<Location>,
}

/// Decode either a `FileDescriptorSet` or a single `FileDescriptorProto`.
///
/// A top-level `file` key selects the set; errors inside it are reported
/// as set errors, never retried as a single file.
pub fn parse_descriptors(input: &str) -> Result<Vec<FileDescriptorProto>> {
    let value: Value = serde_json::from_str(input).context("input is not valid JSON")?;
    let Some(object) = value.as_object() else {
        bail!("expected a FileDescriptorSet or FileDescriptorProto object");
    };

    if object.contains_key("file") {
        let set: FileDescriptorSet =
            serde_json::from_value(value).context("invalid FileDescriptorSet")?;
        Ok(set.file)
    } else {
        let file: FileDescriptorProto =
            serde_json::from_value(value).context("invalid FileDescriptorProto")?;
        Ok(vec![file])
    }
}

// -- Report -------------------------------------------------------------------

/// Directives found in one `.proto` file.
#[derive(Debug, Default, Serialize)]
pub struct FileReport {
    pub file: String,
    pub messages: Vec<MessageReport>,
    /// Union of all inject imports, sorted and de-duplicated.
    pub imports: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageReport {
    /// Fully-qualified name, e.g. `example.User.Address`
    pub name: String,
    /// Structural path, e.g. `4,0,3,1`
    pub path: String,
    #[serde(flatten)]
    pub directives: MessageDirectives,
}
