//! Descriptor walk — visits every message the way a generator would and
//! asks the directive engine about it.

use crate::model::{DescriptorProto, FileDescriptorProto, FileReport, MessageReport};
use anyhow::{Context, Result};
use bson_directives::{Directives, SourceIndex, StructuralPath};
use std::collections::BTreeSet;

/// Report filtering, from the command line.
#[derive(Debug, Default)]
pub struct CollectOptions {
    /// Drop messages that carry no directive at all.
    pub annotated_only: bool,
    /// Keep only messages at or below this path.
    pub path: Option<StructuralPath>,
}

/// Collect the directives of every message in `file`, depth-first in
/// declaration order (nested messages right after their parent).
pub fn collect(file: &FileDescriptorProto, options: &CollectOptions) -> Result<FileReport> {
    let index = match &file.source_code_info {
        Some(info) => SourceIndex::from_locations(&info.location),
        None => SourceIndex::default(),
    };
    let directives = Directives::new(&index);

    let mut messages = Vec::new();
    for (i, message) in file.message_type.iter().enumerate() {
        visit(
            &directives,
            message,
            &file.package,
            StructuralPath::message(i)?,
            &mut messages,
        )
        .with_context(|| format!("in {}", file.name))?;
    }

    messages.retain(|m| {
        let keep_path = match &options.path {
            Some(prefix) => m.structural_path.starts_with(prefix),
            None => true,
        };
        keep_path && (!options.annotated_only || m.report.directives.has_any())
    });

    let imports: BTreeSet<&str> = messages
        .iter()
        .filter_map(|m| m.report.directives.inject.as_ref())
        .flat_map(|inject| inject.imports.iter().map(String::as_str))
        .collect();

    Ok(FileReport {
        file: file.name.clone(),
        imports: imports.into_iter().map(str::to_string).collect(),
        messages: messages.into_iter().map(|m| m.report).collect(),
    })
}

struct Visited {
    structural_path: StructuralPath,
    report: MessageReport,
}

fn visit(
    directives: &Directives<'_, SourceIndex>,
    message: &DescriptorProto,
    scope: &str,
    path: StructuralPath,
    out: &mut Vec<Visited>,
) -> Result<()> {
    let name = if scope.is_empty() {
        message.name.clone()
    } else {
        format!("{}.{}", scope, message.name)
    };
    let path_key = path.to_string();
    let fields: Vec<&str> = message.field.iter().map(|f| f.name.as_str()).collect();

    out.push(Visited {
        report: MessageReport {
            name: name.clone(),
            path: path_key.clone(),
            directives: directives.summarize(&path_key, &fields),
        },
        structural_path: path.clone(),
    });

    for (i, nested) in message.nested_type.iter().enumerate() {
        visit(directives, nested, &name, path.nested(i)?, out)?;
    }
    Ok(())
}
