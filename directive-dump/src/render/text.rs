//! Plain-text renderer — one block per file, one line per directive.
//!
//! ```text
//! file: user.proto
//! message example.User (4,0)
//!   bson_compatible
//!   tag id = "_id"
//!   import "fmt"
//!   inject:
//!     | func (u *User) String() string { ... }
//! imports: "fmt"
//! ```

use crate::model::{FileReport, MessageReport};
use crate::render::Renderer;
use anyhow::Result;

pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, reports: &[FileReport]) -> Result<String> {
        let mut out = String::new();
        for (i, report) in reports.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            render_file(&mut out, report);
        }
        Ok(out)
    }
}

fn render_file(out: &mut String, report: &FileReport) {
    out.push_str(&format!("file: {}\n", report.file));
    for message in &report.messages {
        render_message(out, message);
    }
    if !report.imports.is_empty() {
        let quoted: Vec<String> = report.imports.iter().map(|p| format!("{:?}", p)).collect();
        out.push_str(&format!("imports: {}\n", quoted.join(", ")));
    }
}

fn render_message(out: &mut String, message: &MessageReport) {
    let d = &message.directives;
    out.push_str(&format!("message {} ({})\n", message.name, message.path));

    if d.compatible {
        out.push_str("  bson_compatible\n");
    }
    if d.upsertable {
        out.push_str("  bson_upsertable\n");
    }
    for tag in &d.tags {
        out.push_str(&format!("  tag {} = {:?}\n", tag.name, tag.tag));
    }
    if let Some(ref inject) = d.inject {
        for import in &inject.imports {
            out.push_str(&format!("  import {:?}\n", import));
        }
        if !inject.code.trim().is_empty() {
            out.push_str("  inject:\n");
            for line in inject.code.lines() {
                if line.is_empty() {
                    out.push_str("    |\n");
                } else {
                    out.push_str(&format!("    | {}\n", line));
                }
            }
        }
    }
}
