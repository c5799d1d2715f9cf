//! JSON renderer — structured output for generator pipelines and tests.

use crate::model::FileReport;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, reports: &[FileReport]) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(reports).context("failed to serialize report")?;
        out.push('\n');
        Ok(out)
    }
}
