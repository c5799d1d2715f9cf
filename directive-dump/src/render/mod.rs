//! Renderer module — trait-based format dispatch.

pub mod json;
pub mod text;

use crate::model::FileReport;
use anyhow::{anyhow, Result};

/// Trait for rendering collected reports into a specific output format.
pub trait Renderer {
    fn render(&self, reports: &[FileReport]) -> Result<String>;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "text" | "txt" => Ok(Box::new(text::TextRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use text or json", format)),
    }
}
