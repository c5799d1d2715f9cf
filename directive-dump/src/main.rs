//! directive-dump — report the BSON directives a `.proto` file carries.
//!
//! Reads descriptors in protobuf JSON form (a `FileDescriptorSet` or a
//! single `FileDescriptorProto`, compiled with source info) and prints the
//! directives the code generator would see for every message.
//!
//! - **stdin mode**: `directive-dump < user.json`
//! - **file mode**: `directive-dump -f json -o report.json descriptors/*.json`

mod collect;
mod model;
mod render;

use anyhow::{Context, Result};
use bson_directives::StructuralPath;
use clap::Parser;
use collect::CollectOptions;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "directive-dump",
    about = "Report BSON directives found in protobuf descriptor comments"
)]
struct Cli {
    /// Descriptor JSON files (glob patterns and directories supported).
    /// If omitted, reads from stdin.
    files: Vec<String>,

    /// Output file (stdout if omitted)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: text (default), json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// Only list messages that carry at least one directive
    #[arg(long)]
    annotated_only: bool,

    /// Only list messages at or below this structural path, e.g. "4,0"
    #[arg(long, value_parser = parse_path)]
    path: Option<StructuralPath>,
}

fn parse_path(s: &str) -> Result<StructuralPath, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Fail on a bad format before touching any input
    let renderer = render::create_renderer(&cli.format)?;
    let options = CollectOptions {
        annotated_only: cli.annotated_only,
        path: cli.path.clone(),
    };

    let reports = if cli.files.is_empty() {
        stdin_mode(&options)?
    } else {
        file_mode(&cli.files, &options)?
    };

    let output = renderer.render(&reports)?;
    match cli.output {
        Some(ref path) => fs::write(path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", output),
    }
    Ok(())
}

/// stdin mode: a single descriptor document, any decode error is fatal.
fn stdin_mode(options: &CollectOptions) -> Result<Vec<model::FileReport>> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let files = model::parse_descriptors(&input).context("failed to decode stdin")?;
    files
        .iter()
        .map(|file| collect::collect(file, options))
        .collect()
}

/// file mode: undecodable files are skipped with a warning.
fn file_mode(patterns: &[String], options: &CollectOptions) -> Result<Vec<model::FileReport>> {
    let input_files = expand_globs(patterns)?;

    let mut reports = Vec::new();
    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        match model::parse_descriptors(&content) {
            Ok(files) => {
                for file in &files {
                    reports.push(collect::collect(file, options)?);
                }
            }
            Err(e) => {
                eprintln!("warning: skipping {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(reports)
}

/// File extensions recognized as descriptor files when scanning directories.
/// Only the JSON form of a descriptor set is decoded; binary `.pb` sets
/// and `.proto` sources found next to it are left alone.
const SUPPORTED_EXTENSIONS: &[&str] = &["json"];

/// Expand the positional arguments into descriptor files. Explicit files
/// are taken as-is whatever their extension, directories contribute their
/// `.json` entries, anything else is a glob.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}
