//! Extraction of `<file path="...">` blocks from model output and writing them to disk.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use regex::Regex;

/// Directory inside a project reserved for gocodeo's own bookkeeping
pub const GOCODEO_DIR: &str = ".gocodeo";

const FILE_BLOCK_PATTERN: &str = r#"(?s)<file\s+path\s*=\s*"([^"]+)"\s*>(.*?)</file>"#;

/// A file the model asked us to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Parse every file block in `response`. Later blocks for the same path replace earlier ones.
pub fn parse_generated_files(response: &str) -> Result<Vec<GeneratedFile>> {
    let file_block = Regex::new(FILE_BLOCK_PATTERN)?;
    let mut files: Vec<GeneratedFile> = Vec::new();

    for captures in file_block.captures_iter(response) {
        let raw_path = captures[1].trim();
        let path = sanitize_relative_path(raw_path)?;
        let contents = strip_code_fence(&captures[2]);

        if let Some(existing) = files.iter_mut().find(|f| f.path == path) {
            existing.contents = contents;
        } else {
            files.push(GeneratedFile { path, contents });
        }
    }

    Ok(files)
}

/// Accept only plain relative paths that stay inside the project directory
pub fn sanitize_relative_path(raw: &str) -> Result<PathBuf> {
    if raw.is_empty() {
        bail!("Generated file has an empty path");
    }

    let mut clean = PathBuf::new();
    for component in Path::new(raw).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                bail!("Refusing to write outside the project directory: {}", raw);
            }
        }
    }

    if clean.as_os_str().is_empty() {
        bail!("Generated file path resolves to the project root: {}", raw);
    }
    if clean.starts_with(GOCODEO_DIR) {
        bail!("Generated file targets reserved directory {}: {}", GOCODEO_DIR, raw);
    }

    Ok(clean)
}

/// Drop a Markdown fence wrapped around a file body and normalize the trailing newline
fn strip_code_fence(body: &str) -> String {
    let trimmed = body.trim_matches('\n');
    let mut lines: Vec<&str> = trimmed.lines().collect();

    if lines.first().map(|l| l.trim_start().starts_with("```")).unwrap_or(false) {
        lines.remove(0);
        if lines.last().map(|l| l.trim() == "```").unwrap_or(false) {
            lines.pop();
        }
    }

    let mut contents = lines.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    contents
}

/// Write `file` under `project_dir`, creating parent directories
pub fn write_generated_file(project_dir: &Path, file: &GeneratedFile) -> Result<PathBuf> {
    let target = project_dir.join(&file.path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(&target, &file.contents)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(target)
}
