//! Project source access
//!
//! How project files get on disk (clone, upload, mount) is someone else's
//! problem; analyzers only need a readable tree under `project_path`. The
//! [`SourceReader`] boundary keeps that assumption narrow and testable.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

/// Supplies the source text of a project for analysis.
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Gather source files relevant to `language` under `root`, concatenated
    /// with per-file headers, capped at `max_bytes`.
    async fn read_project(
        &self,
        root: &Path,
        language: &str,
        max_bytes: usize,
    ) -> io::Result<String>;
}

/// Filesystem-backed source reader.
#[derive(Debug, Default, Clone)]
pub struct FsSourceReader;

impl FsSourceReader {
    pub fn new() -> Self {
        Self
    }

    fn extensions_for(language: &str) -> &'static [&'static str] {
        match language.to_ascii_lowercase().as_str() {
            "c" => &["c", "h"],
            "cpp" | "c++" => &["cpp", "cc", "cxx", "hpp", "h"],
            "java" => &["java"],
            "python" => &["py"],
            "javascript" => &["js", "jsx"],
            "typescript" => &["ts", "tsx"],
            "go" => &["go"],
            "rust" => &["rs"],
            "php" => &["php"],
            "ruby" => &["rb"],
            _ => &[],
        }
    }

    fn collect_files(
        root: &Path,
        extensions: &[&str],
        out: &mut Vec<PathBuf>,
    ) -> io::Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(root)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .collect();
        // Stable traversal so prompt content is reproducible across runs.
        entries.sort();

        for path in entries {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') {
                continue;
            }
            // symlink_metadata does not follow links: a symlinked directory
            // could cycle the walk, so links are skipped outright.
            let file_type = std::fs::symlink_metadata(&path)?.file_type();
            if file_type.is_dir() {
                Self::collect_files(&path, extensions, out)?;
            } else if file_type.is_file()
                && let Some(ext) = path.extension().and_then(|e| e.to_str())
            {
                let matches = extensions.is_empty()
                    || extensions.iter().any(|e| ext.eq_ignore_ascii_case(e));
                if matches {
                    out.push(path);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SourceReader for FsSourceReader {
    async fn read_project(
        &self,
        root: &Path,
        language: &str,
        max_bytes: usize,
    ) -> io::Result<String> {
        let extensions = Self::extensions_for(language);
        // The directory walk is synchronous filesystem work; keep it off
        // the async executor threads.
        let walk_root = root.to_path_buf();
        let files = tokio::task::spawn_blocking(move || {
            let mut files = Vec::new();
            Self::collect_files(&walk_root, extensions, &mut files)?;
            Ok::<_, io::Error>(files)
        })
        .await
        .map_err(io::Error::other)??;

        let mut combined = String::new();
        let mut included = 0usize;
        for path in &files {
            let text = match tokio::fs::read_to_string(path).await {
                Ok(text) => text,
                // Binary or unreadable files are skipped, not fatal.
                Err(_) => continue,
            };
            let relative = path.strip_prefix(root).unwrap_or(path);
            let header = format!("// file: {}\n", relative.display());
            if combined.len() + header.len() + text.len() > max_bytes {
                break;
            }
            combined.push_str(&header);
            combined.push_str(&text);
            combined.push('\n');
            included += 1;
        }

        debug!(
            root = %root.display(),
            files_found = files.len(),
            files_included = included,
            bytes = combined.len(),
            "collected project source"
        );
        Ok(combined)
    }
}
