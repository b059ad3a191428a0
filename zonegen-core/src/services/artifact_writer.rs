//! 文件写入服务
//!
//! The only place that touches the filesystem. In dry-run mode nothing is
//! written and a preview is returned instead.

use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Lines shown in a dry-run preview.
pub const DEFAULT_PREVIEW_LINES: usize = 20;

/// What [`ArtifactWriter::write`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { path: PathBuf },
    /// Dry run: the file was not touched.
    Previewed { path: PathBuf, preview: String },
}

/// Writes generated files atomically, or previews them in dry-run mode.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dry_run: bool,
    force: bool,
    preview_lines: usize,
}

impl ArtifactWriter {
    pub fn new(dry_run: bool, force: bool, preview_lines: usize) -> Self {
        Self {
            dry_run,
            force,
            preview_lines,
        }
    }

    /// Refuse to replace an existing zone artifact unless forced.
    pub fn check_collision(&self, path: &Path) -> CoreResult<()> {
        if !path.exists() {
            return Ok(());
        }
        if self.force {
            log::warn!("Overwriting existing file {}", path.display());
            Ok(())
        } else {
            Err(CoreError::AlreadyExists {
                path: path.display().to_string(),
            })
        }
    }

    /// Write `content` to `path`.
    ///
    /// The content goes to a hidden temporary file next to `path` that is
    /// then renamed over it, so an interrupted run never leaves a partial
    /// file behind.
    pub fn write(&self, path: &Path, content: &str) -> CoreResult<WriteOutcome> {
        if self.dry_run {
            return Ok(WriteOutcome::Previewed {
                path: path.to_path_buf(),
                preview: self.preview(path, content),
            });
        }

        let failed = |detail: String| CoreError::WriteFailed {
            path: path.display().to_string(),
            detail,
        };

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| failed(e.to_string()))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".zonegen-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| failed(e.to_string()))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| failed(e.to_string()))?;
        tmp.persist(path).map_err(|e| failed(e.error.to_string()))?;

        log::info!("Wrote {}", path.display());
        Ok(WriteOutcome::Written {
            path: path.to_path_buf(),
        })
    }

    fn preview(&self, path: &Path, content: &str) -> String {
        let total = content.lines().count();
        let mut preview = format!("[DRY RUN] Would write: {}\n", path.display());
        for line in content.lines().take(self.preview_lines) {
            preview.push_str("  ");
            preview.push_str(line);
            preview.push('\n');
        }
        if total > self.preview_lines {
            let _ = writeln!(preview, "  ... ({} more lines)", total - self.preview_lines);
        }
        preview
    }
}
