//! Writing generated sources to disk.

use std::fs;

use anyhow::Context as _;
use sprout_compiler::GeneratedFile;

/// What [`write_files`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: usize,
    /// Shells left alone because they already exist
    pub kept: usize,
}

/// Write `files`, creating parent directories. Files not flagged for
/// overwrite are only written when absent.
pub fn write_files(files: &[GeneratedFile]) -> anyhow::Result<WriteReport> {
    let mut report = WriteReport::default();
    for file in files {
        if !file.overwrite && file.path.exists() {
            tracing::debug!(path = %file.path.display(), "keeping existing file");
            report.kept += 1;
            continue;
        }
        if let Some(parent) = file.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        fs::write(&file.path, &file.content)
            .with_context(|| format!("write '{}'", file.path.display()))?;
        tracing::debug!(path = %file.path.display(), "wrote file");
        report.written += 1;
    }
    Ok(report)
}
