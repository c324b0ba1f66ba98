use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::path::Path;

/// Save results to a JSON file atomically
///
/// Uses atomic-write-file so a reader never sees a half-written file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, value).context("Failed to serialize results")?;

    file.commit()
        .with_context(|| format!("Failed to save results to {}", path.display()))?;

    tracing::debug!(path = %path.display(), "results written");
    Ok(())
}
