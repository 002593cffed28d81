use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Statistics for a document read or write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoStats {
    pub file_path: String,
    pub lines: u64,
    pub bytes: u64,
    pub duration_ms: u64,
}

impl IoStats {
    fn for_text(path: &Path, text: &str, started: std::time::Instant) -> Self {
        Self {
            file_path: path.display().to_string(),
            lines: text.split('\n').count() as u64,
            bytes: text.len() as u64,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Reads a whole UTF-8 document, bytes untouched (line endings and trailing newline kept)
pub async fn read_document<P: AsRef<Path>>(file_path: P) -> Result<(String, IoStats)> {
    let path = file_path.as_ref();
    let start_time = std::time::Instant::now();

    debug!("Reading document: {}", path.display());

    let bytes = fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    // WHY: a lossy decode would silently rewrite bytes in the untouched lines
    let text = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8", path.display()))?;

    let stats = IoStats::for_text(path, &text, start_time);
    info!(
        "Read {}: {} lines, {} bytes in {}ms",
        stats.file_path, stats.lines, stats.bytes, stats.duration_ms
    );
    Ok((text, stats))
}

/// Writes a document, creating parent directories as needed
pub async fn write_document<P: AsRef<Path>>(file_path: P, text: &str) -> Result<IoStats> {
    let path = file_path.as_ref();
    let start_time = std::time::Instant::now();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let stats = IoStats::for_text(path, text, start_time);
    info!(
        "Wrote {}: {} lines, {} bytes in {}ms",
        stats.file_path, stats.lines, stats.bytes, stats.duration_ms
    );
    Ok(stats)
}
