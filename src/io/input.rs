use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::TranscriptIndex;

/// Read a transcript file and segment it into weeks
pub fn load_transcript_file(path: &Path) -> Result<TranscriptIndex> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let index = TranscriptIndex::new(content);

    info!(
        "Loaded {} bytes, {} weeks, {} messages from {:?}",
        index.raw().len(),
        index.weeks().len(),
        index.total_messages(),
        path
    );

    Ok(index)
}
