//! Corpus loading — a JSON array of documents read once at startup.

use std::path::Path;

use manasik_core::error::{ManasikError, Result};
use manasik_core::types::Document;

/// Read and parse the corpus file at `path`.
pub fn load_corpus(path: &Path) -> Result<Vec<Document>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ManasikError::Corpus(format!("Failed to read corpus {}: {e}", path.display()))
    })?;
    let documents = parse_corpus(&raw)
        .map_err(|e| ManasikError::Corpus(format!("{}: {e}", path.display())))?;

    tracing::info!("📚 Loaded {} document(s) from {}", documents.len(), path.display());
    Ok(documents)
}

/// Parse corpus JSON text. Documents keep their file order.
pub fn parse_corpus(raw: &str) -> Result<Vec<Document>> {
    let documents: Vec<Document> = serde_json::from_str(raw)?;
    let untitled = documents.iter().filter(|d| d.display_title().is_none()).count();
    if untitled > 0 {
        tracing::debug!("{untitled} corpus document(s) have no title");
    }
    Ok(documents)
}
