//! PDF text extraction for uploaded resumes.
//! Parsing is CPU-bound: callers must run it inside `tokio::task::spawn_blocking`.

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Unreadable PDF: {0}")]
    Unreadable(#[from] lopdf::Error),

    #[error("Text extraction failed: {0}")]
    Extraction(String),
}

/// Extracted text plus the number of pages in the document.
#[derive(Debug, Clone)]
pub struct ExtractedPdf {
    pub text: String,
    pub pages: usize,
}

pub fn extract_text_and_pages(bytes: &[u8]) -> Result<ExtractedPdf, PdfError> {
    let pages = lopdf::Document::load_mem(bytes)?.get_pages().len();
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfError::Extraction(e.to_string()))?;

    info!(pages, chars = text.len(), "PDF text extracted");
    Ok(ExtractedPdf { text, pages })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = extract_text_and_pages(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Unreadable(_)));
    }
}
