// ABOUTME: PDF text extraction for the pdf2deck pipeline
// ABOUTME: Reads page text from uploaded PDF bytes and caps the amount kept

use crate::errors::{DeckError, Result};
use log::{info, warn};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Stop collecting pages once the text grows past this many characters
pub const MAX_PDF_TEXT_CHARS: usize = 50_000;

const TRUNCATION_NOTE: &str = "... [Content truncated due to length]";

/// Read a PDF from disk and extract its text
pub fn extract_text_from_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DeckError::PathNotFoundError(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    extract_text_from_pdf(&bytes)
}

/// Extract the text of every page, each followed by a blank line.
///
/// Fails when the bytes are not a readable PDF or no text comes out.
pub fn extract_text_from_pdf(bytes: &[u8]) -> Result<String> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        return Err(DeckError::ExtractionError(
            "input is not a PDF document".to_string(),
        ));
    }

    // pdf-extract panics on some malformed documents
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| DeckError::ExtractionError("PDF parser crashed on this document".to_string()))?
    .map_err(|e| DeckError::ExtractionError(e.to_string()))?;

    let text = join_pages(&pages);
    if text.trim().is_empty() {
        return Err(DeckError::ExtractionError(
            "no extractable text found in PDF".to_string(),
        ));
    }

    info!(
        "Extracted {} characters from {} pages",
        text.chars().count(),
        pages.len()
    );
    Ok(text)
}

/// Concatenate page texts, stopping after the size cap is crossed
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    let mut chars = 0;

    for page in pages {
        let page = page.as_ref();
        text.push_str(page);
        text.push_str("\n\n");
        chars += page.chars().count() + 2;

        if chars > MAX_PDF_TEXT_CHARS {
            warn!("PDF text exceeds {} characters, truncating", MAX_PDF_TEXT_CHARS);
            text.push_str(TRUNCATION_NOTE);
            break;
        }
    }

    text
}

/// Short excerpt kept on the run context for display
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(500) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
