//! Pure-Rust text-layer extraction via lopdf.
//!
//! An independent second opinion on the embedded text layer: lopdf parses
//! the PDF content streams itself, with no native library involved, so it
//! sometimes reads documents pdfium rejects. Pages are returned in page
//! order; a page whose content stream cannot be decoded contributes an
//! empty string rather than failing the whole document.

use crate::error::MethodError;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// Extract the text layer of every page, in page order.
///
/// Returns `(page_number_1based, text)` pairs. Per-page decode failures
/// degrade to empty text; only a document-level parse failure is an error.
pub async fn extract_pages(pdf_path: &Path) -> Result<Vec<(u32, String)>, MethodError> {
    let path = pdf_path.to_path_buf();
    tokio::task::spawn_blocking(move || extract_pages_blocking(&path))
        .await
        .map_err(|e| MethodError::Tool {
            tool: "lopdf".into(),
            detail: format!("extraction task panicked: {e}"),
        })?
}

fn extract_pages_blocking(pdf_path: &Path) -> Result<Vec<(u32, String)>, MethodError> {
    let mut doc = Document::load(pdf_path).map_err(|e| MethodError::Tool {
        tool: "lopdf".into(),
        detail: format!("failed to load {}: {e}", pdf_path.display()),
    })?;

    if doc.is_encrypted() {
        doc.decrypt("").map_err(|e| MethodError::Tool {
            tool: "lopdf".into(),
            detail: format!("encrypted document: {e}"),
        })?;
    }

    let mut page_nums: Vec<u32> = doc.get_pages().keys().copied().collect();
    page_nums.sort_unstable();

    let mut pages = Vec::with_capacity(page_nums.len());
    for page_num in page_nums {
        let text = match doc.extract_text(&[page_num]) {
            Ok(t) => t,
            Err(e) => {
                debug!("page {page_num}: text extraction failed: {e}");
                String::new()
            }
        };
        pages.push((page_num, text));
    }

    Ok(pages)
}
