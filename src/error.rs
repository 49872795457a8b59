//! Error types for the pdfsieve library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: the run cannot proceed at all (no PDF
//!   found, unreadable input, output directory not writable, every method
//!   failed). Returned as `Err(ExtractError)` from the top-level entry
//!   points in [`crate::run`].
//!
//! * [`MethodError`] — **Non-fatal**: a single extraction method failed
//!   (backend binary missing, render glitch, HTTP error) but the remaining
//!   methods still run. Stored inside [`crate::output::MethodOutcome`] so
//!   callers see per-method pass/fail instead of losing the whole run to one
//!   bad backend.
//!
//! A method failure is terminal for that method only: there are no retries
//! and no partial-page recovery. Whatever went wrong on page 7 of the
//! tesseract pass does not stop the text-layer pass from running.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfsieve library.
///
/// Method-level failures use [`MethodError`] and are stored in
/// [`crate::output::MethodOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// No `*.pdf` file exists in the scanned directory.
    #[error("No PDF files found in '{dir}'\nPass a path explicitly or run from a directory containing a PDF.")]
    NoPdfFound { dir: PathBuf },

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    // ── Run errors ────────────────────────────────────────────────────────
    /// Every configured extraction method failed; no text to persist.
    #[error("All {attempted} extraction methods failed.\nFirst error: {first_error}")]
    AllMethodsFailed {
        attempted: usize,
        first_error: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory or write a result file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single extraction method.
///
/// Stored alongside [`crate::output::MethodOutcome`] when a method fails.
/// The overall run continues unless ALL methods fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum MethodError {
    /// Page rasterisation or document open failed inside the backend.
    #[error("page {page}: rasterisation failed: {detail}")]
    Render { page: usize, detail: String },

    /// An external tool (tesseract, pdftoppm, pdfium) could not be run or
    /// exited with a failure status.
    #[error("{tool}: {detail}")]
    Tool { tool: String, detail: String },

    /// OCR produced no usable output for a page.
    #[error("page {page}: OCR failed: {detail}")]
    Ocr { page: usize, detail: String },

    /// The vision API call failed.
    #[error("vision API error: {detail}")]
    Api { detail: String },

    /// The method ran to completion but produced only whitespace.
    #[error("no extractable text produced")]
    NoText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_methods_failed_display() {
        let e = ExtractError::AllMethodsFailed {
            attempted: 4,
            first_error: "tesseract: not found".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("All 4"), "got: {msg}");
        assert!(msg.contains("tesseract: not found"));
    }

    #[test]
    fn no_pdf_found_display() {
        let e = ExtractError::NoPdfFound {
            dir: PathBuf::from("/tmp/empty"),
        };
        assert!(e.to_string().contains("/tmp/empty"));
    }

    #[test]
    fn method_error_tool_display() {
        let e = MethodError::Tool {
            tool: "pdftoppm".into(),
            detail: "exit status 1".into(),
        };
        assert!(e.to_string().starts_with("pdftoppm:"));
    }

    #[test]
    fn method_error_serialises() {
        let e = MethodError::Render {
            page: 3,
            detail: "bad page object".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: MethodError = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, MethodError::Render { page: 3, .. }));
    }
}
