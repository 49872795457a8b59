//! Pipeline stages shared by the extraction methods.
//!
//! Each submodule wraps exactly one external collaborator or transformation
//! step. Keeping stages separate makes each independently testable and lets
//! the methods in [`crate::methods`] compose them freely.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render / poppler / textlayer ──▶ ocr / vision ──▶ postprocess
//! (glob)    (pdfium)  (pdftoppm)  (lopdf)    (tesseract) (ollama)  (cleanup)
//! ```
//!
//! 1. [`input`]     — locate the PDF: explicit path or first `*.pdf` in cwd
//! 2. [`render`]    — pdfium text layer + rasterisation; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`poppler`]   — alternative rasteriser via the `pdftoppm` binary
//! 4. [`textlayer`] — pure-Rust text-layer extraction via lopdf
//! 5. [`encode`]    — PNG-encode a `DynamicImage` for OCR or the vision API
//! 6. [`ocr`]       — tesseract subprocess wrapper
//! 7. [`vision`]    — Ollama vision-model transcription over HTTP
//! 8. [`postprocess`] — deterministic cleanup of OCR output

pub mod encode;
pub mod input;
pub mod ocr;
pub mod poppler;
pub mod postprocess;
pub mod render;
pub mod textlayer;
pub mod vision;
