//! # pdfsieve
//!
//! Extract text from PDF documents by trying several extraction/OCR
//! backends in sequence and keeping whichever produced the most characters.
//!
//! ## Why this crate?
//!
//! No single backend reads every PDF well. Born-digital documents carry an
//! embedded text layer that OCR can only approximate; scanned documents have
//! no layer at all; and damaged files that one renderer rejects sometimes go
//! through another just fine. Instead of guessing which backend a document
//! needs, this crate runs all of them and lets the character count decide.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    explicit path or first *.pdf in the working directory
//!  ├─ 2. Methods  run each in sequence, pages strictly in order:
//!  │      pdfium_tesseract    text layer, OCR for layerless pages
//!  │      pdftoppm_tesseract  poppler rasteriser + tesseract
//!  │      text_layer          lopdf text layer only
//!  │      vision_ocr          pdfium rasteriser + ollama vision model
//!  ├─ 3. Persist  one timestamped file per successful method
//!  └─ 4. Select   longest text wins → BEST file (ties: first registered)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfsieve::{run, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let outcome = run(Some("document.pdf"), &config).await?;
//!     println!(
//!         "best: {} ({} chars) → {}",
//!         outcome.best.method,
//!         outcome.best.chars,
//!         outcome.best.saved_to.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfsieve` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdfsieve = { version = "0.1", default-features = false }
//! ```
//!
//! ## External collaborators
//!
//! The backends are consumed as black boxes: pdfium (via `pdfium-render`),
//! the `tesseract` and `pdftoppm` binaries on `$PATH`, and an Ollama server
//! for the vision method. A method whose backend is missing simply fails and
//! is skipped in the best-result selection.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod methods;
pub mod output;
pub mod persist;
pub mod pipeline;
pub mod progress;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::{ExtractError, MethodError};
pub use methods::Method;
pub use output::{BestResult, MethodOutcome, RunOutcome, RunStats, TextCoverage};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use run::{precheck, run, run_sync};
