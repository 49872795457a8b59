//! Result types produced by an extraction run.
//!
//! [`RunOutcome`] is the top-level value returned by [`crate::run::run`]:
//! one [`MethodOutcome`] per configured method (in registration order), the
//! winning [`BestResult`], and run-wide [`RunStats`]. Everything is
//! serde-serialisable so the CLI can emit the whole run as JSON.

use crate::error::MethodError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The result of one extraction method.
///
/// `text` is empty when `error` is set; check [`MethodOutcome::is_success`]
/// before reading it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodOutcome {
    /// Stable method name, e.g. "pdfium_tesseract".
    pub method: String,

    /// Extracted text (page banners included). Empty on failure.
    pub text: String,

    /// Character count of `text` (Unicode scalar values, not bytes).
    pub chars: usize,

    /// Wall-clock duration of the method.
    pub duration_ms: u64,

    /// Where the per-method result file was written, if the method succeeded.
    pub saved_to: Option<PathBuf>,

    /// Failure reason when the method did not produce a result.
    pub error: Option<MethodError>,
}

impl MethodOutcome {
    /// Whether this method produced a usable result.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// The winning method of a run: the successful outcome with the greatest
/// character count, ties broken by registration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestResult {
    /// Name of the winning method.
    pub method: String,

    /// Character count of the winning text.
    pub chars: usize,

    /// Path of the persisted BEST file.
    pub saved_to: PathBuf,
}

/// Run-wide statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Number of methods attempted.
    pub methods_attempted: usize,

    /// Number of methods that produced a result.
    pub methods_succeeded: usize,

    /// Number of methods that failed.
    pub methods_failed: usize,

    /// Total wall-clock duration of the run.
    pub total_duration_ms: u64,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    /// The PDF that was processed.
    pub pdf: PathBuf,

    /// Sanitised PDF stem used in output filenames.
    pub stem: String,

    /// Timestamp shared by all files of this run (`%Y%m%d_%H%M%S`).
    pub timestamp: String,

    /// Per-method outcomes, in registration order.
    pub outcomes: Vec<MethodOutcome>,

    /// The winning method.
    pub best: BestResult,

    /// Run-wide statistics.
    pub stats: RunStats,
}

impl RunOutcome {
    /// The winning method's text.
    ///
    /// The best outcome always exists in `outcomes`; this returns "" only if
    /// the value was deserialised from inconsistent JSON.
    pub fn best_text(&self) -> &str {
        self.outcomes
            .iter()
            .find(|o| o.method == self.best.method)
            .map(|o| o.text.as_str())
            .unwrap_or("")
    }
}

/// Report produced by the pre-check utility.
///
/// Advisory only: says whether the document's leading pages already carry an
/// extractable text layer or whether OCR will be needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextCoverage {
    /// Number of pages actually sampled (min of configured pages and the
    /// document page count).
    pub pages_sampled: usize,

    /// Trimmed character count per sampled page, in page order.
    pub page_chars: Vec<usize>,

    /// Combined trimmed character count across sampled pages.
    pub chars: usize,

    /// Whether `chars` met the configured threshold.
    pub has_text_layer: bool,
}

impl TextCoverage {
    /// Evaluate per-page counts against a threshold.
    pub fn evaluate(page_chars: Vec<usize>, threshold: usize) -> Self {
        let chars: usize = page_chars.iter().sum();
        Self {
            pages_sampled: page_chars.len(),
            has_text_layer: chars >= threshold,
            chars,
            page_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_at_threshold_has_text_layer() {
        let c = TextCoverage::evaluate(vec![40, 40, 20], 100);
        assert_eq!(c.chars, 100);
        assert!(c.has_text_layer);
    }

    #[test]
    fn coverage_below_threshold_needs_ocr() {
        let c = TextCoverage::evaluate(vec![30, 30, 39], 100);
        assert_eq!(c.chars, 99);
        assert!(!c.has_text_layer);
    }

    #[test]
    fn coverage_of_empty_document() {
        let c = TextCoverage::evaluate(vec![], 100);
        assert_eq!(c.pages_sampled, 0);
        assert_eq!(c.chars, 0);
        assert!(!c.has_text_layer);
    }

    #[test]
    fn best_text_looks_up_winning_outcome() {
        let outcome = RunOutcome {
            pdf: PathBuf::from("a.pdf"),
            stem: "a".into(),
            timestamp: "20260101_120000".into(),
            outcomes: vec![
                MethodOutcome {
                    method: "text_layer".into(),
                    text: "short".into(),
                    chars: 5,
                    duration_ms: 1,
                    saved_to: None,
                    error: None,
                },
                MethodOutcome {
                    method: "pdfium_tesseract".into(),
                    text: "much longer text".into(),
                    chars: 16,
                    duration_ms: 1,
                    saved_to: None,
                    error: None,
                },
            ],
            best: BestResult {
                method: "pdfium_tesseract".into(),
                chars: 16,
                saved_to: PathBuf::from("x"),
            },
            stats: RunStats {
                methods_attempted: 2,
                methods_succeeded: 2,
                methods_failed: 0,
                total_duration_ms: 2,
            },
        };
        assert_eq!(outcome.best_text(), "much longer text");
    }
}
