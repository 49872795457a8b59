//! Run orchestration: the single linear pass over the method list.
//!
//! A run is strictly sequential — methods execute one after another, each
//! opening its own document handle. A failing method is logged, recorded in
//! its [`MethodOutcome`], and the run moves on; only "every method failed"
//! is fatal. Successful methods are persisted as they finish, then the best
//! result (longest text, first-registered wins ties) is persisted as the
//! BEST file.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{BestResult, MethodOutcome, RunOutcome, RunStats, TextCoverage};
use crate::pipeline::{input, render};
use crate::persist;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Run every configured extraction method against a document and persist
/// the results.
///
/// # Arguments
/// * `input_path` — PDF path; `None` scans the working directory for the
///   first `*.pdf`
/// * `config` — run configuration
///
/// # Returns
/// `Ok(RunOutcome)` when at least one method succeeded (per-method failures
/// are recorded inside the outcome, not raised).
///
/// # Errors
/// Returns `Err(ExtractError)` only for fatal conditions: no input PDF,
/// unreadable input, output write failure, or every method failing. In the
/// all-failed case no BEST file is written.
pub async fn run(
    input_path: Option<&str>,
    config: &ExtractionConfig,
) -> Result<RunOutcome, ExtractError> {
    let total_start = Instant::now();

    let pdf = input::resolve_input(input_path, Path::new("."))?;
    info!("Extracting: {}", pdf.display());

    let stem = persist::pdf_stem(&pdf);
    let timestamp = persist::run_timestamp();

    let mut outcomes: Vec<MethodOutcome> = Vec::with_capacity(config.methods.len());

    for method in &config.methods {
        let method_start = Instant::now();
        let result = method.run(&pdf, config).await;
        let duration_ms = method_start.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                let chars = text.chars().count();
                let saved =
                    persist::save_method_text(&config.output_dir, &stem, method.name(), &timestamp, &text)?;
                info!("{}: {} chars in {}ms", method.name(), chars, duration_ms);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_method_done(method.name(), chars, duration_ms);
                }
                outcomes.push(MethodOutcome {
                    method: method.name().to_string(),
                    text,
                    chars,
                    duration_ms,
                    saved_to: Some(saved),
                    error: None,
                });
            }
            Err(e) => {
                warn!("{} failed: {}", method.name(), e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_method_failed(method.name(), &e.to_string());
                }
                outcomes.push(MethodOutcome {
                    method: method.name().to_string(),
                    text: String::new(),
                    chars: 0,
                    duration_ms,
                    saved_to: None,
                    error: Some(e),
                });
            }
        }
    }

    let Some(best_idx) = select_best(&outcomes) else {
        let first_error = outcomes
            .iter()
            .find_map(|o| o.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(ExtractError::AllMethodsFailed {
            attempted: outcomes.len(),
            first_error,
        });
    };

    let best_path = persist::save_best(
        &config.output_dir,
        &stem,
        &timestamp,
        &outcomes[best_idx].method,
        &outcomes[best_idx].text,
        config.annotate_best,
    )?;

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let stats = RunStats {
        methods_attempted: outcomes.len(),
        methods_succeeded: succeeded,
        methods_failed: outcomes.len() - succeeded,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Run complete: {}/{} methods succeeded, best = {} ({} chars)",
        stats.methods_succeeded,
        stats.methods_attempted,
        outcomes[best_idx].method,
        outcomes[best_idx].chars
    );

    Ok(RunOutcome {
        pdf,
        stem,
        timestamp,
        best: BestResult {
            method: outcomes[best_idx].method.clone(),
            chars: outcomes[best_idx].chars,
            saved_to: best_path,
        },
        outcomes,
        stats,
    })
}

/// Synchronous wrapper around [`run`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(
    input_path: Option<&str>,
    config: &ExtractionConfig,
) -> Result<RunOutcome, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(run(input_path, config))
}

/// Pre-check: does the document already carry an extractable text layer?
///
/// Samples the text layer of the first `config.precheck_pages` pages and
/// compares the combined trimmed character count against
/// `config.precheck_threshold`. Advisory only — no files are written.
pub async fn precheck(
    input_path: Option<&str>,
    config: &ExtractionConfig,
) -> Result<TextCoverage, ExtractError> {
    let pdf = input::resolve_input(input_path, Path::new("."))?;
    info!("Checking: {}", pdf.display());

    let page_chars = render::text_layer_sample(&pdf, config.precheck_pages).await?;
    Ok(TextCoverage::evaluate(page_chars, config.precheck_threshold))
}

/// Index of the successful outcome with the greatest character count.
///
/// Ties go to the earliest registered method (strictly-greater comparison),
/// and `None` means every method failed.
fn select_best(outcomes: &[MethodOutcome]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, outcome) in outcomes.iter().enumerate() {
        if !outcome.is_success() {
            continue;
        }
        match best {
            Some(b) if outcomes[b].chars >= outcome.chars => {}
            _ => best = Some(i),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MethodError;

    fn ok(method: &str, text: &str) -> MethodOutcome {
        MethodOutcome {
            method: method.to_string(),
            text: text.to_string(),
            chars: text.chars().count(),
            duration_ms: 0,
            saved_to: None,
            error: None,
        }
    }

    fn failed(method: &str) -> MethodOutcome {
        MethodOutcome {
            method: method.to_string(),
            text: String::new(),
            chars: 0,
            duration_ms: 0,
            saved_to: None,
            error: Some(MethodError::NoText),
        }
    }

    #[test]
    fn longest_text_wins() {
        let outcomes = vec![ok("a", "short"), ok("b", "a much longer result"), ok("c", "mid text")];
        assert_eq!(select_best(&outcomes), Some(1));
    }

    #[test]
    fn ties_go_to_first_registered() {
        let outcomes = vec![ok("first", "same!"), ok("second", "same!")];
        assert_eq!(select_best(&outcomes), Some(0));
    }

    #[test]
    fn failed_methods_are_skipped() {
        let outcomes = vec![failed("a"), ok("b", "x"), failed("c")];
        assert_eq!(select_best(&outcomes), Some(1));
    }

    #[test]
    fn all_failed_selects_nothing() {
        let outcomes = vec![failed("a"), failed("b")];
        assert_eq!(select_best(&outcomes), None);
    }

    #[test]
    fn empty_success_still_beats_failures() {
        // A zero-page document yields Ok("") — still a success, still selectable.
        let outcomes = vec![failed("a"), ok("b", "")];
        assert_eq!(select_best(&outcomes), Some(1));
    }

    #[test]
    fn char_count_not_byte_count_decides() {
        // 3 chars / 9 bytes vs 4 chars / 4 bytes: the 4-char result wins.
        let outcomes = vec![ok("bytes", "日本語"), ok("chars", "abcd")];
        assert_eq!(select_best(&outcomes), Some(1));
    }
}
