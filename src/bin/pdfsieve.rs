//! CLI binary for pdfsieve.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfsieve::{
    precheck, run, ExtractError, ExtractionConfig, ExtractionProgressCallback, Method,
    ProgressCallback, RunOutcome,
};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one live progress bar per method, with
/// per-page log lines above it. Methods run strictly in sequence, so a
/// single current-bar slot is enough.
struct CliProgressCallback {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().unwrap().take()
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_method_start(&self, method: &str, total_pages: usize) {
        eprintln!(
            "\n{} {} {}",
            cyan("◆"),
            bold(method),
            dim(&format!("({total_pages} pages)"))
        );

        let bar = ProgressBar::new(total_pages as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix(method.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        *self.bar.lock().unwrap() = Some(bar);
    }

    fn on_page_done(&self, page_num: usize, total_pages: usize, chars: usize) {
        if let Some(ref bar) = *self.bar.lock().unwrap() {
            bar.println(format!(
                "  {} Page {:>3}/{:<3}  {}",
                green("✓"),
                page_num,
                total_pages,
                dim(&format!("{chars:>6} chars")),
            ));
            bar.inc(1);
        }
    }

    fn on_method_done(&self, method: &str, chars: usize, duration_ms: u64) {
        if let Some(bar) = self.take_bar() {
            bar.finish_and_clear();
        }
        eprintln!(
            "{} {}  {} chars  {}",
            green("✔"),
            bold(method),
            group_thousands(chars),
            dim(&format!("{:.1}s", duration_ms as f64 / 1000.0)),
        );
    }

    fn on_method_failed(&self, method: &str, error: &str) {
        if let Some(bar) = self.take_bar() {
            bar.finish_and_clear();
        }
        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 100 {
            let head: String = error.chars().take(99).collect();
            format!("{head}\u{2026}")
        } else {
            error.to_string()
        };
        eprintln!("{} {}  {}", red("✗"), bold(method), red(&msg));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract from the first PDF in the current directory, all methods
  pdfsieve

  # Extract from a specific file
  pdfsieve scan.pdf

  # Only the fast text-layer methods
  pdfsieve --methods text_layer,pdfium_tesseract report.pdf

  # Check whether a document needs OCR at all (no extraction)
  pdfsieve --check-only scan.pdf

  # German OCR at 400 DPI, annotated BEST file
  pdfsieve --lang deu --dpi 400 --annotate-best scan.pdf

  # Machine-readable run report
  pdfsieve --json scan.pdf > run.json

METHODS (run order = tie-break order):
  pdfium_tesseract     pdfium text layer; tesseract OCR for layerless pages
  pdftoppm_tesseract   poppler pdftoppm rasteriser + tesseract OCR
  text_layer           lopdf text layer only, no OCR
  vision_ocr           pdfium rasteriser + ollama vision model

EXTERNAL TOOLS:
  tesseract   required by pdfium_tesseract and pdftoppm_tesseract
  pdftoppm    required by pdftoppm_tesseract (poppler-utils)
  ollama      required by vision_ocr (with a vision model pulled, e.g. llava)
  pdfium      loaded as a shared library; see PDFIUM_LIB_PATH

  A method whose backend is missing fails on its own; the other methods
  still run and the best remaining result wins.

ENVIRONMENT VARIABLES:
  PDFSIEVE_OUTPUT_DIR   Output directory (default: extracted_text)
  PDFSIEVE_DPI          Rasterisation DPI (default: 300)
  PDFSIEVE_LANG         OCR language (default: eng)
  PDFSIEVE_METHODS      Method list (default: all)
  PDFSIEVE_OLLAMA_URL   Ollama server URL (default: http://localhost:11434)
  PDFSIEVE_VISION_MODEL Ollama vision model (default: llava)
  PDFIUM_LIB_PATH       Directory containing the pdfium shared library
"#;

/// Extract text from PDFs with multiple backends and keep the best result.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsieve",
    version,
    about = "Extract text from PDFs with multiple backends and keep the best result",
    long_about = "Runs several PDF text-extraction backends in sequence (embedded text layer, \
tesseract OCR over two different rasterisers, and an Ollama vision model), writes one result \
file per backend, and keeps whichever produced the most characters as the BEST file.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to process. Omit to use the first *.pdf in the current directory.
    input: Option<String>,

    /// Directory result files are written to.
    #[arg(short, long, env = "PDFSIEVE_OUTPUT_DIR", default_value = "extracted_text")]
    output_dir: PathBuf,

    /// Rasterisation DPI for OCR (72–600).
    #[arg(long, env = "PDFSIEVE_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// OCR language (tesseract ISO 639-2 code).
    #[arg(short, long, env = "PDFSIEVE_LANG", default_value = "eng")]
    lang: String,

    /// Comma-separated method list, or "all".
    #[arg(
        short,
        long,
        env = "PDFSIEVE_METHODS",
        default_value = "all",
        long_help = "Methods to run, comma-separated, in run order.\n\
          Available: pdfium_tesseract, pdftoppm_tesseract, text_layer, vision_ocr.\n\
          \"all\" runs every method in the default order."
    )]
    methods: String,

    /// Prefix the BEST file with a header naming the winning method.
    #[arg(long)]
    annotate_best: bool,

    /// Report whether the document has an extractable text layer, then exit.
    #[arg(long)]
    check_only: bool,

    /// Pages sampled by --check-only.
    #[arg(long, default_value_t = 3)]
    check_pages: usize,

    /// Character threshold for --check-only.
    #[arg(long, default_value_t = 100)]
    check_threshold: usize,

    /// Ollama server URL for the vision method.
    #[arg(long, env = "PDFSIEVE_OLLAMA_URL", default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Ollama vision model for the vision method.
    #[arg(long, env = "PDFSIEVE_VISION_MODEL", default_value = "llava")]
    vision_model: String,

    /// Output the run report as JSON instead of the summary table.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    // ── Check-only mode ──────────────────────────────────────────────────
    if cli.check_only {
        let coverage = precheck(cli.input.as_deref(), &config)
            .await
            .context("Pre-check failed")?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&coverage)?);
        } else {
            println!("Pages sampled: {}", coverage.pages_sampled);
            for (i, chars) in coverage.page_chars.iter().enumerate() {
                println!("Page {}: {} chars", i + 1, chars);
            }
            if coverage.has_text_layer {
                println!("\n{}", green("✓ PDF has extractable text"));
            } else {
                println!("\n{}", cyan("⚠ PDF appears to be image-based - OCR required!"));
            }
        }
        return Ok(());
    }

    // ── Run extraction ───────────────────────────────────────────────────
    match run(cli.input.as_deref(), &config).await {
        Ok(outcome) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if !cli.quiet {
                print_summary(&outcome);
            }
            Ok(())
        }
        Err(e @ ExtractError::AllMethodsFailed { .. }) => {
            eprintln!("\n{}", red(&format!("✗ {e}")));
            std::process::exit(1);
        }
        Err(e) => Err(e).context("Extraction failed"),
    }
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let methods = parse_methods(&cli.methods)?;
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;

    let mut builder = ExtractionConfig::builder()
        .dpi(cli.dpi)
        .language(cli.lang.clone())
        .methods(methods)
        .output_dir(cli.output_dir.clone())
        .annotate_best(cli.annotate_best)
        .precheck_pages(cli.check_pages)
        .precheck_threshold(cli.check_threshold)
        .ollama_url(cli.ollama_url.clone())
        .vision_model(cli.vision_model.clone());

    if show_progress {
        let cb = CliProgressCallback::new();
        builder = builder.progress_callback(cb as ProgressCallback);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--methods` into an ordered, deduplicated method list.
fn parse_methods(s: &str) -> Result<Vec<Method>> {
    if s.trim().eq_ignore_ascii_case("all") {
        return Ok(Method::ALL.to_vec());
    }

    let mut methods = Vec::new();
    for part in s.split(',') {
        let method: Method = part
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("Invalid --methods value '{s}'"))?;
        if !methods.contains(&method) {
            methods.push(method);
        }
    }
    Ok(methods)
}

/// Print the final summary table, BEST marker, and word estimate.
fn print_summary(outcome: &RunOutcome) {
    eprintln!("\n{}", "=".repeat(80));
    eprintln!("{}", bold("EXTRACTION SUMMARY"));
    eprintln!("{}", "=".repeat(80));

    for o in &outcome.outcomes {
        let status = match &o.error {
            None => green(&format!("✓ {} chars", group_thousands(o.chars))),
            Some(e) => red(&format!("✗ failed ({e})")),
        };
        let marker = if o.is_success() && o.method == outcome.best.method {
            " ⭐ BEST"
        } else {
            ""
        };
        eprintln!("{:<22}: {status}{marker}", o.method);
    }

    for o in outcome.outcomes.iter().filter(|o| o.is_success()) {
        if let Some(ref path) = o.saved_to {
            let size_kb = std::fs::metadata(path)
                .map(|m| m.len() as f64 / 1024.0)
                .unwrap_or(0.0);
            eprintln!("{}", dim(&format!("  saved: {} ({size_kb:.1} KB)", path.display())));
        }
    }

    let best_text = outcome.best_text();
    eprintln!(
        "\n{} Best result: {} → {}",
        green("🌟"),
        bold(&outcome.best.method),
        outcome.best.saved_to.display()
    );
    eprintln!("   Total characters: {}", group_thousands(outcome.best.chars));
    eprintln!(
        "   Estimated words:  ~{}",
        group_thousands(best_text.split_whitespace().count())
    );
    eprintln!(
        "   {}",
        dim(&format!(
            "{}/{} methods succeeded in {:.1}s",
            outcome.stats.methods_succeeded,
            outcome.stats.methods_attempted,
            outcome.stats.total_duration_ms as f64 / 1000.0
        ))
    );
}

/// Format `12345` as `12,345`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_yields_registration_order() {
        let methods = parse_methods("all").unwrap();
        assert_eq!(methods, Method::ALL.to_vec());
    }

    #[test]
    fn parse_list_preserves_order_and_dedups() {
        let methods = parse_methods("text_layer, pdfium_tesseract, text_layer").unwrap();
        assert_eq!(methods, vec![Method::TextLayer, Method::PdfiumTesseract]);
    }

    #[test]
    fn parse_rejects_unknown_method() {
        assert!(parse_methods("easyocr").is_err());
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
