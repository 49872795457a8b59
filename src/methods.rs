//! The extraction strategy list.
//!
//! Every method has the same shape: document path in, one big string out —
//! per-page text, each page prefixed with a `--- Page N ---` banner, pages
//! joined in increasing order. What differs is only which backends do the
//! work:
//!
//! | Method               | Text layer | Rasteriser | OCR          |
//! |----------------------|------------|------------|--------------|
//! | `pdfium_tesseract`   | pdfium     | pdfium     | tesseract    |
//! | `pdftoppm_tesseract` | —          | pdftoppm   | tesseract    |
//! | `text_layer`         | lopdf      | —          | —            |
//! | `vision_ocr`         | —          | pdfium     | vision model |
//!
//! Failure handling is uniform: the first backend error anywhere in a
//! method aborts that method's run with a [`MethodError`]; there are no
//! retries and no partial-page recovery. Each method opens and closes its
//! own document handle, so a crash in one backend cannot poison another.

use crate::config::ExtractionConfig;
use crate::error::MethodError;
use crate::pipeline::render::PageContent;
use crate::pipeline::{ocr, poppler, render, textlayer, vision};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// One of the four interchangeable extraction methods.
///
/// The variant order is the registration order: it is the default run order
/// and breaks ties in the best-result selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// pdfium text layer where present, tesseract OCR for layerless pages.
    PdfiumTesseract,
    /// Rasterise every page with pdftoppm, OCR each with tesseract.
    PdftoppmTesseract,
    /// lopdf text-layer extraction only, no OCR.
    TextLayer,
    /// Rasterise every page with pdfium, transcribe each with a vision model.
    VisionOcr,
}

impl Method {
    /// All methods, in registration order.
    pub const ALL: [Method; 4] = [
        Method::PdfiumTesseract,
        Method::PdftoppmTesseract,
        Method::TextLayer,
        Method::VisionOcr,
    ];

    /// Stable name used in output filenames, CLI flags, and JSON.
    pub fn name(self) -> &'static str {
        match self {
            Method::PdfiumTesseract => "pdfium_tesseract",
            Method::PdftoppmTesseract => "pdftoppm_tesseract",
            Method::TextLayer => "text_layer",
            Method::VisionOcr => "vision_ocr",
        }
    }

    /// Short human-readable description for console headers.
    pub fn describe(self) -> &'static str {
        match self {
            Method::PdfiumTesseract => "pdfium text layer + tesseract OCR",
            Method::PdftoppmTesseract => "pdftoppm + tesseract OCR",
            Method::TextLayer => "text layer only (lopdf)",
            Method::VisionOcr => "vision model OCR (ollama)",
        }
    }

    /// Run this method against a document.
    ///
    /// A zero-page document yields `Ok("")` — an empty document is not a
    /// backend failure.
    pub async fn run(
        self,
        pdf_path: &Path,
        config: &ExtractionConfig,
    ) -> Result<String, MethodError> {
        match self {
            Method::PdfiumTesseract => run_pdfium_tesseract(pdf_path, config).await,
            Method::PdftoppmTesseract => run_pdftoppm_tesseract(pdf_path, config).await,
            Method::TextLayer => run_text_layer(pdf_path, config).await,
            Method::VisionOcr => run_vision_ocr(pdf_path, config).await,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdfium_tesseract" => Ok(Method::PdfiumTesseract),
            "pdftoppm_tesseract" => Ok(Method::PdftoppmTesseract),
            "text_layer" => Ok(Method::TextLayer),
            "vision_ocr" => Ok(Method::VisionOcr),
            other => Err(format!(
                "unknown method '{other}' (expected one of: pdfium_tesseract, \
                 pdftoppm_tesseract, text_layer, vision_ocr)"
            )),
        }
    }
}

/// The banner prefixed to every page's text.
fn page_banner(page_num: usize) -> String {
    format!("\n--- Page {page_num} ---\n")
}

fn notify_start(config: &ExtractionConfig, method: Method, total_pages: usize) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_method_start(method.name(), total_pages);
    }
}

fn notify_page(config: &ExtractionConfig, page_num: usize, total_pages: usize, chars: usize) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_page_done(page_num, total_pages, chars);
    }
}

// ── Method 1: pdfium text layer + tesseract ──────────────────────────────────

async fn run_pdfium_tesseract(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<String, MethodError> {
    let pages = render::load_pages_with_text_layer(pdf_path, config.dpi).await?;
    let total = pages.len();
    notify_start(config, Method::PdfiumTesseract, total);

    let mut parts = Vec::with_capacity(total);
    for (i, content) in pages.into_iter().enumerate() {
        let page_num = i + 1;
        let text = match content {
            PageContent::Text(layer) => layer,
            PageContent::Image(img) => ocr::ocr_image(&img, &config.language, page_num).await?,
        };
        notify_page(config, page_num, total, text.chars().count());
        parts.push(format!("{}{}", page_banner(page_num), text));
    }

    Ok(parts.join("\n"))
}

// ── Method 2: pdftoppm + tesseract ───────────────────────────────────────────

async fn run_pdftoppm_tesseract(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<String, MethodError> {
    // The TempDir binding keeps the page images alive for the OCR loop.
    let (_image_dir, images) = poppler::rasterize_to_dir(pdf_path, config.dpi).await?;
    let total = images.len();
    notify_start(config, Method::PdftoppmTesseract, total);

    let mut parts = Vec::with_capacity(total);
    for (i, image_path) in images.iter().enumerate() {
        let page_num = i + 1;
        let text = ocr::ocr_image_file(image_path, &config.language, page_num).await?;
        notify_page(config, page_num, total, text.chars().count());
        parts.push(format!("{}{}", page_banner(page_num), text));
    }

    Ok(parts.join("\n"))
}

// ── Method 3: text layer only ────────────────────────────────────────────────

async fn run_text_layer(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<String, MethodError> {
    let pages = textlayer::extract_pages(pdf_path).await?;
    if pages.is_empty() {
        // An empty document has nothing to extract, but that is not a failure.
        return Ok(String::new());
    }

    let total = pages.len();
    notify_start(config, Method::TextLayer, total);

    let mut parts = Vec::new();
    for (i, (_, text)) in pages.iter().enumerate() {
        let page_num = i + 1;
        notify_page(config, page_num, total, text.chars().count());
        // Pages with no text layer contribute no banner, matching the
        // layer-only nature of this method.
        if !text.trim().is_empty() {
            parts.push(format!("{}{}", page_banner(page_num), text));
        }
    }

    let result = parts.join("\n");
    if result.trim().is_empty() {
        return Err(MethodError::NoText);
    }
    Ok(result)
}

// ── Method 4: vision model OCR ───────────────────────────────────────────────

async fn run_vision_ocr(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<String, MethodError> {
    let images = render::rasterize_all(pdf_path, config.dpi).await?;
    let total = images.len();
    notify_start(config, Method::VisionOcr, total);

    let client = vision::VisionClient::new(
        &config.ollama_url,
        &config.vision_model,
        &config.language,
    );

    let mut parts = Vec::with_capacity(total);
    for (i, img) in images.iter().enumerate() {
        let page_num = i + 1;
        let text = client.transcribe(img, page_num).await?;
        notify_page(config, page_num, total, text.chars().count());
        parts.push(format!("{}{}", page_banner(page_num), text));
    }

    Ok(parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_format() {
        assert_eq!(page_banner(1), "\n--- Page 1 ---\n");
        assert_eq!(page_banner(42), "\n--- Page 42 ---\n");
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for method in Method::ALL {
            assert_eq!(method.name().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = "pymupdf".parse::<Method>().unwrap_err();
        assert!(err.contains("pymupdf"));
    }

    #[test]
    fn registration_order_is_stable() {
        let names: Vec<_> = Method::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(
            names,
            vec![
                "pdfium_tesseract",
                "pdftoppm_tesseract",
                "text_layer",
                "vision_ocr"
            ]
        );
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(Method::TextLayer.to_string(), "text_layer");
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&Method::VisionOcr).unwrap();
        assert_eq!(json, "\"vision_ocr\"");
    }
}
