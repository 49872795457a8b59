//! pdfium access: page counts, embedded text layers, and rasterisation.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread designed for blocking operations, preventing the Tokio worker
//! threads from stalling during CPU-heavy rendering.
//!
//! Every call opens its own document handle and releases it before
//! returning; nothing pdfium-related outlives the blocking closure.

use crate::error::{ExtractError, MethodError};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// What a page contributes to a text-layer-first method: either its embedded
/// text layer, or — when the layer is empty — a rasterised image for OCR.
pub enum PageContent {
    /// Non-empty embedded text layer, returned verbatim.
    Text(String),
    /// No text layer; the page rasterised at the requested DPI.
    Image(DynamicImage),
}

/// Bind to the pdfium library.
///
/// `PDFIUM_LIB_PATH` points at a directory containing the shared library;
/// otherwise the system library path is searched.
fn bind_pdfium() -> Result<Pdfium, String> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)),
        Err(_) => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| format!("{e:?}"))?;
    Ok(Pdfium::new(bindings))
}

/// Per-page render scale for a target DPI. PDF user space is 72 points/inch.
fn render_config(dpi: u32) -> PdfRenderConfig {
    PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0)
}

/// Load every page as either its text layer or a rasterised image.
///
/// A page's text layer is used when its trimmed form is non-empty; only
/// layerless pages pay the rasterisation cost. Page order is preserved.
pub async fn load_pages_with_text_layer(
    pdf_path: &Path,
    dpi: u32,
) -> Result<Vec<PageContent>, MethodError> {
    let path = pdf_path.to_path_buf();
    tokio::task::spawn_blocking(move || load_pages_blocking(&path, dpi))
        .await
        .map_err(|e| MethodError::Tool {
            tool: "pdfium".into(),
            detail: format!("render task panicked: {e}"),
        })?
}

fn load_pages_blocking(pdf_path: &Path, dpi: u32) -> Result<Vec<PageContent>, MethodError> {
    let pdfium = bind_pdfium().map_err(|detail| MethodError::Tool {
        tool: "pdfium".into(),
        detail,
    })?;
    let document = open_document(&pdfium, pdf_path)?;

    let pages = document.pages();
    let total = pages.len() as usize;
    let config = render_config(dpi);
    let mut contents = Vec::with_capacity(total);

    for idx in 0..total {
        let page = pages.get(idx as u16).map_err(|e| MethodError::Render {
            page: idx + 1,
            detail: format!("{e:?}"),
        })?;

        let layer = page.text().map(|t| t.all()).unwrap_or_default();
        if !layer.trim().is_empty() {
            contents.push(PageContent::Text(layer));
            continue;
        }

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| MethodError::Render {
                page: idx + 1,
                detail: format!("{e:?}"),
            })?;
        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );
        contents.push(PageContent::Image(image));
    }

    Ok(contents)
}

/// Rasterise every page at the requested DPI.
pub async fn rasterize_all(pdf_path: &Path, dpi: u32) -> Result<Vec<DynamicImage>, MethodError> {
    let path = pdf_path.to_path_buf();
    tokio::task::spawn_blocking(move || rasterize_all_blocking(&path, dpi))
        .await
        .map_err(|e| MethodError::Tool {
            tool: "pdfium".into(),
            detail: format!("render task panicked: {e}"),
        })?
}

fn rasterize_all_blocking(pdf_path: &Path, dpi: u32) -> Result<Vec<DynamicImage>, MethodError> {
    let pdfium = bind_pdfium().map_err(|detail| MethodError::Tool {
        tool: "pdfium".into(),
        detail,
    })?;
    let document = open_document(&pdfium, pdf_path)?;

    let pages = document.pages();
    let total = pages.len() as usize;
    let config = render_config(dpi);
    let mut images = Vec::with_capacity(total);

    for idx in 0..total {
        let page = pages.get(idx as u16).map_err(|e| MethodError::Render {
            page: idx + 1,
            detail: format!("{e:?}"),
        })?;
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| MethodError::Render {
                page: idx + 1,
                detail: format!("{e:?}"),
            })?;
        images.push(bitmap.as_image());
    }

    Ok(images)
}

fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
) -> Result<PdfDocument<'a>, MethodError> {
    pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| MethodError::Tool {
            tool: "pdfium".into(),
            detail: format!("failed to open {}: {e:?}", pdf_path.display()),
        })
}

/// Trimmed text-layer character counts for the first `max_pages` pages.
///
/// Used by the pre-check; failures here are fatal because the pre-check has
/// no other backend to fall back to.
pub async fn text_layer_sample(
    pdf_path: &Path,
    max_pages: usize,
) -> Result<Vec<usize>, ExtractError> {
    let path = pdf_path.to_path_buf();
    tokio::task::spawn_blocking(move || text_layer_sample_blocking(&path, max_pages))
        .await
        .map_err(|e| ExtractError::Internal(format!("precheck task panicked: {e}")))?
}

fn text_layer_sample_blocking(
    pdf_path: &Path,
    max_pages: usize,
) -> Result<Vec<usize>, ExtractError> {
    let pdfium = bind_pdfium().map_err(ExtractError::PdfiumBindingFailed)?;
    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| ExtractError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    let total = pages.len() as usize;
    let sample = total.min(max_pages);
    let mut counts = Vec::with_capacity(sample);

    for idx in 0..sample {
        let page = pages.get(idx as u16).map_err(|e| ExtractError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: format!("page {}: {e:?}", idx + 1),
        })?;
        let text = page.text().map(|t| t.all()).unwrap_or_default();
        counts.push(text.trim().chars().count());
    }

    Ok(counts)
}
