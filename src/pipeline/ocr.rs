//! tesseract subprocess wrapper.
//!
//! The OCR engine is consumed as a black box: write the page image to a
//! temp file, run `tesseract <image> stdout`, read stdout. Fixed engine
//! parameters (`--oem 3 --psm 6`) assume a uniform block of text per page,
//! which matches scanned documents far better than tesseract's automatic
//! segmentation.

use crate::error::MethodError;
use crate::pipeline::{encode, postprocess};
use image::DynamicImage;
use std::io::Write;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// OCR a rasterised page.
///
/// The image is PNG-encoded into a temp file that is removed when this
/// function returns, success or failure.
pub async fn ocr_image(
    img: &DynamicImage,
    lang: &str,
    page_num: usize,
) -> Result<String, MethodError> {
    let bytes = encode::png_bytes(img).map_err(|e| MethodError::Ocr {
        page: page_num,
        detail: format!("PNG encoding failed: {e}"),
    })?;

    let mut tmp = tempfile::Builder::new()
        .prefix("pdfsieve_ocr_")
        .suffix(".png")
        .tempfile()
        .map_err(|e| MethodError::Ocr {
            page: page_num,
            detail: format!("temp file: {e}"),
        })?;
    tmp.write_all(&bytes).map_err(|e| MethodError::Ocr {
        page: page_num,
        detail: format!("temp file write: {e}"),
    })?;

    ocr_image_file(tmp.path(), lang, page_num).await
}

/// OCR an image already on disk (used for pdftoppm output).
pub async fn ocr_image_file(
    image_path: &Path,
    lang: &str,
    page_num: usize,
) -> Result<String, MethodError> {
    let output = Command::new("tesseract")
        .arg(image_path)
        .arg("stdout")
        .args(tesseract_args(lang))
        .output()
        .await
        .map_err(|e| MethodError::Tool {
            tool: "tesseract".into(),
            detail: format!("failed to start: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MethodError::Ocr {
            page: page_num,
            detail: format!("tesseract {}: {}", output.status, stderr.trim()),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    debug!("OCR page {} → {} chars", page_num, text.chars().count());
    Ok(postprocess::clean_ocr_text(&text))
}

/// Fixed tesseract arguments: language, LSTM engine, uniform-block layout.
fn tesseract_args(lang: &str) -> Vec<String> {
    vec![
        "-l".into(),
        lang.into(),
        "--oem".into(),
        "3".into(),
        "--psm".into(),
        "6".into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tesseract_args_carry_language_and_engine_flags() {
        let args = tesseract_args("eng");
        assert_eq!(args, vec!["-l", "eng", "--oem", "3", "--psm", "6"]);
    }

    #[test]
    fn tesseract_args_pass_other_languages_through() {
        let args = tesseract_args("deu");
        assert_eq!(args[1], "deu");
    }
}
