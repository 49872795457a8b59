//! Persistence: timestamped result files under the output directory.
//!
//! One file per successful method plus one BEST file, named
//! `<stem>_<method>_<timestamp>.txt`. The directory is created if absent on
//! every save, so callers never need to prepare it. Timestamps have
//! one-second resolution; two runs inside the same second collide, which is
//! an accepted limitation.

use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Sanitised file stem of the PDF: spaces become underscores so the output
/// filenames stay shell-friendly.
pub fn pdf_stem(pdf_path: &Path) -> String {
    pdf_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .replace(' ', "_")
}

/// Timestamp shared by all files of one run, local time, `%Y%m%d_%H%M%S`.
pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Write one method's text verbatim to its result file.
pub fn save_method_text(
    output_dir: &Path,
    stem: &str,
    method: &str,
    timestamp: &str,
    text: &str,
) -> Result<PathBuf, ExtractError> {
    write_result_file(output_dir, stem, method, timestamp, text)
}

/// Write the winning text to the BEST file.
///
/// With `annotate` the file is prefixed by a header naming the winning
/// method; without it the content is byte-identical to the winning method's
/// file, so the BEST file's length equals the winning length.
pub fn save_best(
    output_dir: &Path,
    stem: &str,
    timestamp: &str,
    method: &str,
    text: &str,
    annotate: bool,
) -> Result<PathBuf, ExtractError> {
    if annotate {
        let annotated = format!(
            "Best extraction method: {method}\n{}\n\n{text}",
            "=".repeat(80)
        );
        write_result_file(output_dir, stem, "BEST", timestamp, &annotated)
    } else {
        write_result_file(output_dir, stem, "BEST", timestamp, text)
    }
}

fn write_result_file(
    output_dir: &Path,
    stem: &str,
    method: &str,
    timestamp: &str,
    text: &str,
) -> Result<PathBuf, ExtractError> {
    std::fs::create_dir_all(output_dir).map_err(|e| ExtractError::OutputWriteFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let path = output_dir.join(format!("{stem}_{method}_{timestamp}.txt"));
    std::fs::write(&path, text).map_err(|e| ExtractError::OutputWriteFailed {
        path: path.clone(),
        source: e,
    })?;

    info!("Saved: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_replaces_spaces() {
        assert_eq!(
            pdf_stem(Path::new("/tmp/Annual Report 2025.pdf")),
            "Annual_Report_2025"
        );
        assert_eq!(pdf_stem(Path::new("plain.pdf")), "plain");
    }

    #[test]
    fn filename_contains_stem_method_and_timestamp() {
        let tmp = tempfile::tempdir().unwrap();
        let path = save_method_text(tmp.path(), "doc", "text_layer", "20260806_101500", "hello")
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(name, "doc_text_layer_20260806_101500.txt");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn output_dir_creation_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("extracted_text");
        save_method_text(&dir, "a", "m1", "t", "x").unwrap();
        save_method_text(&dir, "a", "m2", "t", "y").unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn best_file_is_verbatim_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        let text = "\n--- Page 1 ---\nwinning text";
        let path = save_best(tmp.path(), "doc", "t", "text_layer", text, false).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, text);
        assert_eq!(written.chars().count(), text.chars().count());
    }

    #[test]
    fn best_file_annotation_names_the_method() {
        let tmp = tempfile::tempdir().unwrap();
        let path = save_best(tmp.path(), "doc", "t", "pdfium_tesseract", "body", true).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Best extraction method: pdfium_tesseract\n"));
        assert!(written.ends_with("\n\nbody"));
    }
}
