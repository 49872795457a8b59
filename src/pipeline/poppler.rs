//! Alternative rasteriser: poppler's `pdftoppm` binary.
//!
//! A second, independent rendering path. Some malformed PDFs that pdfium
//! refuses to render go through poppler fine, and vice versa, so the
//! pdftoppm-based method catches documents the pdfium-based one loses.
//!
//! `pdftoppm -r <dpi> -png <pdf> <prefix>` writes one `<prefix>-N.png` per
//! page into a temp directory owned by the caller; the directory (and every
//! page image in it) is removed when the returned `TempDir` drops.

use crate::error::MethodError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

/// Rasterise the whole document into a temp directory of PNGs.
///
/// Returns the owning `TempDir` and the page image paths in page order.
pub async fn rasterize_to_dir(
    pdf_path: &Path,
    dpi: u32,
) -> Result<(TempDir, Vec<PathBuf>), MethodError> {
    let dir = TempDir::new().map_err(|e| MethodError::Tool {
        tool: "pdftoppm".into(),
        detail: format!("temp dir: {e}"),
    })?;
    let prefix = dir.path().join("page");

    let output = Command::new("pdftoppm")
        .arg("-r")
        .arg(dpi.to_string())
        .arg("-png")
        .arg(pdf_path)
        .arg(&prefix)
        .output()
        .await
        .map_err(|e| MethodError::Tool {
            tool: "pdftoppm".into(),
            detail: format!("failed to start: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MethodError::Tool {
            tool: "pdftoppm".into(),
            detail: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    let images = collect_page_images(dir.path())?;
    debug!(
        "pdftoppm produced {} page images at {} DPI",
        images.len(),
        dpi
    );
    Ok((dir, images))
}

/// Collect `page-*.png` files in page order.
///
/// pdftoppm zero-pads page numbers to a uniform width per run, so a plain
/// filename sort is page order.
fn collect_page_images(dir: &Path) -> Result<Vec<PathBuf>, MethodError> {
    let entries = std::fs::read_dir(dir).map_err(|e| MethodError::Tool {
        tool: "pdftoppm".into(),
        detail: format!("reading output dir: {e}"),
    })?;

    let mut images: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("png"))
        .collect();
    images.sort();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn page_images_sort_into_page_order() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["page-03.png", "page-01.png", "page-02.png", "notes.txt"] {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }

        let images = collect_page_images(tmp.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["page-01.png", "page-02.png", "page-03.png"]);
    }

    #[test]
    fn empty_dir_yields_no_images() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(collect_page_images(tmp.path()).unwrap().is_empty());
    }
}
