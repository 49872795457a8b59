//! Input resolution: locate the PDF to process.
//!
//! The tool accepts an explicit path, or — matching how it is normally used,
//! dropped into a directory next to a scanned document — scans the working
//! directory for the first `*.pdf` in sorted order. Either way the file's
//! `%PDF` magic bytes are validated up front so backends get a meaningful
//! error instead of a parser crash.

use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve the input to a validated PDF path.
///
/// `input = Some(path)` validates that path; `None` scans `dir` for the
/// first `*.pdf` file in sorted order.
pub fn resolve_input(input: Option<&str>, dir: &Path) -> Result<PathBuf, ExtractError> {
    match input {
        Some(path) => resolve_path(Path::new(path)),
        None => resolve_path(&find_first_pdf(dir)?),
    }
}

/// Find the first `*.pdf` file (case-insensitive extension) in `dir`,
/// sorted by file name.
fn find_first_pdf(dir: &Path) -> Result<PathBuf, ExtractError> {
    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => ExtractError::PermissionDenied {
            path: dir.to_path_buf(),
        },
        _ => ExtractError::FileNotFound {
            path: dir.to_path_buf(),
        },
    })?;

    let mut pdfs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    pdfs.sort();

    pdfs.into_iter().next().ok_or_else(|| ExtractError::NoPdfFound {
        dir: dir.to_path_buf(),
    })
}

/// Validate that `path` exists, is readable, and starts with `%PDF`.
fn resolve_path(path: &Path) -> Result<PathBuf, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ExtractError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(ExtractError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved PDF: {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_pdf_stub(dir: &Path, name: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, b"%PDF-1.7\n%stub\n").unwrap();
        p
    }

    #[test]
    fn explicit_path_is_validated() {
        let tmp = tempfile::tempdir().unwrap();
        let pdf = write_pdf_stub(tmp.path(), "doc.pdf");

        let resolved = resolve_input(Some(pdf.to_str().unwrap()), tmp.path()).unwrap();
        assert_eq!(resolved, pdf);
    }

    #[test]
    fn missing_path_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let err = resolve_input(Some("/no/such/file.pdf"), tmp.path()).unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound { .. }));
    }

    #[test]
    fn non_pdf_magic_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let bogus = tmp.path().join("fake.pdf");
        fs::write(&bogus, b"<html>not a pdf</html>").unwrap();

        let err = resolve_input(Some(bogus.to_str().unwrap()), tmp.path()).unwrap_err();
        assert!(matches!(err, ExtractError::NotAPdf { .. }));
    }

    #[test]
    fn scan_picks_first_pdf_in_sorted_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_pdf_stub(tmp.path(), "b_second.pdf");
        let first = write_pdf_stub(tmp.path(), "a_first.pdf");
        fs::write(tmp.path().join("notes.txt"), b"ignored").unwrap();

        let resolved = resolve_input(None, tmp.path()).unwrap();
        assert_eq!(resolved, first);
    }

    #[test]
    fn scan_matches_extension_case_insensitively() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("SCAN.PDF");
        fs::write(&p, b"%PDF-1.4\n").unwrap();

        let resolved = resolve_input(None, tmp.path()).unwrap();
        assert_eq!(resolved, p);
    }

    #[test]
    fn empty_directory_reports_no_pdf_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = resolve_input(None, tmp.path()).unwrap_err();
        assert!(matches!(err, ExtractError::NoPdfFound { .. }));
    }
}
