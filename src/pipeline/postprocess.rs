//! Post-processing: deterministic cleanup of OCR output.
//!
//! tesseract and vision models both emit artefacts that are not text:
//! CRLF line endings, trailing form feeds, runs of blank lines between
//! paragraphs, and the occasional zero-width character. These rules strip
//! the artefacts without touching content.
//!
//! Embedded text layers are NOT cleaned — a text-layer method returns the
//! layer verbatim, and cleanup would break that contract.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to raw OCR output.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF → LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 3. Drop control characters other than newline and tab
/// 4. Trim trailing whitespace per line
/// 5. Collapse 3+ consecutive blank lines down to 2
/// 6. Trim leading/trailing blank lines
pub fn clean_ocr_text(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim_matches('\n').to_string()
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rules 2–3: Strip invisible Unicode and control characters ────────────────

fn remove_invisible_chars(input: &str) -> String {
    input
        .chars()
        .filter(|&c| {
            !matches!(
                c,
                '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' | '\u{2060}' | '\u{00AD}'
            ) && (!c.is_control() || c == '\n' || c == '\t')
        })
        .collect()
}

// ── Rule 4: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 5: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_becomes_lf() {
        assert_eq!(clean_ocr_text("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn invisible_chars_are_stripped() {
        assert_eq!(clean_ocr_text("he\u{200B}llo\u{FEFF}"), "hello");
    }

    #[test]
    fn form_feeds_are_dropped() {
        // tesseract terminates each page with a form feed
        assert_eq!(clean_ocr_text("page text\u{000C}"), "page text");
    }

    #[test]
    fn trailing_whitespace_trimmed_per_line() {
        assert_eq!(clean_ocr_text("a   \nb\t\n"), "a\nb");
    }

    #[test]
    fn blank_line_runs_collapse_to_one() {
        assert_eq!(clean_ocr_text("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn surrounding_blank_lines_removed() {
        assert_eq!(clean_ocr_text("\n\nbody\n\n"), "body");
    }

    #[test]
    fn cleanup_is_idempotent() {
        let once = clean_ocr_text("  a \r\n\r\n\r\n\r\n b\u{200B} \n");
        assert_eq!(clean_ocr_text(&once), once);
    }

    #[test]
    fn plain_text_passes_through() {
        let text = "The quick brown fox\njumps over the lazy dog.";
        assert_eq!(clean_ocr_text(text), text);
    }
}
