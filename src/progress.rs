//! Progress-callback trait for per-page and per-method extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! real-time events as each method works through the document.
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a log, or a terminal progress bar without the
//! library knowing anything about how the host application communicates.

use std::sync::Arc;

/// Called by the extraction pipeline as it processes each method and page.
///
/// Implementations must be `Send + Sync`. All methods have default no-op
/// implementations so callers only override what they care about.
///
/// Events arrive strictly in order: methods run one after another and pages
/// are processed sequentially within a method, so no internal locking is
/// required beyond what `Send + Sync` already implies.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once when a method begins, after its backend has reported the
    /// document page count.
    fn on_method_start(&self, method: &str, total_pages: usize) {
        let _ = (method, total_pages);
    }

    /// Called after each page of the current method completes.
    ///
    /// `chars` is the character count of that page's extracted text.
    fn on_page_done(&self, page_num: usize, total_pages: usize, chars: usize) {
        let _ = (page_num, total_pages, chars);
    }

    /// Called when a method finishes with a result.
    fn on_method_done(&self, method: &str, chars: usize, duration_ms: u64) {
        let _ = (method, chars, duration_ms);
    }

    /// Called when a method fails.
    fn on_method_failed(&self, method: &str, error: &str) {
        let _ = (method, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        pages: AtomicUsize,
        done: AtomicUsize,
        failed: AtomicUsize,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_page_done(&self, _page_num: usize, _total_pages: usize, _chars: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_method_done(&self, _method: &str, _chars: usize, _duration_ms: u64) {
            self.done.fetch_add(1, Ordering::SeqCst);
        }

        fn on_method_failed(&self, _method: &str, _error: &str) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_method_start("text_layer", 5);
        cb.on_page_done(1, 5, 42);
        cb.on_method_done("text_layer", 210, 12);
        cb.on_method_failed("vision_ocr", "connection refused");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            pages: AtomicUsize::new(0),
            done: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        };

        tracker.on_method_start("pdfium_tesseract", 2);
        tracker.on_page_done(1, 2, 100);
        tracker.on_page_done(2, 2, 200);
        tracker.on_method_done("pdfium_tesseract", 300, 1500);
        tracker.on_method_failed("vision_ocr", "timeout");

        assert_eq!(tracker.pages.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.done.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.failed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ExtractionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_method_start("text_layer", 10);
        cb.on_page_done(1, 10, 512);
    }
}
