//! Configuration types for an extraction run.
//!
//! All run behaviour is controlled through [`ExtractionConfig`], built via
//! its [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across methods and to diff two runs to understand
//! why their outputs differ.

use crate::error::ExtractError;
use crate::methods::Method;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Configuration for an extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfsieve::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .dpi(300)
///     .language("eng")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Rasterisation DPI used when converting a page to an image for OCR.
    /// Range: 72–600. Default: 300.
    ///
    /// 300 DPI is the tesseract sweet spot for body text. Lower values blur
    /// small fonts; higher values cost render time and memory with little
    /// accuracy gain.
    pub dpi: u32,

    /// OCR language passed to tesseract (`-l`), ISO 639-2 code. Default: "eng".
    pub language: String,

    /// Extraction methods to run, in order. Ties in the best-result selection
    /// are broken by this order, so put the preferred backend first.
    /// Default: all four methods.
    pub methods: Vec<Method>,

    /// Directory result files are written to. Created if absent. Default:
    /// `extracted_text`.
    pub output_dir: PathBuf,

    /// Prefix the BEST file with a header naming the winning method.
    /// Default: false, so the BEST file's content is byte-identical to the
    /// winning method's output.
    pub annotate_best: bool,

    /// Number of leading pages the pre-check samples. Default: 3.
    pub precheck_pages: usize,

    /// Minimum combined character count (trimmed, across sampled pages) for
    /// the pre-check to report an extractable text layer. Default: 100.
    pub precheck_threshold: usize,

    /// Base URL of the Ollama server used by the vision method.
    /// Default: `http://localhost:11434`.
    pub ollama_url: String,

    /// Ollama vision model used by the vision method. Default: "llava".
    pub vision_model: String,

    /// Optional progress callback, fired per page and per method.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            language: "eng".to_string(),
            methods: Method::ALL.to_vec(),
            output_dir: PathBuf::from("extracted_text"),
            annotate_best: false,
            precheck_pages: 3,
            precheck_threshold: 100,
            ollama_url: "http://localhost:11434".to_string(),
            vision_model: "llava".to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("dpi", &self.dpi)
            .field("language", &self.language)
            .field("methods", &self.methods)
            .field("output_dir", &self.output_dir)
            .field("annotate_best", &self.annotate_best)
            .field("precheck_pages", &self.precheck_pages)
            .field("precheck_threshold", &self.precheck_threshold)
            .field("ollama_url", &self.ollama_url)
            .field("vision_model", &self.vision_model)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.config.language = lang.into();
        self
    }

    pub fn methods(mut self, methods: Vec<Method>) -> Self {
        self.config.methods = methods;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn annotate_best(mut self, v: bool) -> Self {
        self.config.annotate_best = v;
        self
    }

    pub fn precheck_pages(mut self, n: usize) -> Self {
        self.config.precheck_pages = n.max(1);
        self
    }

    pub fn precheck_threshold(mut self, n: usize) -> Self {
        self.config.precheck_threshold = n;
        self
    }

    pub fn ollama_url(mut self, url: impl Into<String>) -> Self {
        self.config.ollama_url = url.into();
        self
    }

    pub fn vision_model(mut self, model: impl Into<String>) -> Self {
        self.config.vision_model = model.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(ExtractError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.methods.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "At least one extraction method must be enabled".into(),
            ));
        }
        if c.language.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ExtractionConfig::builder().build().unwrap();
        assert_eq!(config.dpi, 300);
        assert_eq!(config.language, "eng");
        assert_eq!(config.methods.len(), 4);
        assert_eq!(config.output_dir, PathBuf::from("extracted_text"));
        assert!(!config.annotate_best);
    }

    #[test]
    fn dpi_out_of_range_rejected() {
        assert!(ExtractionConfig::builder().dpi(50).build().is_err());
        assert!(ExtractionConfig::builder().dpi(700).build().is_err());
        assert!(ExtractionConfig::builder().dpi(72).build().is_ok());
        assert!(ExtractionConfig::builder().dpi(600).build().is_ok());
    }

    #[test]
    fn empty_method_list_rejected() {
        let err = ExtractionConfig::builder()
            .methods(Vec::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("method"));
    }

    #[test]
    fn empty_language_rejected() {
        assert!(ExtractionConfig::builder().language("  ").build().is_err());
    }

    #[test]
    fn method_order_is_preserved() {
        let config = ExtractionConfig::builder()
            .methods(vec![Method::TextLayer, Method::PdfiumTesseract])
            .build()
            .unwrap();
        assert_eq!(
            config.methods,
            vec![Method::TextLayer, Method::PdfiumTesseract]
        );
    }
}
