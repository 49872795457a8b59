//! Vision-model OCR via a local Ollama server.
//!
//! The deep-learning counterpart to tesseract: rasterised pages go to a
//! vision model (llava by default) with a transcription prompt, and the
//! model's response text is taken as the page text. No streaming — one
//! request per page, matching the strictly sequential page loop.

use crate::error::MethodError;
use crate::pipeline::{encode, postprocess};
use image::DynamicImage;
use serde_json::{json, Value};
use tracing::debug;

/// Client for one extraction run; holds the reqwest connection pool.
pub struct VisionClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    language: String,
}

impl VisionClient {
    pub fn new(base_url: &str, model: &str, language: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            language: language.to_string(),
        }
    }

    /// Transcribe one rasterised page.
    pub async fn transcribe(
        &self,
        img: &DynamicImage,
        page_num: usize,
    ) -> Result<String, MethodError> {
        let image_base64 = encode::png_base64(img).map_err(|e| MethodError::Ocr {
            page: page_num,
            detail: format!("PNG encoding failed: {e}"),
        })?;

        let url = format!("{}/api/generate", self.base_url);
        let body = build_request(&self.model, &self.language, &image_base64);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MethodError::Api {
                detail: format!("request to {url} failed: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MethodError::Api {
                detail: format!("{url} returned {status}: {body}"),
            });
        }

        let result: Value = response.json().await.map_err(|e| MethodError::Api {
            detail: format!("invalid JSON response: {e}"),
        })?;

        let text = result["response"].as_str().unwrap_or("").to_string();
        debug!("Vision page {} → {} chars", page_num, text.chars().count());
        Ok(postprocess::clean_ocr_text(&text))
    }
}

/// Build the Ollama `/api/generate` request body.
fn build_request(model: &str, language: &str, image_base64: &str) -> Value {
    json!({
        "model": model,
        "prompt": transcription_prompt(language),
        "images": [image_base64],
        "stream": false,
    })
}

/// The fixed transcription prompt, with a language hint when one is known.
fn transcription_prompt(language: &str) -> String {
    let hint = match language_name(language) {
        Some(name) => format!(" The text is in {name}."),
        None => String::new(),
    };
    format!(
        "Extract all text from this image exactly as written.{hint} \
         Return only the extracted text, nothing else."
    )
}

/// Map a tesseract ISO 639-2 code to an English language name for the prompt.
fn language_name(code: &str) -> Option<&'static str> {
    match code {
        "eng" => Some("English"),
        "deu" => Some("German"),
        "fra" => Some("French"),
        "spa" => Some("Spanish"),
        "ita" => Some("Italian"),
        "por" => Some("Portuguese"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_model_prompt_and_image() {
        let body = build_request("llava", "eng", "aGVsbG8=");
        assert_eq!(body["model"], "llava");
        assert_eq!(body["stream"], false);
        assert_eq!(body["images"][0], "aGVsbG8=");
        let prompt = body["prompt"].as_str().unwrap();
        assert!(prompt.contains("English"));
        assert!(prompt.contains("exactly as written"));
    }

    #[test]
    fn unknown_language_omits_hint() {
        let prompt = transcription_prompt("chi_sim");
        assert!(!prompt.contains("The text is in"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let c = VisionClient::new("http://localhost:11434/", "llava", "eng");
        assert_eq!(c.base_url, "http://localhost:11434");
    }
}
