use std::time::Duration;

use base64::Engine;
use futures::future::BoxFuture;
use image::ImageFormat;
use reqwest::Client;
use serde::Deserialize;

use crate::models::label::ExtractedRecord;

/// Formats accepted for label photographs.
const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

const EXTRACTION_PROMPT: &str = concat!(
    "This image shows an alcohol beverage label. Read it and answer with a single JSON object ",
    "using exactly these keys:\n",
    "  \"brandName\": the brand name exactly as printed,\n",
    "  \"productType\": the class/type designation (e.g. \"Kentucky Straight Bourbon Whiskey\", ",
    "\"India Pale Ale\"),\n",
    "  \"alcoholContent\": the alcohol by volume percentage (the number only),\n",
    "  \"netContents\": the net contents with its unit (e.g. \"750 mL\", \"12 fl oz\"),\n",
    "  \"additionalInfo\": anything else relevant printed on the label,\n",
    "  \"confidence\": how sure you are of the reading, one of \"high\", \"medium\", \"low\".\n",
    "Copy text as it appears on the label. Use null for any field that is missing or unreadable."
);

/// An uploaded label photograph held in memory.
#[derive(Debug, Clone)]
pub struct LabelImage {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl LabelImage {
    /// Detects the format from the file's magic bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, UnsupportedImage> {
        let format = image::guess_format(&bytes).map_err(|_| UnsupportedImage)?;
        if !ALLOWED_FORMATS.contains(&format) {
            return Err(UnsupportedImage);
        }
        Ok(Self { bytes, format })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// `data:` URL with the base64-encoded image.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.to_mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Only image files are allowed")]
pub struct UnsupportedImage;

/// Reads the label fields off a photograph.
pub trait LabelExtractor: Send + Sync {
    fn extract<'a>(
        &'a self,
        image: &'a LabelImage,
    ) -> BoxFuture<'a, Result<ExtractedRecord, ExtractionError>>;
}

/// Client for an OpenAI-compatible vision chat-completions endpoint.
pub struct VisionClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl VisionClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ExtractionError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Send a label image to the vision model and parse the structured fields.
    pub async fn extract_label_fields(
        &self,
        image: &LabelImage,
    ) -> Result<ExtractedRecord, ExtractionError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": EXTRACTION_PROMPT },
                    { "type": "image_url", "image_url": { "url": image.to_data_url() } }
                ]
            }],
            "max_tokens": 1000,
            "temperature": 0.1
        });

        tracing::debug!(
            model = %self.model,
            format = ?image.format(),
            bytes = image.size_bytes(),
            "Requesting label extraction"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ExtractionError::EmptyResponse)?;

        parse_extraction(&content)
    }
}

impl LabelExtractor for VisionClient {
    fn extract<'a>(
        &'a self,
        image: &'a LabelImage,
    ) -> BoxFuture<'a, Result<ExtractedRecord, ExtractionError>> {
        Box::pin(self.extract_label_fields(image))
    }
}

/// Parses the JSON object embedded in a model reply. Models often wrap the
/// object in prose or a code fence, so everything from the first `{` to the
/// last `}` is taken.
pub fn parse_extraction(content: &str) -> Result<ExtractedRecord, ExtractionError> {
    let json = match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => return Err(ExtractionError::MissingJson),
    };
    Ok(serde_json::from_str(json)?)
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vision model returned no content")]
    EmptyResponse,

    #[error("Failed to extract JSON from the vision model response")]
    MissingJson,

    #[error("Failed to parse extracted label fields: {0}")]
    Parse(#[from] serde_json::Error),
}
