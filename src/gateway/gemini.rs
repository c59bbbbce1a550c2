// Gemini / Imagen REST client

use super::{
    preview_prompt, suggestion_prompt, GatewayError, PreviewRequest, StylingGateway,
    SuggestionRequest, IMAGE_ASPECT_RATIO, IMAGE_MIME_TYPE,
};
use crate::config::Config;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_ERROR_BODY: usize = 512;

/// Google generative language API client
pub struct GeminiClient {
    http: Client,
    api_key: SecretString,
    api_base: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(config: Config) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key,
            api_base: config.api_base,
            text_model: config.text_model,
            image_model: config.image_model,
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.api_base, model, method)
    }

    async fn post<B, R>(&self, url: String, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<R>().await?)
    }
}

impl StylingGateway for GeminiClient {
    async fn suggest_colors(&self, request: SuggestionRequest) -> Result<String, GatewayError> {
        let url = self.endpoint(&self.text_model, "generateContent");
        tracing::debug!(model = %self.text_model, event = %request.event_type, "requesting color suggestions");
        let body = suggestion_body(suggestion_prompt(&request));
        let response: GenerateContentResponse = self.post(url, &body).await?;
        candidate_text(response)
    }

    async fn render_preview(&self, request: PreviewRequest) -> Result<String, GatewayError> {
        let url = self.endpoint(&self.image_model, "predict");
        tracing::debug!(model = %self.image_model, event = %request.event_type, "requesting preview image");
        let body = preview_body(preview_prompt(&request));
        let response: PredictResponse = self.post(url, &body).await?;
        first_image(response)
    }
}

// generateContent wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

// predict wire types

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: &'static str,
    output_options: OutputOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
}

fn suggestion_body(prompt: String) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part { text: Some(prompt) }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: json!({
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "hex": { "type": "STRING" }
                    },
                    "required": ["name", "hex"]
                }
            }),
        },
    }
}

fn preview_body(prompt: String) -> PredictRequest {
    PredictRequest {
        instances: vec![PredictInstance { prompt }],
        parameters: PredictParameters {
            sample_count: 1,
            aspect_ratio: IMAGE_ASPECT_RATIO,
            output_options: OutputOptions {
                mime_type: IMAGE_MIME_TYPE,
            },
        },
    }
}

// Concatenates the text parts of the first candidate
fn candidate_text(response: GenerateContentResponse) -> Result<String, GatewayError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .map(|c| c.content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse("text"));
    }
    Ok(text)
}

fn first_image(response: PredictResponse) -> Result<String, GatewayError> {
    response
        .predictions
        .into_iter()
        .next()
        .and_then(|p| p.bytes_base64_encoded)
        .filter(|b| !b.is_empty())
        .ok_or(GatewayError::EmptyResponse("image"))
}
