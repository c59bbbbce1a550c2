// Generative AI gateway: prompt construction, request types and the service seam

mod gemini;

pub use gemini::GeminiClient;

use crate::types::{ColorSuggestion, DressCombination, EventType, Role};
use std::future::Future;
use thiserror::Error;

/// Number of complementary colors asked of the text model
pub const SUGGESTION_COUNT: usize = 5;
pub const IMAGE_ASPECT_RATIO: &str = "3:4";
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),
    #[error("service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("service returned no {0}")]
    EmptyResponse(&'static str),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else {
            GatewayError::Network(e.to_string())
        }
    }
}

/// Inputs for a complementary color request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub input_color: String,
    pub person_wearing_color: Role,
    pub event_type: EventType,
}

/// Inputs for a preview image request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub bride_color: String,
    pub groom_color: String,
    pub event_type: EventType,
    pub dress_code: DressCombination,
}

/// The two remote operations the stylist depends on.
///
/// `suggest_colors` resolves to the model's raw JSON text, left undecoded;
/// `render_preview` resolves to base64-encoded JPEG bytes.
pub trait StylingGateway: Send + Sync + 'static {
    fn suggest_colors(
        &self,
        request: SuggestionRequest,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;

    fn render_preview(
        &self,
        request: PreviewRequest,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;
}

pub fn suggestion_prompt(request: &SuggestionRequest) -> String {
    let event = request.event_type;
    let wearer = request.person_wearing_color;
    let other = wearer.other();
    format!(
        "You are an expert Pakistani wedding fashion consultant. \
         Your task is to suggest complementary colors for a wedding outfit.\n\n\
         Wedding Event: {event}\n\
         The {wearer}'s outfit color is: {color}.\n\n\
         Based on this, suggest {count} complementary colors for the {other}'s outfit. \
         The colors should be suitable for a traditional and elegant Pakistani {event} ceremony. \
         The suggestions should be sophisticated and fashionable.\n\n\
         Return the result as a JSON array of objects, where each object has a 'name' \
         (e.g., \"Dusty Rose\") and a 'hex' (e.g., \"#DCAE96\") code. Only return the JSON array.",
        color = request.input_color.trim(),
        count = SUGGESTION_COUNT,
    )
}

pub fn preview_prompt(request: &PreviewRequest) -> String {
    let event = request.event_type;
    format!(
        "Generate a photorealistic, high-fashion image of a Pakistani couple at their {event} \
         wedding ceremony. The scene should be elegant and opulent, reflecting traditional \
         Pakistani wedding decor.\n\n\
         - Bride's Attire: She is wearing a beautiful {bride_dress} in a stunning {bride_color} \
         color, with intricate golden and silver embroidery.\n\
         - Groom's Attire: He is wearing a handsome {groom_dress} in a complementary \
         {groom_color} color.\n\
         - Setting: A lavishly decorated Pakistani wedding venue suitable for a {event}, \
         with flowers and soft lighting.\n\
         - Style: The image should be of editorial quality, well-lit, with a focus on the \
         couple's outfits. They should be looking happy and elegant. Do not show any text or \
         watermarks. The couple should be of South Asian descent.",
        bride_dress = request.dress_code.bride,
        bride_color = request.bride_color,
        groom_dress = request.dress_code.groom,
        groom_color = request.groom_color,
    )
}

/// Decodes the text model's JSON array into suggestions.
///
/// The service is not trusted to honor the schema: fenced output is
/// tolerated, anything else that is not a non-empty `[{name, hex}]` fails.
pub fn decode_suggestions(raw: &str) -> Result<Vec<ColorSuggestion>, GatewayError> {
    let body = strip_code_fence(raw.trim());
    let suggestions: Vec<ColorSuggestion> =
        serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
    if suggestions.is_empty() {
        return Err(GatewayError::EmptyResponse("color suggestions"));
    }
    Ok(suggestions)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
