use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{VisionAnalyzer, VisionError, parse_scores};
use crate::scores::ImageScores;

/// Instruction sent with every assessment request. The model must answer
/// with a bare JSON object matching [`ImageScores`].
const ANALYSIS_PROMPT: &str = r#"Analyze this image for quality and provide scores from 1-100 for each criterion.
Return your analysis as a JSON object with this exact structure:

{
    "sharpness": {"score": <1-100>, "explanation": "<brief explanation>"},
    "lighting": {"score": <1-100>, "explanation": "<brief explanation>"},
    "composition": {"score": <1-100>, "explanation": "<brief explanation>"},
    "color": {"score": <1-100>, "explanation": "<brief explanation>"},
    "exposure": {"score": <1-100>, "explanation": "<brief explanation>"},
    "faces": {"score": <1-100>, "explanation": "<brief explanation>"} OR null if no faces present,
    "overall": {"score": <1-100>, "explanation": "<brief overall assessment>"}
}

Scoring criteria:
- sharpness: Focus and clarity of the image
- lighting: Quality and balance of lighting
- composition: Framing, rule of thirds, visual balance
- color: Color accuracy, white balance, saturation appropriateness
- exposure: Proper exposure, no blown highlights or crushed blacks
- faces: Quality of any faces (expression, focus, lighting on face). Set to null if no faces.
- overall: Weighted average considering all factors, with brief overall assessment

Keep explanations concise (1-2 sentences max). Return ONLY the JSON object, no additional text."#;

/// How much of an upstream error body is kept in error messages.
const API_ERROR_EXCERPT: usize = 500;

/// Connection settings for an OpenAI-compatible chat completions endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct VisionSettings {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    /// Output-length bound for the assessment response.
    pub max_tokens: u32,
}

/// [`VisionAnalyzer`] backed by an OpenAI-compatible vision model.
///
/// Holds a single reqwest client for its whole lifetime. No timeout is set
/// on assessment calls; model latency is bounded by `max_tokens` only.
pub struct OpenAiVision {
    client: reqwest::Client,
    settings: VisionSettings,
}

impl OpenAiVision {
    pub fn new(settings: VisionSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: [ContentPart<'a>; 2],
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrlPart<'a> },
}

#[derive(Serialize)]
struct ImageUrlPart<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl VisionAnalyzer for OpenAiVision {
    async fn analyze(&self, image_url: &str) -> Result<ImageScores, VisionError> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: [ChatMessage {
                role: "user",
                content: [
                    ContentPart::Text {
                        text: ANALYSIS_PROMPT,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrlPart { url: image_url },
                    },
                ],
            }],
            max_tokens: self.settings.max_tokens,
        };

        let endpoint = format!(
            "{}/chat/completions",
            self.settings.api_base.trim_end_matches('/')
        );
        debug!(model = %self.settings.model, image_url, "Requesting image assessment");
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| VisionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Api {
                status: status.as_u16(),
                message: body.chars().take(API_ERROR_EXCERPT).collect(),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| VisionError::Request(e.to_string()))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(VisionError::EmptyResponse)?;

        parse_scores(&content)
    }
}
