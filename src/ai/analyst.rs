use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ImageUrlArgs, ResponseFormat,
    },
};
use async_trait::async_trait;
use tokio::time::timeout;

use crate::analysis::ImageAnalyzer;
use crate::error::AnalysisError;
use crate::image::ImagePayload;

use super::REQUEST_TIMEOUT;

const ANALYSIS_PROMPT: &str = "Analyze this image and provide exactly 5 short, descriptive keywords. Format your response as a JSON object with a single key 'keywords' containing an array of 5 strings. Example: {\"keywords\": [\"word1\", \"word2\", \"word3\", \"word4\", \"word5\"]}";

/// Vision collaborator: sends one image to the chat endpoint and decodes the
/// keyword object it answers with.
pub struct VisionAnalyst {
    client: Client<OpenAIConfig>,
    model: String,
}

impl VisionAnalyst {
    pub fn new(client: Client<OpenAIConfig>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ImageAnalyzer for VisionAnalyst {
    async fn tags_for(&self, image: &ImagePayload) -> Result<Vec<String>, AnalysisError> {
        // Shrink the upload first; analysis needs the content, not the
        // original resolution. When compression fails the original payload
        // goes out instead.
        let payload = match image.compressed() {
            Ok(compressed) => compressed,
            Err(e) => {
                log::warn!("image compression failed, sending original: {e}");
                image.clone()
            }
        };

        let text = ChatCompletionRequestMessageContentPartTextArgs::default()
            .text(ANALYSIS_PROMPT)
            .build()?;
        let image_part = ChatCompletionRequestMessageContentPartImageArgs::default()
            .image_url(ImageUrlArgs::default().url(payload.as_str()).build()?)
            .build()?;
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(vec![text.into(), image_part.into()])
            .build()?;
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([message.into()])
            .max_tokens(100u32)
            .response_format(ResponseFormat::JsonObject)
            .build()?;

        let response = timeout(REQUEST_TIMEOUT, self.client.chat().create(request))
            .await
            .map_err(|_| AnalysisError::Timeout)??;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(AnalysisError::NoMessageFound)?;

        parse_keywords(&content)
    }
}

fn parse_keywords(content: &str) -> Result<Vec<String>, AnalysisError> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| AnalysisError::KeywordParseError(e.to_string()))?;
    let keywords = value
        .get("keywords")
        .and_then(|keywords| keywords.as_array())
        .ok_or_else(|| AnalysisError::KeywordParseError("missing 'keywords' array".to_string()))?;
    Ok(keywords
        .iter()
        .filter_map(|keyword| keyword.as_str())
        .map(str::to_string)
        .collect())
}
