use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
};
use async_trait::async_trait;
use serde_json::Value;
use tokio::time::timeout;

use crate::error::{AppError, Result};
use crate::verdict::Adjudicator;

use super::REQUEST_TIMEOUT;

/// Scoring collaborator: puts the police report and the defense story in
/// front of a deliberately generous judge persona and returns the structured
/// payload it answers with.
pub struct CourtJudge {
    client: Client<OpenAIConfig>,
    model: String,
}

impl CourtJudge {
    pub fn new(client: Client<OpenAIConfig>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

fn verdict_prompt(police_story: &str, defense_story: &str) -> String {
    format!(
        "You are a fair but generous judge AI. Given the police report and the player's defense story, estimate how believable the player's story is.\n\
         \n\
         Reward creativity, coherence, and persuasive detail from the player, even if it stretches plausibility slightly. Be less strict when the defense offers a vivid, consistent narrative that plausibly explains away conflicts with the police report. Only penalize heavily when the story is internally inconsistent or blatantly contradicted by the police report.\n\
         \n\
         Return a JSON object with:\n\
         - \"confidence\": number from 0 to 100 representing your belief that the player is telling the truth (bias toward higher scores when the story is creative and convincing).\n\
         - \"rationale\": a brief one-sentence justification (plain text) that highlights the most persuasive element.\n\
         \n\
         Police report:\n\
         {police_story}\n\
         \n\
         Player defense story:\n\
         {defense_story}\n\
         \n\
         Respond ONLY with JSON in this exact shape: {{\"confidence\": 75.5, \"rationale\": \"short reason here\"}}"
    )
}

#[async_trait]
impl Adjudicator for CourtJudge {
    async fn deliberate(&self, police_story: &str, defense_story: &str) -> Result<Value> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(verdict_prompt(police_story, defense_story))
            .build()?;
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([message.into()])
            .max_tokens(300u32)
            .response_format(ResponseFormat::JsonObject)
            .build()?;

        let response = timeout(REQUEST_TIMEOUT, self.client.chat().create(request))
            .await
            .map_err(|_| AppError::Timeout)??;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        Ok(serde_json::from_str(&content)?)
    }
}
