use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, ImageUrlArgs,
    },
};
use async_trait::async_trait;
use tokio::time::timeout;

use crate::error::{AppError, Result};
use crate::story::{StoryGenerator, StoryMode, StoryRequest};

use super::REQUEST_TIMEOUT;

const STORY_PREAMBLE: &str = "You are a defense attorney AI specializing in creating highly persuasive and contextually rich alibis. Your task is to craft a personal, first-person narrative that convincingly explains the user's presence at the locations suggested by the keywords. The story must be ordinary, routine, and avoid any implication of criminal intent. Use the keywords as natural, casual elements of the user's daily life or routine.";

const TAGS_ONLY_NOTE: &str =
    "Each piece of evidence is summarized by keywords only. Use only those words to infer the scenario.";

const WITH_IMAGES_NOTE: &str =
    "Each piece of evidence is an attached photograph summarized by keywords. Use both to infer the scenario.";

const STORY_CLOSING: &str = "Now craft the full narrative that ties everything together.";

/// Narrative collaborator: turns the evidence keywords into the first-person
/// defense story, optionally attaching the photographs themselves.
pub struct DefenseNarrator {
    client: Client<OpenAIConfig>,
    model: String,
    mode: StoryMode,
}

impl DefenseNarrator {
    pub fn new(client: Client<OpenAIConfig>, model: impl Into<String>, mode: StoryMode) -> Self {
        Self {
            client,
            model: model.into(),
            mode,
        }
    }

    fn prompt_for(&self, request: &StoryRequest) -> String {
        let evidence_note = match self.mode {
            StoryMode::TagsOnly => TAGS_ONLY_NOTE,
            StoryMode::WithImages => WITH_IMAGES_NOTE,
        };
        [
            STORY_PREAMBLE,
            evidence_note,
            &request.keyword_lines(),
            STORY_CLOSING,
        ]
        .join("\n\n")
    }

    fn message_for(&self, request: &StoryRequest) -> Result<ChatCompletionRequestUserMessage> {
        let message = match self.mode {
            StoryMode::TagsOnly => ChatCompletionRequestUserMessageArgs::default()
                .content(self.prompt_for(request))
                .build()?,
            StoryMode::WithImages => {
                let mut parts: Vec<ChatCompletionRequestUserMessageContentPart> =
                    vec![
                        ChatCompletionRequestMessageContentPartTextArgs::default()
                            .text(self.prompt_for(request))
                            .build()?
                            .into(),
                    ];
                for item in &request.evidence {
                    parts.push(
                        ChatCompletionRequestMessageContentPartImageArgs::default()
                            .image_url(ImageUrlArgs::default().url(item.image.as_str()).build()?)
                            .build()?
                            .into(),
                    );
                }
                ChatCompletionRequestUserMessageArgs::default()
                    .content(parts)
                    .build()?
            }
        };
        Ok(message)
    }
}

#[async_trait]
impl StoryGenerator for DefenseNarrator {
    async fn generate(&self, request: &StoryRequest) -> Result<String> {
        let message = self.message_for(request)?;
        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([message.into()])
            .max_tokens(500u32)
            .build()?;

        let response = timeout(REQUEST_TIMEOUT, self.client.chat().create(chat_request))
            .await
            .map_err(|_| AppError::Timeout)??;

        Ok(response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default())
    }
}
