// AI collaborators backed by the OpenAI chat API.

pub mod analyst;
pub mod judge;
pub mod narrator;

use std::time::Duration;

use async_openai::{Client, config::OpenAIConfig};

use crate::error::{AppError, Result};
use crate::settings::Settings;

pub use analyst::VisionAnalyst;
pub use judge::CourtJudge;
pub use narrator::DefenseNarrator;

/// How long any single OpenAI call may run before it is abandoned.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds the shared OpenAI client from settings, failing fast when no API
/// key is configured.
pub fn client_from_settings(settings: &Settings) -> Result<Client<OpenAIConfig>> {
    let api_key = settings
        .openai_api_key
        .as_ref()
        .ok_or(AppError::MissingApiKey)?;
    let openai_config = OpenAIConfig::new().with_api_key(api_key);
    Ok(Client::with_config(openai_config))
}
