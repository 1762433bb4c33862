use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::evidence::EvidenceSet;
use crate::image::ImagePayload;

/// Which request shape the story collaborator receives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoryMode {
    /// Keywords only; the image payloads never leave the device.
    #[default]
    TagsOnly,
    /// Keywords plus the image payloads, for a multimodal prompt.
    WithImages,
}

/// One occupied slot's contribution to the story request.
#[derive(Clone, Debug)]
pub struct StoryEvidence {
    pub index: usize,
    pub tags: Vec<String>,
    pub image: ImagePayload,
}

/// The single aggregate request built from every occupied slot.
#[derive(Clone, Debug)]
pub struct StoryRequest {
    pub evidence: Vec<StoryEvidence>,
}

impl StoryRequest {
    /// Collects the occupied slots. Fails before any external call when
    /// there is no evidence at all, or when an occupied slot has not been
    /// analyzed yet. Checked against the live set, never a stale view.
    pub fn from_evidence(set: &EvidenceSet) -> Result<Self> {
        let mut evidence = Vec::new();
        for slot in set.occupied() {
            let Some(image) = slot.image.clone() else {
                continue;
            };
            let Some(tags) = slot.tags.clone() else {
                return Err(AppError::Validation(format!(
                    "slot {} has not been analyzed yet",
                    slot.index + 1
                )));
            };
            evidence.push(StoryEvidence {
                index: slot.index,
                tags,
                image,
            });
        }
        if evidence.is_empty() {
            return Err(AppError::Validation(
                "upload at least one image first".into(),
            ));
        }
        Ok(Self { evidence })
    }

    /// The `Evidence N: keyword, keyword, …` lines the prompt is built
    /// around, numbered in display order.
    pub fn keyword_lines(&self) -> String {
        self.evidence
            .iter()
            .enumerate()
            .map(|(position, item)| {
                let keywords = if item.tags.is_empty() {
                    "No keywords provided".to_string()
                } else {
                    item.tags.join(", ")
                };
                format!("Evidence {}: {}", position + 1, keywords)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Capability seam for the narrative collaborator.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate(&self, request: &StoryRequest) -> Result<String>;
}

/// Produces the one defense narrative for the current evidence. The text
/// comes back verbatim; empty content is a failure, not a story.
pub async fn synthesize(set: &EvidenceSet, generator: &dyn StoryGenerator) -> Result<String> {
    let request = StoryRequest::from_evidence(set)?;
    let story = generator.generate(&request).await?;
    let story = story.trim().to_string();
    if story.is_empty() {
        return Err(AppError::EmptyGeneration);
    }
    Ok(story)
}
