use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::Mutex;

use crate::error::AnalysisError;
use crate::evidence::TAG_TARGET;
use crate::gallery::Gallery;
use crate::image::ImagePayload;

/// Capability seam for the vision collaborator: one image in, an ordered
/// sequence of short descriptive tags out.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn tags_for(&self, image: &ImagePayload) -> Result<Vec<String>, AnalysisError>;
}

/// What happened to one slot during a batch.
#[derive(Debug)]
pub enum SlotOutcome {
    /// The returned tags were appended to the slot.
    Tagged(Vec<String>),
    /// The collaborator failed for this slot; its tag state is unchanged and
    /// the slot stays eligible for the next batch.
    Failed(AnalysisError),
    /// The slot was replaced or cleared while the request was in flight, so
    /// the result was thrown away.
    Discarded,
}

#[derive(Debug)]
pub struct SlotReport {
    pub index: usize,
    pub outcome: SlotOutcome,
}

/// Aggregate result of one analysis batch.
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// No slot holds an image; the collaborator was never contacted.
    NothingToAnalyze,
    /// Every occupied slot already meets the tag target; zero requests
    /// were issued.
    AlreadyComplete,
    /// Requests went out; the report tells the story slot by slot.
    Completed(AnalysisReport),
}

#[derive(Debug)]
pub struct AnalysisReport {
    pub slots: Vec<SlotReport>,
}

impl AnalysisReport {
    pub fn succeeded(&self) -> usize {
        self.slots
            .iter()
            .filter(|report| matches!(report.outcome, SlotOutcome::Tagged(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.slots
            .iter()
            .filter(|report| matches!(report.outcome, SlotOutcome::Failed(_)))
            .count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.succeeded() == self.slots.len()
    }

    pub fn all_failed(&self) -> bool {
        self.failed() == self.slots.len()
    }

    pub fn is_partial(&self) -> bool {
        !self.all_succeeded() && !self.all_failed()
    }
}

/// Brings every occupied slot up to the tag target: one request per eligible
/// slot, all in flight at once, waiting for the whole batch to settle. A
/// per-slot failure never cancels or blocks the sibling requests.
///
/// The gallery lock is only held while snapshotting the work and while
/// merging results back, so slot edits stay possible mid-batch; the epoch
/// guard in [`Gallery`] throws away results those edits invalidated.
pub async fn analyze_all(
    gallery: &Arc<Mutex<Gallery>>,
    analyzer: &Arc<dyn ImageAnalyzer>,
) -> AnalysisOutcome {
    // Snapshot the eligible slots together with the epoch each request is
    // issued against.
    let pending: Vec<(usize, u64, ImagePayload)> = {
        let gallery = gallery.lock().await;
        let evidence = gallery.evidence();
        if evidence.occupied().next().is_none() {
            return AnalysisOutcome::NothingToAnalyze;
        }
        let pending: Vec<_> = evidence
            .occupied()
            .filter(|slot| slot.tag_count() < TAG_TARGET)
            .filter_map(|slot| {
                slot.image
                    .clone()
                    .map(|image| (slot.index, gallery.epoch(slot.index), image))
            })
            .collect();
        if pending.is_empty() {
            return AnalysisOutcome::AlreadyComplete;
        }
        pending
    };

    let requests = pending.into_iter().map(|(index, epoch, image)| {
        let analyzer = Arc::clone(analyzer);
        async move {
            let result = analyzer.tags_for(&image).await;
            (index, epoch, result)
        }
    });
    let settled = join_all(requests).await;

    let mut gallery = gallery.lock().await;
    let slots = settled
        .into_iter()
        .map(|(index, epoch, result)| {
            let outcome = match result {
                Ok(tags) => {
                    if gallery.apply_analysis(index, epoch, tags.clone()) {
                        SlotOutcome::Tagged(tags)
                    } else {
                        SlotOutcome::Discarded
                    }
                }
                Err(e) => {
                    log::warn!("analysis failed for slot {index}: {e}");
                    SlotOutcome::Failed(e)
                }
            };
            SlotReport { index, outcome }
        })
        .collect();

    AnalysisOutcome::Completed(AnalysisReport { slots })
}
