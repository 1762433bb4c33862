use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use crate::analysis::{self, AnalysisOutcome, ImageAnalyzer};
use crate::error::{AppError, Result};
use crate::evidence::EvidenceSet;
use crate::gallery::Gallery;
use crate::image::ImagePayload;
use crate::police::ReportSource;
use crate::stage::Stage;
use crate::store::EvidenceStore;
use crate::story::{self, StoryGenerator};
use crate::verdict::{self, Adjudicator, VerdictReport};

/// One play-through: the gallery, the generated defense story, the verdict,
/// and the collaborators everything is resolved through.
///
/// The evidence survives restarts through the injected store; the story and
/// the verdict live only as long as the session object. The gallery sits
/// behind its own lock so slot edits stay possible while an analysis batch
/// is in flight.
pub struct Session {
    gallery: Arc<Mutex<Gallery>>,
    analyzer: Arc<dyn ImageAnalyzer>,
    narrator: Arc<dyn StoryGenerator>,
    judge: Arc<dyn Adjudicator>,
    analyzing: AtomicBool,
    police_source: ReportSource,
    police_story: Option<String>,
    story: Option<String>,
    verdict: Option<VerdictReport>,
}

impl Session {
    /// Loads the persisted evidence and wires up the collaborators.
    pub fn open(
        store: Arc<EvidenceStore>,
        analyzer: Arc<dyn ImageAnalyzer>,
        narrator: Arc<dyn StoryGenerator>,
        judge: Arc<dyn Adjudicator>,
        police_source: ReportSource,
    ) -> Self {
        Self {
            gallery: Arc::new(Mutex::new(Gallery::open(store))),
            analyzer,
            narrator,
            judge,
            analyzing: AtomicBool::new(false),
            police_source,
            police_story: None,
            story: None,
            verdict: None,
        }
    }

    /// A snapshot of the evidence as it stands right now.
    pub async fn evidence(&self) -> EvidenceSet {
        self.gallery.lock().await.evidence().clone()
    }

    pub async fn stage(&self) -> Stage {
        if self.verdict.is_some() {
            return Stage::VerdictReady;
        }
        if self.story.is_some() {
            return Stage::StoryReady;
        }
        if self.analyzing.load(Ordering::SeqCst) {
            return Stage::Analyzing;
        }
        if self.gallery.lock().await.evidence().ready_for_story() {
            return Stage::ReadyToGenerate;
        }
        Stage::Idle
    }

    // --- Slot edits, permitted in any stage, analysis in flight included.

    pub async fn set_image(&self, index: usize, payload: ImagePayload) -> Result<()> {
        self.gallery.lock().await.set_image(index, payload)
    }

    pub async fn clear_image(&self, index: usize) -> Result<()> {
        self.gallery.lock().await.clear_image(index)
    }

    pub async fn append_tags(&self, index: usize, tags: Vec<String>) -> Result<()> {
        self.gallery.lock().await.append_tags(index, tags)
    }

    pub async fn remove_tag(&self, index: usize, position: usize) -> Result<()> {
        self.gallery.lock().await.remove_tag(index, position)
    }

    // --- Pipeline steps.

    /// Runs one analysis batch over the evidence. A second call while one is
    /// outstanding is rejected, which also keeps every slot down to a single
    /// in-flight request at a time (a batch never issues two requests for
    /// the same slot).
    pub async fn analyze_evidence(&self) -> Result<AnalysisOutcome> {
        if self.analyzing.swap(true, Ordering::SeqCst) {
            return Err(AppError::Validation("analysis is already running".into()));
        }
        let outcome = analysis::analyze_all(&self.gallery, &self.analyzer).await;
        self.analyzing.store(false, Ordering::SeqCst);
        Ok(outcome)
    }

    /// Generates (or regenerates) the defense story. The guard that every
    /// occupied slot must be analyzed is re-checked here at call time; a
    /// violation is rejected before the collaborator is contacted.
    pub async fn generate_story(&mut self) -> Result<&str> {
        let evidence = self.evidence().await;
        let text = story::synthesize(&evidence, self.narrator.as_ref()).await?;
        Ok(self.story.insert(text).as_str())
    }

    /// The fixed police report, fetched once and cached for the session.
    pub async fn police_story(&mut self) -> Result<&str> {
        if self.police_story.is_none() {
            let text = self.police_source.load().await?;
            self.police_story = Some(text);
        }
        Ok(self.police_story.as_deref().unwrap_or_default())
    }

    /// Scores the current story against the police report. Requires the
    /// story step to have happened; replaces any earlier verdict outright.
    pub async fn request_verdict(&mut self) -> Result<&VerdictReport> {
        let Some(defense) = self.story.clone() else {
            return Err(AppError::MissingInput("defense story"));
        };
        let police = self.police_story().await?.to_string();
        let report = verdict::adjudicate(self.judge.as_ref(), &police, &defense).await?;
        Ok(self.verdict.insert(report))
    }

    pub fn story(&self) -> Option<&str> {
        self.story.as_deref()
    }

    pub fn verdict(&self) -> Option<&VerdictReport> {
        self.verdict.as_ref()
    }

    /// Wipes the evidence, in memory and in the store, together with the
    /// story and the verdict, returning the session to its initial state.
    pub async fn reset(&mut self) {
        self.gallery.lock().await.reset();
        self.story = None;
        self.verdict = None;
    }
}
