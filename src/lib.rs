pub mod ai;
pub mod analysis;
pub mod error;
pub mod evidence;
pub mod gallery;
pub mod image;
pub mod logging;
pub mod police;
pub mod session;
pub mod settings;
pub mod stage;
pub mod store;
pub mod story;
pub mod verdict;

// Re-export commonly used items for easier access
pub use analysis::{AnalysisOutcome, AnalysisReport, ImageAnalyzer, SlotOutcome, SlotReport};
pub use error::{AnalysisError, AppError, Result};
pub use evidence::{EvidenceSet, EvidenceSlot, SLOT_COUNT, TAG_TARGET};
pub use gallery::Gallery;
pub use image::ImagePayload;
pub use police::ReportSource;
pub use session::Session;
pub use settings::Settings;
pub use stage::Stage;
pub use store::EvidenceStore;
pub use story::{StoryGenerator, StoryMode, StoryRequest};
pub use verdict::{Adjudicator, CONFIDENCE_THRESHOLD, Verdict, VerdictReport};
