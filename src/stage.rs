// stage.rs

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Analyzing,
    ReadyToGenerate,
    StoryReady,
    VerdictReady,
}
