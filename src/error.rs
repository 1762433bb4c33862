use thiserror::Error;

// Enum for handling application-level errors across the pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    Validation(String), // Rejected operation; state is left unchanged.

    #[error("missing input: {0}")]
    MissingInput(&'static str), // A required text was empty before any external call.

    #[error("the story generator returned empty content")]
    EmptyGeneration,

    #[error("adjudication failed: {0}")]
    AdjudicationFailed(String), // Transport or parse failure of the verdict call.

    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError), // Errors from the OpenAI API.

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error), // Errors related to data serialization.

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error), // Input/output errors.

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error), // Errors fetching the police report over HTTP.

    #[error("timeout occurred")]
    Timeout, // Error when an operation exceeds its allotted time.

    #[error("no OpenAI API key configured")]
    MissingApiKey,
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

// Per-slot analysis failures are kept in their own enum so a batch can
// report them slot by slot without aborting sibling requests.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("timeout occurred")]
    Timeout,

    #[error("no message found")]
    NoMessageFound, // The response carried no content where one was expected.

    #[error("failed to parse keywords: {0}")]
    KeywordParseError(String),
}
