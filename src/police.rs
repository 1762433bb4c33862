use std::path::PathBuf;

use crate::error::Result;

/// Where the fixed police report comes from. The core never generates this
/// text; it ships with the game assets and is treated as read-only ground
/// truth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportSource {
    File(PathBuf),
    Url(String),
}

impl ReportSource {
    /// Treats anything that looks like http(s) as a URL, everything else as
    /// a file path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    /// Reads the full report text.
    pub async fn load(&self) -> Result<String> {
        let text = match self {
            Self::File(path) => tokio::fs::read_to_string(path).await?,
            Self::Url(url) => {
                reqwest::get(url)
                    .await?
                    .error_for_status()?
                    .text()
                    .await?
            }
        };
        Ok(text)
    }
}
