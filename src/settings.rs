// Import necessary libraries for file I/O and serialization.
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};

use crate::story::StoryMode;

// Define a structure to hold application settings with serialization and
// deserialization capabilities.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    pub openai_api_key: Option<String>, // Optional API key for OpenAI services.
    pub model: String,
    pub story_mode: StoryMode,  // Which request shape the story collaborator receives.
    pub police_report: String,  // Path or URL of the fixed police report.
    pub debug_mode: bool,       // Flag to enable or disable debug mode.
}

// Implement the Default trait for Settings to provide a method to create default settings.
impl Default for Settings {
    fn default() -> Self {
        Settings {
            openai_api_key: None, // No API key by default.
            model: "gpt-4-turbo".to_string(),
            story_mode: StoryMode::default(),
            police_report: "./data/police_story.txt".to_string(),
            debug_mode: false, // Debug mode disabled by default.
        }
    }
}

// Additional implementation block for Settings.
impl Settings {
    // Constructor function to create new settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    // Load settings from a default file path.
    pub fn load() -> io::Result<Self> {
        Self::load_settings_from_file("./data/settings.json")
    }

    // Save current settings to a default file path.
    pub fn save(&self) -> io::Result<()> {
        fs::create_dir_all("./data")?; // Ensure the data directory exists.
        self.save_to_file("./data/settings.json")
    }

    // Load settings from a specified file path.
    pub fn load_settings_from_file(path: &str) -> io::Result<Self> {
        let data = fs::read_to_string(path)?; // Read settings from file.
        let settings = serde_json::from_str(&data)?; // Deserialize JSON data into settings.
        Ok(settings)
    }

    // Save current settings to a specified file path.
    pub fn save_to_file(&self, path: &str) -> io::Result<()> {
        let data = serde_json::to_string_pretty(self)?; // Serialize settings into pretty JSON format.
        if let Some(parent) = std::path::Path::new(path).parent() {
            fs::create_dir_all(parent)?; // Create the directory if it doesn't exist.
        }
        let mut file = fs::File::create(path)?; // Create or overwrite the file.
        file.write_all(data.as_bytes())?; // Write the serialized data to the file.
        Ok(())
    }
}
