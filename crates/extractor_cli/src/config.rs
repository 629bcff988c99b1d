//! Optional RON settings file for defaults the flags don't override.

use std::fs;
use std::path::{Path, PathBuf};

use extractor_engine::DEFAULT_WORKERS;
use extractor_logging::extract_warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub output_dir: PathBuf,
    pub workers: usize,
    /// TLS certificate verification for the remote source. Turning this off
    /// is a deliberate trust decision, not a default.
    pub verify_certs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://novelhi.com/s/Dragon-Talisman".to_string(),
            output_dir: PathBuf::from("Extracted_Chapters"),
            workers: DEFAULT_WORKERS,
            verify_certs: true,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file is
    /// absent or unreadable. A malformed file is reported, not fatal.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Self::default();
            }
            Err(err) => {
                extract_warn!("Failed to read settings from {:?}: {}", path, err);
                return Self::default();
            }
        };

        match ron::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                extract_warn!("Failed to parse settings from {:?}: {}", path, err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use std::path::{Path, PathBuf};

    #[test]
    fn missing_file_yields_defaults() {
        let settings = Settings::load(Path::new("definitely_not_here.ron"));
        assert!(settings.verify_certs);
        assert_eq!(settings.workers, extractor_engine::DEFAULT_WORKERS);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("extractor.ron");
        std::fs::write(&path, "(workers: 4, output_dir: \"chapters\")").unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.workers, 4);
        assert_eq!(settings.output_dir, PathBuf::from("chapters"));
        assert!(settings.verify_certs);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("extractor.ron");
        std::fs::write(&path, "not ron at all {{{").unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.workers, extractor_engine::DEFAULT_WORKERS);
    }
}
