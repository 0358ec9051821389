use std::env;
use std::path::PathBuf;

use toeic_core::model::ExerciseKind;

pub const DEFAULT_HISTORY_DIR: &str = ".";
pub const DEFAULT_IMAGES_DIR: &str = "toeic_images";

/// Where history documents and scene images live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub history_dir: PathBuf,
    pub images_dir: PathBuf,
}

impl AppConfig {
    /// Read `TOEIC_HISTORY_DIR` and `TOEIC_IMAGES_DIR`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let dir = |var: &str, default: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map_or_else(|| PathBuf::from(default), PathBuf::from)
        };
        Self {
            history_dir: dir("TOEIC_HISTORY_DIR", DEFAULT_HISTORY_DIR),
            images_dir: dir("TOEIC_IMAGES_DIR", DEFAULT_IMAGES_DIR),
        }
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, history_dir: Option<PathBuf>, images_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = history_dir {
            self.history_dir = dir;
        }
        if let Some(dir) = images_dir {
            self.images_dir = dir;
        }
        self
    }

    pub fn history_path(&self, kind: ExerciseKind) -> PathBuf {
        self.history_dir.join(kind.history_file_name())
    }
}
