use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CONFIG_FILE: &str = "config.yaml";

/// Quiz-level options written into the assessment metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    pub description: String,
    pub shuffle_answers: bool,
    pub scoring_policy: String,
    pub quiz_type: String,
    pub allowed_attempts: i32,
    pub show_correct_answers: bool,
    pub one_question_at_a_time: bool,
    pub cant_go_back: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            description: String::new(),
            shuffle_answers: false,
            scoring_policy: "keep_highest".to_string(),
            quiz_type: "assignment".to_string(),
            allowed_attempts: 1,
            show_correct_answers: true,
            one_question_at_a_time: false,
            cant_go_back: false,
        }
    }
}

/// Partial [`QuizSettings`], as found in document frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_answers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_attempts: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_correct_answers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_question_at_a_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cant_go_back: Option<bool>,
}

impl QuizSettings {
    pub fn apply(&mut self, over: &SettingsOverride) {
        if let Some(ref v) = over.description {
            self.description = v.clone();
        }
        if let Some(v) = over.shuffle_answers {
            self.shuffle_answers = v;
        }
        if let Some(ref v) = over.scoring_policy {
            self.scoring_policy = v.clone();
        }
        if let Some(ref v) = over.quiz_type {
            self.quiz_type = v.clone();
        }
        if let Some(v) = over.allowed_attempts {
            self.allowed_attempts = v;
        }
        if let Some(v) = over.show_correct_answers {
            self.show_correct_answers = v;
        }
        if let Some(v) = over.one_question_at_a_time {
            self.one_question_at_a_time = v;
        }
        if let Some(v) = over.cant_go_back {
            self.cant_go_back = v;
        }
    }
}

/// Options that shape the generated package rather than the quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageOptions {
    /// Deflate level for archive entries (0-9).
    pub compression_level: i64,
    /// Render prompts and feedback through a markdown renderer instead of
    /// embedding them verbatim.
    pub render_markdown: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            compression_level: 6,
            render_markdown: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub quiz: QuizSettings,
    pub package: PackageOptions,
}

impl Config {
    /// Load configuration. An explicit path must exist; otherwise the
    /// per-user config file is used when present, defaults when not.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Config, String> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mdqti").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("quiz:\n  allowed_attempts: 3\n").unwrap();
        assert_eq!(config.quiz.allowed_attempts, 3);
        assert_eq!(config.quiz.scoring_policy, "keep_highest");
        assert_eq!(config.package.compression_level, 6);
    }

    #[test]
    fn override_only_touches_given_fields() {
        let mut settings = QuizSettings::default();
        settings.apply(&SettingsOverride {
            shuffle_answers: Some(true),
            ..Default::default()
        });
        assert!(settings.shuffle_answers);
        assert_eq!(settings.allowed_attempts, 1);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/mdqti.yaml"))).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
