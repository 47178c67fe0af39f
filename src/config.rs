//! Loading server configuration (settings + optional extra quizzes) from TOML.
//!
//! See `AppConfig`, `Settings` and `QuizCfg` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Difficulty, Question, Quiz, QuizId, QuestionId};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub settings: Settings,
  #[serde(default)]
  pub quizzes: Vec<QuizCfg>,
}

/// Runtime knobs for the play driver and the leaderboard.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
  /// How long a committed answer stays on screen before the attempt
  /// advances on its own. 0 disables auto-advance.
  #[serde(default = "default_reveal_delay_ms")]
  pub reveal_delay_ms: u64,
  #[serde(default = "default_leaderboard_limit")]
  pub leaderboard_limit: usize,
}

fn default_reveal_delay_ms() -> u64 { 2000 }
fn default_leaderboard_limit() -> usize { 50 }

impl Default for Settings {
  fn default() -> Self {
    Self {
      reveal_delay_ms: default_reveal_delay_ms(),
      leaderboard_limit: default_leaderboard_limit(),
    }
  }
}

/// Quiz entry accepted in TOML configuration. Validated by the catalog before use.
#[derive(Clone, Debug, Deserialize)]
pub struct QuizCfg {
  pub id: QuizId,
  pub title: String,
  #[serde(default)] pub description: String,
  pub difficulty: Difficulty,
  pub category: String,
  pub time_per_question: u32,
  #[serde(default)] pub image: Option<String>,
  #[serde(default)] pub questions: Vec<QuestionCfg>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  pub id: QuestionId,
  pub text: String,
  pub options: Vec<String>,
  pub correct_answer: usize,
  #[serde(default)] pub explanation: Option<String>,
}

impl QuizCfg {
  pub fn to_quiz(&self) -> Quiz {
    Quiz {
      id: self.id,
      title: self.title.clone(),
      description: self.description.clone(),
      difficulty: self.difficulty,
      category: self.category.clone(),
      time_per_question: self.time_per_question,
      image: self.image.clone(),
      questions: self
        .questions
        .iter()
        .map(|q| Question {
          id: q.id,
          text: q.text.clone(),
          options: q.options.clone(),
          correct_answer: q.correct_answer,
          explanation: q.explanation.clone(),
        })
        .collect(),
    }
  }
}

pub fn parse_config(raw: &str) -> Result<AppConfig, toml::de::Error> {
  toml::from_str::<AppConfig>(raw)
}

/// Attempt to load `AppConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "quizapp_backend", %path, quizzes = cfg.quizzes.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quizapp_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quizapp_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_uses_defaults() {
    let cfg = parse_config("").unwrap();
    assert_eq!(cfg.settings.reveal_delay_ms, 2000);
    assert_eq!(cfg.settings.leaderboard_limit, 50);
    assert!(cfg.quizzes.is_empty());
  }

  #[test]
  fn parses_settings_and_quizzes() {
    let raw = r#"
[settings]
reveal_delay_ms = 0

[[quizzes]]
id = 10
title = "Rust Basics"
description = "Ownership and friends."
difficulty = "medium"
category = "Programming"
time_per_question = 20

[[quizzes.questions]]
id = 1
text = "Which keyword declares a mutable binding?"
options = ["let mut", "var", "mut let"]
correct_answer = 0
"#;
    let cfg = parse_config(raw).unwrap();
    assert_eq!(cfg.settings.reveal_delay_ms, 0);
    assert_eq!(cfg.settings.leaderboard_limit, 50);

    let quiz = cfg.quizzes[0].to_quiz();
    assert_eq!(quiz.id, 10);
    assert_eq!(quiz.difficulty, Difficulty::Medium);
    assert_eq!(quiz.question_count(), 1);
    assert_eq!(quiz.questions[0].options.len(), 3);
    assert_eq!(quiz.questions[0].explanation, None);
  }

  #[test]
  fn unknown_difficulty_is_a_parse_error() {
    let raw = r#"
[[quizzes]]
id = 1
title = "x"
difficulty = "legendary"
category = "y"
time_per_question = 5
"#;
    assert!(parse_config(raw).is_err());
  }
}
