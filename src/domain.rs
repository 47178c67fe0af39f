//! Domain models: quizzes and questions from the catalog, plus the per-attempt
//! records (answers, progress, results) produced while playing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type QuizId = u32;
pub type QuestionId = u32;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl std::str::FromStr for Difficulty {
  type Err = String;

  /// Case-insensitive, matching the lowercase wire names.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "easy" => Ok(Difficulty::Easy),
      "medium" => Ok(Difficulty::Medium),
      "hard" => Ok(Difficulty::Hard),
      other => Err(other.to_string()),
    }
  }
}

/// One multiple-choice question. `correct_answer` indexes into `options`.
#[derive(Clone, Debug, PartialEq)]
pub struct Question {
  pub id: QuestionId,
  pub text: String,
  pub options: Vec<String>,
  pub correct_answer: usize,
  pub explanation: Option<String>,
}

impl Question {
  /// `None` means nothing was selected, which is never correct.
  pub fn is_correct(&self, selected: Option<usize>) -> bool {
    selected == Some(self.correct_answer)
  }
}

/// Immutable catalog entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Quiz {
  pub id: QuizId,
  pub title: String,
  pub description: String,
  pub difficulty: Difficulty,
  pub category: String,
  pub questions: Vec<Question>,
  pub time_per_question: u32, // seconds
  pub image: Option<String>,
}

impl Quiz {
  pub fn question_count(&self) -> usize { self.questions.len() }

  pub fn question(&self, index: usize) -> Option<&Question> { self.questions.get(index) }

  pub fn is_last_index(&self, index: usize) -> bool {
    index + 1 >= self.questions.len()
  }
}

/// A committed answer. Built by the question timer at commit time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
  pub question_id: QuestionId,
  pub selected_option: Option<usize>,
  pub is_correct: bool,
  pub time_taken: u32,
}

/// Mutable state of one attempt.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizProgress {
  pub current_question_index: usize,
  pub answers: Vec<UserAnswer>,
  pub start_time: DateTime<Utc>,
  pub is_completed: bool,
}

impl QuizProgress {
  pub fn new(start_time: DateTime<Utc>) -> Self {
    Self { current_question_index: 0, answers: Vec::new(), start_time, is_completed: false }
  }

  pub fn has_answered(&self, question_id: QuestionId) -> bool {
    self.answers.iter().any(|a| a.question_id == question_id)
  }
}

/// Snapshot of a completed attempt. Never mutated after creation.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
  pub quiz_id: QuizId,
  pub score: u8,
  pub total_questions: usize,
  pub time_taken: u64, // seconds
  pub answered_correctly: Vec<QuestionId>,
  pub answered_incorrectly: Vec<QuestionId>,
  pub date: DateTime<Utc>,
}

impl QuizResult {
  pub fn from_progress(quiz: &Quiz, progress: &QuizProgress, completed_at: DateTime<Utc>) -> Self {
    let (correct, incorrect): (Vec<&UserAnswer>, Vec<&UserAnswer>) =
      progress.answers.iter().partition(|a| a.is_correct);
    Self {
      quiz_id: quiz.id,
      score: score_percent(correct.len(), quiz.question_count()),
      total_questions: quiz.question_count(),
      time_taken: elapsed_seconds(progress.start_time, completed_at),
      answered_correctly: correct.iter().map(|a| a.question_id).collect(),
      answered_incorrectly: incorrect.iter().map(|a| a.question_id).collect(),
      date: completed_at,
    }
  }
}

/// `round(correct / total * 100)` with halves rounded up, in integer arithmetic.
/// Clamped to 100 and 0 for an empty quiz.
pub fn score_percent(correct: usize, total: usize) -> u8 {
  if total == 0 { return 0; }
  let correct = correct.min(total) as u64;
  let total = total as u64;
  ((200 * correct + total) / (2 * total)) as u8
}

/// Whole seconds between two instants, halves rounded up. A clock that went
/// backwards yields 0.
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
  let ms = (end - start).num_milliseconds();
  if ms <= 0 { 0 } else { ((ms as u64) + 500) / 1000 }
}

pub fn verdict(score: u8) -> &'static str {
  match score {
    90..=u8::MAX => "Excellent!",
    80..=89 => "Great job!",
    70..=79 => "Good work!",
    60..=69 => "Not bad!",
    40..=59 => "Keep practicing!",
    _ => "Try again!",
  }
}

/// "2m 5s" style duration used on result screens.
pub fn format_duration(seconds: u64) -> String {
  format!("{}m {}s", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  #[test]
  fn difficulty_parses_wire_names_case_insensitively() {
    assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
    assert_eq!("Medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
    assert!("extreme".parse::<Difficulty>().is_err());
  }

  #[test]
  fn score_matches_rounded_percentage() {
    assert_eq!(score_percent(5, 5), 100);
    assert_eq!(score_percent(2, 5), 40);
    assert_eq!(score_percent(0, 5), 0);
    assert_eq!(score_percent(1, 3), 33);
    assert_eq!(score_percent(2, 3), 67);
    // 12.5 and 62.5 round up
    assert_eq!(score_percent(1, 8), 13);
    assert_eq!(score_percent(5, 8), 63);
    assert_eq!(score_percent(0, 0), 0);
  }

  #[test]
  fn score_agrees_with_float_rounding_for_small_quizzes() {
    for total in 1..=40usize {
      for correct in 0..=total {
        let expected = ((correct * 100) as f64 / total as f64).round() as u8;
        assert_eq!(score_percent(correct, total), expected, "{correct}/{total}");
        assert!(score_percent(correct, total) <= 100);
      }
    }
  }

  #[test]
  fn elapsed_rounds_to_nearest_second() {
    let t0 = Utc::now();
    assert_eq!(elapsed_seconds(t0, t0 + Duration::milliseconds(1499)), 1);
    assert_eq!(elapsed_seconds(t0, t0 + Duration::milliseconds(1500)), 2);
    assert_eq!(elapsed_seconds(t0, t0 + Duration::seconds(42)), 42);
    assert_eq!(elapsed_seconds(t0, t0 - Duration::seconds(3)), 0);
  }

  #[test]
  fn unselected_option_is_never_correct() {
    let q = Question {
      id: 1,
      text: "?".into(),
      options: vec!["a".into(), "b".into()],
      correct_answer: 0,
      explanation: None,
    };
    assert!(!q.is_correct(None));
    assert!(q.is_correct(Some(0)));
    assert!(!q.is_correct(Some(1)));
  }

  #[test]
  fn verdicts_and_durations() {
    assert_eq!(verdict(100), "Excellent!");
    assert_eq!(verdict(85), "Great job!");
    assert_eq!(verdict(70), "Good work!");
    assert_eq!(verdict(60), "Not bad!");
    assert_eq!(verdict(40), "Keep practicing!");
    assert_eq!(verdict(39), "Try again!");
    assert_eq!(format_duration(125), "2m 5s");
    assert_eq!(format_duration(0), "0m 0s");
  }

  #[test]
  fn user_answer_serializes_camel_case_with_null_selection() {
    let a = UserAnswer { question_id: 3, selected_option: None, is_correct: false, time_taken: 30 };
    let v = serde_json::to_value(&a).unwrap();
    assert_eq!(v["questionId"], 3);
    assert!(v["selectedOption"].is_null());
    assert_eq!(v["isCorrect"], false);
    assert_eq!(v["timeTaken"], 30);
  }
}
