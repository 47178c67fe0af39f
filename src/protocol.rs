//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Correct answers never leave the server before a question is committed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{format_duration, verdict, Difficulty, Question, Quiz, QuizId, QuizResult, QuestionId, UserAnswer};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    SelectQuiz {
        #[serde(rename = "quizId")]
        quiz_id: QuizId,
    },
    StartQuiz,
    SelectOption {
        option: usize,
    },
    SubmitAnswer,
    NextQuestion,
    CompleteQuiz,
    ResetQuiz,
    CurrentQuestion,
    QuizResult,
}

impl ClientWsMessage {
    pub fn name(&self) -> &'static str {
        match self {
            ClientWsMessage::Ping => "ping",
            ClientWsMessage::SelectQuiz { .. } => "select_quiz",
            ClientWsMessage::StartQuiz => "start_quiz",
            ClientWsMessage::SelectOption { .. } => "select_option",
            ClientWsMessage::SubmitAnswer => "submit_answer",
            ClientWsMessage::NextQuestion => "next_question",
            ClientWsMessage::CompleteQuiz => "complete_quiz",
            ClientWsMessage::ResetQuiz => "reset_quiz",
            ClientWsMessage::CurrentQuestion => "current_question",
            ClientWsMessage::QuizResult => "quiz_result",
        }
    }
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    QuizSelected {
        quiz: QuizSummaryOut,
    },
    Question {
        index: usize,
        total: usize,
        #[serde(rename = "timeLimit")]
        time_limit: u32,
        question: QuestionOut,
    },
    OptionSelected {
        option: usize,
    },
    TimerTick {
        #[serde(rename = "questionId")]
        question_id: QuestionId,
        #[serde(rename = "remainingSeconds")]
        remaining_seconds: u32,
        #[serde(rename = "elapsedSeconds")]
        elapsed_seconds: u32,
        #[serde(rename = "totalSeconds")]
        total_seconds: u32,
    },
    AnswerCommitted {
        answer: UserAnswer,
        #[serde(rename = "correctAnswer")]
        correct_answer: usize,
        explanation: Option<String>,
        #[serde(rename = "timedOut")]
        timed_out: bool,
    },
    Result {
        result: QuizResult,
        verdict: String,
        #[serde(rename = "timeTakenLabel")]
        time_taken_label: String,
    },
    NoQuestion,
    NoResult,
    Reset,
    /// A recognised intent that the current state does not accept.
    Ignored {
        action: String,
        state: String,
    },
    Error {
        message: String,
    },
}

impl ServerWsMessage {
    pub fn result(result: &QuizResult) -> Self {
        ServerWsMessage::Result {
            result: result.clone(),
            verdict: verdict(result.score).to_string(),
            time_taken_label: format_duration(result.time_taken),
        }
    }
}

/// Catalog card: everything but the questions.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummaryOut {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub time_per_question: u32,
    pub question_count: usize,
    pub image: Option<String>,
}

impl From<&Quiz> for QuizSummaryOut {
    fn from(q: &Quiz) -> Self {
        Self {
            id: q.id,
            title: q.title.clone(),
            description: q.description.clone(),
            difficulty: q.difficulty,
            category: q.category.clone(),
            time_per_question: q.time_per_question,
            question_count: q.question_count(),
            image: q.image.clone(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct QuestionOut {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
}

impl From<&Question> for QuestionOut {
    fn from(q: &Question) -> Self {
        Self { id: q.id, text: q.text.clone(), options: q.options.clone() }
    }
}

#[derive(Debug, Serialize)]
pub struct QuizOut {
    #[serde(flatten)]
    pub summary: QuizSummaryOut,
    pub questions: Vec<QuestionOut>,
}

impl From<&Quiz> for QuizOut {
    fn from(q: &Quiz) -> Self {
        Self { summary: q.into(), questions: q.questions.iter().map(QuestionOut::from).collect() }
    }
}

//
// HTTP request/response DTOs
//

/// `{ success, data, message }` envelope used by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub success: bool,
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuizListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    /// Raw query value; empty means "any difficulty".
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResultIn {
    #[serde(rename = "quizId")]
    pub quiz_id: QuizId,
    pub score: u8,
    #[serde(rename = "timeTaken")]
    pub time_taken: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedResultOut {
    pub quiz_id: QuizId,
    pub score: u8,
    pub time_taken: u64,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryOut {
    pub rank: usize,
    pub quiz_id: QuizId,
    pub quiz_title: String,
    pub score: u8,
    pub total_questions: usize,
    pub time_taken: u64,
    pub time_taken_label: String,
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_use_snake_case_tags() {
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"select_quiz","quizId":3}"#).unwrap();
        assert!(matches!(m, ClientWsMessage::SelectQuiz { quiz_id: 3 }));
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"select_option","option":2}"#).unwrap();
        assert!(matches!(m, ClientWsMessage::SelectOption { option: 2 }));
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"submit_answer"}"#).unwrap();
        assert_eq!(m.name(), "submit_answer");
        assert!(serde_json::from_str::<ClientWsMessage>(r#"{"type":"launch_rockets"}"#).is_err());
    }

    #[test]
    fn question_payload_hides_the_answer() {
        let q = Question {
            id: 1,
            text: "?".into(),
            options: vec!["a".into(), "b".into()],
            correct_answer: 1,
            explanation: Some("because".into()),
        };
        let v = serde_json::to_value(ServerWsMessage::Question {
            index: 0,
            total: 5,
            time_limit: 30,
            question: (&q).into(),
        })
        .unwrap();
        assert_eq!(v["type"], "question");
        assert_eq!(v["timeLimit"], 30);
        assert!(v["question"].get("correctAnswer").is_none());
        assert!(v["question"].get("correct_answer").is_none());
        assert!(v["question"].get("explanation").is_none());
    }

    #[test]
    fn envelope_skips_missing_fields() {
        let v = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(v, serde_json::json!({ "success": true, "data": [1, 2] }));
        let v = serde_json::to_value(ApiResponse::ok(()).with_message("done")).unwrap();
        assert_eq!(v["message"], "done");
    }
}
