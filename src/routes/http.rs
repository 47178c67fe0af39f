//! HTTP endpoint handlers. Thin wrappers over the catalog and the shared
//! leaderboard; each handler is instrumented and logs basic result info.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, Json, response::IntoResponse};
use chrono::Utc;
use tracing::{info, instrument};

use crate::catalog::QuizFilter;
use crate::domain::{format_duration, Difficulty, QuizId};
use crate::errors::ApiError;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { status: "OK", message: "Quiz App Server is running" })
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_quizzes(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuizListQuery>,
) -> Result<Json<ApiResponse<Vec<QuizSummaryOut>>>, ApiError> {
  let difficulty = match q.difficulty.as_deref().map(str::trim) {
    None | Some("") => None,
    Some(raw) => Some(raw.parse::<Difficulty>().map_err(ApiError::InvalidDifficulty)?),
  };
  let filter = QuizFilter { search: q.search, category: q.category, difficulty };
  let quizzes: Vec<QuizSummaryOut> = state
    .catalog
    .filter(&filter)
    .iter()
    .map(|quiz| QuizSummaryOut::from(quiz.as_ref()))
    .collect();
  info!(target: "catalog", count = quizzes.len(), "HTTP quiz list served");
  Ok(Json(ApiResponse::ok(quizzes)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(ApiResponse::ok(state.catalog.categories()))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Path(raw): Path<String>,
) -> Result<Json<ApiResponse<QuizOut>>, ApiError> {
  // Non-numeric ids cannot match any quiz.
  let id: QuizId = raw.parse().map_err(|_| ApiError::quiz_not_found(&raw))?;
  let quiz = state.catalog.find_quiz_by_id(id).ok_or_else(|| ApiError::quiz_not_found(id))?;
  info!(target: "catalog", id, title = %quiz.title, "HTTP quiz served");
  Ok(Json(ApiResponse::ok(QuizOut::from(quiz.as_ref()))))
}

/// Acknowledges a client-side result. Nothing is stored or re-scored here.
#[instrument(level = "info", skip(state, body), fields(quiz_id = body.quiz_id, score = body.score))]
pub async fn http_post_result(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ResultIn>,
) -> Result<Json<ApiResponse<SubmittedResultOut>>, ApiError> {
  if state.catalog.find_quiz_by_id(body.quiz_id).is_none() {
    return Err(ApiError::quiz_not_found(body.quiz_id));
  }
  let out = SubmittedResultOut {
    quiz_id: body.quiz_id,
    score: body.score.min(100),
    time_taken: body.time_taken,
    submitted_at: Utc::now(),
  };
  Ok(Json(ApiResponse::ok(out).with_message("Quiz result submitted successfully")))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_leaderboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let entries: Vec<LeaderboardEntryOut> = state
    .leaderboard()
    .await
    .into_iter()
    .enumerate()
    .map(|(i, r)| LeaderboardEntryOut {
      rank: i + 1,
      quiz_id: r.quiz_id,
      quiz_title: state.catalog.title_of(r.quiz_id).unwrap_or_else(|| "Unknown Quiz".into()),
      score: r.score,
      total_questions: r.total_questions,
      time_taken: r.time_taken,
      time_taken_label: format_duration(r.time_taken),
      date: r.date,
    })
    .collect();
  info!(target: "quizapp_backend", entries = entries.len(), "HTTP leaderboard served");
  Json(ApiResponse::ok(entries))
}

pub async fn http_not_found() -> ApiError {
  ApiError::RouteNotFound
}
