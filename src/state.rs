//! Application state shared by every handler: the quiz catalog, runtime
//! settings and the in-memory leaderboard of completed results.
//!
//! Per-attempt session state is not kept here; each WebSocket connection owns
//! its own `PlayDriver`. Completed results are published into `leaderboard`,
//! which only ever holds the best `leaderboard_limit` of them. Nothing is
//! persisted.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::catalog::Catalog;
use crate::config::{load_config_from_env, AppConfig, Settings};
use crate::domain::QuizResult;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub settings: Settings,
    /// Best results first; ties keep completion order. Never longer than the limit.
    pub leaderboard: Arc<RwLock<Vec<QuizResult>>>,
}

impl AppState {
    /// Build state from env: load config, then the catalog on top of the seeds.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        Self::from_config(load_config_from_env())
    }

    pub fn from_config(cfg: Option<AppConfig>) -> Self {
        let catalog = Catalog::from_config(cfg.as_ref());
        let settings = cfg.map(|c| c.settings).unwrap_or_default();
        info!(
            target: "quizapp_backend",
            quizzes = catalog.all().len(),
            reveal_delay_ms = settings.reveal_delay_ms,
            leaderboard_limit = settings.leaderboard_limit,
            "Application state ready"
        );
        Self {
            catalog: Arc::new(catalog),
            settings,
            leaderboard: Arc::new(RwLock::new(Vec::new())),
        }
    }

    #[instrument(level = "debug", skip(self, result), fields(quiz_id = result.quiz_id, score = result.score))]
    pub async fn record_result(&self, result: QuizResult) {
        let mut board = self.leaderboard.write().await;
        let at = board.partition_point(|r| r.score >= result.score);
        if at >= self.settings.leaderboard_limit {
            return;
        }
        board.insert(at, result);
        board.truncate(self.settings.leaderboard_limit);
    }

    pub async fn leaderboard(&self) -> Vec<QuizResult> {
        self.leaderboard.read().await.clone()
    }
}
