//! Logging setup.
//!
//! `LOG_LEVEL` takes EnvFilter directives, e.g. `debug` or
//! `info,session=debug,timer=debug`. `LOG_FORMAT=json` switches to structured
//! output; anything else gets the human-readable format.
//!
//! Targets in use: `quizapp_backend` (server lifecycle), `catalog`,
//! `session` (state machine transitions) and `timer` (countdowns).

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,session=debug,timer=info,catalog=info,quizapp_backend=debug,tower_http=info,axum=info";

fn env_filter() -> EnvFilter {
  EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn wants_json() -> bool {
  std::env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false)
}

pub fn init_tracing() {
  let fmt = tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_target(true)
    .with_line_number(true);

  if wants_json() {
    fmt.json().with_current_span(true).init();
  } else {
    fmt.compact().init();
  }
}
