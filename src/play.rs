//! Drives one quiz attempt for one connected client.
//!
//! The driver sits between the transport and the core: it turns client intents
//! into session commands, keeps exactly one question timer alive for the
//! current question, records timer commits, and schedules the advance that
//! follows a committed answer once the reveal delay has passed.
//!
//! Every timer and every scheduled advance carries the ticket that was current
//! when it was created. Any intent that changes the current question bumps the
//! ticket, so late events from an abandoned question are dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::domain::UserAnswer;
use crate::protocol::{ClientWsMessage, QuestionOut, QuizSummaryOut, ServerWsMessage};
use crate::session::QuizSession;
use crate::state::AppState;
use crate::timer::{QuestionTimer, TimerEvent, TimerHandle, TICK};

pub struct PlayDriver {
    state: Arc<AppState>,
    session: QuizSession,
    timer: Option<TimerHandle>,
    ticket: u64,
    tick: Duration,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
    advance_tx: mpsc::UnboundedSender<u64>,
}

impl PlayDriver {
    pub fn new(
        state: Arc<AppState>,
        timer_tx: mpsc::UnboundedSender<TimerEvent>,
        advance_tx: mpsc::UnboundedSender<u64>,
    ) -> Self {
        Self {
            state,
            session: QuizSession::default(),
            timer: None,
            ticket: 0,
            tick: TICK,
            timer_tx,
            advance_tx,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    fn ignored(&self, action: &str) -> Vec<ServerWsMessage> {
        debug!(target: "session", action, state = self.session.state().name(), "Intent ignored");
        vec![ServerWsMessage::Ignored {
            action: action.to_string(),
            state: self.session.state().name().to_string(),
        }]
    }

    #[instrument(level = "info", skip(self), fields(action = msg.name(), ticket = self.ticket))]
    pub async fn handle_client(&mut self, msg: ClientWsMessage) -> Vec<ServerWsMessage> {
        match msg {
            ClientWsMessage::Ping => vec![ServerWsMessage::Pong],

            ClientWsMessage::SelectQuiz { quiz_id } => {
                let Some(quiz) = self.state.catalog.find_quiz_by_id(quiz_id) else {
                    warn!(target: "session", quiz_id, "Quiz not found");
                    return vec![ServerWsMessage::Error { message: "Quiz not found".into() }];
                };
                self.stop_timer().await;
                let summary = QuizSummaryOut::from(quiz.as_ref());
                self.session.select_quiz(quiz);
                vec![ServerWsMessage::QuizSelected { quiz: summary }]
            }

            ClientWsMessage::StartQuiz => {
                if !self.session.start_quiz() {
                    return self.ignored("start_quiz");
                }
                vec![self.present_current().await]
            }

            ClientWsMessage::SelectOption { option } => {
                let selected = match &self.timer {
                    Some(timer) => timer.select(option).await,
                    None => false,
                };
                if !selected {
                    return self.ignored("select_option");
                }
                vec![ServerWsMessage::OptionSelected { option }]
            }

            ClientWsMessage::SubmitAnswer => {
                let answer = match &self.timer {
                    Some(timer) => timer.submit().await,
                    None => None,
                };
                match answer {
                    Some(answer) => self.commit(answer, false),
                    None => self.ignored("submit_answer"),
                }
            }

            ClientWsMessage::NextQuestion => {
                if !self.session.next_question() {
                    return self.ignored("next_question");
                }
                vec![self.present_current().await]
            }

            ClientWsMessage::CompleteQuiz => self.complete().await,

            ClientWsMessage::ResetQuiz => {
                self.stop_timer().await;
                self.session.reset_quiz();
                vec![ServerWsMessage::Reset]
            }

            ClientWsMessage::CurrentQuestion => match self.question_message() {
                Some(m) => vec![m],
                None => vec![ServerWsMessage::NoQuestion],
            },

            ClientWsMessage::QuizResult => match self.session.quiz_result() {
                Some(r) => vec![ServerWsMessage::result(r)],
                None => vec![ServerWsMessage::NoResult],
            },
        }
    }

    pub fn handle_timer(&mut self, ev: TimerEvent) -> Vec<ServerWsMessage> {
        if ev.ticket() != self.ticket {
            debug!(target: "timer", ticket = ev.ticket(), current = self.ticket, "Dropping stale timer event");
            return vec![];
        }
        match ev {
            TimerEvent::Tick { question_id, remaining, elapsed, total, .. } => vec![ServerWsMessage::TimerTick {
                question_id,
                remaining_seconds: remaining,
                elapsed_seconds: elapsed,
                total_seconds: total,
            }],
            TimerEvent::Expired { answer, .. } => {
                self.timer = None;
                self.commit(answer, true)
            }
        }
    }

    /// Advance-or-complete after the reveal delay of a committed answer.
    pub async fn handle_advance(&mut self, ticket: u64) -> Vec<ServerWsMessage> {
        if ticket != self.ticket {
            debug!(target: "session", ticket, current = self.ticket, "Dropping stale advance");
            return vec![];
        }
        let is_last = match (self.session.state().quiz(), self.session.current_question()) {
            (Some(quiz), Some(cur)) => quiz.is_last_index(cur.index),
            _ => return vec![],
        };
        if is_last {
            self.complete().await
        } else {
            self.session.next_question();
            vec![self.present_current().await]
        }
    }

    /// Cancel whatever is still running. Called when the client goes away.
    pub async fn shutdown(&mut self) {
        self.stop_timer().await;
    }

    async fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel().await;
        }
        self.ticket += 1;
    }

    fn question_message(&self) -> Option<ServerWsMessage> {
        let quiz = self.session.state().quiz()?;
        let cur = self.session.current_question()?;
        Some(ServerWsMessage::Question {
            index: cur.index,
            total: quiz.question_count(),
            time_limit: quiz.time_per_question,
            question: QuestionOut::from(cur.question),
        })
    }

    /// Start a fresh timer for the current question and describe it.
    async fn present_current(&mut self) -> ServerWsMessage {
        self.stop_timer().await;
        let timer = match (self.session.state().quiz(), self.session.current_question()) {
            (Some(quiz), Some(cur)) => QuestionTimer::new(cur.question, quiz.time_per_question),
            _ => return ServerWsMessage::NoQuestion,
        };
        let Some(message) = self.question_message() else {
            return ServerWsMessage::NoQuestion;
        };
        debug!(target: "timer", ticket = self.ticket, question_id = timer.question_id(), limit = timer.time_limit(), "Timer started");
        self.timer = Some(TimerHandle::spawn(timer, self.ticket, self.tick, self.timer_tx.clone()));
        message
    }

    fn commit(&mut self, answer: UserAnswer, timed_out: bool) -> Vec<ServerWsMessage> {
        let Some((correct_answer, explanation)) = self
            .session
            .current_question()
            .map(|c| (c.question.correct_answer, c.question.explanation.clone()))
        else {
            return self.ignored("answer_question");
        };
        if !self.session.answer_question(answer.clone()) {
            return self.ignored("answer_question");
        }
        info!(
            target: "session",
            question_id = answer.question_id,
            correct = answer.is_correct,
            time_taken = answer.time_taken,
            timed_out,
            "Answer committed"
        );

        let delay = self.state.settings.reveal_delay_ms;
        if delay > 0 {
            let tx = self.advance_tx.clone();
            let ticket = self.ticket;
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                let _ = tx.send(ticket);
            });
        }
        vec![ServerWsMessage::AnswerCommitted { answer, correct_answer, explanation, timed_out }]
    }

    async fn complete(&mut self) -> Vec<ServerWsMessage> {
        self.stop_timer().await;
        if !self.session.complete_quiz() {
            return self.ignored("complete_quiz");
        }
        match self.session.quiz_result().cloned() {
            Some(result) => {
                let message = ServerWsMessage::result(&result);
                self.state.record_result(result).await;
                vec![message]
            }
            None => vec![ServerWsMessage::NoResult],
        }
    }
}
