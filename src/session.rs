//! Quiz session state machine.
//!
//! `reduce` is a pure function of (state, action). `QuizSession` owns the
//! current state plus an injected `ResultStore` and exposes the command/query
//! surface used by the play driver:
//!
//!   Idle --select--> Selected --start--> InProgress --complete--> Completed
//!
//! `select` and `reset` are accepted from every state. Commands issued in a
//! state that does not accept them are ignored and leave the state untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::{Question, Quiz, QuizProgress, QuizResult, UserAnswer};

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    Idle,
    Selected { quiz: Arc<Quiz> },
    InProgress { quiz: Arc<Quiz>, progress: QuizProgress },
    Completed { quiz: Arc<Quiz>, progress: QuizProgress },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Selected { .. } => "selected",
            SessionState::InProgress { .. } => "in_progress",
            SessionState::Completed { .. } => "completed",
        }
    }

    pub fn quiz(&self) -> Option<&Arc<Quiz>> {
        match self {
            SessionState::Idle => None,
            SessionState::Selected { quiz }
            | SessionState::InProgress { quiz, .. }
            | SessionState::Completed { quiz, .. } => Some(quiz),
        }
    }

    #[cfg(test)]
    pub fn progress(&self) -> Option<&QuizProgress> {
        match self {
            SessionState::InProgress { progress, .. } | SessionState::Completed { progress, .. } => Some(progress),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Action {
    SelectQuiz(Arc<Quiz>),
    StartQuiz { at: DateTime<Utc> },
    AnswerQuestion(UserAnswer),
    NextQuestion,
    CompleteQuiz { at: DateTime<Utc> },
    ResetQuiz,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SelectQuiz(_) => "select_quiz",
            Action::StartQuiz { .. } => "start_quiz",
            Action::AnswerQuestion(_) => "answer_question",
            Action::NextQuestion => "next_question",
            Action::CompleteQuiz { .. } => "complete_quiz",
            Action::ResetQuiz => "reset_quiz",
        }
    }
}

/// Outcome of one reducer step. `result` is set only by an accepted completion.
#[derive(Debug)]
pub struct Transition {
    pub state: SessionState,
    pub result: Option<QuizResult>,
    pub applied: bool,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        Self { state, result: None, applied: true }
    }

    fn ignored(state: SessionState) -> Self {
        Self { state, result: None, applied: false }
    }
}

/// An answer is accepted only for the question at the current index, once,
/// and never beyond the quiz's question count.
fn accepts_answer(quiz: &Quiz, progress: &QuizProgress, answer: &UserAnswer) -> bool {
    progress.answers.len() < quiz.question_count()
        && quiz
            .question(progress.current_question_index)
            .map_or(false, |q| q.id == answer.question_id)
        && !progress.has_answered(answer.question_id)
}

pub fn reduce(state: SessionState, action: Action) -> Transition {
    match (state, action) {
        (_, Action::SelectQuiz(quiz)) => Transition::to(SessionState::Selected { quiz }),
        (_, Action::ResetQuiz) => Transition::to(SessionState::Idle),

        (SessionState::Selected { quiz }, Action::StartQuiz { at }) => {
            Transition::to(SessionState::InProgress { quiz, progress: QuizProgress::new(at) })
        }

        (SessionState::InProgress { quiz, mut progress }, Action::AnswerQuestion(answer)) => {
            if !accepts_answer(&quiz, &progress, &answer) {
                return Transition::ignored(SessionState::InProgress { quiz, progress });
            }
            progress.answers.push(answer);
            Transition::to(SessionState::InProgress { quiz, progress })
        }

        (SessionState::InProgress { quiz, mut progress }, Action::NextQuestion) => {
            // Unbounded on purpose: an index past the end reads as "no current question".
            progress.current_question_index = progress.current_question_index.saturating_add(1);
            Transition::to(SessionState::InProgress { quiz, progress })
        }

        (SessionState::InProgress { quiz, mut progress }, Action::CompleteQuiz { at }) => {
            let result = QuizResult::from_progress(&quiz, &progress, at);
            progress.is_completed = true;
            Transition {
                state: SessionState::Completed { quiz, progress },
                result: Some(result),
                applied: true,
            }
        }

        (state, _) => Transition::ignored(state),
    }
}

/// Destination for completed results. Injected so the history can live
/// wherever the caller needs it.
pub trait ResultStore {
    fn record(&mut self, result: QuizResult);
    fn latest(&self) -> Option<&QuizResult>;
}

impl ResultStore for Vec<QuizResult> {
    fn record(&mut self, result: QuizResult) {
        self.push(result);
    }

    fn latest(&self) -> Option<&QuizResult> {
        self.last()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CurrentQuestion<'a> {
    pub question: &'a Question,
    pub index: usize,
}

pub struct QuizSession<R: ResultStore = Vec<QuizResult>> {
    state: SessionState,
    results: R,
}

impl Default for QuizSession<Vec<QuizResult>> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R: ResultStore> QuizSession<R> {
    pub fn new(results: R) -> Self {
        Self { state: SessionState::Idle, results }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[cfg(test)]
    pub fn results(&self) -> &R {
        &self.results
    }

    /// Run one action through the reducer. Returns whether it was accepted.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let name = action.name();
        let from = self.state.name();
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        let Transition { state, result, applied } = reduce(state, action);
        self.state = state;

        if !applied {
            debug!(target: "session", action = name, state = from, "Ignored action in current state");
            return false;
        }
        debug!(target: "session", action = name, from, to = self.state.name(), "Transition");
        if let Some(result) = result {
            info!(
                target: "session",
                quiz_id = result.quiz_id,
                score = result.score,
                total = result.total_questions,
                time_taken = result.time_taken,
                "Quiz completed"
            );
            self.results.record(result);
        }
        true
    }

    pub fn select_quiz(&mut self, quiz: Arc<Quiz>) -> bool {
        self.dispatch(Action::SelectQuiz(quiz))
    }

    pub fn start_quiz(&mut self) -> bool {
        self.start_quiz_at(Utc::now())
    }

    pub fn start_quiz_at(&mut self, at: DateTime<Utc>) -> bool {
        self.dispatch(Action::StartQuiz { at })
    }

    pub fn answer_question(&mut self, answer: UserAnswer) -> bool {
        self.dispatch(Action::AnswerQuestion(answer))
    }

    pub fn next_question(&mut self) -> bool {
        self.dispatch(Action::NextQuestion)
    }

    pub fn complete_quiz(&mut self) -> bool {
        self.complete_quiz_at(Utc::now())
    }

    pub fn complete_quiz_at(&mut self, at: DateTime<Utc>) -> bool {
        self.dispatch(Action::CompleteQuiz { at })
    }

    pub fn reset_quiz(&mut self) -> bool {
        self.dispatch(Action::ResetQuiz)
    }

    /// The question at the current index, or `None` when there is no running
    /// attempt or the index ran past the last question.
    pub fn current_question(&self) -> Option<CurrentQuestion<'_>> {
        let (quiz, progress) = match &self.state {
            SessionState::InProgress { quiz, progress } | SessionState::Completed { quiz, progress } => (quiz, progress),
            _ => return None,
        };
        let index = progress.current_question_index;
        quiz.question(index).map(|question| CurrentQuestion { question, index })
    }

    /// Most recent result, only while the attempt is in the completed state.
    pub fn quiz_result(&self) -> Option<&QuizResult> {
        match &self.state {
            SessionState::Completed { .. } => self.results.latest(),
            _ => None,
        }
    }
}
