//! Per-question countdown.
//!
//! `QuestionTimer` is the plain countdown with a commit latch: at most one
//! answer (manual submit or timeout) ever leaves it. `TimerHandle::spawn`
//! drives it on the tokio runtime with one single-shot sleep per second,
//! re-armed after each tick; a cancelled or committed timer is simply not
//! re-armed, so no tick can fire after cancellation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, instrument};

use crate::domain::{Question, QuestionId, UserAnswer};

pub const TICK: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerPhase {
    Running,
    Committed,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    Counting { remaining: u32, elapsed: u32 },
    Expired(UserAnswer),
    Stopped,
}

#[derive(Clone, Debug)]
pub struct QuestionTimer {
    question_id: QuestionId,
    correct_answer: usize,
    option_count: usize,
    time_limit: u32,
    time_remaining: u32,
    time_taken: u32,
    selected: Option<usize>,
    phase: TimerPhase,
}

impl QuestionTimer {
    pub fn new(question: &Question, time_limit: u32) -> Self {
        Self {
            question_id: question.id,
            correct_answer: question.correct_answer,
            option_count: question.options.len(),
            time_limit,
            time_remaining: time_limit,
            time_taken: 0,
            selected: None,
            phase: TimerPhase::Running,
        }
    }

    pub fn question_id(&self) -> QuestionId { self.question_id }
    pub fn time_limit(&self) -> u32 { self.time_limit }
    #[cfg(test)]
    pub fn time_remaining(&self) -> u32 { self.time_remaining }
    #[cfg(test)]
    pub fn time_taken(&self) -> u32 { self.time_taken }
    #[cfg(test)]
    pub fn selected(&self) -> Option<usize> { self.selected }
    pub fn phase(&self) -> TimerPhase { self.phase }

    /// Tentative selection. Ignored once committed/cancelled or for an unknown option.
    pub fn select(&mut self, option: usize) -> bool {
        if self.phase != TimerPhase::Running || option >= self.option_count {
            return false;
        }
        self.selected = Some(option);
        true
    }

    /// Manual submit. Needs a selection and a running timer.
    pub fn submit(&mut self) -> Option<UserAnswer> {
        if self.phase != TimerPhase::Running || self.selected.is_none() {
            return None;
        }
        Some(self.commit())
    }

    /// Advance one second. Reaching zero forces a commit with whatever is selected.
    pub fn tick(&mut self) -> Tick {
        if self.phase != TimerPhase::Running {
            return Tick::Stopped;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.time_taken = (self.time_taken + 1).min(self.time_limit);
        if self.time_remaining == 0 {
            return Tick::Expired(self.commit());
        }
        Tick::Counting { remaining: self.time_remaining, elapsed: self.time_taken }
    }

    pub fn cancel(&mut self) {
        if self.phase == TimerPhase::Running {
            self.phase = TimerPhase::Cancelled;
        }
    }

    fn commit(&mut self) -> UserAnswer {
        self.phase = TimerPhase::Committed;
        UserAnswer {
            question_id: self.question_id,
            selected_option: self.selected,
            is_correct: self.selected == Some(self.correct_answer),
            time_taken: self.time_taken,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { ticket: u64, question_id: QuestionId, remaining: u32, elapsed: u32, total: u32 },
    Expired { ticket: u64, answer: UserAnswer },
}

impl TimerEvent {
    pub fn ticket(&self) -> u64 {
        match self {
            TimerEvent::Tick { ticket, .. } | TimerEvent::Expired { ticket, .. } => *ticket,
        }
    }
}

/// Shared handle to a running countdown. `ticket` tags every event it emits.
#[derive(Clone)]
pub struct TimerHandle {
    ticket: u64,
    inner: Arc<Mutex<QuestionTimer>>,
}

impl TimerHandle {
    pub fn spawn(
        timer: QuestionTimer,
        ticket: u64,
        period: Duration,
        events: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let inner = Arc::new(Mutex::new(timer));
        tokio::spawn(run_countdown(inner.clone(), ticket, period, events));
        Self { ticket, inner }
    }

    pub async fn select(&self, option: usize) -> bool {
        self.inner.lock().await.select(option)
    }

    pub async fn submit(&self) -> Option<UserAnswer> {
        self.inner.lock().await.submit()
    }

    pub async fn cancel(&self) {
        let mut timer = self.inner.lock().await;
        if timer.phase() == TimerPhase::Running {
            debug!(target: "timer", ticket = self.ticket, question_id = timer.question_id(), "Timer cancelled");
        }
        timer.cancel();
    }

    #[cfg(test)]
    pub async fn snapshot(&self) -> QuestionTimer {
        self.inner.lock().await.clone()
    }
}

#[instrument(level = "debug", skip(timer, events))]
async fn run_countdown(
    timer: Arc<Mutex<QuestionTimer>>,
    ticket: u64,
    period: Duration,
    events: mpsc::UnboundedSender<TimerEvent>,
) {
    loop {
        tokio::time::sleep(period).await;
        let (tick, question_id, total) = {
            let mut t = timer.lock().await;
            (t.tick(), t.question_id(), t.time_limit())
        };
        match tick {
            Tick::Counting { remaining, elapsed } => {
                let ev = TimerEvent::Tick { ticket, question_id, remaining, elapsed, total };
                if events.send(ev).is_err() {
                    return;
                }
            }
            Tick::Expired(answer) => {
                info!(target: "timer", %ticket, question_id, selected = ?answer.selected_option, "Question timed out");
                let _ = events.send(TimerEvent::Expired { ticket, answer });
                return;
            }
            Tick::Stopped => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question {
            id: 7,
            text: "Pick b".into(),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_answer: 1,
            explanation: None,
        }
    }

    #[test]
    fn counts_down_and_expires_without_selection() {
        let mut t = QuestionTimer::new(&question(), 3);
        assert_eq!(t.tick(), Tick::Counting { remaining: 2, elapsed: 1 });
        assert_eq!(t.tick(), Tick::Counting { remaining: 1, elapsed: 2 });
        let Tick::Expired(answer) = t.tick() else { panic!("expected expiry") };
        assert_eq!(answer, UserAnswer { question_id: 7, selected_option: None, is_correct: false, time_taken: 3 });
        assert_eq!(t.phase(), TimerPhase::Committed);
        assert_eq!(t.tick(), Tick::Stopped);
        assert_eq!(t.time_remaining() + t.time_taken(), t.time_limit());
    }

    #[test]
    fn expiry_keeps_tentative_selection() {
        let mut t = QuestionTimer::new(&question(), 1);
        assert!(t.select(1));
        let Tick::Expired(answer) = t.tick() else { panic!("expected expiry") };
        assert_eq!(answer.selected_option, Some(1));
        assert!(answer.is_correct);

        let mut t = QuestionTimer::new(&question(), 1);
        t.select(2);
        let Tick::Expired(answer) = t.tick() else { panic!("expected expiry") };
        assert!(!answer.is_correct);
    }

    #[test]
    fn submit_latches() {
        let mut t = QuestionTimer::new(&question(), 30);
        assert!(t.submit().is_none(), "nothing selected yet");
        t.tick();
        t.tick();
        assert!(t.select(1));
        let answer = t.submit().unwrap();
        assert_eq!(answer, UserAnswer { question_id: 7, selected_option: Some(1), is_correct: true, time_taken: 2 });
        assert!(t.submit().is_none());
        assert!(!t.select(0));
        assert_eq!(t.tick(), Tick::Stopped);
    }

    #[test]
    fn invalid_option_is_ignored() {
        let mut t = QuestionTimer::new(&question(), 30);
        assert!(!t.select(3));
        assert_eq!(t.selected(), None);
    }

    #[test]
    fn cancelled_timer_never_commits() {
        let mut t = QuestionTimer::new(&question(), 1);
        t.select(1);
        t.cancel();
        assert_eq!(t.tick(), Tick::Stopped);
        assert!(t.submit().is_none());
        assert_eq!(t.phase(), TimerPhase::Cancelled);
    }

    async fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut out = Vec::new();
        while let Some(ev) = rx.recv().await {
            out.push(ev);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_timer_forces_commit_on_expiry() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = TimerHandle::spawn(QuestionTimer::new(&question(), 3), 5, TICK, tx);
        let events = drain(&mut rx).await;
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            TimerEvent::Tick { ticket: 5, question_id: 7, remaining: 2, elapsed: 1, total: 3 }
        );
        assert_eq!(
            events[2],
            TimerEvent::Expired {
                ticket: 5,
                answer: UserAnswer { question_id: 7, selected_option: None, is_correct: false, time_taken: 3 },
            }
        );
        assert!(events.iter().all(|e| e.ticket() == 5));
    }

    #[tokio::test(start_paused = true)]
    async fn manual_submit_suppresses_expiry() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = TimerHandle::spawn(QuestionTimer::new(&question(), 10), 1, TICK, tx);
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(handle.select(1).await);
        let answer = handle.submit().await.unwrap();
        assert_eq!(answer.time_taken, 2);
        assert!(answer.is_correct);
        assert!(handle.submit().await.is_none());

        let events = drain(&mut rx).await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| matches!(e, TimerEvent::Tick { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_rescheduling() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = TimerHandle::spawn(QuestionTimer::new(&question(), 5), 9, TICK, tx);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        handle.cancel().await;
        let events = drain(&mut rx).await;
        assert_eq!(events.len(), 1);
        assert!(!events.iter().any(|e| matches!(e, TimerEvent::Expired { .. })));
        assert_eq!(handle.snapshot().await.phase(), TimerPhase::Cancelled);
    }
}
