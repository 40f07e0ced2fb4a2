//! Navigation and answer bookkeeping for one practice test attempt.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::{seconds_between, Clock};
use crate::error::SessionError;
use crate::models::{Answer, Feedback, Question, QuestionSelector, Sentiment};

use super::result::SessionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Submitted,
}

/// Outcome of moving forward.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Pointer moved to the given index.
    Moved(usize),
    /// The last question was passed, so the session was submitted.
    Submitted(SessionResult),
    /// The session is no longer active.
    Ignored,
}

pub struct SessionController {
    id: Uuid,
    title: String,
    selector: QuestionSelector,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    feedback: Vec<Feedback>,
    current: usize,
    phase: SessionPhase,
    clock: Clock,
    started_at: DateTime<Utc>,
    /// When the current question was last brought on screen.
    entered_at: DateTime<Utc>,
}

impl SessionController {
    /// Start a session over a non-empty question list.
    pub fn initialize(
        questions: Vec<Question>,
        selector: QuestionSelector,
        title: impl Into<String>,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let answers = questions
            .iter()
            .map(|q| Answer::unanswered(q.id.clone()))
            .collect();
        let feedback = vec![None; questions.len()];
        let now = clock.now();
        let id = Uuid::new_v4();

        info!(session = %id, questions = questions.len(), "Session started");

        Ok(Self {
            id,
            title: title.into(),
            selector,
            questions,
            answers,
            feedback,
            current: 0,
            phase: SessionPhase::Active,
            clock,
            started_at: now,
            entered_at: now,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn selector(&self) -> &QuestionSelector {
        &self.selector
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn current_answer(&self) -> &Answer {
        &self.answers[self.current]
    }

    pub fn current_feedback(&self) -> Feedback {
        self.feedback[self.current]
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_answered()).count()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Replace the time source, e.g. to move a fixed clock in tests.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// Record the option for the current question, replacing any earlier pick.
    pub fn select_answer(&mut self, option: usize) -> Result<(), SessionError> {
        self.ensure_active()?;

        let question = &self.questions[self.current];
        if option >= question.option_count() {
            return Err(SessionError::OptionOutOfRange {
                index: option,
                options: question.option_count(),
            });
        }

        let is_correct = question.is_correct(option);
        let answer = &mut self.answers[self.current];
        answer.selected = Some(option);
        answer.is_correct = is_correct;

        debug!(question = %answer.question_id, option, "Answer selected");
        Ok(())
    }

    /// Reset the current question to unanswered.
    pub fn clear_answer(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        let answer = &mut self.answers[self.current];
        answer.selected = None;
        answer.is_correct = false;
        Ok(())
    }

    pub fn set_feedback(&mut self, sentiment: Sentiment) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.feedback[self.current] = Some(sentiment);
        Ok(())
    }

    pub fn clear_feedback(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.feedback[self.current] = None;
        Ok(())
    }

    /// Move to the next question, or submit when already on the last one.
    pub fn advance(&mut self) -> Step {
        if !self.is_active() {
            return Step::Ignored;
        }

        if self.is_last() {
            return match self.submit() {
                Some(result) => Step::Submitted(result),
                None => Step::Ignored,
            };
        }

        self.move_to(self.current + 1);
        Step::Moved(self.current)
    }

    /// Move to the previous question. Returns false at the first question.
    pub fn retreat(&mut self) -> bool {
        if !self.is_active() || self.is_first() {
            return false;
        }

        self.move_to(self.current - 1);
        true
    }

    /// Move straight to a question. Returns false when out of range.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if !self.is_active() || index >= self.questions.len() {
            return false;
        }

        self.move_to(index);
        true
    }

    /// Finish the session on user request. Returns None if it already ended.
    pub fn submit(&mut self) -> Option<SessionResult> {
        self.finish(false)
    }

    /// Finish the session because the countdown ran out.
    pub fn expire(&mut self) -> Option<SessionResult> {
        self.finish(true)
    }

    pub fn score(&self) -> usize {
        self.answers
            .iter()
            .zip(self.questions.iter())
            .filter(|(answer, question)| answer.selected == Some(question.correct_option))
            .count()
    }

    fn finish(&mut self, timed_out: bool) -> Option<SessionResult> {
        if !self.is_active() {
            debug!(session = %self.id, "Ignoring submit for finished session");
            return None;
        }

        self.settle_time_spent();
        self.phase = SessionPhase::Submitted;

        let result = SessionResult {
            session_id: self.id,
            title: self.title.clone(),
            selector: self.selector.clone(),
            score: self.score(),
            total: self.questions.len(),
            elapsed_secs: seconds_between(self.started_at, self.clock.now()),
            answers: self.answers.clone(),
            feedback: self.feedback.clone(),
            timed_out,
        };

        info!(
            session = %self.id,
            score = result.score,
            total = result.total,
            elapsed_secs = result.elapsed_secs,
            timed_out,
            "Session submitted"
        );

        Some(result)
    }

    fn move_to(&mut self, index: usize) {
        self.settle_time_spent();
        self.current = index;
    }

    fn settle_time_spent(&mut self) {
        let now = self.clock.now();
        self.answers[self.current].time_spent_secs += seconds_between(self.entered_at, now);
        self.entered_at = now;
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(SessionError::Inactive)
        }
    }
}
