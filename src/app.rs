//! Screen state machine.
//!
//! [`App`] reacts to one [`AppEvent`] at a time and tells the event loop
//! what side effect to perform through the returned [`Action`]. It never
//! touches the terminal or the network itself.

use crossterm::event::KeyCode;
use tracing::{debug, info, warn};

use crate::auth::AuthContext;
use crate::clock::Clock;
use crate::data::{FetchOutcome, RequestId, RequestTracker};
use crate::history::{DashboardStats, HistoryStore, TestRecord};
use crate::models::{Question, QuestionSelector, Sentiment};
use crate::session::{SessionController, SessionResult, Step};
use crate::timer::{CountdownTimer, TickOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    LoadFailed(String),
    /// The source answered with no questions.
    Empty,
    Testing,
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyCode),
    Tick,
    QuestionsLoaded {
        request: RequestId,
        outcome: Result<Vec<Question>, String>,
    },
}

/// Side effect requested by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Fetch(RequestId),
    Quit,
}

/// What to run: which questions, under what title, for how long.
#[derive(Debug, Clone)]
pub struct TestPlan {
    pub selector: QuestionSelector,
    pub title: String,
    pub duration_minutes: u64,
}

pub struct App {
    pub screen: Screen,
    plan: TestPlan,
    clock: Clock,
    auth: AuthContext,
    history: HistoryStore,
    requests: RequestTracker,
    session: Option<SessionController>,
    timer: CountdownTimer,
    paused: bool,
    confirming_submit: bool,
    cursor: usize,
    notice: Option<String>,
    result: Option<SessionResult>,
    result_scroll: usize,
}

impl App {
    pub fn new(plan: TestPlan, auth: AuthContext, history: HistoryStore) -> Self {
        let timer = CountdownTimer::start(plan.duration_minutes);
        Self {
            screen: Screen::Loading,
            plan,
            clock: Clock::System,
            auth,
            history,
            requests: RequestTracker::new(),
            session: None,
            timer,
            paused: false,
            confirming_submit: false,
            cursor: 0,
            notice: None,
            result: None,
            result_scroll: 0,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn selector(&self) -> &QuestionSelector {
        &self.plan.selector
    }

    pub fn title(&self) -> &str {
        &self.plan.title
    }

    pub fn session(&self) -> Option<&SessionController> {
        self.session.as_ref()
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_confirming_submit(&self) -> bool {
        self.confirming_submit
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn dashboard(&self) -> DashboardStats {
        self.history.stats(self.auth.user_id().as_deref())
    }

    /// Whether the countdown should be running right now.
    pub fn timer_active(&self) -> bool {
        self.screen == Screen::Testing
            && !self.paused
            && self.session.as_ref().is_some_and(|s| s.is_active())
    }

    /// Drop the current attempt and ask for a fresh question list.
    pub fn start_fetch(&mut self) -> RequestId {
        let request = self.requests.issue();
        info!(%request, topic = %self.plan.selector.topic, "Fetching questions");

        self.screen = Screen::Loading;
        self.session = None;
        self.result = None;
        self.notice = None;
        self.paused = false;
        self.confirming_submit = false;
        request
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Action {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => {
                self.handle_tick();
                Action::None
            }
            AppEvent::QuestionsLoaded { request, outcome } => {
                self.handle_loaded(request, outcome);
                Action::None
            }
        }
    }

    fn handle_loaded(&mut self, request: RequestId, outcome: Result<Vec<Question>, String>) {
        if !self.requests.is_current(request) {
            debug!(%request, "Discarding stale question response");
            return;
        }

        match FetchOutcome::from_list(outcome) {
            FetchOutcome::Loaded(questions) => self.begin_session(questions),
            FetchOutcome::Empty => {
                info!(%request, "No questions matched");
                self.screen = Screen::Empty;
            }
            FetchOutcome::Failed(message) => {
                warn!(%request, %message, "Question fetch failed");
                self.screen = Screen::LoadFailed(message);
            }
        }
    }

    fn begin_session(&mut self, questions: Vec<Question>) {
        match SessionController::initialize(
            questions,
            self.plan.selector.clone(),
            self.plan.title.clone(),
            self.clock,
        ) {
            Ok(session) => {
                self.session = Some(session);
                self.timer = CountdownTimer::start(self.plan.duration_minutes);
                self.cursor = 0;
                self.screen = Screen::Testing;
            }
            Err(e) => {
                warn!(error = %e, "Could not start session");
                self.screen = Screen::Empty;
            }
        }
    }

    fn handle_tick(&mut self) {
        if self.screen != Screen::Testing {
            return;
        }

        let active = self.timer_active();
        if self.timer.tick(active) == TickOutcome::Expired {
            info!("Time is up, submitting");
            let result = self.session.as_mut().and_then(|s| s.expire());
            if let Some(result) = result {
                self.finish(result);
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> Action {
        if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
            return Action::Quit;
        }

        match self.screen {
            Screen::Loading => Action::None,
            Screen::LoadFailed(_) | Screen::Empty => match key {
                KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => {
                    Action::Fetch(self.start_fetch())
                }
                _ => Action::None,
            },
            Screen::Testing if self.confirming_submit => {
                self.handle_confirm_key(key);
                Action::None
            }
            Screen::Testing => {
                self.handle_testing_key(key);
                Action::None
            }
            Screen::Results => self.handle_results_key(key),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.confirming_submit = false;
                let result = self.session.as_mut().and_then(|s| s.submit());
                if let Some(result) = result {
                    self.finish(result);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirming_submit = false;
            }
            _ => {}
        }
    }

    fn handle_testing_key(&mut self, key: KeyCode) {
        self.notice = None;

        if self.paused {
            if matches!(key, KeyCode::Char('p') | KeyCode::Char('P')) {
                self.paused = false;
            }
            return;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let option_count = session.current_question().option_count();

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = (self.cursor + option_count - 1) % option_count;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1) % option_count;
            }
            KeyCode::Enter => {
                let option = self.cursor;
                self.select(option);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let option = c as usize - '1' as usize;
                self.select(option);
            }
            KeyCode::Backspace | KeyCode::Delete => {
                if session.clear_answer().is_ok() {
                    self.cursor = 0;
                }
            }
            KeyCode::Right | KeyCode::Char('l') => self.next(),
            KeyCode::Left | KeyCode::Char('h') => {
                if session.retreat() {
                    self.sync_cursor();
                }
            }
            KeyCode::Char('+') => self.toggle_feedback(Sentiment::Positive),
            KeyCode::Char('-') => self.toggle_feedback(Sentiment::Negative),
            KeyCode::Char('p') | KeyCode::Char('P') => self.paused = true,
            KeyCode::Char('s') | KeyCode::Char('S') => self.confirming_submit = true,
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) -> Action {
        let answer_count = self.result.as_ref().map_or(0, |r| r.answers.len());

        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                let max_scroll = answer_count.saturating_sub(1);
                self.result_scroll = (self.result_scroll + 1).min(max_scroll);
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.result_scroll = self.result_scroll.saturating_sub(1);
                Action::None
            }
            KeyCode::Char('r') | KeyCode::Char('R') => Action::Fetch(self.start_fetch()),
            _ => Action::None,
        }
    }

    fn select(&mut self, option: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.select_answer(option) {
            Ok(()) => self.cursor = option,
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    /// Advance, or ask for confirmation when leaving the last question.
    fn next(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.is_last() {
            self.confirming_submit = true;
            return;
        }

        if let Step::Moved(_) = session.advance() {
            self.sync_cursor();
        }
    }

    fn toggle_feedback(&mut self, sentiment: Sentiment) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let outcome = if session.current_feedback() == Some(sentiment) {
            session.clear_feedback()
        } else {
            session.set_feedback(sentiment)
        };
        if let Err(e) = outcome {
            self.notice = Some(e.to_string());
        }
    }

    fn sync_cursor(&mut self) {
        self.cursor = self
            .session
            .as_ref()
            .and_then(|s| s.current_answer().selected)
            .unwrap_or(0);
    }

    fn finish(&mut self, result: SessionResult) {
        let record = TestRecord::from_result(&result, self.auth.user_id(), self.clock.now());
        if let Err(e) = self.history.push(record) {
            warn!(error = %e, "Failed to save test history");
            self.notice = Some(format!("Result not saved: {}", e));
        }

        self.confirming_submit = false;
        self.paused = false;
        self.result = Some(result);
        self.result_scroll = 0;
        self.screen = Screen::Results;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::clock::test_clock;
    use crate::models::Difficulty;

    fn question(id: &str, correct: usize) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("Question {}", id),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_option: correct,
            explanation: None,
            context: None,
            references: Vec::new(),
        }
    }

    fn app(minutes: u64) -> App {
        let plan = TestPlan {
            selector: QuestionSelector::new("rust", Difficulty::Easy),
            title: "Rust".to_string(),
            duration_minutes: minutes,
        };
        App::new(plan, AuthContext::anonymous(), HistoryStore::in_memory()).with_clock(test_clock())
    }

    fn loaded_app(correct: &[usize]) -> App {
        let mut app = app(30);
        let request = app.start_fetch();
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, c)| question(&format!("q{}", i), *c))
            .collect();
        app.handle_event(AppEvent::QuestionsLoaded {
            request,
            outcome: Ok(questions),
        });
        app
    }

    fn key(app: &mut App, code: KeyCode) -> Action {
        app.handle_event(AppEvent::Key(code))
    }

    #[test]
    fn test_load_outcomes_map_to_screens() {
        let mut app = app(30);
        let request = app.start_fetch();
        app.handle_event(AppEvent::QuestionsLoaded {
            request,
            outcome: Ok(Vec::new()),
        });
        assert_eq!(app.screen, Screen::Empty);

        let request = match key(&mut app, KeyCode::Char('r')) {
            Action::Fetch(id) => id,
            other => panic!("expected fetch, got {:?}", other),
        };
        assert_eq!(app.screen, Screen::Loading);

        app.handle_event(AppEvent::QuestionsLoaded {
            request,
            outcome: Err("offline".to_string()),
        });
        assert_eq!(app.screen, Screen::LoadFailed("offline".to_string()));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut app = app(30);
        let stale = app.start_fetch();
        let fresh = app.start_fetch();

        app.handle_event(AppEvent::QuestionsLoaded {
            request: fresh,
            outcome: Ok(vec![question("new", 0)]),
        });
        app.handle_event(AppEvent::QuestionsLoaded {
            request: stale,
            outcome: Err("timeout".to_string()),
        });

        assert_eq!(app.screen, Screen::Testing);
        assert_eq!(app.session().unwrap().current_question().id, "new");
    }

    #[test]
    fn test_select_by_cursor_and_digit() {
        let mut app = loaded_app(&[1, 2]);
        key(&mut app, KeyCode::Down);
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.session().unwrap().current_answer().selected, Some(1));

        key(&mut app, KeyCode::Char('3'));
        assert_eq!(app.session().unwrap().current_answer().selected, Some(2));
        assert_eq!(app.cursor(), 2);
    }

    #[test]
    fn test_out_of_range_digit_shows_notice() {
        let mut app = loaded_app(&[0]);
        key(&mut app, KeyCode::Char('9'));
        assert!(app.session().unwrap().current_answer().selected.is_none());
        assert!(app.notice().unwrap().contains("out of range"));
    }

    #[test]
    fn test_next_on_last_asks_for_confirmation() {
        let mut app = loaded_app(&[0, 0]);
        key(&mut app, KeyCode::Right);
        assert_eq!(app.session().unwrap().current_index(), 1);

        key(&mut app, KeyCode::Right);
        assert!(app.is_confirming_submit());
        key(&mut app, KeyCode::Esc);
        assert!(!app.is_confirming_submit());
        assert_eq!(app.screen, Screen::Testing);

        key(&mut app, KeyCode::Char('s'));
        key(&mut app, KeyCode::Char('y'));
        assert_eq!(app.screen, Screen::Results);
        assert_eq!(app.history().records().len(), 1);
    }

    #[test]
    fn test_cursor_follows_saved_answer() {
        let mut app = loaded_app(&[0, 0]);
        key(&mut app, KeyCode::Char('2'));
        key(&mut app, KeyCode::Right);
        assert_eq!(app.cursor(), 0);
        key(&mut app, KeyCode::Left);
        assert_eq!(app.cursor(), 1);
    }

    #[test]
    fn test_feedback_toggles() {
        let mut app = loaded_app(&[0]);
        key(&mut app, KeyCode::Char('+'));
        assert_eq!(app.session().unwrap().current_feedback(), Some(Sentiment::Positive));
        key(&mut app, KeyCode::Char('-'));
        assert_eq!(app.session().unwrap().current_feedback(), Some(Sentiment::Negative));
        key(&mut app, KeyCode::Char('-'));
        assert_eq!(app.session().unwrap().current_feedback(), None);
    }

    #[test]
    fn test_pause_freezes_timer_and_input() {
        let mut app = loaded_app(&[0]);
        app.handle_event(AppEvent::Tick);
        assert_eq!(app.timer().remaining_secs(), 30 * 60 - 1);

        key(&mut app, KeyCode::Char('p'));
        assert!(!app.timer_active());
        app.handle_event(AppEvent::Tick);
        key(&mut app, KeyCode::Char('1'));
        assert_eq!(app.timer().remaining_secs(), 30 * 60 - 1);
        assert!(app.session().unwrap().current_answer().selected.is_none());

        key(&mut app, KeyCode::Char('p'));
        assert!(app.timer_active());
    }

    #[test]
    fn test_expiry_submits_once() {
        let mut app = app(1);
        let request = app.start_fetch();
        app.handle_event(AppEvent::QuestionsLoaded {
            request,
            outcome: Ok(vec![question("q", 0)]),
        });
        key(&mut app, KeyCode::Char('1'));

        for _ in 0..65 {
            app.handle_event(AppEvent::Tick);
        }

        assert_eq!(app.screen, Screen::Results);
        assert_eq!(app.timer().display(), "00:00");
        let result = app.result().unwrap();
        assert!(result.timed_out);
        assert_eq!(result.score, 1);
        assert_eq!(app.history().records().len(), 1);
    }

    #[test]
    fn test_results_scroll_and_retry() {
        let mut app = loaded_app(&[0, 0, 0]);
        key(&mut app, KeyCode::Char('s'));
        key(&mut app, KeyCode::Enter);

        for _ in 0..5 {
            key(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.result_scroll(), 2);
        key(&mut app, KeyCode::Up);
        assert_eq!(app.result_scroll(), 1);

        assert!(matches!(key(&mut app, KeyCode::Char('r')), Action::Fetch(_)));
        assert_eq!(app.screen, Screen::Loading);
        assert!(app.session().is_none());
        assert_eq!(app.dashboard().tests_taken, 1);
    }

    #[test]
    fn test_signed_out_dashboard_ignores_other_users() {
        let mut history = HistoryStore::in_memory();
        let mut other = loaded_app(&[0]);
        key(&mut other, KeyCode::Char('1'));
        key(&mut other, KeyCode::Char('s'));
        key(&mut other, KeyCode::Char('y'));
        let result = other.result().unwrap();
        history
            .push(TestRecord::from_result(result, Some("ana".to_string()), Utc::now()))
            .unwrap();

        let plan = TestPlan {
            selector: QuestionSelector::new("rust", Difficulty::Easy),
            title: "Rust".to_string(),
            duration_minutes: 30,
        };
        let mut app = App::new(plan, AuthContext::anonymous(), history).with_clock(test_clock());
        assert_eq!(app.dashboard().tests_taken, 0);

        let request = app.start_fetch();
        app.handle_event(AppEvent::QuestionsLoaded {
            request,
            outcome: Ok(vec![question("q0", 0)]),
        });
        key(&mut app, KeyCode::Char('s'));
        key(&mut app, KeyCode::Char('y'));

        let stats = app.dashboard();
        assert_eq!(stats.tests_taken, 1);
        assert_eq!(stats.correct, 0);
    }

    #[test]
    fn test_quit_from_any_screen() {
        let mut app = app(30);
        assert_eq!(key(&mut app, KeyCode::Char('q')), Action::Quit);

        let mut app = loaded_app(&[0]);
        assert_eq!(key(&mut app, KeyCode::Char('q')), Action::Quit);
    }
}
