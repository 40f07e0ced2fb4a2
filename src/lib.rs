//! # practice-test
//!
//! Timed multiple-choice practice tests in the terminal.
//!
//! Questions come from a JSON file or a remote practice API. A test runs
//! against a countdown. It is submitted by the user or when time runs out,
//! and each finished attempt is recorded for the dashboard.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use practice_test::{Config, PracticeTest};
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), practice_test::AppError> {
//!     let config = Config::parse();
//!     PracticeTest::from_config(&config)?.run().await
//! }
//! ```

mod app;
pub mod auth;
mod clock;
pub mod config;
pub mod data;
mod error;
pub mod history;
pub mod models;
pub mod session;
pub mod terminal;
pub mod timer;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

pub use app::{Action, App, AppEvent, Screen, TestPlan};
pub use auth::{AuthContext, AuthSession};
pub use clock::Clock;
pub use config::Config;
pub use data::{FileQuestionSource, QuestionSource, RemoteQuestionSource, RequestId};
pub use error::{AppError, HistoryError, LoadError, SessionError};
pub use history::HistoryStore;
pub use models::{Answer, Difficulty, Question, QuestionSelector, Sentiment};
pub use session::{SessionController, SessionResult};

const INPUT_POLL: Duration = Duration::from_millis(50);

/// A configured practice test ready to take over the terminal.
pub struct PracticeTest {
    app: App,
    source: Arc<dyn QuestionSource>,
}

impl PracticeTest {
    pub fn new(app: App, source: Arc<dyn QuestionSource>) -> Self {
        Self { app, source }
    }

    /// Build the auth context, question source, and history store from
    /// configuration.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let auth = match (&config.user, &config.token) {
            (Some(user), token) => AuthContext::signed_in(AuthSession::new(user.clone(), token.clone())),
            (None, Some(token)) => AuthContext::signed_in(AuthSession::new("anonymous", Some(token.clone()))),
            (None, None) => AuthContext::anonymous(),
        };

        let source: Arc<dyn QuestionSource> = match (&config.questions, &config.api_url) {
            (Some(path), _) => Arc::new(FileQuestionSource::new(path)),
            (None, Some(url)) => Arc::new(RemoteQuestionSource::new(url.clone(), auth.clone())),
            (None, None) => {
                return Err(AppError::Config(
                    "either --questions or --api-url is required".to_string(),
                ));
            }
        };

        let history = match &config.history {
            Some(path) => HistoryStore::open(path)?,
            None => HistoryStore::in_memory(),
        };

        let plan = TestPlan {
            selector: config.selector(),
            title: config.title(),
            duration_minutes: config.minutes,
        };

        Ok(Self::new(App::new(plan, auth, history), source))
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Run until the user quits. The terminal is restored on every exit path.
    pub async fn run(mut self) -> Result<(), AppError> {
        info!(source = %self.source.describe(), "Starting practice test");

        let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
        let (active_tx, active_rx) = watch::channel(false);

        let tick_tx = tx.clone();
        let ticker = timer::spawn_ticker(active_rx, move || tick_tx.send(AppEvent::Tick).is_ok());

        let mut term = terminal::TerminalSession::enter()?;

        let first = self.app.start_fetch();
        spawn_fetch(&self.source, self.app.selector().clone(), first, tx.clone());

        'event_loop: loop {
            active_tx.send_replace(self.app.timer_active());
            term.draw(|frame| ui::render(frame, &self.app))?;

            while let Ok(event) = rx.try_recv() {
                let action = self.app.handle_event(event);
                if self.perform(action, &tx) {
                    break 'event_loop;
                }
                active_tx.send_replace(self.app.timer_active());
            }

            if event::poll(INPUT_POLL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    let action = self.app.handle_event(AppEvent::Key(key.code));
                    if self.perform(action, &tx) {
                        break;
                    }
                }
            }
        }

        ticker.stop();
        info!("Practice test closed");
        Ok(())
    }

    /// Carry out an action. Returns true when the loop should exit.
    fn perform(&self, action: Action, tx: &mpsc::UnboundedSender<AppEvent>) -> bool {
        match action {
            Action::None => false,
            Action::Fetch(request) => {
                spawn_fetch(&self.source, self.app.selector().clone(), request, tx.clone());
                false
            }
            Action::Quit => true,
        }
    }
}

fn spawn_fetch(
    source: &Arc<dyn QuestionSource>,
    selector: QuestionSelector,
    request: RequestId,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    let source = Arc::clone(source);
    tokio::spawn(async move {
        let outcome = source.fetch(&selector).await.map_err(|e| e.to_string());
        debug!(%request, ok = outcome.is_ok(), "Fetch finished");
        let _ = tx.send(AppEvent::QuestionsLoaded { request, outcome });
    });
}
