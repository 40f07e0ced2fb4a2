//! Command line and environment configuration.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::models::{Difficulty, QuestionSelector};

pub const MAX_MINUTES: u64 = 24 * 60;

#[derive(Parser, Debug, Clone)]
#[command(name = "practice-test", version, about = "Timed multiple-choice practice tests in the terminal")]
#[command(group(ArgGroup::new("source").required(true).args(["questions", "api_url"])))]
pub struct Config {
    /// JSON file to load the questions from
    #[arg(short, long)]
    pub questions: Option<PathBuf>,

    /// Base URL of the practice question API
    #[arg(long, env = "PRACTICE_TEST_API_URL")]
    pub api_url: Option<String>,

    /// Topic to practice
    #[arg(short, long, default_value = "general")]
    pub topic: String,

    /// Narrower subtopic within the topic
    #[arg(long)]
    pub subtopic: Option<String>,

    #[arg(short, long, value_enum, default_value_t = Difficulty::Medium)]
    pub difficulty: Difficulty,

    /// Title shown above the test (defaults to the topic)
    #[arg(long)]
    pub title: Option<String>,

    /// Time limit in minutes (at most one day)
    #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=MAX_MINUTES))]
    pub minutes: u64,

    /// User the results are recorded for
    #[arg(long, env = "PRACTICE_TEST_USER")]
    pub user: Option<String>,

    /// Access token sent to the question API
    #[arg(long, env = "PRACTICE_TEST_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File where finished tests are recorded
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn selector(&self) -> QuestionSelector {
        let selector = QuestionSelector::new(self.topic.clone(), self.difficulty);
        match &self.subtopic {
            Some(subtopic) => selector.with_subtopic(subtopic.clone()),
            None => selector,
        }
    }

    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.selector().default_title())
    }

    pub fn log_filter(&self) -> String {
        let level = if self.verbose { "debug" } else { "info" };
        format!("practice_test={}", level)
    }
}
