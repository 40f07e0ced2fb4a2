//! Wire shapes for question data and their conversion into [`Question`].
//!
//! Both the JSON file format and the HTTP API use these DTOs. Nothing is
//! filled in on the client side: a record missing required fields is
//! rejected instead of patched.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::LoadError;
use crate::models::Question;

const MIN_OPTIONS: usize = 2;

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDto {
    pub id: String,
    #[serde(alias = "question", alias = "text")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(alias = "correct_answer", alias = "answer")]
    pub correct_option: usize,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default, alias = "code")]
    pub context: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

/// A response body: a bare list, a wrapped list, or an error message.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QuestionsEnvelope {
    List(Vec<QuestionDto>),
    Wrapped { questions: Vec<QuestionDto> },
    Failure { error: String },
}

impl QuestionDto {
    pub fn validate(self) -> Result<Question, LoadError> {
        let id = self.id.trim().to_string();
        let invalid = |reason: &str| LoadError::Invalid {
            id: id.clone(),
            reason: reason.to_string(),
        };

        if id.is_empty() {
            return Err(invalid("missing id"));
        }
        if self.prompt.trim().is_empty() {
            return Err(invalid("empty prompt"));
        }
        if self.options.len() < MIN_OPTIONS {
            return Err(invalid("needs at least two options"));
        }
        if self.correct_option >= self.options.len() {
            return Err(LoadError::Invalid {
                id: id.clone(),
                reason: format!(
                    "correct option {} is out of range for {} options",
                    self.correct_option,
                    self.options.len()
                ),
            });
        }

        Ok(Question {
            id,
            prompt: self.prompt,
            options: self.options,
            correct_option: self.correct_option,
            explanation: self.explanation.filter(|e| !e.trim().is_empty()),
            context: self.context.filter(|c| !c.trim().is_empty()),
            references: self.references,
        })
    }
}

/// Validate a batch, keeping order and rejecting duplicate ids.
pub fn validate_all(dtos: Vec<QuestionDto>) -> Result<Vec<Question>, LoadError> {
    let mut seen = HashSet::with_capacity(dtos.len());
    let mut questions = Vec::with_capacity(dtos.len());

    for dto in dtos {
        let question = dto.validate()?;
        if !seen.insert(question.id.clone()) {
            return Err(LoadError::Invalid {
                id: question.id,
                reason: "duplicate id".to_string(),
            });
        }
        questions.push(question);
    }

    Ok(questions)
}

/// Parse a JSON body into validated questions.
pub fn parse_questions(body: &str) -> Result<Vec<Question>, LoadError> {
    match serde_json::from_str::<QuestionsEnvelope>(body)? {
        QuestionsEnvelope::List(dtos) | QuestionsEnvelope::Wrapped { questions: dtos } => {
            validate_all(dtos)
        }
        QuestionsEnvelope::Failure { error } => Err(LoadError::Server(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_list() {
        let body = r#"[
            {"id": "1", "prompt": "2 + 2?", "options": ["3", "4"], "correct_option": 1,
             "explanation": "Basic arithmetic", "references": ["ch1"]}
        ]"#;
        let questions = parse_questions(body).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_option, 1);
        assert_eq!(questions[0].explanation.as_deref(), Some("Basic arithmetic"));
        assert_eq!(questions[0].references, vec!["ch1".to_string()]);
    }

    #[test]
    fn test_parse_wrapped_with_aliases() {
        let body = r#"{"questions": [
            {"id": "a", "question": "Which keyword?", "options": ["let", "var", "def"],
             "correct_answer": 0, "code": "let x = 1;"}
        ]}"#;
        let questions = parse_questions(body).unwrap();
        assert_eq!(questions[0].prompt, "Which keyword?");
        assert_eq!(questions[0].context.as_deref(), Some("let x = 1;"));
    }

    #[test]
    fn test_empty_list_is_not_an_error() {
        assert!(parse_questions("[]").unwrap().is_empty());
        assert!(parse_questions(r#"{"questions": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_server_error_body() {
        let err = parse_questions(r#"{"error": "unknown topic"}"#).unwrap_err();
        assert!(matches!(err, LoadError::Server(msg) if msg == "unknown topic"));
    }

    #[test]
    fn test_rejects_out_of_range_correct_option() {
        let body = r#"[{"id": "1", "prompt": "?", "options": ["a", "b"], "correct_option": 2}]"#;
        let err = parse_questions(body).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { id, .. } if id == "1"));
    }

    #[test]
    fn test_rejects_single_option_and_blank_prompt() {
        let one_option = r#"[{"id": "1", "prompt": "?", "options": ["a"], "correct_option": 0}]"#;
        assert!(parse_questions(one_option).is_err());

        let blank = r#"[{"id": "1", "prompt": "  ", "options": ["a", "b"], "correct_option": 0}]"#;
        assert!(parse_questions(blank).is_err());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let body = r#"[
            {"id": "1", "prompt": "a?", "options": ["a", "b"], "correct_option": 0},
            {"id": "1", "prompt": "b?", "options": ["a", "b"], "correct_option": 1}
        ]"#;
        let err = parse_questions(body).unwrap_err();
        assert!(err.to_string().contains("duplicate id"));
    }

    #[test]
    fn test_missing_required_field_is_parse_error() {
        let body = r#"[{"id": "1", "options": ["a", "b"], "correct_option": 0}]"#;
        assert!(matches!(parse_questions(body), Err(LoadError::Parse(_))));
    }
}
