use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::auth::AuthContext;
use crate::error::LoadError;
use crate::models::{Question, QuestionSelector};

use super::schema::parse_questions;
use super::source::QuestionSource;

/// Fetches questions from the practice API:
/// `GET {base_url}/questions?topic=..&subtopic=..&difficulty=..`.
#[derive(Clone)]
pub struct RemoteQuestionSource {
    client: Client,
    base_url: String,
    auth: AuthContext,
}

impl RemoteQuestionSource {
    pub fn new(base_url: impl Into<String>, auth: AuthContext) -> Self {
        Self::with_client(base_url, auth, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, auth: AuthContext, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            auth,
        }
    }

    pub fn questions_url(&self) -> String {
        format!("{}/questions", self.base_url.trim_end_matches('/'))
    }
}

pub(crate) fn query_params(selector: &QuestionSelector) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("topic", selector.topic.clone()),
        ("difficulty", selector.difficulty.as_str().to_string()),
    ];
    if let Some(subtopic) = &selector.subtopic {
        params.push(("subtopic", subtopic.clone()));
    }
    params
}

#[async_trait]
impl QuestionSource for RemoteQuestionSource {
    async fn fetch(&self, selector: &QuestionSelector) -> Result<Vec<Question>, LoadError> {
        let url = self.questions_url();
        debug!(%url, topic = %selector.topic, "Requesting questions");

        let mut request = self.client.get(&url).query(&query_params(selector));
        if let Some(token) = self.auth.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Prefer the server's own message when it sent one.
            if let Err(LoadError::Server(message)) = parse_questions(&body) {
                warn!(%status, %message, "Question service rejected request");
                return Err(LoadError::Server(message));
            }
            return Err(LoadError::HttpStatus(status));
        }

        parse_questions(&body)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::auth::AuthSession;
    use crate::models::Difficulty;

    /// Answer exactly one request with `status` and `body`, returning the
    /// request head that was received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
            String::from_utf8_lossy(&head).into_owned()
        });

        (base_url, server)
    }

    fn local_source(base_url: String, auth: AuthContext) -> RemoteQuestionSource {
        let client = Client::builder().no_proxy().build().unwrap();
        RemoteQuestionSource::with_client(base_url, auth, client)
    }

    fn selector() -> QuestionSelector {
        QuestionSelector::new("physics", Difficulty::Easy)
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_bearer_token() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"id": "1", "prompt": "?", "options": ["a", "b"], "correct_option": 1}]"#,
        )
        .await;
        let auth = AuthContext::signed_in(AuthSession::new("ana", Some("secret-token".to_string())));
        let source = local_source(base_url, auth);

        let questions = source.fetch(&selector()).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_option, 1);

        let head = server.await.unwrap().to_lowercase();
        assert!(head.starts_with("get /questions?topic=physics&difficulty=easy "));
        assert!(head.contains("authorization: bearer secret-token"));
    }

    #[tokio::test]
    async fn test_anonymous_fetch_sends_no_token() {
        let (base_url, server) = serve_once("200 OK", "[]").await;
        let source = local_source(base_url, AuthContext::anonymous());

        let questions = source.fetch(&selector()).await.unwrap();
        assert!(questions.is_empty());

        let head = server.await.unwrap().to_lowercase();
        assert!(!head.contains("authorization:"));
    }

    #[tokio::test]
    async fn test_error_body_becomes_server_error() {
        let (base_url, server) = serve_once("404 Not Found", r#"{"error": "unknown topic"}"#).await;
        let source = local_source(base_url, AuthContext::anonymous());

        let err = source.fetch(&selector()).await.unwrap_err();
        assert!(matches!(err, LoadError::Server(ref message) if message == "unknown topic"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_plain_failure_becomes_status_error() {
        let (base_url, server) = serve_once("500 Internal Server Error", "").await;
        let source = local_source(base_url, AuthContext::anonymous());

        let err = source.fetch(&selector()).await.unwrap_err();
        assert!(matches!(err, LoadError::HttpStatus(status) if status.as_u16() == 500));
        server.await.unwrap();
    }

    #[test]
    fn test_questions_url_trims_slash() {
        let source = RemoteQuestionSource::new("https://api.example.com/v1/", AuthContext::anonymous());
        assert_eq!(source.questions_url(), "https://api.example.com/v1/questions");
    }

    #[test]
    fn test_query_params() {
        let selector = QuestionSelector::new("biology", Difficulty::Hard).with_subtopic("cells");
        let params = query_params(&selector);
        assert_eq!(
            params,
            vec![
                ("topic", "biology".to_string()),
                ("difficulty", "hard".to_string()),
                ("subtopic", "cells".to_string()),
            ]
        );
    }
}
