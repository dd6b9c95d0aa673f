use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str =
    "You are an assistant describing a QA engineer's portfolio. Answer concisely.";
const TEMPERATURE: f32 = 0.6;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Why a remote answer was not available. Callers fall back to the local
/// responder on every variant; the distinction only feeds the logs.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("no API key configured")]
    MissingCredential,
    #[error("completion endpoint returned {0}")]
    Status(StatusCode),
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion response carried no answer text")]
    EmptyAnswer,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<RequestMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct RequestMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAIClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        let mut client = Self {
            client: Client::new(),
            api_key: None,
            model: model.into(),
        };
        if let Some(key) = api_key {
            client.set_api_key(&key);
        }
        client
    }

    /// Replace the in-memory credential. Whitespace is trimmed; an empty
    /// value clears the credential entirely.
    pub fn set_api_key(&mut self, key: &str) {
        let key = key.trim();
        self.api_key = if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        };
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One request, no retries. The credential check happens before any
    /// network I/O.
    pub async fn answer(&self, message: &str) -> Result<String, RemoteError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(RemoteError::MissingCredential);
        };

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                RequestMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                RequestMessage {
                    role: "user",
                    content: message.to_string(),
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Status(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        extract_answer(body)
    }
}

fn extract_answer(body: ChatResponse) -> Result<String, RemoteError> {
    body.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(RemoteError::EmptyAnswer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_credential_short_circuits_before_any_request() {
        let client = OpenAIClient::new(None, DEFAULT_MODEL);
        let result = client.answer("what projects have you done?").await;
        assert!(matches!(result, Err(RemoteError::MissingCredential)));
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let client = OpenAIClient::new(Some("   ".to_string()), DEFAULT_MODEL);
        assert!(!client.has_credential());

        let mut client = OpenAIClient::new(None, DEFAULT_MODEL);
        client.set_api_key("  sk-test  ");
        assert!(client.has_credential());
    }

    #[test]
    fn extract_answer_reads_the_first_choice() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "Hello."}},
                            {"message": {"role": "assistant", "content": "Ignored."}}]}"#,
        )
        .expect("response body should deserialize");

        assert_eq!(extract_answer(body).expect("answer expected"), "Hello.");
    }

    #[test]
    fn extract_answer_rejects_empty_bodies() {
        let no_choices: ChatResponse = serde_json::from_str(r#"{"choices": []}"#)
            .expect("response body should deserialize");
        assert!(matches!(
            extract_answer(no_choices),
            Err(RemoteError::EmptyAnswer)
        ));

        let blank_content: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "  "}}]}"#)
                .expect("response body should deserialize");
        assert!(matches!(
            extract_answer(blank_content),
            Err(RemoteError::EmptyAnswer)
        ));

        // `content` absent entirely, as some error payloads look like.
        let missing_field: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant"}}]}"#)
                .expect("response body should deserialize");
        assert!(matches!(
            extract_answer(missing_field),
            Err(RemoteError::EmptyAnswer)
        ));
    }
}
