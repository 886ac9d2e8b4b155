//! Sends neuron prompts to a chat-completion API and collects the answers.

use std::cell::OnceCell;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ORG_VAR: &str = "OPENAI_ORG";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Anything that turns a prompt into a completion.
pub trait CompletionService {
    fn complete(&self, model: &str, prompt: &str) -> Result<String>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub organization: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolves both variables through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let fetch = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.is_empty())
                .ok_or(Error::MissingCredential(var))
        };
        Ok(Self {
            api_key: fetch(API_KEY_VAR)?,
            organization: fetch(ORG_VAR)?,
        })
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
    top_p: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

fn request_body<'a>(model: &'a str, prompt: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: [ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature: 0.0,
        top_p: 1.0,
    }
}

fn first_choice(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or(Error::EmptyCompletion)
}

/// Blocking chat-completions client. Credentials are read on the first query.
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    credentials: OnceCell<Credentials>,
}

impl OpenAiClient {
    pub fn new() -> Self {
        let base_url = std::env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: OnceCell::new(),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = OnceCell::from(credentials);
        self
    }

    fn credentials(&self) -> Result<&Credentials> {
        if let Some(c) = self.credentials.get() {
            return Ok(c);
        }
        let loaded = Credentials::from_env()?;
        Ok(self.credentials.get_or_init(|| loaded))
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionService for OpenAiClient {
    fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        let credentials = self.credentials()?;
        let url = format!("{}/chat/completions", self.base_url);
        debug!(%url, model, prompt_len = prompt.len(), "requesting completion");

        let response: ChatResponse = self
            .http
            .post(&url)
            .bearer_auth(&credentials.api_key)
            .header("OpenAI-Organization", &credentials.organization)
            .json(&request_body(model, prompt))
            .send()?
            .error_for_status()?
            .json()?;
        first_choice(response)
    }
}

/// Queries `service` once per prompt, keeping prompt order. Stops at the first failure.
pub fn explain_all<S: CompletionService + ?Sized>(service: &S, model: &str, prompts: &[String]) -> Result<Vec<String>> {
    let mut explanations = Vec::with_capacity(prompts.len());
    for (i, prompt) in prompts.iter().enumerate() {
        let answer = service.complete(model, prompt)?;
        info!(neuron = i + 1, total = prompts.len(), "explanation received");
        explanations.push(answer);
    }
    Ok(explanations)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct Echo {
        seen: RefCell<Vec<String>>,
    }

    impl CompletionService for Echo {
        fn complete(&self, model: &str, prompt: &str) -> Result<String> {
            self.seen.borrow_mut().push(model.to_string());
            Ok(format!("explained: {prompt}"))
        }
    }

    struct FailsOnSecond {
        calls: RefCell<usize>,
    }

    impl CompletionService for FailsOnSecond {
        fn complete(&self, _model: &str, _prompt: &str) -> Result<String> {
            *self.calls.borrow_mut() += 1;
            if *self.calls.borrow() == 2 { Err(Error::EmptyCompletion) } else { Ok("ok".into()) }
        }
    }

    #[test]
    fn answers_keep_prompt_order() {
        let service = Echo { seen: RefCell::new(Vec::new()) };
        let prompts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let answers = explain_all(&service, "gpt-4", &prompts).unwrap();
        assert_eq!(answers, vec!["explained: a", "explained: b", "explained: c"]);
        assert_eq!(service.seen.borrow().as_slice(), ["gpt-4", "gpt-4", "gpt-4"]);
    }

    #[test]
    fn no_prompts_no_calls() {
        let service = Echo { seen: RefCell::new(Vec::new()) };
        assert!(explain_all(&service, "m", &[]).unwrap().is_empty());
        assert!(service.seen.borrow().is_empty());
    }

    #[test]
    fn first_failure_stops_the_run() {
        let service = FailsOnSecond { calls: RefCell::new(0) };
        let prompts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert!(matches!(explain_all(&service, "m", &prompts), Err(Error::EmptyCompletion)));
        assert_eq!(*service.calls.borrow(), 2);
    }

    #[test]
    fn missing_credentials_are_named() {
        let err = Credentials::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, Error::MissingCredential(API_KEY_VAR)));

        let only_key = |var: &str| (var == API_KEY_VAR).then(|| "sk-test".to_string());
        let err = Credentials::from_lookup(only_key).unwrap_err();
        assert!(matches!(err, Error::MissingCredential(ORG_VAR)));

        let empty = |_: &str| Some(String::new());
        assert!(Credentials::from_lookup(empty).is_err());
    }

    #[test]
    fn request_body_shape() {
        let json = serde_json::to_value(request_body("gpt-4", "hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gpt-4",
                "messages": [{"role": "user", "content": "hello"}],
                "temperature": 0.0,
                "top_p": 1.0,
            })
        );
    }

    #[test]
    fn reply_takes_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"fires on defection"}},
                           {"message":{"role":"assistant","content":"other"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(response).unwrap(), "fires on defection");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_choice(empty), Err(Error::EmptyCompletion)));
    }

    #[test]
    fn explicit_credentials_skip_the_environment() {
        let creds = Credentials {
            api_key: "k".into(),
            organization: "o".into(),
        };
        let client = OpenAiClient::with_base_url("http://localhost:1/v1/").with_credentials(creds.clone());
        assert_eq!(client.credentials().unwrap(), &creds);
        assert_eq!(client.base_url, "http://localhost:1/v1");
    }
}
