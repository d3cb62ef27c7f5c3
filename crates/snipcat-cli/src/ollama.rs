//! Ollama-backed external classifier.
//!
//! Sends one non-streaming `POST {endpoint}/api/generate` per attempt. The
//! prompt lists the candidate category names, then their definitions, and
//! asks for the name only; the snippet is passed as context.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use snipcat_core::config::ClassifierConfig;
use snipcat_core::{ClassificationRequest, ClassifierError, ExternalClassifier};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Build the prompt for one classification request.
pub fn build_prompt(request: &ClassificationRequest<'_>) -> String {
    let mut question = String::from("I need to sort code examples into one of these categories:\n");
    for (name, _) in request.candidate_definitions() {
        question.push_str(name);
        question.push('\n');
    }
    question.push_str("Use these definitions for each category to help categorize the code example:\n");
    for (name, definition) in request.candidate_definitions() {
        question.push_str(&format!("{name}: {definition}\n"));
    }
    question.push_str(
        "Using these definitions, which category applies to this code example? \
         Don't list an explanation, only list the category name.",
    );

    format!(
        "Use the following pieces of context to answer the question at the end.\n\
         Context: {}\n\
         Question: {}",
        request.content, question
    )
}

/// Extract the answer text from a `/api/generate` response body.
pub fn parse_response(body: &str) -> Result<String, ClassifierError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| ClassifierError::Malformed(e.to_string()))?;
    parsed
        .response
        .ok_or_else(|| ClassifierError::Malformed("missing 'response' field".to_string()))
}

pub struct OllamaClassifier {
    client: Client,
    url: String,
    model: String,
    timeout: Duration,
}

impl OllamaClassifier {
    pub fn new(config: &ClassifierConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}/api/generate", config.endpoint.trim_end_matches('/')),
            model: config.model.clone(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn map_error(&self, e: reqwest::Error) -> ClassifierError {
        if e.is_timeout() {
            ClassifierError::Timeout(self.timeout)
        } else if e.is_connect() {
            ClassifierError::Unavailable(e.to_string())
        } else if e.is_decode() || e.is_body() {
            ClassifierError::Malformed(e.to_string())
        } else {
            ClassifierError::Unavailable(e.to_string())
        }
    }
}

impl ExternalClassifier for OllamaClassifier {
    fn classify(&self, request: &ClassificationRequest<'_>) -> Result<String, ClassifierError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: build_prompt(request),
            stream: false,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        let text = response.text().map_err(|e| self.map_error(e))?;
        if !status.is_success() {
            return Err(ClassifierError::Http {
                status: status.as_u16(),
                message: text,
            });
        }
        parse_response(&text)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
