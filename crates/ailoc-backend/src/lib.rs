//! Translation backend boundary: a driver turns (text, source lang, target
//! lang, format) into translated text or a recoverable error. Failures here
//! are per-job signals for the orchestrator, never a run abort.

use std::time::Duration;

use ailoc_core::TranslationFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("unsupported translation driver `{0}`")]
    UnsupportedDriver(String),
    #[error("API key for driver `{0}` is not set")]
    MissingApiKey(String),
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("backend response contained no completion")]
    EmptyResponse,
}

/// Capability expected by the orchestrator. Implementations must report
/// failure through the error type so the run can continue with the next job.
pub trait Translator {
    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        format: TranslationFormat,
    ) -> Result<String, TranslateError>;
}

/// Explicit backend configuration, passed in at construction. No ambient
/// lookup happens inside the drivers.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub api_url: String,
    pub timeout: Duration,
}

/// Map a configured driver name to a concrete translator.
pub fn create_translator(
    driver: &str,
    cfg: &BackendConfig,
) -> Result<Box<dyn Translator>, TranslateError> {
    match driver {
        "chatgpt" => Ok(Box::new(ChatGptTranslator::new(cfg)?)),
        other => Err(TranslateError::UnsupportedDriver(other.to_string())),
    }
}

const SYSTEM_PROMPT: &str = "You are a professional translator. Translate the text \
exactly as provided, maintaining all formatting, placeholders, and structure.";

pub struct ChatGptTranslator {
    api_key: String,
    model: String,
    temperature: f32,
    api_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl ChatGptTranslator {
    pub fn new(cfg: &BackendConfig) -> Result<Self, TranslateError> {
        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| TranslateError::MissingApiKey("chatgpt".to_string()))?;
        let client = reqwest::blocking::Client::builder()
            .user_agent("ailoc/cli")
            .timeout(cfg.timeout)
            .build()?;
        Ok(Self {
            api_key,
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            api_url: cfg.api_url.clone(),
            client,
        })
    }

    fn request_once(&self, prompt: &str) -> Result<String, TranslateError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };
        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: ChatResponse = resp.json()?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(TranslateError::EmptyResponse)
    }
}

impl Translator for ChatGptTranslator {
    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        format: TranslationFormat,
    ) -> Result<String, TranslateError> {
        let prompt = build_prompt(text, source_lang, target_lang, format);
        debug!(model = %self.model, %source_lang, %target_lang, format = format.tag(), "backend request");
        match self.request_once(&prompt) {
            Err(TranslateError::Transport(e)) if e.is_timeout() || e.is_connect() => {
                // One retry on a transient transport failure, then give up.
                warn!(error = %e, "transient backend failure, retrying once");
                self.request_once(&prompt)
            }
            other => other,
        }
    }
}

pub fn build_prompt(
    text: &str,
    source_lang: &str,
    target_lang: &str,
    format: TranslationFormat,
) -> String {
    let format_instructions = match format {
        TranslationFormat::Json => {
            "This is a JSON file. Maintain the exact JSON structure. Don't translate keys, \
             only translate values. Keep all placeholders like :name, {name}, etc. intact."
        }
        TranslationFormat::PhpArray => {
            "This is a PHP array. Maintain the exact PHP array structure. Don't translate \
             array keys, only translate values. Keep all placeholders like :name, {name}, \
             etc. intact."
        }
        TranslationFormat::Plain => {
            "Translate the text. Keep all placeholders like :name, {name}, etc. intact."
        }
    };
    format!(
        "Translate the following text from {source_lang} to {target_lang}.\n\
         {format_instructions}\n\nTEXT TO TRANSLATE:\n{text}"
    )
}
