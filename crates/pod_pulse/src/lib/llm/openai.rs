use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::{Summarizer, Transcriber};

#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Cannot summarize an empty transcript")]
    EmptyInput,
    #[error("Transcription returned no text")]
    EmptyTranscript,
    #[error("Model returned an empty summary")]
    EmptySummary,
}

impl OpenAIClient {
    const SYSTEM_PROMPT: &'static str = include_str!("./prompts/summary_system.txt");

    pub fn new(api_key: impl Into<String>) -> Self {
        // Transcribing a full episode takes a while, but the wait must stay
        // bounded.
        let client = Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub async fn send_transcribe_request(
        &self,
        file: impl Into<PathBuf>,
        model_name: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<TranscriptionResponse, OpenAIError> {
        let audio_path = file.into();

        let file_name = audio_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("episode.mp3")
            .to_string();
        let bytes = tokio::fs::read(&audio_path).await?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;

        let form = reqwest::multipart::Form::new()
            .text("model", model_name.into())
            .text("language", language.into())
            .part("file", part);

        let resp = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<TranscriptionResponse>().await?)
    }

    pub async fn send_completion_request(
        &self,
        model_name: impl Into<String>,
        user_content: impl Into<String>,
    ) -> Result<CompletionResponse, OpenAIError> {
        let body = serde_json::json!({
            "model": model_name.into(),
            "temperature": 0.2,
            "messages": [
                {
                    "role": "system",
                    "content": Self::SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": user_content.into()
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
}

impl Transcriber for OpenAIClient {
    type Error = OpenAIError;

    async fn transcribe(
        &self,
        audio_path: &Path,
        model: &str,
        language: &str,
    ) -> Result<String, Self::Error> {
        let response = self
            .send_transcribe_request(audio_path, model, language)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to transcribe audio"))?;

        let text = response.text.trim().to_string();
        if text.is_empty() {
            return Err(OpenAIError::EmptyTranscript);
        }
        Ok(text)
    }
}

impl Summarizer for OpenAIClient {
    type Error = OpenAIError;

    async fn summarize(&self, transcript: &str, model: &str) -> Result<String, Self::Error> {
        if transcript.trim().is_empty() {
            return Err(OpenAIError::EmptyInput);
        }

        let user_content = format!(
            "Summarize this podcast transcript into chapters.\n\nTranscript:\n{transcript}"
        );
        let response = self
            .send_completion_request(model, user_content)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(|content| content.trim().to_string())
            .filter(|summary| !summary.is_empty())
            .ok_or(OpenAIError::EmptySummary)
    }
}
