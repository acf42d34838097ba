// ABOUTME: Adapters for the hosted text and image generation services
// ABOUTME: Defines the model traits and their Azure OpenAI HTTP implementations

use crate::config::ServiceSettings;
use crate::errors::{DeckError, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// One chat turn sent to the text model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A completion request
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask the service to answer with a single JSON object
    pub json_output: bool,
}

/// Raw result of an image generation call
#[derive(Debug, Clone)]
pub struct RemoteImage {
    pub bytes: Vec<u8>,
    pub url: String,
    pub revised_prompt: Option<String>,
}

#[async_trait]
pub trait TextModel: Send + Sync {
    /// Run a chat completion and return the assistant's text
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Generate one image for the prompt at `size` ("WIDTHxHEIGHT")
    async fn generate(&self, prompt: &str, size: &str) -> Result<RemoteImage>;
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageGenerationBody<'a> {
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

#[derive(Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageGenerationData>,
}

#[derive(Deserialize)]
struct ImageGenerationData {
    url: Option<String>,
    revised_prompt: Option<String>,
}

/// Chat completions against an Azure OpenAI deployment
pub struct AzureChatClient {
    http: Client,
    settings: ServiceSettings,
}

impl AzureChatClient {
    pub fn new(settings: ServiceSettings) -> Result<Self> {
        settings.validate("text model")?;
        Ok(Self {
            http: Client::new(),
            settings,
        })
    }
}

#[async_trait]
impl TextModel for AzureChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = self.settings.operation_url("chat/completions")?;
        let body = ChatCompletionBody {
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_output.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        debug!("Sending chat completion to {}", url.path());
        let response = self
            .http
            .post(url)
            .header("api-key", &self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DeckError::ServiceError {
                service: "text".to_string(),
                message: format!("HTTP {}: {}", status, detail),
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                DeckError::ResponseFormatError("chat completion had no content".to_string())
            })
    }
}

/// Image generations against an Azure OpenAI deployment
pub struct AzureImageClient {
    http: Client,
    settings: ServiceSettings,
}

impl AzureImageClient {
    /// Incomplete settings are reported on each request, so a run without an
    /// image deployment still produces slides with placeholder images.
    pub fn new(settings: ServiceSettings) -> Self {
        if let Err(e) = settings.validate("image model") {
            warn!("{}; every slide will use a placeholder image", e);
        }
        Self {
            http: Client::new(),
            settings,
        }
    }

    /// Download the generated image from the URL the service returned
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!("Fetching generated image: {}", url);
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(DeckError::ServiceError {
                service: "image".to_string(),
                message: format!("HTTP {} downloading image", response.status()),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageModel for AzureImageClient {
    async fn generate(&self, prompt: &str, size: &str) -> Result<RemoteImage> {
        self.settings.validate("image model")?;
        let url = self.settings.operation_url("images/generations")?;
        let body = ImageGenerationBody { prompt, n: 1, size };

        let response = self
            .http
            .post(url)
            .header("api-key", &self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DeckError::ServiceError {
                service: "image".to_string(),
                message: format!("HTTP {}: {}", status, detail),
            });
        }

        let parsed: ImageGenerationResponse = response.json().await?;
        let first = parsed.data.into_iter().next().ok_or_else(|| {
            DeckError::ResponseFormatError("image generation returned no data".to_string())
        })?;
        let image_url = first.url.ok_or_else(|| {
            DeckError::ResponseFormatError("image generation returned no URL".to_string())
        })?;

        let bytes = self.fetch(&image_url).await?;
        Ok(RemoteImage {
            bytes,
            url: image_url,
            revised_prompt: first.revised_prompt,
        })
    }
}
