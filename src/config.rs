// ABOUTME: Configuration module for the pdf2deck application
// ABOUTME: Provides model service settings and environment variable handling

use crate::errors::{DeckError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_API_VERSION: &str = "2024-02-01";
pub const DEFAULT_IMAGE_DEPLOYMENT: &str = "dall-e-3";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// Connection settings for one hosted model deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceSettings {
    pub api_key: String,
    pub endpoint: String,
    pub deployment: String,
    pub api_version: String,
}

impl ServiceSettings {
    /// Build the URL for an operation under this deployment,
    /// e.g. `chat/completions` or `images/generations`.
    pub fn operation_url(&self, operation: &str) -> Result<Url> {
        if self.endpoint.trim().is_empty() {
            return Err(DeckError::ConfigError("endpoint is not set".to_string()));
        }
        if self.deployment.trim().is_empty() {
            return Err(DeckError::ConfigError("deployment is not set".to_string()));
        }

        let base = Url::parse(&format!("{}/", self.endpoint.trim_end_matches('/')))?;
        let mut url = base.join(&format!(
            "openai/deployments/{}/{}",
            self.deployment.trim(),
            operation
        ))?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    /// Check that every field needed for a request is present
    pub fn validate(&self, service: &str) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(DeckError::ConfigError(format!("{} API key is not set", service)));
        }
        self.operation_url("validate").map(|_| ())
    }
}

/// Configuration for one client session
#[derive(Debug, Clone)]
pub struct Config {
    pub text: ServiceSettings,
    pub image: ServiceSettings,
    pub images_folder: PathBuf,
    pub image_size: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text: ServiceSettings {
                api_version: DEFAULT_API_VERSION.to_string(),
                ..ServiceSettings::default()
            },
            image: ServiceSettings {
                deployment: DEFAULT_IMAGE_DEPLOYMENT.to_string(),
                api_version: DEFAULT_API_VERSION.to_string(),
                ..ServiceSettings::default()
            },
            images_folder: default_images_folder(),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let text = ServiceSettings {
            api_key: env::var("AZURE_OPENAI_API_KEY").unwrap_or_default(),
            endpoint: env::var("AZURE_OPENAI_ENDPOINT").unwrap_or_default(),
            deployment: env::var("AZURE_OPENAI_DEPLOYMENT").unwrap_or_default(),
            api_version: env::var("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
        };

        let image = ServiceSettings {
            api_key: env::var("DALLE_API_KEY").unwrap_or_default(),
            endpoint: env::var("DALLE_ENDPOINT").unwrap_or_default(),
            deployment: env::var("DALLE_DEPLOYMENT")
                .unwrap_or_else(|_| DEFAULT_IMAGE_DEPLOYMENT.to_string()),
            api_version: env::var("DALLE_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
        };

        let images_folder = env::var("IMAGES_FOLDER")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_images_folder);

        let image_size =
            env::var("IMAGE_SIZE").unwrap_or_else(|_| DEFAULT_IMAGE_SIZE.to_string());

        Self {
            text,
            image,
            images_folder,
            image_size,
        }
    }

    /// Replace the text model settings
    pub fn with_text_settings(mut self, settings: ServiceSettings) -> Self {
        self.text = settings;
        self
    }

    /// Replace the image model settings
    pub fn with_image_settings(mut self, settings: ServiceSettings) -> Self {
        self.image = settings;
        self
    }

    /// Point saved images at another folder
    pub fn with_images_folder(mut self, folder: PathBuf) -> Self {
        self.images_folder = folder;
        self
    }

    /// Parse the configured image size ("WIDTHxHEIGHT")
    pub fn image_dimensions(&self) -> Result<(u32, u32)> {
        parse_image_size(&self.image_size)
    }
}

/// Parse a "1024x1024" style size string
pub fn parse_image_size(size: &str) -> Result<(u32, u32)> {
    let invalid = || DeckError::ConfigError(format!("Invalid image size: {}", size));
    let (w, h) = size.trim().split_once('x').ok_or_else(invalid)?;
    let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

fn default_images_folder() -> PathBuf {
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("generated_images")
}
