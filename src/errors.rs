// ABOUTME: Error types for the pdf2deck application
// ABOUTME: Provides structured error handling for each stage of the pipeline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read or write file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("PDF text extraction failed: {0}")]
    ExtractionError(String),

    #[error("Model service error ({service}): {message}")]
    ServiceError { service: String, message: String },

    #[error("Unexpected model response: {0}")]
    ResponseFormatError(String),

    #[error("Image processing error: {0}")]
    ImageError(String),

    #[error("HTML generation error: {0}")]
    HtmlError(String),

    #[error("PPTX generation error: {0}")]
    PptxError(String),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Template file not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("XML error: {0}")]
    XmlError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("No slides could be produced from the document")]
    NoSlidesProduced,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our DeckError
impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::UnknownError(err.to_string())
    }
}

// Implement conversion from zip errors
impl From<zip::result::ZipError> for DeckError {
    fn from(err: zip::result::ZipError) -> Self {
        DeckError::PptxError(format!("ZIP operation failed: {}", err))
    }
}

impl From<image::ImageError> for DeckError {
    fn from(err: image::ImageError) -> Self {
        DeckError::ImageError(err.to_string())
    }
}

impl From<quick_xml::Error> for DeckError {
    fn from(err: quick_xml::Error) -> Self {
        DeckError::XmlError(err.to_string())
    }
}

impl From<url::ParseError> for DeckError {
    fn from(err: url::ParseError) -> Self {
        DeckError::ConfigError(format!("Invalid endpoint URL: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;

/// Pipeline stage at which a single section was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStage {
    VisualPrompt,
    ImageSave,
    Slide,
}

/// A non-fatal failure for one section. The run continues without it.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("Section {section_index} dropped at {stage:?}: {detail}")]
pub struct SectionFailure {
    pub section_index: usize,
    pub stage: SectionStage,
    pub detail: String,
}
