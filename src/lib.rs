// ABOUTME: Library module for the pdf2deck program.
// ABOUTME: Turns PDF text into AI-illustrated HTML slides and PowerPoint decks.

pub mod agents;
pub mod bullets;
pub mod client;
pub mod config;
pub mod errors;
pub mod export;
pub mod html;
pub mod images;
pub mod layout;
pub mod models;
pub mod ooxml;
pub mod pdf;
pub mod pipeline;
pub mod pptx;
pub mod progress;
pub mod resources;
pub mod serve;
pub mod template;
pub mod utils;

// Reexport common types and functions
pub use client::{AzureChatClient, AzureImageClient, ChatRequest, ImageModel, TextModel};
pub use config::{Config, ServiceSettings};
pub use errors::{DeckError, Result, SectionFailure, SectionStage};
pub use export::{DeckExporter, HtmlZipExporter};
pub use html::{slides_to_zip, write_html_to_file, SlideAssembler};
pub use layout::classify;
pub use models::{ExtractedDocument, ImageInfo, LayoutKind, Section, Slide, VisualPrompt};
pub use pipeline::{process_pdf_to_presentation, process_text_to_presentation, Clients, RunContext};
pub use pptx::{generate_pptx, BlankCanvasExporter};
pub use progress::{LogProgress, NoProgress, PipelineStep, ProgressReporter, StepStatus};
pub use resources::Logo;
pub use serve::DeckServer;
pub use template::{apply_template, TemplateExporter, TemplateSource};

#[cfg(test)]
mod tests;
