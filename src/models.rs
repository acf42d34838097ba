// ABOUTME: Data model for the pdf2deck application
// ABOUTME: Documents, sections, prompts, images and slides passed between pipeline stages

use serde::{Deserialize, Serialize};
use std::fmt;

/// A topical unit extracted from the source document, slated for one slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub importance: u8,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub visual_elements: Vec<String>,
}

/// Structured result of key-section extraction for one PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub document_title: String,
    pub summary: String,
    pub key_sections: Vec<Section>,
    #[serde(default)]
    pub overall_themes: Vec<String>,
}

/// Prompt for the image-generation model, one per section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualPrompt {
    #[serde(default)]
    pub section_title: String,
    pub prompt: String,
    #[serde(default)]
    pub style_guidance: String,
    #[serde(default)]
    pub avoid_elements: Vec<String>,
    #[serde(default)]
    pub reference_section: String,
}

/// Normalised image embedded into slides: JPEG, base64-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub file_path: String,
    pub file_name: String,
    pub base64_data: String,
    pub width: u32,
    pub height: u32,
}

/// Bookkeeping for one generated (or placeholder) image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub section_index: usize,
    pub url: String,
    pub revised_prompt: Option<String>,
    pub is_placeholder: bool,
    pub file_path: String,
}

/// Visual arrangement of a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    Balanced,
    TextFocus,
    ImageFocus,
    Comparison,
}

impl LayoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Balanced => "balanced",
            LayoutKind::TextFocus => "text_focus",
            LayoutKind::ImageFocus => "image_focus",
            LayoutKind::Comparison => "comparison",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The final deliverable unit: one rendered slide per illustrated section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub section_index: usize,
    pub section_title: String,
    pub layout: LayoutKind,
    #[serde(default)]
    pub bullets: Vec<String>,
    /// Bullets joined with ", ", or a content excerpt when there are none
    pub section_content: String,
    pub html_content: String,
    pub image: ImageInfo,
}

/// Brand palette shared by the HTML and PPTX renderers
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
    pub light_text: &'static str,
    pub background: &'static str,
    pub slide_bg: &'static str,
    pub card_bg: &'static str,
}

pub const BRAND_PALETTE: Palette = Palette {
    primary: "#E20015",
    secondary: "#007BC0",
    accent: "#00884A",
    text: "#333333",
    light_text: "#7D7D7D",
    background: "#FFFFFF",
    slide_bg: "#FFFFFF",
    card_bg: "#F5F5F5",
};

impl Default for Palette {
    fn default() -> Self {
        BRAND_PALETTE
    }
}
