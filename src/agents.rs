// ABOUTME: Structured requests to the text model
// ABOUTME: Extracts key sections from document text and writes image prompts per section

use crate::client::{ChatMessage, ChatRequest, TextModel};
use crate::errors::{DeckError, Result};
use crate::models::{ExtractedDocument, Section, VisualPrompt};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

/// Document text beyond this many characters is not sent for section extraction
pub const EXTRACTION_INPUT_LIMIT: usize = 25_000;

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract 3-7 key sections from this document that would be excellent for presentation slides.
For each section:
1. Create a clear title
2. Extract/summarize essential content (200-300 words max)
3. Rate importance (1-10)
4. Identify 3-5 key themes
5. List 3-7 visual elements for an image

Also provide:
- Document title
- Brief document summary (3-5 sentences)
- 3-5 overall themes

Focus on sections with clear visual potential that would work well for presentation slides.

Respond with a single JSON object of this shape:
{"document_title": string, "summary": string, "overall_themes": [string],
 "key_sections": [{"title": string, "content": string, "importance": integer,
                   "themes": [string], "visual_elements": [string]}]}"#;

const VISUAL_PROMPT_INSTRUCTIONS: &str = r#"Create a premium photorealistic image prompt for DALL-E 3.
Your prompt must:
1. Be highly detailed and specific
2. Specify photorealistic style (not cartoon/illustration)
3. Include lighting, perspective, atmosphere details
4. Focus on visual elements only (NO text/diagrams)
5. Be under 200 words

Also provide:
1. Style guidance: Photography/artistic styles
2. Elements to avoid: 3-5 things to exclude

IMPORTANT:
- NEVER include text in the image
- Focus on physical, tangible elements
- Create prompt for a SINGLE cohesive image

Respond with a single JSON object of this shape:
{"section_title": string, "prompt": string, "style_guidance": string,
 "avoid_elements": [string], "reference_section": string}"#;

static RE_JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*\n(.*?)\n?```\s*$").unwrap());

/// Ask the text model for the document's key sections
pub async fn extract_key_sections(model: &dyn TextModel, pdf_text: &str) -> Result<ExtractedDocument> {
    let input = truncate_for_extraction(pdf_text);
    info!(
        "Extracting key sections from {} characters of text",
        input.chars().count()
    );

    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(EXTRACTION_INSTRUCTIONS),
            ChatMessage::user(format!("Document Content:\n\n{}", input)),
        ],
        temperature: None,
        max_tokens: None,
        json_output: true,
    };

    let raw = model.complete(&request).await?;
    let document: ExtractedDocument = parse_json_payload(&raw)?;

    if document.key_sections.is_empty() {
        return Err(DeckError::ResponseFormatError(
            "model returned no key sections".to_string(),
        ));
    }

    info!(
        "Extracted {} key sections from \"{}\"",
        document.key_sections.len(),
        document.document_title
    );
    Ok(document)
}

/// Ask the text model for an image prompt describing one section
pub async fn create_visual_prompt(
    model: &dyn TextModel,
    section: &Section,
    document_title: &str,
) -> Result<VisualPrompt> {
    let input = format!(
        "Document Title: {}\n\nSection Title: {}\n\nSection Content:\n{}\n\nKey Themes: {}\n\nPotential Visual Elements: {}\n\nCreate a photorealistic prompt for this content.",
        document_title,
        section.title,
        section.content,
        section.themes.join(", "),
        section.visual_elements.join(", ")
    );

    let request = ChatRequest {
        messages: vec![
            ChatMessage::system(VISUAL_PROMPT_INSTRUCTIONS),
            ChatMessage::user(input),
        ],
        temperature: None,
        max_tokens: None,
        json_output: true,
    };

    let raw = model.complete(&request).await?;
    let mut prompt: VisualPrompt = parse_json_payload(&raw)?;

    if prompt.prompt.trim().is_empty() {
        return Err(DeckError::ResponseFormatError(format!(
            "empty image prompt for section \"{}\"",
            section.title
        )));
    }
    if prompt.section_title.trim().is_empty() {
        prompt.section_title = section.title.clone();
    }

    debug!("Visual prompt for \"{}\": {}", section.title, prompt.prompt);
    Ok(prompt)
}

/// Cut the document text down to what the extraction request accepts
pub fn truncate_for_extraction(text: &str) -> String {
    match text.char_indices().nth(EXTRACTION_INPUT_LIMIT) {
        Some((byte_idx, _)) => format!(
            "{}\n\n[Content truncated due to length]",
            &text[..byte_idx]
        ),
        None => text.to_string(),
    }
}

/// Deserialize a model answer, tolerating a surrounding ```json fence
pub fn parse_json_payload<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let trimmed = raw.trim();
    let body = RE_JSON_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    serde_json::from_str(body).map_err(|e| {
        DeckError::ResponseFormatError(format!("could not parse model output as JSON: {}", e))
    })
}
