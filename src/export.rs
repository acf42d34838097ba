// ABOUTME: Common contract for deck exporters and the HTML zip exporter
// ABOUTME: Resolves export bullets and images from slides, with markup fallbacks

use crate::errors::Result;
use crate::html::{extract_bullet_texts, extract_embedded_image, slides_to_zip};
use crate::images::decode_base64;
use crate::models::{ExtractedDocument, Slide};
use log::warn;

/// Turns finished slides into a downloadable file
pub trait DeckExporter {
    fn export(&self, slides: &[Slide], document: &ExtractedDocument) -> Result<Vec<u8>>;
}

/// Zip archive with one HTML document per slide
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlZipExporter;

impl DeckExporter for HtmlZipExporter {
    fn export(&self, slides: &[Slide], _document: &ExtractedDocument) -> Result<Vec<u8>> {
        slides_to_zip(slides)
    }
}

/// Bullets to place on an exported slide.
///
/// The structured list wins; older manifests without one fall back to the
/// condensed content, then to the rendered markup.
pub fn export_bullets(slide: &Slide) -> Vec<String> {
    if !slide.bullets.is_empty() {
        return slide.bullets.clone();
    }

    let from_content: Vec<String> = slide
        .section_content
        .split(", ")
        .map(|point| point.trim().to_string())
        .filter(|point| !point.is_empty())
        .collect();
    if !from_content.is_empty() {
        return from_content;
    }

    extract_bullet_texts(&slide.html_content)
}

/// Encoded JPEG bytes for an exported slide, or `None` when no usable image exists
pub fn export_image(slide: &Slide) -> Option<Vec<u8>> {
    let data = if slide.image.base64_data.trim().is_empty() {
        extract_embedded_image(&slide.html_content)?
    } else {
        slide.image.base64_data.clone()
    };

    match decode_base64(&data) {
        Ok(bytes) if !bytes.is_empty() => Some(bytes),
        Ok(_) => None,
        Err(e) => {
            warn!("Slide \"{}\" has unreadable image data: {}", slide.title, e);
            None
        }
    }
}
