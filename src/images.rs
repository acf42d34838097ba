// ABOUTME: Image generation, placeholder fallback and local storage
// ABOUTME: Turns prompts into images, saves them and prepares embeddable JPEG data

use crate::client::ImageModel;
use crate::config::parse_image_size;
use crate::errors::{DeckError, Result};
use crate::models::ImageInfo;
use crate::utils;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Longest side of images embedded into slides
pub const MAX_EMBED_DIMENSION: u32 = 1200;
pub const EMBED_JPEG_QUALITY: u8 = 85;

pub const PLACEHOLDER_URL: &str = "placeholder_image_url";
const PLACEHOLDER_REVISED_PROMPT: &str = "Placeholder image due to API error";

/// An image ready to be saved, either generated or a placeholder
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub image: DynamicImage,
    pub url: String,
    pub revised_prompt: Option<String>,
    pub is_placeholder: bool,
}

/// Where a saved image ended up
#[derive(Debug, Clone, PartialEq)]
pub struct SavedImage {
    pub file_path: PathBuf,
    pub file_name: String,
}

/// Generate an image for a prompt.
///
/// Service or decoding failures are absorbed: a gradient placeholder derived
/// from the prompt text is returned instead.
pub async fn generate_image_from_prompt(
    model: &dyn ImageModel,
    prompt: &str,
    size: &str,
) -> GeneratedImage {
    let generated = match model.generate(prompt, size).await {
        Ok(remote) => image::load_from_memory(&remote.bytes)
            .map(|image| GeneratedImage {
                image,
                url: remote.url,
                revised_prompt: remote.revised_prompt,
                is_placeholder: false,
            })
            .map_err(DeckError::from),
        Err(e) => Err(e),
    };

    generated.unwrap_or_else(|e| {
        warn!("Image generation failed: {}", e);
        let (width, height) = parse_image_size(size).unwrap_or((1024, 1024));
        GeneratedImage {
            image: DynamicImage::ImageRgb8(placeholder_gradient(prompt, width, height)),
            url: PLACEHOLDER_URL.to_string(),
            revised_prompt: Some(PLACEHOLDER_REVISED_PROMPT.to_string()),
            is_placeholder: true,
        }
    })
}

/// Deterministic color from the sum of the text's code points
pub fn color_from_text(text: &str) -> Rgb<u8> {
    let hash: u64 = text.chars().map(|c| c as u64).sum();
    Rgb([
        ((hash * 123) % 256) as u8,
        ((hash * 456) % 256) as u8,
        ((hash * 789) % 256) as u8,
    ])
}

/// Gradient placeholder: red runs along x, green along y, blue along the diagonal.
/// The start color comes from the prompt's first 10 characters, the end color from its last 10.
pub fn placeholder_gradient(prompt: &str, width: u32, height: u32) -> RgbImage {
    let chars: Vec<char> = prompt.chars().collect();
    let head: String = chars.iter().take(10).collect();
    let tail: String = if chars.len() > 10 {
        chars[chars.len() - 10..].iter().collect()
    } else {
        prompt.to_string()
    };

    let start = color_from_text(&head);
    let end = color_from_text(&tail);
    let (w, h) = (width as f64, height as f64);

    RgbImage::from_fn(width, height, |x, y| {
        let (x, y) = (x as f64, y as f64);
        let diagonal = (x + y) / (w + h);
        let r = start[0] as f64 * (w - x) / w + end[0] as f64 * x / w;
        let g = start[1] as f64 * (h - y) / h + end[1] as f64 * y / h;
        let b = start[2] as f64 * (1.0 - diagonal) + end[2] as f64 * diagonal;
        Rgb([r as u8, g as u8, b as u8])
    })
}

/// Replace anything that is not alphanumeric with '_'
pub fn clean_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Save an image as PNG under a timestamped, index-qualified name
pub fn save_image_locally(
    image: &DynamicImage,
    section_title: &str,
    index: usize,
    images_folder: &Path,
) -> Result<SavedImage> {
    utils::ensure_directory_exists(images_folder)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let file_name = format!("{}_{}_{}.png", timestamp, index, clean_title(section_title));
    let file_path = images_folder.join(&file_name);

    image.save_with_format(&file_path, ImageFormat::Png)?;
    info!("Saved image {:?}", file_path);

    Ok(SavedImage {
        file_path,
        file_name,
    })
}

/// Prepare an image for embedding: flatten transparency onto white,
/// shrink to fit [`MAX_EMBED_DIMENSION`], encode as JPEG and base64 it.
pub fn load_image_info(image: &DynamicImage, saved: &SavedImage) -> Result<ImageInfo> {
    let mut rgb = flatten_on_white(image);

    let (width, height) = rgb.dimensions();
    if width > MAX_EMBED_DIMENSION || height > MAX_EMBED_DIMENSION {
        let (new_width, new_height) = if width > height {
            (
                MAX_EMBED_DIMENSION,
                (height as f64 * MAX_EMBED_DIMENSION as f64 / width as f64) as u32,
            )
        } else {
            (
                (width as f64 * MAX_EMBED_DIMENSION as f64 / height as f64) as u32,
                MAX_EMBED_DIMENSION,
            )
        };
        rgb = DynamicImage::ImageRgb8(rgb)
            .resize_exact(new_width.max(1), new_height.max(1), FilterType::Lanczos3)
            .to_rgb8();
    }

    let jpeg = encode_jpeg(&rgb)?;
    Ok(ImageInfo {
        file_path: saved.file_path.to_string_lossy().to_string(),
        file_name: saved.file_name.clone(),
        base64_data: STANDARD.encode(jpeg),
        width: rgb.width(),
        height: rgb.height(),
    })
}

fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let px = rgba.get_pixel(x, y);
        let alpha = px[3] as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(px[0]), blend(px[1]), blend(px[2])])
    })
}

fn encode_jpeg(rgb: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, EMBED_JPEG_QUALITY);
        encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)?;
    }
    Ok(buffer)
}

/// Decode base64 image data back into bytes
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(data.trim())
        .map_err(|e| DeckError::ImageError(format!("invalid base64 image data: {}", e)))
}
