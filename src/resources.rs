// ABOUTME: Resource handling for the pdf2deck application
// ABOUTME: Locates the organization logo and default PowerPoint template on disk

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::io::Reader as ImageReader;
use log::{info, warn};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// 1x1 transparent PNG used when no logo is available
pub const TRANSPARENT_PIXEL_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

pub const LOGO_CANDIDATES: [&str; 3] = ["logo.png", "static/logo.png", "assets/logo.png"];

pub const TEMPLATE_CANDIDATES: [&str; 3] = [
    "template.pptx",
    "templates/template.pptx",
    "static/template.pptx",
];

/// Return the first candidate (relative to `base_dir`) that exists as a file
pub fn find_first_existing(base_dir: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|candidate| base_dir.join(candidate))
        .find(|path| path.is_file())
}

/// Look for a company logo in the usual places
pub fn find_logo(base_dir: &Path) -> Option<PathBuf> {
    find_first_existing(base_dir, &LOGO_CANDIDATES)
}

/// Look for an organization template in the usual places
pub fn find_default_template(base_dir: &Path) -> Option<PathBuf> {
    find_first_existing(base_dir, &TEMPLATE_CANDIDATES)
}

/// The organization logo, read once and shared by the renderers.
#[derive(Debug, Clone, Default)]
pub struct Logo {
    pub path: Option<PathBuf>,
    bytes: Option<Vec<u8>>,
    dimensions: Option<(u32, u32)>,
}

impl Logo {
    /// No logo: renderers fall back to the transparent placeholder
    pub fn none() -> Self {
        Self::default()
    }

    /// Load the logo from the first candidate path under `base_dir`
    pub fn load(base_dir: &Path) -> Self {
        match find_logo(base_dir) {
            Some(path) => Self::from_path(&path),
            None => {
                info!("No company logo found under {:?}", base_dir);
                Self::none()
            }
        }
    }

    /// Read a logo from a specific file; unreadable files count as no logo
    pub fn from_path(path: &Path) -> Self {
        match fs::read(path) {
            Ok(bytes) => {
                info!("Loaded company logo: {:?}", path);
                Self::from_bytes(Some(path.to_path_buf()), bytes)
            }
            Err(e) => {
                warn!("Error loading logo {:?}: {}", path, e);
                Self::none()
            }
        }
    }

    pub fn from_bytes(path: Option<PathBuf>, bytes: Vec<u8>) -> Self {
        let dimensions = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok());
        Self {
            path,
            bytes: Some(bytes),
            dimensions,
        }
    }

    pub fn is_present(&self) -> bool {
        self.bytes.is_some()
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// Pixel size, when the logo could be decoded
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Base64 PNG data for inlining into HTML
    pub fn base64(&self) -> String {
        match &self.bytes {
            Some(bytes) => STANDARD.encode(bytes),
            None => TRANSPARENT_PIXEL_PNG.to_string(),
        }
    }
}
