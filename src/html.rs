// ABOUTME: HTML slide generation module for the pdf2deck application
// ABOUTME: Assembles styled, self-contained HTML slides and packages them as a zip

use crate::bullets::extract_key_bullet_points;
use crate::client::TextModel;
use crate::errors::{DeckError, Result};
use crate::layout::classify;
use crate::models::{ImageInfo, LayoutKind, Palette, Section, Slide};
use crate::resources::Logo;
use crate::utils;
use log::info;
use once_cell::sync::Lazy;
use quick_xml::escape::{escape, unescape};
use regex::Regex;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

static RE_BULLET_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<div class="bullet-text">([^<]+)</div>"#).unwrap());
static RE_EMBEDDED_JPEG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"src="data:image/jpeg;base64,([^"]+)""#).unwrap());

const CHECK_ICON_PATH: &str = "M12 2C6.48 2 2 6.48 2 12C2 17.52 6.48 22 12 22C17.52 22 22 17.52 22 12C22 6.48 17.52 2 12 2ZM10 17L5 12L6.41 10.59L10 14.17L17.59 6.58L19 8L10 17Z";

/// Builds slides from sections. The logo is read once, up front.
pub struct SlideAssembler {
    palette: Palette,
    logo_base64: String,
}

impl SlideAssembler {
    pub fn new(logo: &Logo) -> Self {
        Self {
            palette: Palette::default(),
            logo_base64: logo.base64(),
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Ask the text model for bullets, then compose the slide
    pub async fn assemble(
        &self,
        model: &dyn TextModel,
        section: &Section,
        section_index: usize,
        image: &ImageInfo,
        document_title: &str,
    ) -> Result<Slide> {
        let bullets = extract_key_bullet_points(model, section, document_title).await;
        self.compose(section, section_index, image, document_title, bullets)
    }

    /// Pick the layout for the bullets and render the slide document.
    /// Fails when the image carries no data.
    pub fn compose(
        &self,
        section: &Section,
        section_index: usize,
        image: &ImageInfo,
        document_title: &str,
        bullets: Vec<String>,
    ) -> Result<Slide> {
        if image.base64_data.is_empty() {
            return Err(DeckError::HtmlError(format!(
                "no image data to embed for \"{}\"",
                section.title
            )));
        }

        let slide_title = section.title.trim().to_string();
        let layout = classify(bullets.len(), &slide_title, section.content.chars().count());
        info!("Slide \"{}\" uses the {} layout", slide_title, layout);

        let bullets_html = render_bullets(&bullets, layout, &self.palette);
        let html_content = self.render_document(
            &slide_title,
            document_title,
            layout,
            &bullets_html,
            image,
        );

        Ok(Slide {
            section_content: condensed_content(&bullets, &section.content),
            title: slide_title,
            section_index,
            section_title: section.title.clone(),
            layout,
            bullets,
            html_content,
            image: image.clone(),
        })
    }

    fn render_document(
        &self,
        slide_title: &str,
        document_title: &str,
        layout: LayoutKind,
        bullets_html: &str,
        image: &ImageInfo,
    ) -> String {
        let title = escape(slide_title);
        let doc_title = escape(document_title);
        let img_tag = format!(
            r#"<img src="data:image/jpeg;base64,{}" alt="{}">"#,
            image.base64_data, title
        );

        let body = match layout {
            LayoutKind::ImageFocus => format!(
                r#"
            <div class="image-container centered-image">
                {img}
            </div>
            <div class="bullet-points">
                {bullets}
            </div>"#,
                img = img_tag,
                bullets = bullets_html
            ),
            LayoutKind::Comparison => format!(
                r#"
            {bullets}
            <div class="image-container comparison-image">
                {img}
            </div>"#,
                img = img_tag,
                bullets = bullets_html
            ),
            LayoutKind::Balanced | LayoutKind::TextFocus => format!(
                r#"
            <div class="text-column">
                <div class="bullet-points">
                    {bullets}
                </div>
            </div>
            <div class="image-column">
                <div class="image-container">
                    {img}
                </div>
            </div>"#,
                img = img_tag,
                bullets = bullets_html
            ),
        };

        let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html_doc.push_str("<meta charset=\"UTF-8\">\n");
        html_doc.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html_doc.push_str(&format!("<title>{} - {}</title>\n", title, doc_title));
        html_doc.push_str("<style>\n");
        html_doc.push_str(&base_css(&self.palette));
        html_doc.push_str(layout_css(layout));
        html_doc.push_str("\n</style>\n</head>\n<body>\n");
        html_doc.push_str(&format!(
            r#"<div class="slide" data-layout="{layout}">
        <div class="header">
            <h1 class="title">{title}</h1>
            <p class="subtitle">{doc_title}</p>
        </div>
        <div class="content">{body}
        </div>
        <div class="footer">
            <span class="footer-text">{doc_title} | {title}</span>
            <img src="data:image/png;base64,{logo}" alt="Company Logo" class="company-logo">
        </div>
    </div>
"#,
            layout = layout,
            title = title,
            doc_title = doc_title,
            body = body,
            logo = self.logo_base64,
        ));
        html_doc.push_str("</body>\n</html>");
        html_doc
    }
}

/// Bullet markup for a layout: compact rows, two columns, numbered callouts or icon rows
pub fn render_bullets(bullets: &[String], layout: LayoutKind, palette: &Palette) -> String {
    let delay = |i: usize| format!("{:.2}", i as f64 * 0.15);
    let mut html = String::new();

    match layout {
        LayoutKind::TextFocus => {
            for (i, point) in bullets.iter().enumerate() {
                html.push_str(&format!(
                    r#"
            <div class="bullet-point compact" style="animation-delay: {}s;">
                <div class="bullet-icon">&#8226;</div>
                <div class="bullet-text">{}</div>
            </div>"#,
                    delay(i),
                    escape(point.as_str())
                ));
            }
        }
        LayoutKind::Comparison => {
            let half = bullets.len() / 2;
            html.push_str(r#"<div class="comparison-container">"#);
            for (offset, column) in [(0, &bullets[..half]), (half, &bullets[half..])] {
                html.push_str(r#"<div class="comparison-column">"#);
                for (i, point) in column.iter().enumerate() {
                    html.push_str(&format!(
                        r#"
            <div class="bullet-point comparison-item" style="animation-delay: {}s;">
                <div class="bullet-text">{}</div>
            </div>"#,
                        delay(i + offset),
                        escape(point.as_str())
                    ));
                }
                html.push_str("</div>");
            }
            html.push_str("</div>");
        }
        LayoutKind::ImageFocus => {
            for (i, point) in bullets.iter().enumerate() {
                html.push_str(&format!(
                    r#"
            <div class="bullet-point highlight" style="animation-delay: {}s;">
                <div class="bullet-number">{}</div>
                <div class="bullet-text">{}</div>
            </div>"#,
                    delay(i),
                    i + 1,
                    escape(point.as_str())
                ));
            }
        }
        LayoutKind::Balanced => {
            for (i, point) in bullets.iter().enumerate() {
                html.push_str(&format!(
                    r#"
            <div class="bullet-point" style="animation-delay: {}s;">
                <div class="bullet-icon">
                    <svg width="20" height="20" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg">
                        <path d="{}" fill="{}"/>
                    </svg>
                </div>
                <div class="bullet-text">{}</div>
            </div>"#,
                    delay(i),
                    CHECK_ICON_PATH,
                    palette.secondary,
                    escape(point.as_str())
                ));
            }
        }
    }

    html
}

fn layout_css(layout: LayoutKind) -> &'static str {
    match layout {
        LayoutKind::Balanced => {
            ".content { display: grid; grid-template-columns: 3fr 2fr; gap: 30px; }"
        }
        LayoutKind::TextFocus => {
            ".content { display: grid; grid-template-columns: 4fr 1fr; gap: 30px; }"
        }
        LayoutKind::ImageFocus => {
            ".content { display: flex; flex-direction: column; } .image-container { margin-bottom: 30px; width: 100%; max-height: 450px; } .bullet-points { display: flex; flex-direction: row; justify-content: space-between; }"
        }
        LayoutKind::Comparison => {
            ".content { display: block; } .comparison-container { display: flex; gap: 50px; } .comparison-column { flex: 1; } .comparison-image { margin-top: 30px; max-height: 220px; }"
        }
    }
}

fn base_css(palette: &Palette) -> String {
    format!(
        r#"
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
@import url('https://fonts.googleapis.com/css2?family=Poppins:wght@300;400;500;600;700&display=swap');
body {{
    font-family: 'Poppins', 'Segoe UI', Roboto, Arial, sans-serif;
    color: {text};
    background-color: {slide_bg};
    line-height: 1.6;
    display: flex;
    justify-content: center;
    align-items: center;
    min-height: 100vh;
    padding: 20px;
}}
.slide {{
    width: 1280px;
    height: 720px;
    background-color: {background};
    box-shadow: 0 10px 40px rgba(0, 0, 0, 0.1);
    border-radius: 12px;
    overflow: hidden;
    position: relative;
    display: grid;
    grid-template-rows: auto 1fr auto;
}}
.header {{ padding: 20px 50px 10px; position: relative; z-index: 1; }}
.title {{ font-size: 32px; font-weight: 700; color: {text}; letter-spacing: -0.5px; display: block; }}
.subtitle {{ font-size: 22px; font-weight: 500; color: {secondary}; margin-top: 5px; }}
.content {{ position: relative; z-index: 1; padding: 30px 50px; }}
.text-column {{ display: flex; flex-direction: column; }}
.bullet-points {{ display: flex; flex-direction: column; gap: 18px; margin-top: 10px; }}
.bullet-point {{
    display: flex;
    align-items: flex-start;
    background-color: {card_bg};
    border-radius: 10px;
    padding: 16px 20px;
    box-shadow: 0 4px 15px rgba(0, 0, 0, 0.05);
    transform: translateY(20px);
    opacity: 0;
    animation: slide-in 0.5s forwards ease-out;
}}
.bullet-point.compact {{ padding: 10px 15px; }}
.bullet-point.highlight {{
    background: linear-gradient(135deg, {secondary}10, {background});
    border-left: 4px solid {secondary};
}}
.bullet-point.comparison-item {{ text-align: center; justify-content: center; }}
.bullet-icon {{ margin-right: 15px; flex-shrink: 0; margin-top: 2px; }}
.bullet-number {{
    width: 26px;
    height: 26px;
    border-radius: 50%;
    background-color: {secondary};
    color: white;
    display: flex;
    align-items: center;
    justify-content: center;
    font-weight: bold;
    margin-right: 15px;
    flex-shrink: 0;
}}
.bullet-text {{ font-size: 18px; font-weight: 500; color: {text}; line-height: 1.4; }}
.image-column {{ display: flex; align-items: center; justify-content: center; }}
.image-container {{
    width: 100%;
    max-width: 450px;
    max-height: 400px;
    display: flex;
    align-items: center;
    justify-content: center;
    overflow: hidden;
    border-radius: 12px;
    box-shadow: 0 10px 30px rgba(0, 0, 0, 0.1);
    margin: 0 auto;
}}
.image-container img {{ max-width: 100%; max-height: 100%; object-fit: contain; border-radius: 8px; }}
@keyframes slide-in {{ to {{ transform: translateY(0); opacity: 1; }} }}
.footer {{
    padding: 15px 50px;
    color: {light_text};
    font-size: 14px;
    font-weight: 300;
    border-top: 1px solid rgba(0, 0, 0, 0.05);
    display: flex;
    justify-content: space-between;
    align-items: center;
}}
.footer-text {{ flex-grow: 1; }}
.company-logo {{ height: 40px; width: auto; margin-left: 20px; }}
.header .title {{ border-left: 6px solid {primary}; padding-left: 14px; }}
"#,
        text = palette.text,
        slide_bg = palette.slide_bg,
        background = palette.background,
        secondary = palette.secondary,
        card_bg = palette.card_bg,
        light_text = palette.light_text,
        primary = palette.primary,
    )
}

/// Condensed slide content: bullets joined with ", ", or a content excerpt
pub fn condensed_content(bullets: &[String], content: &str) -> String {
    if !bullets.is_empty() {
        return bullets.join(", ");
    }
    let excerpt: String = content.chars().take(100).collect();
    format!("{}...", excerpt)
}

/// Recover bullet texts from rendered slide markup
pub fn extract_bullet_texts(html: &str) -> Vec<String> {
    RE_BULLET_TEXT
        .captures_iter(html)
        .map(|caps| {
            let raw = &caps[1];
            unescape(raw)
                .map(|text| text.into_owned())
                .unwrap_or_else(|_| raw.to_string())
        })
        .collect()
}

/// Recover the inlined JPEG (base64) from rendered slide markup
pub fn extract_embedded_image(html: &str) -> Option<String> {
    RE_EMBEDDED_JPEG
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// Package every slide as its own HTML file inside a zip archive
pub fn slides_to_zip(slides: &[Slide]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (i, slide) in slides.iter().enumerate() {
        let file_name = utils::slide_file_name(i + 1, &slide.title);
        info!("Adding {} to HTML archive", file_name);
        zip.start_file(file_name, options)?;
        zip.write_all(slide.html_content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);
    utils::ensure_parent_directory_exists(output_path)?;
    fs::write(output_path, html_content).map_err(DeckError::FileReadError)?;
    Ok(())
}

/// Write every slide as an individual HTML file into `dir`
pub fn write_slides_to_dir(slides: &[Slide], dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    utils::ensure_directory_exists(dir)?;
    let mut written = Vec::with_capacity(slides.len());
    for (i, slide) in slides.iter().enumerate() {
        let path = dir.join(utils::slide_file_name(i + 1, &slide.title));
        write_html_to_file(&slide.html_content, &path)?;
        written.push(path);
    }
    Ok(written)
}
