use super::*;
use crate::client::RemoteImage;
use crate::export::{export_bullets, export_image};
use crate::images::SavedImage;
use crate::progress::band_progress;
use async_trait::async_trait;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use zip::ZipArchive;

// Mock text model answering from a closure
struct FnText<F>(F);

#[async_trait]
impl<F> TextModel for FnText<F>
where
    F: Fn(&ChatRequest) -> Result<String> + Send + Sync,
{
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        (self.0)(request)
    }
}

struct FailingImages;

#[async_trait]
impl ImageModel for FailingImages {
    async fn generate(&self, _prompt: &str, _size: &str) -> Result<RemoteImage> {
        Err(DeckError::ServiceError {
            service: "images".to_string(),
            message: "quota exceeded".to_string(),
        })
    }
}

fn section(title: &str, content: &str) -> Section {
    Section {
        title: title.to_string(),
        content: content.to_string(),
        importance: 7,
        themes: vec!["growth".to_string(), "risk".to_string()],
        visual_elements: vec!["skyline".to_string()],
    }
}

fn document(title: &str) -> ExtractedDocument {
    ExtractedDocument {
        document_title: title.to_string(),
        summary: "A short summary of the findings.".to_string(),
        key_sections: vec![section("Market Overview", "Markets grew.")],
        overall_themes: vec!["markets".to_string()],
    }
}

fn image_info(width: u32, height: u32) -> ImageInfo {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([20, 120, 200])));
    let saved = SavedImage {
        file_path: PathBuf::from("generated_images/test.png"),
        file_name: "test.png".to_string(),
    };
    images::load_image_info(&image, &saved).expect("Failed to prepare image")
}

fn bullets(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn compose_slide(title: &str, points: &[&str], index: usize) -> Slide {
    let assembler = SlideAssembler::new(&Logo::none());
    assembler
        .compose(
            &section(title, "Short content."),
            index,
            &image_info(64, 48),
            "Annual Report",
            bullets(points),
        )
        .expect("Failed to compose slide")
}

fn zip_entries(bytes: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(bytes)).expect("Not a zip archive");
    archive.file_names().map(|s| s.to_string()).collect()
}

fn zip_text(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("Not a zip archive");
    let mut file = archive.by_name(name).expect("Missing zip entry");
    let mut text = String::new();
    file.read_to_string(&mut text).expect("Entry is not UTF-8");
    text
}

// Layout classification

#[test]
fn test_classify_image_focus_for_visual_titles() {
    assert_eq!(classify(2, "System Diagram", 100), LayoutKind::ImageFocus);
    assert_eq!(classify(1, "PHOTO essay", 900), LayoutKind::ImageFocus);
    assert_eq!(classify(3, "System Diagram", 100), LayoutKind::Balanced);
}

#[test]
fn test_classify_many_bullets_is_text_focus() {
    assert_eq!(classify(5, "Cost comparison", 10), LayoutKind::TextFocus);
    assert_eq!(classify(7, "Overview", 10), LayoutKind::TextFocus);
}

#[test]
fn test_classify_comparison_and_long_content() {
    assert_eq!(classify(3, "A vs B", 100), LayoutKind::Comparison);
    assert_eq!(classify(3, "Cloud versus on-prem", 100), LayoutKind::Comparison);
    assert_eq!(classify(3, "Quarterly results", 600), LayoutKind::TextFocus);
    assert_eq!(classify(3, "Overview", 100), LayoutKind::Balanced);
    assert_eq!(classify(3, "Overview", 500), LayoutKind::Balanced);
}

// Bullet extraction

#[test]
fn test_parse_bullets_list_literal() {
    let s = section("Growth", "");
    let parsed = bullets::parse_bullet_points(r#"["Revenue doubled", "Costs fell"]"#, &s);
    assert_eq!(parsed, bullets(&["Revenue doubled", "Costs fell"]));
}

#[test]
fn test_parse_bullets_quoted_fallback() {
    let s = section("Growth", "");
    let parsed = bullets::parse_bullet_points(
        r#"Here you go: "Revenue doubled" and also "Costs fell""#,
        &s,
    );
    assert_eq!(parsed, bullets(&["Revenue doubled", "Costs fell"]));
}

#[test]
fn test_parse_bullets_bracketed_fallback() {
    let s = section("Growth", "");
    let parsed = bullets::parse_bullet_points("[Revenue doubled, Costs fell, ]", &s);
    assert_eq!(parsed, bullets(&["Revenue doubled", "Costs fell"]));
}

#[test]
fn test_parse_bullets_marked_lines_fallback() {
    let s = section("Growth", "");
    let parsed = bullets::parse_bullet_points("Points:\n- Revenue doubled\n* Costs fell\n", &s);
    assert_eq!(parsed, bullets(&["Revenue doubled", "Costs fell"]));
}

#[test]
fn test_parse_bullets_empty_list_falls_back_to_themes() {
    let s = section("Growth", "");
    let parsed = bullets::parse_bullet_points("[]", &s);
    assert_eq!(parsed, bullets(&["Explores growth", "Explores risk"]));
}

#[test]
fn test_parse_bullets_single_quoted_list_keeps_commas() {
    let s = section("Growth", "");
    let parsed = bullets::parse_bullet_points("['Cut costs, boost speed', 'Grow revenue']", &s);
    assert_eq!(parsed, bullets(&["Cut costs, boost speed", "Grow revenue"]));

    let parsed = bullets::parse_bullet_points(r#"['It\'s faster', "Mixed, quotes",]"#, &s);
    assert_eq!(parsed, bullets(&["It's faster", "Mixed, quotes"]));
}

#[test]
fn test_parse_bullets_blank_items_fall_back_to_themes() {
    let s = section("Growth", "");
    assert_eq!(
        bullets::parse_bullet_points(r#"["", ""]"#, &s),
        bullets(&["Explores growth", "Explores risk"])
    );
    assert_eq!(
        bullets::parse_bullet_points("['  ', '']", &s),
        bullets(&["Explores growth", "Explores risk"])
    );

    let parsed = bullets::parse_bullet_points(r#"["  Revenue doubled ", ""]"#, &s);
    assert_eq!(parsed, bullets(&["Revenue doubled"]));
}

#[test]
fn test_parse_bullets_generic_when_nothing_usable() {
    let mut s = section("Growth", "");
    s.themes.clear();
    let parsed = bullets::parse_bullet_points("I cannot help with that.", &s);
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0], "Highlights key aspects of Growth");
}

#[test]
fn test_parse_bullets_truncates_to_five() {
    let s = section("Growth", "");
    let parsed = bullets::parse_bullet_points(r#"["a", "b", "c", "d", "e", "f", "g"]"#, &s);
    assert_eq!(parsed.len(), bullets::MAX_BULLETS);
    assert_eq!(parsed[4], "e");
}

#[tokio::test]
async fn test_extract_bullets_model_failure_uses_generic() {
    let model = FnText(|_: &ChatRequest| -> Result<String> {
        Err(DeckError::ServiceError {
            service: "chat".to_string(),
            message: "timeout".to_string(),
        })
    });
    let s = section("Supply Chain", "content");
    let points = bullets::extract_key_bullet_points(&model, &s, "Doc").await;
    assert_eq!(
        points,
        bullets(&[
            "Explores Supply Chain",
            "Provides essential insights",
            "Highlights key information"
        ])
    );
}

#[tokio::test]
async fn test_extract_bullets_request_settings() {
    let model = FnText(|request: &ChatRequest| -> Result<String> {
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, Some(300));
        Ok(r#"["One", "Two", "Three"]"#.to_string())
    });
    let s = section("Supply Chain", "content");
    let points = bullets::extract_key_bullet_points(&model, &s, "Doc").await;
    assert_eq!(points, bullets(&["One", "Two", "Three"]));
}

// Agents

#[tokio::test]
async fn test_extract_key_sections_parses_fenced_json() {
    let model = FnText(|_: &ChatRequest| -> Result<String> {
        Ok("```json\n{\"document_title\": \"Ocean Report\", \"summary\": \"Seas are warming.\", \"overall_themes\": [\"climate\"], \"key_sections\": [{\"title\": \"Coral Reefs\", \"content\": \"Reefs bleach.\", \"importance\": 9, \"themes\": [\"reef\"], \"visual_elements\": [\"coral\"]}]}\n```".to_string())
    });
    let extracted = agents::extract_key_sections(&model, "Some text").await.unwrap();
    assert_eq!(extracted.document_title, "Ocean Report");
    assert_eq!(extracted.key_sections.len(), 1);
    assert_eq!(extracted.key_sections[0].importance, 9);
}

#[tokio::test]
async fn test_extract_key_sections_without_sections_fails() {
    let model = FnText(|_: &ChatRequest| -> Result<String> {
        Ok(r#"{"document_title": "Empty", "summary": "", "key_sections": []}"#.to_string())
    });
    assert!(agents::extract_key_sections(&model, "Some text").await.is_err());
}

#[tokio::test]
async fn test_create_visual_prompt_fills_missing_title() {
    let model = FnText(|request: &ChatRequest| -> Result<String> {
        assert!(request.json_output);
        Ok(r#"{"prompt": "A sunlit coral reef, wide angle", "style_guidance": "documentary", "avoid_elements": ["text"]}"#.to_string())
    });
    let prompt = agents::create_visual_prompt(&model, &section("Coral Reefs", "x"), "Ocean")
        .await
        .unwrap();
    assert_eq!(prompt.section_title, "Coral Reefs");
    assert_eq!(prompt.avoid_elements, vec!["text".to_string()]);
}

#[test]
fn test_truncate_for_extraction() {
    let short = "short text";
    assert_eq!(agents::truncate_for_extraction(short), short);

    let long = "a".repeat(agents::EXTRACTION_INPUT_LIMIT + 10);
    let truncated = agents::truncate_for_extraction(&long);
    assert!(truncated.ends_with("\n\n[Content truncated due to length]"));
    assert_eq!(
        truncated.chars().filter(|c| *c == 'a').count(),
        agents::EXTRACTION_INPUT_LIMIT
    );
}

// PDF text

#[test]
fn test_join_pages_adds_blank_lines() {
    assert_eq!(pdf::join_pages(&["one", "two"]), "one\n\ntwo\n\n");
}

#[test]
fn test_join_pages_truncates_long_documents() {
    let page = "x".repeat(30_000);
    let text = pdf::join_pages(&[page.clone(), page.clone(), page]);
    assert!(text.ends_with("... [Content truncated due to length]"));
    assert_eq!(text.matches('x').count(), 60_000);
}

#[test]
fn test_extract_text_rejects_non_pdf() {
    let result = pdf::extract_text_from_pdf(b"hello world");
    assert!(matches!(result, Err(DeckError::ExtractionError(_))));
}

#[test]
fn test_preview_is_bounded() {
    let text = "y".repeat(800);
    let preview = pdf::preview(&text);
    assert_eq!(preview.len(), 503);
    assert_eq!(pdf::preview("tiny"), "tiny");
}

// Images

#[test]
fn test_color_from_text_is_deterministic() {
    // 'A' + 'B' = 131
    assert_eq!(
        images::color_from_text("AB"),
        Rgb([(131 * 123 % 256) as u8, (131 * 456 % 256) as u8, (131 * 789 % 256) as u8])
    );
    assert_eq!(images::color_from_text("prompt"), images::color_from_text("prompt"));
}

#[test]
fn test_placeholder_gradient_corners() {
    let prompt = "A quiet harbor at dawn with fishing boats";
    let gradient = images::placeholder_gradient(prompt, 40, 30);
    assert_eq!(gradient.dimensions(), (40, 30));

    let start = images::color_from_text("A quiet ha");
    let top_left = gradient.get_pixel(0, 0);
    assert_eq!(top_left[0], start[0]);
    assert_eq!(top_left[1], start[1]);
    assert_eq!(top_left[2], start[2]);
}

#[test]
fn test_clean_title() {
    assert_eq!(images::clean_title("Q3: Growth & Risk"), "Q3__Growth___Risk");
}

#[tokio::test]
async fn test_generate_image_falls_back_to_placeholder() {
    let generated = images::generate_image_from_prompt(&FailingImages, "a forest", "64x32").await;
    assert!(generated.is_placeholder);
    assert_eq!(generated.url, images::PLACEHOLDER_URL);
    assert_eq!(generated.image.dimensions(), (64, 32));
}

#[test]
fn test_save_image_locally_names_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let image = DynamicImage::ImageRgb8(RgbImage::new(8, 8));
    let saved = images::save_image_locally(&image, "placeholder_Market Size", 3, dir.path())
        .expect("Failed to save image");

    assert!(saved.file_path.exists());
    assert!(saved.file_name.ends_with("_3_placeholder_Market_Size.png"));
    // YYYYmmdd_HHMMSS prefix
    assert_eq!(saved.file_name.find("_3_"), Some(15));
}

#[test]
fn test_load_image_info_resizes_and_flattens() {
    let mut rgba = RgbaImage::from_pixel(2400, 1200, Rgba([0, 0, 0, 0]));
    rgba.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
    let image = DynamicImage::ImageRgba8(rgba);
    let saved = SavedImage {
        file_path: PathBuf::from("a.png"),
        file_name: "a.png".to_string(),
    };

    let info = images::load_image_info(&image, &saved).unwrap();
    assert_eq!((info.width, info.height), (1200, 600));

    let decoded = image::load_from_memory(&images::decode_base64(&info.base64_data).unwrap())
        .unwrap()
        .to_rgb8();
    assert_eq!(decoded.dimensions(), (1200, 600));
    // transparent areas become white
    assert!(decoded.get_pixel(600, 300)[0] > 240);
}

// Configuration

#[test]
fn test_operation_url() {
    let settings = ServiceSettings {
        api_key: "key".to_string(),
        endpoint: "https://example.openai.azure.com/".to_string(),
        deployment: "gpt-4o".to_string(),
        api_version: "2024-02-01".to_string(),
    };
    let url = settings.operation_url("chat/completions").unwrap();
    assert_eq!(
        url.as_str(),
        "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-01"
    );
    assert!(settings.validate("chat").is_ok());
}

#[test]
fn test_validate_requires_api_key() {
    let settings = ServiceSettings {
        endpoint: "https://example.openai.azure.com".to_string(),
        deployment: "dall-e-3".to_string(),
        ..ServiceSettings::default()
    };
    assert!(matches!(settings.validate("image"), Err(DeckError::ConfigError(_))));
}

#[tokio::test]
async fn test_image_client_without_settings_reports_config_error() {
    let client = AzureImageClient::new(ServiceSettings::default());
    let result = client.generate("a lighthouse", "1024x1024").await;
    assert!(matches!(result, Err(DeckError::ConfigError(_))));

    let generated = images::generate_image_from_prompt(&client, "a lighthouse", "64x32").await;
    assert!(generated.is_placeholder);
    assert_eq!(generated.image.dimensions(), (64, 32));
}

#[test]
fn test_clients_from_config_tolerates_missing_image_settings() {
    let mut config = Config::new();
    config.text = ServiceSettings {
        api_key: "key".to_string(),
        endpoint: "https://example.openai.azure.com".to_string(),
        deployment: "gpt-4o".to_string(),
        api_version: "2024-02-01".to_string(),
    };
    assert!(Clients::from_config(&config).is_ok());

    config.text.api_key.clear();
    assert!(matches!(
        Clients::from_config(&config),
        Err(DeckError::ConfigError(_))
    ));
}

#[test]
fn test_parse_image_size() {
    assert_eq!(config::parse_image_size("1792x1024").unwrap(), (1792, 1024));
    assert!(config::parse_image_size("big").is_err());
    assert!(config::parse_image_size("0x10").is_err());
}

// Slide assembly

#[test]
fn test_compose_round_trips_bullets() {
    let points = ["Revenue doubled", "Costs fell", "Margins <improved> & held"];
    let slide = compose_slide("Overview", &points, 0);

    assert_eq!(slide.layout, LayoutKind::Balanced);
    assert_eq!(html::extract_bullet_texts(&slide.html_content), bullets(&points));
    assert_eq!(slide.section_content, points.join(", "));
    assert!(slide.html_content.contains("Margins &lt;improved&gt; &amp; held"));
}

#[test]
fn test_compose_embeds_image_and_footer() {
    let slide = compose_slide("Overview", &["One", "Two", "Three"], 2);
    let embedded = html::extract_embedded_image(&slide.html_content).unwrap();

    assert_eq!(embedded, slide.image.base64_data);
    assert_eq!(slide.section_index, 2);
    assert!(slide.html_content.contains("Annual Report | Overview"));
    assert!(slide
        .html_content
        .contains(resources::TRANSPARENT_PIXEL_PNG));
}

#[test]
fn test_compose_comparison_splits_columns() {
    let slide = compose_slide("Rust vs Go", &["Fast", "Safe", "Simple"], 0);
    assert_eq!(slide.layout, LayoutKind::Comparison);
    let column = r#"<div class="comparison-column">"#;
    assert_eq!(slide.html_content.matches(column).count(), 2);

    let first_column = slide.html_content.find("Fast").unwrap();
    let second_column = slide.html_content.rfind(column).unwrap();
    assert!(first_column < second_column);
    assert!(slide.html_content.find("Safe").unwrap() > second_column);
}

#[test]
fn test_compose_without_image_fails() {
    let assembler = SlideAssembler::new(&Logo::none());
    let mut info = image_info(8, 8);
    info.base64_data.clear();
    let result = assembler.compose(&section("Overview", ""), 0, &info, "Doc", bullets(&["a"]));
    assert!(matches!(result, Err(DeckError::HtmlError(_))));
}

#[test]
fn test_condensed_content_without_bullets() {
    let content = "z".repeat(150);
    let condensed = html::condensed_content(&[], &content);
    assert_eq!(condensed, format!("{}...", "z".repeat(100)));
}

#[test]
fn test_slides_to_zip_names_entries() {
    let slides = vec![
        compose_slide("Market Overview", &["a", "b", "c"], 0),
        compose_slide("Risks/Issues", &["a", "b", "c"], 1),
    ];
    let zip = html::slides_to_zip(&slides).unwrap();
    let names = zip_entries(&zip);
    assert!(names.contains(&"slide_1_Market_Overview.html".to_string()));
    assert!(names.contains(&"slide_2_Risks_Issues.html".to_string()));
    assert_eq!(
        zip_text(&zip, "slide_1_Market_Overview.html"),
        slides[0].html_content
    );
}

#[tokio::test]
async fn test_assemble_section_without_image_data_fails_at_slide_stage() {
    let model = FnText(|_: &ChatRequest| -> Result<String> {
        Ok(r#"["One", "Two", "Three"]"#.to_string())
    });
    let clients = Clients::new(Arc::new(model), Arc::new(FailingImages));
    let mut info = image_info(64, 48);
    info.base64_data.clear();

    let failure = pipeline::assemble_section(
        &clients,
        &SlideAssembler::new(&Logo::none()),
        &section("Overview", "Short content."),
        4,
        &info,
        "Doc",
    )
    .await
    .expect_err("Slide without image data should fail");

    assert_eq!(failure.section_index, 4);
    assert_eq!(failure.stage, SectionStage::Slide);
    assert!(failure.detail.contains("Overview"));
}

// Export helpers

#[test]
fn test_export_bullets_prefers_structured_list() {
    let slide = compose_slide("Overview", &["One, with comma", "Two"], 0);
    assert_eq!(export_bullets(&slide), bullets(&["One, with comma", "Two"]));
}

#[test]
fn test_export_bullets_falls_back_to_content_then_markup() {
    let mut slide = compose_slide("Overview", &["One", "Two", "Three"], 0);
    slide.bullets.clear();
    assert_eq!(export_bullets(&slide), bullets(&["One", "Two", "Three"]));

    slide.section_content.clear();
    assert_eq!(export_bullets(&slide), bullets(&["One", "Two", "Three"]));
}

#[test]
fn test_export_image_falls_back_to_markup() {
    let mut slide = compose_slide("Overview", &["One"], 0);
    let expected = images::decode_base64(&slide.image.base64_data).unwrap();
    slide.image.base64_data.clear();
    assert_eq!(export_image(&slide), Some(expected));

    slide.html_content.clear();
    assert_eq!(export_image(&slide), None);
}

// Blank canvas PPTX

#[test]
fn test_generate_pptx_writes_title_and_content_slides() {
    let slides = vec![
        compose_slide("Market Overview", &["a", "b", "c"], 0),
        compose_slide("Rust vs Go", &["a", "b", "c", "d"], 1),
    ];
    let bytes = BlankCanvasExporter::new(Logo::none())
        .export(&slides, &document("Annual Report"))
        .unwrap();
    let names = zip_entries(&bytes);

    for part in [
        "[Content_Types].xml",
        "ppt/presentation.xml",
        "ppt/theme/theme1.xml",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/slideLayouts/slideLayout3.xml",
        "ppt/slides/slide1.xml",
        "ppt/slides/slide3.xml",
        "ppt/media/image2.jpeg",
    ] {
        assert!(names.contains(&part.to_string()), "missing {}", part);
    }
    assert!(!names.contains(&"ppt/slides/slide4.xml".to_string()));

    let presentation = zip_text(&bytes, "ppt/presentation.xml");
    assert_eq!(presentation.matches("<p:sldId ").count(), 3);
    assert!(presentation.contains(r#"cx="14630400" cy="8229600""#));

    let title = zip_text(&bytes, "ppt/slides/slide1.xml");
    assert!(title.contains("Annual Report"));

    let content = zip_text(&bytes, "ppt/slides/slide3.xml");
    assert!(content.contains("Rust vs Go"));
    assert!(content.contains("Annual Report | Rust vs Go"));
    // comparison layout: two bullet columns
    assert_eq!(content.matches(r#"name="Bullets""#).count(), 2);
}

#[test]
fn test_generate_pptx_skips_undecodable_images() {
    let mut slide = compose_slide("Overview", &["a", "b", "c"], 0);
    slide.image.base64_data = "bm90IGFuIGltYWdl".to_string();
    let bytes = generate_pptx(&[slide], &document("Doc"), &Logo::none(), &Default::default())
        .unwrap();

    let content = zip_text(&bytes, "ppt/slides/slide2.xml");
    assert!(!content.contains("Section Image"));
    assert!(!zip_entries(&bytes).iter().any(|n| n.starts_with("ppt/media/image")));
}

#[test]
fn test_summary_preview() {
    let summary = "s".repeat(400);
    assert_eq!(pptx::summary_preview(&summary), format!("{}...", "s".repeat(300)));
    assert_eq!(pptx::summary_preview("brief"), "brief");
}

#[test]
fn test_content_placement_image_focus() {
    let placement = pptx::content_placement(LayoutKind::ImageFocus, 1, Some((1000, 500)));
    let image = placement.image.unwrap();
    assert_eq!(image.cx, ooxml::inches(7.0));
    assert_eq!(image.y, ooxml::inches(1.8));
    assert_eq!(image.x, (ooxml::WIDE_SLIDE_CX - image.cx) / 2);
    assert_eq!(placement.columns[0].y, ooxml::inches(5.5));
    assert_eq!(placement.columns[0].x, ooxml::inches(1.0));
}

#[test]
fn test_content_placement_widths() {
    let wide = ooxml::WIDE_SLIDE_CX as f64;
    let balanced = pptx::content_placement(LayoutKind::Balanced, 1, Some((100, 100)));
    assert_eq!(balanced.columns[0].cx, (wide * 0.55) as i64);
    assert_eq!(balanced.image.unwrap().cx, (wide * 0.35) as i64);

    let text = pptx::content_placement(LayoutKind::TextFocus, 1, None);
    assert_eq!(text.columns[0].cx, (wide * 0.70) as i64);
    assert!(text.image.is_none());

    let comparison = pptx::content_placement(LayoutKind::Comparison, 2, Some((100, 100)));
    assert_eq!(comparison.columns.len(), 2);
    assert_eq!(comparison.columns[1].cx, (wide * 0.30) as i64);
}

// Template PPTX

fn blank_template(content_slides: usize) -> Vec<u8> {
    let slides: Vec<Slide> = (0..content_slides)
        .map(|i| compose_slide(&format!("Template Slide {}", i), &["x", "y", "z"], i))
        .collect();
    BlankCanvasExporter::new(Logo::none())
        .export(&slides, &document("Corporate Template"))
        .unwrap()
}

#[test]
fn test_apply_template_keeps_first_slide_and_appends() {
    let template = blank_template(2);
    let slides = vec![compose_slide("Findings", &["Alpha", "Beta", "Gamma"], 0)];
    let bytes = apply_template(&template, &slides, &document("Ocean Report")).unwrap();
    let names = zip_entries(&bytes);

    assert!(names.contains(&"ppt/slides/slide1.xml".to_string()));
    assert!(!names.contains(&"ppt/slides/slide2.xml".to_string()));
    assert!(!names.contains(&"ppt/slides/slide3.xml".to_string()));
    assert!(names.contains(&"ppt/slides/slide4.xml".to_string()));
    assert!(names.contains(&"ppt/media/deck_image4.jpeg".to_string()));

    let presentation = zip_text(&bytes, "ppt/presentation.xml");
    assert_eq!(presentation.matches("<p:sldId ").count(), 2);
    assert!(presentation.contains(r#"id="259""#));

    let title = zip_text(&bytes, "ppt/slides/slide1.xml");
    assert!(title.contains("Ocean Report"));
    assert!(!title.contains("Corporate Template"));
    assert!(!title.contains("A short summary"));

    let added = zip_text(&bytes, "ppt/slides/slide4.xml");
    assert!(added.contains(r#"<p:ph type="title"/>"#));
    assert!(added.contains(r#"<p:ph idx="1"/>"#));
    assert!(added.contains("Findings"));
    assert!(added.contains("Gamma"));
    assert!(added.contains("Section Image"));

    let rels = zip_text(&bytes, "ppt/slides/_rels/slide4.xml.rels");
    assert!(rels.contains("../slideLayouts/slideLayout2.xml"));

    let content_types = zip_text(&bytes, "[Content_Types].xml");
    assert!(content_types.contains("/ppt/slides/slide4.xml"));
    assert!(!content_types.contains("/ppt/slides/slide2.xml"));
}

#[test]
fn test_template_exporter_missing_file() {
    let exporter = TemplateExporter::from_path("/definitely/not/here/template.pptx");
    let result = exporter.export(&[], &document("Doc"));
    assert!(matches!(result, Err(DeckError::TemplateNotFound(_))));
}

#[test]
fn test_template_exporter_rejects_non_package() {
    let exporter = TemplateExporter::new(TemplateSource::Bytes(b"not a zip".to_vec()));
    assert!(matches!(
        exporter.export(&[], &document("Doc")),
        Err(DeckError::TemplateError(_))
    ));
}

#[test]
fn test_choose_content_layout() {
    use crate::template::{choose_content_layout, LayoutInfo, PlaceholderInfo};

    let layout = |kind: Option<&str>, phs: &[&str]| LayoutInfo {
        part: String::new(),
        name: String::new(),
        layout_type: kind.map(|k| k.to_string()),
        placeholders: phs
            .iter()
            .map(|k| PlaceholderInfo {
                kind: k.to_string(),
                idx: None,
            })
            .collect(),
    };

    let layouts = vec![
        layout(Some("title"), &["ctrTitle", "subTitle"]),
        layout(Some("secHead"), &["title"]),
        layout(Some("obj"), &["title", "obj"]),
    ];
    assert_eq!(choose_content_layout(&layouts), Some(2));

    let no_content = vec![layout(None, &["title"]), layout(None, &["pic"])];
    assert_eq!(choose_content_layout(&no_content), Some(1));

    assert_eq!(choose_content_layout(&[layout(Some("blank"), &[])]), Some(0));
    assert_eq!(choose_content_layout(&[]), None);
}

#[test]
fn test_replace_placeholder_text_keeps_body_properties() {
    let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree><p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:txBody><a:bodyPr anchor="b"/><a:lstStyle/><a:p><a:r><a:t>Old</a:t></a:r></a:p></p:txBody></p:sp><p:sp><p:nvSpPr><p:nvPr><p:ph type="dt"/></p:nvPr></p:nvSpPr><p:txBody><a:bodyPr/><a:p><a:r><a:t>Date</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#;

    let rewritten = template::replace_placeholder_text(xml, |kind| {
        (kind == "title").then(|| "<a:p><a:r><a:t>New</a:t></a:r></a:p>".to_string())
    })
    .unwrap();

    assert!(rewritten.contains(r#"<a:bodyPr anchor="b"/>"#));
    assert!(rewritten.contains("New"));
    assert!(!rewritten.contains("Old"));
    assert!(rewritten.contains("Date"));
}

// OOXML helpers

#[test]
fn test_resolve_target() {
    assert_eq!(
        ooxml::resolve_target("ppt/slideMasters", "../slideLayouts/slideLayout1.xml"),
        "ppt/slideLayouts/slideLayout1.xml"
    );
    assert_eq!(ooxml::resolve_target("ppt", "slides/slide2.xml"), "ppt/slides/slide2.xml");
    assert_eq!(ooxml::resolve_target("ppt", "/ppt/media/a.png"), "ppt/media/a.png");
    assert_eq!(
        ooxml::rels_path_for("ppt/slides/slide1.xml"),
        "ppt/slides/_rels/slide1.xml.rels"
    );
}

#[test]
fn test_parse_relationships() {
    let rels = ooxml::relationships_xml(&[ooxml::Relationship::new(
        "rId7",
        ooxml::REL_SLIDE,
        "slides/slide1.xml",
    )]);
    let parsed = ooxml::parse_relationships(&rels).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].id, "rId7");
    assert_eq!(ooxml::rid_number(&parsed[0].id), Some(7));
}

#[test]
fn test_fit_within_keeps_aspect() {
    assert_eq!(ooxml::fit_within((200, 100), 1000, 1000), (1000, 500));
    assert_eq!(ooxml::fit_within((100, 200), 1000, 1000), (500, 1000));
}

// Preview server

fn sample_deck() -> RunContext {
    RunContext {
        pdf_preview: "preview".to_string(),
        extraction: document("Annual Report"),
        prompts: Vec::new(),
        images: Vec::new(),
        slides: vec![
            compose_slide("Market Overview", &["a", "b", "c"], 0),
            compose_slide("Risks", &["a", "b", "c"], 1),
        ],
        failures: Vec::new(),
    }
}

#[test]
fn test_serve_routes() {
    let server = DeckServer::new(sample_deck(), Logo::none(), None);

    let index = server.route("/");
    assert_eq!(index.status, 200);
    let body = String::from_utf8(index.body).unwrap();
    assert!(body.contains("Market Overview"));
    assert!(!body.contains("template.pptx"));

    let slide = server.route("/slides/2?fresh=1");
    assert_eq!(slide.status, 200);
    assert!(String::from_utf8(slide.body).unwrap().contains("Risks"));

    let download = server.route("/download/slides/1");
    assert_eq!(download.attachment.as_deref(), Some("slide_1_Market_Overview.html"));

    assert_eq!(server.route("/slides/0").status, 404);
    assert_eq!(server.route("/slides/3").status, 404);
    assert_eq!(server.route("/download/template.pptx").status, 404);
    assert_eq!(server.route("/nope").status, 404);
}

#[test]
fn test_serve_downloads() {
    let server = DeckServer::new(sample_deck(), Logo::none(), None);

    let zip = server.route("/download/slides.zip");
    assert_eq!(zip.status, 200);
    assert_eq!(zip_entries(&zip.body).len(), 2);

    let pptx = server.route("/download/presentation.pptx");
    assert_eq!(pptx.status, 200);
    assert_eq!(pptx.attachment.as_deref(), Some("Annual Report.pptx"));
}

#[test]
fn test_serve_template_failure_is_500() {
    let server = DeckServer::new(
        sample_deck(),
        Logo::none(),
        Some(TemplateSource::Path(PathBuf::from("/missing/template.pptx"))),
    );
    assert_eq!(server.route("/download/template.pptx").status, 500);
}

// Utilities and progress

#[test]
fn test_file_names() {
    assert_eq!(utils::slide_file_name(3, "Key Risks"), "slide_3_Key_Risks.html");
    assert_eq!(utils::deck_file_name("Q3: Results"), "Q3_ Results.pptx");
    assert_eq!(utils::deck_file_name("  "), "presentation.pptx");
}

#[test]
fn test_band_progress() {
    assert_eq!(band_progress(10, 30, 0, 4), 10);
    assert_eq!(band_progress(10, 30, 2, 4), 20);
    assert_eq!(band_progress(10, 30, 4, 4), 30);
    assert_eq!(band_progress(30, 60, 0, 0), 60);
}

#[test]
fn test_logo_from_bytes_reads_dimensions() {
    let mut png = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(30, 10))
        .write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
        .unwrap();
    let logo = Logo::from_bytes(None, png);
    assert!(logo.is_present());
    assert_eq!(logo.dimensions(), Some((30, 10)));
    assert_ne!(logo.base64(), resources::TRANSPARENT_PIXEL_PNG);
}

#[test]
fn test_run_context_round_trips_through_manifest() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("out").join(pipeline::MANIFEST_FILE);
    let deck = sample_deck();
    deck.save(&path).unwrap();
    assert_eq!(RunContext::load(&path).unwrap(), deck);
}
