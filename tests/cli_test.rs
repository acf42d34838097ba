use image::{DynamicImage, Rgb, RgbImage};
use pdf2deck::images::{load_image_info, SavedImage};
use pdf2deck::{ExtractedDocument, Logo, RunContext, Section, SlideAssembler};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::ZipArchive;

fn run_command(args: &[&str]) -> Output {
    Command::new("cargo")
        .arg("run")
        .arg("--")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn section(title: &str) -> Section {
    Section {
        title: title.to_string(),
        content: format!("{} content.", title),
        importance: 5,
        themes: vec!["testing".to_string()],
        visual_elements: Vec::new(),
    }
}

// Write a deck manifest with two illustrated slides
fn write_deck(dir: &Path) -> PathBuf {
    let document = ExtractedDocument {
        document_title: "Test Deck".to_string(),
        summary: "A deck written by the test suite.".to_string(),
        key_sections: vec![section("First Topic"), section("Second Topic")],
        overall_themes: vec!["testing".to_string()],
    };

    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([200, 40, 40])));
    let saved = SavedImage {
        file_path: dir.join("image.png"),
        file_name: "image.png".to_string(),
    };
    let info = load_image_info(&image, &saved).expect("Failed to prepare image");

    let assembler = SlideAssembler::new(&Logo::none());
    let slides = document
        .key_sections
        .iter()
        .enumerate()
        .map(|(i, s)| {
            assembler
                .compose(
                    s,
                    i,
                    &info,
                    &document.document_title,
                    vec!["Alpha".to_string(), "Beta".to_string(), "Gamma".to_string()],
                )
                .expect("Failed to compose slide")
        })
        .collect();

    let deck = RunContext {
        pdf_preview: "preview".to_string(),
        extraction: document,
        prompts: Vec::new(),
        images: Vec::new(),
        slides,
        failures: Vec::new(),
    };

    let path = dir.join("deck.json");
    deck.save(&path).expect("Failed to write deck manifest");
    path
}

fn zip_names(path: &Path) -> Vec<String> {
    let bytes = fs::read(path).expect("Failed to read output file");
    let archive = ZipArchive::new(Cursor::new(bytes)).expect("Output is not a zip archive");
    archive.file_names().map(|s| s.to_string()).collect()
}

#[test]
fn test_export_html_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck_path = write_deck(temp_dir.path());
    let output_path = temp_dir.path().join("out").join("slides.zip");

    let output = run_command(&[
        "export-html",
        "-d",
        deck_path.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let names = zip_names(&output_path);
    assert!(names.contains(&"slide_1_First_Topic.html".to_string()));
    assert!(names.contains(&"slide_2_Second_Topic.html".to_string()));
}

#[test]
fn test_export_pptx_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck_path = write_deck(temp_dir.path());
    let output_path = temp_dir.path().join("deck.pptx");

    let output = run_command(&[
        "export-pptx",
        "-d",
        deck_path.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let names = zip_names(&output_path);
    assert!(names.contains(&"ppt/presentation.xml".to_string()));
    assert!(names.contains(&"ppt/slides/slide3.xml".to_string()));
}

#[test]
fn test_export_pptx_with_template_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck_path = write_deck(temp_dir.path());
    let template_path = temp_dir.path().join("template.pptx");
    let output_path = temp_dir.path().join("branded.pptx");

    // A blank-canvas export doubles as the organization template
    let output = run_command(&[
        "export-pptx",
        "-d",
        deck_path.to_str().unwrap(),
        "-o",
        template_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let output = run_command(&[
        "export-pptx",
        "-d",
        deck_path.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
        "-t",
        template_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let names = zip_names(&output_path);
    assert!(names.contains(&"ppt/slides/slide1.xml".to_string()));
    assert!(names.contains(&"ppt/slides/slide4.xml".to_string()));
    assert!(names.contains(&"ppt/slides/slide5.xml".to_string()));
    assert!(!names.contains(&"ppt/slides/slide2.xml".to_string()));
}

#[test]
fn test_export_pptx_missing_template_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck_path = write_deck(temp_dir.path());
    let output_path = temp_dir.path().join("deck.pptx");

    let output = run_command(&[
        "export-pptx",
        "-d",
        deck_path.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
        "-t",
        temp_dir.path().join("missing.pptx").to_str().unwrap(),
    ]);

    assert!(!output.status.success(), "Command should have failed");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Template file not found"), "stderr: {}", stderr);
    assert!(!output_path.exists());
}

#[test]
fn test_generate_requires_existing_pdf() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing.pdf");

    let output = run_command(&[
        "generate",
        "-i",
        missing.to_str().unwrap(),
        "-o",
        temp_dir.path().join("out").to_str().unwrap(),
    ]);

    assert!(!output.status.success(), "Command should have failed");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Path not found"));
}

#[test]
fn test_export_html_missing_deck_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run_command(&[
        "export-html",
        "-d",
        temp_dir.path().join("deck.json").to_str().unwrap(),
        "-o",
        temp_dir.path().join("slides.zip").to_str().unwrap(),
    ]);

    assert!(!output.status.success(), "Command should have failed");
}
