// ABOUTME: End-to-end orchestration from PDF text to illustrated slides
// ABOUTME: Runs extraction, prompts, images and slides, returning a serialisable run context

use crate::agents::{create_visual_prompt, extract_key_sections};
use crate::client::{AzureChatClient, AzureImageClient, ImageModel, TextModel};
use crate::config::Config;
use crate::errors::{DeckError, Result, SectionFailure, SectionStage};
use crate::html::SlideAssembler;
use crate::images::{generate_image_from_prompt, load_image_info, save_image_locally};
use crate::models::{ExtractedDocument, ImageInfo, ImageRecord, Section, Slide, VisualPrompt};
use crate::pdf::{extract_text_from_pdf, preview};
use crate::progress::{band_progress, PipelineStep, ProgressReporter, StepStatus};
use crate::utils;
use futures::future::join_all;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// File name of the manifest written next to generated slides
pub const MANIFEST_FILE: &str = "deck.json";

/// A visual prompt and the section it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub section_index: usize,
    pub prompt: VisualPrompt,
}

/// Everything one run produced. Serialised as the deck manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunContext {
    pub pdf_preview: String,
    pub extraction: ExtractedDocument,
    pub prompts: Vec<PromptRecord>,
    pub images: Vec<ImageRecord>,
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub failures: Vec<SectionFailure>,
}

impl RunContext {
    pub fn document(&self) -> &ExtractedDocument {
        &self.extraction
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        utils::ensure_parent_directory_exists(path)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!("Wrote deck manifest to {:?}", path);
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        utils::validate_file_exists(path)?;
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// The model services a run talks to
#[derive(Clone)]
pub struct Clients {
    pub text: Arc<dyn TextModel>,
    pub images: Arc<dyn ImageModel>,
}

impl Clients {
    pub fn new(text: Arc<dyn TextModel>, images: Arc<dyn ImageModel>) -> Self {
        Self { text, images }
    }

    /// Azure OpenAI clients for the configured deployments
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            text: Arc::new(AzureChatClient::new(config.text.clone())?),
            images: Arc::new(AzureImageClient::new(config.image.clone())),
        })
    }
}

/// Run the whole pipeline on PDF bytes
pub async fn process_pdf_to_presentation(
    pdf_bytes: &[u8],
    clients: &Clients,
    config: &Config,
    assembler: &SlideAssembler,
    progress: &dyn ProgressReporter,
) -> Result<RunContext> {
    progress.on_step_start(PipelineStep::ExtractContent);
    let text = match extract_text_from_pdf(pdf_bytes) {
        Ok(text) => text,
        Err(e) => {
            progress.on_step_finish(PipelineStep::ExtractContent, StepStatus::Failed);
            return Err(e);
        }
    };
    generate_from_text(&text, clients, config, assembler, progress).await
}

/// Run the pipeline on text that was already extracted
pub async fn process_text_to_presentation(
    text: &str,
    clients: &Clients,
    config: &Config,
    assembler: &SlideAssembler,
    progress: &dyn ProgressReporter,
) -> Result<RunContext> {
    progress.on_step_start(PipelineStep::ExtractContent);
    generate_from_text(text, clients, config, assembler, progress).await
}

async fn generate_from_text(
    text: &str,
    clients: &Clients,
    config: &Config,
    assembler: &SlideAssembler,
    progress: &dyn ProgressReporter,
) -> Result<RunContext> {
    let extraction = match prepare_and_extract(text, clients, config).await {
        Ok(extraction) => extraction,
        Err(e) => {
            progress.on_step_finish(PipelineStep::ExtractContent, StepStatus::Failed);
            return Err(e);
        }
    };
    progress.on_progress(10);
    progress.on_step_finish(PipelineStep::ExtractContent, StepStatus::Complete);

    let mut failures = Vec::new();

    // Step 2: one prompt per section, in order
    progress.on_step_start(PipelineStep::CreatePrompts);
    let sections = &extraction.key_sections;
    let mut prompts = Vec::with_capacity(sections.len());
    for (index, section) in sections.iter().enumerate() {
        match create_visual_prompt(clients.text.as_ref(), section, &extraction.document_title).await
        {
            Ok(prompt) => prompts.push(PromptRecord {
                section_index: index,
                prompt,
            }),
            Err(e) => {
                warn!("Error creating prompt for \"{}\": {}", section.title, e);
                failures.push(SectionFailure {
                    section_index: index,
                    stage: SectionStage::VisualPrompt,
                    detail: e.to_string(),
                });
            }
        }
        progress.on_progress(band_progress(10, 30, index + 1, sections.len()));
    }
    progress.on_progress(30);
    progress.on_step_finish(PipelineStep::CreatePrompts, step_status(&failures, prompts.len()));

    // Step 3: images, concurrently
    progress.on_step_start(PipelineStep::GenerateImages);
    let failures_before = failures.len();
    let done = AtomicUsize::new(0);
    let total = prompts.len();
    let image_results = join_all(prompts.iter().map(|record| {
        let done = &done;
        async move {
            let result = illustrate_section(clients, config, record).await;
            let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
            progress.on_progress(band_progress(30, 60, finished, total));
            result
        }
    }))
    .await;

    let mut illustrated: Vec<(ImageRecord, ImageInfo)> = Vec::with_capacity(total);
    for result in image_results {
        match result {
            Ok(pair) => illustrated.push(pair),
            Err(failure) => {
                warn!("{}", failure);
                failures.push(failure);
            }
        }
    }
    illustrated.sort_by_key(|(record, _)| record.section_index);
    progress.on_progress(60);
    progress.on_step_finish(
        PipelineStep::GenerateImages,
        step_status(&failures[failures_before..], illustrated.len()),
    );

    // Step 4: slides, concurrently
    progress.on_step_start(PipelineStep::CreateSlides);
    let failures_before = failures.len();
    let done = AtomicUsize::new(0);
    let total = illustrated.len();
    let slide_results = join_all(illustrated.iter().map(|(record, info)| {
        let done = &done;
        let section = &sections[record.section_index];
        let document_title = extraction.document_title.as_str();
        async move {
            let result = assemble_section(
                clients,
                assembler,
                section,
                record.section_index,
                info,
                document_title,
            )
            .await;
            let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
            progress.on_progress(band_progress(60, 100, finished, total));
            result
        }
    }))
    .await;

    let mut slides: Vec<Slide> = Vec::with_capacity(total);
    for result in slide_results {
        match result {
            Ok(slide) => slides.push(slide),
            Err(failure) => {
                warn!("{}", failure);
                failures.push(failure);
            }
        }
    }
    slides.sort_by_key(|slide| slide.section_index);

    if slides.is_empty() {
        progress.on_step_finish(PipelineStep::CreateSlides, StepStatus::Failed);
        return Err(DeckError::NoSlidesProduced);
    }
    progress.on_progress(100);
    progress.on_step_finish(
        PipelineStep::CreateSlides,
        step_status(&failures[failures_before..], slides.len()),
    );

    info!(
        "Created {} slides from {} sections ({} dropped)",
        slides.len(),
        sections.len(),
        failures.len()
    );

    Ok(RunContext {
        pdf_preview: preview(text),
        images: illustrated.into_iter().map(|(record, _)| record).collect(),
        prompts,
        slides,
        failures,
        extraction,
    })
}

async fn prepare_and_extract(
    text: &str,
    clients: &Clients,
    config: &Config,
) -> Result<ExtractedDocument> {
    utils::validate_directory_writable(&config.images_folder)?;
    extract_key_sections(clients.text.as_ref(), text).await
}

/// Generate, save and normalise the image for one section.
/// Saved files are numbered from 1 and named after the prompt's section title.
async fn illustrate_section(
    clients: &Clients,
    config: &Config,
    record: &PromptRecord,
) -> std::result::Result<(ImageRecord, ImageInfo), SectionFailure> {
    let section_title = record.prompt.section_title.as_str();
    let generated =
        generate_image_from_prompt(clients.images.as_ref(), &record.prompt.prompt, &config.image_size)
            .await;

    let file_title = if generated.is_placeholder {
        format!("placeholder_{}", section_title)
    } else {
        section_title.to_string()
    };

    let saved = save_image_locally(
        &generated.image,
        &file_title,
        record.section_index + 1,
        &config.images_folder,
    )
    .and_then(|saved| load_image_info(&generated.image, &saved).map(|info| (saved, info)));

    match saved {
        Ok((saved, info)) => Ok((
            ImageRecord {
                section_index: record.section_index,
                url: generated.url,
                revised_prompt: generated.revised_prompt,
                is_placeholder: generated.is_placeholder,
                file_path: saved.file_path.to_string_lossy().to_string(),
            },
            info,
        )),
        Err(e) => Err(SectionFailure {
            section_index: record.section_index,
            stage: SectionStage::ImageSave,
            detail: e.to_string(),
        }),
    }
}

/// Bullets plus slide markup for one illustrated section
pub(crate) async fn assemble_section(
    clients: &Clients,
    assembler: &SlideAssembler,
    section: &Section,
    section_index: usize,
    info: &ImageInfo,
    document_title: &str,
) -> std::result::Result<Slide, SectionFailure> {
    assembler
        .assemble(clients.text.as_ref(), section, section_index, info, document_title)
        .await
        .map_err(|e| SectionFailure {
            section_index,
            stage: SectionStage::Slide,
            detail: e.to_string(),
        })
}

fn step_status(step_failures: &[SectionFailure], produced: usize) -> StepStatus {
    if produced == 0 && !step_failures.is_empty() {
        StepStatus::Failed
    } else if step_failures.is_empty() {
        StepStatus::Complete
    } else {
        StepStatus::Partial
    }
}
