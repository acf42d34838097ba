// ABOUTME: Main entry point for the pdf2deck program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::info;
use pdf2deck::{
    html, pipeline, resources, utils, BlankCanvasExporter, Clients, Config, DeckExporter,
    DeckError, DeckServer, HtmlZipExporter, LogProgress, Logo, RunContext, SlideAssembler,
    TemplateExporter, TemplateSource,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn a PDF into illustrated HTML slides and a PowerPoint deck
    Generate(GenerateArgs),

    /// Export a generated deck manifest to PowerPoint
    ExportPptx(ExportPptxArgs),

    /// Export a generated deck manifest as a zip of HTML slides
    ExportHtml(ExportHtmlArgs),

    /// Preview a generated deck in the browser and download exports
    Serve(ServeArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Path to the PDF document
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for deck.json, slides and exports
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Organization PowerPoint template
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Only write HTML slides and the manifest
    #[arg(long)]
    skip_pptx: bool,

    #[command(flatten)]
    services: ServiceArgs,
}

#[derive(Args)]
struct ServiceArgs {
    /// Chat completion API key
    #[arg(long, env = "AZURE_OPENAI_API_KEY", hide_env_values = true)]
    text_api_key: Option<String>,

    /// Chat completion endpoint
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT")]
    text_endpoint: Option<String>,

    /// Chat completion deployment name
    #[arg(long, env = "AZURE_OPENAI_DEPLOYMENT")]
    text_deployment: Option<String>,

    /// Image generation API key
    #[arg(long, env = "DALLE_API_KEY", hide_env_values = true)]
    image_api_key: Option<String>,

    /// Image generation endpoint
    #[arg(long, env = "DALLE_ENDPOINT")]
    image_endpoint: Option<String>,

    /// Image generation deployment name
    #[arg(long, env = "DALLE_DEPLOYMENT")]
    image_deployment: Option<String>,

    /// Where generated images are saved
    #[arg(long, env = "IMAGES_FOLDER")]
    images_folder: Option<PathBuf>,

    /// Requested image size, e.g. 1024x1024
    #[arg(long, env = "IMAGE_SIZE")]
    image_size: Option<String>,
}

impl ServiceArgs {
    fn apply(&self, mut config: Config) -> Config {
        let set = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                *target = value.clone();
            }
        };
        set(&mut config.text.api_key, &self.text_api_key);
        set(&mut config.text.endpoint, &self.text_endpoint);
        set(&mut config.text.deployment, &self.text_deployment);
        set(&mut config.image.api_key, &self.image_api_key);
        set(&mut config.image.endpoint, &self.image_endpoint);
        set(&mut config.image.deployment, &self.image_deployment);
        set(&mut config.image_size, &self.image_size);
        if let Some(folder) = &self.images_folder {
            config.images_folder = folder.clone();
        }
        config
    }
}

#[derive(Args)]
struct ExportPptxArgs {
    /// Deck manifest written by `generate`
    #[arg(short, long)]
    deck: PathBuf,

    /// Path to output PPTX file
    #[arg(short, long)]
    output: PathBuf,

    /// Organization PowerPoint template
    #[arg(short, long)]
    template: Option<PathBuf>,
}

#[derive(Args)]
struct ExportHtmlArgs {
    /// Deck manifest written by `generate`
    #[arg(short, long)]
    deck: PathBuf,

    /// Path to output zip file
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct ServeArgs {
    /// Deck manifest written by `generate`
    #[arg(short, long)]
    deck: PathBuf,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Organization PowerPoint template
    #[arg(short, long)]
    template: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Generate(args)) => {
            println!("Executing generate command...");
            generate(args).await
        }
        Some(Commands::ExportPptx(args)) => {
            println!("Executing export-pptx command...");
            export_pptx(args)
        }
        Some(Commands::ExportHtml(args)) => {
            println!("Executing export-html command...");
            export_html(args)
        }
        Some(Commands::Serve(args)) => serve(args),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// PPTX exporter: explicit template, else a default template on disk, else blank canvas
fn pptx_exporter(template: Option<PathBuf>, logo: Logo) -> Box<dyn DeckExporter> {
    match template.or_else(|| resources::find_default_template(&working_dir())) {
        Some(path) => {
            println!("Using PowerPoint template {:?}", path);
            Box::new(TemplateExporter::from_path(path))
        }
        None => Box::new(BlankCanvasExporter::new(logo)),
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    utils::ensure_parent_directory_exists(path)?;
    fs::write(path, bytes).with_context(|| format!("Failed to write {:?}", path))
}

async fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    utils::validate_file_exists(&args.input)?;
    if let Some(template) = &args.template {
        if !template.is_file() {
            return Err(DeckError::TemplateNotFound(template.clone()).into());
        }
    }

    let config = args.services.apply(Config::from_env());
    let clients = Clients::from_config(&config)?;
    let logo = Logo::load(&working_dir());
    let assembler = SlideAssembler::new(&logo);
    let progress = LogProgress::new();

    let pdf_bytes = fs::read(&args.input)
        .with_context(|| format!("Failed to read {:?}", args.input))?;
    let deck =
        pipeline::process_pdf_to_presentation(&pdf_bytes, &clients, &config, &assembler, &progress)
            .await?;

    utils::ensure_directory_exists(&args.output_dir)?;
    deck.save(&args.output_dir.join(pipeline::MANIFEST_FILE))?;

    let written = html::write_slides_to_dir(&deck.slides, &args.output_dir.join("slides"))?;
    info!("Wrote {} HTML slides", written.len());

    let zip = HtmlZipExporter.export(&deck.slides, deck.document())?;
    write_bytes(&args.output_dir.join("slides.zip"), &zip)?;

    if !args.skip_pptx {
        let exporter = pptx_exporter(args.template, logo);
        let bytes = exporter.export(&deck.slides, deck.document())?;
        let pptx_path = args
            .output_dir
            .join(utils::deck_file_name(&deck.document().document_title));
        write_bytes(&pptx_path, &bytes)?;
        println!("PowerPoint written to {:?}", pptx_path);
    }

    for failure in &deck.failures {
        println!("Skipped section {}: {}", failure.section_index + 1, failure.detail);
    }
    println!(
        "Generated {} slides in {:?}",
        deck.slides.len(),
        args.output_dir
    );
    Ok(())
}

fn export_pptx(args: ExportPptxArgs) -> anyhow::Result<()> {
    let deck = RunContext::load(&args.deck)?;
    let exporter: Box<dyn DeckExporter> = match args.template {
        Some(path) => Box::new(TemplateExporter::from_path(path)),
        None => Box::new(BlankCanvasExporter::new(Logo::load(&working_dir()))),
    };
    let bytes = exporter.export(&deck.slides, deck.document())?;
    write_bytes(&args.output, &bytes)?;
    println!("PPTX generated successfully: {:?}", args.output);
    Ok(())
}

fn export_html(args: ExportHtmlArgs) -> anyhow::Result<()> {
    let deck = RunContext::load(&args.deck)?;
    let bytes = HtmlZipExporter.export(&deck.slides, deck.document())?;
    write_bytes(&args.output, &bytes)?;
    println!("HTML slides archived successfully: {:?}", args.output);
    Ok(())
}

fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let deck = RunContext::load(&args.deck)?;
    let template = args
        .template
        .or_else(|| resources::find_default_template(&working_dir()))
        .map(TemplateSource::Path);
    let server = DeckServer::new(deck, Logo::load(&working_dir()), template);
    server.serve(args.port)?;
    Ok(())
}
