// ABOUTME: Local preview and download server for generated decks
// ABOUTME: Serves slide HTML, the HTML zip and PPTX exports over tiny_http

use crate::errors::{DeckError, Result};
use crate::export::{DeckExporter, HtmlZipExporter};
use crate::pipeline::RunContext;
use crate::pptx::BlankCanvasExporter;
use crate::resources::Logo;
use crate::template::{TemplateExporter, TemplateSource};
use crate::utils;
use log::{debug, error, info};
use quick_xml::escape::escape;
use tiny_http::{Header, Response, Server, StatusCode};

const HTML: &str = "text/html; charset=utf-8";
const ZIP: &str = "application/zip";
const PPTX: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";
const TEXT: &str = "text/plain; charset=utf-8";

/// A fully computed response, independent of the HTTP layer
#[derive(Debug, Clone, PartialEq)]
pub struct ServeResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Download file name, sent as `Content-Disposition: attachment`
    pub attachment: Option<String>,
}

impl ServeResponse {
    fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
            attachment: None,
        }
    }

    fn download(content_type: &'static str, body: Vec<u8>, name: String) -> Self {
        Self {
            attachment: Some(name),
            ..Self::ok(content_type, body)
        }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            content_type: TEXT,
            body: b"404 Not Found".to_vec(),
            attachment: None,
        }
    }

    fn failed(e: DeckError) -> Self {
        error!("Export failed: {}", e);
        Self {
            status: 500,
            content_type: TEXT,
            body: format!("Export failed: {}", e).into_bytes(),
            attachment: None,
        }
    }
}

/// Serves one generated deck
pub struct DeckServer {
    deck: RunContext,
    blank: BlankCanvasExporter,
    template: Option<TemplateExporter>,
}

impl DeckServer {
    pub fn new(deck: RunContext, logo: Logo, template: Option<TemplateSource>) -> Self {
        Self {
            deck,
            blank: BlankCanvasExporter::new(logo),
            template: template.map(TemplateExporter::new),
        }
    }

    /// Map a request path to a response
    pub fn route(&self, url: &str) -> ServeResponse {
        let path = url.split('?').next().unwrap_or(url);
        let slides = &self.deck.slides;
        let document = self.deck.document();

        match path {
            "/" | "/index.html" => ServeResponse::ok(HTML, self.index_html().into_bytes()),
            "/download/slides.zip" => match HtmlZipExporter.export(slides, document) {
                Ok(bytes) => ServeResponse::download(ZIP, bytes, "slides.zip".to_string()),
                Err(e) => ServeResponse::failed(e),
            },
            "/download/presentation.pptx" => match self.blank.export(slides, document) {
                Ok(bytes) => ServeResponse::download(
                    PPTX,
                    bytes,
                    utils::deck_file_name(&document.document_title),
                ),
                Err(e) => ServeResponse::failed(e),
            },
            "/download/template.pptx" => match &self.template {
                Some(exporter) => match exporter.export(slides, document) {
                    Ok(bytes) => ServeResponse::download(
                        PPTX,
                        bytes,
                        utils::deck_file_name(&document.document_title),
                    ),
                    Err(e) => ServeResponse::failed(e),
                },
                None => ServeResponse::not_found(),
            },
            _ => {
                if let Some(n) = slide_number(path, "/slides/") {
                    return match slides.get(n - 1) {
                        Some(slide) => ServeResponse::ok(HTML, slide.html_content.clone().into_bytes()),
                        None => ServeResponse::not_found(),
                    };
                }
                if let Some(n) = slide_number(path, "/download/slides/") {
                    return match slides.get(n - 1) {
                        Some(slide) => ServeResponse::download(
                            HTML,
                            slide.html_content.clone().into_bytes(),
                            utils::slide_file_name(n, &slide.title),
                        ),
                        None => ServeResponse::not_found(),
                    };
                }
                ServeResponse::not_found()
            }
        }
    }

    /// Landing page listing every slide with preview and download links
    pub fn index_html(&self) -> String {
        let document = self.deck.document();
        let mut items = String::new();
        for (i, slide) in self.deck.slides.iter().enumerate() {
            let n = i + 1;
            items.push_str(&format!(
                r#"        <li><a href="/slides/{n}">{n}. {title}</a> <small>({layout})</small> &middot; <a href="/download/slides/{n}">download</a></li>
"#,
                n = n,
                title = escape(slide.title.as_str()),
                layout = slide.layout
            ));
        }

        let template_link = if self.template.is_some() {
            r#"        <li><a href="/download/template.pptx">PowerPoint (organization template)</a></li>
"#
        } else {
            ""
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>body {{ font-family: 'Segoe UI', Roboto, Arial, sans-serif; margin: 40px; color: #333333; }} a {{ color: #007BC0; }} li {{ margin: 6px 0; }}</style>
</head>
<body>
    <h1>{title}</h1>
    <p>{summary}</p>
    <h2>Slides</h2>
    <ol style="list-style: none; padding: 0;">
{items}    </ol>
    <h2>Downloads</h2>
    <ul>
        <li><a href="/download/slides.zip">All slides (HTML zip)</a></li>
        <li><a href="/download/presentation.pptx">PowerPoint</a></li>
{template_link}    </ul>
</body>
</html>"#,
            title = escape(document.document_title.as_str()),
            summary = escape(document.summary.as_str()),
            items = items,
            template_link = template_link
        )
    }

    /// Serve until the process is stopped
    pub fn serve(&self, port: u16) -> Result<()> {
        let address = format!("127.0.0.1:{}", port);
        let server = Server::http(&address)
            .map_err(|e| DeckError::ServerError(format!("Failed to start HTTP server: {}", e)))?;

        info!("HTTP server listening on http://{}", address);
        println!("Preview server listening on http://{}", address);

        for request in server.incoming_requests() {
            let url = request.url().to_string();
            let routed = self.route(&url);
            debug!("{} {} -> {}", request.method(), url, routed.status);

            let mut response =
                Response::from_data(routed.body).with_status_code(StatusCode(routed.status));
            if let Ok(header) = Header::from_bytes("Content-Type", routed.content_type) {
                response = response.with_header(header);
            }
            if let Some(name) = routed.attachment {
                let disposition = format!("attachment; filename=\"{}\"", ascii_file_name(&name));
                if let Ok(header) = Header::from_bytes("Content-Disposition", disposition) {
                    response = response.with_header(header);
                }
            }

            if let Err(e) = request.respond(response) {
                error!("Failed to send response: {}", e);
            }
        }

        Ok(())
    }
}

/// 1-based slide number following `prefix`
fn slide_number(path: &str, prefix: &str) -> Option<usize> {
    path.strip_prefix(prefix)
        .and_then(|rest| rest.trim_end_matches('/').parse::<usize>().ok())
        .filter(|n| *n >= 1)
}

fn ascii_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii() && c != '"' { c } else { '_' })
        .collect()
}
