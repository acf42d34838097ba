// ABOUTME: Template-based PPTX export for the pdf2deck application
// ABOUTME: Rewrites an organization deck in place, appending one slide per section

use crate::errors::{DeckError, Result};
use crate::export::{export_bullets, export_image, DeckExporter};
use crate::models::{ExtractedDocument, Slide};
use crate::ooxml::{
    attribute, fit_within, image_dimensions, image_extension, inches, parse_relationships,
    part_dir, part_number, picture, placeholder_picture, placeholder_shape, plain_paragraph,
    read_package, relationships_xml, rels_path_for, resolve_target, rid_number, slide_xml,
    text_box, text_paragraph, Relationship, CT_SLIDE, REL_IMAGE, REL_SLIDE, REL_SLIDE_LAYOUT,
};
use log::{debug, info, warn};
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const SLIDE_PREFIX: &str = "ppt/slides/slide";
const LAYOUT_PREFIX: &str = "ppt/slideLayouts/slideLayout";
const REL_NOTES_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

/// Default slide size when the template does not declare one (13.333in x 7.5in)
const DEFAULT_SLIDE_SIZE: (i64, i64) = (12_192_000, 6_858_000);

/// Where the organization template comes from
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl TemplateSource {
    pub fn load(&self) -> Result<Vec<u8>> {
        match self {
            TemplateSource::Path(path) => {
                if !path.is_file() {
                    return Err(DeckError::TemplateNotFound(path.clone()));
                }
                Ok(std::fs::read(path)?)
            }
            TemplateSource::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

/// Exports into a caller-supplied organization template
pub struct TemplateExporter {
    source: TemplateSource,
}

impl TemplateExporter {
    pub fn new(source: TemplateSource) -> Self {
        Self { source }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(TemplateSource::Path(path.into()))
    }
}

impl DeckExporter for TemplateExporter {
    fn export(&self, slides: &[Slide], document: &ExtractedDocument) -> Result<Vec<u8>> {
        let template = self.source.load()?;
        apply_template(&template, slides, document)
    }
}

/// A placeholder declared on a slide layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderInfo {
    /// `p:ph/@type`, "obj" when absent
    pub kind: String,
    pub idx: Option<String>,
}

impl PlaceholderInfo {
    pub fn is_title(&self) -> bool {
        matches!(self.kind.as_str(), "title" | "ctrTitle")
    }

    pub fn is_body(&self) -> bool {
        matches!(self.kind.as_str(), "body" | "obj")
    }

    pub fn is_picture(&self) -> bool {
        matches!(self.kind.as_str(), "pic" | "media" | "clipArt")
    }

    /// Attributes for a `p:ph` element that inherits from this placeholder
    fn ph_attributes(&self) -> String {
        let mut attrs = String::new();
        if self.kind != "obj" {
            attrs.push_str(&format!(r#"type="{}""#, self.kind));
        }
        if let Some(idx) = &self.idx {
            if !attrs.is_empty() {
                attrs.push(' ');
            }
            attrs.push_str(&format!(r#"idx="{}""#, idx));
        }
        attrs
    }
}

#[derive(Debug, Clone)]
pub struct LayoutInfo {
    pub part: String,
    pub name: String,
    pub layout_type: Option<String>,
    pub placeholders: Vec<PlaceholderInfo>,
}

impl LayoutInfo {
    pub fn title(&self) -> Option<&PlaceholderInfo> {
        self.placeholders.iter().find(|ph| ph.is_title())
    }

    pub fn body(&self) -> Option<&PlaceholderInfo> {
        self.placeholders.iter().find(|ph| ph.is_body())
    }

    pub fn picture(&self) -> Option<&PlaceholderInfo> {
        self.placeholders.iter().find(|ph| ph.is_picture())
    }
}

/// Pick the layout for content slides.
///
/// First layout with both a title and a body placeholder; else the second
/// layout; else a blank one (type `blank`, else the seventh, else the last).
pub fn choose_content_layout(layouts: &[LayoutInfo]) -> Option<usize> {
    if let Some(i) = layouts
        .iter()
        .position(|layout| layout.title().is_some() && layout.body().is_some())
    {
        return Some(i);
    }
    if layouts.len() > 1 {
        return Some(1);
    }
    layouts
        .iter()
        .position(|layout| layout.layout_type.as_deref() == Some("blank"))
        .or(if layouts.len() > 6 { Some(6) } else { None })
        .or_else(|| layouts.len().checked_sub(1))
}

pub fn parse_layout(part: &str, xml: &str) -> Result<LayoutInfo> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut info = LayoutInfo {
        part: part.to_string(),
        name: String::new(),
        layout_type: None,
        placeholders: Vec::new(),
    };

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"sldLayout" => info.layout_type = attribute(e, b"type"),
                b"cSld" => info.name = attribute(e, b"name").unwrap_or_default(),
                b"ph" => info.placeholders.push(PlaceholderInfo {
                    kind: attribute(e, b"type").unwrap_or_else(|| "obj".to_string()),
                    idx: attribute(e, b"idx"),
                }),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(info)
}

/// What `presentation.xml` says about slides, size and masters
#[derive(Debug, Clone, Default)]
struct PresentationInfo {
    slide_ids: Vec<(u32, String)>,
    master_rids: Vec<String>,
    slide_size: Option<(i64, i64)>,
}

fn parse_presentation(xml: &str) -> Result<PresentationInfo> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut info = PresentationInfo::default();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"sldId" => {
                    let id = attribute(e, b"id").and_then(|v| v.parse().ok()).unwrap_or(0);
                    if let Some(rid) = attribute(e, b"r:id") {
                        info.slide_ids.push((id, rid));
                    }
                }
                b"sldMasterId" => {
                    if let Some(rid) = attribute(e, b"r:id") {
                        info.master_rids.push(rid);
                    }
                }
                b"sldSz" => {
                    let cx = attribute(e, b"cx").and_then(|v| v.parse().ok());
                    let cy = attribute(e, b"cy").and_then(|v| v.parse().ok());
                    if let (Some(cx), Some(cy)) = (cx, cy) {
                        info.slide_size = Some((cx, cy));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(info)
}

/// Layout relationship ids in `p:sldLayoutIdLst` order
fn parse_master_layout_rids(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rids = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"sldLayoutId" =>
            {
                if let Some(rid) = attribute(e, b"r:id") {
                    rids.push(rid);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rids)
}

/// Replace the paragraphs of placeholder shapes.
///
/// `fill` receives the placeholder type ("obj" when absent) and returns the
/// new `a:p` markup, or `None` to leave the shape untouched. Body properties
/// and list styles are kept.
pub fn replace_placeholder_text<F>(xml: &str, fill: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());
    let mut shape: Vec<Event<'static>> = Vec::new();
    let mut in_shape = false;

    loop {
        let event = reader.read_event()?;
        if matches!(event, Event::Eof) {
            break;
        }

        let starts_shape = matches!(&event, Event::Start(e) if e.local_name().as_ref() == b"sp");
        let ends_shape = matches!(&event, Event::End(e) if e.local_name().as_ref() == b"sp");

        if !in_shape && !starts_shape {
            writer.write_event(event)?;
            continue;
        }

        in_shape = true;
        shape.push(event.into_owned());
        if ends_shape {
            in_shape = false;
            write_shape(&mut writer, std::mem::take(&mut shape), &fill)?;
        }
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| DeckError::XmlError(format!("rewritten slide is not UTF-8: {}", e)))
}

fn write_shape<F>(writer: &mut Writer<Vec<u8>>, events: Vec<Event<'static>>, fill: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let ph_type = events.iter().find_map(|event| match event {
        Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"ph" => {
            Some(attribute(e, b"type").unwrap_or_else(|| "obj".to_string()))
        }
        _ => None,
    });

    let paragraphs = match ph_type.as_deref().and_then(fill) {
        Some(paragraphs) => paragraphs,
        None => {
            for event in events {
                writer.write_event(event)?;
            }
            return Ok(());
        }
    };

    let has_tx_body = events
        .iter()
        .any(|event| matches!(event, Event::Start(e) if e.local_name().as_ref() == b"txBody"));
    let mut in_tx_body = false;
    let mut skip_depth = 0usize;

    for event in events {
        if skip_depth > 0 {
            match &event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                _ => {}
            }
            continue;
        }

        match &event {
            Event::Start(e) if e.local_name().as_ref() == b"txBody" => in_tx_body = true,
            Event::Start(e) if in_tx_body && e.local_name().as_ref() == b"p" => {
                skip_depth = 1;
                continue;
            }
            Event::Empty(e) if in_tx_body && e.local_name().as_ref() == b"p" => continue,
            Event::End(e) if e.local_name().as_ref() == b"txBody" => {
                writer.get_mut().extend_from_slice(paragraphs.as_bytes());
                in_tx_body = false;
            }
            Event::End(e) if !has_tx_body && e.local_name().as_ref() == b"sp" => {
                let tx_body = format!(
                    "<p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody>",
                    paragraphs
                );
                writer.get_mut().extend_from_slice(tx_body.as_bytes());
            }
            _ => {}
        }

        writer.write_event(event)?;
    }

    Ok(())
}

/// Replace `p:sldIdLst` with the given entries, inserting it before
/// `p:sldSz` when the template has none
fn rewrite_slide_id_list(xml: &str, slide_ids: &[(u32, String)]) -> Result<String> {
    let list = if slide_ids.is_empty() {
        String::new()
    } else {
        let entries: String = slide_ids
            .iter()
            .map(|(id, rid)| format!(r#"<p:sldId id="{}" r:id="{}"/>"#, id, rid))
            .collect();
        format!("<p:sldIdLst>{}</p:sldIdLst>", entries)
    };

    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());
    let mut written = false;
    let mut skipping = false;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Eof => break,
            _ if skipping => {
                if matches!(&event, Event::End(e) if e.local_name().as_ref() == b"sldIdLst") {
                    skipping = false;
                }
                continue;
            }
            Event::Start(e) if e.local_name().as_ref() == b"sldIdLst" => {
                writer.get_mut().extend_from_slice(list.as_bytes());
                written = true;
                skipping = true;
                continue;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"sldIdLst" => {
                writer.get_mut().extend_from_slice(list.as_bytes());
                written = true;
                continue;
            }
            Event::Start(e) | Event::Empty(e)
                if !written && e.local_name().as_ref() == b"sldSz" =>
            {
                writer.get_mut().extend_from_slice(list.as_bytes());
                written = true;
            }
            Event::End(e) if !written && e.local_name().as_ref() == b"presentation" => {
                writer.get_mut().extend_from_slice(list.as_bytes());
                written = true;
            }
            _ => {}
        }
        writer.write_event(event)?;
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| DeckError::XmlError(format!("rewritten presentation is not UTF-8: {}", e)))
}

/// `[Content_Types].xml` as Default and Override lists
#[derive(Debug, Clone, Default)]
struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut types = ContentTypes::default();

        loop {
            match reader.read_event()? {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let content_type = attribute(e, b"ContentType").unwrap_or_default();
                    match e.local_name().as_ref() {
                        b"Default" => {
                            if let Some(ext) = attribute(e, b"Extension") {
                                types.defaults.push((ext, content_type));
                            }
                        }
                        b"Override" => {
                            if let Some(part) = attribute(e, b"PartName") {
                                types.overrides.push((part, content_type));
                            }
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(types)
    }

    fn ensure_default(&mut self, extension: &str, content_type: &str) {
        if !self
            .defaults
            .iter()
            .any(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        {
            self.defaults
                .push((extension.to_string(), content_type.to_string()));
        }
    }

    fn to_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                ext, content_type
            ));
        }
        for (part, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part, content_type
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

/// In-memory package, entries kept in archive order
struct Package {
    entries: Vec<(String, Vec<u8>)>,
    index: HashMap<String, usize>,
}

impl Package {
    fn open(bytes: &[u8]) -> Result<Self> {
        let entries = read_package(bytes)?;
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
        Ok(Self { entries, index })
    }

    fn get(&self, name: &str) -> Option<&[u8]> {
        self.index
            .get(name)
            .map(|&i| self.entries[i].1.as_slice())
    }

    fn get_str(&self, name: &str) -> Result<Option<String>> {
        match self.get(name) {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|e| DeckError::TemplateError(format!("{} is not UTF-8: {}", name, e))),
            None => Ok(None),
        }
    }

    fn require_str(&self, name: &str) -> Result<String> {
        self.get_str(name)?
            .ok_or_else(|| DeckError::TemplateError(format!("template is missing {}", name)))
    }

    fn relationships(&self, part: &str) -> Result<Vec<Relationship>> {
        match self.get_str(&rels_path_for(part))? {
            Some(xml) => parse_relationships(&xml),
            None => Ok(Vec::new()),
        }
    }

    fn set(&mut self, name: &str, data: Vec<u8>) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 = data,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), data));
            }
        }
    }

    fn to_bytes(&self, removed: &HashSet<String>) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, data) in &self.entries {
            if removed.contains(name) {
                continue;
            }
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Apply slides to a template package and return the new package bytes
pub fn apply_template(
    template: &[u8],
    slides: &[Slide],
    document: &ExtractedDocument,
) -> Result<Vec<u8>> {
    let mut package = Package::open(template)?;
    let presentation_xml = package.require_str(PRESENTATION_PART)?;
    let presentation = parse_presentation(&presentation_xml)?;
    let mut pres_rels = package.relationships(PRESENTATION_PART)?;
    let slide_size = presentation.slide_size.unwrap_or(DEFAULT_SLIDE_SIZE);

    let target_of = |rels: &[Relationship], rid: &str, base: &str| {
        rels.iter()
            .find(|rel| rel.id == rid)
            .map(|rel| resolve_target(base, &rel.target))
    };

    // Keep the first slide, drop the rest along with their notes
    let mut removed: HashSet<String> = HashSet::new();
    let mut kept_ids: Vec<(u32, String)> = Vec::new();
    let mut first_slide: Option<String> = None;
    for (position, (id, rid)) in presentation.slide_ids.iter().enumerate() {
        let part = target_of(&pres_rels, rid, "ppt");
        if position == 0 {
            kept_ids.push((*id, rid.clone()));
            first_slide = part;
            continue;
        }
        pres_rels.retain(|rel| &rel.id != rid);
        if let Some(part) = part {
            debug!("Dropping template slide {}", part);
            for rel in package.relationships(&part)? {
                if rel.rel_type == REL_NOTES_SLIDE {
                    let notes = resolve_target(part_dir(&part), &rel.target);
                    removed.insert(rels_path_for(&notes));
                    removed.insert(notes);
                }
            }
            removed.insert(rels_path_for(&part));
            removed.insert(part);
        }
    }
    info!(
        "Template has {} slides; keeping the first",
        presentation.slide_ids.len()
    );

    if let Some(part) = &first_slide {
        if let Some(xml) = package.get_str(part)? {
            let title = document.document_title.clone();
            let rewritten = replace_placeholder_text(&xml, |kind| match kind {
                "title" | "ctrTitle" => Some(plain_paragraph(&title)),
                "subTitle" => Some(plain_paragraph("")),
                _ => None,
            })?;
            package.set(part, rewritten.into_bytes());
        }
    }

    // Layouts of the first master, in master order
    let master_part = presentation
        .master_rids
        .first()
        .and_then(|rid| target_of(&pres_rels, rid, "ppt"));
    let mut layout_parts: Vec<String> = Vec::new();
    if let Some(master) = &master_part {
        let master_rels = package.relationships(master)?;
        if let Some(xml) = package.get_str(master)? {
            for rid in parse_master_layout_rids(&xml)? {
                if let Some(part) = target_of(&master_rels, &rid, part_dir(master)) {
                    layout_parts.push(part);
                }
            }
        }
    }
    if layout_parts.is_empty() {
        let mut numbered: Vec<(u32, String)> = package
            .entries
            .iter()
            .filter_map(|(name, _)| part_number(name, LAYOUT_PREFIX).map(|n| (n, name.clone())))
            .collect();
        numbered.sort();
        layout_parts = numbered.into_iter().map(|(_, name)| name).collect();
    }

    let mut layouts = Vec::with_capacity(layout_parts.len());
    for part in &layout_parts {
        if let Some(xml) = package.get_str(part)? {
            layouts.push(parse_layout(part, &xml)?);
        }
    }
    let layout = choose_content_layout(&layouts)
        .and_then(|i| layouts.get(i))
        .ok_or_else(|| DeckError::TemplateError("template has no slide layouts".to_string()))?;
    info!("Using template layout \"{}\" ({})", layout.name, layout.part);

    let mut content_types = ContentTypes::parse(&package.require_str(CONTENT_TYPES_PART)?)?;
    content_types
        .overrides
        .retain(|(part, _)| !removed.contains(part.trim_start_matches('/')));

    let mut next_slide_number = package
        .entries
        .iter()
        .filter_map(|(name, _)| part_number(name, SLIDE_PREFIX))
        .max()
        .unwrap_or(0)
        + 1;
    let mut next_rid = pres_rels
        .iter()
        .filter_map(|rel| rid_number(&rel.id))
        .max()
        .unwrap_or(0)
        + 1;
    let mut next_slide_id = presentation
        .slide_ids
        .iter()
        .map(|(id, _)| *id)
        .max()
        .map(|id| id + 1)
        .unwrap_or(256)
        .max(256);
    let layout_target = format!(
        "../slideLayouts/{}",
        layout.part.rsplit('/').next().unwrap_or(&layout.part)
    );

    for slide in slides {
        let number = next_slide_number;
        next_slide_number += 1;
        let part = format!("{}{}.xml", SLIDE_PREFIX, number);

        let mut rels = vec![Relationship::new("rId1", REL_SLIDE_LAYOUT, layout_target.clone())];
        let image = export_image(slide).and_then(|bytes| match image_dimensions(&bytes) {
            Some(dims) => Some((bytes, dims)),
            None => {
                warn!("Could not decode image for slide \"{}\"; skipping it", slide.title);
                None
            }
        });
        let image_dims = match image {
            Some((bytes, dims)) => {
                let extension = image_extension(&bytes);
                let media = format!("ppt/media/deck_image{}.{}", number, extension);
                content_types.ensure_default(extension, &format!("image/{}", extension));
                rels.push(Relationship::new(
                    "rId2",
                    REL_IMAGE,
                    format!("../media/deck_image{}.{}", number, extension),
                ));
                package.set(&media, bytes);
                Some(dims)
            }
            None => None,
        };

        let shapes = template_slide_shapes(layout, slide, image_dims, slide_size);
        package.set(&part, slide_xml(&shapes).into_bytes());
        package.set(&rels_path_for(&part), relationships_xml(&rels).into_bytes());
        content_types
            .overrides
            .push((format!("/{}", part), CT_SLIDE.to_string()));

        let rid = format!("rId{}", next_rid);
        next_rid += 1;
        pres_rels.push(Relationship::new(
            rid.clone(),
            REL_SLIDE,
            format!("slides/slide{}.xml", number),
        ));
        kept_ids.push((next_slide_id, rid));
        next_slide_id += 1;
    }

    package.set(
        PRESENTATION_PART,
        rewrite_slide_id_list(&presentation_xml, &kept_ids)?.into_bytes(),
    );
    package.set(
        &rels_path_for(PRESENTATION_PART),
        relationships_xml(&pres_rels).into_bytes(),
    );
    package.set(CONTENT_TYPES_PART, content_types.to_xml().into_bytes());

    info!("Template deck has {} slides", kept_ids.len());
    package.to_bytes(&removed)
}

fn template_slide_shapes(
    layout: &LayoutInfo,
    slide: &Slide,
    image_pixels: Option<(u32, u32)>,
    slide_size: (i64, i64),
) -> String {
    let (slide_w, slide_h) = slide_size;
    let mut shapes = String::new();
    let mut next_id = 2;
    let mut id = || {
        let current = next_id;
        next_id += 1;
        current
    };

    match layout.title() {
        Some(ph) => shapes.push_str(&placeholder_shape(
            id(),
            "Title",
            &ph.ph_attributes(),
            None,
            &plain_paragraph(&slide.title),
        )),
        None => shapes.push_str(&text_box(
            id(),
            "Title",
            inches(0.5),
            inches(0.3),
            slide_w - inches(1.0),
            inches(1.0),
            &text_paragraph(&slide.title, 2800, true, None, "l"),
        )),
    }

    let body = layout.body();
    let bullets = export_bullets(slide);
    match body {
        Some(ph) if !bullets.is_empty() => {
            let paragraphs: String = bullets.iter().map(|point| plain_paragraph(point)).collect();
            shapes.push_str(&placeholder_shape(
                id(),
                "Content",
                &ph.ph_attributes(),
                None,
                &paragraphs,
            ));
        }
        Some(_) => {}
        None => debug!("Layout \"{}\" has no body placeholder", layout.name),
    }

    if let Some(pixels) = image_pixels {
        match layout.picture() {
            Some(ph) => shapes.push_str(&placeholder_picture(
                id(),
                "Section Image",
                &ph.ph_attributes(),
                "rId2",
            )),
            None => {
                let (width, top) = if body.is_some() {
                    (inches(4.0), inches(2.0))
                } else {
                    (inches(6.0), (slide_h - inches(5.0)) / 2)
                };
                let (cx, cy) = fit_within(pixels, width, slide_h);
                let left = if body.is_some() {
                    slide_w - cx - inches(0.5)
                } else {
                    (slide_w - cx) / 2
                };
                shapes.push_str(&picture(
                    id(),
                    "Section Image",
                    "rId2",
                    left,
                    top.max(0),
                    cx,
                    cy,
                ));
            }
        }
    }

    shapes
}
