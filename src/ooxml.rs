// ABOUTME: Shared Office Open XML helpers for the PPTX exporters
// ABOUTME: Units, relationship parsing, part paths and DrawingML fragment builders

use crate::errors::{DeckError, Result};
use image::io::Reader as ImageReader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub const EMU_PER_INCH: i64 = 914_400;

/// 16:9 canvas, 16in x 9in
pub const WIDE_SLIDE_CX: i64 = 16 * EMU_PER_INCH;
pub const WIDE_SLIDE_CY: i64 = 9 * EMU_PER_INCH;

pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

pub const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

/// Inches to EMU
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Escape text for element content and attribute values
pub fn esc(text: &str) -> String {
    escape(text).into_owned()
}

/// Hex color without the leading '#'
pub fn srgb(color: &str) -> &str {
    color.trim_start_matches('#')
}

/// One entry of a `.rels` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

impl Relationship {
    pub fn new(id: impl Into<String>, rel_type: &str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type: rel_type.to_string(),
            target: target.into(),
        }
    }
}

/// Read an attribute by its qualified name
pub fn attribute(element: &BytesStart, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

pub fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attribute(e, b"Id").unwrap_or_default();
                let rel_type = attribute(e, b"Type").unwrap_or_default();
                let target = attribute(e, b"Target").unwrap_or_default();
                rels.push(Relationship {
                    id,
                    rel_type,
                    target,
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DeckError::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(rels)
}

pub fn relationships_xml(rels: &[Relationship]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">
"#,
        NS_PKG_RELS
    );
    for rel in rels {
        xml.push_str(&format!(
            r#"    <Relationship Id="{}" Type="{}" Target="{}"/>
"#,
            esc(&rel.id),
            esc(&rel.rel_type),
            esc(&rel.target)
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// The `.rels` part that belongs to a part, e.g. `ppt/slides/_rels/slide1.xml.rels`
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the directory of its source part
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

pub fn part_dir(part: &str) -> &str {
    part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Numeric suffix of an `rIdN` identifier
pub fn rid_number(id: &str) -> Option<u32> {
    id.strip_prefix("rId").and_then(|n| n.parse().ok())
}

/// Numeric suffix of a part such as `ppt/slides/slide12.xml`
pub fn part_number(part: &str, prefix: &str) -> Option<u32> {
    part.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(".xml"))
        .and_then(|n| n.parse().ok())
}

/// Every entry of a zip package, in archive order
pub fn read_package(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DeckError::TemplateError(format!("not a valid PPTX package: {}", e)))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        entries.push((file.name().to_string(), data));
    }

    Ok(entries)
}

/// Pixel dimensions of encoded image bytes, if they can be read
pub fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok())
        .filter(|(w, h)| *w > 0 && *h > 0)
}

/// File extension for encoded image bytes
pub fn image_extension(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => "jpeg",
        Ok(image::ImageFormat::Gif) => "gif",
        _ => "png",
    }
}

/// Scale (width, height) pixels into a box, keeping the aspect ratio. Returns EMU.
pub fn fit_within(pixels: (u32, u32), max_cx: i64, max_cy: i64) -> (i64, i64) {
    let (w, h) = (pixels.0.max(1) as f64, pixels.1.max(1) as f64);
    let cx = max_cx as f64;
    let cy = cx * h / w;
    if cy <= max_cy as f64 {
        (max_cx, cy.round() as i64)
    } else {
        ((max_cy as f64 * w / h).round() as i64, max_cy)
    }
}

/// Plain paragraph with a single run
pub fn text_paragraph(text: &str, size: u32, bold: bool, color: Option<&str>, align: &str) -> String {
    let fill = color
        .map(|c| format!(r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, srgb(c)))
        .unwrap_or_default();
    format!(
        r#"<a:p><a:pPr algn="{align}"/><a:r><a:rPr lang="en-US" sz="{size}" b="{bold}" dirty="0">{fill}</a:rPr><a:t>{text}</a:t></a:r></a:p>"#,
        align = align,
        size = size,
        bold = if bold { 1 } else { 0 },
        fill = fill,
        text = esc(text)
    )
}

/// Bulleted paragraph
pub fn bullet_paragraph(text: &str, size: u32, color: &str) -> String {
    format!(
        r#"<a:p><a:pPr marL="342900" indent="-342900"><a:spcBef><a:spcPts val="600"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/></a:pPr><a:r><a:rPr lang="en-US" sz="{size}" dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill></a:rPr><a:t>{text}</a:t></a:r></a:p>"#,
        size = size,
        color = srgb(color),
        text = esc(text)
    )
}

/// Paragraph for a placeholder, inheriting all formatting from the layout
pub fn plain_paragraph(text: &str) -> String {
    if text.is_empty() {
        return r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#.to_string();
    }
    format!(
        r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
        esc(text)
    )
}

/// Absolutely positioned text box
pub fn text_box(id: u32, name: &str, x: i64, y: i64, cx: i64, cy: i64, paragraphs: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        id = id,
        name = esc(name),
        x = x,
        y = y,
        cx = cx,
        cy = cy,
        paragraphs = paragraphs
    )
}

/// Absolutely positioned picture referencing an image relationship
pub fn picture(id: u32, name: &str, r_id: &str, x: i64, y: i64, cx: i64, cy: i64) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="{name}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{r_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
        id = id,
        name = esc(name),
        r_id = r_id,
        x = x,
        y = y,
        cx = cx,
        cy = cy
    )
}

/// Slide part wrapping a shape tree
pub fn slide_xml(shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">
    <p:cSld>
        <p:spTree>
            <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
            <p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>
            {shapes}
        </p:spTree>
    </p:cSld>
    <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sld>"#,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        shapes = shapes
    )
}

/// Placeholder shape. `ph` holds the `p:ph` attributes, e.g. `type="title"`;
/// without a frame the position is inherited from the layout.
pub fn placeholder_shape(
    id: u32,
    name: &str,
    ph: &str,
    frame: Option<(i64, i64, i64, i64)>,
    paragraphs: &str,
) -> String {
    let sp_pr = match frame {
        Some((x, y, cx, cy)) => format!(
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr>"#,
            x, y, cx, cy
        ),
        None => "<p:spPr/>".to_string(),
    };
    let paragraphs = if paragraphs.is_empty() {
        plain_paragraph("")
    } else {
        paragraphs.to_string()
    };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {ph}/></p:nvPr></p:nvSpPr>{sp_pr}<p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        id = id,
        name = esc(name),
        ph = ph,
        sp_pr = sp_pr,
        paragraphs = paragraphs
    )
}

/// Picture filling a picture placeholder
pub fn placeholder_picture(id: u32, name: &str, ph: &str, r_id: &str) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="{name}"/><p:cNvPicPr><a:picLocks noGrp="1" noChangeAspect="1"/></p:cNvPicPr><p:nvPr><p:ph {ph}/></p:nvPr></p:nvPicPr><p:blipFill><a:blip r:embed="{r_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr/></p:pic>"#,
        id = id,
        name = esc(name),
        ph = ph,
        r_id = r_id
    )
}
