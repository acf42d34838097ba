// ABOUTME: PPTX generation module for the pdf2deck application
// ABOUTME: Builds a 16:9 PowerPoint package from scratch with one slide per section

use crate::errors::Result;
use crate::export::{export_bullets, export_image, DeckExporter};
use crate::models::{ExtractedDocument, LayoutKind, Palette, Slide};
use crate::ooxml::{
    bullet_paragraph, esc, fit_within, image_dimensions, image_extension, inches, picture,
    placeholder_shape, relationships_xml, slide_xml, srgb, text_box, text_paragraph, Relationship,
    NS_A, NS_P, NS_R, REL_IMAGE, REL_OFFICE_DOCUMENT, REL_SLIDE, REL_SLIDE_LAYOUT,
    REL_SLIDE_MASTER, REL_THEME, WIDE_SLIDE_CX, WIDE_SLIDE_CY,
};
use crate::resources::Logo;
use log::{info, warn};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Title slide summaries are cut at this many characters
pub const SUMMARY_PREVIEW_CHARS: usize = 300;

const LOGO_HEIGHT_IN: f64 = 0.6;
const CONTENT_TOP_IN: f64 = 1.9;
const CONTENT_MAX_HEIGHT_IN: f64 = 6.2;
const RIGHT_MARGIN_IN: f64 = 0.3;

/// Writes decks from scratch: own theme, master and layouts
pub struct BlankCanvasExporter {
    logo: Logo,
    palette: Palette,
}

impl BlankCanvasExporter {
    pub fn new(logo: Logo) -> Self {
        Self {
            logo,
            palette: Palette::default(),
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}

impl DeckExporter for BlankCanvasExporter {
    fn export(&self, slides: &[Slide], document: &ExtractedDocument) -> Result<Vec<u8>> {
        generate_pptx(slides, document, &self.logo, &self.palette)
    }
}

/// Frame of a shape in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// Where bullets and picture go on a content slide
#[derive(Debug, Clone, PartialEq)]
pub struct ContentPlacement {
    /// One frame per bullet column
    pub columns: Vec<Frame>,
    pub image: Option<Frame>,
}

/// Absolute positions for a layout kind on the 16in x 9in canvas
pub fn content_placement(
    layout: LayoutKind,
    bullet_columns: usize,
    image_pixels: Option<(u32, u32)>,
) -> ContentPlacement {
    let slide_w = WIDE_SLIDE_CX;
    let left = inches(0.5);
    let top = inches(CONTENT_TOP_IN);
    let max_h = inches(CONTENT_MAX_HEIGHT_IN);

    let right_image = |fraction: f64| {
        image_pixels.map(|pixels| {
            let (cx, cy) = fit_within(pixels, (slide_w as f64 * fraction) as i64, max_h);
            Frame {
                x: slide_w - cx - inches(RIGHT_MARGIN_IN),
                y: top,
                cx,
                cy,
            }
        })
    };

    match layout {
        LayoutKind::ImageFocus => {
            let image = image_pixels.map(|pixels| {
                let (cx, cy) = fit_within(pixels, inches(10.0), inches(3.5));
                Frame {
                    x: (slide_w - cx) / 2,
                    y: inches(1.8),
                    cx,
                    cy,
                }
            });
            ContentPlacement {
                columns: vec![Frame {
                    x: inches(1.0),
                    y: inches(5.5),
                    cx: slide_w - inches(2.0),
                    cy: inches(2.5),
                }],
                image,
            }
        }
        LayoutKind::TextFocus => ContentPlacement {
            columns: vec![Frame {
                x: left,
                y: top,
                cx: (slide_w as f64 * 0.70) as i64,
                cy: max_h,
            }],
            image: right_image(0.25),
        },
        LayoutKind::Comparison => {
            let column_w = (slide_w as f64 * 0.30) as i64;
            let columns = (0..bullet_columns.clamp(1, 2))
                .map(|i| Frame {
                    x: left + i as i64 * (column_w + inches(0.2)),
                    y: top,
                    cx: column_w,
                    cy: max_h,
                })
                .collect();
            ContentPlacement {
                columns,
                image: right_image(0.30),
            }
        }
        LayoutKind::Balanced => ContentPlacement {
            columns: vec![Frame {
                x: left,
                y: top,
                cx: (slide_w as f64 * 0.55) as i64,
                cy: max_h,
            }],
            image: right_image(0.35),
        },
    }
}

/// Summary for the title slide, cut at [`SUMMARY_PREVIEW_CHARS`]
pub fn summary_preview(summary: &str) -> String {
    match summary.char_indices().nth(SUMMARY_PREVIEW_CHARS) {
        Some((byte_idx, _)) => format!("{}...", &summary[..byte_idx]),
        None => summary.to_string(),
    }
}

struct MediaEntry {
    name: String,
    bytes: Vec<u8>,
}

/// Generate a PPTX deck from slides, returned as package bytes
pub fn generate_pptx(
    slides: &[Slide],
    document: &ExtractedDocument,
    logo: &Logo,
    palette: &Palette,
) -> Result<Vec<u8>> {
    info!("Generating PPTX with {} content slides", slides.len());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let slide_count = slides.len() + 1;

    let logo_media = logo.bytes().and_then(|bytes| {
        let dims = logo.dimensions()?;
        Some((
            MediaEntry {
                name: format!("logo.{}", image_extension(bytes)),
                bytes: bytes.to_vec(),
            },
            dims,
        ))
    });
    if logo.is_present() && logo_media.is_none() {
        warn!("Company logo could not be decoded; leaving it out of the deck");
    }

    info!("Creating PPTX structure: [Content_Types].xml");
    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(content_types_xml(slide_count).as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(
        relationships_xml(&[
            Relationship::new("rId1", REL_OFFICE_DOCUMENT, "ppt/presentation.xml"),
            Relationship::new(
                "rId2",
                "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
                "docProps/core.xml",
            ),
            Relationship::new(
                "rId3",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties",
                "docProps/app.xml",
            ),
        ])
        .as_bytes(),
    )?;

    zip.start_file("docProps/app.xml", options)?;
    zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>pdf2deck</Application>
    <Slides>{}</Slides>
</Properties>"#,
            slide_count
        )
        .as_bytes(),
    )?;

    zip.start_file("docProps/core.xml", options)?;
    zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:title>{}</dc:title>
    <dc:creator>pdf2deck</dc:creator>
    <dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>
    <cp:revision>1</cp:revision>
</cp:coreProperties>"#,
            esc(&document.document_title),
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
        )
        .as_bytes(),
    )?;

    // rId1 master, rId2 theme, slides from rId3
    let mut pres_rels = vec![
        Relationship::new("rId1", REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
        Relationship::new("rId2", REL_THEME, "theme/theme1.xml"),
    ];
    for n in 1..=slide_count {
        pres_rels.push(Relationship::new(
            format!("rId{}", n + 2),
            REL_SLIDE,
            format!("slides/slide{}.xml", n),
        ));
    }
    zip.start_file("ppt/_rels/presentation.xml.rels", options)?;
    zip.write_all(relationships_xml(&pres_rels).as_bytes())?;

    info!("Creating PPTX structure: ppt/presentation.xml");
    zip.start_file("ppt/presentation.xml", options)?;
    zip.write_all(presentation_xml(slide_count).as_bytes())?;

    zip.start_file("ppt/theme/theme1.xml", options)?;
    zip.write_all(theme_xml(palette).as_bytes())?;

    zip.start_file("ppt/slideMasters/slideMaster1.xml", options)?;
    zip.write_all(slide_master_xml(palette).as_bytes())?;
    zip.start_file("ppt/slideMasters/_rels/slideMaster1.xml.rels", options)?;
    zip.write_all(
        relationships_xml(&[
            Relationship::new("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
            Relationship::new("rId2", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout2.xml"),
            Relationship::new("rId3", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout3.xml"),
            Relationship::new("rId4", REL_THEME, "../theme/theme1.xml"),
        ])
        .as_bytes(),
    )?;

    for (n, layout) in slide_layouts().iter().enumerate() {
        zip.start_file(format!("ppt/slideLayouts/slideLayout{}.xml", n + 1), options)?;
        zip.write_all(layout.as_bytes())?;
        zip.start_file(
            format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", n + 1),
            options,
        )?;
        zip.write_all(
            relationships_xml(&[Relationship::new(
                "rId1",
                REL_SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml",
            )])
            .as_bytes(),
        )?;
    }

    let mut media: Vec<MediaEntry> = Vec::new();
    let logo_target = logo_media.as_ref().map(|(entry, dims)| {
        (format!("../media/{}", entry.name), *dims)
    });

    // Title slide
    info!("Creating slide XML: ppt/slides/slide1.xml");
    let mut title_rels = vec![Relationship::new(
        "rId1",
        REL_SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    )];
    let mut title_shapes = vec![
        placeholder_shape(
            2,
            "Title 1",
            r#"type="ctrTitle""#,
            None,
            &text_paragraph(&document.document_title, 4400, true, Some(palette.text), "ctr"),
        ),
        placeholder_shape(
            3,
            "Subtitle 2",
            r#"type="subTitle" idx="1""#,
            None,
            &text_paragraph(
                &summary_preview(&document.summary),
                1800,
                false,
                Some(palette.light_text),
                "ctr",
            ),
        ),
    ];
    if let Some((target, dims)) = &logo_target {
        title_rels.push(Relationship::new("rId2", REL_IMAGE, target.clone()));
        let (cx, cy) = fit_within(*dims, inches(4.0), inches(1.2));
        title_shapes.push(picture(
            4,
            "Logo",
            "rId2",
            (WIDE_SLIDE_CX - cx) / 2,
            inches(0.8),
            cx,
            cy,
        ));
    }
    zip.start_file("ppt/slides/slide1.xml", options)?;
    zip.write_all(slide_xml(&title_shapes.concat()).as_bytes())?;
    zip.start_file("ppt/slides/_rels/slide1.xml.rels", options)?;
    zip.write_all(relationships_xml(&title_rels).as_bytes())?;

    for (i, slide) in slides.iter().enumerate() {
        let slide_num = i + 2;
        info!("Creating slide XML: ppt/slides/slide{}.xml", slide_num);

        let mut rels = vec![Relationship::new(
            "rId1",
            REL_SLIDE_LAYOUT,
            "../slideLayouts/slideLayout3.xml",
        )];

        let image = export_image(slide).and_then(|bytes| match image_dimensions(&bytes) {
            Some(dims) => Some((bytes, dims)),
            None => {
                warn!("Could not decode image for slide \"{}\"; skipping it", slide.title);
                None
            }
        });

        let image_rel = image.map(|(bytes, dims)| {
            let name = format!("image{}.{}", slide_num, image_extension(&bytes));
            rels.push(Relationship::new("rId2", REL_IMAGE, format!("../media/{}", name)));
            media.push(MediaEntry { name, bytes });
            dims
        });

        if let Some((target, _)) = &logo_target {
            rels.push(Relationship::new("rId3", REL_IMAGE, target.clone()));
        }

        let shapes = content_slide_shapes(
            slide,
            &document.document_title,
            image_rel,
            logo_target.as_ref().map(|(_, dims)| *dims),
            palette,
        );

        zip.start_file(format!("ppt/slides/slide{}.xml", slide_num), options)?;
        zip.write_all(slide_xml(&shapes).as_bytes())?;
        zip.start_file(
            format!("ppt/slides/_rels/slide{}.xml.rels", slide_num),
            options,
        )?;
        zip.write_all(relationships_xml(&rels).as_bytes())?;
    }

    if let Some((entry, _)) = logo_media {
        media.push(entry);
    }
    for entry in &media {
        info!("Adding image to PPTX: ppt/media/{}", entry.name);
        zip.start_file(format!("ppt/media/{}", entry.name), options)?;
        zip.write_all(&entry.bytes)?;
    }

    info!("Finalizing PPTX file");
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn content_slide_shapes(
    slide: &Slide,
    document_title: &str,
    image_pixels: Option<(u32, u32)>,
    logo_pixels: Option<(u32, u32)>,
    palette: &Palette,
) -> String {
    let mut shapes = String::new();
    let mut next_id = 2;
    let mut id = || {
        let current = next_id;
        next_id += 1;
        current
    };

    shapes.push_str(&text_box(
        id(),
        "Title",
        inches(0.5),
        inches(0.3),
        inches(15.0),
        inches(0.9),
        &text_paragraph(&slide.title, 3200, true, Some(palette.text), "l"),
    ));
    shapes.push_str(&text_box(
        id(),
        "Subtitle",
        inches(0.5),
        inches(1.15),
        inches(15.0),
        inches(0.5),
        &text_paragraph(document_title, 1800, false, Some(palette.secondary), "l"),
    ));

    let bullets = export_bullets(slide);
    let columns: Vec<&[String]> = if slide.layout == LayoutKind::Comparison && bullets.len() > 1 {
        let half = bullets.len() / 2;
        vec![&bullets[..half], &bullets[half..]]
    } else {
        vec![&bullets[..]]
    };

    let placement = content_placement(slide.layout, columns.len(), image_pixels);
    let size = if slide.layout == LayoutKind::TextFocus { 1800 } else { 2000 };
    for (frame, points) in placement.columns.iter().zip(columns.iter()) {
        let paragraphs: String = points
            .iter()
            .map(|point| bullet_paragraph(point, size, palette.text))
            .collect();
        shapes.push_str(&text_box(
            id(),
            "Bullets",
            frame.x,
            frame.y,
            frame.cx,
            frame.cy,
            &paragraphs,
        ));
    }

    if let Some(frame) = placement.image {
        shapes.push_str(&picture(
            id(),
            "Section Image",
            "rId2",
            frame.x,
            frame.y,
            frame.cx,
            frame.cy,
        ));
    }

    shapes.push_str(&text_box(
        id(),
        "Footer",
        inches(0.5),
        inches(8.4),
        inches(12.0),
        inches(0.4),
        &text_paragraph(
            &format!("{} | {}", document_title, slide.title),
            1000,
            false,
            Some(palette.light_text),
            "l",
        ),
    ));

    if let Some(dims) = logo_pixels {
        let cy = inches(LOGO_HEIGHT_IN);
        let cx = (cy as f64 * dims.0 as f64 / dims.1.max(1) as f64) as i64;
        shapes.push_str(&picture(
            id(),
            "Logo",
            "rId3",
            WIDE_SLIDE_CX - cx - inches(RIGHT_MARGIN_IN),
            WIDE_SLIDE_CY - cy - inches(0.2),
            cx,
            cy,
        ));
    }

    shapes
}

fn content_types_xml(slide_count: usize) -> String {
    let slides = (1..=slide_count)
        .map(|n| {
            format!(
                r#"    <Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                n
            )
        })
        .collect::<Vec<String>>()
        .join("\n");
    let layouts = (1..=3)
        .map(|n| {
            format!(
                r#"    <Override PartName="/ppt/slideLayouts/slideLayout{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#,
                n
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="xml" ContentType="application/xml"/>
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="jpeg" ContentType="image/jpeg"/>
    <Default Extension="jpg" ContentType="image/jpeg"/>
    <Default Extension="png" ContentType="image/png"/>
    <Default Extension="gif" ContentType="image/gif"/>
    <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
    <Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
{layouts}
    <Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
{slides}
</Types>"#,
        layouts = layouts,
        slides = slides
    )
}

fn presentation_xml(slide_count: usize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" saveSubsetFonts="1">
    <p:sldMasterIdLst>
        <p:sldMasterId id="2147483648" r:id="rId1"/>
    </p:sldMasterIdLst>
    <p:sldIdLst>
{slide_ids}
    </p:sldIdLst>
    <p:sldSz cx="{cx}" cy="{cy}"/>
    <p:notesSz cx="6858000" cy="9144000"/>
</p:presentation>"#,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        slide_ids = (0..slide_count)
            .map(|i| format!(r#"        <p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 3))
            .collect::<Vec<String>>()
            .join("\n"),
        cx = WIDE_SLIDE_CX,
        cy = WIDE_SLIDE_CY
    )
}

fn theme_xml(palette: &Palette) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="{a}" name="pdf2deck">
    <a:themeElements>
        <a:clrScheme name="pdf2deck">
            <a:dk1><a:srgbClr val="{text}"/></a:dk1>
            <a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>
            <a:dk2><a:srgbClr val="1F1F1F"/></a:dk2>
            <a:lt2><a:srgbClr val="{card}"/></a:lt2>
            <a:accent1><a:srgbClr val="{primary}"/></a:accent1>
            <a:accent2><a:srgbClr val="{secondary}"/></a:accent2>
            <a:accent3><a:srgbClr val="{accent}"/></a:accent3>
            <a:accent4><a:srgbClr val="{light}"/></a:accent4>
            <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
            <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
            <a:hlink><a:srgbClr val="{secondary}"/></a:hlink>
            <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
        </a:clrScheme>
        <a:fontScheme name="pdf2deck">
            <a:majorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>
            <a:minorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>
        </a:fontScheme>
        <a:fmtScheme name="pdf2deck">
            <a:fillStyleLst>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
                <a:solidFill><a:schemeClr val="phClr"><a:tint val="50000"/></a:schemeClr></a:solidFill>
                <a:solidFill><a:schemeClr val="phClr"><a:shade val="80000"/></a:schemeClr></a:solidFill>
            </a:fillStyleLst>
            <a:lnStyleLst>
                <a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
                <a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
                <a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
            </a:lnStyleLst>
            <a:effectStyleLst>
                <a:effectStyle><a:effectLst/></a:effectStyle>
                <a:effectStyle><a:effectLst/></a:effectStyle>
                <a:effectStyle><a:effectLst/></a:effectStyle>
            </a:effectStyleLst>
            <a:bgFillStyleLst>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
                <a:solidFill><a:schemeClr val="phClr"><a:tint val="95000"/></a:schemeClr></a:solidFill>
                <a:solidFill><a:schemeClr val="phClr"><a:shade val="90000"/></a:schemeClr></a:solidFill>
            </a:bgFillStyleLst>
        </a:fmtScheme>
    </a:themeElements>
    <a:objectDefaults/>
    <a:extraClrSchemeLst/>
</a:theme>"#,
        a = NS_A,
        text = srgb(palette.text),
        card = srgb(palette.card_bg),
        primary = srgb(palette.primary),
        secondary = srgb(palette.secondary),
        accent = srgb(palette.accent),
        light = srgb(palette.light_text),
    )
}

fn slide_master_xml(palette: &Palette) -> String {
    let title = placeholder_shape(
        2,
        "Title Placeholder 1",
        r#"type="title""#,
        Some((inches(0.5), inches(0.3), inches(15.0), inches(1.2))),
        "",
    );
    let body = placeholder_shape(
        3,
        "Text Placeholder 2",
        r#"type="body" idx="1""#,
        Some((inches(0.5), inches(1.9), inches(15.0), inches(6.2))),
        "",
    );
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">
    <p:cSld>
        <p:bg><p:bgPr><a:solidFill><a:srgbClr val="{bg}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>
        <p:spTree>
            <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
            <p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>
            {title}
            {body}
        </p:spTree>
    </p:cSld>
    <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
    <p:sldLayoutIdLst>
        <p:sldLayoutId id="2147483649" r:id="rId1"/>
        <p:sldLayoutId id="2147483650" r:id="rId2"/>
        <p:sldLayoutId id="2147483651" r:id="rId3"/>
    </p:sldLayoutIdLst>
    <p:txStyles>
        <p:titleStyle><a:lvl1pPr algn="l"><a:defRPr sz="3200" b="1"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/></a:defRPr></a:lvl1pPr></p:titleStyle>
        <p:bodyStyle><a:lvl1pPr marL="342900" indent="-342900"><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/><a:defRPr sz="2000"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr></p:bodyStyle>
        <p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill></a:defRPr></a:lvl1pPr></p:otherStyle>
    </p:txStyles>
</p:sldMaster>"#,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        bg = srgb(palette.slide_bg),
        title = title,
        body = body
    )
}

/// Title, title-and-content and blank layouts, in master order
fn slide_layouts() -> [String; 3] {
    let layout = |kind: &str, name: &str, shapes: String| {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" type="{kind}" preserve="1">
    <p:cSld name="{name}">
        <p:spTree>
            <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
            <p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>
            {shapes}
        </p:spTree>
    </p:cSld>
    <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#,
            a = NS_A,
            r = NS_R,
            p = NS_P,
            kind = kind,
            name = name,
            shapes = shapes
        )
    };

    let title_slide = [
        placeholder_shape(
            2,
            "Title 1",
            r#"type="ctrTitle""#,
            Some((inches(1.5), inches(2.6), inches(13.0), inches(1.8))),
            "",
        ),
        placeholder_shape(
            3,
            "Subtitle 2",
            r#"type="subTitle" idx="1""#,
            Some((inches(2.0), inches(4.6), inches(12.0), inches(2.4))),
            "",
        ),
    ]
    .concat();
    let title_and_content = [
        placeholder_shape(2, "Title 1", r#"type="title""#, None, ""),
        placeholder_shape(3, "Content Placeholder 2", r#"idx="1""#, None, ""),
    ]
    .concat();

    [
        layout("title", "Title Slide", title_slide),
        layout("obj", "Title and Content", title_and_content),
        layout("blank", "Blank", String::new()),
    ]
}
