// Builds small but valid .pptx packages for the integration tests.
#![allow(dead_code)]

use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::{write::FileOptions, ZipWriter};

/// 10in x 5in, a 2:1 slide (960x480 pixels at 96 DPI)
pub const WIDE_SLIDE: (u64, u64) = (9_144_000, 4_572_000);

#[derive(Default, Clone)]
pub struct SlideFixture {
    pub background: Option<String>,
    pub shapes: Vec<String>,
    /// (relationship id, PNG bytes)
    pub media: Vec<(String, Vec<u8>)>,
}

impl SlideFixture {
    pub fn with_background(hex: &str) -> Self {
        Self {
            background: Some(hex.to_string()),
            ..Self::default()
        }
    }

    pub fn filled_box(mut self, x: i64, y: i64, cx: i64, cy: i64, hex: &str) -> Self {
        let id = self.shapes.len() + 2;
        self.shapes.push(format!(
            r#"<p:sp>
                <p:nvSpPr><p:cNvPr id="{id}" name="Box {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
                <p:spPr>
                    <a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>
                    <a:prstGeom prst="rect"><a:avLst/></a:prstGeom>
                    <a:solidFill><a:srgbClr val="{hex}"/></a:solidFill>
                </p:spPr>
            </p:sp>"#
        ));
        self
    }

    pub fn picture(mut self, x: i64, y: i64, cx: i64, cy: i64, png: Vec<u8>) -> Self {
        let id = self.shapes.len() + 2;
        let rel_id = format!("rId{}", self.media.len() + 2);
        self.shapes.push(format!(
            r#"<p:pic>
                <p:nvPicPr><p:cNvPr id="{id}" name="Image {id}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>
                <p:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>
                <p:spPr>
                    <a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>
                    <a:prstGeom prst="rect"><a:avLst/></a:prstGeom>
                </p:spPr>
            </p:pic>"#
        ));
        self.media.push((rel_id, png));
        self
    }

    fn xml(&self) -> String {
        let background = self
            .background
            .as_ref()
            .map(|hex| {
                format!(
                    r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{hex}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#
                )
            })
            .unwrap_or_default();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
    <p:cSld>
        {background}
        <p:spTree>
            <p:nvGrpSpPr>
                <p:cNvPr id="1" name=""/>
                <p:cNvGrpSpPr/>
                <p:nvPr/>
            </p:nvGrpSpPr>
            <p:grpSpPr>
                <a:xfrm>
                    <a:off x="0" y="0"/>
                    <a:ext cx="0" cy="0"/>
                    <a:chOff x="0" y="0"/>
                    <a:chExt cx="0" cy="0"/>
                </a:xfrm>
            </p:grpSpPr>
            {shapes}
        </p:spTree>
    </p:cSld>
    <p:clrMapOvr>
        <a:masterClrMapping/>
    </p:clrMapOvr>
</p:sld>"#,
            shapes = self.shapes.join("\n")
        )
    }
}

/// A presentation to be written as a .pptx package
pub struct DeckFixture {
    pub slide_size: Option<(u64, u64)>,
    pub slides: Vec<SlideFixture>,
    /// Presentation order as indexes into `slides`; defaults to storage order
    pub order: Option<Vec<usize>>,
}

impl DeckFixture {
    pub fn new(slide_size: (u64, u64)) -> Self {
        Self {
            slide_size: Some(slide_size),
            slides: Vec::new(),
            order: None,
        }
    }

    pub fn with_slides(slide_size: (u64, u64), count: usize) -> Self {
        let mut deck = Self::new(slide_size);
        deck.slides = vec![SlideFixture::default(); count];
        deck
    }

    pub fn slide(mut self, slide: SlideFixture) -> Self {
        self.slides.push(slide);
        self
    }

    pub fn write(&self, path: &Path) {
        let file = fs::File::create(path).expect("Failed to create PPTX file");
        let mut zip = ZipWriter::new(file);
        let order: Vec<usize> = self
            .order
            .clone()
            .unwrap_or_else(|| (0..self.slides.len()).collect());

        let mut put = |name: &str, data: &[u8]| {
            zip.start_file(name, FileOptions::default())
                .expect("Failed to start ZIP entry");
            zip.write_all(data).expect("Failed to write ZIP entry");
        };

        let content_types = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="xml" ContentType="application/xml"/>
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="png" ContentType="image/png"/>
    <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
    {slides}
</Types>"#,
            slides = (1..=self.slides.len())
                .map(|n| format!(r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#, n))
                .collect::<Vec<String>>()
                .join("\n")
        );
        put("[Content_Types].xml", content_types.as_bytes());

        put(
            "_rels/.rels",
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
</Relationships>"#,
        );

        let mut pres_rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
        );
        for n in 1..=self.slides.len() {
            pres_rels.push_str(&format!(
                r#"    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
                n + 1,
                n
            ));
            pres_rels.push('\n');
        }
        pres_rels.push_str("</Relationships>");
        put("ppt/_rels/presentation.xml.rels", pres_rels.as_bytes());

        let slide_size = self
            .slide_size
            .map(|(cx, cy)| format!(r#"<p:sldSz cx="{cx}" cy="{cy}"/>"#))
            .unwrap_or_default();
        let presentation_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
    <p:sldIdLst>
{slide_ids}
    </p:sldIdLst>
    {slide_size}
    <p:notesSz cx="6858000" cy="9144000"/>
</p:presentation>"#,
            slide_ids = order
                .iter()
                .enumerate()
                .map(|(i, index)| format!(r#"        <p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, index + 2))
                .collect::<Vec<String>>()
                .join("\n"),
        );
        put("ppt/presentation.xml", presentation_xml.as_bytes());

        for (i, slide) in self.slides.iter().enumerate() {
            let n = i + 1;
            put(&format!("ppt/slides/slide{}.xml", n), slide.xml().as_bytes());

            let mut rels = String::from(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
"#,
            );
            for (j, (rel_id, png)) in slide.media.iter().enumerate() {
                let media_name = format!("image{}_{}.png", n, j + 1);
                rels.push_str(&format!(
                    r#"    <Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/{}"/>"#,
                    rel_id, media_name
                ));
                rels.push('\n');
                put(&format!("ppt/media/{}", media_name), png);
            }
            rels.push_str("</Relationships>");
            put(&format!("ppt/slides/_rels/slide{}.xml.rels", n), rels.as_bytes());
        }

        zip.finish().expect("Failed to finalize PPTX file");
    }
}

/// Encode a solid-color PNG
pub fn solid_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .expect("Failed to encode PNG");
    bytes
}

/// Pixel of a written PNG
pub fn pixel_at(path: &Path, x: u32, y: u32) -> [u8; 4] {
    image::open(path)
        .expect("Failed to open PNG")
        .to_rgba8()
        .get_pixel(x, y)
        .0
}
