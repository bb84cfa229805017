// ABOUTME: OOXML package access for the pptx2png application
// ABOUTME: Reads parts, relationships and presentation metadata from a .pptx archive

use crate::errors::{ConvertError, Result};
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// EMUs per pixel at 96 DPI (914400 per inch)
pub const EMU_PER_PIXEL: u64 = 9525;

/// 16:9 slide size in EMU, used when `p:sldSz` is absent
pub const DEFAULT_SLIDE_SIZE: (u64, u64) = (9_144_000, 5_143_500);

pub const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// An opened .pptx archive
pub struct PptxPackage {
    archive: ZipArchive<File>,
}

impl PptxPackage {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(ConvertError::FileReadError)?;
        let archive = ZipArchive::new(file)?;
        debug!("Opened package {:?} with {} parts", path, archive.len());
        Ok(Self { archive })
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.archive.file_names().any(|n| n == name)
    }

    /// Read a part's raw bytes.
    pub fn read_part(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut part = self.archive.by_name(name).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => {
                ConvertError::PresentationError(format!("Missing package part: {}", name))
            }
            other => other.into(),
        })?;
        let mut data = Vec::with_capacity(part.size() as usize);
        part.read_to_end(&mut data)
            .map_err(ConvertError::FileReadError)?;
        Ok(data)
    }

    /// Read a part as UTF-8 XML text.
    pub fn read_xml(&mut self, name: &str) -> Result<String> {
        let data = self.read_part(name)?;
        String::from_utf8(data).map_err(|_| {
            ConvertError::PresentationError(format!("Part is not valid UTF-8: {}", name))
        })
    }
}

/// Slide size and slide order taken from `ppt/presentation.xml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationInfo {
    /// Slide width and height in EMU
    pub slide_size: (u64, u64),
    /// Relationship ids of the slides, in presentation order
    pub slide_rel_ids: Vec<String>,
}

pub fn parse_presentation(xml: &str) -> Result<PresentationInfo> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut slide_size = None;
    let mut slide_rel_ids = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"sldSz" => {
                    let cx = int_attr(&e, b"cx").filter(|v| *v > 0);
                    let cy = int_attr(&e, b"cy").filter(|v| *v > 0);
                    if let (Some(cx), Some(cy)) = (cx, cy) {
                        slide_size = Some((cx as u64, cy as u64));
                    }
                }
                b"sldId" => {
                    // r:id, not the numeric id
                    let rel_id = e.attributes().flatten().find_map(|attr| {
                        (attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id")
                            .then(|| String::from_utf8_lossy(&attr.value).into_owned())
                    });
                    match rel_id {
                        Some(id) => slide_rel_ids.push(id),
                        None => {
                            return Err(ConvertError::PresentationError(
                                "Slide entry without a relationship id".to_string(),
                            ))
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(PresentationInfo {
        slide_size: slide_size.unwrap_or(DEFAULT_SLIDE_SIZE),
        slide_rel_ids,
    })
}

/// Parse a `.rels` part into a map of relationship id to target.
///
/// External targets are left out since they do not live in the package.
pub fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut rels = HashMap::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                let mut external = false;

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).into_owned();
                    match attr.key.as_ref() {
                        b"Id" => id = Some(value),
                        b"Target" => target = Some(value),
                        b"TargetMode" => external = value.eq_ignore_ascii_case("External"),
                        _ => {}
                    }
                }

                if let (Some(id), Some(target), false) = (id, target, external) {
                    rels.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Path of the relationships part belonging to `part`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target relative to the part that owns the relationship.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };

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

/// Convert EMU to whole pixels at 96 DPI, never below 1.
pub fn emu_to_pixels(emu: u64) -> u32 {
    let pixels = (emu + EMU_PER_PIXEL / 2) / EMU_PER_PIXEL;
    pixels.clamp(1, u64::from(u32::MAX)) as u32
}

pub(crate) fn int_attr(e: &BytesStart, name: &[u8]) -> Option<i64> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| std::str::from_utf8(&attr.value).ok()?.trim().parse().ok())
}
