// ABOUTME: Slide XML parsing for the pptx2png application
// ABOUTME: Extracts the background, filled shapes and pictures that get rasterized

use crate::errors::Result;
use crate::package::int_attr;
use image::Rgba;
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Position and size in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// Something painted onto the slide, in document (z) order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideElement {
    Fill { bounds: Bounds, color: Rgba<u8> },
    Picture { bounds: Bounds, embed: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideContent {
    pub background: Option<Rgba<u8>>,
    pub elements: Vec<SlideElement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKind {
    Shape,
    Picture,
}

#[derive(Debug)]
struct PendingShape {
    kind: ShapeKind,
    off: Option<(i64, i64)>,
    ext: Option<(i64, i64)>,
    fill: Option<Rgba<u8>>,
    no_fill: bool,
    embed: Option<String>,
}

impl PendingShape {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            off: None,
            ext: None,
            fill: None,
            no_fill: false,
            embed: None,
        }
    }
}

/// Maps child coordinates of a group into its parent's space
#[derive(Debug, Default)]
struct GroupTransform {
    off: (i64, i64),
    ext: (i64, i64),
    ch_off: (i64, i64),
    ch_ext: (i64, i64),
}

impl GroupTransform {
    fn apply(&self, b: Bounds) -> Bounds {
        // Offsets come straight from the XML, so the math saturates
        let axis = |pos: i64, len: i64, off: i64, ch_off: i64, ext: i64, ch_ext: i64| {
            let delta = pos.saturating_sub(ch_off);
            if ext <= 0 || ch_ext <= 0 {
                return (delta.saturating_add(off), len);
            }
            let scale = |v: i64| {
                let scaled = i128::from(v) * i128::from(ext) / i128::from(ch_ext);
                scaled.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
            };
            (off.saturating_add(scale(delta)), scale(len))
        };
        let (x, cx) = axis(b.x, b.cx, self.off.0, self.ch_off.0, self.ext.0, self.ch_ext.0);
        let (y, cy) = axis(b.y, b.cy, self.off.1, self.ch_off.1, self.ext.1, self.ch_ext.1);
        Bounds { x, y, cx, cy }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorTarget {
    Background,
    ShapeFill,
}

#[derive(Default)]
struct SlideParser {
    stack: Vec<Vec<u8>>,
    groups: Vec<GroupTransform>,
    shape: Option<PendingShape>,
    content: SlideContent,
}

impl SlideParser {
    fn parent(&self, depth: usize) -> Option<&[u8]> {
        self.stack
            .len()
            .checked_sub(depth + 1)
            .map(|i| self.stack[i].as_slice())
    }

    fn parent_is(&self, depth: usize, name: &[u8]) -> bool {
        self.parent(depth) == Some(name)
    }

    fn inside(&self, name: &[u8]) -> bool {
        self.stack.iter().any(|n| n.as_slice() == name)
    }

    /// Where a `solidFill` at the top of the stack applies.
    fn color_target(&self, fill_depth: usize) -> Option<ColorTarget> {
        if !self.parent_is(fill_depth, b"solidFill") {
            return None;
        }
        if self.inside(b"bgPr") {
            return Some(ColorTarget::Background);
        }
        if self.shape.is_some() && self.parent_is(fill_depth + 1, b"spPr") {
            return Some(ColorTarget::ShapeFill);
        }
        None
    }

    fn set_color(
        &mut self,
        target: ColorTarget,
        update: impl FnOnce(Option<Rgba<u8>>) -> Option<Rgba<u8>>,
    ) {
        match target {
            ColorTarget::Background => self.content.background = update(self.content.background),
            ColorTarget::ShapeFill => {
                if let Some(shape) = self.shape.as_mut() {
                    shape.fill = update(shape.fill);
                }
            }
        }
    }

    fn open(&mut self, e: &BytesStart) {
        let name = e.local_name();
        match name.as_ref() {
            b"sp" if self.shape.is_none() => {
                self.shape = Some(PendingShape::new(ShapeKind::Shape))
            }
            b"pic" if self.shape.is_none() => {
                self.shape = Some(PendingShape::new(ShapeKind::Picture))
            }
            b"grpSp" => self.groups.push(GroupTransform::default()),
            b"off" | b"ext" | b"chOff" | b"chExt" if self.parent_is(0, b"xfrm") => {
                self.read_transform(name.as_ref(), e)
            }
            b"srgbClr" => {
                if let Some(target) = self.color_target(0) {
                    let color = e
                        .attributes()
                        .flatten()
                        .find(|attr| attr.key.as_ref() == b"val")
                        .and_then(|attr| parse_hex_color(&attr.value));
                    self.set_color(target, |_| color);
                }
            }
            b"alpha" if self.parent_is(0, b"srgbClr") => {
                if let (Some(target), Some(val)) = (self.color_target(1), int_attr(e, b"val")) {
                    // Percentage in thousandths, 100000 is opaque
                    let alpha = (val.clamp(0, 100_000) * 255 + 50_000) / 100_000;
                    self.set_color(target, |color| {
                        color.map(|mut c| {
                            c.0[3] = alpha as u8;
                            c
                        })
                    });
                }
            }
            b"noFill" if self.parent_is(0, b"spPr") => {
                if let Some(shape) = self.shape.as_mut() {
                    shape.no_fill = true;
                }
            }
            b"blip" if self.parent_is(0, b"blipFill") => {
                if let Some(shape) = self.shape.as_mut() {
                    shape.embed = e
                        .attributes()
                        .flatten()
                        .find(|attr| {
                            attr.key.prefix().is_some()
                                && attr.key.local_name().as_ref() == b"embed"
                        })
                        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned());
                }
            }
            _ => {}
        }
    }

    fn read_transform(&mut self, name: &[u8], e: &BytesStart) {
        let pair = |a: &[u8], b: &[u8]| Some((int_attr(e, a)?, int_attr(e, b)?));
        let value = match name {
            b"off" | b"chOff" => pair(b"x", b"y"),
            _ => pair(b"cx", b"cy"),
        };
        let Some(value) = value else { return };

        match self.parent(1) {
            Some(b"spPr") => {
                if let Some(shape) = self.shape.as_mut() {
                    match name {
                        b"off" => shape.off = Some(value),
                        b"ext" => shape.ext = Some(value),
                        _ => {}
                    }
                }
            }
            // The spTree's own grpSpPr carries no transform
            Some(b"grpSpPr") if self.parent_is(2, b"grpSp") => {
                if let Some(group) = self.groups.last_mut() {
                    match name {
                        b"off" => group.off = value,
                        b"ext" => group.ext = value,
                        b"chOff" => group.ch_off = value,
                        _ => group.ch_ext = value,
                    }
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"sp" | b"pic" => {
                let kind = if name == b"sp" {
                    ShapeKind::Shape
                } else {
                    ShapeKind::Picture
                };
                if self.shape.as_ref().map(|s| s.kind) == Some(kind) {
                    if let Some(shape) = self.shape.take() {
                        self.finish_shape(shape);
                    }
                }
            }
            b"grpSp" => {
                self.groups.pop();
            }
            _ => {}
        }
    }

    fn finish_shape(&mut self, shape: PendingShape) {
        let (Some((x, y)), Some((cx, cy))) = (shape.off, shape.ext) else {
            debug!("Skipping {:?} without a transform", shape.kind);
            return;
        };
        let bounds = self
            .groups
            .iter()
            .rev()
            .fold(Bounds { x, y, cx, cy }, |b, group| group.apply(b));

        let element = match shape.kind {
            ShapeKind::Shape => match shape.fill {
                Some(color) if !shape.no_fill => SlideElement::Fill { bounds, color },
                _ => return,
            },
            ShapeKind::Picture => match shape.embed {
                Some(embed) => SlideElement::Picture { bounds, embed },
                None => return,
            },
        };
        self.content.elements.push(element);
    }
}

/// Parse a slide part into the elements the rasterizer paints.
pub fn parse_slide(xml: &str) -> Result<SlideContent> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut parser = SlideParser::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                parser.open(&e);
                parser.stack.push(e.local_name().as_ref().to_vec());
            }
            Event::Empty(e) => {
                parser.open(&e);
                parser.close(e.local_name().as_ref());
            }
            Event::End(e) => {
                parser.stack.pop();
                parser.close(e.local_name().as_ref());
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.content)
}

fn parse_hex_color(value: &[u8]) -> Option<Rgba<u8>> {
    let hex = std::str::from_utf8(value).ok()?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}
