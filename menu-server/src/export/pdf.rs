//! PDF rendering with the standard Helvetica fonts
//!
//! Each segment is laid out at its natural size, scaled down when taller than
//! the printable area and centered on its own A4 page.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use shared::models::Menu;

use super::{ExportError, strip_markup};

/// A4 portrait, in points
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
/// 10 mm
pub const MARGIN: f32 = 28.35;
const PRINTABLE_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const PRINTABLE_HEIGHT: f32 = PAGE_HEIGHT - 2.0 * MARGIN;
const LEADING: f32 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// One run of text; wrapped to the printable width during layout
#[derive(Debug, Clone)]
pub struct Block {
    pub text: String,
    pub size: f32,
    pub font: Font,
    /// Extra space above the block
    pub space_before: f32,
}

impl Block {
    fn new(text: impl Into<String>, size: f32, font: Font, space_before: f32) -> Self {
        Self {
            text: text.into(),
            size,
            font,
            space_before,
        }
    }
}

/// Content of one page
pub type Segment = Vec<Block>;

/// Header, one segment per section, footer
pub fn segments(menu: &Menu) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(menu.sections.len() + 2);

    segments.push(vec![
        Block::new(&menu.title, 26.0, Font::Bold, 0.0),
        Block::new(strip_markup(&menu.event_description), 11.0, Font::Regular, 14.0),
        Block::new(&menu.cuisine_label, 10.0, Font::Bold, 12.0),
    ]);

    for section in &menu.sections {
        let mut segment = vec![Block::new(section.category.to_uppercase(), 18.0, Font::Bold, 0.0)];
        for item in &section.items {
            segment.push(Block::new(&item.name, 13.0, Font::Bold, 16.0));
            if !item.description.is_empty() {
                segment.push(Block::new(&item.description, 10.0, Font::Regular, 2.0));
            }
            if !item.dietary_tags.is_empty() {
                segment.push(Block::new(item.dietary_tags.join(", "), 8.0, Font::Regular, 2.0));
            }
            for sub in &item.sub_items {
                let text = if sub.description.is_empty() {
                    sub.name.clone()
                } else {
                    format!("{}: {}", sub.name, sub.description)
                };
                segment.push(Block::new(text, 9.0, Font::Regular, 2.0));
            }
        }
        segments.push(segment);
    }

    segments.push(vec![
        Block::new("Wine Pairing", 14.0, Font::Bold, 0.0),
        Block::new(&menu.wine_pairing, 10.0, Font::Regular, 6.0),
        Block::new("Chef's Notes", 14.0, Font::Bold, 24.0),
        Block::new(&menu.chefs_notes, 10.0, Font::Regular, 6.0),
    ]);

    segments
}

/// WinAnsi byte for a character, if the standard fonts can set it
fn win_ansi(ch: char) -> Option<u8> {
    match ch {
        ' '..='~' => Some(ch as u8),
        '\u{a0}'..='\u{ff}' => Some(ch as u32 as u8),
        '\u{20ac}' => Some(0x80),
        '\u{2026}' => Some(0x85),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201c}' => Some(0x93),
        '\u{201d}' => Some(0x94),
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        _ => None,
    }
}

pub fn encode(text: &str) -> Result<Vec<u8>, ExportError> {
    text.chars()
        .map(|ch| win_ansi(ch).ok_or(ExportError::UnsupportedCharacter(ch)))
        .collect()
}

// Helvetica advance widths (1/1000 em) for ' '..='~'
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn char_width(ch: char, font: Font) -> f32 {
    let table = match font {
        Font::Regular => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    };
    let units = match ch {
        ' '..='~' => table[(ch as usize) - 32],
        _ => 556,
    };
    f32::from(units) / 1000.0
}

pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    text.chars().map(|ch| char_width(ch, font)).sum::<f32>() * size
}

/// Greedy word wrap; a single word wider than `max_width` gets its own line
pub fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if !line.is_empty() && text_width(&candidate, font, size) > max_width {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            } else {
                line = candidate;
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

/// A wrapped line positioned in segment space (origin bottom-left)
#[derive(Debug, Clone)]
struct PlacedLine {
    text: String,
    font: Font,
    size: f32,
    x: f32,
    y: f32,
}

/// Segment laid out at natural size
#[derive(Debug, Clone)]
pub struct Layout {
    lines: Vec<PlacedLine>,
    pub height: f32,
}

impl Layout {
    /// Factor that fits the layout into the printable height (never above 1)
    pub fn scale(&self) -> f32 {
        if self.height > PRINTABLE_HEIGHT {
            PRINTABLE_HEIGHT / self.height
        } else {
            1.0
        }
    }
}

pub fn layout(segment: &Segment) -> Layout {
    // First pass top-down with y growing downwards, then flip.
    let mut rows: Vec<(String, Font, f32, f32)> = Vec::new();
    let mut cursor = 0.0_f32;
    for block in segment {
        cursor += block.space_before;
        for line in wrap(&block.text, block.font, block.size, PRINTABLE_WIDTH) {
            cursor += block.size * LEADING;
            rows.push((line, block.font, block.size, cursor));
        }
    }
    let height = cursor;

    let lines = rows
        .into_iter()
        .map(|(text, font, size, baseline_from_top)| {
            let x = (PRINTABLE_WIDTH - text_width(&text, font, size)).max(0.0) / 2.0;
            // Baseline sits a little above the bottom of the line box
            let y = height - baseline_from_top + size * (LEADING - 1.0);
            PlacedLine {
                text,
                font,
                size,
                x,
                y,
            }
        })
        .collect();

    Layout { lines, height }
}

fn page_content(layout: &Layout) -> Result<Content, ExportError> {
    let scale = layout.scale();
    let tx = (PAGE_WIDTH - PRINTABLE_WIDTH * scale) / 2.0;
    let ty = (PAGE_HEIGHT - layout.height * scale) / 2.0;

    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                scale.into(),
                0.0_f32.into(),
                0.0_f32.into(),
                scale.into(),
                tx.into(),
                ty.into(),
            ],
        ),
    ];
    for line in &layout.lines {
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![line.font.resource().into(), line.size.into()]),
            Operation::new("Td", vec![line.x.into(), line.y.into()]),
            Operation::new("Tj", vec![Object::string_literal(encode(&line.text)?)]),
            Operation::new("ET", vec![]),
        ]);
    }
    operations.push(Operation::new("Q", vec![]));

    Ok(Content { operations })
}

/// Render every segment; the first failure aborts the document
pub fn render(menu: &Menu) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => regular_id, "F2" => bold_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for (index, segment) in segments(menu).iter().enumerate() {
        let layout = layout(segment);
        let content = page_content(&layout)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        });
        tracing::debug!(segment = index, scale = layout.scale(), "Segment rendered");
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
