//! Text shaping and font metrics for the PDF backend.
//! - Puts mixed-direction text into visual order (PDF has no BiDi)
//! - Reshapes Arabic runs into presentation forms
//! - Measures strings with a TTF (rusttype) or builtin Helvetica estimates

use ar_reshaper::{ArabicReshaper, ReshaperConfig};
use rusttype::{point, Font, Scale};
use unicode_bidi::BidiInfo;

use crate::error::{Result, SheetError};

/// Average Helvetica advance as a fraction of the font size.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;
const APPROX_BOLD_WIDTH_RATIO: f32 = 0.55;
const HELVETICA_ASCENT: f32 = 0.718;
const HELVETICA_DESCENT: f32 = 0.207;

/// Visual-order string: BiDi runs; reshape only RTL runs.
/// Pure LTR text is returned unchanged.
pub fn visual_order(text: &str) -> String {
    let info = BidiInfo::new(text, None);
    if !info.has_rtl() {
        return text.to_string();
    }
    let reshaper = ArabicReshaper::new(ReshaperConfig::default());

    let mut out = String::new();
    for para in &info.paragraphs {
        let (levels, ranges) = info.visual_runs(para, para.range.clone());
        for (level, range) in levels.into_iter().zip(ranges.into_iter()) {
            let slice = &text[range];
            if level.is_rtl() {
                // Reverse only runs holding RTL letters; digits and symbols keep their order
                let shaped = reshaper.reshape(slice);
                if slice.chars().any(is_rtl_letter) {
                    out.extend(shaped.chars().rev());
                } else {
                    out.push_str(&shaped);
                }
            } else {
                out.push_str(slice);
            }
        }
    }
    out
}

fn is_rtl_letter(c: char) -> bool {
    matches!(c, '\u{0590}'..='\u{08FF}' | '\u{FB1D}'..='\u{FDFF}' | '\u{FE70}'..='\u{FEFF}')
}

/// Horizontal and vertical metrics for one font face.
pub enum FontMetrics {
    /// Builtin Helvetica; no glyph tables, so widths are estimated.
    Builtin { bold: bool },
    Outline(Font<'static>),
}

impl FontMetrics {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Font::try_from_vec(bytes)
            .map(FontMetrics::Outline)
            .ok_or_else(|| SheetError::Font("not a TrueType/OpenType font".into()))
    }

    pub fn width_of(&self, text: &str, size: f32) -> f32 {
        match self {
            FontMetrics::Builtin { bold } => {
                let ratio = if *bold { APPROX_BOLD_WIDTH_RATIO } else { APPROX_CHAR_WIDTH_RATIO };
                text.chars().count() as f32 * size * ratio
            }
            FontMetrics::Outline(font) => {
                let scale = Scale::uniform(size);
                font.layout(text, scale, point(0.0, 0.0))
                    .last()
                    .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                    .unwrap_or(0.0)
            }
        }
    }

    /// Distance from the top of a line to its baseline.
    pub fn ascent(&self, size: f32) -> f32 {
        match self {
            FontMetrics::Builtin { .. } => size * HELVETICA_ASCENT,
            FontMetrics::Outline(font) => font.v_metrics(Scale::uniform(size)).ascent,
        }
    }

    /// Ascent plus descent, without line gap.
    pub fn line_height(&self, size: f32) -> f32 {
        match self {
            FontMetrics::Builtin { .. } => size * (HELVETICA_ASCENT + HELVETICA_DESCENT),
            FontMetrics::Outline(font) => {
                let vm = font.v_metrics(Scale::uniform(size));
                vm.ascent - vm.descent
            }
        }
    }
}
