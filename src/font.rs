//! Large-text styles for the countdown display.
//!
//! Every style covers the characters a clock token needs (digits, `:` and
//! space). Anything else falls back to the raw character on the middle row
//! so an odd label never aborts a running countdown.

use rand::Rng;
use std::{fmt, str::FromStr};
use unicode_width::UnicodeWidthStr;

use crate::error::TimerError;

// ============================================================================
// Styles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Big,
    Digital,
    Block,
    Shade,
    Hash,
}

pub const DEFAULT_STYLE: Style = Style::Big;

impl Style {
    pub const ALL: [Style; 5] = [Self::Big, Self::Digital, Self::Block, Self::Shade, Self::Hash];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Big => "big",
            Self::Digital => "digital",
            Self::Block => "block",
            Self::Shade => "shade",
            Self::Hash => "hash",
        }
    }

    /// Picks one style uniformly from [`Style::ALL`].
    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    pub fn random_with<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    fn face(&self) -> Face {
        match self {
            Self::Big => Face::Ascii { glyphs: BIG, height: 6, gap: "" },
            Self::Digital => Face::Ascii { glyphs: DIGITAL, height: 3, gap: " " },
            Self::Block => Face::Pixel { on: "██" },
            Self::Shade => Face::Pixel { on: "▒▒" },
            Self::Hash => Face::Pixel { on: "##" },
        }
    }

    /// Renders `text` as a block of lines, top to bottom.
    pub fn render(&self, text: &str) -> Vec<String> {
        let face = self.face();
        let mut lines = vec![String::new(); face.height()];

        for (i, c) in text.chars().enumerate() {
            let glyph = face.glyph(c);
            for (line, row) in lines.iter_mut().zip(glyph) {
                if i > 0 {
                    line.push_str(face.gap());
                }
                line.push_str(&row);
            }
        }

        lines
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| TimerError::InvalidStyle(s.to_string()))
    }
}

/// Pads `line` on both sides so it sits in the middle of `width` columns.
///
/// The left side gets the smaller half when the padding is odd. Lines that
/// already fill the width come back untouched.
pub fn center(line: &str, width: usize) -> String {
    let len = line.width();
    if len >= width {
        return line.to_string();
    }

    let pad = width - len;
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), line, " ".repeat(pad - left))
}

// ============================================================================
// Glyph Faces
// ============================================================================

type GlyphTable = &'static [(char, &'static [&'static str])];

enum Face {
    Ascii { glyphs: GlyphTable, height: usize, gap: &'static str },
    Pixel { on: &'static str },
}

const PIXEL_ROWS: usize = 5;

impl Face {
    fn height(&self) -> usize {
        match self {
            Self::Ascii { height, .. } => *height,
            Self::Pixel { .. } => PIXEL_ROWS,
        }
    }

    fn gap(&self) -> &'static str {
        match self {
            Self::Ascii { gap, .. } => *gap,
            Self::Pixel { .. } => "  ",
        }
    }

    /// Rows of one character, all padded to the glyph's widest row.
    fn glyph(&self, c: char) -> Vec<String> {
        let rows: Vec<String> = match self {
            Self::Ascii { glyphs, .. } => match lookup(*glyphs, c) {
                Some(rows) => rows.iter().map(|r| r.to_string()).collect(),
                None => return fallback(c, self.height()),
            },
            Self::Pixel { on } => match lookup(PIXELS, c) {
                Some(rows) => rows
                    .iter()
                    .map(|r| r.chars().map(|p| if p == '#' { *on } else { "  " }).collect())
                    .collect(),
                None => return fallback(c, self.height()),
            },
        };

        let width = rows.iter().map(|r| r.width()).max().unwrap_or(0);
        rows.into_iter()
            .map(|r| {
                let pad = width - r.width();
                r + &" ".repeat(pad)
            })
            .collect()
    }
}

fn lookup(table: GlyphTable, c: char) -> Option<&'static [&'static str]> {
    table.iter().find(|(ch, _)| *ch == c).map(|(_, rows)| *rows)
}

fn fallback(c: char, height: usize) -> Vec<String> {
    let mid = height / 2;
    let blank = " ".repeat(c.to_string().width());
    (0..height)
        .map(|row| if row == mid { c.to_string() } else { blank.clone() })
        .collect()
}

// ============================================================================
// Glyph Data
// ============================================================================

const BIG: GlyphTable = &[
    ('0', &[r"  ___  ", r" / _ \ ", r"| | | |", r"| | | |", r"| |_| |", r" \___/ "]),
    ('1', &[r" __ ", r"/_ |", r" | |", r" | |", r" | |", r" |_|"]),
    ('2', &[r" ___  ", r"|__ \ ", r"   ) |", r"  / / ", r" / /_ ", r"|____|"]),
    ('3', &[r" ____  ", r"|___ \ ", r"  __) |", r" |__ < ", r" ___) |", r"|____/ "]),
    ('4', &[r" _  _   ", r"| || |  ", r"| || |_ ", r"|__   _|", r"   | |  ", r"   |_|  "]),
    ('5', &[r" _____ ", r"| ____|", r"| |__  ", r"|___ \ ", r" ___) |", r"|____/ "]),
    ('6', &[r"   __  ", r"  / /  ", r" / /_  ", r"| '_ \ ", r"| (_) |", r" \___/ "]),
    ('7', &[r" ______ ", r"|____  |", r"    / / ", r"   / /  ", r"  / /   ", r" /_/    "]),
    ('8', &[r"  ___  ", r" / _ \ ", r"| (_) |", r" > _ < ", r"| (_) |", r" \___/ "]),
    ('9', &[r"  ___  ", r" / _ \ ", r"| (_) |", r" \__, |", r"   / / ", r"  /_/  "]),
    (':', &[r"   ", r" _ ", r"(_)", r" _ ", r"(_)", r"   "]),
    (' ', &[r"   ", r"   ", r"   ", r"   ", r"   ", r"   "]),
];

const DIGITAL: GlyphTable = &[
    ('0', &[" _ ", "| |", "|_|"]),
    ('1', &["   ", "  |", "  |"]),
    ('2', &[" _ ", " _|", "|_ "]),
    ('3', &[" _ ", " _|", " _|"]),
    ('4', &["   ", "|_|", "  |"]),
    ('5', &[" _ ", "|_ ", " _|"]),
    ('6', &[" _ ", "|_ ", "|_|"]),
    ('7', &[" _ ", "  |", "  |"]),
    ('8', &[" _ ", "|_|", "|_|"]),
    ('9', &[" _ ", "|_|", " _|"]),
    (':', &[" ", ".", "."]),
    (' ', &["  ", "  ", "  "]),
];

// 3x5 bitmaps shared by the pixel styles; '#' marks a lit pixel.
const PIXELS: GlyphTable = &[
    ('0', &["###", "# #", "# #", "# #", "###"]),
    ('1', &[" # ", "## ", " # ", " # ", "###"]),
    ('2', &["###", "  #", "###", "#  ", "###"]),
    ('3', &["###", "  #", "###", "  #", "###"]),
    ('4', &["# #", "# #", "###", "  #", "  #"]),
    ('5', &["###", "#  ", "###", "  #", "###"]),
    ('6', &["###", "#  ", "###", "# #", "###"]),
    ('7', &["###", "  #", "  #", "  #", "  #"]),
    ('8', &["###", "# #", "###", "# #", "###"]),
    ('9', &["###", "# #", "###", "  #", "###"]),
    (':', &[" ", "#", " ", "#", " "]),
    (' ', &[" ", " ", " ", " ", " "]),
];
