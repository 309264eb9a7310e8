//! Metrics and encodings for the PDF standard-14 fonts.
//!
//! Helvetica covers the WinAnsi repertoire (ASCII, Latin-1 and the
//! typographic punctuation in 0x80..0x9F). Symbol supplies the Greek letters
//! and mathematical signs that routinely show up in exam questions. Every PDF
//! reader ships both, so no font program is embedded and widths come straight
//! from the Adobe AFM files. Oblique faces share the upright advance widths.

use prepify_style::{FontStyle, FontWeight};

// Helvetica, WinAnsi 32..=126
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, //
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, //
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, //
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

// Helvetica, WinAnsi 0x80..=0xFF (zero marks unassigned codes)
const HELVETICA_HIGH: [u16; 128] = [
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0, //
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667, //
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, //
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, //
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, //
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, //
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

// Helvetica-Bold, WinAnsi 32..=126
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, //
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, //
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, //
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

// Helvetica-Bold, WinAnsi 0x80..=0xFF
const HELVETICA_BOLD_HIGH: [u16; 128] = [
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0, //
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667, //
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, //
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, //
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, //
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, //
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278, //
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// Symbol glyphs reachable from text: (character, code, width).
///
/// Only characters WinAnsi cannot encode are listed; everything else stays
/// in Helvetica.
const SYMBOL_GLYPHS: &[(char, u8, u16)] = &[
    // Greek capitals
    ('\u{0391}', 0x41, 722),
    ('\u{0392}', 0x42, 667),
    ('\u{0393}', 0x47, 603),
    ('\u{0394}', 0x44, 612),
    ('\u{0395}', 0x45, 611),
    ('\u{0396}', 0x5A, 611),
    ('\u{0397}', 0x48, 722),
    ('\u{0398}', 0x51, 741),
    ('\u{0399}', 0x49, 333),
    ('\u{039A}', 0x4B, 722),
    ('\u{039B}', 0x4C, 686),
    ('\u{039C}', 0x4D, 889),
    ('\u{039D}', 0x4E, 722),
    ('\u{039E}', 0x58, 645),
    ('\u{039F}', 0x4F, 722),
    ('\u{03A0}', 0x50, 768),
    ('\u{03A1}', 0x52, 556),
    ('\u{03A3}', 0x53, 592),
    ('\u{03A4}', 0x54, 611),
    ('\u{03A5}', 0x55, 690),
    ('\u{03A6}', 0x46, 763),
    ('\u{03A7}', 0x43, 722),
    ('\u{03A8}', 0x59, 795),
    ('\u{03A9}', 0x57, 768),
    ('\u{2126}', 0x57, 768),
    // Greek lowercase
    ('\u{03B1}', 0x61, 631),
    ('\u{03B2}', 0x62, 549),
    ('\u{03B3}', 0x67, 411),
    ('\u{03B4}', 0x64, 494),
    ('\u{03B5}', 0x65, 439),
    ('\u{03B6}', 0x7A, 494),
    ('\u{03B7}', 0x68, 603),
    ('\u{03B8}', 0x71, 521),
    ('\u{03B9}', 0x69, 329),
    ('\u{03BA}', 0x6B, 549),
    ('\u{03BB}', 0x6C, 549),
    ('\u{03BC}', 0x6D, 576),
    ('\u{03BD}', 0x6E, 521),
    ('\u{03BE}', 0x78, 493),
    ('\u{03BF}', 0x6F, 549),
    ('\u{03C0}', 0x70, 549),
    ('\u{03C1}', 0x72, 549),
    ('\u{03C2}', 0x56, 439),
    ('\u{03C3}', 0x73, 603),
    ('\u{03C4}', 0x74, 439),
    ('\u{03C5}', 0x75, 576),
    ('\u{03C6}', 0x66, 521),
    ('\u{03C7}', 0x63, 549),
    ('\u{03C8}', 0x79, 686),
    ('\u{03C9}', 0x77, 686),
    ('\u{03D1}', 0x4A, 631),
    ('\u{03D5}', 0x6A, 603),
    ('\u{03D6}', 0x76, 713),
    // Logic and relations
    ('\u{2200}', 0x22, 713),
    ('\u{2203}', 0x24, 549),
    ('\u{220B}', 0x27, 439),
    ('\u{2217}', 0x2A, 500),
    ('\u{2212}', 0x2D, 549),
    ('\u{2245}', 0x40, 549),
    ('\u{2234}', 0x5C, 863),
    ('\u{22A5}', 0x5E, 658),
    ('\u{2032}', 0xA2, 247),
    ('\u{2264}', 0xA3, 549),
    ('\u{2044}', 0xA4, 167),
    ('\u{221E}', 0xA5, 713),
    ('\u{2033}', 0xB2, 411),
    ('\u{2265}', 0xB3, 549),
    ('\u{221D}', 0xB5, 713),
    ('\u{2202}', 0xB6, 494),
    ('\u{2260}', 0xB9, 549),
    ('\u{2261}', 0xBA, 549),
    ('\u{2248}', 0xBB, 549),
    ('\u{2135}', 0xC0, 823),
    ('\u{2297}', 0xC4, 768),
    ('\u{2295}', 0xC5, 768),
    ('\u{2205}', 0xC6, 823),
    ('\u{2229}', 0xC7, 768),
    ('\u{222A}', 0xC8, 768),
    ('\u{2283}', 0xC9, 713),
    ('\u{2287}', 0xCA, 713),
    ('\u{2284}', 0xCB, 713),
    ('\u{2282}', 0xCC, 713),
    ('\u{2286}', 0xCD, 713),
    ('\u{2208}', 0xCE, 713),
    ('\u{2209}', 0xCF, 713),
    ('\u{2220}', 0xD0, 768),
    ('\u{2207}', 0xD1, 713),
    ('\u{220F}', 0xD5, 823),
    ('\u{221A}', 0xD6, 549),
    ('\u{22C5}', 0xD7, 250),
    ('\u{2227}', 0xD9, 603),
    ('\u{2228}', 0xDA, 603),
    ('\u{25CA}', 0xE0, 494),
    ('\u{2211}', 0xE5, 713),
    ('\u{222B}', 0xF2, 274),
    // Arrows
    ('\u{2194}', 0xAB, 1042),
    ('\u{2190}', 0xAC, 987),
    ('\u{2191}', 0xAD, 603),
    ('\u{2192}', 0xAE, 987),
    ('\u{2193}', 0xAF, 603),
    ('\u{21D4}', 0xDB, 1042),
    ('\u{21D0}', 0xDC, 987),
    ('\u{21D1}', 0xDD, 603),
    ('\u{21D2}', 0xDE, 987),
    ('\u{21D3}', 0xDF, 603),
    // Card suits
    ('\u{2663}', 0xA7, 753),
    ('\u{2666}', 0xA8, 753),
    ('\u{2665}', 0xA9, 753),
    ('\u{2660}', 0xAA, 753),
];

// Symbol `question`, used when a character has no glyph at all.
const SYMBOL_QUESTION_ADVANCE: u16 = 444;

/// One of the standard fonts the renderer can reference without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Symbol,
}

impl StandardFont {
    pub const ALL: [StandardFont; 5] = [
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
        StandardFont::HelveticaBoldOblique,
        StandardFont::Symbol,
    ];

    /// The Helvetica face for a weight and style.
    pub fn for_style(weight: FontWeight, style: FontStyle) -> Self {
        match (weight.is_bold(), style) {
            (false, FontStyle::Normal) => StandardFont::Helvetica,
            (true, FontStyle::Normal) => StandardFont::HelveticaBold,
            (false, FontStyle::Italic) => StandardFont::HelveticaOblique,
            (true, FontStyle::Italic) => StandardFont::HelveticaBoldOblique,
        }
    }

    pub fn postscript_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::Symbol => "Symbol",
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique
        )
    }

    /// Symbol carries its own built-in encoding; the Helvetica faces use
    /// `WinAnsiEncoding`.
    pub fn uses_win_ansi(&self) -> bool {
        !matches!(self, StandardFont::Symbol)
    }

    /// Whether this font can show `ch` without substitution.
    pub fn covers(&self, ch: char) -> bool {
        if self.uses_win_ansi() {
            win_ansi_byte(ch).is_some()
        } else {
            symbol_glyph(ch).is_some()
        }
    }

    /// Advance width of `ch` in 1/1000 em.
    ///
    /// Characters the font cannot show are measured as the `?` they are
    /// drawn as, so measured and drawn widths always agree.
    pub fn advance(&self, ch: char) -> u16 {
        if !self.uses_win_ansi() {
            return symbol_glyph(ch)
                .map(|(_, width)| width)
                .unwrap_or(SYMBOL_QUESTION_ADVANCE);
        }
        let (ascii, high) = if self.is_bold() {
            (&HELVETICA_BOLD_ASCII, &HELVETICA_BOLD_HIGH)
        } else {
            (&HELVETICA_ASCII, &HELVETICA_HIGH)
        };
        let question = ascii[(b'?' - 32) as usize];
        match win_ansi_byte(ch) {
            Some(byte @ 0x20..=0x7E) => ascii[(byte - 32) as usize],
            Some(byte @ 0x80..=0xFF) => match high[(byte - 0x80) as usize] {
                0 => question,
                width => width,
            },
            _ => question,
        }
    }

    /// Width of `text` in points.
    pub fn width(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.advance(c) as u32).sum();
        units as f32 * font_size / 1000.0
    }

    /// Encodes `text` for a content-stream string in this font's encoding.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        if self.uses_win_ansi() {
            encode_win_ansi(text)
        } else {
            encode_with(text, self.postscript_name(), |c| {
                symbol_glyph(c).map(|(code, _)| code)
            })
        }
    }
}

/// The WinAnsi code for `ch`, if it has one.
pub fn win_ansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        ' '..='~' | '\u{00A0}'..='\u{00FF}' => ch as u8,
        _ => return None,
    };
    Some(byte)
}

fn symbol_glyph(ch: char) -> Option<(u8, u16)> {
    SYMBOL_GLYPHS
        .iter()
        .find(|(candidate, ..)| *candidate == ch)
        .map(|&(_, code, width)| (code, width))
}

/// Encodes text for a simple font using `WinAnsiEncoding`.
///
/// Characters without a WinAnsi code are written as `?` and reported once per
/// call with a warning.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    encode_with(text, "WinAnsiEncoding", win_ansi_byte)
}

fn encode_with(text: &str, target: &str, lookup: impl Fn(char) -> Option<u8>) -> Vec<u8> {
    let mut missing: Vec<char> = Vec::new();
    let bytes = text
        .chars()
        .map(|c| {
            lookup(c).unwrap_or_else(|| {
                if !missing.contains(&c) {
                    missing.push(c);
                }
                b'?'
            })
        })
        .collect();
    if !missing.is_empty() {
        log::warn!(
            "{} has no glyph for {:?}; drawn as '?' in \"{}\"",
            target,
            missing,
            text
        );
    }
    bytes
}
