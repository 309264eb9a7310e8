use lopdf::{Dictionary, Document as LopdfDocument, Object};
use prepify_layout::StandardFont;
use std::collections::BTreeMap;

/// Maps the WinAnsi bytes the renderer writes back to text.
fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80 => '\u{20AC}',
            0x91 => '\u{2018}',
            0x92 => '\u{2019}',
            0x93 => '\u{201C}',
            0x94 => '\u{201D}',
            0x95 => '\u{2022}',
            0x96 => '\u{2013}',
            0x97 => '\u{2014}',
            other => other as char,
        })
        .collect()
}

/// How the strings shown in one font map back to text.
enum TextDecoder {
    WinAnsi,
    Symbol(BTreeMap<u8, char>),
    /// Two-byte glyph ids, resolved through the font's `ToUnicode` map.
    Identity(BTreeMap<u16, String>),
}

impl TextDecoder {
    fn for_font(doc: &LopdfDocument, font: &Dictionary) -> Self {
        let name = |key: &[u8]| font.get(key).and_then(Object::as_name).ok();
        if name(b"Subtype") == Some(b"Type0".as_slice()) {
            return TextDecoder::Identity(to_unicode_map(doc, font));
        }
        if name(b"BaseFont") == Some(b"Symbol".as_slice()) {
            return TextDecoder::Symbol(symbol_codes());
        }
        TextDecoder::WinAnsi
    }

    fn decode(&self, bytes: &[u8]) -> String {
        match self {
            TextDecoder::WinAnsi => decode_win_ansi(bytes),
            TextDecoder::Symbol(codes) => bytes
                .iter()
                .map(|b| codes.get(b).copied().unwrap_or('\u{FFFD}'))
                .collect(),
            TextDecoder::Identity(glyphs) => bytes
                .chunks(2)
                .filter(|pair| pair.len() == 2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .map(|glyph| glyphs.get(&glyph).cloned().unwrap_or_default())
                .collect(),
        }
    }
}

/// Reverse of the Symbol encoding for every character the renderer sends
/// to Symbol. Where two characters share a code (Omega and the ohm sign),
/// the Greek letter wins.
fn symbol_codes() -> BTreeMap<u8, char> {
    let candidates = (0x20u32..0x7F)
        .chain(0x0391..0x03D7)
        .chain(0x2000..0x2700)
        .filter_map(char::from_u32)
        .filter(|ch| StandardFont::Symbol.covers(*ch));
    let mut codes = BTreeMap::new();
    for ch in candidates {
        if let Some(&code) = StandardFont::Symbol.encode(&ch.to_string()).first() {
            codes.entry(code).or_insert(ch);
        }
    }
    codes
}

/// Parses the `bfchar` entries of a font's `ToUnicode` stream.
fn to_unicode_map(doc: &LopdfDocument, font: &Dictionary) -> BTreeMap<u16, String> {
    let Some(stream) = font
        .get(b"ToUnicode")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_object(id))
        .and_then(Object::as_stream)
        .ok()
    else {
        return BTreeMap::new();
    };
    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    let text = String::from_utf8_lossy(&data);

    let hex = |token: &str| token.trim_matches(|c| c == '<' || c == '>').to_string();
    let mut map = BTreeMap::new();
    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [glyph, unicode] = tokens.as_slice() else {
            continue;
        };
        if !glyph.starts_with('<') || !unicode.starts_with('<') {
            continue;
        }
        let Ok(glyph) = u16::from_str_radix(&hex(glyph), 16) else {
            continue;
        };
        let units: Vec<u16> = hex(unicode)
            .as_bytes()
            .chunks(4)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok())
            .filter_map(|chunk| u16::from_str_radix(chunk, 16).ok())
            .collect();
        map.insert(glyph, String::from_utf16_lossy(&units));
    }
    map
}

/// Every text line drawn on page `page_num` (1-based), in order.
///
/// Each `Tm` starts a line; the strings shown after it are decoded in
/// whichever font is current and joined.
pub fn page_strings(doc: &LopdfDocument, page_num: u32) -> Vec<String> {
    let pages = doc.get_pages();
    let Some(page_id) = pages.get(&page_num) else {
        return Vec::new();
    };
    let Ok(content) = doc.get_and_decode_page_content(*page_id) else {
        return Vec::new();
    };
    let decoders: BTreeMap<Vec<u8>, TextDecoder> = doc
        .get_page_fonts(*page_id)
        .unwrap_or_default()
        .into_iter()
        .map(|(name, font)| (name, TextDecoder::for_font(doc, font)))
        .collect();

    let win_ansi = TextDecoder::WinAnsi;
    let mut lines = Vec::new();
    let mut line: Option<String> = None;
    let mut decoder = &win_ansi;
    for op in &content.operations {
        match op.operator.as_str() {
            "Tm" | "ET" => lines.extend(line.take()),
            "Tf" => {
                let font = op.operands.first().and_then(|name| name.as_name().ok());
                if let Some(found) = font.and_then(|name| decoders.get(name)) {
                    decoder = found;
                }
            }
            "Tj" => {
                if let Some(bytes) = op.operands.first().and_then(|s| s.as_str().ok()) {
                    line.get_or_insert_with(String::new).push_str(&decoder.decode(bytes));
                }
            }
            "TJ" => {
                let parts = op.operands.first().and_then(|array| array.as_array().ok());
                for part in parts.into_iter().flatten() {
                    if let Ok(bytes) = part.as_str() {
                        line.get_or_insert_with(String::new).push_str(&decoder.decode(bytes));
                    }
                }
            }
            _ => {}
        }
    }
    lines.extend(line);
    lines
}

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    let pages = doc.get_pages();
    for page_num in 1..=pages.len() {
        for line in page_strings(doc, page_num as u32) {
            text.push_str(&line);
            text.push('\n');
        }
    }
    text
}

/// Base font names referenced from page resources
pub fn extract_font_names(doc: &LopdfDocument) -> Vec<String> {
    let mut fonts = std::collections::BTreeSet::new();
    for (_, page_id) in doc.get_pages() {
        let Ok(page) = doc.get_dictionary(page_id) else {
            continue;
        };
        let resources = match page.get(b"Resources") {
            Ok(lopdf::Object::Reference(id)) => doc.get_dictionary(*id).ok(),
            Ok(other) => other.as_dict().ok(),
            Err(_) => None,
        };
        let Some(font_dict) = resources.and_then(|r| r.get(b"Font").ok()).and_then(|f| f.as_dict().ok()) else {
            continue;
        };
        for (_, font_ref) in font_dict.iter() {
            let font = font_ref
                .as_reference()
                .and_then(|id| doc.get_dictionary(id));
            if let Ok(name) = font.and_then(|f| f.get(b"BaseFont")).and_then(|obj| obj.as_name()) {
                fonts.insert(String::from_utf8_lossy(name).to_string());
            }
        }
    }
    fonts.into_iter().collect()
}

/// Fill opacities (`ca`) declared as graphics states
pub fn extract_fill_opacities(doc: &LopdfDocument) -> Vec<f32> {
    doc.objects
        .values()
        .filter_map(|object| object.as_dict().ok())
        .filter(|dict| {
            dict.get(b"Type")
                .and_then(|t| t.as_name())
                .is_ok_and(|name| name == b"ExtGState")
        })
        .filter_map(|dict| dict.get(b"ca").and_then(|ca| ca.as_float()).ok())
        .collect()
}

pub fn get_page_dimensions(doc: &LopdfDocument, page_num: u32) -> Option<(f32, f32)> {
    let pages = doc.get_pages();
    let page_id = pages.get(&page_num)?;
    let page = doc.get_dictionary(*page_id).ok()?;
    let media_box = page.get(b"MediaBox").ok()?.as_array().ok()?;
    if media_box.len() != 4 {
        return None;
    }
    let width = media_box[2].as_float().ok()?;
    let height = media_box[3].as_float().ok()?;
    Some((width, height))
}

pub fn document_title(doc: &LopdfDocument) -> Option<String> {
    let info_id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = doc.get_dictionary(info_id).ok()?;
    let title = info.get(b"Title").ok()?.as_str().ok()?;
    match title {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks(2)
                .filter(|pair| pair.len() == 2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        _ => Some(String::from_utf8_lossy(title).to_string()),
    }
}

#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "Expected PDF to contain '{}', but it was not found.\nExtracted text:\n{}",
            $text,
            extracted
        );
    };
}

#[macro_export]
macro_rules! assert_pdf_not_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            !extracted.contains($text),
            "Expected PDF not to contain '{}'.\nExtracted text:\n{}",
            $text,
            extracted
        );
    };
}

#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

#[macro_export]
macro_rules! assert_pdf_min_pages {
    ($pdf:expr, $min:expr) => {
        assert!(
            $pdf.page_count() >= $min,
            "Expected at least {} pages, got {}",
            $min,
            $pdf.page_count()
        );
    };
}

#[macro_export]
macro_rules! assert_pdf_has_font {
    ($pdf:expr, $pattern:expr) => {
        let fonts = $crate::common::pdf_assertions::extract_font_names(&$pdf.doc);
        assert!(
            fonts.iter().any(|f| f.contains($pattern)),
            "Expected font matching '{}', found: {:?}",
            $pattern,
            fonts
        );
    };
}

#[macro_export]
macro_rules! assert_pdf_page_size {
    ($pdf:expr, $page:expr, $width:expr, $height:expr) => {
        let dims = $crate::common::pdf_assertions::get_page_dimensions(&$pdf.doc, $page);
        assert!(dims.is_some(), "Could not get dimensions for page {}", $page);
        let (w, h) = dims.unwrap();
        assert!(
            (w - $width).abs() < 1.0 && (h - $height).abs() < 1.0,
            "Expected page {} to be {}x{}, got {}x{}",
            $page,
            $width,
            $height,
            w,
            h
        );
    };
}
