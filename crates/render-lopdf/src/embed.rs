//! Stream compression and embedded font objects for the saved document.

use crate::content::EmbeddedFont;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use prepify_render_core::RenderError;
use std::fmt::Write as _;
use std::io::Write;

/// Builds a `FlateDecode` stream from uncompressed `data`.
pub(crate) fn flate_stream(mut dict: Dictionary, data: &[u8]) -> Result<Stream, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    dict.set("Filter", "FlateDecode");
    Ok(Stream::new(dict, compressed))
}

/// A PDF text string: literal when ASCII, UTF-16BE with a byte order mark
/// otherwise.
pub(crate) fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(|unit| unit.to_be_bytes()));
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Adds a `Type0` font with an Identity-H encoded `CIDFontType2`
/// descendant, the full font program and a `ToUnicode` map.
pub(crate) fn embed_font(document: &mut Document, font: &EmbeddedFont) -> Result<ObjectId, RenderError> {
    let program = &font.program;
    let base_font = Object::Name(program.postscript_name().as_bytes().to_vec());
    let metrics = program.metrics();

    let file_id = document.add_object(flate_stream(
        dictionary! { "Length1" => program.data().len() as i64 },
        program.data(),
    )?);

    // Nonsymbolic, plus fixed pitch and italic where they apply.
    let mut flags: i64 = 32;
    if metrics.fixed_pitch {
        flags |= 1;
    }
    if metrics.italic_angle != 0.0 {
        flags |= 64;
    }
    let bbox: Vec<Object> = metrics.bbox.iter().map(|v| v.round().into()).collect();
    let descriptor_id = document.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => base_font.clone(),
        "Flags" => flags,
        "FontBBox" => bbox,
        "ItalicAngle" => metrics.italic_angle,
        "Ascent" => metrics.ascent.round(),
        "Descent" => metrics.descent.round(),
        "CapHeight" => metrics.cap_height.round(),
        "StemV" => 80,
        "FontFile2" => file_id,
    });

    let mut widths = Vec::with_capacity(font.glyphs.len() * 2);
    for (glyph_id, glyph) in &font.glyphs {
        widths.push(Object::Integer(*glyph_id as i64));
        widths.push(Object::Array(vec![glyph.width.round().into()]));
    }
    let cid_font_id = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => base_font.clone(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 1000,
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    let to_unicode_id =
        document.add_object(flate_stream(Dictionary::new(), to_unicode_cmap(font).as_bytes())?);

    log::debug!(
        "Embedding '{}' with {} used glyph(s)",
        program.postscript_name(),
        font.glyphs.len()
    );
    Ok(document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => base_font,
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    }))
}

/// Maps every used glyph back to its characters so text can be copied and
/// searched.
pub(crate) fn to_unicode_cmap(font: &EmbeddedFont) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let mappings: Vec<(u16, &str)> = font
        .glyphs
        .iter()
        .filter(|(_, glyph)| !glyph.text.is_empty())
        .map(|(glyph_id, glyph)| (*glyph_id, glyph.text.as_str()))
        .collect();
    // At most 100 entries per bfchar section.
    for chunk in mappings.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for (glyph_id, text) in chunk {
            let units: String = text
                .encode_utf16()
                .map(|unit| format!("{:04X}", unit))
                .collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", glyph_id, units);
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}
