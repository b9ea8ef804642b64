//! Embedded DejaVu Sans faces for the built-in engine
//!
//! Text is shown as 2-byte codes under `Identity-H`. Codes are handed out per
//! document in order of first use, and one ToUnicode CMap maps every code back
//! to its character for both faces. Characters without a glyph render as the
//! font's missing-glyph box but still extract as themselves.

use std::collections::HashMap;

use ab_glyph::{Font, FontRef, GlyphId, InvalidFont};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::types::{AppError, AppResult};

static REGULAR_TTF: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");
static BOLD_TTF: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans-Bold.ttf");

// PDF caps a bfchar block at 100 entries
const BFCHAR_CHUNK: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

impl Face {
    /// Name used in page resources and `Tf` operators
    pub fn resource_name(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Face::Regular => "DejaVuSans",
            Face::Bold => "DejaVuSans-Bold",
        }
    }

    fn data(self) -> &'static [u8] {
        match self {
            Face::Regular => REGULAR_TTF,
            Face::Bold => BOLD_TTF,
        }
    }

    fn stem_v(self) -> i64 {
        match self {
            Face::Regular => 80,
            Face::Bold => 140,
        }
    }
}

pub struct FontSet {
    regular: FontRef<'static>,
    bold: FontRef<'static>,
    // Code N (1-based) shows chars[N - 1]
    chars: Vec<char>,
    codes: HashMap<char, u16>,
}

impl FontSet {
    pub fn load() -> AppResult<Self> {
        let parse = |face: Face| {
            FontRef::try_from_slice(face.data()).map_err(|e: InvalidFont| {
                AppError::Render(format!("embedded font {} is unreadable: {}", face.base_font(), e))
            })
        };
        Ok(Self {
            regular: parse(Face::Regular)?,
            bold: parse(Face::Bold)?,
            chars: Vec::new(),
            codes: HashMap::new(),
        })
    }

    fn font(&self, face: Face) -> &FontRef<'static> {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
        }
    }

    /// Advance width of `text` in points
    pub fn width(&self, text: &str, face: Face, size: f32) -> f32 {
        let font = self.font(face);
        let units: f32 = text
            .chars()
            .filter(|c| !c.is_control())
            .map(|c| font.h_advance_unscaled(font.glyph_id(c)))
            .sum();
        units * size / units_per_em(font)
    }

    /// Encode `text` as big-endian 2-byte codes, assigning new codes as needed
    pub fn encode(&mut self, text: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(text.len() * 2);
        for c in text.chars().filter(|c| !c.is_control()) {
            let code = match self.codes.get(&c) {
                Some(&code) => code,
                None if self.chars.len() < u16::MAX as usize - 1 => {
                    self.chars.push(c);
                    let code = self.chars.len() as u16;
                    self.codes.insert(c, code);
                    code
                }
                // Out of codes: fall back to the missing glyph
                None => 0,
            };
            bytes.extend_from_slice(&code.to_be_bytes());
        }
        bytes
    }

    /// Text operand for a `Tj` operator
    pub fn text_operand(&mut self, text: &str) -> Object {
        Object::String(self.encode(text), StringFormat::Hexadecimal)
    }

    /// Add both faces to `doc` and return the `/Font` resource dictionary
    pub fn write(&self, doc: &mut Document) -> lopdf::Dictionary {
        let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, self.to_unicode_cmap()));
        let regular_id = self.write_face(doc, Face::Regular, to_unicode_id);
        let bold_id = self.write_face(doc, Face::Bold, to_unicode_id);
        dictionary! {
            Face::Regular.resource_name() => regular_id,
            Face::Bold.resource_name() => bold_id,
        }
    }

    fn write_face(&self, doc: &mut Document, face: Face, to_unicode_id: ObjectId) -> ObjectId {
        let font = self.font(face);
        let scale = 1000.0 / units_per_em(font);
        let ascent = (font.ascent_unscaled() * scale).round() as i64;
        let descent = (font.descent_unscaled() * scale).round() as i64;

        let data = face.data();
        let file_id = doc.add_object(Stream::new(
            dictionary! { "Length1" => data.len() as i64 },
            data.to_vec(),
        ));
        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => face.base_font(),
            "Flags" => 32,
            "FontBBox" => vec![(-1000).into(), descent.into(), 2000.into(), ascent.into()],
            "ItalicAngle" => 0,
            "Ascent" => ascent,
            "Descent" => descent,
            "CapHeight" => ascent,
            "StemV" => face.stem_v(),
            "FontFile2" => file_id,
        });

        let glyphs: Vec<GlyphId> = self.chars.iter().map(|&c| font.glyph_id(c)).collect();

        // Code 0 is the missing glyph
        let mut gid_map = vec![0u8, 0u8];
        for glyph in &glyphs {
            gid_map.extend_from_slice(&glyph.0.to_be_bytes());
        }
        let gid_map_id = doc.add_object(Stream::new(dictionary! {}, gid_map));

        let mut cid_font = dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => face.base_font(),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "DW" => (font.h_advance_unscaled(GlyphId(0)) * scale).round() as i64,
            "CIDToGIDMap" => gid_map_id,
        };
        if !glyphs.is_empty() {
            let widths: Vec<Object> = glyphs
                .iter()
                .map(|&g| Object::Integer((font.h_advance_unscaled(g) * scale).round() as i64))
                .collect();
            cid_font.set("W", vec![Object::Integer(1), Object::Array(widths)]);
        }
        let cid_font_id = doc.add_object(cid_font);

        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => face.base_font(),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![cid_font_id.into()],
            "ToUnicode" => to_unicode_id,
        })
    }

    fn to_unicode_cmap(&self) -> Vec<u8> {
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

        let entries: Vec<(usize, char)> = self.chars.iter().copied().enumerate().collect();
        for chunk in entries.chunks(BFCHAR_CHUNK) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for &(index, c) in chunk {
                let mut units = [0u16; 2];
                let target: String = c
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|unit| format!("{:04X}", unit))
                    .collect();
                cmap.push_str(&format!("<{:04X}> <{}>\n", index + 1, target));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str(
            "endcmap\n\
             CMapName currentdict /CMap defineresource pop\n\
             end\n\
             end\n",
        );
        cmap.into_bytes()
    }
}

fn units_per_em(font: &FontRef<'static>) -> f32 {
    font.units_per_em().unwrap_or(1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_assigned_in_first_use_order() {
        let mut fonts = FontSet::load().unwrap();
        assert_eq!(fonts.encode("aba"), vec![0, 1, 0, 2, 0, 1]);
        assert_eq!(fonts.encode("μ\n"), vec![0, 3]);
        assert_eq!(fonts.chars, vec!['a', 'b', 'μ']);
    }

    #[test]
    fn test_cmap_maps_supplementary_chars_to_surrogates() {
        let mut fonts = FontSet::load().unwrap();
        fonts.encode("→🌱");
        let cmap = String::from_utf8(fonts.to_unicode_cmap()).unwrap();
        assert!(cmap.contains("2 beginbfchar\n<0001> <2192>\n<0002> <D83CDF31>\nendbfchar\n"));
        assert!(cmap.ends_with("end\nend\n"));
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let fonts = FontSet::load().unwrap();
        let regular = fonts.width("Photosynthesis", Face::Regular, 11.0);
        let bold = fonts.width("Photosynthesis", Face::Bold, 11.0);
        assert!(regular > 50.0 && regular < 110.0);
        assert!(bold > regular);
        assert_eq!(fonts.width("", Face::Regular, 11.0), 0.0);
    }
}
