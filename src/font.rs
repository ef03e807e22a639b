use unicode_normalization::UnicodeNormalization as _;

/// The style variant of the sans-serif family used on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

/// One of the standard 14 PDF fonts. These are never embedded: every PDF viewer
/// provides them, so only their name and their advance widths are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl BuiltinFont {
    pub fn from_style(style: FontStyle) -> Self {
        match style {
            FontStyle::Regular => BuiltinFont::Helvetica,
            FontStyle::Bold => BuiltinFont::HelveticaBold,
            FontStyle::Italic => BuiltinFont::HelveticaOblique,
        }
    }

    /// The PostScript name written to the `BaseFont` entry.
    pub fn base_font(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// The name under which the font is registered in the page resources.
    pub fn resource_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F0",
            BuiltinFont::HelveticaBold => "F1",
            BuiltinFont::HelveticaOblique => "F2",
        }
    }

    /// Advance width of an encoded byte in thousandths of the font size.
    fn glyph_width(&self, byte: u8) -> u16 {
        let widths = match self {
            // The oblique face shares the metrics of the upright one
            BuiltinFont::Helvetica | BuiltinFont::HelveticaOblique => &HELVETICA_WIDTHS,
            BuiltinFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        match byte {
            32..=126 => widths[(byte - 32) as usize],
            _ => DEFAULT_GLYPH_WIDTH,
        }
    }

    /// Width of the text at the given size, in the same unit as the size. Characters
    /// outside of the encoding are measured as the question mark replacing them.
    pub fn string_width(&self, text: &str, font_size: f32) -> f32 {
        let total: u32 = text
            .nfc()
            .map(|character| win_ansi_byte(character).unwrap_or(b'?'))
            .map(|byte| u32::from(self.glyph_width(byte)))
            .sum();
        total as f32 * font_size / 1000.0
    }
}

const DEFAULT_GLYPH_WIDTH: u16 = 556;

/// AFM widths of Helvetica for the printable ASCII range (32 to 126), WinAnsi encoded.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// AFM widths of Helvetica-Bold for the printable ASCII range (32 to 126), WinAnsi encoded.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Encodes text for a simple font with `WinAnsiEncoding`. The text is first normalized
/// in the NFC form so that composed Latin-1 characters survive; anything else that has
/// no single-byte code is replaced by a question mark.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.nfc()
        .map(|character| {
            win_ansi_byte(character).unwrap_or_else(|| {
                log::warn!(
                    "Unable to encode the character {:?} in the built-in font, replacing it",
                    character
                );
                b'?'
            })
        })
        .collect()
}

/// The printable ASCII and Latin-1 ranges have the same codes in `WinAnsiEncoding`.
fn win_ansi_byte(character: char) -> Option<u8> {
    match u32::from(character) {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => Some(code as u8),
        _ => None,
    }
}
