use crate::models::style::{Emphasis, FontFamily};

// Advance widths (1/1000 em) for ASCII 0x20..=0x7E, from the standard-14 AFM files.
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 333, 333, 333, 500, 564, 250, 333, 250, 278, 500, 500, 500,
    500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444, 921, 722, 667, 667, 722, 611,
    556, 722, 722, 333, 389, 722, 611, 889, 722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722,
    722, 611, 333, 278, 333, 469, 500, 333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500,
    278, 778, 500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 333, 333, 333, 500, 570, 250, 333, 250, 278, 500, 500, 500,
    500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500, 930, 722, 667, 722, 722, 667,
    611, 778, 778, 389, 500, 778, 667, 944, 722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722,
    722, 667, 333, 278, 333, 581, 500, 333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556,
    278, 833, 556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

/// One of the standard Type1 fonts every PDF reader ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    TimesRoman,
    TimesBold,
}

impl StandardFont {
    pub fn select(family: FontFamily, emphasis: Emphasis) -> Self {
        match (family, emphasis) {
            (FontFamily::Times, Emphasis::Regular) => StandardFont::TimesRoman,
            (FontFamily::Times, Emphasis::Bold) => StandardFont::TimesBold,
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
        }
    }

    /// Resource name used in content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            StandardFont::TimesRoman => "F1",
            StandardFont::TimesBold => "F2",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            StandardFont::TimesRoman => &TIMES_ROMAN_WIDTHS,
            StandardFont::TimesBold => &TIMES_BOLD_WIDTHS,
        }
    }

    fn char_width(self, c: char) -> u16 {
        let base = unaccented(c);
        if (' '..='~').contains(&base) {
            self.widths()[base as usize - 0x20]
        } else {
            500
        }
    }

    /// Width of `text` in points at `size_pt`.
    pub fn text_width(self, text: &str, size_pt: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size_pt / 1000.0
    }

    /// Breaks `text` into lines no wider than `max_width` points.
    ///
    /// Explicit newlines are kept. Words wider than a whole line are split
    /// between characters.
    pub fn wrap(self, text: &str, size_pt: f32, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();

        for paragraph in text.lines() {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };
                if self.text_width(&candidate, size_pt) <= max_width {
                    current = candidate;
                    continue;
                }

                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                for c in word.chars() {
                    current.push(c);
                    if current.chars().count() > 1
                        && self.text_width(&current, size_pt) > max_width
                    {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    }
                }
            }
            lines.push(current);
        }

        lines
    }
}

// Accented Latin letters share the advance width of their base letter.
pub(crate) fn unaccented(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ő' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'ű' => 'u',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ő' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ű' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        _ => c,
    }
}

/// Encodes `text` as WinAnsiEncoding bytes.
///
/// Latin-1 passes through unchanged. Hungarian double-acute vowels, which
/// WinAnsi lacks, fall back to their umlaut forms; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let c = match c {
                'ő' => 'ö',
                'ű' => 'ü',
                'Ő' => 'Ö',
                'Ű' => 'Ü',
                other => other,
            };
            match c as u32 {
                0x20..=0x7E | 0xA0..=0xFF => c as u8,
                _ => b'?',
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_passes_through() {
        assert_eq!(encode_win_ansi("Aláírás"), b"Al\xe1\xedr\xe1s".to_vec());
        assert_eq!(encode_win_ansi("Ünnepnapok"), b"\xdcnnepnapok".to_vec());
    }

    #[test]
    fn double_acute_falls_back_to_umlaut() {
        assert_eq!(encode_win_ansi("Győr"), b"Gy\xf6r".to_vec());
        assert_eq!(encode_win_ansi("Ű"), vec![0xDC]);
    }

    #[test]
    fn unsupported_chars_become_question_marks() {
        assert_eq!(encode_win_ansi("a\u{20AC}b\u{4E2D}"), b"a?b?".to_vec());
    }

    #[test]
    fn widths_scale_with_size() {
        let font = StandardFont::TimesBold;
        assert_eq!(font.text_width("", 12.0), 0.0);
        assert_eq!(font.text_width("8", 12.0), 6.0);
        assert_eq!(font.text_width("88", 24.0), 24.0);
        assert_eq!(font.text_width("á", 10.0), font.text_width("a", 10.0));
    }

    #[test]
    fn wrap_keeps_short_text_and_newlines() {
        let font = StandardFont::TimesBold;
        assert_eq!(font.wrap("Jane Doe", 12.0, 200.0), vec!["Jane Doe"]);
        assert_eq!(
            font.wrap("Kezdés\nStart time", 12.0, 200.0),
            vec!["Kezdés", "Start time"]
        );
        assert!(font.wrap("", 12.0, 200.0).is_empty());
    }

    #[test]
    fn wrap_breaks_at_spaces() {
        let font = StandardFont::TimesBold;
        // "88 88" is 27pt wide at 12pt, each word 12pt
        assert_eq!(font.wrap("88 88", 12.0, 20.0), vec!["88", "88"]);
        assert_eq!(font.wrap("88 88", 12.0, 30.0), vec!["88 88"]);
    }

    #[test]
    fn wrap_splits_overlong_words() {
        let font = StandardFont::TimesBold;
        let lines = font.wrap("88888888", 12.0, 20.0);
        assert_eq!(lines, vec!["888", "888", "88"]);
        assert!(lines.iter().all(|line| font.text_width(line, 12.0) <= 20.0));
    }

    #[test]
    fn select_by_emphasis() {
        assert_eq!(
            StandardFont::select(FontFamily::Times, Emphasis::Bold).base_font(),
            "Times-Bold"
        );
        assert_eq!(
            StandardFont::select(FontFamily::Times, Emphasis::Regular).base_font(),
            "Times-Roman"
        );
    }
}
