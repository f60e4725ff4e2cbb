//! Static font-metric tables for the four standard PDF fonts the renderer draws with.
//!
//! Widths are the AFM advance widths of the standard Type1 faces in 1/1000 em.
//! The PDF backend only embeds references to these base fonts, so measuring with the
//! same tables the viewer uses keeps wrapping and right-alignment exact.
//! Tables cover ASCII 0x20..=0x7E (95 printable characters). Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

use crate::layout::style::GenericFamily;

// ────────────────────────────────────────────────────────────────────────────
// Physical fonts
// ────────────────────────────────────────────────────────────────────────────

/// A standard-14 face available to every PDF viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PdfFont {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesBold,
}

impl PdfFont {
    pub const ALL: [PdfFont; 4] = [
        PdfFont::Helvetica,
        PdfFont::HelveticaBold,
        PdfFont::TimesRoman,
        PdfFont::TimesBold,
    ];

    pub fn select(generic: GenericFamily, bold: bool) -> Self {
        match (generic, bold) {
            (GenericFamily::SansSerif, false) => PdfFont::Helvetica,
            (GenericFamily::SansSerif, true) => PdfFont::HelveticaBold,
            (GenericFamily::Serif, false) => PdfFont::TimesRoman,
            (GenericFamily::Serif, true) => PdfFont::TimesBold,
        }
    }

    /// PostScript name written as `/BaseFont`.
    pub fn base_font(self) -> &'static str {
        match self {
            PdfFont::Helvetica => "Helvetica",
            PdfFont::HelveticaBold => "Helvetica-Bold",
            PdfFont::TimesRoman => "Times-Roman",
            PdfFont::TimesBold => "Times-Bold",
        }
    }

    /// Name of the font in the page resource dictionary.
    pub fn resource_name(self) -> &'static str {
        match self {
            PdfFont::Helvetica => "F1",
            PdfFont::HelveticaBold => "F2",
            PdfFont::TimesRoman => "F3",
            PdfFont::TimesBold => "F4",
        }
    }

    pub fn metrics(self) -> &'static FontMetricTable {
        match self {
            PdfFont::Helvetica => &HELVETICA_TABLE,
            PdfFont::HelveticaBold => &HELVETICA_BOLD_TABLE,
            PdfFont::TimesRoman => &TIMES_ROMAN_TABLE,
            PdfFont::TimesBold => &TIMES_BOLD_TABLE,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one face.
///
/// `widths[i]` = advance of ASCII character `(i + 32)` in 1/1000 em.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub font: PdfFont,
    widths: [u16; 95],
    en_dash: u16,
    /// Fallback for characters outside ASCII without a dedicated width.
    average_char_width: u16,
}

const BULLET_WIDTH: u16 = 350;
const EM_DASH_WIDTH: u16 = 1000;

impl FontMetricTable {
    fn char_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        match c {
            '\u{2022}' => BULLET_WIDTH,
            '\u{2013}' => self.en_dash,
            '\u{2014}' => EM_DASH_WIDTH,
            '\u{00A0}' => self.widths[0],
            _ => self.average_char_width,
        }
    }

    /// Rendered width of `s` in points at `size_pt`.
    pub fn measure(&self, s: &str, size_pt: f32) -> f32 {
        let units: u32 = s.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size_pt / 1000.0
    }

    pub fn space_width(&self, size_pt: f32) -> f32 {
        self.widths[0] as f32 * size_pt / 1000.0
    }

    /// Greedy word wrap at `max_width` points.
    ///
    /// Whitespace runs collapse to single spaces. A word wider than the line is split
    /// at character boundaries, so concatenating the words of the output reproduces the
    /// words of the input exactly. Blank input yields no lines.
    pub fn wrap(&self, text: &str, size_pt: f32, max_width: f32) -> Vec<String> {
        let space_w = self.space_width(size_pt);
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            for piece in self.split_oversized(word, size_pt, max_width) {
                let piece_w = self.measure(&piece, size_pt);
                if current.is_empty() {
                    current_width = piece_w;
                    current = piece;
                } else if current_width + space_w + piece_w > max_width {
                    lines.push(std::mem::take(&mut current));
                    current_width = piece_w;
                    current = piece;
                } else {
                    current.push(' ');
                    current.push_str(&piece);
                    current_width += space_w + piece_w;
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Breaks a single word into chunks no wider than `max_width` (at least one char each).
    fn split_oversized(&self, word: &str, size_pt: f32, max_width: f32) -> Vec<String> {
        if self.measure(word, size_pt) <= max_width {
            return vec![word.to_string()];
        }
        let mut chunks = Vec::new();
        let mut chunk = String::new();
        let mut width = 0.0_f32;
        for c in word.chars() {
            let w = self.char_width(c) as f32 * size_pt / 1000.0;
            if !chunk.is_empty() && width + w > max_width {
                chunks.push(std::mem::take(&mut chunk));
                width = 0.0;
            }
            chunk.push(c);
            width += w;
        }
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
        chunks
    }
}

// ────────────────────────────────────────────────────────────────────────────
// WinAnsi transcoding
// ────────────────────────────────────────────────────────────────────────────

/// Encodes text for a simple font using `WinAnsiEncoding`.
///
/// Latin-1 maps directly; the common typographic characters from the 0x80-0x9F block
/// are mapped explicitly; everything else becomes `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    font: PdfFont::Helvetica,
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    en_dash: 556,
    average_char_width: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    font: PdfFont::HelveticaBold,
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    en_dash: 556,
    average_char_width: 611,
};

static TIMES_ROMAN_TABLE: FontMetricTable = FontMetricTable {
    font: PdfFont::TimesRoman,
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        // 0    1    2    3    4    5    6    7    8    9
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        // :    ;    <    =    >    ?    @
        278, 278, 564, 564, 564, 444, 921,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 469, 500, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
        // {    |    }    ~
        480, 200, 480, 541,
    ],
    en_dash: 500,
    average_char_width: 500,
};

static TIMES_BOLD_TABLE: FontMetricTable = FontMetricTable {
    font: PdfFont::TimesBold,
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        // 0    1    2    3    4    5    6    7    8    9
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        // :    ;    <    =    >    ?    @
        333, 333, 570, 570, 570, 500, 930,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
        // [    \    ]    ^    _    `
        333, 278, 333, 581, 500, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
        // {    |    }    ~
        394, 220, 394, 520,
    ],
    en_dash: 500,
    average_char_width: 556,
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn helvetica() -> &'static FontMetricTable {
        PdfFont::Helvetica.metrics()
    }

    #[test]
    fn test_measure_empty_returns_zero() {
        assert_eq!(helvetica().measure("", 10.0), 0.0);
    }

    #[test]
    fn test_measure_ascii_characters() {
        // "Rust" = R(722) + u(556) + s(500) + t(278) = 2056 units → 20.56pt at 10pt
        let width = helvetica().measure("Rust", 10.0);
        assert!((width - 20.56).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_measure_scales_with_size() {
        let small = helvetica().measure("Resume", 10.0);
        let large = helvetica().measure("Resume", 20.0);
        assert!((large - 2.0 * small).abs() < 1e-3);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Architected distributed caching layer";
        assert!(
            PdfFont::HelveticaBold.metrics().measure(text, 11.0)
                > PdfFont::Helvetica.metrics().measure(text, 11.0)
        );
    }

    #[test]
    fn test_times_is_narrower_than_helvetica() {
        let text = "Architected distributed caching layer";
        assert!(
            PdfFont::TimesRoman.metrics().measure(text, 11.0)
                < PdfFont::Helvetica.metrics().measure(text, 11.0)
        );
    }

    #[test]
    fn test_bullet_and_dash_widths() {
        assert!((helvetica().measure("\u{2022}", 10.0) - 3.5).abs() < 1e-4);
        assert!((helvetica().measure("\u{2013}", 10.0) - 5.56).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_blank_is_empty() {
        assert!(helvetica().wrap("   ", 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        assert_eq!(helvetica().wrap("Rust", 10.0, 468.0), vec!["Rust".to_string()]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "Architected a distributed caching layer using Redis and consistent hashing, \
                    reducing p99 latency by 40% under 50k RPS peak load";
        let lines = helvetica().wrap(text, 10.0, 200.0);
        assert!(lines.len() >= 2);
        for line in &lines {
            assert!(helvetica().measure(line, 10.0) <= 200.0 + 1e-3, "{line:?} too wide");
        }
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_splits_oversized_word_without_losing_characters() {
        let word = "a".repeat(200);
        let lines = helvetica().wrap(&word, 10.0, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_select_covers_all_faces() {
        assert_eq!(PdfFont::select(GenericFamily::SansSerif, false), PdfFont::Helvetica);
        assert_eq!(PdfFont::select(GenericFamily::SansSerif, true), PdfFont::HelveticaBold);
        assert_eq!(PdfFont::select(GenericFamily::Serif, false), PdfFont::TimesRoman);
        assert_eq!(PdfFont::select(GenericFamily::Serif, true), PdfFont::TimesBold);
        for font in PdfFont::ALL {
            assert_eq!(font.metrics().font, font);
        }
    }

    #[test]
    fn test_win_ansi_transcoding() {
        assert_eq!(to_win_ansi("A\u{2022}B"), vec![b'A', 0x95, b'B']);
        assert_eq!(to_win_ansi("2019 \u{2013} 2021"), b"2019 \x96 2021".to_vec());
        assert_eq!(to_win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(to_win_ansi("\u{4e2d}"), vec![b'?']);
    }
}
