//! Style Resolution: maps the four abstract style roles onto renderer primitives.
//!
//! Every function here is pure and total: malformed input resolves to a safe default
//! (black, Helvetica, the role's default size) instead of failing. The PDF, DOCX,
//! LaTeX and preview renderers all read the same `ResolvedStyles`.

use serde::Serialize;

use crate::layout::font_metrics::PdfFont;
use crate::models::resume::{FontStyle, FontWeight, StylingOptions};

// ────────────────────────────────────────────────────────────────────────────
// Font families
// ────────────────────────────────────────────────────────────────────────────

/// The two physical buckets the PDF backend can draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenericFamily {
    Serif,
    SansSerif,
}

impl GenericFamily {
    pub fn css_keyword(self) -> &'static str {
        match self {
            GenericFamily::Serif => "serif",
            GenericFamily::SansSerif => "sans-serif",
        }
    }
}

/// Recognized family names. Anything else resolves to Helvetica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KnownFamily {
    Helvetica,
    Arial,
    Roboto,
    Lato,
    Calibri,
    Charter,
    Georgia,
    TimesNewRoman,
    Garamond,
}

/// A LaTeX font package directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatexFontPackage {
    pub directive: &'static str,
    /// Whether `\familydefault` must be switched to `\sfdefault`.
    pub sans_default: bool,
}

impl KnownFamily {
    pub const DEFAULT: KnownFamily = KnownFamily::Helvetica;

    pub const ALL: [KnownFamily; 9] = [
        KnownFamily::Helvetica,
        KnownFamily::Arial,
        KnownFamily::Roboto,
        KnownFamily::Lato,
        KnownFamily::Calibri,
        KnownFamily::Charter,
        KnownFamily::Georgia,
        KnownFamily::TimesNewRoman,
        KnownFamily::Garamond,
    ];

    /// Case-insensitive lookup by display name.
    pub fn parse(name: &str) -> Option<Self> {
        let needle = name.trim();
        Self::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(needle))
    }

    /// Literal family name handed to DOCX and the preview.
    pub fn name(self) -> &'static str {
        match self {
            KnownFamily::Helvetica => "Helvetica",
            KnownFamily::Arial => "Arial",
            KnownFamily::Roboto => "Roboto",
            KnownFamily::Lato => "Lato",
            KnownFamily::Calibri => "Calibri",
            KnownFamily::Charter => "Charter",
            KnownFamily::Georgia => "Georgia",
            KnownFamily::TimesNewRoman => "Times New Roman",
            KnownFamily::Garamond => "Garamond",
        }
    }

    pub fn generic(self) -> GenericFamily {
        match self {
            KnownFamily::Charter
            | KnownFamily::Georgia
            | KnownFamily::TimesNewRoman
            | KnownFamily::Garamond => GenericFamily::Serif,
            _ => GenericFamily::SansSerif,
        }
    }

    pub fn latex_package(self) -> LatexFontPackage {
        let (directive, sans_default) = match self {
            KnownFamily::Helvetica | KnownFamily::Arial => (r"\usepackage{helvet}", true),
            KnownFamily::Roboto => (r"\usepackage[sfdefault]{roboto}", true),
            KnownFamily::Lato => (r"\usepackage[default]{lato}", true),
            KnownFamily::Calibri => (r"\usepackage[sfdefault]{carlito}", true),
            KnownFamily::Charter => (r"\usepackage{charter}", false),
            KnownFamily::Georgia => (r"\usepackage{gelasio}", false),
            KnownFamily::TimesNewRoman => (r"\usepackage{newtxtext}", false),
            KnownFamily::Garamond => (r"\usepackage{ebgaramond}", false),
        };
        LatexFontPackage {
            directive,
            sans_default,
        }
    }
}

pub fn resolve_family(name: &str) -> KnownFamily {
    KnownFamily::parse(name).unwrap_or(KnownFamily::DEFAULT)
}

// ────────────────────────────────────────────────────────────────────────────
// Colors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb`, `rgb`, `#rrggbb` or `rrggbb`. Anything else is black.
    pub fn parse_hex(input: &str) -> Rgb {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Rgb::BLACK;
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Rgb::BLACK,
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).unwrap_or(0);
        Rgb::new(channel(0), channel(2), channel(4))
    }

    /// `RRGGBB`, as DOCX expects.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `#rrggbb`, as CSS expects.
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to 0.0..=1.0 for PDF color operators.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Roles
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleRole {
    Body,
    Heading,
    Subheading,
    SectionTitle,
}

impl StyleRole {
    pub fn default_size_pt(self) -> f32 {
        match self {
            StyleRole::Body => 10.0,
            StyleRole::Heading => 25.0,
            StyleRole::Subheading => 11.0,
            StyleRole::SectionTitle => 12.0,
        }
    }
}

pub const DEFAULT_LINE_HEIGHT: f32 = 1.15;
pub const LINK_COLOR: Rgb = Rgb::new(0x00, 0x7B, 0xFF);
const CONTACT_SCALE: f32 = 0.9;

/// A font style after resolution; identical input always yields an identical value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedFont {
    pub role: StyleRole,
    pub family: KnownFamily,
    pub generic: GenericFamily,
    pub size_pt: f32,
    pub color: Rgb,
    pub bold: bool,
}

impl ResolvedFont {
    /// Size in DOCX half-points.
    pub fn half_points(&self) -> u32 {
        (self.size_pt * 2.0).round() as u32
    }

    pub fn pdf_font(&self) -> PdfFont {
        PdfFont::select(self.generic, self.bold)
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn scaled(mut self, factor: f32) -> Self {
        self.size_pt *= factor;
        self
    }
}

pub fn resolve_size(size: Option<f32>, role: StyleRole) -> f32 {
    match size {
        Some(pt) if pt.is_finite() && pt > 0.0 => pt,
        _ => role.default_size_pt(),
    }
}

pub fn resolve_font(style: &FontStyle, role: StyleRole) -> ResolvedFont {
    let family = resolve_family(&style.family);
    ResolvedFont {
        role,
        family,
        generic: family.generic(),
        size_pt: resolve_size(style.size, role),
        color: Rgb::parse_hex(&style.color),
        bold: style.weight == FontWeight::Bold,
    }
}

pub fn resolve_line_height(line_height: Option<f32>) -> f32 {
    match line_height {
        Some(lh) if lh.is_finite() && lh > 0.0 => lh,
        _ => DEFAULT_LINE_HEIGHT,
    }
}

/// All four roles plus the global line height, resolved once per snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyles {
    pub body: ResolvedFont,
    pub heading: ResolvedFont,
    pub subheading: ResolvedFont,
    pub section_title: ResolvedFont,
    pub line_height: f32,
}

impl ResolvedStyles {
    pub fn resolve(styling: &StylingOptions) -> Self {
        Self {
            body: resolve_font(&styling.font, StyleRole::Body),
            heading: resolve_font(&styling.heading, StyleRole::Heading),
            subheading: resolve_font(&styling.subheading, StyleRole::Subheading),
            section_title: resolve_font(&styling.section_title, StyleRole::SectionTitle),
            line_height: resolve_line_height(styling.line_height),
        }
    }

    // ── Per-element fonts ───────────────────────────────────────────────────
    // Every renderer draws these elements with exactly these fonts.

    /// Header contact line.
    pub fn contact(&self) -> ResolvedFont {
        self.body.scaled(CONTACT_SCALE)
    }

    /// Role, university or project name on an entry line.
    pub fn entry_title(&self) -> ResolvedFont {
        self.subheading
    }

    /// Company, location or degree after the title: subheading face, never bold.
    pub fn entry_detail(&self) -> ResolvedFont {
        self.subheading.with_bold(false)
    }

    /// Right-aligned date range of an entry line.
    pub fn entry_date(&self) -> ResolvedFont {
        self.body.with_bold(false)
    }

    /// Right-aligned project link.
    pub fn entry_link(&self) -> ResolvedFont {
        self.body.with_bold(false).with_color(LINK_COLOR)
    }

    /// "Category: " prefix of a skill line.
    pub fn skill_category(&self) -> ResolvedFont {
        self.body.with_bold(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_six_digits() {
        assert_eq!(Rgb::parse_hex("#007BFF"), Rgb::new(0, 123, 255));
        assert_eq!(Rgb::parse_hex("333333"), Rgb::new(51, 51, 51));
    }

    #[test]
    fn test_parse_hex_three_digits_expands() {
        assert_eq!(Rgb::parse_hex("#f0a"), Rgb::new(255, 0, 170));
        assert_eq!(Rgb::parse_hex("abc"), Rgb::new(170, 187, 204));
    }

    #[test]
    fn test_malformed_colors_resolve_to_black() {
        for bad in ["notacolor", "", "#", "#12345", "#gggggg", "#1234567", "#ééé"] {
            assert_eq!(Rgb::parse_hex(bad), Rgb::BLACK, "{bad:?} should be black");
        }
    }

    #[test]
    fn test_color_encodings() {
        let c = Rgb::new(0, 123, 255);
        assert_eq!(c.to_hex(), "007BFF");
        assert_eq!(c.to_css(), "#007bff");
        let [r, g, b] = c.to_unit();
        assert_eq!(r, 0.0);
        assert!((g - 123.0 / 255.0).abs() < 1e-6);
        assert_eq!(b, 1.0);
    }

    #[test]
    fn test_family_lookup_is_case_insensitive() {
        assert_eq!(KnownFamily::parse("times new roman"), Some(KnownFamily::TimesNewRoman));
        assert_eq!(KnownFamily::parse("  Roboto "), Some(KnownFamily::Roboto));
        assert_eq!(KnownFamily::parse("Comic Sans"), None);
    }

    #[test]
    fn test_unknown_family_falls_back_to_sans() {
        let family = resolve_family("Papyrus");
        assert_eq!(family, KnownFamily::Helvetica);
        assert_eq!(family.generic(), GenericFamily::SansSerif);
    }

    #[test]
    fn test_serif_bucket() {
        for name in ["Charter", "Georgia", "Times New Roman", "Garamond"] {
            assert_eq!(resolve_family(name).generic(), GenericFamily::Serif, "{name}");
        }
        for name in ["Helvetica", "Arial", "Roboto", "Lato", "Calibri"] {
            assert_eq!(resolve_family(name).generic(), GenericFamily::SansSerif, "{name}");
        }
    }

    #[test]
    fn test_size_falls_back_to_role_default() {
        assert_eq!(resolve_size(None, StyleRole::Heading), 25.0);
        assert_eq!(resolve_size(Some(-3.0), StyleRole::Body), 10.0);
        assert_eq!(resolve_size(Some(f32::NAN), StyleRole::Subheading), 11.0);
        assert_eq!(resolve_size(Some(14.0), StyleRole::Body), 14.0);
    }

    #[test]
    fn test_half_points() {
        let style = FontStyle::new("Arial", 10.5, "#000", FontWeight::Bold);
        let font = resolve_font(&style, StyleRole::Body);
        assert_eq!(font.half_points(), 21);
        assert!(font.bold);
    }

    #[test]
    fn test_line_height_fallback() {
        assert_eq!(resolve_line_height(Some(1.5)), 1.5);
        assert_eq!(resolve_line_height(Some(0.0)), DEFAULT_LINE_HEIGHT);
        assert_eq!(resolve_line_height(None), DEFAULT_LINE_HEIGHT);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let style = FontStyle {
            family: "Garamond".into(),
            size: Some(11.0),
            color: "notacolor".into(),
            weight: FontWeight::Normal,
        };
        let a = resolve_font(&style, StyleRole::Subheading);
        let b = resolve_font(&style, StyleRole::Subheading);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
        assert_eq!(a.color, Rgb::BLACK);
    }

    #[test]
    fn test_entry_element_fonts() {
        let mut styling = crate::models::presets::default_styling();
        styling.font = FontStyle::new("Georgia", 9.0, "#222", FontWeight::Bold);
        styling.subheading = FontStyle::new("Arial", 13.0, "#444", FontWeight::Bold);
        let styles = ResolvedStyles::resolve(&styling);

        let detail = styles.entry_detail();
        assert_eq!((detail.size_pt, detail.bold), (13.0, false));
        assert_eq!(detail.family, KnownFamily::Arial);
        let date = styles.entry_date();
        assert_eq!((date.size_pt, date.bold), (9.0, false));
        assert_eq!(styles.entry_link().color, LINK_COLOR);
        assert!(styles.skill_category().bold);
        assert!((styles.contact().size_pt - 8.1).abs() < 1e-4);
    }

    #[test]
    fn test_pdf_font_selection() {
        let serif_bold = resolve_font(
            &FontStyle::new("Georgia", 12.0, "#000", FontWeight::Bold),
            StyleRole::SectionTitle,
        );
        assert_eq!(serif_bold.pdf_font(), PdfFont::TimesBold);
        let sans = serif_bold.with_bold(false);
        assert_eq!(sans.pdf_font(), PdfFont::TimesRoman);
    }
}
