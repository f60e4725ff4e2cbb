//! PDF page placement: turns a `RenderInput` into positioned runs, rules and links.
//!
//! Pure computation over the outline, the resolved styles and the font-metric tables.
//! Nothing here touches lopdf, so pagination is unit-testable on its own.
//!
//! Coordinates are top-down points (see `LayoutCursor`). Each emitted line occupies a
//! box of height `size × 1.15 × lineHeight` starting at the cursor; its baseline sits at
//! `BASELINE_RATIO × size` below the top of the box.

use serde::Serialize;

use crate::layout::cursor::{LayoutCursor, PageGeometry};
use crate::layout::font_metrics::{FontMetricTable, PdfFont};
use crate::layout::sections::{
    EntryHeading, OutlineEntry, SectionBody, SkillLine, DATE_SEPARATOR, DETAIL_SEPARATOR,
    SUMMARY_TITLE,
};
use crate::layout::style::{ResolvedFont, ResolvedStyles, Rgb};
use crate::render::RenderInput;

pub const SECTION_SPACING: f32 = 16.0;
pub const HEADING_SPACING: f32 = 4.0;
pub const SUBHEADING_SPACING: f32 = 2.0;
pub const LIST_ITEM_SPACING: f32 = 2.0;
pub const LIST_INDENT: f32 = 20.0;
pub const LINE_FACTOR: f32 = 1.15;

const BASELINE_RATIO: f32 = 0.8;
const BULLET: &str = "\u{2022}";
/// The bullet plus its trailing gap; continuation lines start after this width.
const BULLET_PREFIX: &str = "\u{2022}  ";
/// Minimum gap between the left and right halves of a two-column line.
const COLUMN_GAP: f32 = 10.0;
const SECTION_RULE_WIDTH: f32 = 0.75;
const HEADER_RULE_WIDTH: f32 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunKind {
    Name,
    Contact,
    SectionTitle,
    EntryTitle,
    EntryDetail,
    Date,
    Link,
    Bullet,
    SkillCategory,
    Body,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub kind: RunKind,
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub font: PdfFont,
    pub size_pt: f32,
    pub color: Rgb,
}

/// A horizontal stroke.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
    pub width: f32,
    pub color: Rgb,
}

/// Clickable area over a link run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkArea {
    pub href: String,
    pub x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageLayout {
    pub texts: Vec<TextRun>,
    pub rules: Vec<Rule>,
    pub links: Vec<LinkArea>,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Lays the resume out on Letter pages. Always returns at least one page.
pub fn layout_resume(input: &RenderInput) -> Vec<PageLayout> {
    let mut layouter = PageLayouter::new(&input.styles, PageGeometry::LETTER);
    layouter.header(&input.outline.header.name, input.outline.header.contact_line());

    if let Some(summary) = &input.outline.summary {
        layouter.section_title(SUMMARY_TITLE);
        layouter.paragraph(summary, RunKind::Body, &input.styles.body);
        layouter.cursor.advance(SECTION_SPACING);
    }

    for section in &input.outline.sections {
        layouter.section_title(&section.title);
        match &section.body {
            SectionBody::Entries(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        layouter.cursor.advance(HEADING_SPACING * 2.0);
                    }
                    layouter.entry(entry);
                }
            }
            SectionBody::Skills(lines) => {
                for line in lines {
                    layouter.skill_line(line);
                }
            }
            SectionBody::Bullets(lines) => {
                for line in lines {
                    layouter.bullet(line);
                }
            }
        }
        layouter.cursor.advance(SECTION_SPACING);
    }

    layouter.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Layouter
// ────────────────────────────────────────────────────────────────────────────

struct PageLayouter<'a> {
    styles: &'a ResolvedStyles,
    cursor: LayoutCursor,
    pages: Vec<PageLayout>,
}

impl<'a> PageLayouter<'a> {
    fn new(styles: &'a ResolvedStyles, geometry: PageGeometry) -> Self {
        Self {
            styles,
            cursor: LayoutCursor::new(geometry),
            pages: Vec::new(),
        }
    }

    fn finish(mut self) -> Vec<PageLayout> {
        if self.pages.is_empty() {
            self.pages.push(PageLayout::default());
        }
        self.pages
    }

    fn geometry(&self) -> PageGeometry {
        *self.cursor.geometry()
    }

    fn page_mut(&mut self) -> &mut PageLayout {
        let index = self.cursor.page();
        while self.pages.len() <= index {
            self.pages.push(PageLayout::default());
        }
        &mut self.pages[index]
    }

    fn line_advance(&self, font: &ResolvedFont) -> f32 {
        font.size_pt * LINE_FACTOR * self.styles.line_height
    }

    fn metrics(font: &ResolvedFont) -> &'static FontMetricTable {
        font.pdf_font().metrics()
    }

    fn measure(text: &str, font: &ResolvedFont) -> f32 {
        Self::metrics(font).measure(text, font.size_pt)
    }

    /// Places one run on the current line. The caller advances the cursor.
    fn put(&mut self, kind: RunKind, text: &str, x: f32, font: &ResolvedFont) {
        let baseline = self.cursor.y() + font.size_pt * BASELINE_RATIO;
        let run = TextRun {
            kind,
            text: text.to_string(),
            x,
            baseline,
            font: font.pdf_font(),
            size_pt: font.size_pt,
            color: font.color,
        };
        self.page_mut().texts.push(run);
    }

    fn rule(&mut self, width: f32, color: Rgb) {
        let g = self.geometry();
        let rule = Rule {
            x1: g.left(),
            x2: g.right(),
            y: self.cursor.y(),
            width,
            color,
        };
        self.page_mut().rules.push(rule);
    }

    /// Wraps `text` into `max_width` and emits each line at `x`, breaking pages per line.
    fn wrapped_lines(&mut self, text: &str, kind: RunKind, font: &ResolvedFont, x: f32, max_width: f32) {
        let advance = self.line_advance(font);
        for line in Self::metrics(font).wrap(text, font.size_pt, max_width) {
            self.cursor.ensure_space(advance);
            self.put(kind, &line, x, font);
            self.cursor.advance(advance);
        }
    }

    fn paragraph(&mut self, text: &str, kind: RunKind, font: &ResolvedFont) {
        let g = self.geometry();
        self.wrapped_lines(text, kind, font, g.left(), g.content_width());
    }

    fn centered_lines(&mut self, text: &str, kind: RunKind, font: &ResolvedFont) {
        let g = self.geometry();
        let advance = self.line_advance(font);
        for line in Self::metrics(font).wrap(text, font.size_pt, g.content_width()) {
            self.cursor.ensure_space(advance);
            let x = g.center_x() - Self::measure(&line, font) / 2.0;
            self.put(kind, &line, x, font);
            self.cursor.advance(advance);
        }
    }

    // ── Blocks ──────────────────────────────────────────────────────────────

    fn header(&mut self, name: &str, contact_line: Option<String>) {
        let styles = self.styles;
        self.centered_lines(name, RunKind::Name, &styles.heading);
        self.cursor.advance(HEADING_SPACING);

        if let Some(contact) = contact_line {
            let font = styles.contact();
            self.centered_lines(&contact, RunKind::Contact, &font);
            self.cursor.advance(HEADING_SPACING);
            self.rule(HEADER_RULE_WIDTH, styles.body.color);
        }
        self.cursor.advance(SECTION_SPACING);
    }

    /// Title, rule, and enough reserve that at least one body line follows on the same page.
    fn section_title(&mut self, title: &str) {
        let font = self.styles.section_title;
        let title_advance = self.line_advance(&font);
        let reserve = title_advance + HEADING_SPACING * 3.0 + self.line_advance(&self.styles.body);
        self.cursor.ensure_space(reserve);

        let left = self.geometry().left();
        self.put(RunKind::SectionTitle, title, left, &font);
        self.cursor.advance(title_advance);
        self.rule(SECTION_RULE_WIDTH, font.color);
        self.cursor.advance(HEADING_SPACING * 2.0);
    }

    fn entry(&mut self, entry: &OutlineEntry) {
        let styles = self.styles;
        let mut reserve = self.line_advance(&styles.entry_title()) + SUBHEADING_SPACING;
        if !entry.bullets.is_empty() {
            reserve += self.line_advance(&styles.body);
        }
        self.cursor.ensure_space(reserve);

        self.entry_heading(&entry.heading, entry.link.as_ref().map(|l| (l.label.as_str(), l.href.as_str())));
        self.cursor.advance(SUBHEADING_SPACING);

        for bullet in &entry.bullets {
            self.bullet(bullet);
        }
    }

    /// Two-column heading line: title and detail on the left, dates or link on the right.
    fn entry_heading(&mut self, heading: &EntryHeading, link: Option<(&str, &str)>) {
        let styles = self.styles;
        let g = self.geometry();
        let title_font = styles.entry_title();
        let detail_font = styles.entry_detail();

        // Right half: a date range, or a link label for projects.
        let right = match (&heading.dates, link) {
            (_, Some((label, href))) => Some((
                label.to_string(),
                Some(href.to_string()),
                styles.entry_link(),
                RunKind::Link,
            )),
            (Some(dates), None) => Some((dates.join(DATE_SEPARATOR), None, styles.entry_date(), RunKind::Date)),
            (None, None) => None,
        };

        let detail_text = heading
            .detail
            .as_ref()
            .map(|d| format!("{DETAIL_SEPARATOR}{d}"));
        let title_w = Self::measure(&heading.title, &title_font);
        let detail_w = detail_text
            .as_ref()
            .map(|d| Self::measure(d, &detail_font))
            .unwrap_or(0.0);
        let right_w = right
            .as_ref()
            .map(|(text, _, font, _)| Self::measure(text, font))
            .unwrap_or(0.0);

        let mut first_line_top = self.cursor.y();
        let mut first_line_page = self.cursor.page();
        let mut first_line_width = title_w + detail_w;

        if title_w + detail_w <= g.content_width() {
            let advance = self.line_advance(&title_font);
            self.cursor.ensure_space(advance);
            first_line_top = self.cursor.y();
            first_line_page = self.cursor.page();
            self.put(RunKind::EntryTitle, &heading.title, g.left(), &title_font);
            if let Some(detail) = &detail_text {
                self.put(RunKind::EntryDetail, detail, g.left() + title_w, &detail_font);
            }
            self.cursor.advance(advance);
        } else {
            // Too wide for one line: title lines, then detail lines.
            first_line_width = g.content_width();
            self.wrapped_lines(&heading.title, RunKind::EntryTitle, &title_font, g.left(), g.content_width());
            if let Some(detail) = &heading.detail {
                self.wrapped_lines(detail, RunKind::EntryDetail, &detail_font, g.left(), g.content_width());
            }
        }

        let Some((text, href, font, kind)) = right else {
            return;
        };
        if right_w > g.content_width() {
            self.overlong_right_column(&text, href, &font, kind);
            return;
        }
        let x = g.right() - right_w;
        let fits_beside = first_line_width + COLUMN_GAP + right_w <= g.content_width()
            && self.cursor.page() == first_line_page;
        let top = if fits_beside {
            // Shares the title's baseline; the cursor has already moved past this line.
            let run = TextRun {
                kind,
                text,
                x,
                baseline: first_line_top + title_font.size_pt * BASELINE_RATIO,
                font: font.pdf_font(),
                size_pt: font.size_pt,
                color: font.color,
            };
            self.page_mut().texts.push(run);
            first_line_top
        } else {
            let advance = self.line_advance(&font);
            self.cursor.ensure_space(advance);
            let top = self.cursor.y();
            self.put(kind, &text, x, &font);
            self.cursor.advance(advance);
            top
        };

        if let Some(href) = href {
            let area = LinkArea {
                href,
                x,
                top,
                width: right_w,
                height: self.line_advance(&font),
            };
            self.page_mut().links.push(area);
        }
    }

    /// A date or link too wide for the page: wrapped from the left margin on its own
    /// lines, with one link area per line.
    fn overlong_right_column(&mut self, text: &str, href: Option<String>, font: &ResolvedFont, kind: RunKind) {
        let g = self.geometry();
        let advance = self.line_advance(font);
        for line in Self::metrics(font).wrap(text, font.size_pt, g.content_width()) {
            self.cursor.ensure_space(advance);
            let top = self.cursor.y();
            self.put(kind, &line, g.left(), font);
            if let Some(href) = &href {
                let area = LinkArea {
                    href: href.clone(),
                    x: g.left(),
                    top,
                    width: Self::measure(&line, font),
                    height: advance,
                };
                self.page_mut().links.push(area);
            }
            self.cursor.advance(advance);
        }
    }

    /// One bulleted item; continuation lines align under the text, not the bullet.
    fn bullet(&mut self, text: &str) {
        let font = self.styles.body;
        let g = self.geometry();
        let advance = self.line_advance(&font);
        let bullet_x = g.left() + LIST_INDENT;
        let text_x = bullet_x + Self::measure(BULLET_PREFIX, &font);
        let max_width = g.right() - text_x;

        let lines = Self::metrics(&font).wrap(text, font.size_pt, max_width);
        for (i, line) in lines.iter().enumerate() {
            self.cursor.ensure_space(advance);
            if i == 0 {
                self.put(RunKind::Bullet, BULLET, bullet_x, &font);
            }
            self.put(RunKind::Body, line, text_x, &font);
            self.cursor.advance(advance);
        }
        self.cursor.advance(LIST_ITEM_SPACING);
    }

    /// "Category: a, b, c" with the items hanging after the bold category.
    fn skill_line(&mut self, line: &SkillLine) {
        let font = self.styles.body;
        let g = self.geometry();
        let Some(category) = &line.category else {
            self.paragraph(&line.items, RunKind::Body, &font);
            return;
        };

        let label = format!("{category}: ");
        let label_font = self.styles.skill_category();
        let label_w = Self::measure(&label, &label_font).min(g.content_width() / 2.0);
        let advance = self.line_advance(&font);
        let lines = Self::metrics(&font).wrap(&line.items, font.size_pt, g.content_width() - label_w);

        for (i, text) in lines.iter().enumerate() {
            self.cursor.ensure_space(advance);
            if i == 0 {
                self.put(RunKind::SkillCategory, &label, g.left(), &label_font);
            }
            self.put(RunKind::Body, text, g.left() + label_w, &font);
            self.cursor.advance(advance);
        }
    }
}
