//! document.xml writer: one paragraph per outline element, styled by reference.

use crate::layout::sections::{
    EntryHeading, OutlineEntry, OutlineSection, ResumeOutline, SectionBody, SkillLine,
    DATE_SEPARATOR, DETAIL_SEPARATOR, SUMMARY_TITLE,
};
use crate::layout::style::ResolvedStyles;
use crate::render::docx::numbering::bullet_numbering_properties;
use crate::render::docx::package::hyperlink_rel_id;
use crate::render::docx::styles::{
    run_properties, styled_run_properties, STYLE_BODY, STYLE_HEADING, STYLE_HYPERLINK, STYLE_SECTION_TITLE,
    STYLE_SUBHEADING,
};
use crate::render::docx::{
    escape_xml, namespaces, MARGIN_TWIPS, PAGE_HEIGHT_TWIPS, PAGE_WIDTH_TWIPS, RIGHT_TAB_TWIPS,
};

/// Blank paragraph spacing between entries, in twips.
const SPACER_AFTER: u32 = 120;

/// document.xml plus the external link targets it references, in rel-id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBody {
    pub xml: String,
    pub hyperlinks: Vec<String>,
}

pub struct DocumentBuilder<'a> {
    styles: &'a ResolvedStyles,
    body: String,
    hyperlinks: Vec<String>,
}

/// One `w:r`. `props` is an already-built `w:rPr` or empty.
fn run(text: &str, props: &str) -> String {
    format!(
        r#"<w:r>{props}<w:t xml:space="preserve">{}</w:t></w:r>"#,
        escape_xml(text)
    )
}

fn tab_run() -> String {
    "<w:r><w:tab/></w:r>".to_string()
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(styles: &'a ResolvedStyles) -> Self {
        Self {
            styles,
            body: String::new(),
            hyperlinks: Vec::new(),
        }
    }

    pub fn build(mut self, outline: &ResumeOutline) -> DocumentBody {
        self.header(outline);
        if let Some(summary) = &outline.summary {
            self.section_title(SUMMARY_TITLE);
            self.paragraph(STYLE_BODY, "", &run(summary, ""));
        }
        for section in &outline.sections {
            self.section(section);
        }

        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<w:document xmlns:w="{}" xmlns:r="{}"><w:body>"#,
            namespaces::W,
            namespaces::R
        ));
        xml.push_str(&self.body);
        xml.push_str(&format!(
            concat!(
                r#"<w:sectPr><w:pgSz w:w="{w}" w:h="{h}"/>"#,
                r#"<w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="720" w:footer="720" w:gutter="0"/>"#,
                "</w:sectPr>"
            ),
            w = PAGE_WIDTH_TWIPS,
            h = PAGE_HEIGHT_TWIPS,
            m = MARGIN_TWIPS,
        ));
        xml.push_str("</w:body></w:document>");

        DocumentBody {
            xml,
            hyperlinks: self.hyperlinks,
        }
    }

    fn paragraph(&mut self, style: &str, extra_props: &str, runs: &str) {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{style}"/>{extra_props}</w:pPr>{runs}</w:p>"#
        ));
    }

    fn spacer(&mut self) {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:spacing w:after="{SPACER_AFTER}"/></w:pPr></w:p>"#
        ));
    }

    fn header(&mut self, outline: &ResumeOutline) {
        self.paragraph(STYLE_HEADING, "", &run(&outline.header.name, ""));
        if let Some(contact) = outline.header.contact_line() {
            let font = self.styles.contact();
            self.paragraph(
                STYLE_BODY,
                r#"<w:jc w:val="center"/><w:spacing w:after="120"/>"#,
                &run(&contact, &run_properties(&font)),
            );
        }
    }

    fn section_title(&mut self, title: &str) {
        self.paragraph(STYLE_SECTION_TITLE, "", &run(title, ""));
    }

    fn section(&mut self, section: &OutlineSection) {
        self.section_title(&section.title);
        match &section.body {
            SectionBody::Entries(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        self.spacer();
                    }
                    self.entry(entry);
                }
            }
            SectionBody::Skills(lines) => {
                for line in lines {
                    self.skill_line(line);
                }
            }
            SectionBody::Bullets(items) => {
                for item in items {
                    self.bullet(item);
                }
            }
        }
    }

    fn entry(&mut self, entry: &OutlineEntry) {
        self.entry_heading(&entry.heading, entry);
        for bullet in &entry.bullets {
            self.bullet(bullet);
        }
    }

    /// Bold title, unbolded detail, then the date or link flush right on a tab stop.
    fn entry_heading(&mut self, heading: &EntryHeading, entry: &OutlineEntry) {
        let styles = self.styles;
        let mut runs = run(&heading.title, "");
        if let Some(detail) = &heading.detail {
            let plain = run_properties(&styles.entry_detail());
            runs.push_str(&run(&format!("{DETAIL_SEPARATOR}{detail}"), &plain));
        }

        if let Some(dates) = &heading.dates {
            runs.push_str(&tab_run());
            runs.push_str(&run(&dates.join(DATE_SEPARATOR), &run_properties(&styles.entry_date())));
        } else if let Some(link) = &entry.link {
            let rel = hyperlink_rel_id(self.hyperlinks.len());
            self.hyperlinks.push(link.href.clone());
            runs.push_str(&tab_run());
            runs.push_str(&format!(
                r#"<w:hyperlink r:id="{rel}">{}</w:hyperlink>"#,
                run(&link.label, &styled_run_properties(STYLE_HYPERLINK, &styles.entry_link()))
            ));
        }

        self.paragraph(
            STYLE_SUBHEADING,
            &format!(r#"<w:tabs><w:tab w:val="right" w:pos="{RIGHT_TAB_TWIPS}"/></w:tabs>"#),
            &runs,
        );
    }

    fn bullet(&mut self, text: &str) {
        self.paragraph(STYLE_BODY, &bullet_numbering_properties(), &run(text, ""));
    }

    fn skill_line(&mut self, line: &SkillLine) {
        let mut runs = String::new();
        if let Some(category) = &line.category {
            runs.push_str(&run(
                &format!("{category}: "),
                &run_properties(&self.styles.skill_category()),
            ));
        }
        runs.push_str(&run(&line.items, ""));
        self.paragraph(STYLE_BODY, "", &runs);
    }
}
