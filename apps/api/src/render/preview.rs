//! Live Preview Renderer
//!
//! Builds a declarative tree the browser client can draw directly, and an HTML
//! fragment with inline styles for clients that only want markup. The tree mirrors
//! the document renderers: same outline, same resolved styles, summary first.

use serde::Serialize;

use crate::layout::sections::{
    OutlineEntry, OutlineSection, ResumeOutline, SectionBody, SkillLine, DATE_SEPARATOR,
    DETAIL_SEPARATOR, SUMMARY_TITLE,
};
use crate::layout::style::{ResolvedFont, ResolvedStyles};
use crate::render::RenderInput;

// ────────────────────────────────────────────────────────────────────────────
// Tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// CSS font-family stack, e.g. `'Times New Roman', serif`.
    pub font_family: String,
    pub font_size_pt: f32,
    /// `#rrggbb`.
    pub color: String,
    pub font_weight: &'static str,
}

impl TextStyle {
    pub fn from_font(font: &ResolvedFont) -> Self {
        let family = font.family.name();
        let family = if family.contains(' ') {
            format!("'{family}'")
        } else {
            family.to_string()
        };
        Self {
            font_family: format!("{family}, {}", font.generic.css_keyword()),
            font_size_pt: font.size_pt,
            color: font.color.to_css(),
            font_weight: if font.bold { "bold" } else { "normal" },
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "font-family:{};font-size:{}pt;color:{};font-weight:{}",
            self.font_family, self.font_size_pt, self.color, self.font_weight
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextNode {
    pub text: String,
    pub style: TextStyle,
}

impl TextNode {
    fn new(text: impl Into<String>, font: &ResolvedFont) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::from_font(font),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootStyle {
    pub text: TextStyle,
    pub line_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewHeader {
    pub name: TextNode,
    pub contact: Option<TextNode>,
}

/// Right-hand side of an entry line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EntryAside {
    Dates { node: TextNode },
    Link { node: TextNode, href: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PreviewBlock {
    Paragraph {
        node: TextNode,
    },
    Entry {
        title: TextNode,
        detail: Option<TextNode>,
        aside: Option<EntryAside>,
        bullets: Vec<TextNode>,
    },
    Skill {
        category: Option<TextNode>,
        items: TextNode,
    },
    Bullets {
        items: Vec<TextNode>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSection {
    pub title: TextNode,
    /// Color of the rule under the title; matches the title color.
    pub rule_color: String,
    pub blocks: Vec<PreviewBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewDocument {
    pub root: RootStyle,
    pub header: PreviewHeader,
    pub sections: Vec<PreviewSection>,
}

impl PreviewDocument {
    pub fn build(input: &RenderInput) -> Self {
        let styles = &input.styles;
        let outline = &input.outline;

        let mut sections = Vec::with_capacity(outline.sections.len() + 1);
        if let Some(summary) = &outline.summary {
            sections.push(PreviewSection {
                title: TextNode::new(SUMMARY_TITLE, &styles.section_title),
                rule_color: styles.section_title.color.to_css(),
                blocks: vec![PreviewBlock::Paragraph {
                    node: TextNode::new(summary.as_str(), &styles.body),
                }],
            });
        }
        sections.extend(outline.sections.iter().map(|s| section(s, styles)));

        Self {
            root: RootStyle {
                text: TextStyle::from_font(&styles.body),
                line_height: styles.line_height,
            },
            header: header(outline, styles),
            sections,
        }
    }

    /// Self-contained HTML fragment with inline styles.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str(&format!(
            r#"<div class="resume" style="{};line-height:{}">"#,
            escape_html(&self.root.text.to_css()),
            self.root.line_height
        ));

        html.push_str(r#"<header style="text-align:center">"#);
        push_node(&mut html, "h1", &self.header.name, "");
        if let Some(contact) = &self.header.contact {
            push_node(&mut html, "p", contact, "");
        }
        html.push_str("</header>");

        for section in &self.sections {
            html.push_str("<section>");
            push_node(
                &mut html,
                "h2",
                &section.title,
                &format!(";border-bottom:2px solid {}", section.rule_color),
            );
            for block in &section.blocks {
                push_block(&mut html, block);
            }
            html.push_str("</section>");
        }

        html.push_str("</div>");
        html
    }
}

fn header(outline: &ResumeOutline, styles: &ResolvedStyles) -> PreviewHeader {
    PreviewHeader {
        name: TextNode::new(outline.header.name.as_str(), &styles.heading),
        contact: outline
            .header
            .contact_line()
            .map(|line| TextNode::new(line, &styles.contact())),
    }
}

fn section(section: &OutlineSection, styles: &ResolvedStyles) -> PreviewSection {
    let blocks = match &section.body {
        SectionBody::Entries(entries) => entries.iter().map(|e| entry(e, styles)).collect(),
        SectionBody::Skills(lines) => lines.iter().map(|l| skill(l, styles)).collect(),
        SectionBody::Bullets(items) => vec![PreviewBlock::Bullets {
            items: items.iter().map(|i| TextNode::new(i.as_str(), &styles.body)).collect(),
        }],
    };
    PreviewSection {
        title: TextNode::new(section.title.as_str(), &styles.section_title),
        rule_color: styles.section_title.color.to_css(),
        blocks,
    }
}

fn entry(entry: &OutlineEntry, styles: &ResolvedStyles) -> PreviewBlock {
    let heading = &entry.heading;
    let aside = if let Some(dates) = &heading.dates {
        Some(EntryAside::Dates {
            node: TextNode::new(dates.join(DATE_SEPARATOR), &styles.entry_date()),
        })
    } else {
        entry.link.as_ref().map(|link| EntryAside::Link {
            node: TextNode::new(link.label.as_str(), &styles.entry_link()),
            href: link.href.clone(),
        })
    };
    PreviewBlock::Entry {
        title: TextNode::new(heading.title.as_str(), &styles.entry_title()),
        detail: heading
            .detail
            .as_ref()
            .map(|d| TextNode::new(format!("{DETAIL_SEPARATOR}{d}"), &styles.entry_detail())),
        aside,
        bullets: entry
            .bullets
            .iter()
            .map(|b| TextNode::new(b.as_str(), &styles.body))
            .collect(),
    }
}

fn skill(line: &SkillLine, styles: &ResolvedStyles) -> PreviewBlock {
    PreviewBlock::Skill {
        category: line
            .category
            .as_ref()
            .map(|c| TextNode::new(format!("{c}: "), &styles.skill_category())),
        items: TextNode::new(line.items.as_str(), &styles.body),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HTML
// ────────────────────────────────────────────────────────────────────────────

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn push_node(html: &mut String, tag: &str, node: &TextNode, extra_css: &str) {
    html.push_str(&format!(
        r#"<{tag} style="{}{}">{}</{tag}>"#,
        escape_html(&node.style.to_css()),
        escape_html(extra_css),
        escape_html(&node.text)
    ));
}

fn push_list(html: &mut String, items: &[TextNode]) {
    if items.is_empty() {
        return;
    }
    html.push_str("<ul>");
    for item in items {
        push_node(html, "li", item, "");
    }
    html.push_str("</ul>");
}

fn push_block(html: &mut String, block: &PreviewBlock) {
    match block {
        PreviewBlock::Paragraph { node } => {
            push_node(html, "p", node, ";white-space:pre-wrap");
        }
        PreviewBlock::Entry {
            title,
            detail,
            aside,
            bullets,
        } => {
            html.push_str(r#"<div class="entry"><div style="display:flex;justify-content:space-between;align-items:baseline">"#);
            html.push_str("<h3>");
            push_node(html, "span", title, "");
            if let Some(detail) = detail {
                push_node(html, "span", detail, "");
            }
            html.push_str("</h3>");
            match aside {
                Some(EntryAside::Dates { node }) => push_node(html, "span", node, ";white-space:nowrap"),
                Some(EntryAside::Link { node, href }) => {
                    html.push_str(&format!(
                        r#"<a href="{}" style="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                        escape_html(href),
                        escape_html(&node.style.to_css()),
                        escape_html(&node.text)
                    ));
                }
                None => {}
            }
            html.push_str("</div>");
            push_list(html, bullets);
            html.push_str("</div>");
        }
        PreviewBlock::Skill { category, items } => {
            html.push_str("<p>");
            if let Some(category) = category {
                push_node(html, "span", category, "");
            }
            push_node(html, "span", items, "");
            html.push_str("</p>");
        }
        PreviewBlock::Bullets { items } => push_list(html, items),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::minimal_resume;
    use crate::models::presets::{template_resume, theme_presets};
    use crate::models::resume::{CustomSection, Project};

    fn preview(data: &crate::models::resume::ResumeData) -> PreviewDocument {
        PreviewDocument::build(&RenderInput::from_snapshot(data))
    }

    #[test]
    fn test_summary_is_first_section() {
        let doc = preview(&template_resume());
        assert_eq!(doc.sections[0].title.text, "Summary");
        assert!(matches!(doc.sections[0].blocks[0], PreviewBlock::Paragraph { .. }));
        let titles: Vec<_> = doc.sections.iter().map(|s| s.title.text.as_str()).collect();
        assert_eq!(titles, ["Summary", "Experience", "Education", "Projects", "Skills"]);
    }

    #[test]
    fn test_styles_are_resolved_per_role() {
        let mut data = minimal_resume();
        data.styling = theme_presets()[2].styling.clone();
        let doc = preview(&data);
        assert_eq!(doc.header.name.style.font_family, "'Times New Roman', serif");
        assert_eq!(doc.header.name.style.font_size_pt, 28.0);
        assert_eq!(doc.header.name.style.font_weight, "normal");
        assert_eq!(doc.root.line_height, 1.2);
    }

    #[test]
    fn test_html_escapes_user_text() {
        let mut data = minimal_resume();
        data.personal_details.name = "<script>alert('x')</script>".into();
        let html = preview(&data).to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn test_project_link_is_absolute() {
        let mut data = minimal_resume();
        data.projects.push(Project {
            name: "Site".into(),
            url: "jane.dev".into(),
            ..Default::default()
        });
        let doc = preview(&data);
        match &doc.sections[0].blocks[0] {
            PreviewBlock::Entry {
                aside: Some(EntryAside::Link { href, node }),
                ..
            } => {
                assert_eq!(href, "https://jane.dev");
                assert_eq!(node.text, "jane.dev");
            }
            other => panic!("unexpected block {other:?}"),
        }
        assert!(doc.to_html().contains(r#"href="https://jane.dev""#));
    }

    #[test]
    fn test_titled_custom_section_without_content_has_no_list() {
        let mut data = minimal_resume();
        data.custom_sections.push(CustomSection {
            title: "Volunteering".into(),
            ..Default::default()
        });
        let doc = preview(&data);
        assert_eq!(doc.sections.len(), 1);
        assert!(matches!(
            doc.sections[0].blocks.as_slice(),
            [PreviewBlock::Bullets { items }] if items.is_empty()
        ));
        assert!(!doc.to_html().contains("<ul>"));
    }

    #[test]
    fn test_tree_serializes_with_tagged_blocks() {
        let json = serde_json::to_value(preview(&template_resume())).unwrap();
        assert_eq!(json["sections"][1]["blocks"][0]["type"], "entry");
        assert_eq!(json["header"]["name"]["style"]["fontWeight"], "bold");
        assert_eq!(json["root"]["text"]["color"], "#333333");
    }
}
