//! LaTeX Renderer
//!
//! Emits a complete, compilable pdfLaTeX source. Every user string goes through
//! `escape_latex`; URLs inside `\href{}` use `escape_url` instead. Each section
//! heading is a single `\section{...}` line.

use std::fmt::Write as _;

use crate::layout::sections::{
    Contact, EntryHeading, OutlineEntry, OutlineSection, ResumeOutline, SectionBody, SkillLine,
    DETAIL_SEPARATOR, SUMMARY_TITLE,
};
use crate::layout::style::{ResolvedFont, ResolvedStyles, Rgb, LINK_COLOR};
use crate::render::{ExportFormat, RenderError, RenderInput, RenderedDocument, ResumeRenderer};

/// Date range separator; pdfLaTeX turns `--` into an en dash.
pub const LATEX_DATE_SEPARATOR: &str = " -- ";

/// Class options `article` accepts for the base size.
const CLASS_SIZES: [u32; 3] = [10, 11, 12];

/// Escapes the ten characters with special meaning in LaTeX text mode.
///
/// Single pass: the braces of `\textbackslash{}` are never escaped again.
pub fn escape_latex(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    for c in s.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Inverse of `escape_latex`.
pub fn unescape_latex(s: &str) -> String {
    const WORDS: [(&str, char); 3] = [
        (r"\textbackslash{}", '\\'),
        (r"\textasciitilde{}", '~'),
        (r"\textasciicircum{}", '^'),
    ];
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    'outer: while let Some(c) = rest.chars().next() {
        if c == '\\' {
            for (word, plain) in WORDS {
                if let Some(tail) = rest.strip_prefix(word) {
                    out.push(plain);
                    rest = tail;
                    continue 'outer;
                }
            }
            let mut chars = rest[1..].chars();
            if let Some(next @ ('&' | '%' | '$' | '#' | '_' | '{' | '}')) = chars.next() {
                out.push(next);
                rest = chars.as_str();
                continue;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Escaping for the URL argument of `\href`.
pub fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '%' => out.push_str(r"\%"),
            '#' => out.push_str(r"\#"),
            '\\' => out.push_str("%5C"),
            '{' => out.push_str("%7B"),
            '}' => out.push_str("%7D"),
            c if c.is_whitespace() => out.push_str("%20"),
            c => out.push(c),
        }
    }
    out
}

/// Headings must stay on one source line.
fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

/// Nearest supported class size.
pub fn class_size(body_pt: f32) -> u32 {
    CLASS_SIZES
        .into_iter()
        .min_by(|a, b| {
            let da = (*a as f32 - body_pt).abs();
            let db = (*b as f32 - body_pt).abs();
            da.total_cmp(&db)
        })
        .unwrap_or(11)
}

fn rgb_triplet(color: Rgb) -> String {
    format!("{}, {}, {}", color.r, color.g, color.b)
}

/// `{\fontsize{s}{s}\selectfont\color{c}...}` with `\textbf` when the role is bold.
fn styled(font: &ResolvedFont, color_name: &str, text: &str) -> String {
    let size = trim_float(font.size_pt);
    let body = if font.bold {
        format!(r"\textbf{{{text}}}")
    } else {
        text.to_string()
    };
    format!(r"{{\fontsize{{{size}pt}}{{{size}pt}}\selectfont\color{{{color_name}}}{body}}}")
}

fn trim_float(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer
// ────────────────────────────────────────────────────────────────────────────

pub struct LatexRenderer;

impl LatexRenderer {
    pub fn render_source(&self, input: &RenderInput) -> String {
        let mut doc = String::new();
        preamble(&mut doc, &input.styles);
        doc.push_str("\\begin{document}\n\n");
        header(&mut doc, &input.outline, &input.styles);

        if let Some(summary) = &input.outline.summary {
            section_heading(&mut doc, SUMMARY_TITLE);
            let _ = writeln!(
                doc,
                "\\begin{{onecolentry}}\n    {}\n\\end{{onecolentry}}\n",
                escape_latex(summary)
            );
        }
        for section in &input.outline.sections {
            self.section(&mut doc, section, &input.styles);
        }

        doc.push_str("\\end{document}\n");
        doc
    }

    fn section(&self, doc: &mut String, section: &OutlineSection, styles: &ResolvedStyles) {
        section_heading(doc, &section.title);
        match &section.body {
            SectionBody::Entries(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        doc.push_str("\\vspace{0.2 cm}\n\n");
                    }
                    entry_block(doc, entry, styles);
                }
            }
            SectionBody::Skills(lines) => {
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        doc.push_str("\\vspace{0.2 cm}\n\n");
                    }
                    skill_block(doc, line);
                }
            }
            SectionBody::Bullets(items) => {
                if !items.is_empty() {
                    doc.push_str("\\begin{onecolentry}\n");
                    highlights(doc, items);
                    doc.push_str("\\end{onecolentry}\n\n");
                }
            }
        }
    }
}

impl ResumeRenderer for LatexRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Latex
    }

    fn render(&self, input: &RenderInput) -> Result<RenderedDocument, RenderError> {
        Ok(RenderedDocument {
            format: ExportFormat::Latex,
            bytes: self.render_source(input).into_bytes(),
            pages: None,
        })
    }
}

fn preamble(doc: &mut String, styles: &ResolvedStyles) {
    let font_package = styles.body.family.latex_package();
    let section = &styles.section_title;
    let section_size = trim_float(section.size_pt);
    let section_weight = if section.bold { r"\bfseries" } else { "" };

    let _ = writeln!(
        doc,
        "\\documentclass[{}pt, letterpaper]{{article}}\n",
        class_size(styles.body.size_pt)
    );
    doc.push_str(concat!(
        "\\usepackage[ignoreheadfoot, top=2cm, bottom=2cm, left=2cm, right=2cm, footskip=1.0cm]{geometry}\n",
        "\\usepackage{titlesec}\n",
        "\\usepackage[dvipsnames]{xcolor}\n",
        "\\usepackage{enumitem}\n",
        "\\usepackage[hidelinks]{hyperref}\n",
        "\\usepackage{changepage}\n",
        "\\usepackage{paracol}\n",
        "\\usepackage{needspace}\n",
        "\\usepackage{iftex}\n",
        "\n",
        "\\ifPDFTeX\n",
        "    \\input{glyphtounicode}\n",
        "    \\pdfgentounicode=1\n",
        "    \\usepackage[T1]{fontenc}\n",
        "    \\usepackage[utf8]{inputenc}\n",
        "\\fi\n\n",
    ));

    doc.push_str(font_package.directive);
    doc.push('\n');
    if font_package.sans_default {
        doc.push_str("\\renewcommand{\\familydefault}{\\sfdefault}\n");
    }
    doc.push('\n');

    for (name, font) in [
        ("bodyColor", &styles.body),
        ("headingColor", &styles.heading),
        ("subheadingColor", &styles.subheading),
        ("sectionTitleColor", &styles.section_title),
    ] {
        let _ = writeln!(doc, "\\definecolor{{{name}}}{{RGB}}{{{}}}", rgb_triplet(font.color));
    }
    let _ = writeln!(doc, "\\definecolor{{linkColor}}{{RGB}}{{{}}}", rgb_triplet(LINK_COLOR));
    doc.push('\n');

    let _ = writeln!(doc, "\\linespread{{{}}}", trim_float(styles.line_height));
    doc.push_str(concat!(
        "\\raggedright\n",
        "\\pagestyle{empty}\n",
        "\\setcounter{secnumdepth}{0}\n",
        "\\setlength{\\parindent}{0pt}\n",
        "\\setlength{\\columnsep}{0.15cm}\n",
        "\\color{bodyColor}\n\n",
    ));
    let _ = writeln!(
        doc,
        "\\titleformat{{\\section}}{{\\needspace{{4\\baselineskip}}{section_weight}\\fontsize{{{section_size}pt}}{{{section_size}pt}}\\selectfont\\color{{sectionTitleColor}}}}{{}}{{0pt}}{{}}[\\vspace{{1pt}}\\titlerule]"
    );
    doc.push_str("\\titlespacing{\\section}{-1pt}{0.3 cm}{0.2 cm}\n\n");

    doc.push_str(concat!(
        "\\newenvironment{highlights}{\n",
        "    \\begin{itemize}[topsep=0.10 cm, parsep=0.10 cm, partopsep=0pt, itemsep=0pt, leftmargin=10pt]\n",
        "}{\n",
        "    \\end{itemize}\n",
        "}\n\n",
        "\\newenvironment{onecolentry}{\n",
        "    \\begin{adjustwidth}{0.00001 cm}{0.00001 cm}\n",
        "}{\n",
        "    \\end{adjustwidth}\n",
        "}\n\n",
        "\\newenvironment{twocolentry}[2][]{\n",
        "    \\onecolentry\n",
        "    \\def\\secondColumn{#2}\n",
        "    \\setcolumnwidth{\\fill, 4.5 cm}\n",
        "    \\begin{paracol}{2}\n",
        "}{\n",
        "    \\switchcolumn \\raggedleft \\secondColumn\n",
        "    \\end{paracol}\n",
        "    \\endonecolentry\n",
        "}\n\n",
    ));
}

fn header(doc: &mut String, outline: &ResumeOutline, styles: &ResolvedStyles) {
    doc.push_str("\\begin{center}\n");
    let _ = writeln!(
        doc,
        "    {}",
        styled(&styles.heading, "headingColor", &escape_latex(&outline.header.name))
    );
    if !outline.header.contacts.is_empty() {
        let contacts: Vec<String> = outline.header.contacts.iter().map(contact).collect();
        let _ = writeln!(
            doc,
            "\n    \\vspace{{5 pt}}\n\n    {}",
            styled(&styles.contact(), "bodyColor", &contacts.join(r" \quad|\quad "))
        );
    }
    doc.push_str("\\end{center}\n\n");
}

/// Email, phone and web profiles become links; the location stays plain text.
fn contact(contact: &Contact) -> String {
    let text = escape_latex(&contact.text);
    match &contact.href {
        Some(href) => format!(r"\href{{{}}}{{{text}}}", escape_url(href)),
        None => text,
    }
}

fn section_heading(doc: &mut String, title: &str) {
    let _ = writeln!(doc, "\\section{{{}}}", escape_latex(&single_line(title)));
}

fn right_column(entry: &OutlineEntry, styles: &ResolvedStyles) -> String {
    if let Some(dates) = &entry.heading.dates {
        let parts: Vec<String> = [&dates.start, &dates.end]
            .into_iter()
            .flatten()
            .map(|d| escape_latex(d))
            .collect();
        styled(&styles.entry_date(), "bodyColor", &parts.join(LATEX_DATE_SEPARATOR))
    } else if let Some(link) = &entry.link {
        let href = format!(r"\href{{{}}}{{{}}}", escape_url(&link.href), escape_latex(&link.label));
        styled(&styles.entry_link(), "linkColor", &href)
    } else {
        String::new()
    }
}

fn left_column(heading: &EntryHeading, styles: &ResolvedStyles) -> String {
    let mut left = styled(&styles.entry_title(), "subheadingColor", &escape_latex(&heading.title));
    if let Some(detail) = &heading.detail {
        left.push_str(&styled(
            &styles.entry_detail(),
            "subheadingColor",
            &escape_latex(&format!("{DETAIL_SEPARATOR}{detail}")),
        ));
    }
    left
}

fn entry_block(doc: &mut String, entry: &OutlineEntry, styles: &ResolvedStyles) {
    let _ = writeln!(
        doc,
        "\\begin{{twocolentry}}{{{}}}\n    {}\n\\end{{twocolentry}}\n",
        right_column(entry, styles),
        left_column(&entry.heading, styles)
    );
    if !entry.bullets.is_empty() {
        doc.push_str("\\vspace{0.10 cm}\n\\begin{onecolentry}\n");
        highlights(doc, &entry.bullets);
        doc.push_str("\\end{onecolentry}\n\n");
    }
}

fn highlights(doc: &mut String, items: &[String]) {
    doc.push_str("    \\begin{highlights}\n");
    for item in items {
        let _ = writeln!(doc, "        \\item {}", escape_latex(item));
    }
    doc.push_str("    \\end{highlights}\n");
}

fn skill_block(doc: &mut String, line: &SkillLine) {
    let category = line
        .category
        .as_deref()
        .map(|c| format!(r"\textbf{{{}:}} ", escape_latex(c)))
        .unwrap_or_default();
    let _ = writeln!(
        doc,
        "\\begin{{onecolentry}}\n    {category}{}\n\\end{{onecolentry}}\n",
        escape_latex(&line.items)
    );
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::models::fixtures::minimal_resume;
    use crate::models::presets::{template_resume, theme_presets};
    use crate::models::resume::{CustomSection, Project};

    fn source(data: &crate::models::resume::ResumeData) -> String {
        LatexRenderer.render_source(&RenderInput::from_snapshot(data))
    }

    #[test]
    fn test_escape_every_special_character() {
        assert_eq!(
            escape_latex(r"\ & % $ # _ { } ~ ^"),
            r"\textbackslash{} \& \% \$ \# \_ \{ \} \textasciitilde{} \textasciicircum{}"
        );
    }

    #[test]
    fn test_backslash_braces_not_double_escaped() {
        assert_eq!(escape_latex(r"a\b"), r"a\textbackslash{}b");
        assert!(!escape_latex(r"a\b").contains(r"\{"));
    }

    #[test]
    fn test_unescape_leaves_other_commands_alone() {
        assert_eq!(unescape_latex(r"\textbf{x} \& y\"), r"\textbf{x} & y\");
    }

    #[test]
    fn test_escape_url() {
        assert_eq!(escape_url("https://a.dev/x%20y#top"), r"https://a.dev/x\%20y\#top");
        assert_eq!(escape_url(r"https://a.dev/{a}\b"), "https://a.dev/%7Ba%7D%5Cb");
    }

    #[test]
    fn test_class_size_clamps_to_nearest() {
        assert_eq!(class_size(10.0), 10);
        assert_eq!(class_size(9.0), 10);
        assert_eq!(class_size(11.4), 11);
        assert_eq!(class_size(14.0), 12);
    }

    #[test]
    fn test_preamble_colors_and_font_package() {
        let tex = source(&template_resume());
        assert!(tex.starts_with("\\documentclass[10pt, letterpaper]{article}"));
        assert!(tex.contains(r"\definecolor{bodyColor}{RGB}{51, 51, 51}"));
        assert!(tex.contains(r"\definecolor{sectionTitleColor}{RGB}{0, 0, 0}"));
        assert!(tex.contains(r"\usepackage{helvet}"));
        assert!(tex.contains(r"\renewcommand{\familydefault}{\sfdefault}"));
        assert!(tex.contains(r"\linespread{1.15}"));
        assert!(tex.trim_end().ends_with(r"\end{document}"));
    }

    #[test]
    fn test_serif_preset_keeps_roman_default() {
        let mut data = minimal_resume();
        data.styling = theme_presets()[2].styling.clone();
        let tex = source(&data);
        assert!(tex.contains(r"\usepackage{newtxtext}"));
        assert!(!tex.contains(r"\familydefault"));
        assert!(tex.contains("[11pt, letterpaper]"));
    }

    #[test]
    fn test_unknown_family_falls_back_to_helvet() {
        let mut data = minimal_resume();
        data.styling.font.family = "Comic Sans".into();
        assert!(source(&data).contains(r"\usepackage{helvet}"));
    }

    #[test]
    fn test_entries_use_double_hyphen_dates() {
        let tex = source(&template_resume());
        assert!(tex.contains("June 2005 -- Aug 2007"));
        assert!(tex.contains(r"\section{Experience}"));
        assert!(tex.contains(r"\item GPA: 3.9/4.0"));
    }

    #[test]
    fn test_project_href_is_absolute_and_escaped() {
        let mut data = minimal_resume();
        data.projects.push(Project {
            name: "Tool_X".into(),
            url: "example.com/#100%".into(),
            ..Default::default()
        });
        let tex = source(&data);
        assert!(tex.contains(r"\href{https://example.com/\#100\%}{example.com/\#100\%}"));
        assert!(tex.contains(r"Tool\_X"));
    }

    #[test]
    fn test_header_contacts_are_links() {
        let mut data = minimal_resume();
        data.personal_details.location = "Berlin".into();
        data.personal_details.email = "jane_doe@example.com".into();
        data.personal_details.phone = "+1 555 0100".into();
        data.personal_details.github = "github.com/jane".into();
        let tex = source(&data);
        assert!(tex.contains(
            r"Berlin \quad|\quad \href{mailto:jane_doe@example.com}{jane\_doe@example.com} \quad|\quad \href{tel:+15550100}{+1 555 0100} \quad|\quad \href{https://github.com/jane}{github.com/jane}"
        ));
        assert!(tex.contains(r"\definecolor{linkColor}{RGB}{0, 123, 255}"));
    }

    #[test]
    fn test_titled_custom_section_without_content() {
        let mut data = minimal_resume();
        data.custom_sections.push(CustomSection {
            title: "Awards & Honors".into(),
            content: vec!["  ".into()],
            ..Default::default()
        });
        let tex = source(&data);
        assert!(tex.contains(r"\section{Awards \& Honors}"));
        assert!(!tex.contains(r"\item"));
    }

    proptest! {
        #[test]
        fn prop_escape_round_trips(s in any::<String>()) {
            prop_assert_eq!(unescape_latex(&escape_latex(&s)), s);
        }

        #[test]
        fn prop_escaped_text_has_no_bare_specials(s in "[a-z&%$#_{}~^\\\\ ]{0,32}") {
            let escaped = escape_latex(&s);
            let mut prev = ' ';
            for c in escaped.chars() {
                if matches!(c, '&' | '%' | '$' | '#' | '_') {
                    prop_assert_eq!(prev, '\\');
                }
                prev = c;
            }
        }
    }
}
