//! styles.xml writer
//!
//! One named paragraph style per style role, parameterized by the resolved styles.
//! Paragraphs in document.xml reference these by id and carry no inline formatting
//! except on shared lines.

use crate::layout::style::{ResolvedFont, ResolvedStyles, LINK_COLOR};
use crate::render::docx::{escape_xml, namespaces};

pub const STYLE_HEADING: &str = "Heading";
pub const STYLE_SECTION_TITLE: &str = "SectionTitle";
pub const STYLE_SUBHEADING: &str = "Subheading";
pub const STYLE_BODY: &str = "Body";
pub const STYLE_HYPERLINK: &str = "Hyperlink";

/// Single spacing in `w:line` units.
const SINGLE_LINE: f32 = 240.0;

/// `w:line` value for a line-height ratio.
pub fn line_spacing(line_height: f32) -> u32 {
    (SINGLE_LINE * line_height).round() as u32
}

/// Run properties for a resolved font: family, size in half-points, color, weight.
pub fn run_properties(font: &ResolvedFont) -> String {
    format!("<w:rPr>{}</w:rPr>", run_property_elements(font))
}

/// Run properties that reference a character style and still pin the resolved font.
pub fn styled_run_properties(style_id: &str, font: &ResolvedFont) -> String {
    format!(
        r#"<w:rPr><w:rStyle w:val="{style_id}"/>{}</w:rPr>"#,
        run_property_elements(font)
    )
}

fn run_property_elements(font: &ResolvedFont) -> String {
    let family = escape_xml(font.family.name());
    let mut xml = String::new();
    xml.push_str(&format!(
        r#"<w:rFonts w:ascii="{family}" w:hAnsi="{family}" w:cs="{family}"/>"#
    ));
    if font.bold {
        xml.push_str("<w:b/><w:bCs/>");
    }
    xml.push_str(&format!(r#"<w:color w:val="{}"/>"#, font.color.to_hex()));
    let half_points = font.half_points();
    xml.push_str(&format!(r#"<w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/>"#));
    xml
}

pub fn styles_xml(styles: &ResolvedStyles) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<w:styles xmlns:w="{}">"#, namespaces::W));

    // docDefaults: body font and the global line spacing.
    xml.push_str("<w:docDefaults><w:rPrDefault>");
    xml.push_str(&run_properties(&styles.body));
    xml.push_str("</w:rPrDefault><w:pPrDefault><w:pPr>");
    xml.push_str(&format!(
        r#"<w:spacing w:after="0" w:line="{}" w:lineRule="auto"/>"#,
        line_spacing(styles.line_height)
    ));
    xml.push_str("</w:pPr></w:pPrDefault></w:docDefaults>");

    xml.push_str(r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#);

    paragraph_style(
        &mut xml,
        STYLE_HEADING,
        "heading",
        r#"<w:jc w:val="center"/><w:spacing w:after="120"/>"#,
        &styles.heading,
    );
    let section_color = styles.section_title.color.to_hex();
    paragraph_style(
        &mut xml,
        STYLE_SECTION_TITLE,
        "sectionTitle",
        &format!(
            r#"<w:keepNext/><w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="{section_color}"/></w:pBdr><w:spacing w:before="240" w:after="120"/>"#
        ),
        &styles.section_title,
    );
    paragraph_style(
        &mut xml,
        STYLE_SUBHEADING,
        "subheading",
        r#"<w:keepNext/><w:spacing w:after="60"/>"#,
        &styles.subheading,
    );
    paragraph_style(&mut xml, STYLE_BODY, "body", "", &styles.body);

    xml.push_str(&format!(
        r#"<w:style w:type="character" w:styleId="{STYLE_HYPERLINK}"><w:name w:val="Hyperlink"/><w:rPr><w:color w:val="{}"/><w:u w:val="single"/></w:rPr></w:style>"#,
        LINK_COLOR.to_hex()
    ));

    xml.push_str("</w:styles>");
    xml
}

fn paragraph_style(xml: &mut String, id: &str, name: &str, paragraph_props: &str, font: &ResolvedFont) {
    xml.push_str(&format!(
        r#"<w:style w:type="paragraph" w:customStyle="1" w:styleId="{id}"><w:name w:val="{name}"/><w:basedOn w:val="Normal"/><w:next w:val="{STYLE_BODY}"/><w:qFormat/>"#
    ));
    if !paragraph_props.is_empty() {
        xml.push_str("<w:pPr>");
        xml.push_str(paragraph_props);
        xml.push_str("</w:pPr>");
    }
    xml.push_str(&run_properties(font));
    xml.push_str("</w:style>");
}
