//! numbering.xml writer: the one bullet list every section shares.

use crate::render::docx::namespaces;

/// `w:numId` referenced by every bulleted paragraph.
pub const BULLET_NUM_ID: u32 = 1;
const BULLET_ABSTRACT_ID: u32 = 0;
pub const BULLET_GLYPH: &str = "\u{2022}";
/// 0.25in.
pub const BULLET_LEFT_TWIPS: u32 = 360;
/// 0.18in.
pub const BULLET_HANGING_TWIPS: u32 = 259;

pub fn numbering_xml() -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<w:numbering xmlns:w="{}">"#, namespaces::W));

    xml.push_str(&format!(
        r#"<w:abstractNum w:abstractNumId="{BULLET_ABSTRACT_ID}"><w:multiLevelType w:val="singleLevel"/>"#
    ));
    xml.push_str(&format!(
        concat!(
            r#"<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/>"#,
            r#"<w:lvlText w:val="{glyph}"/><w:lvlJc w:val="left"/>"#,
            r#"<w:pPr><w:ind w:left="{left}" w:hanging="{hanging}"/></w:pPr></w:lvl>"#
        ),
        glyph = BULLET_GLYPH,
        left = BULLET_LEFT_TWIPS,
        hanging = BULLET_HANGING_TWIPS,
    ));
    xml.push_str("</w:abstractNum>");

    xml.push_str(&format!(
        r#"<w:num w:numId="{BULLET_NUM_ID}"><w:abstractNumId w:val="{BULLET_ABSTRACT_ID}"/></w:num>"#
    ));
    xml.push_str("</w:numbering>");
    xml
}

/// `w:numPr` block placing a paragraph in the shared bullet list.
pub fn bullet_numbering_properties() -> String {
    format!(r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="{BULLET_NUM_ID}"/></w:numPr>"#)
}
