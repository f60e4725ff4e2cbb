//! DOCX Renderer
//!
//! Builds the WordprocessingML parts as strings and hands them to a `DocxPackager`
//! backend that produces the ZIP container. Pagination is left to the word processor.
//!
//! ## Structure
//!
//! - `[Content_Types].xml`, `_rels/.rels`, `docProps/core.xml` - package plumbing
//! - `word/document.xml` - flow paragraphs referencing named styles
//! - `word/styles.xml` - Heading, SectionTitle, Subheading, Body, Hyperlink
//! - `word/numbering.xml` - the single shared bullet definition
//! - `word/settings.xml`, `word/_rels/document.xml.rels`

pub mod document;
pub mod numbering;
pub mod package;
pub mod styles;

use std::sync::Arc;

use chrono::Utc;

use crate::render::{document_title, ExportFormat, RenderError, RenderInput, RenderedDocument, ResumeRenderer};

pub use package::{DocxPackager, DocxPart, ZipPackager};

/// XML namespaces used across the parts.
pub(crate) mod namespaces {
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    pub const PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
    pub const CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
    pub const CORE_PROPS: &str =
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
}

// Page geometry in twentieths of a point.
pub const PAGE_WIDTH_TWIPS: u32 = 12240;
pub const PAGE_HEIGHT_TWIPS: u32 = 15840;
/// 0.75in on every side.
pub const MARGIN_TWIPS: u32 = 1080;
/// Right tab stop position: the full content width.
pub const RIGHT_TAB_TWIPS: u32 = PAGE_WIDTH_TWIPS - 2 * MARGIN_TWIPS;

/// Escapes text for element content and attribute values.
///
/// Characters XML 1.0 cannot carry at all (most C0 controls) are dropped.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

pub struct DocxRenderer {
    packager: Arc<dyn DocxPackager>,
}

impl DocxRenderer {
    pub fn new(packager: Arc<dyn DocxPackager>) -> Self {
        Self { packager }
    }

    /// Every part of the package, in write order.
    pub fn parts(&self, input: &RenderInput) -> Vec<DocxPart> {
        let body = document::DocumentBuilder::new(&input.styles).build(&input.outline);
        vec![
            DocxPart::new("[Content_Types].xml", package::content_types_xml()),
            DocxPart::new("_rels/.rels", package::root_rels_xml()),
            DocxPart::new(
                "docProps/core.xml",
                package::core_props_xml(&document_title(input.name()), Utc::now()),
            ),
            DocxPart::new("word/document.xml", body.xml),
            DocxPart::new("word/styles.xml", styles::styles_xml(&input.styles)),
            DocxPart::new("word/numbering.xml", numbering::numbering_xml()),
            DocxPart::new("word/settings.xml", package::settings_xml()),
            DocxPart::new(
                "word/_rels/document.xml.rels",
                package::document_rels_xml(&body.hyperlinks),
            ),
        ]
    }
}

impl ResumeRenderer for DocxRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn render(&self, input: &RenderInput) -> Result<RenderedDocument, RenderError> {
        let bytes = self.packager.package(&self.parts(input))?;
        Ok(RenderedDocument {
            format: ExportFormat::Docx,
            bytes,
            pages: None,
        })
    }
}
