//! OPC package plumbing: the fixed parts and the ZIP container.

use std::io::{Cursor, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::render::docx::{escape_xml, namespaces};
use crate::render::RenderError;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_NUMBERING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
const REL_SETTINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

/// Relationship ids rId1..rId3 are taken by styles, numbering and settings.
const FIRST_HYPERLINK_REL: usize = 4;

/// Relationship id of the n-th (zero-based) hyperlink in document.xml.
pub fn hyperlink_rel_id(index: usize) -> String {
    format!("rId{}", FIRST_HYPERLINK_REL + index)
}

/// One file inside the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxPart {
    pub path: String,
    pub content: String,
}

impl DocxPart {
    pub fn new(path: &str, content: String) -> Self {
        Self {
            path: path.to_string(),
            content,
        }
    }
}

/// The generator backend that turns parts into a .docx container.
pub trait DocxPackager: Send + Sync {
    fn package(&self, parts: &[DocxPart]) -> Result<Vec<u8>, RenderError>;
}

/// Deflate-compressed ZIP written entirely in memory.
pub struct ZipPackager;

impl DocxPackager for ZipPackager {
    fn package(&self, parts: &[DocxPart]) -> Result<Vec<u8>, RenderError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for part in parts {
            zip.start_file(part.path.as_str(), options)
                .map_err(|e| RenderError::Docx(format!("{}: {e}", part.path)))?;
            zip.write_all(part.content.as_bytes())
                .map_err(|e| RenderError::Docx(format!("{}: {e}", part.path)))?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| RenderError::Docx(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixed parts
// ────────────────────────────────────────────────────────────────────────────

pub fn content_types_xml() -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(r#"<Types xmlns="{}">"#, namespaces::CONTENT_TYPES));
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for (part, content_type) in [
        ("/word/document.xml", "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"),
        ("/word/styles.xml", "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"),
        ("/word/numbering.xml", "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"),
        ("/word/settings.xml", "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"),
        ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml"),
    ] {
        xml.push_str(&format!(r#"<Override PartName="{part}" ContentType="{content_type}"/>"#));
    }
    xml.push_str("</Types>");
    xml
}

pub fn root_rels_xml() -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, namespaces::PKG_RELS));
    xml.push_str(&format!(
        r#"<Relationship Id="rId1" Type="{REL_OFFICE_DOCUMENT}" Target="word/document.xml"/>"#
    ));
    xml.push_str(&format!(
        r#"<Relationship Id="rId2" Type="{REL_CORE_PROPS}" Target="docProps/core.xml"/>"#
    ));
    xml.push_str("</Relationships>");
    xml
}

pub fn core_props_xml(title: &str, created: DateTime<Utc>) -> String {
    let stamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = String::from(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<cp:coreProperties xmlns:cp="{}" xmlns:dc="{}" xmlns:dcterms="{}" xmlns:xsi="{}">"#,
        namespaces::CORE_PROPS,
        namespaces::DC,
        namespaces::DCTERMS,
        namespaces::XSI
    ));
    xml.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(title)));
    xml.push_str("<dc:creator>resume-api</dc:creator>");
    xml.push_str(&format!(
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>"#
    ));
    xml.push_str(&format!(
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>"#
    ));
    xml.push_str("</cp:coreProperties>");
    xml
}

pub fn settings_xml() -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(r#"<w:settings xmlns:w="{}">"#, namespaces::W));
    xml.push_str(r#"<w:defaultTabStop w:val="720"/><w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat>"#);
    xml.push_str("</w:settings>");
    xml
}

/// Relationships of document.xml: the fixed parts plus one external target per link.
pub fn document_rels_xml(hyperlinks: &[String]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, namespaces::PKG_RELS));
    xml.push_str(&format!(
        r#"<Relationship Id="rId1" Type="{REL_STYLES}" Target="styles.xml"/>"#
    ));
    xml.push_str(&format!(
        r#"<Relationship Id="rId2" Type="{REL_NUMBERING}" Target="numbering.xml"/>"#
    ));
    xml.push_str(&format!(
        r#"<Relationship Id="rId3" Type="{REL_SETTINGS}" Target="settings.xml"/>"#
    ));
    for (index, href) in hyperlinks.iter().enumerate() {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{REL_HYPERLINK}" Target="{}" TargetMode="External"/>"#,
            hyperlink_rel_id(index),
            escape_xml(href)
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_zip_packager_round_trips_parts() {
        let parts = vec![
            DocxPart::new("a.xml", "<a/>".into()),
            DocxPart::new("dir/b.xml", "<b>é</b>".into()),
        ];
        let bytes = ZipPackager.package(&parts).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive.by_name("dir/b.xml").unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "<b>é</b>");
        assert_eq!(
            archive.by_name("a.xml").unwrap().compression(),
            zip::CompressionMethod::Deflated
        );
    }

    #[test]
    fn test_hyperlinks_follow_fixed_relationships() {
        let xml = document_rels_xml(&["https://a.dev/?x=1&y=2".to_string()]);
        assert!(xml.contains(r#"Id="rId4""#));
        assert!(xml.contains("x=1&amp;y=2"));
        assert!(xml.contains(r#"TargetMode="External""#));
        assert_eq!(hyperlink_rel_id(2), "rId6");
    }

    #[test]
    fn test_core_props_title_and_stamp() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let xml = core_props_xml("Jane & Co's Resume", created);
        assert!(xml.contains("<dc:title>Jane &amp; Co&apos;s Resume</dc:title>"));
        assert!(xml.contains("2024-03-01T12:00:00Z"));
    }
}
