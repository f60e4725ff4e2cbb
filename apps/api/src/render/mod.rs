//! Renderers: PDF, DOCX, LaTeX and the live preview.
//!
//! Every renderer consumes one `RenderInput`: the shared outline plus resolved styles,
//! built once per snapshot. A renderer writes into a private buffer and hands it back
//! only on success, so a failed export never yields a partial artifact.

pub mod backend;
pub mod docx;
pub mod latex;
pub mod pdf;
pub mod preview;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::sections::ResumeOutline;
use crate::layout::style::ResolvedStyles;
use crate::models::resume::ResumeData;

// ────────────────────────────────────────────────────────────────────────────
// Formats
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
    Latex,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Latex => "tex",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Latex => "application/x-tex; charset=utf-8",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Latex => "latex",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<Name>_Resume.<ext>` with every whitespace character replaced by `_`.
///
/// Characters that would break a `Content-Disposition` header are dropped.
/// A blank name yields `Resume.<ext>`.
pub fn export_filename(name: &str, format: ExportFormat) -> String {
    let stem: String = name
        .trim()
        .chars()
        .filter(|c| !matches!(c, '"' | '\\' | '/') && !c.is_control() || c.is_whitespace())
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    if stem.is_empty() {
        format!("Resume.{}", format.extension())
    } else {
        format!("{stem}_Resume.{}", format.extension())
    }
}

/// Document metadata title: `<Name>'s Resume`.
pub fn document_title(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "Resume".to_string()
    } else {
        format!("{name}'s Resume")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RenderError {
    /// The generator backend could not be acquired; the message carries the hint.
    #[error("{0}")]
    LibraryUnavailable(String),

    #[error("PDF serialization failed: {0}")]
    Pdf(String),

    #[error("DOCX packaging failed: {0}")]
    Docx(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer contract
// ────────────────────────────────────────────────────────────────────────────

/// Immutable input shared by every renderer for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInput {
    pub outline: ResumeOutline,
    pub styles: ResolvedStyles,
}

impl RenderInput {
    pub fn from_snapshot(data: &ResumeData) -> Self {
        Self {
            outline: ResumeOutline::build(data),
            styles: ResolvedStyles::resolve(&data.styling),
        }
    }

    pub fn name(&self) -> &str {
        &self.outline.header.name
    }
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    /// Page count, for paginated formats.
    pub pages: Option<usize>,
}

/// One export target. Implementations are synchronous and side-effect free.
pub trait ResumeRenderer: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn render(&self, input: &RenderInput) -> Result<RenderedDocument, RenderError>;
}
