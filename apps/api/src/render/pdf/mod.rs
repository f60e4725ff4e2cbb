// PDF Renderer: `layout` places everything on Letter pages, `writer` serializes with lopdf.

pub mod layout;
pub mod writer;

use crate::layout::cursor::PageGeometry;
use crate::render::{document_title, ExportFormat, RenderError, RenderInput, RenderedDocument, ResumeRenderer};

pub struct PdfRenderer;

impl ResumeRenderer for PdfRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, input: &RenderInput) -> Result<RenderedDocument, RenderError> {
        let pages = layout::layout_resume(input);
        let bytes = writer::write_pdf(&pages, PageGeometry::LETTER, &document_title(input.name()))?;
        Ok(RenderedDocument {
            format: ExportFormat::Pdf,
            bytes,
            pages: Some(pages.len()),
        })
    }
}
