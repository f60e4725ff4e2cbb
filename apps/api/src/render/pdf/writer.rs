//! Serializes laid-out pages into a PDF 1.7 document with lopdf.
//!
//! The four standard Type1 faces are referenced by name, never embedded, and text is
//! written as WinAnsi literal strings. Content streams are left uncompressed.

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::layout::cursor::PageGeometry;
use crate::layout::font_metrics::{to_win_ansi, PdfFont};
use crate::layout::style::Rgb;
use crate::render::pdf::layout::{LinkArea, PageLayout, Rule, TextRun};
use crate::render::RenderError;

pub const CREATOR: &str = "resume-api";

/// Builds the complete document in memory and returns its bytes.
pub fn write_pdf(
    pages: &[PageLayout],
    geometry: PageGeometry,
    title: &str,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for font in PdfFont::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for page in pages {
        let mut content = PageContent::new(geometry.height_pt);
        for rule in &page.rules {
            content.rule(rule);
        }
        for run in &page.texts {
            content.text(run);
        }
        let encoded = content
            .finish()
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), encoded));

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), geometry.width_pt.into(), geometry.height_pt.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        };
        if !page.links.is_empty() {
            let annots: Vec<Object> = page
                .links
                .iter()
                .map(|link| Object::Reference(doc.add_object(link_annotation(link, geometry.height_pt))))
                .collect();
            page_dict.set("Annots", annots);
        }
        page_ids.push(doc.add_object(page_dict));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(to_win_ansi(title), StringFormat::Literal),
        "Creator" => Object::string_literal(CREATOR),
        "CreationDate" => Object::string_literal(format!("D:{}Z", Utc::now().format("%Y%m%d%H%M%S"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(buffer)
}

fn link_annotation(link: &LinkArea, page_height: f32) -> lopdf::Dictionary {
    let rect: Vec<Object> = vec![
        link.x.into(),
        (page_height - (link.top + link.height)).into(),
        (link.x + link.width).into(),
        (page_height - link.top).into(),
    ];
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => rect,
        "Border" => vec![0.into(), 0.into(), 0.into()],
        "A" => dictionary! {
            "S" => "URI",
            "URI" => Object::string_literal(link.href.as_str()),
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Content stream builder
// ────────────────────────────────────────────────────────────────────────────

fn color_operands(color: Rgb) -> Vec<Object> {
    let [r, g, b] = color.to_unit();
    vec![r.into(), g.into(), b.into()]
}

/// Emits operators for one page, skipping redundant font and color changes.
struct PageContent {
    page_height: f32,
    operations: Vec<Operation>,
    font: Option<(PdfFont, f32)>,
    fill: Option<Rgb>,
}

impl PageContent {
    fn new(page_height: f32) -> Self {
        Self {
            page_height,
            operations: Vec::new(),
            font: None,
            fill: None,
        }
    }

    fn finish(self) -> Content {
        Content {
            operations: self.operations,
        }
    }

    fn rule(&mut self, rule: &Rule) {
        let y = self.page_height - rule.y;
        self.operations.push(Operation::new("w", vec![rule.width.into()]));
        self.operations.push(Operation::new("RG", color_operands(rule.color)));
        self.operations.push(Operation::new("m", vec![rule.x1.into(), y.into()]));
        self.operations.push(Operation::new("l", vec![rule.x2.into(), y.into()]));
        self.operations.push(Operation::new("S", vec![]));
    }

    fn text(&mut self, run: &TextRun) {
        self.operations.push(Operation::new("BT", vec![]));
        if self.font != Some((run.font, run.size_pt)) {
            self.operations.push(Operation::new(
                "Tf",
                vec![run.font.resource_name().into(), run.size_pt.into()],
            ));
            self.font = Some((run.font, run.size_pt));
        }
        if self.fill != Some(run.color) {
            self.operations.push(Operation::new("rg", color_operands(run.color)));
            self.fill = Some(run.color);
        }
        self.operations.push(Operation::new(
            "Td",
            vec![run.x.into(), (self.page_height - run.baseline).into()],
        ));
        self.operations.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(&run.text), StringFormat::Literal)],
        ));
        self.operations.push(Operation::new("ET", vec![]));
    }
}
