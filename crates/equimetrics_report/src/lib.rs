//! Printable document renderer.
//!
//! Lays out a [`Summary`] as a PDF: title, total count, average purchase
//! year, then one line per equipment type in the distribution's own order
//! (the aggregation decides ordering; this renderer never re-sorts and never
//! re-validates).

use equimetrics_protocol::Summary;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use thiserror::Error;
use tracing::debug;

/// Filename used when the report is served as an attachment.
pub const REPORT_FILENAME: &str = "equipment_report.pdf";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT_MM: f32 = 18.0;
const MARGIN_BOTTOM_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 7.0;

/// Report rendering errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// Render the equipment report as PDF bytes.
///
/// Pure formatting over the summary; overflowing type distributions continue
/// on additional pages.
pub fn render_pdf(summary: &Summary) -> Result<Vec<u8>, ReportError> {
    let (doc, page, layer) = PdfDocument::new(
        "Equipment Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut cursor = Cursor::new(&doc, page, layer);

    cursor.line("Equipment Report", 16.0, &bold);
    cursor.space(LINE_HEIGHT_MM);

    cursor.line(&format!("Total Equipment: {}", summary.total_equipment), 12.0, &regular);
    cursor.line(
        &format!("Average Purchase Year: {:.2}", summary.avg_purchase_year),
        12.0,
        &regular,
    );
    cursor.space(LINE_HEIGHT_MM);

    cursor.line("Equipment Type Distribution", 14.0, &bold);
    cursor.space(LINE_HEIGHT_MM / 2.0);

    for (equipment_type, count) in &summary.type_distribution {
        cursor.line(&format!("{equipment_type}: {count}"), 12.0, &regular);
    }

    debug!(
        types = summary.type_distribution.len(),
        "Report rendered"
    );

    Ok(doc.save_to_bytes()?)
}

/// Tracks the write position, starting new pages when a line would fall
/// below the bottom margin.
struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: printpdf::PdfLayerReference,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(
        doc: &'a PdfDocumentReference,
        page: printpdf::PdfPageIndex,
        layer: printpdf::PdfLayerIndex,
    ) -> Self {
        Self {
            doc,
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_HEIGHT_MM - 25.0,
        }
    }

    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        if self.y < MARGIN_BOTTOM_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - 25.0;
        }
        self.layer
            .use_text(text, size, Mm(MARGIN_LEFT_MM), Mm(self.y), font);
        self.y -= LINE_HEIGHT_MM;
    }

    fn space(&mut self, mm: f32) {
        self.y -= mm;
    }
}
