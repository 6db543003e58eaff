/// Low-level PDF writing
///
/// Thin layout layer over `printpdf`: an A4 document with a vertical cursor
/// measured in millimetres from the top of the page. `printpdf` itself
/// measures from the bottom, so the cursor is flipped once, at the single
/// point where text is emitted.

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point,
};

use super::ReportError;

/// A4 page width in mm
pub const PAGE_WIDTH: f32 = 210.0;

/// A4 page height in mm
pub const PAGE_HEIGHT: f32 = 297.0;

/// Page margin in mm, all four sides
pub const MARGIN: f32 = 14.0;

/// Vertical cursor position past which table rows page-break
const BODY_LIMIT: f32 = PAGE_HEIGHT - MARGIN - 8.0;

/// Height of one table row in mm
const ROW_HEIGHT: f32 = 7.0;

/// Incremental writer for one report document
pub struct DocWriter {
    doc: PdfDocumentReference,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    regular: IndirectFontRef,
    bold: IndirectFontRef,

    /// Cursor in mm from the top of the current page
    y: f32,
}

impl DocWriter {
    /// Starts a new A4 document with the built-in Helvetica fonts
    pub fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        Ok(Self {
            doc,
            page,
            layer,
            regular,
            bold,
            y: MARGIN,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc.get_page(self.page).get_layer(self.layer)
    }

    /// Current cursor position in mm from the top
    pub fn cursor(&self) -> f32 {
        self.y
    }

    /// Starts a fresh page and resets the cursor to the top margin
    pub fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
        self.page = page;
        self.layer = layer;
        self.y = MARGIN;
    }

    /// Moves the cursor down without drawing
    pub fn space(&mut self, mm: f32) {
        self.y += mm;
    }

    fn put_text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        // printpdf's origin is the bottom-left corner
        self.layer()
            .use_text(text, size, Mm(x), Mm(PAGE_HEIGHT - self.y), font);
    }

    /// Writes a large bold title line
    pub fn title(&mut self, text: &str) {
        self.y += 8.0;
        self.put_text(text, 18.0, MARGIN, true);
        self.y += 4.0;
    }

    /// Writes a bold section heading
    pub fn heading(&mut self, text: &str) {
        if self.y + 16.0 > BODY_LIMIT {
            self.new_page();
        }
        self.y += 8.0;
        self.put_text(text, 13.0, MARGIN, true);
        self.y += 3.0;
    }

    /// Writes a regular line of text
    pub fn text(&mut self, text: &str) {
        if self.y + ROW_HEIGHT > BODY_LIMIT {
            self.new_page();
        }
        self.y += 5.0;
        self.put_text(text, 10.0, MARGIN, false);
        self.y += 2.0;
    }

    /// Draws a horizontal rule across the text area
    pub fn rule(&mut self) {
        self.y += 2.0;
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(PAGE_HEIGHT - self.y)), false),
                (
                    Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(PAGE_HEIGHT - self.y)),
                    false,
                ),
            ],
            is_closed: false,
        };
        let layer = self.layer();
        layer.set_outline_thickness(0.4);
        layer.add_line(line);
        self.y += 2.0;
    }

    fn table_header(&mut self, headers: &[&str], widths: &[f32]) {
        self.y += ROW_HEIGHT;
        let mut x = MARGIN;
        for (header, width) in headers.iter().zip(widths) {
            self.put_text(header, 10.0, x, true);
            x += width;
        }
        self.rule();
    }

    /// Writes a table with a bold header row
    ///
    /// `widths` are column widths in mm; rows that run past the bottom of the
    /// page continue on a fresh page with the header row repeated.
    pub fn table(&mut self, headers: &[&str], widths: &[f32], rows: &[Vec<String>]) {
        if self.y + 3.0 * ROW_HEIGHT > BODY_LIMIT {
            self.new_page();
        }
        self.table_header(headers, widths);

        for row in rows {
            if self.y + ROW_HEIGHT > BODY_LIMIT {
                self.new_page();
                self.table_header(headers, widths);
            }
            self.y += ROW_HEIGHT;
            let mut x = MARGIN;
            for (cell, width) in row.iter().zip(widths) {
                self.put_text(cell, 9.0, x, false);
                x += width;
            }
        }
        self.y += 2.0;
    }

    /// Finishes the document and returns the encoded bytes
    pub fn finish(self) -> Result<Vec<u8>, ReportError> {
        Ok(self.doc.save_to_bytes()?)
    }
}
