//! PDF output through printpdf with the built-in Helvetica faces.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Greyscale, IndirectFontRef, Line, Mm as PdfMm, PdfDocument, PdfLayerReference,
    Point as PdfPoint, Polygon,
};

use super::RenderError;
use crate::layout::{text_width, Align, Document, DrawOp, Point, Rect, MM_PER_PT};

const LAYER: &str = "Formular";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

pub fn render(document: &Document) -> Result<Vec<u8>, RenderError> {
    let first = document.pages.first().ok_or_else(|| RenderError::Pdf("document has no pages".into()))?;
    let (doc, page, layer) =
        PdfDocument::new(&document.title, PdfMm(first.size.width()), PdfMm(first.size.height()), LAYER);

    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
    };

    let mut current = doc.get_page(page).get_layer(layer);
    for (index, content) in document.pages.iter().enumerate() {
        if index > 0 {
            let (page, layer) = doc.add_page(PdfMm(content.size.width()), PdfMm(content.size.height()), LAYER);
            current = doc.get_page(page).get_layer(layer);
        }
        for op in &content.ops {
            draw(&current, &fonts, op);
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn pdf_error(e: printpdf::Error) -> RenderError {
    RenderError::Pdf(e.to_string())
}

fn point(p: Point) -> PdfPoint {
    PdfPoint::new(PdfMm(p.x), PdfMm(p.y))
}

fn grey(level: f32) -> Color {
    Color::Greyscale(Greyscale::new(level, None))
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp) {
    match op {
        DrawOp::Text { at, size, bold, align, text } => {
            let width = text_width(text, *size, *bold);
            let x = match align {
                Align::Left => at.x,
                Align::Center => at.x - width / 2.0,
                Align::Right => at.x - width,
            };
            let font = if *bold { &fonts.bold } else { &fonts.regular };
            layer.set_fill_color(grey(0.0));
            layer.use_text(text.as_str(), *size, PdfMm(x), PdfMm(at.y), font);
        }
        DrawOp::Line { from, to, width } => {
            layer.set_outline_color(grey(0.0));
            layer.set_outline_thickness(width / MM_PER_PT);
            layer.add_line(Line { points: vec![(point(*from), false), (point(*to), false)], is_closed: false });
        }
        DrawOp::Fill { rect, grey: level } => {
            layer.set_fill_color(grey(*level));
            layer.add_polygon(Polygon {
                rings: vec![corners(rect)],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
    }
}

fn corners(rect: &Rect) -> Vec<(PdfPoint, bool)> {
    [
        Point::new(rect.x, rect.y),
        Point::new(rect.right(), rect.y),
        Point::new(rect.right(), rect.top()),
        Point::new(rect.x, rect.top()),
    ]
    .into_iter()
    .map(|p| (point(p), false))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Page, PageSize};

    #[test]
    fn renders_a_pdf() {
        let mut doc = Document::new("Test");
        let mut page = Page::new(PageSize::A4Landscape);
        page.fill(Rect::new(10.0, 10.0, 50.0, 5.0), 0.8);
        page.hline(10.0, 60.0, 10.0, 0.2);
        page.push_text(Point::new(60.0, 11.0), 7.0, true, Align::Right, "8,00");
        doc.pages.push(page);
        doc.pages.push(Page::new(PageSize::A4Portrait));

        let bytes = render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_document_is_an_error() {
        assert!(matches!(render(&Document::new("leer")), Err(RenderError::Pdf(_))));
    }
}
