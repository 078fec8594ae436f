use lopdf::{
    content::{Content, Operation},
    dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::builder::AttendanceDocument;
use crate::error::{Result, SheetError};
use crate::helpers::{
    fonts::{encode_win_ansi, StandardFont},
    signature::SignatureImage,
};
use crate::models::table::{Align, Cell, CellContent, Row};

const MM: f32 = 72.0 / 25.4;

/// Page geometry in points. Column widths are fractions of the printable width.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub bottom_margin: f32,
    pub line_height: f32,
    pub padding: f32,
    pub border_width: f32,
    pub column_widths: Vec<f32>,
}

impl Default for PageLayout {
    // A4 portrait
    fn default() -> Self {
        PageLayout {
            width: 210.0 * MM,
            height: 297.0 * MM,
            margin: 10.0 * MM,
            bottom_margin: 20.0 * MM,
            line_height: 5.0 * MM,
            padding: 0.5 * MM,
            border_width: 0.2 * MM,
            column_widths: vec![0.26, 0.16, 0.16, 0.16, 0.25],
        }
    }
}

impl PageLayout {
    /// Left edge of every column plus the right edge of the last one.
    pub fn column_edges(&self) -> Vec<f32> {
        let total: f32 = self.column_widths.iter().sum();
        let printable = self.width - 2.0 * self.margin;
        let mut x = self.margin;
        let mut edges = vec![x];
        for fraction in &self.column_widths {
            x += printable * fraction / total;
            edges.push(x);
        }
        edges
    }

    /// Height of `row` once every text cell is wrapped to its column span.
    pub fn row_height(&self, row: &Row) -> f32 {
        let edges = self.column_edges();
        let lines = self
            .cell_boxes(row, &edges)
            .into_iter()
            .map(|cell| cell.lines.len())
            .max()
            .unwrap_or(0)
            .max(1);
        lines as f32 * self.line_height + 2.0 * self.padding
    }

    // Horizontal extent and wrapped text of each cell; cells past the last column are dropped.
    fn cell_boxes<'a>(&self, row: &'a Row, edges: &[f32]) -> Vec<CellBox<'a>> {
        let style = row.style.style();
        let font = StandardFont::select(style.family, style.emphasis);
        let last_column = edges.len() - 1;

        let mut boxes = Vec::with_capacity(row.cells.len());
        let mut column = 0;
        for cell in &row.cells {
            if column >= last_column {
                break;
            }
            let x0 = edges[column];
            let x1 = edges[(column + cell.colspan).min(last_column)];
            column += cell.colspan;

            let lines = match &cell.content {
                CellContent::Text(text) => {
                    font.wrap(text, style.size_pt, x1 - x0 - 2.0 * self.padding)
                }
                _ => Vec::new(),
            };
            boxes.push(CellBox { cell, x0, x1, lines });
        }
        boxes
    }

    fn top(&self) -> f32 {
        self.height - self.margin
    }
}

struct CellBox<'a> {
    cell: &'a Cell,
    x0: f32,
    x1: f32,
    lines: Vec<String>,
}

struct EmbeddedImage {
    path: PathBuf,
    name: String,
    image: SignatureImage,
}

/// Renders the sheet on A4 pages and returns the PDF bytes.
pub fn render(document: &AttendanceDocument) -> Result<Vec<u8>> {
    render_with_layout(document, &PageLayout::default())
}

pub fn render_with_layout(document: &AttendanceDocument, layout: &PageLayout) -> Result<Vec<u8>> {
    info!(
        "Rendering attendance sheet '{}' with {} rows",
        document.title,
        document.rows().count()
    );

    let mut pdf = Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let mut fonts: BTreeMap<StandardFont, ObjectId> = BTreeMap::new();
    let mut images: Vec<EmbeddedImage> = Vec::new();

    for row in document.rows() {
        let style = row.style.style();
        let font = StandardFont::select(style.family, style.emphasis);
        fonts.entry(font).or_insert_with(|| {
            pdf.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            })
        });

        for cell in &row.cells {
            if let CellContent::Image(path) = &cell.content {
                if !images.iter().any(|embedded| &embedded.path == path) {
                    let image = SignatureImage::load(path)?;
                    images.push(EmbeddedImage {
                        path: path.clone(),
                        name: format!("Im{}", images.len() + 1),
                        image,
                    });
                }
            }
        }
    }

    let pages = paginate(document, layout, &images);
    info!("Laid out {} page(s)", pages.len());

    let mut font_resources = Dictionary::new();
    for (font, id) in &fonts {
        font_resources.set(font.resource_name(), Object::Reference(*id));
    }

    let mut image_resources = Dictionary::new();
    for embedded in &images {
        let id = embedded.image.embed(&mut pdf);
        image_resources.set(embedded.name.as_str(), Object::Reference(id));
    }

    let resources_id = pdf.add_object(dictionary! {
        "Font" => font_resources,
        "XObject" => image_resources,
    });

    let mut kids = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }
            .encode()
            .map_err(SheetError::serialization)?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        layout.width.into(),
        layout.height.into(),
    ];
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = pdf.add_object(dictionary! {
        "Title" => text_string(&document.title),
        "Author" => text_string(&document.employee),
        "Producer" => text_string(concat!("attendance-sheet ", env!("CARGO_PKG_VERSION"))),
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.trailer.set("Info", info_id);
    pdf.compress();

    let mut output_buffer: Vec<u8> = Vec::new();
    match pdf.save_to(&mut output_buffer) {
        Ok(_) => {
            info!(
                "Successfully converted PDF to bytes, size: {} bytes",
                output_buffer.len()
            );
            Ok(output_buffer)
        }
        Err(e) => {
            error!("Failed to convert PDF to bytes: {}", e);
            Err(SheetError::serialization(e))
        }
    }
}

/// Renders the sheet and writes it to `path`.
pub fn write_to<P: AsRef<Path>>(document: &AttendanceDocument, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = render(document)?;

    std::fs::write(path, &bytes).map_err(|e| {
        error!("Failed to write PDF to {}: {}", path.display(), e);
        SheetError::SerializationFailure(format!("writing {}: {}", path.display(), e))
    })?;

    info!("Wrote attendance sheet to {}", path.display());
    Ok(())
}

fn paginate(
    document: &AttendanceDocument,
    layout: &PageLayout,
    images: &[EmbeddedImage],
) -> Vec<Vec<Operation>> {
    let edges = layout.column_edges();
    let mut pages: Vec<Vec<Operation>> = vec![Vec::new()];
    let mut y = layout.top();

    for row in document.rows() {
        let height = layout.row_height(row);
        if y - height < layout.bottom_margin && y < layout.top() {
            pages.push(Vec::new());
            y = layout.top();
        }

        if let Some(operations) = pages.last_mut() {
            draw_row(operations, row, y, height, &edges, layout, images);
        }
        y -= height;
    }

    pages
}

fn draw_row(
    ops: &mut Vec<Operation>,
    row: &Row,
    top: f32,
    height: f32,
    edges: &[f32],
    layout: &PageLayout,
    images: &[EmbeddedImage],
) {
    let style = row.style.style();
    let font = StandardFont::select(style.family, style.emphasis);
    let [r, g, b] = style.fill_components();

    for CellBox { cell, x0, x1, lines } in layout.cell_boxes(row, edges) {
        ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        ops.push(Operation::new("RG", vec![0.into(), 0.into(), 0.into()]));
        ops.push(Operation::new("w", vec![layout.border_width.into()]));
        ops.push(Operation::new(
            "re",
            vec![x0.into(), (top - height).into(), (x1 - x0).into(), height.into()],
        ));
        ops.push(Operation::new("B", vec![]));

        match &cell.content {
            CellContent::Empty => {}
            CellContent::Text(_) => draw_text(
                ops,
                cell.align,
                &lines,
                (font, style.size_pt),
                (x0, x1),
                (top, height),
                layout,
            ),
            CellContent::Image(path) => {
                if let Some(embedded) = images.iter().find(|embedded| &embedded.path == path) {
                    let (w, h) = embedded.image.fit(
                        x1 - x0 - 2.0 * layout.padding,
                        height - 2.0 * layout.padding,
                    );
                    let x = x0 + (x1 - x0 - w) / 2.0;
                    let y = top - height + (height - h) / 2.0;
                    ops.push(Operation::new("q", vec![]));
                    ops.push(Operation::new(
                        "cm",
                        vec![w.into(), 0.into(), 0.into(), h.into(), x.into(), y.into()],
                    ));
                    ops.push(Operation::new(
                        "Do",
                        vec![Object::Name(embedded.name.as_bytes().to_vec())],
                    ));
                    ops.push(Operation::new("Q", vec![]));
                }
            }
        }
    }
}

fn draw_text(
    ops: &mut Vec<Operation>,
    align: Align,
    lines: &[String],
    (font, size): (StandardFont, f32),
    (x0, x1): (f32, f32),
    (top, height): (f32, f32),
    layout: &PageLayout,
) {
    let block = lines.len() as f32 * layout.line_height;
    // Shorter cells sit vertically centered next to taller neighbours.
    let offset = (height - 2.0 * layout.padding - block).max(0.0) / 2.0;

    for (i, line) in lines.iter().enumerate() {
        let line_middle =
            top - layout.padding - offset - layout.line_height * (i as f32 + 0.5);
        let baseline = line_middle - size * 0.33;
        let x = match align {
            Align::Center => x0 + (x1 - x0 - font.text_width(line, size)) / 2.0,
            Align::Left => x0 + layout.padding,
        };

        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![
                Object::Name(font.resource_name().as_bytes().to_vec()),
                size.into(),
            ],
        ));
        ops.push(Operation::new("g", vec![0.into()]));
        ops.push(Operation::new("Td", vec![x.into(), baseline.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
}

// PDF text string in UTF-16BE with byte order mark.
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AttendanceSheetBuilder;

    fn october() -> AttendanceDocument {
        AttendanceSheetBuilder::new("Jane Doe")
            .month(2024, 10)
            .unwrap()
            .generate()
    }

    #[test]
    fn column_edges_span_printable_width() {
        let layout = PageLayout::default();
        let edges = layout.column_edges();
        assert_eq!(edges.len(), 6);
        assert!((edges[0] - layout.margin).abs() < 1e-3);
        assert!((edges[5] - (layout.width - layout.margin)).abs() < 1e-2);
        assert!(edges.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn row_height_grows_with_lines() {
        let layout = PageLayout::default();
        let doc = october();
        let title = layout.row_height(&doc.header[0]);
        let columns = layout.row_height(&doc.header[2]);
        assert!((columns - title - layout.line_height).abs() < 1e-3);
    }

    #[test]
    fn long_names_wrap_inside_the_merged_cell() {
        let layout = PageLayout::default();
        let name = "Bartholomew Maximilian Alexander ".repeat(8);
        let doc = AttendanceSheetBuilder::new(name.trim())
            .month(2024, 10)
            .unwrap()
            .generate();

        let edges = layout.column_edges();
        let boxes = layout.cell_boxes(&doc.header[1], &edges);
        assert_eq!(boxes.len(), 1);
        let cell = &boxes[0];
        assert!(cell.lines.len() > 1);

        let font = StandardFont::TimesBold;
        let inner = cell.x1 - cell.x0 - 2.0 * layout.padding;
        assert!(cell.lines.iter().all(|line| font.text_width(line, 12.0) <= inner));
        assert_eq!(cell.lines.join(" "), name.trim());

        let expected = cell.lines.len() as f32 * layout.line_height + 2.0 * layout.padding;
        assert!((layout.row_height(&doc.header[1]) - expected).abs() < 1e-3);
        assert!(layout.row_height(&doc.header[1]) > layout.row_height(&doc.header[0]));
    }

    #[test]
    fn empty_rows_keep_one_line() {
        let layout = PageLayout::default();
        let doc = october();
        // October 5th 2024 is a Saturday
        let weekend = layout.row_height(&doc.body[4]);
        assert!((weekend - layout.line_height - 2.0 * layout.padding).abs() < 1e-3);
    }

    #[test]
    fn month_fits_on_one_a4_page() {
        let doc = october();
        let pages = paginate(&doc, &PageLayout::default(), &[]);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn short_pages_break_rows() {
        let layout = PageLayout {
            height: 100.0 * MM,
            ..PageLayout::default()
        };
        let pages = paginate(&october(), &layout, &[]);
        assert!(pages.len() > 1);
        assert!(pages.iter().all(|ops| !ops.is_empty()));
    }

    #[test]
    fn renders_pdf_bytes() {
        let bytes = render(&october()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }

    #[test]
    fn text_string_has_bom() {
        match text_string("ív") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(bytes, vec![0xFE, 0xFF, 0x00, 0xED, 0x00, 0x76]);
            }
            other => panic!("unexpected object {:?}", other),
        }
    }
}
