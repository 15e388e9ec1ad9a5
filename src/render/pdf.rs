//! PDF output via printpdf

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, LineDashPattern, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point,
};

use super::models::RenderOptions;
use super::{RenderError, Renderer, Result};
use crate::layout::{GridShape, Page};

/// Points to millimetres
const PT_TO_MM: f32 = 0.352_778;

/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.55;

/// Text never shrinks below this size (points)
const MIN_FONT_SIZE: f32 = 6.0;

/// Where a deck is written: the output path itself for a merged deck,
/// `{stem}_{sheet}.pdf` next to it for a per-sheet deck.
pub fn deck_output_path(output: &Path, deck_name: Option<&str>) -> PathBuf {
    match deck_name {
        None => output.to_path_buf(),
        Some(name) => {
            let stem = output
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "flashcards".to_string());
            output.with_file_name(format!("{}_{}.pdf", stem, sanitize_file_part(name)))
        }
    }
}

fn sanitize_file_part(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

/// Font size and approximate width (mm) for `text` inside a cell of `cell_width` mm
pub fn fit_text(text: &str, cell_width: f32, font_size: f32) -> (f32, f32) {
    let chars = text.chars().count() as f32;
    let width_at = |size: f32| chars * size * AVG_GLYPH_WIDTH * PT_TO_MM;

    let available = cell_width * 0.9;
    let mut size = font_size;
    if width_at(size) > available && chars > 0.0 {
        size = (available / (chars * AVG_GLYPH_WIDTH * PT_TO_MM)).max(MIN_FONT_SIZE);
    }
    (size, width_at(size))
}

struct DeckState {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    path: PathBuf,
    /// Page created together with the document, used by the first face
    initial: Option<(PdfPageIndex, PdfLayerIndex)>,
    pages: usize,
}

/// Writes each deck to its own PDF file
pub struct PdfRenderer {
    output: PathBuf,
    shape: GridShape,
    options: RenderOptions,
    current: Option<DeckState>,
}

impl PdfRenderer {
    pub fn new(output: PathBuf, shape: GridShape, options: RenderOptions) -> Self {
        Self {
            output,
            shape,
            options,
            current: None,
        }
    }

    fn page_size(&self) -> (f32, f32) {
        self.options.page_format.dimensions(self.options.orientation)
    }

    fn next_layer(&mut self) -> Result<PdfLayerReference> {
        let (width, height) = self.page_size();
        let deck = self.current.as_mut().ok_or(RenderError::NoDeck)?;

        let (page, layer) = match deck.initial.take() {
            Some(indices) => indices,
            None => deck.doc.add_page(Mm(width), Mm(height), "Layer 1"),
        };
        Ok(deck.doc.get_page(page).get_layer(layer))
    }

    fn draw_face(&mut self, cells: &[String]) -> Result<()> {
        let layer = self.next_layer()?;
        let font = match &self.current {
            Some(deck) => deck.font.clone(),
            None => return Err(RenderError::NoDeck),
        };

        let (width, height) = self.page_size();
        let margin = self.options.margin_mm;
        let rows = self.shape.rows();
        let cols = self.shape.cols();
        let cell_w = (width - 2.0 * margin) / cols as f32;
        let cell_h = (height - 2.0 * margin) / rows as f32;

        if self.options.dashed_guides {
            layer.set_outline_thickness(0.3);
            layer.set_line_dash_pattern(LineDashPattern {
                dash_1: Some(3),
                gap_1: Some(2),
                ..Default::default()
            });
            for r in 1..rows {
                let y = height - margin - r as f32 * cell_h;
                draw_line(&layer, 0.0, y, width, y);
            }
            for c in 1..cols {
                let x = margin + c as f32 * cell_w;
                draw_line(&layer, x, 0.0, x, height);
            }
            layer.set_line_dash_pattern(LineDashPattern::default());
        }

        if self.options.border {
            layer.set_outline_thickness(0.5);
        }

        for (i, text) in cells.iter().enumerate() {
            let (row, col) = self.shape.position(i);
            let x0 = margin + col as f32 * cell_w;
            let y_top = height - margin - row as f32 * cell_h;

            if self.options.border {
                draw_rect(&layer, x0, y_top - cell_h, cell_w, cell_h);
            }

            if text.is_empty() {
                continue;
            }
            let (size, text_w) = fit_text(text, cell_w, self.options.font_size);
            let x = x0 + (cell_w - text_w) / 2.0;
            let y = y_top - cell_h / 2.0 - size * PT_TO_MM / 3.0;
            layer.use_text(text.as_str(), size, Mm(x), Mm(y), &font);
        }

        Ok(())
    }
}

impl Renderer for PdfRenderer {
    fn begin_deck(&mut self, name: Option<&str>) -> Result<()> {
        let (width, height) = self.page_size();
        let title = name.unwrap_or("Flashcards");
        let (doc, page, layer) = PdfDocument::new(title, Mm(width), Mm(height), "Layer 1");

        let font = match &self.options.font_path {
            Some(path) => {
                let file = File::open(path)?;
                doc.add_external_font(file)
                    .map_err(|e| RenderError::Font(format!("{:?}: {}", path, e)))?
            }
            None => doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| RenderError::Font(e.to_string()))?,
        };

        self.current = Some(DeckState {
            doc,
            font,
            path: deck_output_path(&self.output, name),
            initial: Some((page, layer)),
            pages: 0,
        });
        Ok(())
    }

    fn render_page(&mut self, page: &Page) -> Result<()> {
        let capacity = self.shape.capacity();
        if page.front_cells.len() != capacity || page.back_cells.len() != capacity {
            return Err(RenderError::Pdf(format!(
                "page has {} cells, grid holds {}",
                page.front_cells.len(),
                capacity
            )));
        }

        self.draw_face(&page.front_cells)?;
        self.draw_face(&page.back_cells)?;
        if let Some(deck) = self.current.as_mut() {
            deck.pages += 1;
        }
        Ok(())
    }

    fn finish_deck(&mut self) -> Result<Option<PathBuf>> {
        let deck = self.current.take().ok_or(RenderError::NoDeck)?;
        if deck.pages == 0 {
            log::info!("No pages for {:?}, nothing written", deck.path);
            return Ok(None);
        }

        if let Some(parent) = deck.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(&deck.path)?;
        let mut writer = BufWriter::new(file);
        deck.doc
            .save(&mut writer)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        log::info!("Wrote {} sheets to {:?}", deck.pages, deck.path);
        Ok(Some(deck.path))
    }
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    let points = vec![
        (Point::new(Mm(x1), Mm(y1)), false),
        (Point::new(Mm(x2), Mm(y2)), false),
    ];
    layer.add_line(Line {
        points,
        is_closed: false,
    });
}

fn draw_rect(layer: &PdfLayerReference, x: f32, y: f32, width: f32, height: f32) {
    let points = vec![
        (Point::new(Mm(x), Mm(y)), false),
        (Point::new(Mm(x + width), Mm(y)), false),
        (Point::new(Mm(x + width), Mm(y + height)), false),
        (Point::new(Mm(x), Mm(y + height)), false),
    ];
    layer.add_line(Line {
        points,
        is_closed: true,
    });
}
