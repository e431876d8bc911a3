//! PDF layout (printpdf)
//!
//! US Letter portrait pages with a running cursor: each block asks for the
//! vertical space it needs and a new page is started when it would cross the
//! bottom margin.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use printpdf::image_crate::GenericImageView;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point,
};

use super::render::RenderedChart;
use super::{Report, Rgb, Section, Table, COLOR_BLACK, COLOR_GRAY, COLOR_OUTLIER};
use crate::build_info::BuildInfo;
use crate::error::{ReportError, ReportResult};

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 15.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
/// Lowest y a block may reach; the footer sits below it
const BOTTOM_LIMIT: f32 = MARGIN + 8.0;
const VALUE_COLUMN: f32 = MARGIN + 50.0;
const ROW_HEIGHT: f32 = 4.5;
const NOTE_WRAP_CHARS: usize = 110;

// ============================================================================
// Helpers
// ============================================================================

fn rgb_to_printpdf(color: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

/// Rough rendered width of Helvetica text
fn text_width_mm(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5 * 0.3528
}

/// Greedy word wrap at `max_chars` characters per line
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

// ============================================================================
// Page Cursor
// ============================================================================

struct PageWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    layer: PdfLayerReference,
    y: f32,
    page: usize,
    footer: String,
}

impl PageWriter {
    fn new(title: &str, footer: String) -> ReportResult<Self> {
        let (doc, page1, layer1) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page1).get_layer(layer1);

        Ok(Self {
            doc,
            font,
            font_bold,
            layer,
            y: PAGE_HEIGHT - 20.0,
            page: 1,
            footer,
        })
    }

    fn text(&self, text: &str, x: f32, size: f32, color: Rgb, bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        self.layer.set_fill_color(rgb_to_printpdf(color));
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn rule(&self, color: Rgb, width: f32) {
        self.layer.set_outline_color(rgb_to_printpdf(color));
        self.layer.set_outline_thickness(width);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(self.y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(self.y)), false),
            ],
            is_closed: false,
        });
    }

    fn draw_footer(&self) {
        let size = 8.0;
        self.layer.set_fill_color(rgb_to_printpdf(COLOR_GRAY));
        self.layer.use_text(self.footer.as_str(), size, Mm(MARGIN), Mm(MARGIN - 5.0), &self.font);
        let page_label = format!("Page {}", self.page);
        let x = PAGE_WIDTH - MARGIN - text_width_mm(&page_label, size);
        self.layer.use_text(page_label, size, Mm(x), Mm(MARGIN - 5.0), &self.font);
    }

    fn new_page(&mut self) {
        self.draw_footer();
        self.page += 1;
        let (page, layer) =
            self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Page {}", self.page));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - 20.0;
    }

    /// Start a new page unless `needed` millimetres fit above the bottom limit
    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < BOTTOM_LIMIT {
            self.new_page();
        }
    }

    fn finish(self, path: &Path) -> ReportResult<usize> {
        self.draw_footer();
        let pages = self.page;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.doc.save(&mut writer).map_err(|e| ReportError::Pdf(e.to_string()))?;

        Ok(pages)
    }
}

// ============================================================================
// Blocks
// ============================================================================

fn write_header(w: &mut PageWriter, report: &Report) {
    let header = &report.header;

    w.text("Health Report", MARGIN, 18.0, COLOR_BLACK, true);
    w.y -= 10.0;

    w.text(&format!("Patient: {}", header.patient.name), MARGIN, 11.0, COLOR_BLACK, false);
    if !header.patient.dob.is_empty() {
        w.text(&format!("DOB: {}", header.patient.dob), 120.0, 11.0, COLOR_BLACK, false);
    }
    w.y -= 6.0;

    w.text(&format!("Report Period: {}", header.period), MARGIN, 11.0, COLOR_BLACK, false);
    let generated = format!("Generated: {}", header.generated_on.format("%Y-%m-%d"));
    w.text(&generated, 120.0, 11.0, COLOR_BLACK, false);
    w.y -= 6.0;

    w.text(&format!("Timezone: UTC{}", header.timezone), MARGIN, 9.0, COLOR_GRAY, false);
    w.y -= 6.0;

    w.rule(COLOR_GRAY, 0.5);
    w.y -= 8.0;
}

fn write_chart(w: &mut PageWriter, chart: &RenderedChart) -> ReportResult<()> {
    match &chart.png {
        Ok(png_bytes) => {
            let dynamic_image = printpdf::image_crate::load_from_memory(png_bytes)
                .map_err(|e| ReportError::Pdf(e.to_string()))?;
            let (px_width, px_height) = dynamic_image.dimensions();

            // Scale the bitmap to exactly the content width
            let dpi = px_width as f32 * 25.4 / CONTENT_WIDTH;
            let height_mm = px_height as f32 * 25.4 / dpi;

            w.ensure_space(height_mm + 8.0);
            w.text(&chart.title, MARGIN, 10.0, COLOR_BLACK, true);
            w.y -= 2.0;

            let transform = ImageTransform {
                translate_x: Some(Mm(MARGIN)),
                translate_y: Some(Mm(w.y - height_mm)),
                dpi: Some(dpi),
                ..Default::default()
            };
            Image::from_dynamic_image(&dynamic_image).add_to_layer(w.layer.clone(), transform);
            w.y -= height_mm + 4.0;
        }
        Err(e) => {
            w.ensure_space(10.0);
            let message = format!("{}: chart generation error: {}", chart.title, e);
            w.text(&message, MARGIN, 9.0, COLOR_OUTLIER, false);
            w.y -= 8.0;
        }
    }
    Ok(())
}

fn write_legend(w: &mut PageWriter, section: &Section) {
    if section.legend.is_empty() {
        return;
    }
    let size = 9.0;
    w.ensure_space(12.0);
    w.text("Legend:", MARGIN, size, COLOR_BLACK, true);

    let start_x = MARGIN + 16.0;
    let mut x = start_x;
    for entry in &section.legend {
        let width = text_width_mm(&entry.label, size) + 6.0;
        if x + width > PAGE_WIDTH - MARGIN && x > start_x {
            w.y -= 5.0;
            w.ensure_space(5.0);
            x = start_x;
        }
        w.text(&entry.label, x, size, entry.color, false);
        x += width;
    }
    w.y -= 9.0;
}

fn write_table_header(w: &PageWriter, table: &Table) {
    let mut col_x = MARGIN;
    for (header, width) in table.headers.iter().zip(&table.widths) {
        w.text(header, col_x, 8.0, COLOR_BLACK, true);
        col_x += width;
    }
}

fn write_table(w: &mut PageWriter, title: &str, table: &Table) {
    w.ensure_space(7.0 + 5.0 + ROW_HEIGHT);
    w.text(title, MARGIN, 12.0, COLOR_BLACK, true);
    w.y -= 7.0;
    write_table_header(w, table);
    w.y -= 5.0;

    for row in &table.rows {
        if w.y - ROW_HEIGHT < BOTTOM_LIMIT {
            w.new_page();
            write_table_header(w, table);
            w.y -= 5.0;
        }
        let mut col_x = MARGIN;
        for (i, (value, width)) in row.cells.iter().zip(&table.widths).enumerate() {
            let color = if i >= table.colored_from { row.color } else { COLOR_BLACK };
            w.text(value, col_x, 7.0, color, false);
            col_x += width;
        }
        w.y -= ROW_HEIGHT;
    }
    w.y -= 4.0;
}

fn write_section(
    w: &mut PageWriter,
    section: &Section,
    charts: &[RenderedChart],
) -> ReportResult<()> {
    // Keep the title together with the start of the summary
    w.ensure_space(30.0);
    w.text(&section.title, MARGIN, 14.0, section.title_color, true);
    w.y -= 8.0;

    for line in &section.summary {
        w.ensure_space(6.0);
        w.text(&format!("{}:", line.label), MARGIN, 10.0, COLOR_BLACK, false);
        w.text(&line.value, VALUE_COLUMN, 10.0, line.color.unwrap_or(COLOR_BLACK), false);
        w.y -= 5.5;
    }
    w.y -= 4.0;

    for chart in charts {
        write_chart(w, chart)?;
    }

    write_legend(w, section);

    if let Some(table) = &section.table {
        write_table(w, "Details", table);
    }

    w.ensure_space(4.0);
    w.rule(COLOR_GRAY, 0.3);
    w.y -= 8.0;
    Ok(())
}

fn write_notes(w: &mut PageWriter, notes: &[String]) {
    w.ensure_space(14.0);
    w.text("Clinical Notes", MARGIN, 12.0, COLOR_BLACK, true);
    w.y -= 6.0;

    for note in notes {
        for (i, line) in wrap_text(note, NOTE_WRAP_CHARS).iter().enumerate() {
            w.ensure_space(5.0);
            let text = if i == 0 { format!("- {}", line) } else { format!("  {}", line) };
            w.text(&text, MARGIN, 9.0, COLOR_BLACK, false);
            w.y -= 5.0;
        }
    }
}

// ============================================================================
// Document
// ============================================================================

/// Lay out the report and its rendered charts and save the PDF. `rendered`
/// holds one entry per section, in section order. Returns the page count.
pub fn write_pdf<P: AsRef<Path>>(
    report: &Report,
    rendered: &[Vec<RenderedChart>],
    path: P,
) -> ReportResult<usize> {
    let mut writer = PageWriter::new("Health Report", BuildInfo::current().generator_line())?;

    write_header(&mut writer, report);

    for (i, section) in report.sections.iter().enumerate() {
        let charts = rendered.get(i).map(Vec::as_slice).unwrap_or(&[]);
        write_section(&mut writer, section, charts)?;
    }

    if !report.notes.is_empty() {
        write_notes(&mut writer, &report.notes);
    }

    writer.finish(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_breaks_on_words() {
        let lines = wrap_text("patient reports mild headache after dinner", 16);
        assert_eq!(lines, vec!["patient reports", "mild headache", "after dinner"]);
    }

    #[test]
    fn test_wrap_text_keeps_long_words_whole() {
        let lines = wrap_text("see hydrochlorothiazide", 8);
        assert_eq!(lines, vec!["see", "hydrochlorothiazide"]);
    }

    #[test]
    fn test_wrap_text_empty() {
        assert!(wrap_text("   ", 20).is_empty());
    }

    #[test]
    fn test_text_width_grows_with_length() {
        assert!(text_width_mm("Stage 2 HTN", 9.0) > text_width_mm("Normal", 9.0));
    }
}
