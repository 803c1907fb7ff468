//! Two-column `Field | Value` worksheet.

use crate::record::FieldValue;
use crate::render::{DocumentRenderer, FieldDocument, RenderError};
use crate::template::OutputFormat;
use crate::utils::{cell_address, column_number_to_name};
use std::io::Cursor;
use umya_spreadsheet::{PatternValues, Worksheet};

pub const SHEET_NAME: &str = "Export";
const HEADER: [&str; 2] = ["Field", "Value"];
const HEADER_FONT_ARGB: &str = "FFFFFFFF";
const HEADER_FILL_ARGB: &str = "FF1F4E79";
const MIN_COLUMN_WIDTH: f64 = 10.0;
const MAX_COLUMN_WIDTH: f64 = 50.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxRenderer;

impl XlsxRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for XlsxRenderer {
    type Input = FieldDocument;

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Xlsx
    }

    fn render(&self, doc: &FieldDocument) -> Result<Vec<u8>, RenderError> {
        let mut book = umya_spreadsheet::new_file_empty_worksheet();
        let sheet = book
            .new_sheet(SHEET_NAME)
            .map_err(|e| RenderError::Spreadsheet(e.to_string()))?;

        let mut widths = [0usize; 2];
        for (idx, title) in HEADER.iter().enumerate() {
            let col = idx as u32 + 1;
            let addr = cell_address(col, 1);
            sheet.get_cell_mut(addr.as_str()).set_value(*title);
            style_header(sheet, &addr);
            widths[idx] = widths[idx].max(title.chars().count());
        }

        for (offset, row) in doc.rows.iter().enumerate() {
            let row_num = offset as u32 + 2;

            let label_addr = cell_address(1, row_num);
            sheet.get_cell_mut(label_addr.as_str()).set_value(row.label.as_str());
            style_body(sheet, &label_addr);
            widths[0] = widths[0].max(row.label.chars().count());

            let value_addr = cell_address(2, row_num);
            let cell = sheet.get_cell_mut(value_addr.as_str());
            match &row.value {
                FieldValue::Number(n) => match n.as_f64() {
                    Some(v) => cell.set_value_number(v),
                    None => cell.set_value(n.to_string()),
                },
                FieldValue::Bool(b) => cell.set_value_bool(*b),
                FieldValue::Text(s) => cell.set_value(s.as_str()),
            };
            style_body(sheet, &value_addr);
            widths[1] = widths[1].max(row.value.char_len());
        }

        for (idx, width) in widths.iter().enumerate() {
            let column = column_number_to_name(idx as u32 + 1);
            sheet
                .get_column_dimension_mut(column.as_str())
                .set_width((*width as f64).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH));
        }

        let mut cursor = Cursor::new(Vec::new());
        umya_spreadsheet::writer::xlsx::write_writer(&book, &mut cursor)
            .map_err(|e| RenderError::Spreadsheet(e.to_string()))?;
        tracing::debug!(template_id = %doc.template_id, rows = doc.rows.len(), "xlsx written");
        Ok(cursor.into_inner())
    }
}

fn style_header(sheet: &mut Worksheet, addr: &str) {
    let style = sheet.get_style_mut(addr);
    let font = style.get_font_mut();
    font.set_bold(true);
    font.get_color_mut().set_argb(HEADER_FONT_ARGB);
    style
        .get_fill_mut()
        .get_pattern_fill_mut()
        .set_pattern_type(PatternValues::Solid)
        .get_foreground_color_mut()
        .set_argb(HEADER_FILL_ARGB);
    thin_borders(sheet, addr);
}

fn style_body(sheet: &mut Worksheet, addr: &str) {
    sheet
        .get_style_mut(addr)
        .get_alignment_mut()
        .set_wrap_text(true);
    thin_borders(sheet, addr);
}

fn thin_borders(sheet: &mut Worksheet, addr: &str) {
    let borders = sheet.get_style_mut(addr).get_borders_mut();
    borders.get_left_border_mut().set_border_style("thin");
    borders.get_right_border_mut().set_border_style("thin");
    borders.get_top_border_mut().set_border_style("thin");
    borders.get_bottom_border_mut().set_border_style("thin");
}
