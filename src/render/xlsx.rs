//! Excel output through rust_xlsxwriter.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use super::RenderError;
use crate::layout::sheet::{CellStyle, CellValue, Sheet};
use crate::layout::Align;

/// A4 in the Excel paper size table
const PAPER_A4: u8 = 9;

pub fn render(sheets: &[Sheet]) -> Result<Vec<u8>, RenderError> {
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(&sheet.name)?;
        worksheet.set_paper_size(PAPER_A4);
        if sheet.landscape {
            worksheet.set_landscape();
        } else {
            worksheet.set_portrait();
        }

        for (col, width) in &sheet.col_widths {
            worksheet.set_column_width(*col, *width)?;
        }

        for cell in &sheet.cells {
            let format = format(&cell.style);
            match &cell.value {
                Some(CellValue::Text(text)) => worksheet.write_string_with_format(cell.row, cell.col, text, &format)?,
                Some(CellValue::Number(n)) => worksheet.write_number_with_format(cell.row, cell.col, *n, &format)?,
                None => worksheet.write_blank(cell.row, cell.col, &format)?,
            };
        }

        for merge in &sheet.merges {
            worksheet.merge_range(
                merge.first.0,
                merge.first.1,
                merge.last.0,
                merge.last.1,
                &merge.text,
                &format(&merge.style),
            )?;
        }

        workbook.push_worksheet(worksheet);
    }

    Ok(workbook.save_to_buffer()?)
}

fn format(style: &CellStyle) -> Format {
    let mut format = Format::new();
    if style.bold {
        format = format.set_bold();
    }
    if style.border {
        format = format.set_border(FormatBorder::Thin);
    }
    if let Some(align) = style.align {
        format = format.set_align(match align {
            Align::Left => FormatAlign::Left,
            Align::Center => FormatAlign::Center,
            Align::Right => FormatAlign::Right,
        });
    }
    if let Some(rgb) = style.fill {
        format = format.set_background_color(Color::RGB(rgb));
    }
    if let Some(number_format) = style.number_format {
        format = format.set_num_format(number_format);
    }
    format
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dec;

    #[test]
    fn writes_an_xlsx_zip() {
        let mut sheet = Sheet::new("ZIM 2024-03", true);
        sheet.text((0, 0), "Stundennachweis", CellStyle::label());
        sheet.hours((7, 2), dec("7.5"), CellStyle::hours());
        sheet.blank((8, 2), CellStyle::grid().filled(Some(0x969696)));
        sheet.merge((38, 0), (38, 1), "Summe", CellStyle::header());
        sheet.width(0, 5.0);

        let bytes = render(&[sheet, Sheet::new("Übersicht", false)]).unwrap();
        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn funding_code_with_leading_apostrophe_still_renders() {
        let mut sheet = Sheet::new("'FZ1", false);
        sheet.text((0, 0), "Jahresnachweis", CellStyle::label());
        let bytes = render(&[sheet]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
