use rust_xlsxwriter::{Format, Workbook};

/// Render headers plus rows as a single-sheet workbook.
pub fn render(sheet_name: &str, headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(|e| format!("Failed to name worksheet: {e}"))?;

    let bold = Format::new().set_bold();

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| format!("Failed to write header: {e}"))?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write_string((row_idx + 1) as u32, col as u16, value)
                .map_err(|e| format!("Failed to write cell: {e}"))?;
        }
    }

    // Column widths sized to the longest cell, matching the spreadsheet
    // exports users get from the reporting page.
    for (col, header) in headers.iter().enumerate() {
        let max_len = rows
            .iter()
            .map(|row| row.get(col).map(|v| v.len()).unwrap_or(0))
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(10);
        worksheet
            .set_column_width(col as u16, (max_len + 2).min(60) as f64)
            .map_err(|e| format!("Failed to size column: {e}"))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Failed to build workbook: {e}"))
}
