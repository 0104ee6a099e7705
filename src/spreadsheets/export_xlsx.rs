use crate::entities::EntitySpec;
use crate::errors::ServerError;
use crate::listview::record::{as_number, lookup};
use crate::listview::row::{ColumnKind, Row};
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Format, Workbook};

/// Writes the given rows (already filtered and sorted) with the entity's
/// columns, plus a trailing status column when the entity derives one.
pub fn export_rows_xlsx(entity: &EntitySpec, rows: &[Row]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    let columns = entity.view.columns;
    let with_status = rows.iter().any(|r| r.status.is_some());

    // Headers
    for (col, column) in columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, column.header, &bold)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", column.header, e))
            })?;
    }
    if with_status {
        worksheet
            .write_string_with_format(0, columns.len() as u16, "Status", &bold)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write status header: {}", e)))?;
    }

    // Rows
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;

        for (col, column) in columns.iter().enumerate() {
            let c = col as u16;
            let number = match column.kind {
                ColumnKind::Number | ColumnKind::Money => {
                    lookup(&row.record, column.path).and_then(as_number)
                }
                _ => None,
            };

            let written = match number {
                Some(n) => worksheet.write_number(r, c, n).map(|_| ()),
                None => {
                    let text = row.cell(column.key).unwrap_or("");
                    worksheet.write_string(r, c, text).map(|_| ())
                }
            };
            written.map_err(|e| ServerError::XlsxError(format!("Failed to write {}: {}", column.key, e)))?;
        }

        if let Some(status) = row.status {
            worksheet
                .write_string(r, columns.len() as u16, status.label())
                .map_err(|e| ServerError::XlsxError(format!("Failed to write status: {}", e)))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}

pub fn export_rows_response(entity: &EntitySpec, rows: &[Row], stamp: &str) -> ResultResp {
    let buffer = export_rows_xlsx(entity, rows)?;
    tracing::info!(entity = entity.slug, rows = rows.len(), "exported spreadsheet");
    xlsx_response(buffer, &format!("{}_{stamp}.xlsx", entity.slug))
}
