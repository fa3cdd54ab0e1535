//! Report renderer: serializes a history sequence into a downloadable
//! binary document. Pure with respect to its input; no store access here.

use std::io::BufWriter;

use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_xlsxwriter::{Format, Workbook};

use crate::domain::EntryKind;
use crate::error::AppError;
use crate::services::history::HistoryItem;

/// Supported download formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Spreadsheet,
}

impl ReportFormat {
    /// Parses the `formato` request value. Anything but `pdf` / `excel` is
    /// rejected before any rendering starts.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "pdf" => Ok(ReportFormat::Pdf),
            "excel" => Ok(ReportFormat::Spreadsheet),
            other => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "historial.pdf",
            ReportFormat::Spreadsheet => "historial.xlsx",
        }
    }
}

/// A rendered document ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: &'static str,
}

pub fn render(history: &[HistoryItem], format: ReportFormat) -> Result<RenderedReport, AppError> {
    let bytes = match format {
        ReportFormat::Pdf => render_pdf(history)?,
        ReportFormat::Spreadsheet => render_spreadsheet(history)?,
    };

    Ok(RenderedReport {
        bytes,
        content_type: format.content_type(),
        filename: format.filename(),
    })
}

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_TOP_MM: f64 = 20.0;
const MARGIN_BOTTOM_MM: f64 = 20.0;
const ROW_STEP_MM: f64 = 8.0;

const COL_FECHA_MM: f64 = 20.0;
const COL_ACCION_MM: f64 = 60.0;
const COL_DESCRIPCION_MM: f64 = 95.0;
const COL_MONTO_MM: f64 = 165.0;

fn render_pdf(history: &[HistoryItem]) -> Result<Vec<u8>, AppError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Historial de actividades",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "contenido",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_TOP_MM;

    layer.use_text("Historial de actividades", 16.0, Mm(COL_FECHA_MM), Mm(y), &bold);
    y -= 12.0;
    draw_column_header(&layer, y, &bold);
    y -= ROW_STEP_MM;

    for item in history {
        if y < MARGIN_BOTTOM_MM {
            let (page, layer_index) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "contenido");
            layer = doc.get_page(page).get_layer(layer_index);
            y = PAGE_HEIGHT_MM - MARGIN_TOP_MM;
            draw_column_header(&layer, y, &bold);
            y -= ROW_STEP_MM;
        }

        let date = item.date.format("%Y-%m-%d").to_string();
        layer.use_text(date, 10.0, Mm(COL_FECHA_MM), Mm(y), &regular);
        layer.use_text(item.action.as_str(), 10.0, Mm(COL_ACCION_MM), Mm(y), &regular);
        layer.use_text(
            item.description.as_str(),
            10.0,
            Mm(COL_DESCRIPCION_MM),
            Mm(y),
            &regular,
        );
        layer.use_text(
            signed_amount(item),
            10.0,
            Mm(COL_MONTO_MM),
            Mm(y),
            &regular,
        );
        y -= ROW_STEP_MM;
    }

    let mut buffer = BufWriter::new(Vec::new());
    doc.save(&mut buffer).map_err(pdf_error)?;
    buffer.into_inner().map_err(|e| pdf_error(e.error()))
}

fn draw_column_header(layer: &PdfLayerReference, y: f64, font: &IndirectFontRef) {
    layer.use_text("Fecha", 11.0, Mm(COL_FECHA_MM), Mm(y), font);
    layer.use_text("Accion", 11.0, Mm(COL_ACCION_MM), Mm(y), font);
    layer.use_text("Descripcion", 11.0, Mm(COL_DESCRIPCION_MM), Mm(y), font);
    layer.use_text("Monto", 11.0, Mm(COL_MONTO_MM), Mm(y), font);
}

/// Expenses carry their sign in the printed column.
fn signed_amount(item: &HistoryItem) -> String {
    match item.action {
        EntryKind::Income => item.amount.to_string(),
        EntryKind::Expense => (-&item.amount).to_string(),
    }
}

fn render_spreadsheet(history: &[HistoryItem]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Historial").map_err(xlsx_error)?;

    let headers = ["Fecha", "Tipo", "Accion", "Descripcion", "Monto"];
    for (col, title) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *title, &bold)
            .map_err(xlsx_error)?;
    }

    for (index, item) in history.iter().enumerate() {
        let row = index as u32 + 1;
        let fecha = item.date.format("%Y-%m-%d %H:%M").to_string();
        sheet
            .write_string(row, 0, fecha.as_str())
            .map_err(xlsx_error)?;
        sheet
            .write_string(row, 1, item.source.as_str())
            .map_err(xlsx_error)?;
        sheet
            .write_string(row, 2, item.action.as_str())
            .map_err(xlsx_error)?;
        sheet
            .write_string(row, 3, item.description.as_str())
            .map_err(xlsx_error)?;
        sheet
            .write_number(row, 4, decimal_to_f64(&item.amount))
            .map_err(xlsx_error)?;
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

/// Spreadsheet cells are f64 by format; this is a display conversion only,
/// the exact value stays in the store.
fn decimal_to_f64(amount: &BigDecimal) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}

fn pdf_error(err: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("error generando pdf: {err}"))
}

fn xlsx_error(err: rust_xlsxwriter::XlsxError) -> AppError {
    AppError::Internal(format!("error generando excel: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::history::SourceKind;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn sample_history(rows: usize) -> Vec<HistoryItem> {
        (0..rows)
            .map(|index| HistoryItem {
                id: Uuid::new_v4(),
                date: Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
                    + chrono::Duration::days(index as i64),
                source: SourceKind::Ledger,
                action: if index % 2 == 0 {
                    EntryKind::Income
                } else {
                    EntryKind::Expense
                },
                description: format!("registro {index}"),
                amount: BigDecimal::from(100 + index as i64),
            })
            .collect()
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(ReportFormat::parse("pdf").unwrap(), ReportFormat::Pdf);
        assert_eq!(
            ReportFormat::parse("excel").unwrap(),
            ReportFormat::Spreadsheet
        );
    }

    #[test]
    fn rejects_unknown_format() {
        let result = ReportFormat::parse("txt");
        assert!(matches!(result, Err(AppError::UnsupportedFormat(_))));
    }

    #[test]
    fn pdf_output_starts_with_pdf_signature() {
        let report = render(&sample_history(3), ReportFormat::Pdf).unwrap();
        assert!(report.bytes.starts_with(b"%PDF"));
        assert_eq!(report.content_type, "application/pdf");
        assert_eq!(report.filename, "historial.pdf");
    }

    #[test]
    fn pdf_handles_page_overflow() {
        // Enough rows to spill onto a second page with the same layout.
        let report = render(&sample_history(80), ReportFormat::Pdf).unwrap();
        assert!(report.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn spreadsheet_output_is_a_zip_archive() {
        let report = render(&sample_history(3), ReportFormat::Spreadsheet).unwrap();
        assert!(report.bytes.starts_with(b"PK"));
        assert_eq!(
            report.content_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(report.filename, "historial.xlsx");
    }

    #[test]
    fn empty_history_still_renders() {
        assert!(!render(&[], ReportFormat::Pdf).unwrap().bytes.is_empty());
        assert!(!render(&[], ReportFormat::Spreadsheet)
            .unwrap()
            .bytes
            .is_empty());
    }

    #[test]
    fn expense_amounts_are_printed_signed() {
        let mut item = sample_history(1).remove(0);
        item.action = EntryKind::Expense;
        item.amount = BigDecimal::from(50);
        assert_eq!(signed_amount(&item), "-50");
    }
}
