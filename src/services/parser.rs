//! Uploaded roster file parsing.
//!
//! Accepts `.csv`, `.xls` and `.xlsx`. CSV goes through the quote-aware
//! `csv` reader (fields may embed commas/quotes); Excel formats go through
//! `calamine`, first worksheet only. Every cell is coerced to a string at
//! this boundary; spreadsheet libraries hand back floats for numeric
//! cells, and a phone column rendered as `9876543210.0` would poison the
//! whole pipeline downstream.

use std::io::{Cursor, Read, Seek};

use calamine::{DataType, Range, Reader, Xls, Xlsx};
use tracing::warn;

use crate::defaults::MAX_UPLOAD_ROWS;
use crate::error::UploadError;
use crate::types::{ParsedSheet, RawRow};

/// Supported roster file formats, gated on the declared extension before
/// any parse is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Xls,
    Xlsx,
}

impl SheetFormat {
    pub fn from_filename(filename: &str) -> Result<Self, UploadError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(SheetFormat::Csv),
            "xls" => Ok(SheetFormat::Xls),
            "xlsx" => Ok(SheetFormat::Xlsx),
            _ => Err(UploadError::UnsupportedExtension(filename.to_string())),
        }
    }
}

/// Parse an uploaded file into columns + raw rows.
///
/// Fully-empty rows are skipped. At most [`MAX_UPLOAD_ROWS`] data rows are
/// kept, in file order; the overflow is dropped and surfaced through
/// `ParsedSheet::truncated` (a warning, not a failure). Zero data rows is
/// an error; the caller resets the session.
pub fn parse_sheet(bytes: &[u8], format: SheetFormat) -> Result<ParsedSheet, UploadError> {
    let sheet = match format {
        SheetFormat::Csv => parse_csv(bytes)?,
        SheetFormat::Xlsx => {
            let workbook = Xlsx::new(Cursor::new(bytes))
                .map_err(|e| UploadError::Parse(e.to_string()))?;
            parse_workbook(workbook)?
        }
        SheetFormat::Xls => {
            let workbook = Xls::new(Cursor::new(bytes))
                .map_err(|e| UploadError::Parse(e.to_string()))?;
            parse_workbook(workbook)?
        }
    };

    if sheet.rows.is_empty() {
        return Err(UploadError::NoRows);
    }
    if sheet.truncated {
        warn!(
            "uploaded file exceeded the {} row cap, keeping the first {} rows",
            MAX_UPLOAD_ROWS, MAX_UPLOAD_ROWS
        );
    }
    Ok(sheet)
}

fn parse_csv(bytes: &[u8]) -> Result<ParsedSheet, UploadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut truncated = false;

    for result in reader.records() {
        let record = result?;
        let mut cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        cells.resize(columns.len(), String::new());

        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        if rows.len() == MAX_UPLOAD_ROWS {
            truncated = true;
            break;
        }
        rows.push(RawRow { index: rows.len(), cells });
    }

    Ok(ParsedSheet { columns, rows, truncated })
}

fn parse_workbook<RS, R>(mut workbook: R) -> Result<ParsedSheet, UploadError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| UploadError::Parse("workbook contains no worksheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| UploadError::Parse(e.to_string()))?;

    rows_from_range(&range)
}

fn rows_from_range(range: &Range<DataType>) -> Result<ParsedSheet, UploadError> {
    let mut rows_iter = range.rows();
    let header = rows_iter
        .next()
        .ok_or_else(|| UploadError::Parse("worksheet is empty".to_string()))?;

    let columns: Vec<String> = header.iter().map(cell_to_string).collect();

    let mut rows = Vec::new();
    let mut truncated = false;

    for row in rows_iter {
        let mut cells: Vec<String> = row.iter().map(cell_to_string).collect();
        cells.resize(columns.len(), String::new());

        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        if rows.len() == MAX_UPLOAD_ROWS {
            truncated = true;
            break;
        }
        rows.push(RawRow { index: rows.len(), cells });
    }

    Ok(ParsedSheet { columns, rows, truncated })
}

/// Coerce a spreadsheet cell to a trimmed string. Whole-number floats are
/// rendered without a fractional part so phone columns survive intact.
fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(s) => s.trim().to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{}", *f as i64),
        DataType::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}
