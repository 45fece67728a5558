//! CSV loaders for delivery records
//!
//! Handles Windows-1254 encoded CSV files exported from legacy Turkish
//! back-office systems. Two shapes are supported: the fixed-column delivery
//! sheet template and the named-header records table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use encoding_rs::WINDOWS_1254;
use log::warn;
use thiserror::Error;

use sevkiyat_types::{DeliveryRecord, ShiftType};

#[derive(Error, Debug)]
pub enum CsvLoaderError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid date format in row {row}: {value}")]
    InvalidDate { row: usize, value: String },

    #[error("Invalid number format in row {row}, column {column}: {value}")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

// Column offsets of the delivery sheet template. These positions are a
// contract with the upstream spreadsheet and must not change.
const COL_STORE: usize = 0;
const COL_PALLETS: usize = 1;
const COL_BOXES: usize = 2;
const COL_PLATE: usize = 3;
const COL_DRIVER: usize = 4;
const COL_HELPER1: usize = 5;
const COL_HELPER2: usize = 6;

/// Load a fixed-column delivery sheet.
///
/// Each sheet row describes one store visit; the row fans out to one
/// `DeliveryRecord` per crew member on board (driver plus up to two helper
/// staff), all sharing the same store/pallet/box values. Date, shift, and
/// sheet label are not in the template and come from the caller.
pub fn load_template_sheet<P: AsRef<Path>>(
    path: P,
    date: NaiveDate,
    shift: ShiftType,
    sheet_name: &str,
) -> Result<Vec<DeliveryRecord>, CsvLoaderError> {
    let decoded = read_text(path.as_ref())?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(decoded.as_bytes());

    let mut records = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row_num = row_idx + 2; // header is row 1

        let store_code = record.get(COL_STORE).unwrap_or("");
        if store_code.is_empty() {
            continue;
        }

        let pallets = parse_f64(record.get(COL_PALLETS).unwrap_or("0"), row_num, "palet")?;
        let boxes = parse_f64(record.get(COL_BOXES).unwrap_or("0"), row_num, "koli")?;
        let plate = record.get(COL_PLATE).unwrap_or("").to_string();

        let crew = [
            record.get(COL_DRIVER).unwrap_or(""),
            record.get(COL_HELPER1).unwrap_or(""),
            record.get(COL_HELPER2).unwrap_or(""),
        ];

        for name in crew.into_iter().filter(|n| !n.is_empty()) {
            records.push(
                DeliveryRecord::new(date, name, store_code)
                    .with_quantities(pallets, boxes)
                    .with_plate(plate.clone())
                    .with_shift(shift)
                    .with_sheet_name(sheet_name),
            );
        }
    }

    Ok(records)
}

/// Load the named-header records table (the persisted collection export).
///
/// Expected headers:
/// date, employee_code, employee_name, store_codes, pallets, boxes,
/// date_shift_type, sheet_name
///
/// `store_codes` may hold several comma-joined codes; the row fans out to
/// one record per store, with the quantities riding on the first record so
/// totals are preserved.
pub fn load_records_table<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<DeliveryRecord>, CsvLoaderError> {
    let decoded = read_text(path.as_ref())?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(decoded.as_bytes());

    let headers = reader.headers()?.clone();
    let col = |name: &str| -> Result<usize, CsvLoaderError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CsvLoaderError::MissingColumn(name.to_string()))
    };

    let idx_date = col("date")?;
    let idx_name = col("employee_name")?;
    let idx_stores = col("store_codes")?;
    let idx_pallets = col("pallets")?;
    let idx_boxes = col("boxes")?;
    let idx_shift = col("date_shift_type")?;
    let idx_code = headers.iter().position(|h| h == "employee_code");
    let idx_sheet = headers.iter().position(|h| h == "sheet_name");

    let mut records = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let row_num = row_idx + 2;

        let date_str = record.get(idx_date).unwrap_or("");
        let date = match parse_date(date_str, row_num) {
            Ok(d) => d,
            Err(e) => {
                // Malformed dates skip the row, never abort the load
                warn!("{}", e);
                continue;
            }
        };

        let employee_name = record.get(idx_name).unwrap_or("").to_string();
        let pallets = parse_f64(record.get(idx_pallets).unwrap_or("0"), row_num, "pallets")?;
        let boxes = parse_f64(record.get(idx_boxes).unwrap_or("0"), row_num, "boxes")?;
        let shift = ShiftType::from_text(record.get(idx_shift).unwrap_or(""));

        let employee_code = idx_code
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let sheet_name = idx_sheet
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .to_string();

        let stores: Vec<&str> = record
            .get(idx_stores)
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        for (i, store_code) in stores.iter().enumerate() {
            let (p, b) = if i == 0 { (pallets, boxes) } else { (0.0, 0.0) };
            let mut rec = DeliveryRecord::new(date, employee_name.clone(), *store_code)
                .with_quantities(p, b)
                .with_shift(shift)
                .with_sheet_name(sheet_name.clone());
            if let Some(ref code) = employee_code {
                rec = rec.with_employee_code(code.clone());
            }
            records.push(rec);
        }
    }

    Ok(records)
}

/// Read a sheet file as UTF-8, falling back to Windows-1254 (Turkish legacy
/// exports) when the bytes are not valid UTF-8.
///
/// The order matters: Windows-1254 maps nearly every byte, so decoding UTF-8
/// input with it would silently mangle Turkish letters instead of failing.
pub(crate) fn read_text(path: &Path) -> Result<String, CsvLoaderError> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            warn!(
                "{} is not valid UTF-8, decoding as Windows-1254",
                path.display()
            );
            let (decoded, _, had_errors) = WINDOWS_1254.decode(err.as_bytes());
            if had_errors {
                warn!(
                    "some characters in {} could not be decoded from Windows-1254",
                    path.display()
                );
            }
            Ok(decoded.into_owned())
        }
    }
}

pub(crate) fn parse_date(s: &str, row: usize) -> Result<NaiveDate, CsvLoaderError> {
    // ISO plus the dotted and slashed forms common in Turkish exports
    let formats = ["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d", "%d/%m/%Y"];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(CsvLoaderError::InvalidDate {
        row,
        value: s.to_string(),
    })
}

pub(crate) fn parse_f64(s: &str, row: usize, column: &str) -> Result<f64, CsvLoaderError> {
    let cleaned = s.trim().replace('.', "").replace(',', ".");
    // Turkish exports use '.' for thousands and ',' for decimals; plain
    // ASCII numbers must still parse
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    if let Ok(v) = s.trim().parse::<f64>() {
        return Ok(v);
    }

    cleaned.parse().map_err(|_| CsvLoaderError::InvalidNumber {
        row,
        column: column.to_string(),
        value: s.to_string(),
    })
}
