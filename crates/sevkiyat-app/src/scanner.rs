//! Directory scanning for batch CSV import

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use walkdir::WalkDir;

use sevkiyat_types::{Error, Result, ShiftType};

/// Recursively collect CSV files under a directory, sorted by path
pub fn scan_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::FileNotFound(dir.display().to_string()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Infer delivery date and shift from a template file name.
///
/// Import folders name sheets `YYYY-MM-DD_gunduz.csv` / `YYYY-MM-DD_gece.csv`.
pub fn infer_sheet_info(path: &Path) -> Option<(NaiveDate, ShiftType)> {
    let stem = path.file_stem()?.to_str()?;
    let (date_part, shift_part) = stem.split_once('_')?;
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    Some((date, ShiftType::from_text(shift_part)))
}

/// Validate that a path points to an existing CSV file
pub fn validate_csv(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        return Err(Error::CsvLoader(format!(
            "not a CSV file: {}",
            path.display()
        )));
    }
    Ok(())
}
