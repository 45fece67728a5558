//! Personnel roster CSV loader

use std::path::Path;

use log::warn;

use sevkiyat_types::{PersonnelRecord, Position, ShiftType};

use crate::csv_loader::{read_text, CsvLoaderError};

/// Load the personnel roster from a CSV file.
///
/// Expected headers: full_name, employee_code, position, shift_type,
/// is_active. Position and shift are free text and go through the ordered
/// classifiers; rows without a name are skipped with a warning.
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Vec<PersonnelRecord>, CsvLoaderError> {
    let decoded = read_text(path.as_ref())?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(decoded.as_bytes());

    let headers = reader.headers()?.clone();
    let idx_name = headers
        .iter()
        .position(|h| h == "full_name")
        .ok_or_else(|| CsvLoaderError::MissingColumn("full_name".to_string()))?;
    let idx_code = headers.iter().position(|h| h == "employee_code");
    let idx_position = headers.iter().position(|h| h == "position");
    let idx_shift = headers.iter().position(|h| h == "shift_type");
    let idx_active = headers.iter().position(|h| h == "is_active");

    let mut roster = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;

        let full_name = record.get(idx_name).unwrap_or("");
        if full_name.is_empty() {
            warn!("skipping roster row {} without full_name", row_idx + 2);
            continue;
        }

        let mut person = PersonnelRecord::new(full_name);
        if let Some(code) = idx_code.and_then(|i| record.get(i)).filter(|s| !s.is_empty()) {
            person = person.with_employee_code(code);
        }
        if let Some(pos) = idx_position.and_then(|i| record.get(i)) {
            person = person.with_position(Position::from_text(pos));
        }
        if let Some(shift) = idx_shift.and_then(|i| record.get(i)) {
            person = person.with_shift(ShiftType::from_text(shift));
        }
        person.is_active = idx_active
            .and_then(|i| record.get(i))
            .map(parse_active_flag)
            .unwrap_or(true);

        roster.push(person);
    }

    Ok(roster)
}

fn parse_active_flag(s: &str) -> bool {
    let s = s.trim().to_lowercase();
    // Blank cells mean active
    !matches!(s.as_str(), "0" | "false" | "hayir" | "hayır" | "pasif")
}
