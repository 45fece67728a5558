//! Data model for delivery tracking and performance aggregation

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalize free text for comparison: uppercase, fold Turkish diacritics to
/// their ASCII base letters, drop everything but letters/digits/spaces, and
/// collapse whitespace runs.
pub fn normalize_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = true;
    for c in s.chars() {
        let mapped = match c {
            'ç' | 'Ç' => Some('C'),
            'ğ' | 'Ğ' => Some('G'),
            'ı' | 'İ' | 'i' | 'I' => Some('I'),
            'ö' | 'Ö' => Some('O'),
            'ş' | 'Ş' => Some('S'),
            'ü' | 'Ü' => Some('U'),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase()),
            c if c.is_whitespace() => None,
            _ => continue,
        };
        match mapped {
            Some(m) => {
                out.push(m);
                last_was_space = false;
            }
            None => {
                if !last_was_space {
                    out.push(' ');
                    last_was_space = true;
                }
            }
        }
    }
    out.trim_end().to_string()
}

/// Work shift of a delivery day or a personnel record
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    /// Day shift (gündüz)
    #[default]
    Gunduz,
    /// Night shift (gece)
    Gece,
    /// On leave (izinli, raporlu, yıllık izin)
    Izin,
}

impl ShiftType {
    /// Classify free text from roster or spreadsheet cells.
    ///
    /// Ordered rules: leave variants first (so "yıllık izin gece devri"
    /// stays a leave entry), then night markers, day shift as the default.
    pub fn from_text(s: &str) -> Self {
        let n = normalize_text(s);
        if n.contains("IZIN") || n.contains("RAPOR") {
            ShiftType::Izin
        } else if n.contains("GECE") {
            ShiftType::Gece
        } else {
            ShiftType::Gunduz
        }
    }

    /// Stable key used in `(date, shift)` filter strings
    pub fn key(&self) -> &'static str {
        match self {
            ShiftType::Gunduz => "gunduz",
            ShiftType::Gece => "gece",
            ShiftType::Izin => "izin",
        }
    }

    /// Display label in Turkish
    pub fn label(&self) -> &'static str {
        match self {
            ShiftType::Gunduz => "Gündüz",
            ShiftType::Gece => "Gece",
            ShiftType::Izin => "İzinli",
        }
    }
}

/// Personnel position classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Driver,
    DispatchStaff,
    Other,
}

impl Position {
    /// Classify the free-text position field from the roster.
    ///
    /// Ordered rules over normalized text: driver markers ("ŞOFÖR" in any
    /// spelling) win, then dispatch staff markers ("SEVKİYAT", "ELEMANI").
    pub fn from_text(s: &str) -> Self {
        let n = normalize_text(s);
        if n.contains("SOFOR") {
            Position::Driver
        } else if n.contains("SEVKIYAT") || n.contains("ELEMANI") {
            Position::DispatchStaff
        } else {
            Position::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Driver => "Şoför",
            Position::DispatchStaff => "Sevkiyat Elemanı",
            Position::Other => "Diğer",
        }
    }
}

/// Vehicle category used in per-type trip rollups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleType {
    Truck,
    Van,
    PanelVan,
    Unknown,
}

impl VehicleType {
    /// Parse an explicit type field. Returns `Unknown` when the text does
    /// not carry a recognized vehicle keyword.
    ///
    /// "PANEL" is checked before "VAN" and "KAMYONET" before "KAMYON"
    /// because the longer keywords contain the shorter ones.
    pub fn from_text(s: &str) -> Self {
        let n = normalize_text(s).replace(' ', "");
        if n.is_empty() {
            return VehicleType::Unknown;
        }
        if n.contains("PANEL") {
            VehicleType::PanelVan
        } else if n.contains("KAMYONET") || n.contains("VAN") {
            VehicleType::Van
        } else if n.contains("KAMYON") || n.contains("TIR") {
            VehicleType::Truck
        } else {
            VehicleType::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Truck => "Kamyon",
            VehicleType::Van => "Kamyonet",
            VehicleType::PanelVan => "Panelvan",
            VehicleType::Unknown => "Bilinmiyor",
        }
    }
}

/// What to do with a delivery row whose employee name has no roster match
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum UnmatchedPolicy {
    /// Drop the record with a warning
    #[default]
    Skip,
    /// Keep the record under a synthetic identity built from the raw name
    RetainRaw,
}

/// A single raw delivery row, as ingested from a spreadsheet or the persisted
/// records table. Immutable once read; several rows may describe the same
/// physical store visit when crew members co-ride.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub date: NaiveDate,
    /// Free-text employee name as written in the source sheet
    pub employee_name: String,
    #[serde(default)]
    pub employee_code: Option<String>,
    pub store_code: String,
    pub pallets: f64,
    pub boxes: f64,
    /// License plate, possibly carrying a `-N` trip-sequence suffix
    #[serde(default)]
    pub license_plate: String,
    pub shift: ShiftType,
    /// Source sheet label (e.g. "1 Temmuz Gündüz")
    #[serde(default)]
    pub sheet_name: String,
}

impl DeliveryRecord {
    pub fn new(date: NaiveDate, employee_name: impl Into<String>, store_code: impl Into<String>) -> Self {
        Self {
            date,
            employee_name: employee_name.into(),
            employee_code: None,
            store_code: store_code.into(),
            pallets: 0.0,
            boxes: 0.0,
            license_plate: String::new(),
            shift: ShiftType::Gunduz,
            sheet_name: String::new(),
        }
    }

    pub fn with_quantities(mut self, pallets: f64, boxes: f64) -> Self {
        self.pallets = pallets;
        self.boxes = boxes;
        self
    }

    pub fn with_plate(mut self, plate: impl Into<String>) -> Self {
        self.license_plate = plate.into();
        self
    }

    pub fn with_shift(mut self, shift: ShiftType) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_employee_code(mut self, code: impl Into<String>) -> Self {
        self.employee_code = Some(code.into());
        self
    }

    pub fn with_sheet_name(mut self, sheet: impl Into<String>) -> Self {
        self.sheet_name = sheet.into();
        self
    }

    /// `(date, shift)` key used for filtering and grouping
    pub fn shift_key(&self) -> String {
        format!("{}|{}", self.date, self.shift.key())
    }
}

/// Canonical roster entry for one employee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonnelRecord {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub employee_code: Option<String>,
    pub position: Position,
    pub shift: ShiftType,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl PersonnelRecord {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            full_name: full_name.into(),
            employee_code: None,
            position: Position::Other,
            shift: ShiftType::Gunduz,
            is_active: true,
        }
    }

    pub fn with_employee_code(mut self, code: impl Into<String>) -> Self {
        self.employee_code = Some(code.into());
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_shift(mut self, shift: ShiftType) -> Self {
        self.shift = shift;
        self
    }

    /// Placeholder identity built from a raw name that had no roster match
    /// (used by the retain-raw unmatched policy)
    pub fn synthetic(raw_name: &str) -> Self {
        Self {
            id: format!("raw:{}", normalize_text(raw_name)),
            full_name: raw_name.trim().to_string(),
            employee_code: None,
            position: Position::Other,
            shift: ShiftType::Gunduz,
            is_active: true,
        }
    }
}

/// Registry entry mapping a license plate to its vehicle category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredVehicle {
    pub id: String,
    pub license_plate: String,
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub name: Option<String>,
    pub registered_at: chrono::DateTime<chrono::Utc>,
}

impl RegisteredVehicle {
    pub fn new(license_plate: impl Into<String>, vehicle_type: VehicleType) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            license_plate: license_plate.into(),
            vehicle_type,
            name: None,
            registered_at: chrono::Utc::now(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// One deduplicated store visit. Several raw rows sharing the visit key
/// collapse into a single `UniqueVisit`; only `employee_count` grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueVisit {
    pub date: NaiveDate,
    pub store_code: String,
    pub pallets: f64,
    pub boxes: f64,
    pub shift: ShiftType,
    /// How many crew members recorded this visit
    pub employee_count: u32,
}

impl UniqueVisit {
    /// Dedup key: `date|store|pallets|boxes`
    pub fn key(&self) -> String {
        visit_key(self.date, &self.store_code, self.pallets, self.boxes)
    }
}

/// Dedup key shared between raw records and visits
pub fn visit_key(date: NaiveDate, store_code: &str, pallets: f64, boxes: f64) -> String {
    format!("{}|{}|{}|{}", date, store_code, pallets, boxes)
}

/// Per-day totals inside an employee aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayTotals {
    pub trips: u32,
    pub pallets: f64,
    pub boxes: f64,
    pub stores: BTreeSet<String>,
}

/// Rollup of one employee over the selected day/shift keys.
///
/// Built fresh per aggregation run; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeAggregate {
    pub employee_name: String,
    #[serde(default)]
    pub employee_code: Option<String>,
    pub position: Position,
    /// Count of distinct stores visited across selected day keys,
    /// not the raw row count
    pub total_trips: u32,
    pub total_pallets: f64,
    pub total_boxes: f64,
    pub per_day: BTreeMap<String, DayTotals>,
}

impl EmployeeAggregate {
    pub fn new(employee_name: impl Into<String>) -> Self {
        Self {
            employee_name: employee_name.into(),
            employee_code: None,
            position: Position::Other,
            total_trips: 0,
            total_pallets: 0.0,
            total_boxes: 0.0,
            per_day: BTreeMap::new(),
        }
    }

    /// Average pallets per trip; 0 when no trips (never NaN)
    pub fn average_pallets(&self) -> f64 {
        if self.total_trips == 0 {
            0.0
        } else {
            self.total_pallets / self.total_trips as f64
        }
    }

    /// Average boxes per trip; 0 when no trips (never NaN)
    pub fn average_boxes(&self) -> f64 {
        if self.total_trips == 0 {
            0.0
        } else {
            self.total_boxes / self.total_trips as f64
        }
    }

    pub fn days_worked(&self) -> usize {
        self.per_day.len()
    }
}

/// Day-level vehicle usage rollup for one (employee, vehicle type) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleTypeAggregate {
    pub employee_name: String,
    pub vehicle_type: VehicleType,
    /// Days on which the employee drove this vehicle type at least once
    pub total_trip_days: u32,
    /// Days on which at least one plate decoded to a double trip
    pub total_double_trip_days: u32,
}

/// Operation-wide totals computed from the deduplicated visit set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub total_deliveries: usize,
    pub total_pallets: f64,
    pub total_boxes: f64,
}

/// Full result of one aggregation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    pub employees: Vec<EmployeeAggregate>,
    pub vehicle_types: Vec<VehicleTypeAggregate>,
    pub summary: AggregateSummary,
}
