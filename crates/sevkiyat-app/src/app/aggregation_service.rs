//! Aggregation Service - Core Use Case for Delivery Performance Reports
//!
//! This service orchestrates the complete aggregation workflow:
//! 1. Guard against a missing roster
//! 2. Build the date/shift filter (explicit dates, shift, or week window)
//! 3. Run the domain pipeline
//! 4. Optionally serve/refresh an injected result cache

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use sevkiyat_domain::service::{aggregate, week_index, DateShiftFilter};
use sevkiyat_types::{
    AggregationResult, DeliveryRecord, Error, PersonnelRecord, RegisteredVehicle, ShiftType,
    UnmatchedPolicy,
};

use crate::cache::TimedCache;

/// Errors specific to the aggregation service
#[derive(Debug, Error)]
pub enum AggregationServiceError {
    #[error("Roster unavailable: {0}")]
    RosterUnavailable(String),

    #[error("Aggregation failed: {0}")]
    AggregationFailed(String),

    #[error("Store error: {0}")]
    StoreError(String),
}

impl From<Error> for AggregationServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::EmptyRoster => AggregationServiceError::RosterUnavailable(err.to_string()),
            Error::Io(_) | Error::Json(_) => AggregationServiceError::StoreError(err.to_string()),
            _ => AggregationServiceError::AggregationFailed(err.to_string()),
        }
    }
}

/// Options for one aggregation run
#[derive(Debug, Clone, Default)]
pub struct AggregationOptions {
    /// Explicit dates to include; empty means no date restriction
    pub dates: Vec<NaiveDate>,

    /// Restrict to one shift
    pub shift: Option<ShiftType>,

    /// Restrict to one fixed 7-day window (index relative to the reference)
    pub week: Option<i64>,

    /// Policy for rows without a roster match
    pub unmatched_policy: UnmatchedPolicy,
}

impl AggregationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.dates.push(date);
        self
    }

    pub fn with_shift(mut self, shift: ShiftType) -> Self {
        self.shift = Some(shift);
        self
    }

    pub fn with_week(mut self, week: i64) -> Self {
        self.week = Some(week);
        self
    }

    pub fn with_unmatched_policy(mut self, policy: UnmatchedPolicy) -> Self {
        self.unmatched_policy = policy;
        self
    }
}

/// Build the `(date, shift)` filter for a run.
///
/// Week selection expands against the day keys actually present in the
/// records, so an empty week yields an empty (non-pass-all) result only
/// when combined with date selections; a week with no matching records
/// filters everything out by matching nothing.
fn build_filter(
    records: &[DeliveryRecord],
    options: &AggregationOptions,
    week_reference: NaiveDate,
) -> DateShiftFilter {
    let shifts: Vec<ShiftType> = match options.shift {
        Some(shift) => vec![shift],
        None => vec![ShiftType::Gunduz, ShiftType::Gece],
    };

    let mut filter = DateShiftFilter::all();

    for &date in &options.dates {
        for &shift in &shifts {
            filter.insert(date, shift);
        }
    }

    if let Some(week) = options.week {
        for record in records {
            if week_index(record.date, week_reference) == week {
                for &shift in &shifts {
                    filter.insert(record.date, shift);
                }
            }
        }
        if filter.is_empty() {
            // Nothing falls into the selected week; match nothing rather
            // than falling back to pass-all
            filter.insert(week_reference - chrono::Duration::days(1), ShiftType::Izin);
        }
    } else if options.dates.is_empty() {
        if let Some(shift) = options.shift {
            // Shift-only restriction: all dates present in the records
            for record in records {
                filter.insert(record.date, shift);
            }
            if filter.is_empty() {
                filter.insert(week_reference, shift);
            }
        }
    }

    filter
}

/// Run the aggregation pipeline over a fixed snapshot of records.
pub fn run_aggregation(
    records: &[DeliveryRecord],
    roster: &[PersonnelRecord],
    registry: &[RegisteredVehicle],
    options: &AggregationOptions,
    week_reference: NaiveDate,
) -> Result<AggregationResult, AggregationServiceError> {
    if roster.is_empty() {
        return Err(AggregationServiceError::RosterUnavailable(
            "personnel roster is empty; import the roster first".to_string(),
        ));
    }

    let filter = build_filter(records, options, week_reference);
    let result = aggregate(records, roster, &filter, registry, options.unmatched_policy)?;
    Ok(result)
}

/// Cached variant: serves a fresh cached result, otherwise computes and
/// stores. The cache is owned by the caller.
pub fn run_aggregation_cached(
    records: &[DeliveryRecord],
    roster: &[PersonnelRecord],
    registry: &[RegisteredVehicle],
    options: &AggregationOptions,
    week_reference: NaiveDate,
    cache: &mut TimedCache<AggregationResult>,
    now: DateTime<Utc>,
) -> Result<AggregationResult, AggregationServiceError> {
    if let Some(cached) = cache.get(now) {
        return Ok(cached.clone());
    }

    let result = run_aggregation(records, roster, registry, options, week_reference)?;
    cache.put(result.clone(), now);
    Ok(result)
}
