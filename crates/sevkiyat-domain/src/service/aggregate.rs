//! Delivery performance aggregation
//!
//! Rolls raw delivery rows into per-employee and per-vehicle-type totals.
//! An employee's trip count is the number of distinct stores visited per
//! selected day, not the raw row count: co-riding crew members record the
//! same visit once each, and those duplicates must not inflate anything.
//!
//! Pallet/box policy: unique-visit-deduped summation. Within each
//! (employee, day, shift) group, rows are deduplicated by
//! (store, pallets, boxes) before summing.

use std::collections::{BTreeMap, BTreeSet};

use log::warn;
use sevkiyat_types::{
    AggregateSummary, AggregationResult, DayTotals, DeliveryRecord, EmployeeAggregate, Error,
    PersonnelRecord, Position, RegisteredVehicle, Result, ShiftType, UnmatchedPolicy,
    VehicleTypeAggregate,
};

use super::dedupe::dedupe;
use super::identity::match_personnel;
use super::vehicle::{classify_vehicle, double_trip_count};

/// Set of `date|shift` keys selecting which delivery days to aggregate.
/// An empty filter passes every record.
#[derive(Debug, Clone, Default)]
pub struct DateShiftFilter(BTreeSet<String>);

impl DateShiftFilter {
    /// Pass-all filter
    pub fn all() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: chrono::NaiveDate, shift: ShiftType) {
        self.0.insert(format!("{}|{}", date, shift.key()));
    }

    /// Select both shifts of a date
    pub fn insert_date(&mut self, date: chrono::NaiveDate) {
        self.insert(date, ShiftType::Gunduz);
        self.insert(date, ShiftType::Gece);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, record: &DeliveryRecord) -> bool {
        self.0.is_empty() || self.0.contains(&record.shift_key())
    }
}

/// Working state for one resolved identity
struct EmployeeBucket<'a> {
    employee_code: Option<String>,
    position: Position,
    rows: Vec<&'a DeliveryRecord>,
}

/// Aggregate delivery records over the selected day/shift keys.
///
/// Fails only on an empty roster (the matcher could not resolve anything and
/// the run would silently produce empty output). Malformed rows and
/// unmatched names are skipped with a warning, never fatal.
pub fn aggregate(
    records: &[DeliveryRecord],
    roster: &[PersonnelRecord],
    filter: &DateShiftFilter,
    registry: &[RegisteredVehicle],
    unmatched_policy: UnmatchedPolicy,
) -> Result<AggregationResult> {
    if roster.is_empty() {
        return Err(Error::EmptyRoster);
    }

    let filtered: Vec<&DeliveryRecord> =
        records.iter().filter(|r| filter.matches(r)).collect();

    // Resolve identities and bucket rows per employee. Synthetic identities
    // (retain-raw policy) are keyed by their normalized raw name, so the
    // same misspelling always lands in the same bucket.
    let mut buckets: BTreeMap<String, EmployeeBucket<'_>> = BTreeMap::new();
    let mut synthetic: BTreeMap<String, PersonnelRecord> = BTreeMap::new();

    for record in &filtered {
        if record.employee_name.trim().is_empty() {
            warn!(
                "skipping delivery row without employee name (store {}, {})",
                record.store_code, record.date
            );
            continue;
        }

        let person: &PersonnelRecord = match match_personnel(&record.employee_name, roster) {
            Some(p) => p,
            None => match unmatched_policy {
                UnmatchedPolicy::Skip => {
                    warn!(
                        "no roster match for '{}' ({}), record skipped",
                        record.employee_name, record.date
                    );
                    continue;
                }
                UnmatchedPolicy::RetainRaw => {
                    let entry = PersonnelRecord::synthetic(&record.employee_name);
                    synthetic.entry(entry.id.clone()).or_insert(entry)
                }
            },
        };

        buckets
            .entry(person.full_name.clone())
            .or_insert_with(|| EmployeeBucket {
                employee_code: person
                    .employee_code
                    .clone()
                    .or_else(|| record.employee_code.clone()),
                position: person.position,
                rows: Vec::new(),
            })
            .rows
            .push(record);
    }

    let mut employees = Vec::with_capacity(buckets.len());
    let mut vehicle_types = Vec::new();

    for (name, bucket) in buckets {
        let (employee, vehicles) = fold_employee(&name, &bucket, registry);
        employees.push(employee);
        vehicle_types.extend(vehicles);
    }

    // Summary totals come from the globally deduplicated visit set, never
    // from summing employee aggregates: shared visits would double-count.
    let owned: Vec<DeliveryRecord> = filtered.iter().map(|r| (*r).clone()).collect();
    let visits = dedupe(&owned);
    let summary = AggregateSummary {
        total_deliveries: visits.len(),
        total_pallets: visits.iter().map(|v| v.pallets).sum(),
        total_boxes: visits.iter().map(|v| v.boxes).sum(),
    };

    Ok(AggregationResult {
        employees,
        vehicle_types,
        summary,
    })
}

fn fold_employee(
    name: &str,
    bucket: &EmployeeBucket<'_>,
    registry: &[RegisteredVehicle],
) -> (EmployeeAggregate, Vec<VehicleTypeAggregate>) {
    let mut agg = EmployeeAggregate::new(name);
    agg.employee_code = bucket.employee_code.clone();
    agg.position = bucket.position;

    // Group rows by (date, shift)
    let mut day_groups: BTreeMap<String, Vec<&DeliveryRecord>> = BTreeMap::new();
    for row in &bucket.rows {
        day_groups.entry(row.shift_key()).or_default().push(row);
    }

    for (day_key, rows) in day_groups {
        // Dedupe this employee's rows by (store, pallets, boxes) so a
        // co-rider duplicate never inflates quantities
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut totals = DayTotals::default();
        for row in rows {
            let visit = format!("{}|{}|{}", row.store_code, row.pallets, row.boxes);
            if !seen.insert(visit) {
                continue;
            }
            totals.pallets += row.pallets;
            totals.boxes += row.boxes;
            totals.stores.insert(row.store_code.clone());
        }
        totals.trips = totals.stores.len() as u32;

        agg.total_trips += totals.trips;
        agg.total_pallets += totals.pallets;
        agg.total_boxes += totals.boxes;
        agg.per_day.insert(day_key, totals);
    }

    // Day-level vehicle presence: a vehicle type counts once per day no
    // matter how many rows touched it; same for double-trip days
    let mut presence: BTreeMap<(chrono::NaiveDate, sevkiyat_types::VehicleType), (bool, bool)> =
        BTreeMap::new();
    for row in &bucket.rows {
        if row.license_plate.trim().is_empty() {
            continue;
        }
        let vtype = classify_vehicle(&row.license_plate, None, registry);
        let entry = presence.entry((row.date, vtype)).or_insert((false, false));
        entry.0 = true;
        if double_trip_count(&row.license_plate) > 0 {
            entry.1 = true;
        }
    }

    let mut per_type: BTreeMap<sevkiyat_types::VehicleType, (u32, u32)> = BTreeMap::new();
    for ((_date, vtype), (has_trip, has_double)) in presence {
        let counts = per_type.entry(vtype).or_insert((0, 0));
        if has_trip {
            counts.0 += 1;
        }
        if has_double {
            counts.1 += 1;
        }
    }

    let vehicles = per_type
        .into_iter()
        .map(|(vehicle_type, (trip_days, double_days))| VehicleTypeAggregate {
            employee_name: name.to_string(),
            vehicle_type,
            total_trip_days: trip_days,
            total_double_trip_days: double_days,
        })
        .collect();

    (agg, vehicles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sevkiyat_types::VehicleType;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn roster() -> Vec<PersonnelRecord> {
        vec![
            PersonnelRecord::new("Ali Veli")
                .with_employee_code("E1")
                .with_position(Position::Driver),
            PersonnelRecord::new("Can Demir")
                .with_employee_code("E2")
                .with_position(Position::DispatchStaff),
        ]
    }

    #[test]
    fn test_end_to_end_scenario() {
        // Duplicate co-rider row for S1 must collapse; S2 counts separately
        let records = vec![
            DeliveryRecord::new(day(1), "Ali Veli", "S1").with_quantities(2.0, 10.0),
            DeliveryRecord::new(day(1), "Ali Veli", "S1").with_quantities(2.0, 10.0),
            DeliveryRecord::new(day(1), "Ali Veli", "S2").with_quantities(1.0, 5.0),
        ];

        let result = aggregate(
            &records,
            &roster(),
            &DateShiftFilter::all(),
            &[],
            UnmatchedPolicy::Skip,
        )
        .unwrap();

        assert_eq!(result.employees.len(), 1);
        let ali = &result.employees[0];
        assert_eq!(ali.employee_name, "Ali Veli");
        assert_eq!(ali.total_trips, 2);
        assert_eq!(ali.total_pallets, 3.0);
        assert_eq!(ali.total_boxes, 15.0);

        assert_eq!(result.summary.total_deliveries, 2);
        assert_eq!(result.summary.total_pallets, 3.0);
        assert_eq!(result.summary.total_boxes, 15.0);
    }

    #[test]
    fn test_empty_roster_is_an_error() {
        let records = vec![DeliveryRecord::new(day(1), "Ali Veli", "S1")];
        let err = aggregate(
            &records,
            &[],
            &DateShiftFilter::all(),
            &[],
            UnmatchedPolicy::Skip,
        );
        assert!(matches!(err, Err(Error::EmptyRoster)));
    }

    #[test]
    fn test_unmatched_skip_drops_record() {
        let records = vec![
            DeliveryRecord::new(day(1), "Hasan Çelik", "S1").with_quantities(2.0, 10.0),
        ];
        let result = aggregate(
            &records,
            &roster(),
            &DateShiftFilter::all(),
            &[],
            UnmatchedPolicy::Skip,
        )
        .unwrap();
        assert!(result.employees.is_empty());
        // Summary still counts the visit; dedup is identity-free
        assert_eq!(result.summary.total_deliveries, 1);
    }

    #[test]
    fn test_unmatched_retain_raw_keeps_record() {
        let records = vec![
            DeliveryRecord::new(day(1), "Hasan Çelik", "S1").with_quantities(2.0, 10.0),
            DeliveryRecord::new(day(1), "HASAN ÇELİK", "S2").with_quantities(1.0, 4.0),
        ];
        let result = aggregate(
            &records,
            &roster(),
            &DateShiftFilter::all(),
            &[],
            UnmatchedPolicy::RetainRaw,
        )
        .unwrap();

        assert_eq!(result.employees.len(), 1);
        assert_eq!(result.employees[0].employee_name, "Hasan Çelik");
        assert_eq!(result.employees[0].total_trips, 2);
    }

    #[test]
    fn test_date_shift_filter() {
        let records = vec![
            DeliveryRecord::new(day(1), "Ali Veli", "S1").with_quantities(2.0, 10.0),
            DeliveryRecord::new(day(2), "Ali Veli", "S2").with_quantities(4.0, 20.0),
            DeliveryRecord::new(day(1), "Ali Veli", "S3")
                .with_quantities(1.0, 1.0)
                .with_shift(ShiftType::Gece),
        ];

        let mut filter = DateShiftFilter::all();
        filter.insert(day(1), ShiftType::Gunduz);

        let result =
            aggregate(&records, &roster(), &filter, &[], UnmatchedPolicy::Skip).unwrap();
        let ali = &result.employees[0];
        assert_eq!(ali.total_trips, 1);
        assert_eq!(ali.total_pallets, 2.0);
        assert_eq!(result.summary.total_deliveries, 1);
    }

    #[test]
    fn test_rows_without_name_are_skipped() {
        let records = vec![
            DeliveryRecord::new(day(1), "  ", "S1").with_quantities(2.0, 10.0),
            DeliveryRecord::new(day(1), "Ali Veli", "S2").with_quantities(1.0, 5.0),
        ];
        let result = aggregate(
            &records,
            &roster(),
            &DateShiftFilter::all(),
            &[],
            UnmatchedPolicy::Skip,
        )
        .unwrap();
        assert_eq!(result.employees.len(), 1);
        assert_eq!(result.employees[0].total_trips, 1);
    }

    #[test]
    fn test_vehicle_day_presence_not_additive() {
        // Three runs of the same truck on one day: one trip day, and the
        // -2 suffix makes it a double-trip day
        let records = vec![
            DeliveryRecord::new(day(1), "Ali Veli", "S1")
                .with_quantities(1.0, 1.0)
                .with_plate("34ABC123-1"),
            DeliveryRecord::new(day(1), "Ali Veli", "S2")
                .with_quantities(1.0, 2.0)
                .with_plate("34ABC123-2"),
            DeliveryRecord::new(day(2), "Ali Veli", "S1")
                .with_quantities(1.0, 1.0)
                .with_plate("34ABC123"),
        ];

        let registry = vec![RegisteredVehicle::new("34ABC123", VehicleType::Truck)];
        let result = aggregate(
            &records,
            &roster(),
            &DateShiftFilter::all(),
            &registry,
            UnmatchedPolicy::Skip,
        )
        .unwrap();

        assert_eq!(result.vehicle_types.len(), 1);
        let vt = &result.vehicle_types[0];
        assert_eq!(vt.vehicle_type, VehicleType::Truck);
        assert_eq!(vt.total_trip_days, 2);
        assert_eq!(vt.total_double_trip_days, 1);
    }

    #[test]
    fn test_average_guard_from_aggregation() {
        // Night-only filter over day-shift records: employee ends up with
        // zero trips and must report 0 averages, not NaN
        let records = vec![
            DeliveryRecord::new(day(1), "Ali Veli", "S1").with_quantities(2.0, 10.0),
        ];
        let mut filter = DateShiftFilter::all();
        filter.insert(day(1), ShiftType::Gece);

        let result =
            aggregate(&records, &roster(), &filter, &[], UnmatchedPolicy::Skip).unwrap();
        assert!(result.employees.is_empty());

        let empty = EmployeeAggregate::new("Ali Veli");
        assert_eq!(empty.average_pallets(), 0.0);
        assert_eq!(empty.average_boxes(), 0.0);
    }
}
