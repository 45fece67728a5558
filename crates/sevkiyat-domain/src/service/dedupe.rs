//! Record deduplication
//!
//! Several crew members can record the same physical store visit, one row
//! each. Without dedup, pallet and box totals would be multiplied by crew
//! size. Rows are collapsed by the visit key `date|store|pallets|boxes`:
//! the first occurrence fixes the quantities, later collisions only bump
//! `employee_count`.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use sevkiyat_types::{visit_key, DeliveryRecord, UniqueVisit};

/// Collapse raw delivery rows into unique visits.
///
/// Output is sorted by visit key, so shuffling the input does not change
/// the result. Quantities are never summed across colliding rows.
pub fn dedupe(records: &[DeliveryRecord]) -> Vec<UniqueVisit> {
    let mut visits: BTreeMap<String, UniqueVisit> = BTreeMap::new();

    for record in records {
        let key = visit_key(record.date, &record.store_code, record.pallets, record.boxes);
        match visits.entry(key) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().employee_count += 1;
            }
            Entry::Vacant(entry) => {
                entry.insert(UniqueVisit {
                    date: record.date,
                    store_code: record.store_code.clone(),
                    pallets: record.pallets,
                    boxes: record.boxes,
                    shift: record.shift,
                    employee_count: 1,
                });
            }
        }
    }

    visits.into_values().collect()
}
