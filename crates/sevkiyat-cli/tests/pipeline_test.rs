//! End-to-end pipeline test
//!
//! Writes delivery sheet and roster fixtures to a temp directory, runs the
//! full import → reconcile → aggregate → export flow, and checks the
//! resulting report totals against hand-computed values.

use std::fs;
use std::io::Write;

use sevkiyat_app::app::{run_aggregation, AggregationOptions};
use sevkiyat_app::export::export_to_excel;
use sevkiyat_app::repository::open_delivery_repo_at;
use sevkiyat_app::scanner::{infer_sheet_info, scan_csv_files};
use sevkiyat_domain::repository::DeliveryRecordRepository;
use sevkiyat_infra::csv_loader::load_template_sheet;
use sevkiyat_infra::roster_loader::load_roster;
use sevkiyat_types::{DeliveryRecord, PersonnelRecord, VehicleType};

fn reference() -> chrono::NaiveDate {
    // A Sunday
    chrono::NaiveDate::from_ymd_opt(2025, 6, 29).unwrap()
}

/// Two stores on one day, driver and helper co-riding, double-trip plate.
fn write_sheet(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("2025-06-30_gunduz.csv");
    let mut f = fs::File::create(&path).unwrap();
    writeln!(f, "magaza,palet,koli,plaka,sofor,yardimci1,yardimci2").unwrap();
    writeln!(f, "A001,\"1,5\",5,34 ABC 123-2,Ahmet Yılmaz,Mehmet Demir,").unwrap();
    writeln!(f, "B002,\"1,5\",10,34 ABC 123-2,Ahmet Yılmaz,Mehmet Demir,").unwrap();
    path
}

fn write_roster(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("roster.csv");
    let mut f = fs::File::create(&path).unwrap();
    writeln!(f, "full_name,employee_code,position,shift_type,is_active").unwrap();
    // Spellings differ from the sheet on purpose: case and diacritics must
    // not affect reconciliation.
    writeln!(f, "AHMET YILMAZ,E1,ŞOFÖR,gunduz,1").unwrap();
    writeln!(f, "mehmet demir,E2,SEVKİYAT ELEMANI,gunduz,1").unwrap();
    path
}

fn load_fixture_records(dir: &std::path::Path) -> Vec<DeliveryRecord> {
    let files = scan_csv_files(dir).unwrap();
    let mut records = Vec::new();
    for file in files {
        let Some((date, shift)) = infer_sheet_info(&file) else {
            continue;
        };
        let sheet_name = file.file_stem().unwrap().to_string_lossy().into_owned();
        records.extend(load_template_sheet(&file, date, shift, &sheet_name).unwrap());
    }
    records
}

#[test]
fn full_pipeline_totals() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path());
    let roster_path = write_roster(dir.path());

    let records = load_fixture_records(dir.path());
    // 2 store rows x 2 crew members
    assert_eq!(records.len(), 4);

    let roster = load_roster(&roster_path).unwrap();
    assert_eq!(roster.len(), 2);

    let options = AggregationOptions::new();
    let result = run_aggregation(&records, &roster, &[], &options, reference()).unwrap();

    // Co-rider duplicates collapse in the dedup summary: two unique visits
    assert_eq!(result.summary.total_deliveries, 2);
    assert!((result.summary.total_pallets - 3.0).abs() < 1e-9);
    assert!((result.summary.total_boxes - 15.0).abs() < 1e-9);

    // Per employee: two distinct stores = two trips, quantities summed once
    assert_eq!(result.employees.len(), 2);
    for emp in &result.employees {
        assert_eq!(emp.total_trips, 2, "{}", emp.employee_name);
        assert!((emp.total_pallets - 3.0).abs() < 1e-9);
        assert!((emp.total_boxes - 15.0).abs() < 1e-9);
        assert_eq!(emp.days_worked(), 1);
    }

    // Canonical roster names carried through, not the sheet spellings
    let names: Vec<&str> = result
        .employees
        .iter()
        .map(|e| e.employee_name.as_str())
        .collect();
    assert!(names.contains(&"AHMET YILMAZ"));
    assert!(names.contains(&"mehmet demir"));

    // Plate suffix -2 means one double-trip day; no registry, keyword miss,
    // so the truck default applies
    assert_eq!(result.vehicle_types.len(), 2);
    for v in &result.vehicle_types {
        assert_eq!(v.vehicle_type, VehicleType::Truck);
        assert_eq!(v.total_trip_days, 1);
        assert_eq!(v.total_double_trip_days, 1);
    }
}

#[test]
fn week_filter_excludes_other_windows() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path());
    let roster_path = write_roster(dir.path());

    let records = load_fixture_records(dir.path());
    let roster = load_roster(&roster_path).unwrap();

    // 2025-06-30 sits in week 0 of the 2025-06-29 reference
    let result = run_aggregation(
        &records,
        &roster,
        &[],
        &AggregationOptions::new().with_week(0),
        reference(),
    )
    .unwrap();
    assert_eq!(result.summary.total_deliveries, 2);

    let empty = run_aggregation(
        &records,
        &roster,
        &[],
        &AggregationOptions::new().with_week(5),
        reference(),
    )
    .unwrap();
    assert_eq!(empty.summary.total_deliveries, 0);
    assert!(empty.employees.iter().all(|e| e.total_trips == 0));
}

#[test]
fn empty_roster_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path());

    let records = load_fixture_records(dir.path());
    let roster: Vec<PersonnelRecord> = Vec::new();

    let err = run_aggregation(
        &records,
        &roster,
        &[],
        &AggregationOptions::new(),
        reference(),
    );
    assert!(err.is_err());
}

#[test]
fn records_survive_repository_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path());

    let records = load_fixture_records(dir.path());

    let data_dir = dir.path().join("data");
    {
        let repo = open_delivery_repo_at(data_dir.clone()).unwrap();
        repo.save_all(&records).unwrap();
    }

    let repo = open_delivery_repo_at(data_dir).unwrap();
    let reloaded = repo.find_all().unwrap();
    assert_eq!(reloaded.len(), records.len());
    assert_eq!(reloaded[0].store_code, "A001");
}

#[test]
fn excel_export_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(dir.path());
    let roster_path = write_roster(dir.path());

    let records = load_fixture_records(dir.path());
    let roster = load_roster(&roster_path).unwrap();
    let result =
        run_aggregation(&records, &roster, &[], &AggregationOptions::new(), reference()).unwrap();

    let out = dir.path().join("rapor.xlsx");
    export_to_excel(&result, &out).unwrap();

    let meta = fs::metadata(&out).unwrap();
    assert!(meta.len() > 0);
}
