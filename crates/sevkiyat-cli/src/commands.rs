//! Command handlers

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;

use crate::cli::{Cli, Commands, PersonnelAction, ShiftArg, VehicleAction};
use crate::output::output_result;
use sevkiyat_app::app::{run_aggregation_cached, AggregationOptions};
use sevkiyat_app::cache::TimedCache;
use sevkiyat_app::config::Config;
use sevkiyat_app::export::export_to_excel;
use sevkiyat_app::repository::{open_delivery_repo, open_personnel_repo, open_vehicle_repo};
use sevkiyat_app::scanner::{infer_sheet_info, scan_csv_files};
use sevkiyat_domain::repository::{
    DeliveryRecordRepository, PersonnelRepository, VehicleRegistryRepository,
};
use sevkiyat_domain::service::bucket_into_weeks;
use sevkiyat_infra::csv_loader::{load_records_table, load_template_sheet};
use sevkiyat_infra::roster_loader::load_roster;
use sevkiyat_types::{
    DeliveryRecord, Error, OutputFormat, PersonnelRecord, RegisteredVehicle, Result, ShiftType,
    UnmatchedPolicy,
};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(format) = cli.format {
        config.output_format = format;
    }

    match &cli.command {
        Commands::Aggregate {
            records,
            roster,
            dates,
            shift,
            week,
            reference,
            unmatched,
            excel,
        } => cmd_aggregate(
            &config,
            records.as_deref(),
            roster.as_deref(),
            dates,
            *shift,
            *week,
            *reference,
            *unmatched,
            excel.as_deref(),
        ),

        Commands::Import { folder, replace } => {
            cmd_import(&config, folder, *replace, cli.verbose)
        }

        Commands::Personnel { action } => match action {
            PersonnelAction::Import { roster } => cmd_personnel_import(&config, roster),
            PersonnelAction::List => cmd_personnel_list(&config),
        },

        Commands::Vehicles { action } => match action {
            VehicleAction::Add {
                plate,
                vehicle_type,
                name,
            } => cmd_vehicles_add(&config, plate, (*vehicle_type).into(), name.clone()),
            VehicleAction::List => cmd_vehicles_list(&config),
        },

        Commands::Weeks { records, reference } => {
            cmd_weeks(&config, records.as_deref(), *reference)
        }

        Commands::Config {
            show,
            set_data_dir,
            set_reference,
            set_unmatched,
            set_output,
            reset,
        } => cmd_config(
            *show,
            set_data_dir.clone(),
            *set_reference,
            *set_unmatched,
            *set_output,
            *reset,
        ),
    }
}

/// Load delivery records from an explicit CSV or the stored records
fn load_records(config: &Config, path: Option<&Path>) -> Result<Vec<DeliveryRecord>> {
    match path {
        Some(path) => load_records_table(path).map_err(|e| Error::CsvLoader(e.to_string())),
        None => open_delivery_repo(config)?.find_all(),
    }
}

/// Load the roster from an explicit CSV or the stored roster
fn load_roster_records(config: &Config, path: Option<&Path>) -> Result<Vec<PersonnelRecord>> {
    match path {
        Some(path) => load_roster(path).map_err(|e| Error::CsvLoader(e.to_string())),
        None => open_personnel_repo(config)?.find_all(),
    }
}

fn cmd_aggregate(
    config: &Config,
    records_path: Option<&Path>,
    roster_path: Option<&Path>,
    dates: &[NaiveDate],
    shift: Option<ShiftArg>,
    week: Option<i64>,
    reference: Option<NaiveDate>,
    unmatched: Option<UnmatchedPolicy>,
    excel: Option<&Path>,
) -> Result<()> {
    let records = load_records(config, records_path)?;
    let roster = load_roster_records(config, roster_path)?;
    let registry = open_vehicle_repo(config)?.find_all()?;

    let mut options = AggregationOptions::new()
        .with_unmatched_policy(unmatched.unwrap_or(config.unmatched_policy));
    for &date in dates {
        options = options.with_date(date);
    }
    if let Some(shift) = shift {
        options = options.with_shift(shift.into());
    }
    if let Some(week) = week {
        options = options.with_week(week);
    }

    let week_reference = reference.unwrap_or(config.week_reference);

    let mut cache = TimedCache::new(Duration::minutes(config.cache_ttl_minutes));
    let result = run_aggregation_cached(
        &records,
        &roster,
        &registry,
        &options,
        week_reference,
        &mut cache,
        Utc::now(),
    )
    .map_err(|e| Error::Aggregation(e.to_string()))?;

    if let Some(excel_path) = excel {
        export_to_excel(&result, excel_path)?;
        println!("Excel raporu yazıldı: {}", excel_path.display());
    }

    output_result(config.output_format, &result)
}

fn cmd_import(config: &Config, folder: &Path, replace: bool, verbose: bool) -> Result<()> {
    let files = scan_csv_files(folder)?;
    if files.is_empty() {
        println!("No CSV sheets found under {}", folder.display());
        return Ok(());
    }

    let repo = open_delivery_repo(config)?;
    if replace {
        repo.clear()?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut imported = 0usize;
    let mut skipped = 0usize;

    for file in &files {
        let sheet_name = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(sheet_name.clone());

        // Date and shift ride on the file name; unparseable names are skipped
        let Some((date, shift)) = infer_sheet_info(file) else {
            warn!("skipping {}: file name carries no date/shift", file.display());
            skipped += 1;
            pb.inc(1);
            continue;
        };

        match load_template_sheet(file, date, shift, &sheet_name) {
            Ok(records) => {
                repo.save_all(&records)?;
                imported += records.len();
                if verbose {
                    pb.println(format!("{}: {} records", file.display(), records.len()));
                }
            }
            Err(e) => {
                warn!("skipping {}: {}", file.display(), e);
                skipped += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    println!(
        "Imported {} records from {} sheets ({} skipped), total stored: {}",
        imported,
        files.len() - skipped,
        skipped,
        repo.count()
    );
    Ok(())
}

fn cmd_personnel_import(config: &Config, roster_path: &Path) -> Result<()> {
    let roster = load_roster(roster_path).map_err(|e| Error::CsvLoader(e.to_string()))?;
    let repo = open_personnel_repo(config)?;
    repo.replace_all(&roster)?;
    println!("Imported {} roster entries", roster.len());
    Ok(())
}

fn cmd_personnel_list(config: &Config) -> Result<()> {
    let roster = open_personnel_repo(config)?.find_all()?;
    if roster.is_empty() {
        println!("Roster is empty; run `personnel import <csv>` first");
        return Ok(());
    }

    println!("{:<28} {:<10} {:<20} {:<8} {}", "Personel", "Sicil", "Görev", "Vardiya", "Aktif");
    for person in &roster {
        println!(
            "{:<28} {:<10} {:<20} {:<8} {}",
            person.full_name,
            person.employee_code.as_deref().unwrap_or("-"),
            person.position.label(),
            person.shift.label(),
            if person.is_active { "Evet" } else { "Hayır" }
        );
    }
    Ok(())
}

fn cmd_vehicles_add(
    config: &Config,
    plate: &str,
    vehicle_type: sevkiyat_types::VehicleType,
    name: Option<String>,
) -> Result<()> {
    let repo = open_vehicle_repo(config)?;

    let mut vehicle = RegisteredVehicle::new(plate, vehicle_type);
    if let Some(name) = name {
        vehicle = vehicle.with_name(name);
    }
    repo.save(&vehicle)?;

    println!("Registered {} as {}", plate, vehicle_type.label());
    Ok(())
}

fn cmd_vehicles_list(config: &Config) -> Result<()> {
    let vehicles = open_vehicle_repo(config)?.find_all()?;
    if vehicles.is_empty() {
        println!("No registered vehicles");
        return Ok(());
    }

    println!("{:<14} {:<12} {}", "Plaka", "Tip", "Ad");
    for vehicle in &vehicles {
        println!(
            "{:<14} {:<12} {}",
            vehicle.license_plate,
            vehicle.vehicle_type.label(),
            vehicle.name.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn cmd_weeks(
    config: &Config,
    records_path: Option<&Path>,
    reference: Option<NaiveDate>,
) -> Result<()> {
    let records = load_records(config, records_path)?;
    if records.is_empty() {
        println!("No delivery records loaded");
        return Ok(());
    }

    // Distinct (date, shift) pairs over the records
    let items: Vec<(NaiveDate, ShiftType)> = records
        .iter()
        .map(|r| (r.date, r.shift))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let reference = reference.unwrap_or(config.week_reference);
    let buckets = bucket_into_weeks(&items, reference);

    println!("Reference Sunday: {}", reference);
    for bucket in &buckets {
        let labels: Vec<String> = bucket
            .items
            .iter()
            .map(|(date, shift)| format!("{} {}", date, shift.label()))
            .collect();
        println!(
            "Hafta {:>3} (başlangıç {}): {}",
            bucket.index,
            bucket.start(reference),
            labels.join(", ")
        );
    }
    Ok(())
}

fn cmd_config(
    show: bool,
    set_data_dir: Option<PathBuf>,
    set_reference: Option<NaiveDate>,
    set_unmatched: Option<UnmatchedPolicy>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut changed = false;

    if let Some(data_dir) = set_data_dir {
        config.data_dir = Some(data_dir);
        changed = true;
    }
    if let Some(reference) = set_reference {
        config.week_reference = reference;
        changed = true;
    }
    if let Some(policy) = set_unmatched {
        config.unmatched_policy = policy;
        changed = true;
    }
    if let Some(format) = set_output {
        config.output_format = format;
        changed = true;
    }

    if changed {
        config.save()?;
        println!("Configuration saved");
    }

    if show || !changed {
        println!("{}", config);
    }
    Ok(())
}
