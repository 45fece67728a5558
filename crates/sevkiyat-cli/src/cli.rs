//! CLI argument definitions

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use sevkiyat_types::{OutputFormat, ShiftType, UnmatchedPolicy, VehicleType};

#[derive(Parser)]
#[command(name = "sevkiyat-rapor")]
#[command(version)]
#[command(about = "Delivery performance aggregation from sheets and roster data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json). Falls back to the config value.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Shift selector on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShiftArg {
    Gunduz,
    Gece,
}

impl From<ShiftArg> for ShiftType {
    fn from(arg: ShiftArg) -> Self {
        match arg {
            ShiftArg::Gunduz => ShiftType::Gunduz,
            ShiftArg::Gece => ShiftType::Gece,
        }
    }
}

/// Vehicle type selector on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum VehicleTypeArg {
    Kamyon,
    Kamyonet,
    Panelvan,
}

impl From<VehicleTypeArg> for VehicleType {
    fn from(arg: VehicleTypeArg) -> Self {
        match arg {
            VehicleTypeArg::Kamyon => VehicleType::Truck,
            VehicleTypeArg::Kamyonet => VehicleType::Van,
            VehicleTypeArg::Panelvan => VehicleType::PanelVan,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate delivery performance per employee and vehicle type
    Aggregate {
        /// Records-table CSV; falls back to the stored records when omitted
        #[arg(long)]
        records: Option<PathBuf>,

        /// Roster CSV; falls back to the stored roster when omitted
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Restrict to specific dates (YYYY-MM-DD, repeatable)
        #[arg(long = "date")]
        dates: Vec<NaiveDate>,

        /// Restrict to one shift
        #[arg(long)]
        shift: Option<ShiftArg>,

        /// Restrict to one fixed 7-day window (0 = reference week)
        #[arg(long)]
        week: Option<i64>,

        /// Reference Sunday override for week windows (YYYY-MM-DD)
        #[arg(long)]
        reference: Option<NaiveDate>,

        /// Policy for rows whose name has no roster match
        #[arg(long)]
        unmatched: Option<UnmatchedPolicy>,

        /// Also write the report to an Excel file
        #[arg(long, short = 'o')]
        excel: Option<PathBuf>,
    },

    /// Import delivery sheet CSVs from a folder into the stored records
    Import {
        /// Folder scanned recursively for `YYYY-MM-DD_<shift>.csv` sheets
        folder: PathBuf,

        /// Clear the stored records before importing
        #[arg(long)]
        replace: bool,
    },

    /// Manage the personnel roster
    Personnel {
        #[command(subcommand)]
        action: PersonnelAction,
    },

    /// Manage the license plate to vehicle type registry
    Vehicles {
        #[command(subcommand)]
        action: VehicleAction,
    },

    /// Show the fixed 7-day week windows covered by the records
    Weeks {
        /// Records-table CSV; falls back to the stored records when omitted
        #[arg(long)]
        records: Option<PathBuf>,

        /// Reference Sunday override (YYYY-MM-DD)
        #[arg(long)]
        reference: Option<NaiveDate>,
    },

    /// Show or change the configuration
    Config {
        /// Show the current configuration
        #[arg(long)]
        show: bool,

        /// Set the data directory for stored records
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set the reference Sunday for week windows
        #[arg(long)]
        set_reference: Option<NaiveDate>,

        /// Set the default unmatched-name policy
        #[arg(long)]
        set_unmatched: Option<UnmatchedPolicy>,

        /// Set the default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset the configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum PersonnelAction {
    /// Import the roster from a CSV file (replaces the stored roster)
    Import {
        roster: PathBuf,
    },

    /// List the stored roster
    List,
}

#[derive(Subcommand)]
pub enum VehicleAction {
    /// Register a license plate with its vehicle type
    Add {
        plate: String,

        #[arg(value_enum)]
        vehicle_type: VehicleTypeArg,

        /// Free-form label for the vehicle
        #[arg(long)]
        name: Option<String>,
    },

    /// List the registered vehicles
    List,
}
