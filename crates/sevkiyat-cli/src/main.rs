//! Sevkiyat Rapor - Delivery performance aggregation for the logistics back office
//!
//! A CLI tool that reconciles delivery spreadsheets against the personnel
//! roster and produces per-employee and per-vehicle-type performance reports.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
