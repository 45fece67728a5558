//! Infrastructure layer - CSV ingestion and file-backed persistence

pub mod csv_loader;
pub mod persistence;
pub mod roster_loader;
