//! Repository adapters for the persistence layer

use std::path::PathBuf;

use sevkiyat_infra::persistence::{
    FileDeliveryRepository, FilePersonnelRepository, FileVehicleRegistryRepository,
};
use sevkiyat_types::Result;

use crate::config::Config;

/// Open the delivery record repository under the configured data directory
pub fn open_delivery_repo(config: &Config) -> Result<FileDeliveryRepository> {
    FileDeliveryRepository::open(config.data_dir()?)
}

/// Open the personnel roster repository under the configured data directory
pub fn open_personnel_repo(config: &Config) -> Result<FilePersonnelRepository> {
    FilePersonnelRepository::open(config.data_dir()?)
}

/// Open the vehicle registry repository under the configured data directory
pub fn open_vehicle_repo(config: &Config) -> Result<FileVehicleRegistryRepository> {
    FileVehicleRegistryRepository::open(config.data_dir()?)
}

/// Open the delivery record repository at a custom directory
pub fn open_delivery_repo_at(data_dir: PathBuf) -> Result<FileDeliveryRepository> {
    FileDeliveryRepository::open(data_dir)
}
