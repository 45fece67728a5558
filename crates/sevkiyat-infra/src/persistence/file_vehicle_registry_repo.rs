//! File-based vehicle registry repository
//!
//! Plate comparison goes through `base_plate`, so registry lookups tolerate
//! spacing differences and trip-sequence suffixes.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use sevkiyat_domain::repository::VehicleRegistryRepository;
use sevkiyat_domain::service::base_plate;
use sevkiyat_types::{Error, RegisteredVehicle, Result};

pub struct FileVehicleRegistryRepository {
    store_path: PathBuf,
    entries: RefCell<Vec<RegisteredVehicle>>,
}

impl FileVehicleRegistryRepository {
    /// Create or load the repository in the given data directory
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        let store_path = data_dir.join("vehicles.json");

        let entries = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).unwrap_or_default()
        } else {
            Vec::new()
        };

        Ok(Self {
            store_path,
            entries: RefCell::new(entries),
        })
    }

    pub fn count(&self) -> usize {
        self.entries.borrow().len()
    }

    fn persist(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &*self.entries.borrow())?;
        Ok(())
    }
}

impl VehicleRegistryRepository for FileVehicleRegistryRepository {
    fn save(&self, vehicle: &RegisteredVehicle) -> std::result::Result<(), Error> {
        {
            let mut entries = self.entries.borrow_mut();
            let plate = base_plate(&vehicle.license_plate);
            match entries.iter_mut().find(|v| base_plate(&v.license_plate) == plate) {
                Some(slot) => *slot = vehicle.clone(),
                None => entries.push(vehicle.clone()),
            }
        }
        self.persist()
    }

    fn find_all(&self) -> std::result::Result<Vec<RegisteredVehicle>, Error> {
        Ok(self.entries.borrow().clone())
    }

    fn find_by_plate(&self, plate: &str) -> std::result::Result<Option<RegisteredVehicle>, Error> {
        let plate = base_plate(plate);
        Ok(self
            .entries
            .borrow()
            .iter()
            .find(|v| base_plate(&v.license_plate) == plate)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sevkiyat_types::VehicleType;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_fuzzy_lookup() {
        let dir = tempdir().unwrap();
        let repo = FileVehicleRegistryRepository::open(dir.path().to_path_buf()).unwrap();

        repo.save(&RegisteredVehicle::new("34 ABC 123", VehicleType::Van)).unwrap();

        // Suffix and spacing do not matter for lookup
        let found = repo.find_by_plate("34ABC123-2").unwrap().unwrap();
        assert_eq!(found.vehicle_type, VehicleType::Van);
        assert!(repo.find_by_plate("06XYZ999").unwrap().is_none());
    }

    #[test]
    fn test_save_upserts_by_plate() {
        let dir = tempdir().unwrap();
        let repo = FileVehicleRegistryRepository::open(dir.path().to_path_buf()).unwrap();

        repo.save(&RegisteredVehicle::new("34ABC123", VehicleType::Truck)).unwrap();
        repo.save(&RegisteredVehicle::new("34 ABC 123", VehicleType::PanelVan)).unwrap();

        assert_eq!(repo.count(), 1);
        let repo = FileVehicleRegistryRepository::open(dir.path().to_path_buf()).unwrap();
        let found = repo.find_by_plate("34ABC123").unwrap().unwrap();
        assert_eq!(found.vehicle_type, VehicleType::PanelVan);
    }
}
