//! Repository trait definitions for data persistence

use chrono::NaiveDate;

use sevkiyat_types::{DeliveryRecord, Error, PersonnelRecord, RegisteredVehicle};

/// Repository for raw delivery records
pub trait DeliveryRecordRepository {
    /// Append records to the store
    fn save_all(&self, records: &[DeliveryRecord]) -> Result<(), Error>;

    /// Load all delivery records
    fn find_all(&self) -> Result<Vec<DeliveryRecord>, Error>;

    /// Find records by delivery date
    fn find_by_date(&self, date: NaiveDate) -> Result<Vec<DeliveryRecord>, Error>;

    /// Find records by store code
    fn find_by_store(&self, store_code: &str) -> Result<Vec<DeliveryRecord>, Error>;
}

/// Repository for the personnel roster
pub trait PersonnelRepository {
    /// Save or update a roster entry
    fn save(&self, person: &PersonnelRecord) -> Result<(), Error>;

    /// Load the full roster
    fn find_all(&self) -> Result<Vec<PersonnelRecord>, Error>;

    /// Find a roster entry by employee code
    fn find_by_code(&self, employee_code: &str) -> Result<Option<PersonnelRecord>, Error>;
}

/// Repository for the plate-to-type vehicle registry
pub trait VehicleRegistryRepository {
    /// Save or update a registry entry
    fn save(&self, vehicle: &RegisteredVehicle) -> Result<(), Error>;

    /// Load all registry entries
    fn find_all(&self) -> Result<Vec<RegisteredVehicle>, Error>;

    /// Find a registry entry by license plate (normalized comparison)
    fn find_by_plate(&self, plate: &str) -> Result<Option<RegisteredVehicle>, Error>;
}
