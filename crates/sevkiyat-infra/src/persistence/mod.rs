//! File-backed repository implementations

mod file_delivery_repo;
mod file_personnel_repo;
mod file_vehicle_registry_repo;

pub use file_delivery_repo::FileDeliveryRepository;
pub use file_personnel_repo::FilePersonnelRepository;
pub use file_vehicle_registry_repo::FileVehicleRegistryRepository;
