//! File-based delivery record repository
//!
//! Stores raw delivery rows in a JSON file under the data directory.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use chrono::NaiveDate;

use sevkiyat_domain::repository::DeliveryRecordRepository;
use sevkiyat_types::{DeliveryRecord, Error, Result};

pub struct FileDeliveryRepository {
    store_path: PathBuf,
    records: RefCell<Vec<DeliveryRecord>>,
}

impl FileDeliveryRepository {
    /// Create or load the repository in the given data directory
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        let store_path = data_dir.join("deliveries.json");

        let records = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).unwrap_or_default()
        } else {
            Vec::new()
        };

        Ok(Self {
            store_path,
            records: RefCell::new(records),
        })
    }

    pub fn count(&self) -> usize {
        self.records.borrow().len()
    }

    /// Drop all stored records
    pub fn clear(&self) -> Result<()> {
        self.records.borrow_mut().clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &*self.records.borrow())?;
        Ok(())
    }
}

impl DeliveryRecordRepository for FileDeliveryRepository {
    fn save_all(&self, records: &[DeliveryRecord]) -> std::result::Result<(), Error> {
        self.records.borrow_mut().extend_from_slice(records);
        self.persist()
    }

    fn find_all(&self) -> std::result::Result<Vec<DeliveryRecord>, Error> {
        Ok(self.records.borrow().clone())
    }

    fn find_by_date(&self, date: NaiveDate) -> std::result::Result<Vec<DeliveryRecord>, Error> {
        Ok(self
            .records
            .borrow()
            .iter()
            .filter(|r| r.date == date)
            .cloned()
            .collect())
    }

    fn find_by_store(&self, store_code: &str) -> std::result::Result<Vec<DeliveryRecord>, Error> {
        Ok(self
            .records
            .borrow()
            .iter()
            .filter(|r| r.store_code == store_code)
            .cloned()
            .collect())
    }
}
