//! File-based personnel roster repository

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use sevkiyat_domain::repository::PersonnelRepository;
use sevkiyat_types::{normalize_text, Error, PersonnelRecord, Result};

pub struct FilePersonnelRepository {
    store_path: PathBuf,
    entries: RefCell<Vec<PersonnelRecord>>,
}

impl FilePersonnelRepository {
    /// Create or load the repository in the given data directory
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        let store_path = data_dir.join("personnel.json");

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

    /// Replace the whole roster (used by roster import)
    pub fn replace_all(&self, roster: &[PersonnelRecord]) -> Result<()> {
        *self.entries.borrow_mut() = roster.to_vec();
        self.persist()
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

impl PersonnelRepository for FilePersonnelRepository {
    fn save(&self, person: &PersonnelRecord) -> std::result::Result<(), Error> {
        {
            let mut entries = self.entries.borrow_mut();
            // Upsert by employee code when present, else by normalized name
            let existing = entries.iter_mut().find(|p| match (&p.employee_code, &person.employee_code) {
                (Some(a), Some(b)) => a == b,
                _ => normalize_text(&p.full_name) == normalize_text(&person.full_name),
            });
            match existing {
                Some(slot) => *slot = person.clone(),
                None => entries.push(person.clone()),
            }
        }
        self.persist()
    }

    fn find_all(&self) -> std::result::Result<Vec<PersonnelRecord>, Error> {
        Ok(self.entries.borrow().clone())
    }

    fn find_by_code(&self, employee_code: &str) -> std::result::Result<Option<PersonnelRecord>, Error> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .find(|p| p.employee_code.as_deref() == Some(employee_code))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sevkiyat_types::Position;
    use tempfile::tempdir;

    #[test]
    fn test_save_upserts_by_code() {
        let dir = tempdir().unwrap();
        let repo = FilePersonnelRepository::open(dir.path().to_path_buf()).unwrap();

        let p1 = PersonnelRecord::new("Ahmet Yılmaz").with_employee_code("E1");
        repo.save(&p1).unwrap();

        let p1_updated = PersonnelRecord::new("Ahmet Yılmaz")
            .with_employee_code("E1")
            .with_position(Position::Driver);
        repo.save(&p1_updated).unwrap();

        assert_eq!(repo.count(), 1);
        let found = repo.find_by_code("E1").unwrap().unwrap();
        assert_eq!(found.position, Position::Driver);
    }

    #[test]
    fn test_replace_all_and_reload() {
        let dir = tempdir().unwrap();
        let repo = FilePersonnelRepository::open(dir.path().to_path_buf()).unwrap();
        repo.replace_all(&[
            PersonnelRecord::new("Ahmet Yılmaz").with_employee_code("E1"),
            PersonnelRecord::new("Mehmet Demir").with_employee_code("E2"),
        ])
        .unwrap();

        let repo = FilePersonnelRepository::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(repo.count(), 2);
        assert!(repo.find_by_code("E2").unwrap().is_some());
        assert!(repo.find_by_code("E9").unwrap().is_none());
    }
}
