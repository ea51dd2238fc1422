use anyhow::{Context, Result, anyhow};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

use crate::models::{FIELD_NAMES, Registration};

/// Result of [`RecordStore::append`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Appended {
    Created,
    /// A row with the same vehicle number was already stored; nothing was written.
    Existing(Registration),
}

/// Sole owner of the registration table file.
///
/// The table is a CSV file whose first row is [`FIELD_NAMES`]. Every mutation
/// rewrites the whole file through a temporary file in the same directory
/// that is renamed over the table, so a crash never leaves a half written
/// table behind.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the table with its header row. An existing table is left untouched.
    pub fn initialize(&self) -> Result<()> {
        let _guard = self.guard()?;
        if self.path.exists() {
            return Ok(());
        }
        let dir = self.table_dir();
        fs::create_dir_all(dir).context(format!("failed to create directory tree {:?}", dir))?;
        self.persist(&[])?;
        info!("Created record table at {:?}", self.path);
        Ok(())
    }

    pub fn find(&self, vehicle_number: &str) -> Result<Option<Registration>> {
        let _guard = self.guard()?;
        Ok(self
            .load()?
            .into_iter()
            .find(|row| row.vehicle_number == vehicle_number))
    }

    /// Append `registration` unless its vehicle number is already stored.
    pub fn append(&self, registration: &Registration) -> Result<Appended> {
        let _guard = self.guard()?;
        let mut rows = self.load()?;
        if let Some(existing) = rows
            .iter()
            .find(|row| row.vehicle_number == registration.vehicle_number)
        {
            return Ok(Appended::Existing(existing.clone()));
        }
        rows.push(registration.clone());
        self.persist(&rows)?;
        Ok(Appended::Created)
    }

    /// Remove the first row with `vehicle_number`. Returns whether a row was removed.
    pub fn delete(&self, vehicle_number: &str) -> Result<bool> {
        let _guard = self.guard()?;
        let mut rows = self.load()?;
        match rows
            .iter()
            .position(|row| row.vehicle_number == vehicle_number)
        {
            Some(index) => {
                rows.remove(index);
                self.persist(&rows)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn list_all(&self) -> Result<Vec<Registration>> {
        let _guard = self.guard()?;
        self.load()
    }

    /// Raw bytes of the table file.
    pub fn export(&self) -> Result<Vec<u8>> {
        let _guard = self.guard()?;
        fs::read(&self.path).context(format!("failed to read record table {:?}", self.path))
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| anyhow!("record store lock poisoned"))
    }

    fn load(&self) -> Result<Vec<Registration>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .context(format!("failed to open record table {:?}", self.path))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.context(format!("failed to parse record table {:?}", self.path))?;
            rows.push(Registration::from_cells(record.iter()));
        }
        Ok(rows)
    }

    /// Write `rows` under the header into a temporary file in the table's
    /// directory, then rename it over the table. The temporary file is
    /// removed when any step fails.
    fn persist(&self, rows: &[Registration]) -> Result<()> {
        let dir = self.table_dir();
        let mut file = NamedTempFile::new_in(dir)
            .context(format!("failed to create temporary table in {:?}", dir))?;
        {
            let mut writer = csv::WriterBuilder::new()
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(&mut file);
            writer.write_record(FIELD_NAMES)?;
            for row in rows {
                writer.write_record(row.values())?;
            }
            writer
                .flush()
                .context(format!("failed to flush temporary table {:?}", dir))?;
        }
        file.persist(&self.path)
            .context(format!("failed to replace record table {:?}", self.path))?;
        Ok(())
    }

    fn table_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, RecordStore) {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = RecordStore::new(dir.path().join("db").join("records.csv"));
        store.initialize().expect("failed to initialize store");
        (dir, store)
    }

    fn registration(vehicle_number: &str, owner_name: &str) -> Registration {
        Registration {
            owner_name: owner_name.to_string(),
            contact_number: "9999999999".to_string(),
            vehicle_number: vehicle_number.to_string(),
            emergency_contact: "8888888888".to_string(),
            relationship: "Spouse".to_string(),
            blood_group: "O+".to_string(),
        }
    }

    fn vehicle_numbers(store: &RecordStore) -> Vec<String> {
        store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|row| row.vehicle_number)
            .collect()
    }

    #[test]
    fn test_initialize_writes_header() {
        let (_dir, store) = create_test_store();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents,
            "Owner Name,Contact Number,Vehicle Number,Emergency Contact,Relationship,Blood Group\n"
        );
        assert!(store.list_all().unwrap().is_empty());
    }

    fn directory_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_mutations_leave_only_the_table() {
        let (_dir, store) = create_test_store();
        store.append(&registration("KA01AB1234", "A Kumar")).unwrap();
        store.append(&registration("MH12ZZ0001", "B Rao")).unwrap();
        store.delete("KA01AB1234").unwrap();

        let table_dir = store.path().parent().unwrap();
        assert_eq!(directory_entries(table_dir), vec!["records.csv"]);
    }

    #[test]
    fn test_failed_rewrite_removes_temporary_file() {
        let dir = TempDir::new().unwrap();
        let table = dir.path().join("records.csv");
        fs::create_dir(&table).unwrap();
        fs::write(table.join("occupied"), b"x").unwrap();
        let store = RecordStore::new(&table);

        assert!(store.persist(&[registration("KA01AB1234", "A Kumar")]).is_err());
        assert_eq!(directory_entries(dir.path()), vec!["records.csv"]);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_dir, store) = create_test_store();
        store.append(&registration("KA01AB1234", "A Kumar")).unwrap();
        let before = store.export().unwrap();

        store.initialize().unwrap();
        store.initialize().unwrap();

        assert_eq!(store.export().unwrap(), before);
    }

    #[test]
    fn test_append_and_find() {
        let (_dir, store) = create_test_store();
        let row = registration("KA01AB1234", "A Kumar");

        assert_eq!(store.append(&row).unwrap(), Appended::Created);
        assert_eq!(store.find("KA01AB1234").unwrap(), Some(row));
        assert_eq!(store.find("MH12ZZ0001").unwrap(), None);
    }

    #[test]
    fn test_append_duplicate_returns_existing() {
        let (_dir, store) = create_test_store();
        let original = registration("KA01AB1234", "A Kumar");
        store.append(&original).unwrap();
        let before = store.export().unwrap();

        let changed = registration("KA01AB1234", "Someone Else");
        assert_eq!(
            store.append(&changed).unwrap(),
            Appended::Existing(original.clone())
        );
        assert_eq!(store.export().unwrap(), before);
        assert_eq!(store.find("KA01AB1234").unwrap(), Some(original));
    }

    #[test]
    fn test_vehicle_numbers_stay_unique() {
        let (_dir, store) = create_test_store();
        for vehicle in ["A1", "B2", "A1", "C3", "B2", "A1"] {
            store.append(&registration(vehicle, "owner")).unwrap();
        }
        assert_eq!(vehicle_numbers(&store), vec!["A1", "B2", "C3"]);
    }

    #[test]
    fn test_delete_keeps_other_rows_in_order() {
        let (_dir, store) = create_test_store();
        for vehicle in ["A1", "B2", "C3", "D4"] {
            store.append(&registration(vehicle, "owner")).unwrap();
        }

        assert!(store.delete("B2").unwrap());

        assert_eq!(vehicle_numbers(&store), vec!["A1", "C3", "D4"]);
        assert_eq!(store.find("B2").unwrap(), None);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let (_dir, store) = create_test_store();
        store.append(&registration("A1", "owner")).unwrap();
        let before = store.export().unwrap();

        assert!(!store.delete("ZZ99").unwrap());
        assert_eq!(store.export().unwrap(), before);
    }

    #[test]
    fn test_delete_last_row_leaves_header() {
        let (_dir, store) = create_test_store();
        store.append(&registration("KA01AB1234", "A Kumar")).unwrap();
        store.delete("KA01AB1234").unwrap();

        assert_eq!(store.find("KA01AB1234").unwrap(), None);
        assert!(store.list_all().unwrap().is_empty());
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_fields_with_commas_and_quotes_survive() {
        let (_dir, store) = create_test_store();
        let row = Registration {
            owner_name: "Kumar, \"Babu\"".to_string(),
            relationship: "Père".to_string(),
            ..registration("KA01AB1234", "")
        };
        store.append(&row).unwrap();
        assert_eq!(store.list_all().unwrap(), vec![row]);
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("absent.csv"));
        assert!(store.find("A1").is_err());
        assert!(store.append(&registration("A1", "owner")).is_err());
        assert!(store.export().is_err());
    }
}
