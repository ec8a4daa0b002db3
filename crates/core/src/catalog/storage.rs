use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::domain::menu_item::MenuItem;
use crate::errors::StorageError;

/// Backing resource for a catalog. Every write replaces the whole catalog.
pub trait CatalogStorage {
    /// Name used in notices and errors.
    fn resource(&self) -> String;
    fn read(&self) -> Result<Vec<MenuItem>, StorageError>;
    fn write(&self, items: &[MenuItem]) -> Result<(), StorageError>;
}

#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io { resource: self.resource(), source }
    }
}

impl CatalogStorage for JsonFileStorage {
    fn resource(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<Vec<MenuItem>, StorageError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::Missing { resource: self.resource() });
            }
            Err(error) => return Err(self.io_error(error)),
        };
        decode(&self.resource(), &raw)
    }

    /// Writes into a sibling temp file and renames it over the target, so a failed write never
    /// truncates the previous catalog.
    fn write(&self, items: &[MenuItem]) -> Result<(), StorageError> {
        let encoded = encode(&self.resource(), items)?;
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = NamedTempFile::new_in(directory).map_err(|error| self.io_error(error))?;
        staged.write_all(&encoded).map_err(|error| self.io_error(error))?;
        staged.as_file().sync_all().map_err(|error| self.io_error(error))?;
        staged.persist(&self.path).map_err(|error| self.io_error(error.error))?;
        Ok(())
    }
}

/// Keeps the encoded catalog in memory. Writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    contents: Mutex<Option<Vec<u8>>>,
    fail_writes: Mutex<bool>,
}

impl InMemoryStorage {
    pub fn with_contents(raw: impl Into<Vec<u8>>) -> Self {
        Self { contents: Mutex::new(Some(raw.into())), fail_writes: Mutex::new(false) }
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        lock(&self.contents).clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *lock(&self.fail_writes) = fail;
    }
}

impl CatalogStorage for InMemoryStorage {
    fn resource(&self) -> String {
        "memory".to_string()
    }

    fn read(&self) -> Result<Vec<MenuItem>, StorageError> {
        match lock(&self.contents).as_deref() {
            Some(raw) => decode(&self.resource(), raw),
            None => Err(StorageError::Missing { resource: self.resource() }),
        }
    }

    fn write(&self, items: &[MenuItem]) -> Result<(), StorageError> {
        if *lock(&self.fail_writes) {
            return Err(StorageError::Io {
                resource: self.resource(),
                source: io::Error::new(io::ErrorKind::Other, "writes are disabled"),
            });
        }

        let encoded = encode(&self.resource(), items)?;
        *lock(&self.contents) = Some(encoded);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn decode(resource: &str, raw: &[u8]) -> Result<Vec<MenuItem>, StorageError> {
    serde_json::from_slice(raw)
        .map_err(|source| StorageError::Malformed { resource: resource.to_string(), source })
}

fn encode(resource: &str, items: &[MenuItem]) -> Result<Vec<u8>, StorageError> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    items
        .serialize(&mut serializer)
        .map_err(|source| StorageError::Encode { resource: resource.to_string(), source })?;
    buffer.push(b'\n');
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{CatalogStorage, InMemoryStorage, JsonFileStorage};
    use crate::domain::menu_item::{MenuItem, MenuItemId};
    use crate::errors::StorageError;

    fn items() -> Vec<MenuItem> {
        vec![
            MenuItem::new(MenuItemId(1), "Tarta de Queso", "3.75", "Postre").expect("item"),
            MenuItem::new(MenuItemId(2), "Frappé de Caramelo", "5.25", "Bebida Fría")
                .expect("item"),
        ]
    }

    #[test]
    fn file_storage_reports_missing_resource() {
        let dir = TempDir::new().expect("tempdir");
        let storage = JsonFileStorage::new(dir.path().join("menu.json"));

        assert!(matches!(storage.read(), Err(StorageError::Missing { .. })));
    }

    #[test]
    fn file_storage_writes_pretty_utf8_json() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("menu.json");
        let storage = JsonFileStorage::new(&path);

        storage.write(&items()).expect("write");
        let raw = std::fs::read_to_string(&path).expect("read back");

        assert!(raw.starts_with("[\n    {\n        \"id\": 1,"));
        assert!(raw.contains("\"name\": \"Frappé de Caramelo\""));
        assert_eq!(storage.read().expect("decode"), items());
    }

    #[test]
    fn file_storage_fails_when_directory_is_missing() {
        let dir = TempDir::new().expect("tempdir");
        let storage = JsonFileStorage::new(dir.path().join("missing").join("menu.json"));

        assert!(matches!(storage.write(&items()), Err(StorageError::Io { .. })));
    }

    #[test]
    fn in_memory_storage_rejects_invalid_json() {
        let storage = InMemoryStorage::with_contents("{ not json");
        assert!(matches!(storage.read(), Err(StorageError::Malformed { .. })));
    }

    #[test]
    fn in_memory_storage_keeps_previous_contents_on_failed_write() {
        let storage = InMemoryStorage::default();
        storage.write(&items()[..1]).expect("first write");
        let before = storage.contents();

        storage.set_fail_writes(true);
        assert!(storage.write(&items()).is_err());
        assert_eq!(storage.contents(), before);

        let stored = storage.read().expect("decode");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].price, Decimal::new(375, 2));
    }
}
