use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::StoreError;

/// Named JSON documents plus append-only JSON-lines logs.
pub trait DocumentStore {
    /// `Ok(None)` when the document does not exist yet.
    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError>;

    /// Replace the whole document.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<(), StoreError>;

    /// Append `record` as one compact JSON line, creating the log if needed.
    fn append_line<T: Serialize>(&self, name: &str, record: &T) -> Result<(), StoreError>;
}

fn io_err(name: &str) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        name: name.to_string(),
        source,
    }
}

fn encode_err(name: &str) -> impl FnOnce(serde_json::Error) -> StoreError + '_ {
    move |source| StoreError::Encode {
        name: name.to_string(),
        source,
    }
}

fn decode<T: DeserializeOwned>(name: &str, content: &str) -> Result<T, StoreError> {
    serde_json::from_str(content).map_err(|source| StoreError::Corrupt {
        name: name.to_string(),
        source,
    })
}

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    /// Store under the platform data directory (`~/.local/share/keyloop` on Linux).
    pub fn new() -> Result<Self, StoreError> {
        Self::with_base_dir(default_data_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir).map_err(io_err("data directory"))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keyloop")
}

impl DocumentStore for JsonStore {
    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let content = match fs::read_to_string(self.file_path(name)) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(name)(e)),
        };
        decode(name, &content).map(Some)
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<(), StoreError> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data).map_err(encode_err(name))?;
        let mut file = fs::File::create(&tmp_path).map_err(io_err(name))?;
        file.write_all(json.as_bytes()).map_err(io_err(name))?;
        file.sync_all().map_err(io_err(name))?;

        fs::rename(&tmp_path, &path).map_err(io_err(name))?;
        Ok(())
    }

    fn append_line<T: Serialize>(&self, name: &str, record: &T) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record).map_err(encode_err(name))?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_path(name))
            .map_err(io_err(name))?;
        file.write_all(line.as_bytes()).map_err(io_err(name))?;
        Ok(())
    }
}

/// In-memory store holding the same serialized text a `JsonStore` would write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw content of a document or log.
    pub fn raw(&self, name: &str) -> Option<String> {
        self.documents.borrow().get(name).cloned()
    }

    pub fn insert_raw(&self, name: &str, content: impl Into<String>) {
        self.documents
            .borrow_mut()
            .insert(name.to_string(), content.into());
    }
}

impl DocumentStore for MemoryStore {
    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        match self.documents.borrow().get(name) {
            Some(content) => decode(name, content).map(Some),
            None => Ok(None),
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(data).map_err(encode_err(name))?;
        self.insert_raw(name, json);
        Ok(())
    }

    fn append_line<T: Serialize>(&self, name: &str, record: &T) -> Result<(), StoreError> {
        let line = serde_json::to_string(record).map_err(encode_err(name))?;
        let mut docs = self.documents.borrow_mut();
        let log = docs.entry(name.to_string()).or_default();
        log.push_str(&line);
        log.push('\n');
        Ok(())
    }
}
