//! Byte and file encoding of persisted parameters.
//!
//! Artifacts (the trained model, the feature schema, imputer medians) are
//! stored as plain parameter structs, never as live objects holding caches
//! or derived state. Every such struct gets this trait through the blanket
//! bincode implementation.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Parameters that can be written to and read from bytes.
pub trait SerializableParams: Sized {
    fn to_bytes(&self) -> Result<Vec<u8>>;

    fn from_bytes(bytes: &[u8]) -> Result<Self>;

    /// Write the encoded parameters to `path`, creating parent directories.
    fn write_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    fn read_file(path: &Path) -> Result<Self> {
        Self::from_bytes(&fs::read(path)?)
    }
}

impl<T> SerializableParams for T
where
    T: Serialize + DeserializeOwned,
{
    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
