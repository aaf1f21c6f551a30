use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persistance d'un document sur un support quelconque.
pub trait Storage<T> {
    /// Charge le document depuis le support.
    fn load(&self) -> anyhow::Result<T>;
    /// Sauvegarde de manière atomique.
    fn save(&self, value: &T) -> anyhow::Result<()>;
}

/// Document JSON sur fichier, écrit via fichier temporaire + rename.
pub struct JsonStorage<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> JsonStorage<T> {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            _marker: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Serialize + DeserializeOwned + Default> JsonStorage<T> {
    /// Charge le document, ou la valeur par défaut si le fichier n'existe
    /// pas encore.
    pub fn load_or_default(&self) -> anyhow::Result<T> {
        if !self.path.exists() {
            return Ok(T::default());
        }
        self.load()
    }
}

impl<T: Serialize + DeserializeOwned> Storage<T> for JsonStorage<T> {
    fn load(&self) -> anyhow::Result<T> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let value: T = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(value)
    }

    fn save(&self, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(value)?;
        let mut tmp = NamedTempFile::new_in(self.path.parent().unwrap_or_else(|| Path::new(".")))
            .with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
