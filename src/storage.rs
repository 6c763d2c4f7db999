use anyhow::{bail, Context};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

/// Stockage de blobs JSON, une entrée par workspace.
pub trait Storage {
    /// Charge le blob du workspace (`None` si rien n'a encore été écrit).
    fn load(&self, workspace: &str) -> anyhow::Result<Option<Value>>;
    /// Remplace le blob du workspace.
    fn save(&self, workspace: &str, blob: &Value) -> anyhow::Result<()>;
}

/// Noms de workspace acceptés : `[A-Za-z0-9_-]+`.
pub fn validate_workspace(name: &str) -> anyhow::Result<()> {
    if name.is_empty() {
        bail!("workspace name cannot be empty");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        bail!("invalid workspace name: {name}");
    }
    Ok(())
}

/// Un fichier `<workspace>.json` par workspace dans un répertoire.
pub struct JsonStorage {
    dir: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, workspace: &str) -> anyhow::Result<PathBuf> {
        validate_workspace(workspace)?;
        Ok(self.dir.join(format!("{workspace}.json")))
    }
}

impl Storage for JsonStorage {
    fn load(&self, workspace: &str) -> anyhow::Result<Option<Value>> {
        let path = self.path_for(workspace)?;
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let blob: Value = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(blob))
    }

    /// Sauvegarde de manière atomique.
    fn save(&self, workspace: &str, blob: &Value) -> anyhow::Result<()> {
        let path = self.path_for(workspace)?;
        let json = serde_json::to_vec_pretty(blob)?;
        let mut tmp = NamedTempFile::new_in(&self.dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).with_context(|| "atomic rename")?;
        debug!(workspace, path = %path.display(), "snapshot written");
        Ok(())
    }
}

/// Stockage en mémoire (tests, usage embarqué).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, workspace: &str) -> anyhow::Result<Option<Value>> {
        validate_workspace(workspace)?;
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        Ok(blobs.get(workspace).cloned())
    }

    fn save(&self, workspace: &str, blob: &Value) -> anyhow::Result<()> {
        validate_workspace(workspace)?;
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        blobs.insert(workspace.to_string(), blob.clone());
        Ok(())
    }
}
