//! Persisted marketplace registry of converted plugins
//!
//! The registry lives in a single `marketplace.json` under the root's
//! `.claude-plugin/` directory. Every mutation is a read-modify-write
//! under an exclusive OS-level lock on a sibling lock file, persisted
//! with temp-then-rename, so readers never observe a half-written file
//! and concurrent upserts never drop entries, even across separate
//! `Marketplace` instances or processes on the same root.

use crate::models::{
    MarketplaceEntry, MarketplaceManifest, MarketplaceOwner, MANIFEST_DIR,
    MARKETPLACE_MANIFEST_FILE,
};
use crate::utils::errors::{ConvertError, ConvertResult};
use crate::utils::fs::atomic_write;
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_NAME: &str = "mcp2plugin-marketplace";
pub const DEFAULT_OWNER: &str = "mcp2plugin";
pub const DEFAULT_DESCRIPTION: &str = "Converted MCP servers as Claude Code plugins";

const LOCK_FILE: &str = ".marketplace.lock";

pub struct Marketplace {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl Marketplace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_DIR).join(MARKETPLACE_MANIFEST_FILE)
    }

    pub fn is_initialized(&self) -> bool {
        self.manifest_path().exists()
    }

    /// Create the registry file. Fails if one already exists; the
    /// existing content is left untouched.
    pub fn initialize(&self, name: &str, owner: &str, description: &str) -> ConvertResult<()> {
        let _guard = self.write_lock.lock();
        let _registry = self.lock_registry()?;

        let path = self.manifest_path();
        if path.exists() {
            return Err(ConvertError::AlreadyInitialized(path));
        }

        let manifest = MarketplaceManifest {
            name: name.to_string(),
            description: description.to_string(),
            owner: MarketplaceOwner {
                name: owner.to_string(),
            },
            plugins: Vec::new(),
        };

        self.save(&manifest)?;
        info!("initialized marketplace '{}' at {}", name, path.display());
        Ok(())
    }

    /// Replace the entry with the same name in place (same ordinal slot)
    /// or append a new one. Never auto-initializes.
    pub fn upsert(&self, entry: MarketplaceEntry) -> ConvertResult<()> {
        let _guard = self.write_lock.lock();

        let path = self.manifest_path();
        if !path.exists() {
            return Err(ConvertError::NotInitialized(path));
        }
        let _registry = self.lock_registry()?;

        let mut manifest = self.load()?;
        match manifest.plugins.iter_mut().find(|p| p.name == entry.name) {
            Some(slot) => {
                debug!("replacing marketplace entry '{}'", entry.name);
                *slot = entry;
            }
            None => {
                debug!("appending marketplace entry '{}'", entry.name);
                manifest.plugins.push(entry);
            }
        }
        self.save(&manifest)
    }

    /// Remove an entry by name; returns whether anything was removed.
    pub fn remove(&self, name: &str) -> ConvertResult<bool> {
        let _guard = self.write_lock.lock();

        let path = self.manifest_path();
        if !path.exists() {
            return Err(ConvertError::NotInitialized(path));
        }
        let _registry = self.lock_registry()?;

        let mut manifest = self.load()?;
        let before = manifest.plugins.len();
        manifest.plugins.retain(|p| p.name != name);
        if manifest.plugins.len() == before {
            return Ok(false);
        }
        self.save(&manifest)?;
        Ok(true)
    }

    pub fn list(&self) -> ConvertResult<Vec<MarketplaceEntry>> {
        Ok(self.load()?.plugins)
    }

    pub fn get(&self, name: &str) -> ConvertResult<Option<MarketplaceEntry>> {
        Ok(self.load()?.plugins.into_iter().find(|p| p.name == name))
    }

    pub fn manifest(&self) -> ConvertResult<MarketplaceManifest> {
        self.load()
    }

    /// Take an exclusive lock on the registry's lock file. Other
    /// instances and processes block until the returned handle drops;
    /// the in-process `write_lock` alone cannot serialize them.
    fn lock_registry(&self) -> ConvertResult<File> {
        let dir = self.root.join(MANIFEST_DIR);
        fs::create_dir_all(&dir)?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(dir.join(LOCK_FILE))?;
        file.lock_exclusive()?;
        Ok(file)
    }

    fn load(&self) -> ConvertResult<MarketplaceManifest> {
        let path = self.manifest_path();
        if !path.exists() {
            return Err(ConvertError::NotInitialized(path));
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, manifest: &MarketplaceManifest) -> ConvertResult<()> {
        let path = self.manifest_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut content = serde_json::to_string_pretty(manifest)?;
        content.push('\n');
        atomic_write(&path, content.as_bytes())?;
        Ok(())
    }
}
