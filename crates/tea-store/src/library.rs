use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs};

use serde_json::Value;
use tea_core::{Combiner, ElementAnalysis, EngineConfig, LookupTables, TeaRecord};

use crate::config_file::{self, CONFIG_FILE};
use crate::error::{Result, StoreError};
use crate::store::Store;
use crate::tables_file;

pub const DATA_DIR_ENV: &str = "TEA_DATA_DIR";
pub const DATABASE_FILE: &str = "teas.db";

/// `$TEA_DATA_DIR`, otherwise `~/.tea-elements`.
pub fn default_base_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }
    dirs_home().join(".tea-elements")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Everything a session needs: the tea database, the engine settings from
/// `config.toml`, and the lookup tables (built-in or overridden).
///
/// Layout:
/// ```text
/// ~/.tea-elements/
/// ├── teas.db
/// ├── config.toml
/// └── tables.toml | tables.json   (optional)
/// ```
pub struct TeaLibrary {
    base: Option<PathBuf>,
    store: Store,
    config: EngineConfig,
    tables: Arc<LookupTables>,
}

impl TeaLibrary {
    /// Open the library, creating the directory as needed.
    /// `base_dir`: override the data directory (for testing).
    pub fn open(base_dir: Option<&Path>) -> Result<Self> {
        let base = base_dir.map(PathBuf::from).unwrap_or_else(default_base_dir);
        fs::create_dir_all(&base).map_err(|e| {
            StoreError::InvalidData(format!("failed to create {}: {e}", base.display()))
        })?;

        let store = Store::open(&base.join(DATABASE_FILE))?;
        let config = config_file::load(&base.join(CONFIG_FILE))?;
        let tables = tables_file::load_or_builtin(&base)?;
        tracing::debug!(base = %base.display(), "library opened");

        Ok(Self {
            base: Some(base),
            store,
            config,
            tables: Arc::new(tables),
        })
    }

    /// In-memory database, default settings and tables. Config writes stay
    /// in memory.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            base: None,
            store: Store::open_in_memory()?,
            config: EngineConfig::default(),
            tables: Arc::new(LookupTables::builtin()),
        })
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tables(&self) -> &Arc<LookupTables> {
        &self.tables
    }

    /// A combiner over a snapshot of the current settings.
    pub fn combiner(&self) -> Combiner {
        Combiner::new(self.config.clone(), Arc::clone(&self.tables))
    }

    /// Apply key-path updates and persist them. Nothing changes on error.
    pub fn update_config<I, K>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut next = self.config.clone();
        next.update(entries)?;
        self.persist_config(&next)?;
        self.config = next;
        Ok(())
    }

    pub fn set_config(&mut self, path: &str, value: Value) -> Result<()> {
        self.update_config([(path, value)])
    }

    pub fn reset_config(&mut self) -> Result<()> {
        let defaults = EngineConfig::default();
        self.persist_config(&defaults)?;
        self.config = defaults;
        Ok(())
    }

    fn persist_config(&self, config: &EngineConfig) -> Result<()> {
        match &self.base {
            Some(base) => config_file::save(&base.join(CONFIG_FILE), config),
            None => Ok(()),
        }
    }

    /// Analyze a saved tea and append the result to its history.
    pub fn analyze_saved(&self, name: &str) -> Result<Option<ElementAnalysis>> {
        let Some(record) = self.store.load_tea(name)? else {
            return Ok(None);
        };
        let analysis = self.combiner().combine(&record);
        self.store.record_analysis(name, &analysis)?;
        Ok(Some(analysis))
    }

    /// Save a record, analyze it, and record the analysis.
    pub fn save_and_analyze(&self, record: &TeaRecord) -> Result<(String, ElementAnalysis)> {
        let id = self.store.save_tea(record)?;
        let analysis = self.combiner().combine(record);
        self.store.record_analysis(record.display_name(), &analysis)?;
        Ok((id, analysis))
    }
}
