//! Lookup-table overrides: `tables.toml` or `tables.json` in the data
//! directory. Sections present in the file replace the built-in section
//! wholesale; absent sections keep the built-in tables.

use std::fs;
use std::path::Path;

use tea_core::LookupTables;

use crate::error::Result;

pub const TABLES_TOML: &str = "tables.toml";
pub const TABLES_JSON: &str = "tables.json";

/// Load the override file from `dir`, TOML first. `None` when neither exists.
pub fn load(dir: &Path) -> Result<Option<LookupTables>> {
    let toml_path = dir.join(TABLES_TOML);
    if toml_path.exists() {
        let tables: LookupTables = toml::from_str(&fs::read_to_string(&toml_path)?)?;
        tracing::info!(path = %toml_path.display(), "table overrides loaded");
        return Ok(Some(tables.normalized()));
    }

    let json_path = dir.join(TABLES_JSON);
    if json_path.exists() {
        let tables: LookupTables = serde_json::from_str(&fs::read_to_string(&json_path)?)?;
        tracing::info!(path = %json_path.display(), "table overrides loaded");
        return Ok(Some(tables.normalized()));
    }

    Ok(None)
}

/// Override file if present, otherwise the built-in tables.
pub fn load_or_builtin(dir: &Path) -> Result<LookupTables> {
    Ok(load(dir)?.unwrap_or_else(LookupTables::builtin))
}
