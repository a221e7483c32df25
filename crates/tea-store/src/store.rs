use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use uuid::Uuid;

use tea_core::time::now_iso8601;
use tea_core::{ElementAnalysis, TeaRecord};

use crate::error::{Result, StoreError};
use crate::schema;

/// One row of the tea listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTea {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub analyses: u64,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Teas ---

    /// Insert or replace the record stored under its name. Returns the id,
    /// which is stable across updates.
    pub fn save_tea(&self, record: &TeaRecord) -> Result<String> {
        let name = record
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| StoreError::InvalidData("a saved tea needs a name".to_string()))?;
        let json = serde_json::to_string(record)?;
        let now = now_iso8601();

        if let Some(id) = self.tea_id(name)? {
            self.conn.execute(
                "UPDATE teas SET record = ?1, updated_at = ?2 WHERE id = ?3",
                params![json, now, id],
            )?;
            tracing::info!(name, id = %id, "tea updated");
            return Ok(id);
        }

        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO teas (id, name, record, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
            params![id, name, json, now],
        )?;
        tracing::info!(name, id = %id, "tea saved");
        Ok(id)
    }

    pub fn load_tea(&self, name: &str) -> Result<Option<TeaRecord>> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT record FROM teas WHERE name = ?1", [name.trim()], |row| {
                row.get(0)
            })
            .optional()?;
        json.map(|j| serde_json::from_str(&j).map_err(StoreError::from))
            .transpose()
    }

    pub fn list_teas(&self) -> Result<Vec<StoredTea>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name, t.created_at, t.updated_at, COUNT(a.id)
             FROM teas t LEFT JOIN analyses a ON a.tea_id = t.id
             GROUP BY t.id ORDER BY t.name",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredTea {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                    updated_at: row.get(3)?,
                    analyses: row.get::<_, i64>(4)? as u64,
                })
            })?
            .collect::<std::result::Result<_, _>>()?;
        Ok(rows)
    }

    /// Delete a tea and its analyses. False when no such tea exists.
    pub fn delete_tea(&self, name: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM teas WHERE name = ?1", [name.trim()])?;
        if removed > 0 {
            tracing::info!(name, "tea deleted");
        }
        Ok(removed > 0)
    }

    fn tea_id(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT id FROM teas WHERE name = ?1", [name.trim()], |row| {
                row.get(0)
            })
            .optional()?)
    }

    // --- Analyses ---

    /// Append an analysis to a saved tea's history. Returns the row id.
    pub fn record_analysis(&self, name: &str, analysis: &ElementAnalysis) -> Result<i64> {
        let tea_id = self
            .tea_id(name)?
            .ok_or_else(|| StoreError::InvalidData(format!("no tea named {name:?}")))?;
        self.conn.execute(
            "INSERT INTO analyses (tea_id, dominant, total_thermal, result, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                tea_id,
                analysis.dominant_element.map(|e| e.as_str()),
                analysis.thermal_analysis.total_thermal,
                serde_json::to_string(analysis)?,
                now_iso8601(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn latest_analysis(&self, name: &str) -> Result<Option<ElementAnalysis>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT a.result FROM analyses a JOIN teas t ON t.id = a.tea_id
                 WHERE t.name = ?1 ORDER BY a.id DESC LIMIT 1",
                [name.trim()],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| serde_json::from_str(&j).map_err(StoreError::from))
            .transpose()
    }

    pub fn analysis_count(&self, name: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM analyses a JOIN teas t ON t.id = a.tea_id WHERE t.name = ?1",
            [name.trim()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
