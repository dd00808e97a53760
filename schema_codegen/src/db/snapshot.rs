//! Schema snapshot files
//!
//! A snapshot records everything a metadata source returned for one database,
//! so generation can be rerun later without a database connection.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::db::metadata::{ColumnRow, MetadataSource, ProbedColumn, SchemaFilter, TableRow};
use crate::error::{Error, Result};
use crate::schema::types::SemanticType;

/// Recorded metadata of one database
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub database: String,
    #[serde(default)]
    pub columns: Vec<ColumnRow>,
    #[serde(default)]
    pub tables: Vec<TableRow>,
    /// Probe results per table; tables missing here fall back to the
    /// declared column types
    #[serde(default)]
    pub probes: IndexMap<String, Vec<ProbedColumn>>,
}

impl Snapshot {
    /// Create an empty snapshot for a database
    pub fn new(database: &str) -> Self {
        Self {
            database: database.to_string(),
            ..Default::default()
        }
    }

    /// Record the metadata another source reports
    pub async fn capture<S>(source: &S, filter: &SchemaFilter) -> Result<Self>
    where
        S: MetadataSource + Sync,
    {
        let columns = source.column_rows(filter).await?;
        let tables = source.table_rows(filter).await?;

        let mut probes = IndexMap::new();
        for row in &columns {
            if !probes.contains_key(&row.table_name) {
                let probed = source.probe_table(&row.table_name).await?;
                probes.insert(row.table_name.clone(), probed);
            }
        }

        tracing::info!(database = %filter.database, tables = probes.len(), "Captured schema snapshot");
        Ok(Self {
            database: filter.database.clone(),
            columns,
            tables,
            probes,
        })
    }

    /// Load a snapshot from a JSON or YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read snapshot {}: {}", path.display(), e))
        })?;

        let snapshot = if is_yaml(path) {
            serde_yaml::from_str(&contents)?
        } else {
            serde_json::from_str(&contents)?
        };
        Ok(snapshot)
    }

    /// Save the snapshot as JSON, or YAML for `.yaml`/`.yml` paths
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref(),
        Some("yaml" | "yml")
    )
}

#[async_trait]
impl MetadataSource for Snapshot {
    async fn column_rows(&self, filter: &SchemaFilter) -> Result<Vec<ColumnRow>> {
        if filter.database != self.database {
            tracing::warn!(
                requested = %filter.database,
                recorded = %self.database,
                "Snapshot was recorded for a different database"
            );
            return Ok(Vec::new());
        }

        Ok(self
            .columns
            .iter()
            .filter(|row| filter.accepts(&row.table_name))
            .cloned()
            .collect())
    }

    async fn table_rows(&self, filter: &SchemaFilter) -> Result<Vec<TableRow>> {
        if filter.database != self.database {
            return Ok(Vec::new());
        }

        Ok(self
            .tables
            .iter()
            .filter(|row| filter.accepts(&row.table_name))
            .cloned()
            .collect())
    }

    async fn probe_table(&self, table_name: &str) -> Result<Vec<ProbedColumn>> {
        if let Some(probed) = self.probes.get(table_name) {
            return Ok(probed.clone());
        }

        Ok(self
            .columns
            .iter()
            .filter(|row| row.table_name == table_name)
            .map(|row| ProbedColumn {
                name: row.column_name.clone(),
                semantic_type: SemanticType::from_declared(&row.column_type),
            })
            .collect())
    }
}
