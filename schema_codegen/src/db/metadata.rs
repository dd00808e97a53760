//! Schema metadata sources
//!
//! A metadata source supplies the raw rows the schema builder works from:
//! one row per column, one row per table comment, and a structural probe of
//! each table that reports the driver's resolved type for every column.

use async_trait::async_trait;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use sqlx::{Column as _, Executor, FromRow, Statement, TypeInfo};
use std::collections::HashMap;

use crate::db::connection::DatabaseConnection;
use crate::error::Result;
use crate::schema::types::SemanticType;

/// Which part of the schema to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFilter {
    pub database: String,
    pub table: Option<String>,
}

impl SchemaFilter {
    pub fn new(database: &str, table: Option<&str>) -> Self {
        Self {
            database: database.to_string(),
            table: table.filter(|t| !t.is_empty()).map(str::to_string),
        }
    }

    /// Whether a table passes the table filter
    pub fn accepts(&self, table_name: &str) -> bool {
        self.table.as_deref().map_or(true, |t| t == table_name)
    }
}

/// One row of `INFORMATION_SCHEMA.COLUMNS`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ColumnRow {
    pub table_name: String,
    pub column_name: String,
    pub column_type: String,
    pub column_default: Option<String>,
    pub is_nullable: String,
    pub column_key: String,
    pub column_comment: String,
}

/// One row of `INFORMATION_SCHEMA.TABLES`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TableRow {
    pub table_name: String,
    pub table_comment: Option<String>,
}

/// A column as seen by the structural probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbedColumn {
    pub name: String,
    pub semantic_type: SemanticType,
}

/// Supplier of schema metadata rows
#[async_trait]
pub trait MetadataSource {
    /// Column rows, in table then declaration order
    async fn column_rows(&self, filter: &SchemaFilter) -> Result<Vec<ColumnRow>>;

    /// Table comment rows
    async fn table_rows(&self, filter: &SchemaFilter) -> Result<Vec<TableRow>>;

    /// Zero-row structural probe of a single table
    async fn probe_table(&self, table_name: &str) -> Result<Vec<ProbedColumn>>;
}

/// Metadata source backed by a live MySQL connection
pub struct MySqlMetadataSource {
    connection: DatabaseConnection,
}

impl MySqlMetadataSource {
    /// Create a new metadata source over an open connection
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl MetadataSource for MySqlMetadataSource {
    async fn column_rows(&self, filter: &SchemaFilter) -> Result<Vec<ColumnRow>> {
        let mut sql = String::from(
            r#"
            SELECT
                CAST(TABLE_NAME AS CHAR) AS table_name,
                CAST(COLUMN_NAME AS CHAR) AS column_name,
                CAST(COLUMN_TYPE AS CHAR) AS column_type,
                CAST(COLUMN_DEFAULT AS CHAR) AS column_default,
                CAST(IS_NULLABLE AS CHAR) AS is_nullable,
                CAST(COLUMN_KEY AS CHAR) AS column_key,
                CAST(COLUMN_COMMENT AS CHAR) AS column_comment
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = ?
            "#,
        );
        if filter.table.is_some() {
            sql.push_str(" AND TABLE_NAME = ?");
        }
        sql.push_str(" ORDER BY TABLE_NAME, ORDINAL_POSITION");

        let mut query = sqlx::query_as::<_, ColumnRow>(&sql).bind(&filter.database);
        if let Some(table) = &filter.table {
            query = query.bind(table);
        }

        let mut rows = Vec::new();
        let mut stream = query.fetch(self.connection.pool());
        while let Some(row) = stream.try_next().await? {
            rows.push(row);
        }

        tracing::debug!(database = %filter.database, rows = rows.len(), "Fetched column metadata");
        Ok(rows)
    }

    async fn table_rows(&self, filter: &SchemaFilter) -> Result<Vec<TableRow>> {
        let mut sql = String::from(
            r#"
            SELECT
                CAST(TABLE_NAME AS CHAR) AS table_name,
                CAST(TABLE_COMMENT AS CHAR) AS table_comment
            FROM INFORMATION_SCHEMA.TABLES
            WHERE TABLE_SCHEMA = ?
            "#,
        );
        if filter.table.is_some() {
            sql.push_str(" AND TABLE_NAME = ?");
        }

        let mut query = sqlx::query_as::<_, TableRow>(&sql).bind(&filter.database);
        if let Some(table) = &filter.table {
            query = query.bind(table);
        }

        let rows = query.fetch_all(self.connection.pool()).await?;
        tracing::debug!(database = %filter.database, rows = rows.len(), "Fetched table metadata");
        Ok(rows)
    }

    async fn probe_table(&self, table_name: &str) -> Result<Vec<ProbedColumn>> {
        // The declared types are needed to recognise GUID-shaped columns.
        let declared: HashMap<String, String> = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT CAST(COLUMN_NAME AS CHAR), CAST(COLUMN_TYPE AS CHAR)
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            "#,
        )
        .bind(table_name)
        .fetch_all(self.connection.pool())
        .await?
        .into_iter()
        .collect();

        let sql = format!(
            "SELECT * FROM `{}` LIMIT 0",
            table_name.replace('`', "``")
        );
        let statement = self.connection.pool().prepare(&sql).await?;

        let probed = statement
            .columns()
            .iter()
            .map(|column| {
                let column_type = declared
                    .get(column.name())
                    .map(String::as_str)
                    .unwrap_or_default();
                ProbedColumn {
                    name: column.name().to_string(),
                    semantic_type: SemanticType::from_driver_type(
                        column.type_info().name(),
                        column_type,
                    ),
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(table = table_name, columns = probed.len(), "Probed table structure");
        Ok(probed)
    }
}
