//! Schema model builder
//!
//! Builds a [`Database`] from metadata rows in two phases: column shells are
//! assembled from the information-schema rows first, then every column's
//! semantic type is overwritten from the structural probe of its table.

use crate::db::metadata::{ColumnRow, ProbedColumn, TableRow};
use crate::error::{Error, Result};
use crate::schema::types::{Column, Database, Table};

impl From<&ColumnRow> for Column {
    fn from(row: &ColumnRow) -> Self {
        let mut column = Column::new(&row.column_name, &row.column_type)
            .nullable(row.is_nullable == "YES")
            .key(row.column_key == "PRI")
            .comment(&row.column_comment);
        column.default = row.column_default.clone();
        column
    }
}

/// Incrementally assembles a [`Database`]
pub struct SchemaBuilder {
    database: Database,
}

impl SchemaBuilder {
    /// Start an empty database
    pub fn new(name: &str) -> Self {
        Self {
            database: Database::new(name),
        }
    }

    /// Add one column row, opening its table on first sight
    pub fn add_column_row(&mut self, row: &ColumnRow) {
        let table = self
            .database
            .tables
            .entry(row.table_name.clone())
            .or_insert_with(|| Table::new(&row.table_name));
        table.add_column(Column::from(row));
    }

    /// Add many column rows in order
    pub fn add_column_rows<'a>(&mut self, rows: impl IntoIterator<Item = &'a ColumnRow>) {
        for row in rows {
            self.add_column_row(row);
        }
    }

    /// Attach table comments; rows for tables without columns are ignored
    pub fn apply_table_comments<'a>(&mut self, rows: impl IntoIterator<Item = &'a TableRow>) {
        for row in rows {
            if let Some(table) = self.database.tables.get_mut(&row.table_name) {
                table.comment = row.table_comment.clone();
            }
        }
    }

    /// Names of the tables still awaiting a probe, in discovery order
    pub fn table_names(&self) -> Vec<String> {
        self.database.tables.keys().cloned().collect()
    }

    /// Overwrite the semantic types of a table's columns from its probe
    pub fn apply_probe(&mut self, table_name: &str, probed: &[ProbedColumn]) -> Result<()> {
        let table = self.database.tables.get_mut(table_name).ok_or_else(|| {
            Error::SchemaAnalysisError(format!("Probed unknown table `{}`", table_name))
        })?;

        let column_names: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();
        for name in column_names {
            let resolved = probed.iter().find(|p| p.name == name).ok_or_else(|| {
                Error::SchemaAnalysisError(format!(
                    "Probe of `{}` did not report column `{}`",
                    table_name, name
                ))
            })?;

            if let Some(column) = table.column_mut(&name) {
                column.semantic_type = resolved.semantic_type;
            }
        }

        Ok(())
    }

    /// Finish building
    pub fn build(self) -> Database {
        self.database
    }
}
