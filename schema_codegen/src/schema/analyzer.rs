//! Database schema analyzer
//!
//! Drives a [`MetadataSource`] through the two-phase build of a [`Database`].

use crate::db::metadata::{MetadataSource, SchemaFilter};
use crate::error::Result;
use crate::schema::builder::SchemaBuilder;
use crate::schema::types::Database;

/// Schema analyzer for database schema introspection
pub struct SchemaAnalyzer<S> {
    source: S,
}

impl<S> SchemaAnalyzer<S>
where
    S: MetadataSource + Sync,
{
    /// Create a new schema analyzer
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Access the underlying metadata source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Analyze the schema selected by `filter`.
    ///
    /// All metadata is fetched before this returns. A filter matching no
    /// columns yields an empty database rather than an error.
    pub async fn analyze(&self, filter: &SchemaFilter) -> Result<Database> {
        let column_rows = self.source.column_rows(filter).await?;
        if column_rows.is_empty() {
            tracing::warn!(
                database = %filter.database,
                table = ?filter.table,
                "No column metadata found, nothing to generate"
            );
            return Ok(Database::new(&filter.database));
        }

        let mut builder = SchemaBuilder::new(&filter.database);
        builder.add_column_rows(&column_rows);

        let table_rows = self.source.table_rows(filter).await?;
        builder.apply_table_comments(&table_rows);

        for table_name in builder.table_names() {
            let probed = self.source.probe_table(&table_name).await?;
            builder.apply_probe(&table_name, &probed)?;
        }

        let database = builder.build();
        tracing::info!(
            database = %database.name,
            tables = database.tables.len(),
            columns = column_rows.len(),
            "Analyzed schema"
        );
        Ok(database)
    }
}
