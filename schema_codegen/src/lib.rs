//! schema_codegen: generates entity classes and wiki pages from a MySQL schema
//!
//! The schema of a database is read once, turned into a typed model, and
//! rendered into one C# class per table (optionally with a reading
//! constructor and query templates) plus optional wiki documentation pages.

pub mod config;
pub mod db;
pub mod error;
pub mod output;
pub mod schema;
pub mod utils;

use std::path::PathBuf;

// Re-export main types for easier access
pub use config::Config;
pub use db::{DatabaseConnection, MetadataSource, MySqlMetadataSource, SchemaFilter, Snapshot};
pub use error::{Error, Result};
pub use output::{Artifact, ArtifactWriter, WriteMode};
pub use schema::{ClassGenerator, Database, SchemaAnalyzer, WikiGenerator};

/// Outcome of a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub tables: usize,
    pub class_files: usize,
    pub wiki_pages: usize,
    /// Every path written, in write order
    pub written: Vec<PathBuf>,
}

/// The main client for generating artifacts from a schema
pub struct CodegenClient {
    config: Config,
}

impl CodegenClient {
    /// Create a new client, rejecting configurations without a database
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Metadata filter derived from the configured database and table
    pub fn filter(&self) -> SchemaFilter {
        SchemaFilter::new(&self.config.database.database, self.config.database.table_filter())
    }

    /// Build the schema model from a metadata source
    pub async fn analyze<S>(&self, source: S) -> Result<Database>
    where
        S: MetadataSource + Sync,
    {
        SchemaAnalyzer::new(source).analyze(&self.filter()).await
    }

    /// Render every artifact for a database: class files first, then the
    /// wiki pages when enabled. An empty database renders nothing.
    pub fn render(&self, database: &Database) -> Result<Vec<Artifact>> {
        if database.is_empty() {
            return Ok(Vec::new());
        }

        let generator = ClassGenerator::new(
            &self.config.class,
            self.config.generation.constructor_and_queries,
        );
        let mut artifacts = generator.generate_all(database)?;

        if self.config.generation.markup_pages {
            let wiki = WikiGenerator::new(&self.config.class.property_style);
            artifacts.extend(wiki.generate(self.config.markup_database_name(), database));
        }

        Ok(artifacts)
    }

    /// Write rendered artifacts below the configured output directory
    pub fn write(&self, database: &Database, artifacts: &[Artifact]) -> Result<GenerationReport> {
        let writer = ArtifactWriter::new(&self.config.generation.output_directory);
        let written = writer.write_all(artifacts)?;
        let class_files = if database.is_empty() { 0 } else { database.tables.len() };

        Ok(GenerationReport {
            tables: database.tables.len(),
            class_files,
            wiki_pages: artifacts.len().saturating_sub(class_files),
            written,
        })
    }

    /// Complete workflow: analyze the schema, render and write every artifact
    pub async fn run<S>(&self, source: S) -> Result<GenerationReport>
    where
        S: MetadataSource + Sync,
    {
        let database = self.analyze(source).await?;
        if database.is_empty() {
            tracing::info!(database = %database.name, "Nothing to generate");
            return Ok(GenerationReport::default());
        }

        let artifacts = self.render(&database)?;
        let report = self.write(&database, &artifacts)?;

        tracing::info!(
            database = %database.name,
            tables = report.tables,
            class_files = report.class_files,
            wiki_pages = report.wiki_pages,
            output = %self.config.generation.output_directory,
            "Generation finished"
        );
        Ok(report)
    }
}
