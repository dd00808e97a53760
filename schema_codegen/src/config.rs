//! Configuration handling for schema_codegen

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Load configuration from a TOML file
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;

    Ok(config)
}

/// Represents the complete schema_codegen configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub generation: GenerationConfig,
    pub class: ClassConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Fail early when no database name was given anywhere
    pub fn validate(&self) -> Result<()> {
        if self.database.database.trim().is_empty() {
            return Err(Error::ConfigError("You didn't specify a database".to_string()));
        }
        Ok(())
    }

    /// Name used for wiki breadcrumbs and wiki directories
    pub fn markup_database_name(&self) -> &str {
        match self.generation.markup_database_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.database.database,
        }
    }
}

/// Database connection configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Restrict generation to a single table
    pub table: Option<String>,
    pub pool_size: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: String::new(),
            table: None,
            pool_size: None,
            timeout_seconds: None,
        }
    }
}

impl DatabaseConfig {
    /// Table filter, treating an empty name as "all tables"
    pub fn table_filter(&self) -> Option<&str> {
        self.table.as_deref().filter(|t| !t.is_empty())
    }

    /// Human-readable connection description with the password masked
    pub fn describe(&self) -> String {
        let password = if self.password.is_empty() { "" } else { "***" };
        format!(
            "Server={};Port={};Uid={};Pwd={};Database={}",
            self.host, self.port, self.user, password, self.database
        )
    }
}

/// What to generate and where
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    /// Emit the reading constructor and the UPDATE/INSERT/DELETE templates
    pub constructor_and_queries: bool,
    /// Emit wiki pages for the database and its tables
    pub markup_pages: bool,
    /// Replaces the database name in wiki breadcrumbs and paths
    pub markup_database_name: Option<String>,
    pub output_directory: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            constructor_and_queries: false,
            markup_pages: false,
            markup_database_name: None,
            output_directory: ".".to_string(),
        }
    }
}

/// Shape of the emitted classes
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ClassConfig {
    pub usings: Vec<String>,
    pub namespace: String,
    pub base_type: String,
    pub reader_type: String,
    pub file_extension: String,
    /// `first_upper`, or any convention understood by `apply_naming_convention`
    pub property_style: String,
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            usings: vec![
                "System".to_string(),
                "NewCity.DataAccess.Model".to_string(),
                "System.ComponentModel.DataAnnotations".to_string(),
            ],
            namespace: "NewCity.DataAccess.Model".to_string(),
            base_type: "TableBase".to_string(),
            reader_type: "MySqlDataReader".to_string(),
            file_extension: "cs".to_string(),
            property_style: "first_upper".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub format: String,
    /// Log to the terminal when no file is set. Output goes to stderr.
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: "text".to_string(),
            console: true,
        }
    }
}
