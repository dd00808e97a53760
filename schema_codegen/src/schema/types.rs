//! Type definitions for database schema objects

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents one database and the tables discovered in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    /// Tables in discovery order
    pub tables: IndexMap<String, Table>,
}

impl Database {
    /// Create a new empty database
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tables: IndexMap::new(),
        }
    }

    /// Add a table, replacing any table of the same name in place
    pub fn add_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Represents a database table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
    pub comment: Option<String>,
}

impl Table {
    /// Create a new table with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            comment: None,
        }
    }

    /// Add a column to the table
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// The column query templates bind their WHERE clause on.
    ///
    /// This is the first declared column, whether or not it carries the
    /// primary key flag.
    pub fn key_column(&self) -> Option<&Column> {
        self.columns.first()
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }
}

/// Represents a database column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Declared type as reported by the information schema, e.g. `varchar(45)`
    pub column_type: String,
    pub semantic_type: SemanticType,
    pub allow_null: bool,
    pub key_column: bool,
    pub comment: String,
    pub default: Option<String>,
}

impl Column {
    /// Create a new column, guessing its semantic type from the declared type
    pub fn new(name: &str, column_type: &str) -> Self {
        Self {
            name: name.to_string(),
            column_type: column_type.to_string(),
            semantic_type: SemanticType::from_declared(column_type),
            allow_null: false,
            key_column: false,
            comment: String::new(),
            default: None,
        }
    }

    /// Set whether the column accepts NULL
    pub fn nullable(mut self, allow_null: bool) -> Self {
        self.allow_null = allow_null;
        self
    }

    /// Mark the column as part of the primary key
    pub fn key(mut self, key_column: bool) -> Self {
        self.key_column = key_column;
        self
    }

    /// Set the column comment
    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.trim().to_string();
        self
    }

    /// Override the semantic type
    pub fn semantic(mut self, semantic_type: SemanticType) -> Self {
        self.semantic_type = semantic_type;
        self
    }
}

/// Driver-level data type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticType {
    String,
    Boolean,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    DateTime,
    TimeSpan,
    Guid,
    ByteArray,
}

static DECLARED_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([a-z]+)(?:\s*\(\s*(\d+)\s*(?:,\s*\d+\s*)?\))?(\s+unsigned)?")
        .expect("declared type pattern is valid")
});

impl SemanticType {
    /// Canonical name of the type, e.g. `Int32` or `Byte[]`
    pub fn name(&self) -> &'static str {
        match self {
            SemanticType::String => "String",
            SemanticType::Boolean => "Boolean",
            SemanticType::SByte => "SByte",
            SemanticType::Byte => "Byte",
            SemanticType::Int16 => "Int16",
            SemanticType::UInt16 => "UInt16",
            SemanticType::Int32 => "Int32",
            SemanticType::UInt32 => "UInt32",
            SemanticType::Int64 => "Int64",
            SemanticType::UInt64 => "UInt64",
            SemanticType::Single => "Single",
            SemanticType::Double => "Double",
            SemanticType::Decimal => "Decimal",
            SemanticType::DateTime => "DateTime",
            SemanticType::TimeSpan => "TimeSpan",
            SemanticType::Guid => "Guid",
            SemanticType::ByteArray => "Byte[]",
        }
    }

    /// Best guess from an information-schema type string.
    ///
    /// Only a seed value: the structural probe overwrites it.
    pub fn from_declared(column_type: &str) -> Self {
        let lowered = column_type.to_lowercase();
        let Some(caps) = DECLARED_TYPE.captures(&lowered) else {
            return SemanticType::String;
        };

        let base = caps.get(1).map_or("", |m| m.as_str());
        let length = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
        let unsigned = caps.get(3).is_some();

        match (base, length, unsigned) {
            ("tinyint", Some(1), _) | ("bool", _, _) | ("boolean", _, _) => SemanticType::Boolean,
            ("tinyint", _, true) => SemanticType::Byte,
            ("tinyint", _, false) => SemanticType::SByte,
            ("smallint", _, true) => SemanticType::UInt16,
            ("smallint", _, false) => SemanticType::Int16,
            ("mediumint" | "int" | "integer", _, true) => SemanticType::UInt32,
            ("mediumint" | "int" | "integer", _, false) => SemanticType::Int32,
            ("bigint", _, true) => SemanticType::UInt64,
            ("bigint", _, false) => SemanticType::Int64,
            ("float", _, _) => SemanticType::Single,
            ("double" | "real", _, _) => SemanticType::Double,
            ("decimal" | "numeric" | "dec", _, _) => SemanticType::Decimal,
            ("date" | "datetime" | "timestamp", _, _) => SemanticType::DateTime,
            ("time", _, _) => SemanticType::TimeSpan,
            ("year", _, _) => SemanticType::Int32,
            ("bit", _, _) => SemanticType::UInt64,
            ("char", Some(36), _) | ("binary", Some(16), _) => SemanticType::Guid,
            ("binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob", _, _) => {
                SemanticType::ByteArray
            }
            ("geometry" | "point" | "linestring" | "polygon", _, _) => SemanticType::ByteArray,
            _ => SemanticType::String,
        }
    }

    /// Resolve a type from the driver's column type name as reported by a
    /// prepared statement (`INT UNSIGNED`, `CHAR`, `BOOLEAN`, ...).
    ///
    /// The declared type is still needed to tell GUID-shaped `CHAR(36)` and
    /// `BINARY(16)` columns apart from plain strings and opaque binary.
    pub fn from_driver_type(type_name: &str, column_type: &str) -> Self {
        match type_name.to_uppercase().as_str() {
            "BOOLEAN" => SemanticType::Boolean,
            "TINYINT UNSIGNED" => SemanticType::Byte,
            "TINYINT" => SemanticType::SByte,
            "SMALLINT UNSIGNED" => SemanticType::UInt16,
            "SMALLINT" => SemanticType::Int16,
            "MEDIUMINT UNSIGNED" | "INT UNSIGNED" => SemanticType::UInt32,
            "MEDIUMINT" | "INT" | "YEAR" => SemanticType::Int32,
            "BIGINT UNSIGNED" | "BIT" => SemanticType::UInt64,
            "BIGINT" => SemanticType::Int64,
            "FLOAT" => SemanticType::Single,
            "DOUBLE" => SemanticType::Double,
            "DECIMAL" => SemanticType::Decimal,
            "DATE" | "DATETIME" | "TIMESTAMP" => SemanticType::DateTime,
            "TIME" => SemanticType::TimeSpan,
            "CHAR" if is_guid_shaped(column_type) => SemanticType::Guid,
            "BINARY" if is_guid_shaped(column_type) => SemanticType::Guid,
            "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
            | "SET" | "JSON" => SemanticType::String,
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB"
            | "GEOMETRY" => SemanticType::ByteArray,
            _ => SemanticType::from_declared(column_type),
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_guid_shaped(column_type: &str) -> bool {
    let normalized: String = column_type
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    normalized == "char(36)" || normalized == "binary(16)"
}
