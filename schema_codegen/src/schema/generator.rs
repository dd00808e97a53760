//! Class definition generator
//!
//! This module renders one C# entity class per table, optionally with a
//! reading constructor and UPDATE/INSERT/DELETE query templates.
//!
//! The query templates are plain interpolated strings. Values are neither
//! escaped nor parameterized, so they are unsafe for untrusted input.

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::config::ClassConfig;
use crate::error::{Error, Result};
use crate::output::Artifact;
use crate::schema::types::{Column, Database, SemanticType, Table};
use crate::utils::naming::{apply_naming_convention, classify};

const INDENT: &str = "    ";

/// Entity class generator
pub struct ClassGenerator<'a> {
    config: &'a ClassConfig,
    constructor_and_queries: bool,
}

impl<'a> ClassGenerator<'a> {
    /// Create a new class generator
    pub fn new(config: &'a ClassConfig, constructor_and_queries: bool) -> Self {
        Self {
            config,
            constructor_and_queries,
        }
    }

    /// Render one class artifact per table, in table order
    pub fn generate_all(&self, database: &Database) -> Result<Vec<Artifact>> {
        database
            .tables
            .values()
            .map(|table| self.generate(&database.name, table))
            .collect()
    }

    /// Render the class artifact of one table
    pub fn generate(&self, database_name: &str, table: &Table) -> Result<Artifact> {
        let grouping = classify(&table.name)?;

        let mut path = PathBuf::from(database_name);
        let mut namespace = self.config.namespace.clone();
        if let Some(prefix) = &grouping.group_prefix {
            path.push(prefix);
            namespace = format!("{}.{}", namespace, prefix);
        }
        path.push(format!("{}.{}", table.name, self.config.file_extension));

        let mut out = String::new();
        for using in &self.config.usings {
            line(&mut out, 0, &format!("using {};", using));
        }
        line(&mut out, 0, "");
        line(&mut out, 0, &format!("namespace {}", namespace));
        line(&mut out, 0, "{");

        if let Some(comment) = table.comment.as_deref().filter(|c| !c.is_empty()) {
            line(&mut out, 1, "/// <summary>");
            line(&mut out, 1, &format!("/// {}", comment));
            line(&mut out, 1, "/// </summary>");
        }
        line(&mut out, 1, &format!("public class {} : {}", table.name, self.config.base_type));
        line(&mut out, 1, "{");

        self.write_properties(&mut out, table);

        if self.constructor_and_queries {
            self.write_constructor(&mut out, table);
            self.write_query_method(&mut out, "UpdateQuery", &self.update_query(table)?);
            self.write_query_method(&mut out, "InsertQuery", &self.insert_query(table));
            self.write_query_method(&mut out, "DeleteQuery", &self.delete_query(table)?);
        }

        line(&mut out, 1, "}");
        line(&mut out, 0, "}");

        tracing::debug!(table = %table.name, path = %path.display(), "Rendered class");
        Ok(Artifact::overwrite(path, out))
    }

    fn write_properties(&self, out: &mut String, table: &Table) {
        for column in &table.columns {
            line(out, 0, "");
            let lowered = column.name.to_lowercase();
            if lowered == "seq" || lowered == "id" {
                continue;
            }

            if !column.comment.is_empty() {
                line(out, 2, "///<summary>");
                line(out, 2, &format!("///{}", column.comment));
                line(
                    out,
                    2,
                    &format!("///[{}, nullable({})]", column.column_type, bool_literal(column.allow_null)),
                );
                line(out, 2, "///</summary>");
            }
            // Unreachable after the skip above.
            if lowered == "seq" {
                line(out, 2, "[IgnoreDataMember]");
            }
            if lowered == "id" {
                line(out, 2, "[Key]");
            }
            if !column.allow_null {
                line(out, 2, "[Required]");
            }
            line(
                out,
                2,
                &format!(
                    "public {} {} {{ get; set; }}",
                    property_type(column),
                    self.property_name(column)
                ),
            );
        }
    }

    fn write_constructor(&self, out: &mut String, table: &Table) {
        line(out, 0, "");
        line(
            out,
            2,
            &format!("public {}({} reader)", table.name, self.config.reader_type),
        );
        line(out, 2, "{");
        for column in &table.columns {
            line(
                out,
                3,
                &format!("{} = {};", self.property_name(column), read_expression(column)),
            );
        }
        line(out, 2, "}");
    }

    fn write_query_method(&self, out: &mut String, method: &str, template: &str) {
        line(out, 0, "");
        line(out, 2, &format!("public string {}()", method));
        line(out, 2, "{");
        line(out, 3, &format!("return $\"{}\";", template));
        line(out, 2, "}");
    }

    /// `UPDATE` template setting every column, keyed on the first column
    pub fn update_query(&self, table: &Table) -> Result<String> {
        let key = key_column(table)?;
        let assignments = table
            .columns
            .iter()
            .map(|c| format!("{} = {{{}}}", c.name, self.property_name(c)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "UPDATE {} SET {} WHERE {} = {{{}}};",
            table_identifier(table),
            assignments,
            key.name,
            self.property_name(key)
        ))
    }

    /// `INSERT` template listing every column in declaration order
    pub fn insert_query(&self, table: &Table) -> String {
        let values = table
            .columns
            .iter()
            .map(|c| format!("{{{}}}", self.property_name(c)))
            .collect::<Vec<_>>()
            .join(", ");

        format!("INSERT INTO {} VALUES ({});", table_identifier(table), values)
    }

    /// `DELETE` template keyed on the first column
    pub fn delete_query(&self, table: &Table) -> Result<String> {
        let key = key_column(table)?;
        Ok(format!(
            "DELETE FROM {} WHERE {} = {{{}}};",
            table_identifier(table),
            key.name,
            self.property_name(key)
        ))
    }

    fn property_name(&self, column: &Column) -> String {
        apply_naming_convention(&column.name, &self.config.property_style)
    }
}

fn key_column(table: &Table) -> Result<&Column> {
    table.key_column().ok_or_else(|| {
        Error::GenerationError(format!("table `{}` has no columns to key queries on", table.name))
    })
}

/// Table name as written in the templates, backticks included verbatim
fn table_identifier(table: &Table) -> String {
    format!("`{}`", table.name)
}

fn line(out: &mut String, depth: usize, text: &str) {
    if text.is_empty() {
        out.push('\n');
        return;
    }
    let _ = writeln!(out, "{}{}", INDENT.repeat(depth), text);
}

fn bool_literal(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// C# type of the property generated for a column
fn property_type(column: &Column) -> String {
    match column.semantic_type {
        SemanticType::Guid | SemanticType::DateTime | SemanticType::Byte if column.allow_null => {
            format!("{}?", column.semantic_type.name())
        }
        SemanticType::String => "string".to_string(),
        other => other.name().to_string(),
    }
}

/// Expression reading a column from the data reader
fn read_expression(column: &Column) -> String {
    let raw = format!("reader[\"{}\"]", column.name);
    match column.semantic_type {
        SemanticType::String => format!("{}.ToString()", raw),
        SemanticType::Guid => format!("Guid.Parse({}.ToString())", raw),
        SemanticType::TimeSpan => format!("TimeSpan.Parse({}.ToString())", raw),
        SemanticType::ByteArray => format!("(byte[]){}", raw),
        other => format!("Convert.To{}({}.ToString())", other.name(), raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn users() -> Table {
        let mut table = Table::new("users");
        table.comment = Some("site users".to_string());
        table.add_column(Column::new("id", "int(11)").key(true).semantic(SemanticType::Int32));
        table.add_column(
            Column::new("name", "varchar(45)")
                .comment("display name")
                .semantic(SemanticType::String),
        );
        table.add_column(
            Column::new("email", "varchar(100)")
                .nullable(true)
                .semantic(SemanticType::String),
        );
        table.add_column(
            Column::new("created", "timestamp")
                .nullable(true)
                .semantic(SemanticType::DateTime),
        );
        table
    }

    #[test]
    fn test_users_class_without_queries() {
        let config = ClassConfig::default();
        let artifact = ClassGenerator::new(&config, false)
            .generate("shop", &users())
            .unwrap();

        assert_eq!(artifact.path, PathBuf::from("shop/users.cs"));
        assert_eq!(
            artifact.contents,
            r#"using System;
using NewCity.DataAccess.Model;
using System.ComponentModel.DataAnnotations;

namespace NewCity.DataAccess.Model
{
    /// <summary>
    /// site users
    /// </summary>
    public class users : TableBase
    {


        ///<summary>
        ///display name
        ///[varchar(45), nullable(False)]
        ///</summary>
        [Required]
        public string Name { get; set; }

        public string Email { get; set; }

        public DateTime? Created { get; set; }
    }
}
"#
        );
    }

    #[test]
    fn test_users_class_with_queries() {
        let config = ClassConfig::default();
        let artifact = ClassGenerator::new(&config, true)
            .generate("shop", &users())
            .unwrap();

        let expected_tail = r#"
        public users(MySqlDataReader reader)
        {
            Id = Convert.ToInt32(reader["id"].ToString());
            Name = reader["name"].ToString();
            Email = reader["email"].ToString();
            Created = Convert.ToDateTime(reader["created"].ToString());
        }

        public string UpdateQuery()
        {
            return $"UPDATE `users` SET id = {Id}, name = {Name}, email = {Email}, created = {Created} WHERE id = {Id};";
        }

        public string InsertQuery()
        {
            return $"INSERT INTO `users` VALUES ({Id}, {Name}, {Email}, {Created});";
        }

        public string DeleteQuery()
        {
            return $"DELETE FROM `users` WHERE id = {Id};";
        }
    }
}
"#;
        assert!(
            artifact.contents.ends_with(expected_tail),
            "unexpected class body:\n{}",
            artifact.contents
        );
        assert!(!artifact.contents.contains("public Int32 Id"));
    }

    #[test]
    fn test_grouped_table_path_and_namespace() {
        let config = ClassConfig::default();
        let mut table = Table::new("ABC_orders");
        table.add_column(Column::new("code", "varchar(10)"));

        let artifact = ClassGenerator::new(&config, false).generate("shop", &table).unwrap();

        assert_eq!(artifact.path, PathBuf::from("shop/ABC/ABC_orders.cs"));
        assert!(artifact.contents.contains("namespace NewCity.DataAccess.Model.ABC\n"));
        assert!(artifact.contents.contains("public class ABC_orders : TableBase"));
    }

    #[test]
    fn test_short_table_name_aborts() {
        let config = ClassConfig::default();
        let mut table = Table::new("ab");
        table.add_column(Column::new("x", "int"));

        let err = ClassGenerator::new(&config, false).generate("shop", &table).unwrap_err();
        assert!(matches!(err, Error::NamingError(_)));
    }

    #[test]
    fn test_seq_and_id_only_appear_in_constructor_and_queries() {
        let config = ClassConfig::default();
        let mut table = Table::new("events");
        table.add_column(Column::new("Seq", "bigint").semantic(SemanticType::Int64));
        table.add_column(Column::new("ID", "char(36)").semantic(SemanticType::Guid));
        table.add_column(Column::new("kind", "varchar(10)"));

        let generator = ClassGenerator::new(&config, true);
        let contents = generator.generate("shop", &table).unwrap().contents;

        assert!(!contents.contains("[IgnoreDataMember]"));
        assert!(!contents.contains("[Key]"));
        assert!(!contents.contains("public Int64 Seq"));
        assert!(contents.contains("Seq = Convert.ToInt64(reader[\"Seq\"].ToString());"));
        assert!(contents.contains("ID = Guid.Parse(reader[\"ID\"].ToString());"));
        assert_eq!(
            generator.insert_query(&table),
            "INSERT INTO `events` VALUES ({Seq}, {ID}, {Kind});"
        );
        assert_eq!(
            generator.update_query(&table).unwrap(),
            "UPDATE `events` SET Seq = {Seq}, ID = {ID}, kind = {Kind} WHERE Seq = {Seq};"
        );
    }

    #[test]
    fn test_where_clause_uses_first_column_not_primary_key() {
        let config = ClassConfig::default();
        let mut table = Table::new("orders");
        table.add_column(Column::new("code", "varchar(10)"));
        table.add_column(Column::new("order_no", "int").key(true).semantic(SemanticType::Int32));

        let generator = ClassGenerator::new(&config, true);
        assert_eq!(
            generator.delete_query(&table).unwrap(),
            "DELETE FROM `orders` WHERE code = {Code};"
        );
        assert!(generator
            .update_query(&table)
            .unwrap()
            .ends_with("WHERE code = {Code};"));
    }

    #[test]
    fn test_skipped_columns_keep_their_blank_line() {
        let config = ClassConfig::default();
        let mut table = Table::new("users");
        table.add_column(Column::new("id", "int").semantic(SemanticType::Int32));
        table.add_column(Column::new("seq", "bigint").semantic(SemanticType::Int64));
        table.add_column(Column::new("name", "varchar(45)").comment("c"));

        let contents = ClassGenerator::new(&config, false)
            .generate("shop", &table)
            .unwrap()
            .contents;

        assert!(contents.ends_with(
            "    public class users : TableBase\n    {\n\n\n\n        ///<summary>\n        ///c\n        ///[varchar(45), nullable(False)]\n        ///</summary>\n        [Required]\n        public string Name { get; set; }\n    }\n}\n"
        ));
    }

    #[test]
    fn test_table_name_is_not_escaped_in_templates() {
        let config = ClassConfig::default();
        let mut table = Table::new("we`ird");
        table.add_column(Column::new("code", "varchar(10)"));

        let generator = ClassGenerator::new(&config, true);
        assert_eq!(
            generator.delete_query(&table).unwrap(),
            "DELETE FROM `we`ird` WHERE code = {Code};"
        );
        assert_eq!(generator.insert_query(&table), "INSERT INTO `we`ird` VALUES ({Code});");
    }

    #[test]
    fn test_nullable_forms() {
        let column = |ty| Column::new("c", "x").nullable(true).semantic(ty);
        assert_eq!(property_type(&column(SemanticType::Guid)), "Guid?");
        assert_eq!(property_type(&column(SemanticType::DateTime)), "DateTime?");
        assert_eq!(property_type(&column(SemanticType::Byte)), "Byte?");
        assert_eq!(property_type(&column(SemanticType::Int32)), "Int32");
        assert_eq!(property_type(&column(SemanticType::String)), "string");
        assert_eq!(property_type(&column(SemanticType::ByteArray)), "Byte[]");

        let required = Column::new("c", "x").semantic(SemanticType::DateTime);
        assert_eq!(property_type(&required), "DateTime");
    }

    #[test]
    fn test_property_style_applies_everywhere() {
        let config = ClassConfig {
            property_style: "pascal_case".to_string(),
            ..ClassConfig::default()
        };
        let mut table = Table::new("users");
        table.add_column(Column::new("user_id", "int").semantic(SemanticType::Int32));

        let generator = ClassGenerator::new(&config, true);
        let contents = generator.generate("shop", &table).unwrap().contents;

        assert!(contents.contains("public Int32 UserId { get; set; }"));
        assert!(contents.contains("UserId = Convert.ToInt32(reader[\"user_id\"].ToString());"));
        assert_eq!(
            generator.delete_query(&table).unwrap(),
            "DELETE FROM `users` WHERE user_id = {UserId};"
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = ClassConfig::default();
        let mut db = Database::new("shop");
        db.add_table(users());

        let generator = ClassGenerator::new(&config, true);
        assert_eq!(generator.generate_all(&db).unwrap(), generator.generate_all(&db).unwrap());
    }
}
