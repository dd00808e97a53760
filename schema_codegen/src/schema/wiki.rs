//! Wiki page generator
//!
//! Renders markup pages describing a database: an entry in the global
//! `wiki/index.txt`, an index page per database and a page per table.

use std::path::PathBuf;

use crate::output::Artifact;
use crate::schema::types::{Database, Table};
use crate::utils::naming::apply_naming_convention;

const WIKI_ROOT: &str = "wiki";
const ROOT_CRUMB: &str = "[[Database Structure|Database Structure]]";

/// Documentation page generator
pub struct WikiGenerator<'a> {
    property_style: &'a str,
}

impl<'a> WikiGenerator<'a> {
    /// Create a new wiki generator naming columns with `property_style`
    pub fn new(property_style: &'a str) -> Self {
        Self { property_style }
    }

    /// Render every page for a database.
    ///
    /// `display_name` names the wiki directory and breadcrumbs and may differ
    /// from the schema name.
    pub fn generate(&self, display_name: &str, database: &Database) -> Vec<Artifact> {
        let mut artifacts = Vec::with_capacity(database.tables.len() + 2);
        artifacts.push(self.global_index_entry(display_name));
        artifacts.push(self.database_index(display_name, database));
        artifacts.extend(
            database
                .tables
                .values()
                .map(|table| self.table_page(display_name, table)),
        );
        artifacts
    }

    /// Line appended to the global index; repeated runs repeat the entry
    pub fn global_index_entry(&self, display_name: &str) -> Artifact {
        Artifact::append(
            PathBuf::from(WIKI_ROOT).join("index.txt"),
            format!("* {}\n", link(display_name, display_name)),
        )
    }

    /// Index page listing the tables of a database
    pub fn database_index(&self, display_name: &str, database: &Database) -> Artifact {
        let mut out = format!("{} > {}\n", ROOT_CRUMB, link(display_name, display_name));
        for table in database.tables.values() {
            let label = apply_naming_convention(&table.name, self.property_style);
            out.push_str(&format!("* {}\n", link(&label, &table.name.to_lowercase())));
        }

        Artifact::overwrite(
            PathBuf::from(WIKI_ROOT)
                .join(display_name)
                .join(format!("{}.txt", display_name)),
            out,
        )
    }

    /// Page listing the columns of one table
    pub fn table_page(&self, display_name: &str, table: &Table) -> Artifact {
        let mut out = format!(
            "{} > {} > {}\n\n",
            ROOT_CRUMB,
            link(display_name, display_name),
            link(&table.name, &table.name)
        );
        out.push_str("Column | Type | Description\n");
        out.push_str("--- | --- | ---\n");
        for column in &table.columns {
            out.push_str(&format!(
                "{} | {} | \n",
                apply_naming_convention(&column.name, self.property_style),
                column.column_type
            ));
        }

        Artifact::overwrite(
            PathBuf::from(WIKI_ROOT)
                .join(display_name)
                .join("tables")
                .join(format!("{}.txt", table.name)),
            out,
        )
    }
}

fn link(label: &str, target: &str) -> String {
    format!("[[{}|{}]]", label, target)
}
