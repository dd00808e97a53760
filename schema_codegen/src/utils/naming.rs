//! Naming utilities for schema_codegen
//!
//! Property naming and the project table grouping convention.

use inflector::Inflector;

use crate::error::{Error, Result};

/// Apply a naming convention to a string
pub fn apply_naming_convention(name: &str, convention: &str) -> String {
    match convention {
        "first_upper" => first_char_upper(name),
        "snake_case" => name.to_snake_case(),
        "camel_case" => name.to_camel_case(),
        "pascal_case" => name.to_pascal_case(),
        "kebab_case" => name.to_kebab_case(),
        "screaming_snake_case" => name.to_screaming_snake_case(),
        "title_case" => name.to_title_case(),
        _ => name.to_string(), // Default: keep as is
    }
}

/// Upper-case the first character and keep the rest untouched
pub fn first_char_upper(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Where a table's generated class belongs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingDecision {
    pub grouped: bool,
    pub group_prefix: Option<String>,
}

impl GroupingDecision {
    fn ungrouped() -> Self {
        Self {
            grouped: false,
            group_prefix: None,
        }
    }
}

/// Classify a table name against the project naming convention.
///
/// A project table starts with three upper-case ASCII letters followed by an
/// underscore, e.g. `ABC_orders`; its group is the text before the first
/// underscore. The check reads fixed offsets, so names shorter than four
/// characters are rejected.
pub fn classify(table_name: &str) -> Result<GroupingDecision> {
    let head: Vec<char> = table_name.chars().take(4).collect();
    if head.len() < 4 {
        return Err(Error::NamingError(format!(
            "table name `{}` is shorter than four characters",
            table_name
        )));
    }

    let grouped = head[..3].iter().all(char::is_ascii_uppercase) && head[3] == '_';

    if !grouped {
        return Ok(GroupingDecision::ungrouped());
    }

    let prefix = table_name.split('_').next().unwrap_or_default();
    Ok(GroupingDecision {
        grouped: true,
        group_prefix: Some(prefix.to_string()),
    })
}
