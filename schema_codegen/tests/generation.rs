//! End-to-end generation tests driven by in-memory schema snapshots

use pretty_assertions::assert_eq;
use rstest::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use walkdir::WalkDir;

use schema_codegen::db::{ColumnRow, ProbedColumn, TableRow};
use schema_codegen::schema::SemanticType;
use schema_codegen::{CodegenClient, Config, Snapshot};

fn column(table: &str, name: &str, column_type: &str, nullable: bool, key: bool) -> ColumnRow {
    ColumnRow {
        table_name: table.to_string(),
        column_name: name.to_string(),
        column_type: column_type.to_string(),
        column_default: None,
        is_nullable: if nullable { "YES" } else { "NO" }.to_string(),
        column_key: if key { "PRI" } else { "" }.to_string(),
        column_comment: String::new(),
    }
}

fn probe(columns: &[(&str, SemanticType)]) -> Vec<ProbedColumn> {
    columns
        .iter()
        .map(|(name, semantic_type)| ProbedColumn {
            name: name.to_string(),
            semantic_type: *semantic_type,
        })
        .collect()
}

#[fixture]
fn shop() -> Snapshot {
    let mut snapshot = Snapshot::new("shop");
    snapshot.columns = vec![
        column("users", "id", "int(11)", false, true),
        column("users", "name", "varchar(45)", false, false),
        column("users", "email", "varchar(100)", true, false),
        column("users", "created", "timestamp", true, false),
        column("ABC_orders", "seq", "bigint(20)", false, false),
        column("ABC_orders", "code", "char(36)", false, true),
        column("ABC_orders", "total", "decimal(10,2)", true, false),
        column("orders", "code", "varchar(10)", false, false),
    ];
    snapshot.tables = vec![
        TableRow {
            table_name: "users".to_string(),
            table_comment: Some("site users".to_string()),
        },
        TableRow {
            table_name: "ABC_orders".to_string(),
            table_comment: Some(String::new()),
        },
        TableRow {
            table_name: "orders".to_string(),
            table_comment: None,
        },
    ];
    snapshot.probes.insert(
        "users".to_string(),
        probe(&[
            ("id", SemanticType::Int32),
            ("name", SemanticType::String),
            ("email", SemanticType::String),
            ("created", SemanticType::DateTime),
        ]),
    );
    snapshot.probes.insert(
        "ABC_orders".to_string(),
        probe(&[
            ("seq", SemanticType::Int64),
            ("code", SemanticType::Guid),
            ("total", SemanticType::Decimal),
        ]),
    );
    snapshot
}

fn config_for(dir: &TempDir, table: Option<&str>) -> Config {
    let mut config = Config::default();
    config.database.database = "shop".to_string();
    config.database.table = table.map(str::to_string);
    config.generation.output_directory = dir.path().display().to_string();
    config.generation.constructor_and_queries = true;
    config.generation.markup_pages = true;
    config
}

fn files_with_extension(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().strip_prefix(root).unwrap().to_path_buf())
        .filter(|path| path.extension().map_or(false, |e| e == extension))
        .collect();
    files.sort();
    files
}

#[rstest]
#[tokio::test]
async fn test_one_class_per_table_at_grouped_paths(shop: Snapshot) {
    let dir = tempdir().unwrap();
    let client = CodegenClient::new(config_for(&dir, None)).unwrap();

    let report = client.run(shop).await.unwrap();

    assert_eq!(report.tables, 3);
    assert_eq!(report.class_files, 3);
    assert_eq!(
        files_with_extension(dir.path(), "cs"),
        vec![
            PathBuf::from("shop/ABC/ABC_orders.cs"),
            PathBuf::from("shop/orders.cs"),
            PathBuf::from("shop/users.cs"),
        ]
    );

    let grouped = fs::read_to_string(dir.path().join("shop/ABC/ABC_orders.cs")).unwrap();
    assert!(grouped.contains("namespace NewCity.DataAccess.Model.ABC\n"));
    let plain = fs::read_to_string(dir.path().join("shop/orders.cs")).unwrap();
    assert!(plain.contains("namespace NewCity.DataAccess.Model\n"));
}

#[rstest]
#[tokio::test]
async fn test_users_scenario(shop: Snapshot) {
    let dir = tempdir().unwrap();
    let client = CodegenClient::new(config_for(&dir, None)).unwrap();
    client.run(shop).await.unwrap();

    let users = fs::read_to_string(dir.path().join("shop/users.cs")).unwrap();

    assert!(users.contains(
        "    /// <summary>\n    /// site users\n    /// </summary>\n    public class users : TableBase\n"
    ));
    assert!(users.contains("        [Required]\n        public string Name { get; set; }\n"));
    assert!(users.contains("\n        public string Email { get; set; }\n"));
    assert!(users.contains("\n        public DateTime? Created { get; set; }\n"));
    assert!(!users.contains(" Id { get; set; }"));
    assert!(users.contains(
        "return $\"UPDATE `users` SET id = {Id}, name = {Name}, email = {Email}, created = {Created} WHERE id = {Id};\";"
    ));
}

#[rstest]
#[tokio::test]
async fn test_seq_column_reaches_constructor_and_queries_only(shop: Snapshot) {
    let dir = tempdir().unwrap();
    let client = CodegenClient::new(config_for(&dir, None)).unwrap();
    client.run(shop).await.unwrap();

    let orders = fs::read_to_string(dir.path().join("shop/ABC/ABC_orders.cs")).unwrap();

    assert!(!orders.contains("public Int64 Seq"));
    assert!(orders.contains("[Required]\n        public Guid Code { get; set; }"));
    assert!(orders.contains("public Decimal Total { get; set; }"));
    assert!(orders.contains("Seq = Convert.ToInt64(reader[\"seq\"].ToString());"));
    assert!(orders.contains("INSERT INTO `ABC_orders` VALUES ({Seq}, {Code}, {Total});"));
    // The key column is the first declared one, not the PRI column.
    assert!(orders.contains("DELETE FROM `ABC_orders` WHERE seq = {Seq};"));
    // An empty table comment renders no summary.
    assert!(!orders.contains("<summary>"));
}

#[rstest]
#[tokio::test]
async fn test_regeneration_is_idempotent_except_global_index(shop: Snapshot) {
    let dir = tempdir().unwrap();
    let client = CodegenClient::new(config_for(&dir, None)).unwrap();

    client.run(shop.clone()).await.unwrap();
    let first: Vec<String> = files_with_extension(dir.path(), "cs")
        .iter()
        .map(|p| fs::read_to_string(dir.path().join(p)).unwrap())
        .collect();

    client.run(shop).await.unwrap();
    let second: Vec<String> = files_with_extension(dir.path(), "cs")
        .iter()
        .map(|p| fs::read_to_string(dir.path().join(p)).unwrap())
        .collect();

    assert_eq!(first, second);
    assert_eq!(
        fs::read_to_string(dir.path().join("wiki/index.txt")).unwrap(),
        "* [[shop|shop]]\n* [[shop|shop]]\n"
    );
}

#[rstest]
#[tokio::test]
async fn test_table_filter_limits_generation(shop: Snapshot) {
    let dir = tempdir().unwrap();
    let client = CodegenClient::new(config_for(&dir, Some("users"))).unwrap();

    let report = client.run(shop).await.unwrap();

    assert_eq!(report.class_files, 1);
    assert_eq!(
        files_with_extension(dir.path(), "cs"),
        vec![PathBuf::from("shop/users.cs")]
    );
    assert_eq!(
        files_with_extension(&dir.path().join("wiki/shop/tables"), "txt"),
        vec![PathBuf::from("users.txt")]
    );
}

#[rstest]
#[tokio::test]
async fn test_wiki_display_name_override(shop: Snapshot) {
    let dir = tempdir().unwrap();
    let mut config = config_for(&dir, None);
    config.generation.markup_database_name = Some("Shop".to_string());
    let client = CodegenClient::new(config).unwrap();

    let report = client.run(shop).await.unwrap();

    assert_eq!(report.wiki_pages, 5);
    // Classes keep the physical database name.
    assert!(dir.path().join("shop/users.cs").exists());
    let index = fs::read_to_string(dir.path().join("wiki/Shop/Shop.txt")).unwrap();
    assert_eq!(
        index,
        "[[Database Structure|Database Structure]] > [[Shop|Shop]]\n\
         * [[Users|users]]\n\
         * [[ABC_orders|abc_orders]]\n\
         * [[Orders|orders]]\n"
    );
    let page = fs::read_to_string(dir.path().join("wiki/Shop/tables/ABC_orders.txt")).unwrap();
    assert!(page.ends_with("Seq | bigint(20) | \nCode | char(36) | \nTotal | decimal(10,2) | \n"));
}

#[rstest]
#[tokio::test]
async fn test_empty_schema_is_a_no_op(shop: Snapshot) {
    let dir = tempdir().unwrap();
    let client = CodegenClient::new(config_for(&dir, Some("missing"))).unwrap();

    let report = client.run(shop).await.unwrap();

    assert_eq!(report, Default::default());
    assert_eq!(WalkDir::new(dir.path()).into_iter().count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_short_table_name_aborts_run() {
    let dir = tempdir().unwrap();
    let mut snapshot = Snapshot::new("shop");
    snapshot.columns = vec![column("ab", "x", "int", false, false)];

    let client = CodegenClient::new(config_for(&dir, None)).unwrap();
    let err = client.run(snapshot).await.unwrap_err();

    assert!(matches!(err, schema_codegen::Error::NamingError(_)));
}

#[test]
fn test_client_requires_database() {
    let err = CodegenClient::new(Config::default()).err().unwrap();
    assert!(matches!(err, schema_codegen::Error::ConfigError(_)));
}
