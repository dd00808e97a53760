use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

use schema_codegen::config::{self, Config};
use schema_codegen::utils::logging::init_logging;
use schema_codegen::{CodegenClient, DatabaseConnection, MySqlMetadataSource, Snapshot};

#[derive(Parser, Debug)]
#[command(name = "schema_codegen", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// IP address of the MySQL server [default: 127.0.0.1]
    #[arg(short = 'i', long = "ip")]
    pub host: Option<String>,

    /// Port of the MySQL server [default: 3306]
    #[arg(short = 'n', long)]
    pub port: Option<u16>,

    /// Username [default: root]
    #[arg(short, long)]
    pub user: Option<String>,

    /// Password [default: empty]
    #[arg(short, long)]
    pub password: Option<String>,

    /// Database name
    #[arg(short, long)]
    pub database: Option<String>,

    /// Only generate this table
    #[arg(short, long)]
    pub table: Option<String>,

    /// Generate a reading constructor and SQL query templates
    #[arg(short = 'g', long = "generate-constructor-and-output")]
    pub constructor_and_queries: bool,

    /// Generate wiki markup pages for the database and its tables
    #[arg(short = 'm', long = "generate-markup-pages")]
    pub markup_pages: bool,

    /// Use this instead of the database name in wiki pages
    #[arg(short = 'r', long = "markup-database-name-replacement")]
    pub markup_database_name: Option<String>,

    /// Directory the generated files are written to [default: .]
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Read schema metadata from a snapshot file instead of the database
    #[arg(long, value_name = "FILE", conflicts_with = "dump_snapshot")]
    pub snapshot: Option<PathBuf>,

    /// Save the metadata read from the database to a snapshot file
    #[arg(long, value_name = "FILE")]
    pub dump_snapshot: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Exit without waiting for Enter
    #[arg(long)]
    pub no_wait: bool,
}

impl CliArgs {
    /// Override configuration values with the flags that were given
    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.database.host = host.clone();
        }
        if let Some(port) = self.port {
            config.database.port = port;
        }
        if let Some(user) = &self.user {
            config.database.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.database.password = password.clone();
        }
        if let Some(database) = &self.database {
            config.database.database = database.clone();
        }
        if let Some(table) = &self.table {
            config.database.table = Some(table.clone());
        }
        if self.constructor_and_queries {
            config.generation.constructor_and_queries = true;
        }
        if self.markup_pages {
            config.generation.markup_pages = true;
        }
        if let Some(name) = &self.markup_database_name {
            config.generation.markup_database_name = Some(name.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.generation.output_directory = dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn wait_for_enter() {
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => config::load_from_file(path)?,
        None => Config::default(),
    };
    args.apply(&mut config);

    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    init_logging(&config.logging)?;
    println!("{}", config.database.describe());

    let client = CodegenClient::new(config)?;
    let report = match &args.snapshot {
        Some(path) => client.run(Snapshot::load(path)?).await?,
        None => {
            let connection = DatabaseConnection::connect(&client.config().database).await?;
            let source = MySqlMetadataSource::new(connection.clone());

            if let Some(path) = &args.dump_snapshot {
                Snapshot::capture(&source, &client.filter()).await?.save(path)?;
                tracing::info!(path = %path.display(), "Saved schema snapshot");
            }

            let report = client.run(source).await?;
            connection.close().await;
            report
        }
    };

    tracing::debug!(files = report.written.len(), "Wrote generated files");
    println!("Successfully generated C# classes!");

    if !args.no_wait {
        wait_for_enter();
    }
    Ok(())
}
