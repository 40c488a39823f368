use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use resource_sql::config::{CliConfig, CompilerConfig};
use resource_sql::query_description::{QueryDescription, WriteOperation};
use resource_sql::resource_catalog::ResourceCatalog;
use resource_sql::sql_generator::{render, DialectKind, RenderedSql};
use resource_sql::sql_tree::{CompiledStatement, TreeDumper};
use resource_sql::statement_builder::StatementBuilder;

/// resource-sql - compiles resource query and write descriptions to SQL
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Schema description (YAML) mapping resources onto tables
    #[arg(long, global = true, default_value = "schema.yaml")]
    schema: PathBuf,

    /// Compiler configuration file (YAML); environment variables apply otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQL dialect to render (ansi, postgresql, sqlserver, mysql, sqlite)
    #[arg(long, global = true)]
    dialect: Option<DialectKind>,

    /// Longest accepted include path
    #[arg(long, global = true)]
    max_include_depth: Option<u32>,

    /// Page size used when a query does not name one
    #[arg(long, global = true)]
    default_page_size: Option<u32>,

    /// Largest page size a query may request
    #[arg(long, global = true)]
    max_page_size: Option<u32>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also print the SQL tree before rendering (text output only)
    #[arg(long, global = true)]
    dump_tree: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a query description (YAML or JSON) into a SELECT
    Select { query: PathBuf },
    /// Compile a query description into a total-count SELECT
    Count { query: PathBuf },
    /// Compile a write description into INSERT / UPDATE / DELETE
    Write { operation: PathBuf },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        CliConfig {
            dialect: cli.dialect,
            max_include_depth: cli.max_include_depth,
            default_page_size: cli.default_page_size,
            max_page_size: cli.max_page_size,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<CompilerConfig> {
    let mut config = match &cli.config {
        Some(path) => CompilerConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => CompilerConfig::from_env().context("Invalid RESOURCE_SQL_* environment")?,
    };
    config.merge(&CliConfig::from(cli))?;
    Ok(config)
}

fn load_catalog(path: &Path) -> anyhow::Result<ResourceCatalog> {
    ResourceCatalog::from_yaml_file(path)
        .with_context(|| format!("Failed to load schema from {}", path.display()))
}

fn compile(cli: &Cli, catalog: &ResourceCatalog, config: &CompilerConfig) -> anyhow::Result<CompiledStatement> {
    let builder = StatementBuilder::new(catalog, config);
    let compiled = match &cli.command {
        Command::Select { query } => builder.build_select(&QueryDescription::from_file(query)?)?,
        Command::Count { query } => builder.build_count(&QueryDescription::from_file(query)?)?,
        Command::Write { operation } => builder.build_write(&WriteOperation::from_file(operation)?)?,
    };
    Ok(compiled)
}

fn print_text(rendered: &RenderedSql) {
    println!("{}", rendered.sql);
    for parameter in &rendered.parameters {
        println!("  {} = {}", parameter.name, parameter.value);
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let catalog = load_catalog(&cli.schema)?;
    log::info!(
        "Loaded {} resource types from {}, rendering for {}",
        catalog.len(),
        cli.schema.display(),
        config.dialect
    );

    let compiled = compile(&cli, &catalog, &config)?;
    let rendered = render(&compiled, config.dialect);
    match cli.format {
        OutputFormat::Text => {
            if cli.dump_tree {
                print!("{}", TreeDumper::dump(compiled.statement()));
            }
            print_text(&rendered);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rendered)?),
    }
    Ok(())
}
