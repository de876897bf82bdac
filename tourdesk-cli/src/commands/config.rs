//! Numeric column allowlist management

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tourdesk_server::{Catalog, NumericColumns, DEFAULT_NUM_COLS_PATH};

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write the default allowlist (declared numeric columns)
    Init(InitArgs),
    /// Print each table's resolved column types
    Show(ShowArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Where to write the allowlist
    #[arg(long, default_value = DEFAULT_NUM_COLS_PATH)]
    pub path: PathBuf,

    /// Force overwrite an existing file
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Allowlist to resolve against (default: ./num_cols.json if present)
    #[arg(long, env = "TOURDESK_NUM_COLS", value_name = "PATH")]
    pub num_cols: Option<PathBuf>,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args),
        ConfigCommands::Show(args) => run_show(args),
    }
}

fn run_init(args: InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Allowlist already exists at {:?}\n\nUse --force to overwrite",
            args.path
        ));
    }

    if let Some(parent) = args.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = NumericColumns::declared().to_json_pretty()?;
    std::fs::write(&args.path, json + "\n")
        .with_context(|| format!("Failed to write {}", args.path.display()))?;

    println!("Wrote numeric column allowlist to {}", args.path.display());
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let numeric = NumericColumns::load_or_default(args.num_cols.as_deref())
        .context("Failed to load numeric column allowlist")?;
    let catalog = Catalog::new(&numeric);

    for table in catalog.tables() {
        println!("{} ({})", table.name(), table.resource());
        for column in table.columns() {
            let marker = if table.is_key(column.name) { " [key]" } else { "" };
            println!("  {:<24} {}{}", column.name, column.kind.as_str(), marker);
        }
    }
    Ok(())
}
