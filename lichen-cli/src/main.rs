//! lichen - cached open source license templates
//!
//! Keeps license templates from a remote index in a local cache and prints
//! them with the copyright line filled in.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lichen_core::bootstrap;
use lichen_core::cache::CacheDir;
use lichen_core::catalog::LicenseSummary;
use lichen_core::list;
use lichen_core::progress::{LogProgress, Verbosity};
use lichen_core::source::{GithubSource, LicenseSource};
use lichen_core::template;

#[derive(Parser, Debug)]
#[clap(
    name = "lichen",
    about = "Cached open source license templates",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Suppress everything except errors
    #[clap(long, short = 'q', global = true)]
    quiet: bool,

    /// Emit progress detail
    #[clap(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Rebuild the entire local cache from the remote license index
    Bootstrap,

    /// List the locally cached licenses
    List {
        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// List the licenses the remote index currently offers
    ListRemote {
        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// Print a cached license with the copyright line filled in
    Render {
        /// License key, as shown by `lichen list`
        key: String,

        /// Copyright holder (default: $USER)
        #[clap(long)]
        fullname: Option<String>,

        /// Copyright year (default: the current year)
        #[clap(long)]
        year: Option<String>,
    },
}

/// Initialize tracing from the CLI flag pair
///
/// Logs go to stderr so command output stays pipeable.
fn initialize_tracing(quiet: bool, verbose: bool) {
    let directive = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(cli.quiet, cli.verbose);

    match cli.command {
        Command::Bootstrap => bootstrap_command(cli.quiet, cli.verbose).await,
        Command::List { json } => list_command(json),
        Command::ListRemote { json } => list_remote_command(json).await,
        Command::Render {
            key,
            fullname,
            year,
        } => render_command(&key, fullname, year),
    }
}

async fn bootstrap_command(quiet: bool, verbose: bool) -> Result<()> {
    let cache = CacheDir::discover()?;
    debug!("Refreshing license cache at {}", cache.root.display());

    let source: Arc<dyn LicenseSource> = Arc::new(GithubSource::new()?);
    let progress = LogProgress::new(Verbosity::from_flags(quiet, verbose));

    let cached = bootstrap::refresh(source, &cache, &progress).await?;

    if !quiet {
        println!(
            "Cached {} license templates in {}",
            cached,
            cache.root.display()
        );
    }

    Ok(())
}

/// Table row for license listings
#[derive(Tabled)]
struct LicenseRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
}

fn print_licenses(licenses: &[LicenseSummary], json_output: bool) -> Result<()> {
    if licenses.is_empty() {
        println!("No licenses found.");
        return Ok(());
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(licenses)?);
        return Ok(());
    }

    println!("Available licenses:\n");

    let rows: Vec<LicenseRow> = licenses
        .iter()
        .map(|license| LicenseRow {
            key: license.key.clone(),
            name: license.name.clone(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();

    println!("{table}");

    Ok(())
}

fn list_command(json_output: bool) -> Result<()> {
    let cache = CacheDir::discover()?;
    let licenses = list::local(&cache)?;

    print_licenses(&licenses, json_output)
}

async fn list_remote_command(json_output: bool) -> Result<()> {
    let source = GithubSource::new()?;
    let licenses = list::remote(&source).await?;

    print_licenses(&licenses, json_output)
}

fn render_command(key: &str, fullname: Option<String>, year: Option<String>) -> Result<()> {
    let text = render_template(key, fullname, year)?;
    print!("{text}");
    Ok(())
}

/// Fill the cached template for `key` with the given or defaulted values
fn render_template(key: &str, fullname: Option<String>, year: Option<String>) -> Result<String> {
    let cache = CacheDir::discover()?;
    let template = cache.read_template(key)?;

    let fullname = match fullname {
        Some(name) => name,
        None => {
            debug!("No --fullname given, falling back to $USER");
            std::env::var("USER")
                .or_else(|_| std::env::var("USERNAME"))
                .context("No --fullname given and no $USER in the environment")?
        }
    };

    let year = year.unwrap_or_else(|| Local::now().year().to_string());

    Ok(template::fill(&template, &fullname, &year))
}
