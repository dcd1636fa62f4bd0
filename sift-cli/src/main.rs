use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod session;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "sift",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SIFT_BUILD_SHA"), ")"),
    about = "Normalize bank/credit-card exports and suggest spending categories"
)]
struct Cli {
    /// Config file (default: ~/.sift/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest transaction exports and write a review sheet with suggested categories
    Suggest {
        /// Existing ledger (xlsx/xls/ods/csv, header in the first non-blank row)
        #[arg(long)]
        ledger: PathBuf,

        /// Transaction export tagged with its source, e.g. "Oz Cal=jan.xlsx" (repeatable)
        #[arg(long = "import", value_name = "LABEL=FILE", required = true)]
        imports: Vec<String>,

        /// Review sheet to write
        #[arg(long, default_value = "review.csv")]
        out: PathBuf,
    },

    /// Append a reviewed sheet to the ledger and write the merged ledger
    Merge {
        #[arg(long)]
        ledger: PathBuf,

        #[arg(long, default_value = "review.csv")]
        review: PathBuf,

        /// Merged ledger, .xlsx or .csv (default: merged-ledger in the ledger's format)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show how a single transaction export is parsed
    Inspect {
        file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the configured source labels and their shorthand
    Sources,

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default configuration (never overwrites)
    Init,

    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG > --verbose > info
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let config_arg = cli.config.as_deref();

    match cli.command {
        Command::Suggest {
            ledger,
            imports,
            out,
        } => {
            let cfg = config::load_config(config_arg)?;
            session::suggest(&cfg, &ledger, &imports, &out)?;
        }

        Command::Merge {
            ledger,
            review,
            out,
        } => {
            let cfg = config::load_config(config_arg)?;
            let out = out.unwrap_or_else(|| session::default_merge_output(&ledger));
            session::merge(&cfg, &ledger, &review, &out)?;
        }

        Command::Inspect { file, json } => {
            let cfg = config::load_config(config_arg)?;
            session::inspect(&cfg, &file, json)?;
        }

        Command::Sources => {
            let cfg = config::load_config(config_arg)?;
            session::list_sources(&cfg);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(config_arg)?,
            ConfigCommand::Show => {
                let cfg = config::load_config(config_arg)?;
                println!("# {}", config::config_path(config_arg)?.display());
                print!("{}", toml::to_string_pretty(&cfg)?);
            }
        },
    }

    Ok(())
}
