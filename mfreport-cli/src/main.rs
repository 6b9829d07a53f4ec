use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mfreport_finance::aggregate_export;
use std::path::PathBuf;

mod bootstrap;
mod config;
mod sink;
mod source;
mod state;
mod validate;

use config::{Config, init_config, load_config};
use sink::{JsonStoreSink, ResultSink, StdoutSink};
use source::ExportSource;
use validate::validate_config;

#[derive(Parser, Debug)]
#[command(name = "mfreport", version, about = "Monthly household-account expense aggregation")]
struct Cli {
    /// Log filter directive (e.g. "debug", "mfreport_finance=debug")
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Config file (default: ~/.mfreport/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate one monthly export into per-category totals
    Aggregate {
        /// Export CSV, or a directory whose newest CSV is used
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Source encoding (shift_jis, utf-8)
        #[arg(long)]
        encoding: Option<String>,

        /// Comma-separated category list, in output order
        #[arg(long)]
        categories: Option<String>,

        /// Month store to upsert into
        #[arg(long)]
        store: Option<PathBuf>,

        /// Skip the month store; print only
        #[arg(long, default_value_t = false)]
        no_store: bool,
    },

    /// List months held in the store, or print one month's totals
    Months {
        #[arg(long)]
        store: Option<PathBuf>,

        /// Month to print (YYYY-MM)
        month: Option<String>,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
    /// Validate the config and report every violation
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    bootstrap::setup_logging(&cli.log_level);

    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Aggregate {
            csv,
            encoding,
            categories,
            store,
            no_store,
        } => {
            let mut cfg = load_config(config_path)?;
            if let Some(e) = encoding {
                cfg.report.encoding = e;
            }
            if let Some(c) = categories {
                cfg.report.category_list = c;
            }
            if let Some(p) = &csv {
                cfg.input.path = Some(p.display().to_string());
            }
            if let Some(p) = &store {
                cfg.output.store_path = Some(p.display().to_string());
            }
            ensure_valid(&cfg)?;

            run_aggregate(&cfg, no_store).await?;
        }

        Command::Months { store, month } => {
            let cfg = load_config(config_path)?;
            let store = JsonStoreSink::new(store_path(&cfg, store)?);
            match month {
                Some(m) => match store.totals_for(&m)? {
                    Some(totals) => println!("{}", serde_json::to_string_pretty(&totals)?),
                    None => bail!("no totals stored for {}", m),
                },
                None => {
                    for m in store.months()? {
                        println!("{}", m);
                    }
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => init_config(config_path)?,
            ConfigCommand::Show => {
                let cfg = load_config(config_path)?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
            ConfigCommand::Check => {
                let cfg = load_config(config_path)?;
                ensure_valid(&cfg)?;
                println!("Config OK");
            }
        },
    }

    Ok(())
}

fn ensure_valid(cfg: &Config) -> Result<()> {
    let violations = validate_config(cfg);
    if violations.is_empty() {
        return Ok(());
    }
    for v in &violations {
        tracing::error!("{}", v);
    }
    let keys: Vec<&str> = violations.iter().map(|v| v.item.key()).collect();
    bail!("config values are invalid: {}", keys.join(", "));
}

fn store_path(cfg: &Config, flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag.or_else(|| cfg.output.store_path.as_ref().map(PathBuf::from)) {
        Some(p) => Ok(p),
        None => state::default_store_path(),
    }
}

async fn run_aggregate(cfg: &Config, no_store: bool) -> Result<()> {
    let input = match &cfg.input.path {
        Some(p) => PathBuf::from(p),
        None => bail!("no export given (pass --csv <path> or set input.path)"),
    };
    let pipeline = cfg.to_pipeline_config()?;

    let (path, bytes) = ExportSource::from_path(input).fetch_latest_export().await?;
    tracing::info!(path = %path.display(), encoding = %pipeline.encoding, "aggregating export");

    let result = aggregate_export(&bytes, &pipeline)
        .with_context(|| format!("aggregating {}", path.display()))?;

    let mut sinks: Vec<Box<dyn ResultSink>> = vec![Box::new(StdoutSink::new(std::io::stdout()))];
    if !no_store {
        sinks.push(Box::new(JsonStoreSink::new(store_path(cfg, None)?)));
    }

    for sink in sinks.iter_mut() {
        let name = sink.name();
        sink.accept(&result)
            .with_context(|| format!("delivering result to {}", name))?;
    }

    Ok(())
}
