//! fintrack main entry point

mod prompt;
mod render;

use anyhow::{bail, Context};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

use fintrack_client::HttpFinanceService;
use fintrack_config::{Config, ConfigError};
use fintrack_core::{
    ConfirmationRef, DeleteOutcome, FixedAnswer, Period, SyncEngine, SyncError, TransactionId, TransactionType,
    ViewSnapshot,
};
use prompt::StdinConfirmation;
use render::Renderer;

#[derive(Parser, Debug)]
#[command(name = "fintrack")]
#[command(version = "0.1.0")]
#[command(about = "Track monthly income and expenses against a finance service", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true, default_value_os_t = Config::default_path())]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the summary and transactions of a month
    List(PeriodArgs),
    /// Show income, expenses and balance of a month
    Summary(PeriodArgs),
    /// Record a new transaction
    Add(AddArgs),
    /// Delete a transaction by id
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// List the selectable years
    Years,
    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct PeriodArgs {
    /// Month 1-12 (default: current month)
    #[arg(short, long)]
    month: Option<u32>,
    /// Year (default: current year)
    #[arg(short, long, allow_negative_numbers = true)]
    year: Option<i32>,
}

impl PeriodArgs {
    fn resolve(&self) -> anyhow::Result<Period> {
        let current = Period::current();
        let year = self.year.unwrap_or(current.year());
        Period::new(self.month.unwrap_or(current.month()), year).context("Invalid --month")
    }
}

#[derive(ClapArgs, Debug)]
struct AddArgs {
    #[arg(short, long)]
    description: String,
    /// Non-negative amount, e.g. 12.50
    #[arg(short, long, allow_hyphen_values = true)]
    amount: String,
    /// income or expense
    #[arg(short = 't', long = "type", default_value = "expense")]
    kind: TransactionType,
    /// YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(short = 'C', long)]
    category: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // init-config must work even when the existing file is broken
    let loaded = match args.command {
        Command::InitConfig { .. } => Ok(Config::default()),
        _ => load_config(&args.config),
    };
    let level = match &loaded {
        Ok(config) => config.logging.level.clone(),
        Err(_) => "warn".to_string(),
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_details());
            bail!("Failed to load configuration from {}", args.config.display());
        }
    };

    let rt = Runtime::new()?;
    let result = rt.block_on(run(args, config));

    if let Err(e) = &result {
        if let Some(sync_error) = e.downcast_ref::<SyncError>() {
            eprintln!("{}", sync_error.to_details());
        }
    }
    result
}

/// A missing file means defaults; anything else wrong with it is an error
fn load_config(path: &Path) -> Result<Config, ConfigError> {
    match Config::load(path) {
        Err(e) if !e.is_fatal() => Ok(Config::default()),
        other => other,
    }
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let renderer = Renderer::new(&config.currency);

    match args.command {
        Command::List(period) => {
            let engine = engine(&config, Arc::new(FixedAnswer(false)))?;
            engine.refresh(period.resolve()?).await?;
            let view = engine.view();
            println!("{}", renderer.summary(engine.filter(), &view.summary));
            println!();
            println!("{}", renderer.transactions(&view.transactions));
        }
        Command::Summary(period) => {
            let engine = engine(&config, Arc::new(FixedAnswer(false)))?;
            engine.refresh(period.resolve()?).await?;
            println!("{}", renderer.summary(engine.filter(), &engine.view().summary));
        }
        Command::Add(add) => {
            let date = add.date.unwrap_or_else(|| Local::now().date_naive());
            let engine = engine(&config, Arc::new(FixedAnswer(false)))?.with_period(Period::of(date));
            engine.update_draft(|draft| {
                draft.set_description(add.description);
                draft.set_amount(add.amount);
                draft.set_kind(add.kind);
                draft.set_date(Some(date));
                draft.set_category(add.category.unwrap_or_default());
            });

            let created = engine.create().await?;
            println!("Created transaction {}", created.id);

            if let Some(block) = loaded_summary(&renderer, &engine.view()) {
                println!("{}", block);
            }
            for notice in engine.notices() {
                eprintln!("{}", renderer.notice(&notice));
            }
        }
        Command::Delete { id, yes, period } => {
            let engine = engine(&config, confirmation(yes))?;
            // Load the period first so the prompt can describe the entry
            if let Err(e) = engine.refresh(period.resolve()?).await {
                log::warn!("Could not load transactions before delete: {}", e);
            }

            let id = TransactionId::new(id);
            match engine.delete(&id).await? {
                DeleteOutcome::Declined => println!("Kept transaction {}", id),
                DeleteOutcome::Deleted => {
                    println!("Deleted transaction {}", id);
                    if let Some(block) = loaded_summary(&renderer, &engine.view()) {
                        println!("{}", block);
                    }
                }
            }
        }
        Command::Years => {
            let current = Local::now().year();
            let years = fintrack_utils::year_window(current, config.filter.years_before, config.filter.years_after);
            println!("{}", renderer.years(&years, current));
        }
        Command::InitConfig { force } => {
            if args.config.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", args.config.display());
            }
            std::fs::write(&args.config, Config::generate_default())
                .with_context(|| format!("Failed to write {}", args.config.display()))?;
            println!("Wrote default configuration to {}", args.config.display());
        }
    }

    Ok(())
}

/// Summary titled with the period the cached pair was fetched for, which
/// can lag the filter when a follow-up refresh failed
fn loaded_summary(renderer: &Renderer, view: &ViewSnapshot) -> Option<String> {
    view.period.map(|period| renderer.summary(period, &view.summary))
}

/// `--yes` skips the prompt
fn confirmation(yes: bool) -> ConfirmationRef {
    if yes {
        Arc::new(FixedAnswer(true))
    } else {
        Arc::new(StdinConfirmation)
    }
}

fn engine(config: &Config, confirmation: ConfirmationRef) -> anyhow::Result<SyncEngine> {
    let service = HttpFinanceService::new(&config.service).context("Invalid service configuration")?;
    Ok(SyncEngine::new(Arc::new(service), confirmation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::{Confirmation, ConfirmationRequest, Summary};

    #[test]
    fn test_cli_parses_add() {
        let args = Args::parse_from([
            "fintrack", "add", "-d", "Refund", "-a", "-5", "--type", "income", "--date", "2024-02-10",
        ]);
        match args.command {
            Command::Add(add) => {
                assert_eq!(add.amount, "-5");
                assert_eq!(add.kind, TransactionType::Income);
                assert_eq!(add.date, NaiveDate::from_ymd_opt(2024, 2, 10));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(args.config, PathBuf::from("fintrack.yaml"));
    }

    #[test]
    fn test_period_args_resolve() {
        let period = PeriodArgs { month: Some(2), year: Some(2023) }.resolve().unwrap();
        assert_eq!(period, Period::new(2, 2023).unwrap());
        assert!(PeriodArgs { month: Some(13), year: None }.resolve().is_err());
    }

    #[test]
    fn test_summary_titled_by_loaded_period() {
        let renderer = Renderer::new(&Config::default().currency);
        assert_eq!(loaded_summary(&renderer, &ViewSnapshot::default()), None);

        let jan = Period::new(1, 2024).unwrap();
        let view = ViewSnapshot::new(jan, Vec::new(), Summary::zero());
        let block = loaded_summary(&renderer, &view).unwrap();
        assert!(block.starts_with("January 2024\n"));
    }

    #[tokio::test]
    async fn test_yes_flag_confirms_without_prompt() {
        let request = ConfirmationRequest::delete(&TransactionId::new("4"), None);
        assert!(confirmation(true).confirm(&request).await);
    }

    #[test]
    fn test_missing_config_file_means_defaults() {
        let config = load_config(Path::new("/nonexistent/fintrack.yaml")).unwrap();
        assert_eq!(config.service.base_url, "http://localhost:8000");
    }
}
