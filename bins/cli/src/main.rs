//! Splitledger command-line runner.
//!
//! Reads an expense snapshot, resolves it within a scope, and prints balances
//! and settlement suggestions per currency.

mod render;
mod snapshot;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use splitledger_core::{LedgerResolver, ResolverOptions, Scope};
use splitledger_shared::AppConfig;
use splitledger_shared::AppError;
use splitledger_shared::config::{LoggingConfig, OutputFormat};
use splitledger_shared::types::{GroupId, UserId};

use crate::snapshot::Snapshot;

#[derive(Parser, Debug)]
#[command(name = "splitledger")]
#[command(about = "Compute shared-expense balances and who pays whom")]
struct Cli {
    /// Path to the JSON expense snapshot.
    snapshot: PathBuf,

    /// Only expenses tagged with this group.
    #[arg(long, conflicts_with_all = ["direct", "user"])]
    group: Option<GroupId>,

    /// Only group-less expenses between these two people.
    #[arg(long, num_args = 2, value_names = ["A", "B"], conflicts_with = "user")]
    direct: Option<Vec<UserId>>,

    /// Every expense this person is involved in.
    #[arg(long)]
    user: Option<UserId>,

    /// Output format (overrides configuration).
    #[arg(long)]
    format: Option<OutputFormat>,
}

impl Cli {
    fn scope(&self) -> Scope {
        if let Some(group) = self.group {
            return Scope::Group(group);
        }
        if let Some([a, b]) = self.direct.as_deref() {
            return Scope::Direct { a: *a, b: *b };
        }
        self.user.map_or(Scope::Everyone, Scope::User)
    }
}

fn init_tracing(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<()> {
    let snapshot = Snapshot::load(&cli.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", cli.snapshot.display()))?;
    info!(
        expenses = snapshot.expenses.len(),
        users = snapshot.users.len(),
        "Loaded snapshot"
    );

    let invalid = snapshot.report_invalid();
    if invalid > 0 {
        info!(invalid, "Resolving with suspect expenses included");
    }

    let resolver = LedgerResolver::new(ResolverOptions::from(&config.ledger));
    let report = resolver.resolve(&snapshot.expenses, &cli.scope());

    let output = match cli.format.unwrap_or(config.output.format) {
        OutputFormat::Text => render::render_text(&report, &snapshot.users),
        OutputFormat::Json => {
            render::render_json(&report, &snapshot.users).context("Failed to encode report")?
        }
    };
    print!("{output}");
    Ok(())
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            let err = AppError::from(err);
            eprintln!("{err}");
            return exit_code(&err);
        }
    };
    init_tracing(&config.logging);

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "splitledger failed");
            eprintln!("{err:#}");
            err.downcast_ref::<AppError>()
                .map_or(ExitCode::FAILURE, exit_code)
        }
    }
}

fn exit_code(err: &AppError) -> ExitCode {
    u8::try_from(err.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
}
