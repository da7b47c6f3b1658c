//! TRUTH daemon: runs engine operations against an LMDB data directory.
//!
//! Every command opens the store, performs one operation and prints its
//! result as JSON on stdout. Logs go to stderr.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;

use truth_ledger::SupplyAudit;
use truth_store_lmdb::{check_data_dir, check_integrity, LmdbStore};
use truth_types::{
    ClaimContent, ClaimId, Decision, Location, TruthAmount, ValidatorTier, WalletAddress,
};
use truth_utils::LogFormat;
use truth_verification::{Ballot, NewsVerification};

use crate::config::DaemonConfig;

#[derive(Parser)]
#[command(name = "truth-daemon", about = "TRUTH news-verification engine")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory for ledger storage.
    #[arg(long, env = "TRUTH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TRUTH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Submit a claim for verification, paying the submission fee.
    Submit {
        #[arg(long)]
        author: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        #[arg(long, default_value = "")]
        category: String,
        /// Source URL; repeat for several.
        #[arg(long = "source")]
        sources: Vec<String>,
        /// Region of the claim. Requires --country.
        #[arg(long, requires = "country")]
        region: Option<String>,
        #[arg(long, requires = "region")]
        country: Option<String>,
    },
    /// Stake on a claim being accurate (verify) or false (dispute).
    Vote {
        #[arg(long)]
        voter: String,
        #[arg(long)]
        claim: String,
        #[arg(long)]
        decision: Decision,
        /// Stake in TRUTH, e.g. "10" or "12.5".
        #[arg(long)]
        stake: TruthAmount,
        #[arg(long, default_value = "")]
        justification: String,
        /// Validator tier the voter holds.
        #[arg(long)]
        tier: Option<ValidatorTier>,
        /// The voter validates the claim's region.
        #[arg(long, requires = "tier")]
        regional: bool,
    },
    /// Settle a claim and distribute rewards and penalties.
    Resolve { claim: String },
    /// Show an account, creating it with the starting balance if new.
    Balance { address: String },
    /// Show the transaction log, optionally for one account.
    History {
        #[arg(long)]
        address: Option<String>,
    },
    /// Show one claim.
    Claim { id: String },
    /// List all claims, oldest first.
    Claims,
    /// List a claim's votes in cast order.
    Votes { claim: String },
    /// Show a claim's final result or a preview of it.
    Result { claim: String },
    /// Show the effective tokenomics.
    Tokenomics,
    /// Check token conservation across accounts, treasury and burn.
    Audit,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    config.validate()?;

    truth_utils::init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let mut engine = open_engine(&config)?;
    run(&mut engine, cli.command)
}

fn open_engine(config: &DaemonConfig) -> anyhow::Result<NewsVerification<LmdbStore>> {
    check_data_dir(&config.data_dir).map_err(anyhow::Error::msg)?;
    let store = LmdbStore::open_with_map_size(&config.data_dir, config.map_size_bytes()?)
        .with_context(|| format!("opening store at {}", config.data_dir.display()))?;

    let report = check_integrity(&store)?;
    if !report.is_healthy() {
        for error in &report.errors {
            tracing::error!("integrity check: {error}");
        }
        bail!("store at {} failed its integrity check", config.data_dir.display());
    }
    tracing::debug!(
        databases = report.databases_checked,
        entries = report.total_entries,
        "integrity check passed"
    );

    Ok(NewsVerification::with_system_clock(Arc::new(store), config.tokenomics()?)?)
}

fn run(engine: &mut NewsVerification<LmdbStore>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Submit {
            author,
            title,
            body,
            category,
            sources,
            region,
            country,
        } => {
            let content = ClaimContent {
                title,
                body,
                category,
                sources,
            };
            let location = match (region, country) {
                (Some(region), Some(country)) => Some(Location { region, country }),
                _ => None,
            };
            let claim_id = engine.submit(content, &WalletAddress::new(author), location)?;
            print_json(&serde_json::json!({ "claim_id": claim_id }))
        }
        Command::Vote {
            voter,
            claim,
            decision,
            stake,
            justification,
            tier,
            regional,
        } => {
            let mut ballot = Ballot::new(WalletAddress::new(voter), ClaimId::new(claim), decision, stake)
                .with_justification(justification);
            if let Some(tier) = tier {
                ballot = ballot.as_validator(tier, regional);
            }
            print_json(&engine.vote(ballot)?)
        }
        Command::Resolve { claim } => print_json(&engine.resolve_with_outcome(&ClaimId::new(claim))?),
        Command::Balance { address } => print_json(&engine.get_balance(&WalletAddress::new(address))?),
        Command::History { address } => {
            let address = address.map(WalletAddress::new);
            print_json(&engine.transaction_history(address.as_ref())?)
        }
        Command::Claim { id } => match engine.article(&ClaimId::new(id.clone()))? {
            Some(claim) => print_json(&claim),
            None => bail!("claim not found: {id}"),
        },
        Command::Claims => print_json(&engine.all_articles()?),
        Command::Votes { claim } => print_json(&engine.votes(&ClaimId::new(claim))?),
        Command::Result { claim } => print_json(&engine.voting_result(&ClaimId::new(claim))?),
        Command::Tokenomics => print_json(engine.tokenomics()),
        Command::Audit => {
            let audit = engine.audit()?;
            print_json(&AuditReport {
                audit: &audit,
                expected_total: audit.expected_total(),
                actual_total: audit.actual_total(),
                balanced: audit.is_balanced(),
            })?;
            if !audit.is_balanced() {
                bail!("supply audit is unbalanced");
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct AuditReport<'a> {
    #[serde(flatten)]
    audit: &'a SupplyAudit,
    expected_total: TruthAmount,
    actual_total: TruthAmount,
    balanced: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
