use bucketprune::config::{Config, ConfigError};
use bucketprune::ledger::{Cutoff, FjallStore, LedgerError, Pruner};
use bucketprune::{observability, report};
use thiserror::Error;
use tracing::info;

use crate::cli::{Cli, OutputFormat};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Refusing to prune protected bucket '{0}' (pass --force to override)")]
    ProtectedBucket(String),

    #[error("Error opening database: {0}")]
    StoreOpen(#[source] LedgerError),

    #[error("Prune transaction failed, nothing was deleted: {0}")]
    Transaction(#[source] LedgerError),

    #[error("Prune only partially applied, re-run to finish: {0}")]
    PartiallyApplied(#[source] LedgerError),

    #[error("Failed to render report: {0}")]
    Output(#[from] serde_json::Error),
}

/// Run one prune invocation and return the rendered report
pub fn run(cli: Cli) -> Result<String, CommandError> {
    let config = Config::load(cli.config.clone())?;
    observability::init(&config.logging.filter);

    if !cli.force {
        if let Some(bucket) = cli
            .buckets
            .iter()
            .find(|bucket| config.retention.is_protected(bucket))
        {
            return Err(CommandError::ProtectedBucket(bucket.clone()));
        }
    }

    let cutoff = cli.older_than.map(Cutoff::older_than);
    if let (Some(age), Some(cutoff)) = (cli.older_than, cutoff) {
        info!(%age, %cutoff, "Filtered prune requested");
    }
    let pruner = Pruner::new(config.retention.policy());

    let store = FjallStore::open_existing(&cli.db_path).map_err(CommandError::StoreOpen)?;
    let outcomes = store
        .prune(&pruner, &cli.buckets, cutoff)
        .map_err(prune_failed)?;

    let rendered = match cli.format {
        OutputFormat::Text => report::render_text(cli.older_than, cutoff, &outcomes),
        OutputFormat::Json => {
            report::render_json(cli.older_than, cutoff, pruner.policy(), &outcomes)?
        }
    };
    Ok(rendered)
}

fn prune_failed(err: LedgerError) -> CommandError {
    if err.is_partially_applied() {
        CommandError::PartiallyApplied(err)
    } else {
        CommandError::Transaction(err)
    }
}
