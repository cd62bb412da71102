use bucketprune::humanize::{RetentionAge, VALID_AGE_FORMATS};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Examples:
  # Clear all forwarding logs
  bucketprune ~/.lnd/data/graph/mainnet/channel.db circuit-fwd-log

  # Clear forwarding logs older than 1 week
  bucketprune ~/.lnd/data/graph/mainnet/channel.db --older-than=1w circuit-fwd-log

  # Clear multiple buckets
  bucketprune ~/.lnd/data/graph/mainnet/channel.db circuit-fwd-log closed-chan-bucket

Duration formats:
  1d, 7d   = days
  1w, 2w   = weeks
  1m, 3m   = months (30 days)
  1y       = years (365 days)

Safe buckets to delete:
  circuit-fwd-log          (forwarding history, supports --older-than)
  closed-chan-bucket       (old channel summaries)
  historical-chan-bucket   (old channel details)

Protected unless --force:
  open-chan-bucket         (active channels)
  revocation-log           (breach detection)
  fwd-packages             (in-flight HTLCs)";

#[derive(Parser, Debug)]
#[command(name = "bucketprune", version)]
#[command(about = "Prune obsolete buckets and expired entries from an embedded bucket store")]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Path to the store to prune
    pub db_path: PathBuf,

    /// Buckets to prune, processed in the given order
    #[arg(required = true, num_args = 1..)]
    pub buckets: Vec<String>,

    /// Only delete entries older than this age (e.g. 1d, 2w, 1m, 1y)
    #[arg(long, value_name = "AGE", value_parser = parse_age)]
    pub older_than: Option<RetentionAge>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Allow pruning protected buckets
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_age(value: &str) -> Result<RetentionAge, String> {
    value
        .parse()
        .map_err(|err| format!("{err}. Valid formats: {VALID_AGE_FORMATS}"))
}
