//! CLI definition for minter.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use mint::SubmissionStrategy;
use std::path::PathBuf;
use std::time::Duration;

/// Puzzle-gated minting client.
#[derive(Parser, Debug)]
#[command(name = "minter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Wallet file (JSON with addresses and the WIF key).
    #[arg(long, short, global = true, default_value = "wallet.json")]
    pub wallet: PathBuf,

    /// Solver worker threads (defaults to SOLVER_THREADS or all cores).
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Request a challenge, solve it, submit, sign and broadcast.
    Mint {
        #[command(flatten)]
        request: RequestArgs,
        #[command(flatten)]
        submit: SubmitArgs,
        /// Challenges to solve before the single submission round.
        #[arg(long, default_value_t = 1)]
        puzzles: u32,
    },
    /// Solve a challenge now and store it for a later `submit`.
    Presolve {
        #[command(flatten)]
        request: RequestArgs,
        /// Label recorded with the solution.
        #[arg(long, default_value = "presolved")]
        label: String,
        /// Solution log path.
        #[arg(long, default_value = "solutions.json")]
        log: PathBuf,
    },
    /// Submit every stored solution in one round, then sign and broadcast.
    Submit {
        /// Fee rate in sat/vB, replacing the one stored with each solution.
        #[arg(long)]
        fee_rate: Option<f64>,
        #[command(flatten)]
        submit: SubmitArgs,
        /// Solution log path.
        #[arg(long, default_value = "solutions.json")]
        log: PathBuf,
        /// Wait until this RFC 3339 instant before submitting.
        #[arg(long)]
        start_at: Option<DateTime<Utc>>,
    },
    /// Solve a challenge offline and print the nonce.
    Solve {
        challenge: String,
        identity: String,
        #[arg(long, short, default_value_t = 4)]
        difficulty: u32,
    },
    /// Measure solver throughput.
    Bench {
        #[arg(long, short, default_value_t = 5)]
        difficulty: u32,
        /// Number of runs.
        #[arg(long, default_value_t = 3)]
        rounds: u32,
    },
}

/// Mint request parameters
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Items per mint.
    #[arg(long, short, default_value_t = 1)]
    pub quantity: u32,
    /// Fee rate in sat/vB (server default if omitted).
    #[arg(long)]
    pub fee_rate: Option<f64>,
    /// Challenge request timeout in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    pub challenge_timeout_ms: u64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// One request at a time with retries.
    Retry,
    /// All copies at once.
    Burst,
    /// Copies spaced by --interval-ms.
    Paced,
}

/// Submission parameters
#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    #[arg(long, value_enum, default_value_t = StrategyKind::Burst)]
    pub strategy: StrategyKind,
    /// Requests per solution (burst, paced).
    #[arg(long, default_value_t = 10)]
    pub copies: u32,
    /// Gap between paced requests in milliseconds.
    #[arg(long, default_value_t = 10)]
    pub interval_ms: u64,
    /// Retries after the first attempt (retry).
    #[arg(long, default_value_t = 3)]
    pub retries: u32,
    /// Wait between retries in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub backoff_ms: u64,
    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,
    /// Keep collecting late replies this long after a win, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub drain_ms: u64,
}

impl SubmitArgs {
    pub fn strategy(&self) -> SubmissionStrategy {
        let attempt_timeout = Duration::from_millis(self.timeout_ms);
        match self.strategy {
            StrategyKind::Retry => SubmissionStrategy::SingleRetry {
                attempt_timeout,
                retries: self.retries,
                backoff: Duration::from_millis(self.backoff_ms),
            },
            StrategyKind::Burst => SubmissionStrategy::FanoutBurst {
                copies: self.copies,
                attempt_timeout,
            },
            StrategyKind::Paced => SubmissionStrategy::FanoutPaced {
                copies: self.copies,
                interval: Duration::from_millis(self.interval_ms),
                attempt_timeout,
            },
        }
    }

    pub fn drain(&self) -> Duration {
        Duration::from_millis(self.drain_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paced_strategy_from_args() {
        let cli = Cli::parse_from([
            "minter", "mint", "--strategy", "paced", "--copies", "50", "--interval-ms", "10",
        ]);
        let Command::Mint { submit, request, puzzles } = cli.command else {
            panic!("expected mint");
        };
        assert_eq!(request.quantity, 1);
        assert_eq!(puzzles, 1);
        assert_eq!(
            submit.strategy(),
            SubmissionStrategy::FanoutPaced {
                copies: 50,
                interval: Duration::from_millis(10),
                attempt_timeout: Duration::from_secs(10),
            }
        );
    }

    #[test]
    fn test_submit_start_at() {
        let cli = Cli::parse_from(["minter", "submit", "--start-at", "2026-01-01T00:00:00Z", "-w", "w.json"]);
        let Command::Submit { start_at, .. } = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(start_at.map(|t| t.timestamp()), Some(1_767_225_600));
        assert_eq!(cli.wallet, PathBuf::from("w.json"));
    }

    #[test]
    fn test_retry_strategy() {
        let cli = Cli::parse_from(["minter", "mint", "--strategy", "retry", "--retries", "2"]);
        let Command::Mint { submit, .. } = cli.command else {
            panic!("expected mint");
        };
        assert!(matches!(submit.strategy(), SubmissionStrategy::SingleRetry { retries: 2, .. }));
    }

    #[test]
    fn test_mint_puzzles() {
        let cli = Cli::parse_from(["minter", "mint", "--puzzles", "2"]);
        let Command::Mint { puzzles, .. } = cli.command else {
            panic!("expected mint");
        };
        assert_eq!(puzzles, 2);
    }

    #[test]
    fn test_submit_fee_rate_override() {
        let cli = Cli::parse_from(["minter", "submit", "--fee-rate", "12.5"]);
        let Command::Submit { fee_rate, .. } = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(fee_rate, Some(12.5));
        assert!(Cli::try_parse_from(["minter", "submit", "--quantity", "3"]).is_err());
    }
}
