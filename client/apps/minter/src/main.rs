//! minter CLI entry point
//!
//! Uses `anyhow` at the top level; everything below returns
//! `kernel::error::AppError` or a crate error.

mod cli;
mod config;
mod progress;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, RequestArgs, SubmitArgs};
use config::Wallet;
use kernel::error::app_error::AppError;
use mint::domain::repository::SolutionRepository;
use mint::{
    HttpMintGateway, JsonSolutionStore, MintConfig, MintReceipt, MintUseCase, PresolveOutcome, PresolveUseCase,
};
use pow::{Challenge, Difficulty, SearchControl, SearchProgress, SolveChallengeUseCase, SolverConfig};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minter=info,mint=info,pow=info,signer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!("{e:#}");
        std::process::exit(exit_code(&e));
    }
}

/// 2 when the error is fatal and rerunning will not help, 1 otherwise
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(app) if app.kind().is_fatal() => 2,
        _ => 1,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let solver = Arc::new(solver_config(cli.threads)?);

    match cli.command {
        Command::Mint {
            request,
            submit,
            puzzles,
        } => {
            let wallet = Wallet::load(&cli.wallet)?;
            let gateway = Arc::new(connect().await?);
            let config = request_config(&wallet, &request).with_puzzles(puzzles);
            let config = finish_config(config, Some(&submit))?;
            let use_case = MintUseCase::new(gateway, Arc::new(wallet.signing_key()?), config, solver);

            let progress = SearchProgress::new();
            let observer = progress::observe(progress.clone(), use_case.subscribe());
            let control = SearchControl::new().with_progress(progress);
            let result = use_case.run(control).await;
            observer.abort();
            report(result.map_err(AppError::from)?);
        }
        Command::Presolve { request, label, log } => {
            let wallet = Wallet::load(&cli.wallet)?;
            let gateway = Arc::new(connect().await?);
            let config = finish_config(request_config(&wallet, &request), None)?;
            let store = Arc::new(JsonSolutionStore::new(&log));
            let presolve = PresolveUseCase::new(Arc::clone(&gateway), store, Arc::clone(&config), Arc::clone(&solver));

            match presolve.execute(&label, SearchControl::new()).await.map_err(AppError::from)? {
                PresolveOutcome::Stored(solution) => {
                    println!(
                        "stored {} nonce={} expires_at={}",
                        solution.label,
                        solution.nonce().map(|n| n.to_string()).unwrap_or_default(),
                        solution.expires_at().map(|t| t.to_rfc3339()).unwrap_or_default()
                    );
                }
                PresolveOutcome::Reserved(reservation) => {
                    tracing::info!(session_id = %reservation.session_id, "Reservation granted while presolving");
                    let use_case = MintUseCase::new(gateway, Arc::new(wallet.signing_key()?), config, solver);
                    let winner = mint::Winner {
                        label: label.clone(),
                        attempt: 1,
                        reservation,
                    };
                    report(use_case.complete(winner).await.map_err(AppError::from)?);
                }
            }
        }
        Command::Submit {
            fee_rate,
            submit,
            log,
            start_at,
        } => {
            let wallet = Wallet::load(&cli.wallet)?;
            let solutions = load_solutions(&log).await?;
            tracing::info!(count = solutions.len(), path = %log.display(), "Loaded solutions");

            let gateway = Arc::new(connect().await?);
            let config = MintConfig::new(wallet.identity()).with_fee_rate(fee_rate);
            let config = finish_config(config, Some(&submit))?;
            let use_case = MintUseCase::new(Arc::clone(&gateway), Arc::new(wallet.signing_key()?), config, solver);

            if let Some(at) = start_at {
                platform::pacing::sleep_until(at).await;
                gateway.warm_up().await;
            }
            report(use_case.run_presolved(solutions).await.map_err(AppError::from)?);
        }
        Command::Solve {
            challenge,
            identity,
            difficulty,
        } => {
            let difficulty = parse_difficulty(difficulty)?;
            let challenge = Challenge::new(challenge, difficulty, 0);
            let output = SolveChallengeUseCase::new(solver)
                .execute(&challenge, &identity, SearchControl::new())
                .await
                .map_err(AppError::from)?;
            println!(
                "{} (attempts={}, {:.0} H/s)",
                output.nonce,
                output.attempts,
                output.hash_rate()
            );
        }
        Command::Bench { difficulty, rounds } => {
            let difficulty = parse_difficulty(difficulty)?;
            let threads = solver.threads;
            for round in 1..=rounds {
                let report = tokio::task::spawn_blocking(move || {
                    pow::run_benchmark(difficulty, threads, &SearchControl::new())
                })
                .await
                .context("benchmark worker panicked")?
                .context("benchmark stopped")?;
                println!(
                    "round {round}: {} attempts in {:.2}s, {:.0} H/s",
                    report.attempts,
                    report.elapsed.as_secs_f64(),
                    report.hash_rate()
                );
            }
        }
    }
    Ok(())
}

fn solver_config(flag: Option<usize>) -> anyhow::Result<SolverConfig> {
    let config = match config::solver_threads(flag)? {
        Some(threads) => SolverConfig::default().with_threads(threads),
        None => SolverConfig::default(),
    };
    config.validate().map_err(AppError::from)?;
    Ok(config)
}

fn parse_difficulty(zeros: u32) -> anyhow::Result<Difficulty> {
    Difficulty::new(zeros).with_context(|| format!("difficulty must be between 0 and {}", Difficulty::MAX))
}

async fn connect() -> anyhow::Result<HttpMintGateway> {
    let gateway_config = config::gateway_from_env()?;
    tracing::info!(url = %gateway_config.mint_url(), "Using allocation service");
    let gateway = HttpMintGateway::new(&gateway_config).map_err(AppError::from)?;
    gateway.warm_up().await;
    Ok(gateway)
}

fn request_config(wallet: &Wallet, request: &RequestArgs) -> MintConfig {
    let mut config = MintConfig::new(wallet.identity())
        .with_quantity(request.quantity)
        .with_fee_rate(request.fee_rate);
    config.challenge_timeout = Duration::from_millis(request.challenge_timeout_ms);
    config
}

fn finish_config(mut config: MintConfig, submit: Option<&SubmitArgs>) -> anyhow::Result<Arc<MintConfig>> {
    if let Some(submit) = submit {
        config = config.with_strategy(submit.strategy()).with_drain_window(submit.drain());
    }
    config.validate().map_err(AppError::from)?;
    Ok(Arc::new(config))
}

async fn load_solutions(path: &Path) -> anyhow::Result<Vec<mint::Solution>> {
    let solutions = JsonSolutionStore::new(path).load_all().await.map_err(AppError::from)?;
    if solutions.is_empty() {
        return Err(AppError::from(mint::MintError::NoSolutions).into());
    }
    Ok(solutions)
}

fn report(receipt: MintReceipt) {
    println!(
        "won by {}#{}: session {}",
        receipt.winner.label, receipt.winner.attempt, receipt.winner.reservation.session_id
    );
    println!("commit tx: {}", receipt.broadcast.commit_tx_id);
    for reveal in &receipt.broadcast.reveal_tx_ids {
        println!("reveal tx: {reveal}");
    }
    if let Some(urls) = &receipt.broadcast.mempool_urls {
        println!("mempool: {}", urls.commit);
    }
}
