use std::fs;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use headlines::cli::{Cli, Commands};
use headlines::config::{CacheBackend, Config, WatchConfig};
use headlines::domain::HeadlineRecord;
use headlines::errors::{HeadlineError, HeadlineResult};
use headlines::services::{FeedSession, FeedState};
use headlines::sources::{FeedFetcher, HttpFetcher, RssAtomParser};
use headlines::storage::{FilePayloadCache, PayloadCache, SqlitePayloadCache, SqliteStorage};

fn main() {
    set_up_logging();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn set_up_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .with_env_var("HEADLINES_LOG")
                .from_env_lossy(),
        )
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            name,
            url,
            headline_as_id,
            interval,
            polls,
        } => {
            let config = Config::from_env().context("could not load configuration")?;
            let watch = WatchConfig::default()
                .with_headline_as_id(headline_as_id || config.use_headline_as_id);
            cmd_run(&name, &url, watch, &config, Duration::from_secs(interval), polls)
        }
        Commands::Diff {
            baseline,
            current,
            headline_as_id,
            json,
        } => {
            let watch = WatchConfig::default()
                .with_headline_as_id(headline_as_id || Config::headline_as_id_from_env());
            cmd_diff(&baseline, &current, watch, json)
        }
        Commands::Show {
            path,
            headline_as_id,
        } => {
            let watch = WatchConfig::default()
                .with_headline_as_id(headline_as_id || Config::headline_as_id_from_env());
            cmd_show(&path, watch)
        }
    }
}

fn open_cache(config: &Config) -> HeadlineResult<Box<dyn PayloadCache>> {
    let cache: Box<dyn PayloadCache> = match config.cache_backend {
        CacheBackend::File => Box::new(FilePayloadCache::new(&config.cache_dir)),
        CacheBackend::Sqlite => {
            let storage = SqliteStorage::new(&config.db_path)?;
            Box::new(SqlitePayloadCache::new(storage))
        }
    };
    Ok(cache)
}

fn print_new(records: &[HeadlineRecord]) {
    for record in records {
        println!("+ {}", record.format());
    }
}

fn cmd_run(
    name: &str,
    url: &str,
    watch: WatchConfig,
    config: &Config,
    interval: Duration,
    polls: u64,
) -> Result<()> {
    let cache = open_cache(config)
        .with_context(|| format!("could not open {} cache", config.cache_backend))?;
    let fetcher = HttpFetcher::with_timeout(config.request_timeout);

    let session = FeedSession::open(name, watch, Box::new(RssAtomParser::new()), cache);
    if !session.state().is_cold_start() {
        println!(
            "Restored {} known headlines for {}",
            session.state().known_identities().len(),
            name
        );
    }

    let reported = session.scoped(|session| poll(session, &fetcher, url, interval, polls))?;
    println!("Reported {} new headlines.", reported);

    Ok(())
}

fn poll(
    session: &mut FeedSession,
    fetcher: &dyn FeedFetcher,
    url: &str,
    interval: Duration,
    polls: u64,
) -> Result<usize> {
    let mut reported = 0;
    let mut round = 0;

    loop {
        round += 1;
        println!("Fetching {}...", url);

        let was_cold = session.state().is_cold_start();
        match fetcher.fetch(url).and_then(|payload| session.refresh(&payload)) {
            Ok(_) if was_cold => {
                println!(
                    "Baseline established with {} headlines.",
                    session.state().latest_records().len()
                );
                session.checkpoint();
            }
            Ok(new) if new.is_empty() => {
                println!("No new headlines.");
                session.checkpoint();
            }
            Ok(new) => {
                print_new(&new);
                reported += new.len();
                session.checkpoint();
            }
            Err(HeadlineError::NoEntries) => println!("No entries found."),
            Err(e) => error!(url, error = %e, "Refresh failed"),
        }
        io::stdout().flush()?;

        if polls != 0 && round >= polls {
            break;
        }
        thread::sleep(interval);
    }

    Ok(reported)
}

fn cmd_diff(baseline: &str, current: &str, watch: WatchConfig, json: bool) -> Result<()> {
    let baseline_payload = fs::read_to_string(baseline)
        .with_context(|| format!("could not read baseline payload {}", baseline))?;
    let current_payload = fs::read_to_string(current)
        .with_context(|| format!("could not read payload {}", current))?;

    let mut state = FeedState::new(watch, Box::new(RssAtomParser::new()));
    match state.refresh(&baseline_payload) {
        Ok(_) | Err(HeadlineError::NoEntries) => {}
        Err(e) => return Err(e).with_context(|| format!("invalid baseline {}", baseline)),
    }

    let new = match state.refresh(&current_payload) {
        Ok(new) => new,
        Err(HeadlineError::NoEntries) => {
            println!("No entries found.");
            return Ok(());
        }
        Err(e) => return Err(e).with_context(|| format!("invalid payload {}", current)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&new)?);
    } else if new.is_empty() {
        println!("No new headlines.");
    } else {
        print_new(&new);
    }

    Ok(())
}

fn cmd_show(path: &str, watch: WatchConfig) -> Result<()> {
    let payload =
        fs::read_to_string(path).with_context(|| format!("could not read payload {}", path))?;

    let state = FeedState::new(watch, Box::new(RssAtomParser::new()));
    let records = state
        .build_records(&payload)
        .with_context(|| format!("invalid payload {}", path))?;

    if records.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    for record in &records {
        println!("{}  {}", record.identity(), record.headline());
    }

    Ok(())
}
