#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless skirmish runner that pits the decision controller against a
//! scripted or automated player army.

mod host;
mod roster;
mod summary;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use skirmish_battle::{self as battle, query, Battle};
use skirmish_controller::{Config, DecisionScheduler};
use skirmish_core::{Command, Side};
use tracing_subscriber::EnvFilter;

use crate::{host::Host, summary::Summary, summary::Tally};

/// Runs a headless skirmish between the player and enemy armies.
#[derive(Debug, Parser)]
#[command(name = "skirmish", version)]
struct Cli {
    /// Controller configuration in TOML; defaults apply when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Battle time to simulate, in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    duration_ms: u64,
    /// Length of a single host frame, in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Hand the player army to a second decision controller.
    #[arg(long)]
    auto: bool,
    /// Print the final summary as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.frame_ms == 0 {
        bail!("--frame-ms must be greater than zero");
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading controller config from {}", path.display()))?,
        None => Config::default(),
    };

    let summary = run(&cli, &config);
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serializing summary")?
        );
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn run(cli: &Cli, config: &Config) -> Summary {
    let mut battle = Battle::with_field(config.field(), roster::player_deck(), roster::enemy_deck());
    let mut tally = Tally::default();
    let mut events = Vec::new();

    let mut enemy = DecisionScheduler::new(Side::Enemy, config);
    let mut player = cli
        .auto
        .then(|| DecisionScheduler::new(Side::Player, config));
    if player.is_none() {
        for deck_index in 0..query::deck(&battle, Side::Player).len() {
            battle::apply(
                &mut battle,
                Command::DeployUnit {
                    side: Side::Player,
                    deck_index,
                },
                &mut events,
            );
        }
    }
    let manual_side = player.is_none().then_some(Side::Player);
    let host = Host::new(config.ranges().clone(), manual_side);

    tracing::info!(
        auto = cli.auto,
        duration_ms = cli.duration_ms,
        frame_ms = cli.frame_ms,
        "skirmish started"
    );

    let frame = Duration::from_millis(cli.frame_ms);
    let end = Duration::from_millis(cli.duration_ms);
    let mut now = Duration::ZERO;
    let mut frames = 0;
    while now < end {
        now += frame;
        frames += 1;

        enemy.advance(now, &mut battle, &mut events);
        if let Some(player) = player.as_mut() {
            player.advance(now, &mut battle, &mut events);
        }
        host.step(&mut battle, frame, &mut events);

        for event in events.drain(..) {
            tally.record(&battle, &event);
        }

        if let Some(winner) = query::winner(&battle) {
            tracing::info!(?winner, "battle decided");
            break;
        }
    }

    Summary::new(&battle, &tally, now.as_millis() as u64, frames)
}
