#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision controller that drives one side of a skirmish.
//!
//! The host loop calls [`DecisionScheduler::advance`] once per frame with the
//! current battle time. The scheduler rate-limits two independent behaviours
//! against those timestamps: deployment of queued deck entries and a think
//! tick that refreshes every controlled unit's intent.

mod config;

use std::time::Duration;

use skirmish_battle::{self as battle, query, Battle};
use skirmish_core::{Command, Event, Side};
use skirmish_system_deployment::Deployment;
use skirmish_system_tactics::Tactics;

pub use config::{Config, ConfigError};

/// Rate-limited AI controller for a single side.
///
/// Cadences compare absolute timestamps rather than accumulated frame time.
/// When the host stalls past several intervals the next call fires each
/// behaviour at most once; missed ticks are not replayed.
#[derive(Debug)]
pub struct DecisionScheduler {
    side: Side,
    deploy_interval: Duration,
    think_interval: Duration,
    last_deploy: Duration,
    last_think: Duration,
    deployment: Deployment,
    tactics: Tactics,
    commands: Vec<Command>,
}

impl DecisionScheduler {
    /// Creates a scheduler controlling `side`, with both timers at zero.
    #[must_use]
    pub fn new(side: Side, config: &Config) -> Self {
        Self {
            side,
            deploy_interval: config.deploy_interval(),
            think_interval: config.think_interval(),
            last_deploy: Duration::ZERO,
            last_think: Duration::ZERO,
            deployment: Deployment::new(config.max_units_on_field()),
            tactics: Tactics::new(config.ranges().clone()),
            commands: Vec::new(),
        }
    }

    /// Timestamp of the most recent deployment step.
    #[must_use]
    pub const fn last_deploy_time(&self) -> Duration {
        self.last_deploy
    }

    /// Timestamp of the most recent think tick.
    #[must_use]
    pub const fn last_think_time(&self) -> Duration {
        self.last_think
    }

    /// Runs whichever behaviours are due at `now`.
    ///
    /// Deployment runs before the think tick, so a unit deployed in this call
    /// receives an intent in the same call when both cadences elapse.
    /// Timestamps earlier than the last recorded one count as no elapsed time.
    pub fn advance(&mut self, now: Duration, battle: &mut Battle, out_events: &mut Vec<Event>) {
        if now.saturating_sub(self.last_deploy) >= self.deploy_interval {
            tracing::debug!(
                side = ?self.side,
                now_ms = now.as_millis() as u64,
                "deploy cadence elapsed"
            );
            self.deploy_step(battle, out_events);
            self.last_deploy = now;
        }

        if now.saturating_sub(self.last_think) >= self.think_interval {
            tracing::trace!(
                side = ?self.side,
                now_ms = now.as_millis() as u64,
                "think cadence elapsed"
            );
            self.think_step(battle, out_events);
            self.last_think = now;
        }
    }

    fn deploy_step(&mut self, battle: &mut Battle, out_events: &mut Vec<Event>) {
        self.deployment.handle(
            self.side,
            query::roster_len(battle, self.side),
            query::deck(battle, self.side),
            &mut self.commands,
        );
        self.flush(battle, out_events);
    }

    fn think_step(&mut self, battle: &mut Battle, out_events: &mut Vec<Event>) {
        let controlled = query::roster_view(battle, self.side);
        let opposing = query::roster_view(battle, self.side.opponent());

        self.tactics.handle(
            query::field(battle),
            &controlled,
            &opposing,
            &mut self.commands,
        );
        self.flush(battle, out_events);
    }

    fn flush(&mut self, battle: &mut Battle, out_events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            battle::apply(battle, command, out_events);
        }
    }
}
