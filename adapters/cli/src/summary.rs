//! Aggregates battle events into the report printed at the end of a run.

use std::fmt;

use serde::Serialize;
use skirmish_battle::{query, Battle};
use skirmish_core::{Event, Position, Side, UnitId};

/// Running tally of the events observed during a run.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    deployments: usize,
    rejected_deployments: usize,
    intent_changes: usize,
    retreats: usize,
    removals: usize,
}

impl Tally {
    /// Records a single event and logs the interesting ones.
    pub(crate) fn record(&mut self, battle: &Battle, event: &Event) {
        match event {
            Event::UnitDeployed {
                unit,
                side,
                deck_index,
                position,
            } => {
                self.deployments += 1;
                tracing::info!(
                    unit = unit.get(),
                    ?side,
                    deck_index,
                    x = position.x(),
                    y = position.y(),
                    name = query::unit_name(battle, *unit).unwrap_or("?"),
                    "unit deployed"
                );
            }
            Event::DeploymentRejected {
                side,
                deck_index,
                reason,
            } => {
                self.rejected_deployments += 1;
                tracing::warn!(?side, deck_index, ?reason, "deployment rejected");
            }
            Event::IntentChanged { unit, intent } => {
                self.intent_changes += 1;
                if intent.target.is_none() {
                    if let Some(destination) = intent.destination {
                        self.retreats += 1;
                        tracing::debug!(
                            unit = unit.get(),
                            x = destination.x(),
                            y = destination.y(),
                            "unit retreating"
                        );
                    }
                }
            }
            Event::UnitMoved { .. } => {}
            Event::UnitRemoved { unit, side } => {
                self.removals += 1;
                tracing::info!(unit = unit.get(), ?side, "unit removed");
            }
        }
    }
}

/// Final state of a unit still on the field.
#[derive(Debug, Serialize)]
pub(crate) struct UnitReport {
    id: UnitId,
    side: Side,
    name: String,
    position: Position,
    target: Option<UnitId>,
    destination: Option<Position>,
}

/// Report produced after the frame loop finishes.
#[derive(Debug, Serialize)]
pub(crate) struct Summary {
    elapsed_ms: u64,
    frames: u64,
    deployments: usize,
    rejected_deployments: usize,
    intent_changes: usize,
    retreats: usize,
    removals: usize,
    winner: Option<Side>,
    units: Vec<UnitReport>,
}

impl Summary {
    pub(crate) fn new(battle: &Battle, tally: &Tally, elapsed_ms: u64, frames: u64) -> Self {
        let units = [Side::Player, Side::Enemy]
            .into_iter()
            .flat_map(|side| query::roster_view(battle, side).into_vec())
            .map(|snapshot| UnitReport {
                id: snapshot.id,
                side: snapshot.side,
                name: query::unit_name(battle, snapshot.id)
                    .unwrap_or_default()
                    .to_owned(),
                position: snapshot.position,
                target: query::live_target(battle, snapshot.id).map(|target| target.id),
                destination: snapshot.intent.destination,
            })
            .collect();

        Self {
            elapsed_ms,
            frames,
            deployments: tally.deployments,
            rejected_deployments: tally.rejected_deployments,
            intent_changes: tally.intent_changes,
            retreats: tally.retreats,
            removals: tally.removals,
            winner: query::winner(battle),
            units,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ms over {} frames: {} deployed, {} rejected, {} intent changes ({} retreats), {} removed",
            self.elapsed_ms,
            self.frames,
            self.deployments,
            self.rejected_deployments,
            self.intent_changes,
            self.retreats,
            self.removals,
        )?;
        match self.winner {
            Some(side) => writeln!(f, "winner: {side:?}")?,
            None => writeln!(f, "no winner yet")?,
        }
        for unit in &self.units {
            let order = match (unit.target, unit.destination) {
                (Some(target), _) => format!("targeting #{}", target.get()),
                (None, Some(destination)) => {
                    format!("heading to ({:.0}, {:.0})", destination.x(), destination.y())
                }
                (None, None) => "idle".to_owned(),
            };
            writeln!(
                f,
                "  #{:<3} {:<6} {:<15} at ({:>5.1}, {:>5.1}) {order}",
                unit.id.get(),
                format!("{:?}", unit.side),
                unit.name,
                unit.position.x(),
                unit.position.y(),
            )?;
        }
        Ok(())
    }
}
