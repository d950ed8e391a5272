//! Minimal host simulation that walks units toward their intents.
//!
//! Collision, terrain and damage stay out of scope; the host only turns the
//! controller's advisory intents into motion so decisions play out over time.

use std::time::Duration;

use skirmish_battle::{self as battle, query, Battle};
use skirmish_core::{Command, Event, Field, Position, Side, UnitSnapshot};
use skirmish_system_tactics::RangeTable;

const MELEE_REACH: f32 = 20.0;
const ARRIVAL_DISTANCE: f32 = 15.0;

/// Moves every unit one frame toward its target or destination.
pub(crate) struct Host {
    ranges: RangeTable,
    manual_side: Option<Side>,
}

impl Host {
    /// Creates a host. Units of `manual_side` without intents march toward
    /// the opposing home row instead of standing still.
    pub(crate) fn new(ranges: RangeTable, manual_side: Option<Side>) -> Self {
        Self {
            ranges,
            manual_side,
        }
    }

    pub(crate) fn step(&self, battle: &mut Battle, dt: Duration, out_events: &mut Vec<Event>) {
        let field = query::field(battle);
        let mut moves = Vec::new();
        for side in [Side::Player, Side::Enemy] {
            for unit in query::roster_view(battle, side).iter() {
                if let Some(position) = self.next_position(battle, field, unit, dt) {
                    moves.push(Command::MoveUnit {
                        unit: unit.id,
                        position,
                    });
                }
            }
        }

        for command in moves {
            battle::apply(battle, command, out_events);
        }
    }

    fn goal(&self, battle: &Battle, field: Field, unit: &UnitSnapshot) -> Option<(Position, f32)> {
        // Targets are resolved here, at point of use, since they may be stale.
        if let Some(target) = query::live_target(battle, unit.id) {
            let reach = self
                .ranges
                .attack_range(unit.stats.range_class)
                .unwrap_or(MELEE_REACH);
            return Some((target.position, reach));
        }

        if let Some(destination) = unit.intent.destination {
            return Some((destination, ARRIVAL_DISTANCE));
        }

        if self.manual_side == Some(unit.side) {
            let rear = unit.side.opponent().rear_direction();
            let home_row = field.clamp_y(unit.position.y() + rear * field.height());
            return Some((Position::new(unit.position.x(), home_row), ARRIVAL_DISTANCE));
        }

        None
    }

    fn next_position(
        &self,
        battle: &Battle,
        field: Field,
        unit: &UnitSnapshot,
        dt: Duration,
    ) -> Option<Position> {
        let (goal, stop_distance) = self.goal(battle, field, unit)?;
        let distance = unit.position.distance_to(goal);
        if distance <= stop_distance {
            return None;
        }

        let step = (unit.stats.speed * dt.as_secs_f32()).min(distance - stop_distance);
        let x = unit.position.x() + (goal.x() - unit.position.x()) / distance * step;
        let y = unit.position.y() + (goal.y() - unit.position.y()) / distance * step;
        let max_x = (field.width() - field.margin()).max(field.margin());
        Some(Position::new(
            x.clamp(field.margin(), max_x),
            field.clamp_y(y),
        ))
    }
}
