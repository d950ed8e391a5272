#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes per-unit attack and movement intents from
//! roster snapshots.
//!
//! Every controlled unit picks the nearest opposing unit. Melee units simply
//! target it. Ranged units kite: they retreat when the opponent is well
//! inside their ideal distance and otherwise hold position and attack.
//!
//! Target acquisition scans the full opposing roster for every controlled
//! unit, so a think tick costs `O(controlled * opposing)` distance checks.

use std::collections::BTreeMap;

use skirmish_core::{Command, Field, Position, RangeClass, RosterView, UnitSnapshot};

/// Fraction of the attack range a ranged unit tries to fight from.
pub const IDEAL_RANGE_FACTOR: f32 = 0.8;
/// Fraction of the ideal distance below which a ranged unit retreats.
pub const RETREAT_TRIGGER_FACTOR: f32 = 0.5;
/// Horizontal distance covered by a retreat, along the escape direction.
pub const RETREAT_DISTANCE: f32 = 100.0;
/// Distance a retreating unit falls back toward its own rear.
pub const RETREAT_REAR_STEP: f32 = 50.0;

/// Attack distances keyed by ranged tier.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeTable {
    tiers: BTreeMap<RangeClass, f32>,
}

impl RangeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tiers: BTreeMap::new(),
        }
    }

    /// Returns the table extended with the provided tier.
    #[must_use]
    pub fn with_tier(mut self, range_class: RangeClass, distance: f32) -> Self {
        *self.tiers.entry(range_class).or_default() = distance;
        self
    }

    /// Records the attack distance of a tier, returning the previous value.
    pub fn insert(&mut self, range_class: RangeClass, distance: f32) -> Option<f32> {
        self.tiers.insert(range_class, distance)
    }

    /// Attack distance configured for the tier, if any.
    #[must_use]
    pub fn attack_range(&self, range_class: RangeClass) -> Option<f32> {
        self.tiers.get(&range_class).copied()
    }

    /// Iterates configured tiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (RangeClass, f32)> + '_ {
        self.tiers.iter().map(|(class, distance)| (*class, *distance))
    }
}

impl Default for RangeTable {
    fn default() -> Self {
        Self::new()
            .with_tier(RangeClass::new(2), 100.0)
            .with_tier(RangeClass::new(3), 150.0)
            .with_tier(RangeClass::new(4), 200.0)
            .with_tier(RangeClass::new(5), 250.0)
    }
}

/// Two-state kiting policy selected every think tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stance {
    /// Hold position and attack the nearest opponent.
    Engage,
    /// Fall back away from the nearest opponent.
    Retreat,
}

/// Selects the kiting stance for a ranged unit.
///
/// Retreat triggers strictly below half of the ideal distance; the same
/// boundary releases it, so a unit resting on it may flip between ticks.
#[must_use]
pub fn ranged_stance(distance: f32, attack_range: f32) -> Stance {
    let ideal = attack_range * IDEAL_RANGE_FACTOR;
    if distance < ideal * RETREAT_TRIGGER_FACTOR {
        Stance::Retreat
    } else {
        Stance::Engage
    }
}

/// Nearest opposing unit found by [`nearest_opponent`].
#[derive(Clone, Copy, Debug)]
pub struct Nearest<'a> {
    /// Snapshot of the opposing unit.
    pub unit: &'a UnitSnapshot,
    /// Straight-line distance to it.
    pub distance: f32,
}

/// Finds the opposing unit closest to `origin`.
///
/// Ties keep the unit seen first in roster order.
#[must_use]
pub fn nearest_opponent(origin: Position, opposing: &RosterView) -> Option<Nearest<'_>> {
    let mut best: Option<Nearest<'_>> = None;
    for candidate in opposing.iter() {
        let distance = origin.distance_to(candidate.position);
        let closer = best.map_or(true, |existing| distance < existing.distance);
        if closer {
            best = Some(Nearest {
                unit: candidate,
                distance,
            });
        }
    }
    best
}

/// Tactics engine that turns roster snapshots into intent commands.
#[derive(Clone, Debug, Default)]
pub struct Tactics {
    ranges: RangeTable,
}

impl Tactics {
    /// Creates a tactics engine using the provided range table.
    #[must_use]
    pub fn new(ranges: RangeTable) -> Self {
        Self { ranges }
    }

    /// Emits one intent command per controlled unit that reaches a decision.
    ///
    /// The output buffer is cleared before populating it. An empty opposing
    /// roster produces no commands, leaving every existing intent untouched.
    /// `field` bounds retreat destinations.
    pub fn handle(
        &self,
        field: Field,
        controlled: &RosterView,
        opposing: &RosterView,
        out: &mut Vec<Command>,
    ) {
        out.clear();
        if opposing.is_empty() {
            return;
        }

        for unit in controlled.iter() {
            if let Some(command) = self.decide(field, unit, opposing) {
                out.push(command);
            }
        }
    }

    fn decide(&self, field: Field, unit: &UnitSnapshot, opposing: &RosterView) -> Option<Command> {
        let nearest = nearest_opponent(unit.position, opposing)?;
        let range_class = unit.stats.range_class;

        if !range_class.is_ranged() {
            return Some(Command::AssignTarget {
                unit: unit.id,
                target: nearest.unit.id,
            });
        }

        let Some(attack_range) = self.ranges.attack_range(range_class) else {
            tracing::warn!(
                unit = unit.id.get(),
                range_class = range_class.get(),
                "no attack range configured for tier; engaging without kiting"
            );
            return Some(Command::Engage {
                unit: unit.id,
                target: nearest.unit.id,
            });
        };

        match ranged_stance(nearest.distance, attack_range) {
            Stance::Engage => Some(Command::Engage {
                unit: unit.id,
                target: nearest.unit.id,
            }),
            Stance::Retreat => {
                let destination = retreat_destination(field, unit, nearest)?;
                tracing::trace!(
                    unit = unit.id.get(),
                    threat = nearest.unit.id.get(),
                    distance = nearest.distance,
                    "retreating"
                );
                Some(Command::Retreat {
                    unit: unit.id,
                    destination,
                })
            }
        }
    }
}

/// Point a unit withdraws to, or `None` when it shares the threat's position
/// and no escape direction exists.
fn retreat_destination(
    field: Field,
    unit: &UnitSnapshot,
    threat: Nearest<'_>,
) -> Option<Position> {
    if threat.distance <= 0.0 {
        return None;
    }

    let position = unit.position;
    let away_x = (position.x() - threat.unit.position.x()) / threat.distance;
    let x = position.x() + away_x * RETREAT_DISTANCE;
    let y = field.clamp_y(position.y() + unit.side.rear_direction() * RETREAT_REAR_STEP);
    Some(Position::new(x, y))
}
