#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state for a skirmish.
//!
//! The battle owns both decks and both rosters. Decision systems never touch
//! it directly: they read snapshots through [`query`] and submit
//! [`Command`] values that [`apply`] executes.

use skirmish_core::{
    Command, DeckEntry, DeploymentError, Event, Field, Intent, Position, Side, UnitDefinition,
    UnitId, UnitStats,
};

const ENEMY_DEPLOY_Y: f32 = 100.0;
const PLAYER_DEPLOY_OFFSET: f32 = 160.0;

/// Represents the authoritative state of one skirmish.
#[derive(Debug)]
pub struct Battle {
    field: Field,
    player: Camp,
    enemy: Camp,
    next_unit_id: u32,
}

impl Battle {
    /// Creates a battle on the default field with both decks undeployed.
    #[must_use]
    pub fn new(player_deck: Vec<UnitDefinition>, enemy_deck: Vec<UnitDefinition>) -> Self {
        Self::with_field(Field::default(), player_deck, enemy_deck)
    }

    /// Creates a battle on the provided field.
    #[must_use]
    pub fn with_field(
        field: Field,
        player_deck: Vec<UnitDefinition>,
        enemy_deck: Vec<UnitDefinition>,
    ) -> Self {
        Self {
            field,
            player: Camp::from_definitions(player_deck),
            enemy: Camp::from_definitions(enemy_deck),
            next_unit_id: 0,
        }
    }

    fn camp(&self, side: Side) -> &Camp {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    fn camp_mut(&mut self, side: Side) -> &mut Camp {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    fn locate(&self, unit: UnitId) -> Option<(Side, usize)> {
        [Side::Player, Side::Enemy].into_iter().find_map(|side| {
            self.camp(side)
                .roster
                .iter()
                .position(|candidate| candidate.id == unit)
                .map(|index| (side, index))
        })
    }

    fn unit_mut(&mut self, unit: UnitId) -> Option<&mut Unit> {
        let (side, index) = self.locate(unit)?;
        self.camp_mut(side).roster.get_mut(index)
    }

    fn allocate_unit_id(&mut self) -> UnitId {
        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id = self.next_unit_id.saturating_add(1);
        id
    }

    fn deploy(&mut self, side: Side, deck_index: usize, out_events: &mut Vec<Event>) {
        let field = self.field;
        let deck_len = self.camp(side).deck.len();
        let outcome = match self.camp_mut(side).deck.get_mut(deck_index) {
            None => Err(DeploymentError::UnknownDeckEntry),
            Some(entry) if entry.is_deployed() => Err(DeploymentError::AlreadyDeployed),
            Some(entry) => {
                entry.mark_deployed();
                Ok(entry.definition().clone())
            }
        };

        let definition = match outcome {
            Ok(definition) => definition,
            Err(reason) => {
                tracing::debug!(?side, deck_index, ?reason, "deployment rejected");
                out_events.push(Event::DeploymentRejected {
                    side,
                    deck_index,
                    reason,
                });
                return;
            }
        };

        let id = self.allocate_unit_id();
        let position = deploy_slot(field, side, deck_index, deck_len);
        tracing::debug!(unit = id.get(), ?side, deck_index, name = %definition.name, "unit deployed");
        self.camp_mut(side).roster.push(Unit {
            id,
            side,
            name: definition.name,
            position,
            stats: definition.stats,
            intent: Intent::IDLE,
        });
        out_events.push(Event::UnitDeployed {
            unit: id,
            side,
            deck_index,
            position,
        });
    }

    /// Applies an intent change to `unit`, provided `target` (when present)
    /// stands on the unit's opposing roster.
    fn update_intent(
        &mut self,
        unit: UnitId,
        target: Option<UnitId>,
        change: impl FnOnce(&mut Intent),
        out_events: &mut Vec<Event>,
    ) {
        let Some((side, _)) = self.locate(unit) else {
            tracing::trace!(unit = unit.get(), "intent for unknown unit ignored");
            return;
        };

        if let Some(target) = target {
            let opposing = &self.camp(side.opponent()).roster;
            if !opposing.iter().any(|candidate| candidate.id == target) {
                tracing::warn!(
                    unit = unit.get(),
                    target = target.get(),
                    "target is not on the opposing roster; intent ignored"
                );
                return;
            }
        }

        let Some(state) = self.unit_mut(unit) else {
            return;
        };
        let before = state.intent;
        change(&mut state.intent);
        if state.intent != before {
            out_events.push(Event::IntentChanged {
                unit,
                intent: state.intent,
            });
        }
    }
}

impl Default for Battle {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// Applies the provided command to the battle, mutating state deterministically.
pub fn apply(battle: &mut Battle, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::DeployUnit { side, deck_index } => battle.deploy(side, deck_index, out_events),
        Command::AssignTarget { unit, target } => battle.update_intent(
            unit,
            Some(target),
            |intent| intent.target = Some(target),
            out_events,
        ),
        Command::Engage { unit, target } => battle.update_intent(
            unit,
            Some(target),
            |intent| {
                intent.target = Some(target);
                intent.destination = None;
            },
            out_events,
        ),
        Command::Retreat { unit, destination } => battle.update_intent(
            unit,
            None,
            |intent| {
                intent.target = None;
                intent.destination = Some(destination);
            },
            out_events,
        ),
        Command::MoveUnit { unit, position } => {
            if let Some(state) = battle.unit_mut(unit) {
                let from = state.position;
                state.position = position;
                out_events.push(Event::UnitMoved {
                    unit,
                    from,
                    to: position,
                });
            }
        }
        Command::RemoveUnit { unit } => {
            if let Some((side, index)) = battle.locate(unit) {
                let removed = battle.camp_mut(side).roster.remove(index);
                tracing::debug!(unit = removed.id.get(), ?side, "unit removed");
                out_events.push(Event::UnitRemoved { unit, side });
            }
        }
    }
}

/// Query functions that provide read-only access to the battle state.
pub mod query {
    use super::Battle;
    use skirmish_core::{DeckEntry, Field, RosterView, Side, UnitId, UnitSnapshot};

    /// Provides the playfield dimensions.
    #[must_use]
    pub fn field(battle: &Battle) -> Field {
        battle.field
    }

    /// Captures the roster of `side` in deployment order.
    #[must_use]
    pub fn roster_view(battle: &Battle, side: Side) -> RosterView {
        RosterView::from_snapshots(
            battle
                .camp(side)
                .roster
                .iter()
                .map(|unit| unit.snapshot())
                .collect(),
        )
    }

    /// Number of units of `side` currently on the field.
    #[must_use]
    pub fn roster_len(battle: &Battle, side: Side) -> usize {
        battle.camp(side).roster.len()
    }

    /// Provides read-only access to the deck of `side` in index order.
    #[must_use]
    pub fn deck(battle: &Battle, side: Side) -> &[DeckEntry] {
        &battle.camp(side).deck
    }

    /// Captures a snapshot of a single unit, if it is still on the field.
    #[must_use]
    pub fn unit(battle: &Battle, unit: UnitId) -> Option<UnitSnapshot> {
        let (side, index) = battle.locate(unit)?;
        battle
            .camp(side)
            .roster
            .get(index)
            .map(|state| state.snapshot())
    }

    /// Display name of a unit still on the field.
    #[must_use]
    pub fn unit_name(battle: &Battle, unit: UnitId) -> Option<&str> {
        let (side, index) = battle.locate(unit)?;
        battle
            .camp(side)
            .roster
            .get(index)
            .map(|state| state.name.as_str())
    }

    /// Resolves the attack target of `unit` against the opposing roster.
    ///
    /// Targets are only refreshed on think ticks, so the referenced unit may
    /// have left the field since. Such stale targets resolve to `None`.
    #[must_use]
    pub fn live_target(battle: &Battle, unit: UnitId) -> Option<UnitSnapshot> {
        let (side, index) = battle.locate(unit)?;
        let target = battle.camp(side).roster.get(index)?.intent.target?;
        battle
            .camp(side.opponent())
            .roster
            .iter()
            .find(|candidate| candidate.id == target)
            .map(|candidate| candidate.snapshot())
    }

    /// Reports the winning side once the other side has deployed its whole
    /// deck and lost every unit on the field.
    #[must_use]
    pub fn winner(battle: &Battle) -> Option<Side> {
        [Side::Player, Side::Enemy]
            .into_iter()
            .find(|side| battle.camp(side.opponent()).is_exhausted())
    }
}

#[derive(Debug)]
struct Camp {
    deck: Vec<DeckEntry>,
    roster: Vec<Unit>,
}

impl Camp {
    fn from_definitions(definitions: Vec<UnitDefinition>) -> Self {
        Self {
            deck: definitions.into_iter().map(DeckEntry::new).collect(),
            roster: Vec::new(),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.roster.is_empty() && self.deck.iter().all(DeckEntry::is_deployed)
    }
}

#[derive(Clone, Debug)]
struct Unit {
    id: UnitId,
    side: Side,
    name: String,
    position: Position,
    stats: UnitStats,
    intent: Intent,
}

impl Unit {
    fn snapshot(&self) -> skirmish_core::UnitSnapshot {
        skirmish_core::UnitSnapshot {
            id: self.id,
            side: self.side,
            position: self.position,
            stats: self.stats,
            intent: self.intent,
        }
    }
}

/// Spreads deck slots evenly across the field width on each side's home row.
fn deploy_slot(field: Field, side: Side, deck_index: usize, deck_len: usize) -> Position {
    let slot_width = field.width() / (deck_len + 1) as f32;
    let x = slot_width * (deck_index + 1) as f32;
    let y = match side {
        Side::Enemy => ENEMY_DEPLOY_Y,
        Side::Player => field.height() - PLAYER_DEPLOY_OFFSET,
    };
    Position::new(x, field.clamp_y(y))
}
