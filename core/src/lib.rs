#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the skirmish engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative battle, and pure decision systems. Systems read immutable
//! [`RosterView`] snapshots and respond exclusively with [`Command`] batches.
//! The battle executes those commands via its `apply` entry point and
//! broadcasts [`Event`] values describing what actually changed.

use serde::Serialize;

/// Opposing factions that take part in a skirmish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Side {
    /// Side deployed along the bottom of the lane.
    Player,
    /// Side deployed along the top of the lane.
    Enemy,
}

impl Side {
    /// Returns the side that fights against `self`.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }

    /// Sign of the y-axis step that moves a unit toward its own rear.
    ///
    /// Enemy units start near the top edge, so their rear is toward
    /// decreasing y. Player units start near the bottom edge.
    #[must_use]
    pub const fn rear_direction(self) -> f32 {
        match self {
            Self::Player => 1.0,
            Self::Enemy => -1.0,
        }
    }
}

/// Unique identifier assigned to a deployed unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location on the playfield expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component. Grows toward the bottom of the field.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Straight-line distance between two positions.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Dimensions of the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    width: f32,
    height: f32,
    margin: f32,
}

impl Field {
    /// Creates a new field description.
    #[must_use]
    pub const fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Width of the field in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the field in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Distance from each edge that units are kept away from.
    #[must_use]
    pub const fn margin(&self) -> f32 {
        self.margin
    }

    /// Clamps a y coordinate into the band kept clear of the top and bottom edges.
    #[must_use]
    pub fn clamp_y(&self, y: f32) -> f32 {
        let upper = (self.height - self.margin).max(self.margin);
        y.clamp(self.margin, upper)
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(450.0, 800.0, 30.0)
    }
}

/// Integer tier classifying how far a unit can attack.
///
/// Tiers below [`RangeClass::FIRST_RANGED`] fight in melee; every higher tier
/// maps to an attack distance configured by the tactics system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RangeClass(u8);

impl RangeClass {
    /// Close-quarters tier.
    pub const MELEE: Self = Self(0);
    /// Lowest tier that counts as ranged.
    pub const FIRST_RANGED: Self = Self(2);

    /// Creates a new range class wrapper.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the underlying tier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Reports whether units of this tier attack from a distance.
    #[must_use]
    pub const fn is_ranged(&self) -> bool {
        self.0 >= Self::FIRST_RANGED.0
    }
}

/// Combat statistics carried by a unit definition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitStats {
    /// Hit points the unit is deployed with.
    pub health: u32,
    /// Engagement-range tier of the unit.
    pub range_class: RangeClass,
    /// Movement speed in world units per second.
    pub speed: f32,
}

/// Queued description of a unit that may be deployed.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitDefinition {
    /// Display name of the unit.
    pub name: String,
    /// Statistics applied to the deployed unit.
    pub stats: UnitStats,
}

impl UnitDefinition {
    /// Creates a new unit definition.
    #[must_use]
    pub fn new(name: impl Into<String>, stats: UnitStats) -> Self {
        Self {
            name: name.into(),
            stats,
        }
    }
}

/// Deck slot pairing a unit definition with its deployment flag.
#[derive(Clone, Debug, PartialEq)]
pub struct DeckEntry {
    definition: UnitDefinition,
    deployed: bool,
}

impl DeckEntry {
    /// Creates a deck entry that has not been deployed yet.
    #[must_use]
    pub fn new(definition: UnitDefinition) -> Self {
        Self {
            definition,
            deployed: false,
        }
    }

    /// Definition queued in this slot.
    #[must_use]
    pub fn definition(&self) -> &UnitDefinition {
        &self.definition
    }

    /// Reports whether the entry already entered the field.
    #[must_use]
    pub const fn is_deployed(&self) -> bool {
        self.deployed
    }

    /// Flags the entry as deployed. The flag is never cleared again.
    pub fn mark_deployed(&mut self) {
        self.deployed = true;
    }
}

/// Movement and attack intent of a single unit.
///
/// `target` is a non-owning reference into the opposing roster and must be
/// resolved against the roster before use. `destination` is an explicit
/// movement goal; when absent the host paths the unit toward its target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intent {
    /// Opposing unit the unit attacks, if any.
    pub target: Option<UnitId>,
    /// Point the unit moves toward, if any.
    pub destination: Option<Position>,
}

impl Intent {
    /// Intent without a target or a destination.
    pub const IDLE: Self = Self {
        target: None,
        destination: None,
    };
}

/// Commands that express all permissible battle mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Deploys the deck entry at `deck_index` for `side` onto the field.
    DeployUnit {
        /// Side owning the deck.
        side: Side,
        /// Zero-based position of the entry within the deck.
        deck_index: usize,
    },
    /// Points a unit at an opponent while keeping any explicit destination.
    AssignTarget {
        /// Unit receiving the target.
        unit: UnitId,
        /// Opposing unit to attack.
        target: UnitId,
    },
    /// Holds position and attacks, clearing any explicit destination.
    Engage {
        /// Unit receiving the order.
        unit: UnitId,
        /// Opposing unit to attack.
        target: UnitId,
    },
    /// Withdraws toward a point, clearing the attack target.
    Retreat {
        /// Unit receiving the order.
        unit: UnitId,
        /// Point to withdraw toward.
        destination: Position,
    },
    /// Moves a unit to a new position. Issued by the host simulation.
    MoveUnit {
        /// Unit being moved.
        unit: UnitId,
        /// Position after the move.
        position: Position,
    },
    /// Removes a unit from its roster. Issued by the host simulation.
    RemoveUnit {
        /// Unit being removed.
        unit: UnitId,
    },
}

/// Events broadcast by the battle after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a deck entry entered the field.
    UnitDeployed {
        /// Identifier assigned to the new unit.
        unit: UnitId,
        /// Side the unit fights for.
        side: Side,
        /// Deck slot the unit came from.
        deck_index: usize,
        /// Position the unit was placed at.
        position: Position,
    },
    /// Reports that a deployment request was rejected.
    DeploymentRejected {
        /// Side owning the deck.
        side: Side,
        /// Deck slot named by the request.
        deck_index: usize,
        /// Specific reason the deployment failed.
        reason: DeploymentError,
    },
    /// Reports that a unit's intent changed.
    IntentChanged {
        /// Unit whose intent changed.
        unit: UnitId,
        /// Intent after the change.
        intent: Intent,
    },
    /// Confirms that a unit moved.
    UnitMoved {
        /// Unit that moved.
        unit: UnitId,
        /// Position before the move.
        from: Position,
        /// Position after the move.
        to: Position,
    },
    /// Confirms that a unit left its roster.
    UnitRemoved {
        /// Unit that was removed.
        unit: UnitId,
        /// Side the unit fought for.
        side: Side,
    },
}

/// Reasons a deployment request may be rejected by the battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeploymentError {
    /// The deck does not contain the requested index.
    UnknownDeckEntry,
    /// The entry has already been deployed.
    AlreadyDeployed,
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Side the unit fights for.
    pub side: Side,
    /// Current position of the unit.
    pub position: Position,
    /// Statistics of the unit.
    pub stats: UnitStats,
    /// Current movement and attack intent.
    pub intent: Intent,
}

/// Read-only snapshot of one side's roster.
///
/// Snapshots keep roster order, which is deployment order. Tie-breaks in the
/// tactics system depend on it, so the view never re-sorts.
#[derive(Clone, Debug, Default)]
pub struct RosterView {
    snapshots: Vec<UnitSnapshot>,
}

impl RosterView {
    /// Creates a new roster view from snapshots listed in roster order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<UnitSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}
