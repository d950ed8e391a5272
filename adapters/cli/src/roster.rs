//! Built-in decks used by the headless skirmish.

use skirmish_core::{RangeClass, UnitDefinition, UnitStats};

fn unit(name: &str, health: u32, range_class: u8, speed: f32) -> UnitDefinition {
    UnitDefinition::new(
        name,
        UnitStats {
            health,
            range_class: RangeClass::new(range_class),
            speed,
        },
    )
}

/// Default player army: three melee companies and one archer line.
pub(crate) fn player_deck() -> Vec<UnitDefinition> {
    vec![
        unit("Red Company", 1300, 0, 40.0),
        unit("Blue Riders", 1000, 0, 70.0),
        unit("Green Guard", 1500, 0, 30.0),
        unit("Yellow Archers", 800, 2, 30.0),
    ]
}

/// Default enemy army mixing melee raiders and both ranged tiers.
pub(crate) fn enemy_deck() -> Vec<UnitDefinition> {
    vec![
        unit("Raiders", 1200, 0, 45.0),
        unit("Slingers", 900, 2, 35.0),
        unit("Brutes", 1600, 0, 30.0),
        unit("Longbows", 850, 3, 30.0),
        unit("Outriders", 1000, 0, 65.0),
    ]
}
