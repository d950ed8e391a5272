use skirmish_battle::{self as battle, query, Battle};
use skirmish_core::{
    Command, DeploymentError, Event, Intent, Position, RangeClass, Side, UnitDefinition, UnitId,
    UnitStats,
};

fn definition(name: &str, range_class: u8) -> UnitDefinition {
    UnitDefinition::new(
        name,
        UnitStats {
            health: 100,
            range_class: RangeClass::new(range_class),
            speed: 12.0,
        },
    )
}

fn deploy(battle: &mut Battle, side: Side, deck_index: usize) -> UnitId {
    let mut events = Vec::new();
    battle::apply(battle, Command::DeployUnit { side, deck_index }, &mut events);
    match events.as_slice() {
        [Event::UnitDeployed { unit, .. }] => *unit,
        other => panic!("unexpected deployment events: {other:?}"),
    }
}

fn skirmish() -> Battle {
    Battle::new(
        vec![definition("shield", 0), definition("bow", 2)],
        vec![definition("raider", 0), definition("slinger", 3)],
    )
}

#[test]
fn deployment_flips_only_the_requested_entry() {
    let mut battle = skirmish();
    let _ = deploy(&mut battle, Side::Enemy, 1);

    let deck = query::deck(&battle, Side::Enemy);
    assert!(!deck[0].is_deployed());
    assert!(deck[1].is_deployed());
    assert!(query::deck(&battle, Side::Player)
        .iter()
        .all(|entry| !entry.is_deployed()));
    assert_eq!(query::roster_len(&battle, Side::Enemy), 1);
}

#[test]
fn deploying_twice_is_rejected() {
    let mut battle = skirmish();
    let _ = deploy(&mut battle, Side::Player, 0);

    let mut events = Vec::new();
    battle::apply(
        &mut battle,
        Command::DeployUnit {
            side: Side::Player,
            deck_index: 0,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::DeploymentRejected {
            side: Side::Player,
            deck_index: 0,
            reason: DeploymentError::AlreadyDeployed,
        }]
    );
    assert_eq!(query::roster_len(&battle, Side::Player), 1);
}

#[test]
fn unknown_deck_index_is_rejected() {
    let mut battle = skirmish();
    let mut events = Vec::new();
    battle::apply(
        &mut battle,
        Command::DeployUnit {
            side: Side::Enemy,
            deck_index: 7,
        },
        &mut events,
    );

    assert!(matches!(
        events.as_slice(),
        [Event::DeploymentRejected {
            reason: DeploymentError::UnknownDeckEntry,
            ..
        }]
    ));
    assert_eq!(query::roster_len(&battle, Side::Enemy), 0);
}

#[test]
fn roster_view_preserves_deployment_order() {
    let mut battle = skirmish();
    let second = deploy(&mut battle, Side::Enemy, 1);
    let first = deploy(&mut battle, Side::Enemy, 0);

    let ids: Vec<UnitId> = query::roster_view(&battle, Side::Enemy)
        .iter()
        .map(|snapshot| snapshot.id)
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[test]
fn assign_target_keeps_destination() {
    let mut battle = skirmish();
    let raider = deploy(&mut battle, Side::Enemy, 0);
    let shield = deploy(&mut battle, Side::Player, 0);
    let mut events = Vec::new();

    battle::apply(
        &mut battle,
        Command::Retreat {
            unit: raider,
            destination: Position::new(10.0, 40.0),
        },
        &mut events,
    );
    battle::apply(
        &mut battle,
        Command::AssignTarget {
            unit: raider,
            target: shield,
        },
        &mut events,
    );

    let snapshot = query::unit(&battle, raider).expect("raider on field");
    assert_eq!(
        snapshot.intent,
        Intent {
            target: Some(shield),
            destination: Some(Position::new(10.0, 40.0)),
        }
    );
}

#[test]
fn engage_and_retreat_are_mutually_exclusive() {
    let mut battle = skirmish();
    let slinger = deploy(&mut battle, Side::Enemy, 1);
    let shield = deploy(&mut battle, Side::Player, 0);
    let mut events = Vec::new();

    battle::apply(
        &mut battle,
        Command::Retreat {
            unit: slinger,
            destination: Position::new(50.0, 30.0),
        },
        &mut events,
    );
    let retreating = query::unit(&battle, slinger).expect("slinger").intent;
    assert_eq!(retreating.target, None);
    assert_eq!(retreating.destination, Some(Position::new(50.0, 30.0)));

    battle::apply(
        &mut battle,
        Command::Engage {
            unit: slinger,
            target: shield,
        },
        &mut events,
    );
    let engaging = query::unit(&battle, slinger).expect("slinger").intent;
    assert_eq!(engaging.target, Some(shield));
    assert_eq!(engaging.destination, None);
}

#[test]
fn unchanged_intent_emits_no_event() {
    let mut battle = skirmish();
    let raider = deploy(&mut battle, Side::Enemy, 0);
    let shield = deploy(&mut battle, Side::Player, 0);

    let mut events = Vec::new();
    let command = Command::AssignTarget {
        unit: raider,
        target: shield,
    };
    battle::apply(&mut battle, command.clone(), &mut events);
    assert_eq!(events.len(), 1);

    events.clear();
    battle::apply(&mut battle, command, &mut events);
    assert!(events.is_empty(), "repeating an intent should be silent");
}

#[test]
fn target_from_own_roster_is_ignored() {
    let mut battle = skirmish();
    let raider = deploy(&mut battle, Side::Enemy, 0);
    let slinger = deploy(&mut battle, Side::Enemy, 1);

    let mut events = Vec::new();
    battle::apply(
        &mut battle,
        Command::Engage {
            unit: raider,
            target: slinger,
        },
        &mut events,
    );

    assert!(events.is_empty());
    assert_eq!(
        query::unit(&battle, raider).expect("raider").intent,
        Intent::IDLE
    );
}

#[test]
fn removed_target_becomes_stale_and_resolves_to_none() {
    let mut battle = skirmish();
    let raider = deploy(&mut battle, Side::Enemy, 0);
    let shield = deploy(&mut battle, Side::Player, 0);
    let mut events = Vec::new();

    battle::apply(
        &mut battle,
        Command::AssignTarget {
            unit: raider,
            target: shield,
        },
        &mut events,
    );
    assert_eq!(
        query::live_target(&battle, raider).map(|snapshot| snapshot.id),
        Some(shield)
    );

    battle::apply(&mut battle, Command::RemoveUnit { unit: shield }, &mut events);

    let raider_state = query::unit(&battle, raider).expect("raider");
    assert_eq!(
        raider_state.intent.target,
        Some(shield),
        "removal does not rewrite other units' targets"
    );
    assert!(query::live_target(&battle, raider).is_none());
}

#[test]
fn move_unit_reports_previous_position() {
    let mut battle = skirmish();
    let raider = deploy(&mut battle, Side::Enemy, 0);
    let start = query::unit(&battle, raider).expect("raider").position;

    let mut events = Vec::new();
    battle::apply(
        &mut battle,
        Command::MoveUnit {
            unit: raider,
            position: Position::new(5.0, 6.0),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::UnitMoved {
            unit: raider,
            from: start,
            to: Position::new(5.0, 6.0),
        }]
    );
}

#[test]
fn winner_requires_exhausted_deck_and_empty_roster() {
    let mut battle = Battle::new(vec![definition("shield", 0)], vec![definition("raider", 0)]);
    let raider = deploy(&mut battle, Side::Enemy, 0);
    let _ = deploy(&mut battle, Side::Player, 0);
    assert_eq!(query::winner(&battle), None);

    let mut events = Vec::new();
    battle::apply(&mut battle, Command::RemoveUnit { unit: raider }, &mut events);
    assert_eq!(query::winner(&battle), Some(Side::Player));
}
