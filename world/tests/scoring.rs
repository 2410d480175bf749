use std::time::Duration;

use maze_pursuit_core::{CellCoord, Command, Direction, Event, Pellet};
use maze_pursuit_world::{self as world, layout, query, RunStatus, World, CAPTURE_AWARD};

fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn ticks(count: usize) -> Vec<Command> {
    (0..count)
        .map(|_| Command::Tick {
            dt: Duration::from_millis(100),
        })
        .collect()
}

#[test]
fn score_matches_collected_pellets_on_the_default_maze() {
    let mut world = World::new();
    let maze = layout::default_maze().expect("default layout parses");
    let initial = maze.remaining_collectibles();
    let mut commands = vec![
        Command::ConfigureMaze { maze },
        Command::PlacePlayer {
            cell: CellCoord::new(1, 1),
        },
        Command::SetPlayerHeading {
            direction: Direction::Right,
        },
    ];
    commands.extend(ticks(40));

    let events = apply_all(&mut world, commands);

    let collected: Vec<Pellet> = events
        .iter()
        .filter_map(|event| match event {
            Event::PelletCollected { pellet, .. } => Some(*pellet),
            _ => None,
        })
        .collect();
    let expected: u32 = collected.iter().map(|pellet| pellet.score()).sum();

    assert_eq!(query::score(&world), expected);
    assert!(collected.contains(&Pellet::Sound));
    assert_eq!(
        query::maze(&world).remaining_collectibles(),
        initial - collected.iter().filter(|pellet| pellet.counts_toward_clear()).count()
    );
    assert_eq!(query::player_cell(&world), Some(CellCoord::new(1, 29)));
}

#[test]
fn recollecting_power_restarts_the_special_effect() {
    let config = world::WorldConfig::new(Duration::from_millis(500), Duration::from_millis(400));
    let mut world = World::with_config(config);
    let maze = layout::parse("WWWWWW\nW PP.W\nWWWWWW").expect("layout parses");
    let mut commands = vec![
        Command::ConfigureMaze { maze },
        Command::PlacePlayer {
            cell: CellCoord::new(1, 1),
        },
        Command::SetPlayerHeading {
            direction: Direction::Right,
        },
    ];
    commands.extend(ticks(2));

    let events = apply_all(&mut world, commands);

    let starts = events
        .iter()
        .filter(|event| matches!(event, Event::SpecialEffectStarted { .. }))
        .count();
    assert_eq!(starts, 2);
    assert_eq!(
        query::special_effect_remaining(&world),
        Duration::from_millis(500)
    );
}

#[test]
fn player_loses_when_walking_into_a_patrolling_adversary() {
    let mut world = World::new();
    let maze = layout::parse("WWWWWW\nW  ..W\nWWWWWW").expect("layout parses");
    let mut commands = vec![
        Command::ConfigureMaze { maze },
        Command::PlacePlayer {
            cell: CellCoord::new(1, 1),
        },
        Command::SpawnAdversary {
            cell: CellCoord::new(1, 3),
        },
        Command::SetPlayerHeading {
            direction: Direction::Right,
        },
    ];
    commands.extend(ticks(4));

    let events = apply_all(&mut world, commands);

    assert!(events.iter().any(|event| matches!(event, Event::PlayerCaught { .. })));
    assert_eq!(query::status(&world), RunStatus::Lost);
    assert_eq!(query::tick_index(&world), 2);
}

#[test]
fn active_effect_turns_contact_into_a_capture() {
    let mut world = World::new();
    let maze = layout::parse("WWWWWWW\nW P  .W\nWWWWWWW").expect("layout parses");
    let mut commands = vec![
        Command::ConfigureMaze { maze },
        Command::PlacePlayer {
            cell: CellCoord::new(1, 1),
        },
        Command::SpawnAdversary {
            cell: CellCoord::new(1, 3),
        },
        Command::SetPlayerHeading {
            direction: Direction::Right,
        },
    ];
    commands.extend(ticks(2));

    let events = apply_all(&mut world, commands);

    assert!(events.contains(&Event::AdversaryCaptured {
        adversary: maze_pursuit_core::AdversaryId::new(0),
        cell: CellCoord::new(1, 3),
        award: CAPTURE_AWARD,
    }));
    assert_eq!(
        query::score(&world),
        Pellet::Power.score() + CAPTURE_AWARD
    );
    assert_eq!(query::status(&world), RunStatus::Running);
}
