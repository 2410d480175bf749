use std::time::Duration;

use maze_pursuit_core::{
    AdversaryId, BehaviorMode, CellCoord, CellState, Command, Direction, Event, GridQuery,
    MazeView, MovementIntent,
};
use maze_pursuit_system_pursuit::{
    agent::AdversaryAgent,
    decider::{MovementDecider, PatrolMemory},
    distance_field,
    mode::{ModeController, Stimulus},
    Pursuit,
};
use maze_pursuit_world::{self as world, layout, query, World, WorldConfig};

const CHASE: Duration = Duration::from_secs(3);

#[test]
fn special_effect_beats_a_visible_player() {
    let maze = layout::parse("WWWW\nW  W\nWWWW").expect("layout parses");
    let grid = MazeView::new(&maze, true);
    let mut agent = AdversaryAgent::new(AdversaryId::new(0), CellCoord::new(1, 1), CHASE);

    let decision = agent.tick(
        Some(CellCoord::new(1, 2)),
        None,
        Duration::from_millis(100),
        &grid,
    );

    assert_eq!(decision.mode(), BehaviorMode::RunAway);
}

#[test]
fn lost_sight_times_out_after_the_chase_duration() {
    let mut controller = ModeController::new(CHASE);
    let _ = controller.update(&Stimulus {
        player_visible: true,
        ..Stimulus::default()
    });
    assert_eq!(controller.mode(), BehaviorMode::Chase);

    let transition = controller.update(&Stimulus {
        elapsed: Duration::from_millis(3500),
        ..Stimulus::default()
    });

    assert_eq!(transition.to, BehaviorMode::Patrol);
}

#[test]
fn run_away_prefers_a_neighbor_the_player_cannot_reach() {
    // The adversary stands in a wall gap separating the player's corridor
    // from an isolated pocket.
    let maze = layout::parse("WWWWWWWWWW\nW      W W\nWWWWWWWWWW").expect("layout parses");
    let grid = MazeView::new(&maze, false);
    let player = CellCoord::new(1, 1);
    let adversary = CellCoord::new(1, 7);

    let field = distance_field::compute(player, &grid);
    assert_eq!(field.distance(CellCoord::new(1, 6)), Some(5));
    assert!(!field.is_reachable(CellCoord::new(1, 8)));

    let intent =
        MovementDecider::default().decide(adversary, BehaviorMode::RunAway, Some(player), &grid);

    assert_eq!(intent, MovementIntent::Step(Direction::Right));
}

#[test]
fn patrol_sequences_repeat_exactly() {
    let maze = layout::default_maze().expect("default layout parses");
    let grid = MazeView::new(&maze, false);
    let start = CellCoord::new(12, 11);
    let memory = PatrolMemory {
        axis: maze_pursuit_core::Axis::Vertical,
        direction: Direction::Up,
    };

    let first = patrol_walk(&grid, start, memory, 64);
    let second = patrol_walk(&grid, start, memory, 64);

    assert_eq!(first, second);
    assert!(first.iter().any(|intent| *intent != MovementIntent::Stay));
}

fn patrol_walk(
    grid: &MazeView<'_>,
    start: CellCoord,
    memory: PatrolMemory,
    steps: usize,
) -> Vec<MovementIntent> {
    let mut decider = MovementDecider::with_patrol(memory);
    let mut position = start;
    let mut intents = Vec::with_capacity(steps);

    for _ in 0..steps {
        let intent = decider.decide(position, BehaviorMode::Patrol, None, grid);
        let destination = position.apply(intent);
        if grid.is_traversable(destination) {
            position = destination;
        }
        intents.push(intent);
    }

    intents
}

#[test]
fn consumed_pellets_become_empty_and_traversable() {
    let mut world = World::new();
    let mut events = Vec::new();
    let maze = layout::parse("WWWWW\nW ..W\nWWWWW").expect("layout parses");
    world::apply(&mut world, Command::ConfigureMaze { maze }, &mut events);
    world::apply(
        &mut world,
        Command::PlacePlayer {
            cell: CellCoord::new(1, 1),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SetPlayerHeading {
            direction: Direction::Right,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(100),
        },
        &mut events,
    );

    let pellet = CellCoord::new(1, 2);
    assert_eq!(query::maze(&world).cell(pellet), Some(CellState::Empty));

    let grid = query::grid_view(&world);
    let field = distance_field::compute(CellCoord::new(1, 1), &grid);
    assert_eq!(field.distance(pellet), Some(1));
    assert_eq!(field.distance(CellCoord::new(1, 3)), Some(2));
}

#[test]
fn collected_sound_pellet_sends_the_nearest_adversary_to_investigate() {
    let config = WorldConfig::new(Duration::from_secs(6), Duration::from_millis(100));
    let mut world = World::with_config(config);
    let mut pursuit = Pursuit::default();
    let maze = layout::parse("WWWWWWWWW\nW S     W\nW WWWWW W\nW       W\nWWWWWWWWW")
        .expect("layout parses");

    let setup = [
        Command::ConfigureMaze { maze },
        Command::PlacePlayer {
            cell: CellCoord::new(1, 1),
        },
        Command::SpawnAdversary {
            cell: CellCoord::new(3, 1),
        },
        Command::SpawnAdversary {
            cell: CellCoord::new(3, 7),
        },
        Command::SetPlayerHeading {
            direction: Direction::Right,
        },
        Command::Tick {
            dt: Duration::from_millis(100),
        },
    ];
    let mut log = Vec::new();
    for command in setup {
        drive(&mut world, &mut pursuit, command, &mut log);
    }

    assert!(log.contains(&Event::SoundEmitted {
        cell: CellCoord::new(1, 2)
    }));
    let modes: Vec<_> = pursuit
        .agents()
        .map(|agent| (agent.id(), agent.mode()))
        .collect();
    assert_eq!(
        modes,
        vec![
            (AdversaryId::new(0), BehaviorMode::InvestigateSound),
            (AdversaryId::new(1), BehaviorMode::Patrol),
        ]
    );
    assert_eq!(
        pursuit
            .agent(AdversaryId::new(0))
            .and_then(|agent| agent.state().sound_memory()),
        Some(CellCoord::new(1, 2))
    );
}

#[test]
fn fleeing_adversaries_are_captured_and_forgotten() {
    let config = WorldConfig::new(Duration::from_secs(6), Duration::ZERO);
    let mut world = World::with_config(config);
    let mut pursuit = Pursuit::default();
    let maze =
        layout::parse("WWWWWW\nW P  W\nWWWWWW\nW.WWWW\nWWWWWW").expect("layout parses");

    let setup = [
        Command::ConfigureMaze { maze },
        Command::PlacePlayer {
            cell: CellCoord::new(1, 1),
        },
        Command::SpawnAdversary {
            cell: CellCoord::new(1, 4),
        },
        Command::SetPlayerHeading {
            direction: Direction::Right,
        },
    ];
    let mut log = Vec::new();
    for command in setup {
        drive(&mut world, &mut pursuit, command, &mut log);
    }

    for _ in 0..3 {
        drive(
            &mut world,
            &mut pursuit,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            &mut log,
        );
    }

    assert!(log.iter().any(|event| matches!(
        event,
        Event::AdversaryCaptured {
            adversary,
            award: 200,
            ..
        } if *adversary == AdversaryId::new(0)
    )));
    assert!(pursuit.agent(AdversaryId::new(0)).is_none());
    assert!(query::adversary_view(&world).is_empty());
    assert_eq!(query::status(&world), world::RunStatus::Running);
}

fn drive(world: &mut World, pursuit: &mut Pursuit, command: Command, log: &mut Vec<Event>) {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);

    while !events.is_empty() {
        log.extend(events.iter().cloned());
        let mut commands = Vec::new();
        pursuit.handle(
            &events,
            &query::adversary_view(world),
            query::player_cell(world),
            &query::grid_view(world),
            &mut commands,
        );

        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
    }
}
