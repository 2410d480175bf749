//! Plain-text frame rendering.

use std::fmt::Write as _;

use maze_pursuit_core::{AdversaryView, BehaviorMode, CellCoord};
use maze_pursuit_world::{layout, query, RunStatus, World};

const PLAYER_GLYPH: char = '@';

/// Glyph drawn for an adversary following the provided mode.
pub(crate) const fn adversary_glyph(mode: BehaviorMode) -> char {
    match mode {
        BehaviorMode::Patrol => 'A',
        BehaviorMode::Chase => 'C',
        BehaviorMode::RunAway => 'r',
        BehaviorMode::InvestigateSound => '?',
    }
}

pub(crate) const fn status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Running => "running",
        RunStatus::Won => "won",
        RunStatus::Lost => "lost",
    }
}

/// Renders the maze with the player and adversaries drawn on top, followed by
/// a status line. Adversaries that last saw the player are listed after
/// `seen by`.
pub(crate) fn frame(world: &World) -> String {
    let maze = query::maze(world);
    let player = query::player_cell(world);
    let adversaries = query::adversary_view(world);
    let text = layout::to_text(maze);

    let mut frame = String::with_capacity(text.len() + 64);
    for (row, line) in text.lines().enumerate() {
        for (column, glyph) in line.chars().enumerate() {
            let cell = CellCoord::new(
                i32::try_from(row).unwrap_or(i32::MAX),
                i32::try_from(column).unwrap_or(i32::MAX),
            );
            frame.push(overlay(cell, player, &adversaries).unwrap_or(glyph));
        }
        frame.push('\n');
    }

    let effect = if query::is_special_effect_active(world) {
        " effect"
    } else {
        ""
    };
    let _ = write!(
        frame,
        "tick {} score {} {}{}",
        query::tick_index(world),
        query::score(world),
        status_label(query::status(world)),
        effect
    );
    let mut watchers = adversaries.iter().filter(|adversary| adversary.player_visible);
    if let Some(first) = watchers.next() {
        let _ = write!(frame, " seen by {}", first.id.get());
        for adversary in watchers {
            let _ = write!(frame, ",{}", adversary.id.get());
        }
    }
    frame.push('\n');
    frame
}

fn overlay(
    cell: CellCoord,
    player: Option<CellCoord>,
    adversaries: &AdversaryView,
) -> Option<char> {
    if let Some(adversary) = adversaries.iter().find(|adversary| adversary.cell == cell) {
        return Some(adversary_glyph(adversary.mode));
    }
    (player == Some(cell)).then_some(PLAYER_GLYPH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_pursuit_core::{AdversaryId, Command, MovementIntent};
    use maze_pursuit_world as world;

    #[test]
    fn frame_draws_entities_over_the_maze() {
        let mut world = World::new();
        let mut events = Vec::new();
        let maze = layout::parse("WWWWW\nW.. W\nWWWWW").expect("layout parses");
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
            Command::SpawnAdversary {
                cell: CellCoord::new(1, 3),
            },
            &mut events,
        );

        assert_eq!(
            frame(&world),
            "WWWWW\nW@.AW\nWWWWW\ntick 0 score 0 running\n"
        );
    }

    #[test]
    fn status_line_lists_adversaries_that_see_the_player() {
        let mut world = World::new();
        let mut events = Vec::new();
        let maze = layout::parse("WWWWWW\nW   .W\nW W WW\nWWWWWW").expect("layout parses");
        world::apply(&mut world, Command::ConfigureMaze { maze }, &mut events);
        world::apply(
            &mut world,
            Command::PlacePlayer {
                cell: CellCoord::new(1, 1),
            },
            &mut events,
        );
        for cell in [CellCoord::new(1, 3), CellCoord::new(2, 3), CellCoord::new(1, 2)] {
            world::apply(&mut world, Command::SpawnAdversary { cell }, &mut events);
        }
        for (id, player_visible) in [(0, true), (1, false), (2, true)] {
            world::apply(
                &mut world,
                Command::SteerAdversary {
                    adversary: AdversaryId::new(id),
                    mode: BehaviorMode::Chase,
                    intent: MovementIntent::Stay,
                    player_visible,
                },
                &mut events,
            );
        }

        let frame = frame(&world);
        assert!(frame.ends_with("tick 0 score 0 running seen by 0,2\n"));
        assert!(frame.starts_with("WWWWWW\nW@CC.W\nW WCWW\n"));
    }
}
