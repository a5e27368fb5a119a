//! Integration tests for the game machine on a virtual clock

use std::time::Duration;

use jafris::core::scoring::level_for_lines;
use jafris::core::{
    gravity_interval, line_clear_points, GameConfig, GameMachine, ManualScheduler, ScoreState,
    ShapeSource,
};
use jafris::types::{Command, Direction, GameEvent, Phase, ShapeKind, TimerKind};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn game_with(config: GameConfig, sequence: &[ShapeKind]) -> GameMachine<ManualScheduler> {
    GameMachine::with_source(
        ManualScheduler::new(),
        config,
        ShapeSource::scripted(sequence.to_vec()),
    )
}

fn game(sequence: &[ShapeKind]) -> GameMachine<ManualScheduler> {
    game_with(GameConfig::default(), sequence)
}

/// Press and release a direction without letting any time pass.
fn tap(m: &mut GameMachine<ManualScheduler>, dir: Direction, times: usize) {
    let (press, release) = match dir {
        Direction::Left => (Command::MoveLeft, Command::ReleaseLeft),
        Direction::Right => (Command::MoveRight, Command::ReleaseRight),
    };
    for _ in 0..times {
        m.apply(press);
        m.apply(release);
    }
}

fn x(m: &GameMachine<ManualScheduler>) -> i8 {
    m.current().unwrap().x
}

fn y(m: &GameMachine<ManualScheduler>) -> i8 {
    m.current().unwrap().y
}

#[test]
fn test_game_lifecycle() {
    let mut m = game(&[ShapeKind::T, ShapeKind::O]);
    assert_eq!(m.phase(), Phase::Initial);
    assert!(m.current().is_none());
    assert_eq!(m.scheduler().live_count(), 0);

    assert!(m.apply(Command::Start));
    assert_eq!(m.phase(), Phase::Playing);
    assert_eq!(m.current().unwrap().kind, ShapeKind::T);
    assert_eq!(m.next(), Some(ShapeKind::O));
    assert_eq!(m.scheduler().live_count_of(TimerKind::Gravity), 1);
    assert_eq!(m.drain_events(), vec![GameEvent::Started]);

    // Start is ignored while a game is running.
    assert!(!m.apply(Command::Start));
}

#[test]
fn test_gravity_moves_one_row_per_interval() {
    let mut m = game(&[ShapeKind::I]);
    m.apply(Command::Start);

    m.advance(ms(799));
    assert_eq!(y(&m), 0);
    m.advance(ms(1));
    assert_eq!(y(&m), 1);
    m.advance(ms(1600));
    assert_eq!(y(&m), 3);
    assert_eq!(m.score(), 0);
}

#[test]
fn test_hard_drop_from_top_scores_38() {
    let mut m = game(&[ShapeKind::I, ShapeKind::O]);
    m.apply(Command::Start);
    m.drain_events();

    assert!(m.apply(Command::HardDrop));
    assert_eq!(m.score(), 38);
    assert_eq!(m.board().filled_count(), 4);
    for col in 4..8 {
        assert!(m.board().is_occupied(col, 19));
    }
    assert_eq!(m.current().unwrap().kind, ShapeKind::O);
    assert_eq!(m.drain_events(), vec![GameEvent::Locked]);
}

#[test]
fn test_line_clear_through_play() {
    let mut m = game(&[ShapeKind::I, ShapeKind::I, ShapeKind::O]);
    m.apply(Command::Start);

    tap(&mut m, Direction::Left, 4);
    assert_eq!(x(&m), 0);
    m.apply(Command::HardDrop);

    m.apply(Command::HardDrop);

    tap(&mut m, Direction::Right, 4);
    assert_eq!(x(&m), 8);
    m.apply(Command::HardDrop);

    // 38 + 38 + 36 for the drops, 40 for a single at level 1.
    assert_eq!(m.score(), 152);
    assert_eq!(m.lines(), 1);
    assert_eq!(m.level(), 1);

    // The top half of the O is all that is left, now on the floor.
    assert_eq!(m.board().filled_count(), 2);
    assert!(m.board().is_occupied(8, 19));
    assert!(m.board().is_occupied(9, 19));

    let events = m.drain_events();
    assert!(events.contains(&GameEvent::LinesCleared {
        count: 1,
        points: 40
    }));
}

/// Move the current piece to column `target` (optionally turned upright) and drop it.
fn drop_at(m: &mut GameMachine<ManualScheduler>, target: i8, upright: bool) {
    if upright {
        assert!(m.apply(Command::Rotate));
    }
    let dx = target - x(m);
    let dir = if dx < 0 { Direction::Left } else { Direction::Right };
    tap(m, dir, dx.unsigned_abs() as usize);
    assert_eq!(x(m), target);
    assert!(m.apply(Command::HardDrop));
}

#[test]
fn test_double_clear_through_play() {
    let mut m = game(&[ShapeKind::O]);
    m.apply(Command::Start);

    for col in [0, 2, 4, 6] {
        drop_at(&mut m, col, false);
    }
    assert_eq!(m.lines(), 0);
    m.drain_events();

    // The fifth O completes both bottom rows at once.
    drop_at(&mut m, 8, false);
    assert_eq!(m.lines(), 2);
    assert_eq!(m.score(), 5 * 36 + 100);
    assert_eq!(m.board().filled_count(), 0);
    assert_eq!(
        m.drain_events(),
        vec![
            GameEvent::Locked,
            GameEvent::LinesCleared {
                count: 2,
                points: 100
            },
        ]
    );
}

#[test]
fn test_four_line_clear_through_play() {
    let mut seq = vec![ShapeKind::O; 8];
    seq.extend([ShapeKind::I, ShapeKind::I]);
    let mut m = game(&seq);
    m.apply(Command::Start);

    // Two layers of Os fill columns 0..8 on the bottom four rows.
    for col in [0, 2, 4, 6, 0, 2, 4, 6] {
        drop_at(&mut m, col, false);
    }
    drop_at(&mut m, 8, true);
    assert_eq!(m.lines(), 0);
    m.drain_events();

    drop_at(&mut m, 9, true);
    assert_eq!(m.lines(), 4);
    // 4 * 36 + 4 * 32 for the Os, 2 * 32 for the upright Is.
    assert_eq!(m.score(), 144 + 128 + 64 + 1200);
    assert_eq!(m.board().filled_count(), 0);
    assert!(m.drain_events().contains(&GameEvent::LinesCleared {
        count: 4,
        points: 1200
    }));
}

#[test]
fn test_blocked_spawn_ends_game() {
    let mut m = game(&[ShapeKind::O]);
    m.apply(Command::Start);

    // Ten Os stack to the ceiling in columns 4 and 5.
    for _ in 0..10 {
        assert_eq!(m.phase(), Phase::Playing);
        m.apply(Command::HardDrop);
    }

    assert_eq!(m.phase(), Phase::GameOver);
    assert_eq!(m.scheduler().live_count(), 0);
    // 2 * (18 + 16 + ... + 2 + 0)
    assert_eq!(m.score(), 180);
    assert_eq!(m.drain_events().last(), Some(&GameEvent::GameOver { score: 180 }));

    // Nothing moves after the game is over.
    assert_eq!(m.advance(ms(10_000)), 0);
    assert!(!m.apply(Command::HardDrop));
    assert!(!m.apply(Command::MoveLeft));

    assert!(m.apply(Command::Start));
    assert_eq!(m.phase(), Phase::Playing);
    assert_eq!(m.score(), 0);
    assert_eq!(m.board().filled_count(), 0);
}

#[test]
fn test_moves_stop_at_walls() {
    let mut m = game(&[ShapeKind::O]);
    m.apply(Command::Start);
    assert_eq!(x(&m), 4);

    tap(&mut m, Direction::Left, 2);
    assert_eq!(x(&m), 2);
    tap(&mut m, Direction::Left, 5);
    assert_eq!(x(&m), 0);

    tap(&mut m, Direction::Right, 20);
    assert_eq!(x(&m), 8);
}

#[test]
fn test_held_direction_auto_repeats_until_released() {
    let mut m = game(&[ShapeKind::O]);
    m.apply(Command::Start);

    assert!(m.apply(Command::MoveRight));
    assert_eq!(x(&m), 5);
    assert_eq!(m.held_direction(), Some(Direction::Right));

    m.advance(ms(150));
    assert_eq!(x(&m), 6);
    m.advance(ms(450));
    assert_eq!(x(&m), 8);

    assert!(m.apply(Command::ReleaseRight));
    assert_eq!(m.scheduler().live_count_of(TimerKind::HorizontalRepeat), 0);
    assert!(!m.apply(Command::ReleaseRight));
}

#[test]
fn test_release_of_other_direction_is_ignored() {
    let mut m = game(&[ShapeKind::O]);
    m.apply(Command::Start);

    m.apply(Command::MoveLeft);
    assert!(!m.apply(Command::ReleaseRight));
    assert_eq!(m.held_direction(), Some(Direction::Left));

    // Pressing the other way takes over the repeat timer.
    m.apply(Command::MoveRight);
    assert_eq!(m.held_direction(), Some(Direction::Right));
    assert_eq!(m.scheduler().live_count_of(TimerKind::HorizontalRepeat), 1);
}

#[test]
fn test_rotation_is_rejected_against_wall() {
    let mut m = game(&[ShapeKind::I]);
    m.apply(Command::Start);
    m.drain_events();

    assert!(m.apply(Command::Rotate));
    assert_eq!(m.current().unwrap().shape.width(), 1);
    assert_eq!(m.drain_events(), vec![GameEvent::Rotated]);

    tap(&mut m, Direction::Right, 10);
    assert_eq!(x(&m), 9);

    // Horizontal again would poke out past the right wall.
    assert!(!m.apply(Command::Rotate));
    assert_eq!(m.current().unwrap().shape.width(), 1);
    assert!(m.drain_events().is_empty());
}

#[test]
fn test_soft_drop_speeds_gravity_and_scores_movement() {
    let mut m = game(&[ShapeKind::I]);
    m.apply(Command::Start);

    assert!(m.apply(Command::SoftDropStart));
    assert!(m.soft_drop());
    assert_eq!(m.timers().interval(TimerKind::Gravity), Some(ms(80)));
    assert_eq!(m.scheduler().live_count_of(TimerKind::Gravity), 1);

    // 19 moving ticks, then one that locks without scoring.
    m.advance(ms(80 * 19));
    assert_eq!(y(&m), 19);
    assert_eq!(m.score(), 19);
    m.advance(ms(80));
    assert_eq!(m.score(), 19);
    assert_eq!(m.board().filled_count(), 4);
    assert_eq!(y(&m), 0);

    assert!(m.apply(Command::SoftDropEnd));
    assert_eq!(m.timers().interval(TimerKind::Gravity), Some(ms(800)));
}

#[test]
fn test_rearmed_timer_drops_stale_fires() {
    let mut m = game(&[ShapeKind::T]);
    m.apply(Command::Start);

    let (old, _) = m.timers().get(TimerKind::Gravity).unwrap();
    m.apply(Command::SoftDropStart);
    let (new, _) = m.timers().get(TimerKind::Gravity).unwrap();
    assert_ne!(old, new);

    assert!(!m.on_timer(old));
    assert_eq!(y(&m), 0);
    assert!(m.on_timer(new));
    assert_eq!(y(&m), 1);
}

#[test]
fn test_pause_suspends_timers_and_input() {
    let mut m = game(&[ShapeKind::T]);
    m.apply(Command::Start);
    m.apply(Command::SoftDropStart);
    m.apply(Command::MoveLeft);

    assert!(m.apply(Command::TogglePause));
    assert_eq!(m.phase(), Phase::Paused);
    assert_eq!(m.scheduler().live_count(), 0);
    assert!(!m.soft_drop());
    assert_eq!(m.held_direction(), Some(Direction::Left));

    let before = m.current();
    assert_eq!(m.advance(ms(5_000)), 0);
    assert!(!m.apply(Command::Rotate));
    assert!(!m.apply(Command::HardDrop));
    assert_eq!(m.current(), before);

    assert!(m.apply(Command::TogglePause));
    assert_eq!(m.phase(), Phase::Playing);
    assert_eq!(m.timers().interval(TimerKind::Gravity), Some(ms(800)));
    assert_eq!(m.scheduler().live_count_of(TimerKind::HorizontalRepeat), 1);

    m.advance(ms(150));
    assert_eq!(x(&m), 2);

    let events = m.drain_events();
    assert!(events.contains(&GameEvent::Paused));
    assert!(events.contains(&GameEvent::Resumed));
}

#[test]
fn test_release_while_paused_keeps_repeat_off_on_resume() {
    let mut m = game(&[ShapeKind::T]);
    m.apply(Command::Start);
    m.apply(Command::MoveRight);
    m.apply(Command::Pause);

    assert!(m.apply(Command::ReleaseRight));
    assert_eq!(m.scheduler().live_count(), 0);

    m.apply(Command::Resume);
    assert_eq!(m.scheduler().live_count_of(TimerKind::HorizontalRepeat), 0);
    assert_eq!(m.scheduler().live_count_of(TimerKind::Gravity), 1);
}

#[test]
fn test_quit_confirmation_flow() {
    let mut m = game(&[ShapeKind::T]);
    m.apply(Command::Start);
    m.apply(Command::HardDrop);
    m.drain_events();

    assert!(m.apply(Command::RequestQuit));
    assert!(m.quit_pending());
    assert_eq!(m.phase(), Phase::Playing);
    assert_eq!(m.scheduler().live_count(), 0);
    assert!(!m.apply(Command::HardDrop));
    assert!(!m.apply(Command::Pause));

    assert!(m.apply(Command::CancelQuit));
    assert!(!m.quit_pending());
    assert_eq!(m.scheduler().live_count_of(TimerKind::Gravity), 1);

    m.apply(Command::RequestQuit);
    assert!(m.apply(Command::ConfirmQuit));
    assert_eq!(m.phase(), Phase::Initial);
    assert!(m.current().is_none());
    assert_eq!(m.score(), 0);
    assert_eq!(m.board().filled_count(), 0);
    assert_eq!(
        m.drain_events(),
        vec![
            GameEvent::QuitRequested,
            GameEvent::QuitCancelled,
            GameEvent::QuitRequested,
            GameEvent::Reset,
        ]
    );
}

#[test]
fn test_quit_without_confirmation_is_immediate() {
    let config = GameConfig::default().with_confirm_quit(false);
    let mut m = game_with(config, &[ShapeKind::T]);
    m.apply(Command::Start);

    assert!(m.apply(Command::RequestQuit));
    assert!(!m.quit_pending());
    assert_eq!(m.phase(), Phase::Initial);
    assert_eq!(m.scheduler().live_count(), 0);
}

#[test]
fn test_restart_deals_fresh_shapes() {
    let mut m = game(&[ShapeKind::T, ShapeKind::O, ShapeKind::L, ShapeKind::J]);
    m.apply(Command::Start);
    m.apply(Command::HardDrop);
    assert_eq!(m.current().unwrap().kind, ShapeKind::O);
    assert_eq!(m.next(), Some(ShapeKind::L));

    assert!(m.apply(Command::Restart));
    assert_eq!(m.current().unwrap().kind, ShapeKind::J);
    assert_eq!(m.next(), Some(ShapeKind::T));
    assert_eq!(m.score(), 0);
    assert_eq!(m.scheduler().live_count_of(TimerKind::Gravity), 1);
}

#[test]
fn test_new_games_do_not_repeat_random_sequence() {
    let mut m = GameMachine::manual(GameConfig::default().with_seed(11));
    let mut openings = Vec::new();
    for round in 0..8 {
        if round % 2 == 0 {
            m.apply(Command::Start);
        } else {
            m.apply(Command::Restart);
        }
        openings.push((m.current().unwrap().kind, m.next()));
        if round % 2 == 1 {
            m.apply(Command::Quit);
        }
    }
    assert!(openings.iter().any(|o| *o != openings[0]), "{:?}", openings);
}

#[test]
fn test_snapshot_reflects_machine() {
    let mut m = game(&[ShapeKind::I, ShapeKind::J]);
    let idle = m.snapshot();
    assert_eq!(idle.phase, Phase::Initial);
    assert_eq!(idle.ghost_y, None);

    m.apply(Command::Start);
    m.apply(Command::MoveLeft);
    let snap = m.snapshot();
    assert_eq!(snap.phase, Phase::Playing);
    assert_eq!(snap.current, m.current());
    assert_eq!(snap.ghost_y, Some(19));
    assert_eq!(snap.next, Some(ShapeKind::J));
    assert_eq!(snap.held, Some(Direction::Left));
    assert_eq!(snap.gravity_interval, ms(800));
    assert!(snap.playable());

    let mut no_ghost = game_with(GameConfig::default().with_ghost_piece(false), &[ShapeKind::I]);
    no_ghost.apply(Command::Start);
    assert_eq!(no_ghost.snapshot().ghost_y, None);
}

#[test]
fn test_random_games_repeat_for_a_seed() {
    let config = GameConfig::default().with_seed(7);
    let mut a = GameMachine::manual(config.clone());
    let mut b = GameMachine::manual(config);
    a.apply(Command::Start);
    b.apply(Command::Start);

    for _ in 0..5 {
        assert_eq!(a.current().map(|p| p.kind), b.current().map(|p| p.kind));
        assert_eq!(a.next(), b.next());
        a.apply(Command::HardDrop);
        b.apply(Command::HardDrop);
    }
}

#[test]
fn test_line_clear_points_table() {
    let base = [40, 100, 300, 1200];
    for (rows, points) in (1..=4).zip(base) {
        assert_eq!(line_clear_points(rows, 1), points);
        assert_eq!(line_clear_points(rows, 3), points * 3);
    }
}

#[test]
fn test_level_thresholds() {
    assert_eq!(level_for_lines(9), 1);
    assert_eq!(level_for_lines(10), 2);
    assert_eq!(level_for_lines(19), 2);
    assert_eq!(level_for_lines(20), 3);

    let mut score = ScoreState::new();
    for _ in 0..9 {
        assert_eq!(score.add_line_clear(1).new_level, None);
    }
    assert_eq!(score.add_line_clear(1).new_level, Some(2));
    assert_eq!(score.level(), 2);

    // Points use the level in force before the clear.
    let award = score.add_line_clear(4);
    assert_eq!(award.points, 1200 * 2);
    assert!(gravity_interval(2) < gravity_interval(1));
}
