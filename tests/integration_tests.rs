//! Integration tests for tengen
//!
//! These drive the public API the way a front end would: build positions,
//! play through a session, search, score and round-trip records.

use std::thread;
use std::time::Duration;

use fastrand::Rng;

use tengen::board::{Color, Move, Point};
use tengen::coord::{parse_coord, str_coord};
use tengen::error::{MoveError, SessionError};
use tengen::position::{Position, attempt_place, legal_moves, pass};
use tengen::record::GameRecord;
use tengen::scoring::score;
use tengen::search::{SearchConfig, SearchHandle, SearchOutcome, Searcher};
use tengen::session::{Phase, SetupTool, Session};
use tengen::sgf::{parse_sgf, to_sgf};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Play GTP coordinates in order, alternating colors from Black.
fn setup_position(size: usize, moves: &[&str]) -> Position {
    let mut pos = Position::new(size).unwrap();
    for mv in moves {
        pos = match parse_coord(mv, size).unwrap() {
            Move::Play(pt) => attempt_place(&pos, pt).unwrap(),
            Move::Pass => pass(&pos).unwrap(),
        };
    }
    pos
}

fn assert_every_group_breathes(pos: &Position) {
    let board = pos.board();
    for (pt, _) in board.stones() {
        assert!(
            board.group_liberties(pt) > 0,
            "group at {pt:?} has no liberties\n{pos}"
        );
    }
}

// =============================================================================
// Coordinate parsing and string conversion tests
// =============================================================================

#[test]
fn test_coord_roundtrip_all_sizes() {
    for size in [9, 13, 19] {
        for y in 0..size {
            for x in 0..size {
                let mv = Move::Play((x, y));
                let s = str_coord(mv, size).unwrap();
                assert!(!s.contains('I'), "{s} uses the skipped column");
                assert_eq!(parse_coord(&s, size).unwrap(), mv, "roundtrip failed for {s}");
            }
        }
        assert_eq!(parse_coord("pass", size).unwrap(), Move::Pass);
    }
}

#[test]
fn test_parse_coord_skips_i() {
    // Go coordinates skip 'I' to avoid confusion with 'J'
    let Move::Play((h, _)) = parse_coord("H5", 9).unwrap() else {
        panic!("H5 is a point");
    };
    let Move::Play((j, _)) = parse_coord("J5", 9).unwrap() else {
        panic!("J5 is a point");
    };
    assert_eq!(j - h, 1, "J should be one column after H (skipping I)");
    assert!(parse_coord("I5", 9).is_err());
}

#[test]
fn test_parse_coord_rejects_off_board() {
    assert!(parse_coord("K9", 9).is_err());
    assert!(parse_coord("A10", 9).is_err());
    assert!(parse_coord("A0", 9).is_err());
    assert!(parse_coord("", 9).is_err());
}

// =============================================================================
// Basic position and move tests
// =============================================================================

#[test]
fn test_capture_example() {
    // Black surrounds the white stone at E5 and takes it with E4.
    let pos = setup_position(9, &["D5", "E5", "E6", "A1", "F5", "J9", "E4"]);

    assert_eq!(pos.get((4, 4)), None, "E5 should be captured");
    assert_eq!(pos.captures().get(Color::Black), 1);
    assert_eq!(pos.captures().get(Color::White), 0);
    assert_eq!(pos.turn(), Color::White);
    assert_eq!(pos.last_move(), Some((4, 5)));
}

#[test]
fn test_suicide_example() {
    let pos = Position::from_layout(&[".O...", "O....", ".....", ".....", "....."], Color::Black)
        .unwrap();
    assert_eq!(attempt_place(&pos, (0, 0)), Err(MoveError::Suicide));
    assert!(!legal_moves(&pos).contains(&(0, 0)));

    // White may fill its own eye; that is not suicide.
    let pos = Position::from_layout(&[".O...", "O....", ".....", ".....", "....."], Color::White)
        .unwrap();
    assert!(attempt_place(&pos, (0, 0)).is_ok());
}

#[test]
fn test_random_games_keep_invariants() {
    let mut rng = Rng::with_seed(7);
    for size in [5, 9] {
        for _ in 0..5 {
            let mut pos = Position::new(size).unwrap();
            for _ in 0..size * size * 2 {
                let legal = legal_moves(&pos);
                if legal.is_empty() {
                    break;
                }
                let pt: Point = legal[rng.usize(..legal.len())];
                let mover = pos.turn();
                let before = pos.stone_count();
                let caps_before = pos.captures().get(mover);

                let next = attempt_place(&pos, pt).unwrap();
                let taken = (next.captures().get(mover) - caps_before) as usize;

                assert_eq!(next.stone_count(), before + 1 - taken);
                assert_eq!(next.turn(), mover.opp());
                assert_eq!(next.get(pt), Some(mover));
                assert_every_group_breathes(&next);
                pos = next;
            }
        }
    }
}

#[test]
fn test_rejected_move_leaves_position_alone() {
    let pos = setup_position(9, &["E5"]);
    let before = pos.clone();
    assert_eq!(attempt_place(&pos, (4, 4)), Err(MoveError::Occupied));
    assert_eq!(pos, before);
}

#[test]
fn test_two_passes_end_the_game() {
    let pos = setup_position(9, &["E5", "pass", "pass"]);
    assert!(pos.is_game_over());
    assert!(legal_moves(&pos).is_empty());
    assert_eq!(attempt_place(&pos, (0, 0)), Err(MoveError::GameOver));
    assert_eq!(pass(&pos), Err(MoveError::GameOver));
}

// =============================================================================
// Scoring tests
// =============================================================================

#[test]
fn test_empty_board_is_a_white_tie() {
    let result = score(&Position::new(9).unwrap());
    assert_eq!(result.black.total, 0.0);
    assert_eq!(result.white.total, 0.0);
    assert!(result.is_tie());
    assert_eq!(result.winner, Color::White);
    assert_eq!(result.result_string(), "0");
}

#[test]
fn test_score_is_idempotent() {
    let pos = setup_position(9, &["C3", "G7", "C4", "G6", "D3", "F7"]);
    let first = score(&pos);
    assert_eq!(score(&pos), first);
    let total = first.black.total + first.white.total;
    assert!(total <= 81.0);
}

#[test]
fn test_wall_splits_the_board() {
    // A black wall on column E and a white wall on column F.
    let mut moves = Vec::new();
    for row in 1..=9 {
        moves.push(format!("E{row}"));
        moves.push(format!("F{row}"));
    }
    let refs: Vec<&str> = moves.iter().map(String::as_str).collect();
    let pos = setup_position(9, &refs);
    let result = score(&pos);
    assert_eq!(result.black.total, 45.0);
    assert_eq!(result.white.total, 36.0);
    assert_eq!(result.result_string(), "B+9");
}

// =============================================================================
// Session tests
// =============================================================================

#[test]
fn test_undo_redo_roundtrip() {
    let mut session = Session::new(9).unwrap();
    let start = session.position().clone();
    for mv in ["D5", "E5", "E6", "A1", "F5", "pass", "E4"] {
        session.apply_external_str(mv).unwrap();
    }
    let end = session.position().clone();

    let mut n = 0;
    while session.undo() {
        n += 1;
    }
    assert_eq!(n, 7);
    assert_eq!(session.position(), &start);

    for _ in 0..n {
        assert!(session.redo());
    }
    assert!(!session.redo());
    assert_eq!(session.position(), &end);
}

#[test]
fn test_new_move_clears_redo() {
    let mut session = Session::new(9).unwrap();
    session.apply_external_str("E5").unwrap();
    session.apply_external_str("C3").unwrap();
    assert!(session.undo());
    assert!(session.can_redo());
    session.apply_external_str("G7").unwrap();
    assert!(!session.can_redo());
}

#[test]
fn test_illegal_session_move_is_reported() {
    let mut session = Session::new(9).unwrap();
    session.apply_external_str("E5").unwrap();
    let err = session.apply_external_str("E5").unwrap_err();
    assert_eq!(err, SessionError::Illegal(MoveError::Occupied));
    assert!(matches!(
        session.apply_external_str("Z99"),
        Err(SessionError::Coord(_))
    ));
    assert_eq!(session.position().move_number(), 1);
}

#[test]
fn test_setup_then_play() {
    let mut session = Session::new(9).unwrap();
    session.enter_setup();
    assert_eq!(session.phase(), Phase::Setup);
    session.set_setup_tool(SetupTool::White);
    session.play_move((4, 4)).unwrap();
    session.play_move((4, 4)).unwrap();
    assert!(session.pass().is_err());
    session.exit_setup();

    assert_eq!(session.phase(), Phase::Play);
    assert_eq!(session.position().get((4, 4)), Some(Color::White));
    assert_eq!(session.position().turn(), Color::Black);
    assert!(!session.can_undo());
}

#[test]
fn test_resign_ends_the_game() {
    let mut session = Session::new(9).unwrap();
    session.apply_external_str("E5").unwrap();
    session.resign(Color::White).unwrap();
    assert!(session.is_over());
    let result = session.result().unwrap();
    assert_eq!(result.winner, Color::Black);
    assert_eq!(result.result_string(), "B+R");
    assert!(session.play_move((0, 0)).is_err());
    assert!(session.undo());
    assert!(!session.is_over());
}

// =============================================================================
// Search tests
// =============================================================================

#[test]
fn test_search_is_deterministic() {
    let pos = setup_position(7, &["D4", "C3", "E5"]);
    let config = SearchConfig {
        simulations: 8,
        seed: 42,
    };
    let a = Searcher::new(config).select_move(&pos);
    let b = Searcher::new(config).select_move(&pos);
    assert_eq!(a, b);
    let SearchOutcome::Move(pt) = a else {
        panic!("expected a move, got {a:?}");
    };
    assert!(legal_moves(&pos).contains(&pt));
    assert_eq!(pos, setup_position(7, &["D4", "C3", "E5"]));
}

#[test]
fn test_search_passes_without_legal_moves() {
    let pos = setup_position(9, &["pass", "pass"]);
    assert_eq!(
        Searcher::new(SearchConfig::default()).select_move(&pos),
        SearchOutcome::Pass
    );
}

#[test]
fn test_cancelled_search_reports_cancelled() {
    let config = SearchConfig {
        simulations: 100_000,
        seed: 1,
    };
    let handle = SearchHandle::spawn(Position::new(19).unwrap(), config);
    thread::sleep(Duration::from_millis(50));
    assert!(!handle.is_finished(), "search should still be running");
    handle.cancel();
    assert_eq!(handle.join(), SearchOutcome::Cancelled);
}

// =============================================================================
// Record tests
// =============================================================================

#[test]
fn test_selfplay_record_roundtrips_through_sgf() {
    let mut session = Session::new(5).unwrap();
    let searcher = Searcher::new(SearchConfig {
        simulations: 2,
        seed: 9,
    });
    for _ in 0..12 {
        if session.is_over() {
            break;
        }
        match searcher.select_move(session.position()) {
            SearchOutcome::Move(pt) => session.play_move(pt).unwrap(),
            SearchOutcome::Pass => session.pass().unwrap(),
            SearchOutcome::Cancelled => unreachable!(),
        }
    }

    let record = session.to_record();
    let from_sgf = parse_sgf(&to_sgf(&record).unwrap()).unwrap();
    assert_eq!(from_sgf, record);

    let mut loaded = Session::default();
    loaded.load_record(&from_sgf).unwrap();
    assert_eq!(loaded.position(), session.position());

    let from_json = GameRecord::from_json(&record.to_json().unwrap()).unwrap();
    assert_eq!(from_json, record);
}
