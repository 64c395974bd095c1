use battleship_core::prelude::*;
use battleship_core::{
    Board, CellState, DifficultyConfig, FleetSpec, Orientation, PlacementRule, ShotError,
    CRUISER, DESTROYER,
};

fn c(row: usize, col: usize) -> Coordinate {
    Coordinate::new(row, col)
}

/// 8x8 session: the computer has one Cruiser at (0,0)-(0,2), the player one
/// Destroyer in the far corner.
fn scripted_session() -> GameSession {
    let mut player = Board::new(8, PlacementRule::NoTouching);
    player.place(DESTROYER, c(7, 6), Orientation::Horizontal).unwrap();
    let mut ai = Board::new(8, PlacementRule::NoTouching);
    ai.place_ship(CRUISER, &[c(0, 0), c(0, 1), c(0, 2)]).unwrap();
    let config = GameConfig::new(Difficulty::Veteran)
        .with_board_size(8)
        .with_seed(11);
    GameSession::from_boards(config, player, ai).unwrap()
}

#[test]
fn test_player_sinks_single_cruiser() {
    let mut session = scripted_session();
    assert_eq!(session.status(), GameStatus::Active);

    assert_eq!(submit_player_shot(&mut session, c(0, 0)).unwrap(), ShotOutcome::Hit);
    advance_ai_turn(&mut session).unwrap();
    assert_eq!(submit_player_shot(&mut session, c(0, 1)).unwrap(), ShotOutcome::Hit);
    advance_ai_turn(&mut session).unwrap();
    let last = submit_player_shot(&mut session, c(0, 2)).unwrap();
    assert_eq!(last, ShotOutcome::AllSunk("Cruiser"));
    assert_eq!(last.sunk_ship(), Some("Cruiser"));

    assert!(is_terminal(&session));
    assert_eq!(session.status(), GameStatus::PlayerWon);
    assert_eq!(winner(&session), Some(Side::Player));
    assert_eq!(session.player_moves(), 3);
    assert_eq!(session.ai_moves(), 2);

    assert_eq!(
        submit_player_shot(&mut session, c(5, 5)).unwrap_err(),
        GameError::GameOver(GameStatus::PlayerWon)
    );
    assert_eq!(
        advance_ai_turn(&mut session).unwrap_err(),
        GameError::GameOver(GameStatus::PlayerWon)
    );
}

#[test]
fn test_turn_order_enforced() {
    let mut session = scripted_session();
    assert_eq!(
        advance_ai_turn(&mut session).unwrap_err(),
        GameError::InvalidTurn {
            expected: Side::Player
        }
    );
    submit_player_shot(&mut session, c(4, 4)).unwrap();
    assert_eq!(
        submit_player_shot(&mut session, c(4, 5)).unwrap_err(),
        GameError::InvalidTurn { expected: Side::Ai }
    );
    assert_eq!(session.player_moves(), 1);
}

#[test]
fn test_bad_shots_keep_the_turn() {
    let mut session = scripted_session();
    assert_eq!(
        submit_player_shot(&mut session, c(8, 0)).unwrap_err(),
        GameError::Shot(ShotError::OutOfBounds(c(8, 0)))
    );
    assert_eq!(session.turn(), Side::Player);

    submit_player_shot(&mut session, c(3, 3)).unwrap();
    advance_ai_turn(&mut session).unwrap();
    assert_eq!(
        submit_player_shot(&mut session, c(3, 3)).unwrap_err(),
        GameError::Shot(ShotError::DuplicateShot(c(3, 3)))
    );
    assert_eq!(session.turn(), Side::Player);
    assert_eq!(session.player_moves(), 1);
    assert_eq!(session.ai_board().shots().len(), 1);
}

#[test]
fn test_snapshot_hides_opponent_fleet_until_game_over() {
    let mut session = scripted_session();
    submit_player_shot(&mut session, c(0, 0)).unwrap();
    let (ai_shot, _) = advance_ai_turn(&mut session).unwrap();

    let snap = get_visible_state(&session, Side::Player);
    assert_eq!(snap.perspective, Side::Player);
    assert_eq!(snap.turn, Side::Player);
    assert_eq!(snap.last_ai_shot, Some(ai_shot));
    assert!(!snap.opponent_board.revealed);
    assert_eq!(snap.opponent_board.cells[0][0], CellState::Hit);
    assert_eq!(snap.opponent_board.cells[0][1], CellState::Unknown);
    assert!(snap.opponent_board.ships.is_empty());
    assert!(snap
        .opponent_board
        .cells
        .iter()
        .flatten()
        .all(|&s| s != CellState::Ship));
    assert!(snap.own_board.revealed);
    assert_eq!(snap.own_board.ships.len(), 1);
    assert_ne!(snap.own_board.cells[ai_shot.row][ai_shot.col], CellState::Unknown);

    // the computer's view of the player's board is just as limited
    let ai_snap = get_visible_state(&session, Side::Ai);
    assert!(ai_snap
        .opponent_board
        .cells
        .iter()
        .flatten()
        .all(|&s| s != CellState::Ship));

    submit_player_shot(&mut session, c(0, 1)).unwrap();
    advance_ai_turn(&mut session).unwrap();
    submit_player_shot(&mut session, c(0, 2)).unwrap();
    let done = get_visible_state(&session, Side::Ai);
    assert_eq!(done.status, GameStatus::PlayerWon);
    assert!(done.opponent_board.revealed);
    assert_eq!(done.opponent_board.cells[7][6], CellState::Ship);

    let json = serde_json::to_value(&done).unwrap();
    assert_eq!(json["status"], "PlayerWon");
}

#[test]
fn test_ai_never_repeats_and_heatmap_is_side_effect_free() {
    let mut session = create_session(Difficulty::Veteran, 8, None, Some(21)).unwrap();
    let before = session.ai_heatmap().unwrap();
    assert_eq!(before, session.ai_heatmap().unwrap());

    let mut fired = Vec::new();
    let mut player_cells = session.player_view().unknown_cells().collect::<Vec<_>>().into_iter();
    while !session.is_terminal() {
        submit_player_shot(&mut session, player_cells.next().unwrap()).unwrap();
        if session.is_terminal() {
            break;
        }
        let (coord, _) = advance_ai_turn(&mut session).unwrap();
        assert!(!fired.contains(&coord));
        fired.push(coord);
    }
    assert_eq!(fired.len(), session.ai_moves());
}

#[test]
fn test_rookie_has_no_heatmap() {
    let session = create_session(Difficulty::Rookie, 10, None, Some(1)).unwrap();
    assert!(session.ai_heatmap().is_none());
}

#[test]
fn test_same_seed_same_game() {
    let run = |seed| {
        let mut session = create_session(Difficulty::Admiral, 7, None, Some(seed)).unwrap();
        let mut player_cells = session.player_view().unknown_cells().collect::<Vec<_>>().into_iter();
        let mut ai_shots = Vec::new();
        for _ in 0..15 {
            if session.is_terminal() {
                break;
            }
            submit_player_shot(&mut session, player_cells.next().unwrap()).unwrap();
            if session.is_terminal() {
                break;
            }
            ai_shots.push(advance_ai_turn(&mut session).unwrap());
        }
        let layout: Vec<Vec<Coordinate>> = session
            .player_board()
            .ships()
            .iter()
            .map(|s| s.cells().to_vec())
            .collect();
        (layout, ai_shots)
    };
    assert_eq!(run(77), run(77));
}

#[test]
fn test_create_session_validation() {
    for size in [4, 17] {
        assert!(matches!(
            create_session(Difficulty::Rookie, size, None, Some(1)),
            Err(GameError::InvalidConfig(_))
        ));
    }
    let crowded = FleetSpec::from_lengths(&[5, 5, 5]);
    assert!(matches!(
        create_session(Difficulty::Rookie, 5, Some(crowded), Some(1)),
        Err(GameError::InvalidConfig(_))
    ));
    let too_long = FleetSpec::from_lengths(&[6]);
    assert!(matches!(
        create_session(Difficulty::Rookie, 10, Some(too_long), Some(1)),
        Err(GameError::InvalidConfig(_))
    ));
    assert!(matches!(
        create_session(Difficulty::Rookie, 10, Some(FleetSpec::new(vec![])), Some(1)),
        Err(GameError::InvalidConfig(_))
    ));

    let session = create_session(Difficulty::Legendary, 5, None, Some(1)).unwrap();
    assert_eq!(session.player_board().ships().len(), 2);
    assert_eq!(session.ai_board().ships().len(), 2);
    assert_eq!(session.difficulty(), Difficulty::Legendary);
}

#[test]
fn test_difficulty_parses_case_insensitively() {
    assert_eq!("ADMIRAL".parse::<Difficulty>().unwrap(), Difficulty::Admiral);
    assert_eq!(" rookie ".parse::<Difficulty>().unwrap(), Difficulty::Rookie);
    assert!(matches!(
        "captain".parse::<Difficulty>(),
        Err(GameError::InvalidConfig(_))
    ));
}

#[test]
fn test_with_player_fleet() {
    let config = GameConfig::new(Difficulty::Rookie).with_board_size(6).with_seed(4);
    let layout = vec![
        (CRUISER, vec![c(0, 0), c(0, 1), c(0, 2)]),
        (DESTROYER, vec![c(2, 4), c(3, 4)]),
        (DESTROYER, vec![c(5, 0), c(5, 1)]),
    ];
    let session = GameSession::with_player_fleet(config.clone(), &layout).unwrap();
    assert_eq!(session.player_board().ships().len(), 3);
    assert_eq!(session.player_board().cell(c(3, 4)), CellState::Ship);

    let short = vec![layout[0].clone()];
    assert!(matches!(
        GameSession::with_player_fleet(config.clone(), &short),
        Err(GameError::InvalidConfig(_))
    ));

    // ships may not touch, not even diagonally
    let touching = vec![
        (CRUISER, vec![c(0, 0), c(0, 1), c(0, 2)]),
        (DESTROYER, vec![c(1, 3), c(2, 3)]),
        (DESTROYER, vec![c(5, 0), c(5, 1)]),
    ];
    assert!(matches!(
        GameSession::with_player_fleet(config, &touching),
        Err(GameError::Placement(_))
    ));
}

#[test]
fn test_from_boards_derives_turn() {
    let mut player = Board::new(8, PlacementRule::NoTouching);
    player.place(DESTROYER, c(7, 6), Orientation::Horizontal).unwrap();
    let mut ai = Board::new(8, PlacementRule::NoTouching);
    ai.place(CRUISER, c(0, 0), Orientation::Horizontal).unwrap();
    ai.apply_shot(c(4, 4)).unwrap();
    let config = GameConfig::new(Difficulty::Rookie).with_board_size(8);

    let session = GameSession::from_boards(config.clone(), player.clone(), ai.clone()).unwrap();
    assert_eq!(session.turn(), Side::Ai);
    assert_eq!(session.player_moves(), 1);

    assert!(matches!(
        GameSession::from_boards(config.clone(), Board::new(8, PlacementRule::NoTouching), ai),
        Err(GameError::InvalidConfig(_))
    ));
    let small = Board::new(6, PlacementRule::NoTouching);
    assert!(matches!(
        GameSession::from_boards(config, player, small),
        Err(GameError::InvalidConfig(_))
    ));
}

#[test]
fn test_from_boards_rejects_bad_tuning() {
    let mut player = Board::new(8, PlacementRule::NoTouching);
    player.place(DESTROYER, c(7, 6), Orientation::Horizontal).unwrap();
    let mut ai = Board::new(8, PlacementRule::NoTouching);
    ai.place(CRUISER, c(0, 0), Orientation::Horizontal).unwrap();

    let bad = [
        DifficultyConfig {
            rookie_follow_up: -0.5,
            ..DifficultyConfig::for_difficulty(Difficulty::Rookie)
        },
        DifficultyConfig {
            rookie_follow_up: f64::NAN,
            ..DifficultyConfig::for_difficulty(Difficulty::Rookie)
        },
        DifficultyConfig {
            habit_decay: 0.0,
            ..DifficultyConfig::for_difficulty(Difficulty::Legendary)
        },
    ];
    for tuning in bad {
        let config = GameConfig::new(Difficulty::Rookie)
            .with_board_size(8)
            .with_first_turn(Side::Ai)
            .with_tuning(tuning);
        assert!(matches!(
            GameSession::from_boards(config, player.clone(), ai.clone()),
            Err(GameError::InvalidConfig(_))
        ));
    }

    let oversized = GameConfig::new(Difficulty::Rookie).with_board_size(8);
    let oversized = GameConfig {
        board_size: 17,
        ..oversized
    };
    assert!(matches!(
        GameSession::from_boards(oversized, player.clone(), ai.clone()),
        Err(GameError::InvalidConfig(_))
    ));

    // a valid tuning with the AI to move plays normally
    let config = GameConfig::new(Difficulty::Rookie)
        .with_board_size(8)
        .with_seed(2)
        .with_first_turn(Side::Ai);
    let mut session = GameSession::from_boards(config, player, ai).unwrap();
    advance_ai_turn(&mut session).unwrap();
    assert_eq!(session.turn(), Side::Player);
}

#[test]
fn test_from_boards_rejects_two_destroyed_fleets() {
    let mut player = Board::new(8, PlacementRule::NoTouching);
    player.place(DESTROYER, c(7, 6), Orientation::Horizontal).unwrap();
    player.apply_shot(c(7, 6)).unwrap();
    player.apply_shot(c(7, 7)).unwrap();
    let mut ai = Board::new(8, PlacementRule::NoTouching);
    ai.place(DESTROYER, c(0, 0), Orientation::Horizontal).unwrap();
    let config = GameConfig::new(Difficulty::Rookie).with_board_size(8);

    // one side destroyed restores as a finished game
    let session = GameSession::from_boards(config.clone(), player.clone(), ai.clone()).unwrap();
    assert_eq!(session.status(), GameStatus::AiWon);

    ai.apply_shot(c(0, 0)).unwrap();
    ai.apply_shot(c(0, 1)).unwrap();
    assert!(matches!(
        GameSession::from_boards(config, player, ai),
        Err(GameError::InvalidConfig(_))
    ));
}
