use battleship_core::prelude::*;
use battleship_core::DifficultyConfig;

fn light_tuning(difficulty: Difficulty) -> DifficultyConfig {
    DifficultyConfig {
        admiral_samples: 200,
        admiral_max_attempts: 10_000,
        admiral_min_samples: 20,
        ..DifficultyConfig::for_difficulty(difficulty)
    }
}

/// Player fires row-major; returns the finished session.
fn play_out(config: GameConfig) -> GameSession {
    let size = config.board_size;
    let mut session = GameSession::new(config).unwrap();
    let mut turns = 0;
    while !is_terminal(&session) {
        turns += 1;
        assert!(turns <= 2 * size * size, "game took too many turns");
        match session.turn() {
            Side::Player => {
                let target = session.player_view().unknown_cells().next().unwrap();
                submit_player_shot(&mut session, target).unwrap();
            }
            Side::Ai => {
                advance_ai_turn(&mut session).unwrap();
            }
        }
    }
    session
}

#[test]
fn test_every_tier_finishes_a_game() {
    for (i, difficulty) in Difficulty::ALL.into_iter().enumerate() {
        let config = GameConfig::new(difficulty)
            .with_board_size(8)
            .with_seed(100 + i as u64)
            .with_tuning(light_tuning(difficulty));
        let session = play_out(config);

        let winner = winner(&session).expect("finished game has a winner");
        let (loser_board, moves) = match winner {
            Side::Player => (session.ai_board(), session.player_moves()),
            Side::Ai => (session.player_board(), session.ai_moves()),
        };
        assert!(loser_board.all_sunk(), "{difficulty}: loser still has ships");
        assert_eq!(loser_board.shots().len(), moves);
        // player moves first
        match winner {
            Side::Player => assert_eq!(session.player_moves(), session.ai_moves() + 1),
            Side::Ai => assert_eq!(session.player_moves(), session.ai_moves()),
        }
        assert_eq!(
            session.status(),
            match winner {
                Side::Player => GameStatus::PlayerWon,
                Side::Ai => GameStatus::AiWon,
            }
        );
    }
}

#[test]
fn test_admiral_default_tuning_small_board() {
    let session = play_out(GameConfig::new(Difficulty::Admiral).with_board_size(6).with_seed(5));
    assert!(session.is_terminal());
    assert!(session.ai_moves() <= 36);
}

#[test]
fn test_ai_first_turn() {
    let config = GameConfig::new(Difficulty::Veteran)
        .with_board_size(7)
        .with_seed(3)
        .with_first_turn(Side::Ai);
    let mut session = GameSession::new(config).unwrap();
    assert_eq!(session.turn(), Side::Ai);
    assert!(matches!(
        session.submit_player_shot(Coordinate::new(0, 0)),
        Err(GameError::InvalidTurn { expected: Side::Ai })
    ));
    let (coord, _) = session.advance_ai_turn().unwrap();
    assert_eq!(session.last_ai_shot(), Some(coord));
    assert_eq!(session.turn(), Side::Player);
}
