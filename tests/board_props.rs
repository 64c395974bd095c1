use battleship_core::{
    Board, CellState, Coordinate, FleetSpec, PlacementRule, ShotError, ShotOutcome,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn random_board(seed: u64, size: usize) -> (Board, SmallRng) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = Board::new(size, PlacementRule::NoTouching);
    board
        .auto_place_fleet(&FleetSpec::standard_for(size), &mut rng)
        .unwrap();
    let shots = rng.random_range(0..size * size / 2);
    for _ in 0..shots {
        let r = rng.random_range(0..size);
        let c = rng.random_range(0..size);
        let _ = board.apply_shot(Coordinate::new(r, c));
    }
    (board, rng)
}

fn grid_of(board: &Board) -> Vec<CellState> {
    let n = board.size();
    (0..n * n)
        .map(|i| board.cell(Coordinate::new(i / n, i % n)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn duplicate_shot_is_rejected(seed in any::<u64>(), row in 0..10usize, col in 0..10usize) {
        let (mut board, _) = random_board(seed, 10);
        let coord = Coordinate::new(row, col);
        let _ = board.apply_shot(coord);
        let before = grid_of(&board);
        let log_len = board.shots().len();
        prop_assert_eq!(board.apply_shot(coord).unwrap_err(), ShotError::DuplicateShot(coord));
        prop_assert_eq!(grid_of(&board), before);
        prop_assert_eq!(board.shots().len(), log_len);
    }

    #[test]
    fn hits_equal_fleet_cells_when_all_sunk(seed in any::<u64>(), size in 6..=12usize) {
        let (mut board, mut rng) = random_board(seed, size);
        let fleet_cells: usize = board.ships().iter().map(|s| s.cells().len()).sum();
        let mut unknown: Vec<Coordinate> = board.visible_view().unknown_cells().collect();
        while !board.all_sunk() {
            let i = rng.random_range(0..unknown.len());
            let coord = unknown.swap_remove(i);
            let outcome = board.apply_shot(coord).unwrap();
            let hits = board.stats().hits;
            if board.all_sunk() {
                prop_assert!(matches!(outcome, ShotOutcome::AllSunk(_)));
                prop_assert_eq!(hits, fleet_cells);
            } else {
                prop_assert!(!matches!(outcome, ShotOutcome::AllSunk(_)));
            }
        }
    }

    #[test]
    fn visible_view_never_reports_ship(seed in any::<u64>()) {
        let (board, _) = random_board(seed, 10);
        let view = board.visible_view();
        for r in 0..10 {
            for c in 0..10 {
                let coord = Coordinate::new(r, c);
                let seen = view.cell(coord);
                prop_assert_ne!(seen, CellState::Ship);
                match board.cell(coord) {
                    CellState::Ship | CellState::Unknown => prop_assert_eq!(seen, CellState::Unknown),
                    other => prop_assert_eq!(seen, other),
                }
            }
        }
    }
}
