use battleship_core::{Coordinate, Orientation, PlacementError, Ship, ShipClass};

fn c(row: usize, col: usize) -> Coordinate {
    Coordinate::new(row, col)
}

#[test]
fn test_new_and_mask() -> Result<(), PlacementError> {
    let class = ShipClass::new("Test", 3);
    let ship = Ship::new(class, c(2, 1), Orientation::Horizontal, 5)?;
    assert_eq!(ship.cells(), &[c(2, 1), c(2, 2), c(2, 3)]);
    for col in 1..4 {
        assert!(ship.mask().is_set(c(2, col)));
    }
    assert_eq!(ship.mask().count_ones(), 3);
    Ok(())
}

#[test]
fn test_out_of_bounds() {
    let class = ShipClass::new("Test", 4);
    let err = Ship::new(class, c(2, 0), Orientation::Vertical, 5).unwrap_err();
    assert_eq!(err, PlacementError::OutOfBounds(c(2, 0)));
}

#[test]
fn test_from_cells_any_order() -> Result<(), PlacementError> {
    let class = ShipClass::new("Test", 4);
    let ship = Ship::from_cells(class, &[c(3, 0), c(1, 0), c(0, 0), c(2, 0)], 5)?;
    assert_eq!(ship.orientation(), Orientation::Vertical);
    assert_eq!(ship.cells(), &[c(0, 0), c(1, 0), c(2, 0), c(3, 0)]);
    assert!(ship.contains(c(3, 0)));
    assert!(!ship.contains(c(4, 0)));
    Ok(())
}

#[test]
fn test_from_cells_rejects_bad_shapes() {
    let class = ShipClass::new("Test", 3);
    assert_eq!(
        Ship::from_cells(class, &[c(0, 0), c(0, 1), c(0, 3)], 5).unwrap_err(),
        PlacementError::NotContiguous
    );
    assert_eq!(
        Ship::from_cells(class, &[c(0, 0), c(0, 1), c(1, 1)], 5).unwrap_err(),
        PlacementError::NotContiguous
    );
    assert_eq!(
        Ship::from_cells(class, &[c(0, 0), c(0, 1)], 5).unwrap_err(),
        PlacementError::WrongLength {
            name: "Test",
            expected: 3,
            found: 2
        }
    );
}

#[test]
fn test_register_hit_and_sunk() -> Result<(), PlacementError> {
    let class = ShipClass::new("Test", 2);
    let mut ship = Ship::new(class, c(1, 1), Orientation::Horizontal, 4)?;
    assert!(!ship.is_sunk());
    assert!(ship.register_hit(c(1, 1)));
    assert!(!ship.is_sunk());
    assert!(ship.register_hit(c(1, 2)));
    assert!(ship.is_sunk());
    // miss
    assert!(!ship.register_hit(c(0, 0)));
    Ok(())
}
