//! Integration tests for puzzle generation
//!
//! - Exactly floor(cells/2) watermarks on distinct in-range cells
//! - Target always drawn from a real watermark

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use snapgrid::core::generate_puzzle;
use snapgrid::types::{Color, Shape};
use snapgrid::SnapgridError;

// =============================================================================
// WATERMARK COVERAGE
// =============================================================================

#[test]
fn test_watermark_count_and_distinct_indices() {
    for rows in 1..=6 {
        for cols in 1..=6 {
            if rows * cols < 2 {
                continue;
            }
            for seed in 0..20 {
                let mut rng = StdRng::seed_from_u64(seed);
                let puzzle = generate_puzzle(rows, cols, &mut rng).unwrap();

                assert_eq!(puzzle.watermarks.len(), rows * cols / 2, "{}x{} seed {}", rows, cols, seed);

                let indices: HashSet<usize> = puzzle.watermarks.iter().map(|w| w.idx).collect();
                assert_eq!(indices.len(), puzzle.watermarks.len(), "duplicate index");
                assert!(indices.iter().all(|&i| i < rows * cols), "index out of range");
            }
        }
    }
}

#[test]
fn test_odd_grid_rounds_down() {
    let mut rng = StdRng::seed_from_u64(5);
    let puzzle = generate_puzzle(3, 3, &mut rng).unwrap();
    assert_eq!(puzzle.watermarks.len(), 4);
}

#[test]
fn test_too_small_grid_is_error() {
    let mut rng = StdRng::seed_from_u64(0);
    let err = generate_puzzle(1, 1, &mut rng).unwrap_err();
    assert!(matches!(err, SnapgridError::GridTooSmall { .. }));
}

// =============================================================================
// TARGET SATISFIABILITY
// =============================================================================

#[test]
fn test_correct_set_never_empty() {
    for seed in 0..500 {
        let mut rng = StdRng::seed_from_u64(seed);
        let puzzle = generate_puzzle(4, 4, &mut rng).unwrap();
        let correct = puzzle.correct_set();
        assert!(!correct.is_empty(), "seed {} produced an unsatisfiable target", seed);
        for idx in &correct {
            let w = puzzle.watermark_at(*idx).unwrap();
            assert_eq!(w.shape, puzzle.target.shape);
            assert_eq!(w.color, puzzle.target.color);
        }
    }
}

#[test]
fn test_target_matches_an_existing_watermark() {
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let puzzle = generate_puzzle(2, 2, &mut rng).unwrap();
        assert!(puzzle.watermarks.iter().any(|w| w.matches(&puzzle.target)));
    }
}

// =============================================================================
// DISTRIBUTION SANITY
// =============================================================================

#[test]
fn test_every_shape_and_color_appears() {
    let mut shapes = HashSet::new();
    let mut colors = HashSet::new();
    let mut cells = HashSet::new();
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let puzzle = generate_puzzle(4, 4, &mut rng).unwrap();
        for w in &puzzle.watermarks {
            shapes.insert(w.shape);
            colors.insert(w.color);
            cells.insert(w.idx);
        }
    }
    assert_eq!(shapes.len(), Shape::ALL.len());
    assert_eq!(colors.len(), Color::ALL.len());
    assert_eq!(cells.len(), 16, "every cell should get a watermark eventually");
}

#[test]
fn test_json_shape() {
    let mut rng = StdRng::seed_from_u64(11);
    let puzzle = generate_puzzle(4, 4, &mut rng).unwrap();
    let json = serde_json::to_value(&puzzle).unwrap();
    assert_eq!(json["rows"], 4);
    assert!(json["watermarks"][0]["shape"].is_string());
    assert!(json["target"]["color"].is_string());

    let back: snapgrid::types::PuzzleData = serde_json::from_value(json).unwrap();
    assert_eq!(back, puzzle);
}
