//! Puzzle generator: random watermark placement with a satisfiable target
//!
//! Half the cells (rounded down) get a watermark. The target is copied from
//! one of the generated watermarks, so at least one cell always matches.

use rand::Rng;
use tracing::debug;

use crate::types::{CellIndex, Color, PuzzleData, Shape, Target, Watermark};
use crate::{Result, SnapgridError};

/// Puzzle generator
#[derive(Debug, Clone, Copy, Default)]
pub struct PuzzleGenerator;

impl PuzzleGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a puzzle for a `rows x cols` grid using the supplied RNG
    pub fn generate<R: Rng>(&self, rows: usize, cols: usize, rng: &mut R) -> Result<PuzzleData> {
        let total = match rows.checked_mul(cols) {
            Some(total) if total >= 2 => total,
            _ => return Err(SnapgridError::GridTooSmall { rows, cols }),
        };

        let mut cells: Vec<CellIndex> = (0..total).collect();
        fisher_yates(&mut cells, rng);

        let watermarks: Vec<Watermark> = cells[..total / 2]
            .iter()
            .map(|&idx| Watermark {
                idx,
                shape: Shape::ALL[rng.gen_range(0..Shape::ALL.len())],
                color: Color::ALL[rng.gen_range(0..Color::ALL.len())],
            })
            .collect();

        let pick = &watermarks[rng.gen_range(0..watermarks.len())];
        let target = Target {
            shape: pick.shape,
            color: pick.color,
        };

        let puzzle = PuzzleData::new(rows, cols, watermarks, target);
        debug!(
            rows,
            cols,
            watermarks = puzzle.watermarks.len(),
            correct = puzzle.correct_set().len(),
            target = %target,
            "generated puzzle"
        );
        Ok(puzzle)
    }
}

/// In-place uniform shuffle: for i from last down to 1, swap with j in [0, i]
fn fisher_yates<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_default_grid_has_eight_watermarks() {
        let mut rng = StdRng::seed_from_u64(1);
        let puzzle = PuzzleGenerator::new().generate(4, 4, &mut rng).unwrap();
        assert_eq!(puzzle.watermarks.len(), 8);
    }

    #[test]
    fn test_smallest_grid() {
        let mut rng = StdRng::seed_from_u64(2);
        let puzzle = PuzzleGenerator::new().generate(1, 2, &mut rng).unwrap();
        assert_eq!(puzzle.watermarks.len(), 1);
        assert_eq!(puzzle.correct_set().len(), 1);
    }

    #[test]
    fn test_rejects_single_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = PuzzleGenerator::new().generate(1, 1, &mut rng).unwrap_err();
        assert!(matches!(err, SnapgridError::GridTooSmall { rows: 1, cols: 1 }));
    }

    #[test]
    fn test_rejects_zero_rows() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(PuzzleGenerator::new().generate(0, 5, &mut rng).is_err());
    }

    #[test]
    fn test_rejects_overflowing_grid() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(PuzzleGenerator::new().generate(usize::MAX, 2, &mut rng).is_err());
    }

    #[test]
    fn test_same_seed_same_puzzle() {
        let generator = PuzzleGenerator::new();
        let a = generator.generate(4, 4, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generator.generate(4, 4, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fisher_yates_is_permutation() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut items: Vec<usize> = (0..50).collect();
        fisher_yates(&mut items, &mut rng);
        let seen: HashSet<usize> = items.iter().copied().collect();
        assert_eq!(seen.len(), 50);
        assert!(items.iter().all(|&i| i < 50));
    }

    #[test]
    fn test_fisher_yates_moves_items() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut items: Vec<usize> = (0..50).collect();
        fisher_yates(&mut items, &mut rng);
        assert_ne!(items, (0..50).collect::<Vec<_>>());
    }
}
