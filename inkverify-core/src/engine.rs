//! CA Evolution Engine — the only place the work is spent
//!
//! The engine takes exclusive ownership of an initialized [`Grid`] and
//! applies one [`Rule`] to every cell, once per generation, reading from
//! `current` and writing into `next`. There is no error path once a run
//! has started and no early exit short of the generation target.

use crate::config::LockParams;
use crate::error::LockError;
use crate::grid::{Grid, Rule};
use log::debug;

/// Drives a grid through a fixed number of generations
#[derive(Debug)]
pub struct Engine {
    grid: Grid,
    rule: Rule,
    generation: u64,
    target: u64,
    left: Vec<usize>,
    right: Vec<usize>,
}

impl Engine {
    /// Take ownership of `grid` for a run described by `params`.
    ///
    /// Fails if the grid was built with other dimensions than `params` names.
    pub fn new(grid: Grid, params: &LockParams) -> Result<Self, LockError> {
        if grid.width() != params.width() || grid.height() != params.height() {
            return Err(LockError::config(format!(
                "grid is {}x{} but the run expects {}x{}",
                grid.width(),
                grid.height(),
                params.width(),
                params.height()
            )));
        }
        let w = grid.width();
        let left = (0..w).map(|x| Grid::wrap(x as isize - 1, w)).collect();
        let right = (0..w).map(|x| Grid::wrap(x as isize + 1, w)).collect();
        Ok(Self {
            grid,
            rule: params.rule(),
            generation: 0,
            target: params.generations(),
            left,
            right,
        })
    }

    /// Generations applied so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn is_complete(&self) -> bool {
        self.generation >= self.target
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Apply the rule to every cell once, then promote `next`.
    ///
    /// For a second-order rule `next` still holds the previous generation
    /// when the pass starts; each cell reads its own old value there before
    /// overwriting it, and neighbours are only ever read from `current`.
    pub fn step(&mut self) {
        let (w, h) = (self.grid.width(), self.grid.height());
        let rule = self.rule;
        let (left, right) = (&self.left, &self.right);
        let (cur, next) = self.grid.split_mut();

        for y in 0..h {
            let row = y * w;
            let up = Grid::wrap(y as isize - 1, h) * w;
            let down = Grid::wrap(y as isize + 1, h) * w;
            for x in 0..w {
                let (l, r) = (left[x], right[x]);
                let neighbors = cur[up + l]
                    + cur[up + x]
                    + cur[up + r]
                    + cur[row + l]
                    + cur[row + r]
                    + cur[down + l]
                    + cur[down + x]
                    + cur[down + r];
                let i = row + x;
                next[i] = rule.apply(cur[i] == 1, neighbors, next[i] == 1) as u8;
            }
        }

        if rule.is_second_order() {
            self.grid.swap_retaining();
        } else {
            self.grid.swap();
        }
        self.generation += 1;
    }

    /// Evolve to the generation target and hand back the final grid
    pub fn run(mut self) -> Grid {
        debug!(
            "Evolving {}x{} grid for {} generations ({})",
            self.grid.width(),
            self.grid.height(),
            self.target,
            self.rule
        );
        while !self.is_complete() {
            self.step();
        }
        debug!("Evolution complete: {} live cells", self.grid.alive_count());
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{BitStream, Seed};

    fn params(w: usize, h: usize, generations: u64, rule: Rule) -> LockParams {
        LockParams::new(w, h, generations, rule).unwrap()
    }

    fn plant(grid: &mut Grid, cells: &[(isize, isize)]) {
        for &(x, y) in cells {
            grid.set(x, y, true);
        }
    }

    fn live_cells(grid: &Grid) -> Vec<(isize, isize)> {
        let mut cells = Vec::new();
        for y in 0..grid.height() as isize {
            for x in 0..grid.width() as isize {
                if grid.get(x, y) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let grid = Grid::new(8, 8).unwrap();
        let err = Engine::new(grid, &params(8, 9, 1, Rule::Life)).unwrap_err();
        assert!(matches!(err, LockError::ConfigurationError(_)));
    }

    #[test]
    fn test_life_blinker_oscillates() {
        let mut grid = Grid::new(5, 5).unwrap();
        plant(&mut grid, &[(1, 2), (2, 2), (3, 2)]);
        let mut engine = Engine::new(grid, &params(5, 5, 2, Rule::Life)).unwrap();
        engine.step();
        assert_eq!(live_cells(engine.grid()), vec![(2, 1), (2, 2), (2, 3)]);
        engine.step();
        assert_eq!(live_cells(engine.grid()), vec![(1, 2), (2, 2), (3, 2)]);
        assert!(engine.is_complete());
    }

    #[test]
    fn test_life_glider_crosses_the_seam() {
        let mut grid = Grid::new(6, 6).unwrap();
        plant(&mut grid, &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
        let before = live_cells(&grid);
        // A glider on a 6x6 torus returns to its start after 24 generations
        let final_grid = Engine::new(grid, &params(6, 6, 24, Rule::Life)).unwrap().run();
        assert_eq!(live_cells(&final_grid), before);
    }

    #[test]
    fn test_reversible_blinker_toggles() {
        let mut grid = Grid::new(5, 5).unwrap();
        plant(&mut grid, &[(1, 2), (2, 2), (3, 2)]);
        let mut engine = Engine::new(grid, &params(5, 5, 4, Rule::ReversibleLife)).unwrap();

        engine.step();
        assert_eq!(live_cells(engine.grid()), vec![(2, 1), (2, 2), (2, 3)]);
        engine.step();
        assert!(live_cells(engine.grid()).is_empty());
        engine.step();
        assert_eq!(live_cells(engine.grid()), vec![(2, 1), (2, 2), (2, 3)]);
        engine.step();
        assert_eq!(live_cells(engine.grid()), vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_reversible_rule_retraces_history() {
        let mut grid = Grid::new(16, 12).unwrap();
        grid.fill(BitStream::from_seed(&Seed::derive(&["carol", "pw"])).bits());
        let initial = grid.current().to_vec();

        let steps = 40;
        let mut engine = Engine::new(grid, &params(16, 12, steps, Rule::ReversibleLife)).unwrap();
        while !engine.is_complete() {
            engine.step();
        }
        assert_ne!(engine.grid().current(), initial.as_slice());

        // Exchange the roles of the last two generations and run time backwards
        engine.grid.swap_retaining();
        for _ in 0..steps - 1 {
            engine.step();
        }
        assert_eq!(engine.grid().current(), initial.as_slice());
    }

    #[test]
    fn test_degenerate_single_cell() {
        let mut grid = Grid::new(1, 1).unwrap();
        grid.set(0, 0, true);
        let mut engine = Engine::new(grid, &params(1, 1, 3, Rule::Life)).unwrap();
        // Eight live neighbours: overcrowded
        engine.step();
        assert!(!engine.grid().get(0, 0));

        let mut grid = Grid::new(1, 1).unwrap();
        grid.set(0, 0, true);
        let final_grid = Engine::new(grid, &params(1, 1, 5, Rule::ReversibleLife)).unwrap().run();
        assert_eq!(final_grid.cell_count(), 1);
    }

    #[test]
    fn test_zero_generations_is_identity() {
        let mut grid = Grid::new(8, 8).unwrap();
        grid.fill(BitStream::from_seed(&Seed::derive(&["dave", "pw"])).bits());
        let before = grid.clone();
        let after = Engine::new(grid, &params(8, 8, 0, Rule::ReversibleLife)).unwrap().run();
        assert_eq!(after, before);
    }

    #[test]
    fn test_step_matches_neighbor_count() {
        let mut grid = Grid::new(9, 7).unwrap();
        grid.fill(BitStream::from_seed(&Seed::derive(&["erin", "pw"])).bits());
        let reference = grid.clone();
        let mut engine = Engine::new(grid, &params(9, 7, 1, Rule::Life)).unwrap();
        engine.step();
        for y in 0..7 {
            for x in 0..9 {
                let expected = Rule::life(reference.get(x, y), reference.live_neighbors(x, y));
                assert_eq!(engine.grid().get(x, y), expected, "cell ({}, {})", x, y);
            }
        }
    }
}
