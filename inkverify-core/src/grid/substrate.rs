//! Grid Substrate — a double-buffered toroidal cell array
//!
//! Two equally sized buffers: `current` is read during a generation, `next`
//! is written. Cells are one byte each (0 = dead, 1 = alive) so every cell
//! touch is a real memory access.

use crate::error::LockError;

/// Largest grid accepted, in cells (two byte buffers ≈ 128 MiB)
pub const MAX_CELLS: usize = 1 << 26;

/// Double-buffered W×H binary grid with wraparound addressing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    current: Vec<u8>,
    next: Vec<u8>,
}

impl Grid {
    /// Allocate an all-dead grid
    pub fn new(width: usize, height: usize) -> Result<Self, LockError> {
        if width == 0 || height == 0 {
            return Err(LockError::config(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let cells = width
            .checked_mul(height)
            .filter(|&n| n <= MAX_CELLS)
            .ok_or_else(|| {
                LockError::config(format!(
                    "grid {}x{} exceeds the {} cell ceiling",
                    width, height, MAX_CELLS
                ))
            })?;
        Ok(Self {
            width,
            height,
            current: vec![0; cells],
            next: vec![0; cells],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.current.len()
    }

    /// Fill `current` in row-major order from the top-left cell.
    ///
    /// Cells past the end of a finite source stay dead.
    pub fn fill<I: IntoIterator<Item = bool>>(&mut self, bits: I) {
        for (cell, bit) in self.current.iter_mut().zip(bits) {
            *cell = bit as u8;
        }
    }

    /// Map a signed coordinate onto `0..extent`
    #[inline]
    pub fn wrap(coord: isize, extent: usize) -> usize {
        coord.rem_euclid(extent as isize) as usize
    }

    #[inline]
    fn index(&self, x: isize, y: isize) -> usize {
        Self::wrap(y, self.height) * self.width + Self::wrap(x, self.width)
    }

    /// Read a cell of `current`; coordinates wrap around both axes
    #[inline]
    pub fn get(&self, x: isize, y: isize) -> bool {
        self.current[self.index(x, y)] == 1
    }

    /// Read a cell of `next`
    #[inline]
    pub fn get_next(&self, x: isize, y: isize) -> bool {
        self.next[self.index(x, y)] == 1
    }

    /// Write a cell of `current`, used to plant patterns
    pub fn set(&mut self, x: isize, y: isize, alive: bool) {
        let i = self.index(x, y);
        self.current[i] = alive as u8;
    }

    /// Write a cell of `next`
    #[inline]
    pub fn set_next(&mut self, x: isize, y: isize, alive: bool) {
        let i = self.index(x, y);
        self.next[i] = alive as u8;
    }

    /// Number of live neighbours among the 8 toroidal neighbours.
    ///
    /// On a 1-wide or 1-high grid a cell can be its own neighbour; each
    /// occurrence counts.
    pub fn live_neighbors(&self, x: isize, y: isize) -> u8 {
        let mut n = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx, dy) != (0, 0) {
                    n += self.get(x + dx, y + dy) as u8;
                }
            }
        }
        n
    }

    /// Promote `next` to `current` and clear the new `next`
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.fill(0);
    }

    /// Promote `next` to `current`, keeping the retired generation in `next`
    pub fn swap_retaining(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Borrow `current` for reading and `next` for writing at the same time
    pub fn split_mut(&mut self) -> (&[u8], &mut [u8]) {
        (&self.current, &mut self.next)
    }

    pub fn current(&self) -> &[u8] {
        &self.current
    }

    pub fn next(&self) -> &[u8] {
        &self.next
    }

    pub fn alive_count(&self) -> usize {
        self.current.iter().filter(|&&c| c == 1).count()
    }

    /// Pack `current` row-major, 8 cells per byte, first cell in the most
    /// significant bit; the final byte is zero-padded
    pub fn pack(&self) -> Vec<u8> {
        Self::pack_cells(&self.current)
    }

    pub(crate) fn pack_cells(cells: &[u8]) -> Vec<u8> {
        cells
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |byte, (i, &c)| byte | (c << (7 - i)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(Grid::new(0, 10), Err(LockError::ConfigurationError(_))));
        assert!(matches!(Grid::new(10, 0), Err(LockError::ConfigurationError(_))));
    }

    #[test]
    fn test_rejects_oversized_grid() {
        assert!(Grid::new(1 << 13, (1 << 13) + 1).is_err());
        assert!(Grid::new(MAX_CELLS + 1, 1).is_err());
        assert!(Grid::new(usize::MAX, 2).is_err());
        assert!(Grid::new(1024, 1024).is_ok());
    }

    #[test]
    fn test_wraparound_addressing() {
        let mut grid = Grid::new(4, 3).unwrap();
        grid.set(3, 2, true);
        assert!(grid.get(-1, -1));
        assert!(grid.get(7, 5));
        assert!(!grid.get(0, 0));
        assert_eq!(Grid::wrap(-1, 4), 3);
        assert_eq!(Grid::wrap(4, 4), 0);
    }

    #[test]
    fn test_neighbor_count_wraps_edges() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(4, 4, true);
        grid.set(0, 4, true);
        grid.set(4, 0, true);
        assert_eq!(grid.live_neighbors(0, 0), 3);
        assert_eq!(grid.live_neighbors(2, 2), 0);
    }

    #[test]
    fn test_single_cell_is_its_own_neighbor() {
        let mut grid = Grid::new(1, 1).unwrap();
        assert_eq!(grid.live_neighbors(0, 0), 0);
        grid.set(0, 0, true);
        assert_eq!(grid.live_neighbors(0, 0), 8);
    }

    #[test]
    fn test_fill_row_major() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.fill([true, false, false, false, true, true]);
        assert!(grid.get(0, 0));
        assert!(!grid.get(1, 0));
        assert!(grid.get(1, 1));
        assert!(grid.get(2, 1));
        assert_eq!(grid.alive_count(), 3);
    }

    #[test]
    fn test_swap_clears_next() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(0, 0, true);
        grid.set_next(1, 1, true);
        grid.swap();
        assert!(grid.get(1, 1));
        assert!(!grid.get(0, 0));
        assert!(grid.next().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_swap_retaining_keeps_previous() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(0, 0, true);
        grid.set_next(1, 1, true);
        grid.swap_retaining();
        assert!(grid.get(1, 1));
        assert!(grid.get_next(0, 0));
    }

    #[test]
    fn test_pack_bit_order() {
        let mut grid = Grid::new(5, 2).unwrap();
        grid.fill([true, false, false, false, false, false, false, true, true, true]);
        assert_eq!(grid.pack(), vec![0b1000_0001, 0b1100_0000]);
    }
}
