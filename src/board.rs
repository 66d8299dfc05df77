use bevy::math::{uvec2, UVec2};

/// Position of the cell every flood starts from.
pub const ANCHOR: UVec2 = UVec2::ZERO;

/// Square grid of color indices, stored row by row with row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// the amount of cells on each axis
    size: u32,
    /// every cell holds a value in `0..num_colors`
    num_colors: u8,
    cells: Vec<u8>,
}

impl Board {
    /// Creates a `size` x `size` board filled with uniform random colors.
    /// Both `size` and `num_colors` must be at least 1.
    pub(crate) fn new(size: u32, num_colors: u8, rng: &mut fastrand::Rng) -> Self {
        let mut board = Self {
            size,
            num_colors,
            cells: vec![0; (size * size) as usize],
        };
        board.initialize(rng);
        board
    }

    /// Builds a board from explicit rows. Panics if a cell is not below `num_colors`.
    #[cfg(test)]
    pub(crate) fn from_rows<const N: usize>(rows: [[u8; N]; N], num_colors: u8) -> Self {
        let cells: Vec<u8> = rows.iter().flatten().copied().collect();
        assert!(
            cells.iter().all(|c| *c < num_colors),
            "cell color out of range"
        );
        Self {
            size: N as u32,
            num_colors,
            cells,
        }
    }

    /// Overwrites every cell with an independent random color.
    pub(crate) fn initialize(&mut self, rng: &mut fastrand::Rng) {
        for cell in self.cells.iter_mut() {
            *cell = rng.u8(0..self.num_colors);
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn num_colors(&self) -> u8 {
        self.num_colors
    }

    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, cell_coord: UVec2) -> u8 {
        self.cells[self.cell_coord_to_idx(cell_coord)]
    }

    #[inline]
    pub fn anchor_color(&self) -> u8 {
        self.get(ANCHOR)
    }

    /// Recolors the 4-connected region of `origin_color` cells that contains the anchor.
    ///
    /// Does nothing when both colors are equal or when the anchor is not `origin_color`.
    /// Cells are recolored as they are pushed, so each one is visited once.
    pub fn flood_fill(&mut self, origin_color: u8, new_color: u8) {
        if origin_color == new_color || self.anchor_color() != origin_color {
            return;
        }

        let anchor_idx = self.cell_coord_to_idx(ANCHOR);
        self.cells[anchor_idx] = new_color;
        let mut stack = vec![anchor_idx];

        while let Some(idx) = stack.pop() {
            let neighbours = self.neighbour_indices(self.idx_to_cell_coord(idx));
            for neigh_idx in neighbours.into_iter().flatten() {
                if self.cells[neigh_idx] == origin_color {
                    self.cells[neigh_idx] = new_color;
                    stack.push(neigh_idx);
                }
            }
        }
    }

    /// Every cell has the anchor's color.
    pub fn is_uniform(&self) -> bool {
        let first = self.anchor_color();
        self.cells.iter().all(|c| *c == first)
    }

    #[inline]
    pub fn cell_coord_to_idx(&self, cell_coord: UVec2) -> usize {
        (cell_coord.y * self.size + cell_coord.x) as usize
    }

    #[inline]
    pub fn idx_to_cell_coord(&self, idx: usize) -> UVec2 {
        uvec2(idx as u32 % self.size, idx as u32 / self.size)
    }

    /// Indices of the up, down, left and right neighbours. The board does not wrap,
    /// so edge cells get `None` for the sides that fall off the grid.
    #[inline]
    pub fn neighbour_indices(&self, cell_coord: UVec2) -> [Option<usize>; 4] {
        let UVec2 { x, y } = cell_coord;
        let last = self.size - 1;
        [
            (y > 0).then(|| uvec2(x, y - 1)),
            (y < last).then(|| uvec2(x, y + 1)),
            (x > 0).then(|| uvec2(x - 1, y)),
            (x < last).then(|| uvec2(x + 1, y)),
        ]
        .map(|pos| pos.map(|pos| self.cell_coord_to_idx(pos)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rows(board: &Board) -> Vec<Vec<u8>> {
        board
            .cells()
            .chunks(board.size() as usize)
            .map(<[u8]>::to_vec)
            .collect()
    }

    #[test]
    fn indices_work() {
        let board = Board::from_rows([[0; 8]; 8], 1);

        assert_eq!(9, board.cell_coord_to_idx(uvec2(1, 1)));
        assert_eq!(uvec2(7, 7), board.idx_to_cell_coord(63));
        assert_eq!(uvec2(2, 1), board.idx_to_cell_coord(10));

        let neigh1_1 = board.neighbour_indices(uvec2(1, 1));
        let expected_1_1 = [
            Some(board.cell_coord_to_idx(uvec2(1, 0))),
            Some(board.cell_coord_to_idx(uvec2(1, 2))),
            Some(board.cell_coord_to_idx(uvec2(0, 1))),
            Some(board.cell_coord_to_idx(uvec2(2, 1))),
        ];
        assert_eq!(expected_1_1, neigh1_1);

        assert_eq!(
            [None, Some(8), None, Some(1)],
            board.neighbour_indices(ANCHOR)
        );
        assert_eq!(
            [Some(55), None, Some(62), None],
            board.neighbour_indices(uvec2(7, 7))
        );
    }

    #[test]
    fn initialize_stays_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut board = Board::new(12, 4, &mut rng);
        assert_eq!(144, board.cells().len());
        assert!(board.cells().iter().all(|c| *c < 4));
        // all four colors show up on a board this big
        for color in 0..4 {
            assert!(board.cells().contains(&color));
        }

        let before = board.clone();
        board.initialize(&mut rng);
        assert!(board.cells().iter().all(|c| *c < 4));
        assert_ne!(before, board);
    }

    #[test]
    fn single_color_board_is_uniform() {
        let mut rng = fastrand::Rng::with_seed(1);
        assert!(Board::new(12, 1, &mut rng).is_uniform());
        assert!(!Board::new(12, 2, &mut rng).is_uniform());
        assert!(!Board::new(12, 4, &mut rng).is_uniform());
    }

    #[test]
    fn flood_fill_recolors_connected_region() {
        let mut board = Board::from_rows([[0, 1], [0, 0]], 2);
        board.flood_fill(0, 1);
        // (1, 1) touches (0, 1) which is part of the anchor's region
        assert_eq!(vec![vec![1, 1], vec![1, 1]], rows(&board));

        let mut board = Board::from_rows([[0, 1], [1, 0]], 2);
        board.flood_fill(0, 1);
        assert_eq!(vec![vec![1, 1], vec![1, 0]], rows(&board));
    }

    #[test]
    fn flood_fill_leaves_unreachable_cells() {
        let mut board = Board::from_rows(
            [
                [0, 0, 1, 0],
                [2, 0, 1, 0],
                [0, 0, 1, 2],
                [1, 1, 1, 0],
            ],
            3,
        );
        board.flood_fill(0, 2);
        assert_eq!(
            vec![
                vec![2, 2, 1, 0],
                vec![2, 2, 1, 0],
                vec![2, 2, 1, 2],
                vec![1, 1, 1, 0],
            ],
            rows(&board)
        );
    }

    #[test]
    fn flood_fill_noop_cases() {
        let mut board = Board::from_rows([[0, 1], [0, 0]], 2);
        let before = board.clone();

        board.flood_fill(0, 0);
        assert_eq!(before, board);

        // anchor does not hold the origin color
        board.flood_fill(1, 0);
        assert_eq!(before, board);
    }

    #[test]
    fn flood_fill_covers_large_region() {
        // a single-color serpentine path through a 64x64 board
        const N: usize = 64;
        let mut rows = [[1u8; N]; N];
        for (y, row) in rows.iter_mut().enumerate() {
            if y % 2 == 0 {
                row.fill(0);
            } else if y % 4 == 1 {
                row[N - 1] = 0;
            } else {
                row[0] = 0;
            }
        }
        let mut board = Board::from_rows(rows, 2);
        board.flood_fill(0, 1);
        assert!(board.is_uniform());
    }
}
