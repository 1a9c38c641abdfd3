//! Immutable prediction grid container.

/// Largest number of cells a grid may hold.
pub const MAX_CELLS: usize = 1 << 24;

/// Number of rows and columns in a prediction grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    /// Number of rows (lines in the input file).
    pub rows: usize,
    /// Number of columns (values per line).
    pub cols: usize,
}

impl GridDimensions {
    /// Creates a new set of dimensions.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells, or `None` if it overflows `usize`.
    #[must_use]
    pub const fn cell_count(self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Whether both dimensions are positive and the grid holds at most
    /// [`MAX_CELLS`] cells.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        if self.is_empty() {
            return false;
        }
        match self.cell_count() {
            Some(count) => count <= MAX_CELLS,
            None => false,
        }
    }

    /// Whether either dimension is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

impl std::fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A rectangular, row-major grid of prediction values.
///
/// Constructed once by the loader and never mutated afterwards. Values are
/// stored as read; range checking is left to classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionGrid {
    dimensions: GridDimensions,
    values: Vec<i32>,
}

impl PredictionGrid {
    /// Builds a grid from a list of rows.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no rows, the first row is empty, or the
    /// rows have differing lengths.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self, GridShapeError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(GridShapeError::Empty);
        }

        let dimensions = GridDimensions::new(rows.len(), cols);
        let mut values = Vec::with_capacity(dimensions.cell_count().unwrap_or(0));

        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != cols {
                return Err(GridShapeError::Ragged {
                    row,
                    expected: cols,
                    actual: cells.len(),
                });
            }
            values.extend(cells);
        }

        Ok(Self { dimensions, values })
    }

    /// Returns the grid dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.dimensions.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.dimensions.cols
    }

    /// Returns the value at `(row, col)`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row >= self.dimensions.rows || col >= self.dimensions.cols {
            return None;
        }
        self.values.get(row * self.dimensions.cols + col).copied()
    }

    /// Iterates over `(row, col, value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        let cols = self.dimensions.cols;
        self.values
            .iter()
            .enumerate()
            .map(move |(index, value)| (index / cols, index % cols, *value))
    }
}

/// Error returned when rows cannot form a rectangular grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridShapeError {
    /// No rows, or a zero-width first row.
    Empty,
    /// A row's length differs from the first row's.
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },
}

impl std::fmt::Display for GridShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "prediction grid has no cells"),
            Self::Ragged {
                row,
                expected,
                actual,
            } => write!(
                f,
                "row {row} has {actual} values, expected {expected} to match the first row"
            ),
        }
    }
}

impl std::error::Error for GridShapeError {}
