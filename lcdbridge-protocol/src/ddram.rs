//! Display data RAM addressing.
//!
//! The HD44780 does not store rows contiguously. Row starts are:
//!
//! | Rows | Offsets                |
//! |------|------------------------|
//! | 1    | 0x00                   |
//! | 2    | 0x00, 0x40             |
//! | 3    | 0x00, 0x40, 0x14       |
//! | 4    | 0x00, 0x40, 0x14, 0x54 |
//!
//! Three-row panels use the first three entries of the four-row table. No
//! datasheet describes a three-row part; this is the convention hosts expect.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Widest supported panel (the controller holds 80 characters in two lines)
pub const MAX_COLUMNS: u8 = 40;

/// Tallest supported panel
pub const MAX_ROWS: u8 = 4;

/// Character cells in display RAM
pub const MAX_CELLS: usize = 80;

const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// A character cell on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    pub column: u8,
    pub row: u8,
}

impl Position {
    pub const ORIGIN: Self = Self { column: 0, row: 0 };

    pub const fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }
}

/// Panel geometry in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Geometry {
    /// Characters per row
    pub columns: u8,
    /// Number of rows
    pub rows: u8,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(20, 4)
    }
}

impl Geometry {
    pub const fn new(columns: u8, rows: u8) -> Self {
        Self { columns, rows }
    }

    /// Total character cells
    pub const fn cells(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Row start offsets used for this row count
    pub fn row_offsets(&self) -> &'static [u8] {
        let count = self.rows.clamp(1, MAX_ROWS) as usize;
        &ROW_OFFSETS[..count]
    }

    /// Widest row that does not run into the next row's offset
    pub const fn max_columns_for_rows(rows: u8) -> u8 {
        if rows >= 3 {
            ROW_OFFSETS[2] - ROW_OFFSETS[0]
        } else {
            MAX_COLUMNS
        }
    }

    /// Shrink to the largest geometry display RAM can hold
    pub fn fit(&self) -> Geometry {
        let rows = self.rows.min(MAX_ROWS);
        let columns = self.columns.min(Self::max_columns_for_rows(rows));
        Geometry::new(columns, rows)
    }

    /// Map a DDRAM address to a cell
    ///
    /// Returns `None` for addresses that fall in the gaps between rows.
    pub fn decode(&self, address: u8) -> Option<Position> {
        let address = address as u16;
        self.row_offsets()
            .iter()
            .enumerate()
            .find_map(|(row, &offset)| {
                let start = offset as u16;
                let end = start + self.columns as u16;
                if address >= start && address < end {
                    Some(Position::new((address - start) as u8, row as u8))
                } else {
                    None
                }
            })
    }

    /// Map a cell to its DDRAM address
    ///
    /// The row wraps modulo the table size. A column past the panel edge
    /// encodes as address 0.
    pub fn encode(&self, position: Position) -> u8 {
        if position.column >= self.columns {
            return 0;
        }
        let offsets = self.row_offsets();
        let row = position.row as usize % offsets.len();
        (offsets[row] as u16 + position.column as u16) as u8
    }

    /// Clamp a cell into the panel
    pub fn clamp(&self, position: Position) -> Position {
        Position {
            column: position.column.min(self.columns.saturating_sub(1)),
            row: position.row.min(self.rows.saturating_sub(1)),
        }
    }

    /// Returns true if the cell lies on the panel
    pub fn contains(&self, position: Position) -> bool {
        position.column < self.columns && position.row < self.rows
    }

    /// Linear index of a cell in a row-major buffer
    pub fn index(&self, position: Position) -> usize {
        position.row as usize * self.columns as usize + position.column as usize
    }

    /// Cursor position after one character write
    ///
    /// Incrementing wraps from the last column to column 0 of the next row;
    /// decrementing wraps from column 0 to the last column of the previous
    /// row. Both wrap around the last/first row (the panel is a ring).
    pub fn advance(&self, position: Position, increment: bool) -> Position {
        if self.columns == 0 || self.rows == 0 {
            return Position::ORIGIN;
        }

        let Position { column, row } = self.clamp(position);
        if increment {
            if column + 1 >= self.columns {
                Position::new(0, (row + 1) % self.rows)
            } else {
                Position::new(column + 1, row)
            }
        } else if column == 0 {
            let row = if row == 0 { self.rows - 1 } else { row - 1 };
            Position::new(self.columns - 1, row)
        } else {
            Position::new(column - 1, row)
        }
    }
}
