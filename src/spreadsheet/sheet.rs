use crate::spreadsheet::cell::Cell;

/// Dense row/column grid of the non-empty cells of one worksheet.
#[derive(Debug, Default, Clone)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<Option<Cell>>>,
}

impl Sheet {
    pub fn new(name: &str) -> Sheet {
        Sheet {
            name: name.to_owned(),
            rows: Vec::new(),
        }
    }

    /// Stores a cell at its own position; a later cell at the same position wins.
    pub fn push(&mut self, cell: Cell) {
        if self.rows.len() <= cell.row {
            self.rows.resize_with(cell.row + 1, Vec::new);
        }
        let row = &mut self.rows[cell.row];
        if row.len() <= cell.col {
            row.resize_with(cell.col + 1, || None);
        }
        let col = cell.col;
        row[col] = Some(cell);
    }

    /// Number of rows up to and including the last one holding a cell.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(Option::is_none))
    }

    /// Cells of a row (0-based); missing rows are empty slices.
    pub fn row(&self, row: usize) -> &[Option<Cell>] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.row(row).get(col).and_then(Option::as_ref)
    }
}
