use std::path::PathBuf;

use crate::models::style::StyleName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellContent {
    #[default]
    Empty,
    Text(String),
    /// Image file, read and embedded by the renderer.
    Image(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub content: CellContent,
    pub colspan: usize,
    pub align: Align,
}

impl Cell {
    pub fn empty() -> Self {
        Cell {
            content: CellContent::Empty,
            colspan: 1,
            align: Align::Left,
        }
    }

    pub fn centered(text: impl Into<String>) -> Self {
        Cell {
            content: CellContent::Text(text.into()),
            colspan: 1,
            align: Align::Center,
        }
    }

    pub fn image(path: impl Into<PathBuf>) -> Self {
        Cell {
            content: CellContent::Image(path.into()),
            colspan: 1,
            align: Align::Center,
        }
    }

    pub fn spanning(mut self, colspan: usize) -> Self {
        self.colspan = colspan.max(1);
        self
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            CellContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content == CellContent::Empty
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub style: StyleName,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(style: StyleName) -> Self {
        Row {
            style,
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    /// Columns covered by the row, counting spans.
    pub fn width(&self) -> usize {
        self.cells.iter().map(|cell| cell.colspan).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_spans() {
        let row = Row::new(StyleName::Normal)
            .cell(Cell::centered("Workdays"))
            .cell(Cell::centered("22").spanning(4));
        assert_eq!(row.width(), 5);
    }
}
