use tracing::warn;

use crate::core::{Region, Viewport};
use crate::error::{PlotError, PlotResult};

/// Style used when none is given on the command line.
pub const DEFAULT_STYLE: &str = "stacked";

/// Height of the run-title band above a stacked grid.
pub const HEADING_HEIGHT_PX: u32 = 40;

/// How charts are distributed over surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Summary charts on one grid surface.
    Stacked,
    /// Every chart on a surface of its own.
    Separate,
}

impl Layout {
    /// Interprets a style selector. Only `"stacked"` selects the grid; any
    /// other value, including unknown ones, selects separate surfaces.
    #[must_use]
    pub fn from_style(style: &str) -> Self {
        match style {
            "stacked" => Self::Stacked,
            "separate" => Self::Separate,
            other => {
                warn!(style = other, "unknown plot style, using separate layout");
                Self::Separate
            }
        }
    }
}

/// Row-major grid of equally sized chart cells below a heading band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    cell: Viewport,
    columns: u32,
    rows: u32,
    heading_px: u32,
    viewport: Viewport,
}

impl GridLayout {
    /// Smallest grid with `columns` columns holding `cells` charts.
    pub fn for_cells(cells: usize, cell: Viewport, columns: u32) -> PlotResult<Self> {
        if !cell.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: cell.width,
                height: cell.height,
            });
        }
        if columns == 0 {
            return Err(PlotError::InvalidConfig(
                "grid needs at least one column".to_owned(),
            ));
        }

        let cells = u32::try_from(cells.max(1))
            .map_err(|_| PlotError::InvalidData("too many charts for one grid".to_owned()))?;
        let columns = columns.min(cells);
        let rows = cells.div_ceil(columns);
        let width = cell.width.checked_mul(columns);
        let height = cell
            .height
            .checked_mul(rows)
            .and_then(|height| height.checked_add(HEADING_HEIGHT_PX));
        let (Some(width), Some(height)) = (width, height) else {
            return Err(PlotError::InvalidConfig(format!(
                "{columns}x{rows} grid of {}x{} px cells exceeds the surface size limit",
                cell.width, cell.height
            )));
        };

        Ok(Self {
            cell,
            columns,
            rows,
            heading_px: HEADING_HEIGHT_PX,
            viewport: Viewport::new(width, height),
        })
    }

    #[must_use]
    pub fn columns(self) -> u32 {
        self.columns
    }

    #[must_use]
    pub fn rows(self) -> u32 {
        self.rows
    }

    /// Size of the whole surface, heading band included.
    #[must_use]
    pub fn viewport(self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn heading_region(self) -> Region {
        Region::new(
            0.0,
            0.0,
            f64::from(self.viewport.width),
            f64::from(self.heading_px),
        )
    }

    /// Cell region of chart `index`, filled row by row.
    #[must_use]
    pub fn cell_region(self, index: usize) -> Region {
        let columns = self.columns as usize;
        let (row, column) = (index / columns, index % columns);
        let width = f64::from(self.cell.width);
        let height = f64::from(self.cell.height);
        Region::new(
            column as f64 * width,
            f64::from(self.heading_px) + row as f64 * height,
            width,
            height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{GridLayout, HEADING_HEIGHT_PX, Layout};
    use crate::core::{Region, Viewport};
    use crate::error::PlotError;

    #[test]
    fn style_selector_falls_back_to_separate() {
        assert_eq!(Layout::from_style("stacked"), Layout::Stacked);
        assert_eq!(Layout::from_style("separate"), Layout::Separate);
        assert_eq!(Layout::from_style("Stacked"), Layout::Separate);
        assert_eq!(Layout::from_style(""), Layout::Separate);
    }

    #[test]
    fn grid_wraps_cells_row_major() {
        let grid = GridLayout::for_cells(5, Viewport::new(100, 50), 2).expect("grid");
        assert_eq!(grid.rows(), 3);
        assert_eq!(
            grid.viewport(),
            Viewport::new(200, 150 + HEADING_HEIGHT_PX)
        );
        assert_eq!(
            grid.cell_region(3),
            Region::new(100.0, 50.0 + f64::from(HEADING_HEIGHT_PX), 100.0, 50.0)
        );
    }

    #[test]
    fn grid_narrows_to_chart_count() {
        let grid = GridLayout::for_cells(1, Viewport::new(100, 50), 3).expect("grid");
        assert_eq!(grid.columns(), 1);
        assert_eq!(grid.rows(), 1);
    }

    #[test]
    fn grid_rejects_zero_columns() {
        assert!(GridLayout::for_cells(2, Viewport::new(100, 50), 0).is_err());
    }

    #[test]
    fn oversized_grid_is_rejected_instead_of_wrapping() {
        let err = GridLayout::for_cells(6, Viewport::new(3_000_000_000, 200), 2)
            .expect_err("width overflows");
        assert!(matches!(err, PlotError::InvalidConfig(_)));

        let err = GridLayout::for_cells(4, Viewport::new(200, u32::MAX - 10), 1)
            .expect_err("height overflows");
        assert!(matches!(err, PlotError::InvalidConfig(_)));
    }
}
