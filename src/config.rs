use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{PlotError, PlotResult};
use crate::plot::frame_builder::{MIN_CELL_HEIGHT_PX, MIN_CELL_WIDTH_PX};
use crate::render::OutputFormat;

pub const DEFAULT_CELL_WIDTH_PX: u32 = 960;
pub const DEFAULT_CELL_HEIGHT_PX: u32 = 540;
pub const DEFAULT_STACKED_COLUMNS: u32 = 2;

/// Plot output configuration.
///
/// Serializable so a run can keep its plotting setup next to the statistics
/// file; every field has a default, so `{}` is a valid document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Size of one chart. The stacked surface is a grid of cells.
    #[serde(default = "default_cell")]
    pub cell: Viewport,
    /// Target directory; `None` writes next to the statistics file.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_stacked_columns")]
    pub stacked_columns: u32,
}

fn default_cell() -> Viewport {
    Viewport::new(DEFAULT_CELL_WIDTH_PX, DEFAULT_CELL_HEIGHT_PX)
}

fn default_stacked_columns() -> u32 {
    DEFAULT_STACKED_COLUMNS
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            cell: default_cell(),
            output_dir: None,
            format: OutputFormat::default(),
            stacked_columns: default_stacked_columns(),
        }
    }
}

impl PlotConfig {
    #[must_use]
    pub fn with_cell(mut self, cell: Viewport) -> Self {
        self.cell = cell;
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_stacked_columns(mut self, stacked_columns: u32) -> Self {
        self.stacked_columns = stacked_columns;
        self
    }

    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| PlotError::InvalidConfig(format!("failed to parse plot config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_file(path: impl AsRef<Path>) -> PlotResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| PlotError::io(path, err))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.cell.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: self.cell.width,
                height: self.cell.height,
            });
        }
        if self.cell.width < MIN_CELL_WIDTH_PX || self.cell.height < MIN_CELL_HEIGHT_PX {
            return Err(PlotError::InvalidConfig(format!(
                "chart cell must be at least {MIN_CELL_WIDTH_PX}x{MIN_CELL_HEIGHT_PX} px, got {}x{}",
                self.cell.width, self.cell.height
            )));
        }
        if self.stacked_columns == 0 {
            return Err(PlotError::InvalidConfig(
                "stacked_columns must be >= 1".to_owned(),
            ));
        }
        if !self.format.is_available() {
            return Err(PlotError::InvalidConfig(format!(
                "{} output requires the `cairo-backend` feature",
                self.format
            )));
        }
        Ok(())
    }

    /// Directory surfaces are written to for statistics loaded from `stats_path`.
    #[must_use]
    pub fn resolve_output_dir(&self, stats_path: &Path) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        match stats_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}
