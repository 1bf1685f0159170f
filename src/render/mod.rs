mod frame;
mod null_renderer;
mod primitives;
mod svg_backend;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, DASH_PATTERN_PX, LinePrimitive, LineStrokeStyle, RectPrimitive, TextHAlign,
    TextPrimitive,
};
pub use svg_backend::{SvgRenderStats, SvgRenderer};

use crate::error::{PlotError, PlotResult};

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from statistics and layout logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer};

/// File format of a rendered surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }

    /// Whether this build can write the format.
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            Self::Svg => true,
            Self::Png => cfg!(feature = "cairo-backend"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = PlotError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            other => Err(PlotError::InvalidConfig(format!(
                "unknown output format `{other}` (expected svg or png)"
            ))),
        }
    }
}

/// Renders `frame` into a new file at `path` using the backend for `format`.
pub fn render_to_file(format: OutputFormat, frame: &RenderFrame, path: &Path) -> PlotResult<()> {
    match format {
        OutputFormat::Svg => SvgRenderer::new(path).render(frame),
        #[cfg(feature = "cairo-backend")]
        OutputFormat::Png => {
            let width = i32::try_from(frame.viewport.width).unwrap_or(i32::MAX);
            let height = i32::try_from(frame.viewport.height).unwrap_or(i32::MAX);
            let mut renderer = CairoRenderer::new(width, height)?;
            renderer.render(frame)?;
            renderer.write_png(path)
        }
        #[cfg(not(feature = "cairo-backend"))]
        OutputFormat::Png => Err(PlotError::InvalidConfig(
            "png output requires the `cairo-backend` feature".to_owned(),
        )),
    }
}
