use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel-render")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::PlotConfig;
use crate::core::Region;
use crate::error::{PlotError, PlotResult};
use crate::render::{RenderFrame, Renderer, render_to_file};
use crate::stats::IterationStatistics;

use super::chart::{ChartSpec, charts_for, stacked_charts};
use super::frame_builder::{build_chart_frame, heading_text};
use super::layout::{GridLayout, Layout};
use super::StatisticsPlotter;

const DEFAULT_STEM: &str = "iteration-stats";

/// One rendered page: a frame plus the name its file is derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub name: String,
    pub frame: RenderFrame,
}

/// Renders `IterationStatistics` as chart surfaces.
#[derive(Debug, Clone)]
pub struct IterationStatisticsPlotter {
    stats: IterationStatistics,
    config: PlotConfig,
    output_dir: PathBuf,
    stem: String,
}

impl IterationStatisticsPlotter {
    /// Plotter writing `iteration-stats.*` files into the configured
    /// directory, or the working directory.
    #[must_use]
    pub fn new(stats: IterationStatistics, config: PlotConfig) -> Self {
        let output_dir = config
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            stats,
            config,
            output_dir,
            stem: DEFAULT_STEM.to_owned(),
        }
    }

    /// Plotter naming its files after `stats_path` and, unless configured
    /// otherwise, writing next to it.
    #[must_use]
    pub fn for_statistics_file(
        stats: IterationStatistics,
        config: PlotConfig,
        stats_path: &Path,
    ) -> Self {
        let output_dir = config.resolve_output_dir(stats_path);
        let stem = stats_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| DEFAULT_STEM.to_owned());
        Self {
            stats,
            config,
            output_dir,
            stem,
        }
    }

    #[must_use]
    pub fn statistics(&self) -> &IterationStatistics {
        &self.stats
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Builds the surfaces for `style` without writing anything.
    pub fn surfaces(&self, style: &str) -> PlotResult<Vec<Surface>> {
        self.config.validate()?;
        match Layout::from_style(style) {
            Layout::Stacked => Ok(vec![self.stacked_surface()?]),
            Layout::Separate => self.separate_surfaces(),
        }
    }

    /// Renders every surface for `style` through `renderer`.
    ///
    /// Returns the number of surfaces rendered.
    pub fn render_with<R: Renderer>(&self, style: &str, renderer: &mut R) -> PlotResult<usize> {
        let surfaces = self.surfaces(style)?;
        for surface in &surfaces {
            renderer.render(&surface.frame)?;
        }
        Ok(surfaces.len())
    }

    /// Writes every surface for `style` to the output directory.
    ///
    /// Returns the written paths in display order.
    pub fn write_surfaces(&self, style: &str) -> PlotResult<Vec<PathBuf>> {
        let surfaces = self.surfaces(style)?;
        fs::create_dir_all(&self.output_dir)
            .map_err(|err| PlotError::io(&self.output_dir, err))?;

        let extension = self.config.format.extension();
        let mut written = Vec::with_capacity(surfaces.len());
        for surface in &surfaces {
            let path = self
                .output_dir
                .join(format!("{}.{}.{extension}", self.stem, surface.name));
            render_to_file(self.config.format, &surface.frame, &path)?;
            info!(path = %path.display(), "wrote plot surface");
            written.push(path);
        }
        Ok(written)
    }

    fn stacked_surface(&self) -> PlotResult<Surface> {
        let charts = stacked_charts(&self.stats);
        let grid = GridLayout::for_cells(charts.len(), self.config.cell, self.config.stacked_columns)?;
        let viewport = grid.viewport();

        let mut frame = RenderFrame::new(viewport);
        if let Some(heading) = heading_text(&self.stats.title, grid.heading_region()) {
            frame.texts.push(heading);
        }
        for (index, chart) in charts.iter().enumerate() {
            frame.append(build_chart_frame(chart, grid.cell_region(index), viewport)?);
        }
        debug!(
            charts = charts.len(),
            width = viewport.width,
            height = viewport.height,
            "built stacked surface"
        );
        Ok(Surface {
            name: "stacked".to_owned(),
            frame,
        })
    }

    fn separate_surfaces(&self) -> PlotResult<Vec<Surface>> {
        let charts = charts_for(&self.stats);
        debug!(charts = charts.len(), "building separate surfaces");

        #[cfg(feature = "parallel-render")]
        let surfaces = charts
            .par_iter()
            .map(|chart| self.chart_surface(chart))
            .collect::<PlotResult<Vec<_>>>();
        #[cfg(not(feature = "parallel-render"))]
        let surfaces = charts
            .iter()
            .map(|chart| self.chart_surface(chart))
            .collect::<PlotResult<Vec<_>>>();

        surfaces
    }

    fn chart_surface(&self, chart: &ChartSpec) -> PlotResult<Surface> {
        let viewport = self.config.cell;
        let region = Region::new(
            0.0,
            0.0,
            f64::from(viewport.width),
            f64::from(viewport.height),
        );
        Ok(Surface {
            name: chart.kind.slug().to_owned(),
            frame: build_chart_frame(chart, region, viewport)?,
        })
    }
}

impl StatisticsPlotter for IterationStatisticsPlotter {
    fn show(&mut self, style: &str) -> PlotResult<()> {
        let written = self.write_surfaces(style)?;
        info!(
            style,
            surfaces = written.len(),
            records = self.stats.len(),
            "plotted iteration statistics"
        );
        Ok(())
    }
}
