use std::path::{Path, PathBuf};

use plotters::prelude::{
    IntoDrawingArea, IntoFont, PathElement, RGBAColor, Rectangle, SVGBackend, ShapeStyle, Text,
};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::error::{PlotError, PlotResult};
use crate::render::{Color, RenderFrame, Renderer, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvgRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

/// SVG file renderer built on the `plotters` SVG backend.
///
/// Every `render` call rewrites the target file with one complete document.
#[derive(Debug)]
pub struct SvgRenderer {
    path: PathBuf,
    clear_color: Color,
    last_stats: SvgRenderStats,
}

impl SvgRenderer {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clear_color: Color::rgb(1.0, 1.0, 1.0),
            last_stats: SvgRenderStats::default(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_clear_color(&mut self, color: Color) -> PlotResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> SvgRenderStats {
        self.last_stats
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()> {
        frame.validate()?;

        let path = self.path.clone();
        let root = SVGBackend::new(&path, (frame.viewport.width, frame.viewport.height))
            .into_drawing_area();
        root.fill(&to_rgba(self.clear_color))
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = SvgRenderStats::default();

        for rect in &frame.rects {
            let corners = [
                (to_px(rect.x), to_px(rect.y)),
                (to_px(rect.x + rect.width), to_px(rect.y + rect.height)),
            ];
            root.draw(&Rectangle::new(
                corners,
                ShapeStyle {
                    color: to_rgba(rect.fill_color),
                    filled: true,
                    stroke_width: 0,
                },
            ))
            .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            if rect.border_width > 0.0 {
                root.draw(&Rectangle::new(
                    corners,
                    ShapeStyle {
                        color: to_rgba(rect.border_color),
                        filled: false,
                        stroke_width: to_stroke(rect.border_width),
                    },
                ))
                .map_err(|err| map_backend_error("failed to stroke rectangle border", err))?;
            }
            stats.rects_drawn += 1;
        }

        for line in &frame.lines {
            for segment in line.visible_segments() {
                root.draw(&PathElement::new(
                    vec![
                        (to_px(segment.x1), to_px(segment.y1)),
                        (to_px(segment.x2), to_px(segment.y2)),
                    ],
                    ShapeStyle {
                        color: to_rgba(segment.color),
                        filled: false,
                        stroke_width: to_stroke(segment.stroke_width),
                    },
                ))
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            }
            stats.lines_drawn += 1;
        }

        for text in &frame.texts {
            let h_pos = match text.h_align {
                TextHAlign::Left => HPos::Left,
                TextHAlign::Center => HPos::Center,
                TextHAlign::Right => HPos::Right,
            };
            let style = ("sans-serif", text.font_size_px)
                .into_font()
                .color(&to_rgba(text.color))
                .pos(Pos::new(h_pos, VPos::Top));
            root.draw(&Text::new(
                text.text.clone(),
                (to_px(text.x), to_px(text.y)),
                style,
            ))
            .map_err(|err| map_backend_error("failed to draw text", err))?;
            stats.texts_drawn += 1;
        }

        root.present()
            .map_err(|err| map_backend_error("failed to write svg document", err))?;

        debug!(
            path = %path.display(),
            lines = stats.lines_drawn,
            rects = stats.rects_drawn,
            texts = stats.texts_drawn,
            "rendered svg surface"
        );
        self.last_stats = stats;
        Ok(())
    }
}

fn to_rgba(color: Color) -> RGBAColor {
    let (red, green, blue) = color.to_rgb8();
    RGBAColor(red, green, blue, color.alpha)
}

fn to_px(value: f64) -> i32 {
    value.round() as i32
}

fn to_stroke(width: f64) -> u32 {
    width.round().max(1.0) as u32
}

fn map_backend_error(prefix: &str, err: impl std::fmt::Display) -> PlotError {
    PlotError::Backend(format!("{prefix}: {err}"))
}
