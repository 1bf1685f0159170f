use crate::core::ticks::{AXIS_X_TARGET_SPACING_PX, AXIS_Y_TARGET_SPACING_PX, axis_tick_target_count};
use crate::core::{LinearScale, PixelRange, Region, Viewport, format_tick_label, nice_ticks};
use crate::error::{PlotError, PlotResult};
use crate::render::{
    Color, LinePrimitive, LineStrokeStyle, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

use super::chart::ChartSpec;

pub const MIN_CELL_WIDTH_PX: u32 = 200;
pub const MIN_CELL_HEIGHT_PX: u32 = 150;

const PLOT_INSET_LEFT_PX: f64 = 72.0;
const PLOT_INSET_TOP_PX: f64 = 44.0;
const PLOT_INSET_RIGHT_PX: f64 = 20.0;
const PLOT_INSET_BOTTOM_PX: f64 = 48.0;

const TITLE_FONT_PX: f64 = 15.0;
const LABEL_FONT_PX: f64 = 12.0;
const TICK_FONT_PX: f64 = 11.0;
const TICK_LENGTH_PX: f64 = 4.0;

const SERIES_STROKE_PX: f64 = 1.5;
const POINT_MARKER_PX: f64 = 4.0;

const LEGEND_WIDTH_PX: f64 = 120.0;
const LEGEND_ROW_PX: f64 = 16.0;

const TEXT_COLOR: Color = Color::rgb(0.15, 0.15, 0.15);
const AXIS_COLOR: Color = Color::rgb(0.35, 0.35, 0.35);
const GRID_COLOR: Color = Color::rgb(0.90, 0.90, 0.90);
const MARKER_COLOR: Color = Color::rgb(0.55, 0.55, 0.55);
const PLOT_BACKGROUND: Color = Color::rgb(1.0, 1.0, 1.0);
const LEGEND_BACKGROUND: Color = Color::rgba(1.0, 1.0, 1.0, 0.85);

/// Builds the primitives of one chart inside `region` of a surface.
///
/// The returned frame carries the full surface `viewport` so several charts
/// can be appended into one frame.
pub fn build_chart_frame(
    chart: &ChartSpec,
    region: Region,
    viewport: Viewport,
) -> PlotResult<RenderFrame> {
    if region.width < f64::from(MIN_CELL_WIDTH_PX) || region.height < f64::from(MIN_CELL_HEIGHT_PX)
    {
        return Err(PlotError::InvalidData(format!(
            "chart region {}x{} is smaller than {MIN_CELL_WIDTH_PX}x{MIN_CELL_HEIGHT_PX}",
            region.width, region.height
        )));
    }

    let plot = region.inset(
        PLOT_INSET_LEFT_PX,
        PLOT_INSET_TOP_PX,
        PLOT_INSET_RIGHT_PX,
        PLOT_INSET_BOTTOM_PX,
    );
    let (x_range, y_range) = (plot.horizontal(), plot.vertical_up());

    let (x_min, x_max) = chart.x_extent().unwrap_or((0.0, 1.0));
    let x_scale = LinearScale::from_extent(x_min, x_max)?;
    let (y_min, y_max) = chart.y_extent().unwrap_or((0.0, 1.0));
    let y_scale = LinearScale::from_extent(y_min, y_max)?;

    let mut frame = RenderFrame::new(viewport).with_rect(
        RectPrimitive::new(plot.x, plot.y, plot.width, plot.height, PLOT_BACKGROUND)
            .with_border(1.0, AXIS_COLOR),
    );

    frame.texts.push(TextPrimitive::new(
        chart.title.clone(),
        region.x + region.width / 2.0,
        region.y + 8.0,
        TITLE_FONT_PX,
        TEXT_COLOR,
        TextHAlign::Center,
    ));
    push_label(&mut frame, &chart.y_label, plot.x, plot.y - LABEL_FONT_PX - 6.0, TextHAlign::Left);
    push_label(
        &mut frame,
        &chart.x_label,
        plot.x + plot.width / 2.0,
        plot.bottom() + TICK_LENGTH_PX + TICK_FONT_PX + 10.0,
        TextHAlign::Center,
    );

    push_x_ticks(&mut frame, x_scale, x_range, plot)?;
    push_y_ticks(&mut frame, y_scale, y_range, plot)?;

    for marker in &chart.markers {
        if !x_scale.contains(*marker) {
            continue;
        }
        let x = x_scale.domain_to_pixel(*marker, x_range)?;
        frame.lines.push(
            LinePrimitive::new(x, plot.y, x, plot.bottom(), 1.0, MARKER_COLOR)
                .with_stroke_style(LineStrokeStyle::Dashed),
        );
    }

    for series in &chart.series {
        let (low, high) = y_scale.domain();
        let mut previous: Option<(f64, f64, f64)> = None;
        for point in &series.points {
            if !point.y.is_finite() {
                previous = None;
                continue;
            }
            let x = x_scale.domain_to_pixel(point.x, x_range)?;
            let y = y_scale.domain_to_pixel(point.y.clamp(low, high), y_range)?;
            if let Some((prev_x, prev_y, prev_value)) = previous {
                let both_above = prev_value > high && point.y > high;
                let both_below = prev_value < low && point.y < low;
                if !both_above && !both_below {
                    frame.lines.push(LinePrimitive::new(
                        prev_x,
                        prev_y,
                        x,
                        y,
                        SERIES_STROKE_PX,
                        series.color,
                    ));
                }
            }
            previous = Some((x, y, point.y));
        }

        if series.points.len() == 1 {
            if let Some((x, y, _)) = previous {
                frame.rects.push(RectPrimitive::new(
                    x - POINT_MARKER_PX / 2.0,
                    y - POINT_MARKER_PX / 2.0,
                    POINT_MARKER_PX,
                    POINT_MARKER_PX,
                    series.color,
                ));
            }
        }
    }

    if chart.point_count() == 0 {
        frame.texts.push(TextPrimitive::new(
            "no data",
            plot.x + plot.width / 2.0,
            plot.y + plot.height / 2.0 - LABEL_FONT_PX / 2.0,
            LABEL_FONT_PX,
            AXIS_COLOR,
            TextHAlign::Center,
        ));
    }

    if chart.series.len() > 1 {
        push_legend(&mut frame, chart, plot);
    }

    Ok(frame)
}

/// Centered run title for a surface heading band.
#[must_use]
pub fn heading_text(title: &str, region: Region) -> Option<TextPrimitive> {
    if title.is_empty() {
        return None;
    }
    Some(TextPrimitive::new(
        title,
        region.x + region.width / 2.0,
        region.y + (region.height - TITLE_FONT_PX - 2.0) / 2.0,
        TITLE_FONT_PX + 2.0,
        TEXT_COLOR,
        TextHAlign::Center,
    ))
}

fn push_label(frame: &mut RenderFrame, text: &str, x: f64, y: f64, h_align: TextHAlign) {
    if text.is_empty() {
        return;
    }
    frame.texts.push(TextPrimitive::new(
        text,
        x,
        y,
        LABEL_FONT_PX,
        TEXT_COLOR,
        h_align,
    ));
}

fn push_x_ticks(
    frame: &mut RenderFrame,
    scale: LinearScale,
    range: PixelRange,
    plot: Region,
) -> PlotResult<()> {
    let count = axis_tick_target_count(plot.width, AXIS_X_TARGET_SPACING_PX, 2, 10);
    let (ticks, step) = nice_ticks(scale.domain(), count);
    for value in ticks {
        let x = scale.domain_to_pixel(value, range)?;
        frame
            .lines
            .push(LinePrimitive::new(x, plot.y, x, plot.bottom(), 1.0, GRID_COLOR));
        frame.lines.push(LinePrimitive::new(
            x,
            plot.bottom(),
            x,
            plot.bottom() + TICK_LENGTH_PX,
            1.0,
            AXIS_COLOR,
        ));
        frame.texts.push(TextPrimitive::new(
            format_tick_label(value, step),
            x,
            plot.bottom() + TICK_LENGTH_PX + 2.0,
            TICK_FONT_PX,
            TEXT_COLOR,
            TextHAlign::Center,
        ));
    }
    Ok(())
}

fn push_y_ticks(
    frame: &mut RenderFrame,
    scale: LinearScale,
    range: PixelRange,
    plot: Region,
) -> PlotResult<()> {
    let count = axis_tick_target_count(plot.height, AXIS_Y_TARGET_SPACING_PX, 2, 10);
    let (ticks, step) = nice_ticks(scale.domain(), count);
    for value in ticks {
        let y = scale.domain_to_pixel(value, range)?;
        frame
            .lines
            .push(LinePrimitive::new(plot.x, y, plot.right(), y, 1.0, GRID_COLOR));
        frame.lines.push(LinePrimitive::new(
            plot.x - TICK_LENGTH_PX,
            y,
            plot.x,
            y,
            1.0,
            AXIS_COLOR,
        ));
        frame.texts.push(TextPrimitive::new(
            format_tick_label(value, step),
            plot.x - TICK_LENGTH_PX - 3.0,
            y - TICK_FONT_PX / 2.0,
            TICK_FONT_PX,
            TEXT_COLOR,
            TextHAlign::Right,
        ));
    }
    Ok(())
}

fn push_legend(frame: &mut RenderFrame, chart: &ChartSpec, plot: Region) {
    let width = LEGEND_WIDTH_PX.min(plot.width);
    let height = LEGEND_ROW_PX * chart.series.len() as f64 + 6.0;
    if height >= plot.height {
        return;
    }
    let left = plot.right() - width - 6.0;
    let top = plot.y + 6.0;
    frame.rects.push(
        RectPrimitive::new(left, top, width, height, LEGEND_BACKGROUND)
            .with_border(1.0, GRID_COLOR),
    );
    for (row, series) in chart.series.iter().enumerate() {
        let y = top + 3.0 + row as f64 * LEGEND_ROW_PX;
        let mid = y + LEGEND_ROW_PX / 2.0;
        frame.lines.push(LinePrimitive::new(
            left + 6.0,
            mid,
            left + 24.0,
            mid,
            SERIES_STROKE_PX,
            series.color,
        ));
        if !series.name.is_empty() {
            frame.texts.push(TextPrimitive::new(
                series.name.clone(),
                left + 30.0,
                y + 1.0,
                TICK_FONT_PX,
                TEXT_COLOR,
                TextHAlign::Left,
            ));
        }
    }
}
