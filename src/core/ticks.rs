use smallvec::SmallVec;

pub const AXIS_X_TARGET_SPACING_PX: f64 = 80.0;
pub const AXIS_Y_TARGET_SPACING_PX: f64 = 40.0;

pub type TickValues = SmallVec<[f64; 12]>;

const MAX_TICKS: usize = 12;

pub fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Rounds a raw step up to 1, 2, 2.5 or 5 times a power of ten.
#[must_use]
pub fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 1.0;
    }

    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 2.5 {
        2.5
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick values on multiples of a nice step, all inside `range`.
#[must_use]
pub fn nice_ticks(range: (f64, f64), tick_count: usize) -> (TickValues, f64) {
    let (low, high) = if range.0 <= range.1 {
        range
    } else {
        (range.1, range.0)
    };
    let mut ticks = TickValues::new();
    if tick_count == 0 || !low.is_finite() || !high.is_finite() || low == high {
        return (ticks, 0.0);
    }

    let intervals = tick_count.saturating_sub(1).max(1) as f64;
    let step = nice_step((high - low) / intervals);
    let epsilon = step * 1e-9;
    let mut value = (low / step).ceil() * step;
    while value <= high + epsilon && ticks.len() < MAX_TICKS {
        // Snap values like -0.0 and 0.30000000000000004 back onto the grid.
        let snapped = (value / step).round() * step;
        ticks.push(if snapped == 0.0 { 0.0 } else { snapped });
        value += step;
    }

    (ticks, step)
}

/// Formats a tick label with just enough decimals for `step`.
#[must_use]
pub fn format_tick_label(value: f64, step: f64) -> String {
    if value != 0.0 && (value.abs() >= 1e6 || value.abs() < 1e-4) {
        return format!("{value:.2e}");
    }
    let decimals = if step > 0.0 && step.is_finite() {
        (-step.log10().floor()).clamp(0.0, 6.0) as usize
    } else {
        0
    };
    let decimals = if step > 0.0 && (step * 10f64.powi(decimals as i32)).fract().abs() > 1e-9 {
        (decimals + 1).min(6)
    } else {
        decimals
    };
    format!("{value:.decimals$}")
}
