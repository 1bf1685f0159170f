use ordered_float::OrderedFloat;

use crate::core::DataPoint;
use crate::render::Color;
use crate::stats::IterationStatistics;

/// Tukey fence multiplier for leading outliers dropped from a zoomed domain.
const ZOOM_FENCE_IQR_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Costs,
    CostParts,
    TagCounts,
    MorphTypes,
    MorphTokens,
    AverageMorphLength,
    Durations,
    Changes,
    ViolatedAnnotations,
    GoldBpr,
}

impl ChartKind {
    pub const ALL: [ChartKind; 10] = [
        ChartKind::Costs,
        ChartKind::CostParts,
        ChartKind::TagCounts,
        ChartKind::MorphTypes,
        ChartKind::MorphTokens,
        ChartKind::AverageMorphLength,
        ChartKind::Durations,
        ChartKind::Changes,
        ChartKind::ViolatedAnnotations,
        ChartKind::GoldBpr,
    ];

    /// File-name friendly identifier.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Costs => "costs",
            Self::CostParts => "cost_parts",
            Self::TagCounts => "tag_counts",
            Self::MorphTypes => "morph_types",
            Self::MorphTokens => "morph_tokens",
            Self::AverageMorphLength => "morph_length",
            Self::Durations => "durations",
            Self::Changes => "changes",
            Self::ViolatedAnnotations => "violated_annotations",
            Self::GoldBpr => "gold_bpr",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Costs => "Model cost",
            Self::CostParts => "Cost components",
            Self::TagCounts => "Category tag counts",
            Self::MorphTypes => "Morph types",
            Self::MorphTokens => "Morph tokens per word",
            Self::AverageMorphLength => "Average morph length",
            Self::Durations => "Iteration duration",
            Self::Changes => "Changed segmentations",
            Self::ViolatedAnnotations => "Violated annotations",
            Self::GoldBpr => "Boundary precision/recall",
        }
    }

    #[must_use]
    pub fn y_label(self) -> &'static str {
        match self {
            Self::Costs | Self::CostParts => "cost",
            Self::TagCounts => "count",
            Self::MorphTypes => "types",
            Self::MorphTokens => "tokens / word",
            Self::AverageMorphLength => "letters",
            Self::Durations => "seconds",
            Self::Changes | Self::ViolatedAnnotations => "words",
            Self::GoldBpr => "score",
        }
    }
}

/// One polyline of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: Color,
    pub points: Vec<DataPoint>,
}

impl Series {
    #[must_use]
    pub fn from_values<I>(name: impl Into<String>, color: Color, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let points = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| DataPoint::new(index as f64, value))
            .collect();
        Self {
            name: name.into(),
            color,
            points,
        }
    }
}

/// Backend-independent description of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    /// x positions of dashed vertical guide lines (epoch starts).
    pub markers: Vec<f64>,
    /// Overrides the data-derived y extent.
    pub y_extent: Option<(f64, f64)>,
}

impl ChartSpec {
    #[must_use]
    pub fn new(kind: ChartKind, series: Vec<Series>) -> Self {
        Self {
            kind,
            title: kind.title().to_owned(),
            x_label: "iteration".to_owned(),
            y_label: kind.y_label().to_owned(),
            series,
            markers: Vec::new(),
            y_extent: None,
        }
    }

    #[must_use]
    pub fn with_markers(mut self, markers: Vec<f64>) -> Self {
        self.markers = markers;
        self
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|series| series.points.len()).sum()
    }

    /// `(min, max)` over all x values, if any point exists.
    #[must_use]
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        extent(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.x)))
    }

    /// `(min, max)` over all y values, or the explicit override.
    #[must_use]
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        self.y_extent
            .or_else(|| extent(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.y))))
    }
}

/// Qualitative palette (matplotlib "tab10").
#[must_use]
pub fn palette_color(index: usize) -> Color {
    const PALETTE: [(u8, u8, u8); 10] = [
        (31, 119, 180),
        (255, 127, 14),
        (44, 160, 44),
        (214, 39, 40),
        (148, 103, 189),
        (140, 86, 75),
        (227, 119, 194),
        (127, 127, 127),
        (188, 189, 34),
        (23, 190, 207),
    ];
    let (red, green, blue) = PALETTE[index % PALETTE.len()];
    Color::from_rgb8(red, green, blue)
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|value| value.is_finite())
        .map(OrderedFloat)
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((low, high)) => Some((low.min(value), high.max(value))),
        })
        .map(|(low, high)| (low.into_inner(), high.into_inner()))
}

/// y extent that ignores a leading spike.
///
/// Training costs usually start far above where they settle; leading values
/// above the upper Tukey fence (`q3 + 1.5 * iqr`) are left out so the rest of
/// the curve is readable.
#[must_use]
pub fn zoomed_extent(values: &[f64]) -> Option<(f64, f64)> {
    let mut sorted: Vec<OrderedFloat<f64>> = values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .map(OrderedFloat)
        .collect();
    if sorted.len() < 4 {
        return extent(values.iter().copied());
    }
    sorted.sort_unstable();
    let quartile = |ratio: f64| sorted[((sorted.len() - 1) as f64 * ratio).floor() as usize];
    let (q1, q3) = (quartile(0.25).into_inner(), quartile(0.75).into_inner());
    let cutoff = q3 + ZOOM_FENCE_IQR_FACTOR * (q3 - q1);

    let settled = values
        .iter()
        .position(|value| *value <= cutoff)
        .unwrap_or(0);
    extent(values[settled..].iter().copied())
}

/// Every chart the statistics have data for, in display order.
#[must_use]
pub fn charts_for(stats: &IterationStatistics) -> Vec<ChartSpec> {
    ChartKind::ALL
        .into_iter()
        .filter_map(|kind| chart_for(stats, kind))
        .collect()
}

/// Builds the chart of `kind`; `None` when the statistics lack its data.
#[must_use]
pub fn chart_for(stats: &IterationStatistics, kind: ChartKind) -> Option<ChartSpec> {
    let series = match kind {
        ChartKind::Costs => vec![Series::from_values(
            "cost",
            palette_color(0),
            stats.costs.iter().copied(),
        )],
        ChartKind::CostParts => stats
            .cost_parts
            .iter()
            .enumerate()
            .map(|(index, (name, values))| {
                Series::from_values(name.clone(), palette_color(index), values.iter().copied())
            })
            .collect(),
        ChartKind::TagCounts => {
            let width = stats.tag_counts.iter().map(Vec::len).max().unwrap_or(0);
            (0..width)
                .map(|category| {
                    let name = stats
                        .categories
                        .get(category)
                        .cloned()
                        .unwrap_or_else(|| format!("tag {category}"));
                    Series::from_values(
                        name,
                        palette_color(category),
                        stats
                            .tag_counts
                            .iter()
                            .map(|counts| counts.get(category).copied().unwrap_or(0.0)),
                    )
                })
                .collect()
        }
        ChartKind::MorphTypes => single(&stats.morph_types, "types", |v| v as f64),
        ChartKind::MorphTokens => {
            let word_tokens = stats.word_tokens;
            single(&stats.morph_tokens, "tokens", |v| v as f64 / word_tokens)
        }
        ChartKind::AverageMorphLength => single(&stats.morph_lengths, "length", |v| v),
        ChartKind::Durations => single(&stats.durations, "duration", |v| v),
        ChartKind::Changes => {
            if stats.changes.is_empty() {
                Vec::new()
            } else {
                vec![
                    Series::from_values(
                        "iteration",
                        palette_color(0),
                        stats.changes.iter().map(|v| *v as f64),
                    ),
                    Series::from_values(
                        "operation",
                        palette_color(1),
                        stats.changes_op.iter().map(|v| *v as f64),
                    ),
                ]
            }
        }
        ChartKind::ViolatedAnnotations => {
            single(&stats.violated_annotations, "violated", |v| v as f64)
        }
        ChartKind::GoldBpr => {
            if stats.gold_bpr.is_empty() {
                Vec::new()
            } else {
                vec![
                    Series::from_values(
                        "precision",
                        palette_color(0),
                        stats.gold_bpr.iter().map(|s| s.precision),
                    ),
                    Series::from_values(
                        "recall",
                        palette_color(1),
                        stats.gold_bpr.iter().map(|s| s.recall),
                    ),
                    Series::from_values(
                        "F-measure",
                        palette_color(2),
                        stats.gold_bpr.iter().map(|s| s.fmeasure),
                    ),
                ]
            }
        }
    };

    let series: Vec<Series> = series
        .into_iter()
        .filter(|series| !series.points.is_empty())
        .collect();
    if series.is_empty() && kind != ChartKind::Costs {
        return None;
    }

    let markers = stats
        .epoch_boundaries()
        .into_iter()
        .map(|boundary| boundary as f64 - 0.5)
        .collect();
    Some(ChartSpec::new(kind, series).with_markers(markers))
}

/// Cost chart whose y domain ignores the initial spike.
#[must_use]
pub fn zoomed_costs_chart(stats: &IterationStatistics) -> Option<ChartSpec> {
    let mut chart = chart_for(stats, ChartKind::Costs)?;
    chart.y_extent = zoomed_extent(&stats.costs);
    chart.title = format!("{} (zoomed)", chart.title);
    Some(chart)
}

/// Charts shown together on the stacked surface.
#[must_use]
pub fn stacked_charts(stats: &IterationStatistics) -> Vec<ChartSpec> {
    let last = if stats.gold_bpr.is_empty() {
        ChartKind::Durations
    } else {
        ChartKind::GoldBpr
    };
    let mut charts: Vec<ChartSpec> = zoomed_costs_chart(stats).into_iter().collect();
    charts.extend(
        [
            ChartKind::MorphTypes,
            ChartKind::TagCounts,
            ChartKind::AverageMorphLength,
            ChartKind::Changes,
            last,
        ]
        .into_iter()
        .filter_map(|kind| chart_for(stats, kind)),
    );
    charts
}

fn single<T: Copy>(values: &[T], name: &str, map: impl Fn(T) -> f64) -> Vec<Series> {
    if values.is_empty() {
        return Vec::new();
    }
    vec![Series::from_values(
        name,
        palette_color(0),
        values.iter().copied().map(map),
    )]
}
