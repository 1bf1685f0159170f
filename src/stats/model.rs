use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{PlotError, PlotResult};

/// Boundary precision/recall of one iteration against a gold standard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryScores {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl BoundaryScores {
    /// Builds scores with the harmonic-mean F-measure.
    #[must_use]
    pub fn new(precision: f64, recall: f64) -> Self {
        let sum = precision + recall;
        let fmeasure = if sum > 0.0 {
            2.0 * precision * recall / sum
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            fmeasure,
        }
    }

    fn is_finite(self) -> bool {
        self.precision.is_finite() && self.recall.is_finite() && self.fmeasure.is_finite()
    }
}

/// Everything measured after one training iteration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IterationSample {
    pub epoch: u32,
    pub operation: u32,
    pub iteration: u32,
    pub cost: f64,
    pub cost_parts: IndexMap<String, f64>,
    pub tag_counts: Vec<f64>,
    pub morph_types: u64,
    pub morph_tokens: u64,
    pub duration_secs: f64,
    pub average_morph_length: f64,
    pub changes: u64,
    pub changes_op: u64,
    pub violated_annotations: Option<u64>,
    pub gold_bpr: Option<BoundaryScores>,
}

/// Per-iteration statistics of one training run.
///
/// All per-record vectors are index aligned: entry `i` of every vector
/// belongs to the same iteration. `violated_annotations` and `gold_bpr` are
/// either empty (not measured) or as long as the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStatistics {
    pub title: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_word_tokens")]
    pub word_tokens: f64,
    pub epoch_numbers: Vec<u32>,
    pub operation_numbers: Vec<u32>,
    pub iteration_numbers: Vec<u32>,
    pub costs: Vec<f64>,
    #[serde(default)]
    pub cost_parts: IndexMap<String, Vec<f64>>,
    #[serde(default)]
    pub tag_counts: Vec<Vec<f64>>,
    #[serde(default)]
    pub morph_types: Vec<u64>,
    #[serde(default)]
    pub morph_tokens: Vec<u64>,
    #[serde(default)]
    pub durations: Vec<f64>,
    #[serde(default)]
    pub morph_lengths: Vec<f64>,
    #[serde(default)]
    pub changes: Vec<u64>,
    #[serde(default)]
    pub changes_op: Vec<u64>,
    #[serde(default)]
    pub violated_annotations: Vec<u64>,
    #[serde(default)]
    pub gold_bpr: Vec<BoundaryScores>,
}

fn default_word_tokens() -> f64 {
    1.0
}

impl Default for IterationStatistics {
    fn default() -> Self {
        Self::new(None)
    }
}

impl IterationStatistics {
    /// Creates empty statistics. Without a title, one is derived from the
    /// current UTC time.
    #[must_use]
    pub fn new(title: Option<String>) -> Self {
        let title = title.unwrap_or_else(|| {
            format!(
                "epoch statistics {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S")
            )
        });
        Self {
            title,
            categories: Vec::new(),
            word_tokens: default_word_tokens(),
            epoch_numbers: Vec::new(),
            operation_numbers: Vec::new(),
            iteration_numbers: Vec::new(),
            costs: Vec::new(),
            cost_parts: IndexMap::new(),
            tag_counts: Vec::new(),
            morph_types: Vec::new(),
            morph_tokens: Vec::new(),
            durations: Vec::new(),
            morph_lengths: Vec::new(),
            changes: Vec::new(),
            changes_op: Vec::new(),
            violated_annotations: Vec::new(),
            gold_bpr: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_word_tokens(mut self, word_tokens: f64) -> Self {
        self.word_tokens = word_tokens;
        self
    }

    /// Number of recorded iterations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Appends one iteration record.
    ///
    /// The sample is checked against the records already present; on error
    /// nothing is modified.
    pub fn record(&mut self, sample: IterationSample) -> PlotResult<()> {
        self.check_sample(&sample)?;

        let first = self.is_empty();
        self.epoch_numbers.push(sample.epoch);
        self.operation_numbers.push(sample.operation);
        self.iteration_numbers.push(sample.iteration);
        self.costs.push(sample.cost);
        if first {
            self.cost_parts = sample
                .cost_parts
                .into_iter()
                .map(|(name, value)| (name, vec![value]))
                .collect();
        } else {
            for (name, value) in sample.cost_parts {
                if let Some(values) = self.cost_parts.get_mut(&name) {
                    values.push(value);
                }
            }
        }
        self.tag_counts.push(sample.tag_counts);
        self.morph_types.push(sample.morph_types);
        self.morph_tokens.push(sample.morph_tokens);
        self.durations.push(sample.duration_secs);
        self.morph_lengths.push(sample.average_morph_length);
        self.changes.push(sample.changes);
        self.changes_op.push(sample.changes_op);
        if let Some(violated) = sample.violated_annotations {
            self.violated_annotations.push(violated);
        }
        if let Some(scores) = sample.gold_bpr {
            self.gold_bpr.push(scores);
        }

        trace!(
            records = self.len(),
            epoch = sample.epoch,
            operation = sample.operation,
            iteration = sample.iteration,
            "recorded iteration sample"
        );
        Ok(())
    }

    fn check_sample(&self, sample: &IterationSample) -> PlotResult<()> {
        let last_position = self
            .epoch_numbers
            .last()
            .zip(self.operation_numbers.last())
            .map(|(epoch, operation)| (*epoch, *operation));
        if let Some(last) = last_position {
            if (sample.epoch, sample.operation) < last {
                return Err(PlotError::InvalidData(format!(
                    "sample at epoch {} operation {} precedes the last record (epoch {} operation {})",
                    sample.epoch, sample.operation, last.0, last.1
                )));
            }
        }

        if !self.categories.is_empty() && sample.tag_counts.len() != self.categories.len() {
            return Err(PlotError::InvalidData(format!(
                "expected {} tag counts, got {}",
                self.categories.len(),
                sample.tag_counts.len()
            )));
        }

        if !self.is_empty() {
            let same_parts = sample.cost_parts.len() == self.cost_parts.len()
                && sample
                    .cost_parts
                    .keys()
                    .all(|name| self.cost_parts.contains_key(name));
            if !same_parts {
                return Err(PlotError::InvalidData(
                    "cost part names must match the first record".to_owned(),
                ));
            }
            if sample.violated_annotations.is_some() != !self.violated_annotations.is_empty() {
                return Err(PlotError::InvalidData(
                    "violated annotations must be recorded for every iteration or none".to_owned(),
                ));
            }
            if sample.gold_bpr.is_some() != !self.gold_bpr.is_empty() {
                return Err(PlotError::InvalidData(
                    "gold boundary scores must be recorded for every iteration or none".to_owned(),
                ));
            }
        }

        let finite = sample.cost.is_finite()
            && sample.duration_secs.is_finite()
            && sample.average_morph_length.is_finite()
            && sample.cost_parts.values().all(|value| value.is_finite())
            && sample.tag_counts.iter().all(|value| value.is_finite())
            && sample.gold_bpr.is_none_or(BoundaryScores::is_finite);
        if !finite {
            return Err(PlotError::InvalidData(
                "sample values must be finite".to_owned(),
            ));
        }

        Ok(())
    }

    /// Checks that every per-record vector is index aligned with `costs`.
    pub fn validate(&self) -> PlotResult<()> {
        let records = self.len();
        let required = [
            ("epoch_numbers", self.epoch_numbers.len()),
            ("operation_numbers", self.operation_numbers.len()),
            ("iteration_numbers", self.iteration_numbers.len()),
        ];
        for (field, len) in required {
            if len != records {
                return Err(misaligned(field, len, records));
            }
        }

        let measured = [
            ("tag_counts", self.tag_counts.len()),
            ("morph_types", self.morph_types.len()),
            ("morph_tokens", self.morph_tokens.len()),
            ("durations", self.durations.len()),
            ("morph_lengths", self.morph_lengths.len()),
            ("changes", self.changes.len()),
            ("changes_op", self.changes_op.len()),
            ("violated_annotations", self.violated_annotations.len()),
            ("gold_bpr", self.gold_bpr.len()),
        ];
        for (field, len) in measured {
            if len != 0 && len != records {
                return Err(misaligned(field, len, records));
            }
        }

        for (name, values) in &self.cost_parts {
            if values.len() != records {
                return Err(misaligned(&format!("cost_parts.{name}"), values.len(), records));
            }
        }

        if !self.categories.is_empty() {
            if let Some(row) = self
                .tag_counts
                .iter()
                .position(|counts| counts.len() != self.categories.len())
            {
                return Err(PlotError::InvalidData(format!(
                    "tag_counts[{row}] has {} values for {} categories",
                    self.tag_counts[row].len(),
                    self.categories.len()
                )));
            }
        }

        if !self.word_tokens.is_finite() || self.word_tokens <= 0.0 {
            return Err(PlotError::InvalidData(
                "word_tokens must be finite and > 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Record indices where a new epoch starts (the first record excluded).
    #[must_use]
    pub fn epoch_boundaries(&self) -> Vec<usize> {
        change_points(&self.epoch_numbers)
    }
}

fn change_points<T: PartialEq>(values: &[T]) -> Vec<usize> {
    values
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] != pair[1])
        .map(|(index, _)| index + 1)
        .collect()
}

fn misaligned(field: &str, len: usize, records: usize) -> PlotError {
    PlotError::InvalidData(format!(
        "`{field}` has {len} entries but {records} iterations were recorded"
    ))
}
