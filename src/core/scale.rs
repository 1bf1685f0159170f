use crate::core::types::PixelRange;
use crate::error::{PlotError, PlotResult};

/// Fraction of the value extent added on each side of a data-derived domain.
const EXTENT_PADDING_RATIO: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> PlotResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(PlotError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    /// Builds a padded domain around an observed `[min, max]` extent.
    ///
    /// A degenerate extent (single value) is widened by one unit or by a
    /// tenth of its magnitude, whichever is larger.
    pub fn from_extent(min: f64, max: f64) -> PlotResult<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(PlotError::InvalidData(
                "extent must be finite and ordered".to_owned(),
            ));
        }

        let span = max - min;
        if span == 0.0 {
            let half = (min.abs() * 0.1).max(1.0) / 2.0;
            return Self::new(min - half, max + half);
        }

        let pad = span * EXTENT_PADDING_RATIO;
        Self::new(min - pad, max + pad)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn domain_to_pixel(self, value: f64, range: PixelRange) -> PlotResult<f64> {
        if !range.is_valid() {
            return Err(PlotError::InvalidData(
                "pixel range must be finite and non-empty".to_owned(),
            ));
        }

        if !value.is_finite() {
            return Err(PlotError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(range.start + normalized * range.span())
    }

    pub fn pixel_to_domain(self, pixel: f64, range: PixelRange) -> PlotResult<f64> {
        if !range.is_valid() {
            return Err(PlotError::InvalidData(
                "pixel range must be finite and non-empty".to_owned(),
            ));
        }

        if !pixel.is_finite() {
            return Err(PlotError::InvalidData("pixel must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (pixel - range.start) / range.span();
        Ok(self.domain_start + normalized * span)
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        let (low, high) = if self.domain_start <= self.domain_end {
            (self.domain_start, self.domain_end)
        } else {
            (self.domain_end, self.domain_start)
        };
        (low..=high).contains(&value)
    }
}
