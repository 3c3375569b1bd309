use crate::LinkageError;

/// Crank angle sweep in degrees, both ends included.
///
/// The default is `0..=360` in 1° steps, so the first and the last samples
/// are the same configuration.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    /// First crank angle (deg)
    pub start: f64,
    /// Last crank angle (deg)
    pub end: f64,
    /// Increment (deg)
    pub step: f64,
}

impl Default for Sweep {
    fn default() -> Self {
        Self { start: 0., end: 360., step: 1. }
    }
}

impl Sweep {
    /// Relative tolerance for the end point to land on the grid.
    const GRID_EPS: f64 = 1e-9;
    /// Largest number of samples of a sweep.
    pub const MAX_LEN: usize = 10_000_000;

    /// Create a checked sweep.
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self, LinkageError> {
        let s = Self { start, end, step };
        s.validate()?;
        Ok(s)
    }

    /// A full revolution with `n` steps.
    pub fn full(n: usize) -> Result<Self, LinkageError> {
        if n == 0 {
            return Err(LinkageError::Sweep("zero steps".to_string()));
        }
        Self::new(0., 360., 360. / n as f64)
    }

    /// Check the range.
    pub fn validate(&self) -> Result<(), LinkageError> {
        let Self { start, end, step } = *self;
        if !(start.is_finite() && end.is_finite() && step.is_finite()) {
            Err(LinkageError::Sweep(format!("non-finite range {start}..={end} by {step}")))
        } else if step <= 0. {
            Err(LinkageError::Sweep(format!("step must be positive, got {step}")))
        } else if end < start {
            Err(LinkageError::Sweep(format!("end {end} is before start {start}")))
        } else if !(self.intervals() < Self::MAX_LEN as f64) {
            Err(LinkageError::Sweep(format!(
                "more than {} samples in {start}..={end} by {step}",
                Self::MAX_LEN
            )))
        } else {
            Ok(())
        }
    }

    fn intervals(&self) -> f64 {
        ((self.end - self.start) / self.step + Self::GRID_EPS).floor()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        (self.intervals() as usize).saturating_add(1)
    }

    /// Return true if there is no sample.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Crank angles in radians.
    pub fn angles(&self) -> impl ExactSizeIterator<Item = f64> + Clone {
        let Self { start, step, .. } = *self;
        (0..self.len()).map(move |i| (start + i as f64 * step).to_radians())
    }
}

/// What the sweep driver does with a failed sample.
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "snake_case")
)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Policy {
    /// Abort the sweep with the first error
    FailFast,
    /// Keep the failure at its index and continue
    #[default]
    Record,
}
