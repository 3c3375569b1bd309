use crate::{angle_diff, Anchor, Angles, Linkage, Pose, SolveError};

/// A solved configuration.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Solved {
    /// Loop solution
    pub angles: Angles,
    /// Joint positions
    pub pose: Pose,
}

/// One crank angle of a sweep, either solved or failed.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Crank angle (rad)
    pub theta2: f64,
    /// Outcome
    pub state: Result<Solved, SolveError>,
}

impl Sample {
    /// Post-process a loop solution into a sample.
    pub fn solved(lk: &Linkage, theta2: f64, angles: Angles, anchor: Anchor) -> Self {
        let pose = Pose::new(lk, theta2, angles, anchor);
        Self { theta2, state: Ok(Solved { angles, pose }) }
    }

    /// A failed sample.
    pub fn failed(err: SolveError) -> Self {
        Self { theta2: err.theta2(), state: Err(err) }
    }

    /// Return true if the sample is solved.
    pub fn is_valid(&self) -> bool {
        self.state.is_ok()
    }

    /// Loop solution, if any.
    pub fn angles(&self) -> Option<Angles> {
        self.state.as_ref().ok().map(|s| s.angles)
    }

    /// Joint positions, if any.
    pub fn pose(&self) -> Option<&Pose> {
        self.state.as_ref().ok().map(|s| &s.pose)
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&SolveError> {
        self.state.as_ref().err()
    }
}

/// Flat record of a sample, handed to the visualization sink.
///
/// Geometry fields are empty for an invalid sample.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Row {
    /// Crank angle (deg)
    pub theta2: f64,
    /// Solved or not
    pub valid: bool,
    /// Coupler angle (deg)
    pub theta3: Option<f64>,
    /// Output angle (deg)
    pub theta4: Option<f64>,
    /// Joint A
    pub ax: Option<f64>,
    /// Joint A
    pub ay: Option<f64>,
    /// Joint B
    pub bx: Option<f64>,
    /// Joint B
    pub by: Option<f64>,
    /// Tracer point E
    pub ex: Option<f64>,
    /// Tracer point E
    pub ey: Option<f64>,
    /// Failure message
    pub error: Option<String>,
}

impl From<&Sample> for Row {
    fn from(sample: &Sample) -> Self {
        let theta2 = sample.theta2.to_degrees();
        match &sample.state {
            Ok(Solved { angles, pose }) => {
                let [theta3, theta4] = angles.to_degrees();
                let Pose { a: [ax, ay], b: [bx, by], e: [ex, ey] } = *pose;
                Self {
                    theta2,
                    valid: true,
                    theta3: Some(theta3),
                    theta4: Some(theta4),
                    ax: Some(ax),
                    ay: Some(ay),
                    bx: Some(bx),
                    by: Some(by),
                    ex: Some(ex),
                    ey: Some(ey),
                    error: None,
                }
            }
            Err(e) => Self { theta2, error: Some(e.to_string()), ..Self::default() },
        }
    }
}

/// Ordered samples of a sweep.
///
/// Failed samples keep their index, so the `n`-th sample always belongs to
/// the `n`-th crank angle of the sweep.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Trajectory {
    samples: Vec<Sample>,
}

impl From<Vec<Sample>> for Trajectory {
    fn from(samples: Vec<Sample>) -> Self {
        Self { samples }
    }
}

impl Trajectory {
    /// All samples.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Return true if there is no sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Failed samples with their indices.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &SolveError)> {
        self.samples
            .iter()
            .enumerate()
            .filter_map(|(i, s)| Some((i, s.error()?)))
    }

    /// Return true if every sample is solved.
    pub fn is_complete(&self) -> bool {
        self.samples.iter().all(Sample::is_valid)
    }

    /// Crank angle history (rad).
    pub fn theta2(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.theta2).collect()
    }

    /// Loop solution history.
    pub fn angles(&self) -> Vec<Option<Angles>> {
        self.samples.iter().map(Sample::angles).collect()
    }

    /// Path of the tracer point.
    pub fn coupler_curve(&self) -> Vec<Option<[f64; 2]>> {
        self.samples.iter().map(|s| s.pose().map(|p| p.e)).collect()
    }

    /// Output angle history without the 2π jumps of the wrapped angles.
    ///
    /// The history restarts from the wrapped value after an invalid sample.
    pub fn unwrapped_theta4(&self) -> Vec<Option<f64>> {
        let mut last = None;
        self.samples
            .iter()
            .map(|s| {
                let Some(Angles { theta4, .. }) = s.angles() else {
                    last = None;
                    return None;
                };
                let t = last.map_or(theta4, |prev: f64| prev + angle_diff(theta4, prev));
                last = Some(t);
                Some(t)
            })
            .collect()
    }

    /// Largest change of `θ3` or `θ4` between adjacent valid samples.
    pub fn max_jump(&self) -> f64 {
        self.samples
            .windows(2)
            .filter_map(|w| Some(w[0].angles()?.dist(&w[1].angles()?)))
            .fold(0., f64::max)
    }

    /// Largest difference to another trajectory over the indices solved by
    /// both.
    pub fn max_diff(&self, rhs: &Self) -> f64 {
        self.samples
            .iter()
            .zip(&rhs.samples)
            .filter_map(|(a, b)| Some(a.angles()?.dist(&b.angles()?)))
            .fold(0., f64::max)
    }

    /// Largest loop residual over the valid samples.
    pub fn max_residual(&self, lk: &Linkage) -> f64 {
        self.samples
            .iter()
            .filter_map(|s| {
                let [x, y] = lk.residual(s.theta2, s.angles()?);
                Some(x.hypot(y))
            })
            .fold(0., f64::max)
    }

    /// Flat records for the visualization sink.
    pub fn rows(&self) -> Vec<Row> {
        self.samples.iter().map(Row::from).collect()
    }

    /// Dump the records as CSV with a header line.
    #[cfg(feature = "csv")]
    #[cfg_attr(doc_cfg, doc(cfg(feature = "csv")))]
    pub fn to_csv(&self) -> Result<String, Box<dyn std::error::Error>> {
        crate::csv::dump_rows(&self.rows())
    }
}
